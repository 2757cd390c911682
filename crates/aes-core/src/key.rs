//! Key types for AES-128.

use core::convert::TryFrom;

use crate::block::{Block, BLOCK_BYTES};
use crate::error::{check_len, Error, Result};

/// Number of rounds in AES-128.
pub const ROUNDS: usize = 10;

/// Size of a full expanded schedule in bytes.
pub const SCHEDULE_BYTES: usize = (ROUNDS + 1) * BLOCK_BYTES;

/// AES-128 key wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aes128Key(pub [u8; 16]);

impl Aes128Key {
    /// Returns the raw key bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl From<[u8; 16]> for Aes128Key {
    fn from(value: [u8; 16]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for Aes128Key {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        check_len("key", 16, bytes.len())?;
        let mut key = [0u8; 16];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }
}

/// Expanded round keys for AES-128.
///
/// Entry 0 is the cipher key itself; entries 1..=10 follow from the key
/// schedule recurrence. Each entry uses the same column-major layout as the
/// state it is combined with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundKeys(pub [Block; ROUNDS + 1]);

impl RoundKeys {
    /// Returns the round key at the requested index (0..=10).
    #[inline]
    pub fn get(&self, round: usize) -> &Block {
        &self.0[round]
    }

    /// Iterates over the round keys in round order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.0.iter()
    }

    /// Flattens the schedule into 176 bytes.
    pub fn to_bytes(&self) -> [u8; SCHEDULE_BYTES] {
        let mut out = [0u8; SCHEDULE_BYTES];
        for (chunk, key) in out.chunks_exact_mut(BLOCK_BYTES).zip(self.0.iter()) {
            chunk.copy_from_slice(key);
        }
        out
    }
}

impl TryFrom<&[u8]> for RoundKeys {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        check_len("round key schedule", SCHEDULE_BYTES, bytes.len())?;
        let mut keys = [[0u8; BLOCK_BYTES]; ROUNDS + 1];
        for (key, chunk) in keys.iter_mut().zip(bytes.chunks_exact(BLOCK_BYTES)) {
            key.copy_from_slice(chunk);
        }
        Ok(Self(keys))
    }
}
