//! Block representation helpers.
//!
//! A block doubles as the cipher state. Bytes are laid out column-major: the
//! byte at `(row, col)` of the 4×4 state lives at index `col * 4 + row`.

use crate::error::{check_len, Result};

/// Number of bytes in an AES block.
pub const BLOCK_BYTES: usize = 16;

/// AES block of 16 bytes.
pub type Block = [u8; BLOCK_BYTES];

/// XORs two blocks, writing the result into `dst`.
#[inline]
pub fn xor_in_place(dst: &mut Block, rhs: &Block) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}

/// Copies a 16-byte slice into a block.
pub fn block_from_slice(bytes: &[u8]) -> Result<Block> {
    check_len("block", BLOCK_BYTES, bytes.len())?;
    let mut block = [0u8; BLOCK_BYTES];
    block.copy_from_slice(bytes);
    Ok(block)
}

/// Linear index of the state byte at `(row, col)`.
#[inline]
pub const fn state_index(row: usize, col: usize) -> usize {
    col * 4 + row
}

/// Reads the state byte at `(row, col)`.
#[inline]
pub fn state_byte(block: &Block, row: usize, col: usize) -> u8 {
    block[state_index(row, col)]
}

/// Returns the state as four rows, for display.
pub fn rows(block: &Block) -> [[u8; 4]; 4] {
    core::array::from_fn(|row| core::array::from_fn(|col| state_byte(block, row, col)))
}
