//! Forward AES-128 block cipher.
//!
//! This crate follows FIPS-197 and provides:
//! - GF(2^8) arithmetic and the forward S-box.
//! - The AES-128 key schedule.
//! - Single-block encryption, optionally reporting every intermediate state
//!   through a [`RoundObserver`].
//!
//! The implementation aims for clarity and testability rather than constant-time
//! guarantees; it should not be treated as side-channel hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod error;
pub mod gf;
mod key;
mod observer;
pub mod round;
mod sbox;

pub use crate::block::{
    block_from_slice, rows, state_byte, state_index, xor_in_place, Block, BLOCK_BYTES,
};
pub use crate::cipher::{encrypt_block, encrypt_block_observed, expand_key, Aes128, RCON};
pub use crate::error::{Error, Result};
pub use crate::key::{Aes128Key, RoundKeys, ROUNDS, SCHEDULE_BYTES};
pub use crate::observer::{LogObserver, RecordingObserver, RoundObserver, Step};
pub use crate::sbox::sbox;
