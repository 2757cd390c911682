//! Error type for slice-based constructors.

use thiserror::Error;

/// Errors raised when building cipher inputs from unsized byte slices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The slice does not have the fixed length the value requires.
    #[error("invalid {what} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Name of the value being built.
        what: &'static str,
        /// Required length in bytes.
        expected: usize,
        /// Length of the slice that was supplied.
        actual: usize,
    },
}

/// Result alias for this crate.
pub type Result<T> = core::result::Result<T, Error>;

pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::InvalidLength {
            what,
            expected,
            actual,
        })
    }
}
