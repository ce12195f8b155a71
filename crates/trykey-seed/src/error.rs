use thiserror::Error;

use crate::trytes::LengthCheck;

pub type SeedResult<T> = Result<T, SeedError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeedError {
    /// A symbol outside `{9, A-Z}`. Only the position is reported.
    #[error("passphrase is not valid trytes: invalid symbol at index {index}")]
    InvalidAlphabet { index: usize },

    #[error("passphrase has {actual} trytes, expected {expected}")]
    InvalidLength { expected: LengthCheck, actual: usize },

    #[error("unsupported key size: {bits} bits (supported: 2048)")]
    UnsupportedKeySize { bits: u32 },

    #[error("key derivation failed: {0}")]
    CollaboratorFailure(String),
}
