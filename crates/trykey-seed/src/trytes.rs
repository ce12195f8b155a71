//! Tryte alphabet validation
//!
//! A passphrase is accepted only if every symbol is one of the 27 trytes
//! `{9, A-Z}`. Validation always runs before expansion: a typo such as a
//! lowercase letter would otherwise expand into a different, equally
//! plausible seed and silently produce the wrong key.

use std::fmt;

use crate::error::{SeedError, SeedResult};

/// How strictly to check the passphrase length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthCheck {
    /// Any non-empty length (variable-length seed sources)
    Any,
    /// Exactly this many trytes
    Exact(usize),
}

impl fmt::Display for LengthCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthCheck::Any => f.write_str("at least 1"),
            LengthCheck::Exact(n) => write!(f, "exactly {n}"),
        }
    }
}

/// Whether `byte` is a tryte symbol (`9` or an uppercase ASCII letter).
pub fn is_tryte(byte: u8) -> bool {
    byte == b'9' || byte.is_ascii_uppercase()
}

/// Check that `passphrase` is well-formed trytes.
///
/// The alphabet is checked before the length, so a mistyped symbol is
/// reported by position even when the length is also wrong.
pub fn validate(passphrase: &str, check: LengthCheck) -> SeedResult<()> {
    let bytes = passphrase.as_bytes();
    if bytes.is_empty() {
        return Err(SeedError::InvalidLength {
            expected: check,
            actual: 0,
        });
    }

    // Every byte before the first invalid one is ASCII, so the byte index
    // is also the character index.
    if let Some(index) = bytes.iter().position(|&b| !is_tryte(b)) {
        return Err(SeedError::InvalidAlphabet { index });
    }

    if let LengthCheck::Exact(expected) = check {
        if bytes.len() != expected {
            return Err(SeedError::InvalidLength {
                expected: check,
                actual: bytes.len(),
            });
        }
    }

    Ok(())
}

/// A borrowed passphrase that has passed [`validate`].
///
/// The expander only accepts this type, so unvalidated input cannot reach it.
#[derive(Clone, Copy)]
pub struct Trytes<'a> {
    bytes: &'a [u8],
}

impl<'a> Trytes<'a> {
    pub fn parse(passphrase: &'a str, check: LengthCheck) -> SeedResult<Self> {
        validate(passphrase, check)?;
        Ok(Self {
            bytes: passphrase.as_bytes(),
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: validation rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl fmt::Debug for Trytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trytes")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
