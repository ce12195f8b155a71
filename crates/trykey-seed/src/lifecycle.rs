//! Seed lifetime: key size policy, the zeroizing seed buffer, and scoped access
//!
//! [`with_seed`] is the only way callers reach seed bytes. The buffer is
//! allocated after every check has passed, lent out by shared reference, and
//! zeroized in `Drop`, so erasure also happens when the closure panics.

use std::fmt;
use std::num::NonZeroUsize;

use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroize;

use crate::error::{SeedError, SeedResult};
use crate::expand::expand;
use crate::trytes::{LengthCheck, Trytes};
use crate::IOTA_SEED_LEN;

/// Key sizes (in bits) a seed can currently be derived for
pub const SUPPORTED_KEY_BITS: &[u32] = &[2048];

/// A supported target key size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySize {
    bits: u32,
    seed_len: NonZeroUsize,
}

impl KeySize {
    pub fn new(bits: u32) -> SeedResult<Self> {
        let unsupported = SeedError::UnsupportedKeySize { bits };
        if !SUPPORTED_KEY_BITS.contains(&bits) {
            return Err(unsupported);
        }
        let seed_len = NonZeroUsize::new(bits as usize / 8).ok_or(unsupported)?;
        Ok(Self { bits, seed_len })
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Seed length in bytes (`bits / 8`)
    pub fn seed_len(&self) -> NonZeroUsize {
        self.seed_len
    }
}

/// Derivation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedParams {
    /// Target key size in bits (default: 2048)
    pub key_bits: u32,
    /// Passphrase length policy (default: exactly 81 trytes)
    pub length: LengthCheck,
}

impl Default for SeedParams {
    fn default() -> Self {
        Self {
            key_bits: 2048,
            length: LengthCheck::Exact(IOTA_SEED_LEN),
        }
    }
}

/// Expanded seed bytes. Zeroized on drop, never cloned.
pub struct SeedBuffer {
    bytes: Box<[u8]>,
}

impl SeedBuffer {
    pub(crate) fn allocate(len: usize) -> Self {
        #[cfg(test)]
        probe::record_allocation();
        Self {
            bytes: vec![0u8; len].into_boxed_slice(),
        }
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Drop for SeedBuffer {
    fn drop(&mut self) {
        self.bytes.zeroize();
        #[cfg(test)]
        probe::record_erased(&self.bytes);
    }
}

impl fmt::Debug for SeedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedBuffer")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Deterministic private-key synthesis from seed bytes.
///
/// Implementations must return identical keys for identical seeds and must
/// not keep the seed after returning.
pub trait KeyDeriver {
    type Key;
    type Error: fmt::Display;

    fn derive_private_key(&self, key_size_bits: u32, seed: &[u8]) -> Result<Self::Key, Self::Error>;
}

/// Validate and expand `passphrase`, then run `f` with the seed.
///
/// The key size is checked first, so an unsupported size allocates nothing.
/// The seed is zeroized and freed before this returns, whether `f` returns
/// normally or unwinds.
pub fn with_seed<T, F>(passphrase: &SecretString, params: &SeedParams, f: F) -> SeedResult<T>
where
    F: FnOnce(&SeedBuffer) -> T,
{
    let key_size = KeySize::new(params.key_bits)?;
    let trytes = Trytes::parse(passphrase.expose_secret(), params.length).inspect_err(|e| {
        tracing::debug!(error = %e, "passphrase rejected");
    })?;

    let seed = expand(trytes, key_size.seed_len());
    tracing::debug!(bits = key_size.bits(), seed_len = seed.len(), "seed expanded");

    let result = f(&seed);
    drop(seed);
    Ok(result)
}

/// Derive a private key from `passphrase` with `deriver`, called exactly once.
///
/// Deriver errors surface as [`SeedError::CollaboratorFailure`] and are not retried.
pub fn derive_key<D: KeyDeriver>(
    deriver: &D,
    passphrase: &SecretString,
    params: &SeedParams,
) -> SeedResult<D::Key> {
    with_seed(passphrase, params, |seed| {
        deriver.derive_private_key(params.key_bits, seed.as_bytes())
    })?
    .map_err(|e| {
        tracing::warn!(error = %e, bits = params.key_bits, "key derivation failed");
        SeedError::CollaboratorFailure(e.to_string())
    })
}
