//! trykey-rsa: deterministic RSA key pairs from trykey seeds
//!
//! ```text
//! seed (key_bits / 8 bytes)
//!   └── HKDF-SHA256 (info = "trykey-rsa-drbg-v1") → 32-byte DRBG key
//!       └── ChaCha20Rng → RsaPrivateKey::new(rng, key_bits)
//! ```
//!
//! The same seed always reproduces the same key pair, so the private key never
//! needs to be stored: it is regenerated from the passphrase on demand.

use anyhow::Context;
use hkdf::Hkdf;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::RsaPrivateKey;
use sha2::{Digest, Sha256};
use trykey_seed::KeyDeriver;
use zeroize::Zeroizing;

/// Domain separation for the DRBG key
const DRBG_INFO: &[u8] = b"trykey-rsa-drbg-v1";

/// Size of a ChaCha20 DRBG seed in bytes
const DRBG_SEED_SIZE: usize = 32;

/// Synthesizes RSA private keys from seed bytes with a seeded ChaCha20 DRBG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaKeyDeriver;

impl KeyDeriver for RsaKeyDeriver {
    type Key = RsaPrivateKey;
    type Error = anyhow::Error;

    fn derive_private_key(&self, key_size_bits: u32, seed: &[u8]) -> anyhow::Result<RsaPrivateKey> {
        let mut rng = seeded_rng(seed)?;
        tracing::debug!(bits = key_size_bits, "generating RSA key from seeded DRBG");
        RsaPrivateKey::new(&mut rng, key_size_bits as usize)
            .map_err(|e| anyhow::anyhow!("RSA key generation failed: {e}"))
    }
}

/// Condense `seed` into a ChaCha20 DRBG via HKDF-SHA256.
fn seeded_rng(seed: &[u8]) -> anyhow::Result<ChaCha20Rng> {
    if seed.is_empty() {
        anyhow::bail!("cannot seed the DRBG from an empty seed");
    }

    let hkdf = Hkdf::<Sha256>::new(None, seed);
    let mut drbg_seed = Zeroizing::new([0u8; DRBG_SEED_SIZE]);
    hkdf.expand(DRBG_INFO, &mut drbg_seed[..])
        .map_err(|e| anyhow::anyhow!("HKDF expand failed: {e}"))?;

    Ok(ChaCha20Rng::from_seed(*drbg_seed))
}

/// PKCS#8 PEM encoding of the private key. Zeroized on drop.
pub fn private_key_pem(key: &RsaPrivateKey) -> anyhow::Result<Zeroizing<String>> {
    key.to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| anyhow::anyhow!("encoding private key: {e}"))
}

/// SPKI PEM encoding of the public key.
pub fn public_key_pem(key: &RsaPrivateKey) -> anyhow::Result<String> {
    key.to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| anyhow::anyhow!("encoding public key: {e}"))
}

/// SHA-256 fingerprint of the SPKI DER public key, as `SHA256:<hex>`.
pub fn fingerprint(key: &RsaPrivateKey) -> anyhow::Result<String> {
    let der = key
        .to_public_key()
        .to_public_key_der()
        .map_err(|e| anyhow::anyhow!("encoding public key: {e}"))
        .context("computing fingerprint")?;
    let digest = Sha256::digest(der.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("SHA256:{hex}"))
}
