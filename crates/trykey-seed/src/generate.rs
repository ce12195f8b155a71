//! Random IOTA seed generation
//!
//! For users who do not have a seed yet. The generated passphrase is the only
//! copy of the key material: it should be written down, never stored digitally.

use rand::Rng;
use secrecy::SecretString;

use crate::{IOTA_SEED_LEN, TRYTE_ALPHABET};

/// Generate a new random 81-tryte passphrase.
pub fn generate_passphrase() -> SecretString {
    let mut rng = rand::thread_rng();
    let seed: String = (0..IOTA_SEED_LEN)
        .map(|_| TRYTE_ALPHABET[rng.gen_range(0..TRYTE_ALPHABET.len())] as char)
        .collect();
    SecretString::from(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trytes::{validate, LengthCheck};
    use secrecy::ExposeSecret;

    #[test]
    fn test_generated_passphrase_is_valid() {
        let passphrase = generate_passphrase();
        validate(passphrase.expose_secret(), LengthCheck::Exact(IOTA_SEED_LEN)).unwrap();
    }

    #[test]
    fn test_generated_passphrases_differ() {
        let a = generate_passphrase();
        let b = generate_passphrase();
        assert_ne!(
            a.expose_secret(),
            b.expose_secret(),
            "random seeds must differ"
        );
    }
}
