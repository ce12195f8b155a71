//! trykey-seed: deterministic key-derivation seeds from IOTA tryte passphrases
//!
//! Pipeline: passphrase → validate trytes → cyclic expansion → seed buffer → key deriver
//!
//! ```text
//! IOTA seed (81 trytes, {9, A-Z})
//!   └── SeedBuffer (key_bits / 8 bytes, seed[i] = trytes[i mod 81])
//!       └── KeyDeriver::derive_private_key(key_bits, seed)   (borrowed, then zeroized)
//! ```
//!
//! The seed buffer never leaves [`with_seed`]: it is allocated, filled, lent to
//! the caller's closure and zeroized on every exit path, unwinding included.

pub mod error;
pub mod expand;
pub mod generate;
pub mod lifecycle;
pub mod trytes;

pub use error::{SeedError, SeedResult};
pub use expand::expand;
pub use generate::generate_passphrase;
pub use lifecycle::{derive_key, with_seed, KeyDeriver, KeySize, SeedBuffer, SeedParams};
pub use trytes::{is_tryte, validate, LengthCheck, Trytes};

/// Canonical length of an IOTA seed in trytes
pub const IOTA_SEED_LEN: usize = 81;

/// The 27-symbol tryte alphabet, in tryte-value order
pub const TRYTE_ALPHABET: &[u8; 27] = b"9ABCDEFGHIJKLMNOPQRSTUVWXYZ";
