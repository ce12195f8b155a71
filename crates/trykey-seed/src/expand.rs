//! Cyclic seed expansion: trytes → fixed-length seed buffer

use std::num::NonZeroUsize;

use crate::lifecycle::SeedBuffer;
use crate::trytes::Trytes;

/// Stretch (or truncate) validated trytes into a `target_len`-byte seed.
///
/// `seed[i] = trytes[i mod len(trytes)]`: the passphrase is repeated as many
/// times as needed and the last repetition is cut short. The seed is written
/// in place, never through an oversized temporary, and is fully initialized
/// before it is returned.
pub fn expand(trytes: Trytes<'_>, target_len: NonZeroUsize) -> SeedBuffer {
    let source = trytes.as_bytes();
    let mut seed = SeedBuffer::allocate(target_len.get());
    for (i, byte) in seed.as_mut_bytes().iter_mut().enumerate() {
        *byte = source[i % source.len()];
    }
    seed
}
