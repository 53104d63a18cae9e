use sha2::Sha256;
use sha3::{Digest, Keccak256};

use crate::Hash;

/// Computes the Keccak-256 hash of the input.
pub fn keccak256(bytes: impl AsRef<[u8]>) -> Hash {
    Hash::new(Keccak256::digest(bytes.as_ref()).into())
}

/// Computes the Keccak-256 hash of the concatenation of `chunks`, without
/// materializing the concatenated buffer.
pub fn keccak256_concat<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> Hash {
    let mut hasher = Keccak256::new();
    for chunk in chunks {
        hasher.update(chunk);
    }

    Hash::new(hasher.finalize().into())
}

/// Computes the SHA-256 hash of the input.
pub fn sha256(bytes: impl AsRef<[u8]>) -> [u8; 32] {
    Sha256::digest(bytes.as_ref()).into()
}
