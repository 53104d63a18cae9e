//! EIP-4844 blob data: blobs, KZG commitments and proofs, the blob payload
//! codec, and the sidecar that accompanies a blob transaction on the network.
//!
//! KZG math is delegated to a [`KzgCapability`]. With the `c-kzg` feature
//! (on by default) [`CKzg`] provides it using the Ethereum trusted setup.

mod blob;
mod error;
mod kzg;
mod payload;
mod sidecar;

pub use self::{
    blob::Blob,
    error::{BlobDecodeError, BlobError, KzgError, SidecarError},
    kzg::{KzgCapability, KzgCommitment, KzgProof},
    payload::{decode_payload, encode_payload},
    sidecar::BlobSidecar,
};
#[cfg(feature = "c-kzg")]
pub use self::kzg::CKzg;

/// Number of bytes in a field element.
pub const BYTES_PER_FIELD_ELEMENT: usize = 32;

/// Number of field elements in a blob.
pub const FIELD_ELEMENTS_PER_BLOB: usize = 4096;

/// Number of bytes in a blob.
pub const BYTES_PER_BLOB: usize = BYTES_PER_FIELD_ELEMENT * FIELD_ELEMENTS_PER_BLOB;

/// Number of payload bytes carried by each field element. The high byte stays
/// zero so the element is below the BLS12-381 scalar modulus.
pub const USABLE_BYTES_PER_FIELD_ELEMENT: usize = BYTES_PER_FIELD_ELEMENT - 1;

/// Number of payload bytes carried by each blob.
pub const USABLE_BYTES_PER_BLOB: usize = USABLE_BYTES_PER_FIELD_ELEMENT * FIELD_ELEMENTS_PER_BLOB;

/// Maximum number of blobs in a single transaction.
pub const MAX_BLOBS_PER_TRANSACTION: usize = 6;

/// Size of the big-endian length prefix written before the payload.
pub const LENGTH_PREFIX_BYTES: usize = 8;

/// Largest payload that fits in a single transaction's blobs.
pub const MAX_PAYLOAD_SIZE: usize =
    MAX_BLOBS_PER_TRANSACTION * USABLE_BYTES_PER_BLOB - LENGTH_PREFIX_BYTES;

/// Number of bytes in a KZG commitment.
pub const BYTES_PER_COMMITMENT: usize = 48;

/// Number of bytes in a KZG proof.
pub const BYTES_PER_PROOF: usize = 48;

/// Version byte of versioned hashes derived from KZG commitments.
pub const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;
