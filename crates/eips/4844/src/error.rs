use quill_primitives::Hash;

/// An error constructing a [`crate::Blob`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BlobError {
    /// The input is not exactly one blob long.
    #[error("Expected {expected} bytes for a blob, got {actual}")]
    InvalidLength {
        /// Required length
        expected: usize,
        /// Provided length
        actual: usize,
    },
    /// A field element's high byte is non-zero.
    #[error("Field element {index} exceeds the BLS modulus: its first byte must be zero")]
    FieldElementOutOfRange {
        /// Index of the field element within the blob
        index: usize,
    },
}

/// An error decoding a payload from blobs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BlobDecodeError {
    /// No blobs were provided.
    #[error("Cannot decode a payload from zero blobs")]
    NoBlobs,
    /// The length prefix exceeds the data carried by the blobs.
    #[error("Length prefix {declared} exceeds the {available} bytes carried by the blobs")]
    LengthOutOfRange {
        /// Length declared by the prefix
        declared: u64,
        /// Payload bytes available after the prefix
        available: usize,
    },
}

/// An error reported by a KZG backend.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum KzgError {
    /// The backend rejected its input or failed internally.
    #[error("KZG backend error: {0}")]
    Backend(String),
}

/// An error building or validating a [`crate::BlobSidecar`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SidecarError {
    /// A sidecar needs at least one blob.
    #[error("A blob sidecar requires at least one blob")]
    Empty,
    /// More blobs than a transaction may carry.
    #[error("A blob sidecar holds at most {max} blobs, got {count}")]
    TooManyBlobs {
        /// Number of blobs provided
        count: usize,
        /// Maximum number of blobs
        max: usize,
    },
    /// The blob, commitment, and proof lists differ in length.
    #[error(
        "Blob sidecar lists must have equal lengths: {blobs} blobs, {commitments} commitments, {proofs} proofs"
    )]
    LengthMismatch {
        /// Number of blobs
        blobs: usize,
        /// Number of commitments
        commitments: usize,
        /// Number of proofs
        proofs: usize,
    },
    /// The payload does not fit in a transaction's blobs.
    #[error("Payload of {size} bytes exceeds the maximum of {max} bytes")]
    PayloadTooLarge {
        /// Payload size
        size: usize,
        /// Maximum payload size
        max: usize,
    },
    /// A blob failed validation.
    #[error(transparent)]
    Blob(#[from] BlobError),
    /// The KZG backend failed.
    #[error(transparent)]
    Kzg(#[from] KzgError),
    /// A (blob, commitment, proof) triple does not verify.
    #[error("The KZG proof of blob {index} does not verify")]
    InvalidProof {
        /// Index of the failing triple
        index: usize,
    },
    /// The batch check failed although every single proof verified.
    #[error("Batch KZG verification failed although every proof verifies on its own")]
    BatchVerificationFailed,
    /// The number of versioned hashes does not match the number of blobs.
    #[error("Expected {expected} versioned hashes, got {actual}")]
    VersionedHashCount {
        /// Number of blobs in the sidecar
        expected: usize,
        /// Number of versioned hashes provided
        actual: usize,
    },
    /// A commitment's versioned hash does not match the provided one.
    #[error("Versioned hash {index} mismatch. Expected: {expected}, actual: {actual}")]
    VersionedHashMismatch {
        /// Index of the mismatching hash
        index: usize,
        /// Hash provided by the transaction
        expected: Hash,
        /// Hash derived from the sidecar's commitment
        actual: Hash,
    },
}
