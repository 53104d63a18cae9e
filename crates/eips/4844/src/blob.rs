use std::fmt;

use quill_primitives::hex;
use quill_rlp::{BufMut, Encodable};

use crate::{BYTES_PER_BLOB, BYTES_PER_FIELD_ELEMENT, BlobError};

/// A blob of 4096 field elements.
///
/// Every field element's high byte is zero. The data lives on the heap.
#[derive(Clone, PartialEq, Eq)]
pub struct Blob(Box<[u8; BYTES_PER_BLOB]>);

impl Blob {
    /// Constructs a blob, validating each field element.
    pub fn new(bytes: Box<[u8; BYTES_PER_BLOB]>) -> Result<Self, BlobError> {
        if let Some(index) = bytes
            .chunks_exact(BYTES_PER_FIELD_ELEMENT)
            .position(|element| element[0] != 0)
        {
            return Err(BlobError::FieldElementOutOfRange { index });
        }

        Ok(Self(bytes))
    }

    /// Constructs a blob from a slice of exactly [`BYTES_PER_BLOB`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, BlobError> {
        let bytes: Box<[u8; BYTES_PER_BLOB]> = bytes
            .to_vec()
            .into_boxed_slice()
            .try_into()
            .map_err(|bytes: Box<[u8]>| BlobError::InvalidLength {
                expected: BYTES_PER_BLOB,
                actual: bytes.len(),
            })?;

        Self::new(bytes)
    }

    /// Constructs an all-zero blob.
    pub(crate) fn zeroed() -> Box<[u8; BYTES_PER_BLOB]> {
        vec![0u8; BYTES_PER_BLOB]
            .into_boxed_slice()
            .try_into()
            .expect("vector has the length of a blob")
    }

    /// Returns the blob's bytes.
    pub fn as_bytes(&self) -> &[u8; BYTES_PER_BLOB] {
        &self.0
    }

    /// Iterates over the blob's field elements.
    pub fn field_elements(&self) -> impl Iterator<Item = &[u8]> {
        self.0.chunks_exact(BYTES_PER_FIELD_ELEMENT)
    }
}

impl AsRef<[u8]> for Blob {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blob(0x{}..)", hex::encode(&self.0[..BYTES_PER_FIELD_ELEMENT]))
    }
}

impl Encodable for Blob {
    fn encode(&self, out: &mut dyn BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}
