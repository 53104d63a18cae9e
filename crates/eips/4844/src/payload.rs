use crate::{
    BYTES_PER_FIELD_ELEMENT, Blob, BlobDecodeError, LENGTH_PREFIX_BYTES, MAX_PAYLOAD_SIZE,
    SidecarError, USABLE_BYTES_PER_BLOB, USABLE_BYTES_PER_FIELD_ELEMENT,
};

/// Packs an arbitrary payload into blobs.
///
/// The payload is prefixed with its length as a big-endian `u64` and split
/// into 31-byte chunks, each stored in the low bytes of a field element. The
/// last blob is zero-padded. An empty payload still produces one blob.
pub fn encode_payload(data: &[u8]) -> Result<Vec<Blob>, SidecarError> {
    if data.len() > MAX_PAYLOAD_SIZE {
        return Err(SidecarError::PayloadTooLarge {
            size: data.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let length_prefix = (data.len() as u64).to_be_bytes();
    let total = LENGTH_PREFIX_BYTES + data.len();
    let blob_count = total.div_ceil(USABLE_BYTES_PER_BLOB);

    let mut input = length_prefix.iter().chain(data).copied();
    let mut blobs = Vec::with_capacity(blob_count);
    for _ in 0..blob_count {
        let mut bytes = Blob::zeroed();
        for element in bytes.chunks_exact_mut(BYTES_PER_FIELD_ELEMENT) {
            for (slot, byte) in element[1..].iter_mut().zip(input.by_ref()) {
                *slot = byte;
            }
        }

        blobs.push(Blob::new(bytes)?);
    }

    Ok(blobs)
}

/// Reverses [`encode_payload`]: concatenates the usable bytes of every blob,
/// reads the length prefix, and drops the padding.
pub fn decode_payload(blobs: &[Blob]) -> Result<Vec<u8>, BlobDecodeError> {
    if blobs.is_empty() {
        return Err(BlobDecodeError::NoBlobs);
    }

    let mut usable = Vec::with_capacity(blobs.len() * USABLE_BYTES_PER_BLOB);
    for blob in blobs {
        for element in blob.field_elements() {
            usable.extend_from_slice(&element[1..]);
        }
    }

    let (prefix, payload) = usable.split_at(LENGTH_PREFIX_BYTES);
    let mut length = [0u8; LENGTH_PREFIX_BYTES];
    length.copy_from_slice(prefix);
    let declared = u64::from_be_bytes(length);

    match usize::try_from(declared) {
        Ok(length) if length <= payload.len() => Ok(payload[..length].to_vec()),
        _ => Err(BlobDecodeError::LengthOutOfRange {
            declared,
            available: payload.len(),
        }),
    }
}

// Compile-time guard: the length prefix fits in the first field element.
const _: () = assert!(LENGTH_PREFIX_BYTES <= USABLE_BYTES_PER_FIELD_ELEMENT);
