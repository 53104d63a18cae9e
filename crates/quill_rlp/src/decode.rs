use alloy_primitives::U256;
use alloy_rlp::{Decodable, EMPTY_STRING_CODE, Header};
use quill_primitives::{Address, Hash};

use crate::{DecodeError, RlpItem};

/// Decodes exactly one item from `bytes`, rejecting trailing data.
pub fn decode(bytes: &[u8]) -> Result<RlpItem, DecodeError> {
    let mut decoder = Decoder::new(bytes);
    let item = decoder.decode_item()?;
    decoder.finish()?;

    Ok(item)
}

/// A cursor over a sequence of RLP items.
///
/// Each `decode_*` call consumes one item. Use [`Decoder::decode_list`] to
/// descend into a list and [`Decoder::finish`] to assert that a list was
/// consumed completely.
#[derive(Clone, Debug)]
pub struct Decoder<'a> {
    buf: &'a [u8],
}

impl<'a> Decoder<'a> {
    /// Creates a cursor over `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Whether every item has been consumed.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The bytes that have not been consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        self.buf
    }

    /// Fails if any bytes remain.
    pub fn finish(self) -> Result<(), DecodeError> {
        if self.buf.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::TrailingBytes(self.buf.len()))
        }
    }

    /// Whether the next item is a list, without consuming it.
    pub fn peek_is_list(&self) -> bool {
        self.buf.first().is_some_and(|prefix| *prefix >= 0xc0)
    }

    /// Consumes the next item with its [`Decodable`] implementation.
    pub fn decode<T: Decodable>(&mut self) -> Result<T, DecodeError> {
        Ok(T::decode(&mut self.buf)?)
    }

    /// Consumes the next item and returns its complete encoding, header
    /// included.
    pub fn decode_raw(&mut self) -> Result<&'a [u8], DecodeError> {
        let start = self.buf;
        let header = Header::decode(&mut self.buf)?;
        self.buf = self
            .buf
            .get(header.payload_length..)
            .ok_or(DecodeError::InputTooShort)?;

        Ok(&start[..start.len() - self.buf.len()])
    }

    /// Consumes the next item as a byte string.
    pub fn decode_bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        Ok(Header::decode_bytes(&mut self.buf, false)?)
    }

    /// Consumes the next item as a list and returns a cursor over its
    /// elements.
    pub fn decode_list(&mut self) -> Result<Decoder<'a>, DecodeError> {
        Header::decode_bytes(&mut self.buf, true)
            .map(Decoder::new)
            .map_err(DecodeError::from)
    }

    /// Consumes the next item, recursively decoding nested lists.
    pub fn decode_item(&mut self) -> Result<RlpItem, DecodeError> {
        self.decode()
    }

    /// Consumes the next item as a minimal big-endian `u64`.
    pub fn decode_u64(&mut self) -> Result<u64, DecodeError> {
        self.decode()
    }

    /// Consumes the next item as a minimal big-endian `u128`.
    pub fn decode_u128(&mut self) -> Result<u128, DecodeError> {
        self.decode()
    }

    /// Consumes the next item as a minimal big-endian `U256`.
    pub fn decode_u256(&mut self) -> Result<U256, DecodeError> {
        self.decode()
    }

    /// Consumes the next item as a boolean.
    pub fn decode_bool(&mut self) -> Result<bool, DecodeError> {
        match self.decode::<u8>()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(DecodeError::InvalidBool),
        }
    }

    /// Consumes the next item as a byte string of exactly `N` bytes.
    pub fn decode_fixed<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let bytes = self.decode_bytes()?;
        <[u8; N]>::try_from(bytes).map_err(|_error| DecodeError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        })
    }

    /// Consumes the next item as an address.
    pub fn decode_address(&mut self) -> Result<Address, DecodeError> {
        self.decode_fixed::<20>().map(Address::new)
    }

    /// Consumes the next item as an address, where the empty string means
    /// no address.
    pub fn decode_optional_address(&mut self) -> Result<Option<Address>, DecodeError> {
        if let Some((&EMPTY_STRING_CODE, rest)) = self.buf.split_first() {
            self.buf = rest;
            return Ok(None);
        }

        self.decode_address().map(Some)
    }

    /// Consumes the next item as a 32-byte hash.
    pub fn decode_hash(&mut self) -> Result<Hash, DecodeError> {
        self.decode_fixed::<32>().map(Hash::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;

    #[test]
    fn rejects_leading_zero_integers() {
        let mut decoder = Decoder::new(&[0x82, 0x00, 0x01]);
        assert_eq!(decoder.decode_u64(), Err(DecodeError::LeadingZero));
    }

    #[test]
    fn rejects_wrapped_single_byte() {
        assert_eq!(decode(&[0x81, 0x05]), Err(DecodeError::NonCanonicalSingleByte));
    }

    #[test]
    fn rejects_long_form_for_short_payload() {
        let mut encoded = vec![0xb8, 0x37];
        encoded.extend_from_slice(&[0xaa; 0x37]);

        assert_eq!(decode(&encoded), Err(DecodeError::NonCanonicalSize));
    }

    #[test]
    fn rejects_leading_zero_in_length() {
        let mut encoded = vec![0xb9, 0x00, 0x40];
        encoded.extend_from_slice(&[0xaa; 0x40]);

        assert_eq!(decode(&encoded), Err(DecodeError::LeadingZero));
    }

    #[test]
    fn rejects_truncated_payload() {
        assert_eq!(decode(&[0x83, 0x01, 0x02]), Err(DecodeError::InputTooShort));
    }

    #[test]
    fn rejects_integer_overflow() {
        let encoded = encode(&u128::MAX);
        assert_eq!(
            Decoder::new(&encoded).decode_u64(),
            Err(DecodeError::Overflow)
        );
    }

    #[test]
    fn rejects_trailing_bytes() {
        assert_eq!(decode(&[0x80, 0x80]), Err(DecodeError::TrailingBytes(1)));
    }

    #[test]
    fn list_cursor() -> anyhow::Result<()> {
        let encoded = encode(&vec![1u64, 1024, 0]);
        let mut outer = Decoder::new(&encoded);
        let mut list = outer.decode_list()?;

        assert_eq!(list.decode_u64()?, 1);
        assert_eq!(list.decode_u64()?, 1024);
        assert_eq!(list.decode_u64()?, 0);
        list.finish()?;
        outer.finish()?;

        Ok(())
    }

    #[test]
    fn optional_address() -> anyhow::Result<()> {
        let address = Address::new([0xab; 20]);
        let mut encoded = Vec::new();
        crate::encode_list_into::<dyn crate::Encodable>(&[&[0u8; 0], &address], &mut encoded);

        let mut list = Decoder::new(&encoded).decode_list()?;
        assert_eq!(list.decode_optional_address()?, None);
        assert_eq!(list.decode_optional_address()?, Some(address));

        Ok(())
    }

    #[test]
    fn booleans() -> anyhow::Result<()> {
        let mut decoder = Decoder::new(&[0x80, 0x01, 0x02]);

        assert!(!decoder.decode_bool()?);
        assert!(decoder.decode_bool()?);
        assert_eq!(decoder.decode_bool(), Err(DecodeError::InvalidBool));

        Ok(())
    }

    #[test]
    fn kind_mismatch() {
        assert_eq!(
            Decoder::new(&[0xc0]).decode_bytes(),
            Err(DecodeError::UnexpectedList)
        );
        assert_eq!(
            Decoder::new(&[0x80]).decode_list().map(|_| ()),
            Err(DecodeError::UnexpectedString)
        );
    }

    #[test]
    fn raw_item_includes_header() -> anyhow::Result<()> {
        let encoded = [0x83, b'c', b'a', b't', 0x01];
        let mut decoder = Decoder::new(&encoded);

        assert_eq!(decoder.decode_raw()?, &encoded[..4]);
        assert_eq!(decoder.remaining(), &[0x01]);

        Ok(())
    }

    #[test]
    fn wrapped_primitives() -> anyhow::Result<()> {
        let hash = Hash::new([0x22; 32]);
        let encoded = encode(&hash);

        assert_eq!(Decoder::new(&encoded).decode::<Hash>()?, hash);
        assert_eq!(Decoder::new(&encoded).decode_hash()?, hash);

        Ok(())
    }
}
