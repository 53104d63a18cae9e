use alloy_rlp::{BufMut, Encodable};

use crate::RlpItem;

/// Encodes a single value.
pub fn encode<T: Encodable + ?Sized>(value: &T) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.length());
    value.encode(&mut out);
    out
}

/// Encodes a byte string.
pub fn encode_string(bytes: &[u8]) -> Vec<u8> {
    encode(bytes)
}

/// Encodes a list of items.
pub fn encode_list(items: &[RlpItem]) -> Vec<u8> {
    let mut out = Vec::with_capacity(alloy_rlp::list_length::<_, RlpItem>(items));
    alloy_rlp::encode_list::<_, RlpItem>(items, &mut out);
    out
}

/// Appends the encoding of a list of heterogeneous values to `out`.
pub fn encode_list_into<T: Encodable + ?Sized>(items: &[&T], out: &mut dyn BufMut) {
    alloy_rlp::encode_list::<_, T>(items, out);
}
