//! Recursive Length Prefix encoding and decoding.
//!
//! Encoding goes through [`alloy_rlp::Encodable`]; decoding goes through the
//! [`Decoder`] cursor, which is strict: non-minimal lengths, leading zeros in
//! integers, and truncated input are all rejected.

mod decode;
mod encode;
mod error;
mod item;

pub use alloy_rlp::{BufMut, Decodable, EMPTY_LIST_CODE, EMPTY_STRING_CODE, Encodable, Header};

pub use self::{
    decode::{Decoder, decode},
    encode::{encode, encode_list, encode_list_into, encode_string},
    error::DecodeError,
    item::RlpItem,
};
