//! Ethereum contract ABI encoding and decoding.
//!
//! Values are described by [`AbiValue`] and shapes by [`TypeSchema`].
//! [`encode`] and [`decode`] lay out a tuple of parameters through
//! `alloy-dyn-abi`, with strict validation of every decoded word;
//! [`Function`] and [`Event`] add selectors and topics on top.

mod decode;
mod encode;
mod error;
mod event;
mod function;
mod schema;
mod value;

pub use self::{
    decode::decode,
    encode::encode,
    error::{DecodeError, EncodeError, ParseError},
    event::{Event, EventParam},
    function::{Function, encode_function, selector},
    schema::TypeSchema,
    value::AbiValue,
};

/// Size of an ABI word.
pub const WORD_SIZE: usize = 32;
