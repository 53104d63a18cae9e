//! Value types shared by every layer of the SDK: hex handling, addresses,
//! hashes, native currency amounts, and byte payloads.

mod address;
mod digest;
mod error;
mod hash;
/// Hex encoding and decoding, with and without the `0x` prefix.
pub mod hex;
mod hex_data;
/// Serde helpers for JSON-RPC hex quantities.
pub mod quantity;
mod wei;

pub use alloy_primitives::{I256, U256};

pub use self::{
    address::Address,
    digest::{keccak256, keccak256_concat, sha256},
    error::ValidationError,
    hash::Hash,
    hex_data::HexData,
    wei::Wei,
};
