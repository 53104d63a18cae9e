//! Classification and decoding of EVM revert payloads.
//!
//! Revert data is one of `Error(string)`, `Panic(uint256)`, a custom error
//! registered in a [`CustomErrorRegistry`], or opaque bytes. Decoding is
//! best-effort: malformed payloads yield [`RevertKind::Unknown`] instead of
//! an error.

mod decoder;
mod error;
mod panic;
mod registry;

pub use self::{
    decoder::{RevertDecoder, decode_revert},
    error::{DecodedCustomError, RevertError, RevertKind},
    panic::panic_reason,
    registry::CustomErrorRegistry,
};

/// Selector of `Error(string)`
pub const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Selector of `Panic(uint256)`
pub const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];
