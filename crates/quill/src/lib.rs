//! Client SDK for Ethereum-compatible chains.
//!
//! Re-exports the component crates and adds what spans them: a single
//! [`Error`] taxonomy and the [`submit`] flow that signs a transaction
//! request and broadcasts it.

mod error;
mod profile;
pub mod submit;

pub use quill_abi as abi;
pub use quill_decoder_revert as revert;
pub use quill_eip4844 as eip4844;
pub use quill_primitives as primitives;
pub use quill_primitives::{Address, Hash, HexData, U256, Wei, keccak256};
pub use quill_rlp as rlp;
pub use quill_rpc_client as rpc;
pub use quill_signer as signer;
pub use quill_transaction as transaction;

pub use self::{
    error::{CryptoError, DecodingError, Error, ErrorKind, ValidationError},
    profile::{ChainProfile, TRANSFER_GAS_LIMIT},
};
