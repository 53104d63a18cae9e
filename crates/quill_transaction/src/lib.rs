//! Ethereum transaction types
//!
//! Transactions move through four stages: a builder accumulates fields,
//! `build()` validates them into an immutable [`request`], the request is
//! bound to a chain as an [`UnsignedTransaction`], and signing produces a
//! [`SignedTransaction`] whose envelope can be broadcast.

mod access_list;
mod error;
/// Transaction requests and their builders.
pub mod request;
mod signed;
mod unsigned;
mod utils;

pub use self::{
    access_list::{AccessList, AccessListItem},
    error::{BuildError, DecodeError, Field},
    request::TransactionRequest,
    signed::SignedTransaction,
    unsigned::UnsignedTransaction,
};

/// The type of a transaction envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TransactionType {
    /// Legacy transaction, with or without EIP-155 replay protection
    Legacy = request::Legacy::TYPE,
    /// EIP-1559 dynamic fee transaction
    Eip1559 = request::Eip1559::TYPE,
    /// EIP-4844 blob transaction
    Eip4844 = request::Eip4844::TYPE,
}

impl From<TransactionType> for u8 {
    fn from(value: TransactionType) -> Self {
        value as u8
    }
}

/// How a legacy transaction's signature is tied to a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChainBinding {
    /// Replay-protected per EIP-155: the chain id is part of the preimage and
    /// of `v`.
    Eip155(u64),
    /// Unprotected: the signature is valid on every chain and `v` is 27 or 28.
    PreEip155,
}

impl ChainBinding {
    /// The bound chain id, if any.
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            ChainBinding::Eip155(chain_id) => Some(*chain_id),
            ChainBinding::PreEip155 => None,
        }
    }
}
