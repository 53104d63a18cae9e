use std::fmt;

use quill_eip4844::{BlobError, SidecarError};
use quill_signer::SignatureError;

/// A transaction field, as named in builder errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Nonce,
    GasPrice,
    GasLimit,
    MaxFeePerGas,
    MaxPriorityFeePerGas,
    MaxFeePerBlobGas,
    To,
    Data,
    Blobs,
    Kzg,
}

impl Field {
    /// The field's name in `snake_case`.
    pub const fn name(self) -> &'static str {
        match self {
            Field::Nonce => "nonce",
            Field::GasPrice => "gas_price",
            Field::GasLimit => "gas_limit",
            Field::MaxFeePerGas => "max_fee_per_gas",
            Field::MaxPriorityFeePerGas => "max_priority_fee_per_gas",
            Field::MaxFeePerBlobGas => "max_fee_per_blob_gas",
            Field::To => "to",
            Field::Data => "data",
            Field::Blobs => "blobs",
            Field::Kzg => "kzg",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A transaction request failed validation while being built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A required field was never set.
    #[error("missing required field `{0}`")]
    MissingField(Field),
    /// Contract creation (no recipient) without any init code.
    #[error("contract creation requires non-empty data")]
    EmptyContractCreation,
    /// The priority fee is larger than the fee cap.
    #[error("max priority fee per gas ({max_priority_fee_per_gas}) exceeds max fee per gas ({max_fee_per_gas})")]
    PriorityFeeAboveMaxFee {
        /// The requested tip
        max_priority_fee_per_gas: u128,
        /// The fee cap
        max_fee_per_gas: u128,
    },
    /// Both a pre-built sidecar and raw blob data were provided.
    #[error("a blob sidecar and raw blob data are mutually exclusive")]
    ConflictingBlobSources,
    /// The blob sidecar could not be built or is invalid.
    #[error(transparent)]
    Sidecar(#[from] SidecarError),
}

impl BuildError {
    /// The field the error is about, if it concerns a single field.
    pub fn field(&self) -> Option<Field> {
        match self {
            BuildError::MissingField(field) => Some(*field),
            BuildError::EmptyContractCreation => Some(Field::Data),
            BuildError::PriorityFeeAboveMaxFee { .. } => Some(Field::MaxPriorityFeePerGas),
            BuildError::ConflictingBlobSources | BuildError::Sidecar(_) => Some(Field::Blobs),
        }
    }
}

/// A signed transaction envelope could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The input was empty.
    #[error("empty transaction envelope")]
    Empty,
    /// The first byte is neither an RLP list nor a supported type.
    #[error("unsupported transaction type: {0:#04x}")]
    UnsupportedType(u8),
    /// Malformed RLP.
    #[error(transparent)]
    Rlp(#[from] quill_rlp::DecodeError),
    /// The decoded fields violate a request invariant.
    #[error(transparent)]
    Invalid(#[from] BuildError),
    /// The signature is malformed or does not recover a signer.
    #[error(transparent)]
    Signature(#[from] SignatureError),
    /// A typed transaction's y-parity is neither 0 nor 1.
    #[error("invalid y-parity: {0}")]
    InvalidYParity(u64),
    /// A blob in the network form is malformed.
    #[error(transparent)]
    Blob(#[from] BlobError),
    /// The sidecar in the network form is inconsistent.
    #[error(transparent)]
    Sidecar(#[from] SidecarError),
    /// The input is not valid hex.
    #[error(transparent)]
    Hex(#[from] quill_primitives::ValidationError),
}
