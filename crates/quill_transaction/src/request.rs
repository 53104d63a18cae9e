mod eip1559;
mod eip4844;
mod legacy;

use quill_primitives::{Address, HexData};

pub use self::{
    eip1559::{Eip1559, Eip1559Builder},
    eip4844::{Eip4844, Eip4844Builder},
    legacy::{Legacy, LegacyBuilder},
};
use crate::{BuildError, ChainBinding, TransactionType, UnsignedTransaction};

/// A validated, immutable transaction request of any supported type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionRequest {
    Legacy(Legacy),
    Eip1559(Eip1559),
    Eip4844(Eip4844),
}

impl TransactionRequest {
    /// Returns the transaction type.
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionRequest::Legacy(_) => TransactionType::Legacy,
            TransactionRequest::Eip1559(_) => TransactionType::Eip1559,
            TransactionRequest::Eip4844(_) => TransactionType::Eip4844,
        }
    }

    /// Returns the nonce.
    pub fn nonce(&self) -> u64 {
        match self {
            TransactionRequest::Legacy(request) => request.nonce(),
            TransactionRequest::Eip1559(request) => request.nonce(),
            TransactionRequest::Eip4844(request) => request.nonce(),
        }
    }

    /// Binds the request to `chain_id`. Legacy requests use EIP-155.
    pub fn bind(self, chain_id: u64) -> UnsignedTransaction {
        match self {
            TransactionRequest::Legacy(request) => request.bind(ChainBinding::Eip155(chain_id)),
            TransactionRequest::Eip1559(request) => request.bind(chain_id),
            TransactionRequest::Eip4844(request) => request.bind(chain_id),
        }
    }
}

impl From<Legacy> for TransactionRequest {
    fn from(request: Legacy) -> Self {
        Self::Legacy(request)
    }
}

impl From<Eip1559> for TransactionRequest {
    fn from(request: Eip1559) -> Self {
        Self::Eip1559(request)
    }
}

impl From<Eip4844> for TransactionRequest {
    fn from(request: Eip4844) -> Self {
        Self::Eip4844(request)
    }
}

/// Contract creation needs init code.
fn validate_recipient(to: Option<&Address>, data: &HexData) -> Result<(), BuildError> {
    if to.is_none() && data.is_empty() {
        Err(BuildError::EmptyContractCreation)
    } else {
        Ok(())
    }
}

fn validate_fees(max_priority_fee_per_gas: u128, max_fee_per_gas: u128) -> Result<(), BuildError> {
    if max_priority_fee_per_gas > max_fee_per_gas {
        Err(BuildError::PriorityFeeAboveMaxFee {
            max_priority_fee_per_gas,
            max_fee_per_gas,
        })
    } else {
        Ok(())
    }
}
