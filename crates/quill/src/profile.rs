use quill_transaction::request::{
    Eip1559, Eip1559Builder, Eip4844, Eip4844Builder, Legacy, LegacyBuilder,
};

/// Gas limit of a plain value transfer.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Per-chain defaults for building and submitting transactions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainProfile {
    /// EIP-155 chain ID that transactions are bound to
    pub chain_id: u64,
    /// Gas limit used when the caller does not set one
    pub default_gas_limit: u64,
    /// Priority fee used when the caller does not set one, in wei
    pub default_max_priority_fee_per_gas: u128,
}

impl ChainProfile {
    /// A profile for `chain_id` with transfer-sized gas and a 1 gwei tip.
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            default_gas_limit: TRANSFER_GAS_LIMIT,
            default_max_priority_fee_per_gas: 1_000_000_000,
        }
    }

    /// Ethereum mainnet, chain ID 1.
    pub fn mainnet() -> Self {
        Self::new(1)
    }

    /// The Sepolia testnet, chain ID 11155111.
    pub fn sepolia() -> Self {
        Self::new(11_155_111)
    }

    /// The local development chain of Hardhat and Anvil.
    pub fn hardhat() -> Self {
        Self::new(31_337)
    }

    /// An EIP-1559 builder with the profile's gas limit and priority fee
    /// filled in. Both can still be overridden.
    pub fn eip1559_builder(&self) -> Eip1559Builder {
        Eip1559::builder()
            .gas_limit(self.default_gas_limit)
            .max_priority_fee_per_gas(self.default_max_priority_fee_per_gas)
    }

    /// A blob transaction builder with the profile's gas limit and priority
    /// fee filled in.
    pub fn eip4844_builder(&self) -> Eip4844Builder {
        Eip4844::builder()
            .gas_limit(self.default_gas_limit)
            .max_priority_fee_per_gas(self.default_max_priority_fee_per_gas)
    }

    /// A legacy builder with the profile's gas limit filled in.
    pub fn legacy_builder(&self) -> LegacyBuilder {
        Legacy::builder().gas_limit(self.default_gas_limit)
    }
}
