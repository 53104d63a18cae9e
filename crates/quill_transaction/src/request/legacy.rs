use quill_primitives::{Address, HexData, Wei};
use quill_rlp::{Decoder, Encodable};

use super::validate_recipient;
use crate::{BuildError, ChainBinding, DecodeError, Field, UnsignedTransaction, utils::recipient};

/// A legacy (type 0) transaction request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Legacy {
    // The order of these fields determines encoding order.
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: Option<Address>,
    value: Wei,
    data: HexData,
}

impl Legacy {
    /// The type identifier of a legacy transaction.
    pub const TYPE: u8 = 0;

    /// Starts building a legacy request.
    pub fn builder() -> LegacyBuilder {
        LegacyBuilder::default()
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn gas_price(&self) -> u128 {
        self.gas_price
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    /// The recipient; `None` creates a contract.
    pub fn to(&self) -> Option<&Address> {
        self.to.as_ref()
    }

    pub fn value(&self) -> &Wei {
        &self.value
    }

    pub fn data(&self) -> &HexData {
        &self.data
    }

    /// Binds the request to a chain. [`ChainBinding::PreEip155`] produces a
    /// signature that is valid on every chain.
    pub fn bind(self, chain: ChainBinding) -> UnsignedTransaction {
        UnsignedTransaction::Legacy {
            request: self,
            chain,
        }
    }

    /// The six unsigned fields, in encoding order.
    pub(crate) fn fields(&self) -> Vec<&dyn Encodable> {
        vec![
            &self.nonce as &dyn Encodable,
            &self.gas_price,
            &self.gas_limit,
            recipient(self.to.as_ref()),
            &self.value,
            &self.data,
        ]
    }

    /// Reads the six unsigned fields.
    pub(crate) fn decode_fields(fields: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let request = Self {
            nonce: fields.decode_u64()?,
            gas_price: fields.decode_u128()?,
            gas_limit: fields.decode_u64()?,
            to: fields.decode_optional_address()?,
            value: Wei::from_wei(fields.decode_u256()?),
            data: HexData::from_bytes(fields.decode_bytes()?),
        };

        validate_recipient(request.to.as_ref(), &request.data)?;
        Ok(request)
    }
}

/// Accumulates the fields of a [`Legacy`] request.
#[derive(Clone, Debug, Default)]
pub struct LegacyBuilder {
    nonce: Option<u64>,
    gas_price: Option<u128>,
    gas_limit: Option<u64>,
    to: Option<Address>,
    value: Option<Wei>,
    data: Option<HexData>,
}

impl LegacyBuilder {
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Sets the recipient. Leave unset to create a contract.
    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    /// Defaults to zero.
    pub fn value(mut self, value: impl Into<Wei>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Defaults to empty.
    pub fn data(mut self, data: impl Into<HexData>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Validates the fields and freezes them into a request.
    pub fn build(self) -> Result<Legacy, BuildError> {
        let request = Legacy {
            nonce: self.nonce.ok_or(BuildError::MissingField(Field::Nonce))?,
            gas_price: self
                .gas_price
                .ok_or(BuildError::MissingField(Field::GasPrice))?,
            gas_limit: self
                .gas_limit
                .ok_or(BuildError::MissingField(Field::GasLimit))?,
            to: self.to,
            value: self.value.unwrap_or(Wei::ZERO),
            data: self.data.unwrap_or_default(),
        };

        validate_recipient(request.to.as_ref(), &request.data)?;
        Ok(request)
    }
}
