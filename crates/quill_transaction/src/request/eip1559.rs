use quill_primitives::{Address, HexData, Wei};
use quill_rlp::{Decoder, Encodable};

use super::{validate_fees, validate_recipient};
use crate::{AccessList, BuildError, DecodeError, Field, UnsignedTransaction, utils::recipient};

/// An EIP-1559 (type 2) transaction request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Eip1559 {
    // The order of these fields determines encoding order.
    nonce: u64,
    max_priority_fee_per_gas: u128,
    max_fee_per_gas: u128,
    gas_limit: u64,
    to: Option<Address>,
    value: Wei,
    data: HexData,
    access_list: AccessList,
}

impl Eip1559 {
    /// The type identifier of an EIP-1559 transaction.
    pub const TYPE: u8 = 2;

    /// Starts building an EIP-1559 request.
    pub fn builder() -> Eip1559Builder {
        Eip1559Builder::default()
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn max_priority_fee_per_gas(&self) -> u128 {
        self.max_priority_fee_per_gas
    }

    pub fn max_fee_per_gas(&self) -> u128 {
        self.max_fee_per_gas
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

    pub fn access_list(&self) -> &AccessList {
        &self.access_list
    }

    pub fn bind(self, chain_id: u64) -> UnsignedTransaction {
        UnsignedTransaction::Eip1559 {
            request: self,
            chain_id,
        }
    }

    /// The unsigned fields, in encoding order, starting with the chain id.
    pub(crate) fn fields<'a>(&'a self, chain_id: &'a u64) -> Vec<&'a dyn Encodable> {
        vec![
            chain_id as &dyn Encodable,
            &self.nonce,
            &self.max_priority_fee_per_gas,
            &self.max_fee_per_gas,
            &self.gas_limit,
            recipient(self.to.as_ref()),
            &self.value,
            &self.data,
            &self.access_list,
        ]
    }

    /// Reads the unsigned fields that follow the chain id.
    pub(crate) fn decode_fields(fields: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let request = Self {
            nonce: fields.decode_u64()?,
            max_priority_fee_per_gas: fields.decode_u128()?,
            max_fee_per_gas: fields.decode_u128()?,
            gas_limit: fields.decode_u64()?,
            to: fields.decode_optional_address()?,
            value: Wei::from_wei(fields.decode_u256()?),
            data: HexData::from_bytes(fields.decode_bytes()?),
            access_list: fields.decode()?,
        };

        validate_recipient(request.to.as_ref(), &request.data)?;
        validate_fees(request.max_priority_fee_per_gas, request.max_fee_per_gas)?;
        Ok(request)
    }
}

/// Accumulates the fields of an [`Eip1559`] request.
#[derive(Clone, Debug, Default)]
pub struct Eip1559Builder {
    nonce: Option<u64>,
    max_priority_fee_per_gas: Option<u128>,
    max_fee_per_gas: Option<u128>,
    gas_limit: Option<u64>,
    to: Option<Address>,
    value: Option<Wei>,
    data: Option<HexData>,
    access_list: AccessList,
}

impl Eip1559Builder {
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn max_priority_fee_per_gas(mut self, fee: u128) -> Self {
        self.max_priority_fee_per_gas = Some(fee);
        self
    }

    pub fn max_fee_per_gas(mut self, fee: u128) -> Self {
        self.max_fee_per_gas = Some(fee);
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

    /// Defaults to empty.
    pub fn access_list(mut self, access_list: impl Into<AccessList>) -> Self {
        self.access_list = access_list.into();
        self
    }

    /// Validates the fields and freezes them into a request.
    pub fn build(self) -> Result<Eip1559, BuildError> {
        let request = Eip1559 {
            nonce: self.nonce.ok_or(BuildError::MissingField(Field::Nonce))?,
            max_priority_fee_per_gas: self
                .max_priority_fee_per_gas
                .ok_or(BuildError::MissingField(Field::MaxPriorityFeePerGas))?,
            max_fee_per_gas: self
                .max_fee_per_gas
                .ok_or(BuildError::MissingField(Field::MaxFeePerGas))?,
            gas_limit: self
                .gas_limit
                .ok_or(BuildError::MissingField(Field::GasLimit))?,
            to: self.to,
            value: self.value.unwrap_or_default(),
            data: self.data.unwrap_or_default(),
            access_list: self.access_list,
        };

        validate_recipient(request.to.as_ref(), &request.data)?;
        validate_fees(request.max_priority_fee_per_gas, request.max_fee_per_gas)?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Eip1559Builder {
        Eip1559::builder()
            .nonce(0)
            .max_priority_fee_per_gas(1)
            .max_fee_per_gas(2)
            .gas_limit(21_000)
            .to(Address::ZERO)
    }

    #[test]
    fn builds_with_defaults() -> anyhow::Result<()> {
        let request = complete().build()?;

        assert_eq!(request.value(), &Wei::ZERO);
        assert!(request.data().is_empty());
        assert!(request.access_list().is_empty());

        Ok(())
    }

    #[test]
    fn rejects_priority_fee_above_cap() {
        let error = complete()
            .max_priority_fee_per_gas(3)
            .build()
            .expect_err("tip exceeds cap");

        assert_eq!(
            error,
            BuildError::PriorityFeeAboveMaxFee {
                max_priority_fee_per_gas: 3,
                max_fee_per_gas: 2
            }
        );
        assert_eq!(error.field(), Some(Field::MaxPriorityFeePerGas));
    }

    #[test]
    fn missing_fee_is_field_specific() {
        assert_eq!(
            Eip1559::builder().nonce(0).build(),
            Err(BuildError::MissingField(Field::MaxPriorityFeePerGas))
        );
        assert_eq!(
            Eip1559::builder()
                .nonce(0)
                .max_priority_fee_per_gas(1)
                .build(),
            Err(BuildError::MissingField(Field::MaxFeePerGas))
        );
    }
}
