use std::{fmt, sync::Arc};

use quill_eip4844::{BlobSidecar, KzgCapability};
use quill_primitives::{Address, Hash, HexData, Wei};
use quill_rlp::{Decoder, Encodable};

use super::validate_fees;
use crate::{AccessList, BuildError, DecodeError, Field, UnsignedTransaction};

/// An EIP-4844 (type 3) blob transaction request.
///
/// Requests produced by [`Eip4844Builder`] always carry the sidecar their
/// versioned hashes were derived from. Requests decoded from the canonical
/// envelope have none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Eip4844 {
    // The order of these fields determines encoding order.
    nonce: u64,
    max_priority_fee_per_gas: u128,
    max_fee_per_gas: u128,
    gas_limit: u64,
    to: Address,
    value: Wei,
    data: HexData,
    access_list: AccessList,
    max_fee_per_blob_gas: u128,
    blob_versioned_hashes: Vec<Hash>,
    sidecar: Option<BlobSidecar>,
}

impl Eip4844 {
    /// The type identifier of an EIP-4844 transaction.
    pub const TYPE: u8 = 3;

    /// Starts building an EIP-4844 request.
    pub fn builder() -> Eip4844Builder {
        Eip4844Builder::default()
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

    /// Blob transactions cannot create contracts.
    pub fn to(&self) -> &Address {
        &self.to
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

    pub fn max_fee_per_blob_gas(&self) -> u128 {
        self.max_fee_per_blob_gas
    }

    pub fn blob_versioned_hashes(&self) -> &[Hash] {
        &self.blob_versioned_hashes
    }

    pub fn sidecar(&self) -> Option<&BlobSidecar> {
        self.sidecar.as_ref()
    }

    pub fn bind(self, chain_id: u64) -> UnsignedTransaction {
        UnsignedTransaction::Eip4844 {
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
            &self.to,
            &self.value,
            &self.data,
            &self.access_list,
            &self.max_fee_per_blob_gas,
            &self.blob_versioned_hashes,
        ]
    }

    /// Reads the unsigned fields that follow the chain id.
    pub(crate) fn decode_fields(fields: &mut Decoder<'_>) -> Result<Self, DecodeError> {
        let nonce = fields.decode_u64()?;
        let max_priority_fee_per_gas = fields.decode_u128()?;
        let max_fee_per_gas = fields.decode_u128()?;
        let gas_limit = fields.decode_u64()?;
        let to = fields.decode_address()?;
        let value = Wei::from_wei(fields.decode_u256()?);
        let data = HexData::from_bytes(fields.decode_bytes()?);
        let access_list = fields.decode()?;
        let max_fee_per_blob_gas = fields.decode_u128()?;

        let mut hashes = fields.decode_list()?;
        let mut blob_versioned_hashes = Vec::new();
        while !hashes.is_empty() {
            blob_versioned_hashes.push(hashes.decode_hash()?);
        }

        if blob_versioned_hashes.is_empty() {
            return Err(BuildError::MissingField(Field::Blobs).into());
        }
        validate_fees(max_priority_fee_per_gas, max_fee_per_gas)?;

        Ok(Self {
            nonce,
            max_priority_fee_per_gas,
            max_fee_per_gas,
            gas_limit,
            to,
            value,
            data,
            access_list,
            max_fee_per_blob_gas,
            blob_versioned_hashes,
            sidecar: None,
        })
    }

    /// Attaches a sidecar decoded from the network form.
    pub(crate) fn with_sidecar(mut self, sidecar: BlobSidecar) -> Self {
        self.sidecar = Some(sidecar);
        self
    }
}

/// Accumulates the fields of an [`Eip4844`] request.
///
/// The blobs come either from a pre-built [`BlobSidecar`] or from raw data
/// that is packed into blobs with a [`KzgCapability`]. Setting both is an
/// error.
#[derive(Clone, Default)]
pub struct Eip4844Builder {
    nonce: Option<u64>,
    max_priority_fee_per_gas: Option<u128>,
    max_fee_per_gas: Option<u128>,
    gas_limit: Option<u64>,
    to: Option<Address>,
    value: Option<Wei>,
    data: Option<HexData>,
    access_list: AccessList,
    max_fee_per_blob_gas: Option<u128>,
    sidecar: Option<BlobSidecar>,
    blob_data: Option<Vec<u8>>,
    kzg: Option<Arc<dyn KzgCapability>>,
}

impl Eip4844Builder {
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

    pub fn max_fee_per_blob_gas(mut self, fee: u128) -> Self {
        self.max_fee_per_blob_gas = Some(fee);
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

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

    /// Uses a pre-built sidecar. When a KZG capability is also set, the
    /// sidecar's proofs are verified at build time.
    pub fn sidecar(mut self, sidecar: BlobSidecar) -> Self {
        self.sidecar = Some(sidecar);
        self
    }

    /// Packs `data` into blobs at build time. Requires a KZG capability.
    pub fn blob_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.blob_data = Some(data.into());
        self
    }

    /// Sets the capability used to commit to and verify blobs.
    pub fn kzg(mut self, kzg: impl KzgCapability + 'static) -> Self {
        self.kzg = Some(Arc::new(kzg));
        self
    }

    /// Validates the fields, derives the sidecar if needed, and freezes
    /// everything into a request.
    pub fn build(self) -> Result<Eip4844, BuildError> {
        let nonce = self.nonce.ok_or(BuildError::MissingField(Field::Nonce))?;
        let max_priority_fee_per_gas = self
            .max_priority_fee_per_gas
            .ok_or(BuildError::MissingField(Field::MaxPriorityFeePerGas))?;
        let max_fee_per_gas = self
            .max_fee_per_gas
            .ok_or(BuildError::MissingField(Field::MaxFeePerGas))?;
        let max_fee_per_blob_gas = self
            .max_fee_per_blob_gas
            .ok_or(BuildError::MissingField(Field::MaxFeePerBlobGas))?;
        let gas_limit = self
            .gas_limit
            .ok_or(BuildError::MissingField(Field::GasLimit))?;
        let to = self.to.ok_or(BuildError::MissingField(Field::To))?;

        validate_fees(max_priority_fee_per_gas, max_fee_per_gas)?;

        let kzg = self.kzg.as_deref();
        let sidecar = match (self.sidecar, self.blob_data) {
            (Some(_), Some(_)) => return Err(BuildError::ConflictingBlobSources),
            (Some(sidecar), None) => {
                if let Some(kzg) = kzg {
                    sidecar.validate(&kzg)?;
                }
                sidecar
            }
            (None, Some(data)) => {
                let kzg = kzg.ok_or(BuildError::MissingField(Field::Kzg))?;
                BlobSidecar::from_payload(&data, &kzg)?
            }
            (None, None) => return Err(BuildError::MissingField(Field::Blobs)),
        };

        Ok(Eip4844 {
            nonce,
            max_priority_fee_per_gas,
            max_fee_per_gas,
            gas_limit,
            to,
            value: self.value.unwrap_or_default(),
            data: self.data.unwrap_or_default(),
            access_list: self.access_list,
            max_fee_per_blob_gas,
            blob_versioned_hashes: sidecar.versioned_hashes().to_vec(),
            sidecar: Some(sidecar),
        })
    }
}

impl fmt::Debug for Eip4844Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Eip4844Builder")
            .field("nonce", &self.nonce)
            .field("to", &self.to)
            .field("sidecar", &self.sidecar.as_ref().map(BlobSidecar::len))
            .field("blob_data", &self.blob_data.as_ref().map(Vec::len))
            .field("kzg", &self.kzg.is_some())
            .finish_non_exhaustive()
    }
}
