use std::{borrow::Cow, sync::OnceLock};

use quill_eip4844::{Blob, BlobSidecar, KzgCapability, KzgCommitment, KzgProof, SidecarError};
use quill_primitives::{Address, Hash, hex, keccak256};
use quill_rlp::{Decoder, EMPTY_LIST_CODE, Encodable};
use quill_signer::{Signature, SignatureError};

use crate::{
    ChainBinding, DecodeError, TransactionType, UnsignedTransaction, request,
    utils::{RlpFields, enveloped},
};

/// A signed transaction.
///
/// The envelope, hash, and sender are derived on first use and cached.
#[derive(Clone, Debug)]
pub struct SignedTransaction {
    transaction: UnsignedTransaction,
    /// `v` is in the form the envelope carries.
    signature: Signature,
    /// Cached sender
    sender: OnceLock<Address>,
    /// Cached transaction hash
    hash: OnceLock<Hash>,
    /// Cached canonical envelope
    envelope: OnceLock<Vec<u8>>,
}

impl SignedTransaction {
    pub(crate) fn new(
        transaction: UnsignedTransaction,
        signature: Signature,
        sender: Option<Address>,
    ) -> Self {
        Self {
            transaction,
            signature,
            sender: sender.map_or_else(OnceLock::new, OnceLock::from),
            hash: OnceLock::new(),
            envelope: OnceLock::new(),
        }
    }

    /// The unsigned transaction.
    pub fn transaction(&self) -> &UnsignedTransaction {
        &self.transaction
    }

    /// The signature, with `v` as it appears in the envelope.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction.transaction_type()
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.transaction.chain_id()
    }

    /// The blob sidecar, for a blob transaction that carries one.
    pub fn sidecar(&self) -> Option<&BlobSidecar> {
        match &self.transaction {
            UnsignedTransaction::Eip4844 { request, .. } => request.sidecar(),
            _ => None,
        }
    }

    /// The canonical envelope: the RLP list for legacy transactions, the
    /// type byte followed by the RLP list for typed ones.
    pub fn encoded_envelope(&self) -> &[u8] {
        self.envelope.get_or_init(|| {
            self.transaction
                .encode_with_wire_signature(&self.signature)
        })
    }

    /// Keccak-256 of the canonical envelope.
    pub fn transaction_hash(&self) -> Hash {
        *self
            .hash
            .get_or_init(|| keccak256(self.encoded_envelope()))
    }

    /// The address that signed the transaction.
    pub fn sender(&self) -> Result<Address, SignatureError> {
        if let Some(sender) = self.sender.get() {
            return Ok(*sender);
        }

        let sender = self.signature.recover(&self.transaction.signing_hash())?;
        Ok(*self.sender.get_or_init(|| sender))
    }

    /// The bytes to broadcast.
    ///
    /// For a blob transaction with a sidecar this is the network form,
    /// `0x03 || RLP([fields, blobs, commitments, proofs])`; otherwise it is
    /// the canonical envelope.
    pub fn network_encoding(&self) -> Cow<'_, [u8]> {
        match &self.transaction {
            UnsignedTransaction::Eip4844 { request, chain_id } => match request.sidecar() {
                Some(sidecar) => {
                    let mut fields = request.fields(chain_id);
                    fields.extend([
                        &self.signature.v as &dyn Encodable,
                        &self.signature.r,
                        &self.signature.s,
                    ]);
                    let body = RlpFields(fields);

                    let blobs = RlpFields(sidecar.blobs().iter().map(as_encodable).collect());
                    let commitments =
                        RlpFields(sidecar.commitments().iter().map(as_encodable).collect());
                    let proofs = RlpFields(sidecar.proofs().iter().map(as_encodable).collect());

                    Cow::Owned(enveloped(
                        request::Eip4844::TYPE,
                        &RlpFields(vec![&body as &dyn Encodable, &blobs, &commitments, &proofs]),
                    ))
                }
                None => Cow::Borrowed(self.encoded_envelope()),
            },
            _ => Cow::Borrowed(self.encoded_envelope()),
        }
    }

    /// The `0x`-prefixed hex of [`SignedTransaction::network_encoding`], as
    /// `eth_sendRawTransaction` expects it.
    pub fn to_raw_hex(&self) -> String {
        hex::encode_prefixed(self.network_encoding())
    }

    /// Verifies the KZG proofs of the attached sidecar, if any.
    pub fn validate_sidecar(&self, kzg: &impl KzgCapability) -> Result<(), SidecarError> {
        match self.sidecar() {
            Some(sidecar) => sidecar.validate(kzg),
            None => Ok(()),
        }
    }

    /// Decodes a signed envelope of any supported type, including the
    /// network form of a blob transaction.
    ///
    /// The signature must be low-S and is validated by recovering the
    /// sender. A sidecar's commitments must match the versioned hashes; its
    /// proofs are not verified here, see
    /// [`SignedTransaction::validate_sidecar`].
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let (&first, payload) = bytes.split_first().ok_or(DecodeError::Empty)?;

        let (transaction, signature) = match first {
            first if first >= EMPTY_LIST_CODE => decode_legacy(bytes)?,
            request::Eip1559::TYPE => decode_eip1559(payload)?,
            request::Eip4844::TYPE => decode_eip4844(payload)?,
            other => return Err(DecodeError::UnsupportedType(other)),
        };

        // EIP-2: a high-S signature is a malleated copy of a low-S one.
        if !signature.is_low_s() {
            return Err(SignatureError::OutOfRange { component: "s" }.into());
        }

        let sender = signature.recover(&transaction.signing_hash())?;
        Ok(Self::new(transaction, signature, Some(sender)))
    }

    /// Decodes a `0x`-prefixed hex envelope.
    pub fn decode_hex(input: &str) -> Result<Self, DecodeError> {
        Self::decode(&hex::decode_prefixed(input)?)
    }
}

impl PartialEq for SignedTransaction {
    fn eq(&self, other: &Self) -> bool {
        self.transaction == other.transaction && self.signature == other.signature
    }
}

impl Eq for SignedTransaction {}

fn as_encodable<T: Encodable>(value: &T) -> &dyn Encodable {
    value
}

fn decode_legacy(bytes: &[u8]) -> Result<(UnsignedTransaction, Signature), DecodeError> {
    let mut decoder = Decoder::new(bytes);
    let mut fields = decoder.decode_list()?;
    decoder.finish()?;

    let request = request::Legacy::decode_fields(&mut fields)?;
    let signature = Signature {
        v: fields.decode_u64()?,
        r: fields.decode_u256()?,
        s: fields.decode_u256()?,
    };
    fields.finish()?;

    let chain = match signature.v {
        27 | 28 => ChainBinding::PreEip155,
        _ => ChainBinding::Eip155(signature.chain_id().ok_or(SignatureError::InvalidV {
            v: signature.v,
            chain_id: None,
        })?),
    };

    Ok((request.bind(chain), signature))
}

fn decode_eip1559(payload: &[u8]) -> Result<(UnsignedTransaction, Signature), DecodeError> {
    let mut decoder = Decoder::new(payload);
    let mut fields = decoder.decode_list()?;
    decoder.finish()?;

    let chain_id = fields.decode_u64()?;
    let request = request::Eip1559::decode_fields(&mut fields)?;
    let signature = decode_typed_signature(&mut fields)?;
    fields.finish()?;

    Ok((request.bind(chain_id), signature))
}

fn decode_eip4844(payload: &[u8]) -> Result<(UnsignedTransaction, Signature), DecodeError> {
    let mut decoder = Decoder::new(payload);
    let mut outer = decoder.decode_list()?;
    decoder.finish()?;

    // The network form wraps the signed fields in a nested list.
    if !outer.peek_is_list() {
        let (chain_id, request, signature) = decode_eip4844_fields(outer)?;
        return Ok((request.bind(chain_id), signature));
    }

    let (chain_id, request, signature) = decode_eip4844_fields(outer.decode_list()?)?;

    let mut blobs = Vec::new();
    let mut items = outer.decode_list()?;
    while !items.is_empty() {
        blobs.push(Blob::from_slice(items.decode_bytes()?)?);
    }

    let mut commitments = Vec::new();
    let mut items = outer.decode_list()?;
    while !items.is_empty() {
        commitments.push(KzgCommitment::new(items.decode_fixed()?));
    }

    let mut proofs = Vec::new();
    let mut items = outer.decode_list()?;
    while !items.is_empty() {
        proofs.push(KzgProof::new(items.decode_fixed()?));
    }
    outer.finish()?;

    let sidecar = BlobSidecar::new(blobs, commitments, proofs)?;
    sidecar.validate_against(request.blob_versioned_hashes())?;

    Ok((request.with_sidecar(sidecar).bind(chain_id), signature))
}

fn decode_eip4844_fields(
    mut fields: Decoder<'_>,
) -> Result<(u64, request::Eip4844, Signature), DecodeError> {
    let chain_id = fields.decode_u64()?;
    let request = request::Eip4844::decode_fields(&mut fields)?;
    let signature = decode_typed_signature(&mut fields)?;
    fields.finish()?;

    Ok((chain_id, request, signature))
}

fn decode_typed_signature(fields: &mut Decoder<'_>) -> Result<Signature, DecodeError> {
    let v = fields.decode_u64()?;
    if v > 1 {
        return Err(DecodeError::InvalidYParity(v));
    }

    Ok(Signature {
        v,
        r: fields.decode_u256()?,
        s: fields.decode_u256()?,
    })
}
