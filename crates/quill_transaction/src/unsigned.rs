use quill_primitives::{Hash, keccak256};
use quill_signer::{Signature, SignatureError, Signer};

use crate::{
    ChainBinding, SignedTransaction, TransactionType, request,
    utils::{RlpFields, enveloped},
};

/// A transaction request bound to a chain, ready to be signed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnsignedTransaction {
    Legacy {
        request: request::Legacy,
        chain: ChainBinding,
    },
    Eip1559 {
        request: request::Eip1559,
        chain_id: u64,
    },
    Eip4844 {
        request: request::Eip4844,
        chain_id: u64,
    },
}

impl UnsignedTransaction {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            UnsignedTransaction::Legacy { .. } => TransactionType::Legacy,
            UnsignedTransaction::Eip1559 { .. } => TransactionType::Eip1559,
            UnsignedTransaction::Eip4844 { .. } => TransactionType::Eip4844,
        }
    }

    /// The chain id, or `None` for a pre-EIP-155 legacy transaction.
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            UnsignedTransaction::Legacy { chain, .. } => chain.chain_id(),
            UnsignedTransaction::Eip1559 { chain_id, .. }
            | UnsignedTransaction::Eip4844 { chain_id, .. } => Some(*chain_id),
        }
    }

    pub fn nonce(&self) -> u64 {
        match self {
            UnsignedTransaction::Legacy { request, .. } => request.nonce(),
            UnsignedTransaction::Eip1559 { request, .. } => request.nonce(),
            UnsignedTransaction::Eip4844 { request, .. } => request.nonce(),
        }
    }

    /// The bytes whose Keccak-256 hash is signed.
    pub fn encode_for_signing(&self) -> Vec<u8> {
        match self {
            UnsignedTransaction::Legacy { request, chain } => {
                let mut fields = request.fields();
                if let ChainBinding::Eip155(chain_id) = chain {
                    fields.extend([chain_id as &dyn quill_rlp::Encodable, &0u64, &0u64]);
                }

                quill_rlp::encode(&RlpFields(fields))
            }
            UnsignedTransaction::Eip1559 { request, chain_id } => {
                enveloped(request::Eip1559::TYPE, &RlpFields(request.fields(chain_id)))
            }
            UnsignedTransaction::Eip4844 { request, chain_id } => {
                enveloped(request::Eip4844::TYPE, &RlpFields(request.fields(chain_id)))
            }
        }
    }

    /// The hash to sign.
    pub fn signing_hash(&self) -> Hash {
        keccak256(self.encode_for_signing())
    }

    /// Encodes the broadcast envelope for `signature`.
    ///
    /// `v` may be a bare Y-parity, 27/28, or an EIP-155 value for this
    /// transaction's chain; it is rewritten into the form the envelope uses.
    pub fn encode_as_envelope(&self, signature: &Signature) -> Result<Vec<u8>, SignatureError> {
        let signature = self.wire_signature(signature)?;
        Ok(self.encode_with_wire_signature(&signature))
    }

    /// Signs the transaction with `signer`.
    ///
    /// The signature is checked against the signer's address before it is
    /// attached.
    pub fn sign(self, signer: &impl Signer) -> Result<SignedTransaction, SignatureError> {
        let hash = self.signing_hash();
        let sender = signer.address();
        let signature = signer.sign_hash(&hash)?;
        signature.verify(&hash, sender)?;

        log::debug!(
            "Signed {:?} transaction with nonce {} for {sender}",
            self.transaction_type(),
            self.nonce()
        );

        let signature = self.wire_signature(&signature)?;
        Ok(SignedTransaction::new(self, signature, Some(sender)))
    }

    /// Attaches an externally produced signature. The sender is recovered
    /// to validate it.
    pub fn into_signed(self, signature: &Signature) -> Result<SignedTransaction, SignatureError> {
        let sender = signature.recover(&self.signing_hash())?;
        let signature = self.wire_signature(signature)?;

        Ok(SignedTransaction::new(self, signature, Some(sender)))
    }

    /// Rewrites `v` into the form the envelope carries: EIP-155 or 27/28 for
    /// legacy transactions, a bare Y-parity for typed ones.
    fn wire_signature(&self, signature: &Signature) -> Result<Signature, SignatureError> {
        match self.chain_binding() {
            ChainBinding::PreEip155 => {
                if signature.is_eip155() {
                    return Err(SignatureError::InvalidV {
                        v: signature.v,
                        chain_id: None,
                    });
                }
                signature.to_pre_eip155()
            }
            ChainBinding::Eip155(chain_id) => {
                let parity = Signature {
                    v: u64::from(signature.recovery_id(chain_id)?),
                    ..*signature
                };

                if self.transaction_type() == TransactionType::Legacy {
                    parity.to_eip155(chain_id)
                } else {
                    Ok(parity)
                }
            }
        }
    }

    fn chain_binding(&self) -> ChainBinding {
        match self {
            UnsignedTransaction::Legacy { chain, .. } => *chain,
            UnsignedTransaction::Eip1559 { chain_id, .. }
            | UnsignedTransaction::Eip4844 { chain_id, .. } => ChainBinding::Eip155(*chain_id),
        }
    }

    /// Encodes the envelope for a signature whose `v` is already in wire
    /// form.
    pub(crate) fn encode_with_wire_signature(&self, signature: &Signature) -> Vec<u8> {
        let signature_fields = [
            &signature.v as &dyn quill_rlp::Encodable,
            &signature.r,
            &signature.s,
        ];

        match self {
            UnsignedTransaction::Legacy { request, .. } => {
                let mut fields = request.fields();
                fields.extend(signature_fields);

                quill_rlp::encode(&RlpFields(fields))
            }
            UnsignedTransaction::Eip1559 { request, chain_id } => {
                let mut fields = request.fields(chain_id);
                fields.extend(signature_fields);

                enveloped(request::Eip1559::TYPE, &RlpFields(fields))
            }
            UnsignedTransaction::Eip4844 { request, chain_id } => {
                let mut fields = request.fields(chain_id);
                fields.extend(signature_fields);

                enveloped(request::Eip4844::TYPE, &RlpFields(fields))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use quill_primitives::{Address, Wei};
    use quill_signer::LocalSigner;
    use quill_test_utils::secret_key::{HARDHAT_SECRET_KEY, secret_key_from_str};

    use super::*;
    use crate::request::Legacy;

    fn transfer() -> anyhow::Result<request::Legacy> {
        Ok(Legacy::builder()
            .nonce(0)
            .gas_price(20_000_000_000)
            .gas_limit(21_000)
            .to(Address::from_str("0x000000000000000000000000000000000000dead")?)
            .value(Wei::ZERO)
            .build()?)
    }

    #[test]
    fn eip155_preimage_appends_chain_id() -> anyhow::Result<()> {
        let unsigned = transfer()?.bind(ChainBinding::Eip155(1));

        assert_eq!(
            quill_primitives::hex::encode(unsigned.encode_for_signing()),
            "e4808504a817c80082520894000000000000000000000000000000000000dead8080018080"
        );
        assert_eq!(unsigned.chain_id(), Some(1));

        Ok(())
    }

    #[test]
    fn pre_eip155_preimage_has_six_fields() -> anyhow::Result<()> {
        let unsigned = transfer()?.bind(ChainBinding::PreEip155);

        assert_eq!(
            quill_primitives::hex::encode(unsigned.encode_for_signing()),
            "e1808504a817c80082520894000000000000000000000000000000000000dead8080"
        );
        assert_eq!(unsigned.chain_id(), None);

        Ok(())
    }

    #[test]
    fn rejects_signature_for_another_chain() -> anyhow::Result<()> {
        let signer = LocalSigner::new(secret_key_from_str(HARDHAT_SECRET_KEY)?);
        let unsigned = transfer()?.bind(ChainBinding::Eip155(1));
        let signature = signer.sign_hash(&unsigned.signing_hash())?.to_eip155(5)?;

        assert!(matches!(
            unsigned.encode_as_envelope(&signature),
            Err(SignatureError::InvalidV {
                chain_id: Some(1),
                ..
            })
        ));

        Ok(())
    }

    #[test]
    fn envelope_accepts_any_v_form() -> anyhow::Result<()> {
        let signer = LocalSigner::new(secret_key_from_str(HARDHAT_SECRET_KEY)?);
        let unsigned = transfer()?.bind(ChainBinding::Eip155(1));
        let signature = signer.sign_hash(&unsigned.signing_hash())?;

        let from_parity = unsigned.encode_as_envelope(&signature)?;
        let from_legacy = unsigned.encode_as_envelope(&signature.to_pre_eip155()?)?;
        let from_eip155 = unsigned.encode_as_envelope(&signature.to_eip155(1)?)?;

        assert_eq!(from_parity, from_legacy);
        assert_eq!(from_parity, from_eip155);

        Ok(())
    }
}
