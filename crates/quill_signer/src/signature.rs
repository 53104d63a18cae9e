use alloy_primitives::U256;
use k256::{
    PublicKey, SecretKey,
    ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey},
};
use quill_primitives::{Address, Hash};

use crate::{SignatureError, public_key_to_address, utils::hash_message};

/// Order of the secp256k1 group.
pub const SECP256K1_ORDER: U256 = U256::from_limbs([
    0xbfd2_5e8c_d036_4141,
    0xbaae_dce6_af48_a03b,
    0xffff_ffff_ffff_fffe,
    0xffff_ffff_ffff_ffff,
]);

/// Largest `s` value accepted as "low-S": half the group order.
pub const SECP256K1_HALF_ORDER: U256 = U256::from_limbs([
    0xdfe9_2f46_681b_20a0,
    0x5d57_6e73_57a4_501d,
    0xffff_ffff_ffff_ffff,
    0x7fff_ffff_ffff_ffff,
]);

/// Offset added to the Y-parity by pre-EIP-155 and personal-message
/// signatures.
const LEGACY_V_OFFSET: u64 = 27;

/// Offset added to `chain_id * 2` by EIP-155 signatures.
const EIP155_V_OFFSET: u64 = 35;

/// An ECDSA signature over secp256k1 with its recovery information.
///
/// The `v` value takes one of three shapes:
/// - `0` or `1`: the bare Y-parity, used by typed transactions;
/// - `27` or `28`: the Y-parity offset by 27, used by pre-EIP-155
///   transactions and personal messages;
/// - `chain_id * 2 + 35 + parity`: EIP-155 replay-protected legacy
///   transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Signature {
    /// R value
    #[serde(with = "quill_primitives::quantity::u256")]
    pub r: U256,
    /// S value
    #[serde(with = "quill_primitives::quantity::u256")]
    pub s: U256,
    /// V value
    #[serde(with = "quill_primitives::quantity::u64")]
    pub v: u64,
}

impl Signature {
    /// Signs a 32-byte prehash with RFC 6979 deterministic nonces.
    ///
    /// The returned signature is low-S and carries the bare Y-parity as its
    /// `v` value.
    pub fn sign_hash(hash: &Hash, secret_key: &SecretKey) -> Result<Self, SignatureError> {
        let signing_key = SigningKey::from(secret_key);
        let (signature, recovery_id) = signing_key.sign_prehash_recoverable(hash.as_bytes())?;

        // Flipping `s` mirrors the point `R`, so the parity flips with it.
        let (signature, odd_y_parity) = match signature.normalize_s() {
            Some(normalized) => (normalized, !recovery_id.is_y_odd()),
            None => (signature, recovery_id.is_y_odd()),
        };

        let (r, s) = signature.split_bytes();
        Ok(Self {
            r: U256::from_be_slice(&r),
            s: U256::from_be_slice(&s),
            v: u64::from(odd_y_parity),
        })
    }

    /// Signs a message according to EIP-191. The returned `v` is 27 or 28.
    pub fn sign_message(
        message: impl AsRef<[u8]>,
        secret_key: &SecretKey,
    ) -> Result<Self, SignatureError> {
        Self::sign_hash(&hash_message(message), secret_key)?.to_pre_eip155()
    }

    /// Returns the Y-parity encoded in `v`.
    pub fn odd_y_parity(&self) -> Result<bool, SignatureError> {
        match self.v {
            0 | 1 => Ok(self.v == 1),
            27 | 28 => Ok(self.v == 28),
            v if v >= EIP155_V_OFFSET => Ok((v - EIP155_V_OFFSET) % 2 == 1),
            v => Err(SignatureError::InvalidV { v, chain_id: None }),
        }
    }

    /// Whether `v` uses the EIP-155 encoding.
    pub fn is_eip155(&self) -> bool {
        self.v >= EIP155_V_OFFSET
    }

    /// Returns the chain id encoded in an EIP-155 `v` value.
    pub fn chain_id(&self) -> Option<u64> {
        self.is_eip155().then(|| (self.v - EIP155_V_OFFSET) / 2)
    }

    /// Returns the recovery id (0 or 1) of a signature produced for
    /// `chain_id`.
    ///
    /// Bare and 27/28 values are accepted for any chain. An EIP-155 value
    /// that encodes a different chain id is an error.
    pub fn recovery_id(&self, chain_id: u64) -> Result<u8, SignatureError> {
        let invalid = || SignatureError::InvalidV {
            v: self.v,
            chain_id: Some(chain_id),
        };

        match self.v {
            0 | 1 => Ok(self.v as u8),
            27 | 28 => Ok((self.v - LEGACY_V_OFFSET) as u8),
            v if v >= EIP155_V_OFFSET => {
                let base = eip155_base(chain_id).ok_or_else(invalid)?;
                match v.checked_sub(base) {
                    Some(parity @ (0 | 1)) => Ok(parity as u8),
                    _ => Err(invalid()),
                }
            }
            _ => Err(invalid()),
        }
    }

    /// Returns a copy with the bare Y-parity as `v`.
    pub fn to_y_parity(&self) -> Result<Self, SignatureError> {
        Ok(Self {
            v: u64::from(self.odd_y_parity()?),
            ..*self
        })
    }

    /// Returns a copy with `v` set to 27 or 28.
    pub fn to_pre_eip155(&self) -> Result<Self, SignatureError> {
        Ok(Self {
            v: LEGACY_V_OFFSET + u64::from(self.odd_y_parity()?),
            ..*self
        })
    }

    /// Returns a copy with `v` encoded for `chain_id` per EIP-155.
    pub fn to_eip155(&self, chain_id: u64) -> Result<Self, SignatureError> {
        let parity = u64::from(self.odd_y_parity()?);
        let v = eip155_base(chain_id)
            .and_then(|base| base.checked_add(parity))
            .ok_or(SignatureError::InvalidV {
                v: self.v,
                chain_id: Some(chain_id),
            })?;

        Ok(Self { v, ..*self })
    }

    /// Whether `s` lies in the lower half of the group order.
    pub fn is_low_s(&self) -> bool {
        self.s <= SECP256K1_HALF_ORDER
    }

    /// Recovers the address that signed `hash`.
    ///
    /// `r` and `s` must lie in `[1, n)`. A high-S signature is normalized
    /// before recovery, which yields the same signer.
    pub fn recover(&self, hash: &Hash) -> Result<Address, SignatureError> {
        let odd_y_parity = self.odd_y_parity()?;

        for (component, value) in [("r", self.r), ("s", self.s)] {
            if value.is_zero() || value >= SECP256K1_ORDER {
                return Err(SignatureError::OutOfRange { component });
            }
        }

        let signature =
            EcdsaSignature::from_scalars(self.r.to_be_bytes::<32>(), self.s.to_be_bytes::<32>())?;
        let (signature, odd_y_parity) = match signature.normalize_s() {
            Some(normalized) => (normalized, !odd_y_parity),
            None => (signature, odd_y_parity),
        };

        let recovery_id = RecoveryId::new(odd_y_parity, false);
        let verifying_key =
            VerifyingKey::recover_from_prehash(hash.as_bytes(), &signature, recovery_id)
                .map_err(|_err| SignatureError::RecoveryError)?;

        Ok(public_key_to_address(PublicKey::from(&verifying_key)))
    }

    /// Recovers the signer of an EIP-191 personal message.
    pub fn recover_message(&self, message: impl AsRef<[u8]>) -> Result<Address, SignatureError> {
        self.recover(&hash_message(message))
    }

    /// Verifies that `hash` was signed by `address`.
    pub fn verify(&self, hash: &Hash, address: Address) -> Result<(), SignatureError> {
        let recovered = self.recover(hash)?;
        if recovered == address {
            Ok(())
        } else {
            Err(SignatureError::VerificationError(address, recovered))
        }
    }

    /// Returns the 65-byte `r || s || v` form.
    ///
    /// A `v` that does not fit in a byte (EIP-155 on large chain ids) is
    /// written as 27 or 28.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        bytes[32..64].copy_from_slice(&self.s.to_be_bytes::<32>());
        bytes[64] = u8::try_from(self.v).unwrap_or_else(|_err| {
            let odd = (self.v - EIP155_V_OFFSET) % 2 == 1;
            LEGACY_V_OFFSET as u8 + u8::from(odd)
        });

        bytes
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = SignatureError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != 65 {
            return Err(SignatureError::InvalidLength(bytes.len()));
        }

        Ok(Self {
            r: U256::from_be_slice(&bytes[..32]),
            s: U256::from_be_slice(&bytes[32..64]),
            v: u64::from(bytes[64]),
        })
    }
}

impl std::str::FromStr for Signature {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))?;
        Self::try_from(bytes.as_slice())
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

fn eip155_base(chain_id: u64) -> Option<u64> {
    chain_id.checked_mul(2)?.checked_add(EIP155_V_OFFSET)
}
