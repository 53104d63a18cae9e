use std::fmt;

use k256::SecretKey;
use quill_primitives::{Address, Hash};

use crate::{Signature, SignatureError, public_key_to_address, utils::hash_message};

/// A source of signatures for a single account.
///
/// Wallet layers (hardware wallets, HD derivation, remote signers) implement
/// this to plug into transaction signing.
pub trait Signer {
    /// Returns the address of the signing account.
    fn address(&self) -> Address;

    /// Signs a 32-byte hash. The returned `v` is the bare Y-parity.
    fn sign_hash(&self, hash: &Hash) -> Result<Signature, SignatureError>;

    /// Signs an EIP-191 personal message. The returned `v` is 27 or 28.
    fn sign_message(&self, message: &[u8]) -> Result<Signature, SignatureError> {
        self.sign_hash(&hash_message(message))?.to_pre_eip155()
    }
}

impl<SignerT: Signer + ?Sized> Signer for &SignerT {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn sign_hash(&self, hash: &Hash) -> Result<Signature, SignatureError> {
        (**self).sign_hash(hash)
    }
}

/// A [`Signer`] holding its secret key in memory.
#[derive(Clone)]
pub struct LocalSigner {
    secret_key: SecretKey,
    address: Address,
}

impl LocalSigner {
    /// Constructs a signer for the provided secret key.
    pub fn new(secret_key: SecretKey) -> Self {
        let address = public_key_to_address(secret_key.public_key());

        Self {
            secret_key,
            address,
        }
    }
}

impl From<SecretKey> for LocalSigner {
    fn from(secret_key: SecretKey) -> Self {
        Self::new(secret_key)
    }
}

// Never print the secret key.
impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Signer for LocalSigner {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_hash(&self, hash: &Hash) -> Result<Signature, SignatureError> {
        Signature::sign_hash(hash, &self.secret_key)
    }
}
