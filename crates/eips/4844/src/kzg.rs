use std::{fmt, sync::OnceLock};

use quill_primitives::{Hash, hex, sha256};
use quill_rlp::{BufMut, Encodable};

use crate::{BYTES_PER_COMMITMENT, BYTES_PER_PROOF, Blob, KzgError, VERSIONED_HASH_VERSION_KZG};

/// A KZG commitment to a blob.
///
/// The versioned hash is derived on first use and cached.
#[derive(Clone)]
pub struct KzgCommitment {
    bytes: [u8; BYTES_PER_COMMITMENT],
    versioned_hash: OnceLock<Hash>,
}

impl KzgCommitment {
    /// Constructs a commitment from its compressed encoding.
    pub const fn new(bytes: [u8; BYTES_PER_COMMITMENT]) -> Self {
        Self {
            bytes,
            versioned_hash: OnceLock::new(),
        }
    }

    /// Returns the compressed encoding.
    pub fn as_bytes(&self) -> &[u8; BYTES_PER_COMMITMENT] {
        &self.bytes
    }

    /// Returns `0x01 || sha256(commitment)[1..]`.
    pub fn versioned_hash(&self) -> Hash {
        *self.versioned_hash.get_or_init(|| {
            let mut hash = sha256(self.bytes);
            hash[0] = VERSIONED_HASH_VERSION_KZG;
            Hash::new(hash)
        })
    }
}

impl From<[u8; BYTES_PER_COMMITMENT]> for KzgCommitment {
    fn from(bytes: [u8; BYTES_PER_COMMITMENT]) -> Self {
        Self::new(bytes)
    }
}

impl PartialEq for KzgCommitment {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for KzgCommitment {}

impl fmt::Debug for KzgCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KzgCommitment({})", hex::encode_prefixed(self.bytes))
    }
}

impl Encodable for KzgCommitment {
    fn encode(&self, out: &mut dyn BufMut) {
        self.bytes.encode(out);
    }

    fn length(&self) -> usize {
        self.bytes.length()
    }
}

/// A KZG proof that a blob matches its commitment.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KzgProof([u8; BYTES_PER_PROOF]);

impl KzgProof {
    /// Constructs a proof from its compressed encoding.
    pub const fn new(bytes: [u8; BYTES_PER_PROOF]) -> Self {
        Self(bytes)
    }

    /// Returns the compressed encoding.
    pub fn as_bytes(&self) -> &[u8; BYTES_PER_PROOF] {
        &self.0
    }
}

impl From<[u8; BYTES_PER_PROOF]> for KzgProof {
    fn from(bytes: [u8; BYTES_PER_PROOF]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for KzgProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KzgProof({})", hex::encode_prefixed(self.0))
    }
}

impl Encodable for KzgProof {
    fn encode(&self, out: &mut dyn BufMut) {
        self.0.encode(out);
    }

    fn length(&self) -> usize {
        self.0.length()
    }
}

/// Polynomial commitment operations over blobs.
///
/// Implementations load their trusted setup once and are safe to share
/// across threads afterwards.
pub trait KzgCapability: Send + Sync {
    /// Commits to a blob.
    fn commit(&self, blob: &Blob) -> Result<KzgCommitment, KzgError>;

    /// Computes the proof that `blob` matches `commitment`.
    fn compute_proof(&self, blob: &Blob, commitment: &KzgCommitment)
    -> Result<KzgProof, KzgError>;

    /// Verifies a single proof.
    fn verify_proof(
        &self,
        blob: &Blob,
        commitment: &KzgCommitment,
        proof: &KzgProof,
    ) -> Result<bool, KzgError>;

    /// Verifies proofs for parallel lists of blobs, commitments, and proofs.
    fn verify_proof_batch(
        &self,
        blobs: &[Blob],
        commitments: &[KzgCommitment],
        proofs: &[KzgProof],
    ) -> Result<bool, KzgError> {
        if blobs.len() != commitments.len() || blobs.len() != proofs.len() {
            return Ok(false);
        }

        for ((blob, commitment), proof) in blobs.iter().zip(commitments).zip(proofs) {
            if !self.verify_proof(blob, commitment, proof)? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

impl<KzgT: KzgCapability + ?Sized> KzgCapability for &KzgT {
    fn commit(&self, blob: &Blob) -> Result<KzgCommitment, KzgError> {
        (**self).commit(blob)
    }

    fn compute_proof(
        &self,
        blob: &Blob,
        commitment: &KzgCommitment,
    ) -> Result<KzgProof, KzgError> {
        (**self).compute_proof(blob, commitment)
    }

    fn verify_proof(
        &self,
        blob: &Blob,
        commitment: &KzgCommitment,
        proof: &KzgProof,
    ) -> Result<bool, KzgError> {
        (**self).verify_proof(blob, commitment, proof)
    }

    fn verify_proof_batch(
        &self,
        blobs: &[Blob],
        commitments: &[KzgCommitment],
        proofs: &[KzgProof],
    ) -> Result<bool, KzgError> {
        (**self).verify_proof_batch(blobs, commitments, proofs)
    }
}

#[cfg(feature = "c-kzg")]
mod ckzg {
    use super::{Blob, KzgCapability, KzgCommitment, KzgError, KzgProof};

    /// [`KzgCapability`] backed by the `c-kzg` library.
    #[derive(Clone, Copy)]
    pub struct CKzg {
        settings: &'static c_kzg::KzgSettings,
    }

    impl CKzg {
        /// Uses the Ethereum mainnet trusted setup embedded in `c-kzg`. The
        /// setup is loaded on first use and shared afterwards.
        pub fn ethereum() -> Self {
            Self {
                settings: c_kzg::ethereum_kzg_settings(0),
            }
        }

        /// Uses the provided settings.
        pub const fn with_settings(settings: &'static c_kzg::KzgSettings) -> Self {
            Self { settings }
        }
    }

    impl Default for CKzg {
        fn default() -> Self {
            Self::ethereum()
        }
    }

    impl std::fmt::Debug for CKzg {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("CKzg").finish_non_exhaustive()
        }
    }

    fn backend_error(error: c_kzg::Error) -> KzgError {
        KzgError::Backend(format!("{error:?}"))
    }

    fn to_ckzg_blob(blob: &Blob) -> Result<c_kzg::Blob, KzgError> {
        c_kzg::Blob::from_bytes(blob.as_ref()).map_err(backend_error)
    }

    impl KzgCapability for CKzg {
        fn commit(&self, blob: &Blob) -> Result<KzgCommitment, KzgError> {
            let commitment = self
                .settings
                .blob_to_kzg_commitment(&to_ckzg_blob(blob)?)
                .map_err(backend_error)?;

            Ok(KzgCommitment::new(commitment.to_bytes().into_inner()))
        }

        fn compute_proof(
            &self,
            blob: &Blob,
            commitment: &KzgCommitment,
        ) -> Result<KzgProof, KzgError> {
            let proof = self
                .settings
                .compute_blob_kzg_proof(
                    &to_ckzg_blob(blob)?,
                    &c_kzg::Bytes48::from(*commitment.as_bytes()),
                )
                .map_err(backend_error)?;

            Ok(KzgProof::new(proof.to_bytes().into_inner()))
        }

        fn verify_proof(
            &self,
            blob: &Blob,
            commitment: &KzgCommitment,
            proof: &KzgProof,
        ) -> Result<bool, KzgError> {
            self.settings
                .verify_blob_kzg_proof(
                    &to_ckzg_blob(blob)?,
                    &c_kzg::Bytes48::from(*commitment.as_bytes()),
                    &c_kzg::Bytes48::from(*proof.as_bytes()),
                )
                .map_err(backend_error)
        }

        fn verify_proof_batch(
            &self,
            blobs: &[Blob],
            commitments: &[KzgCommitment],
            proofs: &[KzgProof],
        ) -> Result<bool, KzgError> {
            if blobs.len() != commitments.len() || blobs.len() != proofs.len() {
                return Ok(false);
            }

            // c-kzg blobs are 128 KiB; collecting them through an iterator
            // adapter overflows the stack in debug builds.
            let mut ckzg_blobs = Vec::with_capacity(blobs.len());
            for blob in blobs {
                ckzg_blobs.push(to_ckzg_blob(blob)?);
            }
            let commitments: Vec<_> = commitments
                .iter()
                .map(|commitment| c_kzg::Bytes48::from(*commitment.as_bytes()))
                .collect();
            let proofs: Vec<_> = proofs
                .iter()
                .map(|proof| c_kzg::Bytes48::from(*proof.as_bytes()))
                .collect();

            self.settings
                .verify_blob_kzg_proof_batch(&ckzg_blobs, &commitments, &proofs)
                .map_err(backend_error)
        }
    }
}

#[cfg(feature = "c-kzg")]
pub use self::ckzg::CKzg;
