use std::sync::OnceLock;

use quill_primitives::Hash;

use crate::{
    Blob, BlobDecodeError, KzgCapability, KzgCommitment, KzgProof, MAX_BLOBS_PER_TRANSACTION,
    SidecarError, decode_payload, encode_payload,
};

/// The blobs of a transaction with one commitment and one proof per blob.
///
/// The three lists are parallel: entry `i` of each belongs to blob `i`.
#[derive(Debug)]
pub struct BlobSidecar {
    blobs: Vec<Blob>,
    commitments: Vec<KzgCommitment>,
    proofs: Vec<KzgProof>,
    versioned_hashes: OnceLock<Vec<Hash>>,
}

impl BlobSidecar {
    /// Constructs a sidecar from parallel lists.
    ///
    /// The lists must have between one and [`MAX_BLOBS_PER_TRANSACTION`]
    /// entries and equal lengths. Proofs are not verified here; see
    /// [`BlobSidecar::validate`].
    pub fn new(
        blobs: Vec<Blob>,
        commitments: Vec<KzgCommitment>,
        proofs: Vec<KzgProof>,
    ) -> Result<Self, SidecarError> {
        check_blob_count(blobs.len())?;

        if blobs.len() != commitments.len() || blobs.len() != proofs.len() {
            return Err(SidecarError::LengthMismatch {
                blobs: blobs.len(),
                commitments: commitments.len(),
                proofs: proofs.len(),
            });
        }

        Ok(Self {
            blobs,
            commitments,
            proofs,
            versioned_hashes: OnceLock::new(),
        })
    }

    /// Computes a commitment and proof for every blob, in order.
    pub fn from_blobs(blobs: Vec<Blob>, kzg: &impl KzgCapability) -> Result<Self, SidecarError> {
        check_blob_count(blobs.len())?;

        let (commitments, proofs) = blobs
            .iter()
            .map(|blob| {
                let commitment = kzg.commit(blob)?;
                let proof = kzg.compute_proof(blob, &commitment)?;
                Ok((commitment, proof))
            })
            .collect::<Result<(Vec<_>, Vec<_>), SidecarError>>()?;

        Self::new(blobs, commitments, proofs)
    }

    /// Packs `data` into blobs with [`encode_payload`] and builds a sidecar
    /// for them.
    pub fn from_payload(data: &[u8], kzg: &impl KzgCapability) -> Result<Self, SidecarError> {
        Self::from_blobs(encode_payload(data)?, kzg)
    }

    /// Returns the blobs.
    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    /// Returns the commitments.
    pub fn commitments(&self) -> &[KzgCommitment] {
        &self.commitments
    }

    /// Returns the proofs.
    pub fn proofs(&self) -> &[KzgProof] {
        &self.proofs
    }

    /// Returns the number of blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Always false: a sidecar holds at least one blob.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Returns the versioned hash of every commitment, in order.
    pub fn versioned_hashes(&self) -> &[Hash] {
        self.versioned_hashes.get_or_init(|| {
            self.commitments
                .iter()
                .map(KzgCommitment::versioned_hash)
                .collect()
        })
    }

    /// Verifies every (blob, commitment, proof) triple.
    ///
    /// The batch check runs first; when it fails, the triples are checked
    /// individually to report the first failing index.
    pub fn validate(&self, kzg: &impl KzgCapability) -> Result<(), SidecarError> {
        if kzg.verify_proof_batch(&self.blobs, &self.commitments, &self.proofs)? {
            return Ok(());
        }

        for (index, ((blob, commitment), proof)) in self
            .blobs
            .iter()
            .zip(&self.commitments)
            .zip(&self.proofs)
            .enumerate()
        {
            if !kzg.verify_proof(blob, commitment, proof)? {
                return Err(SidecarError::InvalidProof { index });
            }
        }

        log::debug!("Batch KZG verification failed while every single proof verified");
        Err(SidecarError::BatchVerificationFailed)
    }

    /// Checks that the commitments hash to `versioned_hashes`, in order.
    pub fn validate_against(&self, versioned_hashes: &[Hash]) -> Result<(), SidecarError> {
        let actual = self.versioned_hashes();
        if actual.len() != versioned_hashes.len() {
            return Err(SidecarError::VersionedHashCount {
                expected: actual.len(),
                actual: versioned_hashes.len(),
            });
        }

        match versioned_hashes
            .iter()
            .zip(actual)
            .position(|(expected, actual)| expected != actual)
        {
            Some(index) => Err(SidecarError::VersionedHashMismatch {
                index,
                expected: versioned_hashes[index],
                actual: actual[index],
            }),
            None => Ok(()),
        }
    }

    /// Decodes the payload packed by [`BlobSidecar::from_payload`].
    pub fn decode_payload(&self) -> Result<Vec<u8>, BlobDecodeError> {
        decode_payload(&self.blobs)
    }

    /// Returns the parallel lists.
    pub fn into_parts(self) -> (Vec<Blob>, Vec<KzgCommitment>, Vec<KzgProof>) {
        (self.blobs, self.commitments, self.proofs)
    }
}

impl Clone for BlobSidecar {
    fn clone(&self) -> Self {
        Self {
            blobs: self.blobs.clone(),
            commitments: self.commitments.clone(),
            proofs: self.proofs.clone(),
            versioned_hashes: self.versioned_hashes.clone(),
        }
    }
}

impl PartialEq for BlobSidecar {
    fn eq(&self, other: &Self) -> bool {
        self.blobs == other.blobs
            && self.commitments == other.commitments
            && self.proofs == other.proofs
    }
}

impl Eq for BlobSidecar {}

fn check_blob_count(count: usize) -> Result<(), SidecarError> {
    match count {
        0 => Err(SidecarError::Empty),
        count if count > MAX_BLOBS_PER_TRANSACTION => Err(SidecarError::TooManyBlobs {
            count,
            max: MAX_BLOBS_PER_TRANSACTION,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BYTES_PER_COMMITMENT, BYTES_PER_PROOF, KzgError};

    /// Commits to a blob by copying its second field element; proofs are the
    /// commitment itself.
    struct FakeKzg {
        reject_index: Option<usize>,
    }

    impl KzgCapability for FakeKzg {
        fn commit(&self, blob: &Blob) -> Result<KzgCommitment, KzgError> {
            let mut bytes = [0u8; BYTES_PER_COMMITMENT];
            bytes[..32].copy_from_slice(&blob.as_bytes()[32..64]);
            Ok(KzgCommitment::new(bytes))
        }

        fn compute_proof(
            &self,
            _blob: &Blob,
            commitment: &KzgCommitment,
        ) -> Result<KzgProof, KzgError> {
            Ok(KzgProof::new(*commitment.as_bytes()))
        }

        fn verify_proof(
            &self,
            blob: &Blob,
            commitment: &KzgCommitment,
            proof: &KzgProof,
        ) -> Result<bool, KzgError> {
            let rejected = self.reject_index.is_some_and(|index| blob.as_bytes()[63] == index as u8);
            Ok(!rejected && self.commit(blob)? == *commitment && proof.as_bytes() == commitment.as_bytes())
        }
    }

    /// Accepts every single proof but rejects any batch.
    struct BatchRejectingKzg(FakeKzg);

    impl KzgCapability for BatchRejectingKzg {
        fn commit(&self, blob: &Blob) -> Result<KzgCommitment, KzgError> {
            self.0.commit(blob)
        }

        fn compute_proof(
            &self,
            blob: &Blob,
            commitment: &KzgCommitment,
        ) -> Result<KzgProof, KzgError> {
            self.0.compute_proof(blob, commitment)
        }

        fn verify_proof(
            &self,
            blob: &Blob,
            commitment: &KzgCommitment,
            proof: &KzgProof,
        ) -> Result<bool, KzgError> {
            self.0.verify_proof(blob, commitment, proof)
        }

        fn verify_proof_batch(
            &self,
            _blobs: &[Blob],
            _commitments: &[KzgCommitment],
            _proofs: &[KzgProof],
        ) -> Result<bool, KzgError> {
            Ok(false)
        }
    }

    fn blob(marker: u8) -> Blob {
        let mut bytes = Blob::zeroed();
        bytes[63] = marker;
        Blob::new(bytes).expect("zero high bytes")
    }

    #[test]
    fn enforces_counts() {
        assert_eq!(
            BlobSidecar::new(Vec::new(), Vec::new(), Vec::new()),
            Err(SidecarError::Empty)
        );
        assert_eq!(
            BlobSidecar::new((0..7).map(blob).collect(), Vec::new(), Vec::new()),
            Err(SidecarError::TooManyBlobs { count: 7, max: 6 })
        );
        assert_eq!(
            BlobSidecar::new(
                vec![blob(0)],
                vec![KzgCommitment::new([0; BYTES_PER_COMMITMENT])],
                Vec::new()
            ),
            Err(SidecarError::LengthMismatch {
                blobs: 1,
                commitments: 1,
                proofs: 0
            })
        );
        assert_eq!(
            BlobSidecar::new(
                vec![blob(0)],
                vec![KzgCommitment::new([0; BYTES_PER_COMMITMENT])],
                vec![KzgProof::new([0; BYTES_PER_PROOF]); 2]
            ),
            Err(SidecarError::LengthMismatch {
                blobs: 1,
                commitments: 1,
                proofs: 2
            })
        );
    }

    #[test]
    fn preserves_order_and_validates() -> anyhow::Result<()> {
        let kzg = FakeKzg { reject_index: None };
        let sidecar = BlobSidecar::from_blobs((1..=3).map(blob).collect(), &kzg)?;

        for (index, commitment) in sidecar.commitments().iter().enumerate() {
            assert_eq!(commitment.as_bytes()[31], index as u8 + 1);
        }
        sidecar.validate(&kzg)?;

        let rejecting = FakeKzg {
            reject_index: Some(2),
        };
        assert_eq!(
            sidecar.validate(&rejecting),
            Err(SidecarError::InvalidProof { index: 1 })
        );

        Ok(())
    }

    #[test]
    fn batch_failure_without_failing_proof() -> anyhow::Result<()> {
        let kzg = BatchRejectingKzg(FakeKzg { reject_index: None });
        let sidecar = BlobSidecar::from_blobs((1..=2).map(blob).collect(), &kzg)?;

        assert_eq!(
            sidecar.validate(&kzg),
            Err(SidecarError::BatchVerificationFailed)
        );

        Ok(())
    }

    #[test]
    fn versioned_hashes_match_commitments() -> anyhow::Result<()> {
        let kzg = FakeKzg { reject_index: None };
        let sidecar = BlobSidecar::from_blobs(vec![blob(1), blob(2)], &kzg)?;

        let hashes = sidecar.versioned_hashes().to_vec();
        assert_eq!(hashes[0], sidecar.commitments()[0].versioned_hash());
        sidecar.validate_against(&hashes)?;

        assert_eq!(
            sidecar.validate_against(&hashes[..1]),
            Err(SidecarError::VersionedHashCount {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            sidecar.validate_against(&[hashes[0], Hash::ZERO]),
            Err(SidecarError::VersionedHashMismatch {
                index: 1,
                expected: Hash::ZERO,
                actual: hashes[1]
            })
        );

        Ok(())
    }

    #[test]
    fn concurrent_first_access() -> anyhow::Result<()> {
        let kzg = FakeKzg { reject_index: None };
        let sidecar = BlobSidecar::from_blobs((1..=6).map(blob).collect(), &kzg)?;

        let results: Vec<Vec<Hash>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| sidecar.versioned_hashes().to_vec()))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("thread panicked"))
                .collect()
        });

        for hashes in results {
            assert_eq!(hashes, sidecar.versioned_hashes());
        }

        Ok(())
    }
}
