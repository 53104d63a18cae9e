use quill_eip4844::{
    BYTES_PER_BLOB, LENGTH_PREFIX_BYTES, MAX_BLOBS_PER_TRANSACTION, MAX_PAYLOAD_SIZE,
    USABLE_BYTES_PER_BLOB, decode_payload, encode_payload,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn random_payload(size: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(size as u64);
    let mut data = vec![0u8; size];
    rng.fill(data.as_mut_slice());
    data
}

macro_rules! impl_round_trip_tests {
    ($($name:ident: $size:expr => $blobs:expr,)+) => {
        $(
            paste::item! {
                #[test]
                fn [<round_trip_ $name>]() -> anyhow::Result<()> {
                    let data = random_payload($size);
                    let blobs = encode_payload(&data)?;

                    assert_eq!(blobs.len(), $blobs);
                    for blob in &blobs {
                        assert_eq!(blob.as_bytes().len(), BYTES_PER_BLOB);
                        assert!(blob.field_elements().all(|element| element[0] == 0));
                    }
                    assert_eq!(decode_payload(&blobs)?, data);

                    Ok(())
                }
            }
        )+
    };
}

impl_round_trip_tests! {
    empty: 0 => 1,
    single_byte: 1 => 1,
    one_full_blob: USABLE_BYTES_PER_BLOB - LENGTH_PREFIX_BYTES => 1,
    one_blob_plus_one: USABLE_BYTES_PER_BLOB - LENGTH_PREFIX_BYTES + 1 => 2,
    max: MAX_PAYLOAD_SIZE => MAX_BLOBS_PER_TRANSACTION,
}

#[test]
fn max_payload_size() {
    assert_eq!(USABLE_BYTES_PER_BLOB, 126_976);
    assert_eq!(MAX_PAYLOAD_SIZE, 6 * 126_976 - 8);
    assert!(encode_payload(&random_payload(MAX_PAYLOAD_SIZE + 1)).is_err());
}

#[cfg(feature = "c-kzg")]
mod ckzg_backend {
    use quill_eip4844::{BlobSidecar, CKzg, KzgProof, SidecarError, VERSIONED_HASH_VERSION_KZG};

    use super::random_payload;

    #[test]
    fn sidecar_from_payload_verifies() -> anyhow::Result<()> {
        let kzg = CKzg::ethereum();
        let data = random_payload(1000);

        let sidecar = BlobSidecar::from_payload(&data, &kzg)?;
        assert_eq!(sidecar.len(), 1);
        sidecar.validate(&kzg)?;
        assert_eq!(sidecar.decode_payload()?, data);

        let versioned_hash = sidecar.versioned_hashes()[0];
        assert_eq!(versioned_hash.as_bytes()[0], VERSIONED_HASH_VERSION_KZG);

        Ok(())
    }

    #[test]
    fn multi_blob_sidecar_verifies_in_one_batch() -> anyhow::Result<()> {
        let kzg = CKzg::ethereum();
        let data = random_payload(3 * super::USABLE_BYTES_PER_BLOB);

        let sidecar = BlobSidecar::from_payload(&data, &kzg)?;
        assert_eq!(sidecar.len(), 4);

        let (blobs, commitments, proofs) = sidecar.clone().into_parts();
        assert!(quill_eip4844::KzgCapability::verify_proof_batch(
            &kzg,
            &blobs,
            &commitments,
            &proofs
        )?);
        sidecar.validate(&kzg)?;

        Ok(())
    }

    #[test]
    fn tampered_proof_is_rejected() -> anyhow::Result<()> {
        let kzg = CKzg::ethereum();
        let first = BlobSidecar::from_payload(b"first", &kzg)?;
        let second = BlobSidecar::from_payload(b"second", &kzg)?;

        let (blobs, commitments, _proofs) = first.into_parts();
        let swapped: Vec<KzgProof> = second.proofs().to_vec();
        let tampered = BlobSidecar::new(blobs, commitments, swapped)?;

        assert!(matches!(
            tampered.validate(&kzg),
            Err(SidecarError::InvalidProof { index: 0 } | SidecarError::Kzg(_))
        ));

        Ok(())
    }
}
