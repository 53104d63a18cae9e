use k256::SecretKey;
use quill_primitives::{Hash, keccak256};
use quill_signer::{LocalSigner, SECP256K1_HALF_ORDER, Signature, Signer};
use rand::{Rng, SeedableRng, rngs::StdRng};

const PAIRS: usize = 10_000;

fn random_secret_key(rng: &mut StdRng) -> SecretKey {
    loop {
        let bytes: [u8; 32] = rng.random();
        // Zero and values above the curve order are rejected; draw again.
        if let Ok(secret_key) = SecretKey::from_slice(&bytes) {
            return secret_key;
        }
    }
}

#[test]
fn recover_inverts_sign() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..PAIRS {
        let signer = LocalSigner::new(random_secret_key(&mut rng));

        let length = rng.random_range(0..96);
        let message: Vec<u8> = (0..length).map(|_| rng.random()).collect();
        let hash = keccak256(&message);

        let signature = signer.sign_hash(&hash)?;
        assert!(signature.s <= SECP256K1_HALF_ORDER, "high-S for {hash}");
        assert!(signature.v <= 1);
        assert_eq!(signature.recover(&hash)?, signer.address(), "hash {hash}");
    }

    Ok(())
}

#[test]
fn signing_is_deterministic() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..100 {
        let secret_key = random_secret_key(&mut rng);
        let hash = Hash::new(rng.random());

        let first = Signature::sign_hash(&hash, &secret_key)?;
        let second = Signature::sign_hash(&hash, &secret_key)?;
        assert_eq!(first.to_bytes(), second.to_bytes());
    }

    Ok(())
}

#[test]
fn concurrent_signing() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(11);
    let signer = LocalSigner::new(random_secret_key(&mut rng));
    let hashes: Vec<Hash> = (0..64).map(|_| Hash::new(rng.random())).collect();

    let expected = hashes
        .iter()
        .map(|hash| signer.sign_hash(hash))
        .collect::<Result<Vec<_>, _>>()?;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| hashes.iter().map(|hash| signer.sign_hash(hash)).collect::<Vec<_>>()))
            .collect();

        for handle in handles {
            let signatures = handle.join().expect("signing thread panicked");
            for (signature, expected) in signatures.into_iter().zip(&expected) {
                assert_eq!(signature.ok().as_ref(), Some(expected));
            }
        }
    });

    Ok(())
}
