use std::str::FromStr;

use proptest::prelude::*;
use quill_primitives::{Address, Hash, HexData, U256, ValidationError, Wei, hex};

macro_rules! impl_rejects_malformed {
    ($($name:ident: $ty:ty => $input:expr, $pattern:pat,)+) => {
        $(
            paste::item! {
                #[test]
                fn [<rejects_ $name>]() {
                    let result = <$ty>::from_str($input);
                    assert!(
                        matches!(result, Err($pattern)),
                        "unexpected result for {:?}: {result:?}",
                        $input
                    );
                }
            }
        )+
    };
}

impl_rejects_malformed! {
    address_without_prefix: Address => "f39fd6e51aad88f6f4ce6ab8827279cfffb92266", ValidationError::MissingPrefix,
    address_too_short: Address => "0xf39fd6e51aad88f6f4ce6ab8827279cfffb922", ValidationError::InvalidLength { expected: 20, actual: 19 },
    address_too_long: Address => "0xf39fd6e51aad88f6f4ce6ab8827279cfffb9226600", ValidationError::InvalidLength { expected: 20, actual: 21 },
    address_non_hex: Address => "0xf39fd6e51aad88f6f4ce6ab8827279cfffb9226g", ValidationError::InvalidHexCharacter { character: 'g', .. },
    address_odd_length: Address => "0xf39fd6e51aad88f6f4ce6ab8827279cfffb9226", ValidationError::OddLength,
    hash_without_prefix: Hash => "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470", ValidationError::MissingPrefix,
    hash_too_short: Hash => "0xc5d2", ValidationError::InvalidLength { expected: 32, actual: 2 },
    hash_non_hex: Hash => "0xzz", ValidationError::InvalidHexCharacter { character: 'z', index: 0 },
    hex_data_non_hex: HexData => "0x12zz", ValidationError::InvalidHexCharacter { .. },
    hex_data_without_prefix: HexData => "1234", ValidationError::MissingPrefix,
    wei_negative: Wei => "-1", ValidationError::Negative(_),
}

proptest! {
    #[test]
    fn mixed_case_normalizes(bytes in any::<[u8; 20]>(), mask in any::<u64>()) {
        let lower = hex::encode(bytes);
        let mixed: String = lower
            .chars()
            .enumerate()
            .map(|(index, character)| {
                if (mask >> (index % 64)) & 1 == 1 {
                    character.to_ascii_uppercase()
                } else {
                    character
                }
            })
            .collect();

        let from_lower = Address::from_str(&format!("0x{lower}"))?;
        let from_mixed = Address::from_str(&format!("0x{mixed}"))?;
        prop_assert_eq!(from_lower, from_mixed);
        prop_assert_eq!(from_mixed.to_string(), format!("0x{lower}"));
    }

    #[test]
    fn hex_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let encoded = hex::encode_prefixed(&bytes);
        prop_assert_eq!(hex::decode_prefixed(&encoded)?, bytes.clone());

        let data = HexData::from_hex_str(&encoded)?;
        prop_assert_eq!(data.as_bytes(), bytes.as_slice());
        let from_bytes = HexData::from_bytes(bytes);
        prop_assert_eq!(from_bytes.as_hex(), encoded.as_str());
    }

    #[test]
    fn ether_format_is_exact(limbs in any::<[u64; 2]>()) {
        let wei = Wei::from_wei(U256::from_limbs([limbs[0], limbs[1], 0, 0]));

        prop_assert_eq!(Wei::parse_ether(&wei.format_ether())?, wei);
        prop_assert_eq!(Wei::parse_gwei(&wei.format_gwei())?, wei);
    }
}
