use proptest::prelude::*;
use quill_rlp::{
    DecodeError, Decoder, Encodable, RlpItem, decode, encode, encode_list, encode_string,
};

macro_rules! impl_string_boundary_test {
    ($($length:literal => $prefix:expr),+ $(,)?) => {
        $(
            paste::item! {
                #[test]
                fn [<string_of_length_ $length>]() -> anyhow::Result<()> {
                    let payload = vec![0xaa; $length];
                    let encoded = encode_string(&payload);

                    let prefix: &[u8] = &$prefix;
                    assert_eq!(&encoded[..prefix.len()], prefix);
                    assert_eq!(encoded.len(), prefix.len() + $length);
                    assert_eq!(decode(&encoded)?, RlpItem::Bytes(payload));

                    Ok(())
                }

                #[test]
                fn [<list_of_length_ $length>]() -> anyhow::Result<()> {
                    // Single bytes below 0x80 encode as themselves, so the
                    // payload length equals the item count.
                    let items = vec![RlpItem::Bytes(vec![0x01]); $length];
                    let encoded = encode_list(&items);

                    let mut prefix: Vec<u8> = $prefix.to_vec();
                    prefix[0] += 0x40;
                    assert_eq!(&encoded[..prefix.len()], prefix.as_slice());
                    assert_eq!(decode(&encoded)?, RlpItem::List(items));

                    Ok(())
                }
            }
        )+
    };
}

impl_string_boundary_test! {
    0 => [0x80],
    2 => [0x82],
    55 => [0xb7],
    56 => [0xb8, 56],
    255 => [0xb8, 0xff],
    256 => [0xb9, 0x01, 0x00],
}

#[test]
fn single_byte_boundary() -> anyhow::Result<()> {
    assert_eq!(encode_string(&[0x7f]), vec![0x7f]);
    assert_eq!(encode_string(&[0x80]), vec![0x81, 0x80]);
    assert_eq!(decode(&[0x7f])?, RlpItem::Bytes(vec![0x7f]));

    Ok(())
}

#[test]
fn truncated_inputs_are_rejected() {
    let encoded = encode_string(&[0xaa; 300]);
    for cut in 0..encoded.len() {
        let result = decode(&encoded[..cut]);
        assert!(
            matches!(result, Err(DecodeError::InputTooShort)),
            "cut at {cut}: {result:?}"
        );
    }
}

#[test]
fn integers_round_trip() -> anyhow::Result<()> {
    for value in [0u64, 1, 0x7f, 0x80, 0xff, 0x100, 0xffff, 1 << 32, u64::MAX] {
        let encoded = encode(&value);
        let mut decoder = Decoder::new(&encoded);

        assert_eq!(decoder.decode_u64()?, value);
        decoder.finish()?;
    }

    Ok(())
}

fn arb_item() -> impl Strategy<Value = RlpItem> {
    let leaf = prop::collection::vec(any::<u8>(), 0..80).prop_map(RlpItem::Bytes);
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop::collection::vec(inner, 0..8).prop_map(RlpItem::List)
    })
}

proptest! {
    #[test]
    fn item_round_trip(item in arb_item()) {
        let encoded = encode(&item);
        prop_assert_eq!(encoded.len(), item.length());
        prop_assert_eq!(decode(&encoded)?, item);
    }

    #[test]
    fn garbage_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..300)) {
        let _result = decode(&bytes);
    }

    #[test]
    fn u256_round_trip(limbs in any::<[u64; 4]>()) {
        let value = alloy_primitives::U256::from_limbs(limbs);
        let encoded = encode(&value);
        prop_assert_eq!(Decoder::new(&encoded).decode_u256()?, value);
    }
}
