use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::U256;
use quill_primitives::Address;

use crate::{AbiValue, DecodeError, TypeSchema, WORD_SIZE, schema::is_valid_int_width};

/// Decodes call parameters or return data laid out as the components of a
/// tuple.
///
/// Offsets and lengths are bounds-checked by `alloy-dyn-abi`. On top of that
/// every word must be a canonical encoding of its declared type: zero
/// padding, booleans of 0 or 1, and integers that fit their width. Strings
/// must be valid UTF-8. Trailing bytes after the last referenced region are
/// ignored.
pub fn decode(data: &[u8], schemas: &[TypeSchema]) -> Result<Vec<AbiValue>, DecodeError> {
    for schema in schemas {
        check_widths(schema)?;
    }

    let head_size = schemas
        .iter()
        .try_fold(0usize, |sum, schema| sum.checked_add(schema.head_size()?))
        .ok_or(DecodeError::Overflow)?;
    if head_size > data.len() {
        return Err(DecodeError::OutOfBounds {
            offset: 0,
            length: head_size,
            available: data.len(),
        });
    }

    let raw_types = DynSolType::Tuple(schemas.iter().map(raw_type).collect());
    match raw_types.abi_decode_sequence(data)? {
        DynSolValue::Tuple(values) if values.len() == schemas.len() => schemas
            .iter()
            .zip(values)
            .map(|(schema, value)| from_raw(schema, value))
            .collect(),
        _ => Err(DecodeError::InvalidValue(
            TypeSchema::Tuple(schemas.to_vec()).canonical(),
        )),
    }
}

fn check_widths(schema: &TypeSchema) -> Result<(), DecodeError> {
    let valid = match schema {
        TypeSchema::UInt(bits) | TypeSchema::Int(bits) => is_valid_int_width(*bits),
        TypeSchema::FixedBytes(size) => (1..=WORD_SIZE).contains(size),
        TypeSchema::Array(element) | TypeSchema::FixedArray(element, _) => {
            return check_widths(element);
        }
        TypeSchema::Tuple(components) => return components.iter().try_for_each(check_widths),
        TypeSchema::Bool | TypeSchema::Address | TypeSchema::Bytes | TypeSchema::String => true,
    };

    if valid {
        Ok(())
    } else {
        Err(DecodeError::InvalidValue(schema.canonical()))
    }
}

/// The type the data is decoded as before validation. `alloy-dyn-abi` drops
/// the high bits of booleans and addresses and replaces invalid UTF-8, so
/// those are read as full words and raw bytes instead.
fn raw_type(schema: &TypeSchema) -> DynSolType {
    match schema {
        TypeSchema::Bool | TypeSchema::Address => DynSolType::Uint(256),
        TypeSchema::String => DynSolType::Bytes,
        TypeSchema::Array(element) => DynSolType::Array(Box::new(raw_type(element))),
        TypeSchema::FixedArray(element, length) => {
            DynSolType::FixedArray(Box::new(raw_type(element)), *length)
        }
        TypeSchema::Tuple(components) => {
            DynSolType::Tuple(components.iter().map(raw_type).collect())
        }
        TypeSchema::UInt(_)
        | TypeSchema::Int(_)
        | TypeSchema::FixedBytes(_)
        | TypeSchema::Bytes => DynSolType::from(schema),
    }
}

fn from_raw(schema: &TypeSchema, value: DynSolValue) -> Result<AbiValue, DecodeError> {
    let invalid = || DecodeError::InvalidValue(schema.canonical());

    let value = match (schema, value) {
        (TypeSchema::UInt(bits), DynSolValue::Uint(number, _))
            if *bits == 256 || (number >> *bits).is_zero() =>
        {
            AbiValue::UInt(number, *bits)
        }
        (TypeSchema::Int(bits), DynSolValue::Int(number, _)) => {
            // Bits above the sign bit must all equal it.
            let high = number.into_raw() >> (*bits - 1);
            if !high.is_zero() && high != (U256::MAX >> (*bits - 1)) {
                return Err(invalid());
            }

            AbiValue::Int(number, *bits)
        }
        (TypeSchema::Bool, DynSolValue::Uint(word, _)) if word <= U256::from(1u8) => {
            AbiValue::Bool(!word.is_zero())
        }
        (TypeSchema::Address, DynSolValue::Uint(word, _)) if (word >> 160usize).is_zero() => {
            let bytes = word.to_be_bytes::<WORD_SIZE>();
            AbiValue::Address(Address::from_slice(&bytes[12..]).map_err(|_error| invalid())?)
        }
        (TypeSchema::FixedBytes(size), DynSolValue::FixedBytes(word, _))
            if word[*size..].iter().all(|byte| *byte == 0) =>
        {
            AbiValue::FixedBytes(word[..*size].to_vec())
        }
        (TypeSchema::Bytes, DynSolValue::Bytes(bytes)) => AbiValue::Bytes(bytes),
        (TypeSchema::String, DynSolValue::Bytes(bytes)) => {
            AbiValue::String(String::from_utf8(bytes).map_err(|_error| DecodeError::InvalidUtf8)?)
        }
        (TypeSchema::Array(element), DynSolValue::Array(values)) => AbiValue::Array(
            (**element).clone(),
            values
                .into_iter()
                .map(|value| from_raw(element, value))
                .collect::<Result<_, _>>()?,
        ),
        (TypeSchema::FixedArray(element, _), DynSolValue::FixedArray(values)) => {
            AbiValue::FixedArray(
                (**element).clone(),
                values
                    .into_iter()
                    .map(|value| from_raw(element, value))
                    .collect::<Result<_, _>>()?,
            )
        }
        (TypeSchema::Tuple(components), DynSolValue::Tuple(values))
            if components.len() == values.len() =>
        {
            AbiValue::Tuple(
                components
                    .iter()
                    .zip(values)
                    .map(|(component, value)| from_raw(component, value))
                    .collect::<Result<_, _>>()?,
            )
        }
        _ => return Err(invalid()),
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::I256;

    use super::*;
    use crate::encode;

    #[test]
    fn rejects_offset_past_end() {
        let mut data = vec![0u8; 32];
        data[31] = 0x40;

        assert!(matches!(
            decode(&data, &[TypeSchema::String]),
            Err(DecodeError::Abi(_))
        ));
    }

    #[test]
    fn rejects_huge_offset() {
        let data = vec![0xff; 32];

        assert!(matches!(
            decode(&data, &[TypeSchema::Bytes]),
            Err(DecodeError::Abi(_))
        ));
    }

    #[test]
    fn rejects_truncated_head() {
        assert_eq!(
            decode(&[0u8; 40], &[TypeSchema::UInt(256), TypeSchema::Bool]),
            Err(DecodeError::OutOfBounds {
                offset: 0,
                length: 64,
                available: 40,
            })
        );
    }

    #[test]
    fn rejects_oversized_static_array() -> anyhow::Result<()> {
        let schema = TypeSchema::parse("uint256[576460752303423488]")?;

        assert_eq!(decode(&[0u8; 64], &[schema]), Err(DecodeError::Overflow));

        Ok(())
    }

    #[test]
    fn rejects_length_past_end() {
        // offset 0x20, length 0x40, but only 8 bytes of data
        let mut data = vec![0u8; 72];
        data[31] = 0x20;
        data[63] = 0x40;

        assert!(decode(&data, &[TypeSchema::Bytes]).is_err());
    }

    #[test]
    fn rejects_huge_array_length() {
        let mut data = vec![0u8; 64];
        data[31] = 0x20;
        data[56..64].copy_from_slice(&u64::MAX.to_be_bytes()[..]);

        assert!(decode(&data, &[TypeSchema::Array(Box::new(TypeSchema::UInt(256)))]).is_err());
    }

    #[test]
    fn rejects_dirty_values() {
        let mut word = vec![0u8; 32];
        word[31] = 2;
        assert_eq!(
            decode(&word, &[TypeSchema::Bool]),
            Err(DecodeError::InvalidValue("bool".to_string()))
        );

        word[0] = 1;
        assert_eq!(
            decode(&word, &[TypeSchema::Address]),
            Err(DecodeError::InvalidValue("address".to_string()))
        );
        assert_eq!(
            decode(&word, &[TypeSchema::UInt(8)]),
            Err(DecodeError::InvalidValue("uint8".to_string()))
        );
        assert_eq!(
            decode(&word, &[TypeSchema::FixedBytes(4)]),
            Err(DecodeError::InvalidValue("bytes4".to_string()))
        );
    }

    #[test]
    fn rejects_int_without_sign_extension() {
        // 0x80 is -128 as an int8 only when the upper bytes are all 0xff.
        let mut word = vec![0u8; 32];
        word[31] = 0x80;

        assert_eq!(
            decode(&word, &[TypeSchema::Int(8)]),
            Err(DecodeError::InvalidValue("int8".to_string()))
        );
    }

    #[test]
    fn rejects_invalid_utf8() -> anyhow::Result<()> {
        let encoded = encode(&[AbiValue::Bytes(vec![0xff, 0xfe])])?;

        assert_eq!(
            decode(&encoded, &[TypeSchema::String]),
            Err(DecodeError::InvalidUtf8)
        );

        Ok(())
    }

    #[test]
    fn rejects_invalid_width() {
        assert_eq!(
            decode(&[0u8; 32], &[TypeSchema::UInt(7)]),
            Err(DecodeError::InvalidValue("uint7".to_string()))
        );
    }

    #[test]
    fn truncated_input_never_panics() -> anyhow::Result<()> {
        let schemas = [
            TypeSchema::parse("(uint8,string)[]")?,
            TypeSchema::parse("bytes[2]")?,
        ];
        let encoded = encode(&[
            AbiValue::Array(
                TypeSchema::parse("(uint8,string)")?,
                vec![AbiValue::Tuple(vec![
                    AbiValue::UInt(U256::from(3u64), 8),
                    AbiValue::string("three"),
                ])],
            ),
            AbiValue::FixedArray(
                TypeSchema::Bytes,
                vec![AbiValue::Bytes(vec![1; 40]), AbiValue::Bytes(Vec::new())],
            ),
        ])?;

        for cut in 0..encoded.len() {
            assert!(decode(&encoded[..cut], &schemas).is_err(), "cut at {cut}");
        }
        assert!(decode(&encoded, &schemas).is_ok());

        Ok(())
    }

    #[test]
    fn ignores_trailing_bytes() -> anyhow::Result<()> {
        let value = AbiValue::uint256(U256::from(9u64));
        let mut encoded = encode(std::slice::from_ref(&value))?;
        encoded.extend_from_slice(&[0xaa; 7]);

        assert_eq!(decode(&encoded, &[TypeSchema::UInt(256)])?, vec![value]);

        Ok(())
    }

    #[test]
    fn signed_round_trip() -> anyhow::Result<()> {
        let value = AbiValue::Int(I256::try_from(-129i64).unwrap(), 16);
        let encoded = encode(std::slice::from_ref(&value))?;

        assert_eq!(decode(&encoded, &[TypeSchema::Int(16)])?, vec![value]);

        Ok(())
    }
}
