use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{B256, U256};

use crate::{AbiValue, EncodeError, TypeSchema, WORD_SIZE, schema::is_valid_int_width};

/// Encodes a sequence of values as the parameters of a call, i.e. as the
/// components of a tuple without an outer offset.
pub fn encode(values: &[AbiValue]) -> Result<Vec<u8>, EncodeError> {
    for value in values {
        type_check(value)?;
    }

    Ok(DynSolValue::Tuple(values.iter().map(to_sol_value).collect()).abi_encode_params())
}

/// Checks that every width, fixed length, and array element type is
/// consistent, so that encoding cannot fail afterwards.
pub(crate) fn type_check(value: &AbiValue) -> Result<(), EncodeError> {
    match value {
        AbiValue::UInt(number, bits) => {
            if !is_valid_int_width(*bits) {
                return Err(EncodeError::InvalidWidth { ty: "uint", bits: *bits });
            }
            if *bits < 256 && (*number >> *bits) != U256::ZERO {
                return Err(EncodeError::OutOfRange(format!("uint{bits}")));
            }
        }
        AbiValue::Int(number, bits) => {
            if !is_valid_int_width(*bits) {
                return Err(EncodeError::InvalidWidth { ty: "int", bits: *bits });
            }
            // Bits above the sign bit must all equal it.
            let high = number.into_raw() >> (*bits - 1);
            if high != U256::ZERO && high != (U256::MAX >> (*bits - 1)) {
                return Err(EncodeError::OutOfRange(format!("int{bits}")));
            }
        }
        AbiValue::FixedBytes(bytes) => {
            if !(1..=WORD_SIZE).contains(&bytes.len()) {
                return Err(EncodeError::InvalidWidth {
                    ty: "bytes",
                    bits: bytes.len() * 8,
                });
            }
        }
        AbiValue::Array(element, values) => check_elements(element, values)?,
        AbiValue::FixedArray(element, values) => check_elements(element, values)?,
        AbiValue::Tuple(values) => {
            for value in values {
                type_check(value)?;
            }
        }
        AbiValue::Bool(_) | AbiValue::Address(_) | AbiValue::Bytes(_) | AbiValue::String(_) => {}
    }

    Ok(())
}

fn check_elements(element: &TypeSchema, values: &[AbiValue]) -> Result<(), EncodeError> {
    for value in values {
        type_check(value)?;

        let actual = value.schema();
        if actual != *element {
            return Err(EncodeError::ElementMismatch {
                expected: element.canonical(),
                actual: actual.canonical(),
            });
        }
    }

    Ok(())
}

/// Converts a type-checked value into its `alloy-dyn-abi` counterpart.
fn to_sol_value(value: &AbiValue) -> DynSolValue {
    match value {
        AbiValue::UInt(number, bits) => DynSolValue::Uint(*number, *bits),
        AbiValue::Int(number, bits) => DynSolValue::Int(*number, *bits),
        AbiValue::Bool(value) => DynSolValue::Bool(*value),
        AbiValue::Address(address) => DynSolValue::Address((*address).into()),
        AbiValue::FixedBytes(bytes) => {
            let size = bytes.len().min(WORD_SIZE);
            let mut word = B256::ZERO;
            word[..size].copy_from_slice(&bytes[..size]);
            DynSolValue::FixedBytes(word, size)
        }
        AbiValue::Bytes(bytes) => DynSolValue::Bytes(bytes.clone()),
        AbiValue::String(value) => DynSolValue::String(value.clone()),
        AbiValue::Array(_, values) => DynSolValue::Array(values.iter().map(to_sol_value).collect()),
        AbiValue::FixedArray(_, values) => {
            DynSolValue::FixedArray(values.iter().map(to_sol_value).collect())
        }
        AbiValue::Tuple(values) => DynSolValue::Tuple(values.iter().map(to_sol_value).collect()),
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::I256;
    use quill_primitives::{Address, hex};

    use super::*;

    fn words(encoded: &[u8]) -> Vec<String> {
        encoded.chunks(WORD_SIZE).map(hex::encode).collect()
    }

    #[test]
    fn static_and_dynamic_params() -> anyhow::Result<()> {
        // f(uint256,string) with (1, "abc")
        let encoded = encode(&[
            AbiValue::uint256(U256::from(1u64)),
            AbiValue::string("abc"),
        ])?;

        assert_eq!(
            words(&encoded),
            [
                "0000000000000000000000000000000000000000000000000000000000000001",
                "0000000000000000000000000000000000000000000000000000000000000040",
                "0000000000000000000000000000000000000000000000000000000000000003",
                "6162630000000000000000000000000000000000000000000000000000000000",
            ]
        );

        Ok(())
    }

    #[test]
    fn negative_int_is_twos_complement() -> anyhow::Result<()> {
        let encoded = encode(&[AbiValue::Int(I256::MINUS_ONE, 8)])?;
        assert_eq!(encoded, vec![0xff; 32]);

        Ok(())
    }

    #[test]
    fn address_is_left_padded() -> anyhow::Result<()> {
        let encoded = encode(&[AbiValue::Address(Address::new([0x11; 20]))])?;
        assert_eq!(&encoded[..12], &[0u8; 12]);
        assert_eq!(&encoded[12..], &[0x11; 20]);

        Ok(())
    }

    #[test]
    fn fixed_bytes_are_right_padded() -> anyhow::Result<()> {
        let encoded = encode(&[AbiValue::FixedBytes(vec![0xab, 0xcd])])?;
        assert_eq!(&encoded[..2], &[0xab, 0xcd]);
        assert_eq!(&encoded[2..], &[0u8; 30]);

        Ok(())
    }

    #[test]
    fn empty_params_encode_to_nothing() -> anyhow::Result<()> {
        assert!(encode(&[])?.is_empty());

        Ok(())
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            encode(&[AbiValue::UInt(U256::from(256u64), 8)]),
            Err(EncodeError::OutOfRange("uint8".to_string()))
        );
        assert_eq!(
            encode(&[AbiValue::Int(I256::try_from(128i64).unwrap(), 8)]),
            Err(EncodeError::OutOfRange("int8".to_string()))
        );
        assert!(encode(&[AbiValue::Int(I256::try_from(-128i64).unwrap(), 8)]).is_ok());
        assert!(matches!(
            encode(&[AbiValue::FixedBytes(vec![0; 33])]),
            Err(EncodeError::InvalidWidth { .. })
        ));
    }

    #[test]
    fn rejects_heterogeneous_arrays() {
        let result = encode(&[AbiValue::Array(
            TypeSchema::UInt(256),
            vec![AbiValue::Bool(true)],
        )]);

        assert_eq!(
            result,
            Err(EncodeError::ElementMismatch {
                expected: "uint256".to_string(),
                actual: "bool".to_string(),
            })
        );
    }
}
