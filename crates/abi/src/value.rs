use std::fmt;

use alloy_primitives::{I256, U256};
use quill_primitives::Address;

use crate::TypeSchema;

/// A typed ABI value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiValue {
    /// An unsigned integer and its width in bits.
    UInt(U256, usize),
    /// A signed integer and its width in bits.
    Int(I256, usize),
    /// A boolean.
    Bool(bool),
    /// An address.
    Address(Address),
    /// A fixed-size byte array of 1 to 32 bytes.
    FixedBytes(Vec<u8>),
    /// A dynamic byte array.
    Bytes(Vec<u8>),
    /// A UTF-8 string.
    String(String),
    /// A dynamic array and its element type.
    Array(TypeSchema, Vec<AbiValue>),
    /// A fixed-size array and its element type.
    FixedArray(TypeSchema, Vec<AbiValue>),
    /// A tuple.
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    /// A `uint256`.
    pub fn uint256(value: U256) -> Self {
        AbiValue::UInt(value, 256)
    }

    /// An `int256`.
    pub fn int256(value: I256) -> Self {
        AbiValue::Int(value, 256)
    }

    /// A `bytes32`.
    pub fn bytes32(value: [u8; 32]) -> Self {
        AbiValue::FixedBytes(value.to_vec())
    }

    /// A `string`.
    pub fn string(value: impl Into<String>) -> Self {
        AbiValue::String(value.into())
    }

    /// Returns the schema describing this value.
    pub fn schema(&self) -> TypeSchema {
        match self {
            AbiValue::UInt(_, bits) => TypeSchema::UInt(*bits),
            AbiValue::Int(_, bits) => TypeSchema::Int(*bits),
            AbiValue::Bool(_) => TypeSchema::Bool,
            AbiValue::Address(_) => TypeSchema::Address,
            AbiValue::FixedBytes(bytes) => TypeSchema::FixedBytes(bytes.len()),
            AbiValue::Bytes(_) => TypeSchema::Bytes,
            AbiValue::String(_) => TypeSchema::String,
            AbiValue::Array(element, _) => TypeSchema::Array(Box::new(element.clone())),
            AbiValue::FixedArray(element, values) => {
                TypeSchema::FixedArray(Box::new(element.clone()), values.len())
            }
            AbiValue::Tuple(values) => {
                TypeSchema::Tuple(values.iter().map(AbiValue::schema).collect())
            }
        }
    }

    /// Returns the unsigned integer, if this is one.
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            AbiValue::UInt(value, _) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AbiValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the address, if this is one.
    pub fn as_address(&self) -> Option<Address> {
        match self {
            AbiValue::Address(address) => Some(*address),
            _ => None,
        }
    }
}

impl From<Address> for AbiValue {
    fn from(address: Address) -> Self {
        AbiValue::Address(address)
    }
}

impl From<bool> for AbiValue {
    fn from(value: bool) -> Self {
        AbiValue::Bool(value)
    }
}

impl From<U256> for AbiValue {
    fn from(value: U256) -> Self {
        AbiValue::uint256(value)
    }
}

/// Human-readable form used in decoded revert reasons: integers in decimal,
/// byte arrays and addresses in hex, strings quoted.
impl fmt::Display for AbiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_list(f: &mut fmt::Formatter<'_>, values: &[AbiValue]) -> fmt::Result {
            for (index, value) in values.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{value}")?;
            }
            Ok(())
        }

        match self {
            AbiValue::UInt(value, _) => write!(f, "{value}"),
            AbiValue::Int(value, _) => write!(f, "{value}"),
            AbiValue::Bool(value) => write!(f, "{value}"),
            AbiValue::Address(address) => write!(f, "{address}"),
            AbiValue::FixedBytes(bytes) | AbiValue::Bytes(bytes) => {
                f.write_str(&quill_primitives::hex::encode_prefixed(bytes))
            }
            AbiValue::String(value) => write!(f, "{value:?}"),
            AbiValue::Array(_, values) | AbiValue::FixedArray(_, values) => {
                f.write_str("[")?;
                write_list(f, values)?;
                f.write_str("]")
            }
            AbiValue::Tuple(values) => {
                f.write_str("(")?;
                write_list(f, values)?;
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_of_nested_value() {
        let value = AbiValue::Array(
            TypeSchema::Tuple(vec![TypeSchema::Bool, TypeSchema::String]),
            vec![AbiValue::Tuple(vec![
                AbiValue::Bool(true),
                AbiValue::string("x"),
            ])],
        );

        assert_eq!(value.schema().canonical(), "(bool,string)[]");
    }

    #[test]
    fn display() {
        let value = AbiValue::Tuple(vec![
            AbiValue::uint256(U256::from(7u64)),
            AbiValue::Int(I256::MINUS_ONE, 8),
            AbiValue::string("hi"),
            AbiValue::Bytes(vec![0xab]),
        ]);

        assert_eq!(value.to_string(), "(7, -1, \"hi\", 0xab)");
    }
}
