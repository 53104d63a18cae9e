use std::{fmt, str::FromStr};

use alloy_dyn_abi::DynSolType;

use crate::{ParseError, WORD_SIZE};

/// The shape of an ABI value, independent of any particular value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeSchema {
    /// `uint<bits>`
    UInt(usize),
    /// `int<bits>`
    Int(usize),
    /// `bool`
    Bool,
    /// `address`
    Address,
    /// `bytes<size>`, 1 to 32 bytes
    FixedBytes(usize),
    /// `bytes`
    Bytes,
    /// `string`
    String,
    /// `T[]`
    Array(Box<TypeSchema>),
    /// `T[N]`
    FixedArray(Box<TypeSchema>, usize),
    /// `(T1,T2,...)`
    Tuple(Vec<TypeSchema>),
}

impl TypeSchema {
    /// Parses a type string such as `uint256`, `bytes32[]`, or
    /// `(address,uint256)[2]`.
    ///
    /// `uint` and `int` are accepted as aliases for their 256-bit forms.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::Empty);
        }

        // Array suffixes bind last, so peel them from the right.
        if let Some(stripped) = input.strip_suffix(']') {
            let open = stripped
                .rfind('[')
                .ok_or_else(|| ParseError::Unbalanced(input.to_string()))?;
            let element = Box::new(Self::parse(&stripped[..open])?);
            let length = &stripped[open + 1..];

            return if length.is_empty() {
                Ok(TypeSchema::Array(element))
            } else {
                length
                    .parse()
                    .map(|length| TypeSchema::FixedArray(element, length))
                    .map_err(|_error| ParseError::UnknownType(input.to_string()))
            };
        }

        if let Some(inner) = input.strip_prefix('(') {
            let inner = inner
                .strip_suffix(')')
                .ok_or_else(|| ParseError::Unbalanced(input.to_string()))?;

            return split_top_level(inner)?
                .into_iter()
                .map(Self::parse)
                .collect::<Result<_, _>>()
                .map(TypeSchema::Tuple);
        }

        parse_elementary(input)
    }

    /// Returns the canonical type string used in signatures.
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// Whether values of this type are encoded in the tail.
    pub fn is_dynamic(&self) -> bool {
        match self {
            TypeSchema::Bytes | TypeSchema::String | TypeSchema::Array(_) => true,
            TypeSchema::FixedArray(element, _) => element.is_dynamic(),
            TypeSchema::Tuple(components) => components.iter().any(TypeSchema::is_dynamic),
            TypeSchema::UInt(_)
            | TypeSchema::Int(_)
            | TypeSchema::Bool
            | TypeSchema::Address
            | TypeSchema::FixedBytes(_) => false,
        }
    }

    /// Number of bytes this type occupies in the head of its enclosing
    /// tuple: one offset word if dynamic, the full encoding otherwise.
    ///
    /// Returns `None` if the size does not fit in a `usize`, which a large
    /// static array can cause.
    pub fn head_size(&self) -> Option<usize> {
        if self.is_dynamic() {
            return Some(WORD_SIZE);
        }

        match self {
            TypeSchema::FixedArray(element, length) => element.head_size()?.checked_mul(*length),
            TypeSchema::Tuple(components) => components
                .iter()
                .try_fold(0usize, |sum, component| sum.checked_add(component.head_size()?)),
            _ => Some(WORD_SIZE),
        }
    }
}

impl From<&TypeSchema> for DynSolType {
    fn from(schema: &TypeSchema) -> Self {
        match schema {
            TypeSchema::UInt(bits) => DynSolType::Uint(*bits),
            TypeSchema::Int(bits) => DynSolType::Int(*bits),
            TypeSchema::Bool => DynSolType::Bool,
            TypeSchema::Address => DynSolType::Address,
            TypeSchema::FixedBytes(size) => DynSolType::FixedBytes(*size),
            TypeSchema::Bytes => DynSolType::Bytes,
            TypeSchema::String => DynSolType::String,
            TypeSchema::Array(element) => DynSolType::Array(Box::new(element.as_ref().into())),
            TypeSchema::FixedArray(element, length) => {
                DynSolType::FixedArray(Box::new(element.as_ref().into()), *length)
            }
            TypeSchema::Tuple(components) => {
                DynSolType::Tuple(components.iter().map(DynSolType::from).collect())
            }
        }
    }
}

/// Function pointers have no counterpart and are rejected.
impl TryFrom<&DynSolType> for TypeSchema {
    type Error = ParseError;

    fn try_from(ty: &DynSolType) -> Result<Self, Self::Error> {
        let schema = match ty {
            DynSolType::Uint(bits) => TypeSchema::UInt(*bits),
            DynSolType::Int(bits) => TypeSchema::Int(*bits),
            DynSolType::Bool => TypeSchema::Bool,
            DynSolType::Address => TypeSchema::Address,
            DynSolType::FixedBytes(size) => TypeSchema::FixedBytes(*size),
            DynSolType::Bytes => TypeSchema::Bytes,
            DynSolType::String => TypeSchema::String,
            DynSolType::Array(element) => {
                TypeSchema::Array(Box::new(TypeSchema::try_from(element.as_ref())?))
            }
            DynSolType::FixedArray(element, length) => {
                TypeSchema::FixedArray(Box::new(TypeSchema::try_from(element.as_ref())?), *length)
            }
            DynSolType::Tuple(components) => TypeSchema::Tuple(
                components
                    .iter()
                    .map(TypeSchema::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            other => return Err(ParseError::UnknownType(other.sol_type_name().into_owned())),
        };

        Ok(schema)
    }
}

fn parse_elementary(input: &str) -> Result<TypeSchema, ParseError> {
    let width = |digits: &str, default: usize| -> Result<usize, ParseError> {
        if digits.is_empty() {
            Ok(default)
        } else {
            digits
                .parse()
                .map_err(|_error| ParseError::UnknownType(input.to_string()))
        }
    };

    let schema = match input {
        "bool" => TypeSchema::Bool,
        "address" => TypeSchema::Address,
        "string" => TypeSchema::String,
        "bytes" => TypeSchema::Bytes,
        _ => {
            if let Some(digits) = input.strip_prefix("uint") {
                TypeSchema::UInt(width(digits, 256)?)
            } else if let Some(digits) = input.strip_prefix("int") {
                TypeSchema::Int(width(digits, 256)?)
            } else if let Some(digits) = input.strip_prefix("bytes") {
                TypeSchema::FixedBytes(width(digits, 0)?)
            } else {
                return Err(ParseError::UnknownType(input.to_string()));
            }
        }
    };

    match schema {
        TypeSchema::UInt(bits) | TypeSchema::Int(bits) if !is_valid_int_width(bits) => {
            Err(ParseError::InvalidWidth(input.to_string()))
        }
        TypeSchema::FixedBytes(size) if !(1..=32).contains(&size) => {
            Err(ParseError::InvalidWidth(input.to_string()))
        }
        schema => Ok(schema),
    }
}

pub(crate) fn is_valid_int_width(bits: usize) -> bool {
    bits > 0 && bits <= 256 && bits % 8 == 0
}

/// Splits a comma-separated list at depth zero; an empty input yields no
/// elements.
pub(crate) fn split_top_level(input: &str) -> Result<Vec<&str>, ParseError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, character) in input.char_indices() {
        match character {
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ParseError::Unbalanced(input.to_string()))?;
            }
            ',' if depth == 0 => {
                parts.push(&input[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ParseError::Unbalanced(input.to_string()));
    }

    parts.push(&input[start..]);
    Ok(parts)
}

impl fmt::Display for TypeSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSchema::UInt(bits) => write!(f, "uint{bits}"),
            TypeSchema::Int(bits) => write!(f, "int{bits}"),
            TypeSchema::Bool => f.write_str("bool"),
            TypeSchema::Address => f.write_str("address"),
            TypeSchema::FixedBytes(size) => write!(f, "bytes{size}"),
            TypeSchema::Bytes => f.write_str("bytes"),
            TypeSchema::String => f.write_str("string"),
            TypeSchema::Array(element) => write!(f, "{element}[]"),
            TypeSchema::FixedArray(element, length) => write!(f, "{element}[{length}]"),
            TypeSchema::Tuple(components) => {
                f.write_str("(")?;
                for (index, component) in components.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{component}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl FromStr for TypeSchema {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
