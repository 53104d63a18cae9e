use std::{fmt, str::FromStr};

use alloy_rlp::{RlpDecodableWrapper, RlpEncodableWrapper};

use crate::ValidationError;

/// A 20-byte account identifier.
///
/// Parsing accepts mixed case but requires the `0x` prefix and exactly 40
/// digits; the canonical string form is lowercase.
#[derive(
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    RlpEncodableWrapper,
    RlpDecodableWrapper,
)]
pub struct Address(alloy_primitives::Address);

impl Address {
    /// Number of bytes.
    pub const LEN: usize = 20;

    /// The zero address.
    pub const ZERO: Self = Self(alloy_primitives::Address::ZERO);

    /// Constructs an address from its bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(alloy_primitives::Address::new(bytes))
    }

    /// Constructs an address from a slice of exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
        <[u8; 20]>::try_from(bytes)
            .map(Self::new)
            .map_err(|_error| ValidationError::InvalidLength {
                expected: Self::LEN,
                actual: bytes.len(),
            })
    }

    /// Returns the underlying bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0.0.0
    }

    /// Consumes the address and returns its bytes.
    pub const fn into_array(self) -> [u8; 20] {
        self.0.0.0
    }

    /// Whether this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the EIP-55 mixed-case checksum representation.
    pub fn to_checksum(&self) -> String {
        self.0.to_checksum(None)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self::new(bytes)
    }
}

impl From<Address> for [u8; 20] {
    fn from(address: Address) -> Self {
        address.into_array()
    }
}

impl From<alloy_primitives::Address> for Address {
    fn from(address: alloy_primitives::Address) -> Self {
        Self(address)
    }
}

impl From<Address> for alloy_primitives::Address {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl FromStr for Address {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::hex::decode_prefixed_array::<20>(s).map(Self::new)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn mixed_case_normalizes() {
        let mixed = Address::from_str("0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        let lower = Address::from_str("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap();

        assert_eq!(mixed, lower);
        assert_eq!(
            mixed.to_string(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn checksum() {
        let address = Address::from_str("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap();
        assert_eq!(
            address.to_checksum(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn wrong_length() {
        assert_eq!(
            Address::from_str("0xf39fd6e51aad88f6f4ce6ab8827279cfffb922"),
            Err(ValidationError::InvalidLength {
                expected: 20,
                actual: 19
            })
        );
    }

    #[test]
    fn missing_prefix() {
        assert_eq!(
            Address::from_str("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"),
            Err(ValidationError::MissingPrefix)
        );
    }

    #[test]
    fn non_hex() {
        assert!(matches!(
            Address::from_str("0xg39fd6e51aad88f6f4ce6ab8827279cfffb92266"),
            Err(ValidationError::InvalidHexCharacter { character: 'g', .. })
        ));
    }

    #[test]
    fn converts_to_and_from_alloy() {
        let alloy = alloy_primitives::Address::repeat_byte(0x11);
        let address = Address::from(alloy);

        assert_eq!(address.as_bytes(), &[0x11; 20]);
        assert_eq!(alloy_primitives::Address::from(address), alloy);
    }

    #[test]
    fn rlp_encodes_as_string() {
        let address = Address::new([0x11; 20]);
        let encoded = alloy_rlp::encode(address);

        assert_eq!(encoded[0], 0x80 + 20);
        assert_eq!(
            <Address as alloy_rlp::Decodable>::decode(&mut encoded.as_slice()),
            Ok(address)
        );
    }

    #[test]
    fn serde_uses_lowercase_string() {
        let address: Address =
            serde_json::from_str("\"0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266\"").unwrap();
        assert_eq!(
            serde_json::to_string(&address).unwrap(),
            "\"0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266\""
        );
    }
}
