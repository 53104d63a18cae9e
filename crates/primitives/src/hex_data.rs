use std::{fmt, str::FromStr, sync::OnceLock};

use crate::{ValidationError, hex};

static EMPTY: HexData = HexData {
    bytes: OnceLock::new(),
    hex: OnceLock::new(),
};

/// An arbitrary-length byte payload whose canonical string form is
/// `0x`-prefixed, even-length, lowercase hex.
///
/// Either representation may be the one it was constructed from; the other is
/// computed on first access and cached. Both caches are single-assignment, so
/// concurrent first accesses converge on the same value.
pub struct HexData {
    bytes: OnceLock<Vec<u8>>,
    // Always lowercase and `0x`-prefixed.
    hex: OnceLock<String>,
}

impl HexData {
    /// The shared empty payload.
    pub fn empty() -> &'static Self {
        &EMPTY
    }

    /// Constructs a payload from raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: OnceLock::from(bytes.into()),
            hex: OnceLock::new(),
        }
    }

    /// Constructs a payload from a `0x`-prefixed hex string of any case.
    pub fn from_hex_str(input: &str) -> Result<Self, ValidationError> {
        let digits = input
            .strip_prefix("0x")
            .ok_or(ValidationError::MissingPrefix)?;
        hex::validate_digits(digits)?;

        Ok(Self {
            bytes: OnceLock::new(),
            hex: OnceLock::from(input.to_ascii_lowercase()),
        })
    }

    /// Returns the payload bytes, decoding them from hex on first access.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.get_or_init(|| match self.hex.get() {
            // Validated when the payload was constructed.
            Some(hex) => ::hex::decode(&hex[2..]).unwrap_or_default(),
            None => Vec::new(),
        })
    }

    /// Returns the canonical hex form, encoding it on first access.
    pub fn as_hex(&self) -> &str {
        self.hex
            .get_or_init(|| hex::encode_prefixed(self.bytes.get().map_or(&[][..], Vec::as_slice)))
    }

    /// Number of bytes in the payload.
    pub fn len(&self) -> usize {
        match (self.bytes.get(), self.hex.get()) {
            (Some(bytes), _) => bytes.len(),
            (None, Some(hex)) => (hex.len() - 2) / 2,
            (None, None) => 0,
        }
    }

    /// Whether the payload has no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the payload and returns its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.as_bytes();
        self.bytes.into_inner().unwrap_or_default()
    }
}

impl Clone for HexData {
    fn clone(&self) -> Self {
        Self {
            bytes: self.bytes.clone(),
            hex: self.hex.clone(),
        }
    }
}

impl Default for HexData {
    fn default() -> Self {
        Self::from_bytes(Vec::new())
    }
}

impl PartialEq for HexData {
    fn eq(&self, other: &Self) -> bool {
        match (self.hex.get(), other.hex.get()) {
            (Some(this), Some(that)) => this == that,
            _ => self.as_bytes() == other.as_bytes(),
        }
    }
}

impl Eq for HexData {}

impl std::hash::Hash for HexData {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl AsRef<[u8]> for HexData {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Vec<u8>> for HexData {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&[u8]> for HexData {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl FromStr for HexData {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex_str(s)
    }
}

impl fmt::Display for HexData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_hex())
    }
}

impl fmt::Debug for HexData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexData({})", self.as_hex())
    }
}

impl alloy_rlp::Encodable for HexData {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        alloy_rlp::Encodable::encode(self.as_bytes(), out);
    }

    fn length(&self) -> usize {
        alloy_rlp::Encodable::length(self.as_bytes())
    }
}

impl alloy_rlp::Decodable for HexData {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        alloy_rlp::Header::decode_bytes(buf, false).map(Self::from_bytes)
    }
}

impl serde::Serialize for HexData {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_hex())
    }
}

impl<'de> serde::Deserialize<'de> for HexData {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Self::from_hex_str(&value).map_err(serde::de::Error::custom)
    }
}
