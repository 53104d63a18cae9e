use std::{fmt, str::FromStr};

use alloy_primitives::B256;
use alloy_rlp::{RlpDecodableWrapper, RlpEncodableWrapper};

use crate::ValidationError;

/// A 32-byte digest: transaction hash, block hash, log topic, or blob
/// versioned hash.
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
pub struct Hash(B256);

impl Hash {
    /// Number of bytes.
    pub const LEN: usize = 32;

    /// The all-zero digest.
    pub const ZERO: Self = Self(B256::ZERO);

    /// Constructs a digest from its bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(B256::new(bytes))
    }

    /// Constructs a digest from a slice of exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
        <[u8; 32]>::try_from(bytes)
            .map(Self::new)
            .map_err(|_error| ValidationError::InvalidLength {
                expected: Self::LEN,
                actual: bytes.len(),
            })
    }

    /// Returns the underlying bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0.0
    }

    /// Consumes the digest and returns its bytes.
    pub const fn into_array(self) -> [u8; 32] {
        self.0.0
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self::new(bytes)
    }
}

impl From<Hash> for [u8; 32] {
    fn from(hash: Hash) -> Self {
        hash.into_array()
    }
}

impl From<B256> for Hash {
    fn from(hash: B256) -> Self {
        Self(hash)
    }
}

impl From<Hash> for B256 {
    fn from(hash: Hash) -> Self {
        hash.0
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl FromStr for Hash {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::hex::decode_prefixed_array::<32>(s).map(Self::new)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl serde::Serialize for Hash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Hash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
