//! JSON-RPC encodes numeric quantities as `0x`-prefixed hex without leading
//! zeros; zero is `"0x0"`. Use with `#[serde(with = "quantity::u64")]`.

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serializer};

fn parse_digits(input: &str) -> Result<&str, String> {
    let digits = input
        .strip_prefix("0x")
        .ok_or_else(|| format!("quantity `{input}` is missing the `0x` prefix"))?;

    if digits.is_empty() {
        return Err("quantity has no digits".to_string());
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return Err(format!("quantity `{input}` has leading zeros"));
    }

    Ok(digits)
}

/// Serde helpers for `u64` quantities.
pub mod u64 {
    use super::{Deserialize, Deserializer, Serializer, parse_digits};

    /// Serializes a `u64` as a hex quantity.
    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("0x{value:x}"))
    }

    /// Deserializes a hex quantity into a `u64`.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let value = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        let digits = parse_digits(&value).map_err(serde::de::Error::custom)?;
        u64::from_str_radix(digits, 16).map_err(serde::de::Error::custom)
    }
}

/// Serde helpers for `u128` quantities.
pub mod u128 {
    use super::{Deserialize, Deserializer, Serializer, parse_digits};

    /// Serializes a `u128` as a hex quantity.
    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("0x{value:x}"))
    }

    /// Deserializes a hex quantity into a `u128`.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let value = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        let digits = parse_digits(&value).map_err(serde::de::Error::custom)?;
        u128::from_str_radix(digits, 16).map_err(serde::de::Error::custom)
    }
}

/// Serde helpers for `U256` quantities.
pub mod u256 {
    use super::{Deserialize, Deserializer, Serializer, U256, parse_digits};

    /// Serializes a `U256` as a hex quantity.
    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("0x{value:x}"))
    }

    /// Deserializes a hex quantity into a `U256`.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let value = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        let digits = parse_digits(&value).map_err(serde::de::Error::custom)?;
        U256::from_str_radix(digits, 16).map_err(serde::de::Error::custom)
    }
}

/// Serde helpers for optional `u64` quantities, where JSON `null` is `None`.
pub mod opt_u64 {
    use super::{Deserialize, Deserializer, Serializer, parse_digits};

    /// Serializes an optional `u64` as a hex quantity or `null`.
    pub fn serialize<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => super::u64::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional hex quantity.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        let value = Option::<std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        value
            .map(|value| {
                let digits = parse_digits(&value).map_err(serde::de::Error::custom)?;
                u64::from_str_radix(digits, 16).map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}
