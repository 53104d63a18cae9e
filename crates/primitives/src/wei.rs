use std::{fmt, str::FromStr};

use alloy_primitives::U256;
use alloy_rlp::{RlpDecodableWrapper, RlpEncodableWrapper};

use crate::ValidationError;

const GWEI_DECIMALS: u8 = 9;
const ETHER_DECIMALS: u8 = 18;

/// A non-negative quantity of the native currency, in its smallest unit.
///
/// Conversions from decimal units are exact: an input that would require a
/// fraction of a wei is rejected. Conversions to coarser units either format
/// exactly ([`Wei::format_ether`]) or truncate explicitly
/// ([`Wei::to_ether_truncated`]).
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
pub struct Wei(U256);

impl Wei {
    /// Zero wei.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Constructs an amount from a number of wei.
    pub const fn from_wei(wei: U256) -> Self {
        Self(wei)
    }

    /// Constructs an amount from a signed number of wei, rejecting negative
    /// values.
    pub fn try_from_i128(wei: i128) -> Result<Self, ValidationError> {
        u128::try_from(wei)
            .map(|wei| Self(U256::from(wei)))
            .map_err(|_error| ValidationError::Negative(wei.to_string()))
    }

    /// Constructs an amount from a whole number of gwei.
    pub fn from_gwei(gwei: u64) -> Self {
        Self(U256::from(gwei) * ten_pow(GWEI_DECIMALS))
    }

    /// Constructs an amount from a whole number of ether.
    pub fn from_ether(ether: u64) -> Self {
        Self(U256::from(ether) * ten_pow(ETHER_DECIMALS))
    }

    /// Parses a decimal amount of gwei, e.g. `"1.5"`.
    pub fn parse_gwei(input: &str) -> Result<Self, ValidationError> {
        Self::parse_units(input, GWEI_DECIMALS)
    }

    /// Parses a decimal amount of ether, e.g. `"0.01"`.
    pub fn parse_ether(input: &str) -> Result<Self, ValidationError> {
        Self::parse_units(input, ETHER_DECIMALS)
    }

    /// Parses a decimal amount in a unit with `decimals` decimal places.
    ///
    /// Trailing zeros beyond the unit's precision are accepted; any other
    /// digit there would require fractional wei and is rejected.
    pub fn parse_units(input: &str, decimals: u8) -> Result<Self, ValidationError> {
        if input.starts_with('-') {
            return Err(ValidationError::Negative(input.to_string()));
        }

        let invalid = |reason| ValidationError::InvalidAmount {
            input: input.to_string(),
            reason,
        };

        let (integer, fraction) = match input.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (input, ""),
        };

        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid("no digits"));
        }

        if !integer
            .chars()
            .chain(fraction.chars())
            .all(|character| character.is_ascii_digit())
        {
            return Err(invalid("not a decimal number"));
        }

        let fraction = fraction.trim_end_matches('0');
        if fraction.len() > usize::from(decimals) {
            return Err(invalid("more decimal places than the unit allows"));
        }

        let mut digits = String::with_capacity(integer.len() + usize::from(decimals));
        digits.push_str(integer);
        digits.push_str(fraction);
        digits.extend(std::iter::repeat_n('0', usize::from(decimals) - fraction.len()));

        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(Self::ZERO);
        }

        U256::from_str_radix(digits, 10)
            .map(Self)
            .map_err(|_error| ValidationError::Overflow)
    }

    /// Returns the amount in wei.
    pub const fn as_wei(&self) -> U256 {
        self.0
    }

    /// Returns the number of whole gwei, discarding the remainder.
    pub fn to_gwei_truncated(&self) -> U256 {
        self.0 / ten_pow(GWEI_DECIMALS)
    }

    /// Returns the number of whole ether, discarding the remainder.
    pub fn to_ether_truncated(&self) -> U256 {
        self.0 / ten_pow(ETHER_DECIMALS)
    }

    /// Formats the amount as an exact decimal number of ether.
    pub fn format_ether(&self) -> String {
        self.format_units(ETHER_DECIMALS)
    }

    /// Formats the amount as an exact decimal number of gwei.
    pub fn format_gwei(&self) -> String {
        self.format_units(GWEI_DECIMALS)
    }

    /// Formats the amount as an exact decimal number in a unit with
    /// `decimals` decimal places, without trailing zeros.
    pub fn format_units(&self, decimals: u8) -> String {
        let divisor = ten_pow(decimals);
        let integer = self.0 / divisor;
        let fraction = self.0 % divisor;

        if fraction.is_zero() {
            return integer.to_string();
        }

        let fraction = format!(
            "{:0>width$}",
            fraction.to_string(),
            width = usize::from(decimals)
        );
        format!("{integer}.{}", fraction.trim_end_matches('0'))
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtracts `other`, returning `None` if the result would be negative.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

/// Computes `10^exponent`, saturating for exponents beyond the 256-bit range.
fn ten_pow(exponent: u8) -> U256 {
    let ten = U256::from(10u64);
    (0..exponent).fold(U256::from(1u64), |acc, _| acc.saturating_mul(ten))
}

impl From<U256> for Wei {
    fn from(wei: U256) -> Self {
        Self(wei)
    }
}

impl From<u64> for Wei {
    fn from(wei: u64) -> Self {
        Self(U256::from(wei))
    }
}

impl From<u128> for Wei {
    fn from(wei: u128) -> Self {
        Self(U256::from(wei))
    }
}

impl From<Wei> for U256 {
    fn from(value: Wei) -> Self {
        value.0
    }
}

impl FromStr for Wei {
    type Err = ValidationError;

    /// Parses a decimal or `0x`-prefixed hex number of wei.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('-') {
            return Err(ValidationError::Negative(s.to_string()));
        }

        if let Some(digits) = s.strip_prefix("0x") {
            if let Some((index, character)) = digits
                .char_indices()
                .find(|(_, character)| !character.is_ascii_hexdigit())
            {
                return Err(ValidationError::InvalidHexCharacter { character, index });
            }
            if digits.is_empty() {
                return Err(ValidationError::InvalidAmount {
                    input: s.to_string(),
                    reason: "no digits",
                });
            }

            U256::from_str_radix(digits, 16)
                .map(Self)
                .map_err(|_error| ValidationError::Overflow)
        } else {
            Self::parse_units(s, 0)
        }
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

impl fmt::Debug for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl serde::Serialize for Wei {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        crate::quantity::u256::serialize(&self.0, serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Wei {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        crate::quantity::u256::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ether_exact() {
        assert_eq!(
            Wei::parse_ether("1.5").unwrap().as_wei(),
            U256::from(1_500_000_000_000_000_000u64)
        );
        assert_eq!(
            Wei::parse_ether("0.000000000000000001").unwrap().as_wei(),
            U256::from(1u64)
        );
        assert_eq!(Wei::parse_ether("2").unwrap(), Wei::from_ether(2));
        assert_eq!(Wei::parse_ether("0.0").unwrap(), Wei::ZERO);
        assert_eq!(Wei::parse_ether("1.50000000000000000000").unwrap(), Wei::parse_ether("1.5").unwrap());
    }

    #[test]
    fn parse_rejects_fractional_wei() {
        assert!(matches!(
            Wei::parse_ether("0.0000000000000000001"),
            Err(ValidationError::InvalidAmount { .. })
        ));
        assert!(matches!(
            Wei::parse_gwei("1.0000000001"),
            Err(ValidationError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn parse_rejects_negative_and_garbage() {
        assert_eq!(
            Wei::parse_ether("-1"),
            Err(ValidationError::Negative("-1".to_string()))
        );
        assert!(Wei::parse_ether("").is_err());
        assert!(Wei::parse_ether(".").is_err());
        assert!(Wei::parse_ether("1.2.3").is_err());
        assert!(Wei::parse_ether("1e18").is_err());
    }

    #[test]
    fn parse_overflow() {
        let huge = "9".repeat(80);
        assert_eq!(Wei::parse_units(&huge, 0), Err(ValidationError::Overflow));
    }

    #[test]
    fn negative_signed_rejected() {
        assert!(Wei::try_from_i128(-1).is_err());
        assert_eq!(Wei::try_from_i128(7).unwrap(), Wei::from(7u64));
    }

    #[test]
    fn truncating_conversions() {
        let amount = Wei::parse_ether("1.999999999999999999").unwrap();
        assert_eq!(amount.to_ether_truncated(), U256::from(1u64));
        assert_eq!(
            amount.to_gwei_truncated(),
            U256::from(1_999_999_999u64)
        );
    }

    #[test]
    fn format_exact() {
        assert_eq!(Wei::parse_ether("1.5").unwrap().format_ether(), "1.5");
        assert_eq!(Wei::from(1u64).format_ether(), "0.000000000000000001");
        assert_eq!(Wei::from_ether(3).format_ether(), "3");
        assert_eq!(Wei::from_gwei(20).format_gwei(), "20");
    }

    #[test]
    fn from_str_hex_and_decimal() {
        assert_eq!("0x4a817c800".parse::<Wei>().unwrap(), Wei::from_gwei(20));
        assert_eq!("20000000000".parse::<Wei>().unwrap(), Wei::from_gwei(20));
    }

    #[test]
    fn checked_arithmetic() {
        assert_eq!(Wei::ZERO.checked_sub(Wei::from(1u64)), None);
        assert_eq!(
            Wei::from(1u64).checked_add(Wei::from(2u64)),
            Some(Wei::from(3u64))
        );
    }
}
