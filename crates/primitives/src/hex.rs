use crate::ValidationError;

const PREFIX: &str = "0x";

/// Encodes the bytes as lowercase hex, without prefix.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Encodes the bytes as lowercase hex, with `0x` prefix.
pub fn encode_prefixed(bytes: impl AsRef<[u8]>) -> String {
    hex::encode_prefixed(bytes)
}

/// Returns `input` without its `0x` prefix, if it has one.
pub fn strip_prefix(input: &str) -> &str {
    input.strip_prefix(PREFIX).unwrap_or(input)
}

/// Returns whether the input starts with `0x`.
pub fn has_prefix(input: &str) -> bool {
    input.starts_with(PREFIX)
}

/// Decodes a hex string with an optional `0x` prefix.
pub fn decode(input: &str) -> Result<Vec<u8>, ValidationError> {
    decode_digits(strip_prefix(input))
}

/// Decodes a hex string that must carry a `0x` prefix.
pub fn decode_prefixed(input: &str) -> Result<Vec<u8>, ValidationError> {
    let digits = input
        .strip_prefix(PREFIX)
        .ok_or(ValidationError::MissingPrefix)?;

    decode_digits(digits)
}

/// Decodes a `0x`-prefixed hex string of exactly `N` bytes.
pub fn decode_prefixed_array<const N: usize>(input: &str) -> Result<[u8; N], ValidationError> {
    let digits = input
        .strip_prefix(PREFIX)
        .ok_or(ValidationError::MissingPrefix)?;

    validate_digits(digits)?;
    if digits.len() != N * 2 {
        return Err(ValidationError::InvalidLength {
            expected: N,
            actual: digits.len() / 2,
        });
    }

    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out)?;
    Ok(out)
}

/// Checks that `digits` is an even-length string of hex characters.
///
/// A second `0x` after the prefix has already been removed is rejected.
pub fn validate_digits(digits: &str) -> Result<(), ValidationError> {
    if digits.starts_with(PREFIX) {
        return Err(ValidationError::InvalidHexCharacter {
            character: 'x',
            index: 1,
        });
    }

    hex::check(digits).map_err(ValidationError::from)
}

fn decode_digits(digits: &str) -> Result<Vec<u8>, ValidationError> {
    validate_digits(digits)?;
    hex::decode(digits).map_err(ValidationError::from)
}
