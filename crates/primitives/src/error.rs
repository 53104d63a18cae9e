/// Malformed input to a value constructor.
///
/// Raised synchronously by parsing and construction; never retried.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The hex string does not start with `0x`.
    #[error("missing `0x` prefix")]
    MissingPrefix,
    /// The hex string contains a character outside `[0-9a-fA-F]`.
    #[error("invalid hex character {character:?} at position {index}")]
    InvalidHexCharacter {
        /// The offending character
        character: char,
        /// Position of the character, excluding the `0x` prefix
        index: usize,
    },
    /// The hex string has an odd number of digits.
    #[error("odd number of hex digits")]
    OddLength,
    /// The decoded value has the wrong number of bytes.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Expected number of bytes
        expected: usize,
        /// Actual number of bytes
        actual: usize,
    },
    /// A negative amount was provided where only non-negative values are
    /// allowed.
    #[error("negative amount: {0}")]
    Negative(String),
    /// A decimal amount could not be converted exactly.
    #[error("invalid amount `{input}`: {reason}")]
    InvalidAmount {
        /// The rejected input
        input: String,
        /// Why the input was rejected
        reason: &'static str,
    },
    /// The value does not fit in 256 bits.
    #[error("amount overflows 256 bits")]
    Overflow,
}

impl From<hex::FromHexError> for ValidationError {
    fn from(error: hex::FromHexError) -> Self {
        match error {
            hex::FromHexError::InvalidHexCharacter { c, index } => {
                ValidationError::InvalidHexCharacter {
                    character: c,
                    index,
                }
            }
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                ValidationError::OddLength
            }
        }
    }
}
