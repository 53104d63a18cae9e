/// Malformed RLP input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The input ended before the item was complete.
    #[error("unexpected end of input")]
    InputTooShort,
    /// A single byte below `0x80` was wrapped in a string header.
    #[error("single byte below 0x80 must be encoded as itself")]
    NonCanonicalSingleByte,
    /// A long-form header was used for a payload that fits a short header.
    #[error("payloads shorter than 56 bytes must use the short form")]
    NonCanonicalSize,
    /// An integer or a long-form length has a leading zero byte.
    #[error("leading zero")]
    LeadingZero,
    /// An integer is too large for its target type.
    #[error("integer overflow")]
    Overflow,
    /// A list was found where a byte string was expected.
    #[error("expected a byte string, found a list")]
    UnexpectedList,
    /// A byte string was found where a list was expected.
    #[error("expected a list, found a byte string")]
    UnexpectedString,
    /// A fixed-size value has the wrong number of bytes.
    #[error("expected {expected} bytes, found {actual}")]
    InvalidLength {
        /// Expected number of bytes
        expected: usize,
        /// Actual number of bytes
        actual: usize,
    },
    /// A list's fields do not consume exactly its payload.
    #[error("list payload is {expected} bytes, its fields span {actual}")]
    ListLengthMismatch {
        /// Payload length from the list header
        expected: usize,
        /// Bytes consumed by the decoded fields
        actual: usize,
    },
    /// A boolean was neither `0x80` nor `0x01`.
    #[error("invalid boolean encoding")]
    InvalidBool,
    /// Bytes remained after the expected item or list.
    #[error("{0} trailing bytes")]
    TrailingBytes(usize),
    /// Any other malformed input.
    #[error("{0}")]
    Other(&'static str),
}

impl From<alloy_rlp::Error> for DecodeError {
    fn from(error: alloy_rlp::Error) -> Self {
        match error {
            alloy_rlp::Error::InputTooShort => DecodeError::InputTooShort,
            alloy_rlp::Error::NonCanonicalSingleByte => DecodeError::NonCanonicalSingleByte,
            alloy_rlp::Error::NonCanonicalSize => DecodeError::NonCanonicalSize,
            alloy_rlp::Error::LeadingZero => DecodeError::LeadingZero,
            alloy_rlp::Error::Overflow => DecodeError::Overflow,
            alloy_rlp::Error::UnexpectedList => DecodeError::UnexpectedList,
            alloy_rlp::Error::UnexpectedString => DecodeError::UnexpectedString,
            alloy_rlp::Error::ListLengthMismatch { expected, got } => {
                DecodeError::ListLengthMismatch {
                    expected,
                    actual: got,
                }
            }
            alloy_rlp::Error::UnexpectedLength => DecodeError::Other("unexpected length"),
            alloy_rlp::Error::Custom(message) => DecodeError::Other(message),
        }
    }
}
