/// An invalid type or signature string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The type string is empty.
    #[error("empty type")]
    Empty,
    /// The type name is not an ABI type.
    #[error("unknown type `{0}`")]
    UnknownType(String),
    /// The width of an integer or fixed-bytes type is out of range.
    #[error("invalid width in `{0}`")]
    InvalidWidth(String),
    /// Parentheses or brackets do not balance.
    #[error("unbalanced delimiters in `{0}`")]
    Unbalanced(String),
    /// A signature is not of the form `name(types...)`.
    #[error("invalid signature `{0}`")]
    InvalidSignature(String),
}

/// A value that cannot be encoded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The function signature could not be parsed.
    #[error(transparent)]
    InvalidSignature(#[from] ParseError),
    /// An integer or fixed-bytes width is not a valid ABI width.
    #[error("invalid width {bits} for `{ty}`")]
    InvalidWidth {
        /// Type family
        ty: &'static str,
        /// Rejected width
        bits: usize,
    },
    /// A number does not fit its declared width.
    #[error("value does not fit `{0}`")]
    OutOfRange(String),
    /// An array element does not match the array's element type.
    #[error("array element of type `{actual}` in array of `{expected}`")]
    ElementMismatch {
        /// Declared element type
        expected: String,
        /// Type of the offending element
        actual: String,
    },
    /// The number of call arguments differs from the function's inputs.
    #[error("expected {expected} arguments, got {actual}")]
    ArgumentCount {
        /// Number of declared inputs
        expected: usize,
        /// Number of provided arguments
        actual: usize,
    },
    /// A call argument has a different type than the declared input.
    #[error("argument {index} has type `{actual}`, expected `{expected}`")]
    ArgumentMismatch {
        /// Position of the argument
        index: usize,
        /// Declared input type
        expected: String,
        /// Type of the provided argument
        actual: String,
    },
}

/// Malformed ABI-encoded data.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// An offset, length, or word could not be read.
    #[error(transparent)]
    Abi(#[from] alloy_dyn_abi::Error),
    /// A read extends past the end of the buffer.
    #[error("read of {length} bytes at offset {offset} exceeds buffer of {available} bytes")]
    OutOfBounds {
        /// Start of the read
        offset: usize,
        /// Number of bytes requested
        length: usize,
        /// Size of the buffer
        available: usize,
    },
    /// An offset or length word does not fit the addressable range.
    #[error("offset or length does not fit the addressable range")]
    Overflow,
    /// A word is not a valid encoding of its type.
    #[error("invalid encoding of `{0}`")]
    InvalidValue(String),
    /// A string is not valid UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
    /// Call data does not start with the expected selector.
    #[error("selector mismatch: expected 0x{}", alloy_primitives::hex::encode(expected))]
    SelectorMismatch {
        /// The function's selector
        expected: [u8; 4],
    },
    /// An event log has the wrong topics.
    #[error("expected {expected} topics, got {actual}")]
    TopicCount {
        /// Number of topics the event produces
        expected: usize,
        /// Number of topics in the log
        actual: usize,
    },
    /// The first topic is not the event's signature hash.
    #[error("topic does not match the event signature")]
    TopicMismatch,
}
