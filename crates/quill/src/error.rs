use quill_decoder_revert::RevertError;
use quill_eip4844::{BlobDecodeError, BlobError, KzgError, SidecarError};
use quill_rpc_client::{RpcClientError, TransportError, jsonrpc::RpcError};
use quill_signer::SignatureError;
use quill_transaction::BuildError;

/// Malformed input to a constructor or builder. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// An invalid primitive value, such as a wrong-length address.
    #[error(transparent)]
    Value(#[from] quill_primitives::ValidationError),
    /// A transaction request is incomplete or inconsistent.
    #[error(transparent)]
    Transaction(#[from] BuildError),
    /// A blob does not have the required size or layout.
    #[error(transparent)]
    Blob(#[from] BlobError),
    /// A blob sidecar is inconsistent.
    #[error(transparent)]
    Sidecar(#[from] SidecarError),
    /// An ABI type or signature string does not parse.
    #[error(transparent)]
    AbiSignature(#[from] quill_abi::ParseError),
    /// ABI values do not match their declared types.
    #[error(transparent)]
    AbiEncode(#[from] quill_abi::EncodeError),
    /// A configuration file is malformed.
    #[error(transparent)]
    Config(#[from] toml::de::Error),
    /// The node serves a different chain than the profile targets.
    #[error("The node reports chain id {actual}, expected {expected}")]
    ChainMismatch {
        /// Chain id of the profile
        expected: u64,
        /// Chain id reported by the node
        actual: u64,
    },
}

/// Malformed bytes or responses.
#[derive(Debug, thiserror::Error)]
pub enum DecodingError {
    /// Invalid RLP
    #[error(transparent)]
    Rlp(#[from] quill_rlp::DecodeError),
    /// Invalid ABI data
    #[error(transparent)]
    Abi(#[from] quill_abi::DecodeError),
    /// An invalid transaction envelope
    #[error(transparent)]
    Transaction(#[from] quill_transaction::DecodeError),
    /// Blobs that do not carry a valid payload
    #[error(transparent)]
    Blob(#[from] BlobDecodeError),
    /// A JSON-RPC message that does not have the expected shape
    #[error(transparent)]
    Response(RpcClientError),
}

/// A signature or KZG proof failure.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Signing, recovery, or verification failed.
    #[error(transparent)]
    Signature(#[from] SignatureError),
    /// The KZG backend failed.
    #[error(transparent)]
    Kzg(#[from] KzgError),
}

/// Any error returned by the SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// See [`ValidationError`].
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// See [`DecodingError`].
    #[error(transparent)]
    Decoding(#[from] DecodingError),
    /// See [`CryptoError`].
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    /// The node reported an error.
    #[error("{error}. Method: {method}")]
    Rpc {
        /// The JSON-RPC error
        error: RpcError,
        /// The method that failed
        method: String,
    },
    /// The call reverted.
    #[error("{revert}")]
    Revert {
        /// The decoded revert
        revert: RevertError,
        /// The JSON-RPC error that carried it
        error: RpcError,
    },
    /// The node could not be reached.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// The category of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed caller input, see [`Error::Validation`].
    Validation,
    /// Malformed wire data, see [`Error::Decoding`].
    Decoding,
    /// Signing or recovery failed, see [`Error::Crypto`].
    Crypto,
    /// The node answered with a JSON-RPC error, see [`Error::Rpc`].
    Rpc,
    /// A call reverted, see [`Error::Revert`].
    Revert,
    /// The request did not complete, see [`Error::Transport`].
    Transport,
}

impl Error {
    /// The category of this error, for callers that branch on it without
    /// matching every variant.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Decoding(_) => ErrorKind::Decoding,
            Error::Crypto(_) => ErrorKind::Crypto,
            Error::Rpc { .. } => ErrorKind::Rpc,
            Error::Revert { .. } => ErrorKind::Revert,
            Error::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Whether sending the same request again may succeed. Only transient
    /// transport failures qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(error) => error.is_transient(),
            _ => false,
        }
    }

    /// The decoded revert, for [`ErrorKind::Revert`].
    pub fn revert(&self) -> Option<&RevertError> {
        match self {
            Error::Revert { revert, .. } => Some(revert),
            _ => None,
        }
    }

    /// The node-reported error, for [`ErrorKind::Rpc`] and
    /// [`ErrorKind::Revert`].
    pub fn rpc_error(&self) -> Option<&RpcError> {
        match self {
            Error::Rpc { error, .. } | Error::Revert { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<RpcClientError> for Error {
    fn from(error: RpcClientError) -> Self {
        match error {
            RpcClientError::Transport(error) => Error::Transport(error),
            RpcClientError::JsonRpc { error, method } => Error::Rpc { error, method },
            RpcClientError::Revert { revert, error } => Error::Revert { revert, error },
            error @ (RpcClientError::InvalidJsonRequest(_)
            | RpcClientError::InvalidResponse { .. }
            | RpcClientError::InvalidId { .. }) => {
                Error::Decoding(DecodingError::Response(error))
            }
        }
    }
}

macro_rules! impl_from_leaf_error {
    ($category:ident: $($error:ty),+ $(,)?) => {
        $(
            impl From<$error> for Error {
                fn from(error: $error) -> Self {
                    Error::$category(error.into())
                }
            }
        )+
    };
}

impl_from_leaf_error!(Validation:
    quill_primitives::ValidationError,
    BuildError,
    BlobError,
    SidecarError,
    quill_abi::ParseError,
    quill_abi::EncodeError,
    toml::de::Error,
);

impl_from_leaf_error!(Decoding:
    quill_rlp::DecodeError,
    quill_abi::DecodeError,
    quill_transaction::DecodeError,
    BlobDecodeError,
);

impl_from_leaf_error!(Crypto: SignatureError, KzgError);

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use quill_transaction::Field;

    use super::*;

    fn rpc_error(code: i64, data: Option<&str>) -> RpcError {
        RpcError {
            code,
            message: "execution reverted".to_string(),
            data: data.map(Into::into),
            request_id: Some(1),
        }
    }

    #[test]
    fn leaf_errors_map_to_their_kind() {
        let cases: Vec<(Error, ErrorKind)> = vec![
            (
                BuildError::MissingField(Field::Nonce).into(),
                ErrorKind::Validation,
            ),
            (
                quill_primitives::ValidationError::OddLength.into(),
                ErrorKind::Validation,
            ),
            (
                quill_rlp::DecodeError::TrailingBytes(1).into(),
                ErrorKind::Decoding,
            ),
            (
                SignatureError::OutOfRange { component: "s" }.into(),
                ErrorKind::Crypto,
            ),
            (TransportError::Closed.into(), ErrorKind::Transport),
        ];

        for (error, kind) in cases {
            assert_eq!(error.kind(), kind, "{error}");
            assert!(!error.is_retryable(), "{error}");
        }
    }

    #[test]
    fn rpc_client_errors_are_split() {
        let json_rpc: Error = RpcClientError::JsonRpc {
            error: rpc_error(-32000, None),
            method: "eth_call".to_string(),
        }
        .into();
        assert_eq!(json_rpc.kind(), ErrorKind::Rpc);
        assert_eq!(json_rpc.rpc_error().map(|error| error.code), Some(-32000));
        assert!(json_rpc.revert().is_none());

        let revert: Error = RpcClientError::Revert {
            revert: RevertError::unknown("0xdeadbeef"),
            error: rpc_error(3, Some("0xdeadbeef")),
        }
        .into();
        assert_eq!(revert.kind(), ErrorKind::Revert);
        assert_eq!(
            revert.revert().map(|revert| revert.raw_hex.as_str()),
            Some("0xdeadbeef")
        );
        assert!(!revert.is_retryable());
    }

    #[test]
    fn only_transient_transport_errors_are_retryable() {
        let timeout = Error::from(TransportError::Timeout(Duration::from_secs(1)));
        assert_eq!(timeout.kind(), ErrorKind::Transport);
        assert!(timeout.is_retryable());

        let closed = Error::from(TransportError::Closed);
        assert!(!closed.is_retryable());
    }
}
