use std::time::Duration;

use quill_decoder_revert::RevertError;

use crate::jsonrpc::{Id, RpcError};

/// A failure to exchange a message with the node.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent to the remote node.
    #[error(transparent)]
    FailedToSend(#[from] reqwest_middleware::Error),

    /// The server returned an HTTP error status.
    #[error("The HTTP server returned error status code: {0}")]
    HttpStatus(reqwest::Error),

    /// The remote node failed to reply with the body of the response.
    #[error("The response text was corrupted: {0}.")]
    CorruptedResponse(reqwest::Error),

    /// The HTTP client could not be constructed.
    #[error("Failed to build the HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    /// A configured header name or value is invalid.
    #[error("Invalid header '{0}'")]
    InvalidHeader(String),

    /// Invalid URL format
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),

    /// The WebSocket handshake or stream failed.
    #[error(transparent)]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    /// No response arrived within the request timeout.
    #[error("No response within {0:?}")]
    Timeout(Duration),

    /// The connection ended before a response arrived.
    #[error("The connection was closed")]
    Closed,
}

impl TransportError {
    /// Whether retrying the same request may succeed: connection failures,
    /// timeouts, rate limiting, and gateway errors.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::FailedToSend(reqwest_middleware::Error::Reqwest(error))
            | TransportError::CorruptedResponse(error) => {
                error.is_connect() || error.is_timeout()
            }
            TransportError::HttpStatus(error) => error.status().is_some_and(|status| {
                status.as_u16() == 429 || status.is_server_error()
            }),
            TransportError::Timeout(_) => true,
            TransportError::FailedToSend(reqwest_middleware::Error::Middleware(_))
            | TransportError::ClientBuild(_)
            | TransportError::InvalidHeader(_)
            | TransportError::InvalidUrl(_)
            | TransportError::WebSocket(_)
            | TransportError::Closed => false,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        TransportError::WebSocket(Box::new(error))
    }
}

/// Errors returned by [`crate::RpcClient`].
#[derive(Debug, thiserror::Error)]
pub enum RpcClientError {
    /// The request never got a well-formed reply.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request cannot be serialized as JSON.
    #[error(transparent)]
    InvalidJsonRequest(serde_json::Error),

    /// The server returned an invalid JSON-RPC response.
    #[error(
        "Response '{response}' failed to parse with expected type '{expected_type}', due to error: '{error}'"
    )]
    InvalidResponse {
        /// The response text
        response: String,
        /// The expected type of the response
        expected_type: &'static str,
        /// The parse error
        error: serde_json::Error,
    },

    /// The server answered with an id that does not match the request.
    #[error("The server returned an invalid id: '{id:?}' in response: '{response}'")]
    InvalidId {
        /// The response text
        response: String,
        /// The invalid id
        id: Id,
    },

    /// The JSON-RPC returned an error.
    #[error("{error}. Method: {method}")]
    JsonRpc {
        /// The JSON-RPC error
        error: RpcError,
        /// The method that failed
        method: String,
    },

    /// The call reverted. `error` is the node's report; `revert` its decoded
    /// data.
    #[error("{revert}")]
    Revert {
        /// The decoded revert
        revert: RevertError,
        /// The JSON-RPC error
        error: RpcError,
    },
}

impl RpcClientError {
    /// Whether the request may succeed if sent again. Only transport
    /// failures qualify; node-reported errors are deterministic.
    pub fn is_transient(&self) -> bool {
        match self {
            RpcClientError::Transport(error) => error.is_transient(),
            RpcClientError::InvalidJsonRequest(_)
            | RpcClientError::InvalidResponse { .. }
            | RpcClientError::InvalidId { .. }
            | RpcClientError::JsonRpc { .. }
            | RpcClientError::Revert { .. } => false,
        }
    }

    /// The node-reported error, for [`RpcClientError::JsonRpc`] and
    /// [`RpcClientError::Revert`].
    pub fn rpc_error(&self) -> Option<&RpcError> {
        match self {
            RpcClientError::JsonRpc { error, .. } | RpcClientError::Revert { error, .. } => {
                Some(error)
            }
            _ => None,
        }
    }
}
