mod http;
mod multiplexed;

use std::future::Future;

pub use self::{
    http::HttpTransport,
    multiplexed::{MultiplexedTransport, connect_ws},
};
use crate::TransportError;

/// A request serialized for the wire, with the id it was assigned.
#[derive(Clone, Debug)]
pub struct SerializedRequest {
    /// JSON-RPC id of the request
    pub id: u64,
    /// JSON text of the request
    pub body: String,
}

/// Moves serialized requests to a node and returns the raw response text.
///
/// `idempotent` requests may be retried on transient failures; others are
/// sent exactly once.
pub trait Transport: Send + Sync {
    /// Sends `request` and waits for the matching response.
    fn send(
        &self,
        request: SerializedRequest,
        idempotent: bool,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;
}
