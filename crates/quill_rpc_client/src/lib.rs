#![warn(missing_docs)]

//! Ethereum JSON-RPC client
//!
//! [`RpcClient`] speaks JSON-RPC 2.0 over any [`Transport`]:
//! [`HttpTransport`] posts each request separately, while
//! [`MultiplexedTransport`] shares one persistent connection between
//! concurrent callers.

mod client;
mod config;
mod error;
/// Types specific to JSON-RPC
pub mod jsonrpc;
mod transport;
pub mod types;

pub use reqwest::header;

pub use self::{
    client::RpcClient,
    config::{RetryConfig, RpcClientConfig},
    error::{RpcClientError, TransportError},
    transport::{
        HttpTransport, MultiplexedTransport, SerializedRequest, Transport, connect_ws,
    },
};
