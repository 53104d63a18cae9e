//! Helpers shared by the workspace's tests.

pub mod jsonrpc;
pub mod secret_key;
