//! JSON-RPC response bodies for mocked nodes.

use serde_json::{Value, json};

/// A successful response body.
pub fn success(id: u64, result: Value) -> String {
    json!({ "jsonrpc": "2.0", "id": id, "result": result }).to_string()
}

/// An error response body. `data` is omitted when `None`.
pub fn error(id: u64, code: i64, message: &str, data: Option<Value>) -> String {
    let mut error = json!({ "code": code, "message": message });
    if let Some(data) = data {
        error["data"] = data;
    }

    json!({ "jsonrpc": "2.0", "id": id, "error": error }).to_string()
}

/// Revert data for `Error(string)` with the provided reason, as a
/// `0x`-prefixed hex string.
pub fn error_string_revert(reason: &str) -> String {
    let mut data = vec![0x08, 0xc3, 0x79, 0xa0];

    let mut word = [0u8; 32];
    word[31] = 0x20;
    data.extend_from_slice(&word);

    let mut length = [0u8; 32];
    length[24..].copy_from_slice(&(reason.len() as u64).to_be_bytes());
    data.extend_from_slice(&length);

    data.extend_from_slice(reason.as_bytes());
    data.resize(data.len() + (32 - reason.len() % 32) % 32, 0);

    format!("0x{}", hex::encode(data))
}
