use serde::{Deserialize, Serialize};

/// Error code used by nodes for `eth_call`/`eth_estimateGas` reverts.
pub const EXECUTION_REVERTED_CODE: i64 = 3;
/// The method does not exist or is not available.
pub const METHOD_NOT_FOUND_CODE: i64 = -32601;
/// Invalid method parameters.
pub const INVALID_PARAMS_CODE: i64 = -32602;

/// JSON-RPC protocol version
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Version {
    /// JSON-RPC 2.0
    #[serde(rename = "2.0")]
    V2_0,
}

/// Request correlation id
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// Numeric id
    Num(u64),
    /// String id
    Str(String),
    /// Servers reply with a null id when the request could not be parsed.
    Null,
}

/// A JSON-RPC request with positional parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Request<ParamsT> {
    /// Protocol version
    #[serde(rename = "jsonrpc")]
    pub version: Version,
    /// Correlation id, echoed by the response
    pub id: Id,
    /// Method name
    pub method: String,
    /// Positional parameters; serializes as a JSON array
    pub params: ParamsT,
}

/// A JSON-RPC response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Response<SuccessT> {
    /// Protocol version
    #[serde(rename = "jsonrpc")]
    pub version: Version,
    /// Id of the request this answers
    pub id: Id,
    /// Result or error
    #[serde(flatten)]
    pub data: ResponseData<SuccessT>,
}

/// The payload of a response: either a result or an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData<SuccessT> {
    /// The node reported an error.
    Error {
        /// The error
        error: RpcError,
    },
    /// The call succeeded.
    Success {
        /// The result
        result: SuccessT,
    },
}

impl<SuccessT> ResponseData<SuccessT> {
    /// Converts into a `Result`.
    pub fn into_result(self) -> Result<SuccessT, RpcError> {
        match self {
            ResponseData::Success { result } => Ok(result),
            ResponseData::Error { error } => Err(error),
        }
    }
}

/// An error reported by the node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} (code {code})")]
pub struct RpcError {
    /// Error code
    pub code: i64,
    /// Error message
    pub message: String,
    /// Additional error data, e.g. revert payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// The id of the request that failed. Filled in by the client; not part
    /// of the wire format.
    #[serde(skip)]
    pub request_id: Option<u64>,
}

impl RpcError {
    /// Whether the node does not provide the method.
    pub fn is_method_not_found(&self) -> bool {
        self.code == METHOD_NOT_FOUND_CODE
    }

    /// Whether the node rejected the parameters.
    pub fn is_invalid_params(&self) -> bool {
        self.code == INVALID_PARAMS_CODE
    }

    /// Whether a log query spanned more blocks than the node serves at once.
    pub fn is_block_range_too_large(&self) -> bool {
        let message = self.message.to_lowercase();
        message.contains("block range")
            || message.contains("range too large")
            || message.contains("query returned more than")
    }

    /// Whether a filter id has expired or was never installed.
    pub fn is_filter_not_found(&self) -> bool {
        self.message.to_lowercase().contains("filter not found")
    }

    /// The revert payload, if `data` carries one.
    ///
    /// Most nodes put the hex string in `data`; some nest it as
    /// `data.data`.
    pub fn revert_data(&self) -> Option<&str> {
        let data = self.data.as_ref()?;
        let data = data
            .as_str()
            .or_else(|| data.get("data").and_then(serde_json::Value::as_str))?;

        let digits = data.strip_prefix("0x")?;
        digits
            .bytes()
            .all(|byte| byte.is_ascii_hexdigit())
            .then_some(data)
    }

    /// Whether the error is an execution revert whose `data` should be
    /// decoded: the data is `0x`-prefixed hex and either the code is 3 or the
    /// message mentions a revert.
    pub fn looks_like_revert(&self) -> bool {
        self.revert_data().is_some()
            && (self.code == EXECUTION_REVERTED_CODE
                || self.message.to_lowercase().contains("revert"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rpc_error(code: i64, message: &str, data: Option<serde_json::Value>) -> RpcError {
        RpcError {
            code,
            message: message.to_string(),
            data,
            request_id: None,
        }
    }

    #[test]
    fn request_serializes_positional_params() -> anyhow::Result<()> {
        let request = Request {
            version: Version::V2_0,
            id: Id::Num(7),
            method: "eth_getBalance".to_string(),
            params: ("0x000000000000000000000000000000000000dead", "latest"),
        };

        assert_eq!(
            serde_json::to_value(&request)?,
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "eth_getBalance",
                "params": ["0x000000000000000000000000000000000000dead", "latest"],
            })
        );

        Ok(())
    }

    #[test]
    fn response_success_and_error() -> anyhow::Result<()> {
        let success: Response<String> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#)?;
        assert_eq!(success.id, Id::Num(1));
        assert_eq!(success.data.into_result()?, "0x1");

        let failure: Response<String> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"parse error"}}"#,
        )?;
        assert_eq!(failure.id, Id::Null);
        let error = failure.data.into_result().expect_err("error response");
        assert_eq!(error.code, -32700);
        assert_eq!(error.data, None);

        Ok(())
    }

    #[test]
    fn classifies_reverts() {
        let revert = rpc_error(3, "execution reverted", Some(json!("0x08c379a0")));
        assert!(revert.looks_like_revert());

        let by_message = rpc_error(-32000, "VM Exception: revert", Some(json!("0xdeadbeef")));
        assert!(by_message.looks_like_revert());

        let nested = rpc_error(3, "execution reverted", Some(json!({ "data": "0x" })));
        assert_eq!(nested.revert_data(), Some("0x"));
        assert!(nested.looks_like_revert());

        let not_hex = rpc_error(3, "execution reverted", Some(json!("insufficient funds")));
        assert!(!not_hex.looks_like_revert());

        let no_data = rpc_error(3, "execution reverted", None);
        assert!(!no_data.looks_like_revert());

        let unrelated = rpc_error(-32000, "nonce too low", Some(json!("0x01")));
        assert!(!unrelated.looks_like_revert());
    }

    #[test]
    fn classifies_transient_conditions() {
        assert!(rpc_error(-32005, "query returned more than 10000 results", None)
            .is_block_range_too_large());
        assert!(rpc_error(-32000, "eth_getLogs block range too large", None)
            .is_block_range_too_large());
        assert!(rpc_error(-32000, "filter not found", None).is_filter_not_found());
        assert!(rpc_error(-32601, "the method eth_foo does not exist", None).is_method_not_found());
        assert!(rpc_error(-32602, "invalid argument 0", None).is_invalid_params());
        assert!(!rpc_error(-32000, "header not found", None).is_filter_not_found());
    }
}
