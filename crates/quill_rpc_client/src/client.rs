use std::sync::atomic::{AtomicU64, Ordering};

use quill_decoder_revert::RevertDecoder;
use quill_primitives::{Address, Hash, HexData, Wei};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::OnceCell;

use crate::{
    RpcClientError,
    jsonrpc::{self, RpcError},
    transport::{SerializedRequest, Transport},
    types::{BlockSpec, CallRequest, FeeHistory, TransactionReceipt, U64Quantity, U128Quantity},
};

const NO_PARAMS: [u8; 0] = [];

/// A JSON-RPC client for an Ethereum node.
///
/// Error responses whose data is revert payload are decoded into
/// [`RpcClientError::Revert`]; all other error responses surface as
/// [`RpcClientError::JsonRpc`].
#[derive(Debug)]
pub struct RpcClient<TransportT> {
    transport: TransportT,
    next_id: AtomicU64,
    chain_id: OnceCell<u64>,
    revert_decoder: RevertDecoder,
}

impl<TransportT: Transport> RpcClient<TransportT> {
    /// Creates a client over `transport`.
    pub fn new(transport: TransportT) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
            chain_id: OnceCell::new(),
            revert_decoder: RevertDecoder::default(),
        }
    }

    /// Uses `revert_decoder` to decode custom errors in revert data.
    pub fn with_revert_decoder(mut self, revert_decoder: RevertDecoder) -> Self {
        self.revert_decoder = revert_decoder;
        self
    }

    /// The underlying transport.
    pub fn transport(&self) -> &TransportT {
        &self.transport
    }

    /// Calls `method` once. Transport failures are not retried.
    pub async fn request<ParamsT: Serialize, SuccessT: DeserializeOwned>(
        &self,
        method: &str,
        params: ParamsT,
    ) -> Result<SuccessT, RpcClientError> {
        self.send_request(method, params, false).await
    }

    /// Calls `method`, retrying transient transport failures. Only use for
    /// requests that are safe to deliver more than once.
    pub async fn request_idempotent<ParamsT: Serialize, SuccessT: DeserializeOwned>(
        &self,
        method: &str,
        params: ParamsT,
    ) -> Result<SuccessT, RpcClientError> {
        self.send_request(method, params, true).await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self, params)))]
    async fn send_request<ParamsT: Serialize, SuccessT: DeserializeOwned>(
        &self,
        method: &str,
        params: ParamsT,
        idempotent: bool,
    ) -> Result<SuccessT, RpcClientError> {
        let request = self.serialize_request(method, params)?;
        let id = request.id;

        let text = self.transport.send(request, idempotent).await?;
        let response = Self::parse_response_str::<SuccessT>(&text)?;

        if response.id != jsonrpc::Id::Num(id) {
            return Err(RpcClientError::InvalidId {
                response: text,
                id: response.id,
            });
        }

        response.data.into_result().map_err(|mut error| {
            error.request_id = Some(id);
            self.classify_error(error, method)
        })
    }

    fn serialize_request<ParamsT: Serialize>(
        &self,
        method: &str,
        params: ParamsT,
    ) -> Result<SerializedRequest, RpcClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::to_string(&jsonrpc::Request {
            version: jsonrpc::Version::V2_0,
            id: jsonrpc::Id::Num(id),
            method: method.to_string(),
            params,
        })
        .map_err(RpcClientError::InvalidJsonRequest)?;

        Ok(SerializedRequest { id, body })
    }

    fn parse_response_str<SuccessT: DeserializeOwned>(
        response: &str,
    ) -> Result<jsonrpc::Response<SuccessT>, RpcClientError> {
        serde_json::from_str(response).map_err(|error| RpcClientError::InvalidResponse {
            response: response.to_string(),
            expected_type: std::any::type_name::<jsonrpc::Response<SuccessT>>(),
            error,
        })
    }

    fn classify_error(&self, error: RpcError, method: &str) -> RpcClientError {
        let revert = error
            .revert_data()
            .filter(|_| error.looks_like_revert())
            .map(|data| self.revert_decoder.decode(data));

        match revert {
            Some(revert) => RpcClientError::Revert { revert, error },
            None => RpcClientError::JsonRpc {
                error,
                method: method.to_string(),
            },
        }
    }

    /// Calls `eth_chainId`. The result is cached.
    pub async fn chain_id(&self) -> Result<u64, RpcClientError> {
        let chain_id = self
            .chain_id
            .get_or_try_init(|| async {
                self.request_idempotent::<_, U64Quantity>("eth_chainId", NO_PARAMS)
                    .await
                    .map(|chain_id| chain_id.0)
            })
            .await?;

        Ok(*chain_id)
    }

    /// Calls `eth_blockNumber`.
    pub async fn block_number(&self) -> Result<u64, RpcClientError> {
        self.request_idempotent::<_, U64Quantity>("eth_blockNumber", NO_PARAMS)
            .await
            .map(|number| number.0)
    }

    /// Calls `eth_gasPrice`.
    pub async fn gas_price(&self) -> Result<u128, RpcClientError> {
        self.request_idempotent::<_, U128Quantity>("eth_gasPrice", NO_PARAMS)
            .await
            .map(|price| price.0)
    }

    /// Calls `eth_maxPriorityFeePerGas`.
    pub async fn max_priority_fee_per_gas(&self) -> Result<u128, RpcClientError> {
        self.request_idempotent::<_, U128Quantity>("eth_maxPriorityFeePerGas", NO_PARAMS)
            .await
            .map(|fee| fee.0)
    }

    /// Calls `eth_blobBaseFee`.
    pub async fn blob_base_fee(&self) -> Result<u128, RpcClientError> {
        self.request_idempotent::<_, U128Quantity>("eth_blobBaseFee", NO_PARAMS)
            .await
            .map(|fee| fee.0)
    }

    /// Calls `eth_getBalance`.
    pub async fn get_balance(
        &self,
        address: Address,
        block: BlockSpec,
    ) -> Result<Wei, RpcClientError> {
        self.request_idempotent("eth_getBalance", (address, block))
            .await
    }

    /// Calls `eth_getTransactionCount`.
    pub async fn get_transaction_count(
        &self,
        address: Address,
        block: BlockSpec,
    ) -> Result<u64, RpcClientError> {
        self.request_idempotent::<_, U64Quantity>("eth_getTransactionCount", (address, block))
            .await
            .map(|count| count.0)
    }

    /// Executes a call without creating a transaction. A revert surfaces as
    /// [`RpcClientError::Revert`].
    pub async fn call(
        &self,
        request: &CallRequest,
        block: BlockSpec,
    ) -> Result<HexData, RpcClientError> {
        self.request_idempotent("eth_call", (request, block)).await
    }

    /// Calls `eth_estimateGas`.
    pub async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, RpcClientError> {
        self.request_idempotent::<_, U64Quantity>("eth_estimateGas", (request,))
            .await
            .map(|gas| gas.0)
    }

    /// Broadcasts a signed transaction and returns its hash.
    ///
    /// Never retried: a send that timed out may still have reached the node.
    pub async fn send_raw_transaction(&self, raw_hex: &str) -> Result<Hash, RpcClientError> {
        self.request("eth_sendRawTransaction", (raw_hex,)).await
    }

    /// Returns `None` while the transaction is pending or unknown.
    pub async fn get_transaction_receipt(
        &self,
        hash: Hash,
    ) -> Result<Option<TransactionReceipt>, RpcClientError> {
        self.request_idempotent("eth_getTransactionReceipt", (hash,))
            .await
    }

    /// Calls `eth_feeHistory`.
    pub async fn fee_history(
        &self,
        block_count: u64,
        newest_block: BlockSpec,
        reward_percentiles: &[f64],
    ) -> Result<FeeHistory, RpcClientError> {
        self.request_idempotent(
            "eth_feeHistory",
            (
                format!("0x{block_count:x}"),
                newest_block,
                reward_percentiles,
            ),
        )
        .await
    }
}
