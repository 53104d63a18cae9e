//! Ethereum JSON-RPC payload types used by the typed client helpers.

use quill_primitives::{Address, Hash, HexData, Wei, quantity};
use serde::{Deserialize, Serialize, Serializer};

/// A block tag understood by every node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    /// The genesis block
    Earliest,
    /// The most recent block
    Latest,
    /// The block being built
    Pending,
    /// The most recent safe head
    Safe,
    /// The most recent finalized block
    Finalized,
}

/// Identifies the block a read is evaluated against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockSpec {
    /// A block by number
    Number(u64),
    /// A block by tag
    Tag(BlockTag),
}

impl BlockSpec {
    /// The `latest` tag
    pub const fn latest() -> Self {
        BlockSpec::Tag(BlockTag::Latest)
    }

    /// The `pending` tag
    pub const fn pending() -> Self {
        BlockSpec::Tag(BlockTag::Pending)
    }
}

impl Default for BlockSpec {
    fn default() -> Self {
        Self::latest()
    }
}

impl From<u64> for BlockSpec {
    fn from(number: u64) -> Self {
        BlockSpec::Number(number)
    }
}

impl From<BlockTag> for BlockSpec {
    fn from(tag: BlockTag) -> Self {
        BlockSpec::Tag(tag)
    }
}

impl Serialize for BlockSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BlockSpec::Number(number) => quantity::u64::serialize(number, serializer),
            BlockSpec::Tag(tag) => tag.serialize(serializer),
        }
    }
}

/// Arguments of `eth_call` and `eth_estimateGas`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    /// Sender
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// `None` simulates a contract creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Gas limit
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "quantity::opt_u64"
    )]
    pub gas: Option<u64>,
    /// Value transferred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Wei>,
    /// Call data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<HexData>,
}

/// A log emitted during execution.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// Emitting contract
    pub address: Address,
    /// Indexed topics, the event signature hash first
    pub topics: Vec<Hash>,
    /// Non-indexed data
    pub data: HexData,
    /// Position in the block
    #[serde(default, with = "quantity::opt_u64")]
    pub log_index: Option<u64>,
}

/// Result of `eth_getTransactionReceipt`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Hash of the transaction
    pub transaction_hash: Hash,
    /// Position in the block
    #[serde(with = "quantity::u64")]
    pub transaction_index: u64,
    /// Hash of the including block
    pub block_hash: Hash,
    /// Number of the including block
    #[serde(with = "quantity::u64")]
    pub block_number: u64,
    /// Sender
    pub from: Address,
    /// Recipient; `None` for contract creation
    pub to: Option<Address>,
    /// Gas used by this transaction
    #[serde(with = "quantity::u64")]
    pub gas_used: u64,
    /// Gas used by the block up to and including this transaction
    #[serde(with = "quantity::u64")]
    pub cumulative_gas_used: u64,
    /// Price paid per unit of gas
    #[serde(default)]
    pub effective_gas_price: Option<Wei>,
    /// Address of the created contract, if any
    #[serde(default)]
    pub contract_address: Option<Address>,
    /// `1` for success, `0` for failure; absent before Byzantium.
    #[serde(default, with = "quantity::opt_u64")]
    pub status: Option<u64>,
    /// Emitted logs
    #[serde(default)]
    pub logs: Vec<Log>,
}

impl TransactionReceipt {
    /// Whether execution succeeded. Pre-Byzantium receipts carry no status
    /// and report `None`.
    pub fn succeeded(&self) -> Option<bool> {
        self.status.map(|status| status == 1)
    }
}

/// Result of `eth_feeHistory`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeHistory {
    /// Lowest number block of returned range.
    #[serde(with = "quantity::u64")]
    pub oldest_block: u64,
    /// Base fees of the returned blocks, plus the block after the newest.
    pub base_fee_per_gas: Vec<Wei>,
    /// Blob base fees, when the node reports them
    #[serde(default)]
    pub base_fee_per_blob_gas: Vec<Wei>,
    /// Ratio of gas used to gas limit, per block
    pub gas_used_ratio: Vec<f64>,
    /// Priority fees at the requested percentiles, per block.
    #[serde(default)]
    pub reward: Option<Vec<Vec<Wei>>>,
}

#[derive(Deserialize)]
#[serde(transparent)]
pub(crate) struct U64Quantity(#[serde(with = "quantity::u64")] pub u64);

#[derive(Deserialize)]
#[serde(transparent)]
pub(crate) struct U128Quantity(#[serde(with = "quantity::u128")] pub u128);
