//! Hyperblock types.

use serde::{Deserialize, Serialize};

use super::{ShardId, TransactionOnNetwork};

/// A shard block notarized by a hyperblock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardBlockInfo {
    pub hash: String,
    pub nonce: u64,
    pub shard: ShardId,
}

/// A metachain block together with the shard blocks it notarizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HyperBlock {
    pub nonce: u64,
    pub round: u64,
    pub hash: String,
    pub prev_block_hash: String,
    pub epoch: u64,
    pub num_txs: u64,
    pub shard_blocks: Vec<ShardBlockInfo>,
    pub transactions: Vec<TransactionOnNetwork>,
    pub timestamp: i64,
}
