//! REST route templates for the two API personalities.

use std::str::FromStr;

use crate::error::Error;
use crate::types::{RestApiEntityType, ShardId};

// Routes shared by both personalities
const NETWORK_CONFIG: &str = "network/config";
const NETWORK_ECONOMICS: &str = "network/economics";
const RATINGS_CONFIG: &str = "network/ratings";
const ENABLE_EPOCHS_CONFIG: &str = "network/enable-epochs";
const GENESIS_NODES_CONFIG: &str = "network/genesis-nodes";
const TRANSACTION_COST: &str = "transaction/cost";
const SEND_TRANSACTION: &str = "transaction/send";
const SEND_MULTIPLE_TRANSACTIONS: &str = "transaction/send-multiple";
const VM_VALUES: &str = "vm-values/query";

// Observer node routes
const NODE_STATUS: &str = "node/status";

/// Generates the routes of a proxy or observer node REST API.
///
/// Most routes are identical for both personalities. An observer only serves
/// its own shard, so shard-scoped routes carry no shard segment there, and the
/// shard it reports must be checked against the one requested.
///
/// # Example
///
/// ```
/// use erd_kit::{EndpointProvider, RestApiEntityType};
///
/// let proxy = EndpointProvider::new(RestApiEntityType::Proxy);
/// assert_eq!(proxy.node_status(2), "network/status/2");
///
/// let node = EndpointProvider::new(RestApiEntityType::ObserverNode);
/// assert_eq!(node.node_status(2), "node/status");
/// assert!(node.should_check_shard_id_for_node_status());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointProvider {
    /// A single observer node.
    ObserverNode,
    /// A full proxy dispatching to every shard.
    Proxy,
}

impl EndpointProvider {
    /// Select the provider matching an entity type.
    pub fn new(entity_type: RestApiEntityType) -> Self {
        match entity_type {
            RestApiEntityType::ObserverNode => EndpointProvider::ObserverNode,
            RestApiEntityType::Proxy => EndpointProvider::Proxy,
        }
    }

    /// The entity type this provider generates routes for.
    pub fn entity_type(&self) -> RestApiEntityType {
        match self {
            EndpointProvider::ObserverNode => RestApiEntityType::ObserverNode,
            EndpointProvider::Proxy => RestApiEntityType::Proxy,
        }
    }

    pub fn network_config(&self) -> String {
        NETWORK_CONFIG.to_string()
    }

    pub fn network_economics(&self) -> String {
        NETWORK_ECONOMICS.to_string()
    }

    pub fn ratings_config(&self) -> String {
        RATINGS_CONFIG.to_string()
    }

    pub fn enable_epochs_config(&self) -> String {
        ENABLE_EPOCHS_CONFIG.to_string()
    }

    pub fn genesis_nodes_config(&self) -> String {
        GENESIS_NODES_CONFIG.to_string()
    }

    /// Account route for a bech32 address.
    pub fn account(&self, address: &str) -> String {
        format!("address/{}", address)
    }

    pub fn transaction_cost(&self) -> String {
        TRANSACTION_COST.to_string()
    }

    pub fn send_transaction(&self) -> String {
        SEND_TRANSACTION.to_string()
    }

    pub fn send_multiple_transactions(&self) -> String {
        SEND_MULTIPLE_TRANSACTIONS.to_string()
    }

    pub fn transaction_status(&self, hash: &str) -> String {
        format!("transaction/{}/status", hash)
    }

    pub fn transaction_info(&self, hash: &str) -> String {
        format!("transaction/{}", hash)
    }

    pub fn hyperblock_by_nonce(&self, nonce: u64) -> String {
        format!("hyperblock/by-nonce/{}", nonce)
    }

    pub fn hyperblock_by_hash(&self, hash: &str) -> String {
        format!("hyperblock/by-hash/{}", hash)
    }

    pub fn vm_values(&self) -> String {
        VM_VALUES.to_string()
    }

    pub fn raw_start_of_epoch_metablock(&self, epoch: u32) -> String {
        format!("internal/raw/startofepoch/metablock/by-epoch/{}", epoch)
    }

    /// Status route of a shard.
    pub fn node_status(&self, shard_id: ShardId) -> String {
        match self {
            EndpointProvider::ObserverNode => NODE_STATUS.to_string(),
            EndpointProvider::Proxy => format!("network/status/{}", shard_id),
        }
    }

    pub fn raw_block_by_hash(&self, shard_id: ShardId, hex_hash: &str) -> String {
        match self {
            EndpointProvider::ObserverNode => format!("internal/raw/block/by-hash/{}", hex_hash),
            EndpointProvider::Proxy => {
                format!("internal/{}/raw/block/by-hash/{}", shard_id, hex_hash)
            }
        }
    }

    pub fn raw_block_by_nonce(&self, shard_id: ShardId, nonce: u64) -> String {
        match self {
            EndpointProvider::ObserverNode => format!("internal/raw/block/by-nonce/{}", nonce),
            EndpointProvider::Proxy => {
                format!("internal/{}/raw/block/by-nonce/{}", shard_id, nonce)
            }
        }
    }

    pub fn raw_miniblock_by_hash(&self, shard_id: ShardId, hex_hash: &str, epoch: u32) -> String {
        match self {
            EndpointProvider::ObserverNode => {
                format!("internal/raw/miniblock/by-hash/{}/epoch/{}", hex_hash, epoch)
            }
            EndpointProvider::Proxy => format!(
                "internal/{}/raw/miniblock/by-hash/{}/epoch/{}",
                shard_id, hex_hash, epoch
            ),
        }
    }

    /// Whether the shard reported in a status response must match the one requested.
    ///
    /// An observer may be misconfigured; a proxy dispatches by shard itself.
    pub fn should_check_shard_id_for_node_status(&self) -> bool {
        matches!(self, EndpointProvider::ObserverNode)
    }
}

impl From<RestApiEntityType> for EndpointProvider {
    fn from(entity_type: RestApiEntityType) -> Self {
        Self::new(entity_type)
    }
}

impl FromStr for EndpointProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<RestApiEntityType>().map(Self::new)
    }
}
