//! Network-level response types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use super::ShardId;

// ============================================================================
// Network configuration
// ============================================================================

/// Network configuration parameters.
///
/// Fetched from the network and cached by the client; a refresh replaces the
/// whole value.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    #[serde(rename = "erd_chain_id")]
    pub chain_id: String,
    #[serde(rename = "erd_denomination")]
    pub denomination: u32,
    #[serde(rename = "erd_gas_per_data_byte")]
    pub gas_per_data_byte: u64,
    #[serde(rename = "erd_latest_tag_software_version")]
    pub latest_tag_software_version: String,
    #[serde(rename = "erd_meta_consensus_group_size")]
    pub meta_consensus_group_size: u32,
    #[serde(rename = "erd_min_gas_limit")]
    pub min_gas_limit: u64,
    #[serde(rename = "erd_min_gas_price")]
    pub min_gas_price: u64,
    #[serde(rename = "erd_min_transaction_version")]
    pub min_transaction_version: u32,
    #[serde(rename = "erd_num_metachain_nodes")]
    pub num_metachain_nodes: u32,
    #[serde(rename = "erd_num_nodes_in_shard")]
    pub num_nodes_in_shard: u32,
    #[serde(rename = "erd_num_shards_without_meta")]
    pub num_shards_without_meta: u32,
    /// Round duration in milliseconds.
    #[serde(rename = "erd_round_duration")]
    pub round_duration: i64,
    #[serde(rename = "erd_shard_consensus_group_size")]
    pub shard_consensus_group_size: u64,
    /// Genesis time as a unix timestamp.
    #[serde(rename = "erd_start_time")]
    pub start_time: i64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_adaptivity")]
    pub adaptivity: bool,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_hysteresis")]
    pub hysteresis: f32,
}

/// Network economics metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkEconomics {
    #[serde(rename = "erd_dev_rewards")]
    pub dev_rewards: String,
    #[serde(rename = "erd_epoch_for_economics_data")]
    pub epoch_for_economics_data: u32,
    #[serde(rename = "erd_inflation")]
    pub inflation: String,
    #[serde(rename = "erd_total_fees")]
    pub total_fees: String,
    #[serde(rename = "erd_total_staked_value")]
    pub total_staked_value: String,
    #[serde(rename = "erd_total_supply")]
    pub total_supply: String,
    #[serde(rename = "erd_total_top_up_value")]
    pub total_top_up_value: String,
}

// ============================================================================
// Ratings
// ============================================================================

/// Validator selection chances for a rating threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChances {
    #[serde(rename = "erd_chance_percent")]
    pub chance_percent: u32,
    #[serde(rename = "erd_max_threshold")]
    pub max_threshold: u32,
}

/// Ratings configuration parameters.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingsConfig {
    #[serde(rename = "erd_ratings_general_max_rating")]
    pub general_max_rating: u32,
    #[serde(rename = "erd_ratings_general_min_rating")]
    pub general_min_rating: u32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_ratings_general_signed_blocks_threshold")]
    pub general_signed_blocks_threshold: f32,
    #[serde(rename = "erd_ratings_general_start_rating")]
    pub general_start_rating: u32,
    #[serde(rename = "erd_ratings_general_selection_chances")]
    pub general_selection_chances: Vec<SelectionChances>,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_ratings_metachain_consecutive_missed_blocks_penalty")]
    pub metachain_consecutive_missed_blocks_penalty: f32,
    #[serde(rename = "erd_ratings_metachain_hours_to_max_rating_from_start_rating")]
    pub metachain_hours_to_max_rating_from_start_rating: u32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_ratings_metachain_proposer_decrease_factor")]
    pub metachain_proposer_decrease_factor: f32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_ratings_metachain_proposer_validator_importance")]
    pub metachain_proposer_validator_importance: f32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_ratings_metachain_validator_decrease_factor")]
    pub metachain_validator_decrease_factor: f32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_ratings_peerhonesty_bad_peer_threshold")]
    pub peer_honesty_bad_peer_threshold: f64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_ratings_peerhonesty_decay_coefficient")]
    pub peer_honesty_decay_coefficient: f64,
    #[serde(rename = "erd_ratings_peerhonesty_decay_update_interval_inseconds")]
    pub peer_honesty_decay_update_interval_in_seconds: u32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_ratings_peerhonesty_max_score")]
    pub peer_honesty_max_score: f64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_ratings_peerhonesty_min_score")]
    pub peer_honesty_min_score: f64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_ratings_peerhonesty_unit_value")]
    pub peer_honesty_unit_value: f64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_ratings_shardchain_consecutive_missed_blocks_penalty")]
    pub shardchain_consecutive_missed_blocks_penalty: f32,
    #[serde(rename = "erd_ratings_shardchain_hours_to_max_rating_from_start_rating")]
    pub shardchain_hours_to_max_rating_from_start_rating: u32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_ratings_shardchain_proposer_decrease_factor")]
    pub shardchain_proposer_decrease_factor: f32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_ratings_shardchain_proposer_validator_importance")]
    pub shardchain_proposer_validator_importance: f32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(rename = "erd_ratings_shardchain_validator_decrease_factor")]
    pub shardchain_validator_decrease_factor: f32,
}

// ============================================================================
// Enable epochs / genesis
// ============================================================================

/// One step of the max-nodes schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxNodesChangeConfig {
    #[serde(rename = "erd_epoch_enable")]
    pub epoch_enable: u32,
    #[serde(rename = "erd_max_num_nodes")]
    pub max_num_nodes: u32,
    #[serde(rename = "erd_nodes_to_shuffle_per_shard")]
    pub nodes_to_shuffle_per_shard: u32,
}

/// Activation epochs of protocol features.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnableEpochsConfig {
    #[serde(rename = "erd_balance_waiting_lists_enable_epoch")]
    pub balance_waiting_lists_enable_epoch: u32,
    #[serde(rename = "erd_waiting_list_fix_enable_epoch")]
    pub waiting_list_fix_enable_epoch: u32,
    #[serde(rename = "erd_max_nodes_change_enable_epoch")]
    pub max_nodes_change_enable_epoch: Vec<MaxNodesChangeConfig>,
}

/// Genesis node public keys grouped by shard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisNodes {
    pub eligible: BTreeMap<ShardId, Vec<String>>,
    pub waiting: BTreeMap<ShardId, Vec<String>>,
}

// ============================================================================
// Network status
// ============================================================================

/// Per-shard view of the chain head.
///
/// Fetched per call and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkStatus {
    #[serde(rename = "erd_current_round")]
    pub current_round: u64,
    #[serde(rename = "erd_epoch_number")]
    pub epoch_number: u64,
    /// Current (committed) nonce.
    #[serde(rename = "erd_nonce")]
    pub nonce: u64,
    #[serde(rename = "erd_nonce_at_epoch_start")]
    pub nonce_at_epoch_start: u64,
    #[serde(rename = "erd_nonces_passed_in_current_epoch")]
    pub nonces_passed_in_current_epoch: u64,
    #[serde(rename = "erd_round_at_epoch_start")]
    pub round_at_epoch_start: u64,
    #[serde(rename = "erd_rounds_passed_in_current_epoch")]
    pub rounds_passed_in_current_epoch: u64,
    #[serde(rename = "erd_rounds_per_epoch")]
    pub rounds_per_epoch: u64,
    /// Metachain summary of notarized shard nonces: `"0: 500, 1: 510, "`.
    #[serde(rename = "erd_cross_check_block_height")]
    pub cross_check_block_height: String,
    #[serde(rename = "erd_highest_final_nonce")]
    pub highest_final_nonce: u64,
    #[serde(rename = "erd_probable_highest_nonce")]
    pub probable_highest_nonce: u64,
    #[serde(rename = "erd_shard_id")]
    pub shard_id: ShardId,
}
