//! Core types for the network.
//!
//! This module provides the domain types used across the client:
//!
//! - [`Address`] - Account identifier (bech32 `erd1...`)
//! - [`SecretKey`] - Ed25519 key used for signing
//! - [`ShardId`] and the shard helpers
//! - [`NetworkConfig`], [`NetworkStatus`] and the other network parameters
//! - [`Transaction`], [`TransactionArguments`] and the transaction views
//! - [`Account`], [`HyperBlock`], [`VmOutput`]

mod account;
mod address;
mod block;
mod key;
mod network;
mod shard;
mod transaction;
mod vm;

pub use account::Account;
pub use address::{
    ADDRESS_HRP, ADDRESS_LEN, Address, is_empty_address, is_metachain_identifier,
    is_smart_contract_address, is_smart_contract_on_metachain, is_system_account_address,
};
pub use block::{HyperBlock, ShardBlockInfo};
pub use key::{SEED_LEN, SIGNATURE_LEN, SecretKey, verify_signature};
pub use network::{
    EnableEpochsConfig, GenesisNodes, MaxNodesChangeConfig, NetworkConfig, NetworkEconomics,
    NetworkStatus, RatingsConfig, SelectionChances,
};
pub use shard::{
    ALL_SHARD_ID, METACHAIN_SHARD_ID, RestApiEntityType, ShardId,
    communication_identifier_between_shards, epoch_start_identifier, parse_shard_id,
    shard_id_display, shard_id_to_string,
};
pub use transaction::{
    SmartContractResult, Transaction, TransactionArguments, TransactionOnNetwork, TxCost, TxStatus,
};
pub(crate) use vm::VmValueRequestWithOptions;
pub use vm::{ReturnDataKind, ReturnValue, VmOutput, VmValueRequest};
