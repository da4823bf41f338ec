//! Client module for interacting with a proxy or observer node.
//!
//! This module provides the core client infrastructure:
//!
//! - [`ProxyClient`]: The main client, the single entry point for all operations
//! - [`ProxyBuilder`]: Fluent builder for configuring the client
//! - [`Transport`] / [`HttpTransport`]: The GET/POST primitive underneath
//!
//! # Building blocks
//!
//! | Component | Role |
//! |-----------|------|
//! | [`ShardCoordinator`] | Maps an address to its shard |
//! | [`EndpointProvider`] | Route templates of the proxy and observer APIs |
//! | [`ConfigCache`] | Time-bounded network config cache |
//! | [`FinalityProvider`] | Decides whether a shard's state can be trusted |
//! | [`NonceCoordinator`] | Hands out per-sender nonces under concurrency |
//! | [`InMemorySigner`] | Signs transactions with a key held in memory |

mod config_cache;
mod endpoint;
mod finality;
mod nonce_manager;
mod proxy;
mod sharding;
mod signer;
mod transport;

pub use config_cache::{ConfigCache, MINIMUM_CACHING_INTERVAL};
pub use endpoint::EndpointProvider;
pub use finality::{
    FinalityProvider, MIN_ALLOWED_DELTA_TO_FINAL, NetworkStatusSource, StatusFuture,
    extract_nonce_of_shard,
};
pub use nonce_manager::NonceCoordinator;
pub use proxy::{
    DEFAULT_ALLOWED_DELTA_TO_FINAL, DEFAULT_CACHE_EXPIRATION, DEFAULT_TIMEOUT, DEVNET, Gateway,
    MAINNET, ProxyBuilder, ProxyClient, TESTNET,
};
pub use sharding::ShardCoordinator;
pub use signer::{InMemorySigner, Signer, SigningKey};
pub use transport::{HTTP_USER_AGENT, HttpResponse, HttpTransport, Transport, TransportFuture};
