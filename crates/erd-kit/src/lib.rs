//! A shard-aware Rust client for Elrond-style REST proxies and observer nodes.
//!
//! **erd-kit** reads network state, estimates, signs and broadcasts
//! transactions, and refuses to trust a shard that is syncing or stuck.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use erd_kit::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), erd_kit::Error> {
//!     // Configure once
//!     let proxy = ProxyClient::devnet().build()?;
//!
//!     // Check balance
//!     let address: Address = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th".parse()?;
//!     let balance = proxy.balance(&address).await?;
//!     println!("Balance: {}", balance);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Design Principles
//!
//! 1. **Single entry point**: Everything hangs off the [`ProxyClient`]
//! 2. **Two personalities**: The same client talks to a full proxy or to a single observer node
//! 3. **No silent defaults**: Every failure surfaces as a typed [`Error`]; nothing decodes to zero
//! 4. **Safe under concurrency**: One config fetch per expiry window, one nonce per transaction
//!
//! # Sharding
//!
//! Shard assignment is a pure function of the address bytes:
//!
//! ```
//! use erd_kit::{Address, ShardCoordinator, METACHAIN_SHARD_ID, communication_identifier_between_shards};
//!
//! let coordinator = ShardCoordinator::new(3, 0).unwrap();
//! let alice: Address = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th".parse().unwrap();
//! assert_eq!(coordinator.compute_id(&alice).unwrap(), 1);
//!
//! assert_eq!(communication_identifier_between_shards(2, 0), "_0_2");
//! assert_eq!(communication_identifier_between_shards(1, METACHAIN_SHARD_ID), "_1_META");
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{
    Error, FinalityError, ParseAddressError, ParseKeyError, ProxyError, ShardingError, SignerError,
};
pub use types::*;

// Re-export client types
pub use client::{
    ConfigCache, EndpointProvider, FinalityProvider, Gateway, HttpResponse, HttpTransport,
    InMemorySigner, NetworkStatusSource, NonceCoordinator, ProxyBuilder, ProxyClient,
    ShardCoordinator, Signer, SigningKey, StatusFuture, Transport, TransportFuture,
};
