//! Error types for erd-kit.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error): Main error type, returned by most operations
//!   - [`ProxyError`]: Transport, remote-reported and decode failures
//!   - [`ShardingError`]: Shard coordinator construction and lookups
//!   - [`FinalityError`]: Shard finality verdicts (`syncing` vs `stuck`)
//!   - [`ParseAddressError`]: Invalid bech32 or raw address
//!   - [`ParseKeyError`]: Invalid secret key material
//!   - [`SignerError`]: Signing operation failures
//!
//! # Example
//!
//! ```rust,no_run
//! use erd_kit::*;
//!
//! # async fn example() -> Result<(), Error> {
//! let proxy = ProxyClient::testnet().finality_check(2).build()?;
//! let address: Address = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th".parse()?;
//!
//! match proxy.account(&address).await {
//!     Ok(account) => println!("Balance: {}", account.balance),
//!     Err(Error::Finality(e)) if e.is_syncing() => println!("shard still syncing, retry later"),
//!     Err(Error::Proxy(e)) if e.is_client_error() => println!("bad request: {}", e),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use thiserror::Error;

/// Error parsing an address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("Invalid bech32 address: {0}")]
    InvalidBech32(String),

    #[error("Invalid address prefix: expected '{expected}', got '{actual}'")]
    InvalidPrefix { expected: String, actual: String },

    #[error("Invalid address length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Error parsing a secret key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid key length: expected 32 or 64 bytes, got {0}")]
    InvalidLength(usize),
}

/// Error during signing operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    #[error("Failed to build signing payload: {0}")]
    Payload(String),

    #[error("Signer address {signer} does not match transaction sender {sender}")]
    SenderMismatch { signer: String, sender: String },

    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

// ============================================================================
// Sharding Errors
// ============================================================================

/// Errors raised by the shard coordinator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShardingError {
    #[error("The number of shards must be greater than zero")]
    InvalidNumberOfShards,

    #[error("Shard id {shard_id} must be smaller than the total number of shards ({number_of_shards})")]
    InvalidShardId { shard_id: u32, number_of_shards: u32 },

    #[error("Invalid address: address bytes are empty")]
    InvalidAddress,
}

// ============================================================================
// Finality Errors
// ============================================================================

/// Verdicts of a finality check that refused to trust a shard.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FinalityError {
    #[error("Invalid allowed delta to final: provided {provided}, minimum {minimum}")]
    InvalidDelta { provided: u64, minimum: u64 },

    #[error("Node not started: current, highest and probable nonces are all zero")]
    NodeNotStarted,

    #[error(
        "Shard {shard_id} is syncing: reference nonce is {reference_nonce}, current nonce is {current_nonce}, max delta: {max_delta}"
    )]
    Syncing {
        shard_id: u32,
        reference_nonce: u64,
        current_nonce: u64,
        max_delta: u64,
    },

    #[error(
        "Shard {shard_id} is stuck: reference nonce is {reference_nonce}, current nonce is {current_nonce}, max delta: {max_delta}"
    )]
    Stuck {
        shard_id: u32,
        reference_nonce: u64,
        current_nonce: u64,
        max_delta: u64,
    },

    #[error("Invalid nonce cross check value format: {0}")]
    InvalidCrossCheckFormat(String),
}

impl FinalityError {
    /// The shard is behind the network; waiting and retrying is reasonable.
    pub fn is_syncing(&self) -> bool {
        matches!(self, FinalityError::Syncing { .. })
    }

    /// The shard is ahead of its reference point by more than the allowed delta.
    pub fn is_stuck(&self) -> bool {
        matches!(self, FinalityError::Stuck { .. })
    }
}

// ============================================================================
// Proxy Errors
// ============================================================================

/// Transport, remote and decode errors from a proxy or observer node.
#[derive(Debug, Error)]
pub enum ProxyError {
    // ─── Network/Transport ───
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    // ─── Decoding ───
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // ─── Remote ───
    #[error("Remote error: {message} (code: {code})")]
    Remote { message: String, code: String },

    #[error("Shard id mismatch: requested from {requested}, got response from {received}")]
    ShardIdMismatch { requested: u32, received: u32 },
}

impl ProxyError {
    /// HTTP status associated with this error, if any.
    ///
    /// Connection-level failures report `None`.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProxyError::HttpStatus { status, .. } => Some(*status),
            ProxyError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true for 4xx statuses (caller fault).
    pub fn is_client_error(&self) -> bool {
        self.status_code()
            .is_some_and(|status| (400..500).contains(&status))
    }

    /// Returns true when the envelope's `error` field was populated.
    pub fn is_remote(&self) -> bool {
        matches!(self, ProxyError::Remote { .. })
    }

    /// Returns true when the request never got an answer in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProxyError::Http(e) if e.is_timeout())
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// Main error type for erd-kit operations.
#[derive(Debug, Error)]
pub enum Error {
    // ─── Configuration ───
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid cache expiration: provided {provided:?}, minimum {minimum:?}")]
    InvalidCacheDuration { provided: Duration, minimum: Duration },

    #[error("Invalid allowed delta to final: provided {provided}, minimum {minimum}")]
    InvalidDeltaToFinal { provided: u64, minimum: u64 },

    #[error("Unknown REST API entity type: '{0}'")]
    UnknownEntityType(String),

    // ─── Missing arguments ───
    #[error("Nil network configs")]
    NilNetworkConfig,

    #[error("Nil address")]
    NilAddress,

    #[error("Invalid balance: '{0}'")]
    InvalidBalance(String),

    // ─── Wrapped ───
    #[error(transparent)]
    Proxy(#[from] ProxyError),

    #[error(transparent)]
    Sharding(#[from] ShardingError),

    #[error(transparent)]
    Finality(#[from] FinalityError),

    #[error(transparent)]
    ParseAddress(#[from] ParseAddressError),

    #[error(transparent)]
    ParseKey(#[from] ParseKeyError),

    #[error(transparent)]
    Signer(#[from] SignerError),
}

impl Error {
    /// Returns true if this error came from a finality check reporting a syncing shard.
    pub fn is_syncing(&self) -> bool {
        matches!(self, Error::Finality(e) if e.is_syncing())
    }

    /// Returns true if this error came from a finality check reporting a stuck shard.
    pub fn is_stuck(&self) -> bool {
        matches!(self, Error::Finality(e) if e.is_stuck())
    }
}
