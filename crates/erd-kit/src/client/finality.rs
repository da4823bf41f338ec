//! Shard finality checks.
//!
//! Before trusting state read from a shard, the client can verify that the
//! shard's reported head is not lagging behind the network. Two strategies
//! exist, matching the two REST API personalities:
//!
//! - **Node**: an observer knows its own current, highest final and probable
//!   highest nonces; it is syncing when visibly behind the probable head and
//!   stuck when its committed head runs ahead of its final nonce.
//! - **Proxy**: the metachain reports the last nonce it notarized for every
//!   shard; a shard is syncing when behind that value and stuck when ahead of
//!   it by more than the allowed delta.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::error::{Error, FinalityError};
use crate::types::{METACHAIN_SHARD_ID, NetworkStatus, RestApiEntityType, ShardId};

/// Smallest accepted nonce delta for a finality check.
pub const MIN_ALLOWED_DELTA_TO_FINAL: u64 = 1;

/// Boxed future returned by [`NetworkStatusSource::network_status`].
pub type StatusFuture<'a> = Pin<Box<dyn Future<Output = Result<NetworkStatus, Error>> + Send + 'a>>;

/// Something able to report the network status of a shard.
pub trait NetworkStatusSource: Send + Sync {
    /// Fetch the status of `shard_id`.
    fn network_status(&self, shard_id: ShardId) -> StatusFuture<'_>;

    /// The REST API personality the status comes from.
    fn entity_type(&self) -> RestApiEntityType;
}

/// Decides whether a shard's state is final enough to be trusted.
#[derive(Clone)]
pub enum FinalityProvider {
    /// Every shard is considered final.
    Disabled,
    /// Judge a shard from its own observer's nonces.
    Node(Arc<dyn NetworkStatusSource>),
    /// Judge a shard against the metachain's cross-check nonces.
    Proxy(Arc<dyn NetworkStatusSource>),
}

impl FinalityProvider {
    /// Select the strategy matching the source's entity type, or
    /// [`FinalityProvider::Disabled`] when `finality_check` is off.
    pub fn new(source: Arc<dyn NetworkStatusSource>, finality_check: bool) -> Self {
        if !finality_check {
            return FinalityProvider::Disabled;
        }

        match source.entity_type() {
            RestApiEntityType::ObserverNode => FinalityProvider::Node(source),
            RestApiEntityType::Proxy => FinalityProvider::Proxy(source),
        }
    }

    /// Returns true unless this is the disabled strategy.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, FinalityProvider::Disabled)
    }

    /// Check that `target_shard` is within `max_nonces_delta` of final.
    pub async fn check_shard_finalization(
        &self,
        target_shard: ShardId,
        max_nonces_delta: u64,
    ) -> Result<(), Error> {
        match self {
            FinalityProvider::Disabled => Ok(()),
            FinalityProvider::Node(source) => {
                check_delta(max_nonces_delta)?;
                let status = source.network_status(target_shard).await?;
                node_verdict(target_shard, &status, max_nonces_delta).map_err(Into::into)
            }
            FinalityProvider::Proxy(source) => {
                check_delta(max_nonces_delta)?;
                // meta notarizes itself; with a delta of at least 1 it is always final
                if target_shard == METACHAIN_SHARD_ID {
                    return Ok(());
                }

                let meta_status = source.network_status(METACHAIN_SHARD_ID).await?;
                let meta_nonce =
                    extract_nonce_of_shard(&meta_status.cross_check_block_height, target_shard)?;
                let shard_status = source.network_status(target_shard).await?;

                proxy_verdict(target_shard, meta_nonce, shard_status.nonce, max_nonces_delta)
                    .map_err(Into::into)
            }
        }
    }
}

impl std::fmt::Debug for FinalityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FinalityProvider::Disabled => "Disabled",
            FinalityProvider::Node(_) => "Node",
            FinalityProvider::Proxy(_) => "Proxy",
        };
        f.debug_tuple("FinalityProvider").field(&name).finish()
    }
}

fn check_delta(max_nonces_delta: u64) -> Result<(), FinalityError> {
    if max_nonces_delta < MIN_ALLOWED_DELTA_TO_FINAL {
        return Err(FinalityError::InvalidDelta {
            provided: max_nonces_delta,
            minimum: MIN_ALLOWED_DELTA_TO_FINAL,
        });
    }
    Ok(())
}

fn node_verdict(
    shard_id: ShardId,
    status: &NetworkStatus,
    max_delta: u64,
) -> Result<(), FinalityError> {
    let current = status.nonce;
    let highest = status.highest_final_nonce;
    let probable = status.probable_highest_nonce;

    if current == 0 && highest == 0 && probable == 0 {
        return Err(FinalityError::NodeNotStarted);
    }

    if current.saturating_add(max_delta) < probable {
        warn!(shard_id, current, probable, max_delta, "Shard is syncing");
        return Err(FinalityError::Syncing {
            shard_id,
            reference_nonce: probable,
            current_nonce: current,
            max_delta,
        });
    }
    if current <= highest.saturating_add(max_delta) {
        trace!(shard_id, current, highest, probable, max_delta, "Shard is in sync");
        return Ok(());
    }

    warn!(shard_id, current, highest, max_delta, "Shard is stuck");
    Err(FinalityError::Stuck {
        shard_id,
        reference_nonce: highest,
        current_nonce: current,
        max_delta,
    })
}

fn proxy_verdict(
    shard_id: ShardId,
    meta_nonce: u64,
    shard_nonce: u64,
    max_delta: u64,
) -> Result<(), FinalityError> {
    if shard_nonce < meta_nonce {
        warn!(shard_id, meta_nonce, shard_nonce, max_delta, "Shard is syncing");
        return Err(FinalityError::Syncing {
            shard_id,
            reference_nonce: meta_nonce,
            current_nonce: shard_nonce,
            max_delta,
        });
    }
    if shard_nonce <= meta_nonce.saturating_add(max_delta) {
        trace!(shard_id, meta_nonce, shard_nonce, max_delta, "Shard is in sync");
        return Ok(());
    }

    warn!(shard_id, meta_nonce, shard_nonce, max_delta, "Shard is stuck");
    Err(FinalityError::Stuck {
        shard_id,
        reference_nonce: meta_nonce,
        current_nonce: shard_nonce,
        max_delta,
    })
}

/// Extract the nonce reported for `shard_id` from a metachain cross-check
/// value such as `"0: 9169897, 1: 9166353, 2: 9170524, "`.
///
/// Entries without exactly one `:` are skipped.
pub fn extract_nonce_of_shard(cross_check: &str, shard_id: ShardId) -> Result<u64, FinalityError> {
    if cross_check.is_empty() {
        return Err(FinalityError::InvalidCrossCheckFormat(
            "empty value, maybe bad observer version".to_string(),
        ));
    }

    let wanted = shard_id.to_string();
    for entry in cross_check.split(',') {
        let parts: Vec<&str> = entry.split(':').collect();
        let [shard, nonce] = parts.as_slice() else {
            continue;
        };
        if shard.trim() != wanted {
            continue;
        }

        let nonce = nonce.trim();
        return nonce.parse().map_err(|_| {
            FinalityError::InvalidCrossCheckFormat(format!(
                "{} is not a valid number as found in this response: {}",
                nonce, cross_check
            ))
        });
    }

    Err(FinalityError::InvalidCrossCheckFormat(format!(
        "value not found for shard {} from this response: {}",
        shard_id, cross_check
    )))
}
