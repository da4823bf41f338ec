//! Time-bounded cache for the network configuration.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::error::Error;
use crate::types::NetworkConfig;

/// Smallest accepted cache expiration.
pub const MINIMUM_CACHING_INTERVAL: Duration = Duration::from_secs(1);

struct CachedConfig {
    config: Arc<NetworkConfig>,
    fetched_at: Instant,
}

/// Caches the network configuration for a fixed expiry.
///
/// Fresh reads share a read lock and never touch the network. A stale read
/// takes the write lock and checks freshness again before fetching, so
/// concurrent callers hitting an expired entry trigger a single fetch.
/// A failed fetch leaves the previous entry untouched.
pub struct ConfigCache {
    expiry: Duration,
    state: RwLock<Option<CachedConfig>>,
}

impl ConfigCache {
    /// Create an empty cache.
    ///
    /// Fails with [`Error::InvalidCacheDuration`] below one second.
    pub fn new(expiry: Duration) -> Result<Self, Error> {
        if expiry < MINIMUM_CACHING_INTERVAL {
            return Err(Error::InvalidCacheDuration {
                provided: expiry,
                minimum: MINIMUM_CACHING_INTERVAL,
            });
        }

        Ok(Self {
            expiry,
            state: RwLock::new(None),
        })
    }

    /// The configured expiry.
    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Return the cached configuration, calling `fetch` only when it is stale.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Arc<NetworkConfig>, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<NetworkConfig, Error>>,
    {
        {
            let state = self.state.read().await;
            if let Some(config) = self.fresh(&state) {
                return Ok(config);
            }
        }

        let mut state = self.state.write().await;
        // another caller may have refreshed while we waited for the lock
        if let Some(config) = self.fresh(&state) {
            return Ok(config);
        }

        debug!(expiry = ?self.expiry, "Network config not cached, fetching");
        let config = Arc::new(fetch().await?);
        *state = Some(CachedConfig {
            config: config.clone(),
            fetched_at: Instant::now(),
        });

        Ok(config)
    }

    /// Drop the cached value; the next read fetches again.
    pub async fn invalidate(&self) {
        *self.state.write().await = None;
    }

    fn fresh(&self, state: &Option<CachedConfig>) -> Option<Arc<NetworkConfig>> {
        let cached = state.as_ref()?;
        if Instant::now().duration_since(cached.fetched_at) > self.expiry {
            return None;
        }
        Some(cached.config.clone())
    }
}

impl std::fmt::Debug for ConfigCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigCache")
            .field("expiry", &self.expiry)
            .finish()
    }
}
