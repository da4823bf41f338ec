//! Proxy client and builder.
//!
//! [`ProxyClient`] exposes every network operation over a proxy or observer
//! node REST API. Configure it through [`ProxyBuilder`]:
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use erd_kit::*;
//!
//! # async fn example() -> Result<(), Error> {
//! let proxy = ProxyClient::devnet()
//!     .cache_expiration(Duration::from_secs(30))
//!     .finality_check(7)
//!     .build()?;
//!
//! let config = proxy.network_config().await?;
//! println!("chain {} with {} shards", config.chain_id, config.num_shards_without_meta);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::config_cache::ConfigCache;
use super::endpoint::EndpointProvider;
use super::finality::{
    FinalityProvider, MIN_ALLOWED_DELTA_TO_FINAL, NetworkStatusSource, StatusFuture,
};
use super::nonce_manager::NonceCoordinator;
use super::sharding::ShardCoordinator;
use super::signer::Signer;
use super::transport::{HttpResponse, HttpTransport, Transport};
use crate::error::{Error, ParseAddressError, ProxyError};
use crate::types::{
    Account, Address, EnableEpochsConfig, GenesisNodes, HyperBlock, METACHAIN_SHARD_ID,
    NetworkConfig, NetworkEconomics, NetworkStatus, RatingsConfig, RestApiEntityType, ShardId,
    Transaction, TransactionArguments, TransactionOnNetwork, TxCost, TxStatus, VmOutput,
    VmValueRequest, VmValueRequestWithOptions,
};

const WITH_RESULTS_QUERY_PARAM: &str = "?withResults=true";

/// Cache expiration used when none is configured.
pub const DEFAULT_CACHE_EXPIRATION: Duration = Duration::from_secs(60);

/// Allowed nonce delta used when finality checking is enabled from the environment.
pub const DEFAULT_ALLOWED_DELTA_TO_FINAL: u64 = 7;

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// ============================================================================
// Gateway presets
// ============================================================================

/// Public gateway presets.
pub struct Gateway {
    /// The proxy URL of this network.
    pub url: &'static str,
    /// The network identifier (e.g., "mainnet", "devnet").
    pub name: &'static str,
}

/// Mainnet gateway.
pub const MAINNET: Gateway = Gateway {
    url: "https://gateway.multiversx.com",
    name: "mainnet",
};

/// Testnet gateway.
pub const TESTNET: Gateway = Gateway {
    url: "https://testnet-gateway.multiversx.com",
    name: "testnet",
};

/// Devnet gateway.
pub const DEVNET: Gateway = Gateway {
    url: "https://devnet-gateway.multiversx.com",
    name: "devnet",
};

// ============================================================================
// Response envelope
// ============================================================================

/// `{"data": ..., "error": "...", "code": "..."}`
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default)]
    error: String,
    #[serde(default)]
    code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendMultipleResponse {
    #[serde(default)]
    num_of_sent_txs: usize,
    txs_hashes: BTreeMap<usize, String>,
}

/// Unwrap a response envelope and decode `data[field]`, or `data` itself
/// when `field` is `None`.
fn decode_envelope<T: DeserializeOwned>(
    response: HttpResponse,
    field: Option<&str>,
) -> Result<T, ProxyError> {
    if !response.is_ok() {
        return Err(ProxyError::HttpStatus {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        });
    }

    let envelope: Envelope = serde_json::from_slice(&response.body)?;
    if !envelope.error.is_empty() {
        return Err(ProxyError::Remote {
            message: envelope.error,
            code: envelope.code,
        });
    }

    let mut data = envelope.data;
    let value = match field {
        Some(field) => data.get_mut(field).map(serde_json::Value::take),
        None => Some(data),
    };
    match value {
        Some(value) if !value.is_null() => Ok(serde_json::from_value(value)?),
        _ => Err(ProxyError::InvalidResponse(format!(
            "missing '{}' in response data",
            field.unwrap_or("data")
        ))),
    }
}

// ============================================================================
// BaseProxy
// ============================================================================

/// Transport, routes and the config cache; the status source behind the
/// finality provider.
struct BaseProxy {
    transport: Arc<dyn Transport>,
    endpoints: EndpointProvider,
    config_cache: ConfigCache,
    url: String,
}

impl BaseProxy {
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        field: Option<&str>,
    ) -> Result<T, ProxyError> {
        let response = self.transport.get(endpoint).await?;
        decode_envelope(response, field)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
        field: Option<&str>,
    ) -> Result<T, ProxyError> {
        let body = serde_json::to_vec(body)?;
        let response = self.transport.post(endpoint, body).await?;
        decode_envelope(response, field)
    }

    async fn network_config(&self) -> Result<Arc<NetworkConfig>, Error> {
        self.config_cache
            .get_or_fetch(|| async {
                let endpoint = self.endpoints.network_config();
                Ok(self.get(&endpoint, Some("config")).await?)
            })
            .await
    }

    async fn fetch_network_status(&self, shard_id: ShardId) -> Result<NetworkStatus, Error> {
        let endpoint = self.endpoints.node_status(shard_id);
        let field = match self.endpoints {
            EndpointProvider::ObserverNode => "metrics",
            EndpointProvider::Proxy => "status",
        };
        let status: NetworkStatus = self.get(&endpoint, Some(field)).await?;

        if self.endpoints.should_check_shard_id_for_node_status() && status.shard_id != shard_id {
            warn!(
                requested = shard_id,
                received = status.shard_id,
                url = %self.url,
                "Observer answered from another shard"
            );
            return Err(ProxyError::ShardIdMismatch {
                requested: shard_id,
                received: status.shard_id,
            }
            .into());
        }

        Ok(status)
    }
}

impl NetworkStatusSource for BaseProxy {
    fn network_status(&self, shard_id: ShardId) -> StatusFuture<'_> {
        Box::pin(self.fetch_network_status(shard_id))
    }

    fn entity_type(&self) -> RestApiEntityType {
        self.endpoints.entity_type()
    }
}

// ============================================================================
// ProxyClient
// ============================================================================

/// Client for a proxy or observer node REST API.
///
/// Cheap to clone; clones share the config cache and the nonce coordinator.
///
/// # Example
///
/// ```rust,no_run
/// use erd_kit::*;
///
/// # async fn example() -> Result<(), Error> {
/// let proxy = ProxyClient::mainnet().build()?;
///
/// let address: Address = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th".parse()?;
/// println!("shard: {}", proxy.shard_of_address(&address).await?);
/// println!("balance: {}", proxy.balance(&address).await?);
///
/// let nonce = proxy.latest_hyperblock_nonce().await?;
/// let block = proxy.hyperblock_by_nonce(nonce).await?;
/// println!("{} transactions in hyperblock {}", block.num_txs, block.nonce);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProxyClient {
    base: Arc<BaseProxy>,
    finality: FinalityProvider,
    allowed_delta_to_final: u64,
    nonces: Arc<NonceCoordinator>,
    same_sc_state: bool,
    should_be_synced: bool,
}

impl ProxyClient {
    /// Create a builder for mainnet.
    pub fn mainnet() -> ProxyBuilder {
        ProxyBuilder::new(MAINNET.url)
    }

    /// Create a builder for testnet.
    pub fn testnet() -> ProxyBuilder {
        ProxyBuilder::new(TESTNET.url)
    }

    /// Create a builder for devnet.
    pub fn devnet() -> ProxyBuilder {
        ProxyBuilder::new(DEVNET.url)
    }

    /// Create a builder with a custom proxy URL.
    pub fn custom(url: impl Into<String>) -> ProxyBuilder {
        ProxyBuilder::new(url)
    }

    /// Create a configured client from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `ERD_PROXY_URL` (optional): `"mainnet"`, `"testnet"`, `"devnet"`, or a
    ///   custom URL. Defaults to testnet.
    /// - `ERD_ENTITY_TYPE` (optional): `"proxy"` or `"observer"`.
    /// - `ERD_CACHE_EXPIRATION_SECS` (optional): network config cache expiry.
    /// - `ERD_FINALITY_CHECK` (optional): `"true"` or `"false"`.
    /// - `ERD_ALLOWED_DELTA_TO_FINAL` (optional): nonce delta for the finality
    ///   check; requires `ERD_FINALITY_CHECK=true`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable cannot be parsed, and the usual
    /// construction errors of [`ProxyBuilder::build`].
    pub fn from_env() -> Result<ProxyClient, Error> {
        let url = std::env::var("ERD_PROXY_URL").ok();
        let entity_type = std::env::var("ERD_ENTITY_TYPE").ok();
        let cache_secs = std::env::var("ERD_CACHE_EXPIRATION_SECS").ok();
        let finality_check = std::env::var("ERD_FINALITY_CHECK").ok();
        let allowed_delta = std::env::var("ERD_ALLOWED_DELTA_TO_FINAL").ok();

        let mut builder = match url.as_deref() {
            Some("mainnet") => ProxyClient::mainnet(),
            Some("testnet") | None => ProxyClient::testnet(),
            Some("devnet") => ProxyClient::devnet(),
            Some(url) => ProxyClient::custom(url),
        };

        if let Some(entity_type) = entity_type {
            builder = builder.entity_type(entity_type.parse()?);
        }

        if let Some(secs) = cache_secs {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::Config(format!("ERD_CACHE_EXPIRATION_SECS is not a number: '{}'", secs))
            })?;
            builder = builder.cache_expiration(Duration::from_secs(secs));
        }

        let finality_check = match finality_check.as_deref().map(str::trim) {
            None | Some("false") => false,
            Some("true") => true,
            Some(other) => {
                return Err(Error::Config(format!(
                    "ERD_FINALITY_CHECK must be 'true' or 'false', got '{}'",
                    other
                )));
            }
        };

        match (finality_check, allowed_delta) {
            (true, Some(delta)) => {
                let delta: u64 = delta.trim().parse().map_err(|_| {
                    Error::Config(format!("ERD_ALLOWED_DELTA_TO_FINAL is not a number: '{}'", delta))
                })?;
                builder = builder.finality_check(delta);
            }
            (true, None) => {
                builder = builder.finality_check(DEFAULT_ALLOWED_DELTA_TO_FINAL);
            }
            (false, Some(_)) => {
                return Err(Error::Config(
                    "ERD_ALLOWED_DELTA_TO_FINAL is set but ERD_FINALITY_CHECK is not 'true'".into(),
                ));
            }
            (false, None) => {}
        }

        builder.build()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The base URL requests are sent to.
    pub fn url(&self) -> &str {
        &self.base.url
    }

    /// The REST API personality of the remote.
    pub fn entity_type(&self) -> RestApiEntityType {
        self.base.endpoints.entity_type()
    }

    /// Route generator in use.
    pub fn endpoints(&self) -> EndpointProvider {
        self.base.endpoints
    }

    /// Returns true when reads are finality-checked.
    pub fn finality_check_enabled(&self) -> bool {
        self.finality.is_enabled()
    }

    /// Nonce delta tolerated by the finality check.
    pub fn allowed_delta_to_final(&self) -> u64 {
        self.allowed_delta_to_final
    }

    /// Expiry of the network config cache.
    pub fn cache_expiration(&self) -> Duration {
        self.base.config_cache.expiry()
    }

    /// The nonce coordinator used by [`transfer`](Self::transfer).
    pub fn nonce_coordinator(&self) -> &NonceCoordinator {
        &self.nonces
    }

    // ========================================================================
    // Network
    // ========================================================================

    /// Get the network configuration, served from cache while fresh.
    pub async fn network_config(&self) -> Result<Arc<NetworkConfig>, Error> {
        self.base.network_config().await
    }

    /// Drop the cached network configuration.
    pub async fn invalidate_network_config(&self) {
        self.base.config_cache.invalidate().await;
    }

    /// Get the network economics.
    pub async fn network_economics(&self) -> Result<NetworkEconomics, Error> {
        let endpoint = self.base.endpoints.network_economics();
        Ok(self.base.get(&endpoint, Some("metrics")).await?)
    }

    /// Get the ratings configuration.
    pub async fn ratings_config(&self) -> Result<RatingsConfig, Error> {
        let endpoint = self.base.endpoints.ratings_config();
        Ok(self.base.get(&endpoint, Some("config")).await?)
    }

    /// Get the activation epochs of protocol features.
    pub async fn enable_epochs_config(&self) -> Result<EnableEpochsConfig, Error> {
        let endpoint = self.base.endpoints.enable_epochs_config();
        Ok(self.base.get(&endpoint, Some("enableEpochs")).await?)
    }

    /// Get the genesis nodes public keys.
    pub async fn genesis_nodes(&self) -> Result<GenesisNodes, Error> {
        let endpoint = self.base.endpoints.genesis_nodes_config();
        Ok(self.base.get(&endpoint, Some("nodes")).await?)
    }

    /// Get the status of a shard.
    ///
    /// When talking to an observer, fails with [`ProxyError::ShardIdMismatch`]
    /// if the node reports another shard than `shard_id`.
    pub async fn network_status(&self, shard_id: ShardId) -> Result<NetworkStatus, Error> {
        self.base.fetch_network_status(shard_id).await
    }

    /// Check that `shard_id` is final within the configured delta.
    ///
    /// Always succeeds when finality checking is disabled.
    pub async fn check_shard_finalization(&self, shard_id: ShardId) -> Result<(), Error> {
        self.finality
            .check_shard_finalization(shard_id, self.allowed_delta_to_final)
            .await
    }

    /// Compute the shard of an address from the cached shard count.
    pub async fn shard_of_address(&self, address: &Address) -> Result<ShardId, Error> {
        let config = self.network_config().await?;
        let coordinator = ShardCoordinator::new(config.num_shards_without_meta, 0)?;
        Ok(coordinator.compute_id(address)?)
    }

    async fn check_final_state(&self, address: &Address) -> Result<(), Error> {
        if !self.finality.is_enabled() {
            return Ok(());
        }

        let shard_id = self.shard_of_address(address).await?;
        self.check_shard_finalization(shard_id).await
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Get an account (nonce, balance, ...).
    ///
    /// The address's shard is finality-checked first when enabled.
    pub async fn account(&self, address: &Address) -> Result<Account, Error> {
        if !address.is_valid() {
            return Err(ParseAddressError::InvalidLength(address.as_bytes().len()).into());
        }
        self.check_final_state(address).await?;

        let endpoint = self.base.endpoints.account(&address.to_bech32()?);
        Ok(self.base.get(&endpoint, Some("account")).await?)
    }

    /// Get the balance of an account in the smallest denomination.
    pub async fn balance(&self, address: &Address) -> Result<u128, Error> {
        self.account(address).await?.balance_as_u128()
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Default transaction arguments for `address` from the cached network config.
    ///
    /// Nonce, receiver and value are left empty.
    pub async fn default_transaction_arguments(
        &self,
        address: &Address,
    ) -> Result<TransactionArguments, Error> {
        let config = self.network_config().await?;
        TransactionArguments::from_network_config(Some(address), Some(&config))
    }

    /// Broadcast a signed transaction, returning its hash.
    pub async fn send_transaction(&self, tx: &Transaction) -> Result<String, Error> {
        let endpoint = self.base.endpoints.send_transaction();
        let hash: String = self.base.post(&endpoint, tx, Some("txHash")).await?;
        debug!(%hash, nonce = tx.nonce, sender = %tx.sender, "Transaction sent");
        Ok(hash)
    }

    /// Broadcast a batch of signed transactions.
    ///
    /// The hashes are returned in the order of the submitted batch. Entries
    /// the remote did not accept are absent.
    pub async fn send_transactions(&self, txs: &[Transaction]) -> Result<Vec<String>, Error> {
        let endpoint = self.base.endpoints.send_multiple_transactions();
        let response: SendMultipleResponse = self.base.post(&endpoint, &txs, None).await?;
        debug!(
            submitted = txs.len(),
            sent = response.num_of_sent_txs,
            "Transactions sent"
        );
        Ok(response.txs_hashes.into_values().collect())
    }

    /// Get the processing status of a transaction.
    pub async fn transaction_status(&self, hash: &str) -> Result<TxStatus, Error> {
        let endpoint = self.base.endpoints.transaction_status(hash);
        Ok(self.base.get(&endpoint, Some("status")).await?)
    }

    /// Get a transaction as seen by the network.
    pub async fn transaction_info(&self, hash: &str) -> Result<TransactionOnNetwork, Error> {
        self.fetch_transaction_info(hash, false).await
    }

    /// Get a transaction together with its smart contract results.
    pub async fn transaction_info_with_results(
        &self,
        hash: &str,
    ) -> Result<TransactionOnNetwork, Error> {
        self.fetch_transaction_info(hash, true).await
    }

    async fn fetch_transaction_info(
        &self,
        hash: &str,
        with_results: bool,
    ) -> Result<TransactionOnNetwork, Error> {
        let mut endpoint = self.base.endpoints.transaction_info(hash);
        if with_results {
            endpoint.push_str(WITH_RESULTS_QUERY_PARAM);
        }
        Ok(self.base.get(&endpoint, Some("transaction")).await?)
    }

    /// Estimate the gas units a transaction would consume.
    pub async fn request_transaction_cost(&self, tx: &Transaction) -> Result<TxCost, Error> {
        let endpoint = self.base.endpoints.transaction_cost();
        Ok(self.base.post(&endpoint, tx, None).await?)
    }

    /// Transfer `value` from the signer to `receiver`, returning the hash.
    ///
    /// The nonce comes from the client's [`NonceCoordinator`], synced from the
    /// sender's account on first use. When signing or broadcasting fails the
    /// nonce is handed back without ever reissuing a nonce held by another
    /// transfer:
    /// - if it is the only nonce issued since the last sync, the sender is
    ///   invalidated and the next transfer re-syncs from the network;
    /// - otherwise, if it is the last nonce issued, it is released;
    /// - otherwise it is left as a gap, logged, for the caller to
    ///   [`resync`](NonceCoordinator::resync).
    pub async fn transfer(
        &self,
        signer: &impl Signer,
        receiver: &Address,
        value: impl Into<String>,
    ) -> Result<String, Error> {
        if !receiver.is_valid() {
            return Err(ParseAddressError::InvalidLength(receiver.as_bytes().len()).into());
        }
        let sender = signer.address();
        let args = self
            .default_transaction_arguments(sender)
            .await?
            .receiver(receiver)?
            .value(value);

        let nonce = self
            .nonces
            .reserve(sender, || async { Ok(self.account(sender).await?.nonce) })
            .await?;

        let mut tx = args.nonce(nonce).into_transaction();

        if let Err(e) = signer.key().sign_transaction(&mut tx).await {
            warn!(%sender, nonce, error = %e, "Signing failed");
            self.abandon_nonce(sender, nonce).await;
            return Err(e.into());
        }

        match self.send_transaction(&tx).await {
            Ok(hash) => Ok(hash),
            Err(e) => {
                warn!(%sender, nonce, error = %e, "Broadcast failed");
                self.abandon_nonce(sender, nonce).await;
                Err(e)
            }
        }
    }

    async fn abandon_nonce(&self, sender: &Address, nonce: u64) {
        if self.nonces.invalidate_if_sole(sender, nonce).await {
            return;
        }
        if self.nonces.release(sender, nonce).await {
            debug!(%sender, nonce, "Released unused nonce");
            return;
        }
        warn!(
            %sender,
            nonce,
            "Unused nonce is followed by later reservations, leaving a gap"
        );
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// Nonce of the latest metachain block.
    pub async fn latest_hyperblock_nonce(&self) -> Result<u64, Error> {
        Ok(self.network_status(METACHAIN_SHARD_ID).await?.nonce)
    }

    /// Get a hyperblock by nonce.
    pub async fn hyperblock_by_nonce(&self, nonce: u64) -> Result<HyperBlock, Error> {
        let endpoint = self.base.endpoints.hyperblock_by_nonce(nonce);
        Ok(self.base.get(&endpoint, Some("hyperblock")).await?)
    }

    /// Get a hyperblock by hash.
    pub async fn hyperblock_by_hash(&self, hash: &str) -> Result<HyperBlock, Error> {
        let endpoint = self.base.endpoints.hyperblock_by_hash(hash);
        Ok(self.base.get(&endpoint, Some("hyperblock")).await?)
    }

    /// Get the serialized bytes of a shard block by hash.
    pub async fn raw_block_by_hash(&self, shard_id: ShardId, hash: &str) -> Result<Vec<u8>, Error> {
        let endpoint = self.base.endpoints.raw_block_by_hash(shard_id, hash);
        self.fetch_raw(&endpoint, "block").await
    }

    /// Get the serialized bytes of a shard block by nonce.
    pub async fn raw_block_by_nonce(&self, shard_id: ShardId, nonce: u64) -> Result<Vec<u8>, Error> {
        let endpoint = self.base.endpoints.raw_block_by_nonce(shard_id, nonce);
        self.fetch_raw(&endpoint, "block").await
    }

    /// Get the serialized bytes of the metablock starting `epoch`.
    pub async fn raw_start_of_epoch_metablock(&self, epoch: u32) -> Result<Vec<u8>, Error> {
        let endpoint = self.base.endpoints.raw_start_of_epoch_metablock(epoch);
        self.fetch_raw(&endpoint, "block").await
    }

    /// Get the serialized bytes of a miniblock.
    pub async fn raw_miniblock_by_hash(
        &self,
        shard_id: ShardId,
        hash: &str,
        epoch: u32,
    ) -> Result<Vec<u8>, Error> {
        let endpoint = self.base.endpoints.raw_miniblock_by_hash(shard_id, hash, epoch);
        self.fetch_raw(&endpoint, "miniblock").await
    }

    async fn fetch_raw(&self, endpoint: &str, field: &str) -> Result<Vec<u8>, Error> {
        let encoded: String = self.base.get(endpoint, Some(field)).await?;
        STANDARD.decode(encoded.as_bytes()).map_err(|e| {
            ProxyError::InvalidResponse(format!("invalid base64 in '{}': {}", field, e)).into()
        })
    }

    /// Nonce of the first block of the current epoch of a shard.
    pub async fn nonce_at_epoch_start(&self, shard_id: ShardId) -> Result<u64, Error> {
        Ok(self.network_status(shard_id).await?.nonce_at_epoch_start)
    }

    // ========================================================================
    // VM queries
    // ========================================================================

    /// Run a read-only smart contract query.
    ///
    /// The contract's shard is finality-checked first when enabled.
    pub async fn execute_vm_query(&self, request: &VmValueRequest) -> Result<VmOutput, Error> {
        let contract: Address = request.sc_address.parse()?;
        self.check_final_state(&contract).await?;

        let body = VmValueRequestWithOptions {
            request,
            same_sc_state: self.same_sc_state,
            should_be_synced: self.should_be_synced,
        };
        let endpoint = self.base.endpoints.vm_values();
        Ok(self.base.post(&endpoint, &body, Some("data")).await?)
    }
}

impl std::fmt::Debug for ProxyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyClient")
            .field("url", &self.base.url)
            .field("entity_type", &self.entity_type())
            .field("finality", &self.finality)
            .field("allowed_delta_to_final", &self.allowed_delta_to_final)
            .finish()
    }
}

// ============================================================================
// ProxyBuilder
// ============================================================================

/// Builder for creating a [`ProxyClient`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use erd_kit::{ProxyClient, RestApiEntityType};
///
/// let proxy = ProxyClient::custom("http://localhost:8080")
///     .entity_type(RestApiEntityType::ObserverNode)
///     .cache_expiration(Duration::from_secs(5))
///     .finality_check(2)
///     .build()
///     .unwrap();
/// assert!(proxy.finality_check_enabled());
/// ```
pub struct ProxyBuilder {
    url: String,
    entity_type: RestApiEntityType,
    cache_expiration: Duration,
    finality_check: Option<u64>,
    timeout: Duration,
    transport: Option<Arc<dyn Transport>>,
    same_sc_state: bool,
    should_be_synced: bool,
}

impl ProxyBuilder {
    fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            entity_type: RestApiEntityType::default(),
            cache_expiration: DEFAULT_CACHE_EXPIRATION,
            finality_check: None,
            timeout: DEFAULT_TIMEOUT,
            transport: None,
            same_sc_state: false,
            should_be_synced: false,
        }
    }

    /// Set the REST API personality of the remote.
    pub fn entity_type(mut self, entity_type: RestApiEntityType) -> Self {
        self.entity_type = entity_type;
        self
    }

    /// Set the network config cache expiry (at least one second).
    pub fn cache_expiration(mut self, expiration: Duration) -> Self {
        self.cache_expiration = expiration;
        self
    }

    /// Enable finality checks with the given allowed nonce delta (at least 1).
    pub fn finality_check(mut self, allowed_delta_to_final: u64) -> Self {
        self.finality_check = Some(allowed_delta_to_final);
        self
    }

    /// Set the request timeout of the default HTTP transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a custom transport instead of HTTP.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Ask VM queries to run against a single state snapshot.
    pub fn same_sc_state(mut self, same_sc_state: bool) -> Self {
        self.same_sc_state = same_sc_state;
        self
    }

    /// Ask VM queries to run only on synced nodes.
    pub fn should_be_synced(mut self, should_be_synced: bool) -> Self {
        self.should_be_synced = should_be_synced;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidCacheDuration`] if the cache expiry is below one second
    /// - [`Error::InvalidDeltaToFinal`] if finality checking is enabled with a delta of 0
    /// - [`Error::Proxy`] if the HTTP client cannot be created
    pub fn build(self) -> Result<ProxyClient, Error> {
        if let Some(delta) = self.finality_check {
            if delta < MIN_ALLOWED_DELTA_TO_FINAL {
                return Err(Error::InvalidDeltaToFinal {
                    provided: delta,
                    minimum: MIN_ALLOWED_DELTA_TO_FINAL,
                });
            }
        }

        let config_cache = ConfigCache::new(self.cache_expiration)?;
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(self.url.clone(), self.timeout)?),
        };

        let base = Arc::new(BaseProxy {
            transport,
            endpoints: EndpointProvider::new(self.entity_type),
            config_cache,
            url: self.url,
        });
        let finality = FinalityProvider::new(base.clone(), self.finality_check.is_some());

        Ok(ProxyClient {
            base,
            finality,
            allowed_delta_to_final: self.finality_check.unwrap_or(0),
            nonces: Arc::new(NonceCoordinator::new()),
            same_sc_state: self.same_sc_state,
            should_be_synced: self.should_be_synced,
        })
    }
}

impl TryFrom<ProxyBuilder> for ProxyClient {
    type Error = Error;

    fn try_from(builder: ProxyBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}
