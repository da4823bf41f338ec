//! Shared helpers: a scripted transport and log setup.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use erd_kit::{
    Error, HttpResponse, ProxyBuilder, ProxyClient, ProxyError, RestApiEntityType, Transport,
    TransportFuture,
};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

pub const ALICE_SEED: &str = "413f42575f7f26fad3317a778771212fdb80245850981e48b58a4f25e344e8f9";
pub const ALICE: &str = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th";
pub const BOB: &str = "erd1spyavw0956vq68xj8y4tenjpq2wd5a9p2c6j8gsz7ztyrnpxrruqzu66jx";

/// Install a test subscriber honoring `RUST_LOG`; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// A successful envelope around `data`.
pub fn ok(data: Value) -> Value {
    json!({ "data": data, "error": "", "code": "successful" })
}

/// A failed envelope, still served with HTTP 200.
pub fn remote_error(message: &str) -> Value {
    json!({ "data": null, "error": message, "code": "internal_issue" })
}

/// Network config envelope for a 3-shard devnet.
pub fn network_config() -> Value {
    ok(json!({
        "config": {
            "erd_chain_id": "D",
            "erd_denomination": 18,
            "erd_gas_per_data_byte": 1500,
            "erd_min_gas_limit": 50000,
            "erd_min_gas_price": 1000000000,
            "erd_min_transaction_version": 1,
            "erd_num_shards_without_meta": 3,
            "erd_round_duration": 6000,
            "erd_start_time": 1648551156,
            "erd_adaptivity": "false",
            "erd_hysteresis": "0.200000"
        }
    }))
}

/// Account envelope.
pub fn account(address: &str, nonce: u64, balance: &str) -> Value {
    ok(json!({
        "account": {
            "address": address,
            "nonce": nonce,
            "balance": balance,
            "code": "",
            "username": ""
        }
    }))
}

/// Transport serving scripted responses per endpoint.
///
/// Each endpoint holds a queue; responses are popped in order and the last
/// one keeps being served. Every call yields once before answering so that
/// concurrent callers interleave.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<HttpResponse>>>,
    hits: Mutex<HashMap<String, usize>>,
    posts: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a 200 response for `endpoint`.
    pub fn on(&self, endpoint: &str, body: Value) -> &Self {
        self.on_status(endpoint, 200, body.to_string())
    }

    /// Queue a response with an explicit status for `endpoint`.
    pub fn on_status(&self, endpoint: &str, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(HttpResponse::new(status, body));
        self
    }

    /// Number of requests (GET or POST) made to `endpoint`.
    pub fn hits(&self, endpoint: &str) -> usize {
        self.hits.lock().unwrap().get(endpoint).copied().unwrap_or(0)
    }

    /// JSON bodies posted to `endpoint`, in the order they were answered.
    pub fn posts(&self, endpoint: &str) -> Vec<Value> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| e == endpoint)
            .map(|(_, body)| body.clone())
            .collect()
    }

    fn respond(&self, endpoint: &str) -> Result<HttpResponse, ProxyError> {
        *self.hits.lock().unwrap().entry(endpoint.to_string()).or_default() += 1;

        let mut routes = self.routes.lock().unwrap();
        let queue = routes
            .get_mut(endpoint)
            .ok_or_else(|| ProxyError::Network(format!("no route for {}", endpoint)))?;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| ProxyError::Network(format!("no response left for {}", endpoint)))
    }
}

impl Transport for ScriptedTransport {
    fn get<'a>(&'a self, endpoint: &'a str) -> TransportFuture<'a> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            self.respond(endpoint)
        })
    }

    fn post<'a>(&'a self, endpoint: &'a str, body: Vec<u8>) -> TransportFuture<'a> {
        Box::pin(async move {
            let json = serde_json::from_slice(&body)
                .map_err(|e| ProxyError::Network(format!("posted invalid JSON: {}", e)))?;
            tokio::task::yield_now().await;
            // recorded next to the response so posts line up with the script
            self.posts.lock().unwrap().push((endpoint.to_string(), json));
            self.respond(endpoint)
        })
    }
}

/// A proxy-personality builder wired to `transport`.
pub fn builder(transport: &Arc<ScriptedTransport>) -> ProxyBuilder {
    ProxyClient::custom("http://scripted")
        .entity_type(RestApiEntityType::Proxy)
        .transport(transport.clone())
}

/// A proxy-personality client wired to `transport`.
pub fn client(transport: &Arc<ScriptedTransport>) -> Result<ProxyClient, Error> {
    init_tracing();
    builder(transport).build()
}
