//! Read paths of the proxy client: config cache, envelopes, blocks, transactions.

use std::time::Duration;

use erd_kit::{Address, Error, METACHAIN_SHARD_ID, ProxyError, Transaction, TxStatus};
use futures::future::join_all;
use serde_json::json;

use crate::common::{self, ALICE, BOB, ScriptedTransport, ok, remote_error};

const META_STATUS: &str = "network/status/4294967295";

fn alice() -> Address {
    ALICE.parse().unwrap()
}

fn unsigned_transfer() -> Transaction {
    Transaction {
        nonce: 1,
        value: "1000".to_string(),
        receiver: BOB.to_string(),
        sender: ALICE.to_string(),
        gas_price: 1_000_000_000,
        gas_limit: 50_000,
        chain_id: "D".to_string(),
        version: 1,
        ..Default::default()
    }
}

// =============================================================================
// Network config cache
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_network_config_fetched_once_per_window() {
    let transport = ScriptedTransport::new();
    transport.on("network/config", common::network_config());
    let proxy = common::client(&transport).unwrap();

    let results = join_all((0..16).map(|_| proxy.network_config())).await;
    for config in results {
        assert_eq!(config.unwrap().num_shards_without_meta, 3);
    }
    assert_eq!(transport.hits("network/config"), 1);

    tokio::time::advance(Duration::from_secs(30)).await;
    proxy.network_config().await.unwrap();
    assert_eq!(transport.hits("network/config"), 1);

    tokio::time::advance(Duration::from_secs(31)).await;
    let results = join_all((0..16).map(|_| proxy.network_config())).await;
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(transport.hits("network/config"), 2);
}

#[tokio::test]
async fn test_network_config_invalidate_refetches() {
    let transport = ScriptedTransport::new();
    transport.on("network/config", common::network_config());
    let proxy = common::client(&transport).unwrap();

    proxy.network_config().await.unwrap();
    proxy.invalidate_network_config().await;
    proxy.network_config().await.unwrap();

    assert_eq!(transport.hits("network/config"), 2);
}

#[tokio::test]
async fn test_failed_config_fetch_is_not_cached() {
    let transport = ScriptedTransport::new();
    transport
        .on("network/config", remote_error("not ready"))
        .on("network/config", common::network_config());
    let proxy = common::client(&transport).unwrap();

    assert!(proxy.network_config().await.is_err());
    assert_eq!(proxy.network_config().await.unwrap().chain_id, "D");
    assert_eq!(transport.hits("network/config"), 2);
}

// =============================================================================
// Envelope errors
// =============================================================================

#[tokio::test]
async fn test_remote_error_with_http_ok() {
    let transport = ScriptedTransport::new();
    transport.on("transaction/abc/status", remote_error("transaction not found"));
    let proxy = common::client(&transport).unwrap();

    let err = proxy.transaction_status("abc").await.unwrap_err();
    match err {
        Error::Proxy(ProxyError::Remote { message, code }) => {
            assert_eq!(message, "transaction not found");
            assert_eq!(code, "internal_issue");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_status_is_surfaced() {
    let transport = ScriptedTransport::new();
    transport.on_status(&format!("address/{}", ALICE), 404, "page not found");
    let proxy = common::client(&transport).unwrap();

    let err = proxy.balance(&alice()).await.unwrap_err();
    let Error::Proxy(proxy_err) = err else {
        panic!("expected proxy error");
    };
    assert_eq!(proxy_err.status_code(), Some(404));
    assert!(proxy_err.is_client_error());
    assert!(proxy_err.to_string().contains("page not found"));
}

#[tokio::test]
async fn test_missing_field_is_invalid_response() {
    let transport = ScriptedTransport::new();
    transport.on(&format!("address/{}", ALICE), ok(json!({ "somethingElse": {} })));
    let proxy = common::client(&transport).unwrap();

    let err = proxy.account(&alice()).await.unwrap_err();
    assert!(matches!(err, Error::Proxy(ProxyError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_unreachable_route_is_network_error() {
    let transport = ScriptedTransport::new();
    let proxy = common::client(&transport).unwrap();

    let err = proxy.network_config().await.unwrap_err();
    assert!(matches!(err, Error::Proxy(ProxyError::Network(_))));
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn test_account_and_balance() {
    let transport = ScriptedTransport::new();
    transport.on(
        &format!("address/{}", ALICE),
        common::account(ALICE, 42, "1500000000000000000"),
    );
    let proxy = common::client(&transport).unwrap();

    let account = proxy.account(&alice()).await.unwrap();
    assert_eq!(account.nonce, 42);
    assert_eq!(account.denominated_balance(18).unwrap(), "1.5");
    assert_eq!(proxy.balance(&alice()).await.unwrap(), 1_500_000_000_000_000_000);
}

#[tokio::test]
async fn test_invalid_balance_is_an_error() {
    let transport = ScriptedTransport::new();
    transport.on(&format!("address/{}", ALICE), common::account(ALICE, 1, "lots"));
    let proxy = common::client(&transport).unwrap();

    let err = proxy.balance(&alice()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidBalance(ref b) if b == "lots"));
}

#[tokio::test]
async fn test_shard_of_address() {
    let transport = ScriptedTransport::new();
    transport.on("network/config", common::network_config());
    let proxy = common::client(&transport).unwrap();

    assert_eq!(proxy.shard_of_address(&alice()).await.unwrap(), 1);
    let bob: Address = BOB.parse().unwrap();
    let bob_shard = proxy.shard_of_address(&bob).await.unwrap();
    assert!(bob_shard < 3);
    assert_eq!(transport.hits("network/config"), 1);
}

// =============================================================================
// Transactions
// =============================================================================

#[tokio::test]
async fn test_default_transaction_arguments() {
    let transport = ScriptedTransport::new();
    transport.on("network/config", common::network_config());
    let proxy = common::client(&transport).unwrap();

    let args = proxy.default_transaction_arguments(&alice()).await.unwrap();
    assert_eq!(args.sender, ALICE);
    assert_eq!(args.chain_id, "D");
    assert_eq!(args.gas_price, 1_000_000_000);
    assert_eq!(args.gas_limit, 50_000);
    assert_eq!(args.version, 1);
    assert_eq!(args.nonce, 0);
    assert!(args.receiver.is_empty());
    assert!(args.value.is_empty());
}

#[tokio::test]
async fn test_send_transactions_keeps_batch_order() {
    let transport = ScriptedTransport::new();
    transport.on(
        "transaction/send-multiple",
        ok(json!({
            "numOfSentTxs": 3,
            "txsHashes": { "2": "hashC", "0": "hashA", "1": "hashB" }
        })),
    );
    let proxy = common::client(&transport).unwrap();

    let txs: Vec<Transaction> = (0..3)
        .map(|nonce| Transaction {
            nonce,
            ..unsigned_transfer()
        })
        .collect();
    let hashes = proxy.send_transactions(&txs).await.unwrap();

    assert_eq!(hashes, vec!["hashA", "hashB", "hashC"]);
    let posted = transport.posts("transaction/send-multiple");
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].as_array().unwrap().len(), 3);
    assert_eq!(posted[0][2]["nonce"], 2);
}

#[tokio::test]
async fn test_send_transaction_returns_hash() {
    let transport = ScriptedTransport::new();
    transport.on("transaction/send", ok(json!({ "txHash": "cafe" })));
    let proxy = common::client(&transport).unwrap();

    let hash = proxy.send_transaction(&unsigned_transfer()).await.unwrap();
    assert_eq!(hash, "cafe");

    let posted = transport.posts("transaction/send");
    assert_eq!(posted[0]["chainID"], "D");
    assert_eq!(posted[0]["gasLimit"], 50_000);
    assert!(posted[0].get("signature").is_none());
}

#[tokio::test]
async fn test_transaction_status_and_info() {
    let transport = ScriptedTransport::new();
    transport
        .on("transaction/abc/status", ok(json!({ "status": "success" })))
        .on(
            "transaction/abc?withResults=true",
            ok(json!({
                "transaction": {
                    "type": "normal",
                    "nonce": 3,
                    "value": "1000",
                    "sender": ALICE,
                    "receiver": BOB,
                    "status": "pending",
                    "smartContractResults": [{ "hash": "r1", "value": "0" }]
                }
            })),
        );
    let proxy = common::client(&transport).unwrap();

    let status = proxy.transaction_status("abc").await.unwrap();
    assert_eq!(status, TxStatus::Success);
    assert!(status.is_final());

    let info = proxy.transaction_info_with_results("abc").await.unwrap();
    assert_eq!(info.nonce, 3);
    assert_eq!(info.value, 1000);
    assert_eq!(info.tx_status(), TxStatus::Pending);
    assert_eq!(info.smart_contract_results.len(), 1);
    assert_eq!(transport.hits("transaction/abc"), 0);
}

#[tokio::test]
async fn test_request_transaction_cost() {
    let transport = ScriptedTransport::new();
    transport.on(
        "transaction/cost",
        ok(json!({ "txGasUnits": 57500, "returnMessage": "" })),
    );
    let proxy = common::client(&transport).unwrap();

    let cost = proxy.request_transaction_cost(&unsigned_transfer()).await.unwrap();
    assert_eq!(cost.gas_units, 57_500);
    assert!(cost.return_message.is_empty());
    assert_eq!(transport.posts("transaction/cost")[0]["receiver"], BOB);
}

// =============================================================================
// Blocks
// =============================================================================

#[tokio::test]
async fn test_latest_hyperblock_and_epoch_start() {
    let transport = ScriptedTransport::new();
    transport
        .on(
            META_STATUS,
            ok(json!({ "status": { "erd_nonce": 1200, "erd_shard_id": METACHAIN_SHARD_ID } })),
        )
        .on(
            "network/status/2",
            ok(json!({ "status": { "erd_nonce": 900, "erd_nonce_at_epoch_start": 850, "erd_shard_id": 2 } })),
        )
        .on(
            "hyperblock/by-nonce/1200",
            ok(json!({
                "hyperblock": {
                    "nonce": 1200,
                    "hash": "aa",
                    "numTxs": 1,
                    "shardBlocks": [{ "hash": "bb", "nonce": 899, "shard": 2 }],
                    "transactions": [{ "hash": "cc", "status": "success" }]
                }
            })),
        );
    let proxy = common::client(&transport).unwrap();

    let nonce = proxy.latest_hyperblock_nonce().await.unwrap();
    assert_eq!(nonce, 1200);
    assert_eq!(proxy.nonce_at_epoch_start(2).await.unwrap(), 850);

    let block = proxy.hyperblock_by_nonce(nonce).await.unwrap();
    assert_eq!(block.num_txs, 1);
    assert_eq!(block.shard_blocks[0].shard, 2);
    assert_eq!(block.transactions[0].tx_status(), TxStatus::Success);
}

#[tokio::test]
async fn test_raw_blocks_are_base64_decoded() {
    let transport = ScriptedTransport::new();
    transport
        .on("internal/1/raw/block/by-nonce/10", ok(json!({ "block": "AQID" })))
        .on(
            "internal/raw/startofepoch/metablock/by-epoch/4",
            ok(json!({ "block": "not base64!" })),
        );
    let proxy = common::client(&transport).unwrap();

    assert_eq!(proxy.raw_block_by_nonce(1, 10).await.unwrap(), vec![1, 2, 3]);

    let err = proxy.raw_start_of_epoch_metablock(4).await.unwrap_err();
    assert!(matches!(err, Error::Proxy(ProxyError::InvalidResponse(_))));
}
