//! Finality checks through both API personalities.

use erd_kit::{
    Address, Error, FinalityError, METACHAIN_SHARD_ID, ProxyError, RestApiEntityType,
    VmValueRequest,
};
use serde_json::json;

use crate::common::{self, ALICE, ScriptedTransport, ok};

const META_STATUS: &str = "network/status/4294967295";

fn alice() -> Address {
    ALICE.parse().unwrap()
}

fn meta_status(cross_check: &str) -> serde_json::Value {
    ok(json!({
        "status": {
            "erd_nonce": 2000,
            "erd_shard_id": METACHAIN_SHARD_ID,
            "erd_cross_check_block_height": cross_check
        }
    }))
}

fn shard_status(shard_id: u32, nonce: u64) -> serde_json::Value {
    ok(json!({ "status": { "erd_nonce": nonce, "erd_shard_id": shard_id } }))
}

fn node_metrics(shard_id: u32, nonce: u64, highest: u64, probable: u64) -> serde_json::Value {
    ok(json!({
        "metrics": {
            "erd_nonce": nonce,
            "erd_highest_final_nonce": highest,
            "erd_probable_highest_nonce": probable,
            "erd_shard_id": shard_id
        }
    }))
}

// =============================================================================
// Proxy personality
// =============================================================================

#[tokio::test]
async fn test_proxy_finality_guards_account_reads() {
    let transport = ScriptedTransport::new();
    transport
        .on("network/config", common::network_config())
        .on(META_STATUS, meta_status("0: 500, 1: 510, 2: 495, "))
        .on("network/status/1", shard_status(1, 511))
        .on("network/status/1", shard_status(1, 520))
        .on("network/status/1", shard_status(1, 505))
        .on(&format!("address/{}", ALICE), common::account(ALICE, 9, "10"));
    let proxy = common::builder(&transport).finality_check(7).build().unwrap();
    assert!(proxy.finality_check_enabled());

    // 511 is within 7 of the notarized 510
    assert_eq!(proxy.account(&alice()).await.unwrap().nonce, 9);

    // 520 ran ahead of the metachain
    let err = proxy.account(&alice()).await.unwrap_err();
    assert!(err.is_stuck(), "unexpected error: {:?}", err);

    // 505 is behind the metachain
    let err = proxy.account(&alice()).await.unwrap_err();
    assert!(err.is_syncing(), "unexpected error: {:?}", err);

    assert_eq!(transport.hits(&format!("address/{}", ALICE)), 1);
    assert_eq!(transport.hits(META_STATUS), 3);
}

#[tokio::test]
async fn test_proxy_metachain_is_trivially_final() {
    let transport = ScriptedTransport::new();
    let proxy = common::builder(&transport).finality_check(1).build().unwrap();

    proxy.check_shard_finalization(METACHAIN_SHARD_ID).await.unwrap();
    assert_eq!(transport.hits(META_STATUS), 0);
}

#[tokio::test]
async fn test_proxy_malformed_cross_check() {
    let transport = ScriptedTransport::new();
    transport
        .on(META_STATUS, meta_status("0: 500, 2: 495"))
        .on("network/status/1", shard_status(1, 511));
    let proxy = common::builder(&transport).finality_check(7).build().unwrap();

    let err = proxy.check_shard_finalization(1).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Finality(FinalityError::InvalidCrossCheckFormat(_))
    ));
}

#[tokio::test]
async fn test_finality_disabled_skips_status() {
    let transport = ScriptedTransport::new();
    transport.on(&format!("address/{}", ALICE), common::account(ALICE, 1, "10"));
    let proxy = common::client(&transport).unwrap();

    proxy.account(&alice()).await.unwrap();
    proxy.check_shard_finalization(1).await.unwrap();
    assert_eq!(transport.hits("network/config"), 0);
    assert_eq!(transport.hits("network/status/1"), 0);
}

// =============================================================================
// Observer personality
// =============================================================================

#[tokio::test]
async fn test_observer_finality() {
    let transport = ScriptedTransport::new();
    transport
        .on("network/config", common::network_config())
        .on("node/status", node_metrics(1, 100, 99, 101))
        .on("node/status", node_metrics(1, 0, 0, 0))
        .on(&format!("address/{}", ALICE), common::account(ALICE, 4, "10"));
    let proxy = common::builder(&transport)
        .entity_type(RestApiEntityType::ObserverNode)
        .finality_check(2)
        .build()
        .unwrap();

    assert_eq!(proxy.account(&alice()).await.unwrap().nonce, 4);

    let err = proxy.account(&alice()).await.unwrap_err();
    assert!(matches!(err, Error::Finality(FinalityError::NodeNotStarted)));
}

#[tokio::test]
async fn test_observer_shard_mismatch() {
    let transport = ScriptedTransport::new();
    transport
        .on("network/config", common::network_config())
        .on("node/status", node_metrics(0, 100, 99, 101));
    let proxy = common::builder(&transport)
        .entity_type(RestApiEntityType::ObserverNode)
        .finality_check(2)
        .build()
        .unwrap();

    let err = proxy.account(&alice()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Proxy(ProxyError::ShardIdMismatch {
            requested: 1,
            received: 0
        })
    ));
    assert_eq!(transport.hits(&format!("address/{}", ALICE)), 0);
}

#[tokio::test]
async fn test_vm_query_checks_contract_shard() {
    let contract = Address::from_bytes([0u8; 32]).to_bech32().unwrap();
    let transport = ScriptedTransport::new();
    transport
        .on("network/config", common::network_config())
        .on("node/status", node_metrics(0, 100, 100, 100))
        .on(
            "vm-values/query",
            ok(json!({ "data": { "returnData": ["AQ=="], "returnCode": "ok" } })),
        );
    let proxy = common::builder(&transport)
        .entity_type(RestApiEntityType::ObserverNode)
        .finality_check(2)
        .build()
        .unwrap();

    let request = VmValueRequest {
        sc_address: contract,
        func_name: "getSum".to_string(),
        ..Default::default()
    };
    let output = proxy.execute_vm_query(&request).await.unwrap();
    assert!(output.is_ok());
    assert_eq!(transport.hits("node/status"), 1);
}
