//! Transfers: nonce coordination, signing and broadcast.

use std::collections::HashSet;

use erd_kit::{
    Address, Error, InMemorySigner, ParseAddressError, ProxyError, Signer, Transaction,
    TransactionArguments, verify_signature,
};
use futures::future::join_all;
use serde_json::json;

use crate::common::{self, ALICE, ALICE_SEED, BOB, ScriptedTransport, ok, remote_error};

fn bob() -> Address {
    BOB.parse().unwrap()
}

fn alice_route() -> String {
    format!("address/{}", ALICE)
}

fn assert_signed_by(signer: &InMemorySigner, posted: &serde_json::Value) -> Transaction {
    let tx: Transaction = serde_json::from_value(posted.clone()).unwrap();
    let signature = hex::decode(&tx.signature).unwrap();
    let payload = tx.signing_payload().unwrap();
    assert!(verify_signature(
        signer.key().public_key(),
        &payload,
        &signature
    ));
    tx
}

#[tokio::test]
async fn test_transfer_signs_and_tracks_nonce() {
    let transport = ScriptedTransport::new();
    transport
        .on("network/config", common::network_config())
        .on(&alice_route(), common::account(ALICE, 5, "100000"))
        .on("transaction/send", ok(json!({ "txHash": "h1" })))
        .on("transaction/send", ok(json!({ "txHash": "h2" })));
    let proxy = common::client(&transport).unwrap();
    let signer = InMemorySigner::new(ALICE_SEED).unwrap();

    assert_eq!(proxy.transfer(&signer, &bob(), "1000").await.unwrap(), "h1");
    assert_eq!(proxy.transfer(&signer, &bob(), "2000").await.unwrap(), "h2");

    // the account is fetched once, later nonces come from the coordinator
    assert_eq!(transport.hits(&alice_route()), 1);
    assert_eq!(proxy.nonce_coordinator().peek(signer.address()).await, Some(7));

    let posted = transport.posts("transaction/send");
    assert_eq!(posted.len(), 2);
    let first = assert_signed_by(&signer, &posted[0]);
    let second = assert_signed_by(&signer, &posted[1]);
    assert_eq!((first.nonce, second.nonce), (5, 6));
    assert_eq!(first.value, "1000");
    assert_eq!(first.receiver, BOB);
    assert_eq!(first.sender, ALICE);
    assert_eq!(first.chain_id, "D");
    assert_eq!(first.gas_limit, 50_000);
}

#[tokio::test]
async fn test_failed_broadcast_resyncs_nonce() {
    let transport = ScriptedTransport::new();
    transport
        .on("network/config", common::network_config())
        .on(&alice_route(), common::account(ALICE, 5, "100000"))
        .on("transaction/send", remote_error("insufficient funds"))
        .on("transaction/send", ok(json!({ "txHash": "h1" })));
    let proxy = common::client(&transport).unwrap();
    let signer = InMemorySigner::new(ALICE_SEED).unwrap();

    let err = proxy.transfer(&signer, &bob(), "1000").await.unwrap_err();
    assert!(matches!(err, Error::Proxy(ProxyError::Remote { .. })));
    assert_eq!(proxy.nonce_coordinator().peek(signer.address()).await, None);

    proxy.transfer(&signer, &bob(), "1000").await.unwrap();
    assert_eq!(transport.hits(&alice_route()), 2);

    let nonces: Vec<u64> = transport
        .posts("transaction/send")
        .iter()
        .map(|tx| tx["nonce"].as_u64().unwrap())
        .collect();
    assert_eq!(nonces, vec![5, 5]);
}

#[tokio::test]
async fn test_failed_broadcast_never_reissues_inflight_nonce() {
    let transport = ScriptedTransport::new();
    transport
        .on("network/config", common::network_config())
        .on(&alice_route(), common::account(ALICE, 5, "100000"))
        .on("transaction/send", remote_error("mempool full"))
        .on("transaction/send", ok(json!({ "txHash": "h" })));
    let proxy = common::client(&transport).unwrap();
    let signer = InMemorySigner::new(ALICE_SEED).unwrap();
    let receiver = bob();

    let first = join_all((0..2).map(|_| proxy.transfer(&signer, &receiver, "1"))).await;
    assert_eq!(first.iter().filter(|r| r.is_err()).count(), 1);

    let later = join_all((0..2).map(|_| proxy.transfer(&signer, &receiver, "1"))).await;
    assert!(later.iter().all(Result::is_ok));

    // the first answer was the failure; every later broadcast was accepted
    let posted: Vec<u64> = transport
        .posts("transaction/send")
        .iter()
        .map(|tx| tx["nonce"].as_u64().unwrap())
        .collect();
    assert_eq!(posted.len(), 4);
    let accepted = &posted[1..];
    let distinct: HashSet<u64> = accepted.iter().copied().collect();
    assert_eq!(distinct.len(), accepted.len(), "nonce reused: {:?}", posted);

    // other reservations were outstanding, so the sender was never re-synced
    assert_eq!(transport.hits(&alice_route()), 1);
}

#[tokio::test]
async fn test_failed_account_fetch_sends_nothing() {
    let transport = ScriptedTransport::new();
    transport
        .on("network/config", common::network_config())
        .on_status(&alice_route(), 500, "boom")
        .on(&alice_route(), common::account(ALICE, 3, "100000"))
        .on("transaction/send", ok(json!({ "txHash": "h1" })));
    let proxy = common::client(&transport).unwrap();
    let signer = InMemorySigner::new(ALICE_SEED).unwrap();

    let err = proxy.transfer(&signer, &bob(), "1").await.unwrap_err();
    assert!(matches!(err, Error::Proxy(ProxyError::HttpStatus { status: 500, .. })));
    assert!(transport.posts("transaction/send").is_empty());

    proxy.transfer(&signer, &bob(), "1").await.unwrap();
    assert_eq!(transport.posts("transaction/send")[0]["nonce"], 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_transfers_get_distinct_nonces() {
    let transport = ScriptedTransport::new();
    transport
        .on("network/config", common::network_config())
        .on(&alice_route(), common::account(ALICE, 10, "100000"))
        .on("transaction/send", ok(json!({ "txHash": "h" })));
    let proxy = common::client(&transport).unwrap();
    let signer = InMemorySigner::new(ALICE_SEED).unwrap();
    let receiver = bob();

    let results = join_all((0..20).map(|_| proxy.transfer(&signer, &receiver, "1"))).await;
    assert!(results.iter().all(Result::is_ok));

    let nonces: HashSet<u64> = transport
        .posts("transaction/send")
        .iter()
        .map(|tx| tx["nonce"].as_u64().unwrap())
        .collect();
    assert_eq!(nonces, (10..30).collect::<HashSet<u64>>());
    assert_eq!(transport.hits(&alice_route()), 1);
    assert_eq!(transport.hits("network/config"), 1);
}

#[tokio::test]
async fn test_transfer_to_invalid_receiver() {
    let transport = ScriptedTransport::new();
    transport
        .on("network/config", common::network_config())
        .on(&alice_route(), common::account(ALICE, 1, "100000"));
    let proxy = common::client(&transport).unwrap();
    let signer = InMemorySigner::new(ALICE_SEED).unwrap();
    let receiver = Address::from_bytes([1u8; 4]);

    let err = proxy.transfer(&signer, &receiver, "1").await.unwrap_err();
    assert!(matches!(
        err,
        Error::ParseAddress(ParseAddressError::InvalidLength(4))
    ));
    assert_eq!(transport.hits(&alice_route()), 0);
    assert_eq!(transport.hits("transaction/send"), 0);
    assert_eq!(proxy.nonce_coordinator().peek(signer.address()).await, None);
}

#[test]
fn test_offline_signing() {
    let signer = InMemorySigner::new(ALICE_SEED).unwrap();
    let config = serde_json::from_value(common::network_config()["data"]["config"].clone()).unwrap();

    let mut tx = TransactionArguments::from_network_config(Some(signer.address()), Some(&config))
        .unwrap()
        .nonce(12)
        .receiver(&bob())
        .unwrap()
        .value("500")
        .data("hello")
        .into_transaction();

    tokio_test::block_on(signer.key().sign_transaction(&mut tx)).unwrap();

    let posted = serde_json::to_value(&tx).unwrap();
    assert_eq!(posted["data"], "aGVsbG8=");
    let tx = assert_signed_by(&signer, &posted);
    assert_eq!(tx.nonce, 12);
}
