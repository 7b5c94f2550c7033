//! End-to-end tests over a local websocket node.

mod common;

use common::*;
use std::time::Duration;

use steem_broadcast::config::ClientConfig;
use steem_broadcast::rpc::{NodeApi, NodeClient, RpcError, TransportConfig};
use steem_broadcast::{Client, ClientError};

fn config_for(urls: Vec<String>) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.node.urls = urls;
    config.node.connect_timeout_secs = 2;
    config.node.request_timeout_secs = 5;
    config
}

#[tokio::test]
async fn test_send_trx_over_websocket() {
    let node = start_ws_node(healthy_node).await;
    let client = Client::connect(&config_for(vec![node.url.clone()]), alice_store())
        .await
        .unwrap();

    let response = client.send_trx("alice", vote("alice")).await.unwrap();

    assert_eq!(response.id, "6fde0190a97835ea6d9e651293e90c89911f933c");
    assert_eq!(response.block_num, HEAD_BLOCK_NUMBER + 1);
    assert_eq!(response.trx_num, 3);
    assert!(!response.expired);
    assert_eq!(
        node.methods(),
        vec![
            "condenser_api.get_dynamic_global_properties",
            "condenser_api.broadcast_transaction_synchronous",
        ]
    );
}

#[tokio::test]
async fn test_fails_over_to_next_endpoint() {
    let node = start_ws_node(healthy_node).await;
    let urls = vec![dead_url().await, node.url.clone()];
    let client = Client::connect(&config_for(urls), alice_store()).await.unwrap();

    let response = client.send_trx("alice", transfer("alice")).await.unwrap();

    assert!(!response.id.is_empty());
    assert_eq!(node.methods().len(), 2);
}

#[tokio::test]
async fn test_node_error_maps_to_broadcast_error() {
    let node = start_ws_node(|method, params| {
        if method == "condenser_api.broadcast_transaction_synchronous" {
            return Some(Err((-32003, "transaction expired".to_string())));
        }
        healthy_node(method, params)
    })
    .await;
    let client = Client::connect(&config_for(vec![node.url.clone()]), alice_store())
        .await
        .unwrap();

    let err = client.send_trx("alice", vote("alice")).await.unwrap_err();

    match err {
        ClientError::Broadcast(RpcError::Node { code, message }) => {
            assert_eq!(code, -32003);
            assert_eq!(message, "transaction expired");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_verify_over_websocket_skips_broadcast() {
    let node = start_ws_node(healthy_node).await;
    let client = Client::connect(&config_for(vec![node.url.clone()]), alice_store())
        .await
        .unwrap();

    assert!(client.verify_trx("alice", vote("alice")).await.unwrap());

    let methods = node.methods();
    assert!(methods.contains(&"condenser_api.verify_authority".to_string()));
    assert!(!methods.contains(&"condenser_api.broadcast_transaction_synchronous".to_string()));
}

#[tokio::test]
async fn test_signed_transaction_reaches_node_as_json() {
    let node = start_ws_node(|method, params| {
        if method == "condenser_api.broadcast_transaction_synchronous" {
            let tx = &params[0];
            assert_eq!(tx["ref_block_num"], 0x0304);
            assert_eq!(tx["ref_block_prefix"], 0x0807_0605u32);
            assert_eq!(tx["expiration"], "2016-03-24T16:06:00");
            assert_eq!(tx["operations"][0][0], "vote");
            assert_eq!(tx["signatures"].as_array().map(Vec::len), Some(1));
        }
        healthy_node(method, params)
    })
    .await;
    let client = Client::connect(&config_for(vec![node.url.clone()]), alice_store())
        .await
        .unwrap();

    client.send_trx("alice", vote("alice")).await.unwrap();
}

#[tokio::test]
async fn test_silent_node_times_out() {
    let node = start_ws_node(|_, _| None).await;
    let mut config = TransportConfig::new(vec![node.url.clone()]);
    config.request_timeout = Duration::from_millis(200);
    let rpc = NodeClient::connect(config).await.unwrap();

    let err = rpc.get_dynamic_global_properties().await.unwrap_err();

    assert!(matches!(err, RpcError::Timeout(_)));
}
