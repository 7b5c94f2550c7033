//! Shared utilities for client integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDateTime;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use steem_broadcast::keys::{Authority, KeyResolver, KeyResult, KeyStore, Keys, PrivateKey};
use steem_broadcast::rpc::{BroadcastResult, DynamicGlobalProperties, NodeApi, RpcError, RpcResult};
use steem_broadcast::transaction::{Asset, Operation, Transaction, TransferOperation, VoteOperation};

pub const POSTING_WIF: &str = "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ";
pub const HEAD_BLOCK_ID: &str = "0102030405060708090a0b0c0d0e0f1011121314";
pub const HEAD_BLOCK_NUMBER: u32 = 0x0102_0304;
pub const HEAD_TIME: &str = "2016-03-24T16:05:00";

pub fn posting_key() -> PrivateKey {
    PrivateKey::from_wif(POSTING_WIF).unwrap()
}

pub fn active_key() -> PrivateKey {
    PrivateKey::from_bytes(&[7u8; 32]).unwrap()
}

pub fn head_time() -> NaiveDateTime {
    NaiveDateTime::parse_from_str(HEAD_TIME, "%Y-%m-%dT%H:%M:%S").unwrap()
}

pub fn head_props() -> DynamicGlobalProperties {
    DynamicGlobalProperties {
        head_block_number: HEAD_BLOCK_NUMBER,
        head_block_id: HEAD_BLOCK_ID.to_string(),
        time: head_time(),
        last_irreversible_block_num: HEAD_BLOCK_NUMBER - 20,
    }
}

pub fn vote(voter: &str) -> Operation {
    Operation::Vote(VoteOperation {
        voter: voter.to_string(),
        author: "bob".to_string(),
        permlink: "hello-world".to_string(),
        weight: 10_000,
    })
}

pub fn transfer(from: &str) -> Operation {
    Operation::Transfer(TransferOperation {
        from: from.to_string(),
        to: "bob".to_string(),
        amount: "1.000 STEEM".parse::<Asset>().unwrap(),
        memo: "thanks".to_string(),
    })
}

/// `alice` with every role except owner and memo.
pub fn alice_store() -> KeyStore {
    KeyStore::builder()
        .insert(
            "alice",
            Keys::default()
                .with(Authority::Posting, posting_key())
                .with(Authority::Active, active_key()),
        )
        .build()
}

/// `alice` with a posting key only.
pub fn posting_only_store() -> KeyStore {
    KeyStore::builder()
        .insert("alice", Keys::default().with(Authority::Posting, posting_key()))
        .build()
}

/// In-memory node with call counters and programmable failures.
#[derive(Default)]
pub struct MockNode {
    pub props: Mutex<Option<DynamicGlobalProperties>>,
    pub fail_props: Option<RpcError>,
    pub fail_broadcast: Option<RpcError>,
    pub verify_result: bool,
    pub props_calls: AtomicU32,
    pub broadcast_calls: AtomicU32,
    pub verify_calls: AtomicU32,
    pub last_transaction: Mutex<Option<Transaction>>,
}

impl MockNode {
    pub fn new() -> Self {
        Self {
            props: Mutex::new(Some(head_props())),
            verify_result: true,
            ..Default::default()
        }
    }

    pub fn with_head_block_id(self, id: &str) -> Self {
        if let Some(props) = self.props.lock().unwrap().as_mut() {
            props.head_block_id = id.to_string();
        }
        self
    }

    pub fn failing_props(mut self, error: RpcError) -> Self {
        self.fail_props = Some(error);
        self
    }

    pub fn failing_broadcast(mut self, error: RpcError) -> Self {
        self.fail_broadcast = Some(error);
        self
    }

    pub fn props_calls(&self) -> u32 {
        self.props_calls.load(Ordering::SeqCst)
    }

    pub fn broadcast_calls(&self) -> u32 {
        self.broadcast_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> u32 {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn last_transaction(&self) -> Option<Transaction> {
        self.last_transaction.lock().unwrap().clone()
    }
}

fn clone_error(error: &RpcError) -> RpcError {
    match error {
        RpcError::Node { code, message } => RpcError::Node {
            code: *code,
            message: message.clone(),
        },
        other => RpcError::Transport(other.to_string()),
    }
}

#[async_trait]
impl NodeApi for MockNode {
    async fn get_dynamic_global_properties(&self) -> RpcResult<DynamicGlobalProperties> {
        self.props_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.fail_props {
            return Err(clone_error(error));
        }
        self.props
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| RpcError::Decode("no props".to_string()))
    }

    async fn broadcast_transaction_synchronous(
        &self,
        transaction: &Transaction,
    ) -> RpcResult<BroadcastResult> {
        self.broadcast_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_transaction.lock().unwrap() = Some(transaction.clone());
        if let Some(error) = &self.fail_broadcast {
            return Err(clone_error(error));
        }
        Ok(BroadcastResult {
            id: transaction.id(),
            block_num: HEAD_BLOCK_NUMBER + 1,
            trx_num: 0,
            expired: false,
        })
    }

    async fn verify_authority(&self, transaction: &Transaction) -> RpcResult<bool> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_transaction.lock().unwrap() = Some(transaction.clone());
        Ok(self.verify_result)
    }
}

/// Key resolver that counts lookups before delegating to a store.
pub struct CountingResolver {
    pub inner: KeyStore,
    pub calls: Arc<AtomicU32>,
}

impl CountingResolver {
    pub fn new(inner: KeyStore) -> (Self, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        (
            Self {
                inner,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl KeyResolver for CountingResolver {
    fn signing_keys(&self, account: &str, operation: &Operation) -> KeyResult<Vec<PrivateKey>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.signing_keys(account, operation)
    }
}

/// A node reply: `Some(Ok)` result, `Some(Err)` JSON-RPC error, `None` no reply.
pub type Reply = Option<Result<Value, (i64, String)>>;

/// Websocket JSON-RPC node bound to a random local port.
pub struct MockWsNode {
    pub url: String,
    pub methods: Arc<Mutex<Vec<String>>>,
}

impl MockWsNode {
    pub fn methods(&self) -> Vec<String> {
        self.methods.lock().unwrap().clone()
    }
}

/// Start a programmable websocket node. `handler` maps method and params
/// to a reply.
pub async fn start_ws_node<F>(handler: F) -> MockWsNode
where
    F: Fn(&str, &Value) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let methods = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let recorded = methods.clone();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let handler = handler.clone();
            let recorded = recorded.clone();
            tokio::spawn(async move {
                let Ok(mut ws) = tokio_tungstenite::accept_async(socket).await else {
                    return;
                };
                while let Some(Ok(message)) = ws.next().await {
                    let Message::Text(text) = message else {
                        continue;
                    };
                    let request: Value = serde_json::from_str(text.as_str()).unwrap();
                    let method = request["method"].as_str().unwrap_or_default().to_string();
                    recorded.lock().unwrap().push(method.clone());

                    let reply = match handler(&method, &request["params"]) {
                        Some(Ok(result)) => json!({
                            "jsonrpc": "2.0",
                            "id": request["id"],
                            "result": result,
                        }),
                        Some(Err((code, message))) => json!({
                            "jsonrpc": "2.0",
                            "id": request["id"],
                            "error": { "code": code, "message": message },
                        }),
                        None => continue,
                    };
                    if ws.send(Message::Text(reply.to_string().into())).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    MockWsNode { url, methods }
}

/// Replies the way a healthy node does.
pub fn healthy_node(method: &str, params: &Value) -> Reply {
    match method {
        "condenser_api.get_dynamic_global_properties" => Some(Ok(json!({
            "head_block_number": HEAD_BLOCK_NUMBER,
            "head_block_id": HEAD_BLOCK_ID,
            "time": HEAD_TIME,
            "last_irreversible_block_num": HEAD_BLOCK_NUMBER - 20,
            "current_supply": "271546371.129 STEEM",
        }))),
        "condenser_api.broadcast_transaction_synchronous" => {
            let signatures = params[0]["signatures"].as_array().map_or(0, Vec::len);
            if signatures == 0 {
                return Some(Err((-32000, "missing required posting authority".to_string())));
            }
            Some(Ok(json!({
                "id": "6fde0190a97835ea6d9e651293e90c89911f933c",
                "block_num": HEAD_BLOCK_NUMBER + 1,
                "trx_num": 3,
                "expired": false,
            })))
        }
        "condenser_api.verify_authority" => Some(Ok(json!(true))),
        _ => Some(Err((-32601, format!("unknown method {}", method)))),
    }
}

/// A local address nothing listens on.
pub async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{}", addr)
}
