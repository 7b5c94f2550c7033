//! Websocket JSON-RPC transport with ordered endpoint failover.
//!
//! # Responsibilities
//! - Connect to the first reachable endpoint, in configured order
//! - Match responses to requests by id
//! - Drop a broken connection so the next call fails over
//! - Bound every connect and request with a timeout

use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::observability::metrics;
use crate::rpc::types::{JsonRpcRequest, JsonRpcResponse, RpcError, RpcResult};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Endpoints and deadlines for a [`WsTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Websocket endpoints, tried in order.
    pub urls: Vec<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl TransportConfig {
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Default)]
struct Connection {
    stream: Option<WsStream>,
    /// Index of the endpoint to use (or try first on reconnect).
    endpoint: usize,
}

/// JSON-RPC 2.0 over a single websocket connection.
///
/// Requests are serialized through an async mutex, which makes the
/// transport safe to share between tasks.
pub struct WsTransport {
    urls: Vec<Url>,
    connect_timeout: Duration,
    request_timeout: Duration,
    next_id: AtomicU64,
    connection: Mutex<Connection>,
}

impl WsTransport {
    /// Validate endpoints without connecting.
    pub fn new(config: TransportConfig) -> RpcResult<Self> {
        if config.urls.is_empty() {
            return Err(RpcError::NoEndpoints);
        }

        let urls = config
            .urls
            .iter()
            .map(|raw| parse_endpoint(raw))
            .collect::<RpcResult<Vec<_>>>()?;

        Ok(Self {
            urls,
            connect_timeout: config.connect_timeout,
            request_timeout: config.request_timeout,
            next_id: AtomicU64::new(1),
            connection: Mutex::new(Connection::default()),
        })
    }

    /// Validate endpoints and establish the first connection.
    pub async fn connect(config: TransportConfig) -> RpcResult<Self> {
        let transport = Self::new(config)?;
        {
            let mut connection = transport.connection.lock().await;
            transport.open(&mut connection).await?;
        }
        Ok(transport)
    }

    /// Configured endpoints in failover order.
    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    /// Invoke `method` with `params` and decode the result.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> RpcResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = serde_json::to_string(&JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params: &params,
        })
        .map_err(|e| RpcError::Decode(e.to_string()))?;

        let started = Instant::now();
        let mut connection = self.connection.lock().await;
        if connection.stream.is_none() {
            self.open(&mut connection).await?;
        }

        let outcome = match connection.stream.as_mut() {
            Some(stream) => match timeout(self.request_timeout, round_trip(stream, id, request)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(RpcError::Timeout(self.request_timeout)),
            },
            None => Err(RpcError::Transport("not connected".to_string())),
        };

        if let Err(e) = &outcome {
            let endpoint = connection.endpoint;
            tracing::warn!(
                url = %self.urls[endpoint],
                method = method,
                error = %e,
                "Dropping node connection"
            );
            connection.stream = None;
            connection.endpoint = (endpoint + 1) % self.urls.len();
        }
        drop(connection);

        let result = outcome.and_then(JsonRpcResponse::into_result);
        metrics::record_rpc_request(method, outcome_label(&result), started.elapsed());

        serde_json::from_value(result?).map_err(|e| RpcError::Decode(format!("{}: {}", method, e)))
    }

    /// Close the current connection, if any.
    pub async fn close(&self) {
        let mut connection = self.connection.lock().await;
        if let Some(mut stream) = connection.stream.take() {
            if let Err(e) = stream.close(None).await {
                tracing::debug!(error = %e, "Error while closing node connection");
            }
        }
    }

    async fn open(&self, connection: &mut Connection) -> RpcResult<()> {
        let count = self.urls.len();

        for offset in 0..count {
            let index = (connection.endpoint + offset) % count;
            let url = &self.urls[index];

            match timeout(self.connect_timeout, connect_async(url.as_str())).await {
                Ok(Ok((stream, _))) => {
                    tracing::info!(url = %url, "Connected to node");
                    connection.stream = Some(stream);
                    connection.endpoint = index;
                    return Ok(());
                }
                Ok(Err(e)) => {
                    tracing::warn!(url = %url, error = %e, "Connect failed, trying next endpoint");
                }
                Err(_) => {
                    tracing::warn!(url = %url, "Connect timeout, trying next endpoint");
                }
            }
        }

        Err(RpcError::Transport("All node endpoints failed".to_string()))
    }
}

impl fmt::Debug for WsTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsTransport")
            .field("urls", &self.urls.iter().map(Url::as_str).collect::<Vec<_>>())
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Metrics label for a finished call. Node-side rejections are kept apart
/// from transport failures.
fn outcome_label<T>(result: &RpcResult<T>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(RpcError::Node { .. }) => "node_error",
        Err(_) => "error",
    }
}

fn parse_endpoint(raw: &str) -> RpcResult<Url> {
    let url = Url::parse(raw).map_err(|e| RpcError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "ws" | "wss" => Ok(url),
        scheme => Err(RpcError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}', expected ws or wss", scheme),
        }),
    }
}

async fn round_trip(stream: &mut WsStream, id: u64, request: String) -> RpcResult<JsonRpcResponse> {
    stream
        .send(Message::Text(request.into()))
        .await
        .map_err(|e| RpcError::Transport(e.to_string()))?;

    while let Some(message) = stream.next().await {
        let message = message.map_err(|e| RpcError::Transport(e.to_string()))?;
        let response: JsonRpcResponse = match message {
            Message::Text(text) => serde_json::from_str(&text),
            Message::Binary(bytes) => serde_json::from_slice(&bytes),
            Message::Close(_) => break,
            _ => continue,
        }
        .map_err(|e| RpcError::Decode(e.to_string()))?;

        if response.id == Some(id) {
            return Ok(response);
        }
        tracing::debug!(expected = id, received = ?response.id, "Skipping unrelated response");
    }

    Err(RpcError::Transport("Connection closed by node".to_string()))
}
