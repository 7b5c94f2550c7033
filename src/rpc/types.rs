//! Node response types and RPC error definitions.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::transaction::builder::time_format;

/// Errors that can occur while talking to a node.
#[derive(Debug, Error)]
pub enum RpcError {
    /// An endpoint URL could not be parsed or has the wrong scheme.
    #[error("Invalid node URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// No endpoint was configured.
    #[error("No node URLs configured")]
    NoEndpoints,

    /// Websocket connect, send or receive failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request or connect deadline expired.
    #[error("RPC timeout after {0:?}")]
    Timeout(Duration),

    /// The node answered with a JSON-RPC error object.
    #[error("Node returned error {code}: {message}")]
    Node { code: i64, message: String },

    /// The response did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Result type for node calls.
pub type RpcResult<T> = Result<T, RpcError>;

/// Subset of `get_dynamic_global_properties` needed to build transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicGlobalProperties {
    pub head_block_number: u32,
    pub head_block_id: String,
    #[serde(with = "time_format")]
    pub time: NaiveDateTime,
    #[serde(default)]
    pub last_irreversible_block_num: u32,
}

/// Node acknowledgement of a synchronous broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResult {
    pub id: String,
    pub block_num: u32,
    pub trx_num: u32,
    pub expired: bool,
}

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Serialize)]
pub(crate) struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: &'a serde_json::Value,
}

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcResponse {
    pub id: Option<u64>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl JsonRpcResponse {
    /// Convert to the call's result, surfacing node errors.
    pub(crate) fn into_result(self) -> RpcResult<serde_json::Value> {
        if let Some(error) = self.error {
            return Err(RpcError::Node {
                code: error.code,
                message: error.message,
            });
        }
        self.result
            .ok_or_else(|| RpcError::Decode("response has neither result nor error".to_string()))
    }
}
