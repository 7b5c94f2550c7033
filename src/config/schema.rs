//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::chain::{Chain, ChainResult};
use crate::rpc::TransportConfig;

/// Root configuration for the client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Node endpoints and chain selection.
    pub node: NodeConfig,

    /// Transaction building settings.
    pub transaction: TransactionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Accounts whose keys are loaded from the environment.
    pub keys: KeysConfig,
}

/// Node connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Websocket endpoints, tried in order.
    pub urls: Vec<String>,

    /// Chain name (e.g. "steem").
    pub chain: String,

    /// Optional explicit chain id (64 hex chars) for private networks.
    pub chain_id: Option<String>,

    /// Public key prefix used with a custom chain id.
    pub address_prefix: String,

    /// Websocket connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            urls: vec!["wss://api.steemit.com".to_string()],
            chain: "steem".to_string(),
            chain_id: None,
            address_prefix: "STM".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

impl NodeConfig {
    /// Resolve the configured chain descriptor.
    pub fn chain(&self) -> ChainResult<Chain> {
        match &self.chain_id {
            Some(id) => Chain::custom(&self.chain, id, &self.address_prefix),
            None => Chain::from_name(&self.chain),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            urls: self.urls.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// Transaction building configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransactionConfig {
    /// Seconds after the head block time at which a transaction expires.
    pub expiration_secs: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self { expiration_secs: 60 }
    }
}

impl TransactionConfig {
    pub fn expiration(&self) -> Duration {
        Duration::from_secs(self.expiration_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Accounts to load keys for.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct KeysConfig {
    /// Account names; keys come from `STEEM_<ROLE>_KEY_<ACCOUNT>`.
    pub accounts: Vec<String>,
}
