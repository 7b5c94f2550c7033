//! Node RPC subsystem.
//!
//! # Data Flow
//! ```text
//! ws:// / wss:// endpoint list (config)
//!     → transport.rs (websocket JSON-RPC, ordered failover, timeouts)
//!     → client.rs (NodeClient: condenser_api calls)
//!     → api.rs (NodeApi seam consumed by the client façade)
//! ```
//!
//! # Design Decisions
//! - Failover between endpoints belongs to the transport
//! - A failed call is reported once; the next call reconnects
//! - Every request has a deadline

pub mod api;
pub mod client;
pub mod transport;
pub mod types;

pub use api::NodeApi;
pub use client::NodeClient;
pub use transport::{TransportConfig, WsTransport};
pub use types::{BroadcastResult, DynamicGlobalProperties, RpcError, RpcResult};
