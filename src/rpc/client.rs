//! Node RPC client.
//!
//! # Responsibilities
//! - Query chain head metadata
//! - Broadcast signed transactions synchronously
//! - Verify transaction authority without applying it

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::rpc::api::NodeApi;
use crate::rpc::transport::{TransportConfig, WsTransport};
use crate::rpc::types::{BroadcastResult, DynamicGlobalProperties, RpcResult};
use crate::transaction::Transaction;

const GET_DYNAMIC_GLOBAL_PROPERTIES: &str = "condenser_api.get_dynamic_global_properties";
const BROADCAST_TRANSACTION_SYNCHRONOUS: &str = "condenser_api.broadcast_transaction_synchronous";
const VERIFY_AUTHORITY: &str = "condenser_api.verify_authority";

/// [`NodeApi`] over a websocket transport.
#[derive(Debug, Clone)]
pub struct NodeClient {
    transport: Arc<WsTransport>,
}

impl NodeClient {
    /// Connect to the first reachable endpoint.
    pub async fn connect(config: TransportConfig) -> RpcResult<Self> {
        let transport = WsTransport::connect(config).await?;
        tracing::info!(
            endpoints = transport.urls().len(),
            "Node client initialized"
        );
        Ok(Self::from_transport(transport))
    }

    pub fn from_transport(transport: WsTransport) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Underlying transport, for raw calls.
    pub fn transport(&self) -> &WsTransport {
        &self.transport
    }

    /// Close the current connection.
    pub async fn close(&self) {
        self.transport.close().await;
    }
}

#[async_trait]
impl NodeApi for NodeClient {
    async fn get_dynamic_global_properties(&self) -> RpcResult<DynamicGlobalProperties> {
        self.transport
            .call(GET_DYNAMIC_GLOBAL_PROPERTIES, json!([]))
            .await
    }

    async fn broadcast_transaction_synchronous(
        &self,
        transaction: &Transaction,
    ) -> RpcResult<BroadcastResult> {
        self.transport
            .call(BROADCAST_TRANSACTION_SYNCHRONOUS, json!([transaction]))
            .await
    }

    async fn verify_authority(&self, transaction: &Transaction) -> RpcResult<bool> {
        self.transport.call(VERIFY_AUTHORITY, json!([transaction])).await
    }
}
