//! The node calls the client façade depends on.

use async_trait::async_trait;

use crate::rpc::types::{BroadcastResult, DynamicGlobalProperties, RpcResult};
use crate::transaction::Transaction;

/// Remote procedures used to build, broadcast and verify transactions.
///
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Current chain head metadata.
    async fn get_dynamic_global_properties(&self) -> RpcResult<DynamicGlobalProperties>;

    /// Submit a signed transaction and wait until the node accepts it.
    async fn broadcast_transaction_synchronous(
        &self,
        transaction: &Transaction,
    ) -> RpcResult<BroadcastResult>;

    /// Ask the node whether the signatures satisfy the required authorities,
    /// without applying the transaction.
    async fn verify_authority(&self, transaction: &Transaction) -> RpcResult<bool>;
}
