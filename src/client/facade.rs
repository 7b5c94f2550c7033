//! Transaction façade over a node and a key resolver.
//!
//! # Responsibilities
//! - Fetch head metadata and derive reference block fields
//! - Assemble, sign and submit transactions
//! - Reshape node responses into [`BroadcastResponse`]

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::chain::Chain;
use crate::client::types::{BroadcastResponse, ClientError, ClientResult};
use crate::config::ClientConfig;
use crate::keys::{KeyResolver, KeyStore};
use crate::observability::metrics;
use crate::rpc::{DynamicGlobalProperties, NodeApi, NodeClient, TransportConfig};
use crate::transaction::builder::expiration_after;
use crate::transaction::{Operation, RefBlock, Transaction};

/// Default expiration window after the head block time.
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(60);

/// Builds, signs and submits transactions for registered accounts.
///
/// Cheap to clone; clones share the node connection and key store.
pub struct Client<A = NodeClient, K = KeyStore> {
    rpc: Arc<A>,
    chain: Chain,
    keys: Arc<K>,
    expiration: Duration,
}

impl Client<NodeClient, KeyStore> {
    /// Connect to `urls` (tried in order) for the named chain.
    ///
    /// An unknown chain or an unreachable node is returned as an error; the
    /// caller decides whether that is fatal.
    pub async fn new(urls: &[String], chain_name: &str, keys: KeyStore) -> ClientResult<Self> {
        let chain = Chain::from_name(chain_name)?;
        let rpc = NodeClient::connect(TransportConfig::new(urls.to_vec()))
            .await
            .map_err(ClientError::Init)?;
        Ok(Self::from_parts(rpc, chain, keys))
    }

    /// Connect using a loaded configuration.
    pub async fn connect(config: &ClientConfig, keys: KeyStore) -> ClientResult<Self> {
        let chain = config.node.chain()?;
        let rpc = NodeClient::connect(config.node.transport())
            .await
            .map_err(ClientError::Init)?;

        tracing::info!(
            chain = chain.name(),
            accounts = keys.len(),
            expiration_secs = config.transaction.expiration_secs,
            "Client ready"
        );
        Ok(Self::from_parts(rpc, chain, keys).with_expiration(config.transaction.expiration()))
    }
}

impl<A: NodeApi, K: KeyResolver> Client<A, K> {
    /// Assemble a client from already constructed collaborators.
    pub fn from_parts(rpc: A, chain: Chain, keys: K) -> Self {
        Self {
            rpc: Arc::new(rpc),
            chain,
            keys: Arc::new(keys),
            expiration: DEFAULT_EXPIRATION,
        }
    }

    /// Override the expiration window.
    pub fn with_expiration(mut self, window: Duration) -> Self {
        self.expiration = window;
        self
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn rpc(&self) -> &A {
        &self.rpc
    }

    /// Current chain head metadata.
    pub async fn dynamic_global_properties(&self) -> ClientResult<DynamicGlobalProperties> {
        self.rpc
            .get_dynamic_global_properties()
            .await
            .map_err(ClientError::Query)
    }

    /// Sign `operation` for `account` and broadcast it synchronously.
    pub async fn send_trx(
        &self,
        account: &str,
        operation: Operation,
    ) -> ClientResult<BroadcastResponse> {
        self.send_arr_trx(account, vec![operation]).await
    }

    /// Sign all `operations`, in order, as one transaction and broadcast it.
    ///
    /// Signing keys are chosen from the first operation's authority only; a
    /// later operation needing a different authority will be rejected by the
    /// node, not upgraded here.
    pub async fn send_arr_trx(
        &self,
        account: &str,
        operations: Vec<Operation>,
    ) -> ClientResult<BroadcastResponse> {
        let outcome = self.broadcast(account, operations).await;
        record_outcome("broadcast", &outcome);
        outcome
    }

    /// Sign `operation` and ask the node whether the signatures suffice.
    ///
    /// The transaction is never broadcast.
    pub async fn verify_trx(&self, account: &str, operation: Operation) -> ClientResult<bool> {
        let outcome = self.verify(account, operation).await;
        record_outcome("verify", &outcome);
        outcome
    }

    async fn broadcast(
        &self,
        account: &str,
        operations: Vec<Operation>,
    ) -> ClientResult<BroadcastResponse> {
        let tx = self.prepare(account, operations).await?;

        let result = self
            .rpc
            .broadcast_transaction_synchronous(&tx)
            .await
            .map_err(ClientError::Broadcast)?;

        tracing::info!(
            account = account,
            trx_id = %result.id,
            block_num = result.block_num,
            trx_num = result.trx_num,
            "Transaction broadcast"
        );
        Ok(result.into())
    }

    async fn verify(&self, account: &str, operation: Operation) -> ClientResult<bool> {
        let tx = self.prepare(account, vec![operation]).await?;

        let verified = self
            .rpc
            .verify_authority(&tx)
            .await
            .map_err(ClientError::Verify)?;

        tracing::info!(account = account, trx_id = %tx.id(), verified, "Authority verified");
        Ok(verified)
    }

    /// Fetch head → build → resolve keys → sign.
    async fn prepare(&self, account: &str, operations: Vec<Operation>) -> ClientResult<Transaction> {
        if operations.is_empty() {
            return Err(ClientError::EmptyTransaction);
        }

        let props = self
            .rpc
            .get_dynamic_global_properties()
            .await
            .map_err(ClientError::Query)?;

        let ref_block = RefBlock::from_head(props.head_block_number, &props.head_block_id)
            .map_err(ClientError::RefBlock)?;

        let mut tx = Transaction::new(ref_block, expiration_after(props.time, self.expiration));
        for operation in operations {
            tx.push_operation(operation);
        }

        let first = tx.operations.first().ok_or(ClientError::EmptyTransaction)?;
        let keys = self
            .keys
            .signing_keys(account, first)
            .map_err(ClientError::Keys)?;

        tx.sign(&keys, &self.chain).map_err(ClientError::Sign)?;

        tracing::debug!(
            account = account,
            operations = tx.operations.len(),
            ref_block_num = tx.ref_block_num,
            ref_block_prefix = tx.ref_block_prefix,
            "Transaction prepared"
        );
        Ok(tx)
    }
}

fn record_outcome<T>(kind: &'static str, outcome: &ClientResult<T>) {
    match outcome {
        Ok(_) => metrics::record_transaction(kind, "success"),
        Err(e) => {
            tracing::warn!(kind = kind, error = %e, "Transaction call failed");
            metrics::record_transaction(kind, e.kind());
        }
    }
}

impl<A, K> Clone for Client<A, K> {
    fn clone(&self) -> Self {
        Self {
            rpc: self.rpc.clone(),
            chain: self.chain.clone(),
            keys: self.keys.clone(),
            expiration: self.expiration,
        }
    }
}

impl<A, K> fmt::Debug for Client<A, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("chain", &self.chain.name())
            .field("expiration", &self.expiration)
            .finish_non_exhaustive()
    }
}
