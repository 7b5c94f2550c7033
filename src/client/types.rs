//! Façade response and error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::ChainError;
use crate::keys::KeyError;
use crate::rpc::{BroadcastResult, RpcError};
use crate::transaction::TransactionError;

/// What a caller learns about an accepted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResponse {
    pub id: String,
    pub block_num: u32,
    pub trx_num: u32,
    pub expired: bool,
}

impl From<BroadcastResult> for BroadcastResponse {
    fn from(result: BroadcastResult) -> Self {
        Self {
            id: result.id,
            block_num: result.block_num,
            trx_num: result.trx_num,
            expired: result.expired,
        }
    }
}

/// Errors surfaced by the client façade.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Node connection could not be established at startup.
    #[error("Error initializing node client: {0}")]
    Init(#[source] RpcError),

    /// The configured chain is not supported.
    #[error("Error resolving chain: {0}")]
    Chain(#[from] ChainError),

    /// Reading chain head metadata failed.
    #[error("Error get dynamic global properties: {0}")]
    Query(#[source] RpcError),

    /// Head block id could not be turned into reference block fields.
    #[error("Error deriving reference block: {0}")]
    RefBlock(#[source] TransactionError),

    /// No usable key for the account and operation.
    #[error("Error resolving signing keys: {0}")]
    Keys(#[source] KeyError),

    /// Signature creation failed.
    #[error("Error signing transaction: {0}")]
    Sign(#[source] TransactionError),

    /// The node rejected the broadcast or the transport failed.
    #[error("Error broadcasting transaction: {0}")]
    Broadcast(#[source] RpcError),

    /// The authority check could not be performed.
    #[error("Error verifying transaction authority: {0}")]
    Verify(#[source] RpcError),

    /// An operation list was empty.
    #[error("Transaction must contain at least one operation")]
    EmptyTransaction,
}

impl ClientError {
    /// True for missing keys and cryptographic failures.
    pub fn is_signing_error(&self) -> bool {
        matches!(self, ClientError::Keys(_) | ClientError::Sign(_))
    }

    /// Stable label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Init(_) => "init",
            ClientError::Chain(_) => "chain",
            ClientError::Query(_) => "query",
            ClientError::RefBlock(_) => "ref_block",
            ClientError::Keys(_) => "keys",
            ClientError::Sign(_) => "sign",
            ClientError::Broadcast(_) => "broadcast",
            ClientError::Verify(_) => "verify",
            ClientError::EmptyTransaction => "empty",
        }
    }
}

/// Result type for façade calls.
pub type ClientResult<T> = Result<T, ClientError>;
