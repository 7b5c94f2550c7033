//! Transaction assembly, wire encoding and signing.
//!
//! # Data Flow
//! ```text
//! head block metadata
//!     → builder.rs (RefBlock, Transaction with expiration)
//!     → operation.rs (operations appended in order)
//!     → encoding.rs (graphene binary form)
//!     → builder.rs (sha256(chain_id || bytes), canonical signatures)
//! ```

pub mod asset;
pub mod builder;
pub mod encoding;
pub mod operation;

pub use asset::{Asset, AssetError, AssetResult};
pub use builder::{RefBlock, Transaction, TransactionError, TransactionResult, MAX_EXPIRATION_SECS};
pub use operation::{
    AccountWitnessProxyOperation, AccountWitnessVoteOperation, ClaimRewardBalanceOperation,
    CommentOperation, CustomJsonOperation, DelegateVestingSharesOperation,
    DeleteCommentOperation, Operation, TransferOperation, TransferToSavingsOperation,
    TransferToVestingOperation, VoteOperation, WithdrawVestingOperation,
};
