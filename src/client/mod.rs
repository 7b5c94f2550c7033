//! Client façade: the only entry point most callers need.
//!
//! # Data Flow
//! ```text
//! send_trx / send_arr_trx / verify_trx
//!     → NodeApi::get_dynamic_global_properties (head metadata)
//!     → RefBlock + Transaction (operations appended in order)
//!     → KeyResolver (keys for the first operation's authority)
//!     → Transaction::sign (chain id from the descriptor)
//!     → NodeApi broadcast or verify_authority
//!     → BroadcastResponse / bool
//! ```
//!
//! # Design Decisions
//! - Every failure is returned once, with context; no retries
//! - No hidden global key registry: the resolver is injected
//! - Startup failures are errors, the caller decides whether they are fatal

pub mod facade;
pub mod types;

pub use facade::Client;
pub use types::{BroadcastResponse, ClientError, ClientResult};
