//! Chain descriptors.
//!
//! # Data Flow
//! ```text
//! chain name from config ("steem")
//!     → descriptor.rs (total lookup, no silent default)
//!     → Chain (chain id + address prefix)
//!     → transaction signing digest
//! ```

pub mod descriptor;

pub use descriptor::{Chain, ChainError, ChainResult};
