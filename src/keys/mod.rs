//! Signing keys and their resolution per operation.
//!
//! # Data Flow
//! ```text
//! Environment Variables (WIF per account and role)
//!     → private_key.rs (WIF decoding, canonical signing)
//!     → store.rs (immutable account → Keys map)
//!     → KeyResolver (operation → required authority → keys)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables or explicit construction
//! - Never log private keys or sensitive data
//! - The store is immutable once built and shared via `Arc`

pub mod authority;
pub mod private_key;
pub mod store;

pub use authority::Authority;
pub use private_key::{recover_public_key, KeyError, KeyResult, PrivateKey};
pub use store::{KeyResolver, KeyStore, KeyStoreBuilder, Keys};
