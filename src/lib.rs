//! Steem transaction broadcast client.
//!
//! Builds, signs and broadcasts transactions against a Steem node over a
//! websocket JSON-RPC transport.
//!
//! ```no_run
//! use steem_broadcast::keys::{Authority, KeyStore, Keys, PrivateKey};
//! use steem_broadcast::transaction::{Operation, VoteOperation};
//! use steem_broadcast::Client;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let posting = PrivateKey::from_wif("5J...")?;
//! let keys = KeyStore::builder()
//!     .insert("alice", Keys::default().with(Authority::Posting, posting))
//!     .build();
//!
//! let client = Client::new(&["wss://api.steemit.com".to_string()], "steem", keys).await?;
//! let response = client
//!     .send_trx(
//!         "alice",
//!         Operation::Vote(VoteOperation {
//!             voter: "alice".into(),
//!             author: "bob".into(),
//!             permlink: "hello-world".into(),
//!             weight: 10_000,
//!         }),
//!     )
//!     .await?;
//! println!("{} in block {}", response.id, response.block_num);
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod client;
pub mod config;
pub mod keys;
pub mod observability;
pub mod rpc;
pub mod transaction;

pub use chain::Chain;
pub use client::{BroadcastResponse, Client, ClientError};
pub use config::ClientConfig;
