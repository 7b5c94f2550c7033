//! Transaction container, reference block derivation and signing.

use chrono::{NaiveDateTime, TimeDelta};
use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;

use crate::chain::Chain;
use crate::keys::{recover_public_key, KeyError, PrivateKey};
use crate::transaction::encoding::{to_bytes, Encode, Encoder};
use crate::transaction::operation::Operation;

/// Longest expiration window a node accepts, in seconds.
pub const MAX_EXPIRATION_SECS: u64 = 3600;

/// Errors raised while assembling or signing a transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Head block id was not hex or too short to carry a prefix.
    #[error("Invalid head block id '{0}'")]
    InvalidBlockId(String),

    /// Signing was attempted on a transaction without operations.
    #[error("Transaction has no operations")]
    NoOperations,

    /// Signing was attempted with an empty key set.
    #[error("No signing keys supplied")]
    NoSigningKeys,

    /// A stored signature could not be decoded.
    #[error("Invalid signature encoding: {0}")]
    InvalidSignature(String),

    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Result type for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;

/// Reference block fields bounding a transaction's validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefBlock {
    pub num: u16,
    pub prefix: u32,
}

impl RefBlock {
    /// Derive reference fields from the chain head.
    ///
    /// `num` is the low 16 bits of the head block number; `prefix` is the
    /// little-endian u32 at bytes 4..8 of the head block id.
    pub fn from_head(head_block_number: u32, head_block_id: &str) -> TransactionResult<Self> {
        let bytes = hex::decode(head_block_id.trim_start_matches("0x"))
            .map_err(|_| TransactionError::InvalidBlockId(head_block_id.to_string()))?;
        if bytes.len() < 8 {
            return Err(TransactionError::InvalidBlockId(head_block_id.to_string()));
        }

        Ok(Self {
            num: (head_block_number & 0xffff) as u16,
            prefix: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }
}

/// Expiration for a transaction built at `head_time`.
///
/// The window is capped at [`MAX_EXPIRATION_SECS`].
pub fn expiration_after(head_time: NaiveDateTime, window: Duration) -> NaiveDateTime {
    let secs = window.as_secs().min(MAX_EXPIRATION_SECS) as i64;
    head_time + TimeDelta::seconds(secs)
}

/// A transaction in both its JSON and binary forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    #[serde(with = "time_format")]
    pub expiration: NaiveDateTime,
    pub operations: Vec<Operation>,
    // Only the empty extension set is encodable.
    #[serde(default, deserialize_with = "empty_extensions")]
    extensions: Vec<serde_json::Value>,
    /// Hex-encoded 65-byte compact signatures.
    #[serde(default)]
    pub signatures: Vec<String>,
}

impl Transaction {
    /// Create an empty, unsigned transaction.
    pub fn new(ref_block: RefBlock, expiration: NaiveDateTime) -> Self {
        Self {
            ref_block_num: ref_block.num,
            ref_block_prefix: ref_block.prefix,
            expiration,
            operations: Vec::new(),
            extensions: Vec::new(),
            signatures: Vec::new(),
        }
    }

    /// Append an operation; order is preserved.
    pub fn push_operation(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Binary form without signatures.
    pub fn to_bytes(&self) -> Vec<u8> {
        to_bytes(self)
    }

    /// `sha256(chain_id || bytes)`, the value every signature commits to.
    pub fn digest(&self, chain: &Chain) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(chain.chain_id());
        hasher.update(self.to_bytes());
        hasher.finalize().into()
    }

    /// Transaction id as reported by nodes: first 20 bytes of
    /// `sha256(bytes)`, hex encoded.
    pub fn id(&self) -> String {
        let hash = Sha256::digest(self.to_bytes());
        hex::encode(&hash[..20])
    }

    /// Sign with every supplied key, appending to existing signatures.
    pub fn sign(&mut self, keys: &[PrivateKey], chain: &Chain) -> TransactionResult<()> {
        if self.operations.is_empty() {
            return Err(TransactionError::NoOperations);
        }
        if keys.is_empty() {
            return Err(TransactionError::NoSigningKeys);
        }

        let digest = self.digest(chain);
        for key in keys {
            let signature = key.sign_digest(&digest)?;
            self.signatures.push(hex::encode(signature));
        }

        tracing::debug!(
            trx_id = %self.id(),
            signatures = self.signatures.len(),
            "Transaction signed"
        );
        Ok(())
    }

    /// Public keys recovered from the attached signatures.
    pub fn recover_signers(&self, chain: &Chain) -> TransactionResult<Vec<PublicKey>> {
        let digest = self.digest(chain);
        self.signatures
            .iter()
            .map(|signature| -> TransactionResult<PublicKey> {
                let bytes = hex::decode(signature)
                    .map_err(|e| TransactionError::InvalidSignature(e.to_string()))?;
                Ok(recover_public_key(&digest, &bytes)?)
            })
            .collect()
    }
}

impl Encode for Transaction {
    fn encode(&self, out: &mut Encoder) {
        out.u16(self.ref_block_num);
        out.u32(self.ref_block_prefix);
        out.u32(self.expiration.and_utc().timestamp() as u32);
        out.varint(self.operations.len() as u64);
        for operation in &self.operations {
            out.encode(operation);
        }
        out.varint(self.extensions.len() as u64);
    }
}

fn empty_extensions<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<serde_json::Value>, D::Error> {
    let extensions = Vec::<serde_json::Value>::deserialize(deserializer)?;
    if !extensions.is_empty() {
        return Err(serde::de::Error::custom("transaction extensions are not supported"));
    }
    Ok(extensions)
}

/// Node timestamps: `2016-03-24T16:05:00`, UTC, no zone suffix.
pub mod time_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
