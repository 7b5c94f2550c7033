//! Chain identification for transaction signing.

use thiserror::Error;

/// Chain id of the Steem main network (32 zero bytes).
pub const STEEM_CHAIN_ID: [u8; 32] = [0u8; 32];

/// Public key prefix used on the Steem main network.
pub const STEEM_ADDRESS_PREFIX: &str = "STM";

/// Errors produced while resolving a chain descriptor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    /// The chain name is not one we know how to sign for.
    #[error("Unknown chain: '{0}'")]
    UnknownChain(String),

    /// A custom chain id was not 32 bytes of hex.
    #[error("Invalid chain id '{0}': expected 64 hex characters")]
    InvalidChainId(String),
}

/// Result type for chain resolution.
pub type ChainResult<T> = Result<T, ChainError>;

/// Identifies the target network and supplies its signing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    name: String,
    chain_id: [u8; 32],
    address_prefix: String,
}

impl Chain {
    /// Resolve a chain by its human readable name.
    ///
    /// Unknown names are an error; there is no fallback descriptor.
    pub fn from_name(name: &str) -> ChainResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "steem" => Ok(Self::steem()),
            _ => Err(ChainError::UnknownChain(name.to_string())),
        }
    }

    /// The Steem main network.
    pub fn steem() -> Self {
        Self {
            name: "steem".to_string(),
            chain_id: STEEM_CHAIN_ID,
            address_prefix: STEEM_ADDRESS_PREFIX.to_string(),
        }
    }

    /// A private or test network identified by an explicit chain id.
    pub fn custom(name: &str, chain_id_hex: &str, address_prefix: &str) -> ChainResult<Self> {
        let bytes = hex::decode(chain_id_hex.trim())
            .map_err(|_| ChainError::InvalidChainId(chain_id_hex.to_string()))?;
        let chain_id: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ChainError::InvalidChainId(chain_id_hex.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            chain_id,
            address_prefix: address_prefix.to_string(),
        })
    }

    /// Chain name as configured.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw chain id mixed into every signing digest.
    pub fn chain_id(&self) -> &[u8; 32] {
        &self.chain_id
    }

    /// Public key prefix (e.g. `STM`).
    pub fn address_prefix(&self) -> &str {
        &self.address_prefix
    }
}
