//! Private key handling and transaction digest signing.
//!
//! # Security
//! - Keys are decoded from WIF and held as secp256k1 secrets
//! - Keys are never logged or serialized (`Debug` is redacted)

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};
use std::fmt;
use thiserror::Error;

use crate::keys::authority::Authority;

/// WIF version byte for secp256k1 private keys.
const WIF_VERSION: u8 = 0x80;

/// Upper bound on nonce retries while searching for a canonical signature.
const MAX_SIGNING_ATTEMPTS: u32 = 256;

/// Errors raised while loading, resolving or using keys.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Key material could not be decoded.
    #[error("Invalid private key format: {0}")]
    InvalidWif(String),

    /// No keys are registered for the account.
    #[error("No keys registered for account '{0}'")]
    UnknownAccount(String),

    /// The account is known but lacks the required role.
    #[error("Account '{account}' has no {authority} key")]
    MissingKey { account: String, authority: Authority },

    /// Signature creation or recovery failed.
    #[error("Signing failed: {0}")]
    Signing(String),
}

/// Result type for key operations.
pub type KeyResult<T> = Result<T, KeyError>;

/// A secp256k1 private key.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    secret: SecretKey,
}

impl PrivateKey {
    /// Decode a base58check WIF string.
    pub fn from_wif(wif: &str) -> KeyResult<Self> {
        let payload = bs58::decode(wif.trim())
            .with_check(None)
            .into_vec()
            .map_err(|e| KeyError::InvalidWif(e.to_string()))?;

        if payload.len() != 33 || payload[0] != WIF_VERSION {
            return Err(KeyError::InvalidWif(
                "unexpected WIF payload length or version".to_string(),
            ));
        }

        let secret = SecretKey::from_slice(&payload[1..])
            .map_err(|e| KeyError::InvalidWif(e.to_string()))?;
        Ok(Self { secret })
    }

    /// Build a key from raw secret bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> KeyResult<Self> {
        let secret =
            SecretKey::from_slice(bytes).map_err(|e| KeyError::InvalidWif(e.to_string()))?;
        Ok(Self { secret })
    }

    /// Encode back to WIF.
    pub fn to_wif(&self) -> String {
        let mut payload = Vec::with_capacity(33);
        payload.push(WIF_VERSION);
        payload.extend_from_slice(&self.secret.secret_bytes());
        bs58::encode(payload).with_check().into_string()
    }

    /// The matching public key.
    pub fn public_key(&self) -> PublicKey {
        self.secret.public_key(SECP256K1)
    }

    /// Sign a 32-byte digest.
    ///
    /// Returns the 65-byte compact form: header byte (`recid + 31`) followed
    /// by `r || s`. Nonce data is varied until the signature is canonical.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> KeyResult<[u8; 65]> {
        let message = Message::from_digest(*digest);

        for attempt in 0..MAX_SIGNING_ATTEMPTS {
            let signature = if attempt == 0 {
                SECP256K1.sign_ecdsa_recoverable(&message, &self.secret)
            } else {
                let mut noncedata = [0u8; 32];
                noncedata[..4].copy_from_slice(&attempt.to_le_bytes());
                SECP256K1.sign_ecdsa_recoverable_with_noncedata(&message, &self.secret, &noncedata)
            };

            let (recovery_id, compact) = signature.serialize_compact();
            if is_canonical(&compact) {
                let mut out = [0u8; 65];
                out[0] = recovery_id.to_i32() as u8 + 31;
                out[1..].copy_from_slice(&compact);
                return Ok(out);
            }
            tracing::trace!(attempt, "Non-canonical signature, retrying");
        }

        Err(KeyError::Signing(format!(
            "no canonical signature after {} attempts",
            MAX_SIGNING_ATTEMPTS
        )))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// Graphene canonical form: neither `r` nor `s` may have the high bit set
/// or a redundant leading zero byte.
fn is_canonical(compact: &[u8; 64]) -> bool {
    compact[0] & 0x80 == 0
        && !(compact[0] == 0 && compact[1] & 0x80 == 0)
        && compact[32] & 0x80 == 0
        && !(compact[32] == 0 && compact[33] & 0x80 == 0)
}

/// Recover the public key that produced a 65-byte compact signature.
pub fn recover_public_key(digest: &[u8; 32], signature: &[u8]) -> KeyResult<PublicKey> {
    if signature.len() != 65 {
        return Err(KeyError::Signing(format!(
            "expected 65 signature bytes, got {}",
            signature.len()
        )));
    }

    let header = signature[0];
    if !(27..=34).contains(&header) {
        return Err(KeyError::Signing(format!("invalid signature header {}", header)));
    }

    let recovery_id = RecoveryId::from_i32(((header - 27) & 3) as i32)
        .map_err(|e| KeyError::Signing(e.to_string()))?;
    let recoverable = RecoverableSignature::from_compact(&signature[1..], recovery_id)
        .map_err(|e| KeyError::Signing(e.to_string()))?;

    SECP256K1
        .recover_ecdsa(&Message::from_digest(*digest), &recoverable)
        .map_err(|e| KeyError::Signing(e.to_string()))
}
