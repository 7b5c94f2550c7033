//! Immutable account key store and the resolver seam used by the client.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::keys::authority::Authority;
use crate::keys::private_key::{KeyError, KeyResult, PrivateKey};
use crate::transaction::Operation;

/// Environment variable prefix for account keys.
///
/// Full name is `STEEM_<ROLE>_KEY_<ACCOUNT>`, e.g. `STEEM_POSTING_KEY_ALICE`.
pub const KEY_ENV_PREFIX: &str = "STEEM";

/// Up to four role keys held for one account.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Keys {
    pub owner: Option<PrivateKey>,
    pub active: Option<PrivateKey>,
    pub posting: Option<PrivateKey>,
    pub memo: Option<PrivateKey>,
}

impl Keys {
    /// Set the key for a role.
    pub fn with(mut self, authority: Authority, key: PrivateKey) -> Self {
        *self.slot_mut(authority) = Some(key);
        self
    }

    /// Key held for a role, if any.
    pub fn get(&self, authority: Authority) -> Option<&PrivateKey> {
        match authority {
            Authority::Owner => self.owner.as_ref(),
            Authority::Active => self.active.as_ref(),
            Authority::Posting => self.posting.as_ref(),
            Authority::Memo => self.memo.as_ref(),
        }
    }

    /// True when no role has a key.
    pub fn is_empty(&self) -> bool {
        Authority::ALL.iter().all(|a| self.get(*a).is_none())
    }

    fn slot_mut(&mut self, authority: Authority) -> &mut Option<PrivateKey> {
        match authority {
            Authority::Owner => &mut self.owner,
            Authority::Active => &mut self.active,
            Authority::Posting => &mut self.posting,
            Authority::Memo => &mut self.memo,
        }
    }
}

impl fmt::Debug for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roles: Vec<&str> = Authority::ALL
            .iter()
            .filter(|a| self.get(**a).is_some())
            .map(|a| a.as_str())
            .collect();
        f.debug_struct("Keys").field("roles", &roles).finish()
    }
}

/// Determines which private keys must sign an operation for an account.
///
/// Implementations must fail rather than return an empty set.
pub trait KeyResolver: Send + Sync {
    fn signing_keys(&self, account: &str, operation: &Operation) -> KeyResult<Vec<PrivateKey>>;
}

/// Account name → keys. Read-only once built.
#[derive(Clone, Default)]
pub struct KeyStore {
    accounts: Arc<HashMap<String, Keys>>,
}

/// Collects accounts before freezing them into a [`KeyStore`].
#[derive(Default)]
pub struct KeyStoreBuilder {
    accounts: HashMap<String, Keys>,
}

impl KeyStoreBuilder {
    /// Register keys for an account, replacing any earlier entry.
    pub fn insert(mut self, account: impl Into<String>, keys: Keys) -> Self {
        self.accounts.insert(account.into(), keys);
        self
    }

    pub fn build(self) -> KeyStore {
        KeyStore {
            accounts: Arc::new(self.accounts),
        }
    }
}

impl KeyStore {
    pub fn builder() -> KeyStoreBuilder {
        KeyStoreBuilder::default()
    }

    /// Load keys for the given accounts from environment variables.
    ///
    /// Accounts without any variable set are skipped with a warning. A
    /// variable that is set but not a valid WIF is an error.
    pub fn from_env(accounts: &[String]) -> KeyResult<Self> {
        let mut builder = Self::builder();

        for account in accounts {
            let mut keys = Keys::default();
            for authority in Authority::ALL {
                let var = env_var_name(authority, account);
                if let Ok(wif) = std::env::var(&var) {
                    let key = PrivateKey::from_wif(&wif).map_err(|e| {
                        KeyError::InvalidWif(format!("{}: {}", var, e))
                    })?;
                    keys = keys.with(authority, key);
                }
            }

            if keys.is_empty() {
                tracing::warn!(account = %account, "No keys found in environment");
                continue;
            }

            tracing::info!(account = %account, keys = ?keys, "Loaded account keys");
            builder = builder.insert(account.clone(), keys);
        }

        Ok(builder.build())
    }

    /// Keys registered for an account.
    pub fn keys(&self, account: &str) -> Option<&Keys> {
        self.accounts.get(account)
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl KeyResolver for KeyStore {
    /// Returns exactly the key for the operation's required authority.
    fn signing_keys(&self, account: &str, operation: &Operation) -> KeyResult<Vec<PrivateKey>> {
        let keys = self
            .keys(account)
            .ok_or_else(|| KeyError::UnknownAccount(account.to_string()))?;

        let authority = operation.required_authority();
        let key = keys.get(authority).ok_or_else(|| KeyError::MissingKey {
            account: account.to_string(),
            authority,
        })?;

        Ok(vec![key.clone()])
    }
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut accounts: Vec<&String> = self.accounts.keys().collect();
        accounts.sort();
        f.debug_struct("KeyStore").field("accounts", &accounts).finish()
    }
}

/// Environment variable holding `account`'s key for `authority`.
pub fn env_var_name(authority: Authority, account: &str) -> String {
    let account: String = account
        .chars()
        .map(|c| match c {
            '-' | '.' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect();
    format!(
        "{}_{}_KEY_{}",
        KEY_ENV_PREFIX,
        authority.as_str().to_ascii_uppercase(),
        account
    )
}
