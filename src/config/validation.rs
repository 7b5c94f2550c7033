//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, expiration window)
//! - Check endpoints are websocket URLs and the chain resolves
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::ClientConfig;
use crate::transaction::MAX_EXPIRATION_SECS;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let node = &config.node;

    if node.urls.is_empty() {
        errors.push(ValidationError::new("node.urls", "at least one URL is required"));
    }
    for url in &node.urls {
        match url::Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "ws" | "wss") => {}
            Ok(parsed) => errors.push(ValidationError::new(
                "node.urls",
                format!("'{}' uses scheme '{}', expected ws or wss", url, parsed.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(
                "node.urls",
                format!("'{}' is not a valid URL: {}", url, e),
            )),
        }
    }

    if let Err(e) = node.chain() {
        errors.push(ValidationError::new("node.chain", e.to_string()));
    }

    if node.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("node.connect_timeout_secs", "must be greater than 0"));
    }
    if node.request_timeout_secs == 0 {
        errors.push(ValidationError::new("node.request_timeout_secs", "must be greater than 0"));
    }

    let expiration = config.transaction.expiration_secs;
    if expiration == 0 || expiration > MAX_EXPIRATION_SECS {
        errors.push(ValidationError::new(
            "transaction.expiration_secs",
            format!("must be between 1 and {}", MAX_EXPIRATION_SECS),
        ));
    }

    if config.keys.accounts.iter().any(|a| a.trim().is_empty()) {
        errors.push(ValidationError::new("keys.accounts", "account names must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
