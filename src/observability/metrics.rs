//! Metrics recorded through the `metrics` facade.
//!
//! # Metrics
//! - `steem_rpc_requests_total` (counter): node calls by method, outcome
//! - `steem_rpc_request_duration_seconds` (histogram): node call latency
//! - `steem_transactions_total` (counter): façade calls by kind, outcome

use std::time::Duration;

/// Record a node call. `outcome` is `success`, `node_error` or `error`.
pub fn record_rpc_request(method: &str, outcome: &'static str, elapsed: Duration) {
    metrics::counter!(
        "steem_rpc_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "steem_rpc_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(elapsed.as_secs_f64());
}

/// Record a façade transaction call (`broadcast` or `verify`).
pub fn record_transaction(kind: &'static str, outcome: &'static str) {
    metrics::counter!("steem_transactions_total", "kind" => kind, "outcome" => outcome).increment(1);
}
