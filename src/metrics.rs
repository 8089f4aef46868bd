// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for the sync layer.
//!
//! Uses the `metrics` crate for backend-agnostic collection; the embedding
//! application chooses the exporter (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `lostfound_sync_` prefix for all metrics
//! - `_total` suffix for counters
//!
//! # Labels
//! - `backend`: remote, local
//! - `operation`: subscribe, add, mark_found, persist
//! - `status`: success, error

use metrics::counter;

/// Record one operation against a backend.
pub fn record_operation(backend: &str, operation: &str, status: &str) {
    counter!(
        "lostfound_sync_operations_total",
        "backend" => backend.to_string(),
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a remote failure that was recovered through the local store.
pub fn record_failover(operation: &str) {
    counter!(
        "lostfound_sync_failovers_total",
        "operation" => operation.to_string()
    )
    .increment(1);
}
