//! Metrics collection for the custom data store
//!
//! Counters and gauges are recorded through the `metrics` facade. Without an installed
//! recorder every call is a no-op, so embedding applications decide whether
//! and where these are exported.

use metrics::{counter, describe_counter, describe_gauge, gauge};

/// Mutations that changed store content
pub const MUTATIONS_TOTAL: &str = "custom_data.mutations.total";

/// Mutation calls that left content untouched
pub const MUTATIONS_NOOP: &str = "custom_data.mutations.noop";

/// Events delivered to listener registries
pub const EVENTS_EMITTED: &str = "custom_data.events.emitted";

/// Renames rejected by the contract check
pub const RENAME_REJECTED: &str = "custom_data.rename.rejected";

/// Combined UTF-8 byte length of all keys and values after the last mutation
pub const SIZE_BYTES: &str = "custom_data.size.bytes";

/// Initialize metrics with descriptions
pub fn init_metrics() {
    describe_counter!(MUTATIONS_TOTAL, "Custom data mutations that changed content");
    describe_counter!(MUTATIONS_NOOP, "Custom data mutation calls that changed nothing");
    describe_counter!(EVENTS_EMITTED, "Custom data events emitted");
    describe_counter!(RENAME_REJECTED, "Custom data renames rejected by the contract check");
    describe_gauge!(SIZE_BYTES, "Custom data size in bytes");
}

/// Record a counter metric
pub fn record_counter(name: &'static str, value: u64) {
    counter!(name).increment(value);
}

/// Record a gauge metric
pub fn record_gauge(name: &'static str, value: f64) {
    gauge!(name).set(value);
}
