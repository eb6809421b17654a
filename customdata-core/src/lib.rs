//! customdata-core - observable, metadata-tracked key-value store
//!
//! [`CustomData`] maps string keys to string values, keeps a
//! `_LAST_MODIFIED` timestamp as one of its own entries, and notifies
//! registered listeners before and after every mutation.
//!
//! # Modules
//!
//! - [`core_store`] - the store, its events, clock and reserved keys
//! - [`config`] - TOML / environment configuration
//! - [`logging`] - `tracing` subscriber setup
//! - [`metrics`] - counters recorded by the store
//!
//! # Example
//! ```
//! use customdata_core::{CustomData, CustomDataEvent};
//!
//! let mut data = CustomData::new();
//! data.subscribe(|event: &CustomDataEvent| println!("{}", event));
//! data.set("Title", "x");
//!
//! assert_eq!(data.size(), 2);
//! assert!(data.last_modified().is_some());
//! ```

pub mod config;
pub mod core_store;
pub mod logging;
pub mod metrics;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{Config, ConfigError, StoreConfig};
pub use core_store::{
    Clock, CustomData, CustomDataEvent, CustomDataListener, ListenerId, ManualClock, SystemClock,
    TimestampFormat,
};
pub use logging::{init_logging, LogLevel};
