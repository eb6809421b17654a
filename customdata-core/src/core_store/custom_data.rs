/*
    custom_data.rs - Observable, metadata-tracked key-value store

    String keys map to string values in insertion order. The store keeps a
    `_LAST_MODIFIED` timestamp as an ordinary entry and notifies listeners
    around every mutation.

    Invariants:
    - keys are unique; updating a value never reorders entries
    - `_LAST_MODIFIED` exists iff some other key exists (except right after a
      raw restore, which takes content as given)
    - every effective mutation except `clear` rewrites `_LAST_MODIFIED`
    - rename is all-or-nothing
    - equality looks at content only
*/

use super::clock::{parse_timestamp, Clock, SystemClock, TimestampFormat};
use super::errors::RenameError;
use super::events::{CustomDataEvent, CustomDataListener, ListenerId, ListenerRegistry};
use super::keys::{self, CREATED, EXCLUDE_FROM_REPORTS, LAST_MODIFIED, TRUE_VALUE};
use crate::config::StoreConfig;
use crate::metrics::{
    record_counter, record_gauge, MUTATIONS_NOOP, MUTATIONS_TOTAL, RENAME_REJECTED, SIZE_BYTES,
};
use chrono::{DateTime, Utc};
use hashlink::LinkedHashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Key-value store with last-modified bookkeeping and change notifications
pub struct CustomData {
    entries: LinkedHashMap<String, String>,
    clock: Arc<dyn Clock>,
    timestamp_format: TimestampFormat,
    emit_modified: bool,
    listeners: ListenerRegistry,
}

impl CustomData {
    /// Create an empty store on the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store reading time from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: LinkedHashMap::new(),
            clock,
            timestamp_format: TimestampFormat::default(),
            emit_modified: true,
            listeners: ListenerRegistry::new(),
        }
    }

    /// Create an empty store using the settings in `config`
    pub fn with_config(config: &StoreConfig, clock: Arc<dyn Clock>) -> Self {
        let mut store = Self::with_clock(clock);
        store.timestamp_format = config.timestamp_format;
        store.emit_modified = config.emit_modified;
        store
    }

    /// Rebuild a store from previously saved content.
    ///
    /// Entries are taken as given: no timestamp is written and no events
    /// fire. A repeated key keeps its first position and its last value.
    pub fn from_entries<I, K, V>(clock: Arc<dyn Clock>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut store = Self::with_clock(clock);
        for (key, value) in entries {
            let key = key.into();
            let value = value.into();
            if let Some(slot) = store.entries.get_mut(&key) {
                *slot = value;
            } else {
                store.entries.insert(key, value);
            }
        }
        store
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        self.timestamp_format
    }

    /// Layout used for future `_LAST_MODIFIED` writes; existing text is kept
    pub fn set_timestamp_format(&mut self, format: TimestampFormat) {
        self.timestamp_format = format;
    }

    // ----- listeners -----

    /// Register a listener; events are delivered in registration order
    pub fn subscribe<L>(&mut self, listener: L) -> ListenerId
    where
        L: CustomDataListener + 'static,
    {
        self.listeners.subscribe(Box::new(listener))
    }

    /// Returns false if `id` was not registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Suppress or restore `Modified` events. Other events are unaffected.
    pub fn set_emit_modified(&mut self, enabled: bool) {
        self.emit_modified = enabled;
    }

    pub fn emits_modified(&self) -> bool {
        self.emit_modified
    }

    // ----- queries -----

    /// All keys in insertion order, sentinel included
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<String> {
        self.entries.values().cloned().collect()
    }

    /// `(key, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Value for `key`, or `""` when absent
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_value(&self, value: &str) -> bool {
        self.entries.values().any(|v| v == value)
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of UTF-8 byte lengths of every key and value
    pub fn data_size(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Parsed `_LAST_MODIFIED`; `None` when absent or unreadable
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.timestamp_at(LAST_MODIFIED)
    }

    /// Parsed `_CREATED`; `None` when absent or unreadable
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.timestamp_at(CREATED)
    }

    pub fn is_protected_custom_data(&self, key: &str) -> bool {
        keys::is_protected_key(key)
    }

    pub fn is_excluded_from_reports(&self) -> bool {
        self.get(EXCLUDE_FROM_REPORTS) == Some(TRUE_VALUE)
    }

    fn timestamp_at(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.get(key)?;
        match parse_timestamp(raw) {
            Ok(time) => Some(time),
            Err(e) => {
                debug!(key, error = %e, "ignoring unreadable timestamp");
                None
            }
        }
    }

    // ----- mutations -----

    /// Insert or update `key`.
    ///
    /// New key: AboutToBeAdded, Modified, Added. Changed value: Modified.
    /// Same value: nothing at all.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        let unchanged = self.entries.get(&key).map(|current| *current == value);
        match unchanged {
            Some(true) => {
                record_counter(MUTATIONS_NOOP, 1);
            }
            Some(false) => {
                if let Some(slot) = self.entries.get_mut(&key) {
                    *slot = value;
                }
                trace!(key = %key, "custom data value changed");
                self.finish_mutation();
            }
            None => {
                self.emit(CustomDataEvent::AboutToBeAdded(key.clone()));
                self.entries.insert(key.clone(), value);
                trace!(key = %key, "custom data key added");
                self.finish_mutation();
                self.emit(CustomDataEvent::Added(key));
            }
        }
    }

    /// Remove `key`.
    ///
    /// AboutToBeRemoved and Removed fire even when the key is absent, so
    /// observers can treat them as "ensure absent" signals.
    pub fn remove(&mut self, key: &str) {
        self.emit(CustomDataEvent::AboutToBeRemoved(key.to_string()));

        if self.entries.remove(key).is_some() {
            trace!(key, "custom data key removed");
            self.finish_mutation();
        } else {
            record_counter(MUTATIONS_NOOP, 1);
        }

        self.emit(CustomDataEvent::Removed(key.to_string()));
    }

    /// Move the value of `old_key` to `new_key`.
    ///
    /// `old_key` must exist and `new_key` must not. Breaking that contract
    /// panics in debug builds and is a logged no-op in release builds.
    pub fn rename(&mut self, old_key: &str, new_key: &str) {
        if let Err(err) = self.check_rename(old_key, new_key) {
            record_counter(RENAME_REJECTED, 1);
            warn!(old_key, new_key, error = %err, "rejected custom data rename");
            if cfg!(debug_assertions) {
                panic!("custom data rename contract violated: {}", err);
            }
            return;
        }

        self.emit(CustomDataEvent::AboutToRename {
            old_key: old_key.to_string(),
            new_key: new_key.to_string(),
        });

        if let Some(value) = self.entries.remove(old_key) {
            self.entries.insert(new_key.to_string(), value);
        }
        trace!(old_key, new_key, "custom data key renamed");
        self.finish_mutation();

        self.emit(CustomDataEvent::Renamed {
            old_key: old_key.to_string(),
            new_key: new_key.to_string(),
        });
    }

    /// Replace all content with a copy of `other`'s. Not a merge.
    ///
    /// Does nothing when both already hold equal content.
    pub fn copy_data_from(&mut self, other: &CustomData) {
        if *self == *other {
            record_counter(MUTATIONS_NOOP, 1);
            return;
        }

        self.emit(CustomDataEvent::AboutToBeReset);
        self.entries = other.entries.clone();
        self.update_last_modified();
        record_counter(MUTATIONS_TOTAL, 1);
        self.record_size();
        debug!(entries = self.entries.len(), "custom data replaced");
        self.emit(CustomDataEvent::Reset);
        self.emit_modified();
    }

    /// Drop every entry, sentinel included.
    ///
    /// Always emits AboutToBeReset, Reset and Modified, even on an empty
    /// store. No timestamp is written since nothing is left.
    pub fn clear(&mut self) {
        self.emit(CustomDataEvent::AboutToBeReset);
        let dropped = self.entries.len();
        self.entries.clear();
        record_counter(MUTATIONS_TOTAL, 1);
        self.record_size();
        debug!(dropped, "custom data cleared");
        self.emit(CustomDataEvent::Reset);
        self.emit_modified();
    }

    /// Set or drop the exclude-from-reports marker through `set`/`remove`
    pub fn set_excluded_from_reports(&mut self, excluded: bool) {
        if excluded {
            self.set(EXCLUDE_FROM_REPORTS, TRUE_VALUE);
        } else {
            self.remove(EXCLUDE_FROM_REPORTS);
        }
    }

    fn check_rename(&self, old_key: &str, new_key: &str) -> Result<(), RenameError> {
        if !self.entries.contains_key(old_key) {
            return Err(RenameError::SourceMissing(old_key.to_string()));
        }
        if self.entries.contains_key(new_key) {
            return Err(RenameError::DestinationExists(new_key.to_string()));
        }
        Ok(())
    }

    fn finish_mutation(&mut self) {
        self.update_last_modified();
        record_counter(MUTATIONS_TOTAL, 1);
        self.record_size();
        self.emit_modified();
    }

    fn record_size(&self) {
        record_gauge(SIZE_BYTES, self.data_size() as f64);
    }

    fn update_last_modified(&mut self) {
        let only_sentinel = self.entries.len() == 1 && self.entries.contains_key(LAST_MODIFIED);
        if self.entries.is_empty() || only_sentinel {
            self.entries.remove(LAST_MODIFIED);
            return;
        }

        let stamp = self.timestamp_format.render(self.clock.now_utc());
        if let Some(slot) = self.entries.get_mut(LAST_MODIFIED) {
            *slot = stamp;
        } else {
            self.entries.insert(LAST_MODIFIED.to_string(), stamp);
        }
    }

    fn emit_modified(&mut self) {
        if self.emit_modified {
            self.emit(CustomDataEvent::Modified);
        }
    }

    fn emit(&mut self, event: CustomDataEvent) {
        self.listeners.emit(&event);
    }
}

impl Default for CustomData {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies content, clock and settings. Listeners stay with the original.
impl Clone for CustomData {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            clock: Arc::clone(&self.clock),
            timestamp_format: self.timestamp_format,
            emit_modified: self.emit_modified,
            listeners: ListenerRegistry::new(),
        }
    }
}

impl PartialEq for CustomData {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.entries.get(key) == Some(value))
    }
}

impl Eq for CustomData {}

impl fmt::Debug for CustomData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomData")
            .field("entries", &self.entries)
            .field("timestamp_format", &self.timestamp_format)
            .field("emit_modified", &self.emit_modified)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
