//! Assertions for store invariants

use crate::core_store::keys::LAST_MODIFIED;
use crate::core_store::CustomData;

/// `_LAST_MODIFIED` is present iff some other key is
pub fn assert_sentinel_invariant(store: &CustomData) {
    let has_content = store.keys().iter().any(|k| k != LAST_MODIFIED);
    assert_eq!(
        store.contains(LAST_MODIFIED),
        has_content,
        "sentinel invariant broken, keys: {:?}",
        store.keys()
    );
}

/// No key appears twice in `keys()`
pub fn assert_unique_keys(store: &CustomData) {
    let keys = store.keys();
    let mut sorted = keys.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), keys.len(), "duplicate keys: {:?}", keys);
}

/// `data_size()` matches a recount over `iter()`
pub fn assert_data_size_consistent(store: &CustomData) {
    let expected: usize = store.iter().map(|(k, v)| k.len() + v.len()).sum();
    assert_eq!(store.data_size(), expected);
}

/// Run every invariant check
pub fn assert_store_invariants(store: &CustomData) {
    assert_sentinel_invariant(store);
    assert_unique_keys(store);
    assert_data_size_consistent(store);
    assert_eq!(store.is_empty(), store.size() == 0);
}
