/*
    CustomData edge case tests

    Tests covering:
    1. Sentinel bookkeeping (lonely sentinel, caller-written sentinel)
    2. Rename atomicity and contract violations
    3. Bulk replace vs. merge
    4. UTF-8 data size accounting
*/

use crate::core_store::events::CustomDataEvent;
use crate::core_store::keys::LAST_MODIFIED;
use crate::core_store::{Clock, CustomData};
use crate::test_utils::{
    assert_store_invariants, fixture_time, restored_store, store_with_clock, EventRecorder,
};
use chrono::{TimeZone, Utc};

const T0: &str = "2020-01-01T00:00:00Z";

#[test]
fn test_lonely_sentinel_removed_explicitly() {
    let (mut store, _clock) = restored_store(&[(LAST_MODIFIED, T0)]);
    assert_eq!(store.size(), 1);

    store.remove(LAST_MODIFIED);

    assert!(store.is_empty());
}

#[test]
fn test_lonely_sentinel_dropped_by_next_mutation() {
    let (mut store, _clock) = restored_store(&[(LAST_MODIFIED, T0)]);

    // Removing an absent key is not a content change, so nothing is tidied
    store.remove("missing");
    assert_eq!(store.size(), 1);

    store.set("A", "1");
    store.remove("A");
    assert!(store.is_empty());
}

#[test]
fn test_rename_scenario_restamps() {
    let (mut store, clock) = restored_store(&[("A", "1"), (LAST_MODIFIED, T0)]);
    let recorder = EventRecorder::attach(&mut store);

    store.rename("A", "B");

    assert!(!store.contains("A"));
    assert_eq!(store.value("B"), "1");
    assert_eq!(store.size(), 2);
    let t1 = store.value(LAST_MODIFIED).to_string();
    assert_ne!(t1, T0);
    assert_eq!(store.last_modified(), Some(clock.now_utc()));
    assert_eq!(
        recorder.count(&CustomDataEvent::Renamed {
            old_key: "A".to_string(),
            new_key: "B".to_string(),
        }),
        1
    );
}

#[test]
fn test_rename_preserves_value_exactly() {
    let (mut store, _clock) = store_with_clock();
    let value = "  multi\nline\tvalue with ünïcödé  ";
    store.set("Old", value);

    store.rename("Old", "New");

    assert_eq!(store.value("New"), value);
    assert_store_invariants(&store);
}

#[test]
fn test_rename_of_sentinel_is_restamped() {
    let (mut store, clock) = restored_store(&[("A", "1"), (LAST_MODIFIED, T0)]);

    store.rename(LAST_MODIFIED, "Stamp");

    assert_eq!(store.value("Stamp"), T0);
    assert_eq!(store.last_modified(), Some(clock.now_utc()));
    assert_store_invariants(&store);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "source key \"missing\" is not present")]
fn test_rename_missing_source_panics_in_debug() {
    let (mut store, _clock) = store_with_clock();
    store.set("A", "1");
    store.rename("missing", "B");
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "destination key \"B\" already exists")]
fn test_rename_onto_existing_key_panics_in_debug() {
    let (mut store, _clock) = store_with_clock();
    store.set("A", "1");
    store.set("B", "2");
    store.rename("A", "B");
}

#[cfg(debug_assertions)]
#[test]
fn test_rejected_rename_leaves_store_untouched() {
    let (mut store, _clock) = store_with_clock();
    store.set("A", "1");
    store.set("B", "2");
    let before = store.clone();
    let keys_before = store.keys();
    let recorder = EventRecorder::attach(&mut store);

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        store.rename("A", "B");
    }));

    assert!(outcome.is_err());
    assert_eq!(store, before);
    assert_eq!(store.keys(), keys_before);
    assert!(recorder.is_empty());
}

#[cfg(not(debug_assertions))]
#[test]
fn test_rejected_rename_is_silent_noop_in_release() {
    let (mut store, _clock) = store_with_clock();
    store.set("A", "1");
    store.set("B", "2");
    let before = store.clone();
    let recorder = EventRecorder::attach(&mut store);

    store.rename("missing", "C");
    store.rename("A", "B");

    assert_eq!(store, before);
    assert!(recorder.is_empty());
}

#[test]
fn test_noop_set_keeps_size_and_timestamp() {
    let (mut store, clock) = store_with_clock();
    store.set("A", "1");
    let size = store.size();
    let data_size = store.data_size();
    let stamp = store.last_modified();

    clock.advance_secs(3600);
    store.set("A", "1");

    assert_eq!(store.size(), size);
    assert_eq!(store.data_size(), data_size);
    assert_eq!(store.last_modified(), stamp);
}

#[test]
fn test_caller_written_sentinel_is_overwritten() {
    let (mut store, clock) = store_with_clock();
    store.set("A", "1");

    store.set(LAST_MODIFIED, T0);

    assert_eq!(store.last_modified(), Some(clock.now_utc()));
    assert_ne!(store.value(LAST_MODIFIED), T0);
}

#[test]
fn test_sentinel_set_on_empty_store_vanishes() {
    let (mut store, _clock) = store_with_clock();
    let recorder = EventRecorder::attach(&mut store);

    store.set(LAST_MODIFIED, T0);

    // The add is announced, but the bookkeeping removes the lonely sentinel
    assert!(store.is_empty());
    assert_eq!(recorder.names(), vec!["about_to_be_added", "modified", "added"]);
}

#[test]
fn test_copy_replaces_instead_of_merging() {
    let (mut store, clock) = store_with_clock();
    store.set("A", "1");
    store.set("B", "2");

    let mut other = CustomData::with_clock(clock);
    other.set("C", "3");
    assert_ne!(store, other);

    store.copy_data_from(&other);

    assert_eq!(store, other);
    assert!(!store.contains("A"));
    assert!(!store.contains("B"));
    assert_eq!(store.value("C"), "3");
}

#[test]
fn test_copy_restamps_with_current_time() {
    let (mut store, clock) = store_with_clock();
    let (other, _other_clock) = restored_store(&[("C", "3"), (LAST_MODIFIED, T0)]);

    clock.advance_secs(10);
    store.copy_data_from(&other);

    assert_eq!(store.value("C"), "3");
    assert_eq!(store.last_modified(), Some(clock.now_utc()));
    assert_ne!(store, other);
}

#[test]
fn test_copy_from_empty_store_empties() {
    let (mut store, clock) = store_with_clock();
    store.set("A", "1");

    store.copy_data_from(&CustomData::with_clock(clock));

    assert!(store.is_empty());
}

#[test]
fn test_clear_drops_everything() {
    let (mut store, _clock) = store_with_clock();
    store.set("A", "1");
    store.set("KPXC_BROWSER_x", "secret");

    store.clear();

    assert!(store.is_empty());
    assert_eq!(store.data_size(), 0);
    assert_eq!(store.last_modified(), None);
}

#[test]
fn test_data_size_counts_utf8_bytes() {
    let (store, _clock) = restored_store(&[("Größe", "日本語"), ("A", "")]);

    // "Größe" = 7 bytes, "日本語" = 9 bytes, "A" = 1 byte
    assert_eq!(store.data_size(), 17);
    assert_ne!(store.data_size(), "Größe".chars().count() + "日本語".chars().count() + 1);
}

#[test]
fn test_data_size_includes_sentinel() {
    let (mut store, _clock) = store_with_clock();
    store.set("Größe", "日本語");

    // "_LAST_MODIFIED" (14) + "2026-10-18T09:30:00Z" (20)
    assert_eq!(store.data_size(), 16 + 14 + 20);
    assert_eq!(store.value(LAST_MODIFIED), "2026-10-18T09:30:00Z");
    assert_eq!(store.last_modified(), Some(fixture_time()));
}

#[test]
fn test_legacy_text_date_sentinel_is_readable() {
    let (store, _clock) =
        restored_store(&[("A", "1"), (LAST_MODIFIED, "Wed Jan 1 00:00:00 2020")]);
    assert_eq!(
        store.last_modified(),
        Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap())
    );
}
