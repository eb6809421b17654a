//! Fixtures for building stores and capturing their events

use crate::core_store::clock::ManualClock;
use crate::core_store::events::{CustomDataEvent, CustomDataListener};
use crate::core_store::CustomData;
use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Fixed instant every fixture clock starts at: 2026-10-18T09:30:00Z
pub fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
}

/// Manual clock pinned to `fixture_time()`
pub fn fixture_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(fixture_time()))
}

/// Empty store on a fresh fixture clock, plus the clock to drive it
pub fn store_with_clock() -> (CustomData, Arc<ManualClock>) {
    let clock = fixture_clock();
    (CustomData::with_clock(clock.clone()), clock)
}

/// Store restored from raw entries on a fresh fixture clock
pub fn restored_store(entries: &[(&str, &str)]) -> (CustomData, Arc<ManualClock>) {
    let clock = fixture_clock();
    let store = CustomData::from_entries(clock.clone(), entries.iter().copied());
    (store, clock)
}

/// Shared log of delivered events
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<CustomDataEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a new recorder to `store`
    pub fn attach(store: &mut CustomData) -> Self {
        let recorder = Self::new();
        store.subscribe(recorder.clone());
        recorder
    }

    pub fn events(&self) -> Vec<CustomDataEvent> {
        self.events.borrow().clone()
    }

    /// Event names in delivery order
    pub fn names(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(CustomDataEvent::name).collect()
    }

    pub fn count(&self, event: &CustomDataEvent) -> usize {
        self.events.borrow().iter().filter(|e| *e == event).count()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl CustomDataListener for EventRecorder {
    fn on_event(&mut self, event: &CustomDataEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
