/*
    events.rs - Change notifications emitted by the custom data store

    Events come in pairs around every mutation:
    - AboutToBeAdded(key)          -> Added(key)
    - AboutToBeRemoved(key)        -> Removed(key)
    - AboutToRename(old, new)      -> Renamed(old, new)
    - AboutToBeReset               -> Reset
    plus one coalesced Modified per effective content change.

    "About to" events fire before the map changes, terminal events after.
    Delivery is synchronous, in registration order.
*/

use crate::metrics::{record_counter, EVENTS_EMITTED};
use std::fmt;

/// Notification delivered to listeners
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CustomDataEvent {
    AboutToBeAdded(String),
    Added(String),
    AboutToBeRemoved(String),
    Removed(String),
    AboutToRename { old_key: String, new_key: String },
    Renamed { old_key: String, new_key: String },
    AboutToBeReset,
    Reset,
    Modified,
}

impl CustomDataEvent {
    /// Stable event name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            CustomDataEvent::AboutToBeAdded(_) => "about_to_be_added",
            CustomDataEvent::Added(_) => "added",
            CustomDataEvent::AboutToBeRemoved(_) => "about_to_be_removed",
            CustomDataEvent::Removed(_) => "removed",
            CustomDataEvent::AboutToRename { .. } => "about_to_rename",
            CustomDataEvent::Renamed { .. } => "renamed",
            CustomDataEvent::AboutToBeReset => "about_to_be_reset",
            CustomDataEvent::Reset => "reset",
            CustomDataEvent::Modified => "modified",
        }
    }

    /// True for events delivered before the map changes
    pub fn is_pre_change(&self) -> bool {
        matches!(
            self,
            CustomDataEvent::AboutToBeAdded(_)
                | CustomDataEvent::AboutToBeRemoved(_)
                | CustomDataEvent::AboutToRename { .. }
                | CustomDataEvent::AboutToBeReset
        )
    }

    /// The key an add/remove event refers to; the old key for renames
    pub fn key(&self) -> Option<&str> {
        match self {
            CustomDataEvent::AboutToBeAdded(key)
            | CustomDataEvent::Added(key)
            | CustomDataEvent::AboutToBeRemoved(key)
            | CustomDataEvent::Removed(key) => Some(key),
            CustomDataEvent::AboutToRename { old_key, .. }
            | CustomDataEvent::Renamed { old_key, .. } => Some(old_key),
            _ => None,
        }
    }
}

impl fmt::Display for CustomDataEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomDataEvent::AboutToRename { old_key, new_key }
            | CustomDataEvent::Renamed { old_key, new_key } => {
                write!(f, "{}({} -> {})", self.name(), old_key, new_key)
            }
            other => match other.key() {
                Some(key) => write!(f, "{}({})", other.name(), key),
                None => f.write_str(other.name()),
            },
        }
    }
}

/// Receiver of store notifications.
///
/// Implemented for any `FnMut(&CustomDataEvent)`, so closures can be
/// registered directly.
pub trait CustomDataListener {
    fn on_event(&mut self, event: &CustomDataEvent);
}

impl<F> CustomDataListener for F
where
    F: FnMut(&CustomDataEvent),
{
    fn on_event(&mut self, event: &CustomDataEvent) {
        self(event)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Registered listeners in subscription order
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(ListenerId, Box<dyn CustomDataListener>)>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(&mut self, listener: Box<dyn CustomDataListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn emit(&mut self, event: &CustomDataEvent) {
        tracing::trace!(event = %event, listeners = self.listeners.len(), "emitting custom data event");
        record_counter(EVENTS_EMITTED, 1);
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_event_names_and_phase() {
        let pre = CustomDataEvent::AboutToBeAdded("A".to_string());
        let post = CustomDataEvent::Added("A".to_string());
        assert_eq!(pre.name(), "about_to_be_added");
        assert!(pre.is_pre_change());
        assert!(!post.is_pre_change());
        assert!(!CustomDataEvent::Modified.is_pre_change());
        assert!(CustomDataEvent::AboutToBeReset.is_pre_change());
    }

    #[test]
    fn test_event_key() {
        let rename = CustomDataEvent::Renamed {
            old_key: "A".to_string(),
            new_key: "B".to_string(),
        };
        assert_eq!(rename.key(), Some("A"));
        assert_eq!(CustomDataEvent::Removed("X".to_string()).key(), Some("X"));
        assert_eq!(CustomDataEvent::Reset.key(), None);
    }

    #[test]
    fn test_event_display() {
        let rename = CustomDataEvent::AboutToRename {
            old_key: "A".to_string(),
            new_key: "B".to_string(),
        };
        assert_eq!(rename.to_string(), "about_to_rename(A -> B)");
        assert_eq!(CustomDataEvent::Added("T".to_string()).to_string(), "added(T)");
        assert_eq!(CustomDataEvent::Modified.to_string(), "modified");
    }

    #[test]
    fn test_registry_delivers_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::new();

        let first = Rc::clone(&log);
        registry.subscribe(Box::new(move |e: &CustomDataEvent| {
            first.borrow_mut().push(format!("first:{}", e.name()))
        }));
        let second = Rc::clone(&log);
        registry.subscribe(Box::new(move |e: &CustomDataEvent| {
            second.borrow_mut().push(format!("second:{}", e.name()))
        }));

        registry.emit(&CustomDataEvent::Reset);

        assert_eq!(*log.borrow(), vec!["first:reset", "second:reset"]);
    }

    #[test]
    fn test_registry_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut registry = ListenerRegistry::new();

        let counter = Rc::clone(&count);
        let id = registry.subscribe(Box::new(move |_: &CustomDataEvent| {
            *counter.borrow_mut() += 1
        }));
        assert_eq!(registry.len(), 1);

        registry.emit(&CustomDataEvent::Modified);
        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.emit(&CustomDataEvent::Modified);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_listener_ids_are_unique() {
        let mut registry = ListenerRegistry::new();
        let a = registry.subscribe(Box::new(|_: &CustomDataEvent| {}));
        let b = registry.subscribe(Box::new(|_: &CustomDataEvent| {}));
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }
}
