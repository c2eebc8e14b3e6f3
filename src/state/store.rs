//! StateStore - Canonical State Container
//!
//! Holds the single authoritative `ViewerState` and broadcasts diffs as
//! `StateChanged` events. The store is the only writer of its state and
//! never suspends inside `set_state`, so merges and their publishes never
//! interleave.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::Result;
use crate::eventing::app_event::{AppEvent, EventKind};
use crate::eventing::bus::{EventBus, SubscriptionHandle};
use crate::state::viewer_state::{StateChange, StateKey, StatePatch, ViewerState};

/// Canonical mutable state container
pub struct StateStore {
    bus: Rc<EventBus>,
    current: RefCell<Arc<ViewerState>>,
}

impl StateStore {
    /// Create a store publishing changes through the given bus
    pub fn new(bus: Rc<EventBus>) -> Self {
        Self {
            bus,
            current: RefCell::new(Arc::new(ViewerState::default())),
        }
    }

    /// Get an immutable snapshot of the current state
    pub fn state(&self) -> Arc<ViewerState> {
        self.current.borrow().clone()
    }

    /// Merge a patch and publish the resulting change
    ///
    /// The before/after snapshots ride in the event payload, so a
    /// re-entrant `set_state` whose event is queued for breadth-first
    /// delivery still reports the state pair of its own merge. An empty
    /// patch publishes nothing.
    pub fn set_state(&self, patch: StatePatch) {
        if patch.is_empty() {
            return;
        }
        let previous = self.state();
        let mut next = (*previous).clone();
        let keys = patch.apply(&mut next);
        let current = Arc::new(next);
        *self.current.borrow_mut() = current.clone();

        self.bus.publish(AppEvent::StateChanged(StateChange {
            keys,
            previous,
            current,
        }));
    }

    /// Subscribe a listener to state changes
    ///
    /// With a `key_filter`, the listener is only invoked when the change
    /// touches at least one of the filtered keys; unrelated changes cost
    /// the listener nothing.
    pub fn subscribe<F>(&self, key_filter: Option<Vec<StateKey>>, mut listener: F) -> SubscriptionHandle
    where
        F: FnMut(&StateChange) -> Result<()> + 'static,
    {
        self.bus.subscribe(EventKind::StateChanged, move |event| {
            let AppEvent::StateChanged(change) = &event.payload else {
                return Ok(());
            };
            if let Some(filter) = &key_filter {
                if !change.touches_any(filter) {
                    return Ok(());
                }
            }
            listener(change)
        })
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("StateStore")
            .field("model", &state.model.as_ref().map(|m| m.resource.clone()))
            .field("selection", &state.selection)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::selection_state::SelectionState;
    use std::cell::Cell;
    use std::collections::HashSet;

    fn store() -> (Rc<EventBus>, StateStore) {
        let bus = Rc::new(EventBus::new(8).expect("bus"));
        let store = StateStore::new(bus.clone());
        (bus, store)
    }

    #[test]
    fn test_snapshot_is_immutable() {
        let (_bus, store) = store();
        let before = store.state();
        store.set_state(StatePatch::default().selection(SelectionState::single("x".into())));
        assert!(before.selection.is_empty());
        assert!(store.state().selection.is_selected(&"x".into()));
    }

    #[test]
    fn test_change_event_carries_snapshots_and_keys() {
        let (_bus, store) = store();
        let seen: Rc<RefCell<Vec<StateChange>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = store.subscribe(None, move |change| {
            sink.borrow_mut().push(change.clone());
            Ok(())
        });

        store.set_state(StatePatch::default().selection(SelectionState::single("x".into())));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].keys, vec![StateKey::Selection]);
        assert!(seen[0].previous.selection.is_empty());
        assert!(seen[0].current.selection.is_selected(&"x".into()));
    }

    #[test]
    fn test_key_filter_skips_unrelated_changes() {
        let (_bus, store) = store();
        let invocations = Rc::new(Cell::new(0u64));
        let count = invocations.clone();
        let _sub = store.subscribe(Some(vec![StateKey::Model]), move |_| {
            count.set(count.get() + 1);
            Ok(())
        });

        store.set_state(StatePatch::default().selection(SelectionState::single("x".into())));
        assert_eq!(invocations.get(), 0);

        store.set_state(StatePatch::default().model(None).selection(SelectionState::default()));
        assert_eq!(invocations.get(), 1);
    }

    #[test]
    fn test_empty_patch_publishes_nothing() {
        let (_bus, store) = store();
        let invocations = Rc::new(Cell::new(0u64));
        let count = invocations.clone();
        let _sub = store.subscribe(None, move |_| {
            count.set(count.get() + 1);
            Ok(())
        });

        store.set_state(StatePatch::default());
        assert_eq!(invocations.get(), 0);
    }

    #[test]
    fn test_reentrant_set_state_reports_own_merge_pair() {
        let (_bus, store) = store();
        let store = Rc::new(store);
        let seen: Rc<RefCell<Vec<StateChange>>> = Rc::new(RefCell::new(Vec::new()));

        // First change triggers a second set_state from inside dispatch;
        // the queued second event must carry the second merge's pair.
        let chained = Cell::new(false);
        let chain_store = store.clone();
        let _chain = store.subscribe(Some(vec![StateKey::Selection]), move |_| {
            if !chained.get() {
                chained.set(true);
                chain_store.set_state(
                    StatePatch::default().expanded_ids(HashSet::from(["p".into()])),
                );
            }
            Ok(())
        });
        let sink = seen.clone();
        let _record = store.subscribe(None, move |change| {
            sink.borrow_mut().push(change.clone());
            Ok(())
        });

        store.set_state(StatePatch::default().selection(SelectionState::single("x".into())));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].keys, vec![StateKey::Selection]);
        assert_eq!(seen[1].keys, vec![StateKey::Expanded]);
        // The second change's previous already contains the first merge.
        assert!(seen[1].previous.selection.is_selected(&"x".into()));
        assert!(seen[1].current.expanded_ids.contains(&"p".into()));
    }
}
