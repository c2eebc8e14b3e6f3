//! SelectionSynchronizer - Canonical Selection Reconciliation
//!
//! Consumes selection intent from the hierarchy tree and the spatial
//! picker, reconciles it against the item registry, and re-emits a single
//! canonical `SelectionChanged` per accepted request. Owns the
//! item-to-object binding, rebuilt on every successful load and never
//! persisted past the current scene.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use ahash::AHashMap;

use crate::eventing::app_event::AppEvent;
use crate::eventing::bus::EventBus;
use crate::domain::intent::{SelectIntent, SelectSource, SelectTarget};
use crate::domain::item::{ItemId, ItemRegistry};
use crate::domain::scene::{ObjectRef, SceneGraph};
use crate::state::selection_state::SelectionState;
use crate::state::store::StateStore;
use crate::state::viewer_state::StatePatch;

/// Read-only selection counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionDiagnostics {
    /// Requests that produced a `SelectionChanged`
    pub accepted: u64,
    /// Scene picks discarded inside the debounce window
    pub debounced: u64,
    /// Requests naming an id or object unknown to the current scene
    pub unknown_target: u64,
}

/// Reconciles two independent selection sources into one canonical state
pub struct SelectionSynchronizer {
    bus: Rc<EventBus>,
    store: Rc<StateStore>,
    registry: RefCell<ItemRegistry>,
    item_to_object: RefCell<AHashMap<ItemId, ObjectRef>>,
    object_to_item: RefCell<AHashMap<ObjectRef, ItemId>>,
    /// Timestamp of the last accepted scene pick
    last_pick_ms: Cell<Option<u64>>,
    debounce_ms: u64,
    stats: Cell<SelectionDiagnostics>,
}

impl SelectionSynchronizer {
    pub fn new(bus: Rc<EventBus>, store: Rc<StateStore>, debounce_ms: u64) -> Self {
        Self {
            bus,
            store,
            registry: RefCell::new(ItemRegistry::default()),
            item_to_object: RefCell::new(AHashMap::new()),
            object_to_item: RefCell::new(AHashMap::new()),
            last_pick_ms: Cell::new(None),
            debounce_ms,
            stats: Cell::new(SelectionDiagnostics::default()),
        }
    }

    /// Rebuild the registry and the bidirectional binding for a new scene
    ///
    /// The previous scene's selection and expansion are cleared through
    /// the store; rebind is not a selection request, so no
    /// `SelectionChanged` is published (key-filtered `StateChanged`
    /// subscribers observe the reset).
    pub fn bind_scene(&self, scene: &SceneGraph) {
        *self.registry.borrow_mut() = ItemRegistry::from_items(scene.items.iter().cloned());

        let mut forward = AHashMap::new();
        let mut reverse = AHashMap::new();
        for (item_id, object) in &scene.object_map {
            if !self.registry.borrow().contains(item_id) {
                tracing::warn!(item = %item_id, object = %object, "binding references unknown item, skipping");
                continue;
            }
            forward.insert(item_id.clone(), object.clone());
            reverse.insert(object.clone(), item_id.clone());
        }
        tracing::debug!(
            items = self.registry.borrow().len(),
            bound = forward.len(),
            "scene bindings rebuilt"
        );
        *self.item_to_object.borrow_mut() = forward;
        *self.object_to_item.borrow_mut() = reverse;
        self.last_pick_ms.set(None);

        self.store.set_state(
            StatePatch::default()
                .selection(SelectionState::default())
                .expanded_ids(HashSet::new()),
        );
    }

    /// Process one selection request
    ///
    /// Accepted requests mutate the store and publish exactly one
    /// `SelectionChanged`. Debounced and unknown-target requests do
    /// neither.
    pub fn request_select(&self, intent: SelectIntent) {
        if intent.source == SelectSource::Scene && self.is_debounced(intent.click_ts_ms) {
            tracing::debug!(ts = intent.click_ts_ms, "pick inside debounce window, discarding");
            self.bump(|stats| stats.debounced += 1);
            return;
        }

        let resolved = match &intent.target {
            SelectTarget::Item(id) => {
                if !self.registry.borrow().contains(id) {
                    tracing::warn!(item = %id, "selection target not in current scene");
                    self.bump(|stats| stats.unknown_target += 1);
                    return;
                }
                Some(id.clone())
            }
            SelectTarget::Object(object) => {
                match self.object_to_item.borrow().get(object) {
                    Some(id) => Some(id.clone()),
                    None => {
                        tracing::warn!(object = %object, "picked object has no bound item");
                        self.bump(|stats| stats.unknown_target += 1);
                        return;
                    }
                }
            }
            SelectTarget::Miss => None,
        };

        // Accepted from here on.
        if intent.source == SelectSource::Scene {
            self.last_pick_ms.set(Some(intent.click_ts_ms));
        }
        self.bump(|stats| stats.accepted += 1);

        let (selection, expanded_ids) = self.reduce(resolved);

        self.store.set_state(
            StatePatch::default()
                .selection(selection.clone())
                .expanded_ids(expanded_ids.clone()),
        );
        self.bus.publish(AppEvent::SelectionChanged {
            selected_ids: selection.selected_ids().clone(),
            focused_id: selection.focused_id().cloned(),
            expanded_ids,
        });
    }

    /// Look up the renderer object bound to an item
    pub fn object_for(&self, id: &ItemId) -> Option<ObjectRef> {
        self.item_to_object.borrow().get(id).cloned()
    }

    /// Look up the item bound to a renderer object
    pub fn item_for(&self, object: &ObjectRef) -> Option<ItemId> {
        self.object_to_item.borrow().get(object).cloned()
    }

    /// Read-only selection counters
    pub fn diagnostics(&self) -> SelectionDiagnostics {
        self.stats.get()
    }

    /// Apply the toggle rule and compute ancestor expansion
    ///
    /// A re-click on the sole selected item deselects it; anything else
    /// selects exactly the resolved item and expands its ancestors. A
    /// miss clears everything.
    fn reduce(&self, resolved: Option<ItemId>) -> (SelectionState, HashSet<ItemId>) {
        match resolved {
            None => (SelectionState::default(), HashSet::new()),
            Some(id) => {
                if self.store.state().selection.is_sole_selection(&id) {
                    (SelectionState::default(), HashSet::new())
                } else {
                    let expanded = self
                        .registry
                        .borrow()
                        .ancestors(&id)
                        .into_iter()
                        .collect();
                    (SelectionState::single(id), expanded)
                }
            }
        }
    }

    fn is_debounced(&self, click_ts_ms: u64) -> bool {
        self.last_pick_ms
            .get()
            .is_some_and(|last| click_ts_ms.saturating_sub(last) < self.debounce_ms)
    }

    fn bump(&self, update: impl FnOnce(&mut SelectionDiagnostics)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}

impl std::fmt::Debug for SelectionSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionSynchronizer")
            .field("items", &self.registry.borrow().len())
            .field("bindings", &self.item_to_object.borrow().len())
            .field("stats", &self.diagnostics())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::{ItemKind, SelectableItem};
    use crate::eventing::app_event::EventKind;

    struct Fixture {
        bus: Rc<EventBus>,
        store: Rc<StateStore>,
        sync: SelectionSynchronizer,
    }

    fn fixture() -> Fixture {
        let bus = Rc::new(EventBus::new(16).expect("bus"));
        let store = Rc::new(StateStore::new(bus.clone()));
        let sync = SelectionSynchronizer::new(bus.clone(), store.clone(), 50);
        sync.bind_scene(&sample_scene());
        Fixture { bus, store, sync }
    }

    fn sample_scene() -> SceneGraph {
        SceneGraph {
            items: vec![
                SelectableItem::root("asm", ItemKind::Assembly),
                SelectableItem::child("part", "asm", ItemKind::Part),
                SelectableItem::child("duck_mesh", "part", ItemKind::Mesh),
            ],
            object_map: vec![(ItemId::from("duck_mesh"), ObjectRef::from("node:duck"))],
        }
    }

    fn count_selection_changes(bus: &Rc<EventBus>) -> Rc<Cell<u64>> {
        let count = Rc::new(Cell::new(0u64));
        let counter = count.clone();
        let _ = bus.subscribe(EventKind::SelectionChanged, move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });
        count
    }

    #[test]
    fn test_tree_select_sets_selection_and_expands_ancestors() {
        let fx = fixture();
        let changes = count_selection_changes(&fx.bus);

        fx.sync.request_select(SelectIntent::from_tree("duck_mesh", 0));

        assert_eq!(changes.get(), 1);
        let state = fx.store.state();
        assert!(state.selection.is_sole_selection(&"duck_mesh".into()));
        assert_eq!(state.selection.focused_id(), Some(&ItemId::from("duck_mesh")));
        assert!(state.expanded_ids.contains(&"part".into()));
        assert!(state.expanded_ids.contains(&"asm".into()));
    }

    #[test]
    fn test_reclick_toggles_selection_off() {
        let fx = fixture();
        let changes = count_selection_changes(&fx.bus);

        fx.sync.request_select(SelectIntent::from_tree("duck_mesh", 0));
        fx.sync.request_select(SelectIntent::from_tree("duck_mesh", 0));

        assert_eq!(changes.get(), 2);
        let state = fx.store.state();
        assert!(state.selection.is_empty());
        assert!(state.expanded_ids.is_empty());
        assert_eq!(fx.sync.diagnostics().accepted, 2);
    }

    #[test]
    fn test_pick_resolves_through_binding() {
        let fx = fixture();
        let changes = count_selection_changes(&fx.bus);

        fx.sync
            .request_select(SelectIntent::from_pick(ObjectRef::from("node:duck"), 100));

        assert_eq!(changes.get(), 1);
        assert!(
            fx.store
                .state()
                .selection
                .is_sole_selection(&"duck_mesh".into())
        );
    }

    #[test]
    fn test_duplicate_picks_within_window_are_debounced() {
        let fx = fixture();
        let changes = count_selection_changes(&fx.bus);

        fx.sync
            .request_select(SelectIntent::from_pick(ObjectRef::from("node:duck"), 1000));
        fx.sync
            .request_select(SelectIntent::from_pick(ObjectRef::from("node:duck"), 1030));

        assert_eq!(changes.get(), 1);
        let stats = fx.sync.diagnostics();
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.debounced, 1);
        // The selection is still the first pick's, untouched by the dup.
        assert!(
            fx.store
                .state()
                .selection
                .is_sole_selection(&"duck_mesh".into())
        );
    }

    #[test]
    fn test_separate_picks_outside_window_both_accepted() {
        let fx = fixture();
        let changes = count_selection_changes(&fx.bus);

        fx.sync
            .request_select(SelectIntent::from_pick(ObjectRef::from("node:duck"), 1000));
        fx.sync
            .request_select(SelectIntent::from_pick(ObjectRef::from("node:duck"), 1060));

        // Second pick toggles the selection off.
        assert_eq!(changes.get(), 2);
        assert!(fx.store.state().selection.is_empty());
    }

    #[test]
    fn test_tree_requests_are_never_debounced() {
        let fx = fixture();
        let changes = count_selection_changes(&fx.bus);

        fx.sync
            .request_select(SelectIntent::from_pick(ObjectRef::from("node:duck"), 1000));
        // A tree click right after a pick must not be absorbed.
        fx.sync.request_select(SelectIntent::from_tree("part", 1010));

        assert_eq!(changes.get(), 2);
        assert!(fx.store.state().selection.is_sole_selection(&"part".into()));
    }

    #[test]
    fn test_miss_clears_selection() {
        let fx = fixture();
        fx.sync.request_select(SelectIntent::from_tree("duck_mesh", 0));
        let changes = count_selection_changes(&fx.bus);

        fx.sync.request_select(SelectIntent::from_miss(1000));

        assert_eq!(changes.get(), 1);
        assert!(fx.store.state().selection.is_empty());
        assert!(fx.store.state().expanded_ids.is_empty());
    }

    #[test]
    fn test_unknown_item_is_noop() {
        let fx = fixture();
        let changes = count_selection_changes(&fx.bus);

        fx.sync.request_select(SelectIntent::from_tree("ghost", 0));

        assert_eq!(changes.get(), 0);
        assert_eq!(fx.sync.diagnostics().unknown_target, 1);
        assert!(fx.store.state().selection.is_empty());
    }

    #[test]
    fn test_unbound_object_is_noop() {
        let fx = fixture();
        let changes = count_selection_changes(&fx.bus);

        fx.sync
            .request_select(SelectIntent::from_pick(ObjectRef::from("node:ghost"), 0));

        assert_eq!(changes.get(), 0);
        assert_eq!(fx.sync.diagnostics().unknown_target, 1);
    }

    #[test]
    fn test_rebind_clears_selection_without_selection_event() {
        let fx = fixture();
        fx.sync.request_select(SelectIntent::from_tree("duck_mesh", 0));
        let changes = count_selection_changes(&fx.bus);

        fx.sync.bind_scene(&SceneGraph {
            items: vec![SelectableItem::root("other", ItemKind::Part)],
            object_map: Vec::new(),
        });

        assert_eq!(changes.get(), 0);
        assert!(fx.store.state().selection.is_empty());
        // Old scene's ids and bindings are gone.
        assert!(fx.sync.object_for(&"duck_mesh".into()).is_none());
        let before = fx.sync.diagnostics().unknown_target;
        fx.sync.request_select(SelectIntent::from_tree("duck_mesh", 0));
        assert_eq!(fx.sync.diagnostics().unknown_target, before + 1);
    }

    #[test]
    fn test_binding_lookups() {
        let fx = fixture();
        assert_eq!(
            fx.sync.object_for(&"duck_mesh".into()),
            Some(ObjectRef::from("node:duck"))
        );
        assert_eq!(
            fx.sync.item_for(&ObjectRef::from("node:duck")),
            Some(ItemId::from("duck_mesh"))
        );
        assert!(fx.sync.object_for(&"asm".into()).is_none());
    }
}
