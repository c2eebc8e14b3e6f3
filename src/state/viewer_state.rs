//! ViewerState - Top-Level State Shape
//!
//! The store's contents, the key set used for change filtering, and the
//! patch type merged by `StateStore::set_state`.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::item::ItemId;
use crate::domain::scene::LoadedModel;
use crate::state::selection_state::SelectionState;

/// Canonical viewer state held by the store
#[derive(Clone, Debug, Default)]
pub struct ViewerState {
    /// Currently applied model, if any
    pub model: Option<LoadedModel>,
    /// Canonical selection
    pub selection: SelectionState,
    /// Tree nodes marked expanded so the selection is visible
    pub expanded_ids: HashSet<ItemId>,
}

/// Top-level state keys, used for change notification filtering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateKey {
    Model,
    Selection,
    Expanded,
}

/// A partial update to the viewer state
///
/// Only the keys present in the patch are touched by the merge; a key set
/// in the patch is reported as changed.
#[derive(Debug, Default)]
pub struct StatePatch {
    model: Option<Option<LoadedModel>>,
    selection: Option<SelectionState>,
    expanded_ids: Option<HashSet<ItemId>>,
}

impl StatePatch {
    /// Set (or clear, with `None`) the applied model
    pub fn model(mut self, model: Option<LoadedModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Replace the selection
    pub fn selection(mut self, selection: SelectionState) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Replace the expansion set
    pub fn expanded_ids(mut self, expanded_ids: HashSet<ItemId>) -> Self {
        self.expanded_ids = Some(expanded_ids);
        self
    }

    /// Check if the patch touches nothing
    pub fn is_empty(&self) -> bool {
        self.model.is_none() && self.selection.is_none() && self.expanded_ids.is_none()
    }

    /// Merge into `state`, returning the keys that were set
    pub(crate) fn apply(self, state: &mut ViewerState) -> Vec<StateKey> {
        let mut keys = Vec::new();
        if let Some(model) = self.model {
            state.model = model;
            keys.push(StateKey::Model);
        }
        if let Some(selection) = self.selection {
            state.selection = selection;
            keys.push(StateKey::Selection);
        }
        if let Some(expanded_ids) = self.expanded_ids {
            state.expanded_ids = expanded_ids;
            keys.push(StateKey::Expanded);
        }
        keys
    }
}

/// Payload of a `StateChanged` event
///
/// Snapshots are captured at mutation time, so deferred breadth-first
/// delivery still observes the correct before/after pair.
#[derive(Clone, Debug)]
pub struct StateChange {
    /// Top-level keys the patch touched
    pub keys: Vec<StateKey>,
    /// State before the merge
    pub previous: Arc<ViewerState>,
    /// State after the merge
    pub current: Arc<ViewerState>,
}

impl StateChange {
    /// Check whether this change touches any of the given keys
    pub fn touches_any(&self, filter: &[StateKey]) -> bool {
        self.keys.iter().any(|key| filter.contains(key))
    }
}
