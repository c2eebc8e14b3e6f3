//! SelectionState - Canonical Selection

use std::collections::HashSet;

use crate::domain::item::ItemId;

/// The one authoritative selection, reconciled from both input sources
///
/// Invariant: `selected_ids` only ever contains ids present in the
/// current item registry. The synchronizer is the sole writer and clears
/// the selection whenever the registry is rebuilt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected_ids: HashSet<ItemId>,
    focused_id: Option<ItemId>,
}

impl SelectionState {
    /// Selection containing exactly one focused item
    pub fn single(id: ItemId) -> Self {
        Self {
            selected_ids: HashSet::from([id.clone()]),
            focused_id: Some(id),
        }
    }

    /// All selected ids
    pub fn selected_ids(&self) -> &HashSet<ItemId> {
        &self.selected_ids
    }

    /// The focused item, if any
    pub fn focused_id(&self) -> Option<&ItemId> {
        self.focused_id.as_ref()
    }

    /// Check if an item is selected
    pub fn is_selected(&self, id: &ItemId) -> bool {
        self.selected_ids.contains(id)
    }

    /// Check if `id` is the one and only selected item
    pub fn is_sole_selection(&self, id: &ItemId) -> bool {
        self.selected_ids.len() == 1 && self.selected_ids.contains(id)
    }

    /// Number of selected items
    pub fn len(&self) -> usize {
        self.selected_ids.len()
    }

    /// Check if nothing is selected
    pub fn is_empty(&self) -> bool {
        self.selected_ids.is_empty()
    }
}
