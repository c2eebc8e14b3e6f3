//! AppEvent - Coordination Event Enum
//!
//! All events carried by the bus, with their payloads. `EventKind` is the
//! fieldless discriminant used as the subscription key.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::intent::SelectIntent;
use crate::domain::item::ItemId;
use crate::domain::scene::{ModelResource, SceneGraph};
use crate::state::viewer_state::StateChange;

/// Coordination events
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A load began; a previously running load (if any) was superseded
    LoadStarted {
        resource: ModelResource,
    },

    /// A load finished and its scene was applied to the store
    LoadCompleted {
        resource: ModelResource,
        scene: Arc<SceneGraph>,
    },

    /// A load failed; the previously applied model remains in place
    LoadFailed {
        resource: ModelResource,
        error: Arc<str>,
    },

    /// Raw selection intent from the tree UI or the scene picker
    SelectRequested {
        intent: SelectIntent,
    },

    /// The canonical selection changed
    SelectionChanged {
        selected_ids: HashSet<ItemId>,
        focused_id: Option<ItemId>,
        /// Ancestors expanded so the selection is visible in the tree
        expanded_ids: HashSet<ItemId>,
    },

    /// The store merged a patch
    StateChanged(StateChange),
}

/// Event discriminant, used as the subscription key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    LoadStarted,
    LoadCompleted,
    LoadFailed,
    SelectRequested,
    SelectionChanged,
    StateChanged,
}

impl AppEvent {
    /// The discriminant this payload dispatches under
    pub fn kind(&self) -> EventKind {
        match self {
            AppEvent::LoadStarted { .. } => EventKind::LoadStarted,
            AppEvent::LoadCompleted { .. } => EventKind::LoadCompleted,
            AppEvent::LoadFailed { .. } => EventKind::LoadFailed,
            AppEvent::SelectRequested { .. } => EventKind::SelectRequested,
            AppEvent::SelectionChanged { .. } => EventKind::SelectionChanged,
            AppEvent::StateChanged(_) => EventKind::StateChanged,
        }
    }
}

/// A published event: payload plus bus-assigned envelope
///
/// Immutable once published; handlers receive a shared reference.
#[derive(Debug, Clone)]
pub struct Event {
    /// Monotonic publish sequence number, per bus
    pub seq: u64,
    /// Publish timestamp
    pub at: DateTime<Utc>,
    /// Typed payload
    pub payload: AppEvent,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let event = AppEvent::LoadStarted {
            resource: ModelResource::new("duck.glb"),
        };
        assert_eq!(event.kind(), EventKind::LoadStarted);

        let event = AppEvent::SelectionChanged {
            selected_ids: HashSet::new(),
            focused_id: None,
            expanded_ids: HashSet::new(),
        };
        assert_eq!(event.kind(), EventKind::SelectionChanged);
    }
}
