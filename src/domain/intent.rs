//! Selection Intent
//!
//! A selection request as raised by one of the two input sources, before
//! reconciliation. The synchronizer resolves, debounces, and reduces
//! intents into the canonical selection.

use crate::domain::item::ItemId;
use crate::domain::scene::ObjectRef;

/// Which input surface originated a selection request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectSource {
    /// The hierarchy tree UI
    Tree,
    /// The spatial picker over the rendered scene
    Scene,
}

/// What a selection request points at
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectTarget {
    /// A part-tree item, as known to the tree UI
    Item(ItemId),
    /// A renderer-side object, as produced by a pick
    Object(ObjectRef),
    /// A pick that hit no geometry
    Miss,
}

/// A raw selection request from one source
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectIntent {
    /// Originating surface
    pub source: SelectSource,
    /// Requested target
    pub target: SelectTarget,
    /// Click timestamp in milliseconds, used for pick debouncing
    pub click_ts_ms: u64,
}

impl SelectIntent {
    /// Tree-originated selection of an item
    pub fn from_tree(id: impl Into<ItemId>, click_ts_ms: u64) -> Self {
        Self {
            source: SelectSource::Tree,
            target: SelectTarget::Item(id.into()),
            click_ts_ms,
        }
    }

    /// Scene-originated selection of a picked object
    pub fn from_pick(object: ObjectRef, click_ts_ms: u64) -> Self {
        Self {
            source: SelectSource::Scene,
            target: SelectTarget::Object(object),
            click_ts_ms,
        }
    }

    /// Scene-originated click that hit nothing
    pub fn from_miss(click_ts_ms: u64) -> Self {
        Self {
            source: SelectSource::Scene,
            target: SelectTarget::Miss,
            click_ts_ms,
        }
    }
}
