//! Services - Coordination Services
//!
//! The load coordinator and selection synchronizer, the capability traits
//! they consume, and the hub that wires everything together.

pub mod capabilities;
pub mod hub;
pub mod load_coordinator;
pub mod selection_sync;

pub use capabilities::{HighlightMode, ModelLoader, Renderer, ScenePicker};
pub use hub::ViewerHub;
pub use load_coordinator::{LoadCoordinator, LoadDiagnostics};
pub use selection_sync::{SelectionDiagnostics, SelectionSynchronizer};
