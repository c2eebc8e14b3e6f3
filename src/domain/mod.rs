//! Domain - Plain Data Types
//!
//! Part-tree items, scene/resource descriptors, selection intents, and
//! core configuration. No behavior beyond construction and lookup lives
//! here; coordination logic belongs to the `eventing`, `state`, and
//! `services` layers.

pub mod config;
pub mod intent;
pub mod item;
pub mod scene;

pub use config::CoreConfig;
pub use intent::{SelectIntent, SelectSource, SelectTarget};
pub use item::{ItemId, ItemKind, ItemRegistry, SelectableItem};
pub use scene::{LoadedModel, ModelFormat, ModelResource, ObjectRef, SceneGraph, ScreenPoint};
