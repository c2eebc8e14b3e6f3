//! Capability Traits
//!
//! Narrow interfaces over the external collaborators: parsing, picking,
//! and highlighting. The core composes these; it never inherits from or
//! reaches into their implementations.

use async_trait::async_trait;

use crate::domain::scene::{ModelResource, ObjectRef, SceneGraph, ScreenPoint};
use crate::error::Result;

/// Asynchronous model loading (file fetch + format decode)
///
/// Implementations must yield at least once before resolving; the
/// coordinator polls its cancellation token only at suspension points,
/// so a loader that never yields cannot be superseded.
#[async_trait(?Send)]
pub trait ModelLoader {
    async fn load(&self, resource: &ModelResource) -> Result<SceneGraph>;
}

/// Spatial picking over the rendered scene
pub trait ScenePicker {
    /// Resolve a screen point to the renderer object under it, if any
    fn pick(&self, point: ScreenPoint) -> Option<ObjectRef>;
}

/// Highlight treatment for a renderer object
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightMode {
    None,
    Hover,
    Selected,
}

/// Visual feedback on renderer objects
pub trait Renderer {
    fn highlight(&self, object: &ObjectRef, mode: HighlightMode);
}
