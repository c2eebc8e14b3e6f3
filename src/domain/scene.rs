//! Scene & Resource Descriptors
//!
//! What a load produces and how the core refers to renderer-side objects.
//! Parsing and rendering live in external collaborators; these types only
//! carry identity.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::item::{ItemId, SelectableItem};

/// Mesh file format of a loadable resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelFormat {
    Gltf,
    Obj,
    Stl,
}

impl ModelFormat {
    pub fn label(&self) -> &'static str {
        match self {
            ModelFormat::Gltf => "glTF",
            ModelFormat::Obj => "OBJ",
            ModelFormat::Stl => "STL",
        }
    }

    /// Guess the format from a resource URI extension
    pub fn from_uri(uri: &str) -> Option<Self> {
        let ext = uri.rsplit('.').next()?.to_ascii_lowercase();
        match ext.as_str() {
            "gltf" | "glb" => Some(ModelFormat::Gltf),
            "obj" => Some(ModelFormat::Obj),
            "stl" => Some(ModelFormat::Stl),
            _ => None,
        }
    }
}

/// A loadable model resource
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelResource {
    /// Resource location (URL or path)
    pub uri: Arc<str>,
    /// File format, if known up front
    pub format: Option<ModelFormat>,
}

impl ModelResource {
    /// Create a resource, guessing the format from the URI
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        let uri = uri.into();
        let format = ModelFormat::from_uri(&uri);
        Self { uri, format }
    }
}

impl std::fmt::Display for ModelResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}

/// Renderer-side object reference (e.g. a mesh node name)
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ObjectRef(pub Arc<str>);

impl ObjectRef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in screen coordinates, as handed to the picker
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Loader output: the part hierarchy plus the item-to-object mapping
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    /// All selectable items of the hierarchy
    pub items: Vec<SelectableItem>,
    /// Items that have renderer-side geometry attached
    pub object_map: Vec<(ItemId, ObjectRef)>,
}

impl SceneGraph {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// The currently applied model, held in the state store
#[derive(Clone, Debug)]
pub struct LoadedModel {
    /// Resource the model was loaded from
    pub resource: ModelResource,
    /// Scene produced by the loader
    pub scene: Arc<SceneGraph>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_uri() {
        assert_eq!(ModelFormat::from_uri("duck.glb"), Some(ModelFormat::Gltf));
        assert_eq!(
            ModelFormat::from_uri("models/scene.gltf"),
            Some(ModelFormat::Gltf)
        );
        assert_eq!(ModelFormat::from_uri("part.OBJ"), Some(ModelFormat::Obj));
        assert_eq!(ModelFormat::from_uri("bracket.stl"), Some(ModelFormat::Stl));
        assert_eq!(ModelFormat::from_uri("notes.txt"), None);
    }

    #[test]
    fn test_resource_guesses_format() {
        let resource = ModelResource::new("duck.glb");
        assert_eq!(resource.format, Some(ModelFormat::Gltf));
        assert_eq!(resource.to_string(), "duck.glb");
    }
}
