//! Part-Tree Items
//!
//! Items form a forest: each item stores its parent as an id reference,
//! never an object pointer, and traversal resolves through the flat
//! id-keyed registry. This keeps the hierarchy free of retain cycles.

use std::sync::Arc;

use ahash::AHashMap;

/// Unique identifier for a part-tree item
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ItemId(pub Arc<str>);

impl ItemId {
    /// Create a new ItemId from a string
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of node in the part hierarchy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    /// Grouping node containing parts or sub-assemblies
    Assembly,
    /// Logical part; may own one or more meshes
    Part,
    /// Leaf mesh node bound to renderer geometry
    Mesh,
}

impl ItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Assembly => "assembly",
            ItemKind::Part => "part",
            ItemKind::Mesh => "mesh",
        }
    }
}

/// A selectable node in the part hierarchy
#[derive(Clone, Debug)]
pub struct SelectableItem {
    /// Unique item identifier
    pub id: ItemId,
    /// Parent item, or `None` for a root
    pub parent_id: Option<ItemId>,
    /// Node kind
    pub kind: ItemKind,
}

impl SelectableItem {
    /// Create a root item
    pub fn root(id: impl Into<ItemId>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            kind,
        }
    }

    /// Create a child item
    pub fn child(id: impl Into<ItemId>, parent: impl Into<ItemId>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            parent_id: Some(parent.into()),
            kind,
        }
    }
}

/// Flat id-keyed arena of selectable items
///
/// Rebuilt wholesale on every successful load; the registry for one scene
/// never outlives that scene.
#[derive(Debug, Default)]
pub struct ItemRegistry {
    items: AHashMap<ItemId, SelectableItem>,
}

impl ItemRegistry {
    /// Build a registry from loader output
    ///
    /// An item whose `parent_id` names a missing item is kept but treated
    /// as a root; the loader sits outside the trust boundary and one
    /// broken edge must not poison the whole scene.
    pub fn from_items(items: impl IntoIterator<Item = SelectableItem>) -> Self {
        let mut table: AHashMap<ItemId, SelectableItem> = AHashMap::new();
        for item in items {
            if table.insert(item.id.clone(), item).is_some() {
                tracing::warn!("duplicate item id in scene, keeping last occurrence");
            }
        }

        let orphaned: Vec<ItemId> = table
            .values()
            .filter(|item| {
                item.parent_id
                    .as_ref()
                    .is_some_and(|parent| !table.contains_key(parent))
            })
            .map(|item| item.id.clone())
            .collect();
        for id in orphaned {
            tracing::warn!(item = %id, "parent not in registry, treating as root");
            if let Some(item) = table.get_mut(&id) {
                item.parent_id = None;
            }
        }

        Self { items: table }
    }

    /// Look up an item by id
    pub fn get(&self, id: &ItemId) -> Option<&SelectableItem> {
        self.items.get(id)
    }

    /// Check whether an id is registered
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Collect the ancestor chain of an item, nearest parent first
    ///
    /// The item itself is not included. The walk is bounded by the
    /// registry size, so a malformed parent chain cannot loop forever.
    pub fn ancestors(&self, id: &ItemId) -> Vec<ItemId> {
        let mut chain = Vec::new();
        let mut cursor = self.items.get(id).and_then(|item| item.parent_id.clone());
        while let Some(parent) = cursor {
            if chain.len() >= self.items.len() || chain.contains(&parent) {
                tracing::warn!(item = %id, "parent chain does not terminate, truncating");
                break;
            }
            cursor = self
                .items
                .get(&parent)
                .and_then(|item| item.parent_id.clone());
            chain.push(parent);
        }
        chain
    }

    /// Number of registered items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> ItemRegistry {
        ItemRegistry::from_items([
            SelectableItem::root("asm", ItemKind::Assembly),
            SelectableItem::child("part", "asm", ItemKind::Part),
            SelectableItem::child("mesh", "part", ItemKind::Mesh),
        ])
    }

    #[test]
    fn test_registry_lookup() {
        let registry = sample_registry();
        assert_eq!(registry.len(), 3);
        assert!(registry.contains(&"part".into()));
        assert!(!registry.contains(&"missing".into()));
        assert_eq!(
            registry.get(&"mesh".into()).map(|item| item.kind),
            Some(ItemKind::Mesh)
        );
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let registry = sample_registry();
        let chain = registry.ancestors(&"mesh".into());
        assert_eq!(chain, vec![ItemId::from("part"), ItemId::from("asm")]);
    }

    #[test]
    fn test_ancestors_of_root_is_empty() {
        let registry = sample_registry();
        assert!(registry.ancestors(&"asm".into()).is_empty());
    }

    #[test]
    fn test_missing_parent_becomes_root() {
        let registry = ItemRegistry::from_items([SelectableItem::child(
            "lone",
            "ghost",
            ItemKind::Part,
        )]);
        assert!(registry.contains(&"lone".into()));
        assert!(registry.ancestors(&"lone".into()).is_empty());
    }

    #[test]
    fn test_parent_cycle_truncated() {
        // a -> b -> a: malformed input, the walk must still terminate
        let registry = ItemRegistry::from_items([
            SelectableItem::child("a", "b", ItemKind::Part),
            SelectableItem::child("b", "a", ItemKind::Part),
        ]);
        let chain = registry.ancestors(&"a".into());
        assert!(chain.len() <= 2);
    }
}
