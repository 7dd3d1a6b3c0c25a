//! In-memory document

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;

use super::Document;
use crate::id::{DocumentToken, EntityId, UniqueId};
use crate::native::{BuiltInCategory, Category, CategoryType, Identity, Native};

/// A [`Document`] held entirely in memory.
///
/// Useful for tests and for hosts that mirror a document into the graph.
/// Every `entity_by_*` call bumps a lookup counter so callers can check
/// how often a reference actually went to the document.
///
/// # Example
///
/// ```
/// use docref::{BuiltInCategory, Document, MemoryDocument};
///
/// let mut doc = MemoryDocument::new("Project1");
/// let walls = doc.add_builtin(BuiltInCategory::Walls);
///
/// assert!(doc.is_category_id(walls.identity.id));
/// assert_eq!(doc.lookup_count(), 0);
/// ```
#[derive(Debug)]
pub struct MemoryDocument {
    token: DocumentToken,
    title: String,

    /// Entities in insertion order
    entities: IndexMap<EntityId, Native>,

    /// Unique id index into `entities`
    unique_ids: HashMap<UniqueId, EntityId>,

    lookups: AtomicUsize,
}

impl MemoryDocument {
    /// Create an empty document with a fresh token.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_token(DocumentToken::generate(), title)
    }

    /// Create an empty document reusing a known token, as when reopening.
    pub fn with_token(token: DocumentToken, title: impl Into<String>) -> Self {
        Self {
            token,
            title: title.into(),
            entities: IndexMap::new(),
            unique_ids: HashMap::new(),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Document title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// An identity inside this document.
    pub fn identity(&self, id: impl Into<EntityId>, unique_id: impl Into<UniqueId>) -> Identity {
        Identity::new(self.token, id.into(), unique_id)
    }

    /// Insert (or replace) an entity, returning any previous entity under its id.
    pub fn insert(&mut self, native: impl Into<Native>) -> Option<Native> {
        let native = native.into();
        let identity = native.identity().clone();
        self.unique_ids.insert(identity.unique_id, identity.id);
        self.entities.insert(identity.id, native)
    }

    /// Insert a category and hand back the shared value.
    pub fn add_category(&mut self, category: Category) -> Arc<Category> {
        let category = Arc::new(category);
        self.insert(category.clone());
        category
    }

    /// Insert the document's copy of a built-in category.
    pub fn add_builtin(&mut self, builtin: BuiltInCategory) -> Arc<Category> {
        let category_type = if builtin.name().ends_with("Tags") {
            CategoryType::Annotation
        } else {
            CategoryType::Model
        };
        let mut category = Category::new(
            self.identity(builtin.id(), format!("{}-{}", self.token, builtin.name())),
            builtin.label(),
        )
        .with_type(category_type);
        category.is_tag = builtin.name().ends_with("Tags");
        self.add_category(category)
    }

    /// Remove an entity, as deleting it would.
    pub fn remove(&mut self, id: EntityId) -> Option<Native> {
        let native = self.entities.shift_remove(&id)?;
        self.unique_ids.remove(&native.identity().unique_id);
        Some(native)
    }

    /// Give an entity a new numeric id, keeping its unique id.
    ///
    /// The old value is dropped, so references still caching it notice
    /// on their next resolution.
    pub fn renumber(&mut self, from: EntityId, to: EntityId) -> bool {
        let Some(native) = self.remove(from) else {
            return false;
        };
        self.insert(native.renumbered(to));
        true
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check whether the document holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of `entity_by_*` lookups served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Reset the lookup counter.
    pub fn reset_lookup_count(&self) {
        self.lookups.store(0, Ordering::Relaxed);
    }

    fn count_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }
}

impl Document for MemoryDocument {
    fn token(&self) -> DocumentToken {
        self.token
    }

    fn entity_by_unique_id(
        &self,
        unique_id: &UniqueId,
    ) -> anyhow::Result<Option<(Native, EntityId)>> {
        self.count_lookup();
        Ok(self
            .unique_ids
            .get(unique_id)
            .and_then(|id| self.entities.get(id).map(|native| (native.clone(), *id))))
    }

    fn entity_by_id(&self, id: EntityId) -> anyhow::Result<Option<Native>> {
        self.count_lookup();
        Ok(self.entities.get(&id).cloned())
    }

    fn is_category_id(&self, id: EntityId) -> bool {
        matches!(self.entities.get(&id), Some(Native::Category(_)))
    }

    fn categories(&self) -> anyhow::Result<Vec<Arc<Category>>> {
        Ok(self
            .entities
            .values()
            .filter_map(|native| match native {
                Native::Category(c) => Some(c.clone()),
                _ => None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::Element;

    #[test]
    fn test_lookups_are_counted() {
        let mut doc = MemoryDocument::new("Doc");
        let walls = doc.add_builtin(BuiltInCategory::Walls);

        assert!(doc.entity_by_id(walls.identity.id).unwrap().is_some());
        assert!(doc
            .entity_by_unique_id(&walls.identity.unique_id)
            .unwrap()
            .is_some());
        assert_eq!(doc.lookup_count(), 2);

        doc.reset_lookup_count();
        assert_eq!(doc.lookup_count(), 0);
    }

    #[test]
    fn test_category_predicate_is_kind_based() {
        let mut doc = MemoryDocument::new("Doc");
        let walls = doc.add_builtin(BuiltInCategory::Walls);
        doc.insert(Arc::new(Element::new(doc.identity(42, "E42"), "Wall 1")));

        assert!(doc.is_category_id(walls.identity.id));
        assert!(!doc.is_category_id(EntityId::new(42)));
        assert!(!doc.is_category_id(EntityId::new(43)));
    }

    #[test]
    fn test_renumber_moves_unique_id() {
        let mut doc = MemoryDocument::new("Doc");
        doc.insert(Arc::new(Element::new(doc.identity(5, "U1"), "Beam")));

        assert!(doc.renumber(EntityId::new(5), EntityId::new(9)));
        assert!(!doc.renumber(EntityId::new(5), EntityId::new(10)));

        let (native, id) = doc
            .entity_by_unique_id(&UniqueId::new("U1"))
            .unwrap()
            .unwrap();
        assert_eq!(id, EntityId::new(9));
        assert_eq!(native.identity().id, EntityId::new(9));
        assert!(doc.entity_by_id(EntityId::new(5)).unwrap().is_none());
    }

    #[test]
    fn test_remove_drops_unique_index() {
        let mut doc = MemoryDocument::new("Doc");
        doc.insert(Arc::new(Element::new(doc.identity(5, "U1"), "Beam")));
        assert!(doc.remove(EntityId::new(5)).is_some());
        assert!(doc.is_empty());
        assert!(doc
            .entity_by_unique_id(&UniqueId::new("U1"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_builtin_tags_are_annotation_tags() {
        let mut doc = MemoryDocument::new("Doc");
        let tags = doc.add_builtin(BuiltInCategory::DoorTags);
        assert!(tags.is_tag);
        assert_eq!(tags.category_type, CategoryType::Annotation);
    }
}
