//! The external document model, as seen from a reference
//!
//! A [`Document`] is read-only from this crate's point of view: references
//! query it, never mutate it. Failures inside the document layer surface as
//! `anyhow::Error` and propagate untouched.

mod memory;
mod registry;

pub use memory::MemoryDocument;
pub use registry::DocumentRegistry;

use std::sync::Arc;

use crate::id::{DocumentToken, EntityId, UniqueId};
use crate::native::{Category, Native};

/// A live document that entities can be looked up in.
///
/// References cache what a lookup returns only as a `Weak`. The document
/// must therefore own every value it hands out, keeping the same `Arc`
/// alive for as long as the entity exists. A lookup returning a fresh `Arc`
/// nothing else holds is rejected with
/// [`ResolveError::DetachedValue`](crate::ResolveError::DetachedValue).
pub trait Document: Send + Sync {
    /// Identity of this document instance.
    fn token(&self) -> DocumentToken;

    /// Look up an entity by its persistent id, returning its current numeric id.
    ///
    /// The returned value must be a clone of an `Arc` the document retains.
    fn entity_by_unique_id(
        &self,
        unique_id: &UniqueId,
    ) -> anyhow::Result<Option<(Native, EntityId)>>;

    /// Look up an entity by its numeric id.
    ///
    /// The returned value must be a clone of an `Arc` the document retains.
    fn entity_by_id(&self, id: EntityId) -> anyhow::Result<Option<Native>>;

    /// Whether `id` falls in the document's category id space.
    fn is_category_id(&self, id: EntityId) -> bool;

    /// Every category the document defines.
    fn categories(&self) -> anyhow::Result<Vec<Arc<Category>>>;
}

/// Supplies the document the host currently treats as active.
pub trait ActiveDocumentProvider {
    /// The active document, if any is open.
    fn current(&self) -> Option<Arc<dyn Document>>;
}

impl<D: Document + 'static> ActiveDocumentProvider for Arc<D> {
    fn current(&self) -> Option<Arc<dyn Document>> {
        Some(self.clone() as Arc<dyn Document>)
    }
}
