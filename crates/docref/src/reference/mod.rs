//! Lazily resolved, identity-stable references to document entities
//!
//! An [`ElementReference`] pairs a [`ReferenceId`] with a non-owning cache
//! of the value it last resolved to. Resolution follows a small state
//! machine:
//!
//! ```text
//!   Unbound ──bind──▶ Unresolved ──lookup──▶ Resolved
//!      ▲                  ▲    └──────────▶ Failed
//!      │                  │
//!      └── no document    └── document switched / invalidate()
//! ```
//!
//! Both `Resolved` and `Failed` are sticky for as long as the reference
//! stays bound to the same document, so a solve pass can ask repeatedly
//! without touching the document more than once.

mod cast;
mod display;
mod kind;

pub use cast::{CastSource, CastTarget};
pub use display::{CategorySummary, DisplayProxy};
pub use kind::{CategoryKind, ElementKind, EntityKind, GraphicsStyleKind};

use std::fmt;
use std::sync::{Arc, Weak};

use tracing::{debug, trace, warn};

use crate::context::{ResolveOptions, SolveContext};
use crate::document::{ActiveDocumentProvider, Document, DocumentRegistry};
use crate::error::{ResolveError, Result};
use crate::id::{DocumentToken, EntityId, ReferenceId, UniqueId};

/// A reference to a category.
pub type CategoryReference = ElementReference<CategoryKind>;

/// A reference to a graphics style.
pub type GraphicsStyleReference = ElementReference<GraphicsStyleKind>;

/// A reference to any other element.
pub type GenericElementReference = ElementReference<ElementKind>;

/// Where a reference stands in its resolution lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionState {
    /// No document known
    Unbound,
    /// Bound to a document, no lookup attempted since binding
    Unresolved,
    /// Lookup succeeded; a value is cached
    Resolved,
    /// Lookup attempted and found nothing
    Failed,
}

impl ResolutionState {
    /// Check whether a value is available.
    pub fn is_available(self) -> bool {
        self == ResolutionState::Resolved
    }
}

/// A lazily resolved reference to an entity of kind `K`.
///
/// Holds no ownership over the document or the entity: the cached value is
/// a `Weak`, and the bound document is remembered by token only.
///
/// # Example
///
/// ```
/// use docref::{BuiltInCategory, CategoryReference, MemoryDocument, ReferenceId, ResolutionState};
///
/// let mut doc = MemoryDocument::new("Project1");
/// doc.add_builtin(BuiltInCategory::Walls);
///
/// let walls_id = ReferenceId::from_entity_id(BuiltInCategory::Walls.id());
/// let mut walls = CategoryReference::from_id(walls_id);
/// assert_eq!(walls.state(), ResolutionState::Unbound);
///
/// assert_eq!(walls.ensure_resolved(Some(&doc)).unwrap(), ResolutionState::Resolved);
/// assert_eq!(walls.value().map(|c| c.name.clone()), Some("Walls".to_string()));
/// ```
pub struct ElementReference<K: EntityKind> {
    id: ReferenceId,

    /// The document the reference last bound to
    bound: Option<DocumentToken>,

    /// Cached value; only meaningful while `state` is `Resolved`
    resolved: Option<Weak<K::Native>>,

    state: ResolutionState,
}

impl<K: EntityKind> ElementReference<K> {
    /// Create an empty (invalid) reference.
    pub fn new() -> Self {
        Self::from_id(ReferenceId::empty())
    }

    /// Create an unbound reference from a bare id.
    pub fn from_id(id: ReferenceId) -> Self {
        Self {
            id: K::canonical_id(id),
            bound: None,
            resolved: None,
            state: ResolutionState::Unbound,
        }
    }

    /// Create a reference already resolved to a known value.
    pub fn from_value(value: &Arc<K::Native>) -> Self {
        let identity = K::identity(value);
        Self {
            id: K::canonical_id(identity.reference_id()),
            bound: Some(identity.document),
            resolved: Some(Arc::downgrade(value)),
            state: ResolutionState::Resolved,
        }
    }

    /// Create a reference bound to `document` that has not looked anything up yet.
    pub(crate) fn bound_to(id: ReferenceId, document: DocumentToken) -> Self {
        Self {
            id: K::canonical_id(id),
            bound: Some(document),
            resolved: None,
            state: ResolutionState::Unresolved,
        }
    }

    /// The identity of this reference.
    pub fn id(&self) -> &ReferenceId {
        &self.id
    }

    /// Current resolution state.
    pub fn state(&self) -> ResolutionState {
        self.state
    }

    /// The document this reference is bound to.
    pub fn bound_document(&self) -> Option<DocumentToken> {
        self.bound
    }

    /// True when the id names something, whether or not it resolves.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
    }

    /// The cached value. Never performs a lookup.
    pub fn value(&self) -> Option<Arc<K::Native>> {
        if self.state != ResolutionState::Resolved {
            return None;
        }
        self.resolved.as_ref().and_then(Weak::upgrade)
    }

    /// Check whether a live value is cached.
    pub fn is_resolved(&self) -> bool {
        self.value().is_some()
    }

    /// Forget the cached value but keep the binding, as after an undo.
    ///
    /// The next resolution performs a fresh lookup.
    pub fn invalidate(&mut self) {
        self.resolved = None;
        if self.bound.is_some() {
            self.state = ResolutionState::Unresolved;
        }
    }

    /// Resolve against `document` using default options.
    ///
    /// `None` means no document is active; the reference becomes unbound.
    pub fn ensure_resolved(&mut self, document: Option<&dyn Document>) -> Result<ResolutionState> {
        self.ensure_resolved_with(document, &ResolveOptions::default())
    }

    /// Resolve against the active document of a solve pass.
    pub fn resolve(&mut self, ctx: &SolveContext) -> Result<ResolutionState> {
        self.ensure_resolved_with(ctx.active_document(), &ctx.options)
    }

    /// Resolve against the document that owns this reference.
    ///
    /// Document-agnostic ids (such as built-in categories parsed from a
    /// name) resolve against the registry's active document instead.
    pub fn load(&mut self, registry: &DocumentRegistry) -> Result<ResolutionState> {
        let document = match self.id.document() {
            Some(token) => registry.get(token),
            None => registry.current(),
        };
        self.ensure_resolved(document.as_deref())
    }

    /// Resolve against `document`.
    ///
    /// Not finding the entity is not an error: the state becomes
    /// [`ResolutionState::Failed`]. Errors are reserved for malformed ids,
    /// failures of the document itself, and documents that hand out values
    /// they do not keep alive. In the last case the reference stays
    /// [`ResolutionState::Unresolved`].
    pub fn ensure_resolved_with(
        &mut self,
        document: Option<&dyn Document>,
        options: &ResolveOptions,
    ) -> Result<ResolutionState> {
        let Some(document) = document else {
            if let Some(previous) = self.bound.take() {
                debug!(
                    kind = K::KIND.name(),
                    document = %previous,
                    "no active document, unbinding"
                );
            }
            self.resolved = None;
            self.state = ResolutionState::Unbound;
            return Ok(self.state);
        };

        let token = document.token();
        if self.bound != Some(token) {
            if let Some(previous) = self.bound {
                debug!(kind = K::KIND.name(), from = %previous, to = %token, "document switched");
            }
            self.bound = Some(token);
            self.resolved = None;
            self.state = ResolutionState::Unresolved;
        }

        match self.state {
            ResolutionState::Resolved if self.is_resolved() => {
                trace!(kind = K::KIND.name(), id = %self.id, "cache hit");
                return Ok(self.state);
            }
            ResolutionState::Resolved => {
                debug!(kind = K::KIND.name(), id = %self.id, "cached value dropped by document");
                self.resolved = None;
            }
            ResolutionState::Failed => return Ok(self.state),
            ResolutionState::Unbound | ResolutionState::Unresolved => {}
        }

        if !self.is_valid() {
            self.state = ResolutionState::Failed;
            return Ok(self.state);
        }

        match lookup::<K>(&self.id, document, options)? {
            Some((value, _)) if Arc::strong_count(&value) == 1 => {
                warn!(
                    kind = K::KIND.name(),
                    id = %self.id,
                    document = %token,
                    "document did not retain resolved value"
                );
                self.resolved = None;
                self.state = ResolutionState::Unresolved;
                return Err(ResolveError::DetachedValue {
                    kind: K::KIND.name(),
                    id: self.id.to_string(),
                });
            }
            Some((value, fresh)) => {
                if options.heal_entity_ids && self.id.entity_id() != Some(fresh) {
                    debug!(
                        kind = K::KIND.name(),
                        from = %self.id,
                        to = %fresh,
                        "healing entity id"
                    );
                    let mut id = self.id.clone().with_entity_id(fresh);
                    if id.document().is_some() {
                        id = id.with_document(token);
                    }
                    self.id = id;
                }
                self.resolved = Some(Arc::downgrade(&value));
                self.state = ResolutionState::Resolved;
            }
            None => {
                debug!(kind = K::KIND.name(), id = %self.id, document = %token, "entity not found");
                self.resolved = None;
                self.state = ResolutionState::Failed;
            }
        }
        Ok(self.state)
    }
}

/// Look `id` up in `document` as an entity of kind `K`.
///
/// Returns the value and its current numeric id. A unique id, when present,
/// is authoritative: a numeric id is only trusted when the entity it finds
/// still carries the same unique id.
pub fn lookup<K: EntityKind>(
    id: &ReferenceId,
    document: &dyn Document,
    options: &ResolveOptions,
) -> Result<Option<(Arc<K::Native>, EntityId)>> {
    if let Some(unique) = id.unique_id() {
        if !unique.is_well_formed() {
            warn!(kind = K::KIND.name(), unique_id = %unique, "malformed unique id");
            return Err(ResolveError::MalformedUniqueId {
                kind: K::KIND.name(),
                unique_id: unique.to_string(),
            });
        }
    }

    match (id.unique_id(), id.entity_id()) {
        (Some(unique), Some(entity)) if !options.prefer_unique_id => {
            if let Some(value) = by_id::<K>(document, entity)? {
                if K::identity(&value).unique_id == *unique {
                    return Ok(Some((value, entity)));
                }
            }
            by_unique_id::<K>(document, unique)
        }
        (Some(unique), _) => by_unique_id::<K>(document, unique),
        (None, Some(entity)) => Ok(by_id::<K>(document, entity)?.map(|value| (value, entity))),
        (None, None) => Ok(None),
    }
}

fn by_id<K: EntityKind>(document: &dyn Document, id: EntityId) -> Result<Option<Arc<K::Native>>> {
    Ok(document.entity_by_id(id)?.as_ref().and_then(K::from_native))
}

fn by_unique_id<K: EntityKind>(
    document: &dyn Document,
    unique: &UniqueId,
) -> Result<Option<(Arc<K::Native>, EntityId)>> {
    Ok(document
        .entity_by_unique_id(unique)?
        .and_then(|(native, id)| K::from_native(&native).map(|value| (value, id))))
}

// ═══════════════════════════════════════════════════════════════════════
// Trait Implementations
// ═══════════════════════════════════════════════════════════════════════

impl<K: EntityKind> Default for ElementReference<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityKind> Clone for ElementReference<K> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            bound: self.bound,
            resolved: self.resolved.clone(),
            state: self.state,
        }
    }
}

impl<K: EntityKind> PartialEq for ElementReference<K> {
    /// References compare by identity only, never by resolution state.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K: EntityKind> fmt::Debug for ElementReference<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementReference")
            .field("kind", &K::KIND)
            .field("id", &self.id)
            .field("bound", &self.bound)
            .field("state", &self.state)
            .finish()
    }
}

impl<K: EntityKind> fmt::Display for ElementReference<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display::display_name(self))
    }
}

impl<K: EntityKind> From<ReferenceId> for ElementReference<K> {
    fn from(id: ReferenceId) -> Self {
        Self::from_id(id)
    }
}
