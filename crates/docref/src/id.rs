//! Identifiers that address an entity inside a document
//!
//! A [`ReferenceId`] combines three pieces:
//!
//! - a [`DocumentToken`] naming the live document instance,
//! - an [`EntityId`], fast but transient (undo and regeneration may renumber it),
//! - a [`UniqueId`], persistent across save, reload and undo.
//!
//! When both sides carry a unique id, it alone decides identity. Otherwise
//! identity falls back to the `(document, entity id)` pair.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one live document instance for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentToken(Uuid);

impl DocumentToken {
    /// Generate a fresh, random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing uuid.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying uuid.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DocumentToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric id of an entity, valid only while its document is loaded and unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// The "no entity" sentinel.
    pub const INVALID: EntityId = EntityId(-1);

    /// Wrap a raw integer value.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw integer value.
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Check whether this is anything other than [`EntityId::INVALID`].
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i32> for EntityId {
    fn from(value: i32) -> Self {
        Self(value as i64)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Document-persistent identifier of an entity.
///
/// Any string deserializes; well-formedness is only checked when the id is
/// used for a lookup, because persisted data may be arbitrary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqueId(String);

impl UniqueId {
    /// Wrap a unique id string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The unique id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A unique id is well formed when it is non-empty printable ASCII
    /// without whitespace.
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_graphic())
    }
}

impl From<&str> for UniqueId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UniqueId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity half of a reference: which document, which entity.
///
/// Persisted by the host as three plain optional fields.
///
/// # Example
///
/// ```
/// use docref::{DocumentToken, EntityId, ReferenceId};
///
/// let doc = DocumentToken::generate();
/// let a = ReferenceId::new(doc, EntityId::new(5)).with_unique_id("U1");
/// let b = ReferenceId::new(doc, EntityId::new(9)).with_unique_id("U1");
///
/// // The unique id is authoritative
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceId {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    document: Option<DocumentToken>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    entity_id: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    unique_id: Option<UniqueId>,
}

impl ReferenceId {
    /// The empty id. References carrying it are not valid.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An id scoped to a document.
    pub fn new(document: DocumentToken, entity_id: EntityId) -> Self {
        Self::from_entity_id(entity_id).with_document(document)
    }

    /// An id not tied to any document, such as a built-in category id.
    pub fn from_entity_id(entity_id: EntityId) -> Self {
        Self {
            document: None,
            entity_id: Some(entity_id).filter(|id| id.is_valid()),
            unique_id: None,
        }
    }

    /// An id known only by its unique id.
    pub fn from_unique_id(unique_id: impl Into<UniqueId>) -> Self {
        Self::empty().with_unique_id(unique_id)
    }

    /// Replace the document token (builder pattern).
    pub fn with_document(mut self, document: DocumentToken) -> Self {
        self.document = Some(document);
        self
    }

    /// Replace the unique id (builder pattern).
    pub fn with_unique_id(mut self, unique_id: impl Into<UniqueId>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    /// Replace the entity id (builder pattern).
    pub fn with_entity_id(mut self, entity_id: EntityId) -> Self {
        self.entity_id = Some(entity_id).filter(|id| id.is_valid());
        self
    }

    /// The owning document, if this id is document-scoped.
    pub fn document(&self) -> Option<DocumentToken> {
        self.document
    }

    /// The cached entity id. [`EntityId::INVALID`] reads as absent.
    pub fn entity_id(&self) -> Option<EntityId> {
        self.entity_id.filter(|id| id.is_valid())
    }

    /// The persistent unique id.
    pub fn unique_id(&self) -> Option<&UniqueId> {
        self.unique_id.as_ref()
    }

    /// True when the id names nothing at all.
    pub fn is_empty(&self) -> bool {
        self.entity_id().is_none() && self.unique_id.is_none()
    }
}

impl PartialEq for ReferenceId {
    fn eq(&self, other: &Self) -> bool {
        match (&self.unique_id, &other.unique_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.document == other.document && self.entity_id() == other.entity_id(),
        }
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.entity_id(), &self.unique_id) {
            (Some(id), _) => write!(f, "{id}"),
            (None, Some(unique)) => write!(f, "{unique}"),
            (None, None) => write!(f, "<empty>"),
        }
    }
}
