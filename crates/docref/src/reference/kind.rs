//! Per-kind resolution and display rules

use std::fmt;
use std::sync::Arc;

use crate::document::Document;
use crate::error::{ConversionError, ParseError};
use crate::id::{EntityId, ReferenceId};
use crate::native::{
    BuiltInCategory, Category, Element, GraphicsStyle, Identity, Native, NativeKind,
};

/// The rules that specialize an [`ElementReference`](super::ElementReference)
/// to one kind of entity.
pub trait EntityKind: 'static {
    /// The native value a reference of this kind resolves to.
    type Native: fmt::Debug + Send + Sync;

    /// Which [`Native`] variant this kind resolves to.
    const KIND: NativeKind;

    /// Narrow a native value to this kind, if it is one.
    fn from_native(native: &Native) -> Option<Arc<Self::Native>>;

    /// Widen a value of this kind back to [`Native`].
    fn to_native(value: Arc<Self::Native>) -> Native;

    /// Where a value of this kind lives.
    fn identity(value: &Self::Native) -> &Identity;

    /// Display text of a loaded value.
    fn display(value: &Self::Native) -> String;

    /// Check whether `id` denotes an entity of this kind in `document`.
    fn accepts_id(document: &dyn Document, id: EntityId) -> anyhow::Result<bool> {
        Ok(document
            .entity_by_id(id)?
            .as_ref()
            .and_then(Self::from_native)
            .is_some())
    }

    /// Accept a native value handed to `cast_from`.
    fn coerce(native: Native) -> Result<Arc<Self::Native>, ConversionError> {
        Self::from_native(&native).ok_or_else(|| ConversionError::KindMismatch {
            expected: Self::KIND.name(),
            found: native.kind().name().to_string(),
        })
    }

    /// Parse the textual form produced by [`EntityKind::format_instance`].
    fn parse_name(text: &str) -> Result<ReferenceId, ParseError> {
        let _ = text;
        Err(ParseError::NotParsable {
            kind: Self::KIND.name(),
        })
    }

    /// Whether [`EntityKind::parse_name`] can ever succeed.
    fn is_parsable() -> bool {
        false
    }

    /// Compact, parseable text for an id.
    fn format_instance(id: &ReferenceId) -> String {
        id.entity_id().unwrap_or(EntityId::INVALID).to_string()
    }

    /// Label for an id whose value is not loaded.
    fn fallback_label(id: &ReferenceId) -> Option<String> {
        let _ = id;
        None
    }

    /// The form of `id` a reference of this kind stores.
    fn canonical_id(id: ReferenceId) -> ReferenceId {
        id
    }
}

/// Categories: looked up in the category id space, parseable by built-in name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryKind;

impl EntityKind for CategoryKind {
    type Native = Category;
    const KIND: NativeKind = NativeKind::Category;

    fn from_native(native: &Native) -> Option<Arc<Category>> {
        match native {
            Native::Category(category) => Some(category.clone()),
            _ => None,
        }
    }

    fn to_native(value: Arc<Category>) -> Native {
        Native::Category(value)
    }

    fn identity(value: &Category) -> &Identity {
        &value.identity
    }

    fn display(value: &Category) -> String {
        match value.parent.as_deref() {
            Some(parent) => format!("{} : {}", parent.name, value.name),
            None => value.name.clone(),
        }
    }

    fn accepts_id(document: &dyn Document, id: EntityId) -> anyhow::Result<bool> {
        Ok(document.is_category_id(id))
    }

    /// Elements convert to the category they belong to.
    fn coerce(native: Native) -> Result<Arc<Category>, ConversionError> {
        match native {
            Native::Category(category) => Ok(category),
            Native::Element(element) => element.category.clone().ok_or_else(|| {
                ConversionError::KindMismatch {
                    expected: Self::KIND.name(),
                    found: format!("uncategorized element {}", element.identity.id),
                }
            }),
            other => Err(ConversionError::KindMismatch {
                expected: Self::KIND.name(),
                found: other.kind().name().to_string(),
            }),
        }
    }

    fn parse_name(text: &str) -> Result<ReferenceId, ParseError> {
        let builtin: BuiltInCategory = text.parse().map_err(|_| ParseError::UnknownName {
            kind: Self::KIND.name(),
            text: text.to_string(),
        })?;
        Ok(ReferenceId::from_entity_id(builtin.id()))
    }

    fn is_parsable() -> bool {
        true
    }

    fn format_instance(id: &ReferenceId) -> String {
        let id = id.entity_id().unwrap_or(EntityId::INVALID);
        match BuiltInCategory::from_id(id) {
            Some(builtin) => builtin.name().to_string(),
            None => id.to_string(),
        }
    }

    fn fallback_label(id: &ReferenceId) -> Option<String> {
        id.entity_id()
            .and_then(BuiltInCategory::from_id)
            .map(|builtin| builtin.label().to_string())
    }

    /// Built-in categories are the same entity in every document, so their
    /// id carries neither a document token nor a document-local unique id.
    fn canonical_id(id: ReferenceId) -> ReferenceId {
        match id.entity_id().and_then(BuiltInCategory::from_id) {
            Some(builtin) => ReferenceId::from_entity_id(builtin.id()),
            None => id,
        }
    }
}

/// Graphics styles: no name-based construction path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicsStyleKind;

impl EntityKind for GraphicsStyleKind {
    type Native = GraphicsStyle;
    const KIND: NativeKind = NativeKind::GraphicsStyle;

    fn from_native(native: &Native) -> Option<Arc<GraphicsStyle>> {
        match native {
            Native::GraphicsStyle(style) => Some(style.clone()),
            _ => None,
        }
    }

    fn to_native(value: Arc<GraphicsStyle>) -> Native {
        Native::GraphicsStyle(value)
    }

    fn identity(value: &GraphicsStyle) -> &Identity {
        &value.identity
    }

    fn display(value: &GraphicsStyle) -> String {
        let tag = value.style_type.tag();
        match value.category.parent.as_deref() {
            Some(parent) => format!("{} : {} [{tag}]", parent.name, value.name),
            None => format!("{} [{tag}]", value.name),
        }
    }
}

/// Plain elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementKind;

impl EntityKind for ElementKind {
    type Native = Element;
    const KIND: NativeKind = NativeKind::Element;

    fn from_native(native: &Native) -> Option<Arc<Element>> {
        match native {
            Native::Element(element) => Some(element.clone()),
            _ => None,
        }
    }

    fn to_native(value: Arc<Element>) -> Native {
        Native::Element(value)
    }

    fn identity(value: &Element) -> &Identity {
        &value.identity
    }

    fn display(value: &Element) -> String {
        value.name.clone()
    }
}
