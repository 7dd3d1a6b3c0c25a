//! The cast-from / cast-to conversion protocol
//!
//! Conversions into a reference take a closed [`CastSource`]; conversions
//! out of one are negotiated per target type through [`CastTarget`].
//! An invalid (empty) reference converts to "no value" for every target.

use std::sync::Arc;

use tracing::debug;

use super::{display, ElementReference, EntityKind};
use crate::context::SolveContext;
use crate::error::{ConversionError, ParseError};
use crate::id::{EntityId, ReferenceId, UniqueId};
use crate::native::{BuiltInCategory, Category, Element, GraphicsStyle, Native, NativeKind};

/// Everything a reference can be built from.
#[derive(Debug, Clone)]
pub enum CastSource {
    /// A live native value
    Native(Native),
    /// A full reference id, adopted as-is
    Reference(ReferenceId),
    /// A numeric id in the active document
    Id(EntityId),
    /// A raw integer, read as a numeric id in the active document
    Integer(i64),
    /// A kind-specific name, such as a built-in category name
    Name(String),
}

impl CastSource {
    /// Short description used in conversion errors.
    fn describe(&self) -> String {
        match self {
            CastSource::Native(native) => native.kind().name().to_string(),
            CastSource::Reference(id) => format!("reference {id}"),
            CastSource::Id(id) => format!("entity id {id}"),
            CastSource::Integer(value) => format!("integer {value}"),
            CastSource::Name(name) => format!("name {name:?}"),
        }
    }
}

impl From<Native> for CastSource {
    fn from(value: Native) -> Self {
        CastSource::Native(value)
    }
}

impl From<Arc<Category>> for CastSource {
    fn from(value: Arc<Category>) -> Self {
        CastSource::Native(value.into())
    }
}

impl From<Arc<GraphicsStyle>> for CastSource {
    fn from(value: Arc<GraphicsStyle>) -> Self {
        CastSource::Native(value.into())
    }
}

impl From<Arc<Element>> for CastSource {
    fn from(value: Arc<Element>) -> Self {
        CastSource::Native(value.into())
    }
}

impl From<ReferenceId> for CastSource {
    fn from(value: ReferenceId) -> Self {
        CastSource::Reference(value)
    }
}

impl From<EntityId> for CastSource {
    fn from(value: EntityId) -> Self {
        CastSource::Id(value)
    }
}

impl From<i64> for CastSource {
    fn from(value: i64) -> Self {
        CastSource::Integer(value)
    }
}

impl From<i32> for CastSource {
    fn from(value: i32) -> Self {
        CastSource::Integer(value as i64)
    }
}

impl From<&str> for CastSource {
    fn from(value: &str) -> Self {
        CastSource::Name(value.to_string())
    }
}

impl From<String> for CastSource {
    fn from(value: String) -> Self {
        CastSource::Name(value)
    }
}

impl<K: EntityKind> ElementReference<K> {
    /// Re-point this reference at `source`.
    ///
    /// On failure the reference is left untouched.
    pub fn cast_from(
        &mut self,
        source: impl Into<CastSource>,
        ctx: &SolveContext,
    ) -> Result<(), ConversionError> {
        *self = Self::try_from_source(source, ctx)?;
        Ok(())
    }

    /// Build a reference from `source`.
    ///
    /// The most specific source wins: a native value of the right kind is
    /// accepted as-is and arrives already resolved, while id-shaped sources
    /// must denote an entity of this kind in the active document.
    pub fn try_from_source(
        source: impl Into<CastSource>,
        ctx: &SolveContext,
    ) -> Result<Self, ConversionError> {
        let source = source.into();
        let description = source.describe();

        let reference = match source {
            CastSource::Native(native) => Self::from_value(&K::coerce(native)?),
            CastSource::Reference(id) => Self::from_reference_id(id, ctx)?,
            CastSource::Id(id) => Self::from_active_id(id, ctx)?,
            CastSource::Integer(value) => Self::from_active_id(EntityId::new(value), ctx)?,
            CastSource::Name(name) => Self::from_id(K::parse_name(&name).map_err(|err| match err {
                ParseError::NotParsable { .. } => ConversionError::KindMismatch {
                    expected: K::KIND.name(),
                    found: format!("name {name:?}"),
                },
                ParseError::UnknownName { .. } => ConversionError::Malformed {
                    expected: K::KIND.name(),
                    reason: err.to_string(),
                },
            })?),
        };

        debug!(kind = K::KIND.name(), source = %description, id = %reference.id, "cast accepted");
        Ok(reference)
    }

    fn from_active_id(id: EntityId, ctx: &SolveContext) -> Result<Self, ConversionError> {
        if !id.is_valid() {
            return Err(ConversionError::Malformed {
                expected: K::KIND.name(),
                reason: format!("{id} is not a valid entity id"),
            });
        }
        let document = ctx
            .active_document()
            .ok_or(ConversionError::NoActiveDocument {
                expected: K::KIND.name(),
            })?;
        if !K::accepts_id(document, id).map_err(ConversionError::Document)? {
            return Err(ConversionError::KindMismatch {
                expected: K::KIND.name(),
                found: format!("entity id {id}"),
            });
        }
        let token = document.token();
        Ok(Self::bound_to(ReferenceId::new(token, id), token))
    }

    /// A reference id is checked only when it points into the active document;
    /// anything else is adopted unbound and checked on resolution.
    fn from_reference_id(id: ReferenceId, ctx: &SolveContext) -> Result<Self, ConversionError> {
        if let (Some(document), Some(token), Some(entity)) =
            (ctx.active_document(), id.document(), id.entity_id())
        {
            if document.token() == token
                && id.unique_id().is_none()
                && !K::accepts_id(document, entity).map_err(ConversionError::Document)?
            {
                return Err(ConversionError::KindMismatch {
                    expected: K::KIND.name(),
                    found: format!("entity id {entity}"),
                });
            }
        }
        Ok(Self::from_id(id))
    }

    /// Project this reference onto `T`.
    ///
    /// `Ok(None)` means "no value": the reference is invalid or its entity
    /// could not be found. An error means `T` is not a capability of this
    /// kind of reference.
    pub fn cast_to<T: CastTarget<K>>(
        &mut self,
        ctx: &SolveContext,
    ) -> Result<Option<T>, ConversionError> {
        if !self.is_valid() {
            return Ok(None);
        }
        T::cast(self, ctx)
    }

    /// Resolve before a cast, keeping a live value when the pass has no
    /// active document to check it against.
    fn prepare_cast(&mut self, ctx: &SolveContext) -> Result<(), ConversionError> {
        if ctx.active_document().is_none() && self.is_resolved() {
            return Ok(());
        }
        self.resolve(ctx)?;
        Ok(())
    }
}

/// A type a reference of kind `K` can be projected onto.
pub trait CastTarget<K: EntityKind>: Sized {
    /// Perform the projection. Only called on valid references.
    fn cast(
        reference: &mut ElementReference<K>,
        ctx: &SolveContext,
    ) -> Result<Option<Self>, ConversionError>;
}

impl<K: EntityKind> CastTarget<K> for Native {
    fn cast(
        reference: &mut ElementReference<K>,
        ctx: &SolveContext,
    ) -> Result<Option<Self>, ConversionError> {
        reference.prepare_cast(ctx)?;
        Ok(reference.value().map(K::to_native))
    }
}

macro_rules! native_target {
    ($ty:ty, $variant:ident) => {
        impl<K: EntityKind> CastTarget<K> for Arc<$ty> {
            fn cast(
                reference: &mut ElementReference<K>,
                ctx: &SolveContext,
            ) -> Result<Option<Self>, ConversionError> {
                if K::KIND != NativeKind::$variant {
                    return Err(ConversionError::KindMismatch {
                        expected: NativeKind::$variant.name(),
                        found: K::KIND.name().to_string(),
                    });
                }
                reference.prepare_cast(ctx)?;
                Ok(reference.value().map(K::to_native).and_then(|native| match native {
                    Native::$variant(value) => Some(value),
                    _ => None,
                }))
            }
        }
    };
}

native_target!(Category, Category);
native_target!(GraphicsStyle, GraphicsStyle);
native_target!(Element, Element);

impl<K: EntityKind> CastTarget<K> for EntityId {
    fn cast(
        reference: &mut ElementReference<K>,
        ctx: &SolveContext,
    ) -> Result<Option<Self>, ConversionError> {
        reference.prepare_cast(ctx)?;
        Ok(reference.id().entity_id())
    }
}

impl<K: EntityKind> CastTarget<K> for i64 {
    fn cast(
        reference: &mut ElementReference<K>,
        ctx: &SolveContext,
    ) -> Result<Option<Self>, ConversionError> {
        Ok(<EntityId as CastTarget<K>>::cast(reference, ctx)?.map(EntityId::value))
    }
}

impl<K: EntityKind> CastTarget<K> for UniqueId {
    fn cast(
        reference: &mut ElementReference<K>,
        ctx: &SolveContext,
    ) -> Result<Option<Self>, ConversionError> {
        reference.prepare_cast(ctx)?;
        Ok(reference
            .value()
            .map(|value| K::identity(&value).unique_id.clone())
            .or_else(|| reference.id().unique_id().cloned()))
    }
}

impl<K: EntityKind> CastTarget<K> for ReferenceId {
    fn cast(
        reference: &mut ElementReference<K>,
        ctx: &SolveContext,
    ) -> Result<Option<Self>, ConversionError> {
        reference.prepare_cast(ctx)?;
        Ok(Some(reference.id().clone()))
    }
}

impl<K: EntityKind> CastTarget<K> for BuiltInCategory {
    fn cast(
        reference: &mut ElementReference<K>,
        ctx: &SolveContext,
    ) -> Result<Option<Self>, ConversionError> {
        if K::KIND != NativeKind::Category {
            return Err(ConversionError::KindMismatch {
                expected: "built-in category",
                found: K::KIND.name().to_string(),
            });
        }
        reference.prepare_cast(ctx)?;
        Ok(reference.id().entity_id().and_then(BuiltInCategory::from_id))
    }
}

/// Text casts produce the display name.
impl<K: EntityKind> CastTarget<K> for String {
    fn cast(
        reference: &mut ElementReference<K>,
        ctx: &SolveContext,
    ) -> Result<Option<Self>, ConversionError> {
        reference.prepare_cast(ctx)?;
        Ok(Some(display::display_name(reference)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, MemoryDocument};
    use crate::reference::{
        CategoryKind, CategoryReference, GraphicsStyleReference, ResolutionState,
    };

    fn context(doc: MemoryDocument) -> (Arc<MemoryDocument>, SolveContext) {
        let doc = Arc::new(doc);
        let ctx = SolveContext::with_active(doc.clone());
        (doc, ctx)
    }

    #[test]
    fn test_source_descriptions() {
        assert_eq!(CastSource::from(42).describe(), "integer 42");
        assert_eq!(CastSource::from(EntityId::new(7)).describe(), "entity id 7");
        assert_eq!(CastSource::from("OST_Walls").describe(), "name \"OST_Walls\"");
    }

    #[test]
    fn test_failed_cast_leaves_reference_untouched() {
        let mut doc = MemoryDocument::new("Doc");
        let walls = doc.add_builtin(BuiltInCategory::Walls);
        let (_doc, ctx) = context(doc);

        let mut reference = CategoryReference::from_value(&walls);
        assert!(reference.cast_from("OST_Nope", &ctx).is_err());
        assert_eq!(reference.id(), &ReferenceId::from_entity_id(BuiltInCategory::Walls.id()));
        assert_eq!(reference.state(), ResolutionState::Resolved);
    }

    #[test]
    fn test_integer_without_active_document() {
        let ctx = SolveContext::new();
        let result = CategoryReference::try_from_source(-2000011, &ctx);
        assert!(matches!(
            result,
            Err(ConversionError::NoActiveDocument { expected: "category" })
        ));
    }

    #[test]
    fn test_invalid_integer_is_malformed() {
        let (_doc, ctx) = context(MemoryDocument::new("Doc"));
        let result = CategoryReference::try_from_source(-1, &ctx);
        assert!(matches!(result, Err(ConversionError::Malformed { .. })));
    }

    #[test]
    fn test_graphics_style_has_no_name_path() {
        let (_doc, ctx) = context(MemoryDocument::new("Doc"));
        let result = GraphicsStyleReference::try_from_source("OST_Walls", &ctx);
        assert!(matches!(
            result,
            Err(ConversionError::KindMismatch {
                expected: "graphics style",
                ..
            })
        ));
    }

    #[test]
    fn test_reference_id_into_active_document_is_checked() {
        let mut doc = MemoryDocument::new("Doc");
        doc.insert(Arc::new(Element::new(doc.identity(42, "E42"), "Wall 1")));
        let token = doc.token();
        let (_doc, ctx) = context(doc);

        let result =
            CategoryReference::try_from_source(ReferenceId::new(token, EntityId::new(42)), &ctx);
        assert!(matches!(result, Err(ConversionError::KindMismatch { .. })));

        // Foreign documents are adopted and checked on resolution
        let foreign = ReferenceId::new(crate::DocumentToken::generate(), EntityId::new(42));
        let adopted = CategoryReference::try_from_source(foreign, &ctx).unwrap();
        assert_eq!(adopted.state(), ResolutionState::Unbound);
    }

    #[test]
    fn test_builtin_target_needs_category_kind() {
        let (_doc, ctx) = context(MemoryDocument::new("Doc"));
        let mut style =
            GraphicsStyleReference::from_id(ReferenceId::from_entity_id(EntityId::new(7)));
        assert!(matches!(
            style.cast_to::<BuiltInCategory>(&ctx),
            Err(ConversionError::KindMismatch { .. })
        ));

        let mut walls = ElementReference::<CategoryKind>::from_id(ReferenceId::from_entity_id(
            BuiltInCategory::Walls.id(),
        ));
        assert_eq!(
            walls.cast_to::<BuiltInCategory>(&ctx).unwrap(),
            Some(BuiltInCategory::Walls)
        );
    }
}
