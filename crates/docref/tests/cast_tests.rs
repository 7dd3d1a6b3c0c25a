//! Conversion protocol tests

use std::sync::Arc;

use docref::*;
use pretty_assertions::assert_eq;

fn project() -> (MemoryDocument, Arc<Category>) {
    let mut doc = MemoryDocument::new("Project1");
    let walls = doc.add_builtin(BuiltInCategory::Walls);
    (doc, walls)
}

// ═══════════════════════════════════════════════════════════════════════
// Cast From
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_native_round_trip_needs_no_lookup() {
    let (doc, walls) = project();
    let doc = Arc::new(doc);
    let ctx = SolveContext::with_active(doc.clone());

    let mut reference = CategoryReference::new();
    reference.cast_from(walls.clone(), &ctx).unwrap();
    assert_eq!(reference.state(), ResolutionState::Resolved);

    let back = reference.cast_to::<Arc<Category>>(&ctx).unwrap().unwrap();
    assert!(Arc::ptr_eq(&back, &walls));
    assert_eq!(doc.lookup_count(), 0);
}

#[test]
fn test_native_round_trip_without_active_document() {
    let (doc, walls) = project();
    let _doc = Arc::new(doc);
    let ctx = SolveContext::new();

    let mut reference = CategoryReference::try_from_source(walls.clone(), &ctx).unwrap();
    let back = reference.cast_to::<Arc<Category>>(&ctx).unwrap().unwrap();
    assert!(Arc::ptr_eq(&back, &walls));
}

#[test]
fn test_element_casts_to_its_category() {
    let (mut doc, walls) = project();
    let identity = doc.identity(42, "E42");
    let wall = Arc::new(Element::new(identity, "Wall 1").with_category(walls.clone()));
    doc.insert(wall.clone());
    let ctx = SolveContext::with_active(Arc::new(doc));

    let reference = CategoryReference::try_from_source(wall, &ctx).unwrap();
    assert!(Arc::ptr_eq(&reference.value().unwrap(), &walls));
}

#[test]
fn test_integer_is_checked_against_kind() {
    let (mut doc, walls) = project();
    let identity = doc.identity(42, "E42");
    doc.insert(Arc::new(Element::new(identity, "Wall 1")));
    let ctx = SolveContext::with_active(Arc::new(doc));

    let result = CategoryReference::try_from_source(42, &ctx);
    assert!(matches!(
        result,
        Err(ConversionError::KindMismatch {
            expected: "category",
            ..
        })
    ));

    let mut reference =
        CategoryReference::try_from_source(BuiltInCategory::Walls.id(), &ctx).unwrap();
    assert_eq!(reference.state(), ResolutionState::Unresolved);
    let value = reference.cast_to::<Arc<Category>>(&ctx).unwrap().unwrap();
    assert!(Arc::ptr_eq(&value, &walls));
}

#[test]
fn test_other_kind_native_is_rejected() {
    let (doc, walls) = project();
    let ctx = SolveContext::with_active(Arc::new(doc));

    let result = GraphicsStyleReference::try_from_source(walls, &ctx);
    assert!(matches!(
        result,
        Err(ConversionError::KindMismatch {
            expected: "graphics style",
            ..
        })
    ));
}

#[test]
fn test_name_builds_document_agnostic_reference() {
    let ctx = SolveContext::new();
    let reference = CategoryReference::try_from_source("OST_Walls", &ctx).unwrap();
    assert_eq!(reference.id(), &ReferenceId::from_entity_id(BuiltInCategory::Walls.id()));
    assert_eq!(reference.id().document(), None);
    assert_eq!(reference.state(), ResolutionState::Unbound);
}

#[test]
fn test_unknown_name_is_malformed() {
    let ctx = SolveContext::new();
    let result = CategoryReference::try_from_source("OST_NotACategory", &ctx);
    assert!(matches!(result, Err(ConversionError::Malformed { .. })));
}

// ═══════════════════════════════════════════════════════════════════════
// Cast To
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_invalid_reference_casts_to_nothing() {
    let (doc, _walls) = project();
    let ctx = SolveContext::with_active(Arc::new(doc));

    let mut reference = CategoryReference::new();
    assert!(reference.cast_to::<Native>(&ctx).unwrap().is_none());
    assert!(reference.cast_to::<Arc<Category>>(&ctx).unwrap().is_none());
    assert!(reference.cast_to::<EntityId>(&ctx).unwrap().is_none());
    assert!(reference.cast_to::<i64>(&ctx).unwrap().is_none());
    assert!(reference.cast_to::<UniqueId>(&ctx).unwrap().is_none());
    assert!(reference.cast_to::<String>(&ctx).unwrap().is_none());
    assert!(reference.cast_to::<BuiltInCategory>(&ctx).unwrap().is_none());

    // Even targets the kind does not support
    let mut style = GraphicsStyleReference::new();
    assert!(style.cast_to::<Arc<Category>>(&ctx).unwrap().is_none());
}

#[test]
fn test_missing_entity_casts_to_no_value() {
    let ctx = SolveContext::with_active(Arc::new(MemoryDocument::new("Empty")));
    let mut reference =
        CategoryReference::from_id(ReferenceId::from_entity_id(EntityId::new(1234)));
    assert!(reference.cast_to::<Arc<Category>>(&ctx).unwrap().is_none());
    assert_eq!(reference.state(), ResolutionState::Failed);
}

#[test]
fn test_unsupported_target_is_kind_mismatch() {
    let (doc, walls) = project();
    let ctx = SolveContext::with_active(Arc::new(doc));

    let mut reference = CategoryReference::from_value(&walls);
    assert!(matches!(
        reference.cast_to::<Arc<GraphicsStyle>>(&ctx),
        Err(ConversionError::KindMismatch { .. })
    ));
}

#[test]
fn test_identity_targets() {
    let (doc, walls) = project();
    let ctx = SolveContext::with_active(Arc::new(doc));

    let mut reference = CategoryReference::from_value(&walls);
    assert_eq!(
        reference.cast_to::<EntityId>(&ctx).unwrap(),
        Some(BuiltInCategory::Walls.id())
    );
    assert_eq!(reference.cast_to::<i64>(&ctx).unwrap(), Some(-2000011));
    assert_eq!(
        reference.cast_to::<UniqueId>(&ctx).unwrap(),
        Some(walls.identity.unique_id.clone())
    );
    assert_eq!(
        reference.cast_to::<ReferenceId>(&ctx).unwrap(),
        Some(ReferenceId::from_entity_id(BuiltInCategory::Walls.id()))
    );
    assert_eq!(
        reference.cast_to::<BuiltInCategory>(&ctx).unwrap(),
        Some(BuiltInCategory::Walls)
    );
    assert_eq!(reference.cast_to::<String>(&ctx).unwrap(), Some("Walls".to_string()));
}

#[test]
fn test_native_target_widens() {
    let (doc, walls) = project();
    let ctx = SolveContext::with_active(Arc::new(doc));

    let mut reference = CategoryReference::from_value(&walls);
    let native = reference.cast_to::<Native>(&ctx).unwrap().unwrap();
    assert_eq!(native.kind(), NativeKind::Category);
    assert!(native.ptr_eq(&Native::Category(walls)));
}
