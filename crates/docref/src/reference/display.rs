//! Display text and inspection summaries for references

use std::cell::OnceCell;

use super::{CategoryKind, ElementReference, EntityKind};
use crate::error::ParseError;
use crate::id::ReferenceId;
use crate::native::{CategoryType, Color};

/// Human-readable name of a reference.
///
/// Falls back from the loaded value, to a label derived from a recognized
/// id, to the raw id.
pub(crate) fn display_name<K: EntityKind>(reference: &ElementReference<K>) -> String {
    if let Some(value) = reference.value() {
        return K::display(&value);
    }
    match K::fallback_label(reference.id()) {
        Some(label) => label,
        None => reference.id().to_string(),
    }
}

/// Read-only view of a reference for inspection and editing surfaces.
///
/// Never triggers a lookup; everything is computed from the id and the
/// value already cached by the reference.
///
/// # Example
///
/// ```
/// use docref::{BuiltInCategory, CategoryKind, CategoryReference, DisplayProxy, ReferenceId};
///
/// let walls_id = ReferenceId::from_entity_id(BuiltInCategory::Walls.id());
/// let walls = CategoryReference::from_id(walls_id);
/// let proxy = DisplayProxy::new(&walls);
///
/// assert_eq!(proxy.format(), "OST_Walls");
/// assert_eq!(proxy.display_name(), "Walls");
/// assert_eq!(DisplayProxy::<CategoryKind>::parse("OST_Walls").unwrap(), *walls.id());
/// ```
pub struct DisplayProxy<'a, K: EntityKind> {
    owner: &'a ElementReference<K>,
    user_string: OnceCell<String>,
}

impl<'a, K: EntityKind> DisplayProxy<'a, K> {
    /// Wrap a reference.
    pub fn new(owner: &'a ElementReference<K>) -> Self {
        Self {
            owner,
            user_string: OnceCell::new(),
        }
    }

    /// The wrapped reference.
    pub fn owner(&self) -> &'a ElementReference<K> {
        self.owner
    }

    /// Compact text for the reference, accepted back by [`DisplayProxy::parse`]
    /// when the kind is parseable.
    pub fn format(&self) -> String {
        K::format_instance(self.owner.id())
    }

    /// [`DisplayProxy::format`], computed once.
    pub fn user_string(&self) -> &str {
        self.user_string.get_or_init(|| self.format())
    }

    /// Whether this kind accepts text input at all.
    pub fn is_parsable(&self) -> bool {
        K::is_parsable()
    }

    /// The human-readable name.
    pub fn display_name(&self) -> String {
        display_name(self.owner)
    }

    /// Parse text produced by [`DisplayProxy::format`] back into an id.
    pub fn parse(text: &str) -> Result<ReferenceId, ParseError> {
        K::parse_name(text)
    }
}

/// Properties of a category shown by inspection surfaces.
///
/// Fields read as empty or false until the category is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategorySummary {
    /// Name of the parent category
    pub parent: Option<String>,
    /// Whether project parameters can be bound to it
    pub allows_parameters: bool,
    /// Whether it tags another category
    pub is_tag: bool,
    /// Name of its material
    pub material: Option<String>,
    /// Whether its elements report material quantities
    pub has_material_quantities: bool,
    /// Broad classification
    pub category_type: CategoryType,
    /// Whether its elements can be cut
    pub is_cuttable: bool,
    /// Line color of its elements
    pub line_color: Option<Color>,
}

impl DisplayProxy<'_, CategoryKind> {
    /// Summarize the loaded category.
    pub fn summary(&self) -> CategorySummary {
        let Some(category) = self.owner.value() else {
            return CategorySummary::default();
        };
        CategorySummary {
            parent: category.parent.as_ref().map(|parent| parent.name.clone()),
            allows_parameters: category.allows_bound_parameters,
            is_tag: category.is_tag,
            material: category.material.clone(),
            has_material_quantities: category.has_material_quantities,
            category_type: category.category_type,
            is_cuttable: category.is_cuttable,
            line_color: category.line_color,
        }
    }
}
