//! Native entity values handed out by a document
//!
//! These are the live objects a reference resolves to. Documents own them
//! behind `Arc`; references only ever keep a `Weak` to them.

mod builtin;

pub use builtin::BuiltInCategory;

use std::fmt;
use std::sync::Arc;

use crate::id::{DocumentToken, EntityId, ReferenceId, UniqueId};

/// Where a native entity lives and how it is addressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    /// The owning document
    pub document: DocumentToken,

    /// Transient numeric id
    pub id: EntityId,

    /// Persistent id
    pub unique_id: UniqueId,
}

impl Identity {
    /// Create an identity.
    pub fn new(document: DocumentToken, id: EntityId, unique_id: impl Into<UniqueId>) -> Self {
        Self {
            document,
            id,
            unique_id: unique_id.into(),
        }
    }

    /// The reference id addressing this entity.
    pub fn reference_id(&self) -> ReferenceId {
        ReferenceId::new(self.document, self.id).with_unique_id(self.unique_id.clone())
    }
}

/// Broad classification of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryType {
    /// Not classified
    #[default]
    Invalid,
    /// Model geometry
    Model,
    /// Annotation
    Annotation,
    /// Internal to the document
    Internal,
    /// Analytical model
    AnalyticalModel,
}

/// Whether a graphics style draws projected or cut geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphicsStyleType {
    /// Projection lines
    Projection,
    /// Cut lines
    Cut,
}

impl GraphicsStyleType {
    /// The lowercase tag used in display names.
    pub fn tag(self) -> &'static str {
        match self {
            GraphicsStyleType::Projection => "projection",
            GraphicsStyleType::Cut => "cut",
        }
    }
}

/// An RGB line color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Color {
    /// Create a color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A category, possibly nested under a parent category.
#[derive(Debug, Clone)]
pub struct Category {
    /// Where the category lives
    pub identity: Identity,

    /// Display name
    pub name: String,

    /// Parent category for subcategories
    pub parent: Option<Arc<Category>>,

    /// Broad classification
    pub category_type: CategoryType,

    /// Whether this is a tag category for some other category
    pub is_tag: bool,

    /// Whether project parameters can be bound to it
    pub allows_bound_parameters: bool,

    /// Whether its elements can be cut
    pub is_cuttable: bool,

    /// Whether its elements report material quantities
    pub has_material_quantities: bool,

    /// Name of the category material
    pub material: Option<String>,

    /// Line color of its elements
    pub line_color: Option<Color>,
}

impl Category {
    /// Create a top-level model category with default flags.
    pub fn new(identity: Identity, name: impl Into<String>) -> Self {
        Self {
            identity,
            name: name.into(),
            parent: None,
            category_type: CategoryType::Model,
            is_tag: false,
            allows_bound_parameters: false,
            is_cuttable: false,
            has_material_quantities: false,
            material: None,
            line_color: None,
        }
    }

    /// Nest under a parent category (builder pattern).
    pub fn with_parent(mut self, parent: Arc<Category>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the classification (builder pattern).
    pub fn with_type(mut self, category_type: CategoryType) -> Self {
        self.category_type = category_type;
        self
    }

    /// Mark as a tag category (builder pattern).
    pub fn tag(mut self) -> Self {
        self.is_tag = true;
        self
    }

    /// Set the material (builder pattern).
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    /// Set the line color (builder pattern).
    pub fn with_line_color(mut self, color: Color) -> Self {
        self.line_color = Some(color);
        self
    }

    /// The built-in category this is, if any.
    pub fn builtin(&self) -> Option<BuiltInCategory> {
        BuiltInCategory::from_id(self.identity.id)
    }
}

/// A graphics style: how lines of some category draw.
#[derive(Debug, Clone)]
pub struct GraphicsStyle {
    /// Where the style lives
    pub identity: Identity,

    /// Display name
    pub name: String,

    /// Projection or cut
    pub style_type: GraphicsStyleType,

    /// The category this style draws
    pub category: Arc<Category>,
}

impl GraphicsStyle {
    /// Create a graphics style.
    pub fn new(
        identity: Identity,
        name: impl Into<String>,
        style_type: GraphicsStyleType,
        category: Arc<Category>,
    ) -> Self {
        Self {
            identity,
            name: name.into(),
            style_type,
            category,
        }
    }
}

/// Any other element of a document.
#[derive(Debug, Clone)]
pub struct Element {
    /// Where the element lives
    pub identity: Identity,

    /// Display name
    pub name: String,

    /// The category the element belongs to
    pub category: Option<Arc<Category>>,
}

impl Element {
    /// Create an uncategorized element.
    pub fn new(identity: Identity, name: impl Into<String>) -> Self {
        Self {
            identity,
            name: name.into(),
            category: None,
        }
    }

    /// Assign a category (builder pattern).
    pub fn with_category(mut self, category: Arc<Category>) -> Self {
        self.category = Some(category);
        self
    }
}

/// Which variant of [`Native`] a value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    /// [`Native::Category`]
    Category,
    /// [`Native::GraphicsStyle`]
    GraphicsStyle,
    /// [`Native::Element`]
    Element,
}

impl NativeKind {
    /// Human-readable kind name, used in conversion errors.
    pub const fn name(self) -> &'static str {
        match self {
            NativeKind::Category => "category",
            NativeKind::GraphicsStyle => "graphics style",
            NativeKind::Element => "element",
        }
    }
}

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The closed set of native values a document can hand out.
#[derive(Debug, Clone)]
pub enum Native {
    /// A category
    Category(Arc<Category>),
    /// A graphics style
    GraphicsStyle(Arc<GraphicsStyle>),
    /// Any other element
    Element(Arc<Element>),
}

impl Native {
    /// Where this value lives.
    pub fn identity(&self) -> &Identity {
        match self {
            Native::Category(c) => &c.identity,
            Native::GraphicsStyle(s) => &s.identity,
            Native::Element(e) => &e.identity,
        }
    }

    /// Display name of the value.
    pub fn name(&self) -> &str {
        match self {
            Native::Category(c) => &c.name,
            Native::GraphicsStyle(s) => &s.name,
            Native::Element(e) => &e.name,
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> NativeKind {
        match self {
            Native::Category(_) => NativeKind::Category,
            Native::GraphicsStyle(_) => NativeKind::GraphicsStyle,
            Native::Element(_) => NativeKind::Element,
        }
    }

    /// The same value re-addressed under a new numeric id.
    ///
    /// Documents use this when an operation renumbers an entity.
    pub fn renumbered(&self, id: EntityId) -> Native {
        match self {
            Native::Category(c) => {
                let mut c = Category::clone(c);
                c.identity.id = id;
                Native::Category(Arc::new(c))
            }
            Native::GraphicsStyle(s) => {
                let mut s = GraphicsStyle::clone(s);
                s.identity.id = id;
                Native::GraphicsStyle(Arc::new(s))
            }
            Native::Element(e) => {
                let mut e = Element::clone(e);
                e.identity.id = id;
                Native::Element(Arc::new(e))
            }
        }
    }

    /// Check whether both values are the same allocation.
    pub fn ptr_eq(&self, other: &Native) -> bool {
        match (self, other) {
            (Native::Category(a), Native::Category(b)) => Arc::ptr_eq(a, b),
            (Native::GraphicsStyle(a), Native::GraphicsStyle(b)) => Arc::ptr_eq(a, b),
            (Native::Element(a), Native::Element(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Arc<Category>> for Native {
    fn from(value: Arc<Category>) -> Self {
        Native::Category(value)
    }
}

impl From<Arc<GraphicsStyle>> for Native {
    fn from(value: Arc<GraphicsStyle>) -> Self {
        Native::GraphicsStyle(value)
    }
}

impl From<Arc<Element>> for Native {
    fn from(value: Arc<Element>) -> Self {
        Native::Element(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: i64, unique: &str) -> Identity {
        Identity::new(DocumentToken::generate(), EntityId::new(id), unique)
    }

    #[test]
    fn test_renumbered_keeps_unique_id() {
        let native = Native::from(Arc::new(Category::new(identity(5, "U1"), "Walls")));
        let moved = native.renumbered(EntityId::new(9));

        assert_eq!(moved.identity().id, EntityId::new(9));
        assert_eq!(moved.identity().unique_id, native.identity().unique_id);
        assert!(!moved.ptr_eq(&native));
    }

    #[test]
    fn test_builtin_category_detection() {
        let walls = Category::new(identity(-2000011, "W"), "Walls");
        let custom = Category::new(identity(1200, "C"), "Custom");
        assert_eq!(walls.builtin(), Some(BuiltInCategory::Walls));
        assert_eq!(custom.builtin(), None);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::rgb(255, 0, 16).to_string(), "#ff0010");
    }
}
