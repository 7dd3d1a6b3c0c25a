//! Browsing the categories of a document
//!
//! Category pickers group categories the same way: tag categories form
//! their own group regardless of type, everything else groups by
//! [`CategoryType`].

use std::fmt;

use crate::document::Document;
use crate::error::Result;
use crate::native::{Category, CategoryType};
use crate::reference::CategoryReference;

/// A group of categories offered together by a picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    /// Model categories
    Model,
    /// Annotation categories that are not tags
    Annotation,
    /// Tag categories of any type
    Tags,
    /// Internal categories
    Internal,
    /// Analytical model categories
    Analytical,
}

impl CategoryFilter {
    /// Every filter, in picker order.
    pub const ALL: [CategoryFilter; 5] = [
        CategoryFilter::Model,
        CategoryFilter::Annotation,
        CategoryFilter::Tags,
        CategoryFilter::Internal,
        CategoryFilter::Analytical,
    ];

    /// Label shown by pickers.
    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::Model => "Model",
            CategoryFilter::Annotation => "Annotation",
            CategoryFilter::Tags => "Tags",
            CategoryFilter::Internal => "Internal",
            CategoryFilter::Analytical => "Analytical",
        }
    }

    /// Check whether `category` belongs to this group.
    pub fn matches(self, category: &Category) -> bool {
        match self {
            CategoryFilter::Tags => category.is_tag,
            _ => !category.is_tag && Some(self) == Self::for_type(category.category_type),
        }
    }

    /// The group `category` is listed under.
    pub fn of(category: &Category) -> Option<CategoryFilter> {
        if category.is_tag {
            return Some(CategoryFilter::Tags);
        }
        Self::for_type(category.category_type)
    }

    fn for_type(category_type: CategoryType) -> Option<CategoryFilter> {
        match category_type {
            CategoryType::Model => Some(CategoryFilter::Model),
            CategoryType::Annotation => Some(CategoryFilter::Annotation),
            CategoryType::Internal => Some(CategoryFilter::Internal),
            CategoryType::AnalyticalModel => Some(CategoryFilter::Analytical),
            CategoryType::Invalid => None,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// References to every category of `document` in `filter`, sorted by
/// display name.
pub fn list_categories(
    document: &dyn Document,
    filter: CategoryFilter,
) -> Result<Vec<CategoryReference>> {
    let mut references: Vec<CategoryReference> = document
        .categories()?
        .iter()
        .filter(|category| filter.matches(category))
        .map(CategoryReference::from_value)
        .collect();
    references.sort_by_cached_key(|reference| reference.to_string());
    Ok(references)
}

/// Position of `current` in `list`, matched by identity.
///
/// Custom categories match by unique id, built-in ones by their reserved id.
pub fn selected_index(
    list: &[CategoryReference],
    current: &CategoryReference,
) -> Option<usize> {
    if !current.is_valid() {
        return None;
    }
    list.iter().position(|candidate| candidate.id() == current.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{DocumentToken, EntityId};
    use crate::native::Identity;

    fn category(category_type: CategoryType) -> Category {
        let identity = Identity::new(DocumentToken::generate(), EntityId::new(1), "C");
        Category::new(identity, "C").with_type(category_type)
    }

    #[test]
    fn test_tags_group_ignores_type() {
        let tag = category(CategoryType::Annotation).tag();
        assert!(CategoryFilter::Tags.matches(&tag));
        assert!(!CategoryFilter::Annotation.matches(&tag));
        assert_eq!(CategoryFilter::of(&tag), Some(CategoryFilter::Tags));
    }

    #[test]
    fn test_type_groups() {
        let analytical = category(CategoryType::AnalyticalModel);
        assert!(CategoryFilter::Analytical.matches(&analytical));
        assert!(!CategoryFilter::Model.matches(&analytical));
        assert_eq!(CategoryFilter::of(&category(CategoryType::Invalid)), None);
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = CategoryFilter::ALL.iter().map(|f| f.to_string()).collect();
        assert_eq!(labels, ["Model", "Annotation", "Tags", "Internal", "Analytical"]);
    }
}
