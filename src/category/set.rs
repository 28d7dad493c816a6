//! The categories available to a user: the built-in defaults followed by their own.

use std::collections::HashSet;

use crate::category::{CustomCategory, DefaultCategory, domain::fold_name};

/// A category that an expense can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    /// One of the built-in categories.
    Default(DefaultCategory),
    /// A category the user created.
    Custom(CustomCategory),
}

impl Category {
    /// The category's name.
    pub fn name(&self) -> &str {
        match self {
            Category::Default(category) => category.name(),
            Category::Custom(category) => category.name.as_ref(),
        }
    }

    /// The icon for built-in categories.
    pub fn icon(&self) -> Option<&'static str> {
        match self {
            Category::Default(category) => Some(category.icon()),
            Category::Custom(_) => None,
        }
    }
}

/// The merged, ordered list of categories a user can choose from.
///
/// Names are unique ignoring case and surrounding whitespace. A custom
/// category whose name matches a default, or an older custom category, is
/// left out of the set and reported by [CategorySet::shadowed].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    categories: Vec<Category>,
    shadowed: Vec<CustomCategory>,
}

impl CategorySet {
    /// Only the built-in categories.
    pub fn defaults() -> Self {
        Self::merge(Vec::new())
    }

    /// Combine the defaults with a user's categories.
    ///
    /// Defaults come first in their fixed order, followed by custom categories
    /// from oldest to newest.
    pub fn merge(custom: impl IntoIterator<Item = CustomCategory>) -> Self {
        let mut custom: Vec<CustomCategory> = custom.into_iter().collect();
        custom.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let mut seen: HashSet<String> = DefaultCategory::ALL
            .iter()
            .map(|category| fold_name(category.name()))
            .collect();
        let mut categories: Vec<Category> = DefaultCategory::ALL
            .into_iter()
            .map(Category::Default)
            .collect();
        let mut shadowed = Vec::new();

        for category in custom {
            if seen.insert(category.name.folded()) {
                categories.push(Category::Custom(category));
            } else {
                tracing::debug!(
                    "Category \"{}\" ({}) duplicates an existing category name and is hidden",
                    category.name,
                    category.id
                );
                shadowed.push(category);
            }
        }

        Self {
            categories,
            shadowed,
        }
    }

    /// Iterate over the categories in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// The category names in display order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(Category::name)
    }

    /// The number of categories in the set.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the set is empty. Never true, since the defaults are always present.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Look up a category by name, ignoring case and surrounding whitespace.
    pub fn find(&self, name: &str) -> Option<&Category> {
        let name = fold_name(name);

        self.categories
            .iter()
            .find(|category| fold_name(category.name()) == name)
    }

    /// The icon to show for the category called `name`, if any.
    pub fn icon_for(&self, name: &str) -> Option<&'static str> {
        self.find(name).and_then(Category::icon)
    }

    /// Custom categories hidden because their name is already taken.
    pub fn shadowed(&self) -> &[CustomCategory] {
        &self.shadowed
    }
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::datetime};

    use crate::category::{
        Category, CategoryName, CategorySet, CustomCategory, DefaultCategory,
    };

    fn custom(id: i64, name: &str) -> CustomCategory {
        CustomCategory {
            id,
            name: CategoryName::new_unchecked(name),
            created_at: datetime!(2024-01-01 00:00 UTC) + Duration::minutes(id),
        }
    }

    #[test]
    fn defaults_come_in_fixed_order() {
        let set = CategorySet::defaults();

        assert_eq!(
            set.names().collect::<Vec<_>>(),
            vec!["Food", "Transport", "Entertainment", "Utilities", "Rent", "Other"]
        );
        assert!(set.shadowed().is_empty());
    }

    #[test]
    fn custom_categories_follow_defaults_oldest_first() {
        let set = CategorySet::merge(vec![custom(2, "Travel"), custom(1, "Pets")]);

        let names: Vec<_> = set.names().collect();

        assert_eq!(names.len(), 8);
        assert_eq!(&names[6..], &["Pets", "Travel"]);
    }

    #[test]
    fn custom_category_cannot_shadow_default() {
        let food = custom(1, " food ");
        let set = CategorySet::merge(vec![food.clone()]);

        assert_eq!(set.len(), DefaultCategory::ALL.len());
        assert_eq!(
            set.find("FOOD"),
            Some(&Category::Default(DefaultCategory::Food))
        );
        assert_eq!(set.shadowed(), &[food]);
    }

    #[test]
    fn duplicate_custom_names_keep_the_oldest() {
        let first = custom(1, "Pets");
        let second = custom(2, "pets");
        let set = CategorySet::merge(vec![second.clone(), first.clone()]);

        assert_eq!(set.find("PETS"), Some(&Category::Custom(first)));
        assert_eq!(set.shadowed(), &[second]);
    }

    #[test]
    fn icons_only_for_defaults() {
        let set = CategorySet::merge(vec![custom(1, "Pets")]);

        assert_eq!(set.icon_for("rent"), Some("🏠"));
        assert_eq!(set.icon_for("Pets"), None);
        assert_eq!(set.icon_for("Unknown"), None);
    }
}
