//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name from trimmed `name`.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyCategoryName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// The name folded for comparisons, so "food " and "Food" collide.
    pub(crate) fn folded(&self) -> String {
        fold_name(&self.0)
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// The categories every user starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultCategory {
    Food,
    Transport,
    Entertainment,
    Utilities,
    Rent,
    Other,
}

impl DefaultCategory {
    /// The defaults in display order.
    pub const ALL: [DefaultCategory; 6] = [
        DefaultCategory::Food,
        DefaultCategory::Transport,
        DefaultCategory::Entertainment,
        DefaultCategory::Utilities,
        DefaultCategory::Rent,
        DefaultCategory::Other,
    ];

    /// The category's name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Utilities => "Utilities",
            Self::Rent => "Rent",
            Self::Other => "Other",
        }
    }

    /// The icon shown next to the category's name.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Food => "🍔",
            Self::Transport => "🚌",
            Self::Entertainment => "🎬",
            Self::Utilities => "💡",
            Self::Rent => "🏠",
            Self::Other => "📦",
        }
    }
}

/// Database identifier for a custom category.
pub type CategoryId = i64;

/// A category created by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomCategory {
    /// The category's ID in the application database.
    pub id: CategoryId,
    /// The category's name.
    pub name: CategoryName,
    /// When the category was created.
    pub created_at: OffsetDateTime,
}

/// Form data for category creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use crate::{Error, category::CategoryName};

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(CategoryName::new(""), Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(CategoryName::new("\n\t \r"), Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_trims_name() {
        assert_eq!(
            CategoryName::new("  Pets "),
            Ok(CategoryName::new_unchecked("Pets"))
        );
    }

    #[test]
    fn folded_names_ignore_case_and_padding() {
        assert_eq!(
            CategoryName::new_unchecked("FOOD").folded(),
            CategoryName::new_unchecked("food").folded()
        );
    }
}
