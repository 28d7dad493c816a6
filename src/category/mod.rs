//! Expense categories: the built-in defaults, user-defined categories and the page for managing them.

mod db;
mod domain;
mod page;
mod set;

pub(crate) use db::{create_category, create_category_table, delete_category, get_categories};
pub use domain::{CategoryFormData, CategoryId, CategoryName, CustomCategory, DefaultCategory};
pub(crate) use page::{create_category_endpoint, delete_category_endpoint, get_categories_page};
pub use set::{Category, CategorySet};
