//! Persistence for expenses and custom categories, with live snapshots for subscribers.

mod sqlite;
mod subscription;

pub use sqlite::{SQLiteCategoryStore, SQLiteExpenseStore};
pub use subscription::Subscription;

use crate::{
    Error,
    category::{CategoryId, CategoryName, CategorySet, CustomCategory},
    expense::{Expense, ExpenseId, ExpensePatch, NewExpense},
    user::UserID,
};

/// Stores the expenses of each user.
pub trait ExpenseStore: Send + Sync {
    /// Save a new expense and return it with its ID and timestamps.
    fn add(&self, user_id: UserID, expense: NewExpense) -> Result<Expense, Error>;

    /// Retrieve one of the user's expenses.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if the user has no expense with `expense_id`.
    fn get(&self, user_id: UserID, expense_id: ExpenseId) -> Result<Expense, Error>;

    /// Retrieve all of the user's expenses in no particular order.
    fn list(&self, user_id: UserID) -> Result<Vec<Expense>, Error>;

    /// Apply `patch` to one of the user's expenses.
    ///
    /// # Errors
    /// - [Error::InvalidExpense] if the patch breaks a validation rule.
    /// - [Error::UpdateMissingExpense] if the user has no expense with `expense_id`.
    fn update(
        &self,
        user_id: UserID,
        expense_id: ExpenseId,
        patch: ExpensePatch,
    ) -> Result<Expense, Error>;

    /// Delete one of the user's expenses.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingExpense] if the user has no expense with `expense_id`.
    fn delete(&self, user_id: UserID, expense_id: ExpenseId) -> Result<(), Error>;

    /// Receive the user's full list of expenses now and after every change.
    fn subscribe(&self, user_id: UserID) -> Result<Subscription<Vec<Expense>>, Error>;
}

/// Stores the custom categories of each user.
pub trait CategoryStore: Send + Sync {
    /// Save a new custom category.
    fn add(&self, user_id: UserID, name: CategoryName) -> Result<CustomCategory, Error>;

    /// Delete one of the user's custom categories.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingCategory] if the user has no category with `category_id`.
    fn delete(&self, user_id: UserID, category_id: CategoryId) -> Result<(), Error>;

    /// The defaults merged with the user's custom categories.
    fn list(&self, user_id: UserID) -> Result<CategorySet, Error>;

    /// Receive the user's merged categories now and after every change.
    fn subscribe(&self, user_id: UserID) -> Result<Subscription<CategorySet>, Error>;
}
