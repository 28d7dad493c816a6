//! Expense records: the domain type, validation, ordering, storage and the pages for managing them.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list_page;
mod sort;
mod validation;

#[cfg(test)]
pub(crate) mod test_utils;

pub(crate) use create::{create_expense_endpoint, get_new_expense_page};
pub(crate) use db::{
    create_expense_table, delete_expense, get_expense, get_expenses, insert_expense,
    update_expense,
};
pub(crate) use delete::delete_expense_endpoint;
pub use domain::{Expense, ExpenseId, ExpensePatch, NewExpense, parse_iso_date};
pub(crate) use edit::{get_edit_expense_page, update_expense_endpoint};
pub(crate) use list_page::get_expenses_page;
pub use sort::{SortKey, SortOrder, sort_by_date_descending, sort_expenses};
pub use validation::{ExpenseCandidate, ValidationError, check_date_not_in_future, validate};
