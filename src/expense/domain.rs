//! The expense record and the values used to create and modify one.

use serde::Serialize;
use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    category::CategoryName,
    expense::validation::{ExpenseCandidate, ValidationError, check_date_not_in_future, validate},
};

/// Database identifier for an expense.
pub type ExpenseId = i64;

const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// A single spending event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// The expense's ID in the application database.
    pub id: ExpenseId,
    /// A short description of what the money was spent on.
    pub title: String,
    /// How much was spent. Positive for any expense created through [NewExpense].
    pub amount: f64,
    /// The name of the category the expense belongs to.
    pub category: String,
    /// The calendar date the money was spent.
    ///
    /// `None` when the stored date could not be read as a calendar date.
    /// Such expenses only show up when no date range is applied.
    pub date: Option<Date>,
    /// When the expense was first recorded.
    pub created_at: OffsetDateTime,
    /// When the expense was last changed.
    pub updated_at: OffsetDateTime,
}

/// A validated expense that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    title: String,
    amount: f64,
    category: CategoryName,
    date: Date,
}

impl NewExpense {
    /// Validate the fields of a new expense.
    ///
    /// The title is trimmed before it is stored.
    ///
    /// # Errors
    /// Returns a [ValidationError] if the title is blank, the amount is missing,
    /// not positive or not finite, or `date` is after `today`.
    pub fn new(
        title: &str,
        amount: Option<f64>,
        category: CategoryName,
        date: Date,
        today: Date,
    ) -> Result<Self, ValidationError> {
        validate(&ExpenseCandidate { title, amount })?;
        check_date_not_in_future(date, today)?;

        Ok(Self {
            title: title.trim().to_owned(),
            amount: amount.unwrap_or_default(),
            category,
            date,
        })
    }

    /// The trimmed title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The amount spent.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The category name.
    pub fn category(&self) -> &CategoryName {
        &self.category
    }

    /// The date the money was spent.
    pub fn date(&self) -> Date {
        self.date
    }
}

/// A partial update to an existing expense. Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    title: Option<String>,
    amount: Option<f64>,
    category: Option<CategoryName>,
    date: Option<Date>,
}

impl ExpensePatch {
    /// Replace the title. Checked by [ExpensePatch::validate].
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.trim().to_owned());
        self
    }

    /// Replace the amount. Checked by [ExpensePatch::validate].
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Replace the category.
    pub fn category(mut self, category: CategoryName) -> Self {
        self.category = Some(category);
        self
    }

    /// Replace the date. Checked by [ExpensePatch::validate].
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Apply the same rules as [NewExpense::new] to the fields being replaced.
    ///
    /// # Errors
    /// Returns the first [ValidationError] found.
    pub fn validate(&self, today: Date) -> Result<(), ValidationError> {
        if self.title.as_deref().is_some_and(str::is_empty) {
            return Err(ValidationError::EmptyTitle);
        }

        if let Some(amount) = self.amount {
            validate(&ExpenseCandidate {
                title: "-",
                amount: Some(amount),
            })?;
        }

        if let Some(date) = self.date {
            check_date_not_in_future(date, today)?;
        }

        Ok(())
    }

    pub(crate) fn title_value(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub(crate) fn amount_value(&self) -> Option<f64> {
        self.amount
    }

    pub(crate) fn category_value(&self) -> Option<&str> {
        self.category.as_ref().map(AsRef::as_ref)
    }

    pub(crate) fn date_value(&self) -> Option<Date> {
        self.date
    }
}

/// Parse a date in ISO 8601 format, e.g. "2024-01-31".
///
/// Returns `None` for empty or malformed strings and impossible dates such as "2024-02-30".
pub fn parse_iso_date(text: &str) -> Option<Date> {
    Date::parse(text.trim(), ISO_DATE_FORMAT).ok()
}
