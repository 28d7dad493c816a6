//! Orderings for lists of expenses.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::expense::Expense;

/// The field to sort expenses by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// The date the money was spent, then when the expense was recorded.
    #[default]
    Date,
    /// The amount spent.
    Amount,
    /// The category name, ignoring case.
    Category,
    /// The title, ignoring case.
    Title,
}

/// The direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Smallest, earliest or alphabetically first at the top.
    Ascending,
    /// Largest, latest or alphabetically last at the top.
    #[default]
    Descending,
}

impl SortKey {
    /// The value used for the `sort` query parameter.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Title => "title",
        }
    }

    /// The column heading for the key.
    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Amount => "Amount",
            Self::Category => "Category",
            Self::Title => "Title",
        }
    }
}

impl SortOrder {
    /// The value used for the `order` query parameter.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Sort `expenses` in place.
///
/// Ties are broken by creation time and then ID in the same direction as
/// `order`, so the result is deterministic. Expenses without a date sort
/// before every dated expense in ascending order.
pub fn sort_expenses(expenses: &mut [Expense], key: SortKey, order: SortOrder) {
    expenses.sort_by(|a, b| {
        let ordering = compare_by_key(a, b, key)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id));

        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

/// Sort newest first, the default order for expense lists.
pub fn sort_by_date_descending(expenses: &mut [Expense]) {
    sort_expenses(expenses, SortKey::Date, SortOrder::Descending);
}

fn compare_by_key(a: &Expense, b: &Expense, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Amount => a.amount.total_cmp(&b.amount),
        SortKey::Category => compare_ignoring_case(&a.category, &b.category),
        SortKey::Title => compare_ignoring_case(&a.title, &b.title),
    }
}

fn compare_ignoring_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::expense::{
        Expense, SortKey, SortOrder, sort_by_date_descending, sort_expenses,
        test_utils::{expense, undated_expense},
    };

    fn ids(expenses: &[Expense]) -> Vec<i64> {
        expenses.iter().map(|expense| expense.id).collect()
    }

    #[test]
    fn newest_first_by_default() {
        let mut expenses = vec![
            expense(1, "Coffee", 4.5, "Food", date!(2024 - 01 - 10)),
            expense(2, "Bus", 2.0, "Transport", date!(2024 - 01 - 12)),
            expense(3, "Movie", 15.0, "Entertainment", date!(2024 - 01 - 11)),
        ];

        sort_by_date_descending(&mut expenses);

        assert_eq!(ids(&expenses), vec![2, 3, 1]);
    }

    #[test]
    fn same_date_ties_break_on_creation_time() {
        let mut expenses = vec![
            expense(1, "First", 1.0, "Food", date!(2024 - 01 - 10)),
            expense(2, "Second", 1.0, "Food", date!(2024 - 01 - 10)),
        ];

        sort_by_date_descending(&mut expenses);
        assert_eq!(ids(&expenses), vec![2, 1]);

        sort_expenses(&mut expenses, SortKey::Date, SortOrder::Ascending);
        assert_eq!(ids(&expenses), vec![1, 2]);
    }

    #[test]
    fn sorts_by_amount() {
        let mut expenses = vec![
            expense(1, "A", 10.0, "Food", date!(2024 - 01 - 10)),
            expense(2, "B", 2.5, "Food", date!(2024 - 01 - 10)),
            expense(3, "C", 99.99, "Food", date!(2024 - 01 - 10)),
        ];

        sort_expenses(&mut expenses, SortKey::Amount, SortOrder::Descending);

        assert_eq!(ids(&expenses), vec![3, 1, 2]);
    }

    #[test]
    fn sorts_text_ignoring_case() {
        let mut expenses = vec![
            expense(1, "banana", 1.0, "Food", date!(2024 - 01 - 10)),
            expense(2, "Apple", 1.0, "rent", date!(2024 - 01 - 10)),
            expense(3, "cherry", 1.0, "Entertainment", date!(2024 - 01 - 10)),
        ];

        sort_expenses(&mut expenses, SortKey::Title, SortOrder::Ascending);
        assert_eq!(ids(&expenses), vec![2, 1, 3]);

        sort_expenses(&mut expenses, SortKey::Category, SortOrder::Ascending);
        assert_eq!(ids(&expenses), vec![3, 1, 2]);
    }

    #[test]
    fn undated_expenses_sort_last_when_newest_first() {
        let mut expenses = vec![
            undated_expense(1, "Unknown", 1.0, "Food"),
            expense(2, "Known", 1.0, "Food", date!(2024 - 01 - 10)),
        ];

        sort_by_date_descending(&mut expenses);

        assert_eq!(ids(&expenses), vec![2, 1]);
    }

    #[test]
    fn parses_query_values() {
        #[derive(serde::Deserialize)]
        struct Query {
            sort: SortKey,
            order: SortOrder,
        }

        let query: Query =
            serde_html_form::from_str("sort=amount&order=ascending").expect("could not parse");

        assert_eq!(query.sort, SortKey::Amount);
        assert_eq!(query.order, SortOrder::Ascending);
    }
}
