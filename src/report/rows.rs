//! Display rows for tables and exports.

use serde::Serialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{expense::Expense, report::currency::format_amount};

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day], [year]");

/// An expense formatted for display, one string per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    /// The date like "Jan 05, 2024", or empty when the expense has no usable date.
    pub date: String,
    /// The category name.
    pub category: String,
    /// The title, unchanged. Sinks handle quoting.
    pub title: String,
    /// The amount with two decimal places and no currency symbol.
    pub amount: String,
}

/// Format each expense as an [ExportRow], keeping the input order.
pub fn export_rows(expenses: &[Expense]) -> Vec<ExportRow> {
    expenses
        .iter()
        .map(|expense| ExportRow {
            date: expense.date.map(format_display_date).unwrap_or_default(),
            category: expense.category.clone(),
            title: expense.title.clone(),
            amount: format_amount(expense.amount),
        })
        .collect()
}

/// Format a date like "Jan 05, 2024".
pub fn format_display_date(date: Date) -> String {
    date.format(DISPLAY_DATE_FORMAT).unwrap_or_else(|error| {
        tracing::warn!("Could not format {date}: {error}");
        date.to_string()
    })
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        expense::test_utils::{expense, undated_expense},
        report::{ExportRow, export_rows, format_display_date},
    };

    #[test]
    fn formats_each_column() {
        let rows = export_rows(&[expense(
            1,
            "Dinner, with friends",
            45.5,
            "Food",
            date!(2024 - 01 - 05),
        )]);

        assert_eq!(
            rows,
            vec![ExportRow {
                date: "Jan 05, 2024".to_owned(),
                category: "Food".to_owned(),
                title: "Dinner, with friends".to_owned(),
                amount: "45.50".to_owned(),
            }]
        );
    }

    #[test]
    fn undated_expense_has_empty_date() {
        let rows = export_rows(&[undated_expense(1, "Mystery", 3.0, "Other")]);

        assert_eq!(rows[0].date, "");
    }

    #[test]
    fn keeps_input_order() {
        let rows = export_rows(&[
            expense(2, "B", 1.0, "Food", date!(2024 - 01 - 01)),
            expense(1, "A", 1.0, "Food", date!(2024 - 02 - 01)),
        ]);

        let titles: Vec<_> = rows.iter().map(|row| row.title.as_str()).collect();

        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn display_date_pads_day() {
        assert_eq!(format_display_date(date!(2023 - 12 - 25)), "Dec 25, 2023");
        assert_eq!(format_display_date(date!(2024 - 03 - 01)), "Mar 01, 2024");
    }
}
