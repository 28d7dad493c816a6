use time::{Date, Duration, OffsetDateTime, macros::datetime};

use crate::expense::{Expense, ExpenseId};

fn created_at(id: ExpenseId) -> OffsetDateTime {
    datetime!(2024-01-01 00:00 UTC) + Duration::seconds(id)
}

/// An expense with the creation time derived from `id`, so higher IDs were created later.
pub(crate) fn expense(id: ExpenseId, title: &str, amount: f64, category: &str, date: Date) -> Expense {
    Expense {
        id,
        title: title.to_owned(),
        amount,
        category: category.to_owned(),
        date: Some(date),
        created_at: created_at(id),
        updated_at: created_at(id),
    }
}

/// An expense whose stored date could not be read.
pub(crate) fn undated_expense(id: ExpenseId, title: &str, amount: f64, category: &str) -> Expense {
    Expense {
        id,
        title: title.to_owned(),
        amount,
        category: category.to_owned(),
        date: None,
        created_at: created_at(id),
        updated_at: created_at(id),
    }
}
