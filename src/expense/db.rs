//! Database operations for expenses.

use rusqlite::{Connection, Row, types::ValueRef};
use time::OffsetDateTime;

use crate::{
    Error,
    expense::{Expense, ExpenseId, ExpensePatch, NewExpense, parse_iso_date},
    user::UserID,
};

const EXPENSE_COLUMNS: &str = "id, title, amount, category, date, created_at, updated_at";

/// Insert a validated expense for `user_id` and return the stored record.
pub fn insert_expense(
    user_id: UserID,
    expense: &NewExpense,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO expense (user_id, title, amount, category, date, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            RETURNING {EXPENSE_COLUMNS};"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                expense.title(),
                expense.amount(),
                expense.category().as_ref(),
                expense.date(),
                now,
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single expense owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the expense does not exist or belongs to another user.
pub fn get_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = ?1 AND user_id = ?2;"
        ))?
        .query_row((expense_id, user_id.as_i64()), map_row)
        .map_err(|error| error.into())
}

/// Retrieve every expense owned by `user_id`. The order is unspecified.
pub fn get_expenses(user_id: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE user_id = ?1;"
        ))?
        .query_map([user_id.as_i64()], map_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Apply `patch` to an expense and return the updated record.
///
/// # Errors
/// Returns [Error::UpdateMissingExpense] if the expense does not exist or belongs to another user.
pub fn update_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    patch: &ExpensePatch,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Expense, Error> {
    let result = connection
        .prepare(&format!(
            "UPDATE expense SET
                title = COALESCE(?1, title),
                amount = COALESCE(?2, amount),
                category = COALESCE(?3, category),
                date = COALESCE(?4, date),
                updated_at = ?5
            WHERE id = ?6 AND user_id = ?7
            RETURNING {EXPENSE_COLUMNS};"
        ))?
        .query_row(
            (
                patch.title_value(),
                patch.amount_value(),
                patch.category_value(),
                patch.date_value(),
                now,
                expense_id,
                user_id.as_i64(),
            ),
            map_row,
        );

    match result {
        Ok(expense) => Ok(expense),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::UpdateMissingExpense),
        Err(error) => Err(error.into()),
    }
}

/// Delete an expense.
///
/// # Errors
/// Returns [Error::DeleteMissingExpense] if the expense does not exist or belongs to another user.
pub fn delete_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
        (expense_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Initialize the expense table and indexes.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            amount REAL NOT NULL,
            category TEXT NOT NULL,
            date TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_date: Option<String> = row.get(4)?;
    let date = raw_date.as_deref().and_then(|raw_date| {
        let date = parse_iso_date(raw_date);

        if date.is_none() {
            tracing::warn!("Expense {id} has an unreadable date {raw_date:?}");
        }

        date
    });

    let amount = match row.get_ref(2)? {
        ValueRef::Real(amount) => amount,
        ValueRef::Integer(amount) => amount as f64,
        other => {
            tracing::warn!(
                "Expense {id} has an unreadable amount of type {}, counting it as 0",
                other.data_type()
            );
            0.0
        }
    };

    Ok(Expense {
        id,
        title: row.get(1)?,
        amount,
        category: row.get(3)?,
        date,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
