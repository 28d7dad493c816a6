//! Sets up the application's database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{category::create_category_table, expense::create_expense_table, user::create_user_table};

/// Create the tables for users, categories and expenses if they do not exist.
///
/// Foreign key checks are switched on for `connection`, so deleting a user
/// also deletes their categories and expenses.
///
/// # Errors
///
/// Returns an error if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
