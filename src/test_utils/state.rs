use std::sync::Arc;

use rusqlite::Connection;
use time::{Date, macros::date};

use crate::{
    AppState, PasswordHash,
    category::CategoryName,
    clock::FixedClock,
    expense::{Expense, NewExpense},
    report::ReportConfig,
    user::{UserID, create_user},
};

/// The date the fixed clock in [get_test_app_state] reports.
pub(crate) const TODAY: Date = date!(2024 - 03 - 15);

/// App state backed by an in-memory database with one registered user.
pub(crate) fn get_test_app_state() -> (AppState, UserID) {
    let state = AppState::new(
        Connection::open_in_memory().expect("Could not open in-memory SQLite database"),
        "foobar",
        Arc::new(FixedClock::on(TODAY)),
        ReportConfig::default(),
    )
    .expect("Could not create app state");

    let user = create_user(
        &"test@example.com".parse().expect("invalid email"),
        PasswordHash::new_unchecked("hunter2"),
        &state.db_connection.lock().expect("Could not lock database"),
    )
    .expect("Could not create test user");

    (state, user.id)
}

#[track_caller]
pub(crate) fn add_expense(
    state: &AppState,
    user_id: UserID,
    title: &str,
    amount: f64,
    category: &str,
    date: Date,
) -> Expense {
    let expense = NewExpense::new(
        title,
        Some(amount),
        CategoryName::new_unchecked(category),
        date,
        TODAY,
    )
    .expect("Could not validate test expense");

    state
        .expense_store
        .add(user_id, expense)
        .expect("Could not add test expense")
}
