//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error,
    auth::DEFAULT_COOKIE_DURATION,
    clock::Clock,
    db::initialize,
    report::ReportConfig,
    store::{CategoryStore, ExpenseStore, SQLiteCategoryStore, SQLiteExpenseStore},
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The source of the current date for range presets and future-date checks.
    pub clock: Arc<dyn Clock>,

    /// The currency symbol and insight thresholds used when rendering reports.
    pub report_config: ReportConfig,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// Every user's expenses.
    pub expense_store: Arc<dyn ExpenseStore>,

    /// Every user's custom categories.
    pub category_store: Arc<dyn CategoryStore>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        clock: Arc<dyn Clock>,
        report_config: ReportConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));
        let expense_store = SQLiteExpenseStore::new(connection.clone(), clock.clone());
        let category_store = SQLiteCategoryStore::new(connection.clone(), clock.clone());

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            clock,
            report_config,
            db_connection: connection,
            expense_store: Arc::new(expense_store),
            category_store: Arc::new(category_store),
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
