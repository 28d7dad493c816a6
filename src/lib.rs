//! A web app for recording personal expenses and seeing where the money goes.
//!
//! The server renders HTML pages directly. Expenses are validated, filtered by
//! a date range, aggregated into totals, category breakdowns and monthly
//! trends, and shown on a dashboard that updates live as expenses change.
//! Reports can be downloaded as CSV or opened as a printable page.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod category;
mod clock;
mod dashboard;
mod db;
mod endpoints;
mod error;
mod export;
mod expense;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod password;
mod range;
mod report;
mod routing;
mod store;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use category::CategoryName;
pub use clock::{Clock, SystemClock};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use expense::NewExpense;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use password::{PasswordHash, ValidatedPassword};
pub use report::{DEFAULT_CURRENCY_SYMBOL, InsightThresholds, ReportConfig};
pub use routing::build_router;
pub use store::{CategoryStore, ExpenseStore};
pub use user::{User, UserID, create_user, get_user_by_email, get_user_by_id, update_password};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for the Ctrl+C signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
