//! Sinks that turn a filtered list of expenses into something the user can take away.

mod csv;
mod printable;

pub(crate) use csv::export_csv_endpoint;
pub use csv::write_csv;
pub use printable::{PagedReport, ReportPage, ROWS_PER_PAGE, build_paged_report};
pub(crate) use printable::get_printable_report_page;

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{AppState, clock::Clock, store::ExpenseStore};

/// The state needed by the export endpoints.
#[derive(Clone)]
pub struct ExportState {
    expense_store: Arc<dyn ExpenseStore>,
    clock: Arc<dyn Clock>,
    currency_symbol: String,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_store: state.expense_store.clone(),
            clock: state.clock.clone(),
            currency_symbol: state.report_config.currency_symbol.clone(),
        }
    }
}
