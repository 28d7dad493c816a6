use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{AppState, expense::ExpenseId, store::ExpenseStore, user::UserID};

/// The state needed to delete an expense.
#[derive(Clone)]
pub struct DeleteExpenseState {
    expense_store: Arc<dyn ExpenseStore>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_store: state.expense_store.clone(),
        }
    }
}

/// A route handler for deleting an expense, responds with an alert on failure.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    match state.expense_store.delete(user_id, expense_id) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("Could not delete expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}
