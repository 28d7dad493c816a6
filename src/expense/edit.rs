//! The page and endpoint for changing an existing expense.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::html;

use crate::{
    Error, endpoints,
    expense::{
        ExpenseId,
        form::{ExpenseForm, ExpenseFormState, FormAction, FormErrors, expense_form, patch_from},
    },
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles},
    navigation::NavBar,
    user::UserID,
};

/// Renders the page for editing one of the user's expenses.
pub async fn get_edit_expense_page(
    State(state): State<ExpenseFormState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    let expense = match state.expense_store.get(user_id, expense_id) {
        Ok(expense) => expense,
        Err(Error::NotFound) => return Error::NotFound.into_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve expense {expense_id}: {error}");
            return error.into_response();
        }
    };

    let categories = match state.category_store.list(user_id) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("Could not load the categories for user {user_id}: {error}");
            return error.into_response();
        }
    };

    let nav_bar = NavBar::new(endpoints::EDIT_EXPENSE_VIEW).into_html();
    let form = expense_form(
        FormAction::Update(expense_id),
        &ExpenseForm::from_expense(&expense),
        &FormErrors::default(),
        &categories,
        Some(&expense.category),
        state.clock.today(),
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Edit Expense" }

            (form)
        }
    };

    base(
        "Edit Expense",
        &[currency_input_styles(&state.currency_symbol)],
        &content,
    )
    .into_response()
}

/// A route handler for replacing the fields of an expense.
///
/// Uses the same rules as creating an expense, except that the expense may
/// keep a category that has since been deleted. On success the client is
/// redirected to the expenses page.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseFormState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let current = match state.expense_store.get(user_id, expense_id) {
        Ok(expense) => expense,
        Err(Error::NotFound) => return Error::UpdateMissingExpense.into_alert_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve expense {expense_id}: {error}");
            return error.into_alert_response();
        }
    };

    let categories = match state.category_store.list(user_id) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("Could not load the categories for user {user_id}: {error}");
            return error.into_alert_response();
        }
    };
    let today = state.clock.today();

    let expense = match form.parse(&categories, Some(&current.category), today) {
        Ok(expense) => expense,
        Err(errors) => {
            return expense_form(
                FormAction::Update(expense_id),
                &form,
                &errors,
                &categories,
                Some(&current.category),
                today,
            )
            .into_response();
        }
    };

    match state
        .expense_store
        .update(user_id, expense_id, patch_from(expense))
    {
        Ok(_) => (
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not update expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}
