//! The page and endpoint for recording a new expense.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use time::Date;

use crate::{
    category::CategorySet,
    endpoints,
    expense::form::{ExpenseForm, ExpenseFormState, FormAction, FormErrors, expense_form},
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles},
    navigation::NavBar,
    user::UserID,
};

fn new_expense_view(categories: &CategorySet, today: Date, currency_symbol: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_EXPENSE_VIEW).into_html();
    let form = expense_form(
        FormAction::Create,
        &ExpenseForm::blank(today),
        &FormErrors::default(),
        categories,
        None,
        today,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "New Expense" }

            (form)
        }
    };

    base(
        "New Expense",
        &[currency_input_styles(currency_symbol)],
        &content,
    )
}

/// Renders the page for recording a new expense.
pub async fn get_new_expense_page(
    State(state): State<ExpenseFormState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    match state.category_store.list(user_id) {
        Ok(categories) => {
            new_expense_view(&categories, state.clock.today(), &state.currency_symbol)
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not load the categories for user {user_id}: {error}");
            error.into_response()
        }
    }
}

/// A route handler for creating a new expense.
///
/// Rejected input re-renders the form with a message under each offending
/// field. On success the client is redirected to the expenses page.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseFormState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let categories = match state.category_store.list(user_id) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("Could not load the categories for user {user_id}: {error}");
            return error.into_alert_response();
        }
    };
    let today = state.clock.today();

    let expense = match form.parse(&categories, None, today) {
        Ok(expense) => expense,
        Err(errors) => {
            return expense_form(FormAction::Create, &form, &errors, &categories, None, today)
                .into_response();
        }
    };

    match state.expense_store.add(user_id, expense) {
        Ok(expense) => {
            tracing::debug!("User {user_id} added expense {}", expense.id);
            (
                HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not save an expense for user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}
