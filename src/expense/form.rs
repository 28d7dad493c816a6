//! The form shared by the new and edit expense pages.

use std::sync::Arc;

use axum::extract::FromRef;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    category::{CategoryName, CategorySet},
    clock::Clock,
    endpoints::{self, format_endpoint},
    expense::{
        Expense, ExpenseCandidate, ExpenseId, ExpensePatch, NewExpense, ValidationError,
        check_date_not_in_future, parse_iso_date, validate,
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner},
    store::{CategoryStore, ExpenseStore},
};

/// The state needed by the pages and endpoints that create or edit expenses.
#[derive(Clone)]
pub struct ExpenseFormState {
    /// Where expenses are saved.
    pub expense_store: Arc<dyn ExpenseStore>,
    /// Where the user's categories are loaded from.
    pub category_store: Arc<dyn CategoryStore>,
    /// The source of today's date, the latest date an expense can have.
    pub clock: Arc<dyn Clock>,
    /// Shown inside the amount input.
    pub currency_symbol: String,
}

impl FromRef<AppState> for ExpenseFormState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_store: state.expense_store.clone(),
            category_store: state.category_store.clone(),
            clock: state.clock.clone(),
            currency_symbol: state.report_config.currency_symbol.clone(),
        }
    }
}

/// The values submitted by the expense form.
///
/// Everything is kept as text so that a rejected submission can be shown
/// back to the user exactly as they typed it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// What the money was spent on.
    pub title: String,
    /// The amount spent.
    pub amount: String,
    /// The name of the chosen category.
    pub category: String,
    /// The date in ISO 8601 format.
    pub date: String,
}

impl ExpenseForm {
    /// Prefill the form with today's date.
    pub(crate) fn blank(today: Date) -> Self {
        Self {
            date: today.to_string(),
            ..Default::default()
        }
    }

    /// Prefill the form with an existing expense.
    pub(crate) fn from_expense(expense: &Expense) -> Self {
        Self {
            title: expense.title.clone(),
            amount: format!("{:.2}", expense.amount),
            category: expense.category.clone(),
            date: expense.date.map(|date| date.to_string()).unwrap_or_default(),
        }
    }

    /// Check the submitted values against `categories` and the expense rules.
    ///
    /// The category name is replaced with the spelling used in `categories`.
    /// `current_category` is the label the expense already has. It is accepted
    /// as is even after its category was deleted.
    pub(crate) fn parse(
        &self,
        categories: &CategorySet,
        current_category: Option<&str>,
        today: Date,
    ) -> Result<NewExpense, FormErrors> {
        let mut errors = FormErrors::default();

        let amount = self.amount.trim().parse::<f64>().ok();
        if let Err(error) = validate(&ExpenseCandidate {
            title: &self.title,
            amount,
        }) {
            errors.add(error);
        }

        let date = parse_iso_date(&self.date);
        match date {
            Some(date) => {
                if let Err(error) = check_date_not_in_future(date, today) {
                    errors.add(error);
                }
            }
            None => errors.date = Some("Please enter a valid date".to_owned()),
        }

        let category = match categories.find(&self.category) {
            Some(category) => Some(CategoryName::new_unchecked(category.name())),
            None if self.category.trim().is_empty() => {
                errors.category = Some("Please choose a category".to_owned());
                None
            }
            None if current_category == Some(self.category.trim()) => {
                Some(CategoryName::new_unchecked(self.category.trim()))
            }
            None => {
                errors.category =
                    Some(Error::UnknownCategory(self.category.trim().to_owned()).to_string());
                None
            }
        };

        match (category, date) {
            (Some(category), Some(date)) if errors.is_empty() => {
                NewExpense::new(&self.title, amount, category, date, today).map_err(|error| {
                    let mut errors = FormErrors::default();
                    errors.add(error);
                    errors
                })
            }
            _ => Err(errors),
        }
    }
}

/// Turn a validated form into a patch that replaces every editable field.
pub(crate) fn patch_from(expense: NewExpense) -> ExpensePatch {
    ExpensePatch::default()
        .title(expense.title())
        .amount(expense.amount())
        .category(expense.category().clone())
        .date(expense.date())
}

/// Messages shown under the form fields that were rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FormErrors {
    pub title: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

impl FormErrors {
    fn add(&mut self, error: ValidationError) {
        let message = Some(error.to_string());

        match error {
            ValidationError::EmptyTitle => self.title = message,
            ValidationError::InvalidAmount => self.amount = message,
            ValidationError::FutureDate(_) => self.date = message,
        }
    }

    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }
}

/// Whether the form creates a new expense or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormAction {
    Create,
    Update(ExpenseId),
}

fn field_error(message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p class="text-red-500 text-base" { (message) }
        }
    }
}

/// Render the expense form.
///
/// The form replaces itself when the server rejects the input, and alerts
/// from other failures are shown in the page's alert container.
/// A `current_category` missing from `categories` is offered as an extra option.
pub(crate) fn expense_form(
    action: FormAction,
    values: &ExpenseForm,
    errors: &FormErrors,
    categories: &CategorySet,
    current_category: Option<&str>,
    max_date: Date,
) -> Markup {
    let (hx_post, hx_put, submit_label) = match action {
        FormAction::Create => (Some(endpoints::EXPENSES_API.to_owned()), None, "Add Expense"),
        FormAction::Update(expense_id) => (
            None,
            Some(format_endpoint(endpoints::EXPENSE, expense_id)),
            "Save Changes",
        ),
    };
    let selected = categories.find(&values.category).map(|category| category.name());
    let removed_category = current_category
        .filter(|name| !name.trim().is_empty() && categories.find(name).is_none());

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="title" class=(FORM_LABEL_STYLE) { "Title" }

                input
                    name="title"
                    id="title"
                    type="text"
                    placeholder="Coffee with friends"
                    required
                    autofocus
                    value=(values.title)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors.title.as_deref()))
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                // w-full needed to ensure input takes the full width when prefilled with a value
                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        required
                        value=(values.amount)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (field_error(errors.amount.as_deref()))
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select
                    name="category"
                    id="category"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Select a category" }

                    @for category in categories.iter() {
                        option
                            value=(category.name())
                            selected[selected == Some(category.name())]
                        {
                            @if let Some(icon) = category.icon() {
                                (icon) " "
                            }
                            (category.name())
                        }
                    }

                    @if let Some(name) = removed_category {
                        option
                            value=(name)
                            selected[values.category.trim() == name]
                        {
                            (name) " (removed)"
                        }
                    }
                }

                (field_error(errors.category.as_deref()))
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    max=(max_date)
                    required
                    value=(values.date)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors.date.as_deref()))
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                " " (submit_label)
            }
        }
    }
}
