//! The page listing a user's expenses for a date range, with sorting and export links.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    category::CategorySet,
    clock::Clock,
    endpoints::{self, format_endpoint, with_query},
    expense::{Expense, SortKey, SortOrder, sort_expenses},
    html::{
        BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, truncate_text,
    },
    navigation::NavBar,
    range::{RangePreset, RangeQuery, RangeSpec, filter_by_range},
    report::{format_currency, format_display_date, total},
    store::{CategoryStore, ExpenseStore},
    user::UserID,
};

const TITLE_MAX_GRAPHEMES: usize = 48;

/// The state needed for the expenses page.
#[derive(Clone)]
pub struct ExpensesPageState {
    expense_store: Arc<dyn ExpenseStore>,
    category_store: Arc<dyn CategoryStore>,
    clock: Arc<dyn Clock>,
    currency_symbol: String,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_store: state.expense_store.clone(),
            category_store: state.category_store.clone(),
            clock: state.clock.clone(),
            currency_symbol: state.report_config.currency_symbol.clone(),
        }
    }
}

/// The query parameters for the expenses page.
#[derive(Debug, Default, Deserialize)]
pub struct ExpensesQuery {
    /// The date range preset.
    pub range: Option<RangePreset>,
    /// The start of a custom range.
    pub start: Option<String>,
    /// The end of a custom range.
    pub end: Option<String>,
    /// The column to sort by.
    pub sort: Option<SortKey>,
    /// The sort direction.
    pub order: Option<SortOrder>,
}

impl ExpensesQuery {
    fn range_spec(&self) -> RangeSpec {
        RangeQuery {
            range: self.range,
            start: self.start.clone(),
            end: self.end.clone(),
        }
        .to_spec()
    }
}

/// Render the user's expenses in the requested range and order.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ExpensesQuery>,
) -> Result<Response, Error> {
    let expenses = state
        .expense_store
        .list(user_id)
        .inspect_err(|error| tracing::error!("could not get expenses for user {user_id}: {error}"))?;
    let categories = state
        .category_store
        .list(user_id)
        .inspect_err(|error| tracing::error!("could not get categories for user {user_id}: {error}"))?;

    let range = query.range_spec();
    let sort = query.sort.unwrap_or_default();
    let order = query.order.unwrap_or_default();

    let mut expenses = filter_by_range(&expenses, &range, state.clock.as_ref());
    sort_expenses(&mut expenses, sort, order);

    Ok(expenses_view(&ExpensesViewModel {
        expenses: &expenses,
        categories: &categories,
        range,
        sort,
        order,
        today: state.clock.today(),
        currency_symbol: &state.currency_symbol,
    })
    .into_response())
}

struct ExpensesViewModel<'a> {
    expenses: &'a [Expense],
    categories: &'a CategorySet,
    range: RangeSpec,
    sort: SortKey,
    order: SortOrder,
    today: Date,
    currency_symbol: &'a str,
}

fn sort_url(range: &RangeSpec, sort: SortKey, order: SortOrder) -> String {
    let query = format!(
        "{}&sort={}&order={}",
        range.to_query_string(),
        sort.as_query_value(),
        order.as_query_value()
    );

    with_query(endpoints::EXPENSES_VIEW, &query)
}

fn column_header(model: &ExpensesViewModel, key: SortKey) -> Markup {
    let is_current = model.sort == key;
    let order = if is_current {
        model.order.reversed()
    } else {
        SortOrder::default()
    };
    let arrow = match (is_current, model.order) {
        (false, _) => "",
        (true, SortOrder::Ascending) => " ▲",
        (true, SortOrder::Descending) => " ▼",
    };

    html! {
        th scope="col" class=(TABLE_CELL_STYLE)
            aria-sort=[is_current.then_some(match model.order {
                SortOrder::Ascending => "ascending",
                SortOrder::Descending => "descending",
            })]
        {
            a href=(sort_url(&model.range, key, order)) { (key.label()) (arrow) }
        }
    }
}

fn range_form(model: &ExpensesViewModel) -> Markup {
    let (start, end) = match model.range {
        RangeSpec::Custom { start, end } => (Some(start), Some(end)),
        _ => (None, None),
    };
    let preset = model.range.preset();

    html! {
        form
            method="get"
            action=(endpoints::EXPENSES_VIEW)
            class="grid grid-cols-2 lg:grid-cols-6 gap-4 items-end w-full"
        {
            div
            {
                label for="range" class=(FORM_LABEL_STYLE) { "Range" }
                select name="range" id="range" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for option in RangePreset::ALL {
                        option value=(option.as_query_value()) selected[option == preset]
                        {
                            (option.label())
                        }
                    }
                }
            }

            div
            {
                label for="start" class=(FORM_LABEL_STYLE) { "From" }
                input type="date" name="start" id="start" max=(model.today)
                    value=[start] class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end" class=(FORM_LABEL_STYLE) { "To" }
                input type="date" name="end" id="end" value=[end] class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="sort" class=(FORM_LABEL_STYLE) { "Sort by" }
                select name="sort" id="sort" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for key in [SortKey::Date, SortKey::Amount, SortKey::Category, SortKey::Title] {
                        option value=(key.as_query_value()) selected[key == model.sort]
                        {
                            (key.label())
                        }
                    }
                }
            }

            div
            {
                label for="order" class=(FORM_LABEL_STYLE) { "Order" }
                select name="order" id="order" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(SortOrder::Descending.as_query_value())
                        selected[model.order == SortOrder::Descending] { "Descending" }
                    option value=(SortOrder::Ascending.as_query_value())
                        selected[model.order == SortOrder::Ascending] { "Ascending" }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
        }
    }
}

fn expense_row(expense: &Expense, categories: &CategorySet, currency_symbol: &str) -> Markup {
    let confirm_message = format!(
        "Are you sure you want to delete the expense '{}'? This cannot be undone.",
        expense.title
    );
    let title = truncate_text(&expense.title, TITLE_MAX_GRAPHEMES);
    let tooltip = (title != expense.title).then_some(expense.title.as_str());

    html! {
        tr class=(TABLE_ROW_STYLE) data-expense-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                @match expense.date {
                    Some(date) => {
                        time datetime=(date) { (format_display_date(date)) }
                    }
                    None => {
                        span class="text-gray-400 dark:text-gray-500" { "No date" }
                    }
                }
            }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (title) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE)
                {
                    @if let Some(icon) = categories.icon_for(&expense.category) {
                        (icon) " "
                    }
                    (expense.category)
                }
            }
            td class="px-6 py-4 text-right tabular-nums"
            {
                (format_currency(expense.amount, currency_symbol))
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &format_endpoint(endpoints::EDIT_EXPENSE_VIEW, expense.id),
                        &format_endpoint(endpoints::EXPENSE, expense.id),
                        &confirm_message,
                        "closest tr",
                        "delete",
                    ))
                }
            }
        }
    }
}

fn expenses_view(model: &ExpensesViewModel) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let range_query = model.range.to_query_string();
    let count = model.expenses.len();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-screen-xl space-y-6"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Expenses" }
                        p class="text-sm text-gray-500 dark:text-gray-400" id="range-description"
                        {
                            (model.range.describe(model.today))
                        }
                    }

                    div class="flex gap-4"
                    {
                        a href=(with_query(endpoints::EXPORT_CSV, &range_query)) class=(LINK_STYLE)
                            id="export-csv"
                        {
                            "Download CSV"
                        }
                        a href=(with_query(endpoints::PRINTABLE_REPORT_VIEW, &range_query))
                            class=(LINK_STYLE) id="export-print"
                        {
                            "Printable report"
                        }
                        a href=(endpoints::NEW_EXPENSE_VIEW) class=(LINK_STYLE) { "Add Expense" }
                    }
                }

                (range_form(model))

                p id="expenses-summary"
                {
                    (count) @if count == 1 { " expense" } @else { " expenses" }
                    " totalling "
                    span class="font-semibold" { (format_currency(total(model.expenses), model.currency_symbol)) }
                }

                div class="relative overflow-x-auto shadow-md rounded-lg"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                (column_header(model, SortKey::Date))
                                (column_header(model, SortKey::Title))
                                (column_header(model, SortKey::Category))
                                (column_header(model, SortKey::Amount))
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for expense in model.expenses {
                                (expense_row(expense, model.categories, model.currency_symbol))
                            }

                            @if model.expenses.is_empty() {
                                tr class=(TABLE_ROW_STYLE) data-empty-state="true"
                                {
                                    td colspan="5" class="px-6 py-4 text-center"
                                    {
                                        "No expenses in this range. "
                                        a href=(endpoints::NEW_EXPENSE_VIEW) class=(LINK_STYLE)
                                        {
                                            "Add one"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Expenses", &[], &content)
}
