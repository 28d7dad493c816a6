//! The dashboard page: range selector, summary, insights, breakdown and charts.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};
use time::Date;

use crate::{
    AppState, Error,
    category::CategorySet,
    clock::Clock,
    dashboard::{
        cards::{SUMMARY_ID, summary_section},
        charts::{charts_script, charts_view, dashboard_charts},
        live::{CHARTS_EVENT, REPORT_EVENT},
        report::{DashboardReport, build_dashboard_report},
    },
    endpoints::{self, with_query},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, base, link,
    },
    navigation::NavBar,
    range::{RangePreset, RangeQuery, RangeSpec},
    report::ReportConfig,
    store::{CategoryStore, ExpenseStore},
    user::UserID,
};

/// The state needed for the dashboard page and its live stream.
#[derive(Clone)]
pub struct DashboardState {
    pub(super) expense_store: Arc<dyn ExpenseStore>,
    pub(super) category_store: Arc<dyn CategoryStore>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) report_config: ReportConfig,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_store: state.expense_store.clone(),
            category_store: state.category_store.clone(),
            clock: state.clock.clone(),
            report_config: state.report_config.clone(),
        }
    }
}

/// Display a page with an overview of the user's spending in a date range.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<RangeQuery>,
) -> Result<Response, Error> {
    let expenses = state
        .expense_store
        .list(user_id)
        .inspect_err(|error| tracing::error!("could not get expenses for user {user_id}: {error}"))?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if expenses.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let categories = state
        .category_store
        .list(user_id)
        .inspect_err(|error| tracing::error!("could not get categories for user {user_id}: {error}"))?;

    let range = query.to_spec();
    let report = build_dashboard_report(
        &expenses,
        &range,
        &categories,
        state.clock.as_ref(),
        &state.report_config.insight_thresholds,
    );

    Ok(dashboard_view(
        nav_bar,
        &report,
        &categories,
        state.clock.today(),
        &state.report_config.currency_symbol,
    )
    .into_response())
}

/// Renders the dashboard page when the user has not recorded any expenses.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_expense_link = link(endpoints::NEW_EXPENSE_VIEW, "adding an expense");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Your spending summary and charts will show up here. Start by "
                (new_expense_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn range_selector(range: &RangeSpec, today: Date) -> Markup {
    let (start, end) = match range {
        RangeSpec::Custom { start, end } => (Some(*start), Some(*end)),
        _ => (None, None),
    };
    let preset = range.preset();

    html! {
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="grid grid-cols-1 sm:grid-cols-4 gap-4 items-end w-full mb-6"
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
                input type="date" name="start" id="start" max=(today)
                    value=[start] class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end" class=(FORM_LABEL_STYLE) { "To" }
                input type="date" name="end" id="end" value=[end] class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
        }
    }
}

/// Opens the live stream, swaps in each summary the server pushes and merges
/// the new chart values into the charts drawn on page load.
fn live_update_script(stream_url: &str) -> HeadElement {
    let url = serde_json::to_string(stream_url).unwrap_or_else(|_| "\"\"".to_owned());

    HeadElement::ScriptSource(PreEscaped(format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const source = new EventSource({url});
            source.addEventListener('{REPORT_EVENT}', (event) => {{
                const summary = document.getElementById("{SUMMARY_ID}");
                if (summary) {{
                    summary.outerHTML = event.data;
                }}
            }});
            source.addEventListener('{CHARTS_EVENT}', (event) => {{
                if (typeof echarts === 'undefined') {{
                    return;
                }}
                const updates = JSON.parse(event.data);
                for (const [id, option] of Object.entries(updates)) {{
                    const element = document.getElementById(id);
                    const chart = element && echarts.getInstanceByDom(element);
                    if (chart) {{
                        chart.setOption(option);
                    }}
                }}
            }});
            window.addEventListener('beforeunload', () => source.close());
        }});"#
    )))
}

fn dashboard_view(
    nav_bar: NavBar,
    report: &DashboardReport,
    categories: &CategorySet,
    today: Date,
    currency_symbol: &str,
) -> Markup {
    let nav_bar = nav_bar.into_html();
    let range_query = report.range.to_query_string();
    let charts = dashboard_charts(
        &report.category_series,
        &report.monthly_series,
        currency_symbol,
    );
    let has_charts = !(report.category_series.is_empty() && report.monthly_series.is_empty());

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            header class="w-full mb-4"
            {
                h1 class="text-xl font-bold" { "Dashboard" }
                p id="range-description" class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (report.range_label)
                }
            }

            (range_selector(&report.range, today))

            (summary_section(report, categories, currency_symbol))

            @if has_charts {
                (charts_view(&charts))
            } @else {
                p id="charts-empty" class="text-gray-600 dark:text-gray-400 mb-8"
                {
                    "No spending to chart in this range."
                }
            }
        }
    );

    let mut scripts = vec![live_update_script(&with_query(
        endpoints::DASHBOARD_STREAM,
        &range_query,
    ))];
    if has_charts {
        scripts.push(HeadElement::ScriptLink(
            "/static/echarts.6.0.0.min.js".to_owned(),
        ));
        scripts.push(charts_script(&charts));
    }

    base("Dashboard", &scripts, &content)
}
