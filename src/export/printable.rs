//! A paginated, print-ready report that the browser can save as a PDF.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, PreEscaped, html};
use time::Date;

use crate::{
    Error,
    endpoints::{self, with_query},
    expense::{Expense, sort_by_date_descending},
    export::ExportState,
    html::{HeadElement, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, base},
    range::{RangeQuery, RangeSpec, filter_by_range},
    report::{
        CategoryShare, ExportRow, Summary, category_breakdown, export_rows, format_currency,
        format_display_date, format_percentage, summarize,
    },
    user::UserID,
};

/// The number of expenses printed on each page.
pub const ROWS_PER_PAGE: usize = 25;

/// One printed page of the expense table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPage {
    /// The page number, starting at 1.
    pub number: usize,
    /// The expenses on this page.
    pub rows: Vec<ExportRow>,
}

/// A report laid out for printing.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedReport {
    /// The heading printed on the first page.
    pub title: String,
    /// A description of the date range the report covers.
    pub range_label: String,
    /// The day the report was generated.
    pub generated_on: Date,
    /// Total, count, average and top category.
    pub summary: Summary,
    /// Spending per category.
    pub breakdown: Vec<CategoryShare>,
    /// The expense table split into pages. There is always at least one page.
    pub pages: Vec<ReportPage>,
}

impl PagedReport {
    /// The number of printed pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lay out `expenses` as a [PagedReport] with `rows_per_page` expenses per page.
///
/// `expenses` should already be filtered to `range`; rows keep the given order.
/// An empty list still produces a single, empty page.
pub fn build_paged_report(
    expenses: &[Expense],
    range: &RangeSpec,
    today: Date,
    rows_per_page: usize,
) -> PagedReport {
    let rows = export_rows(expenses);
    let mut pages: Vec<ReportPage> = rows
        .chunks(rows_per_page.max(1))
        .enumerate()
        .map(|(index, rows)| ReportPage {
            number: index + 1,
            rows: rows.to_vec(),
        })
        .collect();

    if pages.is_empty() {
        pages.push(ReportPage {
            number: 1,
            rows: Vec::new(),
        });
    }

    PagedReport {
        title: "Expense Report".to_owned(),
        range_label: range.describe(today),
        generated_on: today,
        summary: summarize(expenses),
        breakdown: category_breakdown(expenses),
        pages,
    }
}

/// Render the printable report for the user's expenses in the requested range.
pub async fn get_printable_report_page(
    State(state): State<ExportState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<RangeQuery>,
) -> Result<Response, Error> {
    let expenses = state
        .expense_store
        .list(user_id)
        .inspect_err(|error| tracing::error!("could not get expenses for user {user_id}: {error}"))?;

    let range = query.to_spec();
    let today = state.clock.today();
    let mut expenses = filter_by_range(&expenses, &range, state.clock.as_ref());
    sort_by_date_descending(&mut expenses);

    let report = build_paged_report(&expenses, &range, today, ROWS_PER_PAGE);

    Ok(printable_view(&report, &range, &state.currency_symbol).into_response())
}

const PRINT_STYLES: &str = r#"
    .report-page {
        background: white;
        color: #111827;
        max-width: 210mm;
        margin: 1rem auto;
        padding: 12mm;
    }

    @media print {
        body {
            background: white !important;
            padding: 0 !important;
        }

        .no-print {
            display: none !important;
        }

        .report-page {
            margin: 0;
            padding: 0;
            break-after: page;
        }

        .report-page:last-of-type {
            break-after: auto;
        }
    }
"#;

fn header_band(report: &PagedReport) -> Markup {
    html! {
        header class="border-b-2 border-gray-800 pb-4 mb-6"
        {
            h1 class="text-2xl font-bold" { (report.title) }
            p id="report-range" { (report.range_label) }
            p class="text-sm text-gray-600"
            {
                "Generated on " (format_display_date(report.generated_on))
            }
        }
    }
}

fn summary_block(summary: &Summary, currency_symbol: &str) -> Markup {
    html! {
        section id="report-summary" class="mb-6"
        {
            h2 class="text-lg font-semibold mb-2" { "Summary" }
            dl class="grid grid-cols-2 gap-x-8 gap-y-1"
            {
                dt { "Total spent" }
                dd data-summary="total" { (format_currency(summary.total, currency_symbol)) }
                dt { "Expenses" }
                dd data-summary="count" { (summary.count) }
                dt { "Average expense" }
                dd data-summary="average" { (format_currency(summary.average, currency_symbol)) }
                dt { "Top category" }
                dd data-summary="top-category"
                {
                    @match &summary.top_category {
                        Some(top) => {
                            (top.name) " (" (format_currency(top.amount, currency_symbol)) ")"
                        }
                        None => { "None" }
                    }
                }
            }
        }
    }
}

fn breakdown_list(breakdown: &[CategoryShare], currency_symbol: &str) -> Markup {
    html! {
        section id="report-breakdown" class="mb-6"
        {
            h2 class="text-lg font-semibold mb-2" { "Spending by category" }

            @if breakdown.is_empty() {
                p { "No spending in this range." }
            } @else {
                ul
                {
                    @for share in breakdown {
                        li
                        {
                            (share.category) ": "
                            (format_currency(share.amount, currency_symbol))
                            " (" (format_percentage(share.percentage)) ")"
                        }
                    }
                }
            }
        }
    }
}

fn expense_table(page: &ReportPage, currency_symbol: &str) -> Markup {
    html! {
        table class="w-full text-sm text-left"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                    th scope="col" class="px-6 py-4 text-right" { "Amount" }
                }
            }

            tbody
            {
                @for row in &page.rows {
                    tr class="border-b" data-report-row="true"
                    {
                        td class=(TABLE_CELL_STYLE) { (row.date) }
                        td class=(TABLE_CELL_STYLE) { (row.category) }
                        td class=(TABLE_CELL_STYLE) { (row.title) }
                        td class="px-6 py-4 text-right tabular-nums"
                        {
                            (currency_symbol) (row.amount)
                        }
                    }
                }

                @if page.rows.is_empty() {
                    tr
                    {
                        td colspan="4" class="px-6 py-4 text-center" { "No expenses in this range." }
                    }
                }
            }
        }
    }
}

fn printable_view(report: &PagedReport, range: &RangeSpec, currency_symbol: &str) -> Markup {
    let page_count = report.page_count();

    let content = html! {
        nav class="no-print flex justify-between max-w-[210mm] mx-auto px-4 pt-4"
        {
            a href=(with_query(endpoints::EXPENSES_VIEW, &range.to_query_string())) class=(LINK_STYLE)
            {
                "Back to expenses"
            }
            button type="button" onclick="window.print()" class=(LINK_STYLE) { "Print or save as PDF" }
        }

        @for page in &report.pages {
            article class="report-page" data-page=(page.number)
            {
                @if page.number == 1 {
                    (header_band(report))
                    (summary_block(&report.summary, currency_symbol))
                    (breakdown_list(&report.breakdown, currency_symbol))
                    h2 class="text-lg font-semibold mb-2" { "Expenses" }
                }

                (expense_table(page, currency_symbol))

                footer class="mt-4 text-center text-xs text-gray-500"
                {
                    "Page " (page.number) " of " (page_count)
                }
            }
        }
    };

    base(
        "Printable Report",
        &[HeadElement::Style(PreEscaped(PRINT_STYLES.to_owned()))],
        &content,
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{FromRef, Query, State},
    };
    use time::macros::date;

    use crate::{
        expense::test_utils::expense,
        export::ExportState,
        range::{RangePreset, RangeQuery, RangeSpec},
        test_utils::{
            TODAY, add_expense, assert_status_ok, assert_valid_html, get_test_app_state,
            parse_html_document, select_text,
        },
    };

    use super::{build_paged_report, get_printable_report_page};

    #[test]
    fn splits_rows_into_pages() {
        let expenses: Vec<_> = (1..=7)
            .map(|id| expense(id, "Coffee", 4.0, "Food", date!(2024 - 03 - 01)))
            .collect();

        let report = build_paged_report(&expenses, &RangeSpec::All, TODAY, 3);

        assert_eq!(report.page_count(), 3);
        let sizes: Vec<usize> = report.pages.iter().map(|page| page.rows.len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert_eq!(report.pages[2].number, 3);
        assert_eq!(report.summary.count, 7);
        assert_eq!(report.summary.total, 28.0);
    }

    #[test]
    fn empty_report_has_one_page() {
        let report = build_paged_report(&[], &RangeSpec::ThisMonth, TODAY, 25);

        assert_eq!(report.page_count(), 1);
        assert!(report.pages[0].rows.is_empty());
        assert_eq!(report.summary.top_category, None);
        assert!(report.breakdown.is_empty());
    }

    #[test]
    fn header_describes_range() {
        let report = build_paged_report(&[], &RangeSpec::ThisMonth, TODAY, 25);

        assert_eq!(report.range_label, RangeSpec::ThisMonth.describe(TODAY));
        assert_eq!(report.generated_on, TODAY);
    }

    #[tokio::test]
    async fn page_renders_summary_and_footers() {
        let (state, user_id) = get_test_app_state();
        for day in 0..30u8 {
            let date = date!(2024 - 03 - 01).replace_day(day % 15 + 1).unwrap();
            add_expense(&state, user_id, "Lunch", 10.0, "Food", date);
        }
        add_expense(&state, user_id, "Old", 99.0, "Other", date!(2023 - 12 - 01));

        let response = get_printable_report_page(
            State(ExportState::from_ref(&state)),
            Extension(user_id),
            Query(RangeQuery {
                range: Some(RangePreset::ThisMonth),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_text(&html, "article footer"),
            vec!["Page 1 of 2", "Page 2 of 2"]
        );
        assert_eq!(select_text(&html, "tr[data-report-row]").len(), 30);
        assert_eq!(select_text(&html, "dd[data-summary=total]"), vec!["$300.00"]);
        assert_eq!(select_text(&html, "dd[data-summary=count]"), vec!["30"]);
        assert_eq!(
            select_text(&html, "dd[data-summary=top-category]"),
            vec!["Food ($300.00)"]
        );
    }
}
