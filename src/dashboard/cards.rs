//! Summary cards, insights and the category breakdown.
//!
//! These make up the part of the dashboard that is replaced whenever the
//! live stream pushes a new report.

use maud::{Markup, html};

use crate::{
    category::CategorySet,
    dashboard::report::DashboardReport,
    html::{CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE},
    report::{CategoryShare, Insight, Summary, format_currency, format_percentage},
};

/// The element ID of the live summary section.
pub(super) const SUMMARY_ID: &str = "dashboard-summary";

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

/// Render the cards, insights and breakdown for `report`.
pub(super) fn summary_section(
    report: &DashboardReport,
    categories: &CategorySet,
    currency_symbol: &str,
) -> Markup {
    html! {
        section id=(SUMMARY_ID) class="w-full mx-auto mb-8 space-y-6"
        {
            (summary_cards(&report.summary, currency_symbol))
            (insights_list(&report.insights, currency_symbol))
            (breakdown_table(&report.breakdown, categories, currency_symbol))
        }
    }
}

fn summary_card(key: &str, label: &str, value: &str, detail: Option<&str>) -> Markup {
    html! {
        div class=(CARD_STYLE) data-card=(key)
        {
            h4 class="text-sm font-medium text-gray-600 dark:text-gray-400 mb-2" { (label) }
            div class="text-3xl font-bold truncate" data-card-value="true" title=(value) { (value) }

            @if let Some(detail) = detail {
                div class="text-sm text-gray-600 dark:text-gray-400 mt-1" { (detail) }
            }
        }
    }
}

fn summary_cards(summary: &Summary, currency_symbol: &str) -> Markup {
    let (top_name, top_amount) = match &summary.top_category {
        Some(top) => (
            top.name.clone(),
            Some(format_currency(top.amount, currency_symbol)),
        ),
        None => ("None".to_owned(), None),
    };

    html! {
        div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
        {
            (summary_card("total", "Total spent", &format_currency(summary.total, currency_symbol), None))
            (summary_card("count", "Expenses", &summary.count.to_string(), None))
            (summary_card("average", "Average expense", &format_currency(summary.average, currency_symbol), None))
            (summary_card("top-category", "Top category", &top_name, top_amount.as_deref()))
        }
    }
}

fn insights_list(insights: &[Insight], currency_symbol: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h3 class="text-xl font-semibold mb-3" { "Insights" }

            @if insights.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400" data-insights-empty="true"
                {
                    "Nothing stands out in this range."
                }
            } @else {
                ul class="space-y-2 list-disc list-inside"
                {
                    @for insight in insights {
                        li data-insight="true" { (insight.message(currency_symbol)) }
                    }
                }
            }
        }
    }
}

/// Renders a horizontal progress bar showing a category's share of spending.
fn progress_bar(percentage: f64) -> Markup {
    let clamped = percentage.clamp(0.0, 100.0);

    // Ensure minimum 3% width so rounded corners are visible
    let display_percentage = if clamped > 0.0 && clamped < 3.0 {
        3.0
    } else {
        clamped
    };

    html! {
        div
            class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-2.5"
            role="progressbar"
            aria-valuenow=(format!("{clamped:.0}"))
            aria-valuemin="0"
            aria-valuemax="100"
        {
            @if clamped > 0.0 {
                div
                    class="bg-blue-600 dark:bg-blue-500 h-2.5 rounded-full"
                    style=(format!("width: {display_percentage:.1}%"))
                {}
            }
        }
    }
}

fn breakdown_table(
    breakdown: &[CategoryShare],
    categories: &CategorySet,
    currency_symbol: &str,
) -> Markup {
    html! {
        div
        {
            h3 class="text-xl font-semibold mb-4" { "Spending by Category" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class="px-6 py-4 text-right" { "Amount" }
                            th scope="col" class="px-6 py-4 text-right" { "Share" }
                            th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Share of spending" } }
                        }
                    }

                    tbody
                    {
                        @for share in breakdown {
                            tr class=(TABLE_ROW_STYLE) data-breakdown-row=(share.category)
                            {
                                th scope="row" class=(TABLE_CELL_STYLE)
                                {
                                    span class=(CATEGORY_BADGE_STYLE)
                                    {
                                        @if let Some(icon) = categories.icon_for(&share.category) {
                                            (icon) " "
                                        }
                                        (share.category)
                                    }
                                }
                                td class="px-6 py-4 text-right tabular-nums"
                                {
                                    (format_currency(share.amount, currency_symbol))
                                }
                                td class="px-6 py-4 text-right tabular-nums"
                                {
                                    (format_percentage(share.percentage))
                                }
                                td class="px-6 py-4 min-w-[120px]" { (progress_bar(share.percentage)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;
    use time::macros::date;

    use crate::{
        category::CategorySet,
        clock::FixedClock,
        dashboard::report::build_dashboard_report,
        expense::{Expense, test_utils::expense},
        range::RangeSpec,
        report::InsightThresholds,
        test_utils::select_text,
    };

    use super::summary_section;

    fn render(expenses: &[Expense]) -> Html {
        let categories = CategorySet::defaults();
        let report = build_dashboard_report(
            expenses,
            &RangeSpec::All,
            &categories,
            &FixedClock::on(date!(2024 - 03 - 15)),
            &InsightThresholds::default(),
        );

        Html::parse_fragment(&summary_section(&report, &categories, "$").into_string())
    }

    #[test]
    fn cards_show_summary() {
        let html = render(&[
            expense(1, "Rent", 900.0, "Rent", date!(2024 - 03 - 01)),
            expense(2, "Lunch", 20.0, "Food", date!(2024 - 03 - 02)),
            expense(3, "Dinner", 40.0, "Food", date!(2024 - 03 - 03)),
        ]);

        assert_eq!(
            select_text(&html, "[data-card] [data-card-value]"),
            vec!["$960.00", "3", "$320.00", "Rent"]
        );
        assert_eq!(select_text(&html, "li[data-insight]").len(), 2);
    }

    #[test]
    fn empty_report_shows_zeroes() {
        let html = render(&[]);

        assert_eq!(
            select_text(&html, "[data-card] [data-card-value]"),
            vec!["$0.00", "0", "$0.00", "None"]
        );
        assert_eq!(select_text(&html, "[data-insights-empty]").len(), 1);
        assert_eq!(select_text(&html, "tr[data-breakdown-row]").len(), 6);
    }

    #[test]
    fn breakdown_shows_share_of_total() {
        let html = render(&[
            expense(1, "Lunch", 25.0, "Food", date!(2024 - 03 - 02)),
            expense(2, "Bus", 75.0, "Transport", date!(2024 - 03 - 02)),
        ]);

        assert_eq!(
            select_text(&html, "tr[data-breakdown-row=Transport] td"),
            vec!["$75.00", "75.0%", ""]
        );
    }
}
