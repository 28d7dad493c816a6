//! The numbers behind the dashboard, computed from one snapshot of a user's expenses.

use crate::{
    category::CategorySet,
    clock::Clock,
    expense::Expense,
    range::{RangeSpec, filter_by_range},
    report::{
        CategoryShare, ChartSeries, Insight, InsightThresholds, Summary, category_breakdown_with,
        category_series, generate_insights, monthly_series, monthly_trend, summarize,
    },
};

/// Everything the dashboard shows for a date range.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardReport {
    /// The range the report covers.
    pub range: RangeSpec,
    /// A description of `range` with its resolved dates.
    pub range_label: String,
    /// Total, count, average and top category.
    pub summary: Summary,
    /// Every known category followed by any others found in the expenses.
    pub breakdown: Vec<CategoryShare>,
    /// Observations about the spending in the range.
    pub insights: Vec<Insight>,
    /// Spending per category, for the pie and bar charts.
    pub category_series: ChartSeries,
    /// Spending per month, for the trend chart.
    pub monthly_series: ChartSeries,
}

/// Run a snapshot through the range filter, the aggregations and the chart formatter.
pub fn build_dashboard_report(
    snapshot: &[Expense],
    range: &RangeSpec,
    categories: &CategorySet,
    clock: &dyn Clock,
    thresholds: &InsightThresholds,
) -> DashboardReport {
    let expenses = filter_by_range(snapshot, range, clock);
    let breakdown = category_breakdown_with(&expenses, categories.names());

    DashboardReport {
        range: *range,
        range_label: range.describe(clock.today()),
        summary: summarize(&expenses),
        insights: generate_insights(&expenses, thresholds),
        category_series: category_series(&breakdown),
        monthly_series: monthly_series(&monthly_trend(&expenses)),
        breakdown,
    }
}
