//! Turning a list of expenses into numbers, insights and display-ready values.

mod aggregation;
mod chart_series;
mod currency;
mod insight;
mod rows;

pub use aggregation::{
    CategoryShare, CategoryTotal, MonthTotal, Summary, average, category_breakdown,
    category_breakdown_with, monthly_trend, summarize, top_category, total, total_by_category,
    total_by_month,
};
pub use chart_series::{ChartSeries, Dataset, PALETTE, category_series, monthly_series};
pub use currency::{
    DEFAULT_CURRENCY_SYMBOL, format_amount, format_currency, format_percentage, round_to_cents,
};
pub use insight::{Insight, InsightThresholds, generate_insights};
pub use rows::{ExportRow, export_rows, format_display_date};

/// Report settings chosen when the server starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// The symbol placed before formatted amounts.
    pub currency_symbol: String,
    /// The thresholds for generating insights.
    pub insight_thresholds: InsightThresholds,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_owned(),
            insight_thresholds: InsightThresholds::default(),
        }
    }
}
