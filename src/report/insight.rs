//! Short observations about spending patterns, shown on the dashboard.

use crate::{
    expense::Expense,
    range::YearMonth,
    report::{
        aggregation::{average, category_breakdown, monthly_trend},
        currency::{format_currency, format_percentage},
    },
};

/// The thresholds that trigger insights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsightThresholds {
    /// A category above this share of total spending, in percent, is called out.
    pub dominant_category_percent: f64,
    /// An average expense above this amount is called out.
    pub high_average_amount: f64,
    /// A month whose total rose by more than this many percent over the month before is called out.
    pub month_increase_percent: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            dominant_category_percent: 50.0,
            high_average_amount: 100.0,
            month_increase_percent: 20.0,
        }
    }
}

/// A single observation about a list of expenses.
#[derive(Debug, Clone, PartialEq)]
pub enum Insight {
    /// One category accounts for most of the spending.
    DominantCategory {
        /// The category name.
        category: String,
        /// The category's share of the total, in percent.
        percentage: f64,
    },
    /// The average expense is larger than usual.
    HighAverage {
        /// The mean amount.
        average: f64,
    },
    /// The latest month cost noticeably more than the one before it.
    MonthOverMonthIncrease {
        /// The latest month with expenses.
        month: YearMonth,
        /// The total for the month before `month`.
        previous: f64,
        /// The total for `month`.
        current: f64,
        /// The increase, in percent.
        percentage: f64,
    },
}

impl Insight {
    /// The message shown to the user.
    pub fn message(&self, currency_symbol: &str) -> String {
        match self {
            Insight::DominantCategory {
                category,
                percentage,
            } => format!(
                "{category} makes up {} of your spending.",
                format_percentage(*percentage)
            ),
            Insight::HighAverage { average } => format!(
                "Your average expense is {}, consider reviewing larger purchases.",
                format_currency(*average, currency_symbol)
            ),
            Insight::MonthOverMonthIncrease {
                month,
                previous,
                current,
                percentage,
            } => format!(
                "Spending in {} was {}, up {} from {}.",
                month.label(),
                format_currency(*current, currency_symbol),
                format_percentage(*percentage),
                format_currency(*previous, currency_symbol)
            ),
        }
    }
}

/// Generate the insights that apply to `expenses`.
///
/// Insights are returned in a fixed order: dominant categories, then a high
/// average, then a month-over-month increase. An empty list produces no insights.
pub fn generate_insights(expenses: &[Expense], thresholds: &InsightThresholds) -> Vec<Insight> {
    let mut insights: Vec<Insight> = category_breakdown(expenses)
        .into_iter()
        .filter(|share| share.percentage > thresholds.dominant_category_percent)
        .map(|share| Insight::DominantCategory {
            category: share.category,
            percentage: share.percentage,
        })
        .collect();

    let average = average(expenses);
    if average > thresholds.high_average_amount {
        insights.push(Insight::HighAverage { average });
    }

    if let Some(increase) = month_over_month_increase(expenses, thresholds) {
        insights.push(increase);
    }

    insights
}

fn month_over_month_increase(
    expenses: &[Expense],
    thresholds: &InsightThresholds,
) -> Option<Insight> {
    let trend = monthly_trend(expenses);
    let [.., previous, latest] = trend.as_slice() else {
        return None;
    };

    if previous.month != latest.month.previous() || previous.amount <= 0.0 {
        return None;
    }

    let percentage = (latest.amount - previous.amount) / previous.amount * 100.0;

    (percentage > thresholds.month_increase_percent).then_some(Insight::MonthOverMonthIncrease {
        month: latest.month,
        previous: previous.amount,
        current: latest.amount,
        percentage,
    })
}
