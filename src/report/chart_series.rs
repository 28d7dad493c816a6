//! Chart-ready label and value series.

use serde::Serialize;

use crate::report::{
    aggregation::{CategoryShare, MonthTotal},
    currency::round_to_cents,
};

/// Colours assigned to data points in order, wrapping around for long series.
pub const PALETTE: [&str; 8] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899", "#14b8a6", "#6b7280",
];

/// A set of labels and the datasets plotted against them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// One label per data point.
    pub labels: Vec<String>,
    /// The plotted values. Each dataset has one value per label.
    pub datasets: Vec<Dataset>,
}

/// A named list of values with their colours.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// The dataset's name.
    pub label: String,
    /// The values, rounded to cents.
    pub data: Vec<f64>,
    /// One colour per value.
    pub background_color: Vec<String>,
    /// The colour of lines and borders.
    pub border_color: String,
}

impl ChartSeries {
    /// Whether there is nothing to plot.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Pair each label with the first dataset's value.
    pub fn points(&self) -> Vec<(&str, f64)> {
        let values = self
            .datasets
            .first()
            .map(|dataset| dataset.data.as_slice())
            .unwrap_or_default();

        self.labels
            .iter()
            .map(String::as_str)
            .zip(values.iter().copied())
            .collect()
    }
}

/// Spending per category. Categories with nothing spent are left out.
pub fn category_series(breakdown: &[CategoryShare]) -> ChartSeries {
    let shares: Vec<&CategoryShare> = breakdown
        .iter()
        .filter(|share| round_to_cents(share.amount) != 0.0)
        .collect();

    ChartSeries {
        labels: shares.iter().map(|share| share.category.clone()).collect(),
        datasets: vec![Dataset {
            label: "Spent".to_owned(),
            data: shares
                .iter()
                .map(|share| round_to_cents(share.amount))
                .collect(),
            background_color: palette(shares.len()),
            border_color: PALETTE[0].to_owned(),
        }],
    }
}

/// Spending per month in chronological order, labelled like "Jan 2024".
pub fn monthly_series(trend: &[MonthTotal]) -> ChartSeries {
    ChartSeries {
        labels: trend.iter().map(|month| month.month.label()).collect(),
        datasets: vec![Dataset {
            label: "Monthly spending".to_owned(),
            data: trend
                .iter()
                .map(|month| round_to_cents(month.amount))
                .collect(),
            background_color: vec![PALETTE[0].to_owned(); trend.len()],
            border_color: PALETTE[0].to_owned(),
        }],
    }
}

fn palette(count: usize) -> Vec<String> {
    PALETTE
        .iter()
        .cycle()
        .take(count)
        .map(|colour| (*colour).to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        range::YearMonth,
        report::{CategoryShare, MonthTotal, PALETTE, category_series, monthly_series},
    };

    fn share(category: &str, amount: f64) -> CategoryShare {
        CategoryShare {
            category: category.to_owned(),
            amount,
            percentage: 0.0,
        }
    }

    #[test]
    fn category_series_skips_empty_categories() {
        let series = category_series(&[
            share("Food", 80.0),
            share("Rent", 0.0),
            share("Transport", 20.004),
        ]);

        assert_eq!(series.labels, vec!["Food", "Transport"]);
        assert_eq!(series.datasets[0].data, vec![80.0, 20.0]);
        assert_eq!(series.datasets[0].background_color.len(), 2);
        assert_eq!(series.points(), vec![("Food", 80.0), ("Transport", 20.0)]);
    }

    #[test]
    fn colours_wrap_around() {
        let breakdown: Vec<_> = (0..10)
            .map(|index| share(&format!("C{index}"), 1.0))
            .collect();

        let series = category_series(&breakdown);

        assert_eq!(series.datasets[0].background_color[8], PALETTE[0]);
        assert_eq!(series.datasets[0].background_color[9], PALETTE[1]);
    }

    #[test]
    fn monthly_series_labels_months() {
        let series = monthly_series(&[
            MonthTotal {
                month: YearMonth::of(date!(2023 - 12 - 01)),
                amount: 7.0,
            },
            MonthTotal {
                month: YearMonth::of(date!(2024 - 01 - 01)),
                amount: 6.555,
            },
        ]);

        assert_eq!(series.labels, vec!["Dec 2023", "Jan 2024"]);
        assert_eq!(series.datasets[0].data, vec![7.0, 6.56]);
    }

    #[test]
    fn serializes_for_chart_libraries() {
        let series = category_series(&[share("Food", 1.5)]);

        let json = serde_json::to_value(&series).expect("could not serialize");

        assert_eq!(json["labels"][0], "Food");
        assert_eq!(json["datasets"][0]["data"][0], 1.5);
        assert_eq!(json["datasets"][0]["backgroundColor"][0], PALETTE[0]);
    }

    #[test]
    fn empty_inputs_give_empty_series() {
        assert!(category_series(&[]).is_empty());
        assert!(monthly_series(&[]).is_empty());
    }
}
