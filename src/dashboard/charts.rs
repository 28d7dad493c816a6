//! ECharts configuration for the dashboard.
//!
//! Each chart is built from a [ChartSeries] with `charming`, serialized to
//! JSON and initialized by a small script once the page has loaded. Live
//! updates only carry the plotted values, see [chart_updates].

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, JsFunction, Tooltip, Trigger,
    },
    series::{Bar, Line, Pie},
};
use maud::{Markup, PreEscaped, html};
use serde_json::{Value, json};

use crate::{
    html::HeadElement,
    report::{ChartSeries, PALETTE},
};

const CATEGORY_PIE_CHART_ID: &str = "category-pie-chart";
const CATEGORY_BAR_CHART_ID: &str = "category-bar-chart";
const MONTHLY_TREND_CHART_ID: &str = "monthly-trend-chart";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build the category pie, category bar and monthly line charts.
pub(super) fn dashboard_charts(
    category_series: &ChartSeries,
    monthly_series: &ChartSeries,
    currency_symbol: &str,
) -> [DashboardChart; 3] {
    [
        DashboardChart {
            id: CATEGORY_PIE_CHART_ID,
            options: category_pie_chart(category_series, currency_symbol).to_string(),
        },
        DashboardChart {
            id: CATEGORY_BAR_CHART_ID,
            options: category_bar_chart(category_series, currency_symbol).to_string(),
        },
        DashboardChart {
            id: MONTHLY_TREND_CHART_ID,
            options: monthly_trend_chart(monthly_series, currency_symbol).to_string(),
        },
    ]
}

/// The new data for each chart, keyed by chart ID.
///
/// Each value is a partial ECharts option that is merged into the existing
/// chart with `setOption`, so titles, colours and formatters stay as rendered.
pub(super) fn chart_updates(category_series: &ChartSeries, monthly_series: &ChartSeries) -> Value {
    let pie_data: Vec<Value> = category_series
        .points()
        .into_iter()
        .map(|(label, value)| json!({ "name": label, "value": value }))
        .collect();
    let (category_labels, category_values) = labels_and_values(category_series);
    let (month_labels, month_values) = labels_and_values(monthly_series);

    json!({
        CATEGORY_PIE_CHART_ID: { "series": [{ "data": pie_data }] },
        CATEGORY_BAR_CHART_ID: {
            "xAxis": { "data": category_labels },
            "series": [{ "data": category_values }],
        },
        MONTHLY_TREND_CHART_ID: {
            "xAxis": { "data": month_labels },
            "series": [{ "data": month_values }],
        },
    })
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript that initializes each chart with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chart = echarts.init(document.getElementById("{}"));
                    chart.setOption({});

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    HeadElement::ScriptSource(PreEscaped(format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    )))
}

fn category_pie_chart(series: &ChartSeries, currency_symbol: &str) -> Chart {
    let data: Vec<(f64, &str)> = series
        .points()
        .into_iter()
        .map(|(label, value)| (value, label))
        .collect();

    Chart::new()
        .title(Title::new().text("Spending by category"))
        .color(palette())
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter(currency_symbol)),
        )
        .legend(Legend::new().bottom("0%"))
        .series(
            Pie::new()
                .name("Spent")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

fn category_bar_chart(series: &ChartSeries, currency_symbol: &str) -> Chart {
    let (labels, values) = labels_and_values(series);

    Chart::new()
        .title(Title::new().text("Category totals"))
        .color(palette())
        .tooltip(axis_tooltip(currency_symbol))
        .grid(chart_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter(currency_symbol))),
        )
        .series(Bar::new().name("Spent").data(values))
}

fn monthly_trend_chart(series: &ChartSeries, currency_symbol: &str) -> Chart {
    let (labels, values) = labels_and_values(series);

    Chart::new()
        .title(Title::new().text("Monthly spending"))
        .color(palette())
        .tooltip(axis_tooltip(currency_symbol))
        .grid(chart_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter(currency_symbol))),
        )
        .series(Line::new().name("Spent").data(values))
}

fn labels_and_values(series: &ChartSeries) -> (Vec<String>, Vec<f64>) {
    series
        .points()
        .into_iter()
        .map(|(label, value)| (label.to_owned(), value))
        .unzip()
}

fn palette() -> Vec<Color> {
    PALETTE.iter().map(|colour| Color::from(*colour)).collect()
}

fn chart_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .contain_label(true)
}

fn currency_formatter(currency_symbol: &str) -> JsFunction {
    // A JSON string literal is also a valid JavaScript string literal.
    let symbol = serde_json::to_string(currency_symbol).unwrap_or_else(|_| "\"$\"".to_owned());

    JsFunction::new_with_args(
        "number",
        &format!(
            "if (number === undefined || number === null) return \"-\";
            const sign = number < 0 ? \"-\" : \"\";
            return sign + {symbol} + Math.abs(number).toFixed(2);"
        ),
    )
}

fn axis_tooltip(currency_symbol: &str) -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter(currency_symbol))
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use crate::{
        html::HeadElement,
        report::{ChartSeries, Dataset},
    };

    use super::{chart_updates, charts_script, dashboard_charts};

    fn series(labels: &[&str], values: &[f64]) -> ChartSeries {
        ChartSeries {
            labels: labels.iter().map(|label| (*label).to_owned()).collect(),
            datasets: vec![Dataset {
                label: "Spent".to_owned(),
                data: values.to_vec(),
                background_color: vec![],
                border_color: String::new(),
            }],
        }
    }

    #[test]
    fn chart_options_contain_labels_and_values() {
        let charts = dashboard_charts(
            &series(&["Food", "Rent"], &[12.5, 800.0]),
            &series(&["Feb 2024", "Mar 2024"], &[100.0, 712.5]),
            "€",
        );

        let ids: Vec<&str> = charts.iter().map(|chart| chart.id).collect();
        assert_eq!(
            ids,
            vec!["category-pie-chart", "category-bar-chart", "monthly-trend-chart"]
        );
        assert!(charts[0].options.contains("\"Food\""));
        assert!(charts[0].options.contains("800"));
        assert!(charts[1].options.contains("\"Rent\""));
        assert!(charts[2].options.contains("\"Mar 2024\""));
        assert!(charts[2].options.contains("712.5"));
    }

    #[test]
    fn script_initializes_every_chart() {
        let charts = dashboard_charts(&series(&[], &[]), &series(&[], &[]), "$");

        let HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("want an inline script");
        };

        for chart in &charts {
            assert!(script.0.contains(&format!("document.getElementById(\"{}\")", chart.id)));
        }
    }

    #[test]
    fn updates_carry_values_for_every_chart() {
        let updates = chart_updates(
            &series(&["Food", "Rent"], &[12.5, 800.0]),
            &series(&["Mar 2024"], &[812.5]),
        );

        assert_eq!(
            updates["category-pie-chart"]["series"][0]["data"][1],
            serde_json::json!({ "name": "Rent", "value": 800.0 })
        );
        assert_eq!(
            updates["category-bar-chart"]["xAxis"]["data"],
            serde_json::json!(["Food", "Rent"])
        );
        assert_eq!(
            updates["monthly-trend-chart"]["series"][0]["data"],
            serde_json::json!([812.5])
        );
    }
}
