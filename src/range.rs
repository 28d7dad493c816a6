//! Date-range presets and the filter that narrows an expense snapshot to a window.

use std::fmt::Display;

use serde::Deserialize;
use time::{Date, Month};

use crate::{clock::Clock, expense::Expense, expense::parse_iso_date};

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

impl DateRange {
    /// Whether `date` falls on or between the range's start and end.
    ///
    /// A range whose start is after its end contains nothing.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A calendar month in a specific year, used to bucket expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    /// The month that `date` falls in.
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }

    /// The year component.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month component.
    pub fn month(&self) -> Month {
        Month::try_from(self.month).unwrap_or(Month::January)
    }

    /// The month immediately before this one.
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// A short human readable label, e.g. "Jan 2024".
    pub fn label(&self) -> String {
        format!("{} {}", month_abbrev(self.month()), self.year)
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The date windows a user can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeSpec {
    /// Every expense, including those without a usable date.
    #[default]
    All,
    /// Only expenses dated today.
    Today,
    /// The calendar month containing today.
    ThisMonth,
    /// The calendar month before the one containing today.
    LastMonth,
    /// The calendar year containing today.
    ThisYear,
    /// The calendar year before the one containing today.
    LastYear,
    /// An explicit, inclusive pair of dates.
    Custom {
        /// The first day in the range.
        start: Date,
        /// The last day in the range.
        end: Date,
    },
}

impl RangeSpec {
    /// Resolve the preset to concrete dates relative to `today`.
    ///
    /// Returns `None` for [RangeSpec::All], which has no bounds, and for
    /// presets that would fall outside the supported calendar.
    pub fn resolve(&self, today: Date) -> Option<DateRange> {
        match *self {
            RangeSpec::All => None,
            RangeSpec::Today => Some(DateRange {
                start: today,
                end: today,
            }),
            RangeSpec::ThisMonth => month_bounds(YearMonth::of(today)),
            RangeSpec::LastMonth => month_bounds(YearMonth::of(today).previous()),
            RangeSpec::ThisYear => year_bounds(today.year()),
            RangeSpec::LastYear => year_bounds(today.year() - 1),
            RangeSpec::Custom { start, end } => Some(DateRange { start, end }),
        }
    }

    /// The preset this range was built from.
    pub fn preset(&self) -> RangePreset {
        match self {
            RangeSpec::All => RangePreset::All,
            RangeSpec::Today => RangePreset::Today,
            RangeSpec::ThisMonth => RangePreset::ThisMonth,
            RangeSpec::LastMonth => RangePreset::LastMonth,
            RangeSpec::ThisYear => RangePreset::ThisYear,
            RangeSpec::LastYear => RangePreset::LastYear,
            RangeSpec::Custom { .. } => RangePreset::Custom,
        }
    }

    /// A label describing the range, with the resolved dates for bounded ranges.
    pub fn describe(&self, today: Date) -> String {
        let label = self.preset().label();

        match self.resolve(today) {
            Some(range) if range.start == range.end => {
                format!("{label} ({})", format_date_label(range.start))
            }
            Some(range) => format!(
                "{label} ({} - {})",
                format_date_label(range.start),
                format_date_label(range.end)
            ),
            None => label.to_owned(),
        }
    }

    /// The query string that selects this range, e.g. `range=custom&start=2024-01-01&end=2024-01-31`.
    pub fn to_query_string(&self) -> String {
        let mut pairs = vec![("range", self.preset().as_query_value().to_owned())];

        if let RangeSpec::Custom { start, end } = self {
            pairs.push(("start", start.to_string()));
            pairs.push(("end", end.to_string()));
        }

        serde_urlencoded::to_string(&pairs).unwrap_or_default()
    }
}

/// The range presets as they appear in query strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangePreset {
    All,
    Today,
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
    Custom,
}

impl RangePreset {
    /// Every preset in the order they are offered to the user.
    pub const ALL: [RangePreset; 7] = [
        RangePreset::All,
        RangePreset::Today,
        RangePreset::ThisMonth,
        RangePreset::LastMonth,
        RangePreset::ThisYear,
        RangePreset::LastYear,
        RangePreset::Custom,
    ];

    /// The value used for the `range` query parameter.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::ThisMonth => "this-month",
            Self::LastMonth => "last-month",
            Self::ThisYear => "this-year",
            Self::LastYear => "last-year",
            Self::Custom => "custom",
        }
    }

    /// The label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All time",
            Self::Today => "Today",
            Self::ThisMonth => "This month",
            Self::LastMonth => "Last month",
            Self::ThisYear => "This year",
            Self::LastYear => "Last year",
            Self::Custom => "Custom range",
        }
    }
}

/// The query parameters that select a date range.
///
/// `start` and `end` are kept as strings because date inputs submit an empty
/// string when left blank.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RangeQuery {
    /// The range preset.
    pub range: Option<RangePreset>,
    /// The start date for a custom range in ISO 8601 format.
    pub start: Option<String>,
    /// The end date for a custom range in ISO 8601 format.
    pub end: Option<String>,
}

impl RangeQuery {
    /// Convert the query into a range, falling back to [RangeSpec::All].
    ///
    /// A custom range missing either date, or with a date that cannot be
    /// parsed, also falls back to [RangeSpec::All].
    pub fn to_spec(&self) -> RangeSpec {
        match self.range.unwrap_or(RangePreset::All) {
            RangePreset::All => RangeSpec::All,
            RangePreset::Today => RangeSpec::Today,
            RangePreset::ThisMonth => RangeSpec::ThisMonth,
            RangePreset::LastMonth => RangeSpec::LastMonth,
            RangePreset::ThisYear => RangeSpec::ThisYear,
            RangePreset::LastYear => RangeSpec::LastYear,
            RangePreset::Custom => {
                let start = self.start.as_deref().and_then(parse_iso_date);
                let end = self.end.as_deref().and_then(parse_iso_date);

                match (start, end) {
                    (Some(start), Some(end)) => RangeSpec::Custom { start, end },
                    _ => {
                        tracing::warn!(
                            "Custom range requested with start={:?} and end={:?}, showing all expenses instead",
                            self.start,
                            self.end
                        );
                        RangeSpec::All
                    }
                }
            }
        }
    }
}

/// Select the expenses whose date falls inside `range`, preserving their order.
///
/// [RangeSpec::All] returns every expense, including those without a usable
/// date. Every other range excludes undated expenses.
pub fn filter_by_range(expenses: &[Expense], range: &RangeSpec, clock: &dyn Clock) -> Vec<Expense> {
    if *range == RangeSpec::All {
        return expenses.to_vec();
    }

    let Some(bounds) = range.resolve(clock.today()) else {
        return Vec::new();
    };

    expenses
        .iter()
        .filter(|expense| expense.date.is_some_and(|date| bounds.contains(date)))
        .cloned()
        .collect()
}

fn month_bounds(month: YearMonth) -> Option<DateRange> {
    let start = Date::from_calendar_date(month.year(), month.month(), 1).ok()?;
    let end = Date::from_calendar_date(
        month.year(),
        month.month(),
        last_day_of_month(month.year(), month.month()),
    )
    .ok()?;

    Some(DateRange { start, end })
}

fn year_bounds(year: i32) -> Option<DateRange> {
    Some(DateRange {
        start: Date::from_calendar_date(year, Month::January, 1).ok()?,
        end: Date::from_calendar_date(year, Month::December, 31).ok()?,
    })
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February if time::util::is_leap_year(year) => 29,
        Month::February => 28,
        _ => 31,
    }
}

fn format_date_label(date: Date) -> String {
    format!("{} {} {}", date.day(), month_abbrev(date.month()), date.year())
}

pub(crate) fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
