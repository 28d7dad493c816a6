//! Money formatting for display and export.

/// The currency symbol used when none is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Format `amount` with two decimal places and `symbol`, e.g. "$1234.50" or "-$3.20".
///
/// Amounts that round to zero cents are shown without a sign. Non-finite
/// amounts are shown as zero.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let cents = round_to_cents(amount);
    let sign = if cents < 0.0 { "-" } else { "" };

    format!("{sign}{symbol}{:.2}", cents.abs())
}

/// Format `amount` with two decimal places and no symbol, e.g. "1234.50".
pub fn format_amount(amount: f64) -> String {
    let cents = round_to_cents(amount);

    if cents == 0.0 {
        "0.00".to_owned()
    } else {
        format!("{cents:.2}")
    }
}

/// Format a percentage with one decimal place, e.g. "42.5%".
pub fn format_percentage(percentage: f64) -> String {
    let tenths = if percentage.is_finite() {
        (percentage * 10.0).round() / 10.0
    } else {
        0.0
    };

    if tenths == 0.0 {
        "0.0%".to_owned()
    } else {
        format!("{tenths:.1}%")
    }
}

/// Round to the nearest cent, treating non-finite amounts as zero.
pub fn round_to_cents(amount: f64) -> f64 {
    if amount.is_finite() {
        (amount * 100.0).round() / 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{format_amount, format_currency, format_percentage};

    #[test]
    fn formats_with_two_decimal_places() {
        assert_eq!(format_currency(1234.5, "$"), "$1234.50");
        assert_eq!(format_currency(12.0, "$"), "$12.00");
        assert_eq!(format_currency(0.1 + 0.2, "$"), "$0.30");
    }

    #[test]
    fn negative_sign_goes_before_symbol() {
        assert_eq!(format_currency(-3.2, "$"), "-$3.20");
        assert_eq!(format_currency(-1000.0, "€"), "-€1000.00");
    }

    #[test]
    fn zero_has_no_sign() {
        assert_eq!(format_currency(0.0, "$"), "$0.00");
        assert_eq!(format_currency(-0.0, "$"), "$0.00");
        assert_eq!(format_currency(-0.001, "$"), "$0.00");
    }

    #[test]
    fn non_finite_amounts_show_as_zero() {
        assert_eq!(format_currency(f64::NAN, "$"), "$0.00");
        assert_eq!(format_amount(f64::INFINITY), "0.00");
    }

    #[test]
    fn amount_without_symbol() {
        assert_eq!(format_amount(45.999), "46.00");
        assert_eq!(format_amount(-0.004), "0.00");
    }

    #[test]
    fn percentage_with_one_decimal_place() {
        assert_eq!(format_percentage(66.666), "66.7%");
        assert_eq!(format_percentage(0.0), "0.0%");
        assert_eq!(format_percentage(f64::NAN), "0.0%");
    }
}
