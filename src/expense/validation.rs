//! Rules that a new or edited expense must satisfy.

use time::Date;

/// The user supplied fields checked before an expense is accepted.
///
/// `amount` is `None` when the input could not be read as a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpenseCandidate<'a> {
    /// The raw title as typed by the user.
    pub title: &'a str,
    /// The parsed amount, if any.
    pub amount: Option<f64>,
}

/// Why a candidate expense was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The title is empty or only whitespace.
    #[error("Please enter a title for the expense")]
    EmptyTitle,

    /// The amount is missing, not a number, or not greater than zero.
    #[error("Please enter an amount greater than zero")]
    InvalidAmount,

    /// Expenses record money that has already been spent.
    #[error("{0} is in the future, only today or earlier dates are allowed")]
    FutureDate(Date),
}

/// Check the title and amount of a candidate expense.
///
/// The title is checked first, so a candidate with both a blank title and a
/// bad amount reports [ValidationError::EmptyTitle].
///
/// # Errors
/// - [ValidationError::EmptyTitle] if the title trims to an empty string.
/// - [ValidationError::InvalidAmount] if the amount is missing, NaN, infinite, zero or negative.
pub fn validate(candidate: &ExpenseCandidate) -> Result<(), ValidationError> {
    if candidate.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    match candidate.amount {
        Some(amount) if amount.is_finite() && amount > 0.0 => Ok(()),
        _ => Err(ValidationError::InvalidAmount),
    }
}

/// Reject dates after `today`.
///
/// # Errors
/// Returns [ValidationError::FutureDate] if `date` is later than `today`.
pub fn check_date_not_in_future(date: Date, today: Date) -> Result<(), ValidationError> {
    if date > today {
        Err(ValidationError::FutureDate(date))
    } else {
        Ok(())
    }
}
