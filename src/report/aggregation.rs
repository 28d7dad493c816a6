//! Totals, breakdowns and trends computed from a list of expenses.
//!
//! Every function is pure and accepts any slice, usually the output of
//! [crate::range::filter_by_range]. Amounts that are not finite count as zero.

use std::collections::{BTreeMap, HashMap};

use crate::{expense::Expense, range::YearMonth};

/// A category's total and its share of the overall total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    /// The category name.
    pub category: String,
    /// The sum of the category's expenses.
    pub amount: f64,
    /// `amount` as a percentage of the overall total, or 0 when the total is 0.
    pub percentage: f64,
}

/// The total spent in a single category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category name.
    pub name: String,
    /// The sum of the category's expenses.
    pub amount: f64,
}

/// The total spent in a calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthTotal {
    /// The month.
    pub month: YearMonth,
    /// The sum of the month's expenses.
    pub amount: f64,
}

/// The headline numbers for a list of expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// The sum of all amounts.
    pub total: f64,
    /// The number of expenses.
    pub count: usize,
    /// The mean amount, or 0 for an empty list.
    pub average: f64,
    /// The category with the largest total, if there are any expenses.
    pub top_category: Option<CategoryTotal>,
}

/// Sum of all amounts.
pub fn total(expenses: &[Expense]) -> f64 {
    expenses.iter().map(contribution).sum()
}

/// Sum of the amounts of expenses in `category`.
pub fn total_by_category(expenses: &[Expense], category: &str) -> f64 {
    expenses
        .iter()
        .filter(|expense| expense.category == category)
        .map(contribution)
        .sum()
}

/// Sum of the amounts of expenses dated in `month`. Undated expenses are skipped.
pub fn total_by_month(expenses: &[Expense], month: YearMonth) -> f64 {
    expenses
        .iter()
        .filter(|expense| expense.date.map(YearMonth::of) == Some(month))
        .map(contribution)
        .sum()
}

/// Per-category totals and percentages, in the order categories are first encountered.
pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryShare> {
    category_breakdown_with(expenses, [])
}

/// Like [category_breakdown], but every name in `known_categories` is listed
/// first, in the given order, even when it has no expenses.
pub fn category_breakdown_with<'a>(
    expenses: &[Expense],
    known_categories: impl IntoIterator<Item = &'a str>,
) -> Vec<CategoryShare> {
    let totals = totals_by_category(expenses, known_categories);
    let overall: f64 = totals.iter().map(|(_, amount)| amount).sum();

    totals
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category,
            amount,
            percentage: if overall == 0.0 {
                0.0
            } else {
                amount / overall * 100.0
            },
        })
        .collect()
}

/// The category with the largest total.
///
/// Ties go to the category encountered first. Returns `None` for an empty list.
pub fn top_category(expenses: &[Expense]) -> Option<CategoryTotal> {
    totals_by_category(expenses, [])
        .into_iter()
        .fold(None, |top: Option<(String, f64)>, (name, amount)| match top {
            Some((_, top_amount)) if amount <= top_amount => top,
            _ => Some((name, amount)),
        })
        .map(|(name, amount)| CategoryTotal { name, amount })
}

/// Monthly totals in chronological order. Months without dated expenses are omitted.
pub fn monthly_trend(expenses: &[Expense]) -> Vec<MonthTotal> {
    let mut totals: BTreeMap<YearMonth, f64> = BTreeMap::new();

    for expense in expenses {
        if let Some(date) = expense.date {
            *totals.entry(YearMonth::of(date)).or_default() += contribution(expense);
        }
    }

    totals
        .into_iter()
        .map(|(month, amount)| MonthTotal { month, amount })
        .collect()
}

/// The mean amount, or 0 for an empty list.
pub fn average(expenses: &[Expense]) -> f64 {
    if expenses.is_empty() {
        0.0
    } else {
        total(expenses) / expenses.len() as f64
    }
}

/// Compute the [Summary] of `expenses`.
pub fn summarize(expenses: &[Expense]) -> Summary {
    Summary {
        total: total(expenses),
        count: expenses.len(),
        average: average(expenses),
        top_category: top_category(expenses),
    }
}

fn contribution(expense: &Expense) -> f64 {
    if expense.amount.is_finite() {
        expense.amount
    } else {
        tracing::warn!(
            "Expense {} has a non-finite amount, counting it as zero",
            expense.id
        );
        0.0
    }
}

fn totals_by_category<'a>(
    expenses: &[Expense],
    seed: impl IntoIterator<Item = &'a str>,
) -> Vec<(String, f64)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<(String, f64)> = Vec::new();

    for name in seed {
        if !positions.contains_key(name) {
            positions.insert(name.to_owned(), totals.len());
            totals.push((name.to_owned(), 0.0));
        }
    }

    for expense in expenses {
        let position = *positions
            .entry(expense.category.clone())
            .or_insert_with(|| {
                totals.push((expense.category.clone(), 0.0));
                totals.len() - 1
            });
        totals[position].1 += contribution(expense);
    }

    totals
}
