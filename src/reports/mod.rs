//! Report derivations: week/month/category spending breakdowns, the
//! naive linear expense projection, and the daily-entry streak.
//!
//! Like the aggregation engine, everything here is a pure function of
//! the transaction list and allocates fresh output on every call.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ledger::{Category, CategoryKind, Transaction};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Expense total for one week-of-month bucket (W1..W5).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklySpend {
    pub week: u32,
    pub amount: f64,
}

/// Expense total for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlySpend {
    pub month: u32,
    pub name: String,
    pub amount: f64,
}

/// Expense total for one category name; dangling references land in
/// "Uncategorized".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySpend {
    pub name: String,
    pub amount: f64,
}

/// One projected point of the linear expense forecast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectedPoint {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Buckets expense amounts by week of month, `ceil(day / 7)`.
pub fn weekly_breakdown(transactions: &[Transaction]) -> Vec<WeeklySpend> {
    let mut weeks: BTreeMap<u32, f64> = BTreeMap::new();
    for txn in expenses(transactions) {
        let week = txn.date.day().div_ceil(7);
        *weeks.entry(week).or_insert(0.0) += txn.amount;
    }
    weeks
        .into_iter()
        .map(|(week, amount)| WeeklySpend { week, amount })
        .collect()
}

/// Buckets expense amounts by calendar month, ascending.
pub fn monthly_breakdown(transactions: &[Transaction]) -> Vec<MonthlySpend> {
    let mut months: BTreeMap<u32, f64> = BTreeMap::new();
    for txn in expenses(transactions) {
        *months.entry(txn.date.month()).or_insert(0.0) += txn.amount;
    }
    months
        .into_iter()
        .map(|(month, amount)| MonthlySpend {
            month,
            name: MONTH_NAMES[(month - 1) as usize].to_string(),
            amount,
        })
        .collect()
}

/// Expense totals per category name, first-seen order, zero buckets
/// dropped.
pub fn category_breakdown(
    categories: &[Category],
    transactions: &[Transaction],
) -> Vec<CategorySpend> {
    let mut buckets: Vec<CategorySpend> = Vec::new();
    for txn in expenses(transactions) {
        let name = txn
            .category_id()
            .and_then(|id| categories.iter().find(|c| c.id == id))
            .map(|c| c.name.as_str())
            .unwrap_or("Uncategorized");
        match buckets.iter_mut().find(|b| b.name == name) {
            Some(bucket) => bucket.amount += txn.amount,
            None => buckets.push(CategorySpend {
                name: name.to_string(),
                amount: txn.amount,
            }),
        }
    }
    buckets.retain(|b| b.amount > 0.0);
    buckets
}

/// Chronologically ordered (date, amount) expense points, the input
/// shape for [`project_expenses`].
pub fn expense_series(transactions: &[Transaction]) -> Vec<(NaiveDate, f64)> {
    let mut series: Vec<(NaiveDate, f64)> = expenses(transactions)
        .map(|txn| (txn.date, txn.amount))
        .collect();
    series.sort_by_key(|(date, _)| *date);
    series
}

/// Naive linear projection: extends the series by `days` points using
/// the average first difference of the observed amounts, rounded to the
/// nearest whole unit. Fewer than two points project nothing.
pub fn project_expenses(series: &[(NaiveDate, f64)], days: u32) -> Vec<ProjectedPoint> {
    if series.len() < 2 {
        return Vec::new();
    }
    let diffs: Vec<f64> = series.windows(2).map(|w| w[1].1 - w[0].1).collect();
    let avg_diff = diffs.iter().sum::<f64>() / diffs.len() as f64;

    let (last_date, last_amount) = series[series.len() - 1];
    let mut amount = last_amount;
    (1..=days)
        .map(|offset| {
            amount += avg_diff;
            ProjectedPoint {
                date: last_date + Duration::days(i64::from(offset)),
                amount: amount.round(),
            }
        })
        .collect()
}

/// Length of the run of consecutive calendar days with at least one
/// expense, counted back from the most recent expense date. Multiple
/// entries on a day count once.
pub fn spending_streak(transactions: &[Transaction]) -> u32 {
    let days: BTreeSet<NaiveDate> = expenses(transactions).map(|txn| txn.date).collect();
    let mut streak = 0;
    let mut expected: Option<NaiveDate> = None;
    for day in days.iter().rev() {
        match expected {
            None => streak = 1,
            Some(wanted) if *day == wanted => streak += 1,
            Some(_) => break,
        }
        expected = Some(*day - Duration::days(1));
    }
    streak
}

fn expenses(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    transactions
        .iter()
        .filter(|txn| txn.kind == CategoryKind::Expense)
}
