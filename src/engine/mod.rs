//! Aggregation engine: derives per-category usage and whole-budget
//! totals from the raw category and transaction lists.
//!
//! Everything here is a pure function of its inputs. Derived values are
//! never stored; callers recompute on every read so a mutation of either
//! list is always reflected immediately.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ledger::{Category, CategoryKind, Transaction};

/// A category augmented with its derived usage figures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub budget: f64,
    pub color: String,
    pub spent: f64,
    pub percent_used: f64,
    pub is_over_budget: bool,
    pub remaining: f64,
}

impl CategorySummary {
    /// Derives the usage figures for one category.
    ///
    /// A zero or absent budget never divides: `percent_used` is 0 and
    /// the category cannot be over budget. Overspend is signalled via
    /// `is_over_budget` while `percent_used` stays clamped at 100.
    pub fn from_parts(category: &Category, spent: f64) -> Self {
        let budget = category.budget;
        let percent_used = if budget > 0.0 {
            (spent / budget * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            budget,
            color: category.color.clone(),
            spent,
            percent_used,
            is_over_budget: budget > 0.0 && spent > budget,
            remaining: (budget - spent).max(0.0),
        }
    }
}

/// Whole-budget scalars.
///
/// `remaining` here may go negative, unlike the per-category figure:
/// overall overspend is meaningful to surface as a deficit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetTotals {
    pub total_budget: f64,
    pub total_spent: f64,
    pub remaining: f64,
}

/// Output of [`summarize`]: every category with its usage, the global
/// totals, and a count of expense transactions that resolved to no
/// category (shown as "Uncategorized" upstream).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetSummary {
    pub categories: Vec<CategorySummary>,
    pub totals: BudgetTotals,
    pub orphaned_transactions: usize,
}

/// Derives the full budget summary from the current lists.
///
/// Only expense transactions contribute to spend; income is excluded
/// from spend aggregation entirely (the model tracks budget consumption,
/// not net cash flow). Category references are compared as strings, and
/// unresolvable references still count toward `total_spent`.
pub fn summarize(categories: &[Category], transactions: &[Transaction]) -> BudgetSummary {
    let mut spent_by_id: HashMap<&str, f64> = HashMap::new();
    let mut total_spent = 0.0;
    let mut orphaned = 0usize;

    for txn in transactions {
        if txn.kind != CategoryKind::Expense {
            continue;
        }
        total_spent += txn.amount;
        let resolved = txn
            .category_id()
            .filter(|id| categories.iter().any(|c| c.id == *id));
        match resolved {
            Some(id) => *spent_by_id.entry(id).or_insert(0.0) += txn.amount,
            None => orphaned += 1,
        }
    }

    let summaries: Vec<CategorySummary> = categories
        .iter()
        .map(|category| {
            let spent = spent_by_id.get(category.id.as_str()).copied().unwrap_or(0.0);
            CategorySummary::from_parts(category, spent)
        })
        .collect();

    let total_budget: f64 = categories.iter().map(|c| c.budget).sum();
    BudgetSummary {
        categories: summaries,
        totals: BudgetTotals {
            total_budget,
            total_spent,
            remaining: total_budget - total_spent,
        },
        orphaned_transactions: orphaned,
    }
}
