use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::BudgetError;

use super::{category::Category, transaction::Transaction};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Named collection of categories and transactions, the unit of
/// persistence for a single user's budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub name: String,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            categories: Vec::new(),
            transactions: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Fresh ledger pre-populated with the stock starter categories.
    pub fn with_default_categories(name: impl Into<String>) -> Self {
        let mut ledger = Self::new(name);
        ledger.categories = Category::default_seed();
        ledger
    }

    pub fn add_category(&mut self, category: Category) -> String {
        let id = category.id.clone();
        self.categories.push(category);
        self.touch();
        id
    }

    pub fn update_category(&mut self, category: Category) -> Result<(), BudgetError> {
        match self.categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => {
                *existing = category;
                self.touch();
                Ok(())
            }
            None => Err(BudgetError::InvalidInput(format!(
                "unknown category `{}`",
                category.id
            ))),
        }
    }

    /// Removes a category without cascading: transactions keep their
    /// reference and aggregate as uncategorized from then on.
    pub fn remove_category(&mut self, id: &str) -> Result<Category, BudgetError> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| BudgetError::InvalidInput(format!("unknown category `{id}`")))?;
        let removed = self.categories.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> String {
        let id = transaction.id.clone();
        self.transactions.push(transaction);
        self.touch();
        id
    }

    pub fn update_transaction(&mut self, transaction: Transaction) -> Result<(), BudgetError> {
        match self.transactions.iter_mut().find(|t| t.id == transaction.id) {
            Some(existing) => {
                *existing = transaction;
                self.touch();
                Ok(())
            }
            None => Err(BudgetError::InvalidInput(format!(
                "unknown transaction `{}`",
                transaction.id
            ))),
        }
    }

    pub fn remove_transaction(&mut self, id: &str) -> Result<Transaction, BudgetError> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| BudgetError::InvalidInput(format!("unknown transaction `{id}`")))?;
        let removed = self.transactions.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{CategoryKind, CategoryRef};
    use chrono::NaiveDate;

    #[test]
    fn remove_category_keeps_dangling_transactions() {
        let mut ledger = Ledger::new("Personal");
        let cat = Category::new("Food", CategoryKind::Expense, 200.0);
        let cat_id = ledger.add_category(cat);
        ledger.add_transaction(Transaction::new(
            30.0,
            CategoryKind::Expense,
            Some(CategoryRef::Id(cat_id.clone())),
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            "Groceries",
        ));

        ledger.remove_category(&cat_id).expect("remove category");

        assert!(ledger.categories.is_empty());
        assert_eq!(ledger.transaction_count(), 1);
        assert_eq!(
            ledger.transactions[0].category_id(),
            Some(cat_id.as_str()),
            "transaction must keep its dangling reference"
        );
    }

    #[test]
    fn update_of_unknown_transaction_errors() {
        let mut ledger = Ledger::new("Personal");
        let orphan = Transaction::new(
            5.0,
            CategoryKind::Expense,
            None,
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            "Snack",
        );
        let err = ledger.update_transaction(orphan).expect_err("must fail");
        assert!(format!("{err}").contains("unknown transaction"));
    }

    #[test]
    fn mutations_bump_updated_at() {
        let mut ledger = Ledger::new("Personal");
        let before = ledger.updated_at;
        ledger.add_category(Category::new("Travel", CategoryKind::Expense, 100.0));
        assert!(ledger.updated_at >= before);
    }
}
