use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categorises ledger activity for budgeting and reporting.
///
/// Ids are uuid strings locally but compared as opaque strings so that
/// records fetched from the remote API (which may use other id shapes)
/// aggregate correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: CategoryKind,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind, budget: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
            budget: budget.max(0.0),
            color: String::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Stock starter categories seeded into a fresh ledger.
    pub fn default_seed() -> Vec<Category> {
        [
            ("Food", "gradient-pink-purple"),
            ("Transport", "gradient-purple-blue"),
            ("Shopping", "gradient-pink-blue"),
            ("Entertainment", "gradient-pink-purple"),
            ("Savings", "gradient-purple-blue"),
        ]
        .into_iter()
        .map(|(name, color)| Category::new(name, CategoryKind::Expense, 200.0).with_color(color))
        .collect()
    }
}

/// Supported category and transaction types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    #[default]
    Expense,
}
