use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::CategoryKind;

/// A single recorded income or expense event, optionally tied to a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(alias = "_id")]
    pub id: String,
    pub amount: f64,
    #[serde(rename = "type", default)]
    pub kind: CategoryKind,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    pub date: NaiveDate,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transaction {
    pub fn new(
        amount: f64,
        kind: CategoryKind,
        category: Option<CategoryRef>,
        date: NaiveDate,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            amount,
            kind,
            category,
            date,
            title: title.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// The referenced category id, if any reference is present at all.
    pub fn category_id(&self) -> Option<&str> {
        self.category.as_ref().map(CategoryRef::id)
    }
}

/// Reference to a category as it appears on the wire: either a raw id
/// string or an embedded category object carrying its own id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(String),
    Embedded(EmbeddedCategory),
}

impl CategoryRef {
    pub fn id(&self) -> &str {
        match self {
            CategoryRef::Id(id) => id,
            CategoryRef::Embedded(embedded) => &embedded.id,
        }
    }
}

impl From<&str> for CategoryRef {
    fn from(id: &str) -> Self {
        CategoryRef::Id(id.to_string())
    }
}

/// Minimal projection of a nested category object; extra fields on the
/// wire are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedCategory {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
