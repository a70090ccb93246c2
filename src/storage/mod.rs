pub mod json_store;

use std::path::Path;

use crate::{errors::BudgetError, ledger::Ledger};

pub type Result<T> = std::result::Result<T, BudgetError>;

/// Abstraction over persistence backends capable of storing ledgers and
/// snapshots. The aggregation engine never touches this; callers wire a
/// backend and the engine together.
pub trait StorageBackend: Send + Sync {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Ledger>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn backup(&self, ledger: &Ledger, name: &str) -> Result<()>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Ledger>;

    /// Optional helpers for ad-hoc file operations. Default
    /// implementations bypass managed storage.
    fn save_to_path(&self, ledger: &Ledger, path: &Path) -> Result<()> {
        json_store::save_ledger_to_path(ledger, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Ledger> {
        json_store::load_ledger_from_path(path)
    }
}

pub use json_store::{ledger_warnings, JsonStore};
