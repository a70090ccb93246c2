use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{errors::BudgetError, ledger::Ledger, utils::ensure_dir};

use super::{Result, StorageBackend};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const LEDGER_DIR: &str = "ledgers";
const BACKUP_DIR: &str = "backups";
const STATE_FILE: &str = "state.json";
const DEFAULT_RETENTION: usize = 5;

/// JSON-file persistence rooted in the app data directory: one pretty
/// JSON document per ledger, timestamped backups with bounded
/// retention, and a state file remembering the last-opened ledger.
#[derive(Clone)]
pub struct JsonStore {
    ledgers_dir: PathBuf,
    backups_dir: PathBuf,
    state_file: PathBuf,
    retention: usize,
}

impl JsonStore {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = root.unwrap_or_else(crate::utils::app_data_dir);
        ensure_dir(&app_root)?;
        let ledgers_dir = app_root.join(LEDGER_DIR);
        let backups_dir = app_root.join(BACKUP_DIR);
        ensure_dir(&ledgers_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            ledgers_dir,
            backups_dir,
            state_file: app_root.join(STATE_FILE),
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.json", canonical_name(name)))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    /// Name of the most recently saved ledger, if any.
    pub fn last_ledger(&self) -> Result<Option<String>> {
        let state = self.read_state()?;
        Ok(state.last_ledger)
    }

    pub fn record_last_ledger(&self, name: Option<&str>) -> Result<()> {
        let mut state = self.read_state()?;
        state.last_ledger = name.map(canonical_name);
        let data = serde_json::to_string_pretty(&state)?;
        write_atomic(&self.state_file, &data)?;
        Ok(())
    }

    fn read_state(&self) -> Result<StoreState> {
        if self.state_file.exists() {
            let data = fs::read_to_string(&self.state_file)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(StoreState::default())
        }
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        for stale in backups.iter().skip(self.retention) {
            let path = self.backup_path(name, stale);
            if let Err(error) = fs::remove_file(&path) {
                tracing::warn!(backup = %path.display(), %error, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStore {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<()> {
        let path = self.ledger_path(name);
        save_ledger_to_path(ledger, &path)?;
        self.record_last_ledger(Some(name))?;
        tracing::info!(ledger = name, path = %path.display(), "ledger saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Ledger> {
        let path = self.ledger_path(name);
        if !path.exists() {
            return Err(BudgetError::Storage(format!("ledger `{name}` not found")));
        }
        load_ledger_from_path(&path)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|stem| stem.to_str()) {
                entries.push(file_name.to_string());
            }
        }
        entries.sort_by(|a, b| parse_backup_timestamp(b).cmp(&parse_backup_timestamp(a)));
        Ok(entries)
    }

    fn backup(&self, ledger: &Ledger, name: &str) -> Result<()> {
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT);
        let path = dir.join(format!("{}_{timestamp}.json", canonical_name(name)));
        let json = serde_json::to_string_pretty(ledger)?;
        write_atomic(&path, &json)?;
        self.prune_backups(name)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<Ledger> {
        let backup_path = self.backup_path(name, backup_name);
        if !backup_path.exists() {
            return Err(BudgetError::Storage(format!(
                "backup `{backup_name}` not found"
            )));
        }
        let target = self.ledger_path(name);
        fs::copy(&backup_path, &target)?;
        load_ledger_from_path(&target)
    }
}

/// Writes the ledger atomically: staged to a sibling `.tmp` file, then
/// renamed over the target so a failed write never corrupts it.
pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(ledger)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_ledger_from_path(path: &Path) -> Result<Ledger> {
    let data = fs::read_to_string(path)?;
    let ledger: Ledger = serde_json::from_str(&data)?;
    Ok(ledger)
}

/// Lists transactions whose category reference resolves to no category.
/// They still aggregate (as uncategorized); this is a diagnostic.
pub fn ledger_warnings(ledger: &Ledger) -> Vec<String> {
    let category_ids: HashSet<&str> = ledger.categories.iter().map(|c| c.id.as_str()).collect();
    let mut warnings = Vec::new();
    for txn in &ledger.transactions {
        if let Some(category_id) = txn.category_id() {
            if !category_ids.contains(category_id) {
                warnings.push(format!(
                    "transaction {} references missing category {}",
                    txn.id, category_id
                ));
            }
        }
    }
    warnings
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    last_ledger: Option<String>,
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(".json")?;
    let parts: Vec<&str> = stem.rsplitn(3, '_').collect();
    if parts.len() < 3 {
        return None;
    }
    let raw = format!("{}_{}", parts[1], parts[0]);
    NaiveDateTime::parse_from_str(&raw, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Category, CategoryKind, CategoryRef, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonStore::new(Some(temp.path().to_path_buf()), Some(3)).expect("json store");
        (store, temp)
    }

    fn sample_ledger() -> Ledger {
        Ledger::with_default_categories("Sample")
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (store, _guard) = store_with_temp_dir();
        let ledger = sample_ledger();
        store.save(&ledger, "household").expect("save ledger");
        let loaded = store.load("household").expect("load ledger");
        assert_eq!(loaded.name, "Sample");
        assert_eq!(loaded.categories.len(), 5);
    }

    #[test]
    fn save_records_last_ledger() {
        let (store, _guard) = store_with_temp_dir();
        store.save(&sample_ledger(), "Family Budget").expect("save");
        assert_eq!(
            store.last_ledger().expect("state"),
            Some("family_budget".to_string())
        );
    }

    #[test]
    fn load_of_missing_ledger_is_a_storage_error() {
        let (store, _guard) = store_with_temp_dir();
        let err = store.load("nowhere").expect_err("must fail");
        assert!(matches!(err, BudgetError::Storage(_)));
    }

    #[test]
    fn backup_writes_timestamped_files() {
        let (store, _guard) = store_with_temp_dir();
        let ledger = sample_ledger();
        store.save(&ledger, "family").expect("save ledger");
        store.backup(&ledger, "family").expect("create backup");
        let backups = store.list_backups("family").expect("list backups");
        assert!(
            !backups.is_empty(),
            "expected at least one backup file to be created"
        );
        assert!(backups[0].starts_with("family_"));
    }

    #[test]
    fn warnings_flag_dangling_category_references() {
        let mut ledger = Ledger::new("Check");
        ledger.add_category(Category::new("Food", CategoryKind::Expense, 100.0));
        ledger.add_transaction(Transaction::new(
            10.0,
            CategoryKind::Expense,
            Some(CategoryRef::Id("missing".into())),
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            "Ghost",
        ));
        let warnings = ledger_warnings(&ledger);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("missing category"));
    }

    #[test]
    fn canonical_name_slugs_and_defaults() {
        assert_eq!(canonical_name("My Budget!"), "my_budget_");
        assert_eq!(canonical_name("   "), "ledger");
    }
}
