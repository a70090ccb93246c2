use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::BudgetError,
    receipt::DateOrder,
    utils::{app_data_dir, ensure_dir},
};

const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// User-level application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Day/month ordering assumed for ambiguous numeric receipt dates.
    #[serde(default)]
    pub date_order: DateOrder,
    pub currency_symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_ledger: Option<String>,
    pub backup_retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            date_order: DateOrder::MonthFirst,
            currency_symbol: "₹".into(),
            last_opened_ledger: None,
            backup_retention: 5,
        }
    }
}

/// Loads and saves the config file in the app data directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, BudgetError> {
        Self::from_base(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, BudgetError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, BudgetError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<Config, BudgetError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), BudgetError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        let config = manager.load().expect("load");
        assert_eq!(config, Config::default());
        assert_eq!(config.date_order, DateOrder::MonthFirst);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        let config = Config {
            date_order: DateOrder::DayFirst,
            currency_symbol: "$".into(),
            last_opened_ledger: Some("household".into()),
            backup_retention: 2,
        };
        manager.save(&config).expect("save");
        assert_eq!(manager.load().expect("load"), config);
    }
}
