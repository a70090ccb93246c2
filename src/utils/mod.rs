use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Once,
};

use crate::errors::BudgetError;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("hisab_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

const DEFAULT_DIR_NAME: &str = ".hisab";

/// Returns the application-specific data directory, defaulting to
/// `~/.hisab`. The `HISAB_HOME` environment variable overrides it.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("HISAB_HOME") {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Creates the directory (and parents) when missing.
pub fn ensure_dir(path: &Path) -> Result<(), BudgetError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
