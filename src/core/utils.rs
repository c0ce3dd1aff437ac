use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".expense_core";
const STORE_DIR: &str = "store";
const CONFIG_DIR: &str = "config";

/// Environment variable that relocates every file the crate writes.
pub const HOME_ENV: &str = "EXPENSE_CORE_HOME";

/// Returns the application data directory, defaulting to `~/.expense_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory backing the key-value persistence gateway.
pub fn store_dir() -> PathBuf {
    app_data_dir().join(STORE_DIR)
}

pub fn config_dir() -> PathBuf {
    app_data_dir().join(CONFIG_DIR)
}
