#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use expense_core::{
    config::Config,
    core::{ExpenseManager, FixedClock},
    storage::JsonFileGateway,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory that outlives the calling test.
pub fn temp_store_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid test date")
}

/// Manager over a JSON-file store in `dir`, driven by `clock`.
pub fn open_manager(dir: &Path, config: Config, clock: Arc<FixedClock>) -> ExpenseManager {
    let gateway = JsonFileGateway::new(dir.to_path_buf()).expect("create json gateway");
    ExpenseManager::open(Box::new(gateway), config, clock)
}
