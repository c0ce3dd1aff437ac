//! Key-value persistence and the snapshot format stored through it.

pub mod json_store;
pub mod memory;
pub mod snapshot;

use crate::errors::LedgerError;

/// String key-value store with single-key atomic writes.
///
/// Implementations must guarantee that a `set` either fully replaces the previous value or
/// leaves it untouched.
pub trait PersistenceGateway: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, LedgerError>;
    fn set(&self, key: &str, value: &str) -> Result<(), LedgerError>;
}

pub use json_store::JsonFileGateway;
pub use memory::MemoryGateway;
pub use snapshot::{
    load_snapshot, save_snapshot, LedgerSnapshot, LoadReport, LoadSource, LEGACY_BALANCE_KEY,
    LEGACY_TRANSACTIONS_KEY, SNAPSHOT_KEY, SNAPSHOT_SCHEMA_VERSION,
};
