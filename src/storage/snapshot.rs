//! Single-key ledger snapshots and the fail-soft loader.
//!
//! The whole ledger and its balance are written under [`SNAPSHOT_KEY`] in one `set`, so a crash
//! can never leave a balance that disagrees with the stored entries. Loading never fails: any
//! anomaly degrades to a smaller (possibly empty) ledger plus a warning in the [`LoadReport`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::LedgerError;
use crate::ledger::{
    fold_balance, is_valid_amount, Category, Transaction, TransactionId, TransactionKind,
};

use super::PersistenceGateway;

pub const SNAPSHOT_KEY: &str = "expenseTracker_snapshot";
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;
/// Keys written by releases that stored balance and entries separately.
pub const LEGACY_BALANCE_KEY: &str = "expenseTracker_balance";
pub const LEGACY_TRANSACTIONS_KEY: &str = "expenseTracker_transactions";

const BALANCE_TOLERANCE: f64 = 1e-6;

/// What the loader does with an entry whose id was already seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DuplicateIds {
    /// Snapshots are written by the store, so a repeated id means corruption.
    Drop,
    /// Legacy ids were millisecond timestamps; two real entries may share one.
    Reassign,
}

/// Persisted form of the store: newest-first entries plus the cached balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    pub balance: f64,
    pub transactions: Vec<Transaction>,
}

impl LedgerSnapshot {
    pub fn empty(saved_at: DateTime<Utc>) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            saved_at,
            balance: 0.0,
            transactions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Nothing usable was stored.
    Empty,
    Snapshot,
    /// Converted from the two legacy keys.
    Legacy,
}

/// Outcome of [`load_snapshot`]: always a usable snapshot, plus what was discarded on the way.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub snapshot: LedgerSnapshot,
    pub source: LoadSource,
    pub warnings: Vec<String>,
}

impl LoadReport {
    fn empty(source: LoadSource, warnings: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            snapshot: LedgerSnapshot::empty(now),
            source,
            warnings,
        }
    }
}

/// Writes the ledger and balance under [`SNAPSHOT_KEY`] in a single `set`.
pub fn save_snapshot(
    gateway: &dyn PersistenceGateway,
    transactions: &[Transaction],
    balance: f64,
    saved_at: DateTime<Utc>,
) -> Result<(), LedgerError> {
    let snapshot = SnapshotRef {
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        saved_at,
        balance,
        transactions,
    };
    let json = serde_json::to_string(&snapshot)?;
    gateway.set(SNAPSHOT_KEY, &json)
}

/// Reads persisted state, falling back to the legacy keys when no snapshot exists.
///
/// Entries with invalid amounts or duplicate identifiers are dropped; the returned balance is
/// always re-derived from the surviving entries.
pub fn load_snapshot(gateway: &dyn PersistenceGateway, now: DateTime<Utc>) -> LoadReport {
    let mut warnings = Vec::new();

    let raw = match gateway.get(SNAPSHOT_KEY) {
        Ok(raw) => raw,
        Err(err) => {
            note(&mut warnings, format!("could not read `{SNAPSHOT_KEY}`: {err}"));
            return LoadReport::empty(LoadSource::Empty, warnings, now);
        }
    };

    match raw {
        Some(raw) => load_current(&raw, warnings, now),
        None => load_legacy(gateway, warnings, now),
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    schema_version: u32,
    saved_at: DateTime<Utc>,
    balance: f64,
    transactions: &'a [Transaction],
}

#[derive(Deserialize)]
struct RawSnapshot {
    schema_version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    balance: Option<f64>,
    #[serde(default)]
    transactions: Vec<Value>,
}

#[derive(Deserialize)]
struct LegacyTransaction {
    id: u64,
    amount: f64,
    #[serde(default)]
    description: String,
    #[serde(rename = "type")]
    kind: TransactionKind,
    #[serde(default)]
    category: Category,
    date: DateTime<Utc>,
}

impl From<LegacyTransaction> for Transaction {
    fn from(legacy: LegacyTransaction) -> Self {
        Transaction::new(
            TransactionId(legacy.id),
            legacy.amount,
            legacy.kind,
            legacy.category,
            &legacy.description,
            legacy.date,
        )
    }
}

fn load_current(raw: &str, mut warnings: Vec<String>, now: DateTime<Utc>) -> LoadReport {
    let parsed: RawSnapshot = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            note(
                &mut warnings,
                LedgerError::corrupt(SNAPSHOT_KEY, err.to_string()).to_string(),
            );
            return LoadReport::empty(LoadSource::Empty, warnings, now);
        }
    };

    if parsed.schema_version > SNAPSHOT_SCHEMA_VERSION {
        note(
            &mut warnings,
            format!(
                "snapshot schema v{} is newer than supported v{}; starting empty",
                parsed.schema_version, SNAPSHOT_SCHEMA_VERSION
            ),
        );
        return LoadReport::empty(LoadSource::Empty, warnings, now);
    }

    let transactions = sanitize_entries(
        parsed.transactions,
        serde_json::from_value::<Transaction>,
        DuplicateIds::Drop,
        &mut warnings,
    );
    let balance = fold_balance(&transactions);
    check_stored_balance(parsed.balance, balance, &mut warnings);

    LoadReport {
        snapshot: LedgerSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            saved_at: parsed.saved_at.unwrap_or(now),
            balance,
            transactions,
        },
        source: LoadSource::Snapshot,
        warnings,
    }
}

fn load_legacy(
    gateway: &dyn PersistenceGateway,
    mut warnings: Vec<String>,
    now: DateTime<Utc>,
) -> LoadReport {
    let entries = match gateway.get(LEGACY_TRANSACTIONS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return LoadReport::empty(LoadSource::Empty, warnings, now),
        Err(err) => {
            note(
                &mut warnings,
                format!("could not read `{LEGACY_TRANSACTIONS_KEY}`: {err}"),
            );
            return LoadReport::empty(LoadSource::Empty, warnings, now);
        }
    };

    let values: Vec<Value> = match serde_json::from_str(&entries) {
        Ok(values) => values,
        Err(err) => {
            note(
                &mut warnings,
                LedgerError::corrupt(LEGACY_TRANSACTIONS_KEY, err.to_string()).to_string(),
            );
            return LoadReport::empty(LoadSource::Empty, warnings, now);
        }
    };

    let transactions = sanitize_entries(
        values,
        |value| serde_json::from_value::<LegacyTransaction>(value).map(Transaction::from),
        DuplicateIds::Reassign,
        &mut warnings,
    );
    let balance = fold_balance(&transactions);

    match gateway.get(LEGACY_BALANCE_KEY) {
        Ok(Some(raw)) => match raw.trim().parse::<f64>() {
            Ok(stored) => check_stored_balance(Some(stored), balance, &mut warnings),
            Err(_) => note(
                &mut warnings,
                format!("ignoring unparsable `{LEGACY_BALANCE_KEY}` value `{}`", raw.trim()),
            ),
        },
        Ok(None) => {}
        Err(err) => note(&mut warnings, format!("could not read `{LEGACY_BALANCE_KEY}`: {err}")),
    }

    info!(
        transactions = transactions.len(),
        balance, "imported legacy expense tracker state"
    );
    LoadReport {
        snapshot: LedgerSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            saved_at: now,
            balance,
            transactions,
        },
        source: LoadSource::Legacy,
        warnings,
    }
}

fn sanitize_entries<F>(
    values: Vec<Value>,
    parse: F,
    duplicates: DuplicateIds,
    warnings: &mut Vec<String>,
) -> Vec<Transaction>
where
    F: Fn(Value) -> Result<Transaction, serde_json::Error>,
{
    let mut valid = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        let txn = match parse(value) {
            Ok(txn) => txn,
            Err(err) => {
                note(warnings, format!("dropped entry #{index}: {err}"));
                continue;
            }
        };
        if !is_valid_amount(txn.amount()) {
            note(
                warnings,
                format!("dropped entry #{index} (id {}): invalid amount {}", txn.id(), txn.amount()),
            );
            continue;
        }
        valid.push((index, txn));
    }

    // Fresh ids start above every id present, so a reassigned entry never collides later.
    let mut fresh = valid
        .iter()
        .map(|(_, txn)| txn.id().0)
        .max()
        .and_then(|max| max.checked_add(1));
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(valid.len());
    for (index, txn) in valid {
        if seen.insert(txn.id()) {
            kept.push(txn);
            continue;
        }
        match (duplicates, fresh) {
            (DuplicateIds::Reassign, Some(id)) => {
                info!(entry = index, from = %txn.id(), to = id, "reassigned colliding legacy id");
                seen.insert(TransactionId(id));
                kept.push(txn.with_id(TransactionId(id)));
                fresh = id.checked_add(1);
            }
            _ => note(
                warnings,
                format!("dropped entry #{index}: duplicate id {}", txn.id()),
            ),
        }
    }
    kept
}

fn check_stored_balance(stored: Option<f64>, derived: f64, warnings: &mut Vec<String>) {
    let Some(stored) = stored else {
        return;
    };
    if (stored - derived).abs() > BALANCE_TOLERANCE {
        note(
            warnings,
            format!("stored balance {stored} disagrees with ledger total {derived}; using ledger total"),
        );
    }
}

fn note(warnings: &mut Vec<String>, message: String) {
    warn!("{message}");
    warnings.push(message);
}
