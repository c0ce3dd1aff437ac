#![doc(test(attr(deny(warnings))))]

//! Expense Core records income and expenses in an append-only ledger, keeps the running
//! balance consistent with it, and derives the daily spending and balance-trend series a
//! dashboard needs.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::ExpenseManager;
pub use errors::LedgerError;
pub use ledger::{Category, Transaction, TransactionKind, TransactionStore};

/// Sets up logging for a host process and records which build is running.
///
/// Repeated calls are no-ops.
pub fn init() {
    if utils::init_tracing() {
        let build = utils::build_info::current();
        tracing::info!(
            version = build.version,
            git_hash = build.git_hash,
            profile = build.profile,
            "expense core started"
        );
    }
}
