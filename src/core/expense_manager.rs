use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::core::calendar::CalendarFrame;
use crate::core::services::{
    BalancePoint, BalanceService, DailySpending, LedgerTotals, SpendingService, SummaryService,
};
use crate::core::time::{Clock, SystemClock};
use crate::core::utils;
use crate::errors::LedgerError;
use crate::ledger::{Category, Transaction, TransactionStore};
use crate::storage::{
    load_snapshot, save_snapshot, JsonFileGateway, LoadSource, PersistenceGateway,
};

/// Host-facing facade: owns the store, keeps it persisted, and answers dashboard queries.
pub struct ExpenseManager {
    store: TransactionStore,
    gateway: Box<dyn PersistenceGateway>,
    config: Config,
    frame: CalendarFrame,
    load_source: LoadSource,
    load_warnings: Vec<String>,
}

impl ExpenseManager {
    /// Restores whatever the gateway holds; loading itself never fails.
    ///
    /// State imported from the legacy keys is rewritten as a snapshot right away.
    pub fn open(
        gateway: Box<dyn PersistenceGateway>,
        config: Config,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let report = load_snapshot(gateway.as_ref(), clock.now());
        let store = TransactionStore::restore(report.snapshot.transactions, clock);
        let frame = config.frame();
        let manager = Self {
            store,
            gateway,
            config,
            frame,
            load_source: report.source,
            load_warnings: report.warnings,
        };
        info!(
            source = ?manager.load_source,
            transactions = manager.store.len(),
            balance = manager.store.balance(),
            "ledger loaded"
        );
        if manager.load_source == LoadSource::Legacy {
            manager.persist_or_warn();
        }
        manager
    }

    /// Opens the JSON-file store under `config.data_dir` or the application data directory.
    pub fn open_default(config: Config) -> Result<Self, LedgerError> {
        let dir = config.data_dir.clone().unwrap_or_else(utils::store_dir);
        let gateway = JsonFileGateway::new(dir)?;
        Ok(Self::open(Box::new(gateway), config, Arc::new(SystemClock)))
    }

    pub fn record_income(
        &mut self,
        amount: f64,
        description: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        let txn = self.store.record_income(amount, description)?;
        self.persist_or_warn();
        Ok(txn)
    }

    pub fn record_expense(
        &mut self,
        amount: f64,
        description: Option<&str>,
        category: Category,
    ) -> Result<Transaction, LedgerError> {
        let txn = self.store.record_expense(amount, description, category)?;
        self.persist_or_warn();
        Ok(txn)
    }

    pub fn record_quick_expense(
        &mut self,
        amount: f64,
        category: Category,
    ) -> Result<Transaction, LedgerError> {
        let txn = self.store.record_quick_expense(amount, category)?;
        self.persist_or_warn();
        Ok(txn)
    }

    /// Writes the current ledger and balance as one snapshot.
    pub fn persist(&self) -> Result<(), LedgerError> {
        save_snapshot(
            self.gateway.as_ref(),
            self.store.ledger(),
            self.store.balance(),
            self.store.clock().now(),
        )
    }

    // The in-memory mutation stands even when the write fails; the next save retries it.
    fn persist_or_warn(&self) {
        if let Err(err) = self.persist() {
            warn!(error = %err, "failed to persist ledger snapshot");
        }
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn balance(&self) -> f64 {
        self.store.balance()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn frame(&self) -> CalendarFrame {
        self.frame
    }

    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    /// The configured number of newest entries.
    pub fn recent(&self) -> &[Transaction] {
        self.store.recent(self.config.recent_limit)
    }

    pub fn daily_spending(&self) -> Vec<DailySpending> {
        self.daily_spending_for(self.config.effective_window_days())
    }

    pub fn daily_spending_for(&self, window_days: usize) -> Vec<DailySpending> {
        SpendingService::aggregate_daily_spending(
            self.store.ledger(),
            window_days,
            self.today(),
            self.frame,
        )
    }

    pub fn balance_series(&self) -> Vec<BalancePoint> {
        self.balance_series_for(self.config.effective_window_days())
    }

    pub fn balance_series_for(&self, window_days: usize) -> Vec<BalancePoint> {
        BalanceService::reconstruct_balance_series(
            self.store.ledger(),
            window_days,
            self.today(),
            self.frame,
        )
    }

    pub fn summary(&self) -> LedgerTotals {
        SummaryService::summarize(self.store.ledger())
    }

    fn today(&self) -> chrono::NaiveDate {
        self.frame.today(self.store.clock())
    }
}
