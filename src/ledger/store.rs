//! Append-only ledger that owns the running balance.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::core::time::{Clock, SystemClock};
use crate::errors::LedgerError;

use super::category::Category;
use super::transaction::{is_valid_amount, Transaction, TransactionId, TransactionKind};

/// Sole writer of the ledger. Keeps entries newest-first and the balance cached.
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    balance: f64,
    /// `None` once the largest representable id has been handed out or restored.
    next_id: Option<u64>,
    clock: Arc<dyn Clock>,
}

impl Default for TransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransactionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionStore")
            .field("transactions", &self.transactions.len())
            .field("balance", &self.balance)
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl TransactionStore {
    /// Creates an empty store stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            transactions: Vec::new(),
            balance: 0.0,
            next_id: Some(1),
            clock,
        }
    }

    /// Rebuilds a store from a newest-first ledger that has already been validated.
    ///
    /// The balance is derived from the entries; identifiers resume after the largest one seen.
    pub fn restore(transactions: Vec<Transaction>, clock: Arc<dyn Clock>) -> Self {
        let balance = fold_balance(&transactions);
        let next_id = transactions
            .iter()
            .map(|txn| txn.id().0)
            .max()
            .map_or(Some(1), |max| max.checked_add(1));
        Self {
            transactions,
            balance,
            next_id,
            clock,
        }
    }

    /// Validates and appends a new entry, adjusting the balance in the same step.
    ///
    /// # Errors
    /// Returns [`LedgerError::InvalidAmount`] when `amount` is not finite or not positive, and
    /// [`LedgerError::IdsExhausted`] when no unused id remains. Nothing is modified in either case.
    pub fn record_transaction(
        &mut self,
        amount: f64,
        description: &str,
        kind: TransactionKind,
        category: Category,
    ) -> Result<Transaction, LedgerError> {
        if !is_valid_amount(amount) {
            return Err(LedgerError::invalid_amount(amount));
        }

        let Some(next) = self.next_id else {
            return Err(LedgerError::IdsExhausted { last: u64::MAX });
        };
        let id = TransactionId(next);
        let transaction = Transaction::new(
            id,
            amount,
            kind,
            category,
            description,
            self.clock.now(),
        );

        self.next_id = next.checked_add(1);
        self.balance += transaction.signed_amount();
        self.transactions.insert(0, transaction.clone());

        debug!(
            id = %transaction.id(),
            kind = %transaction.kind(),
            amount = transaction.amount(),
            balance = self.balance,
            "transaction recorded"
        );
        Ok(transaction)
    }

    /// Records money added. Blank descriptions become "Money added".
    pub fn record_income(
        &mut self,
        amount: f64,
        description: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        self.record_transaction(
            amount,
            description.unwrap_or_default(),
            TransactionKind::Income,
            Category::Other,
        )
    }

    /// Records an expense. Blank descriptions become "Expense".
    pub fn record_expense(
        &mut self,
        amount: f64,
        description: Option<&str>,
        category: Category,
    ) -> Result<Transaction, LedgerError> {
        self.record_transaction(
            amount,
            description.unwrap_or_default(),
            TransactionKind::Expense,
            category,
        )
    }

    /// One-tap expense labelled with its amount, e.g. `Quick expense $20`.
    pub fn record_quick_expense(
        &mut self,
        amount: f64,
        category: Category,
    ) -> Result<Transaction, LedgerError> {
        let description = format!("Quick expense ${amount}");
        self.record_transaction(amount, &description, TransactionKind::Expense, category)
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// All entries, newest first. Equal timestamps keep the latest insertion first.
    pub fn ledger(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The `n` newest entries; fewer when the ledger is shorter.
    pub fn recent(&self, n: usize) -> &[Transaction] {
        &self.transactions[..n.min(self.transactions.len())]
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

/// Signed sum of a newest-first ledger, accumulated oldest first to mirror the
/// order in which the store applies entries.
pub fn fold_balance(ledger: &[Transaction]) -> f64 {
    ledger
        .iter()
        .rev()
        .fold(0.0, |acc, txn| acc + txn.signed_amount())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FixedClock;
    use chrono::{Duration, TimeZone, Utc};

    const EPSILON: f64 = 1e-9;

    fn store_at_fixed_time() -> (TransactionStore, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
        ));
        (TransactionStore::with_clock(clock.clone()), clock)
    }

    #[test]
    fn paycheck_then_coffee_leaves_eighty() {
        let (mut store, _clock) = store_at_fixed_time();
        store
            .record_transaction(100.0, "paycheck", TransactionKind::Income, Category::Other)
            .unwrap();
        store
            .record_transaction(20.0, "coffee", TransactionKind::Expense, Category::Food)
            .unwrap();

        assert!((store.balance() - 80.0).abs() < EPSILON);
        let ledger = store.ledger();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger[0].description(), "coffee");
        assert_eq!(ledger[0].category(), Category::Food);
        assert_eq!(ledger[0].signed_amount(), -20.0);
        assert_eq!(ledger[1].description(), "paycheck");
        assert_eq!(ledger[1].signed_amount(), 100.0);
    }

    #[test]
    fn rejected_amounts_leave_state_untouched() {
        let (mut store, _clock) = store_at_fixed_time();
        store.record_income(50.0, Some("seed")).unwrap();
        let before: Vec<Transaction> = store.ledger().to_vec();

        for bad in [0.0, -3.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = store
                .record_expense(bad, Some("bad"), Category::Food)
                .expect_err("invalid amount must be rejected");
            assert!(matches!(err, LedgerError::InvalidAmount(_)));
        }

        assert_eq!(store.ledger(), before.as_slice());
        assert!((store.balance() - 50.0).abs() < EPSILON);
    }

    #[test]
    fn balance_matches_fold_after_every_mutation() {
        let (mut store, clock) = store_at_fixed_time();
        let amounts = [12.34, 0.1, 0.2, 99.99, 7.0, 0.3, 1234.5678, 0.01];
        for (idx, amount) in amounts.iter().enumerate() {
            if idx % 3 == 0 {
                store.record_income(*amount, None).unwrap();
            } else {
                store.record_expense(*amount, None, Category::Bills).unwrap();
            }
            clock.advance(Duration::hours(7));
            assert!((store.balance() - fold_balance(store.ledger())).abs() < EPSILON);
        }
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let (mut store, _clock) = store_at_fixed_time();
        let first = store.record_income(1.0, None).unwrap();
        let _ = store.record_income(0.0, None);
        let second = store.record_income(2.0, None).unwrap();
        assert_eq!(first.id(), TransactionId(1));
        assert_eq!(second.id(), TransactionId(2));
    }

    #[test]
    fn same_tick_entries_keep_latest_insertion_first() {
        let (mut store, _clock) = store_at_fixed_time();
        let a = store.record_income(1.0, Some("a")).unwrap();
        let b = store.record_income(2.0, Some("b")).unwrap();
        assert_eq!(a.occurred_at(), b.occurred_at());
        assert_ne!(a.id(), b.id());
        assert_eq!(store.ledger()[0].description(), "b");
        assert_eq!(store.ledger()[1].description(), "a");
    }

    #[test]
    fn recent_clamps_to_ledger_length() {
        let (mut store, _clock) = store_at_fixed_time();
        for amount in [1.0, 2.0, 3.0] {
            store.record_income(amount, None).unwrap();
        }
        assert!(store.recent(0).is_empty());
        assert_eq!(store.recent(2).len(), 2);
        assert_eq!(store.recent(2)[0].amount(), 3.0);
        assert_eq!(store.recent(10).len(), 3);
    }

    #[test]
    fn quick_expense_is_labelled_with_amount() {
        let (mut store, _clock) = store_at_fixed_time();
        let txn = store.record_quick_expense(20.0, Category::Transport).unwrap();
        assert_eq!(txn.description(), "Quick expense $20");
        assert_eq!(txn.kind(), TransactionKind::Expense);
        assert_eq!(txn.category(), Category::Transport);
    }

    #[test]
    fn restore_derives_balance_and_resumes_ids() {
        let (mut original, clock) = store_at_fixed_time();
        original.record_income(40.0, None).unwrap();
        original.record_expense(15.0, None, Category::Food).unwrap();

        let mut restored = TransactionStore::restore(original.ledger().to_vec(), clock);
        assert!((restored.balance() - 25.0).abs() < EPSILON);

        let next = restored.record_income(5.0, None).unwrap();
        assert_eq!(next.id(), TransactionId(3));
    }

    #[test]
    fn exhausted_id_space_rejects_new_entries() {
        let (_store, clock) = store_at_fixed_time();
        let last = Transaction::new(
            TransactionId(u64::MAX),
            30.0,
            TransactionKind::Income,
            Category::Other,
            "imported",
            clock.now(),
        );
        let mut restored = TransactionStore::restore(vec![last.clone()], clock);

        let err = restored
            .record_expense(1.0, None, Category::Food)
            .expect_err("no id is left after u64::MAX");
        assert!(matches!(err, LedgerError::IdsExhausted { .. }));
        assert_eq!(restored.ledger(), [last].as_slice());
        assert!((restored.balance() - 30.0).abs() < EPSILON);
    }

    #[test]
    fn second_to_last_id_is_still_handed_out() {
        let (_store, clock) = store_at_fixed_time();
        let near_end = Transaction::new(
            TransactionId(u64::MAX - 1),
            5.0,
            TransactionKind::Income,
            Category::Other,
            "",
            clock.now(),
        );
        let mut restored = TransactionStore::restore(vec![near_end], clock);

        let last = restored.record_income(1.0, None).unwrap();
        assert_eq!(last.id(), TransactionId(u64::MAX));
        assert!(matches!(
            restored.record_income(1.0, None),
            Err(LedgerError::IdsExhausted { .. })
        ));
        assert_eq!(restored.len(), 2);
    }
}
