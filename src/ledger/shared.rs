use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::LedgerError;

use super::category::Category;
use super::store::TransactionStore;
use super::transaction::{Transaction, TransactionKind};

/// Point-in-time copy of the ledger and its balance, taken under one lock.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreView {
    pub transactions: Vec<Transaction>,
    pub balance: f64,
}

/// Thread-safe handle for hosts that serve several callers.
///
/// Writers serialise on the lock so ledger and balance change together; readers get
/// owned copies and never hold the lock while aggregating.
#[derive(Debug, Clone, Default)]
pub struct SharedTransactionStore {
    inner: Arc<RwLock<TransactionStore>>,
}

impl SharedTransactionStore {
    pub fn new(store: TransactionStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub fn record_transaction(
        &self,
        amount: f64,
        description: &str,
        kind: TransactionKind,
        category: Category,
    ) -> Result<Transaction, LedgerError> {
        self.write()
            .record_transaction(amount, description, kind, category)
    }

    pub fn balance(&self) -> f64 {
        self.read().balance()
    }

    pub fn snapshot(&self) -> StoreView {
        let store = self.read();
        StoreView {
            transactions: store.ledger().to_vec(),
            balance: store.balance(),
        }
    }

    pub fn recent(&self, n: usize) -> Vec<Transaction> {
        self.read().recent(n).to_vec()
    }

    // A panic mid-record cannot leave a half-applied entry: validation precedes every write.
    fn read(&self) -> RwLockReadGuard<'_, TransactionStore> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TransactionStore> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
