use serde::{Deserialize, Serialize};

use crate::ledger::{Transaction, TransactionKind};

/// Lifetime totals over the whole ledger.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    pub count: usize,
}

pub struct SummaryService;

impl SummaryService {
    pub fn total_income(ledger: &[Transaction]) -> f64 {
        Self::total_of(ledger, TransactionKind::Income)
    }

    pub fn total_expenses(ledger: &[Transaction]) -> f64 {
        Self::total_of(ledger, TransactionKind::Expense)
    }

    /// Income, expenses and their difference in one pass.
    pub fn summarize(ledger: &[Transaction]) -> LedgerTotals {
        let mut totals = ledger
            .iter()
            .rev()
            .fold(LedgerTotals::default(), |mut acc, txn| {
                match txn.kind() {
                    TransactionKind::Income => acc.income += txn.amount(),
                    TransactionKind::Expense => acc.expenses += txn.amount(),
                }
                acc.count += 1;
                acc
            });
        totals.net = totals.income - totals.expenses;
        totals
    }

    fn total_of(ledger: &[Transaction], kind: TransactionKind) -> f64 {
        ledger
            .iter()
            .rev()
            .filter(|txn| txn.kind() == kind)
            .map(Transaction::amount)
            .sum()
    }
}
