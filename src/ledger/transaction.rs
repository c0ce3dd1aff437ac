//! Immutable ledger entries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;

/// Store-assigned identifier; never reused within a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a transaction relative to the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Applies the sign rule: `+amount` for income, `-amount` for expenses.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Expense => -amount,
        }
    }

    /// Description used when the caller leaves it blank.
    pub fn default_description(self) -> &'static str {
        match self {
            TransactionKind::Income => "Money added",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

/// A single money movement. Fields are read-only once constructed.
///
/// Deserialization goes through [`Transaction::new`], so stored entries get the same
/// description defaulting as freshly recorded ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredTransaction")]
pub struct Transaction {
    id: TransactionId,
    amount: f64,
    kind: TransactionKind,
    category: Category,
    description: String,
    occurred_at: DateTime<Utc>,
}

/// Wire shape of a persisted entry.
#[derive(Deserialize)]
struct StoredTransaction {
    id: TransactionId,
    amount: f64,
    kind: TransactionKind,
    #[serde(default)]
    category: Category,
    #[serde(default)]
    description: String,
    occurred_at: DateTime<Utc>,
}

impl From<StoredTransaction> for Transaction {
    fn from(stored: StoredTransaction) -> Self {
        Transaction::new(
            stored.id,
            stored.amount,
            stored.kind,
            stored.category,
            &stored.description,
            stored.occurred_at,
        )
    }
}

impl Transaction {
    /// Callers must have validated `amount`; see [`is_valid_amount`].
    pub(crate) fn new(
        id: TransactionId,
        amount: f64,
        kind: TransactionKind,
        category: Category,
        description: &str,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        let trimmed = description.trim();
        let description = if trimmed.is_empty() {
            kind.default_description().to_string()
        } else {
            trimmed.to_string()
        };
        Self {
            id,
            amount,
            kind,
            category,
            description,
            occurred_at,
        }
    }

    /// Same entry under another identifier; used when imported ids collide.
    pub(crate) fn with_id(self, id: TransactionId) -> Self {
        Self { id, ..self }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Contribution of this entry to the running balance.
    pub fn signed_amount(&self) -> f64 {
        self.kind.signed(self.amount)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self.kind, TransactionKind::Expense)
    }

    pub fn is_income(&self) -> bool {
        matches!(self.kind, TransactionKind::Income)
    }
}

/// Amounts must be finite and strictly positive.
pub fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount > 0.0
}
