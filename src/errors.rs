use thiserror::Error;

/// Error type that captures ledger and persistence failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid amount `{0}`: amounts must be finite and greater than zero")]
    InvalidAmount(String),
    #[error("Transaction identifiers are exhausted; no id above {last} is available")]
    IdsExhausted { last: u64 },
    #[error("Corrupt persisted state under `{key}`: {reason}")]
    CorruptPersistedState { key: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl LedgerError {
    pub fn invalid_amount(amount: f64) -> Self {
        Self::InvalidAmount(amount.to_string())
    }

    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptPersistedState {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
