//! Ledger entries, categories, and the append-only store.

pub mod category;
pub mod shared;
pub mod store;
pub mod transaction;

pub use category::Category;
pub use shared::{SharedTransactionStore, StoreView};
pub use store::{fold_balance, TransactionStore};
pub use transaction::{is_valid_amount, Transaction, TransactionId, TransactionKind};
