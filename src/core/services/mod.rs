//! Pure read-side computations over a ledger snapshot.

pub mod balance_service;
pub mod spending_service;
pub mod summary_service;

pub use balance_service::{BalancePoint, BalanceService};
pub use spending_service::{DailySpending, SpendingService};
pub use summary_service::{LedgerTotals, SummaryService};
