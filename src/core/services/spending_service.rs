use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::calendar::{CalendarFrame, DateKey};
use crate::ledger::Transaction;

/// Expense total for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySpending {
    pub date_key: DateKey,
    pub total: f64,
}

/// Builds the daily spending histogram.
pub struct SpendingService;

impl SpendingService {
    /// Sums expenses per calendar day over the `window_days` days ending at `today`.
    ///
    /// The result has `window_days` buckets (see [`CalendarFrame::window`] for the cap), oldest
    /// first, with zero totals for days without expenses. Income entries and expenses outside the window are ignored.
    pub fn aggregate_daily_spending(
        ledger: &[Transaction],
        window_days: usize,
        today: NaiveDate,
        frame: CalendarFrame,
    ) -> Vec<DailySpending> {
        let days = CalendarFrame::window(today, window_days);
        let Some(&first) = days.first() else {
            return Vec::new();
        };

        let mut totals: HashMap<NaiveDate, f64> = HashMap::new();
        for txn in ledger.iter().filter(|txn| txn.is_expense()) {
            let date = frame.date_of(txn.occurred_at());
            if date < first || date > today {
                continue;
            }
            *totals.entry(date).or_insert(0.0) += txn.amount();
        }

        days.into_iter()
            .map(|date| DailySpending {
                date_key: DateKey::new(date),
                total: totals.get(&date).copied().unwrap_or(0.0),
            })
            .collect()
    }
}
