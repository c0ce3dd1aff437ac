use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::calendar::{CalendarFrame, DateKey};
use crate::ledger::Transaction;

/// Running balance at the end of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalancePoint {
    pub date_key: DateKey,
    pub balance: f64,
}

/// Rebuilds historical end-of-day balances from the ledger.
pub struct BalanceService;

impl BalanceService {
    /// Balance after every transaction dated on or before each day of the window.
    ///
    /// Entries are replayed in timestamp order, so the last point of a window ending today
    /// equals the store's cached balance whenever no entry is dated in the future.
    pub fn reconstruct_balance_series(
        ledger: &[Transaction],
        window_days: usize,
        today: NaiveDate,
        frame: CalendarFrame,
    ) -> Vec<BalancePoint> {
        let days = CalendarFrame::window(today, window_days);
        if days.is_empty() {
            return Vec::new();
        }

        let closing = Self::closing_balances(ledger, frame);
        let mut cursor = 0;
        let mut running = 0.0;

        days.into_iter()
            .map(|date| {
                while let Some((entry_date, balance)) = closing.get(cursor) {
                    if *entry_date > date {
                        break;
                    }
                    running = *balance;
                    cursor += 1;
                }
                BalancePoint {
                    date_key: DateKey::new(date),
                    balance: running,
                }
            })
            .collect()
    }

    // Cumulative balance at the close of every date that has entries, ascending by date.
    fn closing_balances(ledger: &[Transaction], frame: CalendarFrame) -> Vec<(NaiveDate, f64)> {
        // Oldest insertion first; the stable sort keeps that order for equal timestamps.
        let mut ordered: Vec<&Transaction> = ledger.iter().rev().collect();
        ordered.sort_by_key(|txn| txn.occurred_at());

        let mut closing: Vec<(NaiveDate, f64)> = Vec::new();
        let mut running = 0.0;
        for txn in ordered {
            running += txn.signed_amount();
            let date = frame.date_of(txn.occurred_at());
            match closing.last_mut() {
                Some((last, balance)) if *last == date => *balance = running,
                _ => closing.push((date, running)),
            }
        }
        closing
    }
}
