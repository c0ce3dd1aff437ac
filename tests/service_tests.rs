mod common;

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use common::noon;
use expense_core::{
    core::{
        services::{BalanceService, SpendingService, SummaryService},
        CalendarFrame, FixedClock,
    },
    ledger::{fold_balance, Category, SharedTransactionStore, TransactionKind, TransactionStore},
};

const EPSILON: f64 = 1e-9;

/// Sixty days of mixed activity: income every fifth day, an expense every day.
fn busy_store(clock: &Arc<FixedClock>) -> TransactionStore {
    let mut store = TransactionStore::with_clock(clock.clone());
    for day in 0..60 {
        if day % 5 == 0 {
            store.record_income(120.0, Some("gig")).unwrap();
        }
        let category = Category::ALL[day % Category::ALL.len()];
        store
            .record_expense(3.25 + day as f64, None, category)
            .unwrap();
        clock.advance(Duration::days(1));
    }
    store
}

#[test]
fn paycheck_then_coffee_today() {
    let clock = Arc::new(FixedClock::new(noon(2024, 2, 29)));
    let mut store = TransactionStore::with_clock(clock.clone());
    store
        .record_transaction(100.0, "paycheck", TransactionKind::Income, Category::Other)
        .unwrap();
    store
        .record_transaction(20.0, "coffee", TransactionKind::Expense, Category::Food)
        .unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let frame = CalendarFrame::utc();
    let spending = SpendingService::aggregate_daily_spending(store.ledger(), 30, today, frame);
    let series = BalanceService::reconstruct_balance_series(store.ledger(), 30, today, frame);

    assert_eq!(store.balance(), 80.0);
    assert_eq!(spending.len(), 30);
    assert_eq!(spending[29].date_key.to_string(), "2024-02-29");
    assert_eq!(spending[29].total, 20.0);
    assert!(spending[..29].iter().all(|bucket| bucket.total == 0.0));
    assert_eq!(series[29].balance, 80.0);
    assert_eq!(series[28].balance, 0.0);
}

#[test]
fn daily_totals_sum_to_windowed_expenses() {
    let clock = Arc::new(FixedClock::new(noon(2024, 1, 1)));
    let store = busy_store(&clock);
    let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let frame = CalendarFrame::utc();

    let buckets = SpendingService::aggregate_daily_spending(store.ledger(), 30, today, frame);
    let first = buckets[0].date_key.date();
    let expected: f64 = store
        .ledger()
        .iter()
        .filter(|txn| txn.is_expense())
        .filter(|txn| {
            let date = frame.date_of(txn.occurred_at());
            date >= first && date <= today
        })
        .map(|txn| txn.amount())
        .sum();
    let actual: f64 = buckets.iter().map(|bucket| bucket.total).sum();
    assert!((actual - expected).abs() < EPSILON);
    assert!(buckets.iter().all(|bucket| bucket.total > 0.0));
}

#[test]
fn last_trend_point_equals_cached_balance() {
    let clock = Arc::new(FixedClock::new(noon(2024, 1, 1)));
    let store = busy_store(&clock);
    let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

    for offset in [-600, 0, 330, 690] {
        let frame = CalendarFrame::from_offset_minutes(offset).unwrap();
        let series = BalanceService::reconstruct_balance_series(store.ledger(), 30, today, frame);
        assert_eq!(series.len(), 30);
        assert!((series[29].balance - store.balance()).abs() < EPSILON);
    }

    let totals = SummaryService::summarize(store.ledger());
    assert!((totals.net - store.balance()).abs() < EPSILON);
    assert_eq!(totals.count, store.len());
}

#[test]
fn window_lengths_are_exact() {
    let clock = Arc::new(FixedClock::new(noon(2024, 1, 1)));
    let store = busy_store(&clock);
    let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let frame = CalendarFrame::utc();

    for days in [1, 7, 30, 90] {
        assert_eq!(
            SpendingService::aggregate_daily_spending(store.ledger(), days, today, frame).len(),
            days
        );
        assert_eq!(
            BalanceService::reconstruct_balance_series(store.ledger(), days, today, frame).len(),
            days
        );
    }
}

#[test]
fn shared_store_snapshot_feeds_aggregators() {
    let clock = Arc::new(FixedClock::new(noon(2024, 3, 3)));
    let shared = SharedTransactionStore::new(TransactionStore::with_clock(clock));
    shared
        .record_transaction(30.0, "refund", TransactionKind::Income, Category::Other)
        .unwrap();
    shared
        .record_transaction(12.0, "taxi", TransactionKind::Expense, Category::Transport)
        .unwrap();

    let view = shared.snapshot();
    assert!((view.balance - fold_balance(&view.transactions)).abs() < EPSILON);

    let today = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
    let series =
        BalanceService::reconstruct_balance_series(&view.transactions, 3, today, CalendarFrame::utc());
    assert_eq!(series[2].balance, view.balance);
}
