mod common;

use std::fs;
use std::sync::Arc;

use chrono::Duration;
use common::{noon, open_manager, temp_store_dir};
use expense_core::{
    config::Config,
    core::FixedClock,
    ledger::Category,
    LedgerError,
    storage::{
        JsonFileGateway, LoadSource, PersistenceGateway, LEGACY_BALANCE_KEY,
        LEGACY_TRANSACTIONS_KEY, SNAPSHOT_KEY,
    },
};

#[test]
fn reload_reproduces_ledger_balance_and_series() {
    let dir = temp_store_dir();
    let clock = Arc::new(FixedClock::new(noon(2024, 5, 1)));

    let mut manager = open_manager(&dir, Config::default(), clock.clone());
    manager.record_income(250.0, Some("salary")).unwrap();
    clock.advance(Duration::days(3));
    manager.record_expense(42.0, Some("groceries"), Category::Food).unwrap();
    clock.advance(Duration::hours(5));
    manager.record_quick_expense(10.0, Category::Transport).unwrap();

    let reloaded = open_manager(&dir, Config::default(), clock.clone());
    assert_eq!(reloaded.load_source(), LoadSource::Snapshot);
    assert!(reloaded.load_warnings().is_empty());
    assert_eq!(reloaded.store().ledger(), manager.store().ledger());
    assert_eq!(reloaded.balance(), manager.balance());
    assert_eq!(reloaded.daily_spending(), manager.daily_spending());
    assert_eq!(reloaded.balance_series(), manager.balance_series());

    // A second round trip changes nothing.
    let again = open_manager(&dir, Config::default(), clock);
    assert_eq!(again.store().ledger(), reloaded.store().ledger());
}

#[test]
fn snapshot_is_a_single_file() {
    let dir = temp_store_dir();
    let clock = Arc::new(FixedClock::new(noon(2024, 5, 1)));
    let mut manager = open_manager(&dir, Config::default(), clock);
    manager.record_income(1.0, None).unwrap();
    manager.record_expense(0.5, None, Category::Other).unwrap();

    let files: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files, vec![format!("{SNAPSHOT_KEY}.json")]);

    let raw = fs::read_to_string(dir.join(format!("{SNAPSHOT_KEY}.json"))).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["balance"], 0.5);
    assert_eq!(value["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(value["transactions"][0]["kind"], "expense");
}

#[test]
fn corrupt_snapshot_starts_empty_and_recovers_on_next_write() {
    let dir = temp_store_dir();
    fs::write(dir.join(format!("{SNAPSHOT_KEY}.json")), "{\"schema_version\": ").unwrap();
    let clock = Arc::new(FixedClock::new(noon(2024, 6, 10)));

    let mut manager = open_manager(&dir, Config::default(), clock.clone());
    assert_eq!(manager.load_source(), LoadSource::Empty);
    assert_eq!(manager.load_warnings().len(), 1);
    assert_eq!(manager.balance(), 0.0);

    manager.record_income(5.0, None).unwrap();
    let reloaded = open_manager(&dir, Config::default(), clock);
    assert_eq!(reloaded.load_source(), LoadSource::Snapshot);
    assert_eq!(reloaded.balance(), 5.0);
}

#[test]
fn legacy_two_key_state_is_migrated() {
    let dir = temp_store_dir();
    let gateway = JsonFileGateway::new(dir.clone()).unwrap();
    gateway
        .set(
            LEGACY_TRANSACTIONS_KEY,
            r#"[
                {"id": 1717000000000, "amount": 12.5, "description": "cinema",
                 "type": "expense", "category": "Entertainment", "date": "2024-05-29T19:00:00.000Z"},
                {"id": 1716000000000, "amount": 200, "description": "",
                 "type": "income", "category": "Food", "date": "2024-05-18T08:00:00.000Z"}
            ]"#,
        )
        .unwrap();
    gateway.set(LEGACY_BALANCE_KEY, "187.5").unwrap();

    let clock = Arc::new(FixedClock::new(noon(2024, 6, 1)));
    let manager = open_manager(&dir, Config::default(), clock.clone());
    assert_eq!(manager.load_source(), LoadSource::Legacy);
    assert!(manager.load_warnings().is_empty());
    assert_eq!(manager.balance(), 187.5);
    assert_eq!(manager.store().ledger()[1].description(), "Money added");

    let reopened = open_manager(&dir, Config::default(), clock);
    assert_eq!(reopened.load_source(), LoadSource::Snapshot);
    assert_eq!(reopened.store().ledger(), manager.store().ledger());
}

#[test]
fn exhausted_ids_refuse_new_entries_without_touching_the_file() {
    let dir = temp_store_dir();
    let raw = r#"{
        "schema_version": 1,
        "balance": 12.0,
        "transactions": [
            {"id": 18446744073709551615, "amount": 12.0, "kind": "income",
             "description": "carried over", "occurred_at": "2024-06-30T09:00:00Z"}
        ]
    }"#;
    let path = dir.join(format!("{SNAPSHOT_KEY}.json"));
    fs::write(&path, raw).unwrap();
    let clock = Arc::new(FixedClock::new(noon(2024, 7, 1)));

    let mut manager = open_manager(&dir, Config::default(), clock);
    assert!(manager.load_warnings().is_empty());
    let err = manager
        .record_expense(1.0, Some("tea"), Category::Food)
        .expect_err("id space is exhausted");
    assert!(matches!(err, LedgerError::IdsExhausted { .. }));
    assert_eq!(manager.balance(), 12.0);
    assert_eq!(manager.store().len(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), raw);
}

#[test]
fn legacy_entries_with_colliding_ids_survive_migration() {
    let dir = temp_store_dir();
    let gateway = JsonFileGateway::new(dir.clone()).unwrap();
    gateway
        .set(
            LEGACY_TRANSACTIONS_KEY,
            r#"[
                {"id": 1722500000000, "amount": 20, "description": "lunch",
                 "type": "expense", "category": "Food", "date": "2024-08-01T08:13:20.000Z"},
                {"id": 1722500000000, "amount": 100, "description": "refund",
                 "type": "income", "category": "Other", "date": "2024-08-01T08:13:20.000Z"}
            ]"#,
        )
        .unwrap();
    gateway.set(LEGACY_BALANCE_KEY, "80").unwrap();

    let clock = Arc::new(FixedClock::new(noon(2024, 8, 2)));
    let mut manager = open_manager(&dir, Config::default(), clock.clone());
    assert!(manager.load_warnings().is_empty());
    assert_eq!(manager.balance(), 80.0);
    assert_eq!(manager.store().len(), 2);

    let next = manager.record_income(1.0, None).unwrap();
    assert_eq!(next.id().0, 1_722_500_000_002);

    let reopened = open_manager(&dir, Config::default(), clock);
    assert_eq!(reopened.load_source(), LoadSource::Snapshot);
    assert_eq!(reopened.balance(), 81.0);
}
