#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

// ── Initialization ────────────────────────────────────────────

#[test]
fn test_fresh_store_has_zero_budget() {
    let store = LedgerStore::open_in_memory().unwrap();
    assert_eq!(store.current_budget().unwrap(), Decimal::ZERO);
    assert!(store.list_expenses().unwrap().is_empty());
}

#[test]
fn test_initialize_is_idempotent() {
    let mut store = LedgerStore::open_in_memory().unwrap();
    store.adjust_budget(dec!(250)).unwrap();
    store.insert_expense(dec!(10), "Food", "Lunch").unwrap();

    store.initialize().unwrap();
    store.initialize().unwrap();

    assert_eq!(store.current_budget().unwrap(), dec!(250));
    assert_eq!(store.expense_count().unwrap(), 1);
    let rows: i64 = store
        .conn
        .query_row("SELECT COUNT(*) FROM budget", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn test_schema_version_recorded() {
    let store = LedgerStore::open_in_memory().unwrap();
    let version: i32 = store
        .conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_newer_schema_version_rejected() {
    let mut store = LedgerStore::open_in_memory().unwrap();
    store
        .conn
        .execute("UPDATE schema_version SET version = 99", [])
        .unwrap();
    assert!(store.initialize().is_err());
}

// ── Expenses ──────────────────────────────────────────────────

#[test]
fn test_insert_assigns_increasing_ids() {
    let store = LedgerStore::open_in_memory().unwrap();
    let a = store.insert_expense(dec!(1), "A", "first").unwrap();
    let b = store.insert_expense(dec!(2), "B", "second").unwrap();
    let c = store.insert_expense(dec!(3), "C", "third").unwrap();
    assert_eq!(a, 1);
    assert!(a < b && b < c);
}

#[test]
fn test_list_preserves_insertion_order_and_fields() {
    let store = LedgerStore::open_in_memory().unwrap();
    store.insert_expense(dec!(200), "Food", "Groceries").unwrap();
    store.insert_expense(dec!(10.25), "Fun", "Theater").unwrap();

    let expenses = store.list_expenses().unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].amount, dec!(200));
    assert_eq!(expenses[0].category, "Food");
    assert_eq!(expenses[0].description, "Groceries");
    assert_eq!(expenses[1].amount, dec!(10.25));
    assert_eq!(expenses[1].category, "Fun");
}

#[test]
fn test_insert_does_not_touch_budget() {
    let store = LedgerStore::open_in_memory().unwrap();
    store.insert_expense(dec!(999), "Car", "No checks here").unwrap();
    assert_eq!(store.current_budget().unwrap(), Decimal::ZERO);
}

#[test]
fn test_delete_expense() {
    let store = LedgerStore::open_in_memory().unwrap();
    let keep = store.insert_expense(dec!(1), "A", "keep").unwrap();
    let gone = store.insert_expense(dec!(2), "B", "gone").unwrap();

    assert!(store.delete_expense(gone).unwrap());
    let ids: Vec<_> = store.list_expenses().unwrap().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![keep]);
}

#[test]
fn test_delete_missing_expense_is_noop() {
    let store = LedgerStore::open_in_memory().unwrap();
    store.insert_expense(dec!(5), "A", "a").unwrap();
    assert!(!store.delete_expense(12345).unwrap());
    assert_eq!(store.expense_count().unwrap(), 1);
}

#[test]
fn test_expense_by_id() {
    let store = LedgerStore::open_in_memory().unwrap();
    let id = store.insert_expense(dec!(7.5), "Coffee", "Beans").unwrap();
    let found = store.expense_by_id(id).unwrap().unwrap();
    assert_eq!(found.amount, dec!(7.5));
    assert!(store.expense_by_id(id + 1).unwrap().is_none());
}

// ── Budget ────────────────────────────────────────────────────

#[test]
fn test_adjust_budget_running_sum() {
    let store = LedgerStore::open_in_memory().unwrap();
    let deltas = [dec!(1000), dec!(-250.50), dec!(0.25), dec!(-800)];
    let mut expected = Decimal::ZERO;
    for delta in deltas {
        expected += delta;
        assert_eq!(store.adjust_budget(delta).unwrap(), expected);
        assert_eq!(store.current_budget().unwrap(), expected);
    }
    // Negative balances are allowed
    assert_eq!(store.current_budget().unwrap(), dec!(-50.25));
}

#[test]
fn test_budget_keeps_exact_cents() {
    let store = LedgerStore::open_in_memory().unwrap();
    for _ in 0..10 {
        store.adjust_budget(dec!(0.1)).unwrap();
    }
    assert_eq!(store.current_budget().unwrap(), dec!(1.0));
}

// ── Reset ─────────────────────────────────────────────────────

#[test]
fn test_reset_all() {
    let mut store = LedgerStore::open_in_memory().unwrap();
    store.adjust_budget(dec!(500)).unwrap();
    store.insert_expense(dec!(1), "A", "a").unwrap();
    store.insert_expense(dec!(2), "B", "b").unwrap();

    store.reset_all().unwrap();

    assert_eq!(store.current_budget().unwrap(), Decimal::ZERO);
    assert!(store.list_expenses().unwrap().is_empty());
    let id = store.insert_expense(dec!(3), "C", "c").unwrap();
    assert_eq!(id, 1, "id sequence should restart after reset");
}

#[test]
fn test_reset_all_on_empty_store() {
    let mut store = LedgerStore::open_in_memory().unwrap();
    store.reset_all().unwrap();
    assert_eq!(store.current_budget().unwrap(), Decimal::ZERO);
}

#[test]
fn test_reset_restores_missing_budget_row() {
    let mut store = LedgerStore::open_in_memory().unwrap();
    store.conn.execute("DELETE FROM budget", []).unwrap();
    assert!(store.current_budget().is_err());
    store.reset_all().unwrap();
    assert_eq!(store.current_budget().unwrap(), Decimal::ZERO);
}

// ── Transactions ──────────────────────────────────────────────

#[test]
fn test_transaction_commit() {
    let mut store = LedgerStore::open_in_memory().unwrap();
    {
        let tx = store.begin().unwrap();
        tx.adjust_budget(dec!(40)).unwrap();
        tx.insert_expense(dec!(5), "A", "a").unwrap();
        tx.commit().unwrap();
    }
    assert_eq!(store.current_budget().unwrap(), dec!(40));
    assert_eq!(store.expense_count().unwrap(), 1);
}

#[test]
fn test_transaction_rolls_back_on_drop() {
    let mut store = LedgerStore::open_in_memory().unwrap();
    {
        let tx = store.begin().unwrap();
        tx.adjust_budget(dec!(40)).unwrap();
        tx.insert_expense(dec!(5), "A", "a").unwrap();
        assert_eq!(tx.current_budget().unwrap(), dec!(40));
    }
    assert_eq!(store.current_budget().unwrap(), Decimal::ZERO);
    assert_eq!(store.expense_count().unwrap(), 0);
}

// ── Decoding ──────────────────────────────────────────────────

#[test]
fn test_legacy_real_columns_load() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE expenses (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             amount REAL,
             category TEXT,
             description TEXT
         );
         CREATE TABLE budget (id INTEGER PRIMARY KEY, amount REAL);
         INSERT INTO budget (id, amount) VALUES (1, 787.5);
         INSERT INTO expenses (amount, category, description) VALUES (200.0, 'Food', 'Groceries');
         INSERT INTO expenses (amount, category, description) VALUES (12.5, 'Fun', NULL);",
    )
    .unwrap();

    let mut store = LedgerStore { conn };
    store.initialize().unwrap();

    assert_eq!(store.current_budget().unwrap(), dec!(787.5));
    let expenses = store.list_expenses().unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].amount, dec!(200));
    assert_eq!(expenses[1].amount, dec!(12.5));
    assert_eq!(expenses[1].description, "");

    // REAL affinity turns the text write back into a number; it still reads back exact
    store.adjust_budget(dec!(12.5)).unwrap();
    assert_eq!(store.current_budget().unwrap(), dec!(800));
}

#[test]
fn test_undecodable_amount_is_an_error() {
    let store = LedgerStore::open_in_memory().unwrap();
    store
        .conn
        .execute(
            "INSERT INTO expenses (amount, category, description) VALUES ('lots', 'A', 'a')",
            [],
        )
        .unwrap();
    assert!(store.list_expenses().is_err());
}

// ── On disk ───────────────────────────────────────────────────

#[test]
fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");

    let store = LedgerStore::open(&path).unwrap();
    store.adjust_budget(dec!(1000)).unwrap();
    store.insert_expense(dec!(200), "Food", "Groceries").unwrap();
    store.shutdown().unwrap();

    let store = LedgerStore::open(&path).unwrap();
    assert_eq!(store.current_budget().unwrap(), dec!(1000));
    let expenses = store.list_expenses().unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].description, "Groceries");
    store.shutdown().unwrap();
}

#[test]
fn test_open_in_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no/such/dir/ledger.db");
    let err = LedgerStore::open(&path).err().unwrap();
    assert!(format!("{err:#}").contains("Failed to open database"));
}
