// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use homeledger::db;
use homeledger::ledger;
use homeledger::models::{AccountKind, FlowType, NewAccount, NewTransaction};
use homeledger::reconciler;
use homeledger::store;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn seed_account(conn: &Connection, name: &str, initial: &str) -> i64 {
    store::create_account(
        conn,
        &NewAccount {
            name: name.into(),
            kind: AccountKind::Bank,
            initial_balance: dec(initial),
        },
    )
    .unwrap()
    .id
}

fn tx(date_s: &str, amount: &str, category_id: i64, account_id: i64) -> NewTransaction {
    NewTransaction {
        date: date(date_s),
        amount: dec(amount),
        description: "entry".into(),
        category_id,
        account_id,
        property_id: None,
        flow: FlowType::Personal,
        tax_relevant: false,
        notes: None,
    }
}

#[test]
fn deposit_updates_cached_balance() {
    let mut conn = setup();
    let checking = seed_account(&conn, "Checking", "1000.00");
    let salary = store::create_category(&conn, "Salary", "Income").unwrap().id;

    store::create_transaction(&mut conn, &tx("2024-01-05", "250.00", salary, checking)).unwrap();

    let summary = ledger::account_summary(&conn, checking).unwrap();
    assert_eq!(summary.computed_balance, dec("1250.00"));
    assert_eq!(summary.stored_balance, dec("1250.00"));
    let report = reconciler::verify_consistency(&conn, checking).unwrap();
    assert!(report.consistent);
}

#[test]
fn delete_restores_prior_balance() {
    let mut conn = setup();
    let checking = seed_account(&conn, "Checking", "1000.00");
    let salary = store::create_category(&conn, "Salary", "Income").unwrap().id;
    let misc = store::create_category(&conn, "Other", "Expense").unwrap().id;

    store::create_transaction(&mut conn, &tx("2024-01-05", "250.00", salary, checking)).unwrap();
    let spend =
        store::create_transaction(&mut conn, &tx("2024-01-10", "-300.00", misc, checking)).unwrap();
    assert_eq!(
        store::get_account(&conn, checking).unwrap().current_balance,
        dec("950.00")
    );
    let before = ledger::account_summary(&conn, checking).unwrap();
    assert_eq!(before.transaction_count, 2);

    store::delete_transaction(&mut conn, spend.id).unwrap();

    let after = ledger::account_summary(&conn, checking).unwrap();
    assert_eq!(after.computed_balance, dec("1250.00"));
    assert_eq!(after.transaction_count, before.transaction_count - 1);
    assert!(reconciler::verify_consistency(&conn, checking).unwrap().consistent);
}

#[test]
fn recompute_is_idempotent() {
    let mut conn = setup();
    let checking = seed_account(&conn, "Checking", "10.10");
    let misc = store::create_category(&conn, "Other", "Expense").unwrap().id;
    for i in 1..=9 {
        store::create_transaction(
            &mut conn,
            &tx(&format!("2024-01-0{}", i), "-0.10", misc, checking),
        )
        .unwrap();
    }

    let first = reconciler::recompute(&conn, checking).unwrap();
    let second = reconciler::recompute(&conn, checking).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, dec("9.20"));
}

#[test]
fn consistency_survives_a_mutation_sequence() {
    let mut conn = setup();
    let checking = seed_account(&conn, "Checking", "500");
    let savings = seed_account(&conn, "Savings", "0");
    let misc = store::create_category(&conn, "Other", "Expense").unwrap().id;

    let a = store::create_transaction(&mut conn, &tx("2024-02-01", "100.25", misc, checking)).unwrap();
    let b = store::create_transaction(&mut conn, &tx("2024-02-02", "-40.75", misc, checking)).unwrap();
    store::create_transaction(&mut conn, &tx("2024-02-03", "12.00", misc, savings)).unwrap();

    let mut edited = a.clone();
    edited.amount = dec("90.25");
    store::update_transaction(&mut conn, &edited).unwrap();
    store::delete_transaction(&mut conn, b.id).unwrap();

    for report in reconciler::verify_all(&conn).unwrap() {
        assert!(report.consistent, "account {} drifted", report.account_name);
    }
    assert_eq!(
        store::get_account(&conn, checking).unwrap().current_balance,
        dec("590.25")
    );
}

#[test]
fn moving_a_transaction_applies_compensating_deltas() {
    let mut conn = setup();
    let checking = seed_account(&conn, "Checking", "100");
    let savings = seed_account(&conn, "Savings", "100");
    let misc = store::create_category(&conn, "Other", "Expense").unwrap().id;

    let t = store::create_transaction(&mut conn, &tx("2024-03-01", "-30", misc, checking)).unwrap();
    assert_eq!(store::get_account(&conn, checking).unwrap().current_balance, dec("70"));

    let mut moved = t.clone();
    moved.account_id = savings;
    moved.amount = dec("-20");
    store::update_transaction(&mut conn, &moved).unwrap();

    assert_eq!(store::get_account(&conn, checking).unwrap().current_balance, dec("100"));
    assert_eq!(store::get_account(&conn, savings).unwrap().current_balance, dec("80"));
    assert!(reconciler::verify_consistency(&conn, checking).unwrap().consistent);
    assert!(reconciler::verify_consistency(&conn, savings).unwrap().consistent);
}

#[test]
fn drift_is_detected_and_recompute_heals_it() {
    let mut conn = setup();
    let checking = seed_account(&conn, "Checking", "100");
    let misc = store::create_category(&conn, "Other", "Expense").unwrap().id;
    store::create_transaction(&mut conn, &tx("2024-03-01", "-25", misc, checking)).unwrap();

    // Simulate an out-of-band edit of the cache.
    conn.execute("UPDATE accounts SET current_balance='999' WHERE id=?1", [checking])
        .unwrap();

    let report = reconciler::verify_consistency(&conn, checking).unwrap();
    assert!(!report.consistent);
    assert_eq!(report.stored, dec("999"));
    assert_eq!(report.computed, dec("75"));
    assert_eq!(report.discrepancy, dec("924"));

    reconciler::recompute(&conn, checking).unwrap();
    assert!(reconciler::verify_consistency(&conn, checking).unwrap().consistent);
}

#[test]
fn drift_can_be_escalated_to_an_error() {
    let mut conn = setup();
    let checking = seed_account(&conn, "Checking", "100");
    let misc = store::create_category(&conn, "Other", "Expense").unwrap().id;
    store::create_transaction(&mut conn, &tx("2024-03-01", "-25", misc, checking)).unwrap();

    let ok = reconciler::verify_consistency(&conn, checking).unwrap();
    assert_eq!(ok.into_result().unwrap(), dec("75"));

    conn.execute("UPDATE accounts SET current_balance='999' WHERE id=?1", [checking])
        .unwrap();
    let drifted = reconciler::verify_consistency(&conn, checking).unwrap();
    assert!(matches!(
        drifted.into_result().unwrap_err(),
        homeledger::error::Error::InconsistentBalance { account_id, .. } if account_id == checking
    ));
}

#[test]
fn verify_is_side_effect_free() {
    let mut conn = setup();
    let checking = seed_account(&conn, "Checking", "100");
    let misc = store::create_category(&conn, "Other", "Expense").unwrap().id;
    store::create_transaction(&mut conn, &tx("2024-03-01", "-25", misc, checking)).unwrap();
    conn.execute("UPDATE accounts SET current_balance='999' WHERE id=?1", [checking])
        .unwrap();

    reconciler::verify_consistency(&conn, checking).unwrap();
    // Still drifted: verification must not write.
    assert_eq!(
        store::get_account(&conn, checking).unwrap().current_balance,
        dec("999")
    );
}
