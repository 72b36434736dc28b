// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use homeledger::db;
use homeledger::models::{
    AccountKind, FlowType, NewAccount, NewProperty, NewTransaction, PropertyKind,
};
use homeledger::reports;
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

struct Fixture {
    checking: i64,
    income_cat: i64,
    expense_cat: i64,
    flat: i64,
}

fn seed(conn: &mut Connection) -> Fixture {
    let checking = store::create_account(
        conn,
        &NewAccount {
            name: "Checking".into(),
            kind: AccountKind::Bank,
            initial_balance: dec("1000"),
        },
    )
    .unwrap()
    .id;
    let income_cat = store::create_category(conn, "Salary", "Income").unwrap().id;
    let expense_cat = store::create_category(conn, "Maintenance", "Expense").unwrap().id;
    let flat = store::create_property(
        conn,
        &NewProperty {
            name: "Via Roma 12".into(),
            kind: PropertyKind::OwnedRented,
            acquired_on: Some(date("2019-09-01")),
            value_estimate: Some(dec("200000")),
            monthly_rent_income: Some(dec("800")),
            monthly_rent_expense: None,
            notes: None,
        },
    )
    .unwrap()
    .id;
    Fixture { checking, income_cat, expense_cat, flat }
}

fn add_tx(
    conn: &mut Connection,
    f: &Fixture,
    date_s: &str,
    amount: &str,
    category_id: i64,
    property_id: Option<i64>,
    flow: FlowType,
    tax_relevant: bool,
) {
    store::create_transaction(
        conn,
        &NewTransaction {
            date: date(date_s),
            amount: dec(amount),
            description: format!("{} {}", amount, date_s),
            category_id,
            account_id: f.checking,
            property_id,
            flow,
            tax_relevant,
            notes: None,
        },
    )
    .unwrap();
}

#[test]
fn personal_cash_flow_for_one_month() {
    let mut conn = setup();
    let f = seed(&mut conn);
    add_tx(&mut conn, &f, "2024-01-05", "2500.00", f.income_cat, None, FlowType::Personal, false);
    add_tx(&mut conn, &f, "2024-01-12", "-900.00", f.expense_cat, None, FlowType::Personal, false);
    // Out of period and out of flow, both ignored.
    add_tx(&mut conn, &f, "2024-02-05", "999.00", f.income_cat, None, FlowType::Personal, false);
    add_tx(&mut conn, &f, "2024-01-20", "-77.00", f.expense_cat, Some(f.flat), FlowType::RealEstate, false);

    let report = reports::cash_flow_personal(&conn, 2024, Some(1)).unwrap();
    assert_eq!(report.period, "2024-01");
    assert_eq!(report.income_total, dec("2500.00"));
    assert_eq!(report.expense_total, dec("-900.00"));
    assert_eq!(report.net_savings, dec("1600.00"));
}

#[test]
fn personal_cash_flow_for_a_whole_year() {
    let mut conn = setup();
    let f = seed(&mut conn);
    add_tx(&mut conn, &f, "2024-01-05", "100", f.income_cat, None, FlowType::Personal, false);
    add_tx(&mut conn, &f, "2024-11-05", "200", f.income_cat, None, FlowType::Personal, false);
    add_tx(&mut conn, &f, "2024-06-10", "-50", f.expense_cat, None, FlowType::Personal, false);

    let report = reports::cash_flow_personal(&conn, 2024, None).unwrap();
    assert_eq!(report.period, "2024");
    assert_eq!(report.income_total, dec("300"));
    assert_eq!(report.net_savings, dec("250"));
}

#[test]
fn property_pl_basic_period() {
    let mut conn = setup();
    let f = seed(&mut conn);
    add_tx(&mut conn, &f, "2024-01-02", "800.00", f.income_cat, Some(f.flat), FlowType::RealEstate, false);
    add_tx(&mut conn, &f, "2024-01-20", "-150.00", f.expense_cat, Some(f.flat), FlowType::RealEstate, false);

    let report = reports::property_pl(&conn, f.flat, 2024, Some(1)).unwrap();
    assert_eq!(report.income, dec("800.00"));
    assert_eq!(report.expenses, dec("150.00"));
    assert_eq!(report.operating_margin, dec("650.00"));
}

#[test]
fn property_pl_ignores_non_real_estate_inflows() {
    let mut conn = setup();
    let f = seed(&mut conn);
    // A personal-flow inflow parked on the property is not rent.
    add_tx(&mut conn, &f, "2024-01-02", "500", f.income_cat, Some(f.flat), FlowType::Personal, false);
    add_tx(&mut conn, &f, "2024-01-20", "-100", f.expense_cat, Some(f.flat), FlowType::Personal, false);

    let report = reports::property_pl(&conn, f.flat, 2024, None).unwrap();
    assert_eq!(report.income, dec("0"));
    assert_eq!(report.expenses, dec("100"));
    assert_eq!(report.operating_margin, dec("-100"));
}

#[test]
fn unknown_property_is_not_found() {
    let conn = setup();
    let err = reports::property_pl(&conn, 77, 2024, None).unwrap_err();
    assert!(matches!(
        err,
        homeledger::error::Error::NotFound { entity: "property", .. }
    ));
}

#[test]
fn fiscal_summary_groups_by_flow_and_property() {
    let mut conn = setup();
    let f = seed(&mut conn);
    add_tx(&mut conn, &f, "2024-03-10", "-400.00", f.expense_cat, None, FlowType::Fiscal, true);
    add_tx(&mut conn, &f, "2024-04-01", "-60.00", f.expense_cat, Some(f.flat), FlowType::RealEstate, true);
    add_tx(&mut conn, &f, "2024-04-05", "800.00", f.income_cat, Some(f.flat), FlowType::RealEstate, false);
    // Not tax relevant, not listed.
    add_tx(&mut conn, &f, "2024-05-05", "-10.00", f.expense_cat, None, FlowType::Personal, false);
    // Previous year, ignored entirely.
    add_tx(&mut conn, &f, "2023-04-05", "700.00", f.income_cat, Some(f.flat), FlowType::RealEstate, true);

    let report = reports::fiscal_summary(&conn, 2024).unwrap();
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.total, dec("-460.00"));
    assert_eq!(report.total_by_flow.get("Fiscal"), Some(&dec("-400.00")));
    assert_eq!(report.total_by_flow.get("RealEstate"), Some(&dec("-60.00")));
    assert_eq!(
        report.rent_income_by_property.get("Via Roma 12"),
        Some(&dec("800.00"))
    );
    assert_eq!(report.rent_income_total, dec("800.00"));
}

#[test]
fn net_worth_sums_owned_values_and_balances() {
    let mut conn = setup();
    let f = seed(&mut conn);
    // A rental the user pays for carries no asset value.
    store::create_property(
        &conn,
        &NewProperty {
            name: "Rented flat".into(),
            kind: PropertyKind::RentedLiability,
            acquired_on: None,
            value_estimate: Some(dec("999999")),
            monthly_rent_income: None,
            monthly_rent_expense: Some(dec("950")),
            notes: None,
        },
    )
    .unwrap();
    add_tx(&mut conn, &f, "2024-01-05", "250.00", f.income_cat, None, FlowType::Personal, false);

    let snapshot = reports::net_worth_snapshot(&conn).unwrap();
    assert_eq!(snapshot.property_value_total, dec("200000"));
    assert_eq!(snapshot.account_balance_total, dec("1250.00"));
    assert_eq!(snapshot.residual_debt, dec("0"));
    assert_eq!(snapshot.net_worth, dec("201250.00"));
    assert!(snapshot.warnings.is_empty());
}

#[test]
fn net_worth_prefers_recomputed_balance_on_drift() {
    let mut conn = setup();
    let f = seed(&mut conn);
    add_tx(&mut conn, &f, "2024-01-05", "250.00", f.income_cat, None, FlowType::Personal, false);
    conn.execute(
        "UPDATE accounts SET current_balance='9999' WHERE id=?1",
        [f.checking],
    )
    .unwrap();

    let snapshot = reports::net_worth_snapshot(&conn).unwrap();
    assert_eq!(snapshot.account_balance_total, dec("1250.00"));
    assert_eq!(snapshot.warnings.len(), 1);
    assert!(snapshot.warnings[0].contains("Checking"));
}
