// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only query surface over the entity store. Nothing here mutates
//! state; the reports and the CLI listing commands are built on top of it.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Result;
use crate::models::{FlowType, decimal_col, sql_conv};
use crate::store;

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<i64>,
    pub property_id: Option<i64>,
    pub category_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// A transaction joined with the names it references, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionDetail {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub direction: &'static str,
    pub description: String,
    pub category: String,
    pub account: String,
    pub property: Option<String>,
    pub flow: FlowType,
    pub tax_relevant: bool,
}

/// Matching transactions ordered by (date, id), each joined with its
/// category, account and optional property. Only the matching rows are
/// touched; lookups go through the date/account/property indexes.
pub fn transactions_in_period(
    conn: &Connection,
    filter: &TransactionFilter,
) -> Result<Vec<TransactionDetail>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, t.amount, t.description, c.name, a.name, p.name, t.flow, t.tax_relevant
         FROM transactions t
         JOIN categories c ON c.id = t.category_id
         JOIN accounts a ON a.id = t.account_id
         LEFT JOIN properties p ON p.id = t.property_id
         WHERE 1=1",
    );
    let mut args: Vec<String> = Vec::new();

    if let Some(from) = filter.date_from {
        sql.push_str(" AND t.date >= ?");
        args.push(from.to_string());
    }
    if let Some(to) = filter.date_to {
        sql.push_str(" AND t.date <= ?");
        args.push(to.to_string());
    }
    if let Some(id) = filter.account_id {
        sql.push_str(" AND t.account_id = ?");
        args.push(id.to_string());
    }
    if let Some(id) = filter.property_id {
        sql.push_str(" AND t.property_id = ?");
        args.push(id.to_string());
    }
    if let Some(id) = filter.category_id {
        sql.push_str(" AND t.category_id = ?");
        args.push(id.to_string());
    }
    sql.push_str(" ORDER BY t.date, t.id");

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> =
        args.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let amount = decimal_col(r, 2)?;
        let flow: String = r.get(7)?;
        out.push(TransactionDetail {
            id: r.get(0)?,
            date: r.get(1)?,
            amount,
            direction: if amount > Decimal::ZERO { "Income" } else { "Expense" },
            description: r.get(3)?,
            category: r.get(4)?,
            account: r.get(5)?,
            property: r.get(6)?,
            flow: FlowType::parse(&flow).map_err(|e| sql_conv(7, e))?,
            tax_relevant: r.get(8)?,
        });
    }
    Ok(out)
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub account_id: i64,
    pub account_name: String,
    pub stored_balance: Decimal,
    pub computed_balance: Decimal,
    pub transaction_count: i64,
    pub last_transaction_date: Option<NaiveDate>,
}

pub fn account_summary(conn: &Connection, account_id: i64) -> Result<AccountSummary> {
    let account = store::get_account(conn, account_id)?;
    let mut stmt =
        conn.prepare("SELECT amount, date FROM transactions WHERE account_id = ?1")?;
    let mut rows = stmt.query([account_id])?;
    let mut computed = account.initial_balance;
    let mut count = 0i64;
    let mut last_date: Option<NaiveDate> = None;
    while let Some(r) = rows.next()? {
        computed += decimal_col(r, 0)?;
        let date: NaiveDate = r.get(1)?;
        count += 1;
        if last_date.is_none_or(|d| date > d) {
            last_date = Some(date);
        }
    }
    Ok(AccountSummary {
        account_id,
        account_name: account.name,
        stored_balance: account.current_balance,
        computed_balance: computed,
        transaction_count: count,
        last_transaction_date: last_date,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertySummary {
    pub property_id: i64,
    pub property_name: String,
    pub transaction_count: i64,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net: Decimal,
}

pub fn property_summary(conn: &Connection, property_id: i64) -> Result<PropertySummary> {
    let property = store::get_property(conn, property_id)?;
    let mut stmt = conn.prepare("SELECT amount FROM transactions WHERE property_id = ?1")?;
    let mut rows = stmt.query([property_id])?;
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut count = 0i64;
    while let Some(r) = rows.next()? {
        let amount = decimal_col(r, 0)?;
        count += 1;
        if amount > Decimal::ZERO {
            income += amount;
        } else {
            expense += -amount;
        }
    }
    Ok(PropertySummary {
        property_id,
        property_name: property.name,
        transaction_count: count,
        total_income: income,
        total_expense: expense,
        net: income - expense,
    })
}
