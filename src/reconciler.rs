// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Balance reconciliation: keeps `accounts.current_balance` equal to
//! `initial_balance + Σ transaction amounts`. Sums are accumulated as
//! `Decimal`, never as floats, so long histories cannot drift.

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::decimal_col;
use crate::store;

/// Outcome of comparing the stored cache against a fresh recomputation.
/// Produced without side effects; `discrepancy` is `stored - computed`.
#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyReport {
    pub account_id: i64,
    pub account_name: String,
    pub consistent: bool,
    pub stored: Decimal,
    pub computed: Decimal,
    pub discrepancy: Decimal,
}

impl ConsistencyReport {
    /// Error form for callers that treat drift as fatal rather than as a
    /// warning.
    pub fn into_result(self) -> Result<Decimal> {
        if self.consistent {
            Ok(self.computed)
        } else {
            Err(Error::InconsistentBalance {
                account_id: self.account_id,
                stored: self.stored,
                computed: self.computed,
            })
        }
    }
}

/// Exact balance derived from the transaction history. Read-only.
pub fn computed_balance(conn: &Connection, account_id: i64) -> Result<Decimal> {
    let account = store::get_account(conn, account_id)?;
    let mut stmt = conn.prepare("SELECT amount FROM transactions WHERE account_id = ?1")?;
    let mut rows = stmt.query([account_id])?;
    let mut balance = account.initial_balance;
    while let Some(row) = rows.next()? {
        balance += decimal_col(row, 0)?;
    }
    Ok(balance)
}

/// Recomputes from scratch and persists the result. Idempotent: a second run
/// without intervening mutations writes the same value again.
pub fn recompute(conn: &Connection, account_id: i64) -> Result<Decimal> {
    let balance = computed_balance(conn, account_id)?;
    conn.execute(
        "UPDATE accounts SET current_balance = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![balance.to_string(), account_id],
    )?;
    Ok(balance)
}

/// O(1) incremental update for a single transaction mutation. Must run inside
/// the same SQLite transaction as the mutation it accounts for; the store is
/// the only caller.
pub fn apply_delta(conn: &Connection, account_id: i64, delta: Decimal) -> Result<()> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT current_balance FROM accounts WHERE id = ?1",
            [account_id],
            |r| r.get(0),
        )
        .optional()?;
    let stored = stored.ok_or_else(|| Error::not_found("account", account_id))?;
    let stored: Decimal = stored
        .parse()
        .map_err(|e| Error::InvalidDomainValue(format!("stored balance '{}': {}", stored, e)))?;
    conn.execute(
        "UPDATE accounts SET current_balance = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![(stored + delta).to_string(), account_id],
    )?;
    Ok(())
}

pub fn verify_consistency(conn: &Connection, account_id: i64) -> Result<ConsistencyReport> {
    let account = store::get_account(conn, account_id)?;
    let computed = computed_balance(conn, account_id)?;
    Ok(ConsistencyReport {
        account_id,
        account_name: account.name,
        consistent: account.current_balance == computed,
        stored: account.current_balance,
        computed,
        discrepancy: account.current_balance - computed,
    })
}

/// Whole-book sweep over every account, for the `verify` command.
pub fn verify_all(conn: &Connection) -> Result<Vec<ConsistencyReport>> {
    let mut out = Vec::new();
    for account in store::list_accounts(conn)? {
        out.push(verify_consistency(conn, account.id)?);
    }
    Ok(out)
}
