// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("org.homeledger", "Homeledger", "homeledger"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("homeledger.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

/// Creates tables, indexes and the three read-only views. Idempotent, also
/// used by the integration tests against an in-memory connection.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS properties(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        kind TEXT NOT NULL CHECK(kind IN ('OwnerOccupied','OwnedRented','RentedLiability')),
        acquired_on TEXT,
        value_estimate TEXT,
        monthly_rent_income TEXT,
        monthly_rent_expense TEXT,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        kind TEXT NOT NULL CHECK(kind IN ('Bank','Savings','SimpleInvestment','Cash')),
        initial_balance TEXT NOT NULL DEFAULT '0',
        current_balance TEXT NOT NULL DEFAULT '0',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        macro_kind TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        description TEXT NOT NULL,
        category_id INTEGER NOT NULL,
        account_id INTEGER NOT NULL,
        property_id INTEGER,
        flow TEXT NOT NULL CHECK(flow IN ('Personal','RealEstate','Fiscal')),
        tax_relevant INTEGER NOT NULL DEFAULT 0,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE RESTRICT,
        FOREIGN KEY(account_id) REFERENCES accounts(id) ON DELETE RESTRICT,
        FOREIGN KEY(property_id) REFERENCES properties(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions(account_id);
    CREATE INDEX IF NOT EXISTS idx_transactions_property ON transactions(property_id);

    -- Display views. Aggregation here is float-typed SQLite arithmetic and is
    -- for inspection only; the core computes exact Decimal sums in Rust.
    CREATE VIEW IF NOT EXISTS v_transaction_detail AS
    SELECT t.id, t.date,
           substr(t.date, 1, 4) AS year,
           substr(t.date, 6, 2) AS month,
           t.amount,
           CASE WHEN CAST(t.amount AS REAL) > 0 THEN 'Income' ELSE 'Expense' END AS direction,
           t.description,
           c.name AS category,
           a.name AS account,
           p.name AS property,
           t.flow, t.tax_relevant
    FROM transactions t
    JOIN categories c ON c.id = t.category_id
    JOIN accounts a ON a.id = t.account_id
    LEFT JOIN properties p ON p.id = t.property_id;

    CREATE VIEW IF NOT EXISTS v_account_balances AS
    SELECT a.id, a.name,
           a.current_balance AS stored_balance,
           CAST(a.initial_balance AS REAL) + IFNULL(SUM(CAST(t.amount AS REAL)), 0) AS computed_balance,
           COUNT(t.id) AS transaction_count,
           MAX(t.date) AS last_transaction_date
    FROM accounts a
    LEFT JOIN transactions t ON t.account_id = a.id
    GROUP BY a.id;

    CREATE VIEW IF NOT EXISTS v_property_rollup AS
    SELECT p.id, p.name,
           COUNT(t.id) AS transaction_count,
           IFNULL(SUM(CASE WHEN CAST(t.amount AS REAL) > 0 THEN CAST(t.amount AS REAL) END), 0) AS total_income,
           IFNULL(SUM(CASE WHEN CAST(t.amount AS REAL) < 0 THEN -CAST(t.amount AS REAL) END), 0) AS total_expense,
           IFNULL(SUM(CAST(t.amount AS REAL)), 0) AS net
    FROM properties p
    LEFT JOIN transactions t ON t.property_id = p.id
    GROUP BY p.id;
    "#,
    )?;
    Ok(())
}

const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Salary", "Income"),
    ("Rent Received", "Income"),
    ("Groceries", "Expense"),
    ("Utilities", "Expense"),
    ("Maintenance", "Expense"),
    ("Property Tax", "Fiscal"),
    ("Other", "Expense"),
];

pub fn seed_default_categories(conn: &Connection) -> Result<()> {
    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO categories(name, macro_kind) VALUES (?1, ?2)")?;
    for (name, macro_kind) in DEFAULT_CATEGORIES {
        stmt.execute(rusqlite::params![name, macro_kind])?;
    }
    Ok(())
}
