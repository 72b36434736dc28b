// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Entity store: validated CRUD over properties, accounts, categories and
//! transactions. Uniqueness and foreign keys are checked up front so callers
//! get a typed error instead of a bare SQLite constraint failure. Every
//! mutation that touches a transaction amount runs in one SQLite transaction
//! together with the balance delta, so the cached account balance can never
//! be observed out of step with the transaction history.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::{
    Account, Category, NewAccount, NewProperty, NewTransaction, Property, Transaction,
};
use crate::reconciler;

fn fk_exists(conn: &Connection, table: &str, id: i64) -> Result<bool> {
    let sql = format!("SELECT 1 FROM {} WHERE id = ?1 LIMIT 1", table);
    let found: Option<i64> = conn.query_row(&sql, [id], |r| r.get(0)).optional()?;
    Ok(found.is_some())
}

fn name_taken(conn: &Connection, table: &str, name: &str, exclude_id: Option<i64>) -> Result<bool> {
    let found: Option<i64> = match exclude_id {
        Some(id) => {
            let sql = format!("SELECT 1 FROM {} WHERE name = ?1 AND id != ?2 LIMIT 1", table);
            conn.query_row(&sql, params![name, id], |r| r.get(0)).optional()?
        }
        None => {
            let sql = format!("SELECT 1 FROM {} WHERE name = ?1 LIMIT 1", table);
            conn.query_row(&sql, params![name], |r| r.get(0)).optional()?
        }
    };
    Ok(found.is_some())
}

fn require_nonempty(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidDomainValue(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn dependent_transactions(conn: &Connection, column: &str, id: i64) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM transactions WHERE {} = ?1", column);
    let n: i64 = conn.query_row(&sql, [id], |r| r.get(0))?;
    Ok(n)
}

// ---------------------------------------------------------------------------
// Properties

pub fn create_property(conn: &Connection, new: &NewProperty) -> Result<Property> {
    require_nonempty("property name", &new.name)?;
    if name_taken(conn, "properties", &new.name, None)? {
        return Err(Error::DuplicateKey {
            entity: "property",
            key: new.name.clone(),
        });
    }
    conn.execute(
        "INSERT INTO properties(name, kind, acquired_on, value_estimate,
                                monthly_rent_income, monthly_rent_expense, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            new.name,
            new.kind.as_str(),
            new.acquired_on,
            new.value_estimate.map(|d| d.to_string()),
            new.monthly_rent_income.map(|d| d.to_string()),
            new.monthly_rent_expense.map(|d| d.to_string()),
            new.notes,
        ],
    )?;
    get_property(conn, conn.last_insert_rowid())
}

pub fn get_property(conn: &Connection, id: i64) -> Result<Property> {
    let sql = format!("SELECT {} FROM properties WHERE id = ?1", Property::COLUMNS);
    conn.query_row(&sql, [id], Property::from_row)
        .optional()?
        .ok_or_else(|| Error::not_found("property", id))
}

pub fn get_property_by_name(conn: &Connection, name: &str) -> Result<Property> {
    let sql = format!("SELECT {} FROM properties WHERE name = ?1", Property::COLUMNS);
    conn.query_row(&sql, [name], Property::from_row)
        .optional()?
        .ok_or_else(|| Error::NotFound {
            entity: "property",
            key: name.to_string(),
        })
}

pub fn list_properties(conn: &Connection) -> Result<Vec<Property>> {
    let sql = format!("SELECT {} FROM properties ORDER BY name", Property::COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], Property::from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn update_property(conn: &Connection, property: &Property) -> Result<Property> {
    require_nonempty("property name", &property.name)?;
    get_property(conn, property.id)?;
    if name_taken(conn, "properties", &property.name, Some(property.id))? {
        return Err(Error::DuplicateKey {
            entity: "property",
            key: property.name.clone(),
        });
    }
    conn.execute(
        "UPDATE properties
         SET name = ?1, kind = ?2, acquired_on = ?3, value_estimate = ?4,
             monthly_rent_income = ?5, monthly_rent_expense = ?6, notes = ?7,
             updated_at = datetime('now')
         WHERE id = ?8",
        params![
            property.name,
            property.kind.as_str(),
            property.acquired_on,
            property.value_estimate.map(|d| d.to_string()),
            property.monthly_rent_income.map(|d| d.to_string()),
            property.monthly_rent_expense.map(|d| d.to_string()),
            property.notes,
            property.id,
        ],
    )?;
    get_property(conn, property.id)
}

/// Deleting a property keeps its transactions but detaches them: the
/// property reference is nulled out in the same unit of work.
pub fn delete_property(conn: &mut Connection, id: i64) -> Result<()> {
    let tx = conn.transaction()?;
    if !fk_exists(&tx, "properties", id)? {
        return Err(Error::not_found("property", id));
    }
    tx.execute(
        "UPDATE transactions SET property_id = NULL, updated_at = datetime('now')
         WHERE property_id = ?1",
        [id],
    )?;
    tx.execute("DELETE FROM properties WHERE id = ?1", [id])?;
    tx.commit()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Accounts

pub fn create_account(conn: &Connection, new: &NewAccount) -> Result<Account> {
    require_nonempty("account name", &new.name)?;
    if name_taken(conn, "accounts", &new.name, None)? {
        return Err(Error::DuplicateKey {
            entity: "account",
            key: new.name.clone(),
        });
    }
    // A fresh account has no transactions, so the cache starts at the
    // initial balance.
    conn.execute(
        "INSERT INTO accounts(name, kind, initial_balance, current_balance)
         VALUES (?1, ?2, ?3, ?3)",
        params![new.name, new.kind.as_str(), new.initial_balance.to_string()],
    )?;
    get_account(conn, conn.last_insert_rowid())
}

pub fn get_account(conn: &Connection, id: i64) -> Result<Account> {
    let sql = format!("SELECT {} FROM accounts WHERE id = ?1", Account::COLUMNS);
    conn.query_row(&sql, [id], Account::from_row)
        .optional()?
        .ok_or_else(|| Error::not_found("account", id))
}

pub fn get_account_by_name(conn: &Connection, name: &str) -> Result<Account> {
    let sql = format!("SELECT {} FROM accounts WHERE name = ?1", Account::COLUMNS);
    conn.query_row(&sql, [name], Account::from_row)
        .optional()?
        .ok_or_else(|| Error::NotFound {
            entity: "account",
            key: name.to_string(),
        })
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let sql = format!("SELECT {} FROM accounts ORDER BY name", Account::COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], Account::from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// `current_balance` is not writable through here: it is derived state. A
/// changed initial balance triggers a recompute inside the same unit of work.
pub fn update_account(conn: &mut Connection, account: &Account) -> Result<Account> {
    require_nonempty("account name", &account.name)?;
    let tx = conn.transaction()?;
    let old = get_account(&tx, account.id)?;
    if name_taken(&tx, "accounts", &account.name, Some(account.id))? {
        return Err(Error::DuplicateKey {
            entity: "account",
            key: account.name.clone(),
        });
    }
    tx.execute(
        "UPDATE accounts
         SET name = ?1, kind = ?2, initial_balance = ?3, updated_at = datetime('now')
         WHERE id = ?4",
        params![
            account.name,
            account.kind.as_str(),
            account.initial_balance.to_string(),
            account.id,
        ],
    )?;
    if old.initial_balance != account.initial_balance {
        reconciler::recompute(&tx, account.id)?;
    }
    let updated = get_account(&tx, account.id)?;
    tx.commit()?;
    Ok(updated)
}

pub fn delete_account(conn: &Connection, id: i64) -> Result<()> {
    if !fk_exists(conn, "accounts", id)? {
        return Err(Error::not_found("account", id));
    }
    let dependents = dependent_transactions(conn, "account_id", id)?;
    if dependents > 0 {
        return Err(Error::DependencyExists {
            entity: "account",
            id,
            dependents,
        });
    }
    conn.execute("DELETE FROM accounts WHERE id = ?1", [id])?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Categories

pub fn create_category(conn: &Connection, name: &str, macro_kind: &str) -> Result<Category> {
    require_nonempty("category name", name)?;
    require_nonempty("category macro kind", macro_kind)?;
    if name_taken(conn, "categories", name, None)? {
        return Err(Error::DuplicateKey {
            entity: "category",
            key: name.to_string(),
        });
    }
    conn.execute(
        "INSERT INTO categories(name, macro_kind) VALUES (?1, ?2)",
        params![name, macro_kind],
    )?;
    get_category(conn, conn.last_insert_rowid())
}

pub fn get_category(conn: &Connection, id: i64) -> Result<Category> {
    let sql = format!("SELECT {} FROM categories WHERE id = ?1", Category::COLUMNS);
    conn.query_row(&sql, [id], Category::from_row)
        .optional()?
        .ok_or_else(|| Error::not_found("category", id))
}

pub fn get_category_by_name(conn: &Connection, name: &str) -> Result<Category> {
    let sql = format!("SELECT {} FROM categories WHERE name = ?1", Category::COLUMNS);
    conn.query_row(&sql, [name], Category::from_row)
        .optional()?
        .ok_or_else(|| Error::NotFound {
            entity: "category",
            key: name.to_string(),
        })
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let sql = format!("SELECT {} FROM categories ORDER BY name", Category::COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], Category::from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn update_category(conn: &Connection, category: &Category) -> Result<Category> {
    require_nonempty("category name", &category.name)?;
    require_nonempty("category macro kind", &category.macro_kind)?;
    get_category(conn, category.id)?;
    if name_taken(conn, "categories", &category.name, Some(category.id))? {
        return Err(Error::DuplicateKey {
            entity: "category",
            key: category.name.clone(),
        });
    }
    conn.execute(
        "UPDATE categories SET name = ?1, macro_kind = ?2 WHERE id = ?3",
        params![category.name, category.macro_kind, category.id],
    )?;
    get_category(conn, category.id)
}

pub fn delete_category(conn: &Connection, id: i64) -> Result<()> {
    if !fk_exists(conn, "categories", id)? {
        return Err(Error::not_found("category", id));
    }
    let dependents = dependent_transactions(conn, "category_id", id)?;
    if dependents > 0 {
        return Err(Error::DependencyExists {
            entity: "category",
            id,
            dependents,
        });
    }
    conn.execute("DELETE FROM categories WHERE id = ?1", [id])?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Transactions

fn validate_transaction_fields(amount: Decimal, date: chrono::NaiveDate, description: &str) -> Result<()> {
    if amount.is_zero() {
        return Err(Error::InvalidDomainValue(
            "transaction amount must be nonzero".to_string(),
        ));
    }
    require_nonempty("transaction description", description)?;
    if date > Utc::now().date_naive() {
        return Err(Error::InvalidDomainValue(format!(
            "transaction date {} is in the future",
            date
        )));
    }
    Ok(())
}

fn validate_transaction_refs(
    conn: &Connection,
    category_id: i64,
    account_id: i64,
    property_id: Option<i64>,
) -> Result<()> {
    if !fk_exists(conn, "categories", category_id)? {
        return Err(Error::ForeignKeyMissing {
            entity: "category",
            id: category_id,
        });
    }
    if !fk_exists(conn, "accounts", account_id)? {
        return Err(Error::ForeignKeyMissing {
            entity: "account",
            id: account_id,
        });
    }
    if let Some(pid) = property_id {
        if !fk_exists(conn, "properties", pid)? {
            return Err(Error::ForeignKeyMissing {
                entity: "property",
                id: pid,
            });
        }
    }
    Ok(())
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction> {
    let sql = format!("SELECT {} FROM transactions WHERE id = ?1", Transaction::COLUMNS);
    conn.query_row(&sql, [id], Transaction::from_row)
        .optional()?
        .ok_or_else(|| Error::not_found("transaction", id))
}

pub fn create_transaction(conn: &mut Connection, new: &NewTransaction) -> Result<Transaction> {
    validate_transaction_fields(new.amount, new.date, &new.description)?;
    let tx = conn.transaction()?;
    validate_transaction_refs(&tx, new.category_id, new.account_id, new.property_id)?;
    tx.execute(
        "INSERT INTO transactions(date, amount, description, category_id, account_id,
                                  property_id, flow, tax_relevant, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            new.date,
            new.amount.to_string(),
            new.description,
            new.category_id,
            new.account_id,
            new.property_id,
            new.flow.as_str(),
            new.tax_relevant,
            new.notes,
        ],
    )?;
    let id = tx.last_insert_rowid();
    reconciler::apply_delta(&tx, new.account_id, new.amount)?;
    let created = get_transaction(&tx, id)?;
    tx.commit()?;
    Ok(created)
}

/// Full-record update. Changed foreign keys are re-validated; the balance
/// delta is the difference between old and new amounts, or a compensating
/// pair when the transaction moved to another account.
pub fn update_transaction(conn: &mut Connection, t: &Transaction) -> Result<Transaction> {
    validate_transaction_fields(t.amount, t.date, &t.description)?;
    let tx = conn.transaction()?;
    let old = get_transaction(&tx, t.id)?;
    validate_transaction_refs(&tx, t.category_id, t.account_id, t.property_id)?;
    tx.execute(
        "UPDATE transactions
         SET date = ?1, amount = ?2, description = ?3, category_id = ?4,
             account_id = ?5, property_id = ?6, flow = ?7, tax_relevant = ?8,
             notes = ?9, updated_at = datetime('now')
         WHERE id = ?10",
        params![
            t.date,
            t.amount.to_string(),
            t.description,
            t.category_id,
            t.account_id,
            t.property_id,
            t.flow.as_str(),
            t.tax_relevant,
            t.notes,
            t.id,
        ],
    )?;
    if old.account_id == t.account_id {
        reconciler::apply_delta(&tx, t.account_id, t.amount - old.amount)?;
    } else {
        reconciler::apply_delta(&tx, old.account_id, -old.amount)?;
        reconciler::apply_delta(&tx, t.account_id, t.amount)?;
    }
    let updated = get_transaction(&tx, t.id)?;
    tx.commit()?;
    Ok(updated)
}

pub fn delete_transaction(conn: &mut Connection, id: i64) -> Result<()> {
    let tx = conn.transaction()?;
    let old = get_transaction(&tx, id)?;
    tx.execute("DELETE FROM transactions WHERE id = ?1", [id])?;
    reconciler::apply_delta(&tx, old.account_id, -old.amount)?;
    tx.commit()?;
    Ok(())
}
