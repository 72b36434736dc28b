// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Row;
use rusqlite::types::Type;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    OwnerOccupied,
    OwnedRented,
    RentedLiability,
}

impl PropertyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::OwnerOccupied => "OwnerOccupied",
            PropertyKind::OwnedRented => "OwnedRented",
            PropertyKind::RentedLiability => "RentedLiability",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "owneroccupied" | "owner-occupied" => Ok(PropertyKind::OwnerOccupied),
            "ownedrented" | "owned-rented" => Ok(PropertyKind::OwnedRented),
            "rentedliability" | "rented-liability" => Ok(PropertyKind::RentedLiability),
            _ => Err(Error::InvalidDomainValue(format!(
                "unknown property kind '{}'",
                s
            ))),
        }
    }

    /// Whether the property is an asset the owner holds (counts toward net
    /// worth), as opposed to a rental the owner pays for.
    pub fn is_owned(&self) -> bool {
        !matches!(self, PropertyKind::RentedLiability)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    Bank,
    Savings,
    SimpleInvestment,
    Cash,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Bank => "Bank",
            AccountKind::Savings => "Savings",
            AccountKind::SimpleInvestment => "SimpleInvestment",
            AccountKind::Cash => "Cash",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bank" => Ok(AccountKind::Bank),
            "savings" => Ok(AccountKind::Savings),
            "simpleinvestment" | "simple-investment" | "investment" => {
                Ok(AccountKind::SimpleInvestment)
            }
            "cash" => Ok(AccountKind::Cash),
            _ => Err(Error::InvalidDomainValue(format!(
                "unknown account kind '{}'",
                s
            ))),
        }
    }
}

/// Routes a transaction into the relevant report: personal cash flow,
/// property P&L, or the fiscal summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FlowType {
    Personal,
    RealEstate,
    Fiscal,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Personal => "Personal",
            FlowType::RealEstate => "RealEstate",
            FlowType::Fiscal => "Fiscal",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "personal" => Ok(FlowType::Personal),
            "realestate" | "real-estate" => Ok(FlowType::RealEstate),
            "fiscal" => Ok(FlowType::Fiscal),
            _ => Err(Error::InvalidDomainValue(format!(
                "unknown flow type '{}'",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub name: String,
    pub kind: PropertyKind,
    pub acquired_on: Option<NaiveDate>,
    pub value_estimate: Option<Decimal>,
    pub monthly_rent_income: Option<Decimal>,
    pub monthly_rent_expense: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub name: String,
    pub kind: PropertyKind,
    pub acquired_on: Option<NaiveDate>,
    pub value_estimate: Option<Decimal>,
    pub monthly_rent_income: Option<Decimal>,
    pub monthly_rent_expense: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub kind: AccountKind,
    pub initial_balance: Decimal,
    /// Cached balance, kept equal to `initial_balance + Σ amounts` by the
    /// reconciler.
    pub current_balance: Decimal,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub kind: AccountKind,
    pub initial_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Open-ended grouping tag, e.g. "Income", "Expense", "Fiscal".
    pub macro_kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    /// Signed: positive = inflow, negative = outflow. Never zero.
    pub amount: Decimal,
    pub description: String,
    pub category_id: i64,
    pub account_id: i64,
    pub property_id: Option<i64>,
    pub flow: FlowType,
    pub tax_relevant: bool,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub category_id: i64,
    pub account_id: i64,
    pub property_id: Option<i64>,
    pub flow: FlowType,
    pub tax_relevant: bool,
    pub notes: Option<String>,
}

// Row mapping. Amounts and enums live as TEXT in SQLite; parse failures are
// reported through rusqlite's conversion error so `query_row` callers keep a
// single error path.

pub(crate) fn sql_conv<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn decimal_col(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    raw.parse::<Decimal>().map_err(|e| sql_conv(idx, e))
}

pub(crate) fn decimal_col_opt(row: &Row, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(s) => Ok(Some(s.parse::<Decimal>().map_err(|e| sql_conv(idx, e))?)),
        None => Ok(None),
    }
}

impl Property {
    pub(crate) const COLUMNS: &'static str = "id, name, kind, acquired_on, value_estimate, \
         monthly_rent_income, monthly_rent_expense, notes, created_at, updated_at";

    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let kind: String = row.get(2)?;
        Ok(Property {
            id: row.get(0)?,
            name: row.get(1)?,
            kind: PropertyKind::parse(&kind).map_err(|e| sql_conv(2, e))?,
            acquired_on: row.get(3)?,
            value_estimate: decimal_col_opt(row, 4)?,
            monthly_rent_income: decimal_col_opt(row, 5)?,
            monthly_rent_expense: decimal_col_opt(row, 6)?,
            notes: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

impl Account {
    pub(crate) const COLUMNS: &'static str =
        "id, name, kind, initial_balance, current_balance, created_at, updated_at";

    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let kind: String = row.get(2)?;
        Ok(Account {
            id: row.get(0)?,
            name: row.get(1)?,
            kind: AccountKind::parse(&kind).map_err(|e| sql_conv(2, e))?,
            initial_balance: decimal_col(row, 3)?,
            current_balance: decimal_col(row, 4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

impl Category {
    pub(crate) const COLUMNS: &'static str = "id, name, macro_kind";

    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            macro_kind: row.get(2)?,
        })
    }
}

impl Transaction {
    pub(crate) const COLUMNS: &'static str = "id, date, amount, description, category_id, \
         account_id, property_id, flow, tax_relevant, notes, created_at, updated_at";

    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let flow: String = row.get(7)?;
        Ok(Transaction {
            id: row.get(0)?,
            date: row.get(1)?,
            amount: decimal_col(row, 2)?,
            description: row.get(3)?,
            category_id: row.get(4)?,
            account_id: row.get(5)?,
            property_id: row.get(6)?,
            flow: FlowType::parse(&flow).map_err(|e| sql_conv(7, e))?,
            tax_relevant: row.get(8)?,
            notes: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }
}
