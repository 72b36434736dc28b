// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report engine: four builders over the ledger, no stored state. Periods
//! are a year or a year+month, resolved to inclusive date bounds.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::ledger::{self, TransactionFilter};
use crate::models::{FlowType, PropertyKind};
use crate::reconciler;
use crate::store;

fn period_bounds(year: i32, month: Option<u32>) -> Result<(NaiveDate, NaiveDate)> {
    let bad = |what: String| Error::InvalidDomainValue(what);
    match month {
        Some(m) => {
            let from = NaiveDate::from_ymd_opt(year, m, 1)
                .ok_or_else(|| bad(format!("invalid period {}-{}", year, m)))?;
            let to = if m == 12 {
                NaiveDate::from_ymd_opt(year, 12, 31)
            } else {
                NaiveDate::from_ymd_opt(year, m + 1, 1).map(|d| d.pred_opt().unwrap_or(d))
            }
            .ok_or_else(|| bad(format!("invalid period {}-{}", year, m)))?;
            Ok((from, to))
        }
        None => {
            let from = NaiveDate::from_ymd_opt(year, 1, 1)
                .ok_or_else(|| bad(format!("invalid year {}", year)))?;
            let to = NaiveDate::from_ymd_opt(year, 12, 31)
                .ok_or_else(|| bad(format!("invalid year {}", year)))?;
            Ok((from, to))
        }
    }
}

fn period_label(year: i32, month: Option<u32>) -> String {
    match month {
        Some(m) => format!("{}-{:02}", year, m),
        None => year.to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CashFlow {
    pub period: String,
    pub income_total: Decimal,
    /// Signed sum of outflows, so it is zero or negative.
    pub expense_total: Decimal,
    pub net_savings: Decimal,
}

/// Personal cash flow: Personal-flow transactions in the period split by
/// sign. `net_savings = income_total + expense_total`.
pub fn cash_flow_personal(conn: &Connection, year: i32, month: Option<u32>) -> Result<CashFlow> {
    let (from, to) = period_bounds(year, month)?;
    let rows = ledger::transactions_in_period(
        conn,
        &TransactionFilter {
            date_from: Some(from),
            date_to: Some(to),
            ..Default::default()
        },
    )?;
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    for row in rows.iter().filter(|r| r.flow == FlowType::Personal) {
        if row.amount > Decimal::ZERO {
            income += row.amount;
        } else {
            expense += row.amount;
        }
    }
    Ok(CashFlow {
        period: period_label(year, month),
        income_total: income,
        expense_total: expense,
        net_savings: income + expense,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyPl {
    pub property: String,
    pub kind: PropertyKind,
    pub period: String,
    /// RealEstate-flow inflows on the property.
    pub income: Decimal,
    /// Absolute sum of all outflows on the property.
    pub expenses: Decimal,
    pub operating_margin: Decimal,
}

pub fn property_pl(
    conn: &Connection,
    property_id: i64,
    year: i32,
    month: Option<u32>,
) -> Result<PropertyPl> {
    let property = store::get_property(conn, property_id)?;
    let (from, to) = period_bounds(year, month)?;
    let rows = ledger::transactions_in_period(
        conn,
        &TransactionFilter {
            property_id: Some(property_id),
            date_from: Some(from),
            date_to: Some(to),
            ..Default::default()
        },
    )?;
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for row in &rows {
        if row.amount > Decimal::ZERO {
            if row.flow == FlowType::RealEstate {
                income += row.amount;
            }
        } else {
            expenses += -row.amount;
        }
    }
    Ok(PropertyPl {
        property: property.name,
        kind: property.kind,
        period: period_label(year, month),
        income,
        expenses,
        operating_margin: income - expenses,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct FiscalEntry {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub flow: FlowType,
}

#[derive(Debug, Clone, Serialize)]
pub struct FiscalSummary {
    pub year: i32,
    pub entries: Vec<FiscalEntry>,
    pub total_by_flow: BTreeMap<String, Decimal>,
    pub total: Decimal,
    /// RealEstate rental income per property over the same year, tax flag or
    /// not; kept alongside the deductible listing for the tax return.
    pub rent_income_by_property: BTreeMap<String, Decimal>,
    pub rent_income_total: Decimal,
}

pub fn fiscal_summary(conn: &Connection, year: i32) -> Result<FiscalSummary> {
    let (from, to) = period_bounds(year, None)?;
    let rows = ledger::transactions_in_period(
        conn,
        &TransactionFilter {
            date_from: Some(from),
            date_to: Some(to),
            ..Default::default()
        },
    )?;

    let mut entries = Vec::new();
    let mut total_by_flow: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut total = Decimal::ZERO;
    let mut rent_by_property: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut rent_total = Decimal::ZERO;

    for row in &rows {
        if row.tax_relevant {
            entries.push(FiscalEntry {
                date: row.date,
                description: row.description.clone(),
                amount: row.amount,
                category: row.category.clone(),
                flow: row.flow,
            });
            *total_by_flow
                .entry(row.flow.as_str().to_string())
                .or_insert(Decimal::ZERO) += row.amount;
            total += row.amount;
        }
        if row.flow == FlowType::RealEstate && row.amount > Decimal::ZERO {
            if let Some(property) = &row.property {
                *rent_by_property
                    .entry(property.clone())
                    .or_insert(Decimal::ZERO) += row.amount;
                rent_total += row.amount;
            }
        }
    }

    Ok(FiscalSummary {
        year,
        entries,
        total_by_flow,
        total,
        rent_income_by_property: rent_by_property,
        rent_income_total: rent_total,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct NetWorthSnapshot {
    pub as_of: String,
    pub property_value_total: Decimal,
    pub account_balance_total: Decimal,
    /// Mortgages and loans are not tracked yet, so this is always zero.
    pub residual_debt: Decimal,
    pub net_worth: Decimal,
    pub warnings: Vec<String>,
}

/// Simplified net worth: owned property values plus account balances. Each
/// balance goes through a consistency check first; on drift the recomputed
/// value wins and the drift is reported as a warning.
pub fn net_worth_snapshot(conn: &Connection) -> Result<NetWorthSnapshot> {
    let mut property_total = Decimal::ZERO;
    for property in store::list_properties(conn)? {
        if property.kind.is_owned() {
            if let Some(value) = property.value_estimate {
                property_total += value;
            }
        }
    }

    let mut balance_total = Decimal::ZERO;
    let mut warnings = Vec::new();
    for report in reconciler::verify_all(conn)? {
        if report.consistent {
            balance_total += report.stored;
        } else {
            warnings.push(format!(
                "account '{}' stored balance {} disagrees with recomputed {}; using recomputed",
                report.account_name, report.stored, report.computed
            ));
            balance_total += report.computed;
        }
    }

    let residual_debt = Decimal::ZERO;
    Ok(NetWorthSnapshot {
        as_of: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        property_value_total: property_total,
        account_balance_total: balance_total,
        residual_debt,
        net_worth: property_total + balance_total - residual_debt,
        warnings,
    })
}
