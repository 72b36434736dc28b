// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::ledger;
use crate::models::{NewProperty, PropertyKind};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind = PropertyKind::parse(sub.get_one::<String>("kind").unwrap())?;
    let acquired_on = sub
        .get_one::<String>("acquired")
        .map(|s| parse_date(s))
        .transpose()?;
    let value_estimate = sub
        .get_one::<String>("value")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let monthly_rent_income = sub
        .get_one::<String>("rent-income")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let monthly_rent_expense = sub
        .get_one::<String>("rent-expense")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let new = NewProperty {
        name: sub.get_one::<String>("name").unwrap().clone(),
        kind,
        acquired_on,
        value_estimate,
        monthly_rent_income,
        monthly_rent_expense,
        notes: sub.get_one::<String>("notes").cloned(),
    };
    if kind == PropertyKind::OwnedRented && monthly_rent_income.is_none() {
        println!("note: rented-out property without --rent-income");
    }
    let property = store::create_property(conn, &new)?;
    println!("Added property '{}' ({})", property.name, property.kind.as_str());
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = store::list_properties(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    p.kind.as_str().to_string(),
                    p.acquired_on.map(|d| d.to_string()).unwrap_or_default(),
                    p.value_estimate.map(|v| fmt_money(&v)).unwrap_or_default(),
                    p.monthly_rent_income.map(|v| fmt_money(&v)).unwrap_or_default(),
                    p.monthly_rent_expense.map(|v| fmt_money(&v)).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Name", "Kind", "Acquired", "Value", "Rent in", "Rent out"],
                rows
            )
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let property = store::get_property_by_name(conn, name)?;
    let summary = ledger::property_summary(conn, property.id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        println!(
            "{}",
            pretty_table(
                &["Property", "Transactions", "Income", "Expense", "Net"],
                vec![vec![
                    summary.property_name.clone(),
                    summary.transaction_count.to_string(),
                    fmt_money(&summary.total_income),
                    fmt_money(&summary.total_expense),
                    fmt_money(&summary.net),
                ]]
            )
        );
    }
    Ok(())
}

fn rm(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let property = store::get_property_by_name(conn, name)?;
    store::delete_property(conn, property.id)?;
    println!("Removed property '{}' (its transactions were detached)", name);
    Ok(())
}
