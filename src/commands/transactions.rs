// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::ledger::{self, TransactionFilter};
use crate::models::{FlowType, NewTransaction};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, month_bounds, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let account = store::get_account_by_name(conn, sub.get_one::<String>("account").unwrap())?;
    let category = store::get_category_by_name(conn, sub.get_one::<String>("category").unwrap())?;
    let property_id = sub
        .get_one::<String>("property")
        .map(|name| store::get_property_by_name(conn, name).map(|p| p.id))
        .transpose()?;
    let new = NewTransaction {
        date,
        amount,
        description: sub.get_one::<String>("desc").unwrap().clone(),
        category_id: category.id,
        account_id: account.id,
        property_id,
        flow: FlowType::parse(sub.get_one::<String>("flow").unwrap())?,
        tax_relevant: sub.get_flag("tax"),
        notes: sub.get_one::<String>("note").cloned(),
    };
    let t = store::create_transaction(conn, &new)?;
    println!(
        "Recorded {} on {} '{}' (acct: {})",
        fmt_money(&t.amount),
        t.date,
        t.description,
        account.name
    );
    Ok(())
}

fn filter_from_args(conn: &Connection, sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    let mut filter = TransactionFilter::default();
    if let Some(month) = sub.get_one::<String>("month") {
        let (from, to) = month_bounds(month)?;
        filter.date_from = Some(from);
        filter.date_to = Some(to);
    }
    if let Some(from) = sub.get_one::<String>("from") {
        filter.date_from = Some(parse_date(from)?);
    }
    if let Some(to) = sub.get_one::<String>("to") {
        filter.date_to = Some(parse_date(to)?);
    }
    if let Some(name) = sub.get_one::<String>("account") {
        filter.account_id = Some(store::get_account_by_name(conn, name)?.id);
    }
    if let Some(name) = sub.get_one::<String>("category") {
        filter.category_id = Some(store::get_category_by_name(conn, name)?.id);
    }
    if let Some(name) = sub.get_one::<String>("property") {
        filter.property_id = Some(store::get_property_by_name(conn, name)?.id);
    }
    Ok(filter)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let filter = filter_from_args(conn, sub)?;
    let data = ledger::transactions_in_period(conn, &filter)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.to_string(),
                    fmt_money(&r.amount),
                    r.direction.to_string(),
                    r.description.clone(),
                    r.category.clone(),
                    r.account.clone(),
                    r.property.clone().unwrap_or_default(),
                    r.flow.as_str().to_string(),
                    if r.tax_relevant { "yes".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Amount", "Dir", "Description", "Category", "Account", "Property", "Flow", "Tax"],
                rows
            )
        );
    }
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut t = store::get_transaction(conn, id)?;
    if let Some(date) = sub.get_one::<String>("date") {
        t.date = parse_date(date)?;
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        t.amount = parse_decimal(amount)?;
    }
    if let Some(desc) = sub.get_one::<String>("desc") {
        t.description = desc.clone();
    }
    if let Some(name) = sub.get_one::<String>("account") {
        t.account_id = store::get_account_by_name(conn, name)?.id;
    }
    if let Some(name) = sub.get_one::<String>("category") {
        t.category_id = store::get_category_by_name(conn, name)?.id;
    }
    if let Some(name) = sub.get_one::<String>("property") {
        // "--property none" detaches the transaction
        t.property_id = if name.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(store::get_property_by_name(conn, name)?.id)
        };
    }
    if let Some(flow) = sub.get_one::<String>("flow") {
        t.flow = FlowType::parse(flow)?;
    }
    if let Some(tax) = sub.get_one::<bool>("tax") {
        t.tax_relevant = *tax;
    }
    if let Some(note) = sub.get_one::<String>("note") {
        t.notes = Some(note.clone());
    }
    let updated = store::update_transaction(conn, &t)?;
    println!("Updated transaction {} ({})", updated.id, fmt_money(&updated.amount));
    Ok(())
}

fn rm(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    store::delete_transaction(conn, id)?;
    println!("Deleted transaction {}", id);
    Ok(())
}
