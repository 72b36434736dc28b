// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::reports;
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("property-pl", sub)) => property_pl(conn, sub)?,
        Some(("fiscal", sub)) => fiscal(conn, sub)?,
        Some(("networth", sub)) => networth(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = *sub.get_one::<i32>("year").unwrap();
    let month = sub.get_one::<u32>("month").copied();
    let report = reports::cash_flow_personal(conn, year, month)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!(
            "{}",
            pretty_table(
                &["Period", "Income", "Expense", "Net savings"],
                vec![vec![
                    report.period.clone(),
                    fmt_money(&report.income_total),
                    fmt_money(&report.expense_total),
                    fmt_money(&report.net_savings),
                ]]
            )
        );
    }
    Ok(())
}

fn property_pl(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let property = store::get_property_by_name(conn, sub.get_one::<String>("property").unwrap())?;
    let year = *sub.get_one::<i32>("year").unwrap();
    let month = sub.get_one::<u32>("month").copied();
    let report = reports::property_pl(conn, property.id, year, month)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!(
            "{}",
            pretty_table(
                &["Property", "Period", "Income", "Expenses", "Operating margin"],
                vec![vec![
                    report.property.clone(),
                    report.period.clone(),
                    fmt_money(&report.income),
                    fmt_money(&report.expenses),
                    fmt_money(&report.operating_margin),
                ]]
            )
        );
    }
    Ok(())
}

fn fiscal(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = *sub.get_one::<i32>("year").unwrap();
    let report = reports::fiscal_summary(conn, year)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        let rows = report
            .entries
            .iter()
            .map(|e| {
                vec![
                    e.date.to_string(),
                    fmt_money(&e.amount),
                    e.category.clone(),
                    e.flow.as_str().to_string(),
                    e.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Amount", "Category", "Flow", "Description"], rows)
        );
        for (flow, total) in &report.total_by_flow {
            println!("{}: {}", flow, fmt_money(total));
        }
        println!("Tax-relevant total {}: {}", year, fmt_money(&report.total));
        if !report.rent_income_by_property.is_empty() {
            let rows = report
                .rent_income_by_property
                .iter()
                .map(|(name, total)| vec![name.clone(), fmt_money(total)])
                .collect();
            println!("{}", pretty_table(&["Property", "Rent income"], rows));
            println!("Rent income total: {}", fmt_money(&report.rent_income_total));
        }
    }
    Ok(())
}

fn networth(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let report = reports::net_worth_snapshot(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        for w in &report.warnings {
            println!("warning: {}", w);
        }
        println!(
            "{}",
            pretty_table(
                &["As of", "Properties", "Accounts", "Debt", "Net worth"],
                vec![vec![
                    report.as_of.clone(),
                    fmt_money(&report.property_value_total),
                    fmt_money(&report.account_balance_total),
                    fmt_money(&report.residual_debt),
                    fmt_money(&report.net_worth),
                ]]
            )
        );
    }
    Ok(())
}
