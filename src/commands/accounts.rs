// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::ledger;
use crate::models::{AccountKind, NewAccount};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewAccount {
                name: sub.get_one::<String>("name").unwrap().clone(),
                kind: AccountKind::parse(sub.get_one::<String>("kind").unwrap())?,
                initial_balance: parse_decimal(sub.get_one::<String>("balance").unwrap())?,
            };
            let account = store::create_account(conn, &new)?;
            println!(
                "Added account '{}' ({}, opening balance {})",
                account.name,
                account.kind.as_str(),
                fmt_money(&account.initial_balance)
            );
        }
        Some(("list", sub)) => {
            let data = store::list_accounts(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|a| {
                        vec![
                            a.name.clone(),
                            a.kind.as_str().to_string(),
                            fmt_money(&a.initial_balance),
                            fmt_money(&a.current_balance),
                            a.created_at.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Name", "Kind", "Initial", "Balance", "Created"], rows)
                );
            }
        }
        Some(("show", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let account = store::get_account_by_name(conn, name)?;
            let summary = ledger::account_summary(conn, account.id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
                println!(
                    "{}",
                    pretty_table(
                        &["Account", "Stored", "Computed", "Transactions", "Last date"],
                        vec![vec![
                            summary.account_name.clone(),
                            fmt_money(&summary.stored_balance),
                            fmt_money(&summary.computed_balance),
                            summary.transaction_count.to_string(),
                            summary
                                .last_transaction_date
                                .map(|d| d.to_string())
                                .unwrap_or_default(),
                        ]]
                    )
                );
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let account = store::get_account_by_name(conn, name)?;
            store::delete_account(conn, account.id)?;
            println!("Removed account '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
