// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::reconciler;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let reports = reconciler::verify_all(conn)?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &reports)? {
        return Ok(());
    }
    let drifted: Vec<_> = reports.iter().filter(|r| !r.consistent).collect();
    if drifted.is_empty() {
        println!(
            "✅ verify: all {} account balance(s) consistent",
            reports.len()
        );
    } else {
        let rows = drifted
            .iter()
            .map(|r| {
                vec![
                    r.account_name.clone(),
                    fmt_money(&r.stored),
                    fmt_money(&r.computed),
                    fmt_money(&r.discrepancy),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Account", "Stored", "Computed", "Discrepancy"], rows)
        );
    }
    Ok(())
}
