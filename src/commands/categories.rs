// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let macro_kind = sub.get_one::<String>("macro").unwrap();
            store::create_category(conn, name, macro_kind)?;
            println!("Added category '{}' ({})", name, macro_kind);
        }
        Some(("list", sub)) => {
            let data = store::list_categories(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|c| vec![c.name.clone(), c.macro_kind.clone()])
                    .collect();
                println!("{}", pretty_table(&["Category", "Macro"], rows));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let category = store::get_category_by_name(conn, name)?;
            store::delete_category(conn, category.id)?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
