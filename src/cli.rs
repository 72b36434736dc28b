// Copyright (c) 2025 Homeledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("homeledger")
        .about("Personal finance and real-estate bookkeeping")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database and seed default categories"))
        .subcommand(
            Command::new("property")
                .about("Manage properties")
                .subcommand(
                    Command::new("add")
                        .about("Add a property")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("owner-occupied | owned-rented | rented-liability"),
                        )
                        .arg(Arg::new("acquired").long("acquired").help("Acquisition or contract start date (YYYY-MM-DD)"))
                        .arg(Arg::new("value").long("value").help("Purchase or estimated value"))
                        .arg(Arg::new("rent-income").long("rent-income").help("Monthly rent received"))
                        .arg(Arg::new("rent-expense").long("rent-expense").help("Monthly rent paid"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(Command::new("list").about("List properties")))
                .subcommand(
                    json_flags(
                        Command::new("show")
                            .about("Income/expense rollup for one property")
                            .arg(Arg::new("name").long("name").required(true)),
                    ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a property (its transactions are kept, detached)")
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .about("Add an account")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("bank | savings | simple-investment | cash"),
                        )
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .default_value("0")
                                .help("Initial balance"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List accounts with balances")))
                .subcommand(
                    json_flags(
                        Command::new("show")
                            .about("Stored vs computed balance for one account")
                            .arg(Arg::new("name").long("name").required(true)),
                    ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove an account (fails while it has transactions)")
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .about("Add a category")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("macro")
                                .long("macro")
                                .required(true)
                                .help("Grouping tag, e.g. Income / Expense / Fiscal"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List categories")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a category (fails while it has transactions)")
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Manage transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                        .arg(Arg::new("account").long("account").required(true).help("Account name"))
                        .arg(Arg::new("category").long("category").required(true).help("Category name"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Signed amount: positive inflow, negative outflow"),
                        )
                        .arg(Arg::new("desc").long("desc").required(true))
                        .arg(Arg::new("property").long("property").help("Property name"))
                        .arg(
                            Arg::new("flow")
                                .long("flow")
                                .default_value("personal")
                                .help("personal | real-estate | fiscal"),
                        )
                        .arg(
                            Arg::new("tax")
                                .long("tax")
                                .action(ArgAction::SetTrue)
                                .help("Mark as tax relevant"),
                        )
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    json_flags(
                        Command::new("list")
                            .about("List transactions")
                            .arg(Arg::new("month").long("month").help("YYYY-MM"))
                            .arg(Arg::new("from").long("from").help("YYYY-MM-DD"))
                            .arg(Arg::new("to").long("to").help("YYYY-MM-DD"))
                            .arg(Arg::new("account").long("account"))
                            .arg(Arg::new("category").long("category"))
                            .arg(Arg::new("property").long("property")),
                    ),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Edit a transaction by id")
                        .arg(Arg::new("id").long("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("amount").long("amount").allow_hyphen_values(true))
                        .arg(Arg::new("desc").long("desc"))
                        .arg(Arg::new("property").long("property"))
                        .arg(Arg::new("flow").long("flow"))
                        .arg(Arg::new("tax").long("tax").value_parser(value_parser!(bool)))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction by id")
                        .arg(Arg::new("id").long("id").required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Reports")
                .subcommand(
                    json_flags(
                        Command::new("cashflow")
                            .about("Personal cash flow for a year or month")
                            .arg(Arg::new("year").long("year").required(true).value_parser(value_parser!(i32)))
                            .arg(Arg::new("month").long("month").value_parser(value_parser!(u32))),
                    ),
                )
                .subcommand(
                    json_flags(
                        Command::new("property-pl")
                            .about("Profit & loss for one property")
                            .arg(Arg::new("property").long("property").required(true).help("Property name"))
                            .arg(Arg::new("year").long("year").required(true).value_parser(value_parser!(i32)))
                            .arg(Arg::new("month").long("month").value_parser(value_parser!(u32))),
                    ),
                )
                .subcommand(
                    json_flags(
                        Command::new("fiscal")
                            .about("Tax-relevant transactions and rent income for a year")
                            .arg(Arg::new("year").long("year").required(true).value_parser(value_parser!(i32))),
                    ),
                )
                .subcommand(
                    json_flags(Command::new("networth").about("Net worth snapshot")),
                ),
        )
        .subcommand(json_flags(
            Command::new("verify").about("Check stored balances against recomputed ones"),
        ))
}
