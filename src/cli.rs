// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
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
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn tx_fields(cmd: Command, required: bool) -> Command {
    let mut method = Arg::new("method")
        .long("method")
        .help("cash|card|transfer|other");
    if required {
        method = method.default_value("cash");
    }
    cmd.arg(
        Arg::new("type")
            .long("type")
            .required(required)
            .ignore_case(true)
            .value_parser(["income", "expense"]),
    )
    .arg(
        Arg::new("amount")
            .long("amount")
            .required(required)
            .allow_hyphen_values(true)
            .help("Amount as typed, e.g. 12,50 for EUR"),
    )
    .arg(Arg::new("category").long("category").required(required))
    .arg(method)
    .arg(Arg::new("date").long("date").help("YYYY-MM-DD"))
    .arg(Arg::new("note").long("note"))
}

pub fn build_cli() -> Command {
    Command::new("sharewallet")
        .about("Personal and shared-group wallets")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("user")
                .about("Users and the active session")
                .subcommand(
                    Command::new("register")
                        .arg(Arg::new("username").required(true))
                        .arg(
                            Arg::new("login")
                                .long("login")
                                .action(ArgAction::SetTrue)
                                .help("Log in as the new user"),
                        ),
                )
                .subcommand(Command::new("login").arg(Arg::new("username").required(true)))
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("whoami")),
        )
        .subcommand(
            Command::new("account")
                .about("Individual and group wallets")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("individual")
                                .ignore_case(true)
                                .value_parser(["individual", "group"]),
                        )
                        .arg(Arg::new("currency").long("currency")),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(json_args(
                    Command::new("show").arg(Arg::new("id").required(true)),
                ))
                .subcommand(
                    Command::new("rename")
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(Command::new("join").arg(Arg::new("code").required(true)))
                .subcommand(Command::new("leave").arg(Arg::new("id").required(true)))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(
            Command::new("tx")
                .about("Income and expense records")
                .subcommand(tx_fields(
                    Command::new("add").arg(Arg::new("account").long("account").required(true)),
                    true,
                ))
                .subcommand(json_args(
                    Command::new("list")
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .ignore_case(true)
                                .value_parser(["all", "income", "expense"]),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("user")
                                .long("user")
                                .help("'me', a username, or 'all'"),
                        )
                        .arg(Arg::new("min").long("min"))
                        .arg(Arg::new("max").long("max"))
                        .arg(Arg::new("from").long("from").help("YYYY-MM-DD, inclusive"))
                        .arg(Arg::new("to").long("to").help("YYYY-MM-DD, inclusive"))
                        .arg(Arg::new("method").long("method"))
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .default_value("newest")
                                .value_parser(["newest", "oldest", "highest", "lowest"]),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(tx_fields(
                    Command::new("edit").arg(Arg::new("id").required(true)),
                    false,
                ))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
                .subcommand(
                    Command::new("watch")
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(
                            Arg::new("interval")
                                .long("interval")
                                .default_value("1000")
                                .value_parser(value_parser!(u64))
                                .help("Poll interval in milliseconds"),
                        )
                        .arg(
                            Arg::new("count")
                                .long("count")
                                .value_parser(value_parser!(usize))
                                .help("Stop after this many snapshots"),
                        ),
                )
                .subcommand(Command::new("categories").arg(
                    Arg::new("account").long("account").required(true),
                )),
        )
        .subcommand(
            Command::new("amount")
                .about("Amount entry helpers")
                .subcommand(json_args(
                    Command::new("format")
                        .arg(Arg::new("raw").required(true).allow_hyphen_values(true))
                        .arg(Arg::new("currency").long("currency").required(true)),
                )),
        )
        .subcommand(
            Command::new("config")
                .about("Runtime settings")
                .subcommand(Command::new("get").arg(Arg::new("key")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for broken invariants"))
}
