// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{builder::PossibleValuesParser, value_parser, Arg, ArgAction, Command};

use crate::models::Category;

const FILTERS: [&str; 4] = ["all", "weekly", "monthly", "yearly"];

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn filter_arg() -> Arg {
    Arg::new("filter")
        .long("filter")
        .short('f')
        .value_parser(PossibleValuesParser::new(FILTERS))
        .default_value("all")
        .help("Reporting window")
}

fn offline_arg() -> Arg {
    Arg::new("offline")
        .long("offline")
        .action(ArgAction::SetTrue)
        .help("Use the locally cached transactions instead of the backend")
}

fn draft_args(cmd: Command, required: bool) -> Command {
    cmd.arg(Arg::new("title").long("title").required(required))
        .arg(Arg::new("amount").long("amount").required(required))
        .arg(
            Arg::new("type")
                .long("type")
                .value_parser(PossibleValuesParser::new(["income", "expense"])),
        )
        .arg(
            Arg::new("category")
                .long("category")
                .required(required)
                .value_parser(PossibleValuesParser::new(Category::ALL.map(|c| c.as_str()))),
        )
        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .version(clap::crate_version!())
        .about("Track income and expenses against a fintrack backend")
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .env("FINTRACK_API_URL")
                .global(true)
                .help("Backend base URL (overrides `config set-url`)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log verbosity"),
        )
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(
            Command::new("config")
                .about("Client configuration")
                .subcommand(
                    Command::new("set-url")
                        .about("Store the backend base URL")
                        .arg(Arg::new("url").required(true)),
                )
                .subcommand(Command::new("show").about("Show effective configuration")),
        )
        .subcommand(
            Command::new("auth")
                .about("Login session")
                .subcommand(
                    Command::new("login")
                        .arg(Arg::new("username").long("username").short('u').required(true))
                        .arg(
                            Arg::new("password")
                                .long("password")
                                .short('p')
                                .env("FINTRACK_PASSWORD")
                                .hide_env_values(true)
                                .required(true),
                        ),
                )
                .subcommand(
                    Command::new("register")
                        .arg(Arg::new("username").long("username").short('u').required(true))
                        .arg(
                            Arg::new("password")
                                .long("password")
                                .short('p')
                                .env("FINTRACK_PASSWORD")
                                .hide_env_values(true)
                                .required(true),
                        )
                        .arg(Arg::new("email").long("email")),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("refresh").about("Renew the access token"))
                .subcommand(Command::new("status")),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(draft_args(Command::new("add"), true))
                .subcommand(draft_args(
                    Command::new("edit").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                    false,
                ))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .arg(filter_arg())
                        .arg(offline_arg())
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(Command::new("sync").about("Refresh the local cache")),
        )
        .subcommand(
            Command::new("report")
                .about("Analytics over your transactions")
                .subcommand(json_args(
                    Command::new("summary")
                        .about("Income, expenses and balance")
                        .arg(filter_arg())
                        .arg(offline_arg()),
                ))
                .subcommand(json_args(
                    Command::new("analytics")
                        .about("Totals, needs/wants/savings, category breakdown and trend")
                        .arg(filter_arg())
                        .arg(offline_arg()),
                ))
                .subcommand(json_args(
                    Command::new("top-change")
                        .about("This month's top category against last month")
                        .arg(offline_arg()),
                )),
        )
        .subcommand(
            Command::new("insight")
                .about("Ask the backend for a personalised spending tip")
                .arg(offline_arg()),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .value_parser(PossibleValuesParser::new(["csv", "json"]))
                            .default_value("csv"),
                    )
                    .arg(Arg::new("out").long("out").required(true))
                    .arg(filter_arg())
                    .arg(offline_arg()),
            ),
        )
}
