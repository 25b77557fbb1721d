// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

use crate::aggregate::MAX_WINDOW_DAYS;

fn json_flags(cmd: Command) -> Command {
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

fn type_arg(required: bool) -> Arg {
    Arg::new("type")
        .long("type")
        .short('t')
        .required(required)
        .value_parser(["income", "expense", "INCOME", "EXPENSE"])
        .help("income | expense")
}

fn confirm_flag() -> Arg {
    Arg::new("yes")
        .long("yes")
        .short('y')
        .action(ArgAction::SetTrue)
        .help("Skip the confirmation prompt")
}

pub fn build_cli() -> Command {
    Command::new("sakubumi")
        .about("SakuBumi: track income and expenses, chart them, export reports")
        .version(clap::crate_version!())
        .arg(
            Arg::new("data")
                .long("data")
                .global(true)
                .value_name("FILE")
                .help("Work offline against a JSON data file instead of the API"),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .value_name("URL")
                .help("API base URL (overrides config and SAKUBUMI_API_URL)"),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .global(true)
                .env("SAKUBUMI_TOKEN")
                .hide_env_values(true)
                .help("Bearer token for the API"),
        )
        .arg(
            Arg::new("email")
                .long("email")
                .global(true)
                .env("SAKUBUMI_EMAIL")
                .help("Log in with this email for the duration of the command"),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .global(true)
                .env("SAKUBUMI_PASSWORD")
                .hide_env_values(true)
                .requires("email"),
        )
        .subcommand(Command::new("config").about("Show the effective configuration"))
        .subcommand(Command::new("login").about("Log in and print the access token"))
        .subcommand(json_flags(
            Command::new("summary").about("Total income, expense and balance"),
        ))
        .subcommand(json_flags(
            Command::new("chart")
                .about("Daily income/expense over a trailing window")
                .arg(
                    Arg::new("days")
                        .long("days")
                        .value_parser(value_parser!(u64).range(1..=MAX_WINDOW_DAYS as u64))
                        .help("Window length in days (default from config, 7)"),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("Last day of the window, YYYY-MM-DD (default today)"),
                ),
        ))
        .subcommand(json_flags(
            Command::new("breakdown")
                .about("Totals per category, largest first")
                .arg(type_arg(true)),
        ))
        .subcommand(json_flags(
            Command::new("recent").about("Latest transactions").arg(
                Arg::new("limit")
                    .long("limit")
                    .value_parser(value_parser!(usize))
                    .default_value("5"),
            ),
        ))
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(json_flags(
                    Command::new("list").arg(type_arg(false)),
                ))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(type_arg(true))
                        .arg(Arg::new("icon").long("icon")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(confirm_flag()),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Amount in Rupiah; separators are ignored (5.000.000)"),
                        )
                        .arg(type_arg(true))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .help("Category id or name"),
                        )
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD (default today)"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(confirm_flag()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write a report file named <App>_<Kind>_<date>")
                .arg(
                    Arg::new("format")
                        .value_parser(["xlsx", "csv", "pdf"])
                        .required(true),
                )
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .value_parser(["report", "transactions"])
                        .default_value("report")
                        .help("File name kind: report (Report) or transactions (Transactions)"),
                )
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .value_name("DIR")
                        .help("Output directory (default from config, else current dir)"),
                ),
        )
}
