//! Clap command tree definition.

use clap::{Arg, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("gazetteer")
        .about("Walk a tree of place records and query the in-memory indices")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("root")
                .long("root")
                .value_name("DIR")
                .help("Directory tree to scan (default: current directory)")
                .global(true),
        )
        .arg(
            Arg::new("eager")
                .long("eager")
                .help("Index records as they are added instead of on first query")
                .action(clap::ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(clap::ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (-v info, -vv debug)")
                .action(clap::ArgAction::Count)
                .global(true),
        )
        .subcommand(build_scan())
        .subcommand(build_id())
        .subcommand(build_name())
        .subcommand(build_word())
        .subcommand(build_latest())
}

fn build_scan() -> Command {
    Command::new("scan").about("Count files and records, report the freshest modification day")
}

fn build_id() -> Command {
    Command::new("id").about("Look up a record by identifier").arg(
        Arg::new("value")
            .required(true)
            .value_name("ID")
            .help("Record identifier"),
    )
}

fn build_name() -> Command {
    Command::new("name")
        .about("Find records carrying a name (matched in normalized form)")
        .arg(
            Arg::new("value")
                .required(true)
                .value_name("NAME")
                .help("Name to look up, in any spelling"),
        )
}

fn build_word() -> Command {
    Command::new("word")
        .about("Find records whose multi-word names contain a word")
        .arg(
            Arg::new("value")
                .required(true)
                .value_name("WORD")
                .help("Single word to look up, in any spelling"),
        )
}

fn build_latest() -> Command {
    Command::new("latest").about("List the records modified on the freshest day")
}
