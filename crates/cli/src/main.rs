//! Gazetteer CLI — walk a place tree, build the indices, run one query.
//!
//! Shell mode only: `gazetteer [flags] COMMAND` runs a single command and
//! exits. Results go to stdout, logs and errors to stderr.

mod commands;
mod format;

use std::process;

use gazetteer_index::{IndexPolicy, IndexQuery, PlaceCollection};
use gazetteer_walker::PlaceWalker;
use tracing::debug;

use commands::build_cli;
use format::{
    format_error, format_query, format_scan, OutputMode, PlaceSummary, QueryReport, ScanReport,
};

fn main() {
    let cli = build_cli();
    let matches = cli.get_matches();

    init_tracing(matches.get_count("verbose"));

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let policy = if matches.get_flag("eager") {
        IndexPolicy::Eager
    } else {
        IndexPolicy::Lazy
    };
    let root = matches
        .get_one::<String>("root")
        .map(|s| s.as_str())
        .unwrap_or(".");

    let exit_code = run(&matches, root, policy, output_mode);
    process::exit(exit_code);
}

/// Route stderr logs by verbosity; `RUST_LOG` overrides the flag.
fn init_tracing(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "gazetteer=info",
        _ => "gazetteer=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(matches: &clap::ArgMatches, root: &str, policy: IndexPolicy, mode: OutputMode) -> i32 {
    debug!(target: "gazetteer::cli", root, ?policy, "Starting walk");

    let walker = match PlaceWalker::new(root) {
        Ok(walker) => walker,
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            return 1;
        }
    };
    let outcome = match walker.collect(policy) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            return 1;
        }
    };
    let files = outcome.files;
    let mut collection = outcome.collection;

    match matches.subcommand() {
        Some(("scan", _)) => run_scan(&walker, files, &mut collection, mode),
        Some(("id", sub)) => run_query(&mut collection, "id", IndexQuery::Id(value_of(sub)), mode),
        Some(("name", sub)) => {
            run_query(&mut collection, "name", IndexQuery::Name(value_of(sub)), mode)
        }
        Some(("word", sub)) => {
            run_query(&mut collection, "in_name", IndexQuery::Word(value_of(sub)), mode)
        }
        Some(("latest", _)) => {
            run_query(&mut collection, "last_modified", IndexQuery::LastModified, mode)
        }
        _ => {
            eprintln!("(error) Unknown command");
            2
        }
    }
}

fn run_scan(
    walker: &PlaceWalker,
    files: usize,
    collection: &mut PlaceCollection,
    mode: OutputMode,
) -> i32 {
    let latest = match collection.latest() {
        Ok(latest) => latest,
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            return 1;
        }
    };
    let report = ScanReport {
        root: walker.root().display().to_string(),
        files,
        records: collection.len(),
        watermark: if collection.is_empty() {
            None
        } else {
            Some(collection.watermark().to_string())
        },
        latest: latest.iter().map(|p| PlaceSummary::from_place(p)).collect(),
    };
    println!("{}", format_scan(&report, mode));
    0
}

fn run_query(
    collection: &mut PlaceCollection,
    index: &'static str,
    query: IndexQuery,
    mode: OutputMode,
) -> i32 {
    let value = query_value(&query);
    match collection.get(query) {
        Ok(places) => {
            let report = QueryReport {
                index,
                value,
                hits: places.len(),
                places: places.iter().map(|p| PlaceSummary::from_place(p)).collect(),
            };
            println!("{}", format_query(&report, mode));
            0
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            1
        }
    }
}

fn value_of(sub: &clap::ArgMatches) -> String {
    sub.get_one::<String>("value").cloned().unwrap_or_default()
}

fn query_value(query: &IndexQuery) -> Option<String> {
    match query {
        IndexQuery::Id(v) | IndexQuery::Name(v) | IndexQuery::Word(v) => Some(v.clone()),
        IndexQuery::LastModified => None,
    }
}
