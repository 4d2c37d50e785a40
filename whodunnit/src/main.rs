//! # whodunnit
//!
//! A CLI tool that counts the lines of a source tree by filetype and
//! credits them to the authors who last changed them.
//!
//! ## Overview
//!
//! whodunnit is built on top of whodunnitlib. It walks the tree (honouring
//! `.gitignore` files at every level), skips binary, dotfile, configuration,
//! generated and vendored files by default, then runs `git blame` over every
//! counted file in parallel.
//!
//! ## Usage
//!
//! ```bash
//! # Inventory the current directory
//! whodunnit
//!
//! # Include configuration files and write JSON to stdout
//! whodunnit --with-config-files --json repos/target
//!
//! # Counts only, no history
//! whodunnit --no-blame .
//! ```

mod render;

use std::path::Path;
use std::process::ExitCode;
use std::thread;

use anyhow::Context;
use clap::builder::FalseyValueParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use whodunnitlib::{
    AttributionOutcome, BlameOptions, ExclusionConfig, GitHistory, Inventory, ProgressChannel,
    Snapshot, WalkOptions,
};

use render::{render_author_table, render_type_table, SortOrder};

/// Pending progress updates held for the progress bar
const PROGRESS_CAPACITY: usize = 64;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("whodunnit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Count lines by filetype and find out who wrote them")
        .arg(
            Arg::new("path")
                .help("Directory to inventory (defaults to current directory)")
                .default_value("."),
        )
        .arg(
            Arg::new("with-dot-files")
                .long("with-dot-files")
                .env("WHODUNNIT_WITH_DOT_FILES")
                .action(ArgAction::SetTrue)
                .value_parser(FalseyValueParser::new())
                .help("Include dot files"),
        )
        .arg(
            Arg::new("with-config-files")
                .long("with-config-files")
                .env("WHODUNNIT_WITH_CONFIG_FILES")
                .action(ArgAction::SetTrue)
                .value_parser(FalseyValueParser::new())
                .help("Include configuration files"),
        )
        .arg(
            Arg::new("with-generated-files")
                .long("with-generated-files")
                .env("WHODUNNIT_WITH_GENERATED_FILES")
                .action(ArgAction::SetTrue)
                .value_parser(FalseyValueParser::new())
                .help("Include generated files"),
        )
        .arg(
            Arg::new("with-vendor-files")
                .long("with-vendor-files")
                .env("WHODUNNIT_WITH_VENDOR_FILES")
                .action(ArgAction::SetTrue)
                .value_parser(FalseyValueParser::new())
                .help("Include vendored files"),
        )
        .arg(
            Arg::new("no-blame")
                .long("no-blame")
                .action(ArgAction::SetTrue)
                .help("Only count lines, skip author attribution"),
        )
        .arg(
            Arg::new("workers")
                .short('w')
                .long("workers")
                .value_parser(clap::value_parser!(u64).range(1..))
                .help("Number of blame workers (defaults to half the CPUs)"),
        )
        .arg(
            Arg::new("sort")
                .short('s')
                .long("sort")
                .value_parser(["lines", "name"])
                .default_value("lines")
                .help("Order of the filetype table"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Write a JSON snapshot to stdout"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log more detail to stderr (-v info, -vv debug)"),
        )
}

fn setup_logging(verbose: u8) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            _ => tracing_subscriber::EnvFilter::new("debug"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Build exclusion config from matches
fn extract_exclusions(matches: &ArgMatches) -> ExclusionConfig {
    ExclusionConfig::new()
        .dot_files(!matches.get_flag("with-dot-files"))
        .config_files(!matches.get_flag("with-config-files"))
        .generated_files(!matches.get_flag("with-generated-files"))
        .vendor_files(!matches.get_flag("with-vendor-files"))
}

fn extract_blame_options(matches: &ArgMatches) -> BlameOptions {
    match matches.get_one::<u64>("workers") {
        Some(&count) => BlameOptions::new().workers(count as usize),
        None => BlameOptions::new(),
    }
}

/// Run the blame phase, drawing a progress bar when stderr is a terminal.
fn attribute(
    inventory: &mut Inventory,
    options: BlameOptions,
    show_progress: bool,
) -> anyhow::Result<()> {
    let history = GitHistory::new(inventory.root());
    if !show_progress {
        inventory.attribute(&history, options, None)?;
        return Ok(());
    }

    let (progress, updates) = ProgressChannel::bounded(PROGRESS_CAPACITY);
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} blaming [{bar:30}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let observer = {
        let bar = bar.clone();
        thread::spawn(move || {
            for update in updates.iter() {
                bar.set_length(update.total as u64);
                bar.set_position(update.current as u64);
                bar.set_message(update.path.display().to_string());
            }
        })
    };

    let result = inventory.attribute(&history, options, Some(&progress));
    // Closing the channel ends the observer loop.
    drop(progress);
    let _ = observer.join();
    bar.finish_and_clear();

    result?;
    Ok(())
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let path = matches
        .get_one::<String>("path")
        .map(|s| s.as_str())
        .unwrap_or(".");
    let json = matches.get_flag("json");
    let no_blame = matches.get_flag("no-blame");
    let order = SortOrder::parse(
        matches
            .get_one::<String>("sort")
            .map(|s| s.as_str())
            .unwrap_or("lines"),
    );

    let options = WalkOptions::new().exclusions(extract_exclusions(matches));
    let mut inventory = Inventory::new(Path::new(path), options);
    let walked = inventory.walk()?;
    tracing::debug!(files = walked.file_count(), lines = walked.total_lines, "walk finished");

    if !no_blame {
        let show_progress = !json && Term::stderr().is_term();
        attribute(&mut inventory, extract_blame_options(matches), show_progress)?;
    }

    if json {
        let snapshot = Snapshot::capture(&inventory)?;
        println!("{}", snapshot.to_json_pretty()?);
        return Ok(());
    }

    let report = inventory
        .walk_report()
        .context("walk finished without a report")?;
    let bold = Style::new().bold();

    println!("{}", bold.apply_to(format!("Lines by filetype in {}", path)));
    print!("{}", render_type_table(report, order));

    match inventory.attribution() {
        None => {}
        Some(AttributionOutcome::NoHistory { reason }) => {
            eprintln!("note: no history to attribute against ({})", reason);
        }
        Some(AttributionOutcome::Attributed(attribution)) => {
            println!();
            println!("{}", bold.apply_to("Lines by author"));
            print!("{}", render_author_table(attribution));
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    setup_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
