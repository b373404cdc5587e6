//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs logging
//! - loads the dataset snapshot
//! - dispatches to the TUI or a one-shot CLI query

use clap::Parser;

use crate::app::bindings::{Dashboard, OutputSlot, SelectorId};
use crate::chart::top_n_chart;
use crate::cli::picker::{prompt_for_country, resolve_country};
use crate::cli::{ChartArgs, Command, DataArgs, FactsArgs, RankArgs, TopArgs};
use crate::data::DatasetSnapshot;
use crate::error::{AppError, EXIT_INPUT};
use crate::logging::{LogTarget, init as init_logging};
use crate::report::{fast_facts, format_facts, format_top_n, friendly_label, rank_statement};

pub mod bindings;

/// Entry point for the `energy` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // We want `energy` and `energy --data-dir X` to behave like `energy tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let target = match cli.command {
        Command::Tui(_) => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    let _log_guard = init_logging(target);

    match cli.command {
        Command::Tui(args) => handle_tui(&args),
        Command::Rank(args) => handle_rank(&args),
        Command::Top(args) => handle_top(&args),
        Command::Facts(args) => handle_facts(&args),
        Command::Chart(args) => handle_chart(&args),
        Command::Countries(args) => handle_countries(&args),
    }
}

fn load_snapshot(args: &DataArgs) -> Result<DatasetSnapshot, AppError> {
    let paths = args.paths();
    tracing::info!(data_dir = %args.data_dir.display(), "loading datasets");
    DatasetSnapshot::load(&paths)
}

fn handle_tui(args: &DataArgs) -> Result<(), AppError> {
    let snapshot = load_snapshot(args)?;
    crate::tui::run(Dashboard::new(snapshot))
}

fn handle_rank(args: &RankArgs) -> Result<(), AppError> {
    let snapshot = load_snapshot(&args.data)?;
    let country = resolve_country(&args.country, snapshot.countries())?;
    let sentence = rank_statement(snapshot.consumption(), args.category, &country, args.metric)?;
    println!("{country}: {sentence}");
    Ok(())
}

fn handle_top(args: &TopArgs) -> Result<(), AppError> {
    let snapshot = load_snapshot(&args.data)?;
    let chart = top_n_chart(snapshot.consumption(), args.category, args.metric, args.n);

    let heading = format!(
        "Top {}: {} ({})",
        args.n,
        friendly_label(args.category, args.metric),
        args.category.label()
    );
    println!("{}", format_top_n(&chart, &heading, args.metric.column()));

    if let Some(path) = &args.export {
        crate::io::write_json(&chart, Some(path.as_path()))?;
    }
    Ok(())
}

fn handle_facts(args: &FactsArgs) -> Result<(), AppError> {
    let snapshot = load_snapshot(&args.data)?;
    let country = match &args.country {
        Some(name) => resolve_country(name, snapshot.countries())?,
        None => prompt_for_country(snapshot.countries())?,
    };
    let facts = fast_facts(&snapshot, &country)?;
    print!("{}", format_facts(&country, &facts));
    Ok(())
}

fn handle_chart(args: &ChartArgs) -> Result<(), AppError> {
    let slot = OutputSlot::from_key(&args.slot)
        .ok_or_else(|| AppError::new(EXIT_INPUT, format!("Unknown output slot '{}'", args.slot)))?;
    let overrides = args
        .set
        .iter()
        .map(|s| parse_override(s))
        .collect::<Result<Vec<_>, _>>()?;

    let snapshot = load_snapshot(&args.data)?;
    let mut dashboard = Dashboard::new(snapshot);
    for (id, value) in overrides {
        let value = if id == SelectorId::Country {
            resolve_country(&value, dashboard.snapshot().countries())?
        } else {
            value
        };
        dashboard.select(id, &value)?;
    }

    let output = dashboard
        .output(slot)
        .ok_or_else(|| AppError::new(EXIT_INPUT, format!("No output computed for '{}'", slot.key())))?;
    crate::io::write_json(output, args.out.as_deref())
}

fn handle_countries(args: &DataArgs) -> Result<(), AppError> {
    let snapshot = load_snapshot(args)?;
    for country in snapshot.countries() {
        println!("{country}");
    }
    Ok(())
}

/// Parse a `selector=value` override.
fn parse_override(s: &str) -> Result<(SelectorId, String), AppError> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| AppError::new(EXIT_INPUT, format!("Expected SELECTOR=VALUE, got '{s}'")))?;
    let id = SelectorId::from_key(key.trim())
        .ok_or_else(|| AppError::new(EXIT_INPUT, format!("Unknown selector '{}'", key.trim())))?;
    Ok((id, value.trim().to_string()))
}

/// Rewrite argv so `energy` defaults to `energy tui`.
///
/// Rules:
/// - `energy`                        -> `energy tui`
/// - `energy --data-dir X ...`       -> `energy tui --data-dir X ...`
/// - `energy --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "tui" | "rank" | "top" | "facts" | "chart" | "countries"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
