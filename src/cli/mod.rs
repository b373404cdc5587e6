//! Command-line parsing for the energy dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the query/chart code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::chart::DEFAULT_TOP_N;
use crate::domain::{Category, DataPaths, Metric};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "energy", version, about = "Global energy consumption dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive terminal dashboard.
    Tui(DataArgs),
    /// Print a country's world rank for one category and metric.
    Rank(RankArgs),
    /// Print the top-N countries for one category and metric.
    Top(TopArgs),
    /// Print the fast facts for a country (or the world).
    Facts(FactsArgs),
    /// Compute one dashboard output slot and write it as JSON.
    Chart(ChartArgs),
    /// List the selectable countries.
    Countries(DataArgs),
}

/// Where the three datasets live.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Directory holding the dataset files.
    #[arg(long, env = "ENERGY_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Consumption table (relative to the data directory).
    #[arg(long, default_value = "master_cons.csv")]
    pub consumption: PathBuf,

    /// Intensity table (relative to the data directory).
    #[arg(long, default_value = "energy_int.csv")]
    pub intensity: PathBuf,

    /// Nested time-series document (relative to the data directory).
    #[arg(long, default_value = "IntEnergyCons.json")]
    pub series: PathBuf,
}

impl DataArgs {
    pub fn paths(&self) -> DataPaths {
        DataPaths {
            consumption: self.data_dir.join(&self.consumption),
            intensity: self.data_dir.join(&self.intensity),
            series: self.data_dir.join(&self.series),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct RankArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long, value_enum, default_value_t = Category::TotalEnergyConsumption)]
    pub category: Category,

    /// Country name (case-insensitive; unique prefixes are accepted).
    #[arg(long)]
    pub country: String,

    #[arg(long, value_enum, default_value_t = Metric::LastValue)]
    pub metric: Metric,
}

#[derive(Debug, Args, Clone)]
pub struct TopArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long, value_enum, default_value_t = Category::TotalEnergyConsumption)]
    pub category: Category,

    #[arg(long, value_enum, default_value_t = Metric::LastValue)]
    pub metric: Metric,

    /// Number of countries to show.
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
    pub n: usize,

    /// Also write the chart specification to this JSON file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct FactsArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Country name; prompts when omitted.
    #[arg(long)]
    pub country: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output slot: world, country-trend, fact-total, fact-per-capita,
    /// fact-fossil, facts-title, top-absolute, top-dependence, top-intensity.
    pub slot: String,

    /// Selector override as `selector=value` (repeatable), e.g.
    /// `--set country=Chile` or `--set world-metric="Energy consumption per GDP"`.
    #[arg(long = "set", value_name = "SELECTOR=VALUE")]
    pub set: Vec<String>,

    /// Write to this file instead of stdout.
    #[arg(long, value_name = "JSON")]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_paths_join_the_data_dir() {
        let cli = Cli::parse_from(["energy", "countries", "--data-dir", "/tmp/energy", "--series", "s.json"]);
        let Command::Countries(args) = cli.command else {
            panic!("expected countries");
        };
        let paths = args.paths();
        assert_eq!(paths.series, PathBuf::from("/tmp/energy/s.json"));
        assert_eq!(paths.consumption, PathBuf::from("/tmp/energy/master_cons.csv"));
    }

    #[test]
    fn rank_parses_value_enums() {
        let cli = Cli::parse_from([
            "energy",
            "rank",
            "--category",
            "nuclear-renewables-and-other",
            "--country",
            "chile",
            "--metric",
            "dependence",
        ]);
        let Command::Rank(args) = cli.command else {
            panic!("expected rank");
        };
        assert_eq!(args.category, Category::NuclearRenewablesAndOther);
        assert_eq!(args.metric, Metric::Dependence);
    }

    #[test]
    fn chart_accepts_repeated_overrides() {
        let cli = Cli::parse_from(["energy", "chart", "top-absolute", "--set", "absolute-category=Coal", "--set", "country=Peru"]);
        let Command::Chart(args) = cli.command else {
            panic!("expected chart");
        };
        assert_eq!(args.slot, "top-absolute");
        assert_eq!(args.set.len(), 2);
    }
}
