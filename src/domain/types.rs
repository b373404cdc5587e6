//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built once at load time and shared read-only afterwards
//! - exported to JSON alongside chart specifications
//! - used directly as `clap` value enums on the command line

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Phrase that marks the nuclear/renewables/other bucket anywhere in a series name.
pub const NUCLEAR_PHRASE: &str = "Total energy consumption from nuclear, renewables, and other";

/// Prefix shared by every per-source category name.
pub const SOURCE_PREFIX: &str = "Total energy consumption from ";

/// Missing-data sentinel used by the source datasets.
pub const MISSING_SENTINEL: &str = "--";

/// Aggregate row name in every table.
pub const WORLD: &str = "World";

/// Energy source category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Coal,
    NaturalGas,
    PetroleumAndOtherLiquids,
    NuclearRenewablesAndOther,
    TotalEnergyConsumption,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Coal,
        Category::NaturalGas,
        Category::NuclearRenewablesAndOther,
        Category::PetroleumAndOtherLiquids,
        Category::TotalEnergyConsumption,
    ];

    /// The four sources that stack up to the total, in trend-chart order.
    pub const SOURCES: [Category; 4] = [
        Category::PetroleumAndOtherLiquids,
        Category::Coal,
        Category::NaturalGas,
        Category::NuclearRenewablesAndOther,
    ];

    /// Full category name as it appears at the start of a series name.
    pub fn source_name(self) -> &'static str {
        match self {
            Category::Coal => "Total energy consumption from coal",
            Category::NaturalGas => "Total energy consumption from natural gas",
            Category::PetroleumAndOtherLiquids => {
                "Total energy consumption from petroleum and other liquids"
            }
            Category::NuclearRenewablesAndOther => NUCLEAR_PHRASE,
            Category::TotalEnergyConsumption => "Total energy consumption",
        }
    }

    /// Display label, also used as the `label` column of the flat tables.
    pub fn label(self) -> &'static str {
        match self {
            Category::Coal => "Coal",
            Category::NaturalGas => "Natural gas",
            Category::PetroleumAndOtherLiquids => "Petroleum and other liquids",
            Category::NuclearRenewablesAndOther => "Nuclear, renewables, and other",
            Category::TotalEnergyConsumption => "Total energy consumption",
        }
    }

    pub fn from_source_name(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.source_name() == name)
    }

    pub fn from_label(label: &str) -> Result<Category, DataError> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == label)
            .ok_or_else(|| DataError::UnknownLabel {
                label: label.to_string(),
            })
    }

    /// Token index of the country in a `", "`-split series name.
    pub fn country_token(self) -> usize {
        match self {
            Category::NuclearRenewablesAndOther => 3,
            _ => 1,
        }
    }
}

/// Numeric column of the consumption table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Absolute consumption (QBtu).
    LastValue,
    /// Consumption per person (MBtu).
    PerCapita,
    /// Consumption per USD of GDP (TBtu).
    PerGdp,
    /// Share of the country's total coming from this source.
    Dependence,
    /// Share coming from fossil fuels.
    FossilDependence,
}

impl Metric {
    /// Column name in `master_cons.csv`.
    pub fn column(self) -> &'static str {
        match self {
            Metric::LastValue => "lastValue",
            Metric::PerCapita => "MBtuPP",
            Metric::PerGdp => "TBtuUSD",
            Metric::Dependence => "dependence",
            Metric::FossilDependence => "FF_dependence",
        }
    }
}

/// World-map selector: which total-energy figure drives marker size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMetric {
    Total,
    PerCapita,
    PerGdp,
}

impl MapMetric {
    pub const ALL: [MapMetric; 3] = [MapMetric::Total, MapMetric::PerCapita, MapMetric::PerGdp];

    pub fn label(self) -> &'static str {
        match self {
            MapMetric::Total => "Total energy consumption",
            MapMetric::PerCapita => "Energy consumption per capita",
            MapMetric::PerGdp => "Energy consumption per GDP",
        }
    }

    pub fn from_label(label: &str) -> Option<MapMetric> {
        MapMetric::ALL.into_iter().find(|m| m.label() == label)
    }

    pub fn metric(self) -> Metric {
        match self {
            MapMetric::Total => Metric::LastValue,
            MapMetric::PerCapita => Metric::PerCapita,
            MapMetric::PerGdp => Metric::PerGdp,
        }
    }

    /// Marker-size multiplier applied to the metric value.
    pub fn scale(self) -> f64 {
        match self {
            MapMetric::Total | MapMetric::PerGdp => 10.0,
            MapMetric::PerCapita => 1.0,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            MapMetric::Total => "QBtu",
            MapMetric::PerCapita => "MBtu per person",
            MapMetric::PerGdp => "TBtu per USD GDP",
        }
    }
}

/// Intensity selector for the top-10 intensity chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityMetric {
    PerCapita,
    PerGdp,
}

impl IntensityMetric {
    pub const ALL: [IntensityMetric; 2] = [IntensityMetric::PerCapita, IntensityMetric::PerGdp];

    pub fn label(self) -> &'static str {
        match self {
            IntensityMetric::PerCapita => "Energy consumption per capita",
            IntensityMetric::PerGdp => "Energy consumption per GDP",
        }
    }

    pub fn from_label(label: &str) -> Option<IntensityMetric> {
        IntensityMetric::ALL.into_iter().find(|m| m.label() == label)
    }

    pub fn metric(self) -> Metric {
        match self {
            IntensityMetric::PerCapita => Metric::PerCapita,
            IntensityMetric::PerGdp => Metric::PerGdp,
        }
    }

    /// Axis unit label (the CSV column name).
    pub fn unit(self) -> &'static str {
        self.metric().column()
    }
}

/// One row of the consumption table: a (country, category) pair.
///
/// Empty CSV cells load as `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionRow {
    pub country: String,
    pub label: Category,
    pub last_value: Option<f64>,
    pub mbtu_pp: Option<f64>,
    pub tbtu_usd: Option<f64>,
    pub dependence: Option<f64>,
    pub ff_dependence: Option<f64>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

impl ConsumptionRow {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        let v = match metric {
            Metric::LastValue => self.last_value,
            Metric::PerCapita => self.mbtu_pp,
            Metric::PerGdp => self.tbtu_usd,
            Metric::Dependence => self.dependence,
            Metric::FossilDependence => self.ff_dependence,
        };
        v.filter(|x| x.is_finite())
    }
}

/// One row of the intensity table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityRow {
    pub country: String,
    pub label: String,
    pub last_value: Option<f64>,
}

/// A dated observation; `None` is the source's missing-data sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// A normalized per-country, per-category time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesDocument {
    pub raw_name: String,
    pub category: Category,
    pub label: String,
    pub country: String,
    pub observations: Vec<Observation>,
    /// Value of the final observation; always present for retained documents.
    pub last_value: f64,
}

/// Locations of the three input datasets.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub consumption: PathBuf,
    pub intensity: PathBuf,
    pub series: PathBuf,
}
