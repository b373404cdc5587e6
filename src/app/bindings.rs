//! Selector → output wiring.
//!
//! The dashboard's reactivity is data, not control flow: `BINDINGS` lists, for
//! every output slot, which selectors it watches and the function that
//! recomputes it. `Dashboard` holds the current selector values and replays
//! only the affected bindings when one of them changes.

use std::collections::HashMap;

use serde::Serialize;

use crate::chart::{ChartSpec, DEFAULT_TOP_N, country_trend_chart, top_n_chart, world_map_chart};
use crate::data::DatasetSnapshot;
use crate::domain::{Category, IntensityMetric, MapMetric, Metric, WORLD};
use crate::error::{AppError, EXIT_INPUT};
use crate::report::{fact_fossil, fact_per_capita, fact_total, facts_title};

/// A user-facing selector control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorId {
    WorldMetric,
    Country,
    AbsoluteCategory,
    DependenceCategory,
    IntensityMetric,
}

impl SelectorId {
    pub const ALL: [SelectorId; 5] = [
        SelectorId::WorldMetric,
        SelectorId::Country,
        SelectorId::AbsoluteCategory,
        SelectorId::DependenceCategory,
        SelectorId::IntensityMetric,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SelectorId::WorldMetric => "world-metric",
            SelectorId::Country => "country",
            SelectorId::AbsoluteCategory => "absolute-category",
            SelectorId::DependenceCategory => "dependence-category",
            SelectorId::IntensityMetric => "intensity-metric",
        }
    }

    pub fn from_key(key: &str) -> Option<SelectorId> {
        SelectorId::ALL.into_iter().find(|s| s.key() == key)
    }

    pub fn title(self) -> &'static str {
        match self {
            SelectorId::WorldMetric => "Worldwide, as of 2017",
            SelectorId::Country => "By energy source",
            SelectorId::AbsoluteCategory => "Top 10: Energy consumption",
            SelectorId::DependenceCategory => "Top 10: Relative dependence",
            SelectorId::IntensityMetric => "Top 10: Energy intensity",
        }
    }
}

/// A named place in the layout that shows one computed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputSlot {
    WorldMap,
    CountryTrend,
    FactsTitle,
    FactTotal,
    FactPerCapita,
    FactFossil,
    TopAbsolute,
    TopDependence,
    TopIntensity,
}

impl OutputSlot {
    pub const ALL: [OutputSlot; 9] = [
        OutputSlot::WorldMap,
        OutputSlot::CountryTrend,
        OutputSlot::FactsTitle,
        OutputSlot::FactTotal,
        OutputSlot::FactPerCapita,
        OutputSlot::FactFossil,
        OutputSlot::TopAbsolute,
        OutputSlot::TopDependence,
        OutputSlot::TopIntensity,
    ];

    pub fn key(self) -> &'static str {
        match self {
            OutputSlot::WorldMap => "world",
            OutputSlot::CountryTrend => "country-trend",
            OutputSlot::FactsTitle => "facts-title",
            OutputSlot::FactTotal => "fact-total",
            OutputSlot::FactPerCapita => "fact-per-capita",
            OutputSlot::FactFossil => "fact-fossil",
            OutputSlot::TopAbsolute => "top-absolute",
            OutputSlot::TopDependence => "top-dependence",
            OutputSlot::TopIntensity => "top-intensity",
        }
    }

    pub fn from_key(key: &str) -> Option<OutputSlot> {
        BINDINGS.iter().map(|b| b.slot).find(|s| s.key() == key)
    }
}

/// The content of a slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Output {
    Chart(ChartSpec),
    Text(String),
    /// The recomputation failed; the message is shown in place of the output.
    Error(String),
}

/// One option of a selector: what is shown and what is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    fn same(text: &str) -> Self {
        Self {
            label: text.to_string(),
            value: text.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectorDef {
    pub id: SelectorId,
    pub options: Vec<SelectOption>,
    pub default: String,
}

/// Current value of every selector.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    values: HashMap<SelectorId, String>,
}

impl Selection {
    pub fn get(&self, id: SelectorId) -> &str {
        self.values.get(&id).map(String::as_str).unwrap_or_default()
    }
}

type ComputeFn = fn(&DatasetSnapshot, &Selection) -> Result<Output, AppError>;

pub struct Binding {
    pub slot: OutputSlot,
    pub watches: &'static [SelectorId],
    pub compute: ComputeFn,
}

pub static BINDINGS: &[Binding] = &[
    Binding {
        slot: OutputSlot::WorldMap,
        watches: &[SelectorId::WorldMetric],
        compute: compute_world_map,
    },
    Binding {
        slot: OutputSlot::CountryTrend,
        watches: &[SelectorId::Country],
        compute: compute_country_trend,
    },
    Binding {
        slot: OutputSlot::FactsTitle,
        watches: &[SelectorId::Country],
        compute: |_, sel| Ok(Output::Text(facts_title(sel.get(SelectorId::Country)))),
    },
    Binding {
        slot: OutputSlot::FactTotal,
        watches: &[SelectorId::Country],
        compute: |snapshot, sel| Ok(Output::Text(fact_total(snapshot, sel.get(SelectorId::Country))?)),
    },
    Binding {
        slot: OutputSlot::FactPerCapita,
        watches: &[SelectorId::Country],
        compute: |snapshot, sel| Ok(Output::Text(fact_per_capita(snapshot, sel.get(SelectorId::Country))?)),
    },
    Binding {
        slot: OutputSlot::FactFossil,
        watches: &[SelectorId::Country],
        compute: |snapshot, sel| Ok(Output::Text(fact_fossil(snapshot, sel.get(SelectorId::Country))?)),
    },
    Binding {
        slot: OutputSlot::TopAbsolute,
        watches: &[SelectorId::AbsoluteCategory],
        compute: compute_top_absolute,
    },
    Binding {
        slot: OutputSlot::TopDependence,
        watches: &[SelectorId::DependenceCategory],
        compute: compute_top_dependence,
    },
    Binding {
        slot: OutputSlot::TopIntensity,
        watches: &[SelectorId::IntensityMetric],
        compute: compute_top_intensity,
    },
];

fn compute_world_map(snapshot: &DatasetSnapshot, sel: &Selection) -> Result<Output, AppError> {
    let value = sel.get(SelectorId::WorldMetric);
    let map_metric = MapMetric::from_label(value).ok_or_else(|| unknown_value(SelectorId::WorldMetric, value))?;
    Ok(Output::Chart(world_map_chart(snapshot.consumption(), map_metric)))
}

fn compute_country_trend(snapshot: &DatasetSnapshot, sel: &Selection) -> Result<Output, AppError> {
    Ok(Output::Chart(country_trend_chart(snapshot, sel.get(SelectorId::Country))?))
}

fn compute_top_absolute(snapshot: &DatasetSnapshot, sel: &Selection) -> Result<Output, AppError> {
    let category = Category::from_label(sel.get(SelectorId::AbsoluteCategory))?;
    let mut chart = top_n_chart(snapshot.consumption(), category, Metric::LastValue, DEFAULT_TOP_N);
    chart.layout.xaxis_title = Some("QBtu".to_string());
    Ok(Output::Chart(chart))
}

fn compute_top_dependence(snapshot: &DatasetSnapshot, sel: &Selection) -> Result<Output, AppError> {
    let category = Category::from_label(sel.get(SelectorId::DependenceCategory))?;
    let mut chart = top_n_chart(snapshot.consumption(), category, Metric::Dependence, DEFAULT_TOP_N);
    chart.layout.xaxis_title = Some("Fraction of total energy use".to_string());
    Ok(Output::Chart(chart))
}

fn compute_top_intensity(snapshot: &DatasetSnapshot, sel: &Selection) -> Result<Output, AppError> {
    let value = sel.get(SelectorId::IntensityMetric);
    let intensity =
        IntensityMetric::from_label(value).ok_or_else(|| unknown_value(SelectorId::IntensityMetric, value))?;
    let mut chart = top_n_chart(
        snapshot.consumption(),
        Category::TotalEnergyConsumption,
        intensity.metric(),
        DEFAULT_TOP_N,
    );
    chart.layout.xaxis_title = Some(intensity.unit().to_string());
    Ok(Output::Chart(chart))
}

fn unknown_value(id: SelectorId, value: &str) -> AppError {
    AppError::new(EXIT_INPUT, format!("Unknown value '{value}' for selector `{}`", id.key()))
}

/// Selector definitions: option lists and defaults.
pub fn selector_defs(snapshot: &DatasetSnapshot) -> Vec<SelectorDef> {
    let sources: Vec<Category> = Category::ALL
        .into_iter()
        .filter(|c| *c != Category::TotalEnergyConsumption)
        .collect();

    vec![
        SelectorDef {
            id: SelectorId::WorldMetric,
            options: MapMetric::ALL.iter().map(|m| SelectOption::same(m.label())).collect(),
            default: MapMetric::Total.label().to_string(),
        },
        SelectorDef {
            id: SelectorId::Country,
            options: snapshot.countries().iter().map(|c| SelectOption::same(c)).collect(),
            default: WORLD.to_string(),
        },
        SelectorDef {
            id: SelectorId::AbsoluteCategory,
            options: category_options(&Category::ALL),
            default: Category::TotalEnergyConsumption.label().to_string(),
        },
        SelectorDef {
            id: SelectorId::DependenceCategory,
            options: category_options(&sources),
            default: Category::Coal.label().to_string(),
        },
        SelectorDef {
            id: SelectorId::IntensityMetric,
            options: IntensityMetric::ALL
                .iter()
                .map(|m| SelectOption {
                    label: format!("Total e{}", &m.label()[1..]),
                    value: m.label().to_string(),
                })
                .collect(),
            default: IntensityMetric::PerCapita.label().to_string(),
        },
    ]
}

fn category_options(categories: &[Category]) -> Vec<SelectOption> {
    categories.iter().map(|c| SelectOption::same(c.label())).collect()
}

/// Live dashboard state over one immutable snapshot.
pub struct Dashboard {
    snapshot: DatasetSnapshot,
    selectors: Vec<SelectorDef>,
    selection: Selection,
    outputs: HashMap<OutputSlot, Output>,
}

impl Dashboard {
    /// Start from every selector's default and compute all slots.
    pub fn new(snapshot: DatasetSnapshot) -> Self {
        let selectors = selector_defs(&snapshot);
        let mut selection = Selection::default();
        for def in &selectors {
            selection.values.insert(def.id, def.default.clone());
        }
        let mut dashboard = Self {
            snapshot,
            selectors,
            selection,
            outputs: HashMap::new(),
        };
        for binding in BINDINGS {
            dashboard.recompute(binding);
        }
        dashboard
    }

    pub fn snapshot(&self) -> &DatasetSnapshot {
        &self.snapshot
    }

    pub fn selectors(&self) -> &[SelectorDef] {
        &self.selectors
    }

    pub fn selector(&self, id: SelectorId) -> Option<&SelectorDef> {
        self.selectors.iter().find(|d| d.id == id)
    }

    pub fn value(&self, id: SelectorId) -> &str {
        self.selection.get(id)
    }

    pub fn output(&self, slot: OutputSlot) -> Option<&Output> {
        self.outputs.get(&slot)
    }

    /// Set a selector and recompute the slots that watch it.
    ///
    /// Returns the recomputed slots. Values outside the selector's option list
    /// are rejected and leave the dashboard unchanged.
    pub fn select(&mut self, id: SelectorId, value: &str) -> Result<Vec<OutputSlot>, AppError> {
        let def = self
            .selector(id)
            .ok_or_else(|| AppError::new(EXIT_INPUT, format!("Unknown selector `{}`", id.key())))?;
        if !def.options.iter().any(|o| o.value == value) {
            return Err(unknown_value(id, value));
        }

        tracing::debug!(selector = id.key(), value, "selection changed");
        self.selection.values.insert(id, value.to_string());

        let mut updated = Vec::new();
        for binding in BINDINGS.iter().filter(|b| b.watches.contains(&id)) {
            self.recompute(binding);
            updated.push(binding.slot);
        }
        Ok(updated)
    }

    /// Step a selector through its options, wrapping at either end.
    pub fn cycle(&mut self, id: SelectorId, delta: isize) -> Result<Vec<OutputSlot>, AppError> {
        let Some(def) = self.selector(id) else {
            return Ok(Vec::new());
        };
        let len = def.options.len() as isize;
        if len == 0 {
            return Ok(Vec::new());
        }
        let current = def
            .options
            .iter()
            .position(|o| o.value == self.selection.get(id))
            .unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        let value = def.options[next].value.clone();
        self.select(id, &value)
    }

    fn recompute(&mut self, binding: &Binding) {
        let output = match (binding.compute)(&self.snapshot, &self.selection) {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!(slot = binding.slot.key(), error = %err, "output recomputation failed");
                Output::Error(err.to_string())
            }
        };
        self.outputs.insert(binding.slot, output);
    }
}
