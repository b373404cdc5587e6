//! "Fast facts" shown beside the country trend chart.
//!
//! For the world aggregate these are headline figures; for a single country
//! they are world-rank sentences.

use serde::Serialize;

use crate::data::DatasetSnapshot;
use crate::domain::{Category, IntensityMetric, Metric, WORLD};
use crate::error::{AppError, DataError, EXIT_QUERY};
use crate::report::rank_statement;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FastFacts {
    pub title: String,
    pub total: String,
    pub per_capita: String,
    pub fossil: String,
}

pub fn fast_facts(snapshot: &DatasetSnapshot, country: &str) -> Result<FastFacts, AppError> {
    Ok(FastFacts {
        title: facts_title(country),
        total: fact_total(snapshot, country)?,
        per_capita: fact_per_capita(snapshot, country)?,
        fossil: fact_fossil(snapshot, country)?,
    })
}

/// Currently always blank; the slot is kept so the layout has a heading line.
pub fn facts_title(_country: &str) -> String {
    String::new()
}

pub fn fact_total(snapshot: &DatasetSnapshot, country: &str) -> Result<String, AppError> {
    if country == WORLD {
        let total = world_last_value(snapshot, Category::TotalEnergyConsumption)?;
        return Ok(format!("Total energy consumption: {} QBtu", total.trunc() as i64));
    }
    Ok(rank_statement(
        snapshot.consumption(),
        Category::TotalEnergyConsumption,
        country,
        Metric::LastValue,
    )?)
}

pub fn fact_per_capita(snapshot: &DatasetSnapshot, country: &str) -> Result<String, AppError> {
    if country == WORLD {
        let label = IntensityMetric::PerCapita.label();
        let value = snapshot.intensity_value(WORLD, label).ok_or_else(|| {
            AppError::new(EXIT_QUERY, format!("No '{label}' intensity value for {WORLD}"))
        })?;
        return Ok(format!("Energy consumption per capita: {} MBtuPP", value.trunc() as i64));
    }
    Ok(rank_statement(
        snapshot.consumption(),
        Category::TotalEnergyConsumption,
        country,
        Metric::PerCapita,
    )?)
}

pub fn fact_fossil(snapshot: &DatasetSnapshot, country: &str) -> Result<String, AppError> {
    if country == WORLD {
        let total = world_last_value(snapshot, Category::TotalEnergyConsumption)?;
        let clean = world_last_value(snapshot, Category::NuclearRenewablesAndOther)?;
        let pct = 100.0 * (1.0 - clean / total);
        return Ok(format!("Percentage coming from fossil fuels: {pct:.1} %"));
    }
    Ok(rank_statement(
        snapshot.consumption(),
        Category::NuclearRenewablesAndOther,
        country,
        Metric::Dependence,
    )?)
}

fn world_last_value(snapshot: &DatasetSnapshot, category: Category) -> Result<f64, DataError> {
    snapshot
        .series_for(WORLD, category)
        .map(|doc| doc.last_value)
        .ok_or_else(|| DataError::MissingSeries {
            category,
            country: WORLD.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IntensityRow, Observation, SeriesDocument};
    use crate::report::fixtures::row;
    use chrono::NaiveDate;

    fn doc(country: &str, category: Category, last_value: f64) -> SeriesDocument {
        SeriesDocument {
            raw_name: String::new(),
            category,
            label: category.label().to_string(),
            country: country.to_string(),
            observations: vec![Observation {
                date: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap(),
                value: Some(last_value),
            }],
            last_value,
        }
    }

    fn snapshot() -> DatasetSnapshot {
        let mut chile = row("Chile", Category::TotalEnergyConsumption, 1.7);
        chile.mbtu_pp = Some(90.0);
        let mut peru = row("Peru", Category::TotalEnergyConsumption, 1.0);
        peru.mbtu_pp = Some(30.0);
        let mut chile_clean = row("Chile", Category::NuclearRenewablesAndOther, 0.4);
        chile_clean.dependence = Some(0.25);
        let mut peru_clean = row("Peru", Category::NuclearRenewablesAndOther, 0.3);
        peru_clean.dependence = Some(0.3);

        DatasetSnapshot::from_parts(
            vec![chile, peru, chile_clean, peru_clean],
            vec![
                IntensityRow {
                    country: WORLD.to_string(),
                    label: "Energy consumption per GDP".to_string(),
                    last_value: Some(5.2),
                },
                IntensityRow {
                    country: WORLD.to_string(),
                    label: "Energy consumption per capita".to_string(),
                    last_value: Some(76.9),
                },
            ],
            vec![
                doc(WORLD, Category::TotalEnergyConsumption, 574.9),
                doc(WORLD, Category::NuclearRenewablesAndOther, 86.4),
            ],
        )
    }

    #[test]
    fn world_shows_headline_figures() {
        let facts = fast_facts(&snapshot(), WORLD).unwrap();
        assert_eq!(facts.title, "");
        assert_eq!(facts.total, "Total energy consumption: 574 QBtu");
        assert_eq!(facts.per_capita, "Energy consumption per capita: 76 MBtuPP");
        assert_eq!(facts.fossil, "Percentage coming from fossil fuels: 85.0 %");
    }

    #[test]
    fn countries_show_rank_sentences() {
        let facts = fast_facts(&snapshot(), "Peru").unwrap();
        assert_eq!(facts.total, "Ranks number 2 in the world for Total energy consumption");
        assert_eq!(facts.per_capita, "Ranks number 2 in the world for Total energy use per capita");
        assert_eq!(facts.fossil, "Ranks number 1 in the world for fossil fuel independence");
    }

    #[test]
    fn unknown_country_is_a_query_error() {
        let err = fact_total(&snapshot(), "Atlantis").unwrap_err();
        assert_eq!(err.exit_code(), EXIT_QUERY);
    }
}
