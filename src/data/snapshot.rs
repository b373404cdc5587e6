//! The immutable in-memory dataset.
//!
//! Everything the dashboard shows is derived from one `DatasetSnapshot`, built
//! once at startup and never reopened or mutated afterwards.

use std::collections::BTreeSet;

use crate::data::normalize::normalize;
use crate::domain::{Category, ConsumptionRow, DataPaths, IntensityRow, SeriesDocument};
use crate::error::AppError;
use crate::io::{load_consumption, load_intensity, load_series};

#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    consumption: Vec<ConsumptionRow>,
    intensity: Vec<IntensityRow>,
    series: Vec<SeriesDocument>,
    countries: Vec<String>,
}

impl DatasetSnapshot {
    /// Load and normalize all three datasets. Any failure is fatal.
    pub fn load(paths: &DataPaths) -> Result<Self, AppError> {
        let consumption = load_consumption(&paths.consumption)?;
        let intensity = load_intensity(&paths.intensity)?;
        let raw = load_series(&paths.series)?;
        let series = normalize(&raw)?;
        Ok(Self::from_parts(consumption, intensity, series))
    }

    pub fn from_parts(
        consumption: Vec<ConsumptionRow>,
        intensity: Vec<IntensityRow>,
        series: Vec<SeriesDocument>,
    ) -> Self {
        let countries = series
            .iter()
            .map(|doc| doc.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self {
            consumption,
            intensity,
            series,
            countries,
        }
    }

    pub fn consumption(&self) -> &[ConsumptionRow] {
        &self.consumption
    }

    pub fn intensity(&self) -> &[IntensityRow] {
        &self.intensity
    }

    pub fn series(&self) -> &[SeriesDocument] {
        &self.series
    }

    /// Unique countries of the normalized series, sorted.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// First series for (country, category), in file order.
    pub fn series_for(&self, country: &str, category: Category) -> Option<&SeriesDocument> {
        self.series
            .iter()
            .find(|doc| doc.country == country && doc.category == category)
    }

    pub fn intensity_value(&self, country: &str, label: &str) -> Option<f64> {
        self.intensity
            .iter()
            .find(|row| row.country == country && row.label == label)
            .and_then(|row| row.last_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;
    use chrono::NaiveDate;

    fn doc(country: &str, category: Category) -> SeriesDocument {
        SeriesDocument {
            raw_name: format!("{}, {country}, Annual", category.source_name()),
            category,
            label: category.label().to_string(),
            country: country.to_string(),
            observations: vec![Observation {
                date: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap(),
                value: Some(1.0),
            }],
            last_value: 1.0,
        }
    }

    #[test]
    fn countries_are_unique_and_sorted() {
        let snapshot = DatasetSnapshot::from_parts(
            Vec::new(),
            Vec::new(),
            vec![
                doc("World", Category::Coal),
                doc("Chile", Category::Coal),
                doc("World", Category::NaturalGas),
            ],
        );
        assert_eq!(snapshot.countries(), ["Chile".to_string(), "World".to_string()]);
        assert!(snapshot.series_for("Chile", Category::Coal).is_some());
        assert!(snapshot.series_for("Chile", Category::NaturalGas).is_none());
    }

    #[test]
    fn load_fails_on_missing_files() {
        let paths = DataPaths {
            consumption: "missing/master_cons.csv".into(),
            intensity: "missing/energy_int.csv".into(),
            series: "missing/IntEnergyCons.json".into(),
        };
        assert!(DatasetSnapshot::load(&paths).is_err());
    }
}
