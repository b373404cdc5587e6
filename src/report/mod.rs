//! Reporting utilities: world rankings, fast facts, and formatted terminal output.

use crate::domain::{Category, ConsumptionRow, Metric};
use crate::error::DataError;

pub mod facts;
pub mod format;

pub use facts::*;
pub use format::*;

/// Rank of `country` among all rows of `category`, largest value first.
///
/// Ties take the worst rank of their group ("max" method): the rank is the
/// number of rows whose value is at least the country's value. Rows without a
/// value for `metric` are not ranked.
pub fn rank_position(
    rows: &[ConsumptionRow],
    category: Category,
    country: &str,
    metric: Metric,
) -> Result<usize, DataError> {
    let row = rows
        .iter()
        .find(|r| r.label == category && r.country == country)
        .ok_or_else(|| DataError::NotFound {
            category,
            country: country.to_string(),
        })?;
    let value = row.metric(metric).ok_or_else(|| DataError::MissingMetric {
        category,
        country: country.to_string(),
        metric,
    })?;

    Ok(rows
        .iter()
        .filter(|r| r.label == category)
        .filter_map(|r| r.metric(metric))
        .filter(|v| *v >= value)
        .count())
}

/// Human-readable name of what a (category, metric) rank measures.
pub fn friendly_label(category: Category, metric: Metric) -> String {
    match (category, metric) {
        (Category::NuclearRenewablesAndOther, Metric::Dependence) => "fossil fuel independence".to_string(),
        (Category::NuclearRenewablesAndOther, Metric::FossilDependence) => "fossil fuel dependence".to_string(),
        (_, Metric::PerGdp) => "Total energy use per GDP".to_string(),
        (_, Metric::PerCapita) => "Total energy use per capita".to_string(),
        (_, Metric::Dependence) => format!("% dependence on {}", category.label()),
        _ => category.label().to_string(),
    }
}

/// "Ranks number {rank} in the world for {label}".
pub fn rank_statement(
    rows: &[ConsumptionRow],
    category: Category,
    country: &str,
    metric: Metric,
) -> Result<String, DataError> {
    let rank = rank_position(rows, category, country, metric)?;
    Ok(format!(
        "Ranks number {rank} in the world for {}",
        friendly_label(category, metric)
    ))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{Category, ConsumptionRow};

    pub fn row(country: &str, label: Category, last_value: f64) -> ConsumptionRow {
        ConsumptionRow {
            country: country.to_string(),
            label,
            last_value: Some(last_value),
            mbtu_pp: None,
            tbtu_usd: None,
            dependence: None,
            ff_dependence: None,
            lat: None,
            long: None,
        }
    }
}
