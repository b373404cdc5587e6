//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - category/metric enums (`Category`, `Metric`, `MapMetric`, `IntensityMetric`)
//! - flat table rows (`ConsumptionRow`, `IntensityRow`)
//! - normalized time series (`SeriesDocument`, `Observation`)

pub mod types;

pub use types::*;
