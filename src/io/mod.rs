//! Input/output helpers.
//!
//! - CSV ingest of the flat tables (`ingest`)
//! - JSON ingest of the nested time series (`series`)
//! - JSON export of dashboard outputs (`export`)

pub mod export;
pub mod ingest;
pub mod series;

pub use export::*;
pub use ingest::*;
pub use series::*;
