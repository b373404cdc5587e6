//! Dataset normalization and the shared snapshot.

pub mod normalize;
pub mod snapshot;

pub use normalize::*;
pub use snapshot::DatasetSnapshot;
