//! Chart specifications and the pure builders that produce them.

pub mod builders;
pub mod spec;

pub use builders::*;
pub use spec::*;
