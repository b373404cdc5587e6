//! `energy-dash` library crate.
//!
//! The binary (`energy`) is a thin wrapper around this library so that:
//!
//! - loading, ranking and chart building are testable without a terminal
//! - the same chart specifications feed both the TUI and the JSON export
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod tui;
