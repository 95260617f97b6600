//! Cadence CLI - configuration, the simulated output and command bodies

pub mod commands;
pub mod config;
pub mod error;
pub mod simulate;

pub use error::{CliError, Result};
