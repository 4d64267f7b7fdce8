//! Focusboard CLI library.
//!
//! This crate provides the CLI interface over `fb-core`.

mod cli;
pub mod commands;
mod config;
pub mod input;

pub use cli::{Cli, Commands, PeriodArg};
pub use config::Config;
