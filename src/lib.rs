//! # devrun
//!
//! Developer convenience commands for an agent app stack: install, clean,
//! test, format, run and stop. Each command delegates to external tools
//! (package installer, test runner, formatter, container orchestrator).

pub mod cli;
pub mod commands;
pub mod config;
pub mod delegate;
pub mod error;
pub mod guard;
pub mod registry;
pub mod runner;

/// Print an error message and exit with code 1.
pub fn fatal_error(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}
