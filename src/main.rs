//! # devrun
//!
//! Developer convenience commands for an agent app stack.
//!
//! ## Usage
//!
//! - List commands: `devrun` or `devrun help`
//! - Install dependencies: `devrun install`
//! - Start the stack (needs `OPENAI_API_KEY`): `devrun run`
//! - Use a specific project config: `devrun --config ../app test`

/// Entry point for the CLI tool.
fn main() {
    std::process::exit(devrun::cli::run_cli());
}
