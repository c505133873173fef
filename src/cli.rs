//! CLI module containing the main entry point logic.

use crate::{commands, config, guard::ProcessEnv, runner::Runner};
use clap::Parser as ClapParser;
use clap::error::ErrorKind;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI arguments for devrun.
#[derive(ClapParser, Debug)]
#[command(name = "devrun")]
#[command(version = PKG_VERSION)]
#[command(about = "Developer commands for the agent app stack", long_about = None)]
struct Cli {
    /// Command to run (install, clean, test, format, run, stop, help)
    #[arg(value_name = "COMMAND")]
    command: Option<String>,

    /// Extra arguments (ignored; commands take no arguments)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    args: Vec<String>,

    /// Path to devrun.json, or the project directory containing it (alias: --working-dir)
    #[arg(long = "config", alias = "working-dir", value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    fn argv(&self) -> Vec<String> {
        self.command
            .iter()
            .chain(self.args.iter())
            .cloned()
            .collect()
    }
}

/// Parse arguments (program name first).
///
/// `--help` and `--version` are handled by clap and exit. Any other parse
/// failure (an unknown flag, a missing flag value) falls back to passing the
/// raw arguments through, so the runner shows the command listing.
fn parse_args<I, T>(args: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let raw: Vec<OsString> = args.into_iter().map(Into::into).collect();
    match Cli::try_parse_from(&raw) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => Cli {
            command: None,
            args: raw
                .iter()
                .skip(1)
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
            config: None,
        },
    }
}

/// Main CLI logic. Returns the process exit code.
#[must_use]
pub fn run_cli() -> i32 {
    let cli = parse_args(std::env::args_os());

    let loaded = config::load_config_or_exit(cli.config.as_deref());
    let registry = commands::build_registry(&loaded, Rc::new(ProcessEnv))
        .unwrap_or_else(|e| crate::fatal_error(&e.to_string()));

    let stdout = io::stdout();
    let stderr = io::stderr();
    Runner::new(&registry).run(&cli.argv(), &mut stdout.lock(), &mut stderr.lock())
}
