//! Error types for command dispatch, delegates and configuration.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit code used when a delegate program could not be started at all.
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

/// Everything that can make a command fail.
#[derive(Debug)]
pub enum RunnerError {
    /// A guarded command found its required environment variable unset or empty.
    MissingVariable { variable: String },
    /// A delegate step ran and exited non-zero.
    DelegateFailed { command: String, code: i32 },
    /// A delegate step could not be spawned.
    Spawn { program: String, source: io::Error },
    /// Two commands were registered under the same name.
    DuplicateCommand(String),
    /// `devrun.json` could not be read or was invalid.
    Config { path: PathBuf, message: String },
}

impl RunnerError {
    /// Process exit code this error should terminate with.
    ///
    /// Delegate failures propagate the child's code unchanged.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            RunnerError::DelegateFailed { code, .. } => *code,
            RunnerError::Spawn { .. } => SPAWN_FAILURE_EXIT_CODE,
            RunnerError::MissingVariable { .. }
            | RunnerError::DuplicateCommand(_)
            | RunnerError::Config { .. } => 1,
        }
    }
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerError::MissingVariable { variable } => write!(
                f,
                "Error: {variable} environment variable is not set.\n\
                 Set it with: export {variable}=<your-value>"
            ),
            RunnerError::DelegateFailed { command, code } => {
                write!(f, "Error: `{command}` exited with status {code}")
            }
            RunnerError::Spawn { program, source } => {
                write!(f, "Error: could not start `{program}`: {source}")
            }
            RunnerError::DuplicateCommand(name) => {
                write!(f, "Error: command '{name}' is already registered")
            }
            RunnerError::Config { path, message } => {
                write!(f, "Error in {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunnerError::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}
