//! External process delegates.
//!
//! Commands never spawn processes themselves; they hold a list of
//! [`ExternalProcess`] steps and run them in order.

use crate::error::RunnerError;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Environment variable that overrides the shell used for delegate steps.
pub const SHELL_ENV_VAR: &str = "DEVRUN_SHELL";

/// Something that can be run to completion and report an exit code.
pub trait ExternalProcess {
    /// Human-readable form of what will run, used in diagnostics.
    fn display(&self) -> &str;

    /// Run the process, blocking until it exits.
    ///
    /// # Errors
    ///
    /// Returns `Err` only if the process could not be started. A process
    /// that starts and exits non-zero is reported through `Ok(code)`.
    fn execute(&self) -> Result<i32, RunnerError>;
}

/// A single command line run through the platform shell.
#[derive(Debug, Clone)]
pub struct ShellStep {
    command: String,
    working_dir: Option<PathBuf>,
}

impl ShellStep {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            working_dir: None,
        }
    }

    /// Run the step from `dir` instead of the current directory.
    #[must_use]
    pub fn in_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }
}

impl ExternalProcess for ShellStep {
    fn display(&self) -> &str {
        &self.command
    }

    fn execute(&self) -> Result<i32, RunnerError> {
        let (shell, shell_arg) = resolve_shell();

        let mut cmd = Command::new(&shell);
        cmd.arg(shell_arg).arg(&self.command);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        let status = cmd
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| RunnerError::Spawn {
                program: shell.clone(),
                source,
            })?;

        // Killed by a signal: no code to forward.
        Ok(status.code().unwrap_or(1))
    }
}

/// Pick the shell and its "run this string" flag.
///
/// `DEVRUN_SHELL` wins; otherwise PowerShell on Windows (preferring `pwsh`)
/// and `sh` everywhere else.
fn resolve_shell() -> (String, &'static str) {
    if let Ok(custom_shell) = std::env::var(SHELL_ENV_VAR)
        && !custom_shell.is_empty()
    {
        return (custom_shell, "-c");
    }

    if cfg!(target_os = "windows") {
        if which::which("pwsh").is_ok() {
            ("pwsh".to_string(), "-Command")
        } else {
            ("powershell".to_string(), "-Command")
        }
    } else {
        ("sh".to_string(), "-c")
    }
}

/// Run each step in order, stopping at the first failure.
///
/// # Errors
///
/// Returns [`RunnerError::DelegateFailed`] carrying the failing step's exit
/// code, or [`RunnerError::Spawn`] if a step could not be started.
pub fn run_steps(steps: &[Box<dyn ExternalProcess>]) -> Result<(), RunnerError> {
    for step in steps {
        let code = step.execute()?;
        if code != 0 {
            return Err(RunnerError::DelegateFailed {
                command: step.display().to_string(),
                code,
            });
        }
    }
    Ok(())
}
