//! The built-in developer commands and their default delegates.

use crate::config::{CONFIG_FILE_NAME, CommandOverride, LoadedConfig};
use crate::delegate::{ExternalProcess, ShellStep};
use crate::error::RunnerError;
use crate::guard::{DEFAULT_CREDENTIAL_VAR, EnvGuard, EnvSource};
use crate::registry::{Action, DelegateAction, GuardedAction, Registry};
use std::path::PathBuf;
use std::rc::Rc;

/// A command shipped with devrun.
pub struct Builtin {
    pub name: &'static str,
    pub description: &'static str,
    pub steps: &'static [&'static str],
    /// Requires the credential variable before running.
    pub guarded: bool,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "install",
        description: "Install dependencies and set up the environment",
        steps: &[
            "python3 -m pip install --upgrade uv",
            "uv pip install -r requirements.txt",
            "uv pip install --editable .",
        ],
        guarded: false,
    },
    Builtin {
        name: "clean",
        description: "Remove generated files and caches",
        steps: &[
            "find . -type d -name __pycache__ -prune -exec rm -rf {} +",
            "rm -rf .pytest_cache .ruff_cache .mypy_cache build dist *.egg-info",
        ],
        guarded: false,
    },
    Builtin {
        name: "test",
        description: "Run the test suite",
        steps: &["pytest"],
        guarded: false,
    },
    Builtin {
        name: "format",
        description: "Format code and apply auto-fixable lint",
        steps: &["ruff format .", "ruff check --fix ."],
        guarded: false,
    },
    Builtin {
        name: "run",
        description: "Start the full stack (UI, API, database)",
        steps: &["docker compose up -d --build"],
        guarded: true,
    },
    Builtin {
        name: "stop",
        description: "Stop the running stack",
        steps: &["docker compose down"],
        guarded: false,
    },
];

fn config_error(loaded: &LoadedConfig, message: String) -> RunnerError {
    RunnerError::Config {
        path: loaded
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)),
        message,
    }
}

/// Build the registry from the built-ins with any config overrides applied.
///
/// `env` is consulted by the `run` guard at invocation time, not here.
///
/// # Errors
///
/// Returns [`RunnerError::Config`] if the config overrides an unknown
/// command, gives a command no steps, or sets an empty credential name.
pub fn build_registry(
    loaded: &LoadedConfig,
    env: Rc<dyn EnvSource>,
) -> Result<Registry, RunnerError> {
    let config = &loaded.config;

    let mut unknown: Vec<&str> = config
        .commands
        .keys()
        .map(String::as_str)
        .filter(|name| !BUILTINS.iter().any(|b| b.name == *name))
        .collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        return Err(config_error(
            loaded,
            format!("unknown command(s): {}", unknown.join(", ")),
        ));
    }

    let credential_var = config
        .credential_var
        .as_deref()
        .unwrap_or(DEFAULT_CREDENTIAL_VAR);
    if credential_var.trim().is_empty() {
        return Err(config_error(
            loaded,
            "credential_var must not be empty".to_string(),
        ));
    }

    let project_dir = loaded.project_dir();
    let mut registry = Registry::new();

    for builtin in BUILTINS {
        let overrides = config.commands.get(builtin.name);

        let steps: Vec<String> = overrides
            .and_then(CommandOverride::steps)
            .unwrap_or_else(|| builtin.steps.iter().map(|s| (*s).to_string()).collect());
        if steps.is_empty() || steps.iter().any(|s| s.trim().is_empty()) {
            return Err(config_error(
                loaded,
                format!(
                    "command '{}' needs at least one non-empty step",
                    builtin.name
                ),
            ));
        }

        let description = overrides
            .and_then(CommandOverride::description)
            .unwrap_or(builtin.description);

        let processes: Vec<Box<dyn ExternalProcess>> = steps
            .into_iter()
            .map(|s| {
                Box::new(ShellStep::new(s).in_dir(project_dir.clone())) as Box<dyn ExternalProcess>
            })
            .collect();
        let delegate: Box<dyn Action> = Box::new(DelegateAction::new(processes));

        let action: Box<dyn Action> = if builtin.guarded {
            Box::new(GuardedAction::new(
                EnvGuard::new(credential_var, Rc::clone(&env)),
                delegate,
            ))
        } else {
            delegate
        };

        registry.register(builtin.name, description, action)?;
    }

    Ok(registry)
}
