//! Environment preconditions checked before an action runs.

use crate::error::RunnerError;
use std::collections::HashMap;
use std::rc::Rc;

/// Default credential the `run` command requires.
pub const DEFAULT_CREDENTIAL_VAR: &str = "OPENAI_API_KEY";

/// Read-only view of environment variables.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Requires a variable to be set to a non-empty value.
pub struct EnvGuard {
    variable: String,
    source: Rc<dyn EnvSource>,
}

impl EnvGuard {
    pub fn new(variable: impl Into<String>, source: Rc<dyn EnvSource>) -> Self {
        Self {
            variable: variable.into(),
            source,
        }
    }

    /// # Errors
    ///
    /// Returns [`RunnerError::MissingVariable`] if the variable is unset or empty.
    pub fn check(&self) -> Result<(), RunnerError> {
        match self.source.var(&self.variable) {
            Some(value) if !value.is_empty() => Ok(()),
            _ => Err(RunnerError::MissingVariable {
                variable: self.variable.clone(),
            }),
        }
    }
}
