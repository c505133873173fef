//! Command registry: named actions with one-line descriptions.

use crate::delegate::{self, ExternalProcess};
use crate::error::RunnerError;
use crate::guard::EnvGuard;
use std::collections::HashMap;
use std::fmt::Write as _;

/// The procedure bound to a command name.
pub trait Action {
    /// # Errors
    ///
    /// Returns `Err` if the action's precondition or any delegate fails.
    fn invoke(&self) -> Result<(), RunnerError>;
}

/// Runs a fixed sequence of external processes.
pub struct DelegateAction {
    steps: Vec<Box<dyn ExternalProcess>>,
}

impl DelegateAction {
    pub fn new(steps: Vec<Box<dyn ExternalProcess>>) -> Self {
        Self { steps }
    }
}

impl Action for DelegateAction {
    fn invoke(&self) -> Result<(), RunnerError> {
        delegate::run_steps(&self.steps)
    }
}

/// Checks a guard, then runs the inner action. The inner action is never
/// touched when the guard fails.
pub struct GuardedAction {
    guard: EnvGuard,
    inner: Box<dyn Action>,
}

impl GuardedAction {
    pub fn new(guard: EnvGuard, inner: Box<dyn Action>) -> Self {
        Self { guard, inner }
    }
}

impl Action for GuardedAction {
    fn invoke(&self) -> Result<(), RunnerError> {
        self.guard.check()?;
        self.inner.invoke()
    }
}

pub struct CommandEntry {
    pub name: String,
    pub description: String,
    pub action: Box<dyn Action>,
}

/// Name to command mapping, built once at startup and read-only afterwards.
#[derive(Default)]
pub struct Registry {
    entries: HashMap<String, CommandEntry>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::DuplicateCommand`] if the name is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        action: Box<dyn Action>,
    ) -> Result<(), RunnerError> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(RunnerError::DuplicateCommand(name));
        }
        self.entries.insert(
            name.clone(),
            CommandEntry {
                name,
                description: description.into(),
                action,
            },
        );
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.get(name)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// All entries sorted by name.
    #[must_use]
    pub fn sorted(&self) -> Vec<&CommandEntry> {
        let mut entries: Vec<&CommandEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// The help listing: a header, then one `name  description` line per
    /// command in name order, with `help` itself included.
    #[must_use]
    pub fn help_text(&self) -> String {
        let mut rows: Vec<(&str, &str)> = self
            .sorted()
            .into_iter()
            .map(|e| (e.name.as_str(), e.description.as_str()))
            .collect();
        if self.get("help").is_none() {
            rows.push(("help", "Show this list of commands"));
            rows.sort_by(|a, b| a.0.cmp(b.0));
        }

        let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        let mut text = String::from("Available commands:\n");
        for (name, description) in rows {
            let _ = writeln!(text, "  {name:<width$}  {description}");
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::EnvSource;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counting(Rc<Cell<usize>>);

    impl Action for Counting {
        fn invoke(&self) -> Result<(), RunnerError> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    struct NoEnv;

    impl EnvSource for NoEnv {
        fn var(&self, _name: &str) -> Option<String> {
            None
        }
    }

    fn noop() -> Box<dyn Action> {
        Box::new(Counting(Rc::new(Cell::new(0))))
    }

    #[test]
    fn test_register_rejects_duplicate_names() {
        let mut registry = Registry::new();
        registry.register("test", "Run tests", noop()).unwrap();

        let err = registry
            .register("test", "Run tests again", noop())
            .unwrap_err();
        assert!(matches!(err, RunnerError::DuplicateCommand(ref n) if n == "test"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("test").unwrap().description, "Run tests");
    }

    #[test]
    fn test_help_is_sorted_regardless_of_registration_order() {
        let mut registry = Registry::new();
        registry.register("stop", "Stop the stack", noop()).unwrap();
        registry.register("clean", "Remove caches", noop()).unwrap();
        registry
            .register("install", "Install dependencies", noop())
            .unwrap();

        let help = registry.help_text();
        let clean = help.find("clean").unwrap();
        let help_pos = help.find("  help").unwrap();
        let install = help.find("install").unwrap();
        let stop = help.find("stop").unwrap();
        assert!(clean < help_pos && help_pos < install && install < stop);
    }

    #[test]
    fn test_help_aligns_descriptions() {
        let mut registry = Registry::new();
        registry.register("run", "Start", noop()).unwrap();
        registry.register("install", "Install", noop()).unwrap();

        let help = registry.help_text();
        assert!(help.starts_with("Available commands:\n"));
        assert!(help.contains("  run      Start\n"));
        assert!(help.contains("  install  Install\n"));
    }

    #[test]
    fn test_guarded_action_skips_inner_when_guard_fails() {
        let count = Rc::new(Cell::new(0));
        let action = GuardedAction::new(
            EnvGuard::new("OPENAI_API_KEY", Rc::new(NoEnv)),
            Box::new(Counting(Rc::clone(&count))),
        );

        assert!(matches!(
            action.invoke(),
            Err(RunnerError::MissingVariable { .. })
        ));
        assert_eq!(count.get(), 0);
    }
}
