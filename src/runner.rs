//! Dispatches a command name to its registered action.

use crate::registry::Registry;
use std::io::Write;

/// Name that always shows the command listing.
pub const HELP_COMMAND: &str = "help";

pub struct Runner<'a> {
    registry: &'a Registry,
}

impl<'a> Runner<'a> {
    #[must_use]
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Run the command named by `argv[0]` and return the process exit code.
    ///
    /// No argument, `help`, or an unregistered name all print the command
    /// listing to `out` and return 0. Anything after the first element is
    /// ignored. A failing action has its diagnostic written to `err` and its
    /// exit code returned unchanged.
    pub fn run(&self, argv: &[String], out: &mut dyn Write, err: &mut dyn Write) -> i32 {
        let entry = argv
            .first()
            .filter(|name| name.as_str() != HELP_COMMAND)
            .and_then(|name| self.registry.get(name));

        let Some(entry) = entry else {
            // Output errors (e.g. a closed pipe) are not worth failing over.
            let _ = out.write_all(self.registry.help_text().as_bytes());
            let _ = out.flush();
            return 0;
        };

        match entry.action.invoke() {
            Ok(()) => 0,
            Err(e) => {
                let _ = writeln!(err, "{e}");
                e.exit_code()
            }
        }
    }
}
