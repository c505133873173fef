//! Project configuration (`devrun.json`) discovery and loading.

use crate::error::RunnerError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File looked for in the project directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = "devrun.json";

/// Contents of `devrun.json`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Variable the `run` command requires before starting the stack.
    pub credential_var: Option<String>,
    /// Per-command overrides, keyed by built-in command name.
    pub commands: HashMap<String, CommandOverride>,
}

/// How a command's steps or description are replaced.
#[derive(Debug, Clone, Deserialize)]
#[serde(
    untagged,
    expecting = "a command line, a list of command lines, or an object with `steps` and/or `description`"
)]
pub enum CommandOverride {
    /// `"test": "pytest -x"`
    Line(String),
    /// `"install": ["uv sync", "uv pip install -e ."]`
    Lines(Vec<String>),
    /// `"run": { "steps": [...], "description": "..." }`
    Detailed(DetailedOverride),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetailedOverride {
    pub steps: Option<Vec<String>>,
    pub description: Option<String>,
}

impl CommandOverride {
    /// Replacement steps, if this override sets any.
    #[must_use]
    pub fn steps(&self) -> Option<Vec<String>> {
        match self {
            CommandOverride::Line(line) => Some(vec![line.clone()]),
            CommandOverride::Lines(lines) => Some(lines.clone()),
            CommandOverride::Detailed(d) => d.steps.clone(),
        }
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            CommandOverride::Detailed(d) => d.description.as_deref(),
            _ => None,
        }
    }
}

/// A parsed config together with where it came from.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: ProjectConfig,
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Directory delegates run in: the config file's directory, if any.
    #[must_use]
    pub fn project_dir(&self) -> Option<PathBuf> {
        self.path
            .as_ref()
            .and_then(|p| p.parent())
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }
}

/// Get the user's home directory in a cross-platform way.
pub fn get_home_dir() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("HOME") {
        return Some(PathBuf::from(home));
    }

    if let Some(userprofile) = std::env::var_os("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }

    if let (Some(homedrive), Some(homepath)) =
        (std::env::var_os("HOMEDRIVE"), std::env::var_os("HOMEPATH"))
    {
        let mut path = PathBuf::from(homedrive);
        path.push(homepath);
        return Some(path);
    }

    None
}

/// Search `start` and its ancestors for `devrun.json`, stopping after the
/// home directory or the filesystem root.
#[must_use]
pub fn find_in_ancestors(start: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if home.is_some_and(|h| h == dir) {
            break;
        }
        current = dir.parent();
    }
    None
}

/// Resolve the config file to use.
///
/// An explicit path may name the file itself or a directory containing it,
/// and must exist. Without one, the current directory and its ancestors are
/// searched; finding nothing is not an error.
///
/// # Errors
///
/// Returns [`RunnerError::Config`] if an explicit path has no config file.
pub fn find_config_path(custom: Option<&Path>) -> Result<Option<PathBuf>, RunnerError> {
    if let Some(custom) = custom {
        let candidate = if custom.is_dir() {
            custom.join(CONFIG_FILE_NAME)
        } else {
            custom.to_path_buf()
        };
        if candidate.is_file() {
            let candidate = std::path::absolute(&candidate).unwrap_or(candidate);
            return Ok(Some(candidate));
        }
        return Err(RunnerError::Config {
            path: candidate,
            message: "config file not found".to_string(),
        });
    }

    let Ok(cwd) = std::env::current_dir() else {
        return Ok(None);
    };
    Ok(find_in_ancestors(&cwd, get_home_dir().as_deref()))
}

/// Parse `devrun.json` contents. `path` is only used in error messages.
///
/// # Errors
///
/// Returns [`RunnerError::Config`] on malformed JSON or unknown fields.
pub fn parse_config(content: &str, path: &Path) -> Result<ProjectConfig, RunnerError> {
    serde_json::from_str(content).map_err(|e| RunnerError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Find, read and parse the project config.
///
/// # Errors
///
/// Returns [`RunnerError::Config`] if an explicit path is missing, or the
/// file cannot be read or parsed.
pub fn load_config(custom: Option<&Path>) -> Result<LoadedConfig, RunnerError> {
    let Some(path) = find_config_path(custom)? else {
        return Ok(LoadedConfig::default());
    };

    let content = fs::read_to_string(&path).map_err(|e| RunnerError::Config {
        path: path.clone(),
        message: e.to_string(),
    })?;
    let config = parse_config(&content, &path)?;

    Ok(LoadedConfig {
        config,
        path: Some(path),
    })
}

/// Load config or exit with an error message.
pub fn load_config_or_exit(custom: Option<&Path>) -> LoadedConfig {
    load_config(custom).unwrap_or_else(|e| crate::fatal_error(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<ProjectConfig, RunnerError> {
        parse_config(json, Path::new("devrun.json"))
    }

    #[test]
    fn test_parse_empty_object_uses_defaults() {
        let config = parse("{}").unwrap();
        assert!(config.credential_var.is_none());
        assert!(config.commands.is_empty());
    }

    #[test]
    fn test_parse_all_override_shapes() {
        let config = parse(
            r#"{
                "credential_var": "ANTHROPIC_API_KEY",
                "commands": {
                    "test": "pytest -x",
                    "install": ["uv sync", "uv pip install -e ."],
                    "run": { "steps": ["docker compose up -d"], "description": "Start it" },
                    "stop": { "description": "Tear it down" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.credential_var.as_deref(), Some("ANTHROPIC_API_KEY"));
        assert_eq!(
            config.commands["test"].steps(),
            Some(vec!["pytest -x".to_string()])
        );
        assert_eq!(
            config.commands["install"].steps(),
            Some(vec!["uv sync".to_string(), "uv pip install -e .".to_string()])
        );
        assert_eq!(config.commands["run"].description(), Some("Start it"));
        assert_eq!(config.commands["stop"].steps(), None);
        assert_eq!(config.commands["stop"].description(), Some("Tear it down"));
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        let err = parse(r#"{ "credential": "X" }"#).unwrap_err();
        assert!(matches!(err, RunnerError::Config { .. }));
        assert!(err.to_string().starts_with("Error in devrun.json:"));
    }

    #[test]
    fn test_parse_bad_override_names_accepted_shapes() {
        let err = parse(r#"{ "commands": { "test": 5 } }"#).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("a command line, a list of command lines"), "{msg}");
        assert!(!msg.contains("untagged enum"), "{msg}");
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(parse("{ not json").is_err());
    }

    #[test]
    fn test_find_in_ancestors_walks_upwards() {
        let root = tempfile::TempDir::new().unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.path().join(CONFIG_FILE_NAME), "{}").unwrap();

        let found = find_in_ancestors(&nested, None).unwrap();
        assert_eq!(found, root.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_find_in_ancestors_stops_at_home() {
        let root = tempfile::TempDir::new().unwrap();
        let home = root.path().join("home");
        let project = home.join("project");
        fs::create_dir_all(&project).unwrap();
        // Above the home boundary, so never found.
        fs::write(root.path().join(CONFIG_FILE_NAME), "{}").unwrap();

        assert!(find_in_ancestors(&project, Some(&home)).is_none());
    }

    #[test]
    fn test_explicit_directory_path() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "credential_var": "KEY" }"#,
        )
        .unwrap();

        let loaded = load_config(Some(dir.path())).unwrap();
        assert_eq!(loaded.config.credential_var.as_deref(), Some("KEY"));
        assert_eq!(loaded.project_dir().as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_bare_file_name_has_no_empty_project_dir() {
        let loaded = LoadedConfig {
            config: ProjectConfig::default(),
            path: Some(PathBuf::from(CONFIG_FILE_NAME)),
        };
        assert_eq!(loaded.project_dir(), None);
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_config(Some(dir.path().join("nope.json").as_path())).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
