//! Common test helpers shared across integration tests

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)] // Not all helpers are used by every test file

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Helper to get the compiled binary path
pub fn get_binary_path() -> PathBuf {
    let mut path = env::current_exe().unwrap();
    path.pop(); // Remove test executable name

    // Integration tests live in 'deps'
    if path.ends_with("deps") {
        path.pop();
    }

    path.push(format!("devrun{}", env::consts::EXE_SUFFIX));

    if !path.exists() {
        let build_output = Command::new("cargo")
            .args(["build", "--bin", "devrun"])
            .output()
            .expect("Failed to build binary");

        assert!(
            build_output.status.success(),
            "Failed to build devrun binary: {}",
            String::from_utf8_lossy(&build_output.stderr)
        );
    }

    path
}

/// Helper to create a temporary directory for tests
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Helper to write a devrun.json into a directory
pub fn create_config(dir: &Path, content: &str) {
    fs::write(dir.join("devrun.json"), content).unwrap();
}

/// Helper to create a Command isolated from the user's environment:
/// runs in `dir`, treats `dir` as HOME so config discovery stops there,
/// and clears the credential and shell overrides.
pub fn test_command(binary: &Path, dir: &Path) -> Command {
    let mut cmd = Command::new(binary);
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("OPENAI_API_KEY")
        .env_remove("DEVRUN_SHELL");
    cmd
}

/// Package version for testing --version flag
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
