//! Test support utilities for gantry integration tests.
//!
//! Provides an isolated project directory with a stub deploy tool.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with an isolated project directory.
///
/// No process-global state is mutated; child processes use `.current_dir()`
/// so tests can safely run in parallel.
pub struct Test {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl Test {
    /// Create an empty project with only the stub deploy tool.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let t = Self { dir };
        t.write_stub_tool();
        t
    }

    /// Create a project ready to deploy: build.toml declaring `secrets`,
    /// app.yml and a key file.
    pub fn project(secrets: &[&str]) -> Self {
        let t = Self::new();
        t.write_build_toml(secrets);
        t.write(APP_FILE, SAMPLE_APP_YML);
        t.write(KEY_FILE, SAMPLE_KEY);
        t
    }

    /// Absolute path of a file in the project.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a file into the project.
    pub fn write(&self, name: &str, contents: &str) {
        std::fs::write(self.path(name), contents).expect("failed to write fixture");
    }

    /// Read a file from the project.
    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).expect("failed to read project file")
    }

    /// Write a build.toml with a gantry entry declaring `secrets`.
    pub fn write_build_toml(&self, secrets: &[&str]) {
        let list = secrets
            .iter()
            .map(|s| format!("\"{}\"", s))
            .collect::<Vec<_>>()
            .join(", ");
        self.write(
            HOST_CONFIG,
            &format!("[[plugins]]\nname = \"gantry\"\nsecrets = [{}]\n", list),
        );
    }

    /// Deploy tool invocations recorded by the stub, one line per call.
    pub fn calls(&self) -> Vec<String> {
        match std::fs::read_to_string(self.path(CALL_LOG)) {
            Ok(log) => log.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn write_stub_tool(&self) {
        let path = self.path(STUB_TOOL);
        std::fs::write(&path, STUB_TOOL_SCRIPT).expect("failed to write stub tool");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("failed to make stub tool executable");
        }
    }
}
