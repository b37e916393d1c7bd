//! Isolated workspace fixture for CLI tests.
//!
//! `TestWorkspace` builds a throwaway monorepo in a temp directory and
//! runs the refsync binary against it.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use super::fixtures;

/// Result of running a refsync CLI command
#[derive(Debug)]
pub struct RunResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// A throwaway monorepo rooted in a temp directory
pub struct TestWorkspace {
    root: TempDir,
}

impl TestWorkspace {
    /// An empty workspace with an `@acme`-scoped root manifest
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(
            root.path().join("package.json"),
            "{ \"name\": \"@acme/workspace\", \"private\": true }\n",
        )
        .unwrap();
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write a file, creating parent directories as needed
    pub fn write(&self, rel: &str, content: &str) {
        let full = self.root.path().join(rel);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.root.path().join(rel)).unwrap()
    }

    /// A workspace package with all three profile descriptors, empty
    pub fn package(&self, dir: &str, name: &str, deps: &[&str]) {
        self.write(&format!("{dir}/package.json"), &fixtures::manifest(name, deps));
        self.write(&format!("{dir}/tsconfig.build.json"), fixtures::EMPTY_DESCRIPTOR);
        self.write(&format!("{dir}/tsconfig.src.json"), fixtures::EMPTY_DESCRIPTOR);
        self.write(&format!("{dir}/tsconfig.test.json"), fixtures::TEST_DESCRIPTOR);
    }

    /// An application package with an empty `tsconfig.json`
    pub fn app(&self, dir: &str, name: &str, deps: &[&str]) {
        self.write(&format!("{dir}/package.json"), &fixtures::manifest(name, deps));
        self.write(&format!("{dir}/tsconfig.json"), fixtures::EMPTY_APP_DESCRIPTOR);
    }

    /// Run the refsync binary from the workspace root
    pub fn run(&self, args: &[&str]) -> RunResult {
        let bin = env!("CARGO_BIN_EXE_refsync");
        let output = Command::new(bin)
            .current_dir(self.root.path())
            .args(args)
            .output()
            .unwrap();

        RunResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}
