//! Error types for refsync
//!
//! Uses `thiserror` for library errors; `anyhow` is only used at the
//! binary boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for refsync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Main error type for refsync operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// The workspace dependency graph contains at least one cycle.
    ///
    /// Fatal for the whole run: no ordering exists, so no module is
    /// processed. Carries every cycle found so all of them can be fixed
    /// in one pass.
    #[error("dependency cycle detected: {}", format_cycles(.cycles))]
    CycleDetected { cycles: Vec<Vec<String>> },

    /// A package has none of its expected profile descriptor files
    #[error("package '{module}' has no descriptor file (looked for {looked_for})")]
    MissingDescriptor { module: String, looked_for: String },

    /// A package.json could not be parsed or violates a manifest invariant
    #[error("invalid manifest {path}: {message}")]
    ManifestError { path: PathBuf, message: String },

    /// A descriptor file exists but its JSON could not be understood
    #[error("invalid descriptor {path}: {message}")]
    DescriptorParse { path: PathBuf, message: String },

    /// A `--module` filter named a package that does not exist
    #[error("unknown package '{name}' - not found in the workspace")]
    UnknownModule { name: String },

    /// Workspace root does not exist or holds no packages
    #[error("no workspace packages found under {root}")]
    EmptyWorkspace { root: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file parsing error
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}

fn format_cycles(cycles: &[Vec<String>]) -> String {
    cycles
        .iter()
        .map(|c| {
            let mut names = c.join(" -> ");
            if let Some(first) = c.first() {
                names.push_str(" -> ");
                names.push_str(first);
            }
            names
        })
        .collect::<Vec<_>>()
        .join("; ")
}
