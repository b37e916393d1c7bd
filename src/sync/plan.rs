//! Plan types - the shared diff computation behind check, diff and apply
//!
//! A `FilePlan` captures one descriptor's current and desired state; drift
//! is decided on the parsed reference lists (and alias map for
//! applications), not on raw text, so formatting alone never counts as
//! drift.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Planned state of a single descriptor file
#[derive(Debug, Clone)]
pub struct FilePlan {
    /// Descriptor path relative to the workspace root
    pub path: PathBuf,

    /// Which artifact this is: `build`, `source`, `test` or `app`
    pub label: String,

    /// Reference list currently on disk, document order
    pub current_refs: Vec<String>,

    /// Merged expected reference list (computed ++ sorted extras)
    pub desired_refs: Vec<String>,

    /// Extra entries preserved from disk (not derivable from manifests)
    pub extras: Vec<String>,

    /// Alias map currently on disk (application artifacts only; empty for
    /// profile descriptors)
    pub current_aliases: BTreeMap<String, Vec<String>>,

    /// Desired alias map (application artifacts only)
    pub desired_aliases: BTreeMap<String, Vec<String>>,

    /// Raw file content as read
    pub current_text: String,

    /// File content after splicing in the desired state
    pub desired_text: String,

    /// True when the current state differs from the desired state
    pub drift: bool,
}

impl FilePlan {
    /// Reference entries that apply would add
    pub fn added(&self) -> Vec<&str> {
        self.desired_refs
            .iter()
            .filter(|r| !self.current_refs.contains(r))
            .map(String::as_str)
            .collect()
    }

    /// Reference entries that apply would drop (stale computed entries;
    /// extras are never dropped)
    pub fn removed(&self) -> Vec<&str> {
        self.current_refs
            .iter()
            .filter(|r| !self.desired_refs.contains(r))
            .map(String::as_str)
            .collect()
    }
}

/// All file plans for one module
#[derive(Debug, Clone)]
pub struct ModulePlan {
    pub module: String,
    pub files: Vec<FilePlan>,
}

impl ModulePlan {
    pub fn has_drift(&self) -> bool {
        self.files.iter().any(|f| f.drift)
    }

    pub fn drifted_files(&self) -> impl Iterator<Item = &FilePlan> {
        self.files.iter().filter(|f| f.drift)
    }
}
