//! Core data models for refsync
//!
//! Defines the fundamental data structures used throughout refsync:
//! - `Module`: a workspace package parsed from its manifest
//! - `ModuleDependencies`: declared dependencies split by origin and kind
//! - Supporting enums: `DependencyKind`, `Profile`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Relationship kind of a declared dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// `dependencies`
    Runtime,
    /// `devDependencies`
    Dev,
    /// `peerDependencies`
    Peer,
}

/// Dependency names of one origin (workspace or external), split by kind.
///
/// Every list is kept sorted and de-duplicated so that no consumer ever
/// depends on manifest declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    pub runtime: Vec<String>,
    pub dev: Vec<String>,
    pub peer: Vec<String>,
}

impl DependencySet {
    /// All names across the three kinds, sorted and de-duplicated
    pub fn names(&self) -> Vec<String> {
        let mut all: Vec<String> = self
            .runtime
            .iter()
            .chain(self.dev.iter())
            .chain(self.peer.iter())
            .cloned()
            .collect();
        all.sort();
        all.dedup();
        all
    }

    pub fn is_empty(&self) -> bool {
        self.runtime.is_empty() && self.dev.is_empty() && self.peer.is_empty()
    }

    /// Push a name into the list for `kind`, keeping it sorted
    pub fn insert(&mut self, kind: DependencyKind, name: impl Into<String>) {
        let list = match kind {
            DependencyKind::Runtime => &mut self.runtime,
            DependencyKind::Dev => &mut self.dev,
            DependencyKind::Peer => &mut self.peer,
        };
        let name = name.into();
        if let Err(pos) = list.binary_search(&name) {
            list.insert(pos, name);
        }
    }
}

/// A module's declared dependencies, partitioned by origin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDependencies {
    /// Dependencies on other packages in this repository
    pub workspace: DependencySet,
    /// Third-party dependencies
    pub external: DependencySet,
}

/// A workspace package discovered from its `package.json`.
///
/// Immutable for the duration of a run; the registry builds every module
/// exactly once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Unique package name (e.g. `@acme/core`)
    pub name: String,

    /// Directory path relative to the workspace root, forward-slash form
    pub dir: PathBuf,

    /// Declared dependencies, partitioned
    pub deps: ModuleDependencies,

    /// True for application packages (under the configured `apps` dirs)
    pub is_app: bool,

    /// True if the package has a `test/` or `tests/` directory
    pub has_tests: bool,
}

impl Module {
    /// Root-relative directory as a forward-slash string
    pub fn dir_str(&self) -> String {
        crate::paths::to_posix(&self.dir)
    }
}

/// Descriptor profile owned by a workspace package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Compiled builds: references point at dependency build descriptors
    Build,
    /// Source-only compilation: references point at dependency roots
    Source,
    /// Tests: source-style references plus the package's own source
    /// descriptor and the shared test-utilities package
    Test,
}

impl Profile {
    /// All profiles, in the order they are processed and reported
    pub fn all() -> [Profile; 3] {
        [Profile::Build, Profile::Source, Profile::Test]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Build => "build",
            Profile::Source => "source",
            Profile::Test => "test",
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical dependency ordering used to populate any descriptor:
/// workspace packages first (topological, alphabetical tie-break),
/// external packages second (lexicographic).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedDependencySet {
    /// Workspace dependency names in global topological order
    pub workspace: Vec<String>,
    /// External dependency names in lexicographic order
    pub external: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_set_names_sorted_and_deduped() {
        let mut set = DependencySet::default();
        set.insert(DependencyKind::Runtime, "@acme/b");
        set.insert(DependencyKind::Dev, "@acme/a");
        set.insert(DependencyKind::Peer, "@acme/b");

        assert_eq!(set.names(), vec!["@acme/a", "@acme/b"]);
    }

    #[test]
    fn test_dependency_set_insert_keeps_kind_lists_sorted() {
        let mut set = DependencySet::default();
        set.insert(DependencyKind::Runtime, "zeta");
        set.insert(DependencyKind::Runtime, "alpha");
        set.insert(DependencyKind::Runtime, "alpha");

        assert_eq!(set.runtime, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_profile_display() {
        assert_eq!(Profile::Build.to_string(), "build");
        assert_eq!(Profile::Source.to_string(), "source");
        assert_eq!(Profile::Test.to_string(), "test");
    }
}
