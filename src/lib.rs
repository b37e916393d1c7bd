//! refsync - project reference synchronization for monorepos
//!
//! refsync derives each module's project descriptors (build, source and
//! test configurations, plus application alias maps) from the workspace
//! dependency graph declared in package manifests, then checks, previews
//! or applies the result. Hand-maintained extra entries survive every
//! rewrite; dependency cycles abort a run before anything is written.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod fs;
pub mod graph;
pub mod jsontext;
pub mod models;
pub mod paths;
pub mod registry;
pub mod report;
pub mod sorter;
pub mod sync;
pub mod ui;

// Re-exports for convenience
pub use config::Config;
pub use error::{SyncError, SyncResult};
pub use graph::{ClosureCache, DependencyGraph, ModuleId};
pub use models::{Module, Profile, SortedDependencySet};
pub use report::{ModuleOutcome, ModuleReport, RunReport};
pub use sync::{Mode, Selection, SyncEngine, SyncEngineOptions};
