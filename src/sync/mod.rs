//! Descriptor synchronization
//!
//! The engine runs as a fixed pipeline:
//! discover -> build graph -> validate (no cycles) -> process packages ->
//! process apps -> report. All three run modes (`check`, `diff`, `apply`)
//! share one plan computation and differ only in the terminal action.

pub mod app;
pub mod engine;
pub mod plan;
pub mod profile;

pub use engine::{SyncEngine, SyncEngineOptions};
pub use plan::{FilePlan, ModulePlan};

/// Terminal action of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Read-only; the run fails on any drift
    #[default]
    Check,
    /// Read-only; print the would-be changes
    DryRun,
    /// Write merged reference lists to disk
    Apply,
}

impl Mode {
    pub fn writes(&self) -> bool {
        matches!(self, Mode::Apply)
    }
}

/// Which module classes a run processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    /// Workspace packages only (skip application artifacts)
    PackagesOnly,
    /// Application artifacts only
    AppsOnly,
}
