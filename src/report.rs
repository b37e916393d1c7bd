//! Run report: per-module outcomes aggregated into a process result
//!
//! Every processed module gets exactly one entry; a fatal cycle error is
//! raised before any entry exists. Entries are kept sorted by module name
//! so report output is deterministic.

use crate::sync::{Mode, ModulePlan};

/// Outcome of processing one module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleOutcome {
    /// Descriptors already match the computed state
    Unchanged,
    /// Drift detected in a read-only mode
    WouldChange,
    /// Drift detected and written (apply mode)
    Changed,
    /// Isolated module-level failure (missing descriptor, bad manifest)
    Failed,
}

impl ModuleOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleOutcome::Unchanged => "unchanged",
            ModuleOutcome::WouldChange => "would-change",
            ModuleOutcome::Changed => "changed",
            ModuleOutcome::Failed => "failed",
        }
    }
}

/// One module's report entry
#[derive(Debug, Clone)]
pub struct ModuleReport {
    pub module: String,
    pub outcome: ModuleOutcome,
    /// Field-level plans; present unless the module failed before planning
    pub plan: Option<ModulePlan>,
    pub error: Option<String>,
}

impl ModuleReport {
    pub fn failed(module: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            module: module.into(),
            outcome: ModuleOutcome::Failed,
            plan: None,
            error: Some(error.to_string()),
        }
    }
}

/// Aggregated result of a whole run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub entries: Vec<ModuleReport>,
}

impl RunReport {
    pub fn push(&mut self, entry: ModuleReport) {
        self.entries.push(entry);
    }

    /// Sort entries by module name for stable output
    pub fn finish(&mut self) {
        self.entries.sort_by(|a, b| a.module.cmp(&b.module));
    }

    pub fn count(&self, outcome: ModuleOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    pub fn has_failures(&self) -> bool {
        self.count(ModuleOutcome::Failed) > 0
    }

    pub fn has_drift(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.outcome, ModuleOutcome::WouldChange | ModuleOutcome::Changed))
    }

    /// Whether the process should exit zero for `mode`
    pub fn success(&self, mode: Mode) -> bool {
        if self.has_failures() {
            return false;
        }
        match mode {
            Mode::Check => !self.has_drift(),
            Mode::DryRun | Mode::Apply => true,
        }
    }
}
