//! Sync controller
//!
//! Drives a run end to end: discover -> build graph -> validate ->
//! process packages -> process apps -> report.
//!
//! Validation is terminal: any cycle aborts before a single module is
//! touched, reporting every cycle found. Per-module processing is
//! independent once the graph is known acyclic, so it runs on a bounded
//! worker pool; one module's failure is recorded and never stops the
//! others.

use std::collections::HashMap;
use std::path::PathBuf;

use rayon::prelude::*;

use crate::config::Config;
use crate::error::{SyncError, SyncResult};
use crate::fs::{FileSystem, LocalFileSystem};
use crate::graph::{ClosureCache, DependencyGraph, ModuleId};
use crate::models::SortedDependencySet;
use crate::registry::{self, Discovery};
use crate::report::{ModuleOutcome, ModuleReport, RunReport};
use crate::sorter::DependencySorter;
use crate::sync::app::AppSynchronizer;
use crate::sync::plan::ModulePlan;
use crate::sync::profile::ProfileSynchronizer;
use crate::sync::{Mode, Selection};

/// Per-module work is file-IO bound; a small fixed pool saturates it.
const WORKERS: usize = 8;

/// Options for a sync run
#[derive(Debug, Clone)]
pub struct SyncEngineOptions {
    pub mode: Mode,
    /// Restrict processing to one named module
    pub module: Option<String>,
    /// Include transitive workspace dependencies in descriptors
    pub hoist: bool,
    pub selection: Selection,
    pub verbose: bool,
}

impl Default for SyncEngineOptions {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            module: None,
            hoist: true,
            selection: Selection::default(),
            verbose: false,
        }
    }
}

/// Orchestrates one synchronization run
pub struct SyncEngine<FS: FileSystem = LocalFileSystem> {
    root: PathBuf,
    config: Config,
    options: SyncEngineOptions,
    fs: FS,
}

impl SyncEngine<LocalFileSystem> {
    pub fn new(root: PathBuf, config: Config, options: SyncEngineOptions) -> Self {
        Self::new_with_fs(root, config, options, LocalFileSystem)
    }
}

impl<FS: FileSystem> SyncEngine<FS> {
    pub fn new_with_fs(root: PathBuf, config: Config, options: SyncEngineOptions, fs: FS) -> Self {
        Self {
            root,
            config,
            options,
            fs,
        }
    }

    /// Discover the workspace and run
    pub fn run(&self) -> SyncResult<RunReport> {
        let discovery = registry::discover(&self.root, &self.config)?;
        self.process(discovery)
    }

    /// Run against an already-discovered module set
    pub fn process(&self, discovery: Discovery) -> SyncResult<RunReport> {
        let Discovery { modules, failures } = discovery;

        let graph = DependencyGraph::build(modules);

        if let Some(name) = &self.options.module {
            if graph.lookup(name).is_none() {
                return Err(SyncError::UnknownModule { name: name.clone() });
            }
        }

        // Validate before anything else: ordering is meaningless in a
        // cyclic graph.
        let cycles = graph.detect_cycles();
        if !cycles.is_empty() {
            return Err(SyncError::CycleDetected { cycles });
        }

        let order = graph.topological_order()?;
        let sorter = DependencySorter::new(&graph, &order);
        let mut cache = ClosureCache::new();

        // Sorted sets are precomputed single-threaded; the parallel phase
        // below only reads them. Applications always use direct
        // dependencies, regardless of the hoist toggle.
        let sorted_sets: HashMap<ModuleId, SortedDependencySet> = (0..graph.len())
            .map(|id| {
                let hoist = self.options.hoist && !graph.module(id).is_app;
                (id, sorter.sorted_set(id, hoist, &mut cache))
            })
            .collect();

        let targets: Vec<ModuleId> = (0..graph.len())
            .filter(|&id| {
                let module = graph.module(id);
                match self.options.selection {
                    Selection::All => true,
                    Selection::PackagesOnly => !module.is_app,
                    Selection::AppsOnly => module.is_app,
                }
            })
            .filter(|&id| match &self.options.module {
                Some(name) => graph.module(id).name == *name,
                None => true,
            })
            .collect();

        let profiles = ProfileSynchronizer::new(&self.root, &self.config, &self.fs, graph.modules());
        let apps = AppSynchronizer::new(&self.root, &self.config, &self.fs, graph.modules());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(WORKERS)
            .build()
            .map_err(|e| SyncError::Io(std::io::Error::other(e.to_string())))?;

        let mut entries: Vec<ModuleReport> = pool.install(|| {
            targets
                .par_iter()
                .map(|&id| {
                    let module = graph.module(id);
                    let plan = if module.is_app {
                        apps.plan_app(module, &sorted_sets[&id])
                    } else {
                        profiles.plan_module(module, &sorted_sets[&id])
                    };
                    match plan {
                        Ok(plan) => self.settle(plan),
                        Err(err) => ModuleReport::failed(&module.name, err),
                    }
                })
                .collect()
        });

        let mut report = RunReport::default();
        for entry in entries.drain(..) {
            report.push(entry);
        }
        for (dir, err) in failures {
            report.push(ModuleReport::failed(dir.display().to_string(), err));
        }
        report.finish();
        Ok(report)
    }

    /// Turn a computed plan into a report entry, writing in apply mode
    fn settle(&self, plan: ModulePlan) -> ModuleReport {
        if !plan.has_drift() {
            return ModuleReport {
                module: plan.module.clone(),
                outcome: ModuleOutcome::Unchanged,
                plan: Some(plan),
                error: None,
            };
        }

        if self.options.mode.writes() {
            for idx in 0..plan.files.len() {
                if !plan.files[idx].drift {
                    continue;
                }
                let file = &plan.files[idx];
                let full = self.root.join(&file.path);
                if let Err(err) = self.fs.write_atomic(&full, &file.desired_text) {
                    let error = format!("writing {}: {err}", file.path.display());
                    return ModuleReport {
                        module: plan.module.clone(),
                        outcome: ModuleOutcome::Failed,
                        error: Some(error),
                        plan: Some(plan),
                    };
                }
            }
            return ModuleReport {
                module: plan.module.clone(),
                outcome: ModuleOutcome::Changed,
                plan: Some(plan),
                error: None,
            };
        }

        ModuleReport {
            module: plan.module.clone(),
            outcome: ModuleOutcome::WouldChange,
            plan: Some(plan),
            error: None,
        }
    }
}
