//! Application synchronizer
//!
//! Application packages carry no profile descriptors; instead one
//! `tsconfig.json` holds both an import-alias map (`compilerOptions.paths`)
//! and a reference list. Both are derived from the app's direct workspace
//! dependencies - applications only need direct compilation visibility,
//! never the hoisted closure.
//!
//! Tooling-only packages on the configured exclusion list are filtered out
//! before alias/reference generation. Alias keys outside the workspace
//! scope (e.g. a catch-all `"*"`) are not derivable and are preserved
//! verbatim.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::config::Config;
use crate::descriptor;
use crate::error::{SyncError, SyncResult};
use crate::fs::FileSystem;
use crate::models::{Module, SortedDependencySet};
use crate::paths;
use crate::sync::plan::{FilePlan, ModulePlan};
use crate::sync::profile::merge;

/// Plans `tsconfig.json` updates for application packages
pub struct AppSynchronizer<'a, FS: FileSystem> {
    root: &'a Path,
    config: &'a Config,
    fs: &'a FS,
    dirs: HashMap<String, String>,
}

impl<'a, FS: FileSystem> AppSynchronizer<'a, FS> {
    pub fn new(root: &'a Path, config: &'a Config, fs: &'a FS, modules: &[Module]) -> Self {
        let dirs = modules
            .iter()
            .map(|m| (m.name.clone(), m.dir_str()))
            .collect();
        Self {
            root,
            config,
            fs,
            dirs,
        }
    }

    /// Plan the application's configuration artifact.
    ///
    /// `sorted` must be the app's direct (non-hoisted) dependency set.
    pub fn plan_app(&self, module: &Module, sorted: &SortedDependencySet) -> SyncResult<ModulePlan> {
        let filename = &self.config.descriptors.app;
        let rel_path = module.dir.join(filename);
        let full = self.root.join(&rel_path);

        if !self.fs.exists(&full) {
            return Err(SyncError::MissingDescriptor {
                module: module.name.clone(),
                looked_for: filename.clone(),
            });
        }

        let current_text = self.fs.read_to_string(&full)?;
        let current_refs = descriptor::read_references(&current_text, &rel_path)?;
        let current_aliases = descriptor::read_alias_map(&current_text, &rel_path)?;

        let from = module.dir_str();
        let deps: Vec<&String> = sorted
            .workspace
            .iter()
            .filter(|dep| !self.config.exclude.contains(dep))
            .filter(|dep| self.dirs.contains_key(*dep))
            .collect();

        // Alias map: self entry first, then one bare + one wildcard pair
        // per dependency.
        let mut alias_entries: Vec<(String, Vec<String>)> = Vec::new();
        alias_entries.push((format!("{}/*", module.name), vec!["./src/*".to_string()]));
        for dep in &deps {
            let rel = paths::root_relative(&from, &self.dirs[*dep]);
            alias_entries.push(((*dep).clone(), vec![format!("{rel}/src")]));
            alias_entries.push((format!("{dep}/*"), vec![format!("{rel}/src/*")]));
        }

        // Preserve non-derivable keys: anything outside the workspace
        // scope that the computed map does not produce.
        let prefix = self.config.workspace_prefix();
        let mut preserved: Vec<(String, Vec<String>)> = current_aliases
            .iter()
            .filter(|(key, _)| !key.starts_with(&prefix))
            .filter(|(key, _)| !alias_entries.iter().any(|(k, _)| k == *key))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        preserved.sort();
        alias_entries.extend(preserved);

        let desired_aliases: BTreeMap<String, Vec<String>> =
            alias_entries.iter().cloned().collect();

        let computed_refs: Vec<String> = deps
            .iter()
            .map(|dep| {
                format!(
                    "{}/{}",
                    paths::root_relative(&from, &self.dirs[*dep]),
                    self.config.descriptors.build
                )
            })
            .collect();
        let (desired_refs, extras) = merge(&from, &computed_refs, &current_refs);

        let drift = current_refs != desired_refs || current_aliases != desired_aliases;
        let desired_text = if drift {
            let with_aliases = descriptor::update_alias_map(&current_text, &rel_path, &alias_entries)?;
            descriptor::update_references(&with_aliases, &rel_path, &desired_refs)?
        } else {
            current_text.clone()
        };

        Ok(ModulePlan {
            module: module.name.clone(),
            files: vec![FilePlan {
                path: rel_path,
                label: "app".to_string(),
                current_refs,
                desired_refs,
                extras,
                current_aliases,
                desired_aliases,
                current_text,
                desired_text,
                drift,
            }],
        })
    }
}
