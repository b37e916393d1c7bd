//! Profile synchronizer
//!
//! Computes the expected reference list for each of a package's descriptor
//! profiles and reconciles it against what is on disk.
//!
//! Merge policy: manifests cannot express type-only relationships, so an
//! on-disk reference the graph cannot derive is preserved, appended after
//! the computed list in alphabetical order. Only a manifest change ever
//! removes a computed entry; extras are never removed automatically.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::config::Config;
use crate::descriptor;
use crate::error::{SyncError, SyncResult};
use crate::fs::FileSystem;
use crate::models::{Module, Profile, SortedDependencySet};
use crate::paths;
use crate::sync::plan::{FilePlan, ModulePlan};

/// Plans descriptor updates for workspace packages
pub struct ProfileSynchronizer<'a, FS: FileSystem> {
    root: &'a Path,
    config: &'a Config,
    fs: &'a FS,
    /// Package name -> root-relative directory, for resolving reference
    /// targets
    dirs: HashMap<String, String>,
}

impl<'a, FS: FileSystem> ProfileSynchronizer<'a, FS> {
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

    /// Plan every profile the package is configured for.
    ///
    /// A package with none of the three descriptors on disk is a
    /// `MissingDescriptor` failure; profiles that exist individually are
    /// planned, absent ones skipped.
    pub fn plan_module(
        &self,
        module: &Module,
        sorted: &SortedDependencySet,
    ) -> SyncResult<ModulePlan> {
        let mut files = Vec::new();

        for profile in Profile::all() {
            let filename = self.config.descriptor_filename(profile);
            let full = self.root.join(&module.dir).join(filename);
            if !self.fs.exists(&full) {
                continue;
            }
            files.push(self.plan_profile(module, sorted, profile)?);
        }

        if files.is_empty() {
            return Err(SyncError::MissingDescriptor {
                module: module.name.clone(),
                looked_for: Profile::all()
                    .iter()
                    .map(|p| self.config.descriptor_filename(*p))
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        Ok(ModulePlan {
            module: module.name.clone(),
            files,
        })
    }

    fn plan_profile(
        &self,
        module: &Module,
        sorted: &SortedDependencySet,
        profile: Profile,
    ) -> SyncResult<FilePlan> {
        let filename = self.config.descriptor_filename(profile);
        let rel_path = module.dir.join(filename);
        let full = self.root.join(&rel_path);

        let current_text = self.fs.read_to_string(&full)?;
        let current_refs = descriptor::read_references(&current_text, &rel_path)?;

        let computed = self.computed_refs(module, sorted, profile);
        let (desired_refs, extras) = merge(&module.dir_str(), &computed, &current_refs);

        let drift = current_refs != desired_refs;
        let desired_text = if drift {
            descriptor::update_references(&current_text, &rel_path, &desired_refs)?
        } else {
            current_text.clone()
        };

        Ok(FilePlan {
            path: rel_path,
            label: profile.as_str().to_string(),
            current_refs,
            desired_refs,
            extras,
            current_aliases: Default::default(),
            desired_aliases: Default::default(),
            current_text,
            desired_text,
            drift,
        })
    }

    /// The reference list the dependency graph derives for one profile
    fn computed_refs(
        &self,
        module: &Module,
        sorted: &SortedDependencySet,
        profile: Profile,
    ) -> Vec<String> {
        let from = module.dir_str();
        let mut out = Vec::new();

        // A test descriptor always references the package's own source
        // descriptor first.
        if profile == Profile::Test {
            out.push(format!("./{}", self.config.descriptors.source));
        }

        for dep in &sorted.workspace {
            let Some(dep_dir) = self.dirs.get(dep) else {
                continue;
            };
            let rel = paths::root_relative(&from, dep_dir);
            out.push(match profile {
                Profile::Build => format!("{rel}/{}", self.config.descriptors.build),
                Profile::Source | Profile::Test => rel,
            });
        }

        if profile == Profile::Test && module.has_tests {
            if let Some(test_utils) = &self.config.test_utils {
                if *test_utils != module.name {
                    if let Some(tk_dir) = self.dirs.get(test_utils) {
                        let entry =
                            format!("{}/{}", paths::root_relative(&from, tk_dir), self.config.descriptors.build);
                        if !out.contains(&entry) {
                            out.push(entry);
                        }
                    }
                }
            }
        }

        out
    }
}

/// Reconcile computed entries with what is on disk.
///
/// Every on-disk entry is normalized to canonical root-relative form and
/// partitioned into matches-computed and extra. Extras that resolve inside
/// the workspace are re-rendered in canonical form; entries that escape the
/// root are preserved verbatim. Returns `(computed ++ sorted extras, extras)`.
pub fn merge(
    from_dir: &str,
    computed: &[String],
    current: &[String],
) -> (Vec<String>, Vec<String>) {
    let computed_canon: HashSet<String> = computed
        .iter()
        .filter_map(|e| paths::resolve_entry(from_dir, e))
        .collect();

    let mut extras: Vec<String> = Vec::new();
    for entry in current {
        match paths::resolve_entry(from_dir, entry) {
            Some(canon) if computed_canon.contains(&canon) => {}
            Some(canon) => extras.push(paths::root_relative(from_dir, &canon)),
            None => extras.push(entry.clone()),
        }
    }
    extras.sort();
    extras.dedup();

    let mut desired = computed.to_vec();
    desired.extend(extras.iter().cloned());
    (desired, extras)
}
