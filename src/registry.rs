//! Module registry: workspace discovery and manifest parsing
//!
//! Walks the configured package and application directories for
//! `package.json` files, parses each into a typed dependency record, and
//! partitions declared dependencies into workspace vs external by the
//! scope-prefix convention.
//!
//! Unparsable manifests are isolated failures: they are recorded and the
//! rest of the workspace is still processed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::Config;
use crate::error::{SyncError, SyncResult};
use crate::models::{DependencyKind, Module, ModuleDependencies};

/// Raw shape of the manifest fields refsync reads
#[derive(Debug, Deserialize)]
struct RawManifest {
    name: String,

    #[serde(default)]
    dependencies: BTreeMap<String, String>,

    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, String>,

    #[serde(default, rename = "peerDependencies")]
    peer_dependencies: BTreeMap<String, String>,
}

/// Result of workspace discovery
#[derive(Debug, Default)]
pub struct Discovery {
    /// Successfully parsed packages, sorted by name
    pub modules: Vec<Module>,
    /// Manifest-level failures, isolated per directory
    pub failures: Vec<(PathBuf, SyncError)>,
}

/// Discover every workspace package under the configured directories
pub fn discover(root: &Path, config: &Config) -> SyncResult<Discovery> {
    let mut discovery = Discovery::default();

    for (dirs, is_app) in [(&config.packages, false), (&config.apps, true)] {
        for dir in dirs {
            let base = root.join(dir);
            if !base.is_dir() {
                continue;
            }
            collect_manifests(root, &base, is_app, config, &mut discovery);
        }
    }

    if discovery.modules.is_empty() && discovery.failures.is_empty() {
        return Err(SyncError::EmptyWorkspace {
            root: root.to_path_buf(),
        });
    }

    discovery.modules.sort_by(|a, b| a.name.cmp(&b.name));

    // Duplicate names: first registration (alphabetical directory order
    // within the walk) wins, later ones become isolated failures.
    let mut deduped: Vec<Module> = Vec::with_capacity(discovery.modules.len());
    for module in discovery.modules.drain(..) {
        if deduped.last().map(|m: &Module| m.name.as_str()) == Some(module.name.as_str()) {
            discovery.failures.push((
                module.dir.clone(),
                SyncError::ManifestError {
                    path: module.dir.join("package.json"),
                    message: format!("duplicate package name '{}'", module.name),
                },
            ));
        } else {
            deduped.push(module);
        }
    }
    discovery.modules = deduped;

    Ok(discovery)
}

fn collect_manifests(
    root: &Path,
    base: &Path,
    is_app: bool,
    config: &Config,
    discovery: &mut Discovery,
) {
    let walker = ignore::WalkBuilder::new(base)
        .hidden(false)
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            name != "node_modules" && name != ".git"
        })
        .sort_by_file_name(std::ffi::OsStr::cmp)
        .build();

    for entry in walker.flatten() {
        if entry.file_name() != "package.json" {
            continue;
        }
        let Some(pkg_dir) = entry.path().parent() else {
            continue;
        };
        match parse_module(root, pkg_dir, entry.path(), is_app, config) {
            Ok(module) => discovery.modules.push(module),
            Err(err) => discovery
                .failures
                .push((rel_dir(root, pkg_dir), err)),
        }
    }
}

fn parse_module(
    root: &Path,
    pkg_dir: &Path,
    manifest_path: &Path,
    is_app: bool,
    config: &Config,
) -> SyncResult<Module> {
    let raw = std::fs::read_to_string(manifest_path)?;
    let manifest: RawManifest =
        serde_json::from_str(&raw).map_err(|e| SyncError::ManifestError {
            path: manifest_path.to_path_buf(),
            message: e.to_string(),
        })?;

    let prefix = config.workspace_prefix();
    let mut deps = ModuleDependencies::default();

    for (kind, declared) in [
        (DependencyKind::Runtime, &manifest.dependencies),
        (DependencyKind::Dev, &manifest.dev_dependencies),
        (DependencyKind::Peer, &manifest.peer_dependencies),
    ] {
        for name in declared.keys() {
            if name == &manifest.name {
                return Err(SyncError::ManifestError {
                    path: manifest_path.to_path_buf(),
                    message: format!("package '{}' declares itself as a dependency", manifest.name),
                });
            }
            if name.starts_with(&prefix) {
                deps.workspace.insert(kind, name.clone());
            } else {
                deps.external.insert(kind, name.clone());
            }
        }
    }

    let has_tests = pkg_dir.join("test").is_dir() || pkg_dir.join("tests").is_dir();

    Ok(Module {
        name: manifest.name,
        dir: rel_dir(root, pkg_dir),
        deps,
        is_app,
        has_tests,
    })
}

fn rel_dir(root: &Path, dir: &Path) -> PathBuf {
    dir.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| dir.to_path_buf())
}
