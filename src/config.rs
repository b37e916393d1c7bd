//! Configuration module for refsync
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Project config (`refsync.toml` at the workspace root)
//! 3. Built-in defaults (lowest priority)
//!
//! The workspace scope is the only setting without a static default: when
//! `refsync.toml` does not set it, it is inferred from the scope of the
//! root `package.json` name.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SyncResult;
use crate::models::Profile;

/// Descriptor filenames, one per profile plus the application artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DescriptorConfig {
    #[serde(default = "default_build_descriptor")]
    pub build: String,

    #[serde(default = "default_source_descriptor")]
    pub source: String,

    #[serde(default = "default_test_descriptor")]
    pub test: String,

    #[serde(default = "default_app_descriptor")]
    pub app: String,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            build: default_build_descriptor(),
            source: default_source_descriptor(),
            test: default_test_descriptor(),
            app: default_app_descriptor(),
        }
    }
}

fn default_build_descriptor() -> String {
    "tsconfig.build.json".to_string()
}

fn default_source_descriptor() -> String {
    "tsconfig.src.json".to_string()
}

fn default_test_descriptor() -> String {
    "tsconfig.test.json".to_string()
}

fn default_app_descriptor() -> String {
    "tsconfig.json".to_string()
}

/// Project configuration loaded from `refsync.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Workspace package scope (e.g. `@acme`). Inferred from the root
    /// package.json name when unset.
    #[serde(default)]
    pub scope: Option<String>,

    /// Directories (relative to root) that hold workspace packages
    #[serde(default = "default_packages_dirs")]
    pub packages: Vec<String>,

    /// Directories (relative to root) that hold application packages
    #[serde(default = "default_apps_dirs")]
    pub apps: Vec<String>,

    /// Shared test-utilities package referenced by every test descriptor
    /// of a package that has tests
    #[serde(default)]
    pub test_utils: Option<String>,

    /// Tooling-only packages excluded from application alias/reference
    /// generation
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Descriptor filenames
    #[serde(default)]
    pub descriptors: DescriptorConfig,
}

fn default_packages_dirs() -> Vec<String> {
    vec!["packages".to_string()]
}

fn default_apps_dirs() -> Vec<String> {
    vec!["apps".to_string()]
}

impl Config {
    /// Load `refsync.toml` from the workspace root, falling back to
    /// defaults when the file does not exist
    pub fn load_or_default(root: &Path) -> SyncResult<Self> {
        let path = root.join("refsync.toml");
        if !path.exists() {
            let mut config = Self::defaults();
            config.infer_scope(root);
            return Ok(config);
        }

        let raw = std::fs::read_to_string(&path)?;
        let mut config: Config = toml::from_str(&raw)?;
        if config.packages.is_empty() {
            config.packages = default_packages_dirs();
        }
        config.infer_scope(root);
        Ok(config)
    }

    /// Built-in defaults (no config file)
    pub fn defaults() -> Self {
        Self {
            scope: None,
            packages: default_packages_dirs(),
            apps: default_apps_dirs(),
            test_utils: None,
            exclude: Vec::new(),
            descriptors: DescriptorConfig::default(),
        }
    }

    /// The prefix that marks a dependency as a workspace dependency,
    /// e.g. `@acme/`
    pub fn workspace_prefix(&self) -> String {
        match &self.scope {
            Some(scope) => {
                let scope = scope.trim_end_matches('/');
                format!("{scope}/")
            }
            None => "@workspace/".to_string(),
        }
    }

    /// Descriptor filename for a profile
    pub fn descriptor_filename(&self, profile: Profile) -> &str {
        match profile {
            Profile::Build => &self.descriptors.build,
            Profile::Source => &self.descriptors.source,
            Profile::Test => &self.descriptors.test,
        }
    }

    /// Fill `scope` from the root package.json name when unset.
    ///
    /// A root manifest named `@acme/root` or `@acme/workspace` yields the
    /// scope `@acme`. Anything unscoped leaves the field untouched.
    fn infer_scope(&mut self, root: &Path) {
        if self.scope.is_some() {
            return;
        }
        let manifest = root.join("package.json");
        let Ok(raw) = std::fs::read_to_string(&manifest) else {
            return;
        };
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw) else {
            return;
        };
        if let Some(name) = value.get("name").and_then(|n| n.as_str()) {
            if let Some(scope) = name.strip_prefix('@').and_then(|n| n.split('/').next()) {
                self.scope = Some(format!("@{scope}"));
            }
        }
    }
}
