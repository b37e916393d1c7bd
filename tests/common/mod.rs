//! Common test utilities for refsync CLI tests.
//!
//! This module provides:
//! - `TestWorkspace`: an isolated monorepo fixture in a temp directory
//! - Fixtures: reusable manifest and descriptor content builders

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
