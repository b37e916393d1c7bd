//! Dependency sorter
//!
//! Produces the canonical ordering used to populate every descriptor:
//! workspace packages ordered by the restriction of the global topological
//! order (so ordering stays consistent across all descriptors), external
//! packages by plain lexicographic comparison.
//!
//! Hoisting (on by default): downstream compilation tooling needs every
//! transitively-required project to be explicitly visible, so a package's
//! descriptor lists its full transitive workspace closure, not just direct
//! dependencies.

use std::collections::HashMap;

use crate::graph::{ClosureCache, DependencyGraph, ModuleId};
use crate::models::SortedDependencySet;

/// Orders dependency sets against a fixed global topological order
#[derive(Debug)]
pub struct DependencySorter<'a> {
    graph: &'a DependencyGraph,
    rank: HashMap<ModuleId, usize>,
}

impl<'a> DependencySorter<'a> {
    /// `order` must be the graph's global topological order
    pub fn new(graph: &'a DependencyGraph, order: &[ModuleId]) -> Self {
        let rank = order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        Self { graph, rank }
    }

    /// Canonical dependency set for one package.
    ///
    /// With hoisting the workspace partition is the package's full
    /// transitive closure; without it, direct dependencies only.
    pub fn sorted_set(
        &self,
        id: ModuleId,
        hoist: bool,
        cache: &mut ClosureCache,
    ) -> SortedDependencySet {
        let mut workspace: Vec<ModuleId> = if hoist {
            cache.closure(self.graph, id).iter().copied().collect()
        } else {
            self.graph.edges(id).to_vec()
        };

        workspace.sort_by_key(|m| self.rank.get(m).copied().unwrap_or(usize::MAX));

        SortedDependencySet {
            workspace: workspace
                .into_iter()
                .map(|m| self.graph.module(m).name.clone())
                .collect(),
            // DependencySet keeps kind lists sorted, so names() is already
            // lexicographic.
            external: self.graph.module(id).deps.external.names(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyGraph;
    use crate::models::{DependencyKind, Module, ModuleDependencies};
    use std::path::PathBuf;

    fn module(name: &str, workspace: &[&str], external: &[&str]) -> Module {
        let mut deps = ModuleDependencies::default();
        for dep in workspace {
            deps.workspace.insert(DependencyKind::Runtime, *dep);
        }
        for dep in external {
            deps.external.insert(DependencyKind::Runtime, *dep);
        }
        Module {
            name: name.to_string(),
            dir: PathBuf::from(format!("packages/{}", name.rsplit('/').next().unwrap())),
            deps,
            is_app: false,
            has_tests: false,
        }
    }

    fn sorter_fixture(
        specs: &[(&str, &[&str], &[&str])],
    ) -> (DependencyGraph, Vec<ModuleId>) {
        let graph = DependencyGraph::build(
            specs
                .iter()
                .map(|(n, w, e)| module(n, w, e))
                .collect(),
        );
        let order = graph.topological_order().unwrap();
        (graph, order)
    }

    #[test]
    fn test_hoisting_lists_transitive_dependencies_in_order() {
        // top -> mid -> leaf: top's list must be [leaf, mid]
        let (graph, order) = sorter_fixture(&[
            ("@acme/leaf", &[], &[]),
            ("@acme/mid", &["@acme/leaf"], &[]),
            ("@acme/top", &["@acme/mid"], &[]),
        ]);
        let sorter = DependencySorter::new(&graph, &order);
        let mut cache = ClosureCache::new();

        let top = graph.lookup("@acme/top").unwrap();
        let set = sorter.sorted_set(top, true, &mut cache);

        assert_eq!(set.workspace, vec!["@acme/leaf", "@acme/mid"]);
    }

    #[test]
    fn test_no_hoist_lists_direct_only() {
        let (graph, order) = sorter_fixture(&[
            ("@acme/leaf", &[], &[]),
            ("@acme/mid", &["@acme/leaf"], &[]),
            ("@acme/top", &["@acme/mid"], &[]),
        ]);
        let sorter = DependencySorter::new(&graph, &order);
        let mut cache = ClosureCache::new();

        let top = graph.lookup("@acme/top").unwrap();
        let set = sorter.sorted_set(top, false, &mut cache);

        assert_eq!(set.workspace, vec!["@acme/mid"]);
    }

    #[test]
    fn test_externals_lexicographic() {
        let (graph, order) = sorter_fixture(&[(
            "@acme/core",
            &[],
            &["zod", "effect", "typescript"],
        )]);
        let sorter = DependencySorter::new(&graph, &order);
        let mut cache = ClosureCache::new();

        let core = graph.lookup("@acme/core").unwrap();
        let set = sorter.sorted_set(core, true, &mut cache);

        assert_eq!(set.external, vec!["effect", "typescript", "zod"]);
    }

    #[test]
    fn test_workspace_order_consistent_across_modules() {
        // Diamond: top -> {left, right} -> leaf. Both orderings must place
        // leaf first and agree on the left/right tie-break.
        let (graph, order) = sorter_fixture(&[
            ("@acme/leaf", &[], &[]),
            ("@acme/left", &["@acme/leaf"], &[]),
            ("@acme/right", &["@acme/leaf"], &[]),
            ("@acme/top", &["@acme/left", "@acme/right"], &[]),
        ]);
        let sorter = DependencySorter::new(&graph, &order);
        let mut cache = ClosureCache::new();

        let top = graph.lookup("@acme/top").unwrap();
        let set = sorter.sorted_set(top, true, &mut cache);

        assert_eq!(
            set.workspace,
            vec!["@acme/leaf", "@acme/left", "@acme/right"]
        );
    }
}
