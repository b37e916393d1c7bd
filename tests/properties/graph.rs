//! Property tests for graph ordering and cycle detection.

use std::collections::HashMap;
use std::path::PathBuf;

use proptest::prelude::*;

use refsync::graph::{ClosureCache, DependencyGraph};
use refsync::models::{DependencyKind, Module, ModuleDependencies};
use refsync::sorter::DependencySorter;

fn name(i: usize) -> String {
    format!("@acme/m{i:02}")
}

fn module(i: usize, deps: &[usize]) -> Module {
    let mut module_deps = ModuleDependencies::default();
    for &dep in deps {
        module_deps.workspace.insert(DependencyKind::Runtime, name(dep));
    }
    Module {
        name: name(i),
        dir: PathBuf::from(format!("packages/m{i:02}")),
        deps: module_deps,
        is_app: false,
        has_tests: false,
    }
}

/// Edge lists where node `i` may only depend on nodes `j < i`, which makes
/// the graph acyclic by construction.
fn dag_edges() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (2usize..10).prop_flat_map(|n| {
        let rows: Vec<_> = (0..n)
            .map(|i| proptest::collection::vec(any::<bool>(), i))
            .collect();
        rows.prop_map(|rows| {
            rows.into_iter()
                .map(|row| {
                    row.iter()
                        .enumerate()
                        .filter(|(_, keep)| **keep)
                        .map(|(j, _)| j)
                        .collect()
                })
                .collect()
        })
    })
}

fn build(edges: &[Vec<usize>]) -> DependencyGraph {
    let modules: Vec<Module> = edges
        .iter()
        .enumerate()
        .map(|(i, deps)| module(i, deps))
        .collect();
    DependencyGraph::build(modules)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: an acyclic workspace has no reported cycles.
    #[test]
    fn property_dag_has_no_cycles(edges in dag_edges()) {
        let graph = build(&edges);
        prop_assert!(graph.detect_cycles().is_empty());
    }

    /// PROPERTY: the topological order places every dependency before its
    /// dependent.
    #[test]
    fn property_dependencies_precede_dependents(edges in dag_edges()) {
        let graph = build(&edges);
        let order = graph.topological_order().unwrap();
        let rank: HashMap<_, _> = order.iter().enumerate().map(|(r, &id)| (id, r)).collect();

        for (i, deps) in edges.iter().enumerate() {
            let dependent = graph.lookup(&name(i)).unwrap();
            for &dep in deps {
                let dependency = graph.lookup(&name(dep)).unwrap();
                prop_assert!(rank[&dependency] < rank[&dependent]);
            }
        }
    }

    /// PROPERTY: ordering is deterministic across rebuilds.
    #[test]
    fn property_order_is_deterministic(edges in dag_edges()) {
        let first = build(&edges).topological_order().unwrap();
        let second = build(&edges).topological_order().unwrap();
        prop_assert_eq!(first, second);
    }

    /// PROPERTY: a hoisted dependency set is transitively closed: it
    /// contains the direct dependencies, and the hoisted set of every
    /// member is a subset of it.
    #[test]
    fn property_hoisted_sets_are_transitively_closed(edges in dag_edges()) {
        let graph = build(&edges);
        let order = graph.topological_order().unwrap();
        let sorter = DependencySorter::new(&graph, &order);
        let mut cache = ClosureCache::new();

        let hoisted: Vec<Vec<String>> = (0..graph.len())
            .map(|id| sorter.sorted_set(id, true, &mut cache).workspace)
            .collect();

        for (i, deps) in edges.iter().enumerate() {
            let id = graph.lookup(&name(i)).unwrap();
            for &dep in deps {
                prop_assert!(hoisted[id].contains(&name(dep)));
            }
            for member in &hoisted[id] {
                let member_id = graph.lookup(member).unwrap();
                for inner in &hoisted[member_id] {
                    prop_assert!(hoisted[id].contains(inner));
                }
            }
        }
    }

    /// PROPERTY: forcing a two-node loop always surfaces a cycle.
    #[test]
    fn property_forced_loop_is_detected(edges in dag_edges()) {
        let mut edges = edges;
        let last = edges.len() - 1;
        edges[0] = vec![last];
        if !edges[last].contains(&0) {
            edges[last].push(0);
        }

        let graph = build(&edges);
        prop_assert!(!graph.detect_cycles().is_empty());
        prop_assert!(graph.topological_order().is_err());
    }
}
