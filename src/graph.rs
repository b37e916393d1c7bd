//! Workspace dependency graph
//!
//! Modules live in a flat arena and are addressed by integer ids; edges are
//! adjacency lists of ids. An edge `A -> B` means "A depends on B", and
//! edges only exist between workspace packages - external dependencies are
//! not nodes.
//!
//! The graph is built once per run and read-only afterwards. Cycles are
//! never repaired: they are detected up front (all of them, not just the
//! first) and abort the run before any module is processed.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{SyncError, SyncResult};
use crate::models::Module;

/// Index into the graph's module arena
pub type ModuleId = usize;

/// Directed dependency graph over workspace packages
#[derive(Debug)]
pub struct DependencyGraph {
    modules: Vec<Module>,
    index: HashMap<String, ModuleId>,
    edges: Vec<Vec<ModuleId>>,
}

impl DependencyGraph {
    /// Build the graph from the registry's module set.
    ///
    /// Workspace dependency names that match no discovered package produce
    /// no edge: a descriptor cannot reference a project that does not
    /// exist, so such declarations are left to the package manager to
    /// complain about.
    pub fn build(modules: Vec<Module>) -> Self {
        let index: HashMap<String, ModuleId> = modules
            .iter()
            .enumerate()
            .map(|(id, m)| (m.name.clone(), id))
            .collect();

        let edges = modules
            .iter()
            .map(|m| {
                let mut targets: Vec<ModuleId> = m
                    .deps
                    .workspace
                    .names()
                    .iter()
                    .filter_map(|name| index.get(name).copied())
                    .collect();
                targets.sort_unstable();
                targets.dedup();
                targets
            })
            .collect();

        Self {
            modules,
            index,
            edges,
        }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id]
    }

    pub fn lookup(&self, name: &str) -> Option<ModuleId> {
        self.index.get(name).copied()
    }

    /// Direct workspace dependencies of `id`
    pub fn edges(&self, id: ModuleId) -> &[ModuleId] {
        &self.edges[id]
    }

    /// Find every distinct cycle in the graph.
    ///
    /// Depth-first search tracking the active recursion stack; each cycle
    /// is canonicalized by rotating its lexicographically smallest member
    /// to the front, so the same loop reached from different entry points
    /// is reported once.
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Unvisited,
            Active,
            Done,
        }

        fn visit(
            graph: &DependencyGraph,
            id: ModuleId,
            state: &mut [State],
            stack: &mut Vec<ModuleId>,
            seen: &mut HashSet<Vec<String>>,
            cycles: &mut Vec<Vec<String>>,
        ) {
            state[id] = State::Active;
            stack.push(id);

            for &next in graph.edges(id) {
                match state[next] {
                    State::Active => {
                        let start = stack
                            .iter()
                            .position(|&m| m == next)
                            .unwrap_or(stack.len() - 1);
                        let names: Vec<String> = stack[start..]
                            .iter()
                            .map(|&m| graph.module(m).name.clone())
                            .collect();
                        let canonical = canonicalize_cycle(names);
                        if seen.insert(canonical.clone()) {
                            cycles.push(canonical);
                        }
                    }
                    State::Unvisited => visit(graph, next, state, stack, seen, cycles),
                    State::Done => {}
                }
            }

            stack.pop();
            state[id] = State::Done;
        }

        let mut state = vec![State::Unvisited; self.len()];
        let mut stack = Vec::new();
        let mut seen = HashSet::new();
        let mut cycles = Vec::new();

        // Iterate roots in name order so multi-cycle output is stable
        let mut roots: Vec<ModuleId> = (0..self.len()).collect();
        roots.sort_by(|&a, &b| self.module(a).name.cmp(&self.module(b).name));
        for id in roots {
            if state[id] == State::Unvisited {
                visit(self, id, &mut state, &mut stack, &mut seen, &mut cycles);
            }
        }

        cycles
    }

    /// Global topological order: dependencies strictly before dependents.
    ///
    /// Kahn's algorithm, emitting each zero-indegree layer in ascending
    /// alphabetical order of package name. Plain Kahn order depends on
    /// container iteration order; the per-layer sort makes the result
    /// byte-identical across runs.
    pub fn topological_order(&self) -> SyncResult<Vec<ModuleId>> {
        // Edges point at dependencies, so a node is ready once all of its
        // outgoing edges are resolved; `remaining` counts unresolved
        // dependencies per node.
        let mut remaining: Vec<usize> = self.edges.iter().map(|e| e.len()).collect();
        let mut dependents: Vec<Vec<ModuleId>> = vec![Vec::new(); self.len()];
        for (from, targets) in self.edges.iter().enumerate() {
            for &t in targets {
                dependents[t].push(from);
            }
        }

        let mut order = Vec::with_capacity(self.len());
        let mut ready: Vec<ModuleId> = (0..self.len()).filter(|&id| remaining[id] == 0).collect();

        while !ready.is_empty() {
            ready.sort_by(|&a, &b| self.module(a).name.cmp(&self.module(b).name));
            let layer = std::mem::take(&mut ready);
            for id in layer {
                order.push(id);
                for &dep in &dependents[id] {
                    remaining[dep] -= 1;
                    if remaining[dep] == 0 {
                        ready.push(dep);
                    }
                }
            }
        }

        if order.len() != self.len() {
            return Err(SyncError::CycleDetected {
                cycles: self.detect_cycles(),
            });
        }
        Ok(order)
    }
}

/// Rotate a cycle so its lexicographically smallest member comes first
fn canonicalize_cycle(names: Vec<String>) -> Vec<String> {
    if names.is_empty() {
        return names;
    }
    let min = names
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let mut rotated = Vec::with_capacity(names.len());
    rotated.extend_from_slice(&names[min..]);
    rotated.extend_from_slice(&names[..min]);
    rotated
}

/// Per-run memo of transitive closures.
///
/// An explicit context object rather than a global, so the engine stays
/// testable per module; the engine fills it before the parallel phase and
/// shares it read-only afterwards.
#[derive(Debug, Default)]
pub struct ClosureCache {
    memo: HashMap<ModuleId, BTreeSet<ModuleId>>,
}

impl ClosureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// All modules reachable from `id`, excluding `id` itself.
    ///
    /// Iterative reachability; memoized per module for the run.
    pub fn closure(&mut self, graph: &DependencyGraph, id: ModuleId) -> &BTreeSet<ModuleId> {
        if !self.memo.contains_key(&id) {
            let mut reached = BTreeSet::new();
            let mut stack: Vec<ModuleId> = graph.edges(id).to_vec();
            while let Some(next) = stack.pop() {
                if next != id && reached.insert(next) {
                    // Reuse an already-memoized closure when available
                    if let Some(done) = self.memo.get(&next) {
                        reached.extend(done.iter().copied());
                    } else {
                        stack.extend_from_slice(graph.edges(next));
                    }
                }
            }
            self.memo.insert(id, reached);
        }
        &self.memo[&id]
    }
}
