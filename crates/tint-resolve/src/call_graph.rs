//! Call graph analysis: recursion detection and reference propagation.
//!
//! Cycles are found by a depth-first search before anything is propagated.
//! Each back edge is reported once and then ignored, so the graph seen by
//! propagation is acyclic and every walk terminates.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use tint_ir::{Function, Handle, ProgramBuilder, Symbol, Variable};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Direct call edges between module-scope functions.
#[derive(Debug, Default)]
pub(crate) struct CallGraph {
    edges: IndexMap<Handle<Function>, IndexSet<Handle<Function>>>,
}

/// A call that closes a cycle: `caller` calls `callee`, which is still on
/// the search stack. `path` runs from `callee` to `caller`.
#[derive(Debug)]
pub(crate) struct BackEdge {
    pub caller: Handle<Function>,
    pub callee: Handle<Function>,
    pub path: Vec<Handle<Function>>,
}

/// Result of the depth-first search.
#[derive(Debug, Default)]
pub(crate) struct Traversal {
    /// Every function, callees before callers.
    pub post_order: Vec<Handle<Function>>,
    pub back_edges: Vec<BackEdge>,
}

impl CallGraph {
    pub fn new(functions: &[Handle<Function>]) -> Self {
        Self {
            edges: functions.iter().map(|&f| (f, IndexSet::new())).collect(),
        }
    }

    pub fn add_call(&mut self, caller: Handle<Function>, callee: Handle<Function>) {
        self.edges.entry(caller).or_default().insert(callee);
    }

    pub fn callees(&self, func: Handle<Function>) -> impl Iterator<Item = Handle<Function>> + '_ {
        self.edges.get(&func).into_iter().flatten().copied()
    }

    pub fn traverse(&self) -> Traversal {
        let mut marks = HashMap::new();
        let mut stack = Vec::new();
        let mut out = Traversal::default();
        for &root in self.edges.keys() {
            if !marks.contains_key(&root) {
                self.visit(root, &mut marks, &mut stack, &mut out);
            }
        }
        out
    }

    fn visit(
        &self,
        func: Handle<Function>,
        marks: &mut HashMap<Handle<Function>, Mark>,
        stack: &mut Vec<Handle<Function>>,
        out: &mut Traversal,
    ) {
        marks.insert(func, Mark::Visiting);
        stack.push(func);
        for callee in self.callees(func) {
            match marks.get(&callee) {
                None => self.visit(callee, marks, stack, out),
                Some(Mark::Visiting) => {
                    let start = stack.iter().position(|&f| f == callee).unwrap_or(0);
                    out.back_edges.push(BackEdge {
                        caller: func,
                        callee,
                        path: stack[start..].to_vec(),
                    });
                }
                Some(Mark::Done) => {}
            }
        }
        stack.pop();
        marks.insert(func, Mark::Done);
        out.post_order.push(func);
    }
}

/// Fills `referenced_module_variables` and `ancestor_entry_points` of every
/// function, ignoring the back edges found by `traversal`.
pub(crate) fn propagate(builder: &mut ProgramBuilder, graph: &CallGraph, traversal: &Traversal) {
    let is_back_edge = |caller: Handle<Function>, callee: Handle<Function>| {
        traversal
            .back_edges
            .iter()
            .any(|e| e.caller == caller && e.callee == callee)
    };

    let mut totals: HashMap<Handle<Function>, IndexSet<Handle<Variable>>> = HashMap::new();
    for &func in &traversal.post_order {
        let mut total = builder.func(func).sem.local_referenced_module_variables.clone();
        for callee in graph.callees(func) {
            if is_back_edge(func, callee) {
                continue;
            }
            if let Some(vars) = totals.get(&callee) {
                total.extend(vars.iter().copied());
            }
        }
        totals.insert(func, total);
    }
    for (func, total) in totals {
        builder.func_mut(func).sem.referenced_module_variables = total;
    }

    let entry_points: Vec<(Handle<Function>, Symbol)> = builder
        .entry_points()
        .map(|f| (f, builder.func(f).symbol))
        .collect();
    for (ep, symbol) in entry_points {
        let mut seen = IndexSet::new();
        let mut work: Vec<_> = graph.callees(ep).filter(|&c| !is_back_edge(ep, c)).collect();
        while let Some(func) = work.pop() {
            if !seen.insert(func) {
                continue;
            }
            work.extend(graph.callees(func).filter(|&c| !is_back_edge(func, c)));
        }
        for func in seen {
            builder.func_mut(func).sem.ancestor_entry_points.insert(symbol);
        }
    }
}
