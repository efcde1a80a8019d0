//! Graph builder: grows the call graph depth-first from one root.
//!
//! Recursion is rejected while the graph is built. The builder keeps the
//! chain of functions currently being expanded; a call back into any of them
//! is a cycle. Reaching an already expanded function through a second path
//! (a diamond) is not.

use crate::domain::callgraph::{CallGraph, NodeId, NodeStore};
use crate::domain::error::DiscoveryError;
use crate::domain::identity::FunctionIdentity;
use crate::domain::walker::InvocationWalker;
use crate::ports::SymbolResolver;
use std::collections::HashSet;
use tracing::{debug, trace};

pub struct GraphBuilder<'a, R: SymbolResolver> {
    resolver: &'a R,
    store: NodeStore<R::Declaration>,
    stack: Vec<Frame>,
    active: HashSet<NodeId>,
    expanded: HashSet<NodeId>,
}

/// A function on the active chain and the callees it has yet to visit.
struct Frame {
    node: NodeId,
    callees: std::vec::IntoIter<FunctionIdentity>,
}

impl<'a, R: SymbolResolver> GraphBuilder<'a, R> {
    pub fn new(resolver: &'a R) -> Self {
        Self {
            resolver,
            store: NodeStore::new(),
            stack: Vec::new(),
            active: HashSet::new(),
            expanded: HashSet::new(),
        }
    }

    /// Expand the graph reachable from `root`.
    pub fn build(mut self, root: &FunctionIdentity) -> Result<CallGraph<R::Declaration>, DiscoveryError> {
        let resolver = self.resolver;
        let root_id = self.store.get_or_create(root, |id| resolver.resolve_declaration(id));
        if !self.store.node(root_id).is_resolved() {
            return Err(DiscoveryError::RootResolution { root: root.clone() });
        }

        self.enter(root_id)?;
        self.expand()?;

        debug!(root = %root, nodes = self.store.len(), "call graph built");
        Ok(CallGraph {
            store: self.store,
            root: root_id,
        })
    }

    /// Push `id` onto the active chain with its callees queued in call order.
    fn enter(&mut self, id: NodeId) -> Result<(), DiscoveryError> {
        let node = self.store.node(id);
        let callees = match node.declaration() {
            Some(declaration) => {
                let body = self.resolver.body(declaration);
                InvocationWalker::new(self.resolver).find_callees(node.identity(), &body)?
            }
            None => Vec::new(),
        };
        self.active.insert(id);
        self.stack.push(Frame {
            node: id,
            callees: callees.into_iter(),
        });
        Ok(())
    }

    // Depth-first over `stack`, not native recursion: chains can be deep.
    fn expand(&mut self) -> Result<(), DiscoveryError> {
        while let Some(frame) = self.stack.last_mut() {
            let current = frame.node;
            let Some(callee) = frame.callees.next() else {
                self.stack.pop();
                self.active.remove(&current);
                self.expanded.insert(current);
                continue;
            };

            if let Some(cycle) = self.active_cycle(&callee) {
                return Err(DiscoveryError::CyclicCall { cycle });
            }

            let resolver = self.resolver;
            let child = self.store.get_or_create(&callee, |id| resolver.resolve_declaration(id));
            if !self.store.node(child).is_resolved() {
                trace!(caller = %self.store.node(current).identity(), callee = %callee, "intrinsic call, not expanded");
                continue;
            }

            self.store.link(current, child);
            // A finished subtree cannot reach the active chain: it would
            // have hit the callee itself while being expanded.
            if self.expanded.contains(&child) {
                continue;
            }

            debug!(
                caller = %self.store.node(current).identity(),
                callee = %callee,
                depth = self.stack.len(),
                "expanding callee"
            );
            self.enter(child)?;
        }
        Ok(())
    }

    /// The active chain from `callee` down to the current function, if
    /// `callee` is an ancestor on it.
    fn active_cycle(&self, callee: &FunctionIdentity) -> Option<Vec<FunctionIdentity>> {
        let id = self.store.lookup(callee)?;
        if !self.active.contains(&id) {
            return None;
        }
        let start = self.stack.iter().position(|frame| frame.node == id)?;
        Some(
            self.stack[start..]
                .iter()
                .map(|frame| self.store.node(frame.node).identity().clone())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::testing::{chain, id, MockResolver};

    fn children(graph: &CallGraph<crate::domain::testing::MockFunction>, name: &str) -> Vec<FunctionIdentity> {
        let node = graph.store.lookup(&id(name)).unwrap();
        graph
            .store
            .node(node)
            .children()
            .iter()
            .map(|&c| graph.store.node(c).identity().clone())
            .collect()
    }

    #[test]
    fn test_diamond_shares_one_node() {
        let resolver = MockResolver::new()
            .calls("root", &["b", "c"])
            .calls("b", &["d"])
            .calls("c", &["d"])
            .calls("d", &[]);
        let graph = GraphBuilder::new(&resolver).build(&id("root")).unwrap();

        assert_eq!(graph.store.len(), 4);
        assert_eq!(children(&graph, "root"), vec![id("b"), id("c")]);
        let d = graph.store.lookup(&id("d")).unwrap();
        assert_eq!(graph.store.node(d).parents().len(), 2);
    }

    #[test]
    fn test_intrinsic_callee_is_not_linked() {
        let resolver = MockResolver::new().calls("root", &["sqrt", "helper"]).calls("helper", &[]);
        let graph = GraphBuilder::new(&resolver).build(&id("root")).unwrap();
        assert_eq!(children(&graph, "root"), vec![id("helper")]);
        let sqrt = graph.store.lookup(&id("sqrt")).unwrap();
        assert!(graph.store.node(sqrt).parents().is_empty());
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let resolver = MockResolver::new();
        let err = GraphBuilder::new(&resolver).build(&id("nowhere")).unwrap_err();
        assert_eq!(err, DiscoveryError::RootResolution { root: id("nowhere") });
    }

    #[test]
    fn test_direct_recursion() {
        let resolver = MockResolver::new().calls("root", &["root"]);
        let err = GraphBuilder::new(&resolver).build(&id("root")).unwrap_err();
        assert_eq!(err, DiscoveryError::CyclicCall { cycle: vec![id("root")] });
    }

    #[test]
    fn test_cycle_below_root_reports_only_the_loop() {
        let resolver = MockResolver::new()
            .calls("root", &["a"])
            .calls("a", &["c"])
            .calls("c", &["b"])
            .calls("b", &["a"]);
        let err = GraphBuilder::new(&resolver).build(&id("root")).unwrap_err();
        assert_eq!(
            err,
            DiscoveryError::CyclicCall {
                cycle: vec![id("a"), id("c"), id("b")]
            }
        );
    }

    #[test]
    fn test_mutual_recursion() {
        let resolver = MockResolver::new()
            .calls("root", &["x"])
            .calls("x", &["y"])
            .calls("y", &["x"]);
        let err = GraphBuilder::new(&resolver).build(&id("root")).unwrap_err();
        assert_eq!(err, DiscoveryError::CyclicCall { cycle: vec![id("x"), id("y")] });
    }

    #[test]
    fn test_deep_chain_does_not_exhaust_the_stack() {
        let graph = GraphBuilder::new(&chain(100_000)).build(&id("f0")).unwrap();
        assert_eq!(graph.store.len(), 100_001);
        assert_eq!(children(&graph, "f99999"), vec![id("f100000")]);
    }

    #[test]
    fn test_deep_cycle_reports_the_whole_chain() {
        let depth = 50_000;
        let resolver = chain(depth).calls(&format!("f{}", depth), &["f1"]);
        match GraphBuilder::new(&resolver).build(&id("f0")).unwrap_err() {
            DiscoveryError::CyclicCall { cycle } => {
                assert_eq!(cycle.len(), depth);
                assert_eq!(cycle[0], id("f1"));
                assert_eq!(cycle.last(), Some(&id(&format!("f{}", depth))));
            }
            other => panic!("expected a cycle, got {:?}", other),
        }
    }
}
