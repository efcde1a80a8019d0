// Call graph structures for shader discovery.
// Nodes live in an arena owned by one discovery session and are addressed by index.

use crate::domain::identity::FunctionIdentity;
use std::collections::HashMap;

/// Stable handle to a node inside a [`NodeStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A function in the call graph.
#[derive(Debug)]
pub struct CallGraphNode<D> {
    identity: FunctionIdentity,
    declaration: Option<D>, // None for intrinsics and external functions
    children: Vec<NodeId>,  // callees, first-call order, no duplicates
    parents: Vec<NodeId>,   // callers
}

impl<D> CallGraphNode<D> {
    pub fn identity(&self) -> &FunctionIdentity {
        &self.identity
    }

    pub fn declaration(&self) -> Option<&D> {
        self.declaration.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.declaration.is_some()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }
}

/// Deduplicates functions by identity and caches their declarations.
///
/// Exactly one node exists per identity for the lifetime of the store.
#[derive(Debug)]
pub struct NodeStore<D> {
    nodes: Vec<CallGraphNode<D>>,
    index: HashMap<FunctionIdentity, NodeId>,
}

impl<D> Default for NodeStore<D> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<D> NodeStore<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the node for `identity`, creating it on first sight.
    /// `resolve` runs at most once per identity.
    pub fn get_or_create<F>(&mut self, identity: &FunctionIdentity, resolve: F) -> NodeId
    where
        F: FnOnce(&FunctionIdentity) -> Option<D>,
    {
        if let Some(&id) = self.index.get(identity) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(CallGraphNode {
            identity: identity.clone(),
            declaration: resolve(identity),
            children: Vec::new(),
            parents: Vec::new(),
        });
        self.index.insert(identity.clone(), id);
        id
    }

    pub fn lookup(&self, identity: &FunctionIdentity) -> Option<NodeId> {
        self.index.get(identity).copied()
    }

    pub fn node(&self, id: NodeId) -> &CallGraphNode<D> {
        &self.nodes[id.0]
    }

    /// Record `caller -> callee` in both directions. Repeated links are ignored.
    pub fn link(&mut self, caller: NodeId, callee: NodeId) {
        if !self.nodes[caller.0].children.contains(&callee) {
            self.nodes[caller.0].children.push(callee);
        }
        if !self.nodes[callee.0].parents.contains(&caller) {
            self.nodes[callee.0].parents.push(caller);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &CallGraphNode<D>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}

/// A fully expanded call graph rooted at one entry point.
#[derive(Debug)]
pub struct CallGraph<D> {
    pub store: NodeStore<D>,
    pub root: NodeId,
}

impl<D> CallGraph<D> {
    pub fn root(&self) -> &CallGraphNode<D> {
        self.store.node(self.root)
    }

    /// Every caller -> callee edge, in node creation order.
    pub fn edges(&self) -> Vec<(FunctionIdentity, FunctionIdentity)> {
        let mut edges = Vec::new();
        for (_, node) in self.store.nodes() {
            for &child in node.children() {
                edges.push((node.identity().clone(), self.store.node(child).identity().clone()));
            }
        }
        edges
    }
}
