//! Topological serializer: post-order over a finished call graph.

use crate::domain::callgraph::{CallGraph, NodeId};
use crate::domain::error::DiscoveryError;
use crate::domain::extractor::MetadataExtractor;
use crate::domain::function::ShaderFunctionAndBody;
use crate::ports::SymbolResolver;
use std::collections::HashSet;

/// Emit every node reachable from the root once, callees before callers.
///
/// The graph must come from [`GraphBuilder`](crate::domain::builder::GraphBuilder),
/// which already rejected cycles.
pub fn serialize<R: SymbolResolver>(
    graph: &CallGraph<R::Declaration>,
    extractor: &MetadataExtractor<'_, R>,
) -> Result<Vec<ShaderFunctionAndBody<R::Body>>, DiscoveryError> {
    let mut emitted = HashSet::from([graph.root]);
    let mut ordered = Vec::new();
    // (node, index of the next child to visit)
    let mut stack: Vec<(NodeId, usize)> = vec![(graph.root, 0)];

    while let Some(top) = stack.last_mut() {
        let node = graph.store.node(top.0);
        match node.children().get(top.1) {
            Some(&child) => {
                top.1 += 1;
                if emitted.insert(child) {
                    stack.push((child, 0));
                }
            }
            None => {
                if let Some(declaration) = node.declaration() {
                    ordered.push(extractor.extract(node.identity(), declaration)?);
                }
                stack.pop();
            }
        }
    }
    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::GraphBuilder;
    use crate::domain::function::ShaderMarkers;
    use crate::domain::identity::FunctionIdentity;
    use crate::domain::testing::{chain, id, MockResolver};

    fn order(resolver: &MockResolver, root: &str) -> Vec<FunctionIdentity> {
        let markers = ShaderMarkers::default();
        let graph = GraphBuilder::new(resolver).build(&id(root)).unwrap();
        let extractor = MetadataExtractor::new(resolver, &markers);
        serialize(&graph, &extractor)
            .unwrap()
            .into_iter()
            .map(|f| f.function.identity)
            .collect()
    }

    #[test]
    fn test_diamond_emits_shared_callee_once_first() {
        let resolver = MockResolver::new()
            .calls("root", &["b", "c"])
            .calls("b", &["d"])
            .calls("c", &["d"])
            .calls("d", &[]);
        assert_eq!(order(&resolver, "root"), vec![id("d"), id("b"), id("c"), id("root")]);
    }

    #[test]
    fn test_chain_is_reversed() {
        let resolver = MockResolver::new()
            .calls("root", &["a"])
            .calls("a", &["b"])
            .calls("b", &["sqrt"]);
        assert_eq!(order(&resolver, "root"), vec![id("b"), id("a"), id("root")]);
    }

    #[test]
    fn test_lone_root() {
        let resolver = MockResolver::new().calls("root", &["abs", "sin"]);
        assert_eq!(order(&resolver, "root"), vec![id("root")]);
    }

    #[test]
    fn test_deep_chain_is_emitted_deepest_first() {
        let order = order(&chain(100_000), "f0");
        assert_eq!(order.len(), 100_001);
        assert_eq!(order[0], id("f100000"));
        assert_eq!(order.last(), Some(&id("f0")));
    }
}
