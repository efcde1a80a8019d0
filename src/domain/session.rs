//! One discovery session: build, check and order the call graph of an entry point.

use crate::domain::builder::GraphBuilder;
use crate::domain::error::DiscoveryError;
use crate::domain::extractor::MetadataExtractor;
use crate::domain::function::{FunctionKind, ShaderFunctionAndBody, ShaderMarkers, ShaderProgram};
use crate::domain::identity::FunctionIdentity;
use crate::domain::serializer;
use crate::ports::SymbolResolver;
use tracing::info;

/// Ordered functions reachable from `root`, callees first, root last.
pub fn discover<R: SymbolResolver>(
    resolver: &R,
    markers: &ShaderMarkers,
    root: &FunctionIdentity,
) -> Result<Vec<ShaderFunctionAndBody<R::Body>>, DiscoveryError> {
    discover_program(resolver, markers, root).map(|program| program.functions)
}

/// Like [`discover`], but keeps the root's kind and the call edges for backends.
pub fn discover_program<R: SymbolResolver>(
    resolver: &R,
    markers: &ShaderMarkers,
    root: &FunctionIdentity,
) -> Result<ShaderProgram<R::Body>, DiscoveryError> {
    let graph = GraphBuilder::new(resolver).build(root)?;
    let extractor = MetadataExtractor::new(resolver, markers);
    let functions = serializer::serialize(&graph, &extractor)?;

    let kind = functions
        .last()
        .map(|f| f.function.kind)
        .unwrap_or(FunctionKind::Normal);
    info!(root = %root, kind = %kind, functions = functions.len(), "shader discovered");

    Ok(ShaderProgram {
        root: root.clone(),
        kind,
        functions,
        calls: graph.edges(),
    })
}
