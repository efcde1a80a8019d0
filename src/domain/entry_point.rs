//! Entry Point Detection Module
//!
//! Finds the shader entry points among a set of declared functions.

use crate::domain::extractor::MetadataExtractor;
use crate::domain::function::{FunctionKind, ShaderMarkers};
use crate::domain::identity::FunctionIdentity;
use crate::ports::SymbolResolver;

/// A function carrying a vertex, fragment or compute marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub identity: FunctionIdentity,
    pub kind: FunctionKind,
}

/// Entry point scanner
pub struct EntryPointScanner<'a, R> {
    resolver: &'a R,
    markers: &'a ShaderMarkers,
}

impl<'a, R: SymbolResolver> EntryPointScanner<'a, R> {
    pub fn new(resolver: &'a R, markers: &'a ShaderMarkers) -> Self {
        Self { resolver, markers }
    }

    /// Classify each candidate and keep the entry points, sorted by identity.
    pub fn scan<I>(&self, candidates: I) -> Vec<EntryPoint>
    where
        I: IntoIterator<Item = FunctionIdentity>,
    {
        let extractor = MetadataExtractor::new(self.resolver, self.markers);
        let mut entries: Vec<EntryPoint> = candidates
            .into_iter()
            .filter_map(|identity| {
                let declaration = self.resolver.resolve_declaration(&identity)?;
                let (kind, _) = extractor.classify(&declaration);
                kind.is_entry_point().then_some(EntryPoint { identity, kind })
            })
            .collect();
        entries.sort_by(|a, b| a.identity.cmp(&b.identity));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::testing::{id, MockFunction, MockResolver};

    #[test]
    fn test_scan_keeps_marked_functions_only() {
        let resolver = MockResolver::new()
            .with("vs", MockFunction::default().with_attribute("vertex_shader", &[]))
            .with("fs", MockFunction::default().with_attribute("fragment_shader", &[]))
            .calls("helper", &[]);
        let markers = ShaderMarkers::default();
        let entries = EntryPointScanner::new(&resolver, &markers).scan(vec![id("vs"), id("helper"), id("fs"), id("gone")]);
        assert_eq!(
            entries,
            vec![
                EntryPoint { identity: id("fs"), kind: FunctionKind::FragmentEntryPoint },
                EntryPoint { identity: id("vs"), kind: FunctionKind::VertexEntryPoint },
            ]
        );
    }

    #[test]
    fn test_custom_marker_names() {
        let resolver = MockResolver::new().with("main", MockFunction::default().with_attribute("kernel", &["1", "1", "1"]));
        let markers = ShaderMarkers {
            compute: "kernel".to_string(),
            ..ShaderMarkers::default()
        };
        let entries = EntryPointScanner::new(&resolver, &markers).scan(vec![id("main")]);
        assert_eq!(entries[0].kind, FunctionKind::ComputeEntryPoint);
    }
}
