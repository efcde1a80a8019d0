//! Metadata extractor: turns a resolved declaration into a shader function record.

use crate::domain::error::DiscoveryError;
use crate::domain::function::{
    ComputeDispatchDims, FunctionKind, ParameterDefinition, ShaderFunctionAndBody, ShaderFunctionRecord,
    ShaderMarkers,
};
use crate::domain::identity::{FunctionIdentity, TypeReference};
use crate::ports::{AttributeInstance, SymbolResolver};

const DISPATCH_ARITY: usize = 3;

pub struct MetadataExtractor<'a, R> {
    resolver: &'a R,
    markers: &'a ShaderMarkers,
}

impl<'a, R: SymbolResolver> MetadataExtractor<'a, R> {
    pub fn new(resolver: &'a R, markers: &'a ShaderMarkers) -> Self {
        Self { resolver, markers }
    }

    /// Kind by marker precedence: vertex, then fragment, then compute.
    /// For compute, also returns the marker instance carrying the dimensions.
    pub fn classify(&self, declaration: &R::Declaration) -> (FunctionKind, Option<AttributeInstance>) {
        if !self.resolver.attributes_of(declaration, &self.markers.vertex).is_empty() {
            return (FunctionKind::VertexEntryPoint, None);
        }
        if !self.resolver.attributes_of(declaration, &self.markers.fragment).is_empty() {
            return (FunctionKind::FragmentEntryPoint, None);
        }
        match self.resolver.attributes_of(declaration, &self.markers.compute).into_iter().next() {
            Some(marker) => (FunctionKind::ComputeEntryPoint, Some(marker)),
            None => (FunctionKind::Normal, None),
        }
    }

    pub fn extract(
        &self,
        identity: &FunctionIdentity,
        declaration: &R::Declaration,
    ) -> Result<ShaderFunctionAndBody<R::Body>, DiscoveryError> {
        let parameters = self
            .resolver
            .parameters(declaration)
            .into_iter()
            .map(|(name, ty)| ParameterDefinition {
                name,
                ty: self.resolver.resolve_type(&ty),
            })
            .collect();

        let return_type = self
            .resolver
            .return_type(declaration)
            .map_or_else(TypeReference::void, |ty| self.resolver.resolve_type(&ty));

        let (kind, marker) = self.classify(declaration);
        let dispatch = match marker {
            Some(marker) => parse_dispatch_dims(identity, &marker)?,
            None => ComputeDispatchDims::default(),
        };

        Ok(ShaderFunctionAndBody {
            function: ShaderFunctionRecord {
                identity: identity.clone(),
                return_type,
                parameters,
                kind,
                dispatch,
            },
            body: self.resolver.body(declaration),
        })
    }
}

fn parse_dispatch_dims(
    function: &FunctionIdentity,
    marker: &AttributeInstance,
) -> Result<ComputeDispatchDims, DiscoveryError> {
    // Arguments past the third are ignored.
    if marker.arguments.len() < DISPATCH_ARITY {
        return Err(DiscoveryError::AttributeArity {
            function: function.clone(),
            attribute: marker.name.clone(),
            expected: DISPATCH_ARITY,
            found: marker.arguments.len(),
        });
    }

    let mut dims = [0u32; DISPATCH_ARITY];
    for (position, argument) in marker.arguments.iter().take(DISPATCH_ARITY).enumerate() {
        dims[position] = argument
            .trim()
            .parse::<u32>()
            .map_err(|_| DiscoveryError::AttributeFormat {
                function: function.clone(),
                attribute: marker.name.clone(),
                position,
                argument: argument.clone(),
            })?;
    }
    Ok(ComputeDispatchDims::new(dims[0], dims[1], dims[2]))
}
