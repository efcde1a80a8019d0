//! Shader function metadata handed to backend emitters.

use crate::domain::identity::{FunctionIdentity, TypeReference};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a discovered function. Decided once at extraction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FunctionKind {
    #[default]
    Normal,
    VertexEntryPoint,
    FragmentEntryPoint,
    ComputeEntryPoint,
}

impl FunctionKind {
    pub fn is_entry_point(&self) -> bool {
        !matches!(self, FunctionKind::Normal)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FunctionKind::Normal => "normal",
            FunctionKind::VertexEntryPoint => "vertex",
            FunctionKind::FragmentEntryPoint => "fragment",
            FunctionKind::ComputeEntryPoint => "compute",
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Attribute names that mark a function as a shader entry point.
///
/// Checked in the fixed order vertex, fragment, compute; the first present
/// marker wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderMarkers {
    pub vertex: String,
    pub fragment: String,
    pub compute: String,
}

impl Default for ShaderMarkers {
    fn default() -> Self {
        Self {
            vertex: "vertex_shader".to_string(),
            fragment: "fragment_shader".to_string(),
            compute: "compute_shader".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    pub ty: TypeReference,
}

/// Workgroup counts declared by a compute entry point. Zero for every other kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComputeDispatchDims {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl ComputeDispatchDims {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// Immutable description of one discovered function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderFunctionRecord {
    pub identity: FunctionIdentity,
    pub return_type: TypeReference,
    pub parameters: Vec<ParameterDefinition>,
    pub kind: FunctionKind,
    pub dispatch: ComputeDispatchDims,
}

impl ShaderFunctionRecord {
    pub fn type_name(&self) -> &str {
        &self.identity.type_name
    }

    pub fn name(&self) -> &str {
        &self.identity.method_name
    }
}

/// A function record paired with the resolver's opaque handle to its body.
#[derive(Debug, Clone)]
pub struct ShaderFunctionAndBody<B> {
    pub function: ShaderFunctionRecord,
    pub body: B,
}

/// Everything a backend needs to emit one entry point.
///
/// `functions` is in emission order: every callee precedes its callers and
/// the root comes last.
#[derive(Debug, Clone)]
pub struct ShaderProgram<B> {
    pub root: FunctionIdentity,
    pub kind: FunctionKind,
    pub functions: Vec<ShaderFunctionAndBody<B>>,
    /// Caller -> callee edges between the emitted functions.
    pub calls: Vec<(FunctionIdentity, FunctionIdentity)>,
}

impl<B> ShaderProgram<B> {
    pub fn function(&self, identity: &FunctionIdentity) -> Option<&ShaderFunctionAndBody<B>> {
        self.functions.iter().find(|f| &f.function.identity == identity)
    }

    /// Emission order as identities.
    pub fn order(&self) -> Vec<&FunctionIdentity> {
        self.functions.iter().map(|f| &f.function.identity).collect()
    }
}
