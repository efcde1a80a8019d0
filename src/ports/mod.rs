use crate::domain::function::ShaderProgram;
use crate::domain::identity::{FunctionIdentity, TypeReference};

pub mod exporters;

/// One attribute attached to a declaration, arguments in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInstance {
    pub name: String,
    pub arguments: Vec<String>,
}

impl AttributeInstance {
    pub fn new(name: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Semantic lookups the discovery core needs from the host front end.
///
/// Declarations, bodies, call expressions and type expressions are opaque to
/// the core; it only passes them back to the resolver.
pub trait SymbolResolver {
    type Declaration;
    type Body: Clone;
    type Call: std::fmt::Display;
    type TypeExpr;

    /// `None` marks an intrinsic or external function with no source.
    fn resolve_declaration(&self, identity: &FunctionIdentity) -> Option<Self::Declaration>;

    fn body(&self, declaration: &Self::Declaration) -> Self::Body;

    /// Every call expression in a body, in source order.
    fn call_expressions(&self, body: &Self::Body) -> Vec<Self::Call>;

    fn resolve_call(&self, call: &Self::Call) -> Option<FunctionIdentity>;

    /// Formal parameters in declaration order.
    fn parameters(&self, declaration: &Self::Declaration) -> Vec<(String, Self::TypeExpr)>;

    /// `None` when the function declares no return type.
    fn return_type(&self, declaration: &Self::Declaration) -> Option<Self::TypeExpr>;

    fn resolve_type(&self, ty: &Self::TypeExpr) -> TypeReference;

    fn attributes_of(&self, declaration: &Self::Declaration, attribute_name: &str) -> Vec<AttributeInstance>;
}

/// Turns an ordered program into target text.
pub trait ShaderBackend<B> {
    fn emit(&self, program: &ShaderProgram<B>) -> anyhow::Result<String>;

    fn emit_all(&self, programs: &[ShaderProgram<B>]) -> anyhow::Result<String> {
        let chunks = programs
            .iter()
            .map(|p| self.emit(p))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(chunks.join("\n"))
    }
}
