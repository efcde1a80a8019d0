// In-memory resolver for exercising the discovery core without a parser.

use crate::domain::identity::{FunctionIdentity, TypeReference};
use crate::ports::{AttributeInstance, SymbolResolver};
use std::collections::HashMap;
use std::fmt;

pub const OWNER: &str = "Shaders";

pub fn id(name: &str) -> FunctionIdentity {
    FunctionIdentity::new(OWNER, name)
}

#[derive(Debug, Clone)]
pub struct MockCall {
    pub target: Option<FunctionIdentity>,
    pub text: String,
}

impl fmt::Display for MockCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockFunction {
    pub calls: Vec<MockCall>,
    pub parameters: Vec<(String, String)>,
    pub return_type: Option<String>,
    pub attributes: Vec<AttributeInstance>,
}

impl MockFunction {
    pub fn calling(names: &[&str]) -> Self {
        Self {
            calls: names
                .iter()
                .map(|n| MockCall {
                    target: Some(id(n)),
                    text: format!("{}()", n),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: &str, arguments: &[&str]) -> Self {
        self.attributes.push(AttributeInstance::new(
            name,
            arguments.iter().map(|a| a.to_string()).collect(),
        ));
        self
    }

    pub fn with_unresolvable_call(mut self, text: &str) -> Self {
        self.calls.push(MockCall {
            target: None,
            text: text.to_string(),
        });
        self
    }
}

#[derive(Debug, Default)]
pub struct MockResolver {
    functions: HashMap<FunctionIdentity, MockFunction>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, function: MockFunction) -> Self {
        self.functions.insert(id(name), function);
        self
    }

    /// Shorthand for a function that only calls `callees`.
    pub fn calls(self, name: &str, callees: &[&str]) -> Self {
        self.with(name, MockFunction::calling(callees))
    }
}

/// `f0 -> f1 -> .. -> f{depth}`, the last one a leaf.
pub fn chain(depth: usize) -> MockResolver {
    (0..depth).fold(MockResolver::new().calls(&format!("f{}", depth), &[]), |resolver, i| {
        resolver.calls(&format!("f{}", i), &[&format!("f{}", i + 1)])
    })
}

impl SymbolResolver for MockResolver {
    type Declaration = MockFunction;
    type Body = Vec<MockCall>;
    type Call = MockCall;
    type TypeExpr = String;

    fn resolve_declaration(&self, identity: &FunctionIdentity) -> Option<MockFunction> {
        self.functions.get(identity).cloned()
    }

    fn body(&self, declaration: &MockFunction) -> Vec<MockCall> {
        declaration.calls.clone()
    }

    fn call_expressions(&self, body: &Vec<MockCall>) -> Vec<MockCall> {
        body.clone()
    }

    fn resolve_call(&self, call: &MockCall) -> Option<FunctionIdentity> {
        call.target.clone()
    }

    fn parameters(&self, declaration: &MockFunction) -> Vec<(String, String)> {
        declaration.parameters.clone()
    }

    fn return_type(&self, declaration: &MockFunction) -> Option<String> {
        declaration.return_type.clone()
    }

    fn resolve_type(&self, ty: &String) -> TypeReference {
        TypeReference::new(format!("mock::{}", ty))
    }

    fn attributes_of(&self, declaration: &MockFunction, attribute_name: &str) -> Vec<AttributeInstance> {
        declaration
            .attributes
            .iter()
            .filter(|a| a.name == attribute_name)
            .cloned()
            .collect()
    }
}
