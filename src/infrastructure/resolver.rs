//! syn-backed symbol resolver for Rust shader sources.

use std::sync::Arc;

use crate::domain::identity::{FunctionIdentity, TypeReference};
use crate::infrastructure::index::{normalize_relative, SymbolIndex};
use crate::infrastructure::syntax::{CallSyntax, CallTarget, Scope, ShaderBody, SynDeclaration, TypeSyntax};
use crate::ports::{AttributeInstance, SymbolResolver};

/// Owner used for method calls on receivers of unknown type whose method no
/// indexed type defines. Never declared, so such calls are intrinsic leaves.
pub const INTRINSIC_RECEIVER: &str = "<intrinsic>";

pub struct SynSymbolResolver {
    index: SymbolIndex,
}

impl SynSymbolResolver {
    /// Parse and index `(module_path, file_path, source)` triples.
    pub fn from_sources(sources: &[(String, String, String)]) -> Self {
        Self {
            index: SymbolIndex::build(sources),
        }
    }

    /// Every declared function, sorted.
    pub fn identities(&self) -> Vec<FunctionIdentity> {
        let mut ids: Vec<FunctionIdentity> = self.index.functions.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn location(&self, identity: &FunctionIdentity) -> Option<String> {
        self.index
            .functions
            .get(identity)
            .map(|d| d.body.location().to_string())
    }

    pub fn function_count(&self) -> usize {
        self.index.functions.len()
    }

    /// Leading `crate`/`self`/`super`, imports and child modules resolved.
    fn normalize(&self, module: &str, segments: &[String]) -> Vec<String> {
        let Some(first) = segments.first() else {
            return Vec::new();
        };
        if matches!(first.as_str(), "crate" | "self" | "super") {
            return normalize_relative(module, segments);
        }
        if let Some(mut path) = self.index.import(module, first) {
            path.extend_from_slice(&segments[1..]);
            return path;
        }
        let child = format!("{}::{}", module, first);
        if self.index.modules.contains(&child) || self.index.types.contains(&child) {
            let mut path: Vec<String> = module.split("::").map(str::to_string).collect();
            path.extend_from_slice(segments);
            return path;
        }
        segments.to_vec()
    }

    /// A single-segment type name: imports, then the scope's module, then a
    /// unique match anywhere.
    fn resolve_type_name(&self, scope: &Scope, name: &str) -> Option<String> {
        if name == "Self" {
            return scope.owning_type.clone();
        }
        if let Some(path) = self.index.import(&scope.module, name) {
            return Some(path.join("::"));
        }
        let local = format!("{}::{}", scope.module, name);
        if self.index.types.contains(&local) {
            return Some(local);
        }
        let mut globbed = self
            .glob_candidates(&scope.module, name)
            .into_iter()
            .filter(|qualified| self.index.types.contains(qualified));
        match (globbed.next(), globbed.next()) {
            (Some(found), None) => return Some(found),
            (Some(_), Some(_)) => return None,
            (None, _) => {}
        }
        match self.index.type_lookup.get(name) {
            Some(candidates) if candidates.len() == 1 => Some(candidates[0].clone()),
            _ => None,
        }
    }

    /// `prefix::name` for every glob import of `module`.
    fn glob_candidates(&self, module: &str, name: &str) -> Vec<String> {
        let mut candidates: Vec<String> = self
            .index
            .globs(module)
            .iter()
            .map(|prefix| format!("{}::{}", self.normalize(module, prefix).join("::"), name))
            .collect();
        candidates.sort();
        candidates.dedup();
        candidates
    }

    /// A free function named by one segment: declared in `module`, else
    /// brought in by exactly one glob import. Several glob matches are
    /// ambiguous. No match at all is an undeclared leaf in `module`.
    fn resolve_free_function(&self, module: &str, name: &str) -> Option<FunctionIdentity> {
        let local = FunctionIdentity::new(module, name);
        if self.index.functions.contains_key(&local) {
            return Some(local);
        }
        let mut globbed = self
            .glob_candidates(module, name)
            .into_iter()
            .filter_map(|qualified| FunctionIdentity::parse(&qualified))
            .filter(|identity| self.index.functions.contains_key(identity));
        match (globbed.next(), globbed.next()) {
            (Some(found), None) => Some(found),
            (Some(_), Some(_)) => None,
            (None, _) => Some(local),
        }
    }

    fn resolve_owner(&self, scope: &Scope, segments: &[String]) -> Option<String> {
        match segments {
            [single] if single == "Self" => scope.owning_type.clone(),
            [single] => Some(self.resolve_type_name(scope, single).unwrap_or_else(|| {
                let child = format!("{}::{}", scope.module, single);
                if self.index.modules.contains(&child) {
                    child
                } else {
                    single.clone()
                }
            })),
            _ => Some(self.normalize(&scope.module, segments).join("::")),
        }
    }
}

impl SymbolResolver for SynSymbolResolver {
    type Declaration = Arc<SynDeclaration>;
    type Body = ShaderBody;
    type Call = CallSyntax;
    type TypeExpr = TypeSyntax;

    fn resolve_declaration(&self, identity: &FunctionIdentity) -> Option<Arc<SynDeclaration>> {
        self.index.functions.get(identity).map(|d| d.clone())
    }

    fn body(&self, declaration: &Arc<SynDeclaration>) -> ShaderBody {
        declaration.body.clone()
    }

    fn call_expressions(&self, body: &ShaderBody) -> Vec<CallSyntax> {
        body.calls().to_vec()
    }

    fn resolve_call(&self, call: &CallSyntax) -> Option<FunctionIdentity> {
        let scope = &*call.scope;
        match &call.target {
            CallTarget::Path(segments) => match segments.as_slice() {
                [] => None,
                [name] => match self.index.import(&scope.module, name) {
                    Some(path) if path.len() > 1 => {
                        let (owner, method) = path.split_at(path.len() - 1);
                        Some(FunctionIdentity::new(owner.join("::"), method[0].clone()))
                    }
                    _ => self.resolve_free_function(&scope.module, name),
                },
                [owner @ .., method] => {
                    let owner = self.resolve_owner(scope, owner)?;
                    Some(FunctionIdentity::new(owner, method.clone()))
                }
            },
            CallTarget::SelfMethod(method) => scope
                .owning_type
                .as_ref()
                .map(|owner| FunctionIdentity::new(owner.clone(), method.clone())),
            CallTarget::Method(method) => match self.index.method_lookup.get(method) {
                None => Some(FunctionIdentity::new(INTRINSIC_RECEIVER, method.clone())),
                Some(owners) if owners.len() == 1 => Some(FunctionIdentity::new(owners[0].clone(), method.clone())),
                // Several types define it and the receiver type is unknown.
                Some(_) => None,
            },
            CallTarget::Unsupported => None,
        }
    }

    fn parameters(&self, declaration: &Arc<SynDeclaration>) -> Vec<(String, TypeSyntax)> {
        declaration.parameters.clone()
    }

    fn return_type(&self, declaration: &Arc<SynDeclaration>) -> Option<TypeSyntax> {
        declaration.return_type.clone()
    }

    fn resolve_type(&self, ty: &TypeSyntax) -> TypeReference {
        let resolved = match ty.path.as_deref() {
            Some([name]) => self.resolve_type_name(&ty.scope, name),
            Some(segments) => {
                let qualified = self.normalize(&ty.scope.module, segments).join("::");
                self.index.types.contains(&qualified).then_some(qualified)
            }
            None => None,
        };
        TypeReference::new(resolved.unwrap_or_else(|| ty.text.clone()))
    }

    fn attributes_of(&self, declaration: &Arc<SynDeclaration>, attribute_name: &str) -> Vec<AttributeInstance> {
        declaration
            .attributes
            .iter()
            .filter(|a| a.name == attribute_name)
            .cloned()
            .collect()
    }
}
