//! Owned, thread-safe snapshots of the syn AST pieces discovery needs.
//!
//! syn trees are not `Send`, so each file is lowered to these types on the
//! thread that parsed it.

use crate::domain::identity::FunctionIdentity;
use crate::ports::AttributeInstance;
use quote::ToTokens;
use std::fmt;
use std::sync::Arc;
use syn::parse::ParseStream;
use syn::punctuated::Punctuated;
use syn::visit::{self, Visit};
use syn::{
    Attribute, Block, Expr, ExprCall, ExprMethodCall, FnArg, Item, Local, Macro, Meta, Pat, PatIdent, ReturnType,
    Signature, Token, Type,
};

/// Where a declaration lives: its module and, for methods, its owning type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub module: String,
    pub owning_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TypeSyntax {
    /// Path segments when the type is a plain path without generic arguments.
    pub path: Option<Vec<String>>,
    pub text: String,
    pub scope: Arc<Scope>,
}

impl TypeSyntax {
    pub fn lower(ty: &Type, scope: &Arc<Scope>) -> Self {
        match ty {
            Type::Reference(r) => Self::lower(&r.elem, scope),
            Type::Paren(p) => Self::lower(&p.elem, scope),
            Type::Group(g) => Self::lower(&g.elem, scope),
            Type::Path(tp) if tp.qself.is_none() => {
                let plain = tp.path.segments.iter().all(|s| s.arguments.is_none());
                Self {
                    path: plain.then(|| path_segments(&tp.path)),
                    text: tokens(ty),
                    scope: scope.clone(),
                }
            }
            _ => Self {
                path: None,
                text: tokens(ty),
                scope: scope.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallTarget {
    /// `f(..)`, `Type::f(..)`, `module::f(..)`
    Path(Vec<String>),
    /// `self.f(..)`
    SelfMethod(String),
    /// `expr.f(..)` on any other receiver
    Method(String),
    /// Callee is not a declared path: closures, locals, indexing, call results,
    /// or a macro whose body is not an expression list.
    Unsupported,
}

#[derive(Debug, Clone)]
pub struct CallSyntax {
    pub target: CallTarget,
    pub text: String,
    pub scope: Arc<Scope>,
}

impl fmt::Display for CallSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Opaque body handle given to backends: source tokens plus the calls found in them.
#[derive(Debug, Clone)]
pub struct ShaderBody {
    source: Arc<str>,
    location: Arc<str>,
    calls: Arc<[CallSyntax]>,
}

impl ShaderBody {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// `file:line` of the declaring function.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn calls(&self) -> &[CallSyntax] {
        &self.calls
    }
}

impl fmt::Display for ShaderBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[derive(Debug)]
pub struct SynDeclaration {
    pub identity: FunctionIdentity,
    pub scope: Arc<Scope>,
    pub parameters: Vec<(String, TypeSyntax)>,
    pub return_type: Option<TypeSyntax>,
    pub attributes: Vec<AttributeInstance>,
    pub body: ShaderBody,
}

impl SynDeclaration {
    pub fn lower(
        identity: FunctionIdentity,
        scope: Arc<Scope>,
        location: String,
        attrs: &[Attribute],
        sig: &Signature,
        block: &Block,
    ) -> Self {
        let parameters = sig
            .inputs
            .iter()
            .filter_map(|arg| match arg {
                FnArg::Receiver(_) => None,
                FnArg::Typed(pt) => {
                    let name = match &*pt.pat {
                        Pat::Ident(ident) => ident.ident.to_string(),
                        other => tokens(other),
                    };
                    Some((name, TypeSyntax::lower(&pt.ty, &scope)))
                }
            })
            .collect();

        let return_type = match &sig.output {
            ReturnType::Default => None,
            ReturnType::Type(_, ty) if matches!(&**ty, Type::Tuple(t) if t.elems.is_empty()) => None,
            ReturnType::Type(_, ty) => Some(TypeSyntax::lower(ty, &scope)),
        };

        let mut collector = CallCollector {
            scope: scope.clone(),
            calls: Vec::new(),
            locals: Vec::new(),
        };
        for arg in &sig.inputs {
            if let FnArg::Typed(pt) = arg {
                collector.visit_pat(&pt.pat);
            }
        }
        collector.visit_block(block);

        Self {
            identity,
            parameters,
            return_type,
            attributes: attrs.iter().map(lower_attribute).collect(),
            body: ShaderBody {
                source: tokens(block).into(),
                location: location.into(),
                calls: collector.calls.into(),
            },
            scope,
        }
    }
}

fn lower_attribute(attr: &Attribute) -> AttributeInstance {
    let name = attr
        .path()
        .segments
        .last()
        .map(|s| s.ident.to_string())
        .unwrap_or_default();
    let arguments = match &attr.meta {
        Meta::Path(_) => Vec::new(),
        Meta::NameValue(nv) => vec![tokens(&nv.value)],
        Meta::List(list) => match list.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated) {
            Ok(args) => args.iter().map(tokens).collect(),
            Err(_) => list
                .tokens
                .to_string()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        },
    };
    AttributeInstance::new(name, arguments)
}

/// Walks a body in source order. `locals` holds the bindings in scope at the
/// current point, so `f(..)` on a local closure or parameter is not mistaken
/// for a call to a declared `f`.
struct CallCollector {
    scope: Arc<Scope>,
    calls: Vec<CallSyntax>,
    locals: Vec<String>,
}

impl CallCollector {
    fn push(&mut self, target: CallTarget, text: String) {
        self.calls.push(CallSyntax {
            target,
            text,
            scope: self.scope.clone(),
        });
    }
}

impl<'ast> Visit<'ast> for CallCollector {
    fn visit_expr_call(&mut self, call: &'ast ExprCall) {
        let target = match &*call.func {
            Expr::Path(p) if p.qself.is_none() => match path_segments(&p.path).as_slice() {
                [name] if self.locals.contains(name) => CallTarget::Unsupported,
                segments => CallTarget::Path(segments.to_vec()),
            },
            _ => CallTarget::Unsupported,
        };
        self.push(target, tokens(call));
        visit::visit_expr_call(self, call);
    }

    fn visit_expr_method_call(&mut self, call: &'ast ExprMethodCall) {
        let method = call.method.to_string();
        let target = match &*call.receiver {
            Expr::Path(p) if p.path.is_ident("self") => CallTarget::SelfMethod(method),
            _ => CallTarget::Method(method),
        };
        self.push(target, tokens(call));
        visit::visit_expr_method_call(self, call);
    }

    fn visit_macro(&mut self, mac: &'ast Macro) {
        let arguments = mac
            .parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated)
            .map(|list| list.into_iter().collect::<Vec<Expr>>())
            .or_else(|_| mac.parse_body_with(repeat_form));
        match arguments {
            Ok(arguments) => {
                for expr in &arguments {
                    self.visit_expr(expr);
                }
            }
            Err(_) => self.push(CallTarget::Unsupported, tokens(mac)),
        }
    }

    // The initializer runs before the binding exists: `let f = f();` calls `f`.
    fn visit_local(&mut self, local: &'ast Local) {
        if let Some(init) = &local.init {
            self.visit_local_init(init);
        }
        self.visit_pat(&local.pat);
    }

    fn visit_pat_ident(&mut self, pat: &'ast PatIdent) {
        self.locals.push(pat.ident.to_string());
        visit::visit_pat_ident(self, pat);
    }

    fn visit_block(&mut self, block: &'ast Block) {
        let depth = self.locals.len();
        visit::visit_block(self, block);
        self.locals.truncate(depth);
    }

    // Nested items are declarations of their own.
    fn visit_item(&mut self, _: &'ast Item) {}
}

/// `vec![value; count]` and friends.
fn repeat_form(input: ParseStream) -> syn::Result<Vec<Expr>> {
    let value: Expr = input.parse()?;
    input.parse::<Token![;]>()?;
    let count: Expr = input.parse()?;
    Ok(vec![value, count])
}

pub(crate) fn path_segments(path: &syn::Path) -> Vec<String> {
    path.segments.iter().map(|s| s.ident.to_string()).collect()
}

pub(crate) fn tokens<T: ToTokens>(node: &T) -> String {
    node.to_token_stream().to_string()
}
