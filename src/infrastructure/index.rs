use dashmap::{DashMap, DashSet};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use syn::{Item, Type, UseTree};
use tracing::{debug, warn};

use crate::domain::identity::FunctionIdentity;
use crate::infrastructure::syntax::{path_segments, Scope, SynDeclaration};

/// Thread-safe symbol index using DashMap for concurrent access.
/// Enables parallel parsing and indexing of shader source files.
#[derive(Default)]
pub struct SymbolIndex {
    // Key: (owner, name) where owner is a module path or a module::Type path
    pub functions: DashMap<FunctionIdentity, Arc<SynDeclaration>>,

    // Fully-qualified struct and enum names
    pub types: DashSet<String>,

    // Acceleration map: TypeName -> Vec<fully-qualified type>
    pub type_lookup: DashMap<String, Vec<String>>,

    // Acceleration map: MethodName -> Vec<owning type>
    pub method_lookup: DashMap<String, Vec<String>>,

    pub modules: DashSet<String>,

    // Module -> (alias -> imported path)
    pub imports: DashMap<String, HashMap<String, Vec<String>>>,

    // Module -> prefixes of its `use prefix::*` imports
    pub globs: DashMap<String, Vec<Vec<String>>>,
}

impl SymbolIndex {
    /// Build the symbol index from `(module_path, file_path, source)` triples in parallel.
    pub fn build(sources: &[(String, String, String)]) -> Self {
        let index = SymbolIndex::default();

        sources.par_iter().for_each(|(module, file_path, code)| {
            match syn::parse_file(code) {
                Ok(ast) => index.index_items(module, file_path, &ast.items),
                Err(e) => warn!(file = %file_path, error = %e, "failed to parse, skipping"),
            }
        });

        debug!(
            functions = index.functions.len(),
            types = index.types.len(),
            modules = index.modules.len(),
            "symbol index built"
        );
        index
    }

    /// Import target for `alias` as seen from `module`.
    pub fn import(&self, module: &str, alias: &str) -> Option<Vec<String>> {
        self.imports.get(module).and_then(|m| m.get(alias).cloned())
    }

    /// Glob import prefixes of `module`, deduplicated.
    pub fn globs(&self, module: &str) -> Vec<Vec<String>> {
        let mut prefixes = self.globs.get(module).map(|g| g.clone()).unwrap_or_default();
        prefixes.sort();
        prefixes.dedup();
        prefixes
    }

    /// Index all items in a list (recursive for inline modules).
    fn index_items(&self, module: &str, file_path: &str, items: &[Item]) {
        self.modules.insert(module.to_string());

        // Imports first: impl blocks below may name an imported type.
        let mut local_imports = HashMap::new();
        let mut local_globs = Vec::new();
        for item in items {
            if let Item::Use(u) = item {
                flatten_use(module, &mut Vec::new(), &u.tree, &mut local_imports, &mut local_globs);
            }
        }
        if !local_globs.is_empty() {
            self.globs.entry(module.to_string()).or_default().extend(local_globs);
        }
        if !local_imports.is_empty() {
            self.imports
                .entry(module.to_string())
                .or_default()
                .extend(local_imports.clone());
        }

        for item in items {
            match item {
                Item::Fn(func) => {
                    let scope = Arc::new(Scope {
                        module: module.to_string(),
                        owning_type: None,
                    });
                    let identity = FunctionIdentity::new(module, func.sig.ident.to_string());
                    let location = format!("{}:{}", file_path, func.sig.ident.span().start().line);
                    let decl = SynDeclaration::lower(identity, scope, location, &func.attrs, &func.sig, &func.block);
                    self.insert_function(decl);
                }
                Item::Impl(imp) => {
                    let Type::Path(tp) = &*imp.self_ty else { continue };
                    let segments = path_segments(&tp.path);
                    let owner = match segments.as_slice() {
                        [name] => match local_imports.get(name) {
                            Some(path) => path.join("::"),
                            None => format!("{}::{}", module, name),
                        },
                        _ => normalize_relative(module, &segments).join("::"),
                    };
                    let scope = Arc::new(Scope {
                        module: module.to_string(),
                        owning_type: Some(owner.clone()),
                    });

                    for impl_item in &imp.items {
                        if let syn::ImplItem::Fn(method) = impl_item {
                            let method_name = method.sig.ident.to_string();
                            let identity = FunctionIdentity::new(owner.clone(), method_name.clone());
                            let location = format!("{}:{}", file_path, method.sig.ident.span().start().line);
                            let decl = SynDeclaration::lower(
                                identity,
                                scope.clone(),
                                location,
                                &method.attrs,
                                &method.sig,
                                &method.block,
                            );
                            if self.insert_function(decl) {
                                self.method_lookup
                                    .entry(method_name)
                                    .or_default()
                                    .push(owner.clone());
                            }
                        }
                    }
                }
                Item::Struct(s) => self.insert_type(module, s.ident.to_string()),
                Item::Enum(e) => self.insert_type(module, e.ident.to_string()),
                Item::Mod(m) => {
                    let child = format!("{}::{}", module, m.ident);
                    match &m.content {
                        Some((_, content)) => self.index_items(&child, file_path, content),
                        // Out-of-line module: its file is indexed separately.
                        None => {
                            self.modules.insert(child);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Returns false when the identity was already taken.
    fn insert_function(&self, decl: SynDeclaration) -> bool {
        match self.functions.entry(decl.identity.clone()) {
            dashmap::mapref::entry::Entry::Occupied(existing) => {
                warn!(
                    function = %decl.identity,
                    kept = existing.get().body.location(),
                    ignored = decl.body.location(),
                    "duplicate function identity, overloads are not distinguished"
                );
                false
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Arc::new(decl));
                true
            }
        }
    }

    fn insert_type(&self, module: &str, name: String) {
        let qualified = format!("{}::{}", module, name);
        self.types.insert(qualified.clone());
        self.type_lookup.entry(name).or_default().push(qualified);
    }
}

/// Resolve leading `crate`, `self` and `super` segments against `module`.
/// Other paths are returned as written.
pub(crate) fn normalize_relative(module: &str, segments: &[String]) -> Vec<String> {
    let module_segments: Vec<String> = module.split("::").map(str::to_string).collect();
    match segments.first().map(String::as_str) {
        Some("crate") => {
            let mut out = vec![module_segments[0].clone()];
            out.extend_from_slice(&segments[1..]);
            out
        }
        Some("self") => {
            let mut out = module_segments;
            out.extend_from_slice(&segments[1..]);
            out
        }
        Some("super") => {
            let mut out = module_segments;
            let mut rest = segments;
            while rest.first().map(String::as_str) == Some("super") {
                if out.len() > 1 {
                    out.pop();
                }
                rest = &rest[1..];
            }
            out.extend_from_slice(rest);
            out
        }
        _ => segments.to_vec(),
    }
}

fn flatten_use(
    module: &str,
    prefix: &mut Vec<String>,
    tree: &UseTree,
    out: &mut HashMap<String, Vec<String>>,
    globs: &mut Vec<Vec<String>>,
) {
    match tree {
        UseTree::Path(p) => {
            prefix.push(p.ident.to_string());
            flatten_use(module, prefix, &p.tree, out, globs);
            prefix.pop();
        }
        UseTree::Name(n) => {
            let name = n.ident.to_string();
            if name == "self" {
                // `use a::b::{self}` imports the module `b`
                if let Some(last) = prefix.last().cloned() {
                    out.insert(last, normalize_relative(module, prefix));
                }
            } else {
                let mut path = prefix.clone();
                path.push(name.clone());
                out.insert(name, normalize_relative(module, &path));
            }
        }
        UseTree::Rename(r) => {
            let mut path = prefix.clone();
            path.push(r.ident.to_string());
            out.insert(r.rename.to_string(), normalize_relative(module, &path));
        }
        UseTree::Group(g) => {
            for item in &g.items {
                flatten_use(module, prefix, item, out, globs);
            }
        }
        UseTree::Glob(_) => globs.push(normalize_relative(module, prefix)),
    }
}
