/// Ordering tests: every reachable function once, callees before callers.

use shadergraph::domain::function::ShaderMarkers;
use shadergraph::infrastructure::SynSymbolResolver;
use shadergraph::{discover, DiscoveryError, FunctionIdentity};

fn resolver(sources: &[(&str, &str)]) -> SynSymbolResolver {
    let owned: Vec<(String, String, String)> = sources
        .iter()
        .map(|(module, code)| (module.to_string(), format!("{}.rs", module.replace("::", "/")), code.to_string()))
        .collect();
    SynSymbolResolver::from_sources(&owned)
}

fn order(r: &SynSymbolResolver, root: &str) -> Vec<String> {
    discover(r, &ShaderMarkers::default(), &FunctionIdentity::parse(root).unwrap())
        .unwrap()
        .into_iter()
        .map(|f| f.function.identity.to_string())
        .collect()
}

fn position(order: &[String], name: &str) -> usize {
    order.iter().position(|n| n == name).unwrap_or_else(|| panic!("{} missing from {:?}", name, order))
}

#[test]
fn diamond_dependency_is_emitted_once_before_both_callers() {
    let r = resolver(&[(
        "shaders",
        r#"
        #[fragment_shader]
        fn root() { b(); c(); }
        fn b() { d(); }
        fn c() { d(); }
        fn d() {}
        "#,
    )]);
    let order = order(&r, "shaders::root");
    assert_eq!(order.len(), 4);
    assert_eq!(order.iter().filter(|n| *n == "shaders::d").count(), 1);
    let d = position(&order, "shaders::d");
    assert!(d < position(&order, "shaders::b"));
    assert!(d < position(&order, "shaders::c"));
    assert_eq!(order.last().unwrap(), "shaders::root");
}

#[test]
fn builtins_are_not_emitted_and_not_errors() {
    let r = resolver(&[(
        "shaders",
        r#"
        #[vertex_shader]
        fn vs(pos: Vec3) -> Vec4 {
            let n = ShaderBuiltins::sqrt(pos.length());
            Vec4::new(n, n, n, 1.0)
        }
        "#,
    )]);
    assert_eq!(order(&r, "shaders::vs"), vec!["shaders::vs"]);
}

#[test]
fn missing_root_fails_without_output() {
    let r = resolver(&[("shaders", "fn present() {}")]);
    let err = discover(&r, &ShaderMarkers::default(), &FunctionIdentity::new("shaders", "absent")).unwrap_err();
    assert_eq!(
        err,
        DiscoveryError::RootResolution {
            root: FunctionIdentity::new("shaders", "absent")
        }
    );
}

#[test]
fn calls_across_modules_and_types() {
    let r = resolver(&[
        (
            "shaders",
            r#"
            use crate::lighting::Phong;
            pub struct Pass;
            impl Pass {
                #[fragment_shader]
                pub fn fs(&self, n: Vec3) -> Vec4 {
                    let c = Phong::shade(n);
                    self.tonemap(c)
                }
                fn tonemap(&self, c: Vec4) -> Vec4 { crate::math::saturate(c) }
            }
            "#,
        ),
        (
            "shaders::lighting",
            r#"
            use super::math::saturate;
            pub struct Phong;
            impl Phong {
                pub fn shade(n: Vec3) -> Vec4 { saturate(Self::diffuse(n)) }
                fn diffuse(n: Vec3) -> Vec4 { n.extend(1.0) }
            }
            "#,
        ),
        ("shaders::math", "pub fn saturate(v: Vec4) -> Vec4 { v.clamp(0.0, 1.0) }"),
    ]);
    let order = order(&r, "shaders::Pass::fs");
    assert_eq!(
        order,
        vec![
            "shaders::math::saturate",
            "shaders::lighting::Phong::diffuse",
            "shaders::lighting::Phong::shade",
            "shaders::Pass::tonemap",
            "shaders::Pass::fs",
        ]
    );
}

#[test]
fn unreachable_functions_are_left_out() {
    let r = resolver(&[(
        "shaders",
        r#"
        #[compute_shader(1, 1, 1)]
        fn cs() { used(); }
        fn used() {}
        fn unused() { used(); }
        "#,
    )]);
    assert_eq!(order(&r, "shaders::cs"), vec!["shaders::used", "shaders::cs"]);
}

#[test]
fn every_callee_precedes_its_caller_in_a_wide_graph() {
    // Layered DAG: each function in layer k calls two functions in layer k+1.
    let layers = 5;
    let width = 4;
    let mut code = String::from("#[vertex_shader] fn root() { f_0_0(); f_0_1(); }\n");
    for layer in 0..layers {
        for i in 0..width {
            let body = if layer + 1 < layers {
                format!("f_{}_{}(); f_{}_{}();", layer + 1, i, layer + 1, (i + 1) % width)
            } else {
                String::new()
            };
            code.push_str(&format!("fn f_{}_{}() {{ {} }}\n", layer, i, body));
        }
    }
    let r = resolver(&[("shaders", code.as_str())]);
    let order = order(&r, "shaders::root");

    let mut unique = order.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), order.len());

    for layer in 0..layers - 1 {
        for i in 0..width {
            let caller = format!("shaders::f_{}_{}", layer, i);
            if !order.contains(&caller) {
                continue;
            }
            for callee in [i, (i + 1) % width] {
                let callee = format!("shaders::f_{}_{}", layer + 1, callee);
                assert!(position(&order, &callee) < position(&order, &caller), "{} before {}", callee, caller);
            }
        }
    }
}

#[test]
fn calls_inside_macros_are_discovered() {
    let r = resolver(&[(
        "shaders",
        r#"
        fn helper() -> f32 { 1.0 }
        fn fill() -> f32 { 0.0 }
        #[fragment_shader]
        fn root() -> f32 {
            let v = vec![helper()];
            let w = vec![fill(); 4];
            debug_assert!(helper() > 0.0);
            v[0] + w[0]
        }
        "#,
    )]);
    assert_eq!(order(&r, "shaders::root"), vec!["shaders::helper", "shaders::fill", "shaders::root"]);
}

#[test]
fn macro_body_that_is_not_an_expression_list_is_an_error() {
    let r = resolver(&[("shaders", "fn helper() {} fn root() { swizzle!(v => helper()); }")]);
    let err = discover(&r, &ShaderMarkers::default(), &FunctionIdentity::new("shaders", "root")).unwrap_err();
    assert!(matches!(err, DiscoveryError::UnresolvedCall { .. }), "{:?}", err);
}

#[test]
fn glob_imported_functions_are_discovered() {
    let r = resolver(&[(
        "shaders",
        r#"
        fn helper() {}
        mod inner { use super::*; pub fn root() { helper(); } }
        "#,
    )]);
    assert_eq!(order(&r, "shaders::inner::root"), vec!["shaders::helper", "shaders::inner::root"]);
}

#[test]
fn ambiguous_glob_imports_are_an_error() {
    let r = resolver(&[
        ("shaders", "pub fn blend() {} mod inner { use super::*; use crate::math::*; pub fn root() { blend(); } }"),
        ("shaders::math", "pub fn blend() {}"),
    ]);
    let err = discover(&r, &ShaderMarkers::default(), &FunctionIdentity::new("shaders::inner", "root")).unwrap_err();
    assert!(matches!(err, DiscoveryError::UnresolvedCall { .. }), "{:?}", err);
}

#[test]
fn calling_a_local_closure_is_an_error() {
    let r = resolver(&[("shaders", "fn root() -> f32 { let f = |x: f32| x; f(1.0) }")]);
    let err = discover(&r, &ShaderMarkers::default(), &FunctionIdentity::new("shaders", "root")).unwrap_err();
    match err {
        DiscoveryError::UnresolvedCall { caller, call } => {
            assert_eq!(caller, FunctionIdentity::new("shaders", "root"));
            assert!(call.starts_with('f'), "{}", call);
        }
        other => panic!("expected an unresolved call, got {:?}", other),
    }
}
