#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::descriptor::{Creator, Family, TypeKind};
use bidl_diagnostic::DiagnosticQueue;
use bidl_ir::{InterfaceDecl, ParcelableDecl};
use pretty_assertions::assert_eq;

fn site(line: u32) -> DeclSite {
    DeclSite::new("Foo.aidl", line)
}

fn registry_with_foo() -> Registry {
    let mut registry = Registry::new();
    let mut diags = DiagnosticQueue::new();
    assert!(registry.register_parcelable(&ParcelableDecl::new("pkg", "Foo", site(1)), &mut diags));
    registry
}

// === Plain names ===

#[test]
fn test_resolve_declared_parcelable() {
    let mut registry = registry_with_foo();
    let id = registry.resolve("pkg.Foo").unwrap();
    let desc = registry.get(id);
    assert_eq!(desc.qualified_name(), "pkg.Foo");
    assert_eq!(desc.kind(), TypeKind::UserRecord);
    assert!(desc.can_marshal_directly());
    assert!(desc.supports_array_form());
}

#[test]
fn test_short_name_fallback_on_builtins() {
    let mut registry = Registry::new();
    assert_eq!(registry.resolve("String"), Ok(TypeId::STRING));
    assert_eq!(registry.resolve("IBinder"), Ok(TypeId::IBINDER));
    assert_eq!(registry.resolve("int"), Ok(TypeId::INT));
}

#[test]
fn test_unknown_plain_name() {
    let mut registry = Registry::new();
    assert_eq!(
        registry.resolve("pkg.Missing"),
        Err(ResolveError::Unknown("pkg.Missing".to_string()))
    );
}

#[test]
fn test_interface_companions_resolve_as_generated() {
    let mut registry = Registry::new();
    let mut diags = DiagnosticQueue::new();
    assert!(registry.register_interface(&InterfaceDecl::new("pkg", "Bar", site(4)), &mut diags));

    for name in ["pkg.Bar.Stub", "pkg.Bar.Stub.Proxy"] {
        let id = registry.resolve(name).unwrap();
        assert_eq!(registry.get(id).kind(), TypeKind::Generated, "{name}");
    }
}

// === Generic instantiation ===

#[test]
fn test_list_of_string_is_memoized() {
    let mut registry = Registry::new();
    let before = registry.len();

    let first = registry.resolve("List<String>").unwrap();
    let desc = registry.get(first);
    assert_eq!(desc.qualified_name(), "java.util.List<java.lang.String>");
    assert_eq!(desc.generic_args(), &[TypeId::STRING]);
    assert_eq!(desc.generic_arguments(), "<java.lang.String>");
    assert_eq!(desc.import_type(), "java.util.List");
    assert_eq!(desc.instantiable_name(), "java.util.ArrayList<java.lang.String>");
    assert_eq!(desc.creator(), Creator::ArrayList);

    let second = registry.resolve("List<String>").unwrap();
    assert_eq!(first, second);
    assert_eq!(registry.len(), before + 1);
}

#[test]
fn test_spellings_share_one_instantiation() {
    let mut registry = Registry::new();
    let a = registry.resolve("List<String>").unwrap();
    let b = registry.resolve("java.util.List< java.lang.String >").unwrap();
    let c = registry.resolve("java.util.List<java.lang.String>").unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn test_element_creator_captured() {
    let mut registry = registry_with_foo();
    let foo = registry.resolve("pkg.Foo").unwrap();
    let list = registry.resolve("List<pkg.Foo>").unwrap();
    assert_eq!(
        registry.get(list).family(),
        &Family::GenericList {
            element: foo,
            element_creator: Creator::Typed(foo),
        }
    );
}

#[test]
fn test_nested_list_resolves_recursively() {
    let mut registry = Registry::new();
    let outer = registry.resolve("List<List<String>>").unwrap();
    let inner = registry.find_exact("java.util.List<java.lang.String>").unwrap();
    assert_eq!(registry.get(outer).generic_args(), &[inner]);
    assert_eq!(
        registry.get(outer).qualified_name(),
        "java.util.List<java.util.List<java.lang.String>>"
    );
}

#[test]
fn test_unknown_argument_registers_nothing() {
    let mut registry = Registry::new();
    let before = registry.len();
    assert_eq!(
        registry.resolve("List<pkg.Foo>"),
        Err(ResolveError::Unknown("pkg.Foo".to_string()))
    );
    assert_eq!(registry.len(), before);
}

#[test]
fn test_unknown_template() {
    let mut registry = Registry::new();
    assert_eq!(
        registry.resolve("Set<String>"),
        Err(ResolveError::UnknownTemplate("Set".to_string()))
    );
}

#[test]
fn test_arity_mismatch() {
    let mut registry = Registry::new();
    assert_eq!(
        registry.resolve("List<String,String>"),
        Err(ResolveError::ArityMismatch {
            template: "java.util.List".to_string(),
            expected: 1,
            found: 2,
        })
    );
}

#[test]
fn test_map_instantiation_fails_closed() {
    let mut registry = Registry::new();
    let before = registry.len();
    let err = registry.resolve("Map<String,int>").unwrap_err();
    assert_eq!(err, ResolveError::NoFactory("java.util.Map".to_string()));
    assert!(err.is_internal());
    assert_eq!(registry.len(), before);
}

#[test]
fn test_malformed_references() {
    let mut registry = Registry::new();
    for text in ["List<String", "List<>", "<String>", "List<String,>", "List<A>B>"] {
        assert!(
            matches!(registry.resolve(text), Err(ResolveError::Malformed(_))),
            "{text}"
        );
    }
}

fn nested_list(depth: usize) -> String {
    format!("{}String{}", "List<".repeat(depth), ">".repeat(depth))
}

#[test]
fn test_nesting_depth_is_bounded() {
    let mut registry = Registry::new();
    let deepest = registry.resolve(&nested_list(super::parse::MAX_NESTING)).unwrap();
    assert_eq!(
        registry.get(deepest).generic_args().len(),
        1,
        "deepest accepted nesting resolves"
    );

    let before = registry.len();
    assert!(matches!(
        registry.resolve(&nested_list(super::parse::MAX_NESTING + 1)),
        Err(ResolveError::Malformed(_))
    ));
    assert!(matches!(
        registry.resolve(&nested_list(100_000)),
        Err(ResolveError::Malformed(_))
    ));
    assert_eq!(registry.len(), before);
}

// === Parsing ===

#[test]
fn test_parse_splits_top_level_commas() {
    let parsed = parse_generic("Map<String,List<String>>").unwrap();
    assert_eq!(parsed.base, "Map");
    assert_eq!(parsed.args.as_slice(), &["String", "List<String>"]);
}

#[test]
fn test_parse_nested_map_argument() {
    let parsed = parse_generic("List<Map<A,B>>").unwrap();
    assert_eq!(parsed.args.as_slice(), &["Map<A,B>"]);
}

// === Diagnostics ===

#[test]
fn test_error_codes_and_diagnostics() {
    let err = ResolveError::Unknown("pkg.Missing".to_string());
    assert!(!err.is_internal());
    let diag = err.to_diagnostic(Some(site(9)));
    assert_eq!(diag.code, ErrorCode::E2003);
    assert_eq!(diag.message, "unknown type pkg.Missing");
    assert_eq!(diag.primary_site(), Some(&site(9)));

    let ice = ResolveError::NoFactory("java.util.Map".to_string()).to_diagnostic(None);
    assert_eq!(ice.code, ErrorCode::E9001);
}

// === Property tests ===

#[allow(
    clippy::disallowed_types,
    reason = "proptest macros internally use Arc"
)]
mod proptest_whitespace {
    use crate::registry::Registry;
    use proptest::prelude::*;

    fn sprinkle(parts: &[&str], gaps: &[String]) -> String {
        let mut out = String::new();
        for (i, part) in parts.iter().enumerate() {
            out.push_str(&gaps[i % gaps.len()]);
            out.push_str(part);
        }
        out
    }

    proptest! {
        #[test]
        fn whitespace_never_changes_the_instantiation(
            gaps in proptest::collection::vec("[ \t\n]{0,3}", 1..8)
        ) {
            let mut registry = Registry::new();
            let canonical = registry.resolve("List<List<String>>").unwrap();
            let spaced = sprinkle(&["List", "<", "List", "<", "String", ">", ">"], &gaps);
            let resolved = registry.resolve(&spaced);
            prop_assert_eq!(resolved, Ok(canonical), "text {:?}", spaced);
        }
    }
}
