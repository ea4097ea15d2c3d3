// TypeItem parsing and rendering tests beyond the inline unit tests

use crate::model::{Nullability, TypeItem, TypeKind};

#[test]
fn test_nested_generics() {
    let ty = TypeItem::parse("java.util.Map<java.lang.String, java.util.List<java.lang.Integer>>")
        .unwrap();
    match &ty.kind {
        TypeKind::Object { qualified_name, type_args } => {
            assert_eq!(qualified_name, "java.util.Map");
            assert_eq!(type_args.len(), 2);
        }
        other => panic!("expected object type, got {:?}", other),
    }
    assert_eq!(
        ty.render(false),
        "java.util.Map<java.lang.String, java.util.List<java.lang.Integer>>"
    );
}

#[test]
fn test_wildcards() {
    let extends = TypeItem::parse("java.util.List<? extends java.lang.Number>").unwrap();
    assert_eq!(extends.render(false), "java.util.List<? extends java.lang.Number>");
    let superb = TypeItem::parse("java.util.List<? super java.lang.Integer>").unwrap();
    assert_eq!(superb.render(false), "java.util.List<? super java.lang.Integer>");
    let unbounded = TypeItem::parse("java.util.List<?>").unwrap();
    assert_eq!(unbounded.render(false), "java.util.List<?>");
}

#[test]
fn test_array_nullability_layers() {
    // Nullable component inside a platform array
    let ty = TypeItem::parse_with_vars("java.lang.String?[]", &[], Nullability::NonNull).unwrap();
    match &ty.kind {
        TypeKind::Array { component, varargs } => {
            assert!(!varargs);
            assert_eq!(component.nullability, Nullability::Nullable);
        }
        other => panic!("expected array, got {:?}", other),
    }
    assert_eq!(ty.nullability, Nullability::NonNull);
    assert_eq!(ty.render(true), "java.lang.String?[]");
}

#[test]
fn test_type_variable_requires_scope() {
    // Without scope, `T` is an object type
    let unscoped = TypeItem::parse("T").unwrap();
    assert!(matches!(unscoped.kind, TypeKind::Object { .. }));
    // With scope, it is a type variable
    let vars = vec!["T".to_string()];
    let scoped = TypeItem::parse_with_vars("T", &vars, Nullability::Platform).unwrap();
    assert!(matches!(scoped.kind, TypeKind::Variable(_)));
}

#[test]
fn test_malformed_types_rejected() {
    assert!(TypeItem::parse("java.util.List<java.lang.String").is_err());
    assert!(TypeItem::parse("int[").is_err());
    assert!(TypeItem::parse("").is_err());
    assert!(TypeItem::parse("void<int>").is_err());
}

#[test]
fn test_suffix_detection() {
    assert!(TypeItem::text_has_null_suffix("java.lang.String?"));
    assert!(TypeItem::text_has_null_suffix("java.lang.String!"));
    assert!(TypeItem::text_has_null_suffix("java.util.List<java.lang.String?>"));
    // Wildcards are not nullability markers
    assert!(!TypeItem::text_has_null_suffix("java.util.List<? extends java.lang.Number>"));
    assert!(!TypeItem::text_has_null_suffix("int[]"));
}
