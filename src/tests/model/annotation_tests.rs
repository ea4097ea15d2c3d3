// Annotation model tests

use crate::model::{AnnotationItem, AnnotationValue};

#[test]
fn test_parse_marker_annotation() {
    let annotation = AnnotationItem::parse("@Deprecated").unwrap();
    assert_eq!(annotation.qualified_name, "Deprecated");
    assert!(annotation.attributes.is_empty());
    assert_eq!(annotation.render(), "@Deprecated");
}

#[test]
fn test_parse_single_value() {
    let annotation = AnnotationItem::parse("@SuppressWarnings(\"unchecked\")").unwrap();
    assert_eq!(annotation.attributes.len(), 1);
    assert_eq!(annotation.attributes[0].name, "value");
    assert_eq!(
        annotation.attributes[0].value,
        AnnotationValue::Literal("\"unchecked\"".to_string())
    );
    // The implicit value attribute renders bare
    assert_eq!(annotation.render(), "@SuppressWarnings(\"unchecked\")");
}

#[test]
fn test_parse_named_attributes() {
    let annotation = AnnotationItem::parse("@IntRange(from=0, to=100)").unwrap();
    assert_eq!(annotation.qualified_name, "IntRange");
    assert_eq!(annotation.attributes.len(), 2);
    assert_eq!(annotation.attributes[0].name, "from");
    assert_eq!(annotation.attributes[1].name, "to");
    assert_eq!(annotation.render(), "@IntRange(from=0, to=100)");
}

#[test]
fn test_parse_array_and_nested() {
    let annotation =
        AnnotationItem::parse("@Outer(values={1, 2}, inner=@Inner(3))").unwrap();
    assert_eq!(annotation.attributes.len(), 2);
    match &annotation.attributes[0].value {
        AnnotationValue::Array(values) => assert_eq!(values.len(), 2),
        other => panic!("expected array, got {:?}", other),
    }
    match &annotation.attributes[1].value {
        AnnotationValue::Annotation(inner) => assert_eq!(inner.qualified_name, "Inner"),
        other => panic!("expected annotation, got {:?}", other),
    }
    assert_eq!(annotation.render(), "@Outer(values={1, 2}, inner=@Inner(3))");
}

#[test]
fn test_simple_name() {
    let annotation = AnnotationItem::parse("@androidx.annotation.Nullable").unwrap();
    assert_eq!(annotation.simple_name(), "Nullable");
    assert!(annotation.is_nullness());
}

#[test]
fn test_significance_filtering() {
    assert!(!AnnotationItem::new("androidx.annotation.Nullable").is_significant_in_api());
    assert!(!AnnotationItem::new("Override").is_significant_in_api());
    assert!(!AnnotationItem::new("java.lang.annotation.Retention").is_significant_in_api());
    assert!(AnnotationItem::new("Deprecated").is_significant_in_api());
    assert!(AnnotationItem::new("com.example.Experimental").is_significant_in_api());
}

#[test]
fn test_trailing_garbage_rejected() {
    assert!(AnnotationItem::parse("@Foo junk").is_err());
    assert!(AnnotationItem::parse("no-at-sign").is_err());
}
