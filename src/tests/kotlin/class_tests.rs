// Kotlin class/object extraction tests

use super::extract;
use crate::model::{ClassKind, Visibility};

#[test]
fn test_extract_class_kinds() {
    let code = r#"
package com.example

class Session

open class Connection

data class Point(val x: Int, val y: Int)

interface Closeable {
    fun close()
}

object Registry {
    fun size(): Int = 0
}
"#;

    let api = extract(code);
    assert_eq!(api.package, "com.example");

    let session = api.classes.iter().find(|c| c.name == "Session").unwrap();
    assert_eq!(session.kind, ClassKind::Class);
    assert_eq!(session.modifiers.visibility, Visibility::Public);
    // Kotlin classes are closed unless opened
    assert!(session.modifiers.is_final);

    let connection = api.classes.iter().find(|c| c.name == "Connection").unwrap();
    assert!(connection.modifiers.is_open);
    assert!(!connection.modifiers.is_final);

    let point = api.classes.iter().find(|c| c.name == "Point").unwrap();
    assert!(point.modifiers.is_data);
    assert_eq!(point.constructors.len(), 1);
    assert_eq!(point.constructors[0].parameters.len(), 2);
    // val constructor parameters become properties
    assert_eq!(point.properties.len(), 2);

    let closeable = api.classes.iter().find(|c| c.name == "Closeable").unwrap();
    assert_eq!(closeable.kind, ClassKind::Interface);

    let registry = api.classes.iter().find(|c| c.name == "Registry").unwrap();
    assert_eq!(registry.kind, ClassKind::Object);
}

#[test]
fn test_extract_enum_class() {
    let code = r#"
package com.example

enum class Color {
    RED,
    GREEN
}
"#;

    let api = extract(code);
    let color = api.classes.iter().find(|c| c.name == "Color").unwrap();
    assert_eq!(color.kind, ClassKind::Enum);
    assert_eq!(color.enum_constants.len(), 2);
    assert!(color.enum_constants.iter().any(|c| c.name == "RED"));
    assert_eq!(
        color.enum_constants[0].ty.qualified_name(),
        Some("com.example.Color")
    );
}

#[test]
fn test_extract_supertypes() {
    let code = r#"
package com.example

open class Base

interface Marker

class Derived : Base(), Marker
"#;

    let api = extract(code);
    let derived = api.classes.iter().find(|c| c.name == "Derived").unwrap();
    // The constructor invocation marks the superclass
    assert_eq!(
        derived.super_class.as_ref().unwrap().qualified_name(),
        Some("com.example.Base")
    );
    assert_eq!(derived.interfaces.len(), 1);
    assert_eq!(
        derived.interfaces[0].qualified_name(),
        Some("com.example.Marker")
    );
}

#[test]
fn test_extract_companion_object() {
    let code = r#"
package com.example

class Holder {
    companion object {
        fun create(): Holder = Holder()
    }
}
"#;

    let api = extract(code);
    assert!(api.classes.iter().any(|c| c.name == "Holder"));
    let companion = api
        .classes
        .iter()
        .find(|c| c.name == "Holder.Companion")
        .unwrap();
    assert_eq!(companion.kind, ClassKind::Object);
    assert!(companion.modifiers.is_companion);
    assert!(companion.methods.iter().any(|m| m.name == "create"));
}

#[test]
fn test_internal_visibility() {
    let code = r#"
package com.example

internal class Hidden
"#;

    let api = extract(code);
    let hidden = api.classes.iter().find(|c| c.name == "Hidden").unwrap();
    assert_eq!(hidden.modifiers.visibility, Visibility::Internal);
}
