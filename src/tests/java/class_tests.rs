// Java class extraction tests

use super::extract;
use crate::model::{ClassKind, Visibility};

#[test]
fn test_extract_class_definitions_with_modifiers() {
    let code = r#"
package com.example;

public class User {
    private String name;
    public int age;
}

abstract class Animal {
    public abstract void makeSound();
}

final class Constants {
}
"#;

    let api = extract(code);
    assert_eq!(api.package, "com.example");

    let user = api.classes.iter().find(|c| c.name == "User").unwrap();
    assert_eq!(user.kind, ClassKind::Class);
    assert_eq!(user.qualified_name, "com.example.User");
    assert_eq!(user.modifiers.visibility, Visibility::Public);

    let animal = api.classes.iter().find(|c| c.name == "Animal").unwrap();
    assert!(animal.modifiers.is_abstract);
    assert_eq!(animal.modifiers.visibility, Visibility::PackagePrivate);

    let constants = api.classes.iter().find(|c| c.name == "Constants").unwrap();
    assert!(constants.modifiers.is_final);
}

#[test]
fn test_extract_interface_and_inheritance() {
    let code = r#"
package com.example;

public interface Shape {
    double area();
}

public class Circle extends Base implements Shape {
}

class Base {
}
"#;

    let api = extract(code);

    let shape = api.classes.iter().find(|c| c.name == "Shape").unwrap();
    assert_eq!(shape.kind, ClassKind::Interface);
    // Interface members are implicitly public
    let area = shape.methods.iter().find(|m| m.name == "area").unwrap();
    assert_eq!(area.modifiers.visibility, Visibility::Public);

    let circle = api.classes.iter().find(|c| c.name == "Circle").unwrap();
    // Same-file types are qualified against the package
    assert_eq!(
        circle.super_class.as_ref().unwrap().qualified_name(),
        Some("com.example.Base")
    );
    assert_eq!(circle.interfaces.len(), 1);
    assert_eq!(
        circle.interfaces[0].qualified_name(),
        Some("com.example.Shape")
    );
}

#[test]
fn test_extract_enum_with_constants() {
    let code = r#"
package com.example;

public enum Kind {
    ACTIVE,
    DELETED;

    public boolean isLive() {
        return this == ACTIVE;
    }
}
"#;

    let api = extract(code);
    let kind = api.classes.iter().find(|c| c.name == "Kind").unwrap();
    assert_eq!(kind.kind, ClassKind::Enum);
    assert_eq!(kind.enum_constants.len(), 2);

    let active = kind
        .enum_constants
        .iter()
        .find(|c| c.name == "ACTIVE")
        .unwrap();
    assert!(active.is_enum_constant);
    assert!(active.modifiers.is_static && active.modifiers.is_final);
    assert_eq!(active.ty.qualified_name(), Some("com.example.Kind"));

    // Members declared after the constants are still extracted
    assert!(kind.methods.iter().any(|m| m.name == "isLive"));
}

#[test]
fn test_extract_nested_classes_flattened() {
    let code = r#"
package com.example;

public class Outer {
    public static class Inner {
        public Inner() {}
    }
}
"#;

    let api = extract(code);
    assert!(api.classes.iter().any(|c| c.name == "Outer"));
    let inner = api.classes.iter().find(|c| c.name == "Outer.Inner").unwrap();
    assert_eq!(inner.qualified_name, "com.example.Outer.Inner");
    assert!(inner.modifiers.is_static);
    assert_eq!(inner.constructors.len(), 1);
}

#[test]
fn test_extract_record_as_final_class() {
    let code = r#"
package com.example;

public record Point(int x, int y) {
}
"#;

    let api = extract(code);
    let point = api.classes.iter().find(|c| c.name == "Point").unwrap();
    assert_eq!(point.kind, ClassKind::Class);
    assert!(point.modifiers.is_final);
    assert_eq!(point.constructors.len(), 1);
    assert_eq!(point.constructors[0].parameters.len(), 2);
}

#[test]
fn test_extract_generic_class() {
    let code = r#"
package com.example;

public class Box<T extends Number> {
    public T unwrap() {
        return null;
    }
}
"#;

    let api = extract(code);
    let boxed = api.classes.iter().find(|c| c.name == "Box").unwrap();
    assert_eq!(boxed.type_parameters, vec!["T extends Number".to_string()]);
    assert_eq!(boxed.type_variable_names(), vec!["T".to_string()]);

    // The return type resolves to the type variable in scope
    let unwrap = boxed.methods.iter().find(|m| m.name == "unwrap").unwrap();
    assert_eq!(unwrap.return_type.render(false), "T");
    assert_eq!(unwrap.return_type.erased_signature(), "java.lang.Object");
}
