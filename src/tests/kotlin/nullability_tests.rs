// Kotlin nullability extraction tests

use super::extract;
use crate::model::Nullability;

#[test]
fn test_nullable_suffix_on_types() {
    let code = r#"
package com.example

class Finder {
    fun find(key: String): String? = null

    fun describe(input: String?): String = input ?: ""
}
"#;

    let api = extract(code);
    let finder = api.classes.iter().find(|c| c.name == "Finder").unwrap();

    let find = finder.methods.iter().find(|m| m.name == "find").unwrap();
    assert_eq!(find.return_type.nullability, Nullability::Nullable);
    assert_eq!(find.parameters[0].ty.nullability, Nullability::NonNull);

    let describe = finder.methods.iter().find(|m| m.name == "describe").unwrap();
    assert_eq!(describe.parameters[0].ty.nullability, Nullability::Nullable);
    assert_eq!(describe.return_type.nullability, Nullability::NonNull);
}

#[test]
fn test_nullable_property_and_generics() {
    let code = r#"
package com.example

class Cache {
    var last: String? = null

    fun entries(): Map<String, String?> = mapOf()
}
"#;

    let api = extract(code);
    let cache = api.classes.iter().find(|c| c.name == "Cache").unwrap();

    let last = cache.properties.iter().find(|p| p.name == "last").unwrap();
    assert_eq!(last.ty.nullability, Nullability::Nullable);

    let entries = cache.methods.iter().find(|m| m.name == "entries").unwrap();
    assert_eq!(entries.return_type.render(true), "Map<String, String?>");
}

#[test]
fn test_kotlin_never_produces_platform_types() {
    let code = r#"
package com.example

class Plain {
    fun echo(value: String): String = value
}
"#;

    let api = extract(code);
    let plain = api.classes.iter().find(|c| c.name == "Plain").unwrap();
    let echo = plain.methods.iter().find(|m| m.name == "echo").unwrap();
    assert_eq!(echo.return_type.nullability, Nullability::NonNull);
    assert_eq!(echo.parameters[0].ty.nullability, Nullability::NonNull);
}
