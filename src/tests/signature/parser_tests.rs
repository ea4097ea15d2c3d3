// Signature parser tests

use super::parse;
use crate::error::SignatureError;
use crate::model::{ClassKind, FieldValue, Nullability, TypeKind, Visibility};
use crate::signature::SignatureParser;

#[test]
fn test_parse_class_block() {
    let text = "\
// Signature format: 2.0
package test.pkg {

  public abstract class Foo<T> extends test.pkg.Base implements test.pkg.I {
    ctor public Foo(int);
    method public abstract T get(int index);
    method public static void log(java.lang.String...);
    field public static final int LIMIT = 100;
  }

  public interface I {
  }

}
";
    let codebase = parse(text);
    let foo = codebase.find_class("test.pkg.Foo").unwrap();
    assert_eq!(foo.kind, ClassKind::Class);
    assert_eq!(foo.modifiers.visibility, Visibility::Public);
    assert!(foo.modifiers.is_abstract);
    assert_eq!(foo.type_parameters, vec!["T".to_string()]);
    assert_eq!(
        foo.super_class.as_ref().unwrap().qualified_name(),
        Some("test.pkg.Base")
    );
    assert_eq!(foo.interfaces.len(), 1);

    assert_eq!(foo.constructors.len(), 1);
    assert_eq!(foo.constructors[0].parameters.len(), 1);

    let get = foo.find_method("get", "int").unwrap();
    // The return type resolves against the class type parameters
    assert!(matches!(get.return_type.kind, TypeKind::Variable(_)));
    assert_eq!(get.parameters[0].name.as_deref(), Some("index"));

    let log = foo.find_method("log", "java.lang.String[]").unwrap();
    assert!(log.parameters[0].ty.is_varargs());
    assert!(log.modifiers.is_static);

    let limit = foo.find_field("LIMIT").unwrap();
    assert_eq!(limit.value, Some(FieldValue::Int(100)));

    let interface = codebase.find_class("test.pkg.I").unwrap();
    assert_eq!(interface.kind, ClassKind::Interface);
}

#[test]
fn test_parse_nullability_annotations_v2() {
    let text = "\
// Signature format: 2.0
package test.pkg {

  public class Finder {
    method public @androidx.annotation.Nullable java.lang.String find(@androidx.annotation.NonNull java.lang.String key);
  }

}
";
    let codebase = parse(text);
    let finder = codebase.find_class("test.pkg.Finder").unwrap();
    let find = finder.find_method("find", "java.lang.String").unwrap();
    assert_eq!(find.return_type.nullability, Nullability::Nullable);
    assert_eq!(find.parameters[0].ty.nullability, Nullability::NonNull);
    // Nullness annotations live on types, not on the item
    assert!(find.modifiers.annotations.is_empty());
}

#[test]
fn test_parse_kotlin_style_nulls_v3() {
    let text = "\
// Signature format: 3.0
package test.pkg {

  public final class Util {
    method public java.lang.String? find(java.lang.String name);
    method public java.lang.String! platform();
  }

}
";
    let codebase = parse(text);
    let util = codebase.find_class("test.pkg.Util").unwrap();

    let find = util.find_method("find", "java.lang.String").unwrap();
    assert_eq!(find.return_type.nullability, Nullability::Nullable);
    // Unmarked types are non-null in kotlin-style formats
    assert_eq!(find.parameters[0].ty.nullability, Nullability::NonNull);

    let platform = util.find_method("platform", "").unwrap();
    assert_eq!(platform.return_type.nullability, Nullability::Platform);
}

#[test]
fn test_suffixes_rejected_in_v2() {
    let text = "\
// Signature format: 2.0
package test.pkg {

  public class Bad {
    method public java.lang.String? broken();
  }

}
";
    let error = SignatureParser::parse(text).unwrap_err();
    match error {
        SignatureError::Parse { line, message } => {
            assert_eq!(line, 5);
            assert!(message.contains("not allowed in format 2.0"), "{}", message);
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_parse_enum_and_annotation_members() {
    let text = "\
// Signature format: 3.0
package test.pkg {

  public enum Kind {
    enum_constant public static final test.pkg.Kind ACTIVE;
  }

  public @interface Size {
    method public abstract int value() default 0;
  }

}
";
    let codebase = parse(text);

    let kind = codebase.find_class("test.pkg.Kind").unwrap();
    assert_eq!(kind.kind, ClassKind::Enum);
    assert_eq!(kind.enum_constants.len(), 1);
    assert!(kind.enum_constants[0].is_enum_constant);

    let size = codebase.find_class("test.pkg.Size").unwrap();
    assert_eq!(size.kind, ClassKind::Annotation);
    let value = size.find_method("value", "").unwrap();
    assert_eq!(value.default_value.as_deref(), Some("0"));
}

#[test]
fn test_parse_properties_and_defaults_v4() {
    let text = "\
// Signature format: 4.0
package test.pkg {

  public final class Config {
    ctor public Config(optional int limit);
    property public final val java.lang.String name;
  }

}
";
    let codebase = parse(text);
    let config = codebase.find_class("test.pkg.Config").unwrap();

    assert_eq!(config.constructors.len(), 1);
    let param = &config.constructors[0].parameters[0];
    assert!(param.has_default);
    assert_eq!(param.name.as_deref(), Some("limit"));

    assert_eq!(config.properties.len(), 1);
    let name = &config.properties[0];
    assert_eq!(name.name, "name");
    assert!(!name.is_mutable);
}

#[test]
fn test_parse_throws_and_merging() {
    let text = "\
// Signature format: 2.0
package test.pkg {

  public class Client {
    method public void connect() throws java.io.IOException, java.lang.InterruptedException;
  }

  public class Client {
    method public void close();
  }

}
";
    let codebase = parse(text);
    let client = codebase.find_class("test.pkg.Client").unwrap();
    // Duplicate class blocks merge their members
    assert!(client.find_method("connect", "").is_some());
    assert!(client.find_method("close", "").is_some());
    assert_eq!(
        client.find_method("connect", "").unwrap().throws,
        vec![
            "java.io.IOException".to_string(),
            "java.lang.InterruptedException".to_string()
        ]
    );
}

#[test]
fn test_unknown_modifier_is_an_error_with_line() {
    let text = "\
// Signature format: 2.0
package test.pkg {
  bogus class Foo {
  }
}
";
    let error = SignatureParser::parse(text).unwrap_err();
    match error {
        SignatureError::Parse { line, message } => {
            assert_eq!(line, 3);
            assert!(message.contains("bogus"), "{}", message);
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_parse_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("current.txt");
    std::fs::write(
        &path,
        "// Signature format: 2.0\npackage test.pkg {\n\n  public class A {\n  }\n\n}\n",
    )
    .unwrap();
    let codebase = SignatureParser::parse_file(&path).unwrap();
    assert!(codebase.find_class("test.pkg.A").is_some());
    assert_eq!(codebase.description, path.display().to_string());
}

#[test]
fn test_varargs_must_be_last() {
    let text = "\
// Signature format: 2.0
package test.pkg {

  public class Bad {
    method public void log(java.lang.String..., int);
  }

}
";
    assert!(SignatureParser::parse(text).is_err());
}
