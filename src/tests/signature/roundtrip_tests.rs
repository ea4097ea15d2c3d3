// Signature round-trip tests: parse -> write reproduces canonical input,
// and parse(write(cb)) == cb.

use super::parse;
use crate::signature::{FileFormat, SignatureParser, SignatureWriter};

fn assert_fixed_point(text: &str, format: FileFormat) {
    let codebase = parse(text);
    let written = SignatureWriter::new(format).write(&codebase);
    assert_eq!(written, text, "writer did not reproduce canonical input");
    let reparsed = SignatureParser::parse(&written).unwrap();
    assert_eq!(reparsed, codebase, "parse(write(cb)) != cb");
}

#[test]
fn test_roundtrip_v2() {
    let text = "\
// Signature format: 2.0
package test.pkg {

  public abstract class Shape {
    ctor public Shape();
    method public abstract double area();
    method public java.lang.String name();
    field public static final int VERSION = 3;
  }

  public final class Util {
    ctor public Util(int);
    method public static void log(java.lang.String, java.lang.Object...);
  }

}
";
    assert_fixed_point(text, FileFormat::V2);
}

#[test]
fn test_roundtrip_v3_with_nulls() {
    let text = "\
// Signature format: 3.0
package test.pkg {

  public interface Repo {
    method public java.util.List<test.pkg.User!> all();
    method public test.pkg.User? find(java.lang.String name);
  }

  public final class User {
    ctor public User(java.lang.String name);
    property public final val java.lang.String name;
  }

}
";
    assert_fixed_point(text, FileFormat::V3);
}

#[test]
fn test_roundtrip_v4_with_optional() {
    let text = "\
// Signature format: 4.0
package test.pkg {

  public final class Config {
    ctor public Config(optional int limit);
    method public java.lang.String render(optional java.lang.String prefix);
  }

}
";
    assert_fixed_point(text, FileFormat::V4);
}

#[test]
fn test_roundtrip_enum_and_annotations() {
    let text = "\
// Signature format: 3.0
package test.pkg {

  public @interface Size {
    method public abstract int value() default 0;
  }

  public enum State {
    method public boolean isLive();
    enum_constant public static final test.pkg.State ACTIVE;
    enum_constant public static final test.pkg.State DELETED;
  }

}
";
    assert_fixed_point(text, FileFormat::V3);
}

#[test]
fn test_roundtrip_deprecated_annotation() {
    let text = "\
// Signature format: 2.0
package test.pkg {

  public class Legacy {
    method @Deprecated public void oldWay();
  }

}
";
    assert_fixed_point(text, FileFormat::V2);
}

#[test]
fn test_roundtrip_two_packages() {
    let text = "\
// Signature format: 2.0
package aaa.first {

  public class A {
  }

}

package zzz.second {

  public class Z {
  }

}
";
    assert_fixed_point(text, FileFormat::V2);
}

#[test]
fn test_generics_and_inheritance_roundtrip() {
    let text = "\
// Signature format: 3.0
package test.pkg {

  public abstract class Container<T extends java.lang.Number> extends test.pkg.Base implements java.lang.Iterable<T> {
    ctor public Container();
    method public abstract T first();
    method public <R> java.util.List<R!> map(R seed);
  }

}
";
    assert_fixed_point(text, FileFormat::V3);
}
