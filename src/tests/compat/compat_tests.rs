// Compatibility policy tests

use super::parse;
use crate::compat::{check_compatibility, IncompatibilityKind, Severity};

const BASELINE: &str = "\
// Signature format: 3.0
package test.pkg {

  public class Api {
    ctor public Api();
    method public void log(java.lang.String? message);
    method public java.lang.String! name();
    field public static final int LIMIT = 10;
  }

}
";

#[test]
fn test_identical_codebases_are_compatible() {
    let old = parse(BASELINE);
    let new = parse(BASELINE);
    let report = check_compatibility(&old, &new);
    assert!(report.is_empty(), "unexpected findings: {:?}", report.findings);
}

#[test]
fn test_removed_class_and_method() {
    let old = parse(BASELINE);
    let new = parse(
        "\
// Signature format: 3.0
package test.pkg {

  public class Api {
    ctor public Api();
    method public java.lang.String! name();
    field public static final int LIMIT = 10;
  }

}
",
    );
    let report = check_compatibility(&old, &new);
    assert_eq!(report.findings.len(), 1);
    let finding = &report.findings[0];
    assert_eq!(finding.kind, IncompatibilityKind::RemovedMethod);
    assert_eq!(finding.severity, Severity::Error);
    assert_eq!(finding.path, "test.pkg.Api#log(java.lang.String)");

    let gone = parse("// Signature format: 3.0\n");
    let report = check_compatibility(&old, &gone);
    assert!(report
        .findings
        .iter()
        .any(|f| f.kind == IncompatibilityKind::RemovedClass));
}

#[test]
fn test_visibility_narrowing() {
    let old = parse(BASELINE);
    let new = parse(
        "\
// Signature format: 3.0
package test.pkg {

  public class Api {
    ctor public Api();
    method protected void log(java.lang.String? message);
    method public java.lang.String! name();
    field public static final int LIMIT = 10;
  }

}
",
    );
    let report = check_compatibility(&old, &new);
    assert!(report
        .findings
        .iter()
        .any(|f| f.kind == IncompatibilityKind::VisibilityNarrowed
            && f.severity == Severity::Error));
}

#[test]
fn test_nullability_direction() {
    let old = parse(BASELINE);

    // Tightening: the parameter stops accepting null
    let tightened = parse(
        "\
// Signature format: 3.0
package test.pkg {

  public class Api {
    ctor public Api();
    method public void log(java.lang.String message);
    method public java.lang.String! name();
    field public static final int LIMIT = 10;
  }

}
",
    );
    let report = check_compatibility(&old, &tightened);
    assert!(report
        .findings
        .iter()
        .any(|f| f.kind == IncompatibilityKind::NullabilityTightened));

    // Relaxation: the platform return type becomes non-null
    let relaxed = parse(
        "\
// Signature format: 3.0
package test.pkg {

  public class Api {
    ctor public Api();
    method public void log(java.lang.String? message);
    method public java.lang.String name();
    field public static final int LIMIT = 10;
  }

}
",
    );
    let report = check_compatibility(&old, &relaxed);
    assert!(report.is_empty(), "relaxations must pass: {:?}", report.findings);
}

#[test]
fn test_constant_value_change_is_a_warning() {
    let old = parse(BASELINE);
    let new = parse(
        "\
// Signature format: 3.0
package test.pkg {

  public class Api {
    ctor public Api();
    method public void log(java.lang.String? message);
    method public java.lang.String! name();
    field public static final int LIMIT = 20;
  }

}
",
    );
    let report = check_compatibility(&old, &new);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].kind, IncompatibilityKind::ValueChanged);
    assert_eq!(report.findings[0].severity, Severity::Warning);
    assert_eq!(report.warnings().count(), 1);
    assert_eq!(report.errors().count(), 0);
}

#[test]
fn test_structural_changes() {
    let old = parse(
        "\
// Signature format: 3.0
package test.pkg {

  public class Base {
  }

  public class Impl extends test.pkg.Base implements test.pkg.Marker {
    method public void run();
  }

  public interface Marker {
  }

}
",
    );
    let new = parse(
        "\
// Signature format: 3.0
package test.pkg {

  public class Base {
  }

  public final class Impl {
    method public void run();
  }

  public interface Marker {
  }

}
",
    );
    let report = check_compatibility(&old, &new);
    let kinds: Vec<_> = report.findings.iter().map(|f| f.kind).collect();
    assert!(kinds.contains(&IncompatibilityKind::AddedFinal));
    assert!(kinds.contains(&IncompatibilityKind::SuperclassChanged));
    assert!(kinds.contains(&IncompatibilityKind::InterfaceRemoved));
}

#[test]
fn test_added_abstract_method() {
    let old = parse(
        "\
// Signature format: 3.0
package test.pkg {

  public abstract class Handler {
    method public abstract void handle();
  }

}
",
    );
    let new = parse(
        "\
// Signature format: 3.0
package test.pkg {

  public abstract class Handler {
    method public abstract void flush();
    method public abstract void handle();
  }

}
",
    );
    let report = check_compatibility(&old, &new);
    assert!(report
        .findings
        .iter()
        .any(|f| f.kind == IncompatibilityKind::AddedAbstractMethod));
}

#[test]
fn test_throws_and_deprecation() {
    let old = parse(
        "\
// Signature format: 2.0
package test.pkg {

  public class Client {
    method public void connect() throws java.io.IOException;
  }

}
",
    );
    let new = parse(
        "\
// Signature format: 2.0
package test.pkg {

  public class Client {
    method @Deprecated public void connect() throws java.io.IOException, java.net.SocketException;
  }

}
",
    );
    let report = check_compatibility(&old, &new);
    let kinds: Vec<_> = report.findings.iter().map(|f| f.kind).collect();
    assert!(kinds.contains(&IncompatibilityKind::ThrowsAdded));
    assert!(kinds.contains(&IncompatibilityKind::DeprecationAdded));
}

#[test]
fn test_enum_constant_removal() {
    let old = parse(
        "\
// Signature format: 3.0
package test.pkg {

  public enum Kind {
    enum_constant public static final test.pkg.Kind ACTIVE;
    enum_constant public static final test.pkg.Kind DELETED;
  }

}
",
    );
    let new = parse(
        "\
// Signature format: 3.0
package test.pkg {

  public enum Kind {
    enum_constant public static final test.pkg.Kind ACTIVE;
  }

}
",
    );
    let report = check_compatibility(&old, &new);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(
        report.findings[0].kind,
        IncompatibilityKind::RemovedEnumConstant
    );
}

#[test]
fn test_report_serializes() {
    let old = parse(BASELINE);
    let new = parse("// Signature format: 3.0\n");
    let report = check_compatibility(&old, &new);
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("removed_class"));
}
