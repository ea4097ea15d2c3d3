// Java method and constructor extraction tests

use super::extract;
use crate::model::Visibility;

#[test]
fn test_extract_methods_with_signatures() {
    let code = r#"
package com.example;

public class Calculator {
    public int add(int a, int b) {
        return a + b;
    }

    protected static double scale(double value) {
        return value * 2.0;
    }

    private void reset() {}
}
"#;

    let api = extract(code);
    let calculator = api.classes.iter().find(|c| c.name == "Calculator").unwrap();
    assert_eq!(calculator.methods.len(), 3);

    let add = calculator.methods.iter().find(|m| m.name == "add").unwrap();
    assert_eq!(add.modifiers.visibility, Visibility::Public);
    assert_eq!(add.return_type.render(false), "int");
    assert_eq!(add.parameters.len(), 2);
    assert_eq!(add.parameters[0].ty.render(false), "int");
    assert_eq!(add.parameters[0].name.as_deref(), Some("a"));
    assert_eq!(add.erased_signature(), "add(int,int)");

    let scale = calculator.methods.iter().find(|m| m.name == "scale").unwrap();
    assert_eq!(scale.modifiers.visibility, Visibility::Protected);
    assert!(scale.modifiers.is_static);

    let reset = calculator.methods.iter().find(|m| m.name == "reset").unwrap();
    assert_eq!(reset.modifiers.visibility, Visibility::Private);
    assert!(reset.return_type.is_void());
}

#[test]
fn test_extract_constructor_and_throws() {
    let code = r#"
package com.example;

public class Parser {
    public Parser(String input) {}

    public void parse() throws IllegalStateException, RuntimeException {
    }
}
"#;

    let api = extract(code);
    let parser = api.classes.iter().find(|c| c.name == "Parser").unwrap();

    assert_eq!(parser.constructors.len(), 1);
    let ctor = &parser.constructors[0];
    assert!(ctor.is_constructor);
    assert_eq!(ctor.name, "Parser");
    assert_eq!(ctor.parameters.len(), 1);

    let parse = parser.methods.iter().find(|m| m.name == "parse").unwrap();
    // Throws lists come out sorted
    assert_eq!(
        parse.throws,
        vec!["IllegalStateException".to_string(), "RuntimeException".to_string()]
    );
}

#[test]
fn test_extract_varargs_method() {
    let code = r#"
package com.example;

public class Log {
    public static void log(String format, Object... args) {}
}
"#;

    let api = extract(code);
    let log_class = api.classes.iter().find(|c| c.name == "Log").unwrap();
    let log = log_class.methods.iter().find(|m| m.name == "log").unwrap();
    assert_eq!(log.parameters.len(), 2);
    assert!(log.parameters[1].ty.is_varargs());
    assert_eq!(log.parameters[1].ty.render(false), "Object...");
    assert_eq!(log.erased_signature(), "log(String,Object[])");
}

#[test]
fn test_extract_generic_method() {
    let code = r#"
package com.example;

public class Util {
    public <T> T first(java.util.List<T> items) {
        return items.get(0);
    }
}
"#;

    let api = extract(code);
    let util = api.classes.iter().find(|c| c.name == "Util").unwrap();
    let first = util.methods.iter().find(|m| m.name == "first").unwrap();
    assert_eq!(first.type_parameters, vec!["T".to_string()]);
    assert_eq!(first.return_type.render(false), "T");
    assert_eq!(first.parameters[0].ty.render(false), "java.util.List<T>");
}

#[test]
fn test_imports_qualify_types() {
    let code = r#"
package com.example;

import java.util.List;
import java.io.IOException;

public class Repo {
    public List<String> names() throws IOException {
        return null;
    }
}
"#;

    let api = extract(code);
    let repo = api.classes.iter().find(|c| c.name == "Repo").unwrap();
    let names = repo.methods.iter().find(|m| m.name == "names").unwrap();
    assert_eq!(names.return_type.render(false), "java.util.List<String>");
    assert_eq!(names.throws, vec!["java.io.IOException".to_string()]);
}
