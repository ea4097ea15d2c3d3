// The item hierarchy: Codebase -> PackageItem -> ClassItem -> members.
//
// A Codebase is the root container produced by every backend (Java source,
// Kotlin source, signature text). Nested classes are flattened into their
// package under a dotted simple name (`Outer.Inner`), which keeps lookup by
// qualified name total and the signature grammar one level deep.

use crate::model::modifiers::ModifierList;
use crate::model::types::TypeItem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    /// Java `@interface` / Kotlin `annotation class`
    Annotation,
    /// Kotlin `object` and `companion object`
    Object,
}

impl ClassKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Annotation => "@interface",
            ClassKind::Object => "object",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<ClassKind> {
        match keyword {
            "class" => Some(ClassKind::Class),
            "interface" => Some(ClassKind::Interface),
            "enum" => Some(ClassKind::Enum),
            "@interface" => Some(ClassKind::Annotation),
            "object" => Some(ClassKind::Object),
            _ => None,
        }
    }
}

/// In-memory model of a parsed API surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Codebase {
    /// Human-readable origin ("3 source roots", "api/current.txt", ...)
    pub description: String,
    pub packages: Vec<PackageItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageItem {
    pub name: String,
    pub classes: Vec<ClassItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassItem {
    /// Dotted simple name within the package (`Outer.Inner` for nested)
    pub name: String,
    pub qualified_name: String,
    pub kind: ClassKind,
    pub modifiers: ModifierList,
    /// Rendered type parameters, one entry each (`T`, `T extends Number`)
    pub type_parameters: Vec<String>,
    pub super_class: Option<TypeItem>,
    pub interfaces: Vec<TypeItem>,
    pub constructors: Vec<MethodItem>,
    pub methods: Vec<MethodItem>,
    pub fields: Vec<FieldItem>,
    pub properties: Vec<PropertyItem>,
    pub enum_constants: Vec<FieldItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodItem {
    pub name: String,
    pub modifiers: ModifierList,
    pub type_parameters: Vec<String>,
    /// `void` for constructors; never rendered for them
    pub return_type: TypeItem,
    pub parameters: Vec<ParameterItem>,
    /// Sorted qualified names
    pub throws: Vec<String>,
    /// Annotation-member default value, rendered
    pub default_value: Option<String>,
    pub is_constructor: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterItem {
    pub ty: TypeItem,
    pub name: Option<String>,
    /// Kotlin default-parameter marker; the expression text is kept when
    /// the origin had one (dropped by the concise format 4.0)
    pub has_default: bool,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldItem {
    pub name: String,
    pub modifiers: ModifierList,
    pub ty: TypeItem,
    pub value: Option<FieldValue>,
    pub is_enum_constant: bool,
}

/// Kotlin `val`/`var` surfaced as a property entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyItem {
    pub name: String,
    pub modifiers: ModifierList,
    pub ty: TypeItem,
    pub is_mutable: bool,
}

/// Constant field values in rendered-literal form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Boolean(bool),
    Int(i64),
    Long(i64),
    Float(f64),
    Double(f64),
    Str(String),
    Char(char),
    Null,
    /// Anything that is not a plain literal (`Integer.MAX_VALUE`, ...)
    Expression(String),
}

impl Codebase {
    pub fn new(description: impl Into<String>) -> Self {
        Codebase {
            description: description.into(),
            packages: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.packages.iter().all(|p| p.classes.is_empty())
    }

    pub fn package_mut(&mut self, name: &str) -> &mut PackageItem {
        if let Some(idx) = self.packages.iter().position(|p| p.name == name) {
            return &mut self.packages[idx];
        }
        self.packages.push(PackageItem {
            name: name.to_string(),
            classes: Vec::new(),
        });
        self.packages.last_mut().unwrap()
    }

    /// Add a class, merging members into an existing declaration of the
    /// same class (signature files and source trees may declare a class in
    /// parts).
    pub fn add_class(&mut self, package: &str, class: ClassItem) {
        let package = self.package_mut(package);
        if let Some(existing) = package.classes.iter_mut().find(|c| c.name == class.name) {
            existing.merge(class);
        } else {
            package.classes.push(class);
        }
    }

    /// Look up a class by qualified name across all packages.
    pub fn find_class(&self, qualified_name: &str) -> Option<&ClassItem> {
        for package in &self.packages {
            let name = if package.name.is_empty() {
                qualified_name
            } else if let Some(rest) = qualified_name
                .strip_prefix(package.name.as_str())
                .and_then(|r| r.strip_prefix('.'))
            {
                rest
            } else {
                continue;
            };
            if let Some(class) = package.classes.iter().find(|c| c.name == name) {
                return Some(class);
            }
        }
        None
    }

    pub fn all_classes(&self) -> impl Iterator<Item = &ClassItem> {
        self.packages.iter().flat_map(|p| p.classes.iter())
    }

    /// Sort packages, classes and members into canonical order. Two loads
    /// of the same input must produce byte-identical signature output.
    pub fn sort(&mut self) {
        self.packages.sort_by(|a, b| a.name.cmp(&b.name));
        for package in &mut self.packages {
            package.classes.sort_by(|a, b| a.name.cmp(&b.name));
            for class in &mut package.classes {
                class.sort_members();
            }
        }
    }

    /// Canonical form: sorted, with implied modifiers made explicit so that
    /// parse/write round-trips are fixed points.
    pub fn canonicalize(&mut self) {
        self.sort();
        for package in &mut self.packages {
            for class in &mut package.classes {
                if class.modifiers.is_final {
                    // Methods of a final class are effectively final
                    for method in &mut class.methods {
                        method.modifiers.is_final = true;
                    }
                }
            }
        }
    }

    /// Drop everything an external consumer cannot reach: private and
    /// internal members, and classes that are not public or protected.
    pub fn retain_api_surface(&mut self) {
        for package in &mut self.packages {
            package
                .classes
                .retain(|c| c.modifiers.visibility.is_api_visible());
            for class in &mut package.classes {
                class
                    .constructors
                    .retain(|m| m.modifiers.visibility.is_api_visible());
                class
                    .methods
                    .retain(|m| m.modifiers.visibility.is_api_visible());
                class
                    .fields
                    .retain(|f| f.modifiers.visibility.is_api_visible());
                class
                    .properties
                    .retain(|p| p.modifiers.visibility.is_api_visible());
            }
        }
        self.packages.retain(|p| !p.classes.is_empty());
    }
}

impl ClassItem {
    pub fn new(
        package: &str,
        name: impl Into<String>,
        kind: ClassKind,
        modifiers: ModifierList,
    ) -> Self {
        let name = name.into();
        let qualified_name = if package.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", package, name)
        };
        ClassItem {
            name,
            qualified_name,
            kind,
            modifiers,
            type_parameters: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            enum_constants: Vec::new(),
        }
    }

    /// Type-variable names in scope inside this class (`T extends Number`
    /// contributes `T`).
    pub fn type_variable_names(&self) -> Vec<String> {
        self.type_parameters
            .iter()
            .filter_map(|p| p.split_whitespace().next())
            .map(|s| s.to_string())
            .collect()
    }

    pub fn find_method(&self, name: &str, erased_params: &str) -> Option<&MethodItem> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.erased_parameters() == erased_params)
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldItem> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Merge another declaration of the same class into this one. Existing
    /// members win on collision.
    pub fn merge(&mut self, other: ClassItem) {
        if self.super_class.is_none() {
            self.super_class = other.super_class;
        }
        for interface in other.interfaces {
            if !self.interfaces.contains(&interface) {
                self.interfaces.push(interface);
            }
        }
        for ctor in other.constructors {
            if !self
                .constructors
                .iter()
                .any(|m| m.erased_parameters() == ctor.erased_parameters())
            {
                self.constructors.push(ctor);
            }
        }
        for method in other.methods {
            if self
                .find_method(&method.name, &method.erased_parameters())
                .is_none()
            {
                self.methods.push(method);
            }
        }
        for field in other.fields {
            if self.find_field(&field.name).is_none() {
                self.fields.push(field);
            }
        }
        for property in other.properties {
            if !self.properties.iter().any(|p| p.name == property.name) {
                self.properties.push(property);
            }
        }
        for constant in other.enum_constants {
            if !self.enum_constants.iter().any(|c| c.name == constant.name) {
                self.enum_constants.push(constant);
            }
        }
    }

    pub fn sort_members(&mut self) {
        self.constructors
            .sort_by(|a, b| a.erased_parameters().cmp(&b.erased_parameters()));
        self.methods.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.erased_parameters().cmp(&b.erased_parameters()))
        });
        self.fields.sort_by(|a, b| a.name.cmp(&b.name));
        self.properties.sort_by(|a, b| a.name.cmp(&b.name));
        self.enum_constants.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

impl MethodItem {
    pub fn new(name: impl Into<String>, modifiers: ModifierList, return_type: TypeItem) -> Self {
        MethodItem {
            name: name.into(),
            modifiers,
            type_parameters: Vec::new(),
            return_type,
            parameters: Vec::new(),
            throws: Vec::new(),
            default_value: None,
            is_constructor: false,
        }
    }

    pub fn constructor(name: impl Into<String>, modifiers: ModifierList) -> Self {
        MethodItem {
            is_constructor: true,
            ..MethodItem::new(name, modifiers, TypeItem::void())
        }
    }

    /// Comma-joined erased parameter types: the overload key.
    pub fn erased_parameters(&self) -> String {
        self.parameters
            .iter()
            .map(|p| p.ty.erased_signature())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// `name(erased,params)` - the member key used in compat reports.
    pub fn erased_signature(&self) -> String {
        format!("{}({})", self.name, self.erased_parameters())
    }

    /// Type-variable names in scope for this method's own parameters.
    pub fn type_variable_names(&self) -> Vec<String> {
        self.type_parameters
            .iter()
            .filter_map(|p| p.split_whitespace().next())
            .map(|s| s.to_string())
            .collect()
    }
}

impl FieldValue {
    pub fn render(&self) -> String {
        match self {
            FieldValue::Boolean(v) => v.to_string(),
            FieldValue::Int(v) => v.to_string(),
            FieldValue::Long(v) => format!("{}L", v),
            FieldValue::Float(v) => format!("{}f", v),
            FieldValue::Double(v) => {
                let rendered = v.to_string();
                // Keep doubles visually distinct from ints
                if rendered.contains('.') || rendered.contains('e') || rendered.contains("inf")
                    || rendered.contains("NaN")
                {
                    rendered
                } else {
                    format!("{}.0", rendered)
                }
            }
            FieldValue::Str(v) => {
                let mut out = String::with_capacity(v.len() + 2);
                out.push('"');
                for c in v.chars() {
                    match c {
                        '"' => out.push_str("\\\""),
                        '\\' => out.push_str("\\\\"),
                        '\n' => out.push_str("\\n"),
                        '\t' => out.push_str("\\t"),
                        '\r' => out.push_str("\\r"),
                        _ => out.push(c),
                    }
                }
                out.push('"');
                out
            }
            FieldValue::Char(v) => match v {
                '\'' => "'\\''".to_string(),
                '\\' => "'\\\\'".to_string(),
                '\n' => "'\\n'".to_string(),
                '\t' => "'\\t'".to_string(),
                _ => format!("'{}'", v),
            },
            FieldValue::Null => "null".to_string(),
            FieldValue::Expression(text) => text.clone(),
        }
    }

    /// Parse a rendered constant value. Anything that is not a recognized
    /// literal form is kept as an expression.
    pub fn parse(text: &str) -> FieldValue {
        let text = text.trim();
        match text {
            "true" => return FieldValue::Boolean(true),
            "false" => return FieldValue::Boolean(false),
            "null" => return FieldValue::Null,
            _ => {}
        }
        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            return FieldValue::Str(Self::unescape(&text[1..text.len() - 1]));
        }
        if text.len() >= 3 && text.starts_with('\'') && text.ends_with('\'') {
            let inner = Self::unescape(&text[1..text.len() - 1]);
            let mut chars = inner.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return FieldValue::Char(c);
            }
        }
        if let Some(stripped) = text.strip_suffix(['L', 'l']) {
            if let Ok(v) = Self::parse_int(stripped) {
                return FieldValue::Long(v);
            }
        }
        if let Some(stripped) = text.strip_suffix(['f', 'F']) {
            if let Ok(v) = stripped.parse::<f64>() {
                return FieldValue::Float(v);
            }
        }
        if let Ok(v) = Self::parse_int(text) {
            return FieldValue::Int(v);
        }
        if text.contains(['.', 'e', 'E']) {
            if let Ok(v) = text.parse::<f64>() {
                return FieldValue::Double(v);
            }
        }
        FieldValue::Expression(text.to_string())
    }

    fn parse_int(text: &str) -> Result<i64, std::num::ParseIntError> {
        if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            return i64::from_str_radix(hex, 16);
        }
        if let Some(hex) = text.strip_prefix("-0x").or_else(|| text.strip_prefix("-0X")) {
            return i64::from_str_radix(hex, 16).map(|v| -v);
        }
        text.parse::<i64>()
    }

    fn unescape(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        }
        out
    }
}
