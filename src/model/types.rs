// The type-modifier model.
//
// A TypeItem is a structural type reference (primitive, class, array, type
// variable or wildcard) plus its nullability. Types parse from and render to
// the canonical string forms used by signature files; the kotlin-style-nulls
// formats add `?`/`!` suffixes, format 2.0 keeps types bare and expresses
// nullability as annotations at the member layer.

use crate::model::nullability::Nullability;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Void,
}

impl PrimitiveKind {
    pub fn from_keyword(keyword: &str) -> Option<PrimitiveKind> {
        match keyword {
            "boolean" => Some(PrimitiveKind::Boolean),
            "byte" => Some(PrimitiveKind::Byte),
            "short" => Some(PrimitiveKind::Short),
            "int" => Some(PrimitiveKind::Int),
            "long" => Some(PrimitiveKind::Long),
            "char" => Some(PrimitiveKind::Char),
            "float" => Some(PrimitiveKind::Float),
            "double" => Some(PrimitiveKind::Double),
            "void" => Some(PrimitiveKind::Void),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Void => "void",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Primitive(PrimitiveKind),
    Object {
        qualified_name: String,
        type_args: Vec<TypeItem>,
    },
    Array {
        component: Box<TypeItem>,
        varargs: bool,
    },
    /// Reference to a type variable in scope
    Variable(String),
    Wildcard {
        extends_bound: Option<Box<TypeItem>>,
        super_bound: Option<Box<TypeItem>>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeItem {
    pub kind: TypeKind,
    pub nullability: Nullability,
}

impl TypeItem {
    pub fn primitive(kind: PrimitiveKind) -> TypeItem {
        TypeItem {
            kind: TypeKind::Primitive(kind),
            nullability: Nullability::Undefined,
        }
    }

    pub fn void() -> TypeItem {
        TypeItem::primitive(PrimitiveKind::Void)
    }

    pub fn object(qualified_name: impl Into<String>) -> TypeItem {
        TypeItem {
            kind: TypeKind::Object {
                qualified_name: qualified_name.into(),
                type_args: Vec::new(),
            },
            nullability: Nullability::Platform,
        }
    }

    pub fn variable(name: impl Into<String>) -> TypeItem {
        TypeItem {
            kind: TypeKind::Variable(name.into()),
            nullability: Nullability::Platform,
        }
    }

    pub fn array(component: TypeItem, varargs: bool) -> TypeItem {
        TypeItem {
            kind: TypeKind::Array {
                component: Box::new(component),
                varargs,
            },
            nullability: Nullability::Platform,
        }
    }

    pub fn with_nullability(mut self, nullability: Nullability) -> TypeItem {
        self.set_nullability(nullability);
        self
    }

    /// Primitives, void and wildcards never carry a nullability marker.
    pub fn set_nullability(&mut self, nullability: Nullability) {
        if self.nullability_fixed() {
            self.nullability = Nullability::Undefined;
        } else {
            self.nullability = nullability;
        }
    }

    fn nullability_fixed(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Primitive(_) | TypeKind::Wildcard { .. }
        )
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(PrimitiveKind::Void))
    }

    pub fn is_varargs(&self) -> bool {
        matches!(self.kind, TypeKind::Array { varargs: true, .. })
    }

    /// Qualified name for object types, `None` otherwise.
    pub fn qualified_name(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::Object { qualified_name, .. } => Some(qualified_name),
            _ => None,
        }
    }

    /// Parse a canonical type string with no type variables in scope.
    /// Unmarked reference types default to platform nullability.
    pub fn parse(text: &str) -> Result<TypeItem, String> {
        Self::parse_with_vars(text, &[], Nullability::Platform)
    }

    /// Parse a canonical type string. `vars` holds the type-variable names
    /// in scope (class + method type parameters); `default_nulls` is the
    /// nullability of unmarked reference types (`Platform` for Java and
    /// format 2.0, `NonNull` for Kotlin).
    pub fn parse_with_vars(
        text: &str,
        vars: &[String],
        default_nulls: Nullability,
    ) -> Result<TypeItem, String> {
        let mut cursor = TypeCursor::new(text, vars, default_nulls);
        let item = cursor.parse_type()?;
        cursor.skip_ws();
        if !cursor.at_end() {
            return Err(format!("trailing input in type {:?}", text));
        }
        Ok(item)
    }

    /// Canonical rendering. With `kotlin_style_nulls`, nullable and platform
    /// types get `?`/`!` suffixes; without, types render bare.
    pub fn render(&self, kotlin_style_nulls: bool) -> String {
        let mut out = match &self.kind {
            TypeKind::Primitive(kind) => kind.keyword().to_string(),
            TypeKind::Object {
                qualified_name,
                type_args,
            } => {
                let mut s = qualified_name.clone();
                if !type_args.is_empty() {
                    let args: Vec<String> = type_args
                        .iter()
                        .map(|a| a.render(kotlin_style_nulls))
                        .collect();
                    s.push('<');
                    s.push_str(&args.join(", "));
                    s.push('>');
                }
                s
            }
            TypeKind::Array { component, varargs } => {
                let mut s = component.render(kotlin_style_nulls);
                s.push_str(if *varargs { "..." } else { "[]" });
                s
            }
            TypeKind::Variable(name) => name.clone(),
            TypeKind::Wildcard {
                extends_bound,
                super_bound,
            } => match (extends_bound, super_bound) {
                (Some(bound), _) => format!("? extends {}", bound.render(kotlin_style_nulls)),
                (None, Some(bound)) => format!("? super {}", bound.render(kotlin_style_nulls)),
                (None, None) => "?".to_string(),
            },
        };
        if kotlin_style_nulls {
            out.push_str(self.nullability.suffix());
        }
        out
    }

    /// Type-argument-free form used as an overload key: `java.util.List<T>`
    /// erases to `java.util.List`, varargs erase to arrays, type variables
    /// erase to their implicit `java.lang.Object` bound.
    pub fn erased_signature(&self) -> String {
        match &self.kind {
            TypeKind::Primitive(kind) => kind.keyword().to_string(),
            TypeKind::Object { qualified_name, .. } => qualified_name.clone(),
            TypeKind::Array { component, .. } => format!("{}[]", component.erased_signature()),
            TypeKind::Variable(_) => "java.lang.Object".to_string(),
            TypeKind::Wildcard { extends_bound, .. } => extends_bound
                .as_ref()
                .map(|b| b.erased_signature())
                .unwrap_or_else(|| "java.lang.Object".to_string()),
        }
    }

    /// True when the rendered text carries a kotlin-style suffix anywhere -
    /// used to reject suffixed types in formats that cannot express them.
    pub fn text_has_null_suffix(text: &str) -> bool {
        let bytes = text.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            if b == b'!' {
                return true;
            }
            if b == b'?' && i > 0 {
                let prev = bytes[i - 1];
                if prev.is_ascii_alphanumeric() || prev == b'_' || prev == b']' || prev == b'>' {
                    return true;
                }
            }
        }
        false
    }
}

/// Split a rendered `<A, B<C, D>>` list into its top-level entries.
pub(crate) fn split_type_parameter_list(text: &str) -> Result<Vec<String>, String> {
    let inner = text
        .strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .ok_or_else(|| format!("malformed type parameter list {:?}", text))?;
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in inner.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(inner[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = inner[start..].trim();
    if !last.is_empty() {
        parts.push(last.to_string());
    }
    Ok(parts)
}

/// Recursive-descent cursor over a type string.
struct TypeCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    vars: &'a [String],
    default_nulls: Nullability,
}

impl<'a> TypeCursor<'a> {
    fn new(text: &'a str, vars: &'a [String], default_nulls: Nullability) -> Self {
        TypeCursor {
            bytes: text.as_bytes(),
            pos: 0,
            vars,
            default_nulls,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn starts_varargs(&self) -> bool {
        self.bytes[self.pos..].starts_with(b"...")
    }

    fn read_name(&mut self) -> Result<String, String> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            let is_name_byte = b.is_ascii_alphanumeric() || b == b'_' || b == b'$';
            // Dots join qualified names, but `...` is the varargs marker
            if is_name_byte || (b == b'.' && !self.starts_varargs()) {
                self.pos += 1;
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(format!("expected type name at offset {}", self.pos));
        }
        Ok(std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| "invalid UTF-8 in type".to_string())?
            .to_string())
    }

    fn take_suffix(&mut self) -> Option<Nullability> {
        match self.peek() {
            Some(b'?') => {
                self.pos += 1;
                Some(Nullability::Nullable)
            }
            Some(b'!') => {
                self.pos += 1;
                Some(Nullability::Platform)
            }
            _ => None,
        }
    }

    fn parse_type(&mut self) -> Result<TypeItem, String> {
        self.skip_ws();
        let mut item = if self.peek() == Some(b'?') {
            self.parse_wildcard()?
        } else {
            self.parse_base()?
        };

        // Array/varargs layers, each with its own nullability
        loop {
            self.skip_ws();
            if self.starts_varargs() {
                self.pos += 3;
                let mut array = TypeItem::array(item, true);
                let nulls = self.take_suffix().unwrap_or(self.default_nulls);
                array.set_nullability(nulls);
                item = array;
                break;
            }
            if self.peek() == Some(b'[') {
                self.pos += 1;
                self.skip_ws();
                if self.peek() != Some(b']') {
                    return Err("unterminated array suffix".to_string());
                }
                self.pos += 1;
                let mut array = TypeItem::array(item, false);
                let nulls = self.take_suffix().unwrap_or(self.default_nulls);
                array.set_nullability(nulls);
                item = array;
                continue;
            }
            break;
        }
        Ok(item)
    }

    fn parse_wildcard(&mut self) -> Result<TypeItem, String> {
        self.pos += 1; // consume '?'
        self.skip_ws();
        let checkpoint = self.pos;
        let keyword = self.read_name().unwrap_or_default();
        let kind = match keyword.as_str() {
            "extends" => TypeKind::Wildcard {
                extends_bound: Some(Box::new(self.parse_type()?)),
                super_bound: None,
            },
            "super" => TypeKind::Wildcard {
                extends_bound: None,
                super_bound: Some(Box::new(self.parse_type()?)),
            },
            _ => {
                self.pos = checkpoint;
                TypeKind::Wildcard {
                    extends_bound: None,
                    super_bound: None,
                }
            }
        };
        Ok(TypeItem {
            kind,
            nullability: Nullability::Undefined,
        })
    }

    fn parse_base(&mut self) -> Result<TypeItem, String> {
        let name = self.read_name()?;
        let mut type_args = Vec::new();
        if self.peek() == Some(b'<') {
            self.pos += 1;
            loop {
                type_args.push(self.parse_type()?);
                self.skip_ws();
                match self.peek() {
                    Some(b',') => {
                        self.pos += 1;
                    }
                    Some(b'>') => {
                        self.pos += 1;
                        break;
                    }
                    _ => return Err(format!("unterminated type arguments for {}", name)),
                }
            }
        }

        if let Some(primitive) = PrimitiveKind::from_keyword(&name) {
            if !type_args.is_empty() {
                return Err(format!("primitive type {} cannot take type arguments", name));
            }
            if let Some(suffix) = self.take_suffix() {
                return Err(format!(
                    "primitive type {} cannot carry a nullability marker {:?}",
                    name,
                    suffix.suffix()
                ));
            }
            return Ok(TypeItem::primitive(primitive));
        }

        let suffix = self.take_suffix();
        let nullability = suffix.unwrap_or(self.default_nulls);
        if !name.contains('.') && type_args.is_empty() && self.vars.iter().any(|v| v == &name) {
            return Ok(TypeItem {
                kind: TypeKind::Variable(name),
                nullability,
            });
        }
        Ok(TypeItem {
            kind: TypeKind::Object {
                qualified_name: name,
                type_args,
            },
            nullability,
        })
    }
}
