// Annotation model.
//
// Annotations are stored in rendered-value form: attribute values keep the
// literal text they were written with, which makes render/parse round-trips
// stable without a full constant evaluator.

use crate::model::nullability::Nullability;
use serde::{Deserialize, Serialize};

/// Canonical annotation names used when a format has to express nullability
/// as annotations (format 2.0).
pub const NULLABLE_ANNOTATION: &str = "androidx.annotation.Nullable";
pub const NONNULL_ANNOTATION: &str = "androidx.annotation.NonNull";

/// An annotation use site: `@a.b.C(x=1, y={2, 3})`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotationItem {
    pub qualified_name: String,
    pub attributes: Vec<AnnotationAttribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotationAttribute {
    pub name: String,
    pub value: AnnotationValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationValue {
    /// Rendered literal: number, string, char, bool, class literal or enum
    /// constant reference, kept as written.
    Literal(String),
    Array(Vec<AnnotationValue>),
    Annotation(Box<AnnotationItem>),
}

impl AnnotationItem {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        AnnotationItem {
            qualified_name: qualified_name.into(),
            attributes: Vec::new(),
        }
    }

    /// Last dotted segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    /// True when this annotation carries nullness semantics.
    pub fn is_nullness(&self) -> bool {
        Nullability::from_annotation(&self.qualified_name).is_some()
    }

    pub fn is_deprecation(&self) -> bool {
        matches!(
            self.qualified_name.as_str(),
            "Deprecated" | "java.lang.Deprecated" | "kotlin.Deprecated"
        )
    }

    /// Annotations that belong in an emitted API surface. Nullness markers
    /// are expressed on types, and housekeeping annotations never matter to
    /// API consumers.
    pub fn is_significant_in_api(&self) -> bool {
        if self.is_nullness() {
            return false;
        }
        if self.qualified_name.starts_with("java.lang.annotation.") {
            return false;
        }
        !matches!(
            self.simple_name(),
            "Override" | "SuppressWarnings" | "SafeVarargs" | "FunctionalInterface" | "Retention"
                | "Target" | "Documented" | "Inherited" | "Repeatable"
        )
    }

    /// Parse a rendered annotation: `@C`, `@a.b.C(1)`, `@C(x=1, y={2, 3})`.
    pub fn parse(text: &str) -> Result<AnnotationItem, String> {
        let mut cursor = Cursor::new(text);
        let annotation = cursor.parse_annotation()?;
        cursor.skip_ws();
        if !cursor.at_end() {
            return Err(format!("trailing input after annotation: {:?}", cursor.rest()));
        }
        Ok(annotation)
    }

    pub fn render(&self) -> String {
        let mut out = format!("@{}", self.qualified_name);
        if self.attributes.is_empty() {
            return out;
        }
        out.push('(');
        // The lone `value` attribute renders bare, everything else as name=value
        if self.attributes.len() == 1 && self.attributes[0].name == "value" {
            out.push_str(&self.attributes[0].value.render());
        } else {
            let rendered: Vec<String> = self
                .attributes
                .iter()
                .map(|a| format!("{}={}", a.name, a.value.render()))
                .collect();
            out.push_str(&rendered.join(", "));
        }
        out.push(')');
        out
    }
}

impl AnnotationValue {
    pub fn render(&self) -> String {
        match self {
            AnnotationValue::Literal(text) => text.clone(),
            AnnotationValue::Array(values) => {
                let rendered: Vec<String> = values.iter().map(|v| v.render()).collect();
                format!("{{{}}}", rendered.join(", "))
            }
            AnnotationValue::Annotation(annotation) => annotation.render(),
        }
    }
}

/// Minimal cursor over annotation text.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Cursor {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn rest(&self) -> &str {
        std::str::from_utf8(&self.bytes[self.pos.min(self.bytes.len())..]).unwrap_or("")
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), String> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(format!(
                "expected {:?}, found {:?}",
                expected as char,
                self.rest()
            ))
        }
    }

    fn read_name(&mut self) -> Result<String, String> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(format!("expected identifier, found {:?}", self.rest()));
        }
        Ok(std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| "invalid UTF-8 in annotation".to_string())?
            .to_string())
    }

    fn parse_annotation(&mut self) -> Result<AnnotationItem, String> {
        self.skip_ws();
        self.expect(b'@')?;
        let qualified_name = self.read_name()?;
        let mut annotation = AnnotationItem::new(qualified_name);
        self.skip_ws();
        if self.peek() != Some(b'(') {
            return Ok(annotation);
        }
        self.bump();
        self.skip_ws();
        if self.peek() == Some(b')') {
            self.bump();
            return Ok(annotation);
        }
        loop {
            annotation.attributes.push(self.parse_attribute()?);
            self.skip_ws();
            match self.bump() {
                Some(b',') => continue,
                Some(b')') => break,
                _ => return Err("unterminated annotation attribute list".to_string()),
            }
        }
        Ok(annotation)
    }

    fn parse_attribute(&mut self) -> Result<AnnotationAttribute, String> {
        self.skip_ws();
        // Lookahead: `name =` introduces a named attribute, anything else is
        // the implicit `value` attribute.
        let checkpoint = self.pos;
        let name = if let Ok(candidate) = self.read_name() {
            self.skip_ws();
            if self.peek() == Some(b'=') && self.bytes.get(self.pos + 1) != Some(&b'=') {
                self.bump();
                candidate
            } else {
                self.pos = checkpoint;
                "value".to_string()
            }
        } else {
            self.pos = checkpoint;
            "value".to_string()
        };
        let value = self.parse_value()?;
        Ok(AnnotationAttribute { name, value })
    }

    fn parse_value(&mut self) -> Result<AnnotationValue, String> {
        self.skip_ws();
        match self.peek() {
            Some(b'{') => {
                self.bump();
                let mut values = Vec::new();
                self.skip_ws();
                if self.peek() == Some(b'}') {
                    self.bump();
                    return Ok(AnnotationValue::Array(values));
                }
                loop {
                    values.push(self.parse_value()?);
                    self.skip_ws();
                    match self.bump() {
                        Some(b',') => continue,
                        Some(b'}') => break,
                        _ => return Err("unterminated annotation array value".to_string()),
                    }
                }
                Ok(AnnotationValue::Array(values))
            }
            Some(b'@') => Ok(AnnotationValue::Annotation(Box::new(self.parse_annotation()?))),
            Some(_) => {
                // Literal: scan to the next top-level `,`, `)` or `}`,
                // honoring quotes and nested parentheses.
                let start = self.pos;
                let mut depth = 0i32;
                while let Some(b) = self.peek() {
                    match b {
                        b'"' | b'\'' => self.skip_quoted(b),
                        b'(' => {
                            depth += 1;
                            self.pos += 1;
                        }
                        b')' if depth == 0 => break,
                        b')' => {
                            depth -= 1;
                            self.pos += 1;
                        }
                        b',' | b'}' if depth == 0 => break,
                        _ => self.pos += 1,
                    }
                }
                let text = std::str::from_utf8(&self.bytes[start..self.pos])
                    .map_err(|_| "invalid UTF-8 in annotation".to_string())?
                    .trim()
                    .to_string();
                if text.is_empty() {
                    return Err("empty annotation value".to_string());
                }
                Ok(AnnotationValue::Literal(text))
            }
            None => Err("expected annotation value".to_string()),
        }
    }

    fn skip_quoted(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(b) = self.bump() {
            if b == b'\\' {
                self.bump();
            } else if b == quote {
                break;
            }
        }
    }
}
