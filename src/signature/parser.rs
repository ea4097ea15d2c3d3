// Signature file parser.
//
// Tokenizes the block grammar and builds a Codebase. Types are lexed as
// single tokens (identifier plus balanced generics, array suffixes and
// nullability markers) and handed to the model's type parser, so the
// grammar here stays line-oriented and flat.

use crate::error::SignatureError;
use crate::model::{
    AnnotationItem, ClassItem, ClassKind, Codebase, FieldItem, FieldValue, MethodItem,
    ModifierList, Nullability, ParameterItem, PropertyItem, TypeItem,
};
use crate::signature::format::FileFormat;
use tracing::debug;

pub struct SignatureParser;

impl SignatureParser {
    /// Parse a complete signature file, header included.
    pub fn parse(text: &str) -> Result<Codebase, SignatureError> {
        let format = FileFormat::parse_header(text)?;
        let body_start = text.find('\n').map(|i| i + 1).unwrap_or(text.len());
        Self::parse_with_format(&text[body_start..], format, 2)
    }

    /// Read and parse a signature file from disk.
    pub fn parse_file(path: &std::path::Path) -> crate::error::Result<Codebase> {
        let text = std::fs::read_to_string(path)?;
        let mut codebase = Self::parse(&text)?;
        codebase.description = path.display().to_string();
        Ok(codebase)
    }

    /// Parse signature text whose header was already consumed.
    pub fn parse_with_format(
        body: &str,
        format: FileFormat,
        first_line: usize,
    ) -> Result<Codebase, SignatureError> {
        debug!("parsing signature text ({:?})", format);
        let mut parser = Parser {
            tokens: Tokenizer::new(body, first_line),
            format,
        };
        let mut codebase = Codebase::new(format!("signature file ({})", format.version()));
        parser.parse_packages(&mut codebase)?;
        codebase.canonicalize();
        Ok(codebase)
    }
}

struct Parser<'a> {
    tokens: Tokenizer<'a>,
    format: FileFormat,
}

impl<'a> Parser<'a> {
    fn parse_packages(&mut self, codebase: &mut Codebase) -> Result<(), SignatureError> {
        while let Some(token) = self.tokens.next() {
            if token.text != "package" {
                return Err(SignatureError::parse(
                    token.line,
                    format!("expected 'package', found {:?}", token.text),
                ));
            }
            let name = self.expect_identifier("package name")?;
            self.expect_punct("{")?;
            loop {
                let token = self.peek_required("class declaration or '}'")?;
                if token.text == "}" {
                    self.tokens.next();
                    break;
                }
                let class = self.parse_class(&name)?;
                codebase.add_class(&name, class);
            }
        }
        Ok(())
    }

    fn parse_class(&mut self, package: &str) -> Result<ClassItem, SignatureError> {
        let (modifiers, _nullness, kind_token) = self.parse_modifiers(|text| {
            ClassKind::from_keyword(text).is_some()
        })?;
        let kind = ClassKind::from_keyword(&kind_token.text).expect("checked by terminator");

        let name_token = self.next_required("class name")?;
        let (name, type_parameters) = split_type_parameters(&name_token.text)
            .map_err(|m| SignatureError::parse(name_token.line, m))?;
        let mut class = ClassItem::new(package, name, kind, modifiers);
        class.type_parameters = type_parameters;
        let vars = class.type_variable_names();

        loop {
            let token = self.next_required("'extends', 'implements' or '{'")?;
            match token.text.as_str() {
                "extends" if kind == ClassKind::Interface => {
                    class.interfaces.extend(self.parse_type_list(&vars)?);
                }
                "extends" => {
                    let ty = self.next_required("superclass type")?;
                    class.super_class = Some(self.parse_type(&ty, &vars)?);
                }
                "implements" => {
                    class.interfaces.extend(self.parse_type_list(&vars)?);
                }
                "{" => break,
                other => {
                    return Err(SignatureError::parse(
                        token.line,
                        format!("expected class body, found {:?}", other),
                    ));
                }
            }
        }

        loop {
            let token = self.next_required("class member or '}'")?;
            match token.text.as_str() {
                "}" => break,
                "ctor" => {
                    let ctor = self.parse_method(&class, true)?;
                    class.constructors.push(ctor);
                }
                "method" => {
                    let method = self.parse_method(&class, false)?;
                    class.methods.push(method);
                }
                "field" => {
                    let field = self.parse_field(&vars, false)?;
                    class.fields.push(field);
                }
                "enum_constant" => {
                    let constant = self.parse_field(&vars, true)?;
                    class.enum_constants.push(constant);
                }
                "property" => {
                    let property = self.parse_property(&vars)?;
                    class.properties.push(property);
                }
                other => {
                    return Err(SignatureError::parse(
                        token.line,
                        format!("expected member keyword, found {:?}", other),
                    ));
                }
            }
        }
        Ok(class)
    }

    /// Collect modifier keywords and annotations up to the first token the
    /// terminator predicate accepts. Nullness annotations are split out so
    /// format 2.0 can attach them to the member's type.
    fn parse_modifiers(
        &mut self,
        terminator: impl Fn(&str) -> bool,
    ) -> Result<(ModifierList, Option<Nullability>, Token), SignatureError> {
        let mut modifiers = ModifierList::default();
        let mut nullness = None;
        loop {
            let token = self.next_required("modifier or declaration")?;
            if terminator(&token.text) {
                return Ok((modifiers, nullness, token));
            }
            if token.text.starts_with('@') {
                let annotation = AnnotationItem::parse(&token.text)
                    .map_err(|m| SignatureError::parse(token.line, m))?;
                match Nullability::from_annotation(&annotation.qualified_name) {
                    Some(n) => nullness = Some(n),
                    None => modifiers.add_annotation(annotation),
                }
                continue;
            }
            if modifiers.set_keyword(&token.text) {
                continue;
            }
            return Err(SignatureError::parse(
                token.line,
                format!("unknown modifier keyword {:?}", token.text),
            ));
        }
    }

    fn parse_method(
        &mut self,
        class: &ClassItem,
        is_constructor: bool,
    ) -> Result<MethodItem, SignatureError> {
        let (modifiers, nullness, first) = self.parse_modifiers(|text| {
            // Modifier parsing stops at the first type-parameter list, type
            // or name token.
            !text.starts_with('@') && !ModifierList::is_keyword(text)
        })?;

        let mut type_parameters = Vec::new();
        let mut token = first;
        if token.text.starts_with('<') {
            type_parameters = crate::model::types::split_type_parameter_list(&token.text)
                .map_err(|m| SignatureError::parse(token.line, m))?;
            token = self.next_required("return type or constructor name")?;
        }

        let mut vars = class.type_variable_names();
        vars.extend(
            type_parameters
                .iter()
                .filter_map(|p| p.split_whitespace().next().map(|s| s.to_string())),
        );

        let (name, mut return_type) = if is_constructor {
            (token.text.clone(), TypeItem::void())
        } else {
            let return_type = self.parse_type(&token, &vars)?;
            let name_token = self.next_required("method name")?;
            (name_token.text.clone(), return_type)
        };
        if let Some(n) = nullness {
            return_type.set_nullability(n);
        }

        let mut method = MethodItem {
            name,
            modifiers,
            type_parameters,
            return_type,
            parameters: Vec::new(),
            throws: Vec::new(),
            default_value: None,
            is_constructor,
        };

        self.expect_punct("(")?;
        self.parse_parameters(&mut method, &vars)?;

        loop {
            let token = self.next_required("';'")?;
            match token.text.as_str() {
                ";" => break,
                "throws" => {
                    loop {
                        let name = self.expect_identifier("exception type")?;
                        method.throws.push(name);
                        if self.peek_required("',' or ';'")?.text == "," {
                            self.tokens.next();
                        } else {
                            break;
                        }
                    }
                    method.throws.sort();
                }
                "default" => {
                    let value = self.tokens.read_raw_value(&[b';']);
                    if value.is_empty() {
                        return Err(SignatureError::parse(token.line, "missing default value"));
                    }
                    method.default_value = Some(value);
                }
                other => {
                    return Err(SignatureError::parse(
                        token.line,
                        format!("expected ';', found {:?}", other),
                    ));
                }
            }
        }
        Ok(method)
    }

    fn parse_parameters(
        &mut self,
        method: &mut MethodItem,
        vars: &[String],
    ) -> Result<(), SignatureError> {
        if self.peek_required("parameter or ')'")?.text == ")" {
            self.tokens.next();
            return Ok(());
        }
        loop {
            let param = self.parse_parameter(vars)?;
            method.parameters.push(param);
            let token = self.next_required("',' or ')'")?;
            match token.text.as_str() {
                "," => continue,
                ")" => break,
                other => {
                    return Err(SignatureError::parse(
                        token.line,
                        format!("expected ',' or ')', found {:?}", other),
                    ));
                }
            }
        }
        // Varargs must be the final parameter
        for (index, param) in method.parameters.iter().enumerate() {
            if param.ty.is_varargs() && index + 1 != method.parameters.len() {
                return Err(SignatureError::parse(
                    self.tokens.line(),
                    format!("varargs parameter in {} must come last", method.name),
                ));
            }
        }
        Ok(())
    }

    fn parse_parameter(&mut self, vars: &[String]) -> Result<ParameterItem, SignatureError> {
        let mut nullness = None;
        let mut has_default = false;
        let mut token = self.next_required("parameter type")?;
        while token.text.starts_with('@') {
            let annotation = AnnotationItem::parse(&token.text)
                .map_err(|m| SignatureError::parse(token.line, m))?;
            if let Some(n) = Nullability::from_annotation(&annotation.qualified_name) {
                nullness = Some(n);
            }
            token = self.next_required("parameter type")?;
        }
        if token.text == "optional" && self.format.concise_default_values() {
            has_default = true;
            token = self.next_required("parameter type")?;
        }
        let mut ty = self.parse_type(&token, vars)?;
        if let Some(n) = nullness {
            ty.set_nullability(n);
        }

        let mut name = None;
        let mut default_value = None;
        let peeked = self.peek_required("',' or ')'")?.text.clone();
        if peeked != "," && peeked != ")" && peeked != "=" {
            name = Some(self.next_required("parameter name")?.text);
        }
        if self.peek_required("',' or ')'")?.text == "=" {
            self.tokens.next();
            let value = self.tokens.read_raw_value(&[b',', b')']);
            has_default = true;
            default_value = Some(value);
        }
        Ok(ParameterItem {
            ty,
            name,
            has_default,
            default_value,
        })
    }

    fn parse_field(
        &mut self,
        vars: &[String],
        is_enum_constant: bool,
    ) -> Result<FieldItem, SignatureError> {
        let (modifiers, nullness, type_token) = self.parse_modifiers(|text| {
            !text.starts_with('@') && !ModifierList::is_keyword(text)
        })?;
        let mut ty = self.parse_type(&type_token, vars)?;
        if let Some(n) = nullness {
            ty.set_nullability(n);
        }
        let name = self.expect_identifier("field name")?;
        let mut value = None;
        let token = self.next_required("'=' or ';'")?;
        match token.text.as_str() {
            ";" => {}
            "=" => {
                let raw = self.tokens.read_raw_value(&[b';']);
                if raw.is_empty() {
                    return Err(SignatureError::parse(token.line, "missing field value"));
                }
                value = Some(FieldValue::parse(&raw));
                self.expect_punct(";")?;
            }
            other => {
                return Err(SignatureError::parse(
                    token.line,
                    format!("expected '=' or ';', found {:?}", other),
                ));
            }
        }
        Ok(FieldItem {
            name,
            modifiers,
            ty,
            value,
            is_enum_constant,
        })
    }

    fn parse_property(&mut self, vars: &[String]) -> Result<PropertyItem, SignatureError> {
        let (modifiers, nullness, binding) = self.parse_modifiers(|text| {
            text == "val" || text == "var"
        })?;
        let is_mutable = binding.text == "var";
        let type_token = self.next_required("property type")?;
        let mut ty = self.parse_type(&type_token, vars)?;
        if let Some(n) = nullness {
            ty.set_nullability(n);
        }
        let name = self.expect_identifier("property name")?;
        self.expect_punct(";")?;
        Ok(PropertyItem {
            name,
            modifiers,
            ty,
            is_mutable,
        })
    }

    fn parse_type_list(&mut self, vars: &[String]) -> Result<Vec<TypeItem>, SignatureError> {
        let mut types = Vec::new();
        loop {
            let token = self.next_required("type")?;
            types.push(self.parse_type(&token, vars)?);
            if self.peek_required("type list")?.text == "," {
                self.tokens.next();
            } else {
                break;
            }
        }
        Ok(types)
    }

    fn parse_type(&self, token: &Token, vars: &[String]) -> Result<TypeItem, SignatureError> {
        if !self.format.kotlin_style_nulls() && TypeItem::text_has_null_suffix(&token.text) {
            return Err(SignatureError::parse(
                token.line,
                format!(
                    "kotlin-style nullability markers are not allowed in format {}",
                    self.format.version()
                ),
            ));
        }
        let default = if self.format.kotlin_style_nulls() {
            Nullability::NonNull
        } else {
            Nullability::Platform
        };
        TypeItem::parse_with_vars(&token.text, vars, default)
            .map_err(|m| SignatureError::parse(token.line, m))
    }

    fn next_required(&mut self, expected: &str) -> Result<Token, SignatureError> {
        self.tokens.next().ok_or_else(|| {
            SignatureError::parse(self.tokens.line(), format!("expected {}, found end of file", expected))
        })
    }

    fn peek_required(&mut self, expected: &str) -> Result<&Token, SignatureError> {
        let line = self.tokens.line();
        self.tokens.peek().ok_or_else(|| {
            SignatureError::parse(line, format!("expected {}, found end of file", expected))
        })
    }

    fn expect_punct(&mut self, expected: &str) -> Result<(), SignatureError> {
        let token = self.next_required(expected)?;
        if token.text == expected {
            Ok(())
        } else {
            Err(SignatureError::parse(
                token.line,
                format!("expected {:?}, found {:?}", expected, token.text),
            ))
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> Result<String, SignatureError> {
        let token = self.next_required(expected)?;
        let valid = token
            .text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.');
        if valid && !token.text.is_empty() {
            Ok(token.text)
        } else {
            Err(SignatureError::parse(
                token.line,
                format!("expected {}, found {:?}", expected, token.text),
            ))
        }
    }
}

/// `Foo<T extends Number>` -> (`Foo`, [`T extends Number`])
fn split_type_parameters(text: &str) -> Result<(String, Vec<String>), String> {
    match text.find('<') {
        None => Ok((text.to_string(), Vec::new())),
        Some(idx) => {
            let params = crate::model::types::split_type_parameter_list(&text[idx..])?;
            Ok((text[..idx].to_string(), params))
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    text: String,
    line: usize,
}

/// Tokenizer over signature text. Type-shaped tokens (identifier plus
/// balanced generics, array suffixes, nullability markers) come out as a
/// single token; `@` starts an annotation token including its balanced
/// argument list.
struct Tokenizer<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    peeked: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &'a str, first_line: usize) -> Self {
        Tokenizer {
            bytes: text.as_bytes(),
            pos: 0,
            line: first_line,
            peeked: None,
        }
    }

    fn line(&self) -> usize {
        self.peeked.as_ref().map(|t| t.line).unwrap_or(self.line)
    }

    fn peek(&mut self) -> Option<&Token> {
        if self.peeked.is_none() {
            self.peeked = self.lex();
        }
        self.peeked.as_ref()
    }

    fn next(&mut self) -> Option<Token> {
        if let Some(token) = self.peeked.take() {
            return Some(token);
        }
        self.lex()
    }

    /// Raw capture up to (not including) the first top-level terminator,
    /// honoring quotes and bracket nesting. Used for field values and
    /// default expressions, which are kept as written.
    fn read_raw_value(&mut self, terminators: &[u8]) -> String {
        debug_assert!(self.peeked.is_none(), "raw read with a buffered token");
        self.skip_trivia();
        let start = self.pos;
        let mut depth = 0i32;
        while let Some(b) = self.peek_byte() {
            match b {
                b'"' | b'\'' => self.skip_quoted(b),
                b'(' | b'{' | b'[' => {
                    depth += 1;
                    self.advance();
                }
                b')' if depth == 0 && terminators.contains(&b')') => break,
                b')' | b'}' | b']' => {
                    depth -= 1;
                    self.advance();
                }
                _ if depth == 0 && terminators.contains(&b) => break,
                _ => self.advance(),
            }
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .unwrap_or("")
            .trim()
            .to_string()
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) {
        if self.peek_byte() == Some(b'\n') {
            self.line += 1;
        }
        self.pos += 1;
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek_byte() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => self.advance(),
                Some(b'/') if self.bytes.get(self.pos + 1) == Some(&b'/') => {
                    while let Some(b) = self.peek_byte() {
                        if b == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn lex(&mut self) -> Option<Token> {
        self.skip_trivia();
        let b = self.peek_byte()?;
        let line = self.line;
        let start = self.pos;

        let text = if is_name_byte(b) {
            self.consume_name_run();
            self.consume_type_suffixes();
            self.slice(start)
        } else if b == b'@' {
            self.advance();
            self.consume_name_run();
            if self.peek_byte() == Some(b'(') {
                self.consume_balanced(b'(', b')');
            }
            self.slice(start)
        } else if b == b'<' {
            self.consume_balanced(b'<', b'>');
            self.slice(start)
        } else if b == b'"' || b == b'\'' {
            self.skip_quoted(b);
            self.slice(start)
        } else {
            self.advance();
            self.slice(start)
        };

        Some(Token { text, line })
    }

    fn slice(&self, start: usize) -> String {
        std::str::from_utf8(&self.bytes[start..self.pos])
            .unwrap_or("")
            .to_string()
    }

    fn consume_name_run(&mut self) {
        while let Some(b) = self.peek_byte() {
            if is_name_byte(b) || b == b'.' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Generics, array brackets and nullability markers directly attached
    /// to a name are part of its type token.
    fn consume_type_suffixes(&mut self) {
        loop {
            match self.peek_byte() {
                Some(b'<') => self.consume_balanced(b'<', b'>'),
                Some(b'?') | Some(b'!') => self.advance(),
                Some(b'[') => {
                    self.advance();
                    if self.peek_byte() == Some(b']') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn consume_balanced(&mut self, open: u8, close: u8) {
        let mut depth = 0i32;
        while let Some(b) = self.peek_byte() {
            if b == b'"' || b == b'\'' {
                self.skip_quoted(b);
                continue;
            }
            self.advance();
            if b == open {
                depth += 1;
            } else if b == close {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
        }
    }

    fn skip_quoted(&mut self, quote: u8) {
        self.advance();
        while let Some(b) = self.peek_byte() {
            self.advance();
            if b == b'\\' {
                if self.peek_byte().is_some() {
                    self.advance();
                }
            } else if b == quote {
                break;
            }
        }
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}
