// Kotlin Extractor
//
// Builds model items from a tree-sitter Kotlin parse. Handles:
// - Classes (data, sealed, enum, annotation), interfaces, fun interfaces
// - Objects and companion objects
// - Functions (suspend, operator, infix, inline) and secondary constructors
// - Properties (val/var, const) and primary-constructor val/var parameters
// - Nullable-type suffixes and default parameter values
// - Top-level functions/properties, surfaced through a file facade class
//
// Parameter lists are parsed from their source text rather than node-by-node;
// the grammar wraps them in several layers and the text form is stable.

use crate::extractors::base::SourceContext;
use crate::extractors::FileApi;
use crate::model::types::split_type_parameter_list;
use crate::model::{
    AnnotationItem, ClassItem, ClassKind, FieldItem, MethodItem, ModifierList, Nullability,
    ParameterItem, PropertyItem, TypeItem, TypeKind, Visibility,
};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};
use tree_sitter::{Node, Tree};

const KOTLIN_TYPE_KINDS: &[&str] = &[
    "type",
    "user_type",
    "nullable_type",
    "type_reference",
    "function_type",
];

const CLASS_DECL_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "object_declaration",
];

pub struct KotlinExtractor {
    ctx: SourceContext,
    package: String,
    imports: HashMap<String, String>,
    local_types: HashMap<String, String>,
}

impl KotlinExtractor {
    pub fn new(file_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            ctx: SourceContext::new("kotlin", file_path, content),
            package: String::new(),
            imports: HashMap::new(),
            local_types: HashMap::new(),
        }
    }

    pub fn extract(&mut self, tree: &Tree) -> FileApi {
        let root = tree.root_node();
        self.scan_preamble(root);
        self.collect_declared_types(root, None);

        let mut classes = Vec::new();
        let mut facade_methods = Vec::new();
        let mut facade_properties = Vec::new();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                kind if CLASS_DECL_KINDS.contains(&kind) => {
                    self.extract_class_like(child, None, &mut classes);
                }
                "function_declaration" => {
                    if let Some(mut method) = self.extract_function(child, &[]) {
                        // Top-level functions are static members of the facade
                        method.modifiers.is_static = true;
                        facade_methods.push(method);
                    }
                }
                "property_declaration" => {
                    if let Some(mut property) = self.extract_property(child) {
                        property.modifiers.is_static = true;
                        facade_properties.push(property);
                    }
                }
                _ => {}
            }
        }

        if !facade_methods.is_empty() || !facade_properties.is_empty() {
            let mut modifiers = ModifierList::new(Visibility::Public);
            modifiers.is_final = true;
            let mut facade =
                ClassItem::new(&self.package, self.facade_name(), ClassKind::Class, modifiers);
            facade.methods = facade_methods;
            facade.properties = facade_properties;
            classes.push(facade);
        }

        debug!(
            "extracted {} classes from {} ({})",
            classes.len(),
            self.ctx.file_path,
            self.ctx.language
        );
        FileApi {
            package: self.package.clone(),
            classes,
        }
    }

    /// `utils.kt` -> `UtilsKt`, the facade class for top-level declarations.
    fn facade_name(&self) -> String {
        let stem = Path::new(&self.ctx.file_path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("File");
        let mut name: String = stem.chars().filter(|c| c.is_alphanumeric()).collect();
        if let Some(first) = name.get(..1) {
            let upper = first.to_uppercase();
            name.replace_range(..1, &upper);
        }
        format!("{}Kt", name)
    }

    fn scan_preamble(&mut self, root: Node) {
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "package_header" => {
                    if let Some(name) = self
                        .ctx
                        .find_child_by_kinds(&child, &["qualified_identifier", "identifier"])
                    {
                        self.package = self.ctx.node_text(&name);
                    }
                }
                "import" | "import_header" => {
                    if let Some(name) = self
                        .ctx
                        .find_child_by_kinds(&child, &["qualified_identifier", "identifier"])
                    {
                        let qualified = self.ctx.node_text(&name);
                        if let Some(simple) = qualified.rsplit('.').next() {
                            self.imports.insert(simple.to_string(), qualified.clone());
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn collect_declared_types(&mut self, node: Node, prefix: Option<&str>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if CLASS_DECL_KINDS.contains(&child.kind()) || child.kind() == "companion_object" {
                if let Some(name_node) = self.ctx.find_child(&child, "identifier") {
                    let name = self.ctx.node_text(&name_node);
                    let dotted = match prefix {
                        Some(prefix) => format!("{}.{}", prefix, name),
                        None => name.clone(),
                    };
                    self.local_types.insert(name, dotted.clone());
                    self.collect_declared_types(child, Some(&dotted));
                    continue;
                }
            }
            self.collect_declared_types(child, prefix);
        }
    }

    fn extract_class_like(&mut self, node: Node, enclosing: Option<&str>, out: &mut Vec<ClassItem>) {
        let is_companion = node.kind() == "companion_object";
        let simple_name = self
            .ctx
            .find_child(&node, "identifier")
            .map(|n| self.ctx.node_text(&n))
            .unwrap_or_else(|| {
                if is_companion {
                    "Companion".to_string()
                } else {
                    self.ctx.identifier_fallback(&node)
                }
            });
        let dotted_name = match enclosing {
            Some(enclosing) => format!("{}.{}", enclosing, simple_name),
            None => simple_name.clone(),
        };

        let (mut modifiers, raw_keywords) = self.extract_modifiers(node);
        self.default_to_public(&mut modifiers);
        if is_companion {
            modifiers.is_companion = true;
        }

        let is_interface = node.kind() == "interface_declaration"
            || self.ctx.find_child(&node, "interface").is_some();
        let is_enum = node.kind() == "enum_declaration"
            || raw_keywords.iter().any(|k| k == "enum")
            || self.ctx.has_child_text(&node, "enum");
        let is_annotation = raw_keywords.iter().any(|k| k == "annotation");
        let kind = if is_interface {
            ClassKind::Interface
        } else if is_enum {
            ClassKind::Enum
        } else if is_annotation {
            ClassKind::Annotation
        } else if is_companion || node.kind() == "object_declaration" {
            ClassKind::Object
        } else {
            ClassKind::Class
        };

        // Kotlin classes are closed unless opened explicitly
        if matches!(kind, ClassKind::Class | ClassKind::Object)
            && !modifiers.is_open
            && !modifiers.is_abstract
            && !modifiers.is_sealed
        {
            modifiers.is_final = true;
        }

        let mut class = ClassItem::new(&self.package, dotted_name.clone(), kind, modifiers);
        if let Some(type_params) = self.ctx.find_child(&node, "type_parameters") {
            let text = self.ctx.node_text(&type_params);
            class.type_parameters = split_type_parameter_list(&text).unwrap_or_default();
        }
        let vars = class.type_variable_names();

        let (super_class, interfaces) = self.extract_super_types(node, kind, &vars);
        class.super_class = super_class;
        class.interfaces = interfaces;

        if let Some(primary) = self.ctx.find_child(&node, "primary_constructor") {
            let (ctor, properties) = self.extract_primary_constructor(primary, &simple_name, &vars);
            class.constructors.push(ctor);
            class.properties.extend(properties);
        }

        if let Some(body) = self
            .ctx
            .find_child_by_kinds(&node, &["class_body", "enum_class_body"])
        {
            self.extract_members(body, &mut class, &dotted_name, &simple_name, out);
        }

        out.push(class);
    }

    fn extract_members(
        &mut self,
        body: Node,
        class: &mut ClassItem,
        dotted_name: &str,
        simple_name: &str,
        out: &mut Vec<ClassItem>,
    ) {
        let vars = class.type_variable_names();
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            match child.kind() {
                "function_declaration" => {
                    if let Some(method) = self.extract_function(child, &vars) {
                        class.methods.push(method);
                    }
                }
                "property_declaration" | "property_signature" => {
                    if let Some(property) = self.extract_property(child) {
                        class.properties.push(property);
                    }
                }
                "secondary_constructor" => {
                    let ctor = self.extract_secondary_constructor(child, simple_name, &vars);
                    class.constructors.push(ctor);
                }
                "enum_entry" => {
                    let constant = self.extract_enum_entry(child, &class.qualified_name);
                    class.enum_constants.push(constant);
                }
                "companion_object" => {
                    self.extract_class_like(child, Some(dotted_name), out);
                }
                kind if CLASS_DECL_KINDS.contains(&kind) => {
                    self.extract_class_like(child, Some(dotted_name), out);
                }
                _ => {}
            }
        }
    }

    fn extract_function(&mut self, node: Node, class_vars: &[String]) -> Option<MethodItem> {
        let name_node = self.ctx.find_child(&node, "identifier")?;
        let name = self.ctx.node_text(&name_node);

        let (mut modifiers, _) = self.extract_modifiers(node);
        self.default_to_public(&mut modifiers);

        let mut type_parameters = Vec::new();
        if let Some(type_params) = self.ctx.find_child(&node, "type_parameters") {
            let text = self.ctx.node_text(&type_params);
            type_parameters = split_type_parameter_list(&text).unwrap_or_default();
        }
        let mut vars = class_vars.to_vec();
        vars.extend(
            type_parameters
                .iter()
                .filter_map(|p| p.split_whitespace().next().map(|s| s.to_string())),
        );

        let return_type = match self.extract_return_type_text(node) {
            Some(text) => self.resolve_type(&text, &vars),
            None => TypeItem::void(),
        };

        let mut method = MethodItem::new(name, modifiers, return_type);
        method.type_parameters = type_parameters;
        if let Some(params) = self.ctx.find_child(&node, "function_value_parameters") {
            let text = self.ctx.node_text(&params);
            method.parameters = self.parse_parameter_text(&text, &vars);
        }
        Some(method)
    }

    /// Return type follows the `:` after the parameter list.
    fn extract_return_type_text(&self, node: Node) -> Option<String> {
        let mut found_colon = false;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == ":" {
                found_colon = true;
                continue;
            }
            if found_colon
                && matches!(
                    child.kind(),
                    "type" | "user_type" | "identifier" | "function_type" | "nullable_type"
                )
            {
                let text = self.ctx.node_text(&child);
                // Unit is Kotlin's spelling of void
                if text == "Unit" {
                    return None;
                }
                return Some(text);
            }
        }
        None
    }

    fn extract_property(&mut self, node: Node) -> Option<PropertyItem> {
        // The name lives in variable_declaration for ordinary properties,
        // directly on the node for interface property signatures.
        let var_decl = self.ctx.find_child(&node, "variable_declaration");
        let name_node = var_decl
            .and_then(|d| self.ctx.find_child(&d, "identifier"))
            .or_else(|| self.ctx.find_child(&node, "identifier"))?;
        let name = self.ctx.node_text(&name_node);

        let (mut modifiers, _) = self.extract_modifiers(node);
        self.default_to_public(&mut modifiers);

        let (is_val, is_var) = self.property_binding(node);
        if is_val {
            modifiers.is_final = true;
        }

        let type_text = var_decl
            .and_then(|d| self.ctx.find_child_by_kinds(&d, KOTLIN_TYPE_KINDS))
            .or_else(|| self.ctx.find_child_by_kinds(&node, KOTLIN_TYPE_KINDS))
            .map(|n| self.ctx.node_text(&n));
        let ty = match type_text {
            Some(text) => self.resolve_type(&text, &[]),
            None => match self.infer_literal_type(node) {
                Some(ty) => ty,
                None => {
                    debug!(
                        "{}: skipping property {:?} with no declared type",
                        self.ctx.file_path, name
                    );
                    return None;
                }
            },
        };

        Some(PropertyItem {
            name,
            modifiers,
            ty,
            is_mutable: is_var && !is_val,
        })
    }

    fn property_binding(&self, node: Node) -> (bool, bool) {
        let mut is_val = self.ctx.find_child(&node, "val").is_some();
        let mut is_var = self.ctx.find_child(&node, "var").is_some();
        if !is_val && !is_var {
            if let Some(binding) = self.ctx.find_child(&node, "binding_pattern_kind") {
                is_val = self.ctx.find_child(&binding, "val").is_some();
                is_var = self.ctx.find_child(&binding, "var").is_some();
            }
        }
        if !is_val && !is_var {
            // Last resort: probe the leading text
            let text = self.ctx.node_text(&node);
            is_val = text.starts_with("val ") || text.contains(" val ");
            is_var = text.starts_with("var ") || text.contains(" var ");
        }
        (is_val, is_var)
    }

    /// `val x = 5` has no declared type; recognize unambiguous literals.
    fn infer_literal_type(&self, node: Node) -> Option<TypeItem> {
        let text = self.ctx.node_text(&node);
        let initializer = text.split_once('=')?.1.trim();
        let ty = if initializer.starts_with('"') {
            TypeItem::object("String").with_nullability(Nullability::NonNull)
        } else if initializer == "true" || initializer == "false" {
            TypeItem::primitive(crate::model::PrimitiveKind::Boolean)
        } else if initializer.ends_with('L') && initializer[..initializer.len() - 1].parse::<i64>().is_ok()
        {
            TypeItem::primitive(crate::model::PrimitiveKind::Long)
        } else if initializer.parse::<i64>().is_ok() {
            TypeItem::primitive(crate::model::PrimitiveKind::Int)
        } else if initializer.parse::<f64>().is_ok() {
            TypeItem::primitive(crate::model::PrimitiveKind::Double)
        } else {
            return None;
        };
        Some(ty)
    }

    fn extract_primary_constructor(
        &mut self,
        node: Node,
        class_name: &str,
        vars: &[String],
    ) -> (MethodItem, Vec<PropertyItem>) {
        let text = self.ctx.node_text(&node);
        let raw_params = self.parse_raw_parameters(&text);

        let mut ctor = MethodItem::constructor(class_name, ModifierList::new(Visibility::Public));
        let mut properties = Vec::new();
        for raw in raw_params {
            let ty = self.resolve_raw_type(&raw, vars);
            if raw.binding.is_some() {
                let mut modifiers = ModifierList::new(raw.visibility.unwrap_or(Visibility::Public));
                if raw.binding.as_deref() == Some("val") {
                    modifiers.is_final = true;
                }
                properties.push(PropertyItem {
                    name: raw.name.clone(),
                    modifiers,
                    ty: ty.clone(),
                    is_mutable: raw.binding.as_deref() == Some("var"),
                });
            }
            ctor.parameters.push(ParameterItem {
                ty,
                name: Some(raw.name),
                has_default: raw.default_value.is_some(),
                default_value: raw.default_value,
            });
        }
        (ctor, properties)
    }

    fn extract_secondary_constructor(
        &mut self,
        node: Node,
        class_name: &str,
        vars: &[String],
    ) -> MethodItem {
        let (mut modifiers, _) = self.extract_modifiers(node);
        self.default_to_public(&mut modifiers);
        let mut ctor = MethodItem::constructor(class_name, modifiers);
        if let Some(params) = self.ctx.find_child(&node, "function_value_parameters") {
            let text = self.ctx.node_text(&params);
            ctor.parameters = self.parse_parameter_text(&text, vars);
        }
        ctor
    }

    fn extract_enum_entry(&mut self, node: Node, enum_qualified: &str) -> FieldItem {
        let name = self
            .ctx
            .find_child(&node, "identifier")
            .map(|n| self.ctx.node_text(&n))
            .unwrap_or_else(|| self.ctx.identifier_fallback(&node));

        let mut modifiers = ModifierList::new(Visibility::Public);
        modifiers.is_static = true;
        modifiers.is_final = true;

        FieldItem {
            name,
            modifiers,
            ty: TypeItem {
                kind: TypeKind::Object {
                    qualified_name: enum_qualified.to_string(),
                    type_args: Vec::new(),
                },
                nullability: Nullability::NonNull,
            },
            value: None,
            is_enum_constant: true,
        }
    }

    fn extract_super_types(
        &mut self,
        node: Node,
        kind: ClassKind,
        vars: &[String],
    ) -> (Option<TypeItem>, Vec<TypeItem>) {
        let mut entries: Vec<(String, bool)> = Vec::new(); // (type text, had constructor call)

        let mut specifiers: Vec<Node> = Vec::new();
        if let Some(container) = self.ctx.find_child(&node, "delegation_specifiers") {
            specifiers.extend(self.ctx.find_children(&container, "delegation_specifier"));
            if specifiers.is_empty() {
                // Some grammar versions put the types directly in the container
                let mut cursor = container.walk();
                specifiers.extend(container.children(&mut cursor).filter(|c| {
                    matches!(
                        c.kind(),
                        "type" | "user_type" | "identifier" | "constructor_invocation"
                    )
                }));
            }
        } else {
            specifiers.extend(self.ctx.find_children(&node, "delegation_specifier"));
        }

        for specifier in specifiers {
            let text = self.ctx.node_text(&specifier);
            // `Base by delegate` contributes the delegated interface
            let text = text.split(" by ").next().unwrap_or(&text).trim().to_string();
            let had_call = text.ends_with(')');
            let type_text = match text.find('(') {
                Some(idx) => text[..idx].trim().to_string(),
                None => text,
            };
            if !type_text.is_empty() {
                entries.push((type_text, had_call));
            }
        }

        let mut super_class = None;
        let mut interfaces = Vec::new();
        for (text, had_call) in entries {
            let ty = self.resolve_type(&text, vars);
            // A constructor invocation marks the superclass; bare types are
            // interfaces. Interfaces only ever extend interfaces.
            if had_call && kind != ClassKind::Interface && super_class.is_none() {
                super_class = Some(ty);
            } else {
                interfaces.push(ty);
            }
        }
        (super_class, interfaces)
    }

    /// Modifier keywords and annotations from a declaration's modifier list.
    /// Returns the raw keyword texts too; `enum` and `annotation` change the
    /// class kind rather than setting a flag.
    fn extract_modifiers(&self, node: Node) -> (ModifierList, Vec<String>) {
        let mut modifiers = ModifierList::default();
        let mut raw_keywords = Vec::new();
        let Some(modifiers_node) = self.ctx.find_child(&node, "modifiers") else {
            return (modifiers, raw_keywords);
        };
        let mut cursor = modifiers_node.walk();
        for child in modifiers_node.children(&mut cursor) {
            if child.kind() == "annotation" {
                let text = self.ctx.node_text(&child);
                match AnnotationItem::parse(&text) {
                    Ok(annotation) => {
                        if Nullability::from_annotation(&annotation.qualified_name).is_none() {
                            modifiers.add_annotation(annotation);
                        }
                    }
                    Err(message) => warn!(
                        "{}: skipping malformed annotation: {}",
                        self.ctx.file_path, message
                    ),
                }
                continue;
            }
            let keyword = self.ctx.node_text(&child);
            raw_keywords.push(keyword.clone());
            if !modifiers.set_keyword(&keyword) {
                debug!("ignoring modifier {:?}", keyword);
            }
        }
        (modifiers, raw_keywords)
    }

    /// Kotlin has no package-private; unannotated declarations are public.
    fn default_to_public(&self, modifiers: &mut ModifierList) {
        if modifiers.visibility == Visibility::PackagePrivate {
            modifiers.visibility = Visibility::Public;
        }
    }

    fn parse_parameter_text(&self, text: &str, vars: &[String]) -> Vec<ParameterItem> {
        self.parse_raw_parameters(text)
            .into_iter()
            .map(|raw| {
                let ty = self.resolve_raw_type(&raw, vars);
                ParameterItem {
                    ty,
                    name: Some(raw.name),
                    has_default: raw.default_value.is_some(),
                    default_value: raw.default_value,
                }
            })
            .collect()
    }

    fn resolve_raw_type(&self, raw: &RawParameter, vars: &[String]) -> TypeItem {
        let mut ty = self.resolve_type(&raw.type_text, vars);
        if raw.is_vararg {
            ty = TypeItem::array(ty, true).with_nullability(Nullability::NonNull);
        }
        ty
    }

    /// Parse `(private val id: Long, vararg items: Int, name: String = "x")`
    /// from its source text.
    fn parse_raw_parameters(&self, text: &str) -> Vec<RawParameter> {
        let trimmed = text.trim();
        let inner = match (trimmed.find('('), trimmed.rfind(')')) {
            (Some(open), Some(close)) if open < close => &trimmed[open + 1..close],
            _ => trimmed,
        };
        split_top_level(inner)
            .into_iter()
            .filter_map(|entry| self.parse_raw_parameter(&entry))
            .collect()
    }

    fn parse_raw_parameter(&self, entry: &str) -> Option<RawParameter> {
        let entry = entry.trim();
        if entry.is_empty() {
            return None;
        }
        let (declaration, default_value) = match split_once_top_level(entry, '=') {
            Some((left, right)) => (left.trim().to_string(), Some(right.trim().to_string())),
            None => (entry.to_string(), None),
        };
        let (head, type_text) = split_once_top_level(&declaration, ':')?;

        let mut binding = None;
        let mut visibility = None;
        let mut is_vararg = false;
        let mut name = None;
        for word in head.split_whitespace() {
            if word.starts_with('@') {
                continue;
            }
            match word {
                "val" | "var" => binding = Some(word.to_string()),
                "vararg" => is_vararg = true,
                "crossinline" | "noinline" => {}
                other => {
                    if let Some(v) = Visibility::from_keyword(other) {
                        visibility = Some(v);
                    } else {
                        name = Some(other.to_string());
                    }
                }
            }
        }

        Some(RawParameter {
            name: name?,
            type_text: type_text.trim().to_string(),
            binding,
            visibility,
            is_vararg,
            default_value,
        })
    }

    fn resolve_type(&self, text: &str, vars: &[String]) -> TypeItem {
        let mut ty = match TypeItem::parse_with_vars(text, vars, Nullability::NonNull) {
            Ok(ty) => ty,
            Err(message) => {
                warn!(
                    "{}: unparseable type {:?} ({}); keeping it opaque",
                    self.ctx.file_path, text, message
                );
                TypeItem::object(text.trim()).with_nullability(Nullability::NonNull)
            }
        };
        self.qualify(&mut ty);
        ty
    }

    fn qualify(&self, ty: &mut TypeItem) {
        match &mut ty.kind {
            TypeKind::Object {
                qualified_name,
                type_args,
            } => {
                if !qualified_name.contains('.') {
                    if let Some(dotted) = self.local_types.get(qualified_name.as_str()) {
                        *qualified_name = if self.package.is_empty() {
                            dotted.clone()
                        } else {
                            format!("{}.{}", self.package, dotted)
                        };
                    } else if let Some(qualified) = self.imports.get(qualified_name.as_str()) {
                        *qualified_name = qualified.clone();
                    }
                }
                for arg in type_args {
                    self.qualify(arg);
                }
            }
            TypeKind::Array { component, .. } => self.qualify(component),
            TypeKind::Wildcard {
                extends_bound,
                super_bound,
            } => {
                if let Some(bound) = extends_bound {
                    self.qualify(bound);
                }
                if let Some(bound) = super_bound {
                    self.qualify(bound);
                }
            }
            TypeKind::Primitive(_) | TypeKind::Variable(_) => {}
        }
    }
}

struct RawParameter {
    name: String,
    type_text: String,
    binding: Option<String>,
    visibility: Option<Visibility>,
    is_vararg: bool,
    default_value: Option<String>,
}

/// Split at top-level commas, honoring brackets and quotes.
fn split_top_level(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut start = 0usize;
    let bytes = text.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' => in_string = !in_string,
            b'\\' if in_string => i += 1,
            b'<' | b'(' | b'[' | b'{' if !in_string => depth += 1,
            // Saturate at zero: `->` in function types is not a bracket
            b'>' | b')' | b']' | b'}' if !in_string && depth > 0 => depth -= 1,
            b',' if !in_string && depth == 0 => {
                parts.push(text[start..i].to_string());
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < text.len() {
        parts.push(text[start..].to_string());
    }
    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

/// First top-level occurrence of `sep` outside brackets and quotes.
fn split_once_top_level(text: &str, sep: char) -> Option<(String, String)> {
    let mut depth = 0i32;
    let mut in_string = false;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '<' | '(' | '[' | '{' if !in_string => depth += 1,
            '>' | ')' | ']' | '}' if !in_string && depth > 0 => depth -= 1,
            c if c == sep && !in_string && depth == 0 => {
                return Some((text[..i].to_string(), text[i + 1..].to_string()));
            }
            _ => {}
        }
    }
    None
}
