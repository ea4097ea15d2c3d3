// Java Extractor
//
// Builds model items from a tree-sitter Java parse. Handles:
// - Classes, interfaces, enums (with constants), @interface annotations
// - Records (surfaced as final classes with a canonical constructor)
// - Methods, constructors, and fields with constant values
// - Packages and imports (used to qualify type references)
// - Generics, throws clauses, nested types
// - Nullability from recognized nullness annotations

use crate::extractors::base::SourceContext;
use crate::extractors::FileApi;
use crate::model::{
    AnnotationItem, ClassItem, ClassKind, FieldItem, FieldValue, MethodItem, ModifierList,
    Nullability, ParameterItem, TypeItem, TypeKind, Visibility,
};
use std::collections::HashMap;
use tracing::{debug, warn};
use tree_sitter::{Node, Tree};

const TYPE_NODE_KINDS: &[&str] = &[
    "type_identifier",
    "generic_type",
    "scoped_type_identifier",
    "array_type",
    "primitive_type",
    "integral_type",
    "floating_point_type",
    "boolean_type",
    "void_type",
];

const TYPE_DECL_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "annotation_type_declaration",
    "record_declaration",
];

pub struct JavaExtractor {
    ctx: SourceContext,
    package: String,
    /// simple name -> qualified name, from import declarations
    imports: HashMap<String, String>,
    /// simple name -> dotted name within this file's package
    local_types: HashMap<String, String>,
}

impl JavaExtractor {
    pub fn new(file_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            ctx: SourceContext::new("java", file_path, content),
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
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            if TYPE_DECL_KINDS.contains(&child.kind()) {
                self.extract_type(child, None, &mut classes);
            }
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

    fn scan_preamble(&mut self, root: Node) {
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "package_declaration" => {
                    if let Some(scoped) = self
                        .ctx
                        .find_child_by_kinds(&child, &["scoped_identifier", "identifier"])
                    {
                        self.package = self.ctx.node_text(&scoped);
                    }
                }
                "import_declaration" => {
                    // Wildcard and static imports cannot qualify a simple name
                    if self.ctx.find_child(&child, "asterisk").is_some()
                        || self.ctx.has_child_text(&child, "static")
                    {
                        continue;
                    }
                    if let Some(scoped) = self.ctx.find_child(&child, "scoped_identifier") {
                        let qualified = self.ctx.node_text(&scoped);
                        if let Some(simple) = qualified.rsplit('.').next() {
                            self.imports.insert(simple.to_string(), qualified.clone());
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Record every type declared in this file so references to it can be
    /// qualified against the file's own package.
    fn collect_declared_types(&mut self, node: Node, prefix: Option<&str>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if TYPE_DECL_KINDS.contains(&child.kind()) {
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

    fn extract_type(&mut self, node: Node, enclosing: Option<&str>, out: &mut Vec<ClassItem>) {
        let Some(name_node) = self.ctx.find_child(&node, "identifier") else {
            return;
        };
        let simple_name = self.ctx.node_text(&name_node);
        let dotted_name = match enclosing {
            Some(enclosing) => format!("{}.{}", enclosing, simple_name),
            None => simple_name.clone(),
        };

        let kind = match node.kind() {
            "interface_declaration" => ClassKind::Interface,
            "enum_declaration" => ClassKind::Enum,
            "annotation_type_declaration" => ClassKind::Annotation,
            _ => ClassKind::Class,
        };

        let (mut modifiers, _) = self.extract_modifiers(node);
        if node.kind() == "record_declaration" {
            // Records are final and cannot be extended
            modifiers.is_final = true;
        }
        self.apply_doc_deprecation(&node, &mut modifiers);

        let mut class = ClassItem::new(&self.package, dotted_name.clone(), kind, modifiers);
        class.type_parameters = self.extract_type_parameters(node);
        let vars = class.type_variable_names();

        if let Some(superclass) = self.extract_superclass(node) {
            class.super_class = Some(self.resolve_type(&superclass, &vars));
        }
        for interface in self.extract_interfaces(node, kind) {
            let resolved = self.resolve_type(&interface, &vars);
            class.interfaces.push(resolved);
        }

        // Record components become the canonical constructor
        if node.kind() == "record_declaration" {
            if let Some(params) = self.ctx.find_child(&node, "formal_parameters") {
                let mut ctor = MethodItem::constructor(
                    simple_name.clone(),
                    ModifierList::new(Visibility::Public),
                );
                ctor.parameters = self.extract_parameters(params, &vars);
                class.constructors.push(ctor);
            }
        }

        if let Some(body) = self.ctx.find_child_by_kinds(
            &node,
            &["class_body", "interface_body", "enum_body", "annotation_type_body"],
        ) {
            self.extract_members(body, &mut class, &dotted_name, out);
        }

        out.push(class);
    }

    fn extract_members(
        &mut self,
        body: Node,
        class: &mut ClassItem,
        dotted_name: &str,
        out: &mut Vec<ClassItem>,
    ) {
        let vars = class.type_variable_names();
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            match child.kind() {
                "method_declaration" => {
                    if let Some(method) = self.extract_method(child, class, &vars) {
                        class.methods.push(method);
                    }
                }
                "constructor_declaration" => {
                    if let Some(ctor) = self.extract_constructor(child, &vars) {
                        class.constructors.push(ctor);
                    }
                }
                "field_declaration" => {
                    let fields = self.extract_fields(child, class, &vars);
                    class.fields.extend(fields);
                }
                "enum_constant" => {
                    let constant = self.extract_enum_constant(child, &class.qualified_name);
                    class.enum_constants.push(constant);
                }
                "annotation_type_element_declaration" => {
                    if let Some(member) = self.extract_annotation_member(child, &vars) {
                        class.methods.push(member);
                    }
                }
                "enum_body_declarations" => {
                    self.extract_members(child, class, dotted_name, out);
                }
                kind if TYPE_DECL_KINDS.contains(&kind) => {
                    self.extract_type(child, Some(dotted_name), out);
                }
                _ => {}
            }
        }
    }

    fn extract_method(
        &mut self,
        node: Node,
        class: &ClassItem,
        class_vars: &[String],
    ) -> Option<MethodItem> {
        let name = self.ctx.field_text(&node, "name")?;
        let (mut modifiers, nullness) = self.extract_modifiers(node);
        self.implicit_member_visibility(class.kind, &mut modifiers);
        self.apply_doc_deprecation(&node, &mut modifiers);

        let type_parameters = self.extract_type_parameters(node);
        let mut vars = class_vars.to_vec();
        vars.extend(
            type_parameters
                .iter()
                .filter_map(|p| p.split_whitespace().next().map(|s| s.to_string())),
        );

        let return_text = self
            .ctx
            .field_text(&node, "type")
            .or_else(|| {
                self.ctx
                    .find_child_by_kinds(&node, TYPE_NODE_KINDS)
                    .map(|n| self.ctx.node_text(&n))
            })
            .unwrap_or_else(|| "void".to_string());
        let mut return_type = self.resolve_type(&return_text, &vars);
        if let Some(n) = nullness {
            return_type.set_nullability(n);
        }

        let mut method = MethodItem::new(name, modifiers, return_type);
        method.type_parameters = type_parameters;
        if let Some(params) = self.ctx.find_child(&node, "formal_parameters") {
            method.parameters = self.extract_parameters(params, &vars);
        }
        method.throws = self.extract_throws(node);
        Some(method)
    }

    fn extract_constructor(&mut self, node: Node, class_vars: &[String]) -> Option<MethodItem> {
        let name_node = self.ctx.find_child(&node, "identifier")?;
        let name = self.ctx.node_text(&name_node);
        let (mut modifiers, _) = self.extract_modifiers(node);
        self.apply_doc_deprecation(&node, &mut modifiers);

        let mut ctor = MethodItem::constructor(name, modifiers);
        if let Some(params) = self.ctx.find_child(&node, "formal_parameters") {
            ctor.parameters = self.extract_parameters(params, class_vars);
        }
        ctor.throws = self.extract_throws(node);
        Some(ctor)
    }

    fn extract_parameters(&mut self, params_node: Node, vars: &[String]) -> Vec<ParameterItem> {
        let mut parameters = Vec::new();
        let mut cursor = params_node.walk();
        for child in params_node.children(&mut cursor) {
            let is_spread = child.kind() == "spread_parameter";
            if child.kind() != "formal_parameter" && !is_spread {
                continue;
            }
            let (_, nullness) = self.extract_modifiers(child);
            let type_text = self
                .ctx
                .field_text(&child, "type")
                .or_else(|| {
                    self.ctx
                        .find_child_by_kinds(&child, TYPE_NODE_KINDS)
                        .map(|n| self.ctx.node_text(&n))
                })
                .unwrap_or_else(|| "java.lang.Object".to_string());
            let mut ty = self.resolve_type(&type_text, vars);
            if is_spread {
                ty = TypeItem::array(ty, true);
            }
            if let Some(n) = nullness {
                ty.set_nullability(n);
            }
            // The parameter name is the trailing identifier (spread
            // parameters wrap it in a variable_declarator)
            let name = self
                .ctx
                .field_text(&child, "name")
                .or_else(|| {
                    self.ctx
                        .find_child(&child, "variable_declarator")
                        .and_then(|d| self.ctx.find_child(&d, "identifier"))
                        .map(|n| self.ctx.node_text(&n))
                })
                .or_else(|| {
                    self.ctx
                        .find_children(&child, "identifier")
                        .last()
                        .map(|n| self.ctx.node_text(n))
                });
            parameters.push(ParameterItem {
                ty,
                name,
                has_default: false,
                default_value: None,
            });
        }
        parameters
    }

    fn extract_fields(
        &mut self,
        node: Node,
        class: &ClassItem,
        vars: &[String],
    ) -> Vec<FieldItem> {
        let (mut modifiers, nullness) = self.extract_modifiers(node);
        self.implicit_member_visibility(class.kind, &mut modifiers);
        self.apply_doc_deprecation(&node, &mut modifiers);

        let Some(type_text) = self
            .ctx
            .field_text(&node, "type")
            .or_else(|| {
                self.ctx
                    .find_child_by_kinds(&node, TYPE_NODE_KINDS)
                    .map(|n| self.ctx.node_text(&n))
            })
        else {
            return Vec::new();
        };

        let mut fields = Vec::new();
        for declarator in self.ctx.find_children(&node, "variable_declarator") {
            let Some(name_node) = self.ctx.find_child(&declarator, "identifier") else {
                continue;
            };
            let name = self.ctx.node_text(&name_node);
            let mut ty = self.resolve_type(&type_text, vars);
            if let Some(n) = nullness {
                ty.set_nullability(n);
            }

            // Constant values are only API-significant on static finals
            let mut value = None;
            if modifiers.is_static && modifiers.is_final {
                if let Some(value_node) = declarator.child_by_field_name("value") {
                    value = Some(FieldValue::parse(&self.ctx.node_text(&value_node)));
                }
                // A constant initialized with a non-null literal is non-null
                if ty.nullability == Nullability::Platform
                    && matches!(
                        value,
                        Some(FieldValue::Str(_)) | Some(FieldValue::Char(_))
                    )
                {
                    ty.set_nullability(Nullability::NonNull);
                }
            }

            fields.push(FieldItem {
                name,
                modifiers: modifiers.clone(),
                ty,
                value,
                is_enum_constant: false,
            });
        }
        fields
    }

    fn extract_enum_constant(&mut self, node: Node, enum_qualified: &str) -> FieldItem {
        let name = self
            .ctx
            .find_child(&node, "identifier")
            .map(|n| self.ctx.node_text(&n))
            .unwrap_or_else(|| self.ctx.identifier_fallback(&node));

        let mut modifiers = ModifierList::new(Visibility::Public);
        modifiers.is_static = true;
        modifiers.is_final = true;

        let ty = TypeItem {
            kind: TypeKind::Object {
                qualified_name: enum_qualified.to_string(),
                type_args: Vec::new(),
            },
            nullability: Nullability::NonNull,
        };
        FieldItem {
            name,
            modifiers,
            ty,
            value: None,
            is_enum_constant: true,
        }
    }

    fn extract_annotation_member(&mut self, node: Node, vars: &[String]) -> Option<MethodItem> {
        let name = self.ctx.field_text(&node, "name")?;
        let type_text = self.ctx.field_text(&node, "type").or_else(|| {
            self.ctx
                .find_child_by_kinds(&node, TYPE_NODE_KINDS)
                .map(|n| self.ctx.node_text(&n))
        })?;

        // Annotation members are implicitly public abstract
        let mut modifiers = ModifierList::new(Visibility::Public);
        modifiers.is_abstract = true;

        let mut method = MethodItem::new(name, modifiers, self.resolve_type(&type_text, vars));
        method.default_value = self.ctx.field_text(&node, "value");
        Some(method)
    }

    /// Split a modifiers node into keyword flags and annotations; nullness
    /// annotations are returned separately for attachment to a type.
    fn extract_modifiers(&self, node: Node) -> (ModifierList, Option<Nullability>) {
        let mut modifiers = ModifierList::default();
        let mut nullness = None;
        let Some(modifiers_node) = self.ctx.find_child(&node, "modifiers") else {
            return (modifiers, nullness);
        };
        let mut cursor = modifiers_node.walk();
        for child in modifiers_node.children(&mut cursor) {
            match child.kind() {
                "marker_annotation" | "annotation" => {
                    let text = self.ctx.node_text(&child);
                    match AnnotationItem::parse(&text) {
                        Ok(annotation) => {
                            match Nullability::from_annotation(&annotation.qualified_name) {
                                Some(n) => nullness = Some(n),
                                None => modifiers.add_annotation(annotation),
                            }
                        }
                        Err(message) => {
                            warn!("{}: skipping malformed annotation: {}", self.ctx.file_path, message)
                        }
                    }
                }
                _ => {
                    let keyword = self.ctx.node_text(&child);
                    if !modifiers.set_keyword(&keyword) {
                        debug!("ignoring modifier {:?}", keyword);
                    }
                }
            }
        }
        (modifiers, nullness)
    }

    /// Interface and annotation members are implicitly public.
    fn implicit_member_visibility(&self, kind: ClassKind, modifiers: &mut ModifierList) {
        if matches!(kind, ClassKind::Interface | ClassKind::Annotation)
            && modifiers.visibility == Visibility::PackagePrivate
        {
            modifiers.visibility = Visibility::Public;
        }
    }

    /// Javadoc `@deprecated` implies the annotation even when it is absent.
    fn apply_doc_deprecation(&self, node: &Node, modifiers: &mut ModifierList) {
        if modifiers.is_deprecated() {
            return;
        }
        if let Some(doc) = self.ctx.doc_comment(node) {
            if doc.contains("@deprecated") {
                modifiers.add_annotation(AnnotationItem::new("Deprecated"));
            }
        }
    }

    fn extract_type_parameters(&self, node: Node) -> Vec<String> {
        let Some(params_node) = self.ctx.find_child(&node, "type_parameters") else {
            return Vec::new();
        };
        let mut params = Vec::new();
        let mut cursor = params_node.walk();
        for child in params_node.children(&mut cursor) {
            if child.kind() == "type_parameter" {
                params.push(self.ctx.node_text(&child));
            }
        }
        params
    }

    fn extract_superclass(&self, node: Node) -> Option<String> {
        let superclass_node = self.ctx.find_child(&node, "superclass")?;
        let type_node = self.ctx.find_child_by_kinds(
            &superclass_node,
            &["type_identifier", "generic_type", "scoped_type_identifier"],
        )?;
        Some(self.ctx.node_text(&type_node))
    }

    fn extract_interfaces(&self, node: Node, kind: ClassKind) -> Vec<String> {
        let list_parent = if kind == ClassKind::Interface {
            self.ctx.find_child(&node, "extends_interfaces")
        } else {
            self.ctx.find_child(&node, "super_interfaces")
        };
        let Some(list_parent) = list_parent else {
            return Vec::new();
        };
        let Some(type_list) = self.ctx.find_child(&list_parent, "type_list") else {
            return Vec::new();
        };
        let mut cursor = type_list.walk();
        type_list
            .children(&mut cursor)
            .filter(|c| {
                matches!(
                    c.kind(),
                    "type_identifier" | "generic_type" | "scoped_type_identifier"
                )
            })
            .map(|c| self.ctx.node_text(&c))
            .collect()
    }

    fn extract_throws(&self, node: Node) -> Vec<String> {
        let Some(throws_node) = self.ctx.find_child(&node, "throws") else {
            return Vec::new();
        };
        let text = self.ctx.node_text(&throws_node);
        let list = text.trim_start().strip_prefix("throws").unwrap_or(&text);
        let mut throws: Vec<String> = list
            .split(',')
            .map(|s| self.qualify_name(s.trim()))
            .filter(|s| !s.is_empty())
            .collect();
        throws.sort();
        throws
    }

    /// Parse a source type string and qualify unqualified names against the
    /// file's own declarations and imports.
    fn resolve_type(&self, text: &str, vars: &[String]) -> TypeItem {
        let mut ty = match TypeItem::parse_with_vars(text, vars, Nullability::Platform) {
            Ok(ty) => ty,
            Err(message) => {
                warn!(
                    "{}: unparseable type {:?} ({}); keeping it opaque",
                    self.ctx.file_path, text, message
                );
                TypeItem::object(text.trim())
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
                    *qualified_name = self.qualify_name(qualified_name);
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

    fn qualify_name(&self, name: &str) -> String {
        if name.contains('.') {
            return name.to_string();
        }
        if let Some(dotted) = self.local_types.get(name) {
            return if self.package.is_empty() {
                dotted.clone()
            } else {
                format!("{}.{}", self.package, dotted)
            };
        }
        if let Some(qualified) = self.imports.get(name) {
            return qualified.clone();
        }
        name.to_string()
    }
}
