// Signature file writer.
//
// Emits the canonical textual form of a Codebase: packages sorted by name,
// classes sorted by simple name, members grouped and sorted. Output is
// deterministic - writing the same model twice is byte-identical, which is
// what the compatibility workflow diffs against.

use crate::model::annotation::{NONNULL_ANNOTATION, NULLABLE_ANNOTATION};
use crate::model::{
    ClassItem, ClassKind, Codebase, FieldItem, MethodItem, ModifierList, Nullability, PropertyItem,
    TypeItem,
};
use crate::signature::format::FileFormat;
use std::fmt::Write as _;
use std::io;

pub struct SignatureWriter {
    format: FileFormat,
}

impl SignatureWriter {
    pub fn new(format: FileFormat) -> Self {
        SignatureWriter { format }
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn write(&self, codebase: &Codebase) -> String {
        let mut sorted = codebase.clone();
        sorted.canonicalize();

        let mut out = self.format.header();
        for (index, package) in sorted.packages.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "package {} {{", package.name);
            for class in &package.classes {
                out.push('\n');
                self.write_class(&mut out, class);
            }
            out.push_str("\n}\n");
        }
        out
    }

    pub fn write_to<W: io::Write>(&self, codebase: &Codebase, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.write(codebase).as_bytes())
    }

    fn write_class(&self, out: &mut String, class: &ClassItem) {
        out.push_str("  ");
        out.push_str(&self.modifier_prefix(&class.modifiers, false));
        out.push_str(class.kind.keyword());
        out.push(' ');
        out.push_str(&class.name);
        if !class.type_parameters.is_empty() {
            let _ = write!(out, "<{}>", class.type_parameters.join(", "));
        }
        if let Some(super_class) = &class.super_class {
            let _ = write!(out, " extends {}", self.render_type(super_class));
        }
        if !class.interfaces.is_empty() {
            let rendered: Vec<String> = class
                .interfaces
                .iter()
                .map(|i| self.render_type(i))
                .collect();
            let keyword = if class.kind == ClassKind::Interface {
                "extends"
            } else {
                "implements"
            };
            let _ = write!(out, " {} {}", keyword, rendered.join(", "));
        }
        out.push_str(" {\n");

        let class_is_final = class.modifiers.is_final;
        for ctor in &class.constructors {
            self.write_method(out, ctor, class_is_final);
        }
        for method in &class.methods {
            self.write_method(out, method, class_is_final);
        }
        for field in &class.fields {
            self.write_field(out, field, "field");
        }
        for property in &class.properties {
            self.write_property(out, property);
        }
        for constant in &class.enum_constants {
            self.write_field(out, constant, "enum_constant");
        }
        out.push_str("  }\n");
    }

    fn write_method(&self, out: &mut String, method: &MethodItem, class_is_final: bool) {
        out.push_str(if method.is_constructor {
            "    ctor "
        } else {
            "    method "
        });
        // `final` on a method of a final class is implied
        let suppress_final = class_is_final && !method.is_constructor;
        out.push_str(&self.member_prefix(&method.modifiers, &method.return_type, suppress_final, !method.is_constructor));
        if !method.type_parameters.is_empty() {
            let _ = write!(out, "<{}> ", method.type_parameters.join(", "));
        }
        if !method.is_constructor {
            let _ = write!(out, "{} ", self.render_type(&method.return_type));
        }
        out.push_str(&method.name);
        out.push('(');
        let params: Vec<String> = method
            .parameters
            .iter()
            .map(|p| self.render_parameter(p))
            .collect();
        out.push_str(&params.join(", "));
        out.push(')');
        if !method.throws.is_empty() {
            let _ = write!(out, " throws {}", method.throws.join(", "));
        }
        if let Some(default_value) = &method.default_value {
            let _ = write!(out, " default {}", default_value);
        }
        out.push_str(";\n");
    }

    fn render_parameter(&self, param: &crate::model::ParameterItem) -> String {
        let mut out = String::new();
        if param.has_default && self.format.concise_default_values() {
            out.push_str("optional ");
        }
        out.push_str(&self.type_with_nullability(&param.ty));
        if let Some(name) = &param.name {
            out.push(' ');
            out.push_str(name);
        }
        if !self.format.concise_default_values() {
            if let Some(default_value) = &param.default_value {
                out.push_str(" = ");
                out.push_str(default_value);
            }
        }
        out
    }

    fn write_field(&self, out: &mut String, field: &FieldItem, keyword: &str) {
        let _ = write!(out, "    {} ", keyword);
        out.push_str(&self.member_prefix(&field.modifiers, &field.ty, false, true));
        let _ = write!(out, "{} {}", self.render_type(&field.ty), field.name);
        if let Some(value) = &field.value {
            let _ = write!(out, " = {}", value.render());
        }
        out.push_str(";\n");
    }

    fn write_property(&self, out: &mut String, property: &PropertyItem) {
        out.push_str("    property ");
        out.push_str(&self.member_prefix(&property.modifiers, &property.ty, false, true));
        out.push_str(if property.is_mutable { "var " } else { "val " });
        let _ = write!(out, "{} {}", self.render_type(&property.ty), property.name);
        out.push_str(";\n");
    }

    /// Annotations + modifier keywords, with a trailing space when nonempty.
    fn modifier_prefix(&self, modifiers: &ModifierList, suppress_final: bool) -> String {
        let mut parts: Vec<String> = modifiers
            .significant_annotations()
            .map(|a| a.render())
            .collect();
        let keywords = modifiers.render_keywords(suppress_final);
        if !keywords.is_empty() {
            parts.push(keywords);
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!("{} ", parts.join(" "))
        }
    }

    /// Member prefix: annotations, keywords, and - for format 2.0 - the
    /// nullability annotation of the member's own type.
    fn member_prefix(
        &self,
        modifiers: &ModifierList,
        ty: &TypeItem,
        suppress_final: bool,
        include_nullness: bool,
    ) -> String {
        let mut prefix = self.modifier_prefix(modifiers, suppress_final);
        if include_nullness && !self.format.kotlin_style_nulls() {
            if let Some(annotation) = nullness_annotation(ty.nullability) {
                let _ = write!(prefix, "@{} ", annotation);
            }
        }
        prefix
    }

    fn render_type(&self, ty: &TypeItem) -> String {
        ty.render(self.format.kotlin_style_nulls())
    }

    /// Parameter types carry their own nullability annotation in 2.0.
    fn type_with_nullability(&self, ty: &TypeItem) -> String {
        if self.format.kotlin_style_nulls() {
            return ty.render(true);
        }
        match nullness_annotation(ty.nullability) {
            Some(annotation) => format!("@{} {}", annotation, ty.render(false)),
            None => ty.render(false),
        }
    }
}

fn nullness_annotation(nullability: Nullability) -> Option<&'static str> {
    match nullability {
        Nullability::Nullable => Some(NULLABLE_ANNOTATION),
        Nullability::NonNull => Some(NONNULL_ANNOTATION),
        Nullability::Platform | Nullability::Undefined => None,
    }
}
