// apiscope's Compatibility Module
//
// Compares a released Codebase against the current one and reports the
// changes an API consumer could be broken by. Methods are matched across
// versions by name plus erased parameter signature; nullability changes are
// directional (relaxations pass, tightenings fail).

use crate::model::{ClassItem, Codebase, FieldItem, MethodItem, Nullability, PropertyItem};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IncompatibilityKind {
    RemovedClass,
    RemovedMethod,
    RemovedField,
    RemovedProperty,
    RemovedEnumConstant,
    ClassKindChanged,
    SuperclassChanged,
    InterfaceRemoved,
    VisibilityNarrowed,
    AddedAbstract,
    AddedAbstractMethod,
    AddedFinal,
    StaticChanged,
    ReturnTypeChanged,
    ParameterTypeChanged,
    FieldTypeChanged,
    PropertyTypeChanged,
    MutabilityChanged,
    TypeParametersChanged,
    ThrowsAdded,
    ThrowsRemoved,
    ValueChanged,
    NullabilityTightened,
    DeprecationAdded,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Incompatibility {
    pub kind: IncompatibilityKind,
    pub severity: Severity,
    /// Qualified path of the affected item
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CompatReport {
    pub findings: Vec<Incompatibility>,
}

impl CompatReport {
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Incompatibility> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Incompatibility> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    fn push(
        &mut self,
        kind: IncompatibilityKind,
        severity: Severity,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.findings.push(Incompatibility {
            kind,
            severity,
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Compare a released API against the current one.
pub fn check_compatibility(old: &Codebase, new: &Codebase) -> CompatReport {
    let mut report = CompatReport::default();
    for old_class in old.all_classes() {
        match new.find_class(&old_class.qualified_name) {
            Some(new_class) => check_class(old_class, new_class, &mut report),
            None => report.push(
                IncompatibilityKind::RemovedClass,
                Severity::Error,
                old_class.qualified_name.clone(),
                format!("removed {} {}", old_class.kind.keyword(), old_class.qualified_name),
            ),
        }
    }
    report
        .findings
        .sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.message.cmp(&b.message)));
    debug!("compatibility check produced {} findings", report.findings.len());
    report
}

fn check_class(old: &ClassItem, new: &ClassItem, report: &mut CompatReport) {
    let path = &old.qualified_name;

    if old.kind != new.kind {
        report.push(
            IncompatibilityKind::ClassKindChanged,
            Severity::Error,
            path.clone(),
            format!(
                "changed from {} to {}",
                old.kind.keyword(),
                new.kind.keyword()
            ),
        );
    }

    check_visibility(&old.modifiers, &new.modifiers, path, report);
    if !old.modifiers.is_abstract && new.modifiers.is_abstract {
        report.push(
            IncompatibilityKind::AddedAbstract,
            Severity::Error,
            path.clone(),
            "class made abstract",
        );
    }
    if !old.modifiers.is_final && new.modifiers.is_final {
        report.push(
            IncompatibilityKind::AddedFinal,
            Severity::Error,
            path.clone(),
            "class made final",
        );
    }
    if old.modifiers.is_static != new.modifiers.is_static {
        report.push(
            IncompatibilityKind::StaticChanged,
            Severity::Error,
            path.clone(),
            "changed static qualifier",
        );
    }
    if !old.modifiers.is_deprecated() && new.modifiers.is_deprecated() {
        report.push(
            IncompatibilityKind::DeprecationAdded,
            Severity::Info,
            path.clone(),
            "class deprecated",
        );
    }

    let old_super = old.super_class.as_ref().map(|t| t.erased_signature());
    let new_super = new.super_class.as_ref().map(|t| t.erased_signature());
    if old_super != new_super {
        report.push(
            IncompatibilityKind::SuperclassChanged,
            Severity::Error,
            path.clone(),
            format!(
                "superclass changed from {} to {}",
                old_super.as_deref().unwrap_or("<none>"),
                new_super.as_deref().unwrap_or("<none>")
            ),
        );
    }

    for old_interface in &old.interfaces {
        let erased = old_interface.erased_signature();
        if !new
            .interfaces
            .iter()
            .any(|i| i.erased_signature() == erased)
        {
            report.push(
                IncompatibilityKind::InterfaceRemoved,
                Severity::Error,
                path.clone(),
                format!("no longer implements {}", erased),
            );
        }
    }

    if old.type_parameters != new.type_parameters {
        report.push(
            IncompatibilityKind::TypeParametersChanged,
            Severity::Error,
            path.clone(),
            format!(
                "type parameters changed from <{}> to <{}>",
                old.type_parameters.join(", "),
                new.type_parameters.join(", ")
            ),
        );
    }

    check_methods(old, new, report);
    check_fields(old, new, report);
    check_properties(old, new, report);
    check_enum_constants(old, new, report);

    // Additions only break implementors: a new abstract method on a
    // non-sealed type cannot be satisfied by existing subclasses.
    if !new.modifiers.is_sealed {
        for new_method in &new.methods {
            if new_method.modifiers.is_abstract
                && old
                    .find_method(&new_method.name, &new_method.erased_parameters())
                    .is_none()
            {
                report.push(
                    IncompatibilityKind::AddedAbstractMethod,
                    Severity::Error,
                    format!("{}#{}", path, new_method.erased_signature()),
                    "added abstract method",
                );
            }
        }
    }
}

fn check_methods(old_class: &ClassItem, new_class: &ClassItem, report: &mut CompatReport) {
    for old_method in old_class.constructors.iter().chain(&old_class.methods) {
        let path = format!(
            "{}#{}",
            old_class.qualified_name,
            old_method.erased_signature()
        );
        let new_method = if old_method.is_constructor {
            new_class
                .constructors
                .iter()
                .find(|m| m.erased_parameters() == old_method.erased_parameters())
        } else {
            new_class.find_method(&old_method.name, &old_method.erased_parameters())
        };
        let Some(new_method) = new_method else {
            report.push(
                IncompatibilityKind::RemovedMethod,
                Severity::Error,
                path,
                if old_method.is_constructor {
                    "removed constructor"
                } else {
                    "removed method"
                },
            );
            continue;
        };
        check_method_pair(old_method, new_method, old_class, &path, report);
    }
}

fn check_method_pair(
    old: &MethodItem,
    new: &MethodItem,
    old_class: &ClassItem,
    path: &str,
    report: &mut CompatReport,
) {
    check_visibility(&old.modifiers, &new.modifiers, path, report);

    if !old.modifiers.is_abstract && new.modifiers.is_abstract {
        report.push(
            IncompatibilityKind::AddedAbstract,
            Severity::Error,
            path.to_string(),
            "method made abstract",
        );
    }
    // Adding final to a method of an already-final class changes nothing
    if !old.modifiers.is_final && new.modifiers.is_final && !old_class.modifiers.is_final {
        report.push(
            IncompatibilityKind::AddedFinal,
            Severity::Error,
            path.to_string(),
            "method made final",
        );
    }
    if old.modifiers.is_static != new.modifiers.is_static {
        report.push(
            IncompatibilityKind::StaticChanged,
            Severity::Error,
            path.to_string(),
            "changed static qualifier",
        );
    }
    if !old.modifiers.is_deprecated() && new.modifiers.is_deprecated() {
        report.push(
            IncompatibilityKind::DeprecationAdded,
            Severity::Info,
            path.to_string(),
            "method deprecated",
        );
    }

    if !old.is_constructor {
        if old.return_type.render(false) != new.return_type.render(false) {
            report.push(
                IncompatibilityKind::ReturnTypeChanged,
                Severity::Error,
                path.to_string(),
                format!(
                    "return type changed from {} to {}",
                    old.return_type.render(false),
                    new.return_type.render(false)
                ),
            );
        }
        // Return values may get stronger, never weaker
        if nullability_tightened_for_output(
            old.return_type.nullability,
            new.return_type.nullability,
        ) {
            report.push(
                IncompatibilityKind::NullabilityTightened,
                Severity::Error,
                path.to_string(),
                "return value became nullable",
            );
        }
    }

    for (old_param, new_param) in old.parameters.iter().zip(&new.parameters) {
        if old_param.ty.render(false) != new_param.ty.render(false) {
            report.push(
                IncompatibilityKind::ParameterTypeChanged,
                Severity::Error,
                path.to_string(),
                format!(
                    "parameter type changed from {} to {}",
                    old_param.ty.render(false),
                    new_param.ty.render(false)
                ),
            );
        }
        // Parameters may get more lenient, never stricter
        if nullability_tightened_for_input(old_param.ty.nullability, new_param.ty.nullability) {
            report.push(
                IncompatibilityKind::NullabilityTightened,
                Severity::Error,
                path.to_string(),
                format!(
                    "parameter {} no longer accepts null",
                    old_param.name.as_deref().unwrap_or("<unnamed>")
                ),
            );
        }
    }

    for exception in &new.throws {
        if !old.throws.contains(exception) {
            report.push(
                IncompatibilityKind::ThrowsAdded,
                Severity::Error,
                path.to_string(),
                format!("now throws {}", exception),
            );
        }
    }
    for exception in &old.throws {
        if !new.throws.contains(exception) {
            report.push(
                IncompatibilityKind::ThrowsRemoved,
                Severity::Warning,
                path.to_string(),
                format!("no longer throws {}", exception),
            );
        }
    }
}

fn check_fields(old_class: &ClassItem, new_class: &ClassItem, report: &mut CompatReport) {
    for old_field in &old_class.fields {
        let path = format!("{}#{}", old_class.qualified_name, old_field.name);
        let Some(new_field) = new_class.find_field(&old_field.name) else {
            report.push(
                IncompatibilityKind::RemovedField,
                Severity::Error,
                path,
                "removed field",
            );
            continue;
        };
        check_field_pair(old_field, new_field, &path, report);
    }
}

fn check_field_pair(old: &FieldItem, new: &FieldItem, path: &str, report: &mut CompatReport) {
    check_visibility(&old.modifiers, &new.modifiers, path, report);

    if old.ty.render(false) != new.ty.render(false) {
        report.push(
            IncompatibilityKind::FieldTypeChanged,
            Severity::Error,
            path.to_string(),
            format!(
                "field type changed from {} to {}",
                old.ty.render(false),
                new.ty.render(false)
            ),
        );
    }
    if old.modifiers.is_static != new.modifiers.is_static {
        report.push(
            IncompatibilityKind::StaticChanged,
            Severity::Error,
            path.to_string(),
            "changed static qualifier",
        );
    }
    if !old.modifiers.is_final && new.modifiers.is_final {
        report.push(
            IncompatibilityKind::AddedFinal,
            Severity::Error,
            path.to_string(),
            "field made final",
        );
    }
    if let (Some(old_value), Some(new_value)) = (&old.value, &new.value) {
        if old_value != new_value {
            report.push(
                IncompatibilityKind::ValueChanged,
                Severity::Warning,
                path.to_string(),
                format!(
                    "constant value changed from {} to {}",
                    old_value.render(),
                    new_value.render()
                ),
            );
        }
    }
    // Reads of a field are outputs
    if nullability_tightened_for_output(old.ty.nullability, new.ty.nullability) {
        report.push(
            IncompatibilityKind::NullabilityTightened,
            Severity::Error,
            path.to_string(),
            "field became nullable",
        );
    }
    if !old.modifiers.is_deprecated() && new.modifiers.is_deprecated() {
        report.push(
            IncompatibilityKind::DeprecationAdded,
            Severity::Info,
            path.to_string(),
            "field deprecated",
        );
    }
}

fn check_properties(old_class: &ClassItem, new_class: &ClassItem, report: &mut CompatReport) {
    for old_property in &old_class.properties {
        let path = format!("{}#{}", old_class.qualified_name, old_property.name);
        let Some(new_property) = new_class
            .properties
            .iter()
            .find(|p| p.name == old_property.name)
        else {
            report.push(
                IncompatibilityKind::RemovedProperty,
                Severity::Error,
                path,
                "removed property",
            );
            continue;
        };
        check_property_pair(old_property, new_property, &path, report);
    }
}

fn check_property_pair(
    old: &PropertyItem,
    new: &PropertyItem,
    path: &str,
    report: &mut CompatReport,
) {
    check_visibility(&old.modifiers, &new.modifiers, path, report);
    if old.ty.render(false) != new.ty.render(false) {
        report.push(
            IncompatibilityKind::PropertyTypeChanged,
            Severity::Error,
            path.to_string(),
            format!(
                "property type changed from {} to {}",
                old.ty.render(false),
                new.ty.render(false)
            ),
        );
    }
    // var -> val removes the setter
    if old.is_mutable && !new.is_mutable {
        report.push(
            IncompatibilityKind::MutabilityChanged,
            Severity::Error,
            path.to_string(),
            "property is no longer mutable",
        );
    }
    if nullability_tightened_for_output(old.ty.nullability, new.ty.nullability) {
        report.push(
            IncompatibilityKind::NullabilityTightened,
            Severity::Error,
            path.to_string(),
            "property became nullable",
        );
    }
}

fn check_enum_constants(old_class: &ClassItem, new_class: &ClassItem, report: &mut CompatReport) {
    for old_constant in &old_class.enum_constants {
        if !new_class
            .enum_constants
            .iter()
            .any(|c| c.name == old_constant.name)
        {
            report.push(
                IncompatibilityKind::RemovedEnumConstant,
                Severity::Error,
                format!("{}#{}", old_class.qualified_name, old_constant.name),
                "removed enum constant",
            );
        }
    }
}

fn check_visibility(
    old: &crate::model::ModifierList,
    new: &crate::model::ModifierList,
    path: &str,
    report: &mut CompatReport,
) {
    if new.visibility < old.visibility {
        report.push(
            IncompatibilityKind::VisibilityNarrowed,
            Severity::Error,
            path.to_string(),
            format!(
                "visibility narrowed from {} to {}",
                old.visibility.keyword().unwrap_or("package-private"),
                new.visibility.keyword().unwrap_or("package-private")
            ),
        );
    }
}

/// For inputs (parameters): accepting null before but not after is breaking.
fn nullability_tightened_for_input(old: Nullability, new: Nullability) -> bool {
    matches!(
        (old, new),
        (Nullability::Nullable, Nullability::NonNull)
            | (Nullability::Platform, Nullability::NonNull)
    )
}

/// For outputs (returns, fields, properties): promising non-null before but
/// handing out nullable after is breaking.
fn nullability_tightened_for_output(old: Nullability, new: Nullability) -> bool {
    matches!(
        (old, new),
        (Nullability::NonNull, Nullability::Nullable)
            | (Nullability::Platform, Nullability::Nullable)
    )
}
