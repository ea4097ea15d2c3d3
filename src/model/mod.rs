// apiscope's API Model Module
//
// The unified item hierarchy. Everything the crate does - extraction from
// Java/Kotlin sources, signature-file parsing, signature writing, and
// compatibility checking - flows through these types, so classes, methods
// and fields look the same regardless of where they came from.

pub mod annotation;
pub mod item;
pub mod modifiers;
pub mod nullability;
pub mod types;

pub use annotation::{AnnotationAttribute, AnnotationItem, AnnotationValue};
pub use item::{
    ClassItem, ClassKind, Codebase, FieldItem, FieldValue, MethodItem, PackageItem, ParameterItem,
    PropertyItem,
};
pub use modifiers::{ModifierList, Visibility};
pub use nullability::Nullability;
pub use types::{PrimitiveKind, TypeItem, TypeKind};
