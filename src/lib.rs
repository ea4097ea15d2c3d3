// apiscope - API Surface Extraction and Compatibility Checking
//!
//! apiscope builds an in-memory model of a library's public API surface from
//! Java/Kotlin source trees (tree-sitter backed) or from a textual signature
//! file, writes that model back out in a versioned signature format, and
//! compares two models for binary/source incompatibilities.

pub mod compat;
pub mod error;
pub mod extractors;
pub mod model;
pub mod signature;


// Re-export common types
pub use compat::{check_compatibility, CompatReport, Incompatibility, IncompatibilityKind, Severity};
pub use error::{ApiError, Result, SignatureError, SourceError};
pub use model::{
    AnnotationItem, ClassItem, ClassKind, Codebase, FieldItem, MethodItem, ModifierList,
    Nullability, PackageItem, ParameterItem, PropertyItem, TypeItem, TypeKind, Visibility,
};
pub use signature::{FileFormat, SignatureParser, SignatureWriter};
