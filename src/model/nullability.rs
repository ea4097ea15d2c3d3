// Nullability states and inference.
//
// Java reference types with no recognized annotation are "platform" types
// (no nullness information); Kotlin types are non-null unless suffixed `?`.
// Primitives, `void` and unbounded wildcards carry no nullability at all.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Nullability of a [`TypeItem`](crate::model::TypeItem).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    NonNull,
    Nullable,
    /// Unannotated Java - no nullness information available
    Platform,
    /// Primitives, void, and unbounded wildcards
    Undefined,
}

/// Annotation packages whose `Nullable`/`NonNull`-family members carry
/// nullness semantics.
static NULLNESS_PACKAGES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "androidx.annotation",
        "android.annotation",
        "android.support.annotation",
        "org.jetbrains.annotations",
        "javax.annotation",
        "org.checkerframework.checker.nullness.qual",
        "libcore.util",
        "edu.umd.cs.findbugs.annotations",
    ])
});

impl Nullability {
    /// Map a nullness annotation to its state. Returns `None` for
    /// annotations that do not carry nullness semantics.
    pub fn from_annotation(qualified_name: &str) -> Option<Nullability> {
        let (package, simple) = match qualified_name.rfind('.') {
            Some(idx) => (&qualified_name[..idx], &qualified_name[idx + 1..]),
            None => ("", qualified_name),
        };
        if !package.is_empty() && !NULLNESS_PACKAGES.contains(package) {
            return None;
        }
        match simple {
            "Nullable" => Some(Nullability::Nullable),
            "NonNull" | "NotNull" | "Nonnull" => Some(Nullability::NonNull),
            _ => None,
        }
    }

    /// Kotlin-style suffix markers: `?` nullable, `!` platform.
    pub fn from_suffix(marker: char) -> Option<Nullability> {
        match marker {
            '?' => Some(Nullability::Nullable),
            '!' => Some(Nullability::Platform),
            _ => None,
        }
    }

    /// Suffix rendered in kotlin-style-nulls formats. Non-null and
    /// undefined are unsuffixed.
    pub fn suffix(&self) -> &'static str {
        match self {
            Nullability::Nullable => "?",
            Nullability::Platform => "!",
            Nullability::NonNull | Nullability::Undefined => "",
        }
    }

    /// Resolve the nullability of a type from an annotation-derived marker,
    /// a suffix-derived marker, and the origin's implicit default. Explicit
    /// markers always win; when both explicit markers are present and
    /// disagree the annotation wins.
    pub fn resolve(
        annotation: Option<Nullability>,
        suffix: Option<Nullability>,
        default: Nullability,
    ) -> Nullability {
        match (annotation, suffix) {
            (Some(a), Some(s)) if a != s => {
                warn!("conflicting nullability markers ({:?} vs {:?}); keeping the annotation", a, s);
                a
            }
            (Some(a), _) => a,
            (None, Some(s)) => s,
            (None, None) => default,
        }
    }
}
