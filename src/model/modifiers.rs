// Modifier lists and their canonical rendering.
//
// Keyword order in rendered output is fixed so that two models describing
// the same API produce byte-identical signature files no matter how the
// modifiers were discovered.

use crate::model::annotation::AnnotationItem;
use serde::{Deserialize, Serialize};

/// Visibility levels, ordered from most to least restrictive so that
/// "narrowed visibility" is a plain `<` comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Private,
    PackagePrivate,
    /// Kotlin module-internal
    Internal,
    Protected,
    Public,
}

impl Visibility {
    pub fn from_keyword(keyword: &str) -> Option<Visibility> {
        match keyword {
            "public" => Some(Visibility::Public),
            "protected" => Some(Visibility::Protected),
            "internal" => Some(Visibility::Internal),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }

    /// Package-private is the absence of a keyword.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Visibility::Public => Some("public"),
            Visibility::Protected => Some("protected"),
            Visibility::Internal => Some("internal"),
            Visibility::Private => Some("private"),
            Visibility::PackagePrivate => None,
        }
    }

    /// Part of the API surface an external consumer can reach.
    pub fn is_api_visible(&self) -> bool {
        matches!(self, Visibility::Public | Visibility::Protected)
    }
}

/// Modifiers of a class or member, plus its use-site annotations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ModifierList {
    pub visibility: Visibility,
    pub is_abstract: bool,
    /// Java default interface method
    pub is_default: bool,
    pub is_static: bool,
    pub is_final: bool,
    /// Kotlin `const val`
    pub is_const: bool,
    pub is_sealed: bool,
    pub is_open: bool,
    pub is_transient: bool,
    pub is_volatile: bool,
    pub is_synchronized: bool,
    pub is_native: bool,
    pub is_suspend: bool,
    pub is_operator: bool,
    pub is_infix: bool,
    pub is_inline: bool,
    pub is_data: bool,
    pub is_companion: bool,
    pub annotations: Vec<AnnotationItem>,
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::PackagePrivate
    }
}

impl ModifierList {
    pub fn new(visibility: Visibility) -> Self {
        ModifierList {
            visibility,
            ..Default::default()
        }
    }

    /// True when `keyword` is a visibility or modifier keyword.
    pub fn is_keyword(keyword: &str) -> bool {
        Visibility::from_keyword(keyword).is_some()
            || matches!(
                keyword,
                "abstract" | "default" | "static" | "final" | "const" | "sealed" | "open"
                    | "transient" | "volatile" | "synchronized" | "native" | "suspend"
                    | "operator" | "infix" | "inline" | "data" | "companion"
            )
    }

    /// Apply a modifier keyword. Returns false for unrecognized keywords so
    /// callers can report them in their own terms.
    pub fn set_keyword(&mut self, keyword: &str) -> bool {
        if let Some(visibility) = Visibility::from_keyword(keyword) {
            self.visibility = visibility;
            return true;
        }
        match keyword {
            "abstract" => self.is_abstract = true,
            "default" => self.is_default = true,
            "static" => self.is_static = true,
            "final" => self.is_final = true,
            "const" => self.is_const = true,
            "sealed" => self.is_sealed = true,
            "open" => self.is_open = true,
            "transient" => self.is_transient = true,
            "volatile" => self.is_volatile = true,
            "synchronized" => self.is_synchronized = true,
            "native" => self.is_native = true,
            "suspend" => self.is_suspend = true,
            "operator" => self.is_operator = true,
            "infix" => self.is_infix = true,
            "inline" => self.is_inline = true,
            "data" => self.is_data = true,
            "companion" => self.is_companion = true,
            _ => return false,
        }
        true
    }

    /// Keywords in canonical order.
    pub fn keywords(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if let Some(keyword) = self.visibility.keyword() {
            out.push(keyword);
        }
        let flags: [(bool, &'static str); 17] = [
            (self.is_abstract, "abstract"),
            (self.is_default, "default"),
            (self.is_static, "static"),
            (self.is_final, "final"),
            (self.is_const, "const"),
            (self.is_sealed, "sealed"),
            (self.is_open, "open"),
            (self.is_transient, "transient"),
            (self.is_volatile, "volatile"),
            (self.is_synchronized, "synchronized"),
            (self.is_native, "native"),
            (self.is_suspend, "suspend"),
            (self.is_operator, "operator"),
            (self.is_infix, "infix"),
            (self.is_inline, "inline"),
            (self.is_data, "data"),
            (self.is_companion, "companion"),
        ];
        for (set, keyword) in flags {
            if set {
                out.push(keyword);
            }
        }
        out
    }

    /// Canonical keyword rendering (annotations are the writer's concern).
    /// `suppress_final` drops the redundant `final` on members of a final
    /// class and on enum constants.
    pub fn render_keywords(&self, suppress_final: bool) -> String {
        self.keywords()
            .into_iter()
            .filter(|k| !(suppress_final && *k == "final"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn add_annotation(&mut self, annotation: AnnotationItem) {
        if !self.annotations.contains(&annotation) {
            self.annotations.push(annotation);
        }
    }

    pub fn is_deprecated(&self) -> bool {
        self.annotations.iter().any(|a| a.is_deprecation())
    }

    /// Annotations that belong in emitted API output.
    pub fn significant_annotations(&self) -> impl Iterator<Item = &AnnotationItem> {
        self.annotations.iter().filter(|a| a.is_significant_in_api())
    }
}
