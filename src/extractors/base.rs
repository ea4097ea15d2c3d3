// Shared tree-sitter plumbing for the source extractors.
//
// Thin helpers over a parsed file: node-text slicing with UTF-8 safety,
// child lookup by kind, doc-comment detection. Language specifics stay in
// the per-language extractors.

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_$][a-zA-Z0-9_$]*").expect("static pattern"));

/// Per-file extraction context shared by the language extractors.
pub struct SourceContext {
    pub language: &'static str,
    pub file_path: String,
    pub content: String,
}

impl SourceContext {
    pub fn new(language: &'static str, file_path: impl Into<String>, content: impl Into<String>) -> Self {
        SourceContext {
            language,
            file_path: file_path.into(),
            content: content.into(),
        }
    }

    /// Text of a node, sliced out of the file content.
    pub fn node_text(&self, node: &Node) -> String {
        let start_byte = node.start_byte();
        let end_byte = node.end_byte();
        let content_bytes = self.content.as_bytes();
        if start_byte < content_bytes.len() && end_byte <= content_bytes.len() {
            String::from_utf8_lossy(&content_bytes[start_byte..end_byte]).to_string()
        } else {
            String::new()
        }
    }

    /// First child of the given kind.
    pub fn find_child<'a>(&self, node: &Node<'a>, kind: &str) -> Option<Node<'a>> {
        let mut cursor = node.walk();
        node.children(&mut cursor).find(|c| c.kind() == kind)
    }

    /// First child matching any of the given kinds.
    pub fn find_child_by_kinds<'a>(&self, node: &Node<'a>, kinds: &[&str]) -> Option<Node<'a>> {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .find(|c| kinds.contains(&c.kind()))
    }

    /// All children of the given kind.
    pub fn find_children<'a>(&self, node: &Node<'a>, kind: &str) -> Vec<Node<'a>> {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .filter(|c| c.kind() == kind)
            .collect()
    }

    /// Text of the named grammar field, when present.
    pub fn field_text(&self, node: &Node, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|field_node| self.node_text(&field_node))
    }

    /// True when any direct child's text equals `text` (keyword probing).
    pub fn has_child_text(&self, node: &Node, text: &str) -> bool {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .any(|c| self.node_text(&c) == text)
    }

    /// Documentation comment immediately preceding a declaration.
    pub fn doc_comment(&self, node: &Node) -> Option<String> {
        if let Some(prev_sibling) = node.prev_named_sibling() {
            if prev_sibling.kind().contains("comment") {
                let text = self.node_text(&prev_sibling);
                if text.starts_with("/**") || text.starts_with("///") {
                    return Some(text);
                }
            }
        }
        None
    }

    /// Leading identifier of a node's text; fallback when the grammar gives
    /// no usable name node.
    pub fn identifier_fallback(&self, node: &Node) -> String {
        let node_text = self.node_text(node);
        let text = node_text.trim();
        match IDENTIFIER_RE.find(text) {
            Some(m) => m.as_str().to_string(),
            None => "Anonymous".to_string(),
        }
    }
}
