// apiscope's Source Extractors Module
//
// Tree-sitter based backends that turn Java and Kotlin sources into the
// unified model. The loader walks source roots, parses files in parallel,
// and merges the per-file fragments into one Codebase; files that fail to
// parse are reported without aborting the load.

pub mod base;
pub mod java;
pub mod kotlin;

use crate::error::SourceError;
use crate::model::{ClassItem, Codebase};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tree_sitter::Parser;
use walkdir::WalkDir;

pub use base::SourceContext;
pub use java::JavaExtractor;
pub use kotlin::KotlinExtractor;

/// The API fragment extracted from a single source file.
pub struct FileApi {
    pub package: String,
    pub classes: Vec<ClassItem>,
}

/// Extract the API fragment of a single Java compilation unit.
pub fn extract_java(file_path: &str, content: &str) -> std::result::Result<FileApi, SourceError> {
    let tree = parse_with(&tree_sitter_java::LANGUAGE.into(), file_path, content)?;
    Ok(JavaExtractor::new(file_path, content).extract(&tree))
}

/// Extract the API fragment of a single Kotlin file.
pub fn extract_kotlin(file_path: &str, content: &str) -> std::result::Result<FileApi, SourceError> {
    let tree = parse_with(&tree_sitter_kotlin_ng::LANGUAGE.into(), file_path, content)?;
    Ok(KotlinExtractor::new(file_path, content).extract(&tree))
}

fn parse_with(
    language: &tree_sitter::Language,
    file_path: &str,
    content: &str,
) -> std::result::Result<tree_sitter::Tree, SourceError> {
    let mut parser = Parser::new();
    parser
        .set_language(language)
        .map_err(|e| SourceError::Grammar(e.to_string()))?;
    let tree = parser.parse(content, None).ok_or_else(|| SourceError::Parse {
        path: file_path.to_string(),
        message: "tree-sitter produced no tree".to_string(),
    })?;
    if tree.root_node().has_error() {
        // Extraction still runs; tree-sitter recovers around errors
        warn!("{}: syntax errors in source, extracting best-effort", file_path);
    }
    Ok(tree)
}

/// Result of loading one or more source roots.
pub struct LoadOutcome {
    pub codebase: Codebase,
    /// Per-file failures; the codebase holds everything that did parse
    pub errors: Vec<SourceError>,
}

/// Walks source roots and builds a Codebase from every `.java`/`.kt` file.
pub struct SourceLoader {
    roots: Vec<PathBuf>,
    api_only: bool,
}

impl SourceLoader {
    pub fn new() -> Self {
        SourceLoader {
            roots: Vec::new(),
            api_only: false,
        }
    }

    pub fn add_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Keep only the public/protected API surface after extraction.
    pub fn api_only(mut self, api_only: bool) -> Self {
        self.api_only = api_only;
        self
    }

    pub fn load(&self) -> Result<LoadOutcome> {
        let files = self.discover_files()?;
        debug!("loading {} source files", files.len());

        let results: Vec<std::result::Result<FileApi, SourceError>> = files
            .par_iter()
            .map(|path| Self::extract_file(path))
            .collect();

        let mut codebase = Codebase::new(format!(
            "{} source root{}",
            self.roots.len(),
            if self.roots.len() == 1 { "" } else { "s" }
        ));
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(fragment) => {
                    for class in fragment.classes {
                        codebase.add_class(&fragment.package, class);
                    }
                }
                Err(error) => {
                    warn!("source load failure: {}", error);
                    errors.push(error);
                }
            }
        }
        if self.api_only {
            codebase.retain_api_surface();
        }
        codebase.canonicalize();
        Ok(LoadOutcome { codebase, errors })
    }

    fn discover_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for root in &self.roots {
            for entry in WalkDir::new(root).follow_links(false) {
                let entry = entry.with_context(|| format!("walking {}", root.display()))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                if is_supported_file(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        }
        files.sort();
        Ok(files)
    }

    fn extract_file(path: &Path) -> std::result::Result<FileApi, SourceError> {
        let path_str = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path_str.clone(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("java") => extract_java(&path_str, &content),
            Some("kt") | Some("kts") => extract_kotlin(&path_str, &content),
            _ => Err(SourceError::UnsupportedLanguage { path: path_str }),
        }
    }
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Source extensions with a registered extractor.
pub fn is_supported_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("java" | "kt" | "kts")
    )
}
