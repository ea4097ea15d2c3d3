//! Error types for apiscope.
//!
//! Each layer gets its own `thiserror` enum; `ApiError` is the umbrella type
//! returned by the top-level entry points.

use thiserror::Error;

/// Result type for apiscope operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Umbrella error for the crate's public entry points
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while parsing or writing signature files
#[derive(Error, Debug)]
pub enum SignatureError {
    /// Malformed signature text. Line numbers are 1-based.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The header named a format version this build does not understand
    #[error("unsupported signature format version {version:?}")]
    UnknownVersion { version: String },

    /// The input did not start with a `// Signature format:` header
    #[error("missing signature format header")]
    MissingHeader,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading and extracting source trees
#[derive(Error, Debug)]
pub enum SourceError {
    /// tree-sitter could not produce a usable tree for this file
    #[error("{path}: {message}")]
    Parse { path: String, message: String },

    /// File extension maps to no registered extractor
    #[error("unsupported source language for {path}")]
    UnsupportedLanguage { path: String },

    /// Grammar failed to load into the parser
    #[error("grammar error: {0}")]
    Grammar(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SignatureError {
    /// Shorthand used throughout the signature parser
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        SignatureError::Parse {
            line,
            message: message.into(),
        }
    }
}
