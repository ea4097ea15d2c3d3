// Signature format versions.
//
// The version only changes how types and defaults are spelled; the block
// grammar is shared. 2.0 expresses nullability as annotations, 3.0 switches
// to kotlin-style `?`/`!` suffixes, 4.0 additionally collapses Kotlin
// default-parameter expressions into an `optional` marker.

use crate::error::SignatureError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// Annotation-based nullability; the most widely published form
    #[default]
    V2,
    /// Kotlin-style nullability suffixes
    V3,
    /// V3 plus concise default-value markers
    V4,
}

impl FileFormat {
    pub const HEADER_PREFIX: &'static str = "// Signature format: ";

    pub fn kotlin_style_nulls(&self) -> bool {
        !matches!(self, FileFormat::V2)
    }

    pub fn concise_default_values(&self) -> bool {
        matches!(self, FileFormat::V4)
    }

    pub fn version(&self) -> &'static str {
        match self {
            FileFormat::V2 => "2.0",
            FileFormat::V3 => "3.0",
            FileFormat::V4 => "4.0",
        }
    }

    /// Exact header line, trailing newline included.
    pub fn header(&self) -> String {
        format!("{}{}\n", Self::HEADER_PREFIX, self.version())
    }

    /// Strict match on the first line of a signature file.
    pub fn parse_header(text: &str) -> Result<FileFormat, SignatureError> {
        let first_line = text.lines().next().unwrap_or("").trim_end();
        let version = first_line
            .strip_prefix(Self::HEADER_PREFIX)
            .ok_or(SignatureError::MissingHeader)?;
        match version.trim() {
            "2.0" => Ok(FileFormat::V2),
            "3.0" => Ok(FileFormat::V3),
            "4.0" => Ok(FileFormat::V4),
            other => Err(SignatureError::UnknownVersion {
                version: other.to_string(),
            }),
        }
    }
}
