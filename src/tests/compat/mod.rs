// Compatibility Checker Tests

pub mod compat_tests;

use crate::model::Codebase;
use crate::signature::SignatureParser;

/// Compat fixtures are easiest to read as signature text.
pub fn parse(text: &str) -> Codebase {
    SignatureParser::parse(text).expect("fixture must parse")
}
