// apiscope's Signature File Module
//
// The textual serialization of an API surface: a versioned header followed
// by package blocks of class declarations. The parser and writer are exact
// inverses over canonical forms - `parse(write(cb)) == cb` for every format
// a codebase is expressible in.

pub mod format;
pub mod parser;
pub mod writer;

pub use format::FileFormat;
pub use parser::SignatureParser;
pub use writer::SignatureWriter;
