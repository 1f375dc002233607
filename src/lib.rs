#![allow(clippy::module_inception)]

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub mod ast;
pub mod compiler;
pub mod emitter;
pub mod errors;
pub mod host;
pub mod parser;
pub mod type_checker;
pub mod types;

/// A position in the source unit: line and column, both 1-indexed.
///
/// Host trees arrive with 0-indexed columns; the legality parser converts
/// them on entry so that every node and diagnostic in this crate speaks the
/// same coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub col: u32,
}

impl Location {
    pub fn new(line: u32, col: u32) -> Self {
        Location { line, col }
    }

    /// The placeholder location used for synthesized nodes.
    pub fn null() -> Self {
        Location { line: 0, col: 0 }
    }

    pub fn to_json(&self) -> Value {
        json!([self.line, self.col])
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {} Col {}", self.line, self.col)
    }
}
