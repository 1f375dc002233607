//! The legality parser: host tree in, restricted AST out.
//!
//! This module narrows the unrestricted host syntax tree down to the
//! supported grammar, rejecting everything outside it with located,
//! recoverable diagnostics. It handles:
//!
//! - Statement and expression narrowing (closed node-kind set)
//! - Structural legality rules (declarations before statements, no nested
//!   definitions, no declarations in loop or branch bodies, literal
//!   initializers, single-operator comparisons)
//! - Left-associative reduction of multi-operand boolean chains
//! - Error recovery at list boundaries, so one pass surfaces every
//!   independent error
//! - 0-indexed to 1-indexed column conversion

pub mod parser;

#[cfg(test)]
mod tests;
