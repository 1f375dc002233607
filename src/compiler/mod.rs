//! Main compiler module.
//!
//! This module contains the core Compiler structure and implements the
//! compilation pipeline for one source unit:
//!
//! - Loading a host syntax tree from its JSON encoding
//! - Narrowing it to the restricted AST (legality parsing)
//! - Type checking the tree in place
//! - Emitting surface-syntax source from the checked tree
//!
//! The two diagnostic channels stay separate: a non-empty parse error list
//! means the unit is not checkable, and a non-empty check error list means
//! it must not reach emission.

pub mod compiler;
