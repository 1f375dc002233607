//! Source emission module.
//!
//! This module contains the textual code generator that prints a checked
//! AST back out as annotation-free source in the surface syntax. It
//! handles:
//!
//! - Indentation-aware line building
//! - Emission of every declaration, statement and expression kind
//! - Special-cased built-in calls
//! - By-reference argument cells, when a downstream pass has marked
//!   reference parameters
//!
//! The emitter is a mechanical consumer of the visitor protocol; it assumes
//! the tree type checked cleanly.

pub mod emitter;
