//! Error types and error handling for the compiler front end.
//!
//! This module defines the diagnostic type shared by the two reporting
//! channels. It includes:
//!
//! - Error structures with source location information
//! - Specific error variants for the legality and type-checking phases
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions
//!
//! The two channels (legality errors raised while narrowing the host tree,
//! type errors accumulated while checking) use the same `Error` type but are
//! collected in separate lists and never merged.

pub mod errors;

#[cfg(test)]
mod tests;
