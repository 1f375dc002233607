//! The generic host syntax tree consumed by the legality parser.
//!
//! This module defines the unrestricted surface grammar as it arrives from
//! the driver: every construct of the host scripting language is present as
//! a variant, including the many forms the legality parser rejects. It
//! handles:
//!
//! - Deserialization of host trees from their JSON encoding
//! - Statement, expression, operator and parameter-list node kinds
//! - 0-indexed host locations (converted to 1-indexed by the parser)
//!
//! Nothing in this module judges legality; that is the parser's job.

pub mod host;
