use std::fs;
use std::io;
use std::path::Path;

use crate::ast::ast::Program;
use crate::emitter::emitter::emit_source;
use crate::errors::errors::Error;
use crate::host::host::HostModule;
use crate::parser::parser::parse;
use crate::type_checker::type_checker::type_check;
use crate::types::typesystem::TypeSystem;

/// Failure to obtain a host tree at all: the file was unreadable or its
/// JSON encoding malformed. Distinct from legality diagnostics, which
/// describe a well-formed host tree using unsupported syntax.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Encoding(serde_json::Error),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "Cannot read host tree: {}", e),
            LoadError::Encoding(e) => write!(f, "Malformed host tree: {}", e),
        }
    }
}

/// The front-end pipeline for one compilation unit.
pub struct Compiler {
    ts: TypeSystem,
}

impl Compiler {
    pub fn new() -> Self {
        Compiler {
            ts: TypeSystem::new(),
        }
    }

    pub fn type_system(&self) -> &TypeSystem {
        &self.ts
    }

    /// Reads a host module from a JSON file produced by the driver.
    pub fn load_module(&self, path: &Path) -> Result<HostModule, LoadError> {
        let text = fs::read_to_string(path).map_err(LoadError::Io)?;
        serde_json::from_str(&text).map_err(LoadError::Encoding)
    }

    /// Narrows a host module to the restricted AST. A non-empty error list
    /// means the unit is not checkable, whether or not a tree came back.
    pub fn parse(&self, module: &HostModule) -> (Option<Program>, Vec<Error>) {
        parse(module)
    }

    /// Type checks the tree in place; diagnostics land in the program's
    /// error list. Returns how many were added.
    pub fn typecheck(&self, program: &mut Program) -> usize {
        type_check(program, &self.ts)
    }

    /// Prints a checked tree as surface-syntax source.
    pub fn emit_source(&self, program: &mut Program) -> String {
        emit_source(program)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new()
    }
}
