/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Core AST definitions (program, declarations, typed variables)
/// - expressions: Definitions for the expression node kinds
/// - statements: Definitions for the statement node kinds
/// - visitor: The per-node-kind traversal protocol
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod visitor;
