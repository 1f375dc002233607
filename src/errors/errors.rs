use std::fmt::Display;

use serde_json::{json, Value};
use thiserror::Error as ThisError;

use crate::Location;

/// A located diagnostic.
///
/// Both diagnostic channels produce these: the legality parser while
/// narrowing the host tree, and the type checker while validating the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    location: Location,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, location: Location) -> Self {
        Error {
            internal_error: error_impl,
            location,
        }
    }

    pub fn get_location(&self) -> Location {
        self.location
    }

    pub fn kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::Unsupported => "Unsupported",
            ErrorImpl::UnsupportedOperator { .. } => "UnsupportedOperator",
            ErrorImpl::UnsupportedTypeAnnotation => "UnsupportedTypeAnnotation",
            ErrorImpl::UnsupportedListTypeAnnotation => "UnsupportedListTypeAnnotation",
            ErrorImpl::UnsupportedConstant => "UnsupportedConstant",
            ErrorImpl::UnsupportedIndexing => "UnsupportedIndexing",
            ErrorImpl::UnsupportedSlice => "UnsupportedSlice",
            ErrorImpl::UnsupportedDecorators => "UnsupportedDecorators",
            ErrorImpl::UnsupportedChainedCompare => "UnsupportedChainedCompare",
            ErrorImpl::TypeIgnore => "TypeIgnore",
            ErrorImpl::DeclarationAfterStatement => "DeclarationAfterStatement",
            ErrorImpl::NestedDefinition => "NestedDefinition",
            ErrorImpl::DeclarationInLoop => "DeclarationInLoop",
            ErrorImpl::DeclarationInConditional => "DeclarationInConditional",
            ErrorImpl::ExpectedLiteralValue => "ExpectedLiteralValue",
            ErrorImpl::ExpectedInitializingValue => "ExpectedInitializingValue",
            ErrorImpl::MissingTypeAnnotation => "MissingTypeAnnotation",
            ErrorImpl::ExpectedVariable => "ExpectedVariable",
            ErrorImpl::WhileElse => "WhileElse",
            ErrorImpl::InitReturnType => "InitReturnType",
            ErrorImpl::KeywordArgs => "KeywordArgs",
            ErrorImpl::InvalidCallReceiver => "InvalidCallReceiver",
            ErrorImpl::VariadicParams => "VariadicParams",
            ErrorImpl::KeywordParams => "KeywordParams",
            ErrorImpl::DefaultParams => "DefaultParams",
            ErrorImpl::DuplicateDeclaration { .. } => "DuplicateDeclaration",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::FunctionShadowsClass { .. } => "FunctionShadowsClass",
            ErrorImpl::FunctionRedeclared { .. } => "FunctionRedeclared",
            ErrorImpl::MissingSelfParam { .. } => "MissingSelfParam",
            ErrorImpl::DuplicateParameter { .. } => "DuplicateParameter",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
            ErrorImpl::NotDefinedInScope { .. } => "NotDefinedInScope",
            ErrorImpl::BadOperandTypes { .. } => "BadOperandTypes",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::NotAFunction { .. } => "NotAFunction",
            ErrorImpl::UnknownIdentifier { .. } => "UnknownIdentifier",
            ErrorImpl::UnknownClass { .. } => "UnknownClass",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::DeclarationAfterStatement => ErrorTip::Suggestion(String::from(
                "Move every declaration above the first statement of the block",
            )),
            ErrorImpl::NotDefinedInScope { name } => ErrorTip::Suggestion(format!(
                "Declare `{}` in this scope before assigning to it",
                name
            )),
            ErrorImpl::UnsupportedChainedCompare => ErrorTip::Suggestion(String::from(
                "Split the comparison into binary comparisons joined with `and`",
            )),
            ErrorImpl::ExpectedLiteralValue => ErrorTip::Suggestion(String::from(
                "Variable definitions must be initialized with a literal",
            )),
            ErrorImpl::MissingReturn { .. } => ErrorTip::Suggestion(String::from(
                "Every path through the function body must end in a return",
            )),
            _ => ErrorTip::None,
        }
    }

    /// The located message, in the `{message}. Line {l} Col {c}` form the
    /// diagnostic record and the AST dump both carry.
    pub fn message(&self) -> String {
        format!("{}. {}", self.internal_error, self.location)
    }

    pub fn to_json(&self) -> Value {
        json!({
            "kind": "CompilerError",
            "location": self.location.to_json(),
            "message": self.message(),
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Legality errors, raised while narrowing the host tree.
    #[error("Unsupported")]
    Unsupported,
    #[error("Unsupported operator: {operator}")]
    UnsupportedOperator { operator: String },
    #[error("Unsupported type annotation")]
    UnsupportedTypeAnnotation,
    #[error("Unsupported List type annotation")]
    UnsupportedListTypeAnnotation,
    #[error("Unsupported constant")]
    UnsupportedConstant,
    #[error("Unsupported index operation")]
    UnsupportedIndexing,
    #[error("Unsupported slice")]
    UnsupportedSlice,
    #[error("Unsupported decorator list")]
    UnsupportedDecorators,
    #[error("Unsupported compare between > 2 things")]
    UnsupportedChainedCompare,
    #[error("Cannot ignore type")]
    TypeIgnore,
    #[error("All declarations must come before statements")]
    DeclarationAfterStatement,
    #[error("Nested definitions are unsupported")]
    NestedDefinition,
    #[error("Cannot declare variables in loop")]
    DeclarationInLoop,
    #[error("Cannot declare variables in condition")]
    DeclarationInConditional,
    #[error("Expected literal value")]
    ExpectedLiteralValue,
    #[error("Expected initializing value")]
    ExpectedInitializingValue,
    #[error("Missing type annotation")]
    MissingTypeAnnotation,
    #[error("Expected variable")]
    ExpectedVariable,
    #[error("Cannot have else in while")]
    WhileElse,
    #[error("__init__ cannot have a return type")]
    InitReturnType,
    #[error("Keyword args are not supported")]
    KeywordArgs,
    #[error("Invalid receiver of call")]
    InvalidCallReceiver,
    #[error("Variable arguments are unsupported")]
    VariadicParams,
    #[error("Keyword arguments are unsupported")]
    KeywordParams,
    #[error("Default arguments are unsupported")]
    DefaultParams,

    // Type errors, accumulated by the checker.
    #[error("Duplicate declaration of identifier: {name}")]
    DuplicateDeclaration { name: String },
    #[error("Expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },
    #[error("Functions cannot shadow classes: {name}")]
    FunctionShadowsClass { name: String },
    #[error("Function redeclared: {name}")]
    FunctionRedeclared { name: String },
    #[error("Missing self param in method: {name}")]
    MissingSelfParam { name: String },
    #[error("Duplicate parameter name: {name}")]
    DuplicateParameter { name: String },
    #[error("Expected return statement of type {expected}")]
    MissingReturn { expected: String },
    #[error("Identifier not defined in current scope: {name}")]
    NotDefinedInScope { name: String },
    #[error("Cannot use operator {operator} on types {left} and {right}")]
    BadOperandTypes {
        operator: String,
        left: String,
        right: String,
    },
    #[error("Expected {expected} args, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    #[error("Not a function: {name}")]
    NotAFunction { name: String },
    #[error("Unknown identifier: {name}")]
    UnknownIdentifier { name: String },
    #[error("Unknown class: {name}")]
    UnknownClass { name: String },
    #[error("Return statement outside of function definition")]
    ReturnOutsideFunction,
}
