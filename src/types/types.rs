use std::fmt::Display;

use serde_json::{json, Value};

/// The static type of a runtime value.
///
/// A closed lattice: the three primitives, `object` at the top, the
/// `<None>` and `<Empty>` sentinels for the null and empty literals, and a
/// named-class escape hatch kept for forward compatibility (no user classes
/// exist in this subset). Equality is structural; `from_class_name`
/// normalizes the well-known names so a given type has exactly one
/// representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Bool,
    Str,
    Object,
    None,
    Empty,
    Class(String),
}

impl ValueType {
    pub fn from_class_name(name: &str) -> ValueType {
        match name {
            "int" => ValueType::Int,
            "bool" => ValueType::Bool,
            "str" => ValueType::Str,
            "object" => ValueType::Object,
            "<None>" => ValueType::None,
            "<Empty>" => ValueType::Empty,
            other => ValueType::Class(other.to_string()),
        }
    }

    pub fn class_name(&self) -> &str {
        match self {
            ValueType::Int => "int",
            ValueType::Bool => "bool",
            ValueType::Str => "str",
            ValueType::Object => "object",
            ValueType::None => "<None>",
            ValueType::Empty => "<Empty>",
            ValueType::Class(name) => name,
        }
    }

    /// Whether this is one of the three primitive value types, which are
    /// excluded from `<None>`/`<Empty>` assignability and from `is`.
    pub fn is_special_type(&self) -> bool {
        matches!(self, ValueType::Int | ValueType::Bool | ValueType::Str)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ValueType::None)
    }

    pub fn to_json(&self) -> Value {
        json!({
            "kind": "ClassValueType",
            "className": self.class_name(),
        })
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.class_name())
    }
}

/// A callable signature. Lives in the symbol table only; `can_assign` never
/// sees one.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncType {
    pub parameters: Vec<ValueType>,
    pub return_type: ValueType,
    /// Indices of parameters passed by reference. Empty until a downstream
    /// code generation pass fills it in.
    pub ref_params: Vec<usize>,
}

impl FuncType {
    pub fn new(parameters: Vec<ValueType>, return_type: ValueType) -> Self {
        FuncType {
            parameters,
            return_type,
            ref_params: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "kind": "FuncType",
            "parameters": self.parameters.iter().map(|p| p.to_json()).collect::<Vec<_>>(),
            "returnType": self.return_type.to_json(),
        })
    }
}

impl Display for FuncType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
        write!(f, "[{}] -> {}", params.join(", "), self.return_type)
    }
}

/// An entry in the symbol table: either a value binding or a function
/// signature.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolType {
    Value(ValueType),
    Func(FuncType),
}

impl SymbolType {
    pub fn as_value(&self) -> Option<&ValueType> {
        match self {
            SymbolType::Value(v) => Some(v),
            SymbolType::Func(_) => None,
        }
    }

    pub fn as_func(&self) -> Option<&FuncType> {
        match self {
            SymbolType::Func(f) => Some(f),
            SymbolType::Value(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            SymbolType::Value(v) => v.to_json(),
            SymbolType::Func(f) => f.to_json(),
        }
    }
}

impl Display for SymbolType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolType::Value(v) => write!(f, "{}", v),
            SymbolType::Func(func) => write!(f, "{}", func),
        }
    }
}

impl From<ValueType> for SymbolType {
    fn from(v: ValueType) -> Self {
        SymbolType::Value(v)
    }
}

impl From<FuncType> for SymbolType {
    fn from(f: FuncType) -> Self {
        SymbolType::Func(f)
    }
}
