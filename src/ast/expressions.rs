use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use serde_json::{json, Value};

use crate::types::types::{SymbolType, ValueType};
use crate::Location;

use super::ast::VarInstance;

/// Binary operators of the restricted grammar. Chained host comparisons and
/// the operators outside this set are rejected by the legality parser, so
/// the checker can match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    FloorDiv,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    Is,
    And,
    Or,
}

impl BinaryOp {
    /// The surface spelling, used in diagnostics, the AST dump, and the
    /// emitted source.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Is => "is",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "not",
        }
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An expression node.
///
/// `inferred_type` is written exclusively by the type checker: `None`
/// before checking, `Some` for every reachable expression afterwards
/// (`object` on semantic failure). It holds a value type everywhere except
/// the callee identifier of a call, which records the resolved signature.
/// `should_box_as_ref` is storage for downstream code generation and stays
/// false here.
#[derive(Debug, Clone)]
pub struct Expr {
    pub location: Location,
    pub kind: ExprKind,
    pub inferred_type: Option<SymbolType>,
    pub error_msg: Option<String>,
    pub should_box_as_ref: bool,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Identifier {
        name: String,
        /// Non-owning link to the binding this use resolved to.
        var_instance: Option<Rc<RefCell<VarInstance>>>,
    },
    IntegerLiteral {
        value: i64,
    },
    BooleanLiteral {
        value: bool,
    },
    StringLiteral {
        value: String,
    },
    NoneLiteral,
    BinaryExpr {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },
    UnaryExpr {
        operator: UnaryOp,
        operand: Box<Expr>,
    },
    IfExpr {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    CallExpr {
        /// Always an `Identifier`; the parser rejects other receivers.
        function: Box<Expr>,
        args: Vec<Expr>,
        is_constructor: bool,
    },
}

impl Expr {
    pub fn new(location: Location, kind: ExprKind) -> Self {
        Expr {
            location,
            kind,
            inferred_type: None,
            error_msg: None,
            should_box_as_ref: false,
        }
    }

    pub fn identifier(location: Location, name: &str) -> Self {
        Expr::new(
            location,
            ExprKind::Identifier {
                name: name.to_string(),
                var_instance: None,
            },
        )
    }

    /// The identifier's name, if this is an identifier.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::IntegerLiteral { .. }
                | ExprKind::BooleanLiteral { .. }
                | ExprKind::StringLiteral { .. }
                | ExprKind::NoneLiteral
        )
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Identifier { .. } => "Identifier",
            ExprKind::IntegerLiteral { .. } => "IntegerLiteral",
            ExprKind::BooleanLiteral { .. } => "BooleanLiteral",
            ExprKind::StringLiteral { .. } => "StringLiteral",
            ExprKind::NoneLiteral => "NoneLiteral",
            ExprKind::BinaryExpr { .. } => "BinaryExpr",
            ExprKind::UnaryExpr { .. } => "UnaryExpr",
            ExprKind::IfExpr { .. } => "IfExpr",
            ExprKind::CallExpr { .. } => "CallExpr",
        }
    }

    /// The checked value type of this expression, with the `object`
    /// fallback for the cases the totality invariant rules out.
    pub fn static_type(&self) -> ValueType {
        match &self.inferred_type {
            Some(SymbolType::Value(v)) => v.clone(),
            _ => ValueType::Object,
        }
    }

    pub fn to_json(&self, dump_location: bool) -> Value {
        let mut d = json!({ "kind": self.kind_name() });
        let obj = d.as_object_mut().unwrap();
        if dump_location {
            obj.insert("location".to_string(), self.location.to_json());
        }
        if let Some(msg) = &self.error_msg {
            obj.insert("errorMsg".to_string(), json!(msg));
        }
        match &self.kind {
            ExprKind::Identifier { name, .. } => {
                obj.insert("name".to_string(), json!(name));
            }
            ExprKind::IntegerLiteral { value } => {
                obj.insert("value".to_string(), json!(value));
            }
            ExprKind::BooleanLiteral { value } => {
                obj.insert("value".to_string(), json!(value));
            }
            ExprKind::StringLiteral { value } => {
                obj.insert("value".to_string(), json!(value));
            }
            ExprKind::NoneLiteral => {
                obj.insert("value".to_string(), Value::Null);
            }
            ExprKind::BinaryExpr {
                left,
                operator,
                right,
            } => {
                obj.insert("left".to_string(), left.to_json(dump_location));
                obj.insert("operator".to_string(), json!(operator.as_str()));
                obj.insert("right".to_string(), right.to_json(dump_location));
            }
            ExprKind::UnaryExpr { operator, operand } => {
                obj.insert("operator".to_string(), json!(operator.as_str()));
                obj.insert("operand".to_string(), operand.to_json(dump_location));
            }
            ExprKind::IfExpr {
                condition,
                then_expr,
                else_expr,
            } => {
                obj.insert("condition".to_string(), condition.to_json(dump_location));
                obj.insert("thenExpr".to_string(), then_expr.to_json(dump_location));
                obj.insert("elseExpr".to_string(), else_expr.to_json(dump_location));
            }
            ExprKind::CallExpr { function, args, .. } => {
                obj.insert("function".to_string(), function.to_json(dump_location));
                obj.insert(
                    "args".to_string(),
                    Value::Array(args.iter().map(|a| a.to_json(dump_location)).collect()),
                );
            }
        }
        if let Some(t) = &self.inferred_type {
            obj.insert("inferredType".to_string(), t.to_json());
        }
        d
    }
}
