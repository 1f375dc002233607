use serde_json::{json, Value};

use crate::types::types::ValueType;
use crate::Location;

use super::expressions::Expr;

/// A statement node.
///
/// `is_return` records the return-reachability judgement: true iff every
/// path through the statement is statically judged to end in a return. The
/// checker writes it; it is true from construction only for return
/// statements.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub location: Location,
    pub kind: StmtKind,
    pub is_return: bool,
    pub error_msg: Option<String>,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    AssignStmt {
        targets: Vec<Expr>,
        value: Expr,
    },
    IfStmt {
        condition: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },
    WhileStmt {
        condition: Expr,
        body: Vec<Stmt>,
    },
    ReturnStmt {
        value: Option<Expr>,
        /// The enclosing function's declared return type, recorded by the
        /// checker for downstream emitters.
        exp_type: Option<ValueType>,
    },
    ExprStmt {
        expr: Expr,
    },
}

impl Stmt {
    pub fn new(location: Location, kind: StmtKind) -> Self {
        let is_return = matches!(kind, StmtKind::ReturnStmt { .. });
        Stmt {
            location,
            kind,
            is_return,
            error_msg: None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            StmtKind::AssignStmt { .. } => "AssignStmt",
            StmtKind::IfStmt { .. } => "IfStmt",
            StmtKind::WhileStmt { .. } => "WhileStmt",
            StmtKind::ReturnStmt { .. } => "ReturnStmt",
            StmtKind::ExprStmt { .. } => "ExprStmt",
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
            StmtKind::AssignStmt { targets, value } => {
                obj.insert(
                    "targets".to_string(),
                    Value::Array(targets.iter().map(|t| t.to_json(dump_location)).collect()),
                );
                obj.insert("value".to_string(), value.to_json(dump_location));
            }
            StmtKind::IfStmt {
                condition,
                then_body,
                else_body,
            } => {
                obj.insert("condition".to_string(), condition.to_json(dump_location));
                obj.insert(
                    "thenBody".to_string(),
                    Value::Array(then_body.iter().map(|s| s.to_json(dump_location)).collect()),
                );
                obj.insert(
                    "elseBody".to_string(),
                    Value::Array(else_body.iter().map(|s| s.to_json(dump_location)).collect()),
                );
            }
            StmtKind::WhileStmt { condition, body } => {
                obj.insert("condition".to_string(), condition.to_json(dump_location));
                obj.insert(
                    "body".to_string(),
                    Value::Array(body.iter().map(|s| s.to_json(dump_location)).collect()),
                );
            }
            StmtKind::ReturnStmt { value, .. } => {
                obj.insert(
                    "value".to_string(),
                    match value {
                        Some(v) => v.to_json(dump_location),
                        None => Value::Null,
                    },
                );
            }
            StmtKind::ExprStmt { expr } => {
                obj.insert("expr".to_string(), expr.to_json(dump_location));
            }
        }
        d
    }
}
