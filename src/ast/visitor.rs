//! The traversal protocol over the AST.
//!
//! A consumer implements [`Visitor`], overriding only the node kinds it
//! cares about; every callback defaults to a no-op. `dispatch_*` invokes
//! exactly one callback for a node's kind, while the `walk_*` functions
//! provide pre-order (callback before children) and post-order (children
//! before callback) traversals. The type checker relies on post-order so
//! that every child's inferred type is available when the parent's callback
//! runs; the source emitter drives `dispatch_*` directly to control
//! interleaving.

use super::ast::{Declaration, FuncDef, Program, TypeAnnotation, TypedVar, VarDef};
use super::expressions::{Expr, ExprKind};
use super::statements::{Stmt, StmtKind};

/// One callback per node kind, each defaulting to a no-op.
pub trait Visitor {
    // TOP LEVEL & DECLARATIONS

    fn program(&mut self, _node: &mut Program) {}
    fn var_def(&mut self, _node: &mut VarDef) {}
    fn func_def(&mut self, _node: &mut FuncDef) {}

    // STATEMENTS

    fn assign_stmt(&mut self, _node: &mut Stmt) {}
    fn if_stmt(&mut self, _node: &mut Stmt) {}
    fn while_stmt(&mut self, _node: &mut Stmt) {}
    fn return_stmt(&mut self, _node: &mut Stmt) {}
    fn expr_stmt(&mut self, _node: &mut Stmt) {}

    // EXPRESSIONS

    fn identifier(&mut self, _node: &mut Expr) {}
    fn binary_expr(&mut self, _node: &mut Expr) {}
    fn unary_expr(&mut self, _node: &mut Expr) {}
    fn if_expr(&mut self, _node: &mut Expr) {}
    fn call_expr(&mut self, _node: &mut Expr) {}

    // LITERALS

    fn boolean_literal(&mut self, _node: &mut Expr) {}
    fn integer_literal(&mut self, _node: &mut Expr) {}
    fn none_literal(&mut self, _node: &mut Expr) {}
    fn string_literal(&mut self, _node: &mut Expr) {}

    // TYPES

    fn typed_var(&mut self, _node: &mut TypedVar) {}
    fn class_type(&mut self, _node: &mut TypeAnnotation) {}
}

/// Invokes the single callback matching the expression's kind.
pub fn dispatch_expr<V: Visitor + ?Sized>(v: &mut V, node: &mut Expr) {
    match &node.kind {
        ExprKind::Identifier { .. } => v.identifier(node),
        ExprKind::IntegerLiteral { .. } => v.integer_literal(node),
        ExprKind::BooleanLiteral { .. } => v.boolean_literal(node),
        ExprKind::StringLiteral { .. } => v.string_literal(node),
        ExprKind::NoneLiteral => v.none_literal(node),
        ExprKind::BinaryExpr { .. } => v.binary_expr(node),
        ExprKind::UnaryExpr { .. } => v.unary_expr(node),
        ExprKind::IfExpr { .. } => v.if_expr(node),
        ExprKind::CallExpr { .. } => v.call_expr(node),
    }
}

/// Invokes the single callback matching the statement's kind.
pub fn dispatch_stmt<V: Visitor + ?Sized>(v: &mut V, node: &mut Stmt) {
    match &node.kind {
        StmtKind::AssignStmt { .. } => v.assign_stmt(node),
        StmtKind::IfStmt { .. } => v.if_stmt(node),
        StmtKind::WhileStmt { .. } => v.while_stmt(node),
        StmtKind::ReturnStmt { .. } => v.return_stmt(node),
        StmtKind::ExprStmt { .. } => v.expr_stmt(node),
    }
}

/// Invokes the single callback matching the declaration's kind.
pub fn dispatch_declaration<V: Visitor + ?Sized>(v: &mut V, node: &mut Declaration) {
    match node {
        Declaration::Var(var_def) => v.var_def(var_def),
        Declaration::Func(func_def) => v.func_def(func_def),
    }
}

fn walk_expr_children<V: Visitor + ?Sized>(v: &mut V, node: &mut Expr, preorder: bool) {
    match &mut node.kind {
        ExprKind::BinaryExpr { left, right, .. } => {
            walk_expr(v, left, preorder);
            walk_expr(v, right, preorder);
        }
        ExprKind::UnaryExpr { operand, .. } => walk_expr(v, operand, preorder),
        ExprKind::IfExpr {
            condition,
            then_expr,
            else_expr,
        } => {
            walk_expr(v, condition, preorder);
            walk_expr(v, then_expr, preorder);
            walk_expr(v, else_expr, preorder);
        }
        // The callee identifier is not a child in the value sense; the
        // call callback owns it.
        ExprKind::CallExpr { args, .. } => {
            for arg in args {
                walk_expr(v, arg, preorder);
            }
        }
        ExprKind::Identifier { .. }
        | ExprKind::IntegerLiteral { .. }
        | ExprKind::BooleanLiteral { .. }
        | ExprKind::StringLiteral { .. }
        | ExprKind::NoneLiteral => {}
    }
}

fn walk_expr<V: Visitor + ?Sized>(v: &mut V, node: &mut Expr, preorder: bool) {
    if preorder {
        dispatch_expr(v, node);
        walk_expr_children(v, node, preorder);
    } else {
        walk_expr_children(v, node, preorder);
        dispatch_expr(v, node);
    }
}

pub fn walk_expr_preorder<V: Visitor + ?Sized>(v: &mut V, node: &mut Expr) {
    walk_expr(v, node, true);
}

pub fn walk_expr_postorder<V: Visitor + ?Sized>(v: &mut V, node: &mut Expr) {
    walk_expr(v, node, false);
}

fn walk_stmt_children<V: Visitor + ?Sized>(v: &mut V, node: &mut Stmt, preorder: bool) {
    match &mut node.kind {
        StmtKind::AssignStmt { targets, value } => {
            for target in targets {
                walk_expr(v, target, preorder);
            }
            walk_expr(v, value, preorder);
        }
        StmtKind::IfStmt {
            condition,
            then_body,
            else_body,
        } => {
            walk_expr(v, condition, preorder);
            for s in then_body {
                walk_stmt(v, s, preorder);
            }
            for s in else_body {
                walk_stmt(v, s, preorder);
            }
        }
        StmtKind::WhileStmt { condition, body } => {
            walk_expr(v, condition, preorder);
            for s in body {
                walk_stmt(v, s, preorder);
            }
        }
        StmtKind::ReturnStmt { value, .. } => {
            if let Some(value) = value {
                walk_expr(v, value, preorder);
            }
        }
        StmtKind::ExprStmt { expr } => walk_expr(v, expr, preorder),
    }
}

fn walk_stmt<V: Visitor + ?Sized>(v: &mut V, node: &mut Stmt, preorder: bool) {
    if preorder {
        dispatch_stmt(v, node);
        walk_stmt_children(v, node, preorder);
    } else {
        walk_stmt_children(v, node, preorder);
        dispatch_stmt(v, node);
    }
}

pub fn walk_stmt_preorder<V: Visitor + ?Sized>(v: &mut V, node: &mut Stmt) {
    walk_stmt(v, node, true);
}

pub fn walk_stmt_postorder<V: Visitor + ?Sized>(v: &mut V, node: &mut Stmt) {
    walk_stmt(v, node, false);
}

fn walk_typed_var<V: Visitor + ?Sized>(v: &mut V, node: &mut TypedVar, preorder: bool) {
    if preorder {
        v.typed_var(node);
        v.class_type(&mut node.type_annotation);
    } else {
        v.class_type(&mut node.type_annotation);
        v.typed_var(node);
    }
}

fn walk_declaration<V: Visitor + ?Sized>(v: &mut V, node: &mut Declaration, preorder: bool) {
    match node {
        Declaration::Var(var_def) => {
            if preorder {
                v.var_def(var_def);
            }
            walk_typed_var(v, &mut var_def.var, preorder);
            walk_expr(v, &mut var_def.value, preorder);
            if !preorder {
                v.var_def(var_def);
            }
        }
        Declaration::Func(func_def) => {
            if preorder {
                v.func_def(func_def);
            }
            for param in &mut func_def.params {
                walk_typed_var(v, param, preorder);
            }
            v.class_type(&mut func_def.return_type);
            for decl in &mut func_def.declarations {
                walk_declaration(v, decl, preorder);
            }
            for stmt in &mut func_def.statements {
                walk_stmt(v, stmt, preorder);
            }
            if !preorder {
                v.func_def(func_def);
            }
        }
    }
}

pub fn walk_declaration_preorder<V: Visitor + ?Sized>(v: &mut V, node: &mut Declaration) {
    walk_declaration(v, node, true);
}

pub fn walk_declaration_postorder<V: Visitor + ?Sized>(v: &mut V, node: &mut Declaration) {
    walk_declaration(v, node, false);
}

pub fn walk_program_preorder<V: Visitor + ?Sized>(v: &mut V, node: &mut Program) {
    v.program(node);
    for decl in &mut node.declarations {
        walk_declaration(v, decl, true);
    }
    for stmt in &mut node.statements {
        walk_stmt(v, stmt, true);
    }
}

pub fn walk_program_postorder<V: Visitor + ?Sized>(v: &mut V, node: &mut Program) {
    for decl in &mut node.declarations {
        walk_declaration(v, decl, false);
    }
    for stmt in &mut node.statements {
        walk_stmt(v, stmt, false);
    }
    v.program(node);
}
