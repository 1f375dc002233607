use crate::ast::ast::{FuncDef, Program, TypeAnnotation, TypedVar, VarDef};
use crate::ast::expressions::{Expr, ExprKind};
use crate::ast::statements::{Stmt, StmtKind};
use crate::ast::visitor::{dispatch_declaration, dispatch_expr, dispatch_stmt, Visitor};
use crate::types::types::{FuncType, SymbolType};

/// An indentation-aware line buffer.
pub struct Builder {
    lines: Vec<String>,
    indentation: usize,
}

impl Builder {
    pub fn new() -> Self {
        Builder {
            lines: Vec::new(),
            indentation: 0,
        }
    }

    pub fn new_line(&mut self, line: &str) {
        self.lines.push(format!("{}{}", "    ".repeat(self.indentation), line));
    }

    pub fn add_text(&mut self, text: &str) {
        if self.lines.is_empty() {
            self.new_line("");
        }
        self.lines.last_mut().unwrap().push_str(text);
    }

    pub fn indent(&mut self) {
        self.indentation += 1;
    }

    pub fn unindent(&mut self) {
        self.indentation -= 1;
    }

    pub fn emit(&self) -> String {
        self.lines.join("\n")
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

/// Prints a checked program as surface-syntax source.
pub fn emit_source(program: &mut Program) -> String {
    let mut emitter = SourceEmitter::new();
    emitter.program(program);
    emitter.builder.emit()
}

/// The textual backend. Implements the visitor protocol and drives
/// dispatch itself so text and traversal interleave.
pub struct SourceEmitter {
    builder: Builder,
}

impl SourceEmitter {
    pub fn new() -> Self {
        SourceEmitter {
            builder: Builder::new(),
        }
    }

    fn emit_body(&mut self, statements: &mut [Stmt], was_empty: bool) {
        for stmt in statements.iter_mut() {
            dispatch_stmt(self, stmt);
        }
        if was_empty {
            self.builder.add_text("pass");
        }
    }

    /// Emits one call argument, wrapping it in a one-element cell when the
    /// parameter is passed by reference and the argument is not already a
    /// reference cell.
    fn emit_arg(&mut self, func_type: Option<&FuncType>, param_idx: usize, arg: &mut Expr) {
        if matches!(
            &arg.kind,
            ExprKind::Identifier {
                var_instance: None,
                ..
            }
        ) {
            dispatch_expr(self, arg);
            return;
        }
        let param_is_ref = func_type
            .map(|f| f.ref_params.contains(&param_idx))
            .unwrap_or(false);
        if param_is_ref {
            self.builder.add_text("[");
            dispatch_expr(self, arg);
            self.builder.add_text("]");
        } else {
            dispatch_expr(self, arg);
        }
    }
}

impl Default for SourceEmitter {
    fn default() -> Self {
        SourceEmitter::new()
    }
}

impl Visitor for SourceEmitter {
    // TOP LEVEL & DECLARATIONS

    fn program(&mut self, node: &mut Program) {
        for decl in node.declarations.iter_mut() {
            dispatch_declaration(self, decl);
        }
        for stmt in node.statements.iter_mut() {
            dispatch_stmt(self, stmt);
        }
    }

    fn var_def(&mut self, node: &mut VarDef) {
        self.builder.new_line("");
        self.typed_var(&mut node.var);
        self.builder.add_text(" = ");
        dispatch_expr(self, &mut node.value);
    }

    fn func_def(&mut self, node: &mut FuncDef) {
        self.builder.new_line("def ");
        dispatch_expr(self, &mut node.name);
        self.builder.add_text("(");
        let param_count = node.params.len();
        for (i, param) in node.params.iter_mut().enumerate() {
            self.typed_var(param);
            if i != param_count - 1 {
                self.builder.add_text(", ");
            }
        }
        self.builder.add_text("):");
        self.builder.indent();
        for decl in node.declarations.iter_mut() {
            dispatch_declaration(self, decl);
        }
        for stmt in node.statements.iter_mut() {
            dispatch_stmt(self, stmt);
        }
        if node.declarations.is_empty() && node.statements.is_empty() {
            self.builder.add_text("pass");
        }
        self.builder.unindent();
        self.builder.new_line("");
    }

    // STATEMENTS

    fn assign_stmt(&mut self, node: &mut Stmt) {
        let StmtKind::AssignStmt { targets, value } = &mut node.kind else {
            return;
        };
        if targets.len() == 1 {
            self.builder.new_line("");
            dispatch_expr(self, &mut targets[0]);
            self.builder.add_text(" = ");
            dispatch_expr(self, value);
        } else {
            // Evaluate once, then fan out to every target.
            self.builder.new_line("__x = ");
            dispatch_expr(self, value);
            for target in targets.iter_mut() {
                self.builder.new_line("");
                dispatch_expr(self, target);
                self.builder.add_text(" = __x");
            }
        }
    }

    fn if_stmt(&mut self, node: &mut Stmt) {
        let StmtKind::IfStmt {
            condition,
            then_body,
            else_body,
        } = &mut node.kind
        else {
            return;
        };
        self.builder.new_line("if ");
        dispatch_expr(self, condition);
        self.builder.add_text(":");
        self.builder.indent();
        let then_empty = then_body.is_empty();
        self.emit_body(then_body, then_empty);
        self.builder.unindent();
        self.builder.new_line("else:");
        self.builder.indent();
        let else_empty = else_body.is_empty();
        self.emit_body(else_body, else_empty);
        self.builder.unindent();
    }

    fn while_stmt(&mut self, node: &mut Stmt) {
        let StmtKind::WhileStmt { condition, body } = &mut node.kind else {
            return;
        };
        self.builder.new_line("while ");
        dispatch_expr(self, condition);
        self.builder.add_text(":");
        self.builder.indent();
        let body_empty = body.is_empty();
        self.emit_body(body, body_empty);
        self.builder.unindent();
    }

    fn return_stmt(&mut self, node: &mut Stmt) {
        let StmtKind::ReturnStmt { value, .. } = &mut node.kind else {
            return;
        };
        self.builder.new_line("return ");
        if let Some(value) = value {
            dispatch_expr(self, value);
        }
    }

    fn expr_stmt(&mut self, node: &mut Stmt) {
        let StmtKind::ExprStmt { expr } = &mut node.kind else {
            return;
        };
        self.builder.new_line("");
        dispatch_expr(self, expr);
    }

    // EXPRESSIONS

    fn identifier(&mut self, node: &mut Expr) {
        if let Some(name) = node.name() {
            let name = name.to_string();
            self.builder.add_text(&name);
        }
    }

    fn binary_expr(&mut self, node: &mut Expr) {
        let ExprKind::BinaryExpr {
            left,
            operator,
            right,
        } = &mut node.kind
        else {
            return;
        };
        let operator = *operator;
        self.builder.add_text("(");
        dispatch_expr(self, left);
        self.builder.add_text(&format!(" {} ", operator));
        dispatch_expr(self, right);
        self.builder.add_text(")");
    }

    fn unary_expr(&mut self, node: &mut Expr) {
        let ExprKind::UnaryExpr { operator, operand } = &mut node.kind else {
            return;
        };
        let operator = *operator;
        self.builder.add_text("(");
        self.builder.add_text(&format!("{} ", operator));
        dispatch_expr(self, operand);
        self.builder.add_text(")");
    }

    fn if_expr(&mut self, node: &mut Expr) {
        let ExprKind::IfExpr {
            condition,
            then_expr,
            else_expr,
        } = &mut node.kind
        else {
            return;
        };
        self.builder.add_text("(");
        dispatch_expr(self, then_expr);
        self.builder.add_text(" if ");
        dispatch_expr(self, condition);
        self.builder.add_text(" else ");
        dispatch_expr(self, else_expr);
        self.builder.add_text(")");
    }

    fn call_expr(&mut self, node: &mut Expr) {
        let ExprKind::CallExpr {
            function,
            args,
            is_constructor,
        } = &mut node.kind
        else {
            return;
        };
        let is_constructor = *is_constructor;
        let func_name = function.name().unwrap_or("").to_string();
        // Built-ins are always emitted unwrapped.
        if func_name == "__assert__" {
            self.builder.add_text("assert ");
            if let Some(arg) = args.first_mut() {
                dispatch_expr(self, arg);
            }
            return;
        }
        if func_name == "print" || func_name == "len" {
            dispatch_expr(self, function);
            self.builder.add_text("(");
            if let Some(arg) = args.first_mut() {
                dispatch_expr(self, arg);
            }
            self.builder.add_text(")");
            return;
        }
        let func_type = match &function.inferred_type {
            Some(SymbolType::Func(f)) => Some(f.clone()),
            _ => None,
        };
        dispatch_expr(self, function);
        self.builder.add_text("(");
        let arg_count = args.len();
        for (i, arg) in args.iter_mut().enumerate() {
            let param_idx = if is_constructor { i + 1 } else { i };
            self.emit_arg(func_type.as_ref(), param_idx, arg);
            if i != arg_count - 1 {
                self.builder.add_text(", ");
            }
        }
        self.builder.add_text(")");
    }

    // LITERALS

    fn boolean_literal(&mut self, node: &mut Expr) {
        if let ExprKind::BooleanLiteral { value } = &node.kind {
            let text = if *value { "True" } else { "False" };
            self.builder.add_text(text);
        }
    }

    fn integer_literal(&mut self, node: &mut Expr) {
        if let ExprKind::IntegerLiteral { value } = &node.kind {
            let text = value.to_string();
            self.builder.add_text(&text);
        }
    }

    fn none_literal(&mut self, _node: &mut Expr) {
        self.builder.add_text("None");
    }

    fn string_literal(&mut self, node: &mut Expr) {
        if let ExprKind::StringLiteral { value } = &node.kind {
            // Quote and escape through the JSON encoder.
            let text = serde_json::to_string(value).expect("strings always encode");
            self.builder.add_text(&text);
        }
    }

    // TYPES

    fn typed_var(&mut self, node: &mut TypedVar) {
        let name = node.name().to_string();
        self.builder.add_text(&name);
    }

    fn class_type(&mut self, node: &mut TypeAnnotation) {
        let name = node.class_name().to_string();
        self.builder.add_text(&name);
    }
}
