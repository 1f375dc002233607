use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::ast::{Declaration, FuncDef, Program, TypeAnnotation, TypedVar, VarDef, VarInstance};
use crate::ast::expressions::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::ast::statements::{Stmt, StmtKind};
use crate::errors::errors::{Error, ErrorImpl};
use crate::types::types::{FuncType, SymbolType, ValueType};
use crate::types::typesystem::{TypeSystem, BUILTIN_FUNCTIONS};
use crate::Location;

/// One binding in a scope frame: the symbol's type, and the binding record
/// when the symbol is a variable (functions have none).
#[derive(Debug, Clone)]
pub struct ScopeEntry {
    pub symbol: SymbolType,
    pub instance: Option<Rc<RefCell<VarInstance>>>,
}

/// The scoped, error-accumulating checker.
///
/// Holds a stack of scope frames (index 0 is the permanent global scope,
/// pre-populated with the built-in signatures) and the registry for the
/// compilation unit. Only this type writes the AST's annotation slots.
pub struct TypeChecker<'ts> {
    symbol_tables: Vec<HashMap<String, ScopeEntry>>,
    ts: &'ts TypeSystem,
    errors: Vec<Error>,
    current_class: Option<String>,
    exp_return_type: Option<ValueType>,
}

/// Type checks a program in place, appending diagnostics to the program's
/// error list. Returns how many were added.
pub fn type_check(program: &mut Program, ts: &TypeSystem) -> usize {
    let mut checker = TypeChecker::new(ts);
    checker.check_program(program);
    let added = checker.errors.len();
    program.errors.errors.extend(checker.errors);
    added
}

impl<'ts> TypeChecker<'ts> {
    pub fn new(ts: &'ts TypeSystem) -> Self {
        let mut globals = HashMap::new();
        for (name, signature) in BUILTIN_FUNCTIONS.iter() {
            globals.insert(
                name.to_string(),
                ScopeEntry {
                    symbol: SymbolType::Func(signature.clone()),
                    instance: None,
                },
            );
        }
        TypeChecker {
            symbol_tables: vec![globals],
            ts,
            errors: Vec::new(),
            current_class: None,
            exp_return_type: None,
        }
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    // SCOPE MANAGEMENT

    fn enter_scope(&mut self) {
        self.symbol_tables.push(HashMap::new());
    }

    fn exit_scope(&mut self) {
        self.symbol_tables.pop();
    }

    /// Nesting depth of the current scope; 0 is the global scope.
    fn depth(&self) -> usize {
        self.symbol_tables.len() - 1
    }

    // SYMBOL TABLE LOOKUPS

    /// Searches every scope, innermost first (the shadowing rule).
    pub fn get_type(&self, name: &str) -> Option<&ScopeEntry> {
        self.symbol_tables
            .iter()
            .rev()
            .find_map(|table| table.get(name))
    }

    /// Searches every scope except the global one, innermost first.
    pub fn get_local_type(&self, name: &str) -> Option<&ScopeEntry> {
        self.symbol_tables[1..]
            .iter()
            .rev()
            .find_map(|table| table.get(name))
    }

    /// Searches the global scope only.
    pub fn get_global(&self, name: &str) -> Option<&ScopeEntry> {
        self.symbol_tables[0].get(name)
    }

    pub fn def_in_current_scope(&self, name: &str) -> bool {
        self.symbol_tables
            .last()
            .expect("the global scope is never popped")
            .contains_key(name)
    }

    fn add_type(&mut self, name: &str, entry: ScopeEntry) {
        self.symbol_tables
            .last_mut()
            .expect("the global scope is never popped")
            .insert(name.to_string(), entry);
    }

    /// Installs a variable binding along with its instance record, and
    /// returns the record so the declaration site can link it.
    fn bind_var(&mut self, name: &str, t: ValueType) -> Rc<RefCell<VarInstance>> {
        let instance = Rc::new(RefCell::new(VarInstance::new(name, self.depth())));
        self.add_type(
            name,
            ScopeEntry {
                symbol: SymbolType::Value(t),
                instance: Some(Rc::clone(&instance)),
            },
        );
        instance
    }

    // ERROR HANDLING

    /// Records a diagnostic against a node's `error_msg` slot. Only the
    /// first diagnostic per node has any effect; later ones are dropped so
    /// one bad subtree cannot cascade.
    fn add_error(&mut self, slot: &mut Option<String>, location: Location, kind: ErrorImpl) {
        if slot.is_some() {
            return;
        }
        let error = Error::new(kind, location);
        *slot = Some(error.message());
        self.errors.push(error);
    }

    // UTIL

    /// Resolves an annotation to a value type; unknown class names report
    /// on the annotation node and fall back to `object`.
    fn resolve_annotation(&mut self, annotation: &mut TypeAnnotation) -> ValueType {
        let class_name = annotation.class_name().to_string();
        if class_name != "<None>" && class_name != "<Empty>" && !self.ts.class_exists(&class_name)
        {
            let location = annotation.location;
            self.add_error(
                &mut annotation.error_msg,
                location,
                ErrorImpl::UnknownClass { name: class_name },
            );
            return ValueType::Object;
        }
        ValueType::from_class_name(&class_name)
    }

    fn check_typed_var(&mut self, var: &mut TypedVar) -> ValueType {
        let t = self.resolve_annotation(&mut var.type_annotation);
        var.t = Some(t.clone());
        t
    }

    /// Computes a function's full signature from its annotations.
    fn get_signature(&mut self, func: &mut FuncDef) -> FuncType {
        let return_type = self.resolve_annotation(&mut func.return_type);
        let parameters = func
            .params
            .iter_mut()
            .map(|p| self.check_typed_var(p))
            .collect();
        FuncType::new(parameters, return_type)
    }

    // TOP LEVEL

    pub fn check_program(&mut self, program: &mut Program) {
        // Declaration collection pass: bind every name before visiting any
        // body, so siblings can forward-reference each other.
        for decl in program.declarations.iter_mut() {
            let name = decl.name().to_string();
            if self.def_in_current_scope(&name) || self.ts.class_exists(&name) {
                let identifier = decl.identifier_mut();
                let location = identifier.location;
                self.add_error(
                    &mut identifier.error_msg,
                    location,
                    ErrorImpl::DuplicateDeclaration { name: name.clone() },
                );
            }
            match decl {
                Declaration::Func(func) => {
                    let signature = self.get_signature(func);
                    self.add_type(
                        &name,
                        ScopeEntry {
                            symbol: SymbolType::Func(signature),
                            instance: None,
                        },
                    );
                }
                Declaration::Var(var_def) => {
                    let t = self.check_typed_var(&mut var_def.var);
                    let instance = self.bind_var(&name, t);
                    var_def.var.var_instance = Some(instance);
                }
            }
        }
        // Declaration body pass. A declaration whose identifier already
        // carries an error is skipped entirely.
        for decl in program.declarations.iter_mut() {
            if decl.identifier().error_msg.is_some() {
                continue;
            }
            self.check_declaration(decl);
        }
        // The program is not executable if its declarations are broken.
        if !self.errors.is_empty() {
            return;
        }
        for stmt in program.statements.iter_mut() {
            self.check_stmt(stmt);
        }
    }

    fn check_declaration(&mut self, decl: &mut Declaration) {
        match decl {
            Declaration::Var(var_def) => self.check_var_def(var_def),
            Declaration::Func(func_def) => self.check_func_def(func_def),
        }
    }

    fn check_var_def(&mut self, var_def: &mut VarDef) {
        let annotation_type = self.check_typed_var(&mut var_def.var);
        self.check_expr(&mut var_def.value);
        let value_type = var_def.value.static_type();
        if !self.ts.can_assign(&value_type, &annotation_type) {
            let location = var_def.location;
            self.add_error(
                &mut var_def.error_msg,
                location,
                ErrorImpl::TypeMismatch {
                    expected: annotation_type.to_string(),
                    actual: value_type.to_string(),
                },
            );
        }
    }

    fn check_func_def(&mut self, func: &mut FuncDef) {
        self.enter_scope();
        let func_name = func.name().to_string();
        let func_type = self.get_signature(func);
        func.func_type = Some(func_type.clone());
        self.exp_return_type = Some(func_type.return_type.clone());

        if !func.is_method {
            if self.ts.class_exists(&func_name) {
                let location = func.name.location;
                self.add_error(
                    &mut func.name.error_msg,
                    location,
                    ErrorImpl::FunctionShadowsClass { name: func_name },
                );
                self.leave_func_def();
                return;
            }
            if self.def_in_current_scope(&func_name) {
                let location = func.name.location;
                self.add_error(
                    &mut func.name.error_msg,
                    location,
                    ErrorImpl::FunctionRedeclared { name: func_name },
                );
                self.leave_func_def();
                return;
            }
            // Bind the function in its own scope so it can recurse.
            self.add_type(
                &func_name,
                ScopeEntry {
                    symbol: SymbolType::Func(func_type.clone()),
                    instance: None,
                },
            );
        } else {
            // Methods require a class-typed `self` first parameter. No
            // class declarations survive parsing in this subset, so this
            // arm exists for the model's forward compatibility only.
            let self_ok = !func.params.is_empty()
                && func.params[0].name() == "self"
                && func_type
                    .parameters
                    .first()
                    .map(|t| Some(t.class_name()) == self.current_class.as_deref())
                    .unwrap_or(false);
            if !self_ok {
                let location = func.name.location;
                self.add_error(
                    &mut func.name.error_msg,
                    location,
                    ErrorImpl::MissingSelfParam { name: func_name },
                );
                self.leave_func_def();
                return;
            }
        }

        for param in func.params.iter_mut() {
            let t = self.check_typed_var(param);
            let param_name = param.name().to_string();
            if self.def_in_current_scope(&param_name) || self.ts.class_exists(&param_name) {
                let location = param.identifier.location;
                self.add_error(
                    &mut param.identifier.error_msg,
                    location,
                    ErrorImpl::DuplicateParameter { name: param_name },
                );
                continue;
            }
            let instance = self.bind_var(&param_name, t);
            param.var_instance = Some(instance);
        }

        // Collect the body's own declarations before visiting any of them.
        for decl in func.declarations.iter_mut() {
            let name = decl.name().to_string();
            if self.def_in_current_scope(&name) || self.ts.class_exists(&name) {
                let identifier = decl.identifier_mut();
                let location = identifier.location;
                self.add_error(
                    &mut identifier.error_msg,
                    location,
                    ErrorImpl::DuplicateDeclaration { name },
                );
                continue;
            }
            match decl {
                Declaration::Func(inner) => {
                    let signature = self.get_signature(inner);
                    self.add_type(
                        &name,
                        ScopeEntry {
                            symbol: SymbolType::Func(signature),
                            instance: None,
                        },
                    );
                }
                Declaration::Var(var_def) => {
                    let t = self.check_typed_var(&mut var_def.var);
                    let instance = self.bind_var(&name, t);
                    var_def.var.var_instance = Some(instance);
                }
            }
        }

        let saved_return = self.exp_return_type.clone();
        for decl in func.declarations.iter_mut() {
            self.check_declaration(decl);
            self.exp_return_type = saved_return.clone();
        }

        let mut has_return = false;
        for stmt in func.statements.iter_mut() {
            self.check_stmt(stmt);
            if stmt.is_return {
                has_return = true;
            }
        }
        let expected = self
            .exp_return_type
            .clone()
            .expect("set on entry to the function definition");
        if !has_return && !self.ts.can_assign(&ValueType::None, &expected) {
            let location = func.name.location;
            self.add_error(
                &mut func.name.error_msg,
                location,
                ErrorImpl::MissingReturn {
                    expected: expected.to_string(),
                },
            );
        }
        self.leave_func_def();
    }

    fn leave_func_def(&mut self) {
        self.exp_return_type = None;
        self.exit_scope();
    }

    // STATEMENTS

    fn check_stmt(&mut self, stmt: &mut Stmt) {
        let location = stmt.location;
        let Stmt {
            kind,
            error_msg,
            is_return,
            ..
        } = stmt;
        match kind {
            StmtKind::AssignStmt { targets, value } => {
                for target in targets.iter_mut() {
                    self.check_expr(target);
                }
                self.check_expr(value);
                let value_type = value.static_type();
                // Targets must already be declared in the current scope;
                // enclosing scopes deliberately do not count.
                for target in targets.iter_mut() {
                    if let Some(name) = target.name() {
                        if !self.def_in_current_scope(name) {
                            let name = name.to_string();
                            let target_location = target.location;
                            self.add_error(
                                &mut target.error_msg,
                                target_location,
                                ErrorImpl::NotDefinedInScope { name },
                            );
                            return;
                        }
                    }
                    let target_type = target.static_type();
                    if !self.ts.can_assign(&value_type, &target_type) {
                        self.add_error(
                            error_msg,
                            location,
                            ErrorImpl::TypeMismatch {
                                expected: target_type.to_string(),
                                actual: value_type.to_string(),
                            },
                        );
                        return;
                    }
                }
            }
            StmtKind::IfStmt {
                condition,
                then_body,
                else_body,
            } => {
                self.check_expr(condition);
                for s in then_body.iter_mut() {
                    self.check_stmt(s);
                }
                for s in else_body.iter_mut() {
                    self.check_stmt(s);
                }
                if condition.static_type() != ValueType::Bool {
                    let condition_location = condition.location;
                    let actual = condition.static_type().to_string();
                    self.add_error(
                        &mut condition.error_msg,
                        condition_location,
                        ErrorImpl::TypeMismatch {
                            expected: ValueType::Bool.to_string(),
                            actual,
                        },
                    );
                    return;
                }
                // Both branches must guarantee a return; an empty branch
                // never does.
                let then_returns = then_body.iter().any(|s| s.is_return);
                let else_returns = else_body.iter().any(|s| s.is_return);
                *is_return = then_returns && else_returns;
            }
            StmtKind::WhileStmt { condition, body } => {
                self.check_expr(condition);
                for s in body.iter_mut() {
                    self.check_stmt(s);
                }
                if condition.static_type() != ValueType::Bool {
                    let condition_location = condition.location;
                    let actual = condition.static_type().to_string();
                    self.add_error(
                        &mut condition.error_msg,
                        condition_location,
                        ErrorImpl::TypeMismatch {
                            expected: ValueType::Bool.to_string(),
                            actual,
                        },
                    );
                    return;
                }
                // Deliberately permissive: a loop whose body contains a
                // return-guaranteeing statement counts, even though zero
                // iterations would fall through.
                if body.iter().any(|s| s.is_return) {
                    *is_return = true;
                }
            }
            StmtKind::ReturnStmt { value, exp_type } => {
                if let Some(v) = value.as_mut() {
                    self.check_expr(v);
                }
                match self.exp_return_type.clone() {
                    None => {
                        self.add_error(error_msg, location, ErrorImpl::ReturnOutsideFunction);
                    }
                    Some(expected) => match value {
                        None => {
                            if !self.ts.can_assign(&ValueType::None, &expected) {
                                self.add_error(
                                    error_msg,
                                    location,
                                    ErrorImpl::TypeMismatch {
                                        expected: expected.to_string(),
                                        actual: ValueType::None.to_string(),
                                    },
                                );
                            }
                        }
                        Some(v) => {
                            let value_type = v.static_type();
                            if !self.ts.can_assign(&value_type, &expected) {
                                self.add_error(
                                    error_msg,
                                    location,
                                    ErrorImpl::TypeMismatch {
                                        expected: expected.to_string(),
                                        actual: value_type.to_string(),
                                    },
                                );
                            }
                        }
                    },
                }
                *exp_type = self.exp_return_type.clone();
            }
            StmtKind::ExprStmt { expr } => self.check_expr(expr),
        }
    }

    // EXPRESSIONS

    fn check_expr(&mut self, expr: &mut Expr) {
        let location = expr.location;
        let Expr {
            kind,
            inferred_type,
            error_msg,
            ..
        } = expr;
        match kind {
            ExprKind::IntegerLiteral { .. } => {
                *inferred_type = Some(SymbolType::Value(ValueType::Int));
            }
            ExprKind::BooleanLiteral { .. } => {
                *inferred_type = Some(SymbolType::Value(ValueType::Bool));
            }
            ExprKind::StringLiteral { .. } => {
                *inferred_type = Some(SymbolType::Value(ValueType::Str));
            }
            ExprKind::NoneLiteral => {
                *inferred_type = Some(SymbolType::Value(ValueType::None));
            }
            ExprKind::Identifier {
                name,
                var_instance,
            } => {
                // Module-level code sees only the global scope; inside a
                // function the full stack is searched, innermost first.
                let entry = if self.exp_return_type.is_none() && self.current_class.is_none() {
                    self.get_global(name).cloned()
                } else {
                    self.get_type(name).cloned()
                };
                match entry {
                    Some(ScopeEntry {
                        symbol: SymbolType::Value(t),
                        instance,
                    }) => {
                        *inferred_type = Some(SymbolType::Value(t));
                        *var_instance = instance;
                    }
                    _ => {
                        let name = name.clone();
                        self.add_error(
                            error_msg,
                            location,
                            ErrorImpl::UnknownIdentifier { name },
                        );
                        *inferred_type = Some(SymbolType::Value(ValueType::Object));
                    }
                }
            }
            ExprKind::BinaryExpr {
                left,
                operator,
                right,
            } => {
                self.check_expr(left);
                self.check_expr(right);
                let left_type = left.static_type();
                let right_type = right.static_type();
                let result = match operator {
                    // Concatenation and addition share a spelling.
                    BinaryOp::Add => {
                        if left_type == right_type
                            && matches!(left_type, ValueType::Int | ValueType::Str)
                        {
                            Some(left_type.clone())
                        } else {
                            None
                        }
                    }
                    BinaryOp::Sub | BinaryOp::Mul | BinaryOp::FloorDiv | BinaryOp::Mod => {
                        if left_type == ValueType::Int && right_type == ValueType::Int {
                            Some(ValueType::Int)
                        } else {
                            None
                        }
                    }
                    BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                        if left_type == ValueType::Int && right_type == ValueType::Int {
                            Some(ValueType::Bool)
                        } else {
                            None
                        }
                    }
                    BinaryOp::Eq | BinaryOp::Ne => {
                        if left_type == right_type && left_type.is_special_type() {
                            Some(ValueType::Bool)
                        } else {
                            None
                        }
                    }
                    // Identity compares references, never primitives.
                    BinaryOp::Is => {
                        if !left_type.is_special_type() && !right_type.is_special_type() {
                            Some(ValueType::Bool)
                        } else {
                            None
                        }
                    }
                    BinaryOp::And | BinaryOp::Or => {
                        if left_type == ValueType::Bool && right_type == ValueType::Bool {
                            Some(ValueType::Bool)
                        } else {
                            None
                        }
                    }
                };
                match result {
                    Some(t) => *inferred_type = Some(SymbolType::Value(t)),
                    None => {
                        self.add_error(
                            error_msg,
                            location,
                            ErrorImpl::BadOperandTypes {
                                operator: operator.as_str().to_string(),
                                left: left_type.to_string(),
                                right: right_type.to_string(),
                            },
                        );
                        *inferred_type = Some(SymbolType::Value(ValueType::Object));
                    }
                }
            }
            ExprKind::UnaryExpr { operator, operand } => {
                self.check_expr(operand);
                let operand_type = operand.static_type();
                let result = match operator {
                    UnaryOp::Neg => {
                        if operand_type == ValueType::Int {
                            Ok(ValueType::Int)
                        } else {
                            Err(ValueType::Int)
                        }
                    }
                    UnaryOp::Not => {
                        if operand_type == ValueType::Bool {
                            Ok(ValueType::Bool)
                        } else {
                            Err(ValueType::Bool)
                        }
                    }
                };
                match result {
                    Ok(t) => *inferred_type = Some(SymbolType::Value(t)),
                    Err(expected) => {
                        self.add_error(
                            error_msg,
                            location,
                            ErrorImpl::TypeMismatch {
                                expected: expected.to_string(),
                                actual: operand_type.to_string(),
                            },
                        );
                        *inferred_type = Some(SymbolType::Value(ValueType::Object));
                    }
                }
            }
            ExprKind::IfExpr {
                condition,
                then_expr,
                else_expr,
            } => {
                self.check_expr(condition);
                self.check_expr(then_expr);
                self.check_expr(else_expr);
                if condition.static_type() != ValueType::Bool {
                    let condition_location = condition.location;
                    let actual = condition.static_type().to_string();
                    self.add_error(
                        &mut condition.error_msg,
                        condition_location,
                        ErrorImpl::TypeMismatch {
                            expected: ValueType::Bool.to_string(),
                            actual,
                        },
                    );
                }
                let joined = self
                    .ts
                    .join(&then_expr.static_type(), &else_expr.static_type());
                *inferred_type = Some(SymbolType::Value(joined));
            }
            ExprKind::CallExpr {
                function,
                args,
                is_constructor,
            } => {
                for arg in args.iter_mut() {
                    self.check_expr(arg);
                }
                let func_name = function
                    .name()
                    .expect("the parser only accepts identifier receivers")
                    .to_string();
                if self.ts.class_exists(&func_name) {
                    // A call to a class name is a constructor invocation.
                    *is_constructor = true;
                    let init = self
                        .ts
                        .get_method(&func_name, "__init__")
                        .cloned()
                        .expect("every registered class carries __init__");
                    if init.parameters.len() != args.len() + 1 {
                        self.add_error(
                            error_msg,
                            location,
                            ErrorImpl::ArityMismatch {
                                expected: init.parameters.len() - 1,
                                actual: args.len(),
                            },
                        );
                    } else {
                        for (arg, param) in args.iter().zip(init.parameters.iter().skip(1)) {
                            let arg_type = arg.static_type();
                            if !self.ts.can_assign(&arg_type, param) {
                                self.add_error(
                                    error_msg,
                                    location,
                                    ErrorImpl::TypeMismatch {
                                        expected: param.to_string(),
                                        actual: arg_type.to_string(),
                                    },
                                );
                            }
                        }
                    }
                    *inferred_type =
                        Some(SymbolType::Value(ValueType::from_class_name(&func_name)));
                    function.inferred_type = Some(SymbolType::Func(init));
                } else {
                    let signature = self
                        .get_type(&func_name)
                        .and_then(|entry| entry.symbol.as_func().cloned());
                    let signature = match signature {
                        Some(s) => s,
                        None => {
                            self.add_error(
                                error_msg,
                                location,
                                ErrorImpl::NotAFunction { name: func_name },
                            );
                            *inferred_type = Some(SymbolType::Value(ValueType::Object));
                            return;
                        }
                    };
                    if signature.parameters.len() != args.len() {
                        self.add_error(
                            error_msg,
                            location,
                            ErrorImpl::ArityMismatch {
                                expected: signature.parameters.len(),
                                actual: args.len(),
                            },
                        );
                    } else {
                        for (arg, param) in args.iter().zip(signature.parameters.iter()) {
                            let arg_type = arg.static_type();
                            if !self.ts.can_assign(&arg_type, param) {
                                self.add_error(
                                    error_msg,
                                    location,
                                    ErrorImpl::TypeMismatch {
                                        expected: param.to_string(),
                                        actual: arg_type.to_string(),
                                    },
                                );
                            }
                        }
                    }
                    *inferred_type = Some(SymbolType::Value(signature.return_type.clone()));
                    function.inferred_type = Some(SymbolType::Func(signature));
                }
            }
        }
    }
}
