//! Parser implementation narrowing the host tree to the restricted AST.
//!
//! Every `parse_*` method returns `Result<_, Error>`: a failing sub-tree
//! propagates its first diagnostic to the nearest enclosing list boundary
//! (module body, function body, branch/loop body, parameter list, target
//! list), where it is recorded once and the sibling items continue to be
//! processed. A structural failure of the module itself (for example a
//! declaration after the first statement) aborts construction and yields no
//! tree at all.

use crate::ast::ast::{Declaration, FuncDef, Program, TypeAnnotation, TypedVar, VarDef};
use crate::ast::expressions::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::ast::statements::{Stmt, StmtKind};
use crate::errors::errors::{Error, ErrorImpl};
use crate::host::host::{
    HostArg, HostArguments, HostBoolOp, HostCmpOp, HostConstant, HostExpr, HostLocation,
    HostModule, HostOperator, HostStmt, HostUnaryOp,
};
use crate::Location;

/// The legality parser. Holds the diagnostics accumulated so far; the tree
/// is threaded through return values.
pub struct Parser {
    errors: Vec<Error>,
}

/// A classified block item. `parse_block_item` yields nothing for the
/// no-op statement, which still ends the declaration section of a block.
enum BlockItem {
    Declaration(Declaration),
    Statement(Stmt),
}

/// Parses a host module into the restricted AST.
///
/// Returns the tree (absent when a structural failure aborted module
/// construction) and the ordered legality diagnostics. Any non-empty error
/// list means the unit must not be type checked.
pub fn parse(module: &HostModule) -> (Option<Program>, Vec<Error>) {
    let mut parser = Parser::new();
    let result = parser.parse_module(module);
    let program = parser.recover(result);
    (program, parser.errors)
}

impl Parser {
    pub fn new() -> Self {
        Parser { errors: Vec::new() }
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Converts a host location to crate coordinates (columns become
    /// 1-indexed).
    fn location(loc: HostLocation) -> Location {
        Location::new(loc.line, loc.col + 1)
    }

    /// Records a failed sub-tree's diagnostic and substitutes "nothing";
    /// the caller's list continues with the siblings.
    fn recover<T>(&mut self, result: Result<T, Error>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.push(e);
                None
            }
        }
    }

    fn parse_module(&mut self, module: &HostModule) -> Result<Program, Error> {
        if let Some(line) = module.type_ignores.first() {
            return Err(Error::new(ErrorImpl::TypeIgnore, Location::new(*line, 1)));
        }
        let mut declarations = Vec::new();
        let mut statements = Vec::new();
        let mut decl_phase = true;
        for item in &module.body {
            let parsed = self.parse_block_item(item);
            match parsed {
                Ok(Some(BlockItem::Declaration(d))) => {
                    if !decl_phase {
                        return Err(Error::new(
                            ErrorImpl::DeclarationAfterStatement,
                            Self::location(item.location()),
                        ));
                    }
                    declarations.push(d);
                }
                Ok(Some(BlockItem::Statement(s))) => {
                    statements.push(s);
                    decl_phase = false;
                }
                Ok(None) => {
                    decl_phase = false;
                }
                Err(e) => {
                    self.errors.push(e);
                    decl_phase = false;
                }
            }
        }
        let location = declarations
            .first()
            .map(|d| d.location())
            .unwrap_or_else(|| Location::new(1, 1));
        Ok(Program::new(location, declarations, statements))
    }

    /// Parses one item of a declaration-bearing block and classifies it.
    /// The no-op statement parses to nothing but still ends the block's
    /// declaration section.
    fn parse_block_item(&mut self, node: &HostStmt) -> Result<Option<BlockItem>, Error> {
        match node {
            HostStmt::FunctionDef {
                location,
                name,
                args,
                body,
                decorators,
                returns,
            } => {
                let func = self.parse_function_def(*location, name, args, body, decorators, returns)?;
                Ok(Some(BlockItem::Declaration(Declaration::Func(func))))
            }
            HostStmt::AnnAssign {
                location,
                target,
                annotation,
                value,
                simple,
            } => {
                let var = self.parse_var_def(*location, target, annotation, value, *simple)?;
                Ok(Some(BlockItem::Declaration(Declaration::Var(var))))
            }
            HostStmt::Pass { .. } => Ok(None),
            _ => self
                .parse_stmt(node)
                .map(|s| Some(BlockItem::Statement(s))),
        }
    }

    fn parse_function_def(
        &mut self,
        location: HostLocation,
        name: &str,
        args: &HostArguments,
        body: &[HostStmt],
        decorators: &[HostExpr],
        returns: &Option<HostExpr>,
    ) -> Result<FuncDef, Error> {
        if let Some(first) = decorators.first() {
            return Err(Error::new(
                ErrorImpl::UnsupportedDecorators,
                Self::location(first.location()),
            ));
        }
        let loc = Self::location(location);
        // The name starts one keyword and one space past the definition.
        let name_expr = Expr::identifier(Location::new(loc.line, loc.col + 4), name);
        let params = self.parse_params(args)?;

        let mut declarations = Vec::new();
        let mut statements = Vec::new();
        let mut decl_phase = true;
        for item in body {
            let parsed = self.parse_block_item(item);
            match parsed {
                Ok(Some(BlockItem::Declaration(d))) => {
                    if matches!(d, Declaration::Func(_)) {
                        return Err(Error::new(
                            ErrorImpl::NestedDefinition,
                            Self::location(item.location()),
                        ));
                    }
                    if !decl_phase {
                        return Err(Error::new(
                            ErrorImpl::DeclarationAfterStatement,
                            Self::location(item.location()),
                        ));
                    }
                    declarations.push(d);
                }
                Ok(Some(BlockItem::Statement(s))) => {
                    statements.push(s);
                    decl_phase = false;
                }
                Ok(None) => {
                    decl_phase = false;
                }
                Err(e) => {
                    self.errors.push(e);
                    decl_phase = false;
                }
            }
        }

        if name == "__init__" && returns.is_some() {
            return Err(Error::new(ErrorImpl::InitReturnType, loc));
        }
        let return_type = match returns {
            None => TypeAnnotation::class_type(loc, "<None>"),
            Some(annotation) => self.parse_type_annotation(annotation)?,
        };

        Ok(FuncDef {
            location: loc,
            name: name_expr,
            params,
            return_type,
            declarations,
            statements,
            is_method: false,
            func_type: None,
            error_msg: None,
        })
    }

    fn parse_params(&mut self, args: &HostArguments) -> Result<Vec<TypedVar>, Error> {
        if let Some(vararg) = &args.vararg {
            return Err(Error::new(
                ErrorImpl::VariadicParams,
                Self::location(vararg.location),
            ));
        }
        if let Some(kwarg) = &args.kwarg {
            return Err(Error::new(
                ErrorImpl::KeywordParams,
                Self::location(kwarg.location),
            ));
        }
        if !args.defaults.is_empty() || !args.kw_defaults.is_empty() {
            let loc = args
                .defaults
                .first()
                .map(|d| d.location())
                .or_else(|| {
                    args.kw_defaults
                        .iter()
                        .flatten()
                        .next()
                        .map(|d| d.location())
                })
                .map(Self::location)
                .or_else(|| args.kwonlyargs.first().map(|a| Self::location(a.location)))
                .unwrap_or_else(Location::null);
            return Err(Error::new(ErrorImpl::DefaultParams, loc));
        }
        let mut params = Vec::new();
        for arg in args.posonlyargs.iter().chain(args.args.iter()) {
            let parsed = self.parse_param(arg);
            if let Some(param) = self.recover(parsed) {
                params.push(param);
            }
        }
        Ok(params)
    }

    fn parse_param(&mut self, arg: &HostArg) -> Result<TypedVar, Error> {
        let loc = Self::location(arg.location);
        let annotation = match &arg.annotation {
            Some(annotation) => self.parse_type_annotation(annotation)?,
            None => return Err(Error::new(ErrorImpl::MissingTypeAnnotation, loc)),
        };
        Ok(TypedVar::new(loc, Expr::identifier(loc, &arg.arg), annotation))
    }

    fn parse_var_def(
        &mut self,
        location: HostLocation,
        target: &HostExpr,
        annotation: &Option<HostExpr>,
        value: &Option<HostExpr>,
        simple: bool,
    ) -> Result<VarDef, Error> {
        let loc = Self::location(location);
        let value = match value {
            Some(v) => v,
            None => return Err(Error::new(ErrorImpl::ExpectedInitializingValue, loc)),
        };
        let annotation = match annotation {
            Some(a) => a,
            None => return Err(Error::new(ErrorImpl::MissingTypeAnnotation, loc)),
        };
        if !simple {
            return Err(Error::new(
                ErrorImpl::ExpectedVariable,
                Self::location(target.location()),
            ));
        }
        let var = TypedVar::new(
            Self::location(target.location()),
            self.parse_expr(target)?,
            self.parse_type_annotation(annotation)?,
        );
        let parsed_value = self.parse_expr(value)?;
        if !parsed_value.is_literal() {
            return Err(Error::new(
                ErrorImpl::ExpectedLiteralValue,
                Self::location(value.location()),
            ));
        }
        Ok(VarDef {
            location: loc,
            var,
            value: parsed_value,
            error_msg: None,
        })
    }

    /// Narrows a host type annotation: a bare name, or a string holding a
    /// name. List annotations and anything else are outside the subset.
    fn parse_type_annotation(&mut self, node: &HostExpr) -> Result<TypeAnnotation, Error> {
        let loc = Self::location(node.location());
        match node {
            HostExpr::List { .. } => {
                Err(Error::new(ErrorImpl::UnsupportedListTypeAnnotation, loc))
            }
            HostExpr::Name { id, .. } => Ok(TypeAnnotation::class_type(loc, id)),
            HostExpr::Constant {
                value: HostConstant::Str(name),
                ..
            } => Ok(TypeAnnotation::class_type(loc, name)),
            _ => Err(Error::new(ErrorImpl::UnsupportedTypeAnnotation, loc)),
        }
    }

    fn parse_stmt(&mut self, node: &HostStmt) -> Result<Stmt, Error> {
        let loc = Self::location(node.location());
        match node {
            HostStmt::Return { value, .. } => {
                let value = match value {
                    Some(v) => Some(self.parse_expr(v)?),
                    None => None,
                };
                Ok(Stmt::new(
                    loc,
                    StmtKind::ReturnStmt {
                        value,
                        exp_type: None,
                    },
                ))
            }
            HostStmt::Assign { targets, value, .. } => {
                let mut parsed_targets = Vec::new();
                for target in targets {
                    let parsed = self.parse_expr(target);
                    if let Some(t) = self.recover(parsed) {
                        parsed_targets.push(t);
                    }
                }
                let value = self.parse_expr(value)?;
                Ok(Stmt::new(
                    loc,
                    StmtKind::AssignStmt {
                        targets: parsed_targets,
                        value,
                    },
                ))
            }
            HostStmt::While {
                test, body, orelse, ..
            } => {
                if !orelse.is_empty() {
                    return Err(Error::new(ErrorImpl::WhileElse, loc));
                }
                let condition = self.parse_expr(test)?;
                let body = self.parse_body_without_declarations(
                    body,
                    loc,
                    ErrorImpl::DeclarationInLoop,
                )?;
                Ok(Stmt::new(loc, StmtKind::WhileStmt { condition, body }))
            }
            HostStmt::If {
                test, body, orelse, ..
            } => {
                let condition = self.parse_expr(test)?;
                let then_body = self.parse_body_without_declarations(
                    body,
                    loc,
                    ErrorImpl::DeclarationInConditional,
                )?;
                let else_body = self.parse_body_without_declarations(
                    orelse,
                    loc,
                    ErrorImpl::DeclarationInConditional,
                )?;
                Ok(Stmt::new(
                    loc,
                    StmtKind::IfStmt {
                        condition,
                        then_body,
                        else_body,
                    },
                ))
            }
            HostStmt::Expr { value, .. } => {
                let expr = self.parse_expr(value)?;
                Ok(Stmt::new(loc, StmtKind::ExprStmt { expr }))
            }
            // Everything else in statement position is outside the subset.
            HostStmt::AsyncFunctionDef { .. }
            | HostStmt::ClassDef { .. }
            | HostStmt::AugAssign { .. }
            | HostStmt::For { .. }
            | HostStmt::AsyncFor { .. }
            | HostStmt::With { .. }
            | HostStmt::AsyncWith { .. }
            | HostStmt::Raise { .. }
            | HostStmt::Try { .. }
            | HostStmt::Assert { .. }
            | HostStmt::Import { .. }
            | HostStmt::ImportFrom { .. }
            | HostStmt::Global { .. }
            | HostStmt::Nonlocal { .. }
            | HostStmt::Delete { .. }
            | HostStmt::Break { .. }
            | HostStmt::Continue { .. } => Err(Error::new(ErrorImpl::Unsupported, loc)),
            HostStmt::FunctionDef { .. } | HostStmt::AnnAssign { .. } | HostStmt::Pass { .. } => {
                unreachable!("declarations and no-ops are handled by parse_block_item")
            }
        }
    }

    /// Parses a loop or branch body, which may not declare variables. The
    /// diagnostic lands on the containing statement.
    fn parse_body_without_declarations(
        &mut self,
        body: &[HostStmt],
        container: Location,
        error: ErrorImpl,
    ) -> Result<Vec<Stmt>, Error> {
        let mut statements = Vec::new();
        for item in body {
            let parsed = self.parse_block_item(item);
            match parsed {
                Ok(Some(BlockItem::Declaration(_))) => {
                    return Err(Error::new(error, container));
                }
                Ok(Some(BlockItem::Statement(s))) => statements.push(s),
                Ok(None) => {}
                Err(e) => self.errors.push(e),
            }
        }
        Ok(statements)
    }

    fn parse_expr(&mut self, node: &HostExpr) -> Result<Expr, Error> {
        let loc = Self::location(node.location());
        match node {
            HostExpr::Name { id, .. } => Ok(Expr::identifier(loc, id)),
            HostExpr::Constant { value, .. } => match value {
                HostConstant::Bool(b) => Ok(Expr::new(
                    loc,
                    ExprKind::BooleanLiteral { value: *b },
                )),
                HostConstant::Int(i) => Ok(Expr::new(
                    loc,
                    ExprKind::IntegerLiteral { value: *i },
                )),
                HostConstant::Str(s) => Ok(Expr::new(
                    loc,
                    ExprKind::StringLiteral { value: s.clone() },
                )),
                HostConstant::None => Ok(Expr::new(loc, ExprKind::NoneLiteral)),
                HostConstant::Float(_) => {
                    Err(Error::new(ErrorImpl::UnsupportedConstant, loc))
                }
            },
            HostExpr::BoolOp { op, values, .. } => {
                let operator = match op {
                    HostBoolOp::And => BinaryOp::And,
                    HostBoolOp::Or => BinaryOp::Or,
                };
                let mut parsed = Vec::new();
                for value in values {
                    parsed.push(self.parse_expr(value)?);
                }
                match parsed.len() {
                    0 => Err(Error::new(ErrorImpl::Unsupported, loc)),
                    1 => Ok(parsed.pop().unwrap()),
                    _ => Ok(Self::binary_reduce(operator, parsed)),
                }
            }
            HostExpr::BinOp {
                left, op, right, ..
            } => {
                let parsed_left = self.parse_expr(left)?;
                let operator = Self::binary_operator(*op, loc)?;
                let parsed_right = self.parse_expr(right)?;
                Ok(Expr::new(
                    loc,
                    ExprKind::BinaryExpr {
                        left: Box::new(parsed_left),
                        operator,
                        right: Box::new(parsed_right),
                    },
                ))
            }
            HostExpr::UnaryOp { op, operand, .. } => {
                let operator = match op {
                    HostUnaryOp::USub => UnaryOp::Neg,
                    HostUnaryOp::Not => UnaryOp::Not,
                    HostUnaryOp::UAdd => {
                        return Err(Self::unsupported_operator("unary +", loc));
                    }
                    HostUnaryOp::Invert => {
                        return Err(Self::unsupported_operator("~", loc));
                    }
                };
                let operand = self.parse_expr(operand)?;
                Ok(Expr::new(
                    loc,
                    ExprKind::UnaryExpr {
                        operator,
                        operand: Box::new(operand),
                    },
                ))
            }
            HostExpr::Compare {
                left,
                ops,
                comparators,
                ..
            } => {
                if ops.len() > 1 || comparators.len() > 1 {
                    return Err(Error::new(ErrorImpl::UnsupportedChainedCompare, loc));
                }
                let parsed_left = self.parse_expr(left)?;
                let operator = match ops.first() {
                    Some(op) => Self::compare_operator(*op, loc)?,
                    None => return Err(Error::new(ErrorImpl::Unsupported, loc)),
                };
                let parsed_right = match comparators.first() {
                    Some(right) => self.parse_expr(right)?,
                    None => return Err(Error::new(ErrorImpl::Unsupported, loc)),
                };
                Ok(Expr::new(
                    loc,
                    ExprKind::BinaryExpr {
                        left: Box::new(parsed_left),
                        operator,
                        right: Box::new(parsed_right),
                    },
                ))
            }
            HostExpr::IfExp {
                test, body, orelse, ..
            } => {
                let condition = self.parse_expr(test)?;
                let then_expr = self.parse_expr(body)?;
                let else_expr = self.parse_expr(orelse)?;
                Ok(Expr::new(
                    loc,
                    ExprKind::IfExpr {
                        condition: Box::new(condition),
                        then_expr: Box::new(then_expr),
                        else_expr: Box::new(else_expr),
                    },
                ))
            }
            HostExpr::Call {
                func,
                args,
                keywords,
                ..
            } => {
                let function = self.parse_expr(func)?;
                if !keywords.is_empty() {
                    return Err(Error::new(ErrorImpl::KeywordArgs, loc));
                }
                let mut parsed_args = Vec::new();
                for arg in args {
                    let parsed = self.parse_expr(arg);
                    if let Some(a) = self.recover(parsed) {
                        parsed_args.push(a);
                    }
                }
                if function.name().is_none() {
                    return Err(Error::new(
                        ErrorImpl::InvalidCallReceiver,
                        Self::location(func.location()),
                    ));
                }
                Ok(Expr::new(
                    loc,
                    ExprKind::CallExpr {
                        function: Box::new(function),
                        args: parsed_args,
                        is_constructor: false,
                    },
                ))
            }
            HostExpr::Subscript { .. } => Err(Error::new(ErrorImpl::UnsupportedIndexing, loc)),
            HostExpr::Slice { .. } => Err(Error::new(ErrorImpl::UnsupportedSlice, loc)),
            HostExpr::Lambda { .. }
            | HostExpr::Dict { .. }
            | HostExpr::Set { .. }
            | HostExpr::ListComp { .. }
            | HostExpr::SetComp { .. }
            | HostExpr::DictComp { .. }
            | HostExpr::GeneratorExp { .. }
            | HostExpr::Await { .. }
            | HostExpr::Yield { .. }
            | HostExpr::YieldFrom { .. }
            | HostExpr::FormattedValue { .. }
            | HostExpr::JoinedStr { .. }
            | HostExpr::Attribute { .. }
            | HostExpr::Starred { .. }
            | HostExpr::List { .. }
            | HostExpr::Tuple { .. }
            | HostExpr::NamedExpr { .. } => Err(Error::new(ErrorImpl::Unsupported, loc)),
        }
    }

    fn binary_operator(op: HostOperator, loc: Location) -> Result<BinaryOp, Error> {
        match op {
            HostOperator::Add => Ok(BinaryOp::Add),
            HostOperator::Sub => Ok(BinaryOp::Sub),
            HostOperator::Mult => Ok(BinaryOp::Mul),
            HostOperator::FloorDiv => Ok(BinaryOp::FloorDiv),
            HostOperator::Mod => Ok(BinaryOp::Mod),
            HostOperator::Div => Err(Self::unsupported_operator("/", loc)),
            HostOperator::Pow => Err(Self::unsupported_operator("**", loc)),
            HostOperator::MatMult => Err(Self::unsupported_operator("@", loc)),
            HostOperator::LShift => Err(Self::unsupported_operator("<<", loc)),
            HostOperator::RShift => Err(Self::unsupported_operator(">>", loc)),
            HostOperator::BitOr => Err(Self::unsupported_operator("|", loc)),
            HostOperator::BitXor => Err(Self::unsupported_operator("^", loc)),
            HostOperator::BitAnd => Err(Self::unsupported_operator("&", loc)),
        }
    }

    fn compare_operator(op: HostCmpOp, loc: Location) -> Result<BinaryOp, Error> {
        match op {
            HostCmpOp::Eq => Ok(BinaryOp::Eq),
            HostCmpOp::NotEq => Ok(BinaryOp::Ne),
            HostCmpOp::Lt => Ok(BinaryOp::Lt),
            HostCmpOp::LtE => Ok(BinaryOp::Le),
            HostCmpOp::Gt => Ok(BinaryOp::Gt),
            HostCmpOp::GtE => Ok(BinaryOp::Ge),
            HostCmpOp::Is => Ok(BinaryOp::Is),
            HostCmpOp::IsNot => Err(Self::unsupported_operator("is not", loc)),
            HostCmpOp::In => Err(Self::unsupported_operator("in", loc)),
            HostCmpOp::NotIn => Err(Self::unsupported_operator("not in", loc)),
        }
    }

    fn unsupported_operator(operator: &str, loc: Location) -> Error {
        Error::new(
            ErrorImpl::UnsupportedOperator {
                operator: operator.to_string(),
            },
            loc,
        )
    }

    /// Reduces a chain of >2 operands joined by one left-associative
    /// operator into a binary tree. Every folded node carries the first
    /// operand's location.
    fn binary_reduce(operator: BinaryOp, values: Vec<Expr>) -> Expr {
        let loc = values[0].location;
        let mut iter = values.into_iter();
        let first = iter.next().expect("binary_reduce needs two operands");
        let second = iter.next().expect("binary_reduce needs two operands");
        let mut current = Expr::new(
            loc,
            ExprKind::BinaryExpr {
                left: Box::new(first),
                operator,
                right: Box::new(second),
            },
        );
        for value in iter {
            current = Expr::new(
                loc,
                ExprKind::BinaryExpr {
                    left: Box::new(current),
                    operator,
                    right: Box::new(value),
                },
            );
        }
        current
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}
