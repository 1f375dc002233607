//! Unit tests for the legality parser.
//!
//! This module contains tests for narrowing host trees into the restricted
//! AST, including:
//!
//! - Legal programs (declarations, statements, expressions)
//! - Rejection of every construct outside the subset
//! - Structural rules (declaration ordering, loop/branch bodies)
//! - Error recovery across sibling list items

use serde_json::{json, Value};

use crate::ast::ast::{Declaration, Program};
use crate::ast::expressions::{BinaryOp, ExprKind};
use crate::ast::statements::StmtKind;
use crate::errors::errors::Error;
use crate::host::host::HostModule;
use crate::parser::parser::parse;
use crate::Location;

fn parse_json(value: Value) -> (Option<Program>, Vec<Error>) {
    let module: HostModule = serde_json::from_value(value).unwrap();
    parse(&module)
}

fn loc(line: u32, col: u32) -> Value {
    json!({"line": line, "col": col})
}

fn name(line: u32, col: u32, id: &str) -> Value {
    json!({"kind": "Name", "location": loc(line, col), "id": id})
}

fn constant(line: u32, col: u32, value: Value) -> Value {
    json!({"kind": "Constant", "location": loc(line, col), "value": value})
}

fn var_decl(line: u32, id: &str, annotation: &str, value: Value) -> Value {
    json!({
        "kind": "AnnAssign",
        "location": loc(line, 0),
        "target": name(line, 0, id),
        "annotation": name(line, 3, annotation),
        "value": value,
    })
}

#[test]
fn test_parse_variable_declaration() {
    let (program, errors) = parse_json(json!({
        "body": [var_decl(1, "x", "int", constant(1, 9, json!(1)))]
    }));

    assert!(errors.is_empty());
    let program = program.unwrap();
    assert_eq!(program.declarations.len(), 1);
    assert!(program.statements.is_empty());
    match &program.declarations[0] {
        Declaration::Var(v) => {
            assert_eq!(v.var.name(), "x");
            assert_eq!(v.var.type_annotation.class_name(), "int");
            assert!(v.value.is_literal());
        }
        other => panic!("expected a variable definition, got {:?}", other),
    }
}

#[test]
fn test_columns_become_one_indexed() {
    let (program, errors) = parse_json(json!({
        "body": [{
            "kind": "Expr",
            "location": loc(2, 4),
            "value": name(2, 4, "x"),
        }]
    }));

    assert!(errors.is_empty());
    let program = program.unwrap();
    assert_eq!(program.statements[0].location, Location::new(2, 5));
}

#[test]
fn test_program_location_follows_first_declaration() {
    let (program, _) = parse_json(json!({
        "body": [var_decl(3, "x", "int", constant(3, 9, json!(1)))]
    }));
    assert_eq!(program.unwrap().location, Location::new(3, 1));

    let (program, _) = parse_json(json!({ "body": [] }));
    assert_eq!(program.unwrap().location, Location::new(1, 1));
}

#[test]
fn test_parse_function_declaration() {
    let (program, errors) = parse_json(json!({
        "body": [{
            "kind": "FunctionDef",
            "location": loc(1, 0),
            "name": "add",
            "args": {"args": [
                {"location": loc(1, 8), "arg": "a", "annotation": name(1, 11, "int")},
                {"location": loc(1, 16), "arg": "b", "annotation": name(1, 19, "int")},
            ]},
            "returns": name(1, 27, "int"),
            "body": [{
                "kind": "Return",
                "location": loc(2, 4),
                "value": {
                    "kind": "BinOp",
                    "location": loc(2, 11),
                    "left": name(2, 11, "a"),
                    "op": "Add",
                    "right": name(2, 15, "b"),
                },
            }],
        }]
    }));

    assert!(errors.is_empty());
    let program = program.unwrap();
    match &program.declarations[0] {
        Declaration::Func(f) => {
            assert_eq!(f.name(), "add");
            // The name sits one keyword and one space past the definition.
            assert_eq!(f.name.location, Location::new(1, 5));
            assert_eq!(f.params.len(), 2);
            assert_eq!(f.return_type.class_name(), "int");
            assert!(!f.is_method);
            assert_eq!(f.statements.len(), 1);
        }
        other => panic!("expected a function definition, got {:?}", other),
    }
}

#[test]
fn test_missing_return_annotation_defaults_to_none_type() {
    let (program, errors) = parse_json(json!({
        "body": [{
            "kind": "FunctionDef",
            "location": loc(1, 0),
            "name": "f",
            "args": {},
            "body": [{"kind": "Pass", "location": loc(2, 4)}],
        }]
    }));

    assert!(errors.is_empty());
    match &program.unwrap().declarations[0] {
        Declaration::Func(f) => assert_eq!(f.return_type.class_name(), "<None>"),
        other => panic!("expected a function definition, got {:?}", other),
    }
}

#[test]
fn test_string_annotation_names_a_class() {
    let (program, errors) = parse_json(json!({
        "body": [{
            "kind": "AnnAssign",
            "location": loc(1, 0),
            "target": name(1, 0, "x"),
            "annotation": constant(1, 3, json!("int")),
            "value": constant(1, 12, json!(1)),
        }]
    }));
    assert!(errors.is_empty());
    match &program.unwrap().declarations[0] {
        Declaration::Var(v) => assert_eq!(v.var.type_annotation.class_name(), "int"),
        other => panic!("expected a variable definition, got {:?}", other),
    }
}

#[test]
fn test_reject_class_definition() {
    let (program, errors) = parse_json(json!({
        "body": [{"kind": "ClassDef", "location": loc(1, 0), "name": "Foo"}]
    }));

    // Exactly one diagnostic; the tree survives but must not be checked.
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "Unsupported. Line 1 Col 1");
    let program = program.unwrap();
    assert!(program.declarations.is_empty());
    assert!(program.statements.is_empty());
}

#[test]
fn test_declarations_must_precede_statements() {
    let (program, errors) = parse_json(json!({
        "body": [
            {
                "kind": "Assign",
                "location": loc(1, 0),
                "targets": [name(1, 0, "x")],
                "value": constant(1, 4, json!(1)),
            },
            var_decl(2, "x", "int", constant(2, 9, json!(1))),
        ]
    }));

    assert!(program.is_none());
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message(),
        "All declarations must come before statements. Line 2 Col 1"
    );
}

#[test]
fn test_no_op_statement_ends_declaration_section() {
    let (program, errors) = parse_json(json!({
        "body": [
            {"kind": "Pass", "location": loc(1, 0)},
            var_decl(2, "x", "int", constant(2, 9, json!(1))),
        ]
    }));

    assert!(program.is_none());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "DeclarationAfterStatement");
}

#[test]
fn test_reject_nested_function_definition() {
    let (_, errors) = parse_json(json!({
        "body": [{
            "kind": "FunctionDef",
            "location": loc(1, 0),
            "name": "outer",
            "args": {},
            "body": [{
                "kind": "FunctionDef",
                "location": loc(2, 4),
                "name": "inner",
                "args": {},
                "body": [{"kind": "Pass", "location": loc(3, 8)}],
            }],
        }]
    }));

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message(),
        "Nested definitions are unsupported. Line 2 Col 5"
    );
}

#[test]
fn test_reject_declaration_in_loop_body() {
    let (_, errors) = parse_json(json!({
        "body": [{
            "kind": "While",
            "location": loc(1, 0),
            "test": constant(1, 6, json!(true)),
            "body": [var_decl(2, "x", "int", constant(2, 13, json!(1)))],
        }]
    }));

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message(),
        "Cannot declare variables in loop. Line 1 Col 1"
    );
}

#[test]
fn test_reject_declaration_in_branch_body() {
    let (_, errors) = parse_json(json!({
        "body": [{
            "kind": "If",
            "location": loc(1, 0),
            "test": constant(1, 3, json!(true)),
            "body": [{"kind": "Pass", "location": loc(2, 4)}],
            "orelse": [var_decl(4, "x", "int", constant(4, 13, json!(1)))],
        }]
    }));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "DeclarationInConditional");
}

#[test]
fn test_reject_while_else() {
    let (_, errors) = parse_json(json!({
        "body": [{
            "kind": "While",
            "location": loc(1, 0),
            "test": constant(1, 6, json!(true)),
            "body": [{"kind": "Pass", "location": loc(2, 4)}],
            "orelse": [{"kind": "Pass", "location": loc(4, 4)}],
        }]
    }));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "Cannot have else in while. Line 1 Col 1");
}

#[test]
fn test_reject_chained_comparison() {
    let (_, errors) = parse_json(json!({
        "body": [{
            "kind": "Expr",
            "location": loc(1, 0),
            "value": {
                "kind": "Compare",
                "location": loc(1, 0),
                "left": constant(1, 0, json!(1)),
                "ops": ["Lt", "Lt"],
                "comparators": [constant(1, 4, json!(2)), constant(1, 8, json!(3))],
            },
        }]
    }));

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message(),
        "Unsupported compare between > 2 things. Line 1 Col 1"
    );
}

#[test]
fn test_reject_unsupported_operators() {
    for (op, spelling) in [("Div", "/"), ("Pow", "**"), ("BitOr", "|")] {
        let (_, errors) = parse_json(json!({
            "body": [{
                "kind": "Expr",
                "location": loc(1, 0),
                "value": {
                    "kind": "BinOp",
                    "location": loc(1, 0),
                    "left": constant(1, 0, json!(1)),
                    "op": op,
                    "right": constant(1, 4, json!(2)),
                },
            }]
        }));
        assert_eq!(errors.len(), 1, "operator {}", op);
        assert_eq!(
            errors[0].message(),
            format!("Unsupported operator: {}. Line 1 Col 1", spelling)
        );
    }
}

#[test]
fn test_reject_keyword_call_arguments() {
    let (_, errors) = parse_json(json!({
        "body": [{
            "kind": "Expr",
            "location": loc(1, 0),
            "value": {
                "kind": "Call",
                "location": loc(1, 0),
                "func": name(1, 0, "f"),
                "args": [],
                "keywords": [{"arg": "x", "value": constant(1, 4, json!(1))}],
            },
        }]
    }));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "KeywordArgs");
}

#[test]
fn test_reject_variadic_and_default_parameters() {
    let (_, errors) = parse_json(json!({
        "body": [{
            "kind": "FunctionDef",
            "location": loc(1, 0),
            "name": "f",
            "args": {"vararg": {"location": loc(1, 7), "arg": "rest"}},
            "body": [{"kind": "Pass", "location": loc(2, 4)}],
        }]
    }));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "VariadicParams");

    let (_, errors) = parse_json(json!({
        "body": [{
            "kind": "FunctionDef",
            "location": loc(1, 0),
            "name": "f",
            "args": {
                "args": [{"location": loc(1, 6), "arg": "a", "annotation": name(1, 9, "int")}],
                "defaults": [constant(1, 15, json!(1))],
            },
            "body": [{"kind": "Pass", "location": loc(2, 4)}],
        }]
    }));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "DefaultParams");
}

#[test]
fn test_reject_unannotated_parameter_but_keep_siblings() {
    let (program, errors) = parse_json(json!({
        "body": [{
            "kind": "FunctionDef",
            "location": loc(1, 0),
            "name": "f",
            "args": {"args": [
                {"location": loc(1, 6), "arg": "a"},
                {"location": loc(1, 9), "arg": "b", "annotation": name(1, 12, "int")},
            ]},
            "body": [{"kind": "Pass", "location": loc(2, 4)}],
        }]
    }));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "Missing type annotation. Line 1 Col 7");
    // The annotated sibling parameter still parses.
    match &program.unwrap().declarations[0] {
        Declaration::Func(f) => {
            assert_eq!(f.params.len(), 1);
            assert_eq!(f.params[0].name(), "b");
        }
        other => panic!("expected a function definition, got {:?}", other),
    }
}

#[test]
fn test_reject_init_with_return_annotation() {
    let (_, errors) = parse_json(json!({
        "body": [{
            "kind": "FunctionDef",
            "location": loc(1, 0),
            "name": "__init__",
            "args": {},
            "returns": name(1, 20, "int"),
            "body": [{"kind": "Pass", "location": loc(2, 4)}],
        }]
    }));

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message(),
        "__init__ cannot have a return type. Line 1 Col 1"
    );
}

#[test]
fn test_variable_initializer_must_be_literal() {
    let (_, errors) = parse_json(json!({
        "body": [var_decl(1, "x", "int", name(1, 9, "y"))]
    }));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "Expected literal value. Line 1 Col 10");
}

#[test]
fn test_reject_float_constant() {
    let (_, errors) = parse_json(json!({
        "body": [{
            "kind": "Expr",
            "location": loc(1, 0),
            "value": constant(1, 0, json!(2.5)),
        }]
    }));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "UnsupportedConstant");
}

#[test]
fn test_reject_subscript_attribute_and_lambda() {
    for (kind, expected) in [
        ("Subscript", "UnsupportedIndexing"),
        ("Attribute", "Unsupported"),
        ("Lambda", "Unsupported"),
        ("ListComp", "Unsupported"),
        ("Await", "Unsupported"),
    ] {
        let (_, errors) = parse_json(json!({
            "body": [{
                "kind": "Expr",
                "location": loc(1, 0),
                "value": {"kind": kind, "location": loc(1, 0)},
            }]
        }));
        assert_eq!(errors.len(), 1, "kind {}", kind);
        assert_eq!(errors[0].get_error_name(), expected, "kind {}", kind);
    }
}

#[test]
fn test_reject_unsupported_statements() {
    for kind in [
        "For", "With", "Try", "Raise", "Assert", "Import", "ImportFrom", "Global", "Nonlocal",
        "Break", "Continue", "Delete", "AugAssign", "AsyncFunctionDef",
    ] {
        let (_, errors) = parse_json(json!({
            "body": [{"kind": kind, "location": loc(1, 0)}]
        }));
        assert_eq!(errors.len(), 1, "kind {}", kind);
        assert_eq!(errors[0].get_error_name(), "Unsupported", "kind {}", kind);
    }
}

#[test]
fn test_reject_call_receiver_that_is_not_a_name() {
    let (_, errors) = parse_json(json!({
        "body": [{
            "kind": "Expr",
            "location": loc(1, 0),
            "value": {
                "kind": "Call",
                "location": loc(1, 0),
                "func": {"kind": "Attribute", "location": loc(1, 0)},
                "args": [],
            },
        }]
    }));

    // The receiver subtree fails first; one diagnostic, not a cascade.
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "Unsupported");
}

#[test]
fn test_boolean_chain_folds_left_associative() {
    let (program, errors) = parse_json(json!({
        "body": [{
            "kind": "Expr",
            "location": loc(1, 0),
            "value": {
                "kind": "BoolOp",
                "location": loc(1, 0),
                "op": "And",
                "values": [name(1, 0, "a"), name(1, 6, "b"), name(1, 12, "c")],
            },
        }]
    }));

    assert!(errors.is_empty());
    let program = program.unwrap();
    let StmtKind::ExprStmt { expr } = &program.statements[0].kind else {
        panic!("expected an expression statement");
    };
    // ((a and b) and c), every fold carrying the first operand's location.
    let ExprKind::BinaryExpr {
        left,
        operator,
        right,
    } = &expr.kind
    else {
        panic!("expected a binary expression");
    };
    assert_eq!(*operator, BinaryOp::And);
    assert_eq!(right.name(), Some("c"));
    assert_eq!(expr.location, Location::new(1, 1));
    let ExprKind::BinaryExpr { left, right, .. } = &left.kind else {
        panic!("expected a nested binary expression");
    };
    assert_eq!(left.name(), Some("a"));
    assert_eq!(right.name(), Some("b"));
}

#[test]
fn test_recovery_surfaces_every_independent_error() {
    let (program, errors) = parse_json(json!({
        "body": [
            {"kind": "Break", "location": loc(1, 0)},
            {"kind": "Continue", "location": loc(2, 0)},
            {
                "kind": "Expr",
                "location": loc(3, 0),
                "value": name(3, 0, "x"),
            },
        ]
    }));

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].get_location(), Location::new(1, 1));
    assert_eq!(errors[1].get_location(), Location::new(2, 1));
    // The legal sibling still parsed.
    assert_eq!(program.unwrap().statements.len(), 1);
}

#[test]
fn test_reject_type_ignore_pragma() {
    let (program, errors) = parse_json(json!({
        "body": [],
        "type_ignores": [3],
    }));

    assert!(program.is_none());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "Cannot ignore type. Line 3 Col 1");
}

#[test]
fn test_reject_list_type_annotation() {
    let (_, errors) = parse_json(json!({
        "body": [{
            "kind": "AnnAssign",
            "location": loc(1, 0),
            "target": name(1, 0, "x"),
            "annotation": {"kind": "List", "location": loc(1, 3), "elts": [name(1, 4, "int")]},
            "value": constant(1, 12, json!(1)),
        }]
    }));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_error_name(), "UnsupportedListTypeAnnotation");
}

#[test]
fn test_multiple_assignment_targets_parse() {
    let (program, errors) = parse_json(json!({
        "body": [{
            "kind": "Assign",
            "location": loc(1, 0),
            "targets": [name(1, 0, "a"), name(1, 4, "b")],
            "value": constant(1, 8, json!(5)),
        }]
    }));

    assert!(errors.is_empty());
    let program = program.unwrap();
    let StmtKind::AssignStmt { targets, .. } = &program.statements[0].kind else {
        panic!("expected an assignment");
    };
    assert_eq!(targets.len(), 2);
}
