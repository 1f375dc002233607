use serde_json::{json, Value};

use crate::errors::errors::Error;
use crate::types::types::{FuncType, ValueType};
use crate::Location;

use super::expressions::Expr;
use super::statements::Stmt;

/// The binding record behind a declared variable.
///
/// Created by the type checker when the binding is installed; every
/// identifier use that resolves to the binding holds a non-owning link back
/// to it. `boxed` is flipped by downstream code generation when the
/// variable must live in an indirection cell to satisfy a by-reference
/// parameter; the front end only provides the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarInstance {
    pub name: String,
    pub scope_depth: usize,
    pub is_global: bool,
    pub boxed: bool,
}

impl VarInstance {
    pub fn new(name: &str, scope_depth: usize) -> Self {
        VarInstance {
            name: name.to_string(),
            scope_depth,
            is_global: scope_depth == 0,
            boxed: false,
        }
    }
}

/// A textual type annotation, resolved by the checker into a `ValueType`.
#[derive(Debug, Clone)]
pub struct TypeAnnotation {
    pub location: Location,
    pub kind: TypeAnnotationKind,
    pub error_msg: Option<String>,
}

/// The closed set of annotation forms. List annotations are rejected by the
/// legality parser, leaving class names as the only inhabitant.
#[derive(Debug, Clone)]
pub enum TypeAnnotationKind {
    ClassType { class_name: String },
}

impl TypeAnnotation {
    pub fn class_type(location: Location, class_name: &str) -> Self {
        TypeAnnotation {
            location,
            kind: TypeAnnotationKind::ClassType {
                class_name: class_name.to_string(),
            },
            error_msg: None,
        }
    }

    pub fn class_name(&self) -> &str {
        match &self.kind {
            TypeAnnotationKind::ClassType { class_name } => class_name,
        }
    }

    pub fn to_json(&self, dump_location: bool) -> Value {
        let mut d = json!({ "kind": "ClassType" });
        let obj = d.as_object_mut().unwrap();
        if dump_location {
            obj.insert("location".to_string(), self.location.to_json());
        }
        if let Some(msg) = &self.error_msg {
            obj.insert("errorMsg".to_string(), json!(msg));
        }
        obj.insert("className".to_string(), json!(self.class_name()));
        d
    }
}

/// An identifier paired with its declared type annotation.
///
/// `t` is the resolved annotation type once checking has run; the
/// `var_instance` link is installed alongside the binding it names.
#[derive(Debug, Clone)]
pub struct TypedVar {
    pub location: Location,
    pub identifier: Expr,
    pub type_annotation: TypeAnnotation,
    pub t: Option<ValueType>,
    pub var_instance: Option<std::rc::Rc<std::cell::RefCell<VarInstance>>>,
}

impl TypedVar {
    pub fn new(location: Location, identifier: Expr, type_annotation: TypeAnnotation) -> Self {
        TypedVar {
            location,
            identifier,
            type_annotation,
            t: None,
            var_instance: None,
        }
    }

    pub fn name(&self) -> &str {
        self.identifier.name().expect("TypedVar holds an identifier")
    }

    pub fn to_json(&self, dump_location: bool) -> Value {
        let mut d = json!({ "kind": "TypedVar" });
        let obj = d.as_object_mut().unwrap();
        if dump_location {
            obj.insert("location".to_string(), self.location.to_json());
        }
        obj.insert(
            "identifier".to_string(),
            self.identifier.to_json(dump_location),
        );
        obj.insert(
            "type".to_string(),
            self.type_annotation.to_json(dump_location),
        );
        d
    }
}

/// A variable definition. The initializer is always a literal; the parser
/// enforces it.
#[derive(Debug, Clone)]
pub struct VarDef {
    pub location: Location,
    pub var: TypedVar,
    pub value: Expr,
    pub error_msg: Option<String>,
}

/// A function definition.
///
/// `is_method` is always false in this subset (class definitions are
/// rejected at parse time); the field and its `self`-parameter validation
/// stay in the model for forward compatibility. `func_type` is the bound
/// signature once checking has run.
#[derive(Debug, Clone)]
pub struct FuncDef {
    pub location: Location,
    pub name: Expr,
    pub params: Vec<TypedVar>,
    pub return_type: TypeAnnotation,
    pub declarations: Vec<Declaration>,
    pub statements: Vec<Stmt>,
    pub is_method: bool,
    pub func_type: Option<FuncType>,
    pub error_msg: Option<String>,
}

impl FuncDef {
    pub fn name(&self) -> &str {
        self.name.name().expect("FuncDef name is an identifier")
    }
}

/// A declaration: a variable or function definition. Declarations precede
/// statements in every block; the parser enforces the ordering and the
/// checker assumes it.
#[derive(Debug, Clone)]
pub enum Declaration {
    Var(VarDef),
    Func(FuncDef),
}

impl Declaration {
    pub fn location(&self) -> Location {
        match self {
            Declaration::Var(v) => v.location,
            Declaration::Func(f) => f.location,
        }
    }

    /// The declared identifier node; its `error_msg` slot is what the
    /// checker consults to skip broken declarations.
    pub fn identifier(&self) -> &Expr {
        match self {
            Declaration::Var(v) => &v.var.identifier,
            Declaration::Func(f) => &f.name,
        }
    }

    pub fn identifier_mut(&mut self) -> &mut Expr {
        match self {
            Declaration::Var(v) => &mut v.var.identifier,
            Declaration::Func(f) => &mut f.name,
        }
    }

    pub fn name(&self) -> &str {
        self.identifier()
            .name()
            .expect("declaration identifier is an identifier")
    }

    pub fn to_json(&self, dump_location: bool) -> Value {
        match self {
            Declaration::Var(v) => {
                let mut d = json!({ "kind": "VarDef" });
                let obj = d.as_object_mut().unwrap();
                if dump_location {
                    obj.insert("location".to_string(), v.location.to_json());
                }
                if let Some(msg) = &v.error_msg {
                    obj.insert("errorMsg".to_string(), json!(msg));
                }
                obj.insert("var".to_string(), v.var.to_json(dump_location));
                obj.insert("value".to_string(), v.value.to_json(dump_location));
                d
            }
            Declaration::Func(f) => {
                let mut d = json!({ "kind": "FuncDef" });
                let obj = d.as_object_mut().unwrap();
                if dump_location {
                    obj.insert("location".to_string(), f.location.to_json());
                }
                if let Some(msg) = &f.error_msg {
                    obj.insert("errorMsg".to_string(), json!(msg));
                }
                obj.insert("name".to_string(), f.name.to_json(dump_location));
                obj.insert(
                    "params".to_string(),
                    Value::Array(f.params.iter().map(|p| p.to_json(dump_location)).collect()),
                );
                obj.insert(
                    "returnType".to_string(),
                    f.return_type.to_json(dump_location),
                );
                obj.insert(
                    "declarations".to_string(),
                    Value::Array(
                        f.declarations
                            .iter()
                            .map(|d| d.to_json(dump_location))
                            .collect(),
                    ),
                );
                obj.insert(
                    "statements".to_string(),
                    Value::Array(
                        f.statements
                            .iter()
                            .map(|s| s.to_json(dump_location))
                            .collect(),
                    ),
                );
                d
            }
        }
    }
}

/// The ordered list of type-checking diagnostics attached to a program.
/// Parse diagnostics travel separately and never land here.
#[derive(Debug, Clone)]
pub struct Errors {
    pub location: Location,
    pub errors: Vec<Error>,
}

impl Errors {
    pub fn new() -> Self {
        Errors {
            location: Location::null(),
            errors: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn to_json(&self) -> Value {
        json!({
            "kind": "Errors",
            "location": self.location.to_json(),
            "errors": self.errors.iter().map(|e| e.to_json()).collect::<Vec<_>>(),
        })
    }
}

/// The root node of a compilation unit.
#[derive(Debug, Clone)]
pub struct Program {
    pub location: Location,
    pub declarations: Vec<Declaration>,
    pub statements: Vec<Stmt>,
    pub errors: Errors,
    pub error_msg: Option<String>,
}

impl Program {
    pub fn new(location: Location, declarations: Vec<Declaration>, statements: Vec<Stmt>) -> Self {
        Program {
            location,
            declarations,
            statements,
            errors: Errors::new(),
            error_msg: None,
        }
    }

    pub fn to_json(&self, dump_location: bool) -> Value {
        let mut d = json!({ "kind": "Program" });
        let obj = d.as_object_mut().unwrap();
        if dump_location {
            obj.insert("location".to_string(), self.location.to_json());
        }
        if let Some(msg) = &self.error_msg {
            obj.insert("errorMsg".to_string(), json!(msg));
        }
        obj.insert(
            "declarations".to_string(),
            Value::Array(
                self.declarations
                    .iter()
                    .map(|decl| decl.to_json(dump_location))
                    .collect(),
            ),
        );
        obj.insert(
            "statements".to_string(),
            Value::Array(
                self.statements
                    .iter()
                    .map(|s| s.to_json(dump_location))
                    .collect(),
            ),
        );
        obj.insert("errors".to_string(), self.errors.to_json());
        d
    }
}
