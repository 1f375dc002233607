use serde::{Deserialize, Serialize};

/// A position in the host tree. Lines are 1-indexed, columns 0-indexed,
/// matching what host-language tooling emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostLocation {
    pub line: u32,
    pub col: u32,
}

/// The root of a host compilation unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostModule {
    pub body: Vec<HostStmt>,
    /// Lines carrying a type-suppression pragma. Rejected outright.
    #[serde(default)]
    pub type_ignores: Vec<u32>,
}

/// Statement-position host nodes.
///
/// Unsupported constructs carry only their location; the legality parser
/// rejects them by kind and never inspects a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum HostStmt {
    FunctionDef {
        location: HostLocation,
        name: String,
        args: HostArguments,
        body: Vec<HostStmt>,
        #[serde(default)]
        decorators: Vec<HostExpr>,
        #[serde(default)]
        returns: Option<HostExpr>,
    },
    AsyncFunctionDef { location: HostLocation },
    ClassDef { location: HostLocation, name: String },
    Return {
        location: HostLocation,
        #[serde(default)]
        value: Option<HostExpr>,
    },
    Assign {
        location: HostLocation,
        targets: Vec<HostExpr>,
        value: HostExpr,
    },
    AugAssign { location: HostLocation },
    AnnAssign {
        location: HostLocation,
        target: HostExpr,
        #[serde(default)]
        annotation: Option<HostExpr>,
        #[serde(default)]
        value: Option<HostExpr>,
        #[serde(default = "default_simple")]
        simple: bool,
    },
    While {
        location: HostLocation,
        test: HostExpr,
        body: Vec<HostStmt>,
        #[serde(default)]
        orelse: Vec<HostStmt>,
    },
    For { location: HostLocation },
    AsyncFor { location: HostLocation },
    If {
        location: HostLocation,
        test: HostExpr,
        body: Vec<HostStmt>,
        #[serde(default)]
        orelse: Vec<HostStmt>,
    },
    With { location: HostLocation },
    AsyncWith { location: HostLocation },
    Raise { location: HostLocation },
    Try { location: HostLocation },
    Assert { location: HostLocation },
    Import { location: HostLocation },
    ImportFrom { location: HostLocation },
    Global { location: HostLocation },
    Nonlocal { location: HostLocation },
    Delete { location: HostLocation },
    Expr {
        location: HostLocation,
        value: HostExpr,
    },
    Pass { location: HostLocation },
    Break { location: HostLocation },
    Continue { location: HostLocation },
}

fn default_simple() -> bool {
    true
}

impl HostStmt {
    pub fn location(&self) -> HostLocation {
        match self {
            HostStmt::FunctionDef { location, .. }
            | HostStmt::AsyncFunctionDef { location }
            | HostStmt::ClassDef { location, .. }
            | HostStmt::Return { location, .. }
            | HostStmt::Assign { location, .. }
            | HostStmt::AugAssign { location }
            | HostStmt::AnnAssign { location, .. }
            | HostStmt::While { location, .. }
            | HostStmt::For { location }
            | HostStmt::AsyncFor { location }
            | HostStmt::If { location, .. }
            | HostStmt::With { location }
            | HostStmt::AsyncWith { location }
            | HostStmt::Raise { location }
            | HostStmt::Try { location }
            | HostStmt::Assert { location }
            | HostStmt::Import { location }
            | HostStmt::ImportFrom { location }
            | HostStmt::Global { location }
            | HostStmt::Nonlocal { location }
            | HostStmt::Delete { location }
            | HostStmt::Expr { location, .. }
            | HostStmt::Pass { location }
            | HostStmt::Break { location }
            | HostStmt::Continue { location } => *location,
        }
    }
}

/// Expression-position host nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum HostExpr {
    BoolOp {
        location: HostLocation,
        op: HostBoolOp,
        values: Vec<HostExpr>,
    },
    BinOp {
        location: HostLocation,
        left: Box<HostExpr>,
        op: HostOperator,
        right: Box<HostExpr>,
    },
    UnaryOp {
        location: HostLocation,
        op: HostUnaryOp,
        operand: Box<HostExpr>,
    },
    Lambda { location: HostLocation },
    IfExp {
        location: HostLocation,
        test: Box<HostExpr>,
        body: Box<HostExpr>,
        orelse: Box<HostExpr>,
    },
    Dict { location: HostLocation },
    Set { location: HostLocation },
    ListComp { location: HostLocation },
    SetComp { location: HostLocation },
    DictComp { location: HostLocation },
    GeneratorExp { location: HostLocation },
    Await { location: HostLocation },
    Yield { location: HostLocation },
    YieldFrom { location: HostLocation },
    Compare {
        location: HostLocation,
        left: Box<HostExpr>,
        ops: Vec<HostCmpOp>,
        comparators: Vec<HostExpr>,
    },
    Call {
        location: HostLocation,
        func: Box<HostExpr>,
        #[serde(default)]
        args: Vec<HostExpr>,
        #[serde(default)]
        keywords: Vec<HostKeyword>,
    },
    FormattedValue { location: HostLocation },
    JoinedStr { location: HostLocation },
    Constant {
        location: HostLocation,
        value: HostConstant,
    },
    Attribute { location: HostLocation },
    Subscript { location: HostLocation },
    Starred { location: HostLocation },
    Name {
        location: HostLocation,
        id: String,
    },
    List {
        location: HostLocation,
        #[serde(default)]
        elts: Vec<HostExpr>,
    },
    Tuple { location: HostLocation },
    Slice { location: HostLocation },
    NamedExpr { location: HostLocation },
}

impl HostExpr {
    pub fn location(&self) -> HostLocation {
        match self {
            HostExpr::BoolOp { location, .. }
            | HostExpr::BinOp { location, .. }
            | HostExpr::UnaryOp { location, .. }
            | HostExpr::Lambda { location }
            | HostExpr::IfExp { location, .. }
            | HostExpr::Dict { location }
            | HostExpr::Set { location }
            | HostExpr::ListComp { location }
            | HostExpr::SetComp { location }
            | HostExpr::DictComp { location }
            | HostExpr::GeneratorExp { location }
            | HostExpr::Await { location }
            | HostExpr::Yield { location }
            | HostExpr::YieldFrom { location }
            | HostExpr::Compare { location, .. }
            | HostExpr::Call { location, .. }
            | HostExpr::FormattedValue { location }
            | HostExpr::JoinedStr { location }
            | HostExpr::Constant { location, .. }
            | HostExpr::Attribute { location }
            | HostExpr::Subscript { location }
            | HostExpr::Starred { location }
            | HostExpr::Name { location, .. }
            | HostExpr::List { location, .. }
            | HostExpr::Tuple { location }
            | HostExpr::Slice { location }
            | HostExpr::NamedExpr { location } => *location,
        }
    }
}

/// A literal constant. The JSON encoding is the bare value; `Bool` must come
/// before `Int` so that `true` is not read as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostConstant {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostOperator {
    Add,
    Sub,
    Mult,
    Div,
    FloorDiv,
    Mod,
    Pow,
    MatMult,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostUnaryOp {
    UAdd,
    USub,
    Not,
    Invert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostBoolOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostCmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

/// A keyword argument at a call site. Always rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostKeyword {
    #[serde(default)]
    pub arg: Option<String>,
    pub value: HostExpr,
}

/// The parameter list of a host function definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostArguments {
    #[serde(default)]
    pub posonlyargs: Vec<HostArg>,
    #[serde(default)]
    pub args: Vec<HostArg>,
    #[serde(default)]
    pub vararg: Option<HostArg>,
    #[serde(default)]
    pub kwonlyargs: Vec<HostArg>,
    #[serde(default)]
    pub kw_defaults: Vec<Option<HostExpr>>,
    #[serde(default)]
    pub kwarg: Option<HostArg>,
    #[serde(default)]
    pub defaults: Vec<HostExpr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostArg {
    pub location: HostLocation,
    pub arg: String,
    #[serde(default)]
    pub annotation: Option<HostExpr>,
}
