use std::collections::HashMap;

use lazy_static::lazy_static;

use super::types::{FuncType, ValueType};

lazy_static! {
    /// Signatures of the built-in I/O and assertion primitives, installed
    /// into the global scope before checking begins.
    pub static ref BUILTIN_FUNCTIONS: Vec<(&'static str, FuncType)> = vec![
        (
            "print",
            FuncType::new(vec![ValueType::Object], ValueType::None),
        ),
        ("input", FuncType::new(vec![], ValueType::Str)),
        (
            "len",
            FuncType::new(vec![ValueType::Object], ValueType::Int),
        ),
        (
            "__assert__",
            FuncType::new(vec![ValueType::Bool], ValueType::None),
        ),
        (
            "printf",
            FuncType::new(vec![ValueType::Str, ValueType::Object], ValueType::Int),
        ),
    ];
}

/// A registered class: its superclass and method signatures. With user
/// classes rejected at parse time, only the built-ins ever appear.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub name: String,
    pub superclass: String,
    pub methods: HashMap<String, FuncType>,
}

impl ClassInfo {
    fn builtin(name: &str) -> Self {
        let mut methods = HashMap::new();
        // Every built-in carries the implicit no-argument initializer.
        methods.insert(
            "__init__".to_string(),
            FuncType::new(
                vec![ValueType::from_class_name(name)],
                ValueType::None,
            ),
        );
        ClassInfo {
            name: name.to_string(),
            superclass: "object".to_string(),
            methods,
        }
    }
}

/// The type system registry for one compilation unit.
///
/// Constructed once per unit and passed by reference through the checker;
/// it answers class-existence and method lookups and implements the
/// assignability relation and the join operator.
#[derive(Debug, Clone)]
pub struct TypeSystem {
    classes: HashMap<String, ClassInfo>,
}

impl TypeSystem {
    pub fn new() -> Self {
        let mut classes = HashMap::new();
        for name in ["object", "int", "bool", "str"] {
            classes.insert(name.to_string(), ClassInfo::builtin(name));
        }
        TypeSystem { classes }
    }

    pub fn class_exists(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn get_method(&self, class_name: &str, method_name: &str) -> Option<&FuncType> {
        self.classes
            .get(class_name)
            .and_then(|c| c.methods.get(method_name))
    }

    /// The directional assignability relation governing assignment,
    /// argument passing, and return compatibility.
    ///
    /// Identical types are assignable; everything is assignable to
    /// `object`; `<None>` and `<Empty>` are assignable to any class value
    /// type except the three primitives.
    pub fn can_assign(&self, from: &ValueType, to: &ValueType) -> bool {
        if from == to {
            return true;
        }
        if *to == ValueType::Object {
            return true;
        }
        match from {
            ValueType::None | ValueType::Empty => !to.is_special_type(),
            _ => false,
        }
    }

    /// The least upper bound of two value types, used to give a single
    /// static type to the branches of a conditional expression.
    pub fn join(&self, a: &ValueType, b: &ValueType) -> ValueType {
        if self.can_assign(a, b) {
            return b.clone();
        }
        if self.can_assign(b, a) {
            return a.clone();
        }
        ValueType::Object
    }
}

impl Default for TypeSystem {
    fn default() -> Self {
        TypeSystem::new()
    }
}
