//! Unit tests for the value type lattice and the type system registry.

use crate::types::types::{FuncType, SymbolType, ValueType};
use crate::types::typesystem::{TypeSystem, BUILTIN_FUNCTIONS};

#[test]
fn test_class_name_normalization() {
    assert_eq!(ValueType::from_class_name("int"), ValueType::Int);
    assert_eq!(ValueType::from_class_name("bool"), ValueType::Bool);
    assert_eq!(ValueType::from_class_name("str"), ValueType::Str);
    assert_eq!(ValueType::from_class_name("object"), ValueType::Object);
    assert_eq!(ValueType::from_class_name("<None>"), ValueType::None);
    assert_eq!(ValueType::from_class_name("<Empty>"), ValueType::Empty);
    assert_eq!(
        ValueType::from_class_name("Widget"),
        ValueType::Class("Widget".to_string())
    );
}

#[test]
fn test_display_matches_class_name() {
    assert_eq!(ValueType::Int.to_string(), "int");
    assert_eq!(ValueType::None.to_string(), "<None>");
    assert_eq!(
        FuncType::new(vec![ValueType::Int, ValueType::Int], ValueType::Int).to_string(),
        "[int, int] -> int"
    );
}

#[test]
fn test_value_type_json_shape() {
    assert_eq!(
        ValueType::Str.to_json(),
        serde_json::json!({"kind": "ClassValueType", "className": "str"})
    );
}

#[test]
fn test_func_type_json_shape() {
    let f = FuncType::new(vec![ValueType::Int], ValueType::Bool);
    assert_eq!(
        f.to_json(),
        serde_json::json!({
            "kind": "FuncType",
            "parameters": [{"kind": "ClassValueType", "className": "int"}],
            "returnType": {"kind": "ClassValueType", "className": "bool"},
        })
    );
}

#[test]
fn test_can_assign_identity() {
    let ts = TypeSystem::new();
    assert!(ts.can_assign(&ValueType::Int, &ValueType::Int));
    assert!(ts.can_assign(&ValueType::None, &ValueType::None));
}

#[test]
fn test_can_assign_to_object() {
    let ts = TypeSystem::new();
    assert!(ts.can_assign(&ValueType::Int, &ValueType::Object));
    assert!(ts.can_assign(&ValueType::Str, &ValueType::Object));
    assert!(ts.can_assign(&ValueType::None, &ValueType::Object));
}

#[test]
fn test_none_not_assignable_to_primitives() {
    let ts = TypeSystem::new();
    assert!(!ts.can_assign(&ValueType::None, &ValueType::Int));
    assert!(!ts.can_assign(&ValueType::None, &ValueType::Bool));
    assert!(!ts.can_assign(&ValueType::None, &ValueType::Str));
}

#[test]
fn test_none_assignable_to_reference_classes() {
    let ts = TypeSystem::new();
    assert!(ts.can_assign(&ValueType::None, &ValueType::Class("Widget".to_string())));
}

#[test]
fn test_empty_assignability() {
    let ts = TypeSystem::new();
    assert!(!ts.can_assign(&ValueType::Empty, &ValueType::Int));
    assert!(ts.can_assign(&ValueType::Empty, &ValueType::Object));
    assert!(ts.can_assign(&ValueType::Empty, &ValueType::Class("Widget".to_string())));
}

#[test]
fn test_join_equal_types() {
    let ts = TypeSystem::new();
    assert_eq!(ts.join(&ValueType::Int, &ValueType::Int), ValueType::Int);
    assert_eq!(ts.join(&ValueType::Str, &ValueType::Str), ValueType::Str);
}

#[test]
fn test_join_divergent_types_fall_back_to_object() {
    let ts = TypeSystem::new();
    assert_eq!(ts.join(&ValueType::Int, &ValueType::Str), ValueType::Object);
    assert_eq!(ts.join(&ValueType::Bool, &ValueType::Int), ValueType::Object);
}

#[test]
fn test_join_prefers_assignable_direction() {
    let ts = TypeSystem::new();
    assert_eq!(
        ts.join(&ValueType::None, &ValueType::Class("Widget".to_string())),
        ValueType::Class("Widget".to_string())
    );
}

#[test]
fn test_class_registry_holds_builtins_only() {
    let ts = TypeSystem::new();
    for name in ["object", "int", "bool", "str"] {
        assert!(ts.class_exists(name), "missing builtin {}", name);
    }
    assert!(!ts.class_exists("Widget"));
    assert!(!ts.class_exists("print"));
}

#[test]
fn test_builtin_initializer_signatures() {
    let ts = TypeSystem::new();
    let init = ts.get_method("object", "__init__").unwrap();
    assert_eq!(init.parameters, vec![ValueType::Object]);
    assert_eq!(init.return_type, ValueType::None);
    assert!(ts.get_method("object", "missing").is_none());
    assert!(ts.get_method("Widget", "__init__").is_none());
}

#[test]
fn test_builtin_function_table() {
    let print = &BUILTIN_FUNCTIONS
        .iter()
        .find(|(name, _)| *name == "print")
        .unwrap()
        .1;
    assert_eq!(print.parameters, vec![ValueType::Object]);
    assert_eq!(print.return_type, ValueType::None);

    let input = &BUILTIN_FUNCTIONS
        .iter()
        .find(|(name, _)| *name == "input")
        .unwrap()
        .1;
    assert!(input.parameters.is_empty());
    assert_eq!(input.return_type, ValueType::Str);
}

#[test]
fn test_symbol_type_accessors() {
    let v = SymbolType::Value(ValueType::Int);
    assert_eq!(v.as_value(), Some(&ValueType::Int));
    assert!(v.as_func().is_none());

    let f = SymbolType::Func(FuncType::new(vec![], ValueType::Str));
    assert!(f.as_value().is_none());
    assert_eq!(f.as_func().unwrap().return_type, ValueType::Str);
}
