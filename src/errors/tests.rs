//! Unit tests for error handling.
//!
//! This module contains tests for the diagnostic type shared by the
//! legality parser and the type checker.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Location;

#[test]
fn test_error_creation() {
    let error = Error::new(ErrorImpl::Unsupported, Location::new(4, 1));

    assert_eq!(error.get_error_name(), "Unsupported");
    assert_eq!(error.get_location(), Location::new(4, 1));
}

#[test]
fn test_error_message_carries_location() {
    let error = Error::new(
        ErrorImpl::DuplicateDeclaration {
            name: "x".to_string(),
        },
        Location::new(3, 1),
    );

    assert_eq!(
        error.message(),
        "Duplicate declaration of identifier: x. Line 3 Col 1"
    );
    assert_eq!(error.to_string(), error.message());
}

#[test]
fn test_type_mismatch_error() {
    let error = Error::new(
        ErrorImpl::TypeMismatch {
            expected: "int".to_string(),
            actual: "str".to_string(),
        },
        Location::new(1, 5),
    );

    assert_eq!(error.get_error_name(), "TypeMismatch");
    assert_eq!(error.message(), "Expected int, got str. Line 1 Col 5");
}

#[test]
fn test_bad_operand_types_error() {
    let error = Error::new(
        ErrorImpl::BadOperandTypes {
            operator: "+".to_string(),
            left: "int".to_string(),
            right: "str".to_string(),
        },
        Location::new(2, 3),
    );

    assert_eq!(
        error.message(),
        "Cannot use operator + on types int and str. Line 2 Col 3"
    );
}

#[test]
fn test_unsupported_operator_error() {
    let error = Error::new(
        ErrorImpl::UnsupportedOperator {
            operator: "@".to_string(),
        },
        Location::new(1, 1),
    );

    assert_eq!(error.message(), "Unsupported operator: @. Line 1 Col 1");
}

#[test]
fn test_arity_mismatch_error() {
    let error = Error::new(
        ErrorImpl::ArityMismatch {
            expected: 2,
            actual: 3,
        },
        Location::new(1, 1),
    );

    assert_eq!(error.message(), "Expected 2 args, got 3. Line 1 Col 1");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(ErrorImpl::Unsupported, Location::new(1, 1));

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::NotDefinedInScope {
            name: "x".to_string(),
        },
        Location::new(1, 1),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_json_record() {
    let error = Error::new(
        ErrorImpl::UnknownIdentifier {
            name: "y".to_string(),
        },
        Location::new(7, 11),
    );

    assert_eq!(
        error.to_json(),
        serde_json::json!({
            "kind": "CompilerError",
            "location": [7, 11],
            "message": "Unknown identifier: y. Line 7 Col 11",
        })
    );
}
