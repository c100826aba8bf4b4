//! Tests for Value display, truthiness and equality.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::values::{Object, Value};

fn object(entries: &[(&str, Value<'static>)]) -> Value<'static> {
    Value::object(
        entries
            .iter()
            .map(|(k, v)| (Rc::from(*k), v.clone()))
            .collect(),
    )
}

#[test]
fn test_display_scalars() {
    assert_eq!(Value::Undefined.to_string(), "undefined");
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::Bool(false).to_string(), "false");
    assert_eq!(Value::Number(42.0).to_string(), "42");
    assert_eq!(Value::Number(-0.5).to_string(), "-0.5");
    assert_eq!(Value::Number(f64::INFINITY).to_string(), "Infinity");
    assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
    assert_eq!(Value::BigInt(12345678901234567890).to_string(), "12345678901234567890n");
}

#[test]
fn test_display_strings_and_blobs() {
    assert_eq!(Value::str("hi").to_string(), r#""hi""#);
    assert_eq!(Value::str("a\"b\n").to_string(), r#""a\"b\n""#);
    assert_eq!(Value::blob(&[0xde, 0xad]).to_string(), "b16'dead'");
}

#[test]
fn test_display_compound() {
    let value = object(&[
        ("a", Value::Number(1.0)),
        ("two words", Value::array(vec![Value::Null, Value::str("x")])),
        ("empty", object(&[])),
    ]);
    assert_eq!(
        value.to_string(),
        r#"{ a: 1, "two words": [null, "x"], empty: {} }"#
    );
}

#[test]
fn test_truthiness() {
    let falsy = [
        Value::Undefined,
        Value::Null,
        Value::Bool(false),
        Value::Number(0.0),
        Value::Number(f64::NAN),
        Value::BigInt(0),
        Value::str(""),
        Value::blob(&[]),
    ];
    for value in &falsy {
        assert!(!value.is_truthy(), "{} should be falsy", value);
    }

    let truthy = [
        Value::Bool(true),
        Value::Number(-1.0),
        Value::BigInt(3),
        Value::str("0"),
        Value::array(vec![]),
        object(&[]),
    ];
    for value in &truthy {
        assert!(value.is_truthy(), "{} should be truthy", value);
    }
}

#[test]
fn test_strict_equality_uses_identity_for_compounds() {
    let a = Value::array(vec![Value::Number(1.0)]);
    let b = Value::array(vec![Value::Number(1.0)]);
    assert!(a.strict_equals(&a.clone()));
    assert!(!a.strict_equals(&b));
    // Structural equality sees them as equal.
    assert_eq!(a, b);

    assert!(Value::str("x").strict_equals(&Value::str("x")));
    assert!(!Value::Number(1.0).strict_equals(&Value::BigInt(1)));
    assert!(!Value::Number(f64::NAN).strict_equals(&Value::Number(f64::NAN)));
}

#[test]
fn test_object_later_keys_override() {
    let mut obj = Object::new();
    obj.insert(Rc::from("a"), Value::Number(1.0));
    obj.insert(Rc::from("b"), Value::Number(2.0));
    obj.insert(Rc::from("a"), Value::Number(3.0));
    assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(obj.get("a"), Some(&Value::Number(3.0)));

    let mut base = Object::new();
    base.insert(Rc::from("b"), Value::Null);
    base.insert(Rc::from("c"), Value::Bool(true));
    base.extend_from(&obj);
    assert_eq!(base.keys().collect::<Vec<_>>(), vec!["b", "c", "a"]);
    assert_eq!(base.get("b"), Some(&Value::Number(2.0)));
}
