#![expect(clippy::unwrap_used, reason = "valid casts succeed")]

use super::*;
use pretty_assertions::assert_eq;

fn to(p: Primordial, value: &Value) -> NativeResult {
    cast(value, &Value::primordial(p))
}

#[test]
fn to_number() {
    assert_eq!(to(Primordial::Num, &Value::string(" 4.5 ")).unwrap().as_number(), Some(4.5));
    assert_eq!(to(Primordial::Num, &Value::Bool(true)).unwrap().as_number(), Some(1.0));
    let arr = Value::array(vec![Value::Null, Value::Null]);
    assert_eq!(to(Primordial::Num, &arr).unwrap().as_number(), Some(2.0));
    let err = to(Primordial::Num, &Value::string("abc")).unwrap_err();
    assert_eq!(err.name(), "TypeError");
    assert_eq!(err.details(), "Cannot convert 'abc' to a number.");
    assert!(to(Primordial::Num, &Value::string("  ")).is_err());
}

#[test]
fn to_string_and_bool() {
    assert_eq!(to(Primordial::Str, &Value::Number(3.0)).unwrap().as_str(), Some("3"));
    assert_eq!(to(Primordial::Str, &Value::Null).unwrap().as_str(), Some("nil"));
    assert!(!to(Primordial::Bool, &Value::string("")).unwrap().is_truthy());
    assert!(to(Primordial::Bool, &Value::Number(2.0)).unwrap().is_truthy());
}

#[test]
fn to_array() {
    assert_eq!(to(Primordial::Arr, &Value::Number(2.0)).unwrap().repr(), "[nil, nil]");
    assert_eq!(to(Primordial::Arr, &Value::string("ab")).unwrap().repr(), "['a', 'b']");
}

#[test]
fn same_type_and_any_are_identity() {
    let arr = Value::array(vec![]);
    assert!(to(Primordial::Arr, &arr).unwrap().identical(&arr));
    assert!(to(Primordial::Any, &arr).unwrap().identical(&arr));
}

#[test]
fn unsupported_casts_fail() {
    let err = to(Primordial::Func, &Value::Number(1.0)).unwrap_err();
    assert_eq!(err.name(), "InvalidOperationError");
    assert_eq!(
        err.details(),
        "Cannot perform 'cast' on value of type 'Num': cannot cast to 'Func'"
    );
    assert!(cast(&Value::Number(1.0), &Value::Number(2.0)).is_err());
}
