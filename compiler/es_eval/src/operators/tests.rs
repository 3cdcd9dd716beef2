#![expect(clippy::unwrap_used, reason = "operators on valid operands succeed")]

use super::*;
use es_value::Primordial;
use pretty_assertions::assert_eq;

fn num(n: f64) -> Value {
    Value::Number(n)
}

fn eval(left: &Value, op: BinaryOp, right: &Value) -> Value {
    evaluate_binary(left, right, op).unwrap()
}

fn obj(entries: &[(&str, Value)]) -> Value {
    record(entries.iter().map(|(k, v)| (*k, v.clone())))
}

// Arithmetic

#[test]
fn number_arithmetic() {
    assert_eq!(eval(&num(2.0), BinaryOp::Add, &num(3.0)).as_number(), Some(5.0));
    assert_eq!(eval(&num(2.0), BinaryOp::Sub, &num(3.0)).as_number(), Some(-1.0));
    assert_eq!(eval(&num(2.0), BinaryOp::Mul, &num(3.0)).as_number(), Some(6.0));
    assert_eq!(eval(&num(3.0), BinaryOp::Div, &num(2.0)).as_number(), Some(1.5));
    assert_eq!(eval(&num(2.0), BinaryOp::Pow, &num(10.0)).as_number(), Some(1024.0));
    assert_eq!(eval(&num(-7.0), BinaryOp::Mod, &num(3.0)).as_number(), Some(-1.0));
    assert_eq!(
        eval(&num(1.0), BinaryOp::Div, &num(0.0)).as_number(),
        Some(f64::INFINITY)
    );
}

#[test]
fn number_rejects_mixed_operands() {
    let err = evaluate_binary(&num(1.0), &Value::string("1"), BinaryOp::Add).unwrap_err();
    assert_eq!(err.name(), "TypeError");
    assert_eq!(err.details(), "Expected type 'Num', got type 'Str'");
}

#[test]
fn string_concat_and_repeat() {
    let ab = eval(&Value::string("a"), BinaryOp::Add, &Value::string("b"));
    assert_eq!(ab.as_str(), Some("ab"));
    let repeated = eval(&Value::string("ab"), BinaryOp::Mul, &num(3.0));
    assert_eq!(repeated.as_str(), Some("ababab"));
    let none = eval(&Value::string("ab"), BinaryOp::Mul, &num(-1.0));
    assert_eq!(none.as_str(), Some(""));
}

#[test]
fn array_add_appends_iterable_to_a_copy() {
    let original = Value::array(vec![num(1.0)]);
    let sum = eval(&original, BinaryOp::Add, &num(2.0));
    assert_eq!(sum.repr(), "[1, 0, 1]");
    assert_eq!(original.repr(), "[1]");
    let with_chars = eval(&original, BinaryOp::Add, &Value::string("xy"));
    assert_eq!(with_chars.repr(), "[1, 'x', 'y']");
    assert!(evaluate_binary(&original, &Value::Null, BinaryOp::Add).is_err());
}

#[test]
fn object_merge_left_wins_and_subtract_keys() {
    let left = obj(&[("a", num(1.0)), ("b", num(2.0))]);
    let right = obj(&[("b", num(9.0)), ("c", num(3.0))]);
    assert_eq!(eval(&left, BinaryOp::Add, &right).repr(), "{a: 1, b: 2, c: 3}");

    let without_a = eval(&left, BinaryOp::Sub, &Value::string("a"));
    assert_eq!(without_a.repr(), "{b: 2}");
    let keys = Value::array(vec![Value::string("a"), Value::string("b")]);
    assert_eq!(eval(&left, BinaryOp::Sub, &keys).repr(), "{}");
}

#[test]
fn unsupported_operator_is_invalid_operation() {
    let err = evaluate_binary(&Value::Bool(true), &num(1.0), BinaryOp::Add).unwrap_err();
    assert_eq!(err.name(), "InvalidOperationError");
    assert_eq!(err.details(), "Cannot perform '+' on value of type 'Bool'");
}

// Comparison

#[test]
fn comparisons() {
    assert!(eval(&num(1.0), BinaryOp::Lt, &num(2.0)).is_truthy());
    assert!(!eval(&num(1.0), BinaryOp::Gt, &num(2.0)).is_truthy());
    assert!(eval(&num(2.0), BinaryOp::LtEq, &num(2.0)).is_truthy());
    assert!(eval(&num(2.0), BinaryOp::GtEq, &num(2.0)).is_truthy());
    assert!(eval(&Value::string("abc"), BinaryOp::Gt, &Value::string("zz")).is_truthy());
    assert!(evaluate_binary(&Value::Null, &num(1.0), BinaryOp::Lt).is_err());
}

#[test]
fn equality_is_structural_and_never_errors() {
    let a = Value::array(vec![num(1.0), obj(&[("k", Value::string("v"))])]);
    let b = Value::array(vec![num(1.0), obj(&[("k", Value::string("v"))])]);
    assert!(values_equal(&a, &b));
    assert!(!values_equal(&num(1.0), &Value::string("1")));
    assert!(!values_equal(&Value::Null, &Value::Bool(false)));
    assert!(values_equal(&Value::Null, &Value::Null));
    assert!(eval(&num(1.0), BinaryOp::NotEq, &Value::Null).is_truthy());
}

#[test]
fn type_equality_is_by_identity() {
    let num_ty = Value::primordial(Primordial::Num);
    assert!(values_equal(&num_ty, &Value::primordial(Primordial::Num)));
    assert!(!values_equal(&num_ty, &Value::primordial(Primordial::Str)));
    let u1 = eval(&num_ty, BinaryOp::Union, &Value::primordial(Primordial::Str));
    let u2 = eval(&num_ty, BinaryOp::Union, &Value::primordial(Primordial::Str));
    assert!(values_equal(&u1, &u2));
}

// Logical and membership

#[test]
fn logical_and_coalesce() {
    assert!(!eval(&num(1.0), BinaryOp::And, &num(0.0)).is_truthy());
    assert!(eval(&num(0.0), BinaryOp::Or, &Value::string("x")).is_truthy());
    assert_eq!(eval(&Value::Null, BinaryOp::Coalesce, &num(4.0)).as_number(), Some(4.0));
    assert_eq!(eval(&num(0.0), BinaryOp::Coalesce, &num(4.0)).as_number(), Some(0.0));
}

#[test]
fn membership() {
    let list = Value::array(vec![num(1.0), Value::string("a")]);
    assert!(eval(&Value::string("a"), BinaryOp::In, &list).is_truthy());
    assert!(!eval(&num(2.0), BinaryOp::In, &list).is_truthy());
    assert!(eval(&Value::string("ell"), BinaryOp::In, &Value::string("hello")).is_truthy());
    let o = obj(&[("key", Value::Null)]);
    assert!(eval(&Value::string("key"), BinaryOp::In, &o).is_truthy());
    assert!(evaluate_binary(&num(1.0), &num(5.0), BinaryOp::In).is_err());
}

#[test]
fn union_and_intersection_render() {
    let num_ty = Value::primordial(Primordial::Num);
    let str_ty = Value::primordial(Primordial::Str);
    assert_eq!(eval(&num_ty, BinaryOp::Union, &str_ty).to_string(), "Num | Str");
    assert_eq!(eval(&num_ty, BinaryOp::Intersection, &num(1.0)).to_string(), "Num & 1");
}
