//! Built-in binary operators.
//!
//! Each value variant supports a fixed set of operators, so dispatch is a
//! match on the operand pair. User overrides (`__add__` and friends on an
//! object) are resolved by the interpreter before falling back to
//! [`evaluate_binary`].

use es_ir::BinaryOp;
use es_value::errors::{invalid_operation, type_mismatch};
use es_value::{EsError, Heap, NativeResult, ObjectData, OrderedMap, TypeDescriptor, TypeKind, Value};

use crate::config::MAX_SEQUENCE_LEN;
use crate::iterate::{bounded_len, collect_items, too_long};
use crate::typing::same_type;

/// Nesting depth after which structural equality gives up and compares identity.
const MAX_EQ_DEPTH: usize = 64;

/// Evaluate a binary operator on two already-evaluated operands.
///
/// `&&`, `||` and `??` are normally short-circuited by the evaluator; here
/// they act on both operands eagerly.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> NativeResult {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => subtract(left, right),
        BinaryOp::Mul => multiply(left, right),
        BinaryOp::Div | BinaryOp::Pow | BinaryOp::Mod => arithmetic(left, right, op),
        BinaryOp::Eq => Ok(Value::Bool(values_equal(left, right))),
        BinaryOp::NotEq => Ok(Value::Bool(!values_equal(left, right))),
        BinaryOp::Lt | BinaryOp::Gt => compare(left, right, op).map(Value::Bool),
        BinaryOp::LtEq => {
            Ok(Value::Bool(compare(left, right, BinaryOp::Lt)? || values_equal(left, right)))
        }
        BinaryOp::GtEq => {
            Ok(Value::Bool(compare(left, right, BinaryOp::Gt)? || values_equal(left, right)))
        }
        BinaryOp::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
        BinaryOp::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
        BinaryOp::Coalesce => Ok(if left.is_null() {
            right.clone()
        } else {
            left.clone()
        }),
        BinaryOp::In => contains(right, left).map(Value::Bool),
        BinaryOp::Union => Ok(combinator(TypeKind::Union(left.clone(), right.clone()))),
        BinaryOp::Intersection => Ok(combinator(TypeKind::Intersection(
            left.clone(),
            right.clone(),
        ))),
    }
}

fn combinator(kind: TypeKind) -> Value {
    Value::type_value(TypeDescriptor::combinator(kind))
}

fn add(left: &Value, right: &Value) -> NativeResult {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::Number(_), other) => Err(type_mismatch("Num", &other.type_name())),
        (Value::String(a), Value::String(b)) => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::string(joined))
        }
        (Value::String(_), other) => Err(type_mismatch("Str", &other.type_name())),
        (Value::Array(items), other) => {
            let extra = collect_items(other)?;
            let mut appended = items.borrow().clone();
            appended.extend(extra);
            Ok(Value::array(appended))
        }
        (Value::Object(a), Value::Object(b)) => Ok(merge(a, b)),
        (Value::Object(_), other) => Err(type_mismatch("Obj", &other.type_name())),
        (other, _) => Err(invalid_operation(BinaryOp::Add.as_symbol(), &other.type_name())),
    }
}

/// Keys of both objects; the left side wins on conflict.
fn merge(left: &Heap<ObjectData>, right: &Heap<ObjectData>) -> Value {
    let mut merged = left.snapshot();
    for (key, value) in right.entries().iter() {
        if !merged.contains_key(key) {
            merged.insert(key, value.clone());
        }
    }
    Value::object(merged)
}

fn subtract(left: &Value, right: &Value) -> NativeResult {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
        (Value::Number(_), other) => Err(type_mismatch("Num", &other.type_name())),
        (Value::Object(obj), Value::String(key)) => {
            let mut remaining = obj.snapshot();
            remaining.remove(key.as_str());
            Ok(Value::object(remaining))
        }
        (Value::Object(obj), Value::Array(keys)) => {
            let mut remaining = obj.snapshot();
            for key in keys.borrow().iter() {
                match key {
                    Value::String(key) => {
                        remaining.remove(key.as_str());
                    }
                    other => return Err(type_mismatch("Str", &other.type_name())),
                }
            }
            Ok(Value::object(remaining))
        }
        (Value::Object(_), other) => Err(type_mismatch("Str | Arr", &other.type_name())),
        (other, _) => Err(invalid_operation(BinaryOp::Sub.as_symbol(), &other.type_name())),
    }
}

fn multiply(left: &Value, right: &Value) -> NativeResult {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
        (Value::Number(_), other) => Err(type_mismatch("Num", &other.type_name())),
        (Value::String(s), Value::Number(n)) => {
            let op = BinaryOp::Mul.as_symbol();
            let times = bounded_len(n.trunc(), op)?;
            let len = s.chars().count().saturating_mul(times);
            if len > MAX_SEQUENCE_LEN {
                return Err(too_long(op, "Str", len as f64));
            }
            Ok(Value::string(s.repeat(times)))
        }
        (Value::String(_), other) => Err(type_mismatch("Num", &other.type_name())),
        (other, _) => Err(invalid_operation(BinaryOp::Mul.as_symbol(), &other.type_name())),
    }
}

/// `/`, `^` and `%`: numbers only, IEEE semantics.
fn arithmetic(left: &Value, right: &Value, op: BinaryOp) -> NativeResult {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(match op {
            BinaryOp::Div => a / b,
            BinaryOp::Pow => a.powf(*b),
            _ => a % b,
        })),
        (Value::Number(_), other) => Err(type_mismatch("Num", &other.type_name())),
        (other, _) => Err(invalid_operation(op.as_symbol(), &other.type_name())),
    }
}

/// `<` or `>`: numbers by value, strings by length.
fn compare(left: &Value, right: &Value, op: BinaryOp) -> Result<bool, EsError> {
    let (a, b) = match (left, right) {
        (Value::Number(a), Value::Number(b)) => (*a, *b),
        (Value::String(a), Value::String(b)) => {
            (a.chars().count() as f64, b.chars().count() as f64)
        }
        (Value::Number(_), other) => return Err(type_mismatch("Num", &other.type_name())),
        (Value::String(_), other) => return Err(type_mismatch("Str", &other.type_name())),
        (other, _) => return Err(invalid_operation(op.as_symbol(), &other.type_name())),
    };
    Ok(if op == BinaryOp::Lt { a < b } else { a > b })
}

/// `item in container`.
pub fn contains(container: &Value, item: &Value) -> Result<bool, EsError> {
    match container {
        Value::String(s) => match item {
            Value::String(needle) => Ok(s.contains(needle.as_str())),
            other => Err(type_mismatch("Str", &other.type_name())),
        },
        Value::Array(items) => Ok(items.borrow().iter().any(|x| values_equal(x, item))),
        Value::Object(obj) => Ok(item.as_str().is_some_and(|key| obj.contains(key))),
        Value::Native(native) => Ok(item
            .as_str()
            .is_some_and(|key| native.object().keys().iter().any(|k| k == key))),
        other => Err(invalid_operation("contains", &other.type_name())),
    }
}

/// Equality as scripts see it, without user overrides.
///
/// Never errors: values of different variants are simply unequal.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    equal_at(a, b, 0)
}

fn equal_at(a: &Value, b: &Value, depth: usize) -> bool {
    if depth > MAX_EQ_DEPTH {
        return a.identical(b);
    }
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x.as_str() == y.as_str(),
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Null, Value::Null) => true,
        (Value::Array(x), Value::Array(y)) => {
            if Heap::ptr_eq(x, y) {
                return true;
            }
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(p, q)| equal_at(p, q, depth + 1))
        }
        (Value::Object(x), Value::Object(y)) => {
            if Heap::ptr_eq(x, y) {
                return true;
            }
            x.len() == y.len()
                && x.entries().iter().all(|(key, value)| {
                    y.get(key)
                        .is_some_and(|other| equal_at(value, &other, depth + 1))
                })
        }
        (Value::Function(x), Value::Function(y)) => x.same_body(y),
        (Value::Type(x), Value::Type(y)) => same_type(x, y),
        (Value::Error(x), Value::Error(y)) => x.name() == y.name(),
        (Value::Native(x), Value::Native(y)) => Heap::ptr_eq(x, y),
        _ => false,
    }
}

/// Build an object from key/value pairs. Used by built-ins that return records.
pub(crate) fn record<'a>(entries: impl IntoIterator<Item = (&'a str, Value)>) -> Value {
    Value::object(entries.into_iter().collect::<OrderedMap<Value>>())
}

#[cfg(test)]
mod tests;
