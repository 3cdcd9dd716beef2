//! Built-in unary operators.

use es_ir::UnaryOp;
use es_value::errors::type_mismatch;
use es_value::{NativeResult, Primordial, TypeDescriptor, TypeKind, Value};

/// Evaluate a unary operator. `!` uses plain truthiness; `__bool__`
/// overrides are applied by the interpreter.
pub fn evaluate_unary(value: &Value, op: UnaryOp) -> NativeResult {
    match (value, op) {
        (Value::Number(n), UnaryOp::Neg) => Ok(Value::Number(-n)),
        (Value::Number(n), UnaryOp::Abs) => Ok(Value::Number(n.abs())),
        (other, UnaryOp::Neg | UnaryOp::Abs) => Err(type_mismatch("Num", &other.type_name())),
        (_, UnaryOp::Not) => Ok(Value::Bool(!value.is_truthy())),
        (_, UnaryOp::Complement) => Ok(Value::type_value(TypeDescriptor::combinator(
            TypeKind::Not(value.clone()),
        ))),
        (_, UnaryOp::Optional) => Ok(Value::type_value(TypeDescriptor::combinator(
            TypeKind::Union(Value::primordial(Primordial::Null), value.clone()),
        ))),
    }
}
