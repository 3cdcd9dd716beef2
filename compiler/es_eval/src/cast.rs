//! Conversions between primordial types (`value.cast(T)`, `Num(x)`, `parse_num`).

use es_value::errors::{invalid_operation_with, type_error};
use es_value::{EsError, NativeResult, Primordial, Value};

use crate::iterate::{bounded_len, collect_items};

/// Parse script text as a number. Surrounding whitespace is ignored.
pub fn parse_number(text: &str) -> Result<f64, EsError> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if !trimmed.is_empty() => Ok(n),
        _ => Err(type_error(format!("Cannot convert '{text}' to a number."))),
    }
}

/// Convert `value` to the type `ty`.
///
/// Only primordial targets are supported. Casting to the value's own type
/// or to `Any` returns the value unchanged.
pub fn cast(value: &Value, ty: &Value) -> NativeResult {
    let target = match ty {
        Value::Type(descriptor) => descriptor.as_primordial(),
        _ => None,
    };
    let Some(target) = target else {
        return Err(cannot_cast(value, ty));
    };
    if target == Primordial::Any || target == value.kind() {
        return Ok(value.clone());
    }
    match (target, value) {
        (Primordial::Str, other) => Ok(Value::string(other.to_string())),
        (Primordial::Bool, other) => Ok(Value::Bool(other.is_truthy())),
        (Primordial::Num, Value::String(s)) => parse_number(s).map(Value::Number),
        (Primordial::Num, Value::Bool(b)) => Ok(Value::Number(if *b { 1.0 } else { 0.0 })),
        (Primordial::Num, Value::Array(items)) => Ok(Value::Number(items.borrow().len() as f64)),
        (Primordial::Num, Value::Object(_)) => Ok(Value::Number(1.0)),
        (Primordial::Arr, Value::Number(n)) => {
            let len = bounded_len(n.trunc(), "cast")?;
            Ok(Value::array(vec![Value::Null; len]))
        }
        (Primordial::Arr, Value::String(_)) => collect_items(value).map(Value::array),
        _ => Err(cannot_cast(value, ty)),
    }
}

#[cold]
fn cannot_cast(value: &Value, ty: &Value) -> EsError {
    invalid_operation_with("cast", &value.type_name(), format!("cannot cast to '{ty}'"))
}

#[cfg(test)]
mod tests;
