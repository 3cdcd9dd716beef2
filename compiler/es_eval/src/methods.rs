//! Built-in methods reachable through property access on any value.
//!
//! `value.str()`, `value.isa(T)`, `xs.len()`... Each lookup produces a
//! native function bound to the receiver; the receiver arrives as `this`.

use es_value::{ContextId, FunctionValue, NativeCall, NativeHost, NativeResult, Value};

use crate::cast::cast;
use crate::operators::{contains, record};

type Method = fn(&mut dyn NativeHost, NativeCall) -> NativeResult;

/// Names every value answers to.
pub(crate) const COMMON_METHODS: [&str; 11] = [
    "isa",
    "is",
    "str",
    "clone",
    "cast",
    "bool",
    "type",
    "keys",
    "has_property",
    "describe",
    "info",
];

/// The built-in method `name` of `receiver`, bound to it.
pub(crate) fn builtin_method(receiver: &Value, name: &str, closure: ContextId) -> Option<Value> {
    let method: Method = match name {
        "isa" => isa,
        "is" => is,
        "str" => str_,
        "clone" => clone,
        "cast" => cast_to,
        "bool" => bool_,
        "type" => type_,
        "keys" => keys,
        "has_property" => has_property,
        "describe" => describe,
        "info" => info,
        "len" if is_collection(receiver) => len,
        "contains" if is_collection(receiver) => contains_,
        _ => return None,
    };
    let function = FunctionValue::native(name, closure, Vec::new(), method);
    Some(Value::function(function.bind(receiver.clone())))
}

fn is_collection(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Array(_) | Value::Object(_))
}

fn isa(host: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    Ok(Value::Bool(host.includes(&call.arg(0), &call.this)?))
}

fn is(_: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    Ok(Value::Bool(call.this.identical(&call.arg(0))))
}

fn str_(_: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    Ok(Value::string(call.this.to_string()))
}

/// Shallow copy: nested values are shared with the original.
fn clone(_: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    Ok(shallow_clone(&call.this))
}

pub(crate) fn shallow_clone(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::array(items.borrow().clone()),
        Value::Object(obj) => match obj.type_value() {
            Some(ty) => Value::instance(obj.snapshot(), ty),
            None => Value::object(obj.snapshot()),
        },
        Value::Function(f) => Value::function((**f).clone()),
        other => other.clone(),
    }
}

fn cast_to(_: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    cast(&call.this, &call.arg(0))
}

fn bool_(_: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    Ok(Value::Bool(call.this.is_truthy()))
}

fn type_(_: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    Ok(call.this.type_of())
}

fn keys(_: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    let keys: Vec<Value> = match &call.this {
        Value::Object(obj) => obj.keys().into_iter().map(Value::string).collect(),
        Value::Native(native) => native.object().keys().into_iter().map(Value::string).collect(),
        Value::Array(items) => indices(items.borrow().len()),
        Value::String(s) => indices(s.chars().count()),
        _ => Vec::new(),
    };
    Ok(Value::array(keys))
}

fn indices(len: usize) -> Vec<Value> {
    (0..len).map(|i| Value::Number(i as f64)).collect()
}

fn has_property(_: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    let key = call.arg(0);
    let found = match (&call.this, &key) {
        (Value::Object(obj), Value::String(k)) => obj.contains(k),
        (Value::Native(native), Value::String(k)) => native.object().get(k).is_some(),
        (Value::Array(items), Value::Number(i)) => *i >= 0.0 && (*i as usize) < items.borrow().len(),
        (_, Value::String(k)) => COMMON_METHODS.contains(&k.as_str()),
        _ => false,
    };
    Ok(Value::Bool(found))
}

fn describe(_: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    let text = call.arg(0).to_string();
    match &call.this {
        Value::Function(f) => f.describe(text),
        Value::Type(t) => t.describe(text),
        Value::Native(n) => n.describe(text),
        _ => {}
    }
    Ok(call.this)
}

fn info(_: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    let info = call.this.info();
    let optional = |text: Option<String>| text.map_or(Value::Null, Value::string);
    Ok(record([
        ("name", optional(info.name)),
        ("description", optional(info.description)),
        ("file", optional(info.file.map(|f| f.to_string()))),
        ("builtin", Value::Bool(info.builtin)),
    ]))
}

fn len(_: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    let len = match &call.this {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.borrow().len(),
        Value::Object(obj) => obj.len(),
        _ => 0,
    };
    Ok(Value::Number(len as f64))
}

fn contains_(_: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    Ok(Value::Bool(contains(&call.this, &call.arg(0))?))
}

#[cfg(test)]
mod tests;
