//! Indexed access: `base[key]` and `base[key] = value`.
//!
//! Lookup order on objects is own key, built-in method, then an own
//! `__get__` function. Arrays and strings take numeric indexes, negative
//! ones counting from the end.

use es_value::errors::{invalid_operation, missing_property, type_mismatch};
use es_value::{ContextId, EsError, NativeResult, OrderedMap, Value};

use super::{own_override, CallOptions, Interpreter};
use crate::config::MAX_SEQUENCE_LEN;
use crate::methods::builtin_method;

impl Interpreter {
    pub(crate) fn get_property(&mut self, base: &Value, key: &Value, ctx: ContextId) -> NativeResult {
        let root = self.root();
        match (base, key) {
            (Value::Object(obj), _) => {
                let name = key.to_string();
                if let Some(value) = obj.get(&name) {
                    return Ok(value);
                }
                if name == "constructor" {
                    return Ok(base.type_of());
                }
                if let Some(method) = builtin_method(base, &name, root) {
                    return Ok(method);
                }
                match own_override(base, "__get__") {
                    Some(getter) => self.call_at(
                        &getter,
                        vec![key.clone()],
                        OrderedMap::new(),
                        ctx,
                        CallOptions::default(),
                        None,
                    ),
                    None => Err(missing_property(&name, &base.to_string())),
                }
            }
            (Value::Array(items), Value::Number(n)) => {
                let items = items.borrow();
                Ok(resolve_index(*n, items.len())
                    .and_then(|i| items.get(i).cloned())
                    .unwrap_or(Value::Null))
            }
            (Value::String(s), Value::Number(n)) => {
                let chars: Vec<char> = s.chars().collect();
                Ok(Value::string(
                    resolve_index(*n, chars.len())
                        .and_then(|i| chars.get(i))
                        .map(char::to_string)
                        .unwrap_or_default(),
                ))
            }
            (Value::Error(err), Value::String(name)) => match name.as_str() {
                "name" => Ok(Value::string(err.name())),
                "details" => Ok(Value::string(err.details())),
                "traceback" => Ok(Value::array(
                    err.traceback
                        .iter()
                        .map(|frame| Value::string(format!("{} : {}", frame.position, frame.line)))
                        .collect(),
                )),
                other => self.builtin_or_missing(base, other),
            },
            (Value::Type(ty), Value::String(name)) if matches!(name.as_str(), "name" | "__name__") => {
                Ok(Value::string(ty.name()))
            }
            (Value::Function(f), Value::String(name)) if name.as_str() == "name" => {
                Ok(Value::string(f.name()))
            }
            (Value::Native(native), Value::String(name)) => match native.object().get(name) {
                Some(value) => Ok(value),
                None => self.builtin_or_missing(base, name),
            },
            (_, Value::String(name)) => self.builtin_or_missing(base, name),
            (_, other) => Err(type_mismatch("Str", &other.type_name())),
        }
    }

    fn builtin_or_missing(&self, base: &Value, name: &str) -> NativeResult {
        if name == "constructor" {
            return Ok(base.type_of());
        }
        builtin_method(base, name, self.root())
            .ok_or_else(|| missing_property(name, &base.to_string()))
    }

    /// Store `value` under `key`.
    ///
    /// Strings are immutable payloads: setting a character returns the
    /// spliced string for the caller to rebind.
    pub(crate) fn set_property(
        &mut self,
        base: &Value,
        key: &Value,
        value: Value,
        ctx: ContextId,
    ) -> Result<Option<Value>, EsError> {
        match (base, key) {
            (Value::Object(obj), _) => {
                if let Some(setter) = own_override(base, "__set__") {
                    self.call_at(
                        &setter,
                        vec![key.clone(), value],
                        OrderedMap::new(),
                        ctx,
                        CallOptions::default(),
                        None,
                    )?;
                    return Ok(None);
                }
                match key {
                    Value::String(name) => {
                        obj.set(name.as_str(), value);
                        Ok(None)
                    }
                    other => Err(type_mismatch("Str", &other.type_name())),
                }
            }
            (Value::Array(items), Value::Number(n)) => {
                let mut items = items.borrow_mut();
                let len = items.len();
                let missing = || missing_property(&key.to_string(), &base_repr(len));
                let index = if *n < 0.0 {
                    resolve_index(*n, len).ok_or_else(missing)?
                } else if *n < MAX_SEQUENCE_LEN as f64 {
                    *n as usize
                } else {
                    // Too large, infinite or NaN.
                    return Err(missing());
                };
                if index >= items.len() {
                    items.resize(index + 1, Value::Null);
                }
                items[index] = value;
                Ok(None)
            }
            (Value::String(s), Value::Number(n)) => {
                let mut chars: Vec<char> = s.chars().collect();
                let len = chars.len();
                let index = resolve_index(*n, len.max(1)).unwrap_or(len);
                let insert: Vec<char> = value.to_string().chars().collect();
                if index < len {
                    chars.splice(index..=index, insert);
                } else {
                    chars.extend(insert);
                }
                Ok(Some(Value::string(chars.into_iter().collect::<String>())))
            }
            (Value::Native(native), Value::String(name)) => {
                native.object().set(name, value)?;
                Ok(None)
            }
            (Value::Array(_) | Value::String(_), other) => Err(type_mismatch("Num", &other.type_name())),
            (other, _) => Err(invalid_operation("[]=", &other.type_name())),
        }
    }
}

fn base_repr(len: usize) -> String {
    format!("array of length {len}")
}

/// Position of index `n` in a sequence of `len` items; negative counts from the end.
fn resolve_index(n: f64, len: usize) -> Option<usize> {
    if !n.is_finite() {
        return None;
    }
    let n = n.floor();
    let index = if n < 0.0 { len as f64 + n } else { n };
    if index < 0.0 || index >= len as f64 {
        return None;
    }
    Some(index as usize)
}
