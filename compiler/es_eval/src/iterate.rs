//! Iteration over values.
//!
//! Built-in iterables:
//! - Array: a snapshot of the elements
//! - String: one string per character
//! - Number `n`: `0, 1, ..., n - 1`, counted lazily by [`ValueIter::Range`]
//! - Object and host objects: their keys
//!
//! Objects that define `__iter__` or `__next__` are driven lazily by the
//! interpreter through [`ValueIter::Custom`].

use es_value::errors::{invalid_operation, invalid_operation_with};
use es_value::{format_number, EsError, Value};

use crate::config::MAX_SEQUENCE_LEN;

/// Items of a built-in iterable.
///
/// Numbers above [`MAX_SEQUENCE_LEN`] are rejected; iterate them with
/// [`ValueIter::for_value`] instead.
pub fn collect_items(value: &Value) -> Result<Vec<Value>, EsError> {
    match value {
        Value::Array(items) => Ok(items.borrow().clone()),
        Value::String(s) => Ok(s.chars().map(|c| Value::string(c.to_string())).collect()),
        Value::Number(n) => {
            let count = bounded_len(n.ceil(), "__iter__")?;
            Ok((0..count).map(|i| Value::Number(i as f64)).collect())
        }
        Value::Object(obj) => Ok(obj.keys().into_iter().map(Value::string).collect()),
        Value::Native(native) => Ok(native
            .object()
            .keys()
            .into_iter()
            .map(Value::string)
            .collect()),
        other => Err(invalid_operation("__iter__", &other.type_name())),
    }
}

/// Length of a sequence `op` builds from the count `n`.
///
/// Non-finite and non-positive counts are empty.
pub(crate) fn bounded_len(n: f64, op: &str) -> Result<usize, EsError> {
    if !n.is_finite() || n <= 0.0 {
        return Ok(0);
    }
    if n > MAX_SEQUENCE_LEN as f64 {
        return Err(too_long(op, "Num", n));
    }
    Ok(n as usize)
}

#[cold]
pub(crate) fn too_long(op: &str, type_name: &str, len: f64) -> EsError {
    invalid_operation_with(
        op,
        type_name,
        format!(
            "length {} exceeds the limit of {MAX_SEQUENCE_LEN}",
            format_number(len)
        ),
    )
}

/// An in-progress iteration.
pub enum ValueIter {
    Items(std::vec::IntoIter<Value>),
    /// `0, 1, ...` while below `end`.
    Range { next: f64, end: f64 },
    /// An object whose `__next__` yields items until it raises `EndIterator`.
    Custom(Value),
}

impl ValueIter {
    pub fn from_items(items: Vec<Value>) -> Self {
        ValueIter::Items(items.into_iter())
    }

    /// Iterate a built-in iterable. Numbers count without materialising.
    pub fn for_value(value: &Value) -> Result<Self, EsError> {
        match value {
            Value::Number(n) => Ok(ValueIter::Range {
                next: 0.0,
                end: if n.is_finite() { n.ceil() } else { 0.0 },
            }),
            other => collect_items(other).map(ValueIter::from_items),
        }
    }

    /// Next item of a built-in iteration; `None` for custom iterators,
    /// which the interpreter drives.
    pub(crate) fn next_builtin(&mut self) -> Option<Value> {
        match self {
            ValueIter::Items(items) => items.next(),
            ValueIter::Range { next, end } => {
                if *next >= *end {
                    return None;
                }
                let item = *next;
                *next += 1.0;
                Some(Value::Number(item))
            }
            ValueIter::Custom(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used, reason = "iteration over built-in iterables succeeds")]

    use super::*;
    use pretty_assertions::assert_eq;

    fn render(items: &[Value]) -> Vec<String> {
        items.iter().map(Value::repr).collect()
    }

    #[test]
    fn test_builtin_iterables() {
        let array = Value::array(vec![Value::Number(1.0), Value::string("a")]);
        assert_eq!(render(&collect_items(&array).unwrap()), ["1", "'a'"]);
        assert_eq!(render(&collect_items(&Value::string("hé")).unwrap()), ["'h'", "'é'"]);
        assert_eq!(render(&collect_items(&Value::Number(3.0)).unwrap()), ["0", "1", "2"]);
        assert!(collect_items(&Value::Number(-2.0)).unwrap().is_empty());
    }

    #[test]
    fn test_object_iterates_keys() {
        let obj = crate::operators::record([("x", Value::Number(1.0)), ("y", Value::Null)]);
        assert_eq!(render(&collect_items(&obj).unwrap()), ["'x'", "'y'"]);
    }

    #[test]
    fn test_number_ranges_count_lazily() {
        let mut iter = ValueIter::for_value(&Value::Number(1e18)).unwrap();
        assert_eq!(iter.next_builtin().and_then(|v| v.as_number()), Some(0.0));
        assert_eq!(iter.next_builtin().and_then(|v| v.as_number()), Some(1.0));

        let mut short = ValueIter::for_value(&Value::Number(1.5)).unwrap();
        assert_eq!(short.next_builtin().and_then(|v| v.as_number()), Some(0.0));
        assert_eq!(short.next_builtin().and_then(|v| v.as_number()), Some(1.0));
        assert!(short.next_builtin().is_none());

        let mut endless = ValueIter::for_value(&Value::Number(f64::INFINITY)).unwrap();
        assert!(endless.next_builtin().is_none());
    }

    #[test]
    fn test_collecting_huge_numbers_fails() {
        let err = collect_items(&Value::Number(1e18)).unwrap_err();
        assert_eq!(err.name(), "InvalidOperationError");
        assert_eq!(bounded_len(f64::NAN, "cast").unwrap(), 0);
        assert_eq!(bounded_len(3.0, "cast").unwrap(), 3);
    }

    #[test]
    fn test_scalars_are_not_iterable() {
        let err = collect_items(&Value::Bool(true)).unwrap_err();
        assert_eq!(err.name(), "InvalidOperationError");
        assert!(collect_items(&Value::Null).is_err());
    }
}
