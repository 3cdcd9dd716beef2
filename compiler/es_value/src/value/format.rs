//! String forms of values.
//!
//! `Display` renders a value the way `print` shows it (strings unquoted);
//! `repr` quotes strings and is used inside collections and messages.

use std::fmt::Write;

use super::Value;

/// Nesting depth after which collections render as `...`.
const MAX_DEPTH: usize = 16;

/// Render a number: integral values without a fraction, non-finite values by name.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        (if n > 0.0 { "Infinity" } else { "-Infinity" }).to_owned()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl Value {
    /// Quoted, nested-safe rendering.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        write_repr(&mut out, self, 0);
        out
    }
}

fn write_repr(out: &mut String, value: &Value, depth: usize) {
    if depth > MAX_DEPTH {
        out.push_str("...");
        return;
    }
    // Writing into a String cannot fail.
    let _ = match value {
        Value::Number(n) => write!(out, "{}", format_number(*n)),
        Value::String(s) => write!(out, "'{}'", s.as_str()),
        Value::Bool(b) => write!(out, "{b}"),
        Value::Null => write!(out, "nil"),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(out, item, depth + 1);
            }
            out.push(']');
            Ok(())
        }
        Value::Object(obj) => {
            out.push('{');
            for (i, (key, item)) in obj.entries().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(key);
                out.push_str(": ");
                write_repr(out, item, depth + 1);
            }
            out.push('}');
            Ok(())
        }
        Value::Function(f) => write!(out, "<Func: {}>", f.name()),
        Value::Type(t) => write!(out, "{t}"),
        Value::Error(e) => write!(out, "{}: {}", e.name(), e.details()),
        Value::Native(n) => write!(out, "<Native: {}>", n.object().type_name()),
    };
}
