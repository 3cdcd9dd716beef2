//! Bootstrap bindings of the root context.
//!
//! Everything here is bound constant and global. Functions that act on the
//! scope they are called from (`typeof`, `delete`, `using`, `__symbols__`)
//! run in the caller's context instead of their closure.

use es_value::errors::{type_mismatch, undefined_reference, user_error};
use es_value::{
    ContextId, EsError, FunctionValue, NativeCall, NativeHost, NativeResult, OrderedMap, Param,
    Primordial, SetOptions, Value,
};

use crate::cast::parse_number;
use crate::config::MAX_SEQUENCE_LEN;
use crate::{Interpreter, SharedInputHandler, SharedPrintHandler};

const HELP_TEXT: &str = "Try 'help(<anything>)' for help about a particular value.";

/// Seed the root context of `interpreter`.
pub(crate) fn register(interpreter: &mut Interpreter) -> Result<(), EsError> {
    let root = interpreter.root();
    let mut bindings: Vec<(String, Value)> = [
        ("true", Value::Bool(true)),
        ("false", Value::Bool(false)),
        ("nil", Value::Null),
        ("inf", Value::Number(f64::INFINITY)),
        ("__main__", Value::Bool(true)),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_owned(), value))
    .collect();
    for kind in Primordial::ALL {
        bindings.push((kind.name().to_owned(), Value::primordial(kind)));
    }

    let print = interpreter.print_handler.clone();
    let log = interpreter.print_handler.clone();
    let help_out = interpreter.print_handler.clone();
    let input = interpreter.input_handler.clone();
    let functions = [
        native(root, "range", range_params(), range)
            .described("Numbers from 0 to n - 1, or from min while below max by step."),
        native(root, "print", Vec::new(), move |_, call| print_values(&print, &call))
            .described("Writes its arguments, concatenated, as one line."),
        native(root, "log", Vec::new(), move |_, call| log_values(&log, &call))
            .described("Writes its arguments separated by spaces."),
        native(
            root,
            "input",
            vec![str_param("prompt").with_default(Value::string("")), any_param("callback")],
            move |host, call| read_input(&input, host, call),
        )
        .described("Reads a line; passes it to the callback when one is given."),
        native(root, "import", vec![str_param("name")], import)
            .described("Loads a module registered with the interpreter."),
        native(root, "parse_num", vec![any_param("value")], parse_num)
            .described("Parses the string form of a value as a number."),
        native(root, "throw", vec![str_param("name"), any_param("details")], throw)
            .described("Raises an error with the given name and details."),
        native(root, "help", Vec::new(), move |_, call| help(&help_out, &call))
            .described("Describes a value."),
        native(root, "typeof", vec![str_param("identifier")], type_of)
            .described("Declared type of a binding visible from the caller.")
            .in_caller_context(),
        native(root, "delete", vec![str_param("identifier")], delete)
            .described("Removes the nearest binding of a name.")
            .in_caller_context(),
        native(
            root,
            "using",
            vec![any_param("namespace"), bool_param("global").with_default(Value::Bool(true))],
            using,
        )
        .described("Copies the members of a namespace into the global or calling scope.")
        .in_caller_context(),
        native(
            root,
            "__symbols__",
            vec![bool_param("recursive").with_default(Value::Bool(false))],
            symbols,
        )
        .described("Names bound in the calling scope, or visible from it.")
        .in_caller_context(),
    ];
    for Builtin(function) in functions {
        bindings.push((function.name(), Value::function(function)));
    }

    let opts = SetOptions {
        constant: true,
        global: true,
        ..SetOptions::default()
    };
    interpreter.contexts.mark_global(root)?;
    for (name, value) in bindings {
        interpreter.contexts.set_own(root, &name, value, opts.clone())?;
    }
    Ok(())
}

/// A built-in function under construction.
struct Builtin(FunctionValue);

impl Builtin {
    fn described(self, text: &str) -> Self {
        self.0.describe(text);
        self
    }

    fn in_caller_context(mut self) -> Self {
        self.0.caller_context_as_closure = true;
        self
    }
}

fn native(
    root: ContextId,
    name: &str,
    params: Vec<Param>,
    f: impl Fn(&mut dyn NativeHost, NativeCall) -> NativeResult + 'static,
) -> Builtin {
    Builtin(FunctionValue::native(name, root, params, f))
}

fn str_param(name: &str) -> Param {
    Param::new(name, Value::primordial(Primordial::Str))
}

fn bool_param(name: &str) -> Param {
    Param::new(name, Value::primordial(Primordial::Bool))
}

fn any_param(name: &str) -> Param {
    Param::new(name, Value::primordial(Primordial::Any))
}

fn range_params() -> Vec<Param> {
    vec![
        Param::new("min", Value::primordial(Primordial::Any)),
        Param::new("max", Value::primordial(Primordial::Any)),
        Param::new("step", Value::primordial(Primordial::Num)).with_default(Value::Number(1.0)),
    ]
}

fn range(_: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    let Some(first) = call.arg(0).as_number() else {
        return Ok(Value::array(Vec::new()));
    };
    let (min, max) = match call.arg(1) {
        Value::Null => (0.0, first),
        Value::Number(max) => (first, max),
        other => return Err(type_mismatch("Num", &other.type_name())),
    };
    let step = call.arg(2).as_number().unwrap_or(1.0);
    if !step.is_finite() || step <= 0.0 || !min.is_finite() || !max.is_finite() {
        return Err(user_error(
            "RangeError",
            format!("Cannot make range from {min} to {max} by {step}"),
        ));
    }
    let count = ((max - min) / step).ceil().max(0.0);
    if count > MAX_SEQUENCE_LEN as f64 {
        return Err(user_error(
            "RangeError",
            format!("Range from {min} to {max} by {step} exceeds {MAX_SEQUENCE_LEN} items"),
        ));
    }
    let items = (0..count as usize)
        .map(|k| Value::Number(min + k as f64 * step))
        .collect();
    Ok(Value::array(items))
}

fn print_values(out: &SharedPrintHandler, call: &NativeCall) -> NativeResult {
    let line: String = call.args.iter().map(ToString::to_string).collect();
    out.println(&line);
    Ok(Value::Null)
}

fn log_values(out: &SharedPrintHandler, call: &NativeCall) -> NativeResult {
    let parts: Vec<String> = call.args.iter().map(ToString::to_string).collect();
    out.println(&parts.join(" "));
    Ok(Value::Null)
}

fn read_input(input: &SharedInputHandler, host: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    let prompt = call.arg(0).to_string();
    let Some(line) = input.read_line(&prompt) else {
        tracing::debug!("input exhausted");
        return Ok(Value::Null);
    };
    match call.arg(1) {
        callback @ Value::Function(_) => {
            host.call(&callback, vec![Value::string(line)], OrderedMap::new())?;
            Ok(Value::Null)
        }
        _ => Ok(Value::string(line)),
    }
}

fn import(host: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    let name = call.arg(0).to_string();
    tracing::debug!(module = %name, "import");
    host.import(&name)
}

fn parse_num(_: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    Ok(Value::Number(parse_number(&call.arg(0).to_string())?))
}

fn throw(_: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    Err(user_error(call.arg(0).to_string(), call.arg(1).to_string()))
}

fn help(out: &SharedPrintHandler, call: &NativeCall) -> NativeResult {
    let Some(value) = call.args.first() else {
        out.println(HELP_TEXT);
        return Ok(Value::string(HELP_TEXT));
    };
    let text = describe_value(value);
    out.println(&text);
    Ok(Value::string(text))
}

fn describe_value(value: &Value) -> String {
    let info = value.info();
    format!(
        "Help on '{}':\n  Value: {}\n  Type: {}\n  Location: {}\n  {}",
        info.name.as_deref().unwrap_or("(anonymous)"),
        value.repr(),
        value.type_name(),
        info.file.as_deref().unwrap_or("(unknown)"),
        info.description.as_deref().unwrap_or("No description."),
    )
}

fn type_of(host: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    let name = call.arg(0).to_string();
    let symbol = host
        .contexts()
        .get_symbol(call.context, &name)?
        .ok_or_else(|| undefined_reference(&name))?;
    Ok(match &symbol.ty {
        Some(ty) => ty.clone(),
        None => symbol.value.type_of(),
    })
}

fn delete(host: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    let name = call.arg(0).to_string();
    host.contexts().remove(call.context, &name)?;
    Ok(Value::Null)
}

fn using(host: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    let members: Vec<(String, Value)> = match call.arg(0) {
        Value::Object(obj) => obj.entries().iter().map(|(k, v)| (k.to_owned(), v.clone())).collect(),
        Value::Native(native) => {
            let object = native.object();
            object
                .keys()
                .into_iter()
                .filter_map(|key| object.get(&key).map(|value| (key, value)))
                .collect()
        }
        other => return Err(type_mismatch("Obj", &other.type_name())),
    };
    let contexts = host.contexts();
    let target = if call.arg(1).is_truthy() {
        contexts.root_of(call.context)
    } else {
        call.context
    };
    for (key, value) in members {
        contexts.set_own(target, &key, value, SetOptions::default())?;
    }
    Ok(Value::Null)
}

fn symbols(host: &mut dyn NativeHost, call: NativeCall) -> NativeResult {
    let contexts = host.contexts();
    let mut names: Vec<String> = Vec::new();
    let mut current = Some(call.context);
    while let Some(ctx) = current {
        for key in contexts.keys(ctx)? {
            if !names.contains(&key) {
                names.push(key);
            }
        }
        current = if call.arg(0).is_truthy() {
            contexts.parent(ctx)
        } else {
            None
        };
    }
    Ok(Value::array(names.into_iter().map(Value::string).collect()))
}
