//! Call expressions.

use es_ir::{CallArg, ExprId, Position, SharedArena};
use es_value::errors::{invalid_operation, type_mismatch};
use es_value::{ContextId, EsErrorKind, EvalResult, OrderedMap, Value};

use crate::interpreter::CallOptions;
use crate::Interpreter;

impl Interpreter {
    /// `callee(args)`, `callee?.(args)` or `Type<|args|>`.
    ///
    /// Errors crossing the call gain a traceback frame describing the call site.
    #[allow(clippy::too_many_arguments, reason = "mirrors the fields of the call node")]
    pub(super) fn eval_call(
        &mut self,
        arena: &SharedArena,
        pos: &Position,
        callee: ExprId,
        args: &[CallArg],
        generic: bool,
        optional: bool,
        ctx: ContextId,
    ) -> EvalResult {
        let callee_value = self.eval(arena, callee, ctx)?;
        if optional && callee_value.is_null() {
            return Ok(Value::Null);
        }

        let mut positional = Vec::with_capacity(args.len());
        let mut named = OrderedMap::new();
        for arg in args {
            match arg {
                CallArg::Positional(expr) => positional.push(self.eval(arena, *expr, ctx)?),
                CallArg::Named(name, expr) => {
                    let value = self.eval(arena, *expr, ctx)?;
                    named.insert(name.as_str(), value);
                }
                CallArg::Spread(expr) => match self.eval(arena, *expr, ctx)? {
                    Value::Array(items) => positional.extend(items.borrow().iter().cloned()),
                    Value::Object(obj) => {
                        for (key, value) in obj.entries().iter() {
                            named.insert(key, value.clone());
                        }
                    }
                    Value::Native(native) => {
                        let object = native.object();
                        for key in object.keys() {
                            if let Some(value) = object.get(&key) {
                                named.insert(key, value);
                            }
                        }
                    }
                    other => return Err(type_mismatch("Arr | Obj", &other.type_name()).into()),
                },
            }
        }

        if generic {
            return match &callee_value {
                Value::Type(ty) if !ty.is_combinator() => {
                    Ok(Value::type_value(ty.specialise(positional)))
                }
                other => Err(invalid_operation("<||>", &other.type_name()).into()),
            };
        }

        let result = self.call_at(
            &callee_value,
            positional.clone(),
            named,
            ctx,
            CallOptions::default(),
            Some(pos),
        );
        match result {
            Ok(value) => Ok(value),
            Err(err) if optional && matches!(err.kind, EsErrorKind::InvalidOperation { .. }) => {
                Ok(Value::Null)
            }
            Err(mut err) => {
                let name = callee_value
                    .info()
                    .name
                    .unwrap_or_else(|| "(anonymous)".to_owned());
                let rendered: Vec<String> = positional.iter().map(Value::repr).collect();
                err.push_frame(pos.clone(), format!("{name}({})", rendered.join(", ")));
                Err(err.into())
            }
        }
    }
}
