//! The call protocol.
//!
//! [`Interpreter::call_at`] dispatches on the callee:
//! - `Function`: bind arguments in a fresh child of the closure (or the
//!   caller's context for `caller_context_as_closure` natives), run the
//!   body, then check the result against the declared return type
//! - `Type`: construct an instance (see `instantiate`)
//! - `Number`: multiply by every argument
//! - `Object` with an own `__call__` function: call that
//! - `Native`: forward to the host object
//!
//! Every function call pushes a `CallFrame`; the depth bound is enforced there.

use es_ir::Position;
use es_value::errors::{invalid_operation, invalid_syntax, type_error, type_mismatch, type_mismatch_at};
use es_value::{
    ContextId, EsError, EvalResult, FunctionBody, FunctionValue, Heap, NativeCall, NativeResult,
    OrderedMap, Param, ParamDefault, SetOptions, Unwind, Value,
};

use super::{own_override, CallOptions, Interpreter};
use crate::diagnostics::CallFrame;
use crate::typing::includes;

impl Interpreter {
    /// Call `callee` on behalf of code running in `caller`.
    ///
    /// `site` is the position of the call expression, when there is one.
    pub(crate) fn call_at(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        kwargs: OrderedMap<Value>,
        caller: ContextId,
        opts: CallOptions,
        site: Option<&Position>,
    ) -> NativeResult {
        match callee {
            Value::Function(function) => self.call_function(function, args, kwargs, caller, opts, site),
            Value::Type(ty) => self.construct(callee, ty, args, kwargs),
            Value::Number(n) => {
                let mut product = *n;
                for arg in &args {
                    match arg {
                        Value::Number(m) => product *= m,
                        other => return Err(type_mismatch("Num", &other.type_name())),
                    }
                }
                Ok(Value::Number(product))
            }
            Value::Object(_) => match own_override(callee, "__call__") {
                Some(f) => self.call_at(&f, args, kwargs, caller, opts, site),
                None => Err(invalid_operation("()", &callee.type_name())),
            },
            Value::Native(native) => native.object().call(self, args),
            other => Err(invalid_operation("()", &other.type_name())),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(function = %function.name()))]
    fn call_function(
        &mut self,
        function: &Heap<FunctionValue>,
        args: Vec<Value>,
        kwargs: OrderedMap<Value>,
        caller: ContextId,
        opts: CallOptions,
        site: Option<&Position>,
    ) -> NativeResult {
        self.call_stack.push(CallFrame {
            name: function.name(),
            call_pos: site.cloned(),
        })?;
        let result = self.run_function(function, args, kwargs, caller, opts);
        self.call_stack.pop();
        result
    }

    fn run_function(
        &mut self,
        function: &FunctionValue,
        args: Vec<Value>,
        kwargs: OrderedMap<Value>,
        caller: ContextId,
        opts: CallOptions,
    ) -> NativeResult {
        let parent = if function.caller_context_as_closure {
            caller
        } else {
            function.closure
        };
        if !self.contexts.is_alive(parent) {
            return Err(es_value::ContextError::Released.into());
        }
        let this = function
            .this
            .clone()
            .unwrap_or_else(|| Value::object(OrderedMap::new()));
        let type_check = !opts.dont_type_check;

        let result = match &function.body {
            FunctionBody::Native(native) => {
                let (args, kwargs) = self.native_args(function, args, kwargs, parent, type_check)?;
                native.as_ref()(
                    self,
                    NativeCall {
                        context: parent,
                        this,
                        args,
                        kwargs,
                        dont_type_check: opts.dont_type_check,
                    },
                )?
            }
            FunctionBody::Super { parent: parent_type } => {
                self.run_initialiser(parent_type, &this, args, kwargs)?;
                Value::Null
            }
            FunctionBody::Ast { arena, body } => self.with_child_scope(parent, |scoped| {
                let ctx = scoped.ctx();
                scoped.bind_params(function, args, kwargs, this, ctx, type_check)?;
                function_result(scoped.eval(arena, *body, ctx))
            })?,
        };

        if type_check && self.config.type_check_returns && !includes(&function.returns, &result) {
            return Err(type_mismatch_at(
                &function.returns.to_string(),
                &result.type_name(),
                &result.to_string(),
                "(from function return)",
            ));
        }
        Ok(result)
    }

    /// Bind parameters, `varargs`, `kwargs`, `args` and `this` in `ctx`.
    fn bind_params(
        &mut self,
        function: &FunctionValue,
        args: Vec<Value>,
        mut kwargs: OrderedMap<Value>,
        this: Value,
        ctx: ContextId,
        type_check: bool,
    ) -> Result<(), EsError> {
        let forced = SetOptions {
            force_through_const: true,
            ..SetOptions::default()
        };
        let mut supplied = args.iter();
        for param in &function.params {
            let given = if param.is_kwarg {
                kwargs.remove(&param.name)
            } else {
                supplied.next().cloned()
            };
            let value = match given {
                Some(value) => {
                    if type_check {
                        check_param(param, &value)?;
                    }
                    value
                }
                None => self.default_for(param, ctx)?,
            };
            self.contexts.set_own(ctx, &param.name, value, forced.clone())?;
        }

        let surplus: Vec<Value> = supplied.cloned().collect();
        if function.allow_args {
            self.contexts.set_own(ctx, "varargs", Value::array(surplus), forced.clone())?;
        } else if !surplus.is_empty() {
            let expected = function.params.iter().filter(|p| !p.is_kwarg).count();
            return Err(type_error(format!(
                "{}() takes {expected} positional argument(s) but {} were given",
                function.name(),
                args.len()
            )));
        }

        if function.allow_kwargs {
            self.contexts.set_own(ctx, "kwargs", Value::object(kwargs), forced.clone())?;
        } else if let Some(unknown) = kwargs.keys().next() {
            return Err(type_error(format!(
                "{}() got an unexpected keyword argument '{unknown}'",
                function.name()
            )));
        }

        self.contexts.set_own(ctx, "args", Value::array(args), forced.clone())?;
        self.contexts.set_own(ctx, "this", this, forced)?;
        Ok(())
    }

    /// Arguments for a native, type checked and padded with defaults.
    ///
    /// Natives have no scope of their own, so expression defaults evaluate
    /// in a throwaway child of `parent`.
    fn native_args(
        &mut self,
        function: &FunctionValue,
        mut args: Vec<Value>,
        mut kwargs: OrderedMap<Value>,
        parent: ContextId,
        type_check: bool,
    ) -> Result<(Vec<Value>, OrderedMap<Value>), EsError> {
        let mut positional = 0;
        for param in &function.params {
            let given = if param.is_kwarg {
                kwargs.get(&param.name)
            } else {
                positional += 1;
                args.get(positional - 1)
            };
            if let Some(value) = given {
                if type_check {
                    check_param(param, value)?;
                }
                continue;
            }
            let value = self.with_child_scope(parent, |scoped| {
                let ctx = scoped.ctx();
                scoped.default_for(param, ctx)
            })?;
            if param.is_kwarg {
                kwargs.insert(param.name.clone(), value);
            } else {
                args.push(value);
            }
        }
        if !function.allow_args && args.len() > positional {
            return Err(type_error(format!(
                "{}() takes {positional} positional argument(s) but {} were given",
                function.name(),
                args.len()
            )));
        }
        Ok((args, kwargs))
    }

    fn default_for(&mut self, param: &Param, ctx: ContextId) -> NativeResult {
        match &param.default {
            None => Ok(Value::Null),
            Some(ParamDefault::Value(value)) => Ok(value.clone()),
            Some(ParamDefault::Expr { arena, expr }) => function_result(self.eval(arena, *expr, ctx)),
        }
    }
}

/// Value a function body produced: its `return` value, or its last value.
pub(crate) fn function_result(result: EvalResult) -> NativeResult {
    match result {
        Ok(value) | Err(Unwind::Return(value)) => Ok(value),
        Err(Unwind::Error(err)) => Err(err),
        Err(unwind @ (Unwind::Break | Unwind::Continue)) => Err(invalid_syntax(format!(
            "'{}' outside of a loop",
            unwind.signal_name()
        ))),
    }
}

fn check_param(param: &Param, value: &Value) -> Result<(), EsError> {
    if includes(&param.ty, value) {
        return Ok(());
    }
    Err(type_mismatch_at(
        &param.ty.to_string(),
        &value.type_name(),
        &value.to_string(),
        &format!("for parameter '{}'", param.name),
    ))
}

#[cfg(test)]
mod tests;
