//! Tree-walking interpreter for EntropyScript.
//!
//! # Architecture
//!
//! An `Interpreter` is one execution session: it owns the context arena, the
//! call stack, the print/input handlers and the module registry. All node
//! evaluation goes through [`Interpreter::eval`], which guards the native
//! stack, dispatches on the node kind (see `crate::exec`) and stamps the
//! node's position onto any error that has none yet.
//!
//! - `function_call` - the call protocol: callee dispatch, argument binding,
//!   return-type enforcement
//! - `instantiate` - type construction, `super` chaining, structural validation
//! - `property` - indexed get/set and built-in methods reachable through it
//! - `scope_guard` - child contexts released when their frame returns
//!
//! # Arena Threading Pattern
//!
//! Function values carry the `SharedArena` their body lives in. A call always
//! evaluates the body against the callee's arena, never the caller's, so a
//! closure created by one program can be called from another (modules,
//! host callbacks).

mod builder;
mod function_call;
mod instantiate;
mod property;
mod scope_guard;

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

use es_ir::{ExprId, SharedArena};
use es_value::errors::{already_initialised, import_error, invalid_syntax, uninitialised};
use es_value::{
    ContextArena, ContextId, EsError, EvalResult, NativeHost, NativeResult, OrderedMap,
    SetOptions, Unwind, Value,
};
use rustc_hash::FxHashMap;

use crate::diagnostics::CallStack;
use crate::operators::values_equal;
use crate::stack::ensure_sufficient_stack;
use crate::{builtins, typing, EvalConfig, SharedInputHandler, SharedPrintHandler};

/// A module `import` can load.
pub(crate) enum Module {
    /// Returned as is.
    Value(Value),
    /// Evaluated once in a child of the root; its bindings become an object.
    Source { arena: SharedArena, body: ExprId },
}

/// Outcome of evaluating a tree at the session boundary.
///
/// Exactly one of `error`, `func_return`, `should_break` and
/// `should_continue` is set when evaluation stopped early.
#[derive(Clone, Debug)]
pub struct Evaluation {
    pub value: Value,
    pub error: Option<EsError>,
    /// Value of a `return` that escaped the evaluated tree.
    pub func_return: Option<Value>,
    pub should_break: bool,
    pub should_continue: bool,
}

impl Evaluation {
    pub fn from_result(result: EvalResult) -> Self {
        let mut evaluation = Evaluation {
            value: Value::Null,
            error: None,
            func_return: None,
            should_break: false,
            should_continue: false,
        };
        match result {
            Ok(value) => evaluation.value = value,
            Err(Unwind::Error(err)) => evaluation.error = Some(err),
            Err(Unwind::Return(value)) => {
                evaluation.value = value.clone();
                evaluation.func_return = Some(value);
            }
            Err(Unwind::Break) => evaluation.should_break = true,
            Err(Unwind::Continue) => evaluation.should_continue = true,
        }
        evaluation
    }

    /// The value, or the error. Escaping control flow counts as a value.
    pub fn into_result(self) -> Result<Value, EsError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Per-call switches.
#[derive(Copy, Clone, Debug, Default)]
pub struct CallOptions {
    /// Skip parameter and return type checks.
    pub dont_type_check: bool,
}

/// One execution session.
pub struct Interpreter {
    pub(crate) contexts: ContextArena,
    pub(crate) call_stack: CallStack,
    pub(crate) config: EvalConfig,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) input_handler: SharedInputHandler,
    pub(crate) modules: FxHashMap<String, Module>,
    pub(crate) module_cache: FxHashMap<String, Value>,
    pub(crate) initialised: bool,
}

impl Interpreter {
    /// A session writing to stdout and reading stdin.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    #[inline]
    pub fn root(&self) -> ContextId {
        self.contexts.root()
    }

    pub fn context_arena(&self) -> &ContextArena {
        &self.contexts
    }

    pub fn context_arena_mut(&mut self) -> &mut ContextArena {
        &mut self.contexts
    }

    pub fn call_stack(&self) -> &CallStack {
        &self.call_stack
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    /// Seed the root context with the built-in constants, types and functions.
    ///
    /// Must run exactly once before anything is evaluated.
    pub fn initialise(&mut self) -> Result<(), EsError> {
        if self.initialised {
            return Err(already_initialised());
        }
        builtins::register(self)?;
        self.initialised = true;
        tracing::debug!(
            symbols = self.contexts.keys(self.root()).map_or(0, |k| k.len()),
            "runtime initialised"
        );
        Ok(())
    }

    /// Bind a host value at the root as a constant global.
    pub fn define(&mut self, name: &str, value: Value) -> Result<(), EsError> {
        value.name_if_unnamed(name);
        let opts = SetOptions {
            constant: true,
            global: true,
            ..SetOptions::default()
        };
        let root = self.root();
        self.contexts.set_own(root, name, value, opts)?;
        Ok(())
    }

    /// Evaluate `expr` from `arena` in the context `ctx`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn evaluate(&mut self, arena: &SharedArena, expr: ExprId, ctx: ContextId) -> Evaluation {
        if !self.initialised {
            return Evaluation::from_result(Err(uninitialised().into()));
        }
        if !self.contexts.is_alive(ctx) {
            return Evaluation::from_result(Err(es_value::ContextError::Released.into()));
        }
        Evaluation::from_result(self.eval(arena, expr, ctx))
    }

    /// Evaluate a program in the root context.
    pub fn run(&mut self, arena: &SharedArena, expr: ExprId) -> Evaluation {
        let root = self.root();
        self.evaluate(arena, expr, root)
    }

    /// Evaluate one node.
    pub(crate) fn eval(&mut self, arena: &SharedArena, id: ExprId, ctx: ContextId) -> EvalResult {
        ensure_sufficient_stack(|| {
            let Some(expr) = arena.try_get(id) else {
                return Err(invalid_syntax(format!("no expression {id:?} in arena")).into());
            };
            tracing::trace!(node = expr.kind.name(), "eval");
            self.eval_expr(arena, expr, ctx).map_err(|unwind| match unwind {
                Unwind::Error(err) => Unwind::Error(err.at(&expr.pos)),
                other => other,
            })
        })
    }

    /// Call any callable value from `caller` with the full protocol.
    pub fn call_value(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        kwargs: OrderedMap<Value>,
        caller: ContextId,
    ) -> NativeResult {
        self.call_at(callee, args, kwargs, caller, CallOptions::default(), None)
    }

    /// Truthiness, honouring an own `__bool__` function.
    pub(crate) fn truthy(&mut self, value: &Value, ctx: ContextId) -> Result<bool, EsError> {
        match own_override(value, "__bool__") {
            Some(f) => Ok(self
                .call_at(&f, Vec::new(), OrderedMap::new(), ctx, CallOptions::default(), None)?
                .is_truthy()),
            None => Ok(value.is_truthy()),
        }
    }

    /// Equality, honouring an own `__eq__` function on the left operand.
    pub(crate) fn values_eq(&mut self, a: &Value, b: &Value, ctx: ContextId) -> Result<bool, EsError> {
        match own_override(a, "__eq__") {
            Some(f) => Ok(self
                .call_at(&f, vec![b.clone()], OrderedMap::new(), ctx, CallOptions::default(), None)?
                .is_truthy()),
            None => Ok(values_equal(a, b)),
        }
    }

    /// Load a module registered on the builder. Source modules run once.
    pub(crate) fn import_module(&mut self, name: &str) -> NativeResult {
        if let Some(cached) = self.module_cache.get(name) {
            return Ok(cached.clone());
        }
        let (arena, body) = match self.modules.get(name) {
            None => {
                tracing::warn!(module = name, "import of unregistered module");
                return Err(import_error(name, "no such module is registered"));
            }
            Some(Module::Value(value)) => {
                let value = value.clone();
                value.name_if_unnamed(name);
                self.module_cache.insert(name.to_owned(), value.clone());
                return Ok(value);
            }
            Some(Module::Source { arena, body }) => (arena.clone(), *body),
        };
        tracing::debug!(module = name, "evaluating module");
        // Cached before evaluation so a cyclic import sees the same object.
        let exports = Value::object(OrderedMap::new());
        self.module_cache.insert(name.to_owned(), exports.clone());
        let root = self.root();
        let result = self.with_child_scope(root, |scoped| {
            let ctx = scoped.ctx();
            scoped.contexts.set_own(ctx, "__main__", Value::Bool(false), SetOptions::constant())?;
            match scoped.eval(&arena, body, ctx) {
                Ok(_) | Err(Unwind::Return(_)) => {}
                Err(Unwind::Error(err)) => return Err(err),
                Err(Unwind::Break | Unwind::Continue) => {
                    return Err(invalid_syntax("'break' or 'continue' outside of a loop"));
                }
            }
            Ok(scoped.contexts.symbol_table(ctx)?)
        });
        match result {
            Ok(table) => {
                if let Value::Object(obj) = &exports {
                    for (key, value) in table {
                        if key != "__main__" {
                            obj.set(key, value);
                        }
                    }
                }
                Ok(exports)
            }
            Err(err) => {
                self.module_cache.remove(name);
                Err(err)
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// The function an object holds under `capability`, bound to that object.
pub(crate) fn own_override(value: &Value, capability: &str) -> Option<Value> {
    let Value::Object(obj) = value else {
        return None;
    };
    match obj.get(capability)? {
        Value::Function(f) if f.this.is_none() => Some(Value::function(f.bind(value.clone()))),
        found @ Value::Function(_) => Some(found),
        _ => None,
    }
}

/// Natives reach the session through this.
impl NativeHost for Interpreter {
    fn call(&mut self, callee: &Value, args: Vec<Value>, kwargs: OrderedMap<Value>) -> NativeResult {
        let root = self.root();
        self.call_value(callee, args, kwargs, root)
    }

    fn contexts(&mut self) -> &mut ContextArena {
        &mut self.contexts
    }

    fn includes(&mut self, ty: &Value, value: &Value) -> Result<bool, EsError> {
        Ok(typing::includes(ty, value))
    }

    fn equals(&mut self, a: &Value, b: &Value) -> Result<bool, EsError> {
        let root = self.root();
        self.values_eq(a, b, root)
    }

    fn import(&mut self, name: &str) -> NativeResult {
        self.import_module(name)
    }
}
