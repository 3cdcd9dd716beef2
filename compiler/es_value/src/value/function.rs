//! Function values and the native-call interface.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use es_ir::{ExprId, SharedArena};

use super::{Value, ValueInfo};
use crate::{ContextArena, ContextId, EsError, NativeResult, OrderedMap};

/// Runtime services a native function may call back into.
///
/// Implemented by the interpreter; natives never see it concretely.
pub trait NativeHost {
    /// Call any callable value with the full call protocol.
    fn call(&mut self, callee: &Value, args: Vec<Value>, kwargs: OrderedMap<Value>) -> NativeResult;

    fn contexts(&mut self) -> &mut ContextArena;

    /// Whether `value` is an instance of the type (or singleton) `ty`.
    fn includes(&mut self, ty: &Value, value: &Value) -> Result<bool, EsError>;

    /// Equality as seen by scripts, honouring `__eq__` overrides.
    fn equals(&mut self, a: &Value, b: &Value) -> Result<bool, EsError>;

    /// Load a registered module by name.
    fn import(&mut self, name: &str) -> NativeResult;
}

/// Arguments handed to a native function.
pub struct NativeCall {
    /// Context of the caller.
    pub context: ContextId,
    pub this: Value,
    pub args: Vec<Value>,
    pub kwargs: OrderedMap<Value>,
    /// Set when the caller asked to skip type checks.
    pub dont_type_check: bool,
}

impl NativeCall {
    /// Positional argument `index`, or nil when absent.
    pub fn arg(&self, index: usize) -> Value {
        self.args.get(index).cloned().unwrap_or(Value::Null)
    }

    pub fn kwarg(&self, name: &str) -> Option<Value> {
        self.kwargs.get(name).cloned()
    }
}

pub type NativeFn = Rc<dyn Fn(&mut dyn NativeHost, NativeCall) -> NativeResult>;

/// How a missing argument is filled in.
#[derive(Clone)]
pub enum ParamDefault {
    Value(Value),
    /// Evaluated in the new call context each time it is needed.
    Expr { arena: SharedArena, expr: ExprId },
}

/// A declared parameter.
#[derive(Clone)]
pub struct Param {
    pub name: String,
    /// Type value the argument must be included in.
    pub ty: Value,
    pub default: Option<ParamDefault>,
    pub is_kwarg: bool,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Value) -> Self {
        Param {
            name: name.into(),
            ty,
            default: None,
            is_kwarg: false,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(ParamDefault::Value(default));
        self
    }

    #[must_use]
    pub fn kwarg(mut self) -> Self {
        self.is_kwarg = true;
        self
    }
}

/// What running a function does.
#[derive(Clone)]
pub enum FunctionBody {
    /// Interpreted body.
    Ast { arena: SharedArena, body: ExprId },
    Native(NativeFn),
    /// `super` inside an initializer: runs the parent type's construction on `this`.
    Super { parent: Value },
}

/// Payload of a `Function` value.
///
/// Immutable after creation apart from its metadata; binding `this` makes a copy.
#[derive(Clone)]
pub struct FunctionValue {
    info: RefCell<ValueInfo>,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    /// Context the function was defined in.
    pub closure: ContextId,
    /// Bound receiver. Methods copied onto an instance hold it strongly,
    /// so an instance and its methods form a cycle that is never freed.
    pub this: Option<Value>,
    pub returns: Value,
    pub allow_args: bool,
    pub allow_kwargs: bool,
    /// Run in the caller's context instead of `closure`.
    pub caller_context_as_closure: bool,
}

impl FunctionValue {
    pub fn new(
        info: ValueInfo,
        params: Vec<Param>,
        body: FunctionBody,
        closure: ContextId,
        returns: Value,
    ) -> Self {
        FunctionValue {
            info: RefCell::new(info),
            params,
            body,
            closure,
            this: None,
            returns,
            allow_args: false,
            allow_kwargs: false,
            caller_context_as_closure: false,
        }
    }

    /// A native function returning `Any` that takes any arguments.
    pub fn native(
        name: &str,
        closure: ContextId,
        params: Vec<Param>,
        f: impl Fn(&mut dyn NativeHost, NativeCall) -> NativeResult + 'static,
    ) -> Self {
        let mut function = FunctionValue::new(
            ValueInfo::builtin(name),
            params,
            FunctionBody::Native(Rc::new(f)),
            closure,
            Value::primordial(super::Primordial::Any),
        );
        function.allow_args = true;
        function.allow_kwargs = true;
        function
    }

    /// Copy bound to a receiver.
    #[must_use]
    pub fn bind(&self, this: Value) -> Self {
        let mut copy = self.clone();
        copy.this = Some(this);
        copy
    }

    pub fn info(&self) -> Ref<'_, ValueInfo> {
        self.info.borrow()
    }

    pub fn name(&self) -> String {
        self.info
            .borrow()
            .name
            .clone()
            .unwrap_or_else(|| "(anonymous)".to_owned())
    }

    pub fn name_if_unnamed(&self, name: &str) {
        let mut info = self.info.borrow_mut();
        if info.name.is_none() {
            info.name = Some(name.to_owned());
        }
    }

    pub fn describe(&self, description: impl Into<String>) {
        self.info.borrow_mut().description = Some(description.into());
    }

    /// Two functions are equal when they run the same code.
    pub fn same_body(&self, other: &FunctionValue) -> bool {
        match (&self.body, &other.body) {
            (
                FunctionBody::Ast { arena, body },
                FunctionBody::Ast {
                    arena: other_arena,
                    body: other_body,
                },
            ) => arena.ptr_eq(other_arena) && body == other_body,
            (FunctionBody::Native(a), FunctionBody::Native(b)) => Rc::ptr_eq(a, b),
            (FunctionBody::Super { parent }, FunctionBody::Super { parent: other }) => {
                parent.identical(other)
            }
            _ => false,
        }
    }
}
