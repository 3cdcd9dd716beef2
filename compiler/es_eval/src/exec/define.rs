//! Function, class and namespace definitions.
//!
//! Functions and classes capture the context they are defined in, so that
//! context is pinned for the life of the session.

use es_ir::{ClassDef, ExprId, FunctionDef, Position, SharedArena};
use es_value::errors::{invalid_syntax, type_mismatch};
use es_value::{
    ContextId, EsError, EvalResult, FunctionBody, FunctionValue, OrderedMap, Param, ParamDefault,
    Primordial, SetOptions, TypeDescriptor, Unwind, UserType, Value, ValueInfo,
};

use crate::Interpreter;

impl Interpreter {
    pub(super) fn eval_function_def(
        &mut self,
        arena: &SharedArena,
        pos: &Position,
        def: &FunctionDef,
        ctx: ContextId,
    ) -> EvalResult {
        let mut params = Vec::with_capacity(def.params.len());
        for param in &def.params {
            let ty = self.eval_type(arena, param.ty, ctx)?;
            params.push(Param {
                name: param.name.clone(),
                ty,
                default: param.default.map(|expr| ParamDefault::Expr {
                    arena: arena.clone(),
                    expr,
                }),
                is_kwarg: param.is_kwarg,
            });
        }
        let returns = self.eval_type(arena, def.return_type, ctx)?;

        let info = ValueInfo {
            name: def.name.clone(),
            description: def.description.clone(),
            file: Some(pos.file.clone()),
            builtin: false,
        };
        let body = FunctionBody::Ast {
            arena: arena.clone(),
            body: def.body,
        };
        let mut function = FunctionValue::new(info, params, body, ctx, returns);
        function.allow_args = def.allow_args;
        function.allow_kwargs = def.allow_kwargs;
        self.contexts.pin(ctx);

        let value = Value::function(function);
        if def.is_declaration {
            if let Some(name) = &def.name {
                self.contexts.declare(ctx, name, value.clone(), SetOptions::constant())?;
            }
        }
        Ok(value)
    }

    pub(super) fn eval_class_def(
        &mut self,
        arena: &SharedArena,
        pos: &Position,
        def: &ClassDef,
        ctx: ContextId,
    ) -> EvalResult {
        let mut user = UserType::new(ctx);
        user.is_abstract = def.is_abstract;
        user.extends = Some(match def.extends {
            Some(parent) => match self.eval_type(arena, Some(parent), ctx)? {
                parent @ Value::Type(_) => parent,
                other => return Err(type_mismatch("Type", &other.type_name()).into()),
            },
            None => Value::primordial(Primordial::Obj),
        });
        for method in &def.methods {
            user.methods.push(self.eval_function(arena, *method, ctx)?);
        }
        let mut properties = OrderedMap::new();
        for (name, ty) in &def.properties {
            properties.insert(name.as_str(), self.eval_type(arena, Some(*ty), ctx)?);
        }
        user.properties = properties;
        if let Some(init) = def.init {
            let init = self.eval_function(arena, init, ctx)?;
            init.name_if_unnamed("init");
            user.init = Some(init);
        }

        let info = ValueInfo {
            name: def.name.clone(),
            file: Some(pos.file.clone()),
            ..ValueInfo::default()
        };
        self.contexts.pin(ctx);
        let value = Value::type_value(TypeDescriptor::user(info, user));
        tracing::debug!(class = def.name.as_deref().unwrap_or("(anonymous)"), "defined class");

        if def.is_declaration {
            if let Some(name) = &def.name {
                self.contexts.declare(ctx, name, value.clone(), SetOptions::constant())?;
            }
        }
        Ok(value)
    }

    /// `namespace name { ... }`: the body's own bindings become an object.
    pub(super) fn eval_namespace(
        &mut self,
        arena: &SharedArena,
        name: Option<&str>,
        body: ExprId,
        mutable: bool,
        is_declaration: bool,
        ctx: ContextId,
    ) -> EvalResult {
        let table = self.with_child_scope(ctx, |scoped| {
            let inner = scoped.ctx();
            scoped.eval(arena, body, inner)?;
            Ok::<_, Unwind>(scoped.contexts.symbol_table(inner)?)
        })?;
        let value = Value::object(table);
        if is_declaration {
            if let Some(name) = name {
                let opts = SetOptions {
                    constant: !mutable,
                    ..SetOptions::default()
                };
                self.contexts.declare(ctx, name, value.clone(), opts)?;
            }
        }
        Ok(value)
    }

    /// A type annotation, `Any` when absent. Non-type values act as singleton types.
    fn eval_type(&mut self, arena: &SharedArena, ty: Option<ExprId>, ctx: ContextId) -> Result<Value, EsError> {
        let Some(ty) = ty else {
            return Ok(Value::primordial(Primordial::Any));
        };
        self.eval(arena, ty, ctx).map_err(into_error)
    }

    fn eval_function(&mut self, arena: &SharedArena, expr: ExprId, ctx: ContextId) -> Result<Value, EsError> {
        match self.eval(arena, expr, ctx) {
            Ok(value @ Value::Function(_)) => Ok(value),
            Ok(other) => Err(type_mismatch("Func", &other.type_name())),
            Err(unwind) => Err(into_error(unwind)),
        }
    }
}

/// Control flow inside a type or method expression is a syntax error.
fn into_error(unwind: Unwind) -> EsError {
    match unwind {
        Unwind::Error(err) => err,
        signal => invalid_syntax(format!(
            "'{}' is not allowed in a definition",
            signal.signal_name()
        )),
    }
}
