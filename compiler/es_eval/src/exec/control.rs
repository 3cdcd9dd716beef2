//! Branches, loops, try/catch and `yield`.
//!
//! Every branch, loop iteration and catch block runs in its own child
//! context. Loops absorb `break` and `continue`; `return` passes through to
//! the enclosing call.

use es_ir::{Declaration, ExprId, SharedArena};
use es_value::errors::invalid_syntax;
use es_value::{ContextId, EsError, EvalResult, OrderedMap, SetOptions, Unwind, Value};

use crate::interpreter::{own_override, CallOptions};
use crate::iterate::ValueIter;
use crate::Interpreter;

/// Name the caught error is bound to inside a catch block.
const CATCH_BINDING: &str = "err";

/// What a loop does after one pass over its body.
enum Step {
    Next,
    Stop,
}

fn loop_step(result: EvalResult) -> Result<Step, Unwind> {
    match result {
        Ok(_) | Err(Unwind::Continue) => Ok(Step::Next),
        Err(Unwind::Break) => Ok(Step::Stop),
        Err(other) => Err(other),
    }
}

impl Interpreter {
    pub(super) fn eval_if(
        &mut self,
        arena: &SharedArena,
        condition: ExprId,
        then_branch: ExprId,
        else_branch: Option<ExprId>,
        ctx: ContextId,
    ) -> EvalResult {
        let condition = self.eval(arena, condition, ctx)?;
        let branch = if self.truthy(&condition, ctx)? {
            then_branch
        } else {
            match else_branch {
                Some(branch) => branch,
                None => return Ok(Value::Null),
            }
        };
        self.with_child_scope(ctx, |scoped| {
            let inner = scoped.ctx();
            scoped.eval(arena, branch, inner)
        })
    }

    pub(super) fn eval_while(
        &mut self,
        arena: &SharedArena,
        condition: ExprId,
        body: ExprId,
        ctx: ContextId,
    ) -> EvalResult {
        loop {
            let keep_going = self.eval(arena, condition, ctx)?;
            if !self.truthy(&keep_going, ctx)? {
                break;
            }
            let result = self.with_child_scope(ctx, |scoped| {
                let inner = scoped.ctx();
                scoped.eval(arena, body, inner)
            });
            if let Step::Stop = loop_step(result)? {
                break;
            }
        }
        Ok(Value::Null)
    }

    pub(super) fn eval_for(
        &mut self,
        arena: &SharedArena,
        binding: &str,
        iterable: ExprId,
        body: ExprId,
        declaration: Declaration,
        ctx: ContextId,
    ) -> EvalResult {
        let source = self.eval(arena, iterable, ctx)?;
        if declaration.global && self.contexts.has_own(ctx, binding) {
            return Err(invalid_syntax(format!(
                "cannot declare global '{binding}' which exists in the current scope"
            ))
            .into());
        }
        let mut items = self.iterate(&source, ctx)?;
        while let Some(item) = self.next_item(&mut items, ctx)? {
            let result = self.with_child_scope(ctx, |scoped| {
                let inner = scoped.ctx();
                item.name_if_unnamed(binding);
                let target = if declaration.global {
                    scoped.contexts.root_of(inner)
                } else {
                    inner
                };
                let opts = SetOptions {
                    constant: declaration.constant,
                    global: declaration.global,
                    force_through_const: true,
                    ..SetOptions::default()
                };
                scoped.contexts.set_own(target, binding, item, opts)?;
                scoped.eval(arena, body, inner)
            });
            if let Step::Stop = loop_step(result)? {
                break;
            }
        }
        Ok(Value::Null)
    }

    /// Start iterating `value`.
    ///
    /// An object with its own `__iter__` is asked for an iterator; one with
    /// `__next__` is its own iterator.
    fn iterate(&mut self, value: &Value, ctx: ContextId) -> Result<ValueIter, EsError> {
        if let Some(iter) = own_override(value, "__iter__") {
            let iterator =
                self.call_at(&iter, Vec::new(), OrderedMap::new(), ctx, CallOptions::default(), None)?;
            if own_override(&iterator, "__next__").is_some() {
                return Ok(ValueIter::Custom(iterator));
            }
            return ValueIter::for_value(&iterator);
        }
        if own_override(value, "__next__").is_some() {
            return Ok(ValueIter::Custom(value.clone()));
        }
        ValueIter::for_value(value)
    }

    /// The next item, or `None` once a custom iterator raises `EndIterator`.
    fn next_item(&mut self, items: &mut ValueIter, ctx: ContextId) -> Result<Option<Value>, EsError> {
        match items {
            ValueIter::Custom(iterator) => {
                let Some(next) = own_override(iterator, "__next__") else {
                    return Ok(None);
                };
                match self.call_at(&next, Vec::new(), OrderedMap::new(), ctx, CallOptions::default(), None) {
                    Ok(Value::Error(err)) if err.is_end_iterator() => Ok(None),
                    Ok(item) => Ok(Some(item)),
                    Err(err) if err.is_end_iterator() => Ok(None),
                    Err(err) => Err(err),
                }
            }
            builtin => Ok(builtin.next_builtin()),
        }
    }

    /// `try {} catch {}`: evaluates to nil either way.
    pub(super) fn eval_try(
        &mut self,
        arena: &SharedArena,
        body: ExprId,
        catch: ExprId,
        ctx: ContextId,
    ) -> EvalResult {
        let err = match self.eval(arena, body, ctx) {
            Ok(_) => return Ok(Value::Null),
            Err(Unwind::Error(err)) => err,
            Err(signal) => return Err(signal),
        };
        tracing::debug!(error = %err.name(), "caught");
        self.with_child_scope(ctx, |scoped| {
            let inner = scoped.ctx();
            scoped
                .contexts
                .set_own(inner, CATCH_BINDING, Value::error(err), SetOptions::constant())?;
            scoped.eval(arena, catch, inner)
        })?;
        Ok(Value::Null)
    }

    /// `yield value` returns from the enclosing function only when `value`
    /// is truthy; a bare `yield` always returns nil.
    pub(super) fn eval_yield(&mut self, arena: &SharedArena, value: Option<ExprId>, ctx: ContextId) -> EvalResult {
        let Some(value) = value else {
            return Err(Unwind::Return(Value::Null));
        };
        let value = self.eval(arena, value, ctx)?;
        if self.truthy(&value, ctx)? {
            return Err(Unwind::Return(value));
        }
        Ok(Value::Null)
    }
}
