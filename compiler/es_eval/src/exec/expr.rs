//! Expressions: variables, operators, collection literals, statement lists
//! and indexed access.

use es_ir::{AssignOp, BinaryOp, ExprId, ExprKind, SharedArena, UnaryOp};
use es_value::errors::{invalid_operation, type_mismatch, undefined_reference};
use es_value::{
    ContextId, EsError, EsErrorKind, EvalResult, NativeResult, OrderedMap, SetOptions, Value,
};

use crate::interpreter::{own_override, CallOptions};
use crate::methods::shallow_clone;
use crate::operators::evaluate_binary;
use crate::unary_operators::evaluate_unary;
use crate::Interpreter;

impl Interpreter {
    pub(super) fn eval_variable(&mut self, name: &str, ctx: ContextId) -> EvalResult {
        match self.contexts.get(ctx, name)? {
            Some(value) => Ok(value),
            None => Err(undefined_reference(name).into()),
        }
    }

    /// The value of an optional child, nil when absent.
    pub(super) fn eval_optional(
        &mut self,
        arena: &SharedArena,
        expr: Option<ExprId>,
        ctx: ContextId,
    ) -> EvalResult {
        match expr {
            Some(id) => self.eval(arena, id, ctx),
            None => Ok(Value::Null),
        }
    }

    pub(super) fn eval_binary(
        &mut self,
        arena: &SharedArena,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        ctx: ContextId,
    ) -> EvalResult {
        let lhs = self.eval(arena, left, ctx)?;
        match op {
            BinaryOp::Coalesce => {
                if lhs.is_null() {
                    self.eval(arena, right, ctx)
                } else {
                    Ok(lhs)
                }
            }
            BinaryOp::And | BinaryOp::Or if own_override(&lhs, op.capability()).is_none() => {
                let lhs_true = self.truthy(&lhs, ctx)?;
                if op == BinaryOp::And && !lhs_true {
                    return Ok(Value::Bool(false));
                }
                if op == BinaryOp::Or && lhs_true {
                    return Ok(Value::Bool(true));
                }
                let rhs = self.eval(arena, right, ctx)?;
                Ok(Value::Bool(self.truthy(&rhs, ctx)?))
            }
            _ => {
                let rhs = self.eval(arena, right, ctx)?;
                Ok(self.binary_values(op, &lhs, &rhs, ctx)?)
            }
        }
    }

    /// Apply a binary operator to two values, dispatching to object overrides.
    pub(crate) fn binary_values(
        &mut self,
        op: BinaryOp,
        lhs: &Value,
        rhs: &Value,
        ctx: ContextId,
    ) -> NativeResult {
        if op == BinaryOp::In {
            if let Some(contains) = own_override(rhs, op.capability()) {
                let found = self.call_at(
                    &contains,
                    vec![lhs.clone()],
                    OrderedMap::new(),
                    ctx,
                    CallOptions::default(),
                    None,
                )?;
                return Ok(Value::Bool(found.is_truthy()));
            }
            return evaluate_binary(lhs, rhs, op);
        }
        let Some(method) = own_override(lhs, op.capability()) else {
            return evaluate_binary(lhs, rhs, op);
        };
        let result = self.call_at(
            &method,
            vec![rhs.clone()],
            OrderedMap::new(),
            ctx,
            CallOptions::default(),
            None,
        )?;
        Ok(match op {
            BinaryOp::Eq | BinaryOp::Lt | BinaryOp::Gt => Value::Bool(result.is_truthy()),
            BinaryOp::NotEq => Value::Bool(!result.is_truthy()),
            BinaryOp::LtEq | BinaryOp::GtEq => {
                Value::Bool(result.is_truthy() || self.values_eq(lhs, rhs, ctx)?)
            }
            _ => result,
        })
    }

    pub(super) fn eval_unary(
        &mut self,
        arena: &SharedArena,
        op: UnaryOp,
        operand: ExprId,
        ctx: ContextId,
    ) -> EvalResult {
        let value = self.eval(arena, operand, ctx)?;
        if op == UnaryOp::Not {
            return Ok(Value::Bool(!self.truthy(&value, ctx)?));
        }
        Ok(evaluate_unary(&value, op)?)
    }

    pub(super) fn eval_array(&mut self, arena: &SharedArena, items: &[ExprId], ctx: ContextId) -> EvalResult {
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            values.push(self.eval(arena, *item, ctx)?);
        }
        Ok(Value::array(values))
    }

    pub(super) fn eval_object(
        &mut self,
        arena: &SharedArena,
        entries: &[(ExprId, ExprId)],
        ctx: ContextId,
    ) -> EvalResult {
        let mut map = OrderedMap::new();
        for (key, value) in entries {
            let key = match self.eval(arena, *key, ctx)? {
                Value::String(s) => s.as_str().to_owned(),
                other => return Err(type_mismatch("Str", &other.type_name()).into()),
            };
            let value = self.eval(arena, *value, ctx)?;
            value.name_if_unnamed(&key);
            map.insert(key, value);
        }
        Ok(Value::object(map))
    }

    /// A nested list evaluates to its last value; a top-level list to an
    /// array of every statement's value.
    pub(super) fn eval_statements(
        &mut self,
        arena: &SharedArena,
        items: &[ExprId],
        top_level: bool,
        ctx: ContextId,
    ) -> EvalResult {
        if top_level {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                let value = self.eval(arena, *item, ctx)?;
                values.push(shallow_clone(&value));
            }
            return Ok(Value::array(values));
        }
        let mut last = Value::Null;
        for item in items {
            last = self.eval(arena, *item, ctx)?;
        }
        Ok(last)
    }

    pub(super) fn eval_index(
        &mut self,
        arena: &SharedArena,
        base: ExprId,
        index: ExprId,
        assign: Option<(AssignOp, ExprId)>,
        optional: bool,
        ctx: ContextId,
    ) -> EvalResult {
        let base_value = self.eval(arena, base, ctx)?;
        let key = self.eval(arena, index, ctx)?;

        let Some((op, value)) = assign else {
            if optional && base_value.is_null() {
                return Ok(Value::Null);
            }
            return match self.get_property(&base_value, &key, ctx) {
                Err(err) if optional && is_absent(&err) => Ok(Value::Null),
                result => Ok(result?),
            };
        };

        let mut value = self.eval(arena, value, ctx)?;
        if let Some(binary) = op.binary() {
            let current = self.get_property(&base_value, &key, ctx)?;
            value = self.binary_values(binary, &current, &value, ctx)?;
        }
        if let Value::String(name) = &key {
            value.name_if_unnamed(name);
        }
        if let Some(spliced) = self.set_property(&base_value, &key, value.clone(), ctx)? {
            match arena.try_get(base).map(|e| &e.kind) {
                Some(ExprKind::Variable(name)) => {
                    self.contexts.set(ctx, name, spliced, SetOptions::default())?;
                }
                _ => return Err(invalid_operation("[]=", &base_value.type_name()).into()),
            }
        }
        Ok(value)
    }
}

/// Errors optional chaining turns into nil.
fn is_absent(err: &EsError) -> bool {
    matches!(
        err.kind,
        EsErrorKind::MissingProperty { .. } | EsErrorKind::InvalidOperation { .. }
    )
}
