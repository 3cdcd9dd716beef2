//! Declarations and assignment.
//!
//! A declaration (`var`, `let`, `const`, `global`) introduces a binding and
//! fails if the current context already has one. A plain assignment rebinds
//! the nearest existing binding or creates one in the current context.

use es_ir::{AssignOp, Declaration, ExprId, SharedArena};
use es_value::errors::{invalid_syntax, type_mismatch_at, undefined_reference};
use es_value::{ContextId, EsError, EvalResult, SetOptions, Value};

use crate::iterate::collect_items;
use crate::typing::includes;
use crate::Interpreter;

impl Interpreter {
    #[allow(clippy::too_many_arguments, reason = "mirrors the fields of the assignment node")]
    pub(super) fn eval_assign(
        &mut self,
        arena: &SharedArena,
        name: &str,
        value: Option<ExprId>,
        ty: Option<ExprId>,
        op: AssignOp,
        declaration: Option<Declaration>,
        ctx: ContextId,
    ) -> EvalResult {
        let mut value = self.eval_optional(arena, value, ctx)?;

        if let Some(declaration) = declaration {
            if op != AssignOp::Assign {
                return Err(invalid_syntax(format!(
                    "cannot use '{}' in a declaration of '{name}'",
                    op.as_symbol()
                ))
                .into());
            }
            let declared_type = match ty {
                Some(ty) => Some(self.eval(arena, ty, ctx)?),
                None => None,
            };
            self.declare_checked(ctx, name, value.clone(), declared_type, declaration)?;
            return Ok(value);
        }

        if let Some(binary) = op.binary() {
            let current = self
                .contexts
                .get(ctx, name)?
                .ok_or_else(|| undefined_reference(name))?;
            value = self.binary_values(binary, &current, &value, ctx)?;
        }
        let declared_type = self
            .contexts
            .get_symbol(ctx, name)?
            .and_then(|symbol| symbol.ty.clone());
        if let Some(ty) = declared_type {
            check_binding(&ty, &value, name)?;
        }
        value.name_if_unnamed(name);
        self.contexts.set(ctx, name, value.clone(), SetOptions::default())?;
        Ok(value)
    }

    /// `var a, b = value`: by key from objects, by position from iterables.
    pub(super) fn eval_destructure(
        &mut self,
        arena: &SharedArena,
        names: &[String],
        types: &[Option<ExprId>],
        value: ExprId,
        declaration: Declaration,
        ctx: ContextId,
    ) -> EvalResult {
        let source = self.eval(arena, value, ctx)?;
        let parts: Vec<Value> = match &source {
            Value::Object(obj) => names
                .iter()
                .map(|name| obj.get(name).unwrap_or(Value::Null))
                .collect(),
            other => {
                let mut items = collect_items(other)?.into_iter();
                names
                    .iter()
                    .map(|_| items.next().unwrap_or(Value::Null))
                    .collect()
            }
        };
        for (i, (name, part)) in names.iter().zip(parts).enumerate() {
            let declared_type = match types.get(i).copied().flatten() {
                Some(ty) => Some(self.eval(arena, ty, ctx)?),
                None => None,
            };
            self.declare_checked(ctx, name, part, declared_type, declaration)?;
        }
        Ok(source)
    }

    /// Type check, name and declare one binding.
    pub(super) fn declare_checked(
        &mut self,
        ctx: ContextId,
        name: &str,
        value: Value,
        declared_type: Option<Value>,
        declaration: Declaration,
    ) -> Result<(), EsError> {
        if let Some(ty) = &declared_type {
            check_binding(ty, &value, name)?;
        }
        value.name_if_unnamed(name);
        let opts = SetOptions {
            constant: declaration.constant,
            global: declaration.global,
            ty: declared_type,
            ..SetOptions::default()
        };
        self.contexts.declare(ctx, name, value, opts)?;
        Ok(())
    }
}

fn check_binding(ty: &Value, value: &Value, name: &str) -> Result<(), EsError> {
    if includes(ty, value) {
        return Ok(());
    }
    Err(type_mismatch_at(
        &ty.to_string(),
        &value.type_name(),
        &value.to_string(),
        &format!("for variable '{name}'"),
    ))
}
