//! Node evaluation, organised by category:
//!
//! - `expr`: literals, variables, operators, collections, statement lists, indexing
//! - `assign`: declarations, assignment, destructuring
//! - `control`: if/else, while, for-in, try/catch, return/yield/break/continue
//! - `call`: call expressions (argument spreading, generics, optional calls)
//! - `define`: function, class and namespace definitions
//!
//! [`Interpreter::eval_expr`] is the single dispatch point; the position
//! stamping and stack guard live in `Interpreter::eval`.

mod assign;
mod call;
mod control;
mod define;
mod expr;

use es_ir::{Expr, ExprKind, SharedArena};
use es_value::{ContextId, EvalResult, Unwind, Value};

use crate::Interpreter;

impl Interpreter {
    pub(crate) fn eval_expr(&mut self, arena: &SharedArena, expr: &Expr, ctx: ContextId) -> EvalResult {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Str(s) => Ok(Value::string(s.as_str())),
            ExprKind::Nil => Ok(Value::Null),
            ExprKind::Variable(name) => self.eval_variable(name, ctx),

            ExprKind::Binary { op, left, right } => self.eval_binary(arena, *op, *left, *right, ctx),
            ExprKind::Unary { op, operand } => self.eval_unary(arena, *op, *operand, ctx),

            ExprKind::Assign {
                name,
                value,
                ty,
                op,
                declaration,
            } => self.eval_assign(arena, name, *value, *ty, *op, *declaration, ctx),
            ExprKind::Destructure {
                names,
                types,
                value,
                declaration,
            } => self.eval_destructure(arena, names, types, *value, *declaration, ctx),

            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.eval_if(arena, *condition, *then_branch, *else_branch, ctx),
            ExprKind::While { condition, body } => self.eval_while(arena, *condition, *body, ctx),
            ExprKind::For {
                binding,
                iterable,
                body,
                declaration,
            } => self.eval_for(arena, binding, *iterable, *body, *declaration, ctx),
            ExprKind::TryCatch { body, catch } => self.eval_try(arena, *body, *catch, ctx),

            ExprKind::Array(items) => self.eval_array(arena, items, ctx),
            ExprKind::Object(entries) => self.eval_object(arena, entries, ctx),
            ExprKind::Statements { items, top_level } => {
                self.eval_statements(arena, items, *top_level, ctx)
            }

            ExprKind::Call {
                callee,
                args,
                generic,
                optional,
            } => self.eval_call(arena, &expr.pos, *callee, args, *generic, *optional, ctx),
            ExprKind::Function(def) => self.eval_function_def(arena, &expr.pos, def, ctx),
            ExprKind::Return(value) => {
                let value = self.eval_optional(arena, *value, ctx)?;
                Err(Unwind::Return(value))
            }
            ExprKind::Yield(value) => self.eval_yield(arena, *value, ctx),
            ExprKind::Break => Err(Unwind::Break),
            ExprKind::Continue => Err(Unwind::Continue),

            ExprKind::Index {
                base,
                index,
                assign,
                optional,
            } => self.eval_index(arena, *base, *index, *assign, *optional, ctx),

            ExprKind::Class(def) => self.eval_class_def(arena, &expr.pos, def, ctx),
            ExprKind::Namespace {
                name,
                body,
                mutable,
                is_declaration,
            } => self.eval_namespace(arena, name.as_deref(), *body, *mutable, *is_declaration, ctx),
        }
    }
}
