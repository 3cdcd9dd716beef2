//! Arena construction helpers.
//!
//! `AstBuilder` is what a parser (or a host embedding pre-built trees, or a
//! test) uses to fill an `ExprArena`. Nodes take the builder's current
//! position; move it with [`AstBuilder::at`].

use std::sync::Arc;

use crate::{
    AssignOp, BinaryOp, CallArg, ClassDef, Declaration, ExprArena, ExprId, ExprKind, FunctionDef,
    ParamDef, Position, SharedArena, UnaryOp,
};

/// Incremental builder for an expression arena.
pub struct AstBuilder {
    arena: ExprArena,
    file: Arc<str>,
    offset: u32,
    line: u32,
    col: u32,
}

impl AstBuilder {
    pub fn new(file: impl Into<Arc<str>>) -> Self {
        AstBuilder {
            arena: ExprArena::new(),
            file: file.into(),
            offset: 0,
            line: 0,
            col: 0,
        }
    }

    /// Set the (zero-based) position used for subsequently built nodes.
    pub fn at(&mut self, line: u32, col: u32) -> &mut Self {
        self.line = line;
        self.col = col;
        self.offset = line.saturating_mul(80).saturating_add(col);
        self
    }

    /// The position the next node will carry.
    pub fn pos(&self) -> Position {
        Position::new(Arc::clone(&self.file), self.offset, self.line, self.col)
    }

    pub fn expr(&mut self, kind: ExprKind) -> ExprId {
        let pos = self.pos();
        self.arena.alloc(kind, pos)
    }

    /// Freeze the arena for evaluation.
    pub fn finish(self) -> SharedArena {
        SharedArena::new(self.arena)
    }

    // Literals and names

    pub fn num(&mut self, value: f64) -> ExprId {
        self.expr(ExprKind::Number(value))
    }

    pub fn str(&mut self, value: &str) -> ExprId {
        self.expr(ExprKind::Str(value.to_owned()))
    }

    pub fn nil(&mut self) -> ExprId {
        self.expr(ExprKind::Nil)
    }

    pub fn var(&mut self, name: &str) -> ExprId {
        self.expr(ExprKind::Variable(name.to_owned()))
    }

    // Operators

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.expr(ExprKind::Binary { op, left, right })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.expr(ExprKind::Unary { op, operand })
    }

    // Bindings

    /// Explicit declaration with an optional declared type.
    pub fn declare(
        &mut self,
        declaration: Declaration,
        name: &str,
        value: Option<ExprId>,
        ty: Option<ExprId>,
    ) -> ExprId {
        self.expr(ExprKind::Assign {
            name: name.to_owned(),
            value,
            ty,
            op: AssignOp::Assign,
            declaration: Some(declaration),
        })
    }

    /// `var name = value`
    pub fn let_var(&mut self, name: &str, value: ExprId) -> ExprId {
        self.declare(Declaration::VAR, name, Some(value), None)
    }

    /// `const name = value`
    pub fn let_const(&mut self, name: &str, value: ExprId) -> ExprId {
        self.declare(Declaration::CONST, name, Some(value), None)
    }

    /// `name = value`
    pub fn assign(&mut self, name: &str, value: ExprId) -> ExprId {
        self.compound_assign(name, AssignOp::Assign, value)
    }

    /// `name op= value`
    pub fn compound_assign(&mut self, name: &str, op: AssignOp, value: ExprId) -> ExprId {
        self.expr(ExprKind::Assign {
            name: name.to_owned(),
            value: Some(value),
            ty: None,
            op,
            declaration: None,
        })
    }

    pub fn destructure(&mut self, declaration: Declaration, names: &[&str], value: ExprId) -> ExprId {
        self.expr(ExprKind::Destructure {
            names: names.iter().map(|n| (*n).to_owned()).collect(),
            types: vec![None; names.len()],
            value,
            declaration,
        })
    }

    // Control flow

    pub fn if_else(&mut self, condition: ExprId, then_branch: ExprId, else_branch: Option<ExprId>) -> ExprId {
        self.expr(ExprKind::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    pub fn while_loop(&mut self, condition: ExprId, body: ExprId) -> ExprId {
        self.expr(ExprKind::While { condition, body })
    }

    pub fn for_in(&mut self, binding: &str, iterable: ExprId, body: ExprId) -> ExprId {
        self.expr(ExprKind::For {
            binding: binding.to_owned(),
            iterable,
            body,
            declaration: Declaration::VAR,
        })
    }

    pub fn try_catch(&mut self, body: ExprId, catch: ExprId) -> ExprId {
        self.expr(ExprKind::TryCatch { body, catch })
    }

    pub fn ret(&mut self, value: Option<ExprId>) -> ExprId {
        self.expr(ExprKind::Return(value))
    }

    pub fn yield_value(&mut self, value: Option<ExprId>) -> ExprId {
        self.expr(ExprKind::Yield(value))
    }

    pub fn brk(&mut self) -> ExprId {
        self.expr(ExprKind::Break)
    }

    pub fn cont(&mut self) -> ExprId {
        self.expr(ExprKind::Continue)
    }

    // Collections and blocks

    pub fn array(&mut self, items: Vec<ExprId>) -> ExprId {
        self.expr(ExprKind::Array(items))
    }

    /// Object literal with string keys.
    pub fn object(&mut self, entries: &[(&str, ExprId)]) -> ExprId {
        let entries = entries
            .iter()
            .map(|(key, value)| (self.str(key), *value))
            .collect();
        self.expr(ExprKind::Object(entries))
    }

    /// A nested statement list; evaluates to its last value.
    pub fn block(&mut self, items: Vec<ExprId>) -> ExprId {
        self.expr(ExprKind::Statements {
            items,
            top_level: false,
        })
    }

    /// A top-level statement list; evaluates to an array of every statement's value.
    pub fn program(&mut self, items: Vec<ExprId>) -> ExprId {
        self.expr(ExprKind::Statements {
            items,
            top_level: true,
        })
    }

    // Calls and access

    pub fn call(&mut self, callee: ExprId, args: Vec<ExprId>) -> ExprId {
        let args = args.into_iter().map(CallArg::Positional).collect();
        self.call_with(callee, args)
    }

    pub fn call_with(&mut self, callee: ExprId, args: Vec<CallArg>) -> ExprId {
        self.expr(ExprKind::Call {
            callee,
            args,
            generic: false,
            optional: false,
        })
    }

    /// `callee?.(args)`
    pub fn optional_call(&mut self, callee: ExprId, args: Vec<ExprId>) -> ExprId {
        let args = args.into_iter().map(CallArg::Positional).collect();
        self.expr(ExprKind::Call {
            callee,
            args,
            generic: false,
            optional: true,
        })
    }

    /// `callee<|args|>`
    pub fn generic(&mut self, callee: ExprId, args: Vec<ExprId>) -> ExprId {
        let args = args.into_iter().map(CallArg::Positional).collect();
        self.expr(ExprKind::Call {
            callee,
            args,
            generic: true,
            optional: false,
        })
    }

    pub fn index(&mut self, base: ExprId, index: ExprId) -> ExprId {
        self.expr(ExprKind::Index {
            base,
            index,
            assign: None,
            optional: false,
        })
    }

    /// `base?.[index]`
    pub fn optional_index(&mut self, base: ExprId, index: ExprId) -> ExprId {
        self.expr(ExprKind::Index {
            base,
            index,
            assign: None,
            optional: true,
        })
    }

    /// `base[index] op= value`
    pub fn set_index(&mut self, base: ExprId, index: ExprId, op: AssignOp, value: ExprId) -> ExprId {
        self.expr(ExprKind::Index {
            base,
            index,
            assign: Some((op, value)),
            optional: false,
        })
    }

    /// `base.name`
    pub fn member(&mut self, base: ExprId, name: &str) -> ExprId {
        let key = self.str(name);
        self.index(base, key)
    }

    /// `base.name = value`
    pub fn set_member(&mut self, base: ExprId, name: &str, value: ExprId) -> ExprId {
        let key = self.str(name);
        self.set_index(base, key, AssignOp::Assign, value)
    }

    /// `base.name(args)`
    pub fn method_call(&mut self, base: ExprId, name: &str, args: Vec<ExprId>) -> ExprId {
        let callee = self.member(base, name);
        self.call(callee, args)
    }

    // Definitions

    pub fn function(&mut self, def: FunctionDef) -> ExprId {
        self.expr(ExprKind::Function(Box::new(def)))
    }

    /// Anonymous function with untyped positional parameters.
    pub fn func(&mut self, params: &[&str], body: ExprId) -> ExprId {
        self.function(FunctionDef {
            name: None,
            params: params.iter().map(|p| ParamDef::positional(*p)).collect(),
            body,
            return_type: None,
            allow_args: false,
            allow_kwargs: false,
            is_declaration: false,
            description: None,
        })
    }

    /// Named method or initializer (not itself a declaration).
    pub fn method(&mut self, name: &str, params: &[&str], body: ExprId) -> ExprId {
        self.function(FunctionDef {
            name: Some(name.to_owned()),
            params: params.iter().map(|p| ParamDef::positional(*p)).collect(),
            body,
            return_type: None,
            allow_args: false,
            allow_kwargs: false,
            is_declaration: false,
            description: None,
        })
    }

    pub fn class(&mut self, def: ClassDef) -> ExprId {
        self.expr(ExprKind::Class(Box::new(def)))
    }

    pub fn namespace(&mut self, name: &str, body: ExprId, mutable: bool) -> ExprId {
        self.expr(ExprKind::Namespace {
            name: Some(name.to_owned()),
            body,
            mutable,
            is_declaration: true,
        })
    }
}

#[cfg(test)]
mod tests;
