//! AST node types.
//!
//! Child nodes are referenced by `ExprId`; the nodes themselves live in an
//! `ExprArena`. Each variant of `ExprKind` is one evaluator state.

mod operators;

pub use operators::{AssignOp, BinaryOp, UnaryOp};

use crate::{ExprId, Position};

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Position,
}

impl Expr {
    pub fn new(kind: ExprKind, pos: Position) -> Self {
        Expr { kind, pos }
    }
}

/// Binding intent of an explicit declaration (`let`, `var`, `const`, `global`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Declaration {
    /// Rejects later reassignment.
    pub constant: bool,
    /// Binds in the root context instead of the current one.
    pub global: bool,
}

impl Declaration {
    /// A mutable local declaration (`var`).
    pub const VAR: Declaration = Declaration {
        constant: false,
        global: false,
    };

    /// A constant local declaration (`const`).
    pub const CONST: Declaration = Declaration {
        constant: true,
        global: false,
    };

    /// A mutable declaration bound at the root context (`global`).
    pub const GLOBAL: Declaration = Declaration {
        constant: false,
        global: true,
    };
}

/// A call-site argument.
#[derive(Clone, Debug, PartialEq)]
pub enum CallArg {
    /// `f(x)`
    Positional(ExprId),
    /// `f(...xs)`: arrays spread into positional arguments, objects into named ones.
    Spread(ExprId),
    /// `f(name=x)`
    Named(String, ExprId),
}

/// A declared parameter of a function literal.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamDef {
    pub name: String,
    /// Declared type expression; `Any` when absent.
    pub ty: Option<ExprId>,
    /// Default value expression.
    pub default: Option<ExprId>,
    /// Bound from named arguments instead of positional ones.
    pub is_kwarg: bool,
}

impl ParamDef {
    /// An untyped positional parameter.
    pub fn positional(name: impl Into<String>) -> Self {
        ParamDef {
            name: name.into(),
            ty: None,
            default: None,
            is_kwarg: false,
        }
    }
}

/// A function literal.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
    pub name: Option<String>,
    pub params: Vec<ParamDef>,
    pub body: ExprId,
    pub return_type: Option<ExprId>,
    /// Surplus positional arguments are collected instead of rejected.
    pub allow_args: bool,
    /// Unknown named arguments are collected instead of rejected.
    pub allow_kwargs: bool,
    /// `func name () {}` at statement level binds `name` as a constant.
    pub is_declaration: bool,
    pub description: Option<String>,
}

/// A class (user type) literal.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDef {
    pub name: Option<String>,
    /// Each entry must evaluate to a function.
    pub methods: Vec<ExprId>,
    /// Declared property name to type expression.
    pub properties: Vec<(String, ExprId)>,
    pub extends: Option<ExprId>,
    pub init: Option<ExprId>,
    pub is_abstract: bool,
    pub is_declaration: bool,
}

/// Expression variants.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    // Literals
    Number(f64),
    Str(String),
    Nil,

    Variable(String),

    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },

    /// Declaration (`declaration` is `Some`) or assignment to a name.
    Assign {
        name: String,
        value: Option<ExprId>,
        ty: Option<ExprId>,
        op: AssignOp,
        declaration: Option<Declaration>,
    },
    /// `let a, b = value` from an object (by key) or an iterable (by position).
    Destructure {
        names: Vec<String>,
        types: Vec<Option<ExprId>>,
        value: ExprId,
        declaration: Declaration,
    },

    If {
        condition: ExprId,
        then_branch: ExprId,
        else_branch: Option<ExprId>,
    },
    While {
        condition: ExprId,
        body: ExprId,
    },
    For {
        binding: String,
        iterable: ExprId,
        body: ExprId,
        declaration: Declaration,
    },
    TryCatch {
        body: ExprId,
        catch: ExprId,
    },

    Array(Vec<ExprId>),
    /// Key expressions must evaluate to strings.
    Object(Vec<(ExprId, ExprId)>),
    /// Statement list. A top-level list evaluates to an array of every statement's value.
    Statements {
        items: Vec<ExprId>,
        top_level: bool,
    },

    Call {
        callee: ExprId,
        args: Vec<CallArg>,
        /// `T<|A, B|>` generic specialisation instead of a call.
        generic: bool,
        /// `f?.()`: invalid operations produce nil.
        optional: bool,
    },
    Function(Box<FunctionDef>),
    Return(Option<ExprId>),
    Yield(Option<ExprId>),
    Break,
    Continue,

    /// `base[index]`, or `base[index] op= value` when `assign` is set.
    Index {
        base: ExprId,
        index: ExprId,
        assign: Option<(AssignOp, ExprId)>,
        optional: bool,
    },

    Class(Box<ClassDef>),
    Namespace {
        name: Option<String>,
        body: ExprId,
        mutable: bool,
        is_declaration: bool,
    },
}

impl ExprKind {
    /// Short node name for tracing.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::Nil => "nil",
            Self::Variable(_) => "variable",
            Self::Binary { .. } => "binary",
            Self::Unary { .. } => "unary",
            Self::Assign { .. } => "assign",
            Self::Destructure { .. } => "destructure",
            Self::If { .. } => "if",
            Self::While { .. } => "while",
            Self::For { .. } => "for",
            Self::TryCatch { .. } => "try",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Statements { .. } => "statements",
            Self::Call { .. } => "call",
            Self::Function(_) => "function",
            Self::Return(_) => "return",
            Self::Yield(_) => "yield",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Index { .. } => "index",
            Self::Class(_) => "class",
            Self::Namespace { .. } => "namespace",
        }
    }
}
