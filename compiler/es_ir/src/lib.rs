//! ES IR - syntax tree types for the EntropyScript runtime.
//!
//! This crate contains the data the evaluator walks:
//! - `Position` for source locations attached to nodes and errors
//! - AST nodes (`Expr`, `ExprKind`) and operator enums
//! - `ExprArena` storage addressed by `ExprId`, shared as `SharedArena`
//! - `AstBuilder`, a small construction API for parsers, hosts and tests
//!
//! # Design Philosophy
//!
//! - **Flat storage**: child nodes are `ExprId` indices into the arena, never `Box<Expr>`
//! - **Shareable bodies**: function values keep a `SharedArena` handle plus the
//!   `ExprId` of their body, so a closure outlives the evaluation that created it
//!
//! Lexing and parsing are external collaborators; they only need to fill an arena.

mod arena;
pub mod ast;
mod builder;
mod position;

pub use arena::{ExprArena, ExprId, SharedArena};
pub use ast::{
    AssignOp, BinaryOp, CallArg, ClassDef, Declaration, Expr, ExprKind, FunctionDef, ParamDef,
    UnaryOp,
};
pub use builder::AstBuilder;
pub use position::{Position, BUILTIN_FILE};
