//! ES Eval - tree-walking evaluator for EntropyScript.
//!
//! This crate runs `es_ir` trees against `es_value` values.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `Interpreter`: one session owning the context arena, call stack,
//!   print/input handlers and registered modules
//! - `evaluate_binary` / `evaluate_unary`: enum-based operator dispatch for
//!   built-in values; objects override operators with their own functions
//! - `includes` / `is_subtype_of`: structural type membership and subtyping
//! - `cast`: conversions between the primordial types
//!
//! # Usage
//!
//! ```text
//! let mut interpreter = Interpreter::builder().print_handler(buffer_handler()).build();
//! interpreter.initialise()?;
//! let evaluation = interpreter.run(&arena, program);
//! ```
//!
//! Lexing and parsing happen elsewhere; anything that fills an `ExprArena`
//! can drive the interpreter.

mod builtins;
mod cast;
mod config;
mod diagnostics;
mod exec;
mod input_handler;
mod interpreter;
mod iterate;
mod methods;
mod operators;
mod print_handler;
mod stack;
mod tracing_setup;
mod typing;
mod unary_operators;

pub use es_value::{EsError, EsErrorKind, EvalResult, NativeResult, Value};

pub use cast::{cast, parse_number};
pub use config::{EvalConfig, DEFAULT_MAX_CALL_DEPTH, MAX_SEQUENCE_LEN};
pub use diagnostics::{CallFrame, CallStack};
pub use input_handler::{
    empty_input_handler, scripted_handler, stdin_handler, InputHandlerImpl, SharedInputHandler,
};
pub use interpreter::{CallOptions, Evaluation, Interpreter, InterpreterBuilder, ScopedInterpreter};
pub use iterate::{collect_items, ValueIter};
pub use operators::{contains, evaluate_binary, values_equal};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandlerImpl, SharedPrintHandler,
};
pub use stack::ensure_sufficient_stack;
pub use tracing_setup::init_tracing;
pub use typing::{includes, is_subtype_of, overlaps, same_type};
pub use unary_operators::evaluate_unary;
