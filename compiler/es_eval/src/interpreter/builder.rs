//! `InterpreterBuilder` for creating `Interpreter` sessions.

use es_ir::{ExprId, SharedArena};
use es_value::{ContextArena, Value};
use rustc_hash::FxHashMap;

use super::{Interpreter, Module};
use crate::diagnostics::CallStack;
use crate::{stdin_handler, stdout_handler, EvalConfig, SharedInputHandler, SharedPrintHandler};

/// Builder for an `Interpreter`.
///
/// Output defaults to stdout and input to stdin. Modules registered here
/// are what the `import` built-in can load.
pub struct InterpreterBuilder {
    config: EvalConfig,
    print_handler: Option<SharedPrintHandler>,
    input_handler: Option<SharedInputHandler>,
    modules: FxHashMap<String, Module>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self {
            config: EvalConfig::default(),
            print_handler: None,
            input_handler: None,
            modules: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Bound on nested calls; `None` for unlimited.
    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.config.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn input_handler(mut self, handler: SharedInputHandler) -> Self {
        self.input_handler = Some(handler);
        self
    }

    /// Register a ready-made module value (typically an object of natives).
    #[must_use]
    pub fn module(mut self, name: impl Into<String>, value: Value) -> Self {
        self.modules.insert(name.into(), Module::Value(value));
        self
    }

    /// Register a module whose program is evaluated on first import.
    ///
    /// The importer receives the program's top-level bindings as an object.
    #[must_use]
    pub fn module_source(mut self, name: impl Into<String>, arena: SharedArena, body: ExprId) -> Self {
        self.modules.insert(name.into(), Module::Source { arena, body });
        self
    }

    /// Build the interpreter. Call `initialise` before evaluating.
    pub fn build(self) -> Interpreter {
        Interpreter {
            contexts: ContextArena::new(),
            call_stack: CallStack::new(self.config.max_call_depth),
            config: self.config,
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            input_handler: self.input_handler.unwrap_or_else(stdin_handler),
            modules: self.modules,
            module_cache: FxHashMap::default(),
            initialised: false,
        }
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
