//! Evaluator configuration.

/// Default bound on nested script calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// Largest sequence a single operation may build (`range`, `'s' * n`,
/// `n.cast(Arr)`, growing an array by index).
pub const MAX_SEQUENCE_LEN: usize = 1 << 24;

/// Tunables for an `Interpreter` session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Maximum nested calls before a `RecursionError`; `None` is unbounded.
    pub max_call_depth: Option<usize>,
    /// Check return values against declared return types.
    pub type_check_returns: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
            type_check_returns: true,
        }
    }
}
