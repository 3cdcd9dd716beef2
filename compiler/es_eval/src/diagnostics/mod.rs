//! Call-depth tracking for the evaluator.
//!
//! `CallStack` records one `CallFrame` per active script call. Pushing past
//! the configured depth fails with a `RecursionError` instead of letting a
//! runaway script exhaust memory.

use es_ir::Position;
use es_value::errors::recursion_limit_exceeded;
use es_value::EsError;

/// One active call.
#[derive(Clone, Debug, PartialEq)]
pub struct CallFrame {
    /// Callee name, `(anonymous)` when it has none.
    pub name: String,
    /// Where the call was made.
    pub call_pos: Option<Position>,
}

/// Live stack of script calls.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `max_depth` of `None` means unlimited.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, failing without pushing when the limit is reached.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EsError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                tracing::warn!(depth = max, callee = %frame.name, "call depth limit reached");
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Names of the active calls, innermost first.
    pub fn backtrace(&self) -> Vec<String> {
        self.frames.iter().rev().map(|f| f.name.clone()).collect()
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new(None)
    }
}
