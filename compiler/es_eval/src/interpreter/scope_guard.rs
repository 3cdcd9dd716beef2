//! RAII scope guards for block and call contexts.
//!
//! [`ScopedInterpreter`] owns a freshly allocated child context and releases
//! it when dropped, including on early returns through `?`. Releasing is a
//! no-op for contexts that were pinned by a closure or type created inside
//! them, so captured scopes survive their frame.
//!
//! ```text
//! self.with_child_scope(ctx, |scoped| {
//!     let inner = scoped.ctx();
//!     scoped.eval(arena, body, inner)
//! })
//! ```

use std::ops::{Deref, DerefMut};

use es_value::{ContextError, ContextId};

use super::Interpreter;

/// Guard over the interpreter holding a child context for its lifetime.
pub struct ScopedInterpreter<'guard> {
    interpreter: &'guard mut Interpreter,
    ctx: ContextId,
}

impl ScopedInterpreter<'_> {
    /// The context this guard owns.
    #[inline]
    pub fn ctx(&self) -> ContextId {
        self.ctx
    }
}

impl Drop for ScopedInterpreter<'_> {
    fn drop(&mut self) {
        self.interpreter.contexts.release(self.ctx);
    }
}

impl Deref for ScopedInterpreter<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl Interpreter {
    /// Allocate a child of `parent`, released when the guard drops.
    pub fn scoped(&mut self, parent: ContextId) -> Result<ScopedInterpreter<'_>, ContextError> {
        let ctx = self.contexts.new_child(parent)?;
        Ok(ScopedInterpreter {
            interpreter: self,
            ctx,
        })
    }

    /// Run `f` with a child context of `parent`.
    pub fn with_child_scope<T, E, F>(&mut self, parent: ContextId, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut ScopedInterpreter<'_>) -> Result<T, E>,
        E: From<ContextError>,
    {
        let mut scoped = self.scoped(parent)?;
        f(&mut scoped)
    }
}
