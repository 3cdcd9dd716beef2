//! Lexical scopes.
//!
//! Contexts live in a `ContextArena` and are addressed by `ContextId`
//! handles, so closures and types can refer to their defining scope without
//! reference cycles. A context is either *pinned* (captured by a function or
//! type, kept for the life of the arena) or released when the evaluation
//! frame that created it exits. Released slots are reused under a new
//! generation; a stale handle reports `ContextError::Released`.

use bitflags::bitflags;

use crate::errors::{
    constant_reassignment, inaccessible, invalid_syntax, type_error, undefined_reference,
};
use crate::{EsError, OrderedMap, Unwind, Value};

bitflags! {
    /// Per-binding flags.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct SymbolFlags: u8 {
        /// Reassignment is rejected unless forced.
        const CONSTANT = 1 << 0;
        /// Lookups may see the binding.
        const ACCESSIBLE = 1 << 1;
        /// Bound at a context created as the global scope.
        const GLOBAL = 1 << 2;
    }
}

/// A named binding.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub value: Value,
    /// Declared type; `None` accepts anything.
    pub ty: Option<Value>,
    pub flags: SymbolFlags,
}

impl Symbol {
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.flags.contains(SymbolFlags::CONSTANT)
    }

    #[inline]
    pub fn is_accessible(&self) -> bool {
        self.flags.contains(SymbolFlags::ACCESSIBLE)
    }

    #[inline]
    pub fn is_global(&self) -> bool {
        self.flags.contains(SymbolFlags::GLOBAL)
    }
}

/// Options for binding a symbol.
#[derive(Clone, Debug, Default)]
pub struct SetOptions {
    pub constant: bool,
    /// Bind in the root context.
    pub global: bool,
    /// Hide the binding from lookups.
    pub hidden: bool,
    pub ty: Option<Value>,
    /// Overwrite even a constant binding.
    pub force_through_const: bool,
}

impl SetOptions {
    pub fn constant() -> Self {
        SetOptions {
            constant: true,
            ..SetOptions::default()
        }
    }

    #[must_use]
    pub fn typed(mut self, ty: Value) -> Self {
        self.ty = Some(ty);
        self
    }
}

/// Failure of a scope operation.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ContextError {
    #[error("cannot reassign constant '{0}'")]
    Constant(String),
    #[error("symbol '{0}' is not accessible")]
    Inaccessible(String),
    #[error("symbol '{0}' has already been declared")]
    Redeclared(String),
    #[error("'{0}' is not defined")]
    Undefined(String),
    #[error("context is no longer alive")]
    Released,
    #[error("cannot allocate more than {0} contexts")]
    Exhausted(usize),
}

impl From<ContextError> for EsError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Constant(name) => constant_reassignment(&name),
            ContextError::Inaccessible(name) => inaccessible(&name),
            ContextError::Redeclared(name) => {
                invalid_syntax(format!("Symbol '{name}' has already been declared"))
            }
            ContextError::Undefined(name) => undefined_reference(&name),
            ContextError::Released | ContextError::Exhausted(_) => type_error(err.to_string()),
        }
    }
}

impl From<ContextError> for Unwind {
    fn from(err: ContextError) -> Self {
        Unwind::Error(err.into())
    }
}

/// Handle to a context in a `ContextArena`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ContextId {
    index: u32,
    generation: u32,
}

struct Frame {
    symbols: OrderedMap<Symbol>,
    parent: Option<ContextId>,
    generation: u32,
    live: bool,
    pinned: bool,
    /// Created as a global scope.
    global: bool,
}

/// Storage for every context of a runtime session.
pub struct ContextArena {
    frames: Vec<Frame>,
    free: Vec<u32>,
    root: ContextId,
    /// Most slots the arena may hold, root included.
    limit: usize,
}

impl ContextArena {
    /// A new arena holding one root context marked global and pinned.
    pub fn new() -> Self {
        Self::with_limit(u32::MAX as usize)
    }

    /// Like `new`, but `new_child` fails once `limit` contexts are alive.
    pub fn with_limit(limit: usize) -> Self {
        let root = Frame {
            symbols: OrderedMap::new(),
            parent: None,
            generation: 0,
            live: true,
            pinned: true,
            global: true,
        };
        ContextArena {
            frames: vec![root],
            free: Vec::new(),
            root: ContextId {
                index: 0,
                generation: 0,
            },
            limit: limit.clamp(1, u32::MAX as usize),
        }
    }

    fn alloc(&mut self, parent: ContextId) -> Result<ContextId, ContextError> {
        if let Some(index) = self.free.pop() {
            let frame = &mut self.frames[index as usize];
            frame.live = true;
            frame.parent = Some(parent);
            frame.pinned = false;
            frame.global = false;
            return Ok(ContextId {
                index,
                generation: frame.generation,
            });
        }
        let index = match u32::try_from(self.frames.len()) {
            Ok(index) if (index as usize) < self.limit => index,
            _ => return Err(ContextError::Exhausted(self.limit)),
        };
        self.frames.push(Frame {
            symbols: OrderedMap::new(),
            parent: Some(parent),
            generation: 0,
            live: true,
            pinned: false,
            global: false,
        });
        Ok(ContextId {
            index,
            generation: 0,
        })
    }

    fn frame(&self, id: ContextId) -> Result<&Frame, ContextError> {
        self.frames
            .get(id.index as usize)
            .filter(|f| f.live && f.generation == id.generation)
            .ok_or(ContextError::Released)
    }

    fn frame_mut(&mut self, id: ContextId) -> Result<&mut Frame, ContextError> {
        self.frames
            .get_mut(id.index as usize)
            .filter(|f| f.live && f.generation == id.generation)
            .ok_or(ContextError::Released)
    }

    /// The session's root context.
    #[inline]
    pub fn root(&self) -> ContextId {
        self.root
    }

    /// Allocate a scope under `parent`, which must still be alive.
    pub fn new_child(&mut self, parent: ContextId) -> Result<ContextId, ContextError> {
        self.frame(parent)?;
        self.alloc(parent)
    }

    pub fn is_alive(&self, id: ContextId) -> bool {
        self.frame(id).is_ok()
    }

    pub fn parent(&self, id: ContextId) -> Option<ContextId> {
        self.frame(id).ok().and_then(|f| f.parent)
    }

    /// Outermost ancestor of `id`.
    pub fn root_of(&self, id: ContextId) -> ContextId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Mark a context as a global scope, so `global` bindings in it keep their flag.
    pub fn mark_global(&mut self, id: ContextId) -> Result<(), ContextError> {
        self.frame_mut(id)?.global = true;
        Ok(())
    }

    pub fn is_global(&self, id: ContextId) -> bool {
        self.frame(id).is_ok_and(|f| f.global)
    }

    /// Nearest binding of `name` along the parent chain.
    pub fn get_symbol(&self, id: ContextId, name: &str) -> Result<Option<&Symbol>, ContextError> {
        let mut current = Some(id);
        while let Some(cid) = current {
            let frame = self.frame(cid)?;
            if let Some(symbol) = frame.symbols.get(name) {
                if !symbol.is_accessible() {
                    return Err(ContextError::Inaccessible(name.to_owned()));
                }
                return Ok(Some(symbol));
            }
            current = frame.parent;
        }
        Ok(None)
    }

    pub fn get(&self, id: ContextId, name: &str) -> Result<Option<Value>, ContextError> {
        Ok(self.get_symbol(id, name)?.map(|s| s.value.clone()))
    }

    /// Whether `name` is bound anywhere along the chain.
    pub fn has(&self, id: ContextId, name: &str) -> bool {
        let mut current = Some(id);
        while let Some(cid) = current {
            let Ok(frame) = self.frame(cid) else {
                return false;
            };
            if frame.symbols.contains_key(name) {
                return true;
            }
            current = frame.parent;
        }
        false
    }

    pub fn has_own(&self, id: ContextId, name: &str) -> bool {
        self.frame(id)
            .is_ok_and(|f| f.symbols.contains_key(name))
    }

    /// Assign `name`: rebinding the nearest existing binding, or creating one
    /// in `id` when none exists. Global assignments go to the root.
    pub fn set(
        &mut self,
        id: ContextId,
        name: &str,
        value: Value,
        opts: SetOptions,
    ) -> Result<(), ContextError> {
        if opts.global {
            let root = self.root_of(id);
            return self.set_own(root, name, value, opts);
        }
        let mut target = id;
        loop {
            let frame = self.frame(target)?;
            if frame.symbols.contains_key(name) {
                break;
            }
            match frame.parent {
                Some(parent) => target = parent,
                None => {
                    target = id;
                    break;
                }
            }
        }
        self.set_own(target, name, value, opts)
    }

    /// Bind `name` in exactly this context.
    pub fn set_own(
        &mut self,
        id: ContextId,
        name: &str,
        value: Value,
        opts: SetOptions,
    ) -> Result<(), ContextError> {
        let frame = self.frame_mut(id)?;
        let existing_ty = match frame.symbols.get(name) {
            Some(symbol) if symbol.is_constant() && !opts.force_through_const => {
                return Err(ContextError::Constant(name.to_owned()));
            }
            Some(symbol) => symbol.ty.clone(),
            None => None,
        };
        let mut flags = SymbolFlags::ACCESSIBLE;
        if opts.constant {
            flags |= SymbolFlags::CONSTANT;
        }
        if opts.global && frame.global {
            flags |= SymbolFlags::GLOBAL;
        }
        if opts.hidden {
            flags.remove(SymbolFlags::ACCESSIBLE);
        }
        frame.symbols.insert(
            name,
            Symbol {
                value,
                ty: opts.ty.or(existing_ty),
                flags,
            },
        );
        Ok(())
    }

    /// Introduce a new binding. Fails if this context already binds `name`.
    pub fn declare(
        &mut self,
        id: ContextId,
        name: &str,
        value: Value,
        opts: SetOptions,
    ) -> Result<(), ContextError> {
        let target = if opts.global { self.root_of(id) } else { id };
        if self.frame(target)?.symbols.contains_key(name) {
            return Err(ContextError::Redeclared(name.to_owned()));
        }
        self.set_own(target, name, value, opts)
    }

    /// Delete the nearest binding of `name`, returning its value.
    pub fn remove(&mut self, id: ContextId, name: &str) -> Result<Value, ContextError> {
        let mut current = Some(id);
        while let Some(cid) = current {
            let frame = self.frame_mut(cid)?;
            match frame.symbols.get(name).map(Symbol::is_constant) {
                Some(true) => return Err(ContextError::Constant(name.to_owned())),
                Some(false) => {
                    if let Some(symbol) = frame.symbols.remove(name) {
                        return Ok(symbol.value);
                    }
                }
                None => {}
            }
            current = frame.parent;
        }
        Err(ContextError::Undefined(name.to_owned()))
    }

    /// Remove every binding of this context.
    pub fn clear(&mut self, id: ContextId) -> Result<(), ContextError> {
        self.frame_mut(id)?.symbols.clear();
        Ok(())
    }

    /// Names bound directly in this context, in binding order.
    pub fn keys(&self, id: ContextId) -> Result<Vec<String>, ContextError> {
        Ok(self.frame(id)?.symbols.keys().map(str::to_owned).collect())
    }

    /// Accessible bindings of this context as a name-to-value map.
    pub fn symbol_table(&self, id: ContextId) -> Result<OrderedMap<Value>, ContextError> {
        Ok(self
            .frame(id)?
            .symbols
            .iter()
            .filter(|(_, s)| s.is_accessible())
            .map(|(k, s)| (k, s.value.clone()))
            .collect())
    }

    /// Keep this context and all its ancestors alive.
    pub fn pin(&mut self, id: ContextId) {
        let mut current = Some(id);
        while let Some(cid) = current {
            let Ok(frame) = self.frame_mut(cid) else {
                return;
            };
            if frame.pinned {
                return;
            }
            frame.pinned = true;
            current = frame.parent;
        }
    }

    pub fn is_pinned(&self, id: ContextId) -> bool {
        self.frame(id).is_ok_and(|f| f.pinned)
    }

    /// Free a context that was not captured. No-op for pinned or stale handles.
    pub fn release(&mut self, id: ContextId) {
        if id == self.root {
            return;
        }
        let Ok(frame) = self.frame_mut(id) else {
            return;
        };
        if frame.pinned {
            return;
        }
        frame.symbols.clear();
        frame.live = false;
        frame.parent = None;
        frame.generation = frame.generation.wrapping_add(1);
        self.free.push(id.index);
        tracing::trace!(index = id.index, "released context");
    }

    /// Number of contexts currently alive.
    pub fn live_count(&self) -> usize {
        self.frames.iter().filter(|f| f.live).count()
    }
}

impl Default for ContextArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
