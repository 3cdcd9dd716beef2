//! Reference-counted heap wrapper.
//!
//! The constructor is crate-private so every heap value goes through a
//! factory method on `Value`.

use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

/// Shared, reference-counted payload of a heap `Value`.
pub struct Heap<T>(Rc<T>);

impl<T> Heap<T> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap(Rc::new(value))
    }

    /// Identity comparison.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Non-owning handle to the same payload.
    pub fn downgrade(this: &Self) -> WeakHeap<T> {
        WeakHeap(Rc::downgrade(&this.0))
    }
}

impl<T> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Rc::clone(&self.0))
    }
}

impl<T> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: fmt::Display> fmt::Display for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Weak counterpart of `Heap`.
pub struct WeakHeap<T>(Weak<T>);

impl<T> WeakHeap<T> {
    pub fn upgrade(&self) -> Option<Heap<T>> {
        self.0.upgrade().map(Heap)
    }
}

impl<T> Clone for WeakHeap<T> {
    fn clone(&self) -> Self {
        WeakHeap(Weak::clone(&self.0))
    }
}
