use std::cell::{Ref, RefCell};

use super::Value;
use crate::OrderedMap;

/// Payload of an `Object` value: ordered entries plus an optional user type.
pub struct ObjectData {
    entries: RefCell<OrderedMap<Value>>,
    /// `None` for plain objects (`Obj`).
    ty: RefCell<Option<Value>>,
}

impl ObjectData {
    pub(crate) fn new(entries: OrderedMap<Value>, ty: Option<Value>) -> Self {
        ObjectData {
            entries: RefCell::new(entries),
            ty: RefCell::new(ty),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.entries.borrow_mut().insert(key, value);
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.entries.borrow_mut().remove(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().map(str::to_owned).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Borrow the entries. Do not hold across calls that may mutate this object.
    pub fn entries(&self) -> Ref<'_, OrderedMap<Value>> {
        self.entries.borrow()
    }

    /// Owned copy of the entries.
    pub fn snapshot(&self) -> OrderedMap<Value> {
        self.entries.borrow().clone()
    }

    /// The user type this object is an instance of.
    pub fn type_value(&self) -> Option<Value> {
        self.ty.borrow().clone()
    }

    pub fn set_type(&self, ty: Value) {
        *self.ty.borrow_mut() = Some(ty);
    }
}
