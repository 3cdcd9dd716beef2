use std::cell::{Ref, RefCell};

use super::{Value, ValueInfo};
use crate::errors::invalid_operation;
use crate::{EsError, NativeHost, NativeResult};

/// An object owned by the embedding host and exposed to scripts.
///
/// Only `type_name` and `get` are required; the rest reject the operation.
pub trait HostObject {
    fn type_name(&self) -> &str;

    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value) -> Result<(), EsError> {
        let _ = (key, value);
        Err(invalid_operation("[]=", self.type_name()))
    }

    fn call(&self, host: &mut dyn NativeHost, args: Vec<Value>) -> NativeResult {
        let _ = (host, args);
        Err(invalid_operation("()", self.type_name()))
    }

    fn keys(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Payload of a `Native` value.
pub struct NativeBinding {
    info: RefCell<ValueInfo>,
    object: Box<dyn HostObject>,
}

impl NativeBinding {
    pub(crate) fn new(info: ValueInfo, object: Box<dyn HostObject>) -> Self {
        NativeBinding {
            info: RefCell::new(info),
            object,
        }
    }

    pub fn object(&self) -> &dyn HostObject {
        self.object.as_ref()
    }

    pub fn info(&self) -> Ref<'_, ValueInfo> {
        self.info.borrow()
    }

    pub fn name_if_unnamed(&self, name: &str) {
        let mut info = self.info.borrow_mut();
        if info.name.is_none() {
            info.name = Some(name.to_owned());
        }
    }

    pub fn describe(&self, description: impl Into<String>) {
        self.info.borrow_mut().description = Some(description.into());
    }
}
