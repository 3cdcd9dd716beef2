//! Runtime values.
//!
//! Every heap payload sits behind `Heap<T>`, whose constructor is private to
//! this crate; the factory methods on `Value` are the only way to build one.
//!
//! ```text
//! let s = Value::string("hello");              // OK
//! let a = Value::array(vec![Value::Number(1.0)]); // OK
//! let s = Value::String(Heap::new(..));        // ERROR: Heap::new is pub(crate)
//! ```
//!
//! Values are single-threaded (`Rc` + `RefCell`). Arrays and objects are
//! mutable in place and shared by reference, matching script semantics.

mod format;
mod function;
mod heap;
mod info;
mod native;
mod object;
mod types;

use std::cell::RefCell;
use std::fmt;

pub use format::format_number;
pub use function::{
    FunctionBody, FunctionValue, NativeCall, NativeFn, NativeHost, Param, ParamDefault,
};
pub use heap::{Heap, WeakHeap};
pub use info::ValueInfo;
pub use native::{HostObject, NativeBinding};
pub use object::ObjectData;
pub use types::{Primordial, TypeDescriptor, TypeId, TypeKind, UserType};

use crate::{EsError, OrderedMap};

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Number(f64),
    String(Heap<String>),
    Bool(bool),
    Null,
    Array(Heap<RefCell<Vec<Value>>>),
    Object(Heap<ObjectData>),
    Function(Heap<FunctionValue>),
    Type(Heap<TypeDescriptor>),
    Error(Heap<EsError>),
    /// Host object exposed to scripts.
    Native(Heap<NativeBinding>),
}

// Factory methods

impl Value {
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Heap::new(s.into()))
    }

    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(RefCell::new(items)))
    }

    /// A plain object.
    pub fn object(entries: OrderedMap<Value>) -> Self {
        Value::Object(Heap::new(ObjectData::new(entries, None)))
    }

    /// An object that is an instance of the given type.
    pub fn instance(entries: OrderedMap<Value>, ty: Value) -> Self {
        Value::Object(Heap::new(ObjectData::new(entries, Some(ty))))
    }

    pub fn function(function: FunctionValue) -> Self {
        Value::Function(Heap::new(function))
    }

    pub fn type_value(descriptor: TypeDescriptor) -> Self {
        Value::Type(Heap::new(descriptor))
    }

    /// The shared type value for a primordial type.
    pub fn primordial(kind: Primordial) -> Self {
        types::primordial_value(kind)
    }

    pub fn error(error: EsError) -> Self {
        Value::Error(Heap::new(error))
    }

    pub fn native(info: ValueInfo, object: Box<dyn HostObject>) -> Self {
        Value::Native(Heap::new(NativeBinding::new(info, object)))
    }
}

// Accessors

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Heap<ObjectData>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Heap<FunctionValue>> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&Heap<TypeDescriptor>> {
        match self {
            Value::Type(t) => Some(t),
            _ => None,
        }
    }

    /// The primordial type of this variant, ignoring user types.
    pub fn kind(&self) -> Primordial {
        match self {
            Value::Number(_) => Primordial::Num,
            Value::String(_) => Primordial::Str,
            Value::Bool(_) => Primordial::Bool,
            Value::Null => Primordial::Null,
            Value::Array(_) => Primordial::Arr,
            Value::Object(_) => Primordial::Obj,
            Value::Function(_) => Primordial::Func,
            Value::Type(_) => Primordial::Type,
            Value::Error(_) => Primordial::Err,
            Value::Native(_) => Primordial::Any,
        }
    }

    /// The type value of this value: an instance's user type, or its primordial type.
    pub fn type_of(&self) -> Value {
        match self {
            Value::Object(o) => o
                .type_value()
                .unwrap_or_else(|| Value::primordial(Primordial::Obj)),
            other => Value::primordial(other.kind()),
        }
    }

    /// Name of this value's type for messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::Object(o) => match o.type_value() {
                Some(Value::Type(ty)) => ty.name(),
                _ => Primordial::Obj.name().to_owned(),
            },
            Value::Native(n) => n.object().type_name().to_owned(),
            other => other.kind().name().to_owned(),
        }
    }

    /// Truthiness used by conditions and logical operators.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n > 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Bool(b) => *b,
            Value::Null => false,
            Value::Array(items) => !items.borrow().is_empty(),
            Value::Object(_)
            | Value::Function(_)
            | Value::Type(_)
            | Value::Error(_)
            | Value::Native(_) => true,
        }
    }

    /// Identity: same scalar value, or the same heap payload.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a.as_str() == b.as_str(),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => Heap::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Heap::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Heap::ptr_eq(a, b),
            (Value::Type(a), Value::Type(b)) => Heap::ptr_eq(a, b),
            (Value::Error(a), Value::Error(b)) => Heap::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Heap::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Metadata of the value. Scalars and collections derive it from their type.
    pub fn info(&self) -> ValueInfo {
        match self {
            Value::Function(f) => f.info().clone(),
            Value::Type(t) => t.info().clone(),
            Value::Native(n) => n.info().clone(),
            other => ValueInfo::builtin(other.kind().name()),
        }
    }

    /// Give an anonymous function, type or host object a name.
    pub fn name_if_unnamed(&self, name: &str) {
        match self {
            Value::Function(f) => f.name_if_unnamed(name),
            Value::Type(t) => t.name_if_unnamed(name),
            Value::Native(n) => n.name_if_unnamed(name),
            _ => {}
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s.as_str()),
            other => write!(f, "{}", other.repr()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind().name(), self.repr())
    }
}
