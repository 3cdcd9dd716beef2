//! Type descriptors.
//!
//! Types are first-class values. A descriptor is one of:
//! - a **primordial** type (`Any`, `Num`, `Str`, ...) with a fixed id,
//! - a **user** type created by a class definition,
//! - a **combinator**: union, intersection or negation of two (one) operands.
//!
//! Combinator operands are usually `Type` values but may be plain
//! `Number`/`String`/`Bool` values acting as singleton types.
//!
//! Nominal identity is the `TypeId`. Specialising a type with generics
//! (`Arr<|Num|>`) copies the descriptor and keeps its id.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use smallvec::SmallVec;

use super::heap::{Heap, WeakHeap};
use super::object::ObjectData;
use super::{Value, ValueInfo};
use crate::{ContextId, OrderedMap};

/// Nominal identity of a type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeId(u32);

/// First id handed to non-primordial types.
const FIRST_DYNAMIC_ID: u32 = 100;

impl TypeId {
    /// Allocate an id for a new user or combinator type.
    pub fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(FIRST_DYNAMIC_ID);
        TypeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// The ten built-in types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Primordial {
    Any,
    Num,
    Str,
    Bool,
    Func,
    Arr,
    Obj,
    Type,
    Err,
    Null,
}

impl Primordial {
    pub const ALL: [Primordial; 10] = [
        Primordial::Any,
        Primordial::Num,
        Primordial::Str,
        Primordial::Bool,
        Primordial::Func,
        Primordial::Arr,
        Primordial::Obj,
        Primordial::Type,
        Primordial::Err,
        Primordial::Null,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Primordial::Any => "Any",
            Primordial::Num => "Num",
            Primordial::Str => "Str",
            Primordial::Bool => "Bool",
            Primordial::Func => "Func",
            Primordial::Arr => "Arr",
            Primordial::Obj => "Obj",
            Primordial::Type => "Type",
            Primordial::Err => "Err",
            Primordial::Null => "Null",
        }
    }

    #[inline]
    pub const fn id(self) -> TypeId {
        TypeId(self as u32)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Payload of a class-defined type.
#[derive(Clone)]
pub struct UserType {
    /// Parent type; `Obj` unless the class extends something else.
    pub extends: Option<Value>,
    /// Function values copied onto every instance.
    pub methods: Vec<Value>,
    /// Declared property name to type.
    pub properties: OrderedMap<Value>,
    pub init: Option<Value>,
    /// Context the class was defined in.
    pub closure: ContextId,
    pub is_abstract: bool,
    /// Shared across generic specialisations of the same type.
    instances: Rc<RefCell<Vec<WeakHeap<ObjectData>>>>,
}

impl UserType {
    pub fn new(closure: ContextId) -> Self {
        UserType {
            extends: None,
            methods: Vec::new(),
            properties: OrderedMap::new(),
            init: None,
            closure,
            is_abstract: false,
            instances: Rc::default(),
        }
    }

    /// Remember an instance without keeping it alive.
    pub fn register_instance(&self, instance: &Heap<ObjectData>) {
        self.instances.borrow_mut().push(Heap::downgrade(instance));
    }

    /// Live instances, pruning dropped ones.
    pub fn instances(&self) -> Vec<Value> {
        let mut registry = self.instances.borrow_mut();
        registry.retain(|weak| weak.upgrade().is_some());
        registry
            .iter()
            .filter_map(WeakHeap::upgrade)
            .map(Value::Object)
            .collect()
    }
}

/// What a descriptor describes.
#[derive(Clone)]
pub enum TypeKind {
    Primordial(Primordial),
    User(UserType),
    Union(Value, Value),
    Intersection(Value, Value),
    Not(Value),
}

/// A type value's payload.
#[derive(Clone)]
pub struct TypeDescriptor {
    pub id: TypeId,
    info: RefCell<ValueInfo>,
    pub kind: TypeKind,
    /// Generic arguments of a specialisation; empty when unspecialised.
    pub generics: SmallVec<[Value; 2]>,
}

impl TypeDescriptor {
    pub(crate) fn primordial(kind: Primordial) -> Self {
        TypeDescriptor {
            id: kind.id(),
            info: RefCell::new(ValueInfo::builtin(kind.name())),
            kind: TypeKind::Primordial(kind),
            generics: SmallVec::new(),
        }
    }

    pub fn user(info: ValueInfo, user: UserType) -> Self {
        TypeDescriptor {
            id: TypeId::fresh(),
            info: RefCell::new(info),
            kind: TypeKind::User(user),
            generics: SmallVec::new(),
        }
    }

    /// A union, intersection or negation. Takes a fresh id.
    pub fn combinator(kind: TypeKind) -> Self {
        TypeDescriptor {
            id: TypeId::fresh(),
            info: RefCell::new(ValueInfo::default()),
            kind,
            generics: SmallVec::new(),
        }
    }

    /// Copy of this type carrying generic arguments. Keeps the id.
    #[must_use]
    pub fn specialise(&self, generics: impl IntoIterator<Item = Value>) -> Self {
        let mut copy = self.clone();
        copy.generics = generics.into_iter().collect();
        copy
    }

    pub fn info(&self) -> Ref<'_, ValueInfo> {
        self.info.borrow()
    }

    /// Name a type that does not have one yet.
    pub fn name_if_unnamed(&self, name: &str) {
        let mut info = self.info.borrow_mut();
        if info.name.is_none() {
            info.name = Some(name.to_owned());
        }
    }

    pub fn describe(&self, description: impl Into<String>) {
        self.info.borrow_mut().description = Some(description.into());
    }

    pub fn as_primordial(&self) -> Option<Primordial> {
        match self.kind {
            TypeKind::Primordial(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<&UserType> {
        match &self.kind {
            TypeKind::User(user) => Some(user),
            _ => None,
        }
    }

    #[inline]
    pub fn is_any(&self) -> bool {
        self.id == Primordial::Any.id()
    }

    pub fn is_combinator(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Union(..) | TypeKind::Intersection(..) | TypeKind::Not(_)
        )
    }

    /// Display name: the declared name, or a rendering of the combinator.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

/// Render a combinator operand (a type or a literal singleton).
fn operand(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Type(ty) if ty.is_combinator() && ty.info().name.is_none() => write!(f, "({ty})"),
        Value::Type(ty) => write!(f, "{ty}"),
        other => write!(f, "{}", other.repr()),
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.info.borrow().name {
            write!(f, "{name}")?;
        } else {
            match &self.kind {
                TypeKind::Primordial(p) => write!(f, "{}", p.name())?,
                TypeKind::User(_) => write!(f, "(anonymous)")?,
                TypeKind::Union(l, r) => {
                    operand(f, l)?;
                    write!(f, " | ")?;
                    operand(f, r)?;
                }
                TypeKind::Intersection(l, r) => {
                    operand(f, l)?;
                    write!(f, " & ")?;
                    operand(f, r)?;
                }
                TypeKind::Not(inner) => {
                    write!(f, "~")?;
                    operand(f, inner)?;
                }
            }
        }
        if !self.generics.is_empty() {
            write!(f, "<|")?;
            for (i, generic) in self.generics.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                operand(f, generic)?;
            }
            write!(f, "|>")?;
        }
        Ok(())
    }
}

thread_local! {
    static PRIMORDIAL_TYPES: [Value; 10] = std::array::from_fn(|i| {
        Value::Type(Heap::new(TypeDescriptor::primordial(Primordial::ALL[i])))
    });
}

/// The shared value for a primordial type.
pub(crate) fn primordial_value(kind: Primordial) -> Value {
    PRIMORDIAL_TYPES.with(|types| types[kind.index()].clone())
}
