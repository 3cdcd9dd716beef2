//! ES Value - runtime data model for the EntropyScript runtime.
//!
//! This crate holds everything the evaluator manipulates but does not decide:
//! - `Value`, its heap payloads and the factory methods that build them
//! - Type descriptors (`TypeDescriptor`, `TypeKind`, `Primordial`)
//! - Function values and the `NativeHost` interface natives call back through
//! - Scopes: `ContextArena`, `ContextId`, `Symbol`
//! - Errors (`EsError`, `EsErrorKind`) and the `Unwind` control-flow signal
//!
//! Type *algebra* (subtyping, inclusion) and the call protocol live in
//! `es_eval`; this crate only stores what they need.

mod context;
pub mod errors;
mod ordered_map;
mod value;

pub use context::{ContextArena, ContextError, ContextId, SetOptions, Symbol, SymbolFlags};
pub use errors::{EsError, EsErrorKind, EvalResult, NativeResult, TraceFrame, Unwind};
pub use ordered_map::OrderedMap;
pub use value::{
    format_number, FunctionBody, FunctionValue, Heap, HostObject, NativeBinding, NativeCall,
    NativeFn, NativeHost, ObjectData, Param, ParamDefault, Primordial, TypeDescriptor, TypeId,
    TypeKind, UserType, Value, ValueInfo, WeakHeap,
};
