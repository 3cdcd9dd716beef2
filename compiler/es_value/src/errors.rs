//! Runtime errors and control-flow unwinding.
//!
//! `EsErrorKind` gives each failure a structured category; its `name()` is the
//! error name scripts see (`TypeError`, `ReferenceError`, ...) and its
//! `Display` is the details text. Factory functions are the public way to
//! build errors.
//!
//! `Unwind` is what evaluation propagates with `?`: either a raised error or
//! one of the `return` / `break` / `continue` signals.

use std::fmt;

use es_ir::Position;

use crate::Value;

/// Result of evaluating a node.
pub type EvalResult = Result<Value, Unwind>;

/// Result of a native function or a fallible runtime helper.
pub type NativeResult = Result<Value, EsError>;

/// Why evaluation of a node stopped before producing a value.
#[derive(Clone, Debug)]
pub enum Unwind {
    /// A raised error, propagating until caught.
    Error(EsError),
    /// `return`, stopping at the nearest function boundary.
    Return(Value),
    /// `break`, stopping at the nearest loop.
    Break,
    /// `continue`, stopping at the nearest loop.
    Continue,
}

impl Unwind {
    /// Name of the signal for error messages.
    pub fn signal_name(&self) -> &'static str {
        match self {
            Unwind::Error(_) => "error",
            Unwind::Return(_) => "return",
            Unwind::Break => "break",
            Unwind::Continue => "continue",
        }
    }
}

impl From<EsError> for Unwind {
    fn from(err: EsError) -> Self {
        Unwind::Error(err)
    }
}

/// Typed error category.
#[derive(Clone, Debug, PartialEq)]
pub enum EsErrorKind {
    InvalidSyntax {
        message: String,
    },

    // TypeError family
    TypeMismatch {
        expected: String,
        actual: String,
        /// String form of the offending value, when useful.
        value: Option<String>,
        /// Where the mismatch happened (parameter, return value, property).
        detail: Option<String>,
    },
    ConstantReassignment {
        name: String,
    },
    Inaccessible {
        name: String,
    },
    Type {
        message: String,
    },

    UndefinedReference {
        name: String,
    },
    MissingProperty {
        key: String,
        on: String,
    },
    InvalidOperation {
        op: String,
        type_name: String,
        detail: Option<String>,
    },
    Import {
        module: String,
        detail: String,
    },

    /// Raised by custom iterators to end a `for` loop.
    EndIterator,
    /// The runtime was used before `initialise`.
    Uninitialised,
    /// `initialise` ran twice.
    AlreadyInitialised,
    RecursionLimit {
        depth: usize,
    },

    /// Raised from script code with a caller-chosen name.
    User {
        name: String,
        details: String,
    },
}

impl EsErrorKind {
    /// The error name visible to scripts.
    pub fn name(&self) -> &str {
        match self {
            Self::InvalidSyntax { .. } => "InvalidSyntaxError",
            Self::TypeMismatch { .. }
            | Self::ConstantReassignment { .. }
            | Self::Inaccessible { .. }
            | Self::Type { .. } => "TypeError",
            Self::UndefinedReference { .. } => "ReferenceError",
            Self::MissingProperty { .. } => "IndexError",
            Self::InvalidOperation { .. } => "InvalidOperationError",
            Self::Import { .. } => "ImportError",
            Self::EndIterator => "EndIterator",
            Self::Uninitialised => "Uninitialised",
            Self::AlreadyInitialised => "InitialisationError",
            Self::RecursionLimit { .. } => "RecursionError",
            Self::User { name, .. } => name,
        }
    }
}

impl fmt::Display for EsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSyntax { message } | Self::Type { message } => write!(f, "{message}"),
            Self::TypeMismatch {
                expected,
                actual,
                value,
                detail,
            } => {
                write!(f, "Expected type '{expected}', got type '{actual}'")?;
                if let Some(value) = value {
                    write!(f, " on value '{value}'")?;
                }
                if let Some(detail) = detail {
                    write!(f, " {detail}")?;
                }
                Ok(())
            }
            Self::ConstantReassignment { name } => {
                write!(f, "Cannot reassign constant '{name}'")
            }
            Self::Inaccessible { name } => write!(f, "Symbol '{name}' is not accessible"),
            Self::UndefinedReference { name } => write!(f, "'{name}' is not defined"),
            Self::MissingProperty { key, on } => {
                write!(f, "'{key}' is not a property of '{on}'")
            }
            Self::InvalidOperation {
                op,
                type_name,
                detail,
            } => {
                write!(f, "Cannot perform '{op}' on value of type '{type_name}'")?;
                if let Some(detail) = detail {
                    write!(f, ": {detail}")?;
                }
                Ok(())
            }
            Self::Import { module, detail } => {
                write!(f, "Cannot import module '{module}': {detail}")
            }
            Self::EndIterator => write!(f, "end of iterator"),
            Self::Uninitialised => write!(f, "runtime has not been initialised"),
            Self::AlreadyInitialised => write!(f, "runtime is already initialised"),
            Self::RecursionLimit { depth } => {
                write!(f, "maximum call depth exceeded (limit: {depth})")
            }
            Self::User { details, .. } => write!(f, "{details}"),
        }
    }
}

/// One entry in an error's traceback.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceFrame {
    /// Where the call happened.
    pub position: Position,
    /// Rendered call, e.g. `myFunc(1, 2)`.
    pub line: String,
}

/// A runtime error.
#[derive(Clone, Debug, PartialEq)]
pub struct EsError {
    pub kind: EsErrorKind,
    /// Innermost position the error was raised at.
    pub pos: Option<Position>,
    /// Call frames the error passed through, innermost first.
    pub traceback: Vec<TraceFrame>,
}

impl EsError {
    fn from_kind(kind: EsErrorKind) -> Self {
        EsError {
            kind,
            pos: None,
            traceback: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Details text without the name.
    pub fn details(&self) -> String {
        self.kind.to_string()
    }

    /// Attach a position unless one is already set.
    #[must_use]
    pub fn at(mut self, pos: &Position) -> Self {
        if self.pos.is_none() {
            self.pos = Some(pos.clone());
        }
        self
    }

    /// Record a call frame the error is leaving.
    pub fn push_frame(&mut self, position: Position, line: impl Into<String>) {
        self.traceback.push(TraceFrame {
            position,
            line: line.into(),
        });
    }

    pub fn is_end_iterator(&self) -> bool {
        self.kind.name() == "EndIterator"
    }
}

impl fmt::Display for EsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.name(), self.kind)?;
        if let Some(pos) = &self.pos {
            write!(f, "\n  at {pos}")?;
        }
        for frame in &self.traceback {
            write!(f, "\n  {} : {}", frame.position, frame.line)?;
        }
        Ok(())
    }
}

impl std::error::Error for EsError {}

// Factories

#[cold]
pub fn invalid_syntax(message: impl Into<String>) -> EsError {
    EsError::from_kind(EsErrorKind::InvalidSyntax {
        message: message.into(),
    })
}

/// Generic `TypeError` with free-form details.
#[cold]
pub fn type_error(message: impl Into<String>) -> EsError {
    EsError::from_kind(EsErrorKind::Type {
        message: message.into(),
    })
}

#[cold]
pub fn type_mismatch(expected: &str, actual: &str) -> EsError {
    EsError::from_kind(EsErrorKind::TypeMismatch {
        expected: expected.to_owned(),
        actual: actual.to_owned(),
        value: None,
        detail: None,
    })
}

/// Type mismatch naming the offending value and where it happened.
#[cold]
pub fn type_mismatch_at(expected: &str, actual: &str, value: &str, detail: &str) -> EsError {
    EsError::from_kind(EsErrorKind::TypeMismatch {
        expected: expected.to_owned(),
        actual: actual.to_owned(),
        value: Some(value.to_owned()),
        detail: Some(detail.to_owned()),
    })
}

#[cold]
pub fn constant_reassignment(name: &str) -> EsError {
    EsError::from_kind(EsErrorKind::ConstantReassignment {
        name: name.to_owned(),
    })
}

#[cold]
pub fn inaccessible(name: &str) -> EsError {
    EsError::from_kind(EsErrorKind::Inaccessible {
        name: name.to_owned(),
    })
}

#[cold]
pub fn undefined_reference(name: &str) -> EsError {
    EsError::from_kind(EsErrorKind::UndefinedReference {
        name: name.to_owned(),
    })
}

#[cold]
pub fn missing_property(key: &str, on: &str) -> EsError {
    EsError::from_kind(EsErrorKind::MissingProperty {
        key: key.to_owned(),
        on: on.to_owned(),
    })
}

#[cold]
pub fn invalid_operation(op: &str, type_name: &str) -> EsError {
    EsError::from_kind(EsErrorKind::InvalidOperation {
        op: op.to_owned(),
        type_name: type_name.to_owned(),
        detail: None,
    })
}

#[cold]
pub fn invalid_operation_with(op: &str, type_name: &str, detail: impl Into<String>) -> EsError {
    EsError::from_kind(EsErrorKind::InvalidOperation {
        op: op.to_owned(),
        type_name: type_name.to_owned(),
        detail: Some(detail.into()),
    })
}

#[cold]
pub fn import_error(module: &str, detail: impl Into<String>) -> EsError {
    EsError::from_kind(EsErrorKind::Import {
        module: module.to_owned(),
        detail: detail.into(),
    })
}

#[cold]
pub fn end_iterator() -> EsError {
    EsError::from_kind(EsErrorKind::EndIterator)
}

#[cold]
pub fn uninitialised() -> EsError {
    EsError::from_kind(EsErrorKind::Uninitialised)
}

#[cold]
pub fn already_initialised() -> EsError {
    EsError::from_kind(EsErrorKind::AlreadyInitialised)
}

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EsError {
    EsError::from_kind(EsErrorKind::RecursionLimit { depth })
}

/// Error raised by script code (`throw`, `Err(...)`).
#[cold]
pub fn user_error(name: impl Into<String>, details: impl Into<String>) -> EsError {
    EsError::from_kind(EsErrorKind::User {
        name: name.into(),
        details: details.into(),
    })
}
