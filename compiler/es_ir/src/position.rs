//! Source positions.
//!
//! Every AST node carries the position it was parsed from. Errors pick up the
//! position of the innermost node that raised them.

use std::fmt;
use std::sync::Arc;

/// File tag used for positions inside built-in code.
pub const BUILTIN_FILE: &str = "built-in";

/// Location of a node in its source file.
///
/// `line` and `col` are zero-based; `Display` renders them one-based.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub file: Arc<str>,
    /// Byte offset from the start of the file.
    pub offset: u32,
    pub line: u32,
    pub col: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(file: impl Into<Arc<str>>, offset: u32, line: u32, col: u32) -> Self {
        Position {
            file: file.into(),
            offset,
            line,
            col,
        }
    }

    /// Position used for values and errors produced by built-in code.
    pub fn builtin() -> Self {
        Position::new(BUILTIN_FILE, 0, 0, 0)
    }

    /// Check if this position points into built-in code.
    pub fn is_builtin(&self) -> bool {
        &*self.file == BUILTIN_FILE
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File {}, {}:{}",
            self.file,
            self.line.saturating_add(1),
            self.col.saturating_add(1)
        )
    }
}
