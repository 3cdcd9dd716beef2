//! Binary, unary and assignment operators.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // Other
    /// `a ?? b`: `b` when `a` is nil.
    Coalesce,
    /// `a in b`: membership through `b.contains(a)`.
    In,
    /// `a | b`: union type.
    Union,
    /// `a & b`: intersection type.
    Intersection,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    ///
    /// Used in error messages to show the exact operator that failed.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Coalesce => "??",
            Self::In => "in",
            Self::Union => "|",
            Self::Intersection => "&",
        }
    }

    /// Name of the value capability this operator dispatches to.
    ///
    /// Objects may override a capability by holding a function under this name.
    pub const fn capability(self) -> &'static str {
        match self {
            Self::Add => "__add__",
            Self::Sub => "__subtract__",
            Self::Mul => "__multiply__",
            Self::Div => "__divide__",
            Self::Pow => "__pow__",
            Self::Mod => "__mod__",
            Self::Eq | Self::NotEq => "__eq__",
            Self::Lt | Self::LtEq => "__lt__",
            Self::Gt | Self::GtEq => "__gt__",
            Self::And => "__and__",
            Self::Or => "__or__",
            Self::Coalesce => "__nilish__",
            Self::In => "contains",
            Self::Union => "__pipe__",
            Self::Intersection => "__ampersand__",
        }
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`: absolute value.
    Abs,
    /// `!x`: boolean negation.
    Not,
    /// `~T`: negation type.
    Complement,
    /// `?T`: `nil | T`.
    Optional,
}

impl UnaryOp {
    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Abs => "+",
            Self::Not => "!",
            Self::Complement => "~",
            Self::Optional => "?",
        }
    }
}

/// Assignment operators: `=` and the compound forms.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum AssignOp {
    #[default]
    Assign,
    Add,
    Sub,
    Mul,
    Div,
}

impl AssignOp {
    /// The binary operator a compound assignment applies, if any.
    pub const fn binary(self) -> Option<BinaryOp> {
        match self {
            Self::Assign => None,
            Self::Add => Some(BinaryOp::Add),
            Self::Sub => Some(BinaryOp::Sub),
            Self::Mul => Some(BinaryOp::Mul),
            Self::Div => Some(BinaryOp::Div),
        }
    }

    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Add => "+=",
            Self::Sub => "-=",
            Self::Mul => "*=",
            Self::Div => "/=",
        }
    }
}
