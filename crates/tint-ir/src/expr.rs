//! Expressions.

use std::fmt;

use crate::arena::Handle;
use crate::source::Source;
use crate::symbol::Symbol;
use crate::types::Type;

/// A scalar literal value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Literal {
    Bool(bool),
    Sint(i32),
    Uint(u32),
    Float(f32),
}

impl Literal {
    /// Integer value of an `Sint`/`Uint` literal, used for switch selectors
    /// and constant array indices.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Self::Sint(v) => Some(i64::from(v)),
            Self::Uint(v) => Some(i64::from(v)),
            Self::Bool(_) | Self::Float(_) => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Sint(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}u"),
            Self::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// A unary operator.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum UnaryOp {
    Negation,
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negation => f.write_str("negation"),
            Self::Not => f.write_str("not"),
        }
    }
}

/// A binary operator.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum BinaryOp {
    And,
    Or,
    Xor,
    LogicalAnd,
    LogicalOr,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanEqual,
    GreaterThanEqual,
    ShiftLeft,
    ShiftRight,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::LessThan
                | Self::GreaterThan
                | Self::LessThanEqual
                | Self::GreaterThanEqual
        )
    }

    pub fn is_bitwise(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Xor)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Self::LogicalAnd | Self::LogicalOr)
    }

    pub fn is_shift(self) -> bool {
        matches!(self, Self::ShiftLeft | Self::ShiftRight)
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide | Self::Modulo
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::LogicalAnd => "logical_and",
            Self::LogicalOr => "logical_or",
            Self::Equal => "equal",
            Self::NotEqual => "not_equal",
            Self::LessThan => "less_than",
            Self::GreaterThan => "greater_than",
            Self::LessThanEqual => "less_than_equal",
            Self::GreaterThanEqual => "greater_than_equal",
            Self::ShiftLeft => "shift_left",
            Self::ShiftRight => "shift_right",
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Modulo => "modulo",
        };
        f.write_str(s)
    }
}

/// The shape of an expression.
#[derive(Clone, Debug, PartialEq)]
pub enum ExpressionKind {
    /// A reference to a variable, function or intrinsic by name.
    Identifier(Symbol),
    ScalarConstructor(Literal),
    /// `T(values...)`.
    TypeConstructor {
        ty: Handle<Type>,
        values: Vec<Handle<Expression>>,
    },
    /// A call; `func` is an identifier expression.
    Call {
        func: Handle<Expression>,
        params: Vec<Handle<Expression>>,
    },
    /// `structure.member`, also used for vector swizzles.
    MemberAccessor {
        structure: Handle<Expression>,
        member: Symbol,
    },
    ArrayAccessor {
        array: Handle<Expression>,
        index: Handle<Expression>,
    },
    Binary {
        op: BinaryOp,
        lhs: Handle<Expression>,
        rhs: Handle<Expression>,
    },
    Unary {
        op: UnaryOp,
        expr: Handle<Expression>,
    },
    Bitcast {
        ty: Handle<Type>,
        expr: Handle<Expression>,
    },
}

/// An expression node.
#[derive(Clone, Debug)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub source: Source,
    /// Resolved type; semantic information filled in by the resolver and
    /// never copied by the clone context.
    pub result_type: Option<Handle<Type>>,
}

impl Expression {
    pub fn new(kind: ExpressionKind, source: Source) -> Self {
        Self {
            kind,
            source,
            result_type: None,
        }
    }

    /// Returns the symbol if this is an identifier expression.
    pub fn as_identifier(&self) -> Option<Symbol> {
        match self.kind {
            ExpressionKind::Identifier(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Returns the literal if this is a scalar constructor.
    pub fn as_literal(&self) -> Option<Literal> {
        match self.kind {
            ExpressionKind::ScalarConstructor(lit) => Some(lit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_display() {
        assert_eq!(Literal::Sint(-3).to_string(), "-3");
        assert_eq!(Literal::Uint(7).to_string(), "7u");
        assert_eq!(Literal::Float(1.0).to_string(), "1.0");
        assert_eq!(Literal::Bool(true).to_string(), "true");
    }

    #[test]
    fn literal_integer_value() {
        assert_eq!(Literal::Uint(4).as_i64(), Some(4));
        assert_eq!(Literal::Float(4.0).as_i64(), None);
    }

    #[test]
    fn binary_op_classes() {
        assert!(BinaryOp::LessThanEqual.is_comparison());
        assert!(BinaryOp::Xor.is_bitwise());
        assert!(!BinaryOp::LogicalAnd.is_bitwise());
        assert!(BinaryOp::Modulo.is_arithmetic());
    }
}
