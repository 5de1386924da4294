//! Statements.

use crate::arena::Handle;
use crate::expr::{Expression, Literal};
use crate::source::Source;
use crate::variable::Variable;

/// One arm of a switch statement.
///
/// An empty selector list marks the default arm.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseStatement {
    pub selectors: Vec<Literal>,
    /// The arm's block. Required; a case without a body is not valid.
    pub body: Option<Handle<Statement>>,
}

impl CaseStatement {
    pub fn is_default(&self) -> bool {
        self.selectors.is_empty()
    }
}

/// The shape of a statement.
#[derive(Clone, Debug, PartialEq)]
pub enum StatementKind {
    /// A list of statements forming a scope.
    Block(Vec<Handle<Statement>>),
    Assignment {
        lhs: Handle<Expression>,
        rhs: Handle<Expression>,
    },
    Break,
    Continue,
    /// Fragment kill.
    Discard,
    Fallthrough,
    Return {
        value: Option<Handle<Expression>>,
    },
    /// `if (condition) body` followed by `else if` / `else` arms, each an
    /// [`StatementKind::Else`].
    If {
        condition: Handle<Expression>,
        body: Handle<Statement>,
        else_statements: Vec<Handle<Statement>>,
    },
    /// An `else` arm; `condition` is set for `else if`.
    Else {
        condition: Option<Handle<Expression>>,
        body: Handle<Statement>,
    },
    Loop {
        body: Handle<Statement>,
        continuing: Option<Handle<Statement>>,
    },
    /// `cases` are [`StatementKind::Case`] statements.
    Switch {
        condition: Handle<Expression>,
        cases: Vec<Handle<Statement>>,
    },
    Case(CaseStatement),
    VariableDecl(Handle<Variable>),
    /// A call evaluated for its side effects.
    Call(Handle<Expression>),
}

/// A statement node.
#[derive(Clone, Debug)]
pub struct Statement {
    pub kind: StatementKind,
    pub source: Source,
}

impl Statement {
    pub fn new(kind: StatementKind, source: Source) -> Self {
        Self { kind, source }
    }

    /// The statement list if this is a block.
    pub fn as_block(&self) -> Option<&[Handle<Statement>]> {
        match &self.kind {
            StatementKind::Block(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_case(&self) -> Option<&CaseStatement> {
        match &self.kind {
            StatementKind::Case(case) => Some(case),
            _ => None,
        }
    }

    /// Statements after which the rest of the enclosing block cannot run.
    pub fn is_terminator(&self) -> bool {
        matches!(
            self.kind,
            StatementKind::Break
                | StatementKind::Continue
                | StatementKind::Discard
                | StatementKind::Return { .. }
        )
    }
}
