//! The closed set of AST node kinds and structural validity.
//!
//! A node is structurally valid when every child handle belongs to the
//! program and every required child is present and itself valid. Handles
//! from other programs make a node invalid instead of panicking.

use crate::arena::Handle;
use crate::expr::{Expression, ExpressionKind};
use crate::func::Function;
use crate::program::Program;
use crate::stmt::{Statement, StatementKind};
use crate::symbol::Symbol;
use crate::types::Type;
use crate::variable::Variable;

/// A handle to any AST node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    Expression(Handle<Expression>),
    Statement(Handle<Statement>),
    Variable(Handle<Variable>),
    Function(Handle<Function>),
}

impl From<Handle<Expression>> for Node {
    fn from(h: Handle<Expression>) -> Self {
        Self::Expression(h)
    }
}

impl From<Handle<Statement>> for Node {
    fn from(h: Handle<Statement>) -> Self {
        Self::Statement(h)
    }
}

impl From<Handle<Variable>> for Node {
    fn from(h: Handle<Variable>) -> Self {
        Self::Variable(h)
    }
}

impl From<Handle<Function>> for Node {
    fn from(h: Handle<Function>) -> Self {
        Self::Function(h)
    }
}

impl Node {
    pub fn is_valid(self, program: &Program) -> bool {
        match self {
            Self::Expression(h) => program.is_valid_expression(h),
            Self::Statement(h) => program.is_valid_statement(h),
            Self::Variable(h) => program.is_valid_variable(h),
            Self::Function(h) => program.is_valid_function(h),
        }
    }

    /// Debug dump of the node, indented by `indent` spaces.
    pub fn to_str(self, program: &Program, indent: usize) -> String {
        let mut out = String::new();
        match self {
            Self::Expression(h) => crate::display::write_expr(&mut out, program, h, indent),
            Self::Statement(h) => crate::display::write_stmt(&mut out, program, h, indent),
            Self::Variable(h) => crate::display::write_var(&mut out, program, h, indent),
            Self::Function(h) => crate::display::write_func(&mut out, program, h, indent),
        }
        out
    }
}

impl Program {
    fn is_valid_symbol(&self, symbol: Symbol) -> bool {
        self.symbols().try_name_for(symbol).is_ok()
    }

    fn is_valid_type(&self, ty: Handle<Type>) -> bool {
        self.types().contains(ty)
    }

    pub fn is_valid_expression(&self, handle: Handle<Expression>) -> bool {
        let Some(expr) = self.expressions().try_get(handle) else {
            return false;
        };
        match &expr.kind {
            ExpressionKind::Identifier(symbol) => self.is_valid_symbol(*symbol),
            ExpressionKind::ScalarConstructor(_) => true,
            ExpressionKind::TypeConstructor { ty, values } => {
                self.is_valid_type(*ty) && values.iter().all(|&v| self.is_valid_expression(v))
            }
            ExpressionKind::Call { func, params } => {
                self.is_valid_expression(*func)
                    && params.iter().all(|&p| self.is_valid_expression(p))
            }
            ExpressionKind::MemberAccessor { structure, member } => {
                self.is_valid_expression(*structure) && self.is_valid_symbol(*member)
            }
            ExpressionKind::ArrayAccessor { array, index } => {
                self.is_valid_expression(*array) && self.is_valid_expression(*index)
            }
            ExpressionKind::Binary { lhs, rhs, .. } => {
                self.is_valid_expression(*lhs) && self.is_valid_expression(*rhs)
            }
            ExpressionKind::Unary { expr, .. } => self.is_valid_expression(*expr),
            ExpressionKind::Bitcast { ty, expr } => {
                self.is_valid_type(*ty) && self.is_valid_expression(*expr)
            }
        }
    }

    fn are_valid_statements(&self, list: &[Handle<Statement>]) -> bool {
        list.iter().all(|&s| self.is_valid_statement(s))
    }

    pub fn is_valid_statement(&self, handle: Handle<Statement>) -> bool {
        let Some(stmt) = self.statements().try_get(handle) else {
            return false;
        };
        match &stmt.kind {
            StatementKind::Block(list) => self.are_valid_statements(list),
            StatementKind::Assignment { lhs, rhs } => {
                self.is_valid_expression(*lhs) && self.is_valid_expression(*rhs)
            }
            StatementKind::Break
            | StatementKind::Continue
            | StatementKind::Discard
            | StatementKind::Fallthrough => true,
            StatementKind::Return { value } => value.is_none_or(|v| self.is_valid_expression(v)),
            StatementKind::If {
                condition,
                body,
                else_statements,
            } => {
                if !self.is_valid_expression(*condition) || !self.is_valid_statement(*body) {
                    return false;
                }
                // Only the last else arm may omit its condition.
                let mut found_else = false;
                for &e in else_statements {
                    if found_else || !self.is_valid_statement(e) {
                        return false;
                    }
                    match &self.stmt(e).kind {
                        StatementKind::Else { condition, .. } => {
                            found_else = condition.is_none();
                        }
                        _ => return false,
                    }
                }
                true
            }
            StatementKind::Else { condition, body } => {
                condition.is_none_or(|c| self.is_valid_expression(c))
                    && self.is_valid_statement(*body)
            }
            StatementKind::Loop { body, continuing } => {
                self.is_valid_statement(*body)
                    && continuing.is_none_or(|c| self.is_valid_statement(c))
            }
            StatementKind::Switch { condition, cases } => {
                self.is_valid_expression(*condition)
                    && cases.iter().all(|&c| {
                        self.is_valid_statement(c)
                            && matches!(self.stmt(c).kind, StatementKind::Case(_))
                    })
            }
            StatementKind::Case(case) => case.body.is_some_and(|b| self.is_valid_statement(b)),
            StatementKind::VariableDecl(var) => self.is_valid_variable(*var),
            StatementKind::Call(expr) => {
                self.is_valid_expression(*expr)
                    && matches!(self.expr(*expr).kind, ExpressionKind::Call { .. })
            }
        }
    }

    pub fn is_valid_variable(&self, handle: Handle<Variable>) -> bool {
        let Some(var) = self.variables().try_get(handle) else {
            return false;
        };
        self.is_valid_symbol(var.symbol)
            && self.is_valid_type(var.ty)
            && var.constructor.is_none_or(|c| self.is_valid_expression(c))
    }

    pub fn is_valid_function(&self, handle: Handle<Function>) -> bool {
        let Some(func) = self.functions().try_get(handle) else {
            return false;
        };
        self.is_valid_symbol(func.symbol)
            && self.is_valid_type(func.return_type)
            && func.params.iter().all(|&p| self.is_valid_variable(p))
            && self.is_valid_statement(func.body)
    }
}
