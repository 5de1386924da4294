//! Convenience constructors on [`ProgramBuilder`].
//!
//! Every node created through these helpers is stamped with the builder's
//! current source, see [`ProgramBuilder::set_source`].

use crate::arena::Handle;
use crate::expr::{BinaryOp, Expression, ExpressionKind, Literal, UnaryOp};
use crate::func::{Function, FunctionDecoration, FunctionSemantics};
use crate::program::ProgramBuilder;
use crate::source::Source;
use crate::stmt::{CaseStatement, Statement, StatementKind};
use crate::symbol::Symbol;
use crate::types::{StructMember, StructType, Type};
use crate::variable::{StorageClass, Variable, VariableDecoration};

impl ProgramBuilder {
    /// Sets the source attached to nodes created from now on.
    pub fn set_source(&mut self, source: Source) {
        self.source = source;
    }

    pub fn current_source(&self) -> &Source {
        &self.source
    }

    pub fn sym(&mut self, name: &str) -> Symbol {
        self.symbols_mut().register(name)
    }

    pub fn create_expr(&mut self, kind: ExpressionKind) -> Handle<Expression> {
        let source = self.source.clone();
        self.create_expression(Expression::new(kind, source))
    }

    pub fn create_stmt(&mut self, kind: StatementKind) -> Handle<Statement> {
        let source = self.source.clone();
        self.create_statement(Statement::new(kind, source))
    }

    // Expressions.

    pub fn ident(&mut self, name: &str) -> Handle<Expression> {
        let symbol = self.sym(name);
        self.create_expr(ExpressionKind::Identifier(symbol))
    }

    pub fn lit(&mut self, literal: Literal) -> Handle<Expression> {
        self.create_expr(ExpressionKind::ScalarConstructor(literal))
    }

    pub fn lit_bool(&mut self, value: bool) -> Handle<Expression> {
        self.lit(Literal::Bool(value))
    }

    pub fn lit_i32(&mut self, value: i32) -> Handle<Expression> {
        self.lit(Literal::Sint(value))
    }

    pub fn lit_u32(&mut self, value: u32) -> Handle<Expression> {
        self.lit(Literal::Uint(value))
    }

    pub fn lit_f32(&mut self, value: f32) -> Handle<Expression> {
        self.lit(Literal::Float(value))
    }

    pub fn construct(
        &mut self,
        ty: Handle<Type>,
        values: Vec<Handle<Expression>>,
    ) -> Handle<Expression> {
        self.create_expr(ExpressionKind::TypeConstructor { ty, values })
    }

    pub fn call(&mut self, name: &str, params: Vec<Handle<Expression>>) -> Handle<Expression> {
        let func = self.ident(name);
        self.create_expr(ExpressionKind::Call { func, params })
    }

    pub fn member(&mut self, structure: Handle<Expression>, member: &str) -> Handle<Expression> {
        let member = self.sym(member);
        self.create_expr(ExpressionKind::MemberAccessor { structure, member })
    }

    pub fn index_accessor(
        &mut self,
        array: Handle<Expression>,
        index: Handle<Expression>,
    ) -> Handle<Expression> {
        self.create_expr(ExpressionKind::ArrayAccessor { array, index })
    }

    pub fn binary(
        &mut self,
        op: BinaryOp,
        lhs: Handle<Expression>,
        rhs: Handle<Expression>,
    ) -> Handle<Expression> {
        self.create_expr(ExpressionKind::Binary { op, lhs, rhs })
    }

    pub fn add(&mut self, lhs: Handle<Expression>, rhs: Handle<Expression>) -> Handle<Expression> {
        self.binary(BinaryOp::Add, lhs, rhs)
    }

    pub fn unary(&mut self, op: UnaryOp, expr: Handle<Expression>) -> Handle<Expression> {
        self.create_expr(ExpressionKind::Unary { op, expr })
    }

    pub fn bitcast(&mut self, ty: Handle<Type>, expr: Handle<Expression>) -> Handle<Expression> {
        self.create_expr(ExpressionKind::Bitcast { ty, expr })
    }

    // Statements.

    pub fn block(&mut self, statements: Vec<Handle<Statement>>) -> Handle<Statement> {
        self.create_stmt(StatementKind::Block(statements))
    }

    pub fn assign(
        &mut self,
        lhs: Handle<Expression>,
        rhs: Handle<Expression>,
    ) -> Handle<Statement> {
        self.create_stmt(StatementKind::Assignment { lhs, rhs })
    }

    pub fn ret(&mut self, value: Option<Handle<Expression>>) -> Handle<Statement> {
        self.create_stmt(StatementKind::Return { value })
    }

    pub fn break_(&mut self) -> Handle<Statement> {
        self.create_stmt(StatementKind::Break)
    }

    pub fn continue_(&mut self) -> Handle<Statement> {
        self.create_stmt(StatementKind::Continue)
    }

    pub fn discard(&mut self) -> Handle<Statement> {
        self.create_stmt(StatementKind::Discard)
    }

    pub fn fallthrough(&mut self) -> Handle<Statement> {
        self.create_stmt(StatementKind::Fallthrough)
    }

    pub fn if_(
        &mut self,
        condition: Handle<Expression>,
        body: Vec<Handle<Statement>>,
        else_statements: Vec<Handle<Statement>>,
    ) -> Handle<Statement> {
        let body = self.block(body);
        self.create_stmt(StatementKind::If {
            condition,
            body,
            else_statements,
        })
    }

    pub fn else_(
        &mut self,
        condition: Option<Handle<Expression>>,
        body: Vec<Handle<Statement>>,
    ) -> Handle<Statement> {
        let body = self.block(body);
        self.create_stmt(StatementKind::Else { condition, body })
    }

    pub fn loop_(
        &mut self,
        body: Vec<Handle<Statement>>,
        continuing: Option<Vec<Handle<Statement>>>,
    ) -> Handle<Statement> {
        let body = self.block(body);
        let continuing = continuing.map(|c| self.block(c));
        self.create_stmt(StatementKind::Loop { body, continuing })
    }

    pub fn switch(
        &mut self,
        condition: Handle<Expression>,
        cases: Vec<Handle<Statement>>,
    ) -> Handle<Statement> {
        self.create_stmt(StatementKind::Switch { condition, cases })
    }

    pub fn case(
        &mut self,
        selectors: Vec<Literal>,
        body: Vec<Handle<Statement>>,
    ) -> Handle<Statement> {
        let body = self.block(body);
        self.create_stmt(StatementKind::Case(CaseStatement {
            selectors,
            body: Some(body),
        }))
    }

    pub fn default_case(&mut self, body: Vec<Handle<Statement>>) -> Handle<Statement> {
        self.case(Vec::new(), body)
    }

    pub fn decl(&mut self, var: Handle<Variable>) -> Handle<Statement> {
        self.create_stmt(StatementKind::VariableDecl(var))
    }

    pub fn call_stmt(&mut self, call: Handle<Expression>) -> Handle<Statement> {
        self.create_stmt(StatementKind::Call(call))
    }

    // Variables.

    /// Creates a variable without adding it to the module.
    pub fn variable(
        &mut self,
        name: &str,
        storage_class: StorageClass,
        ty: Handle<Type>,
        is_const: bool,
        constructor: Option<Handle<Expression>>,
        decorations: Vec<VariableDecoration>,
    ) -> Handle<Variable> {
        let symbol = self.sym(name);
        let source = self.source.clone();
        self.create_variable(Variable {
            symbol,
            storage_class,
            ty,
            is_const,
            constructor,
            decorations,
            source,
        })
    }

    /// A function-scope `var`.
    pub fn local_var(
        &mut self,
        name: &str,
        ty: Handle<Type>,
        constructor: Option<Handle<Expression>>,
    ) -> Handle<Variable> {
        self.variable(name, StorageClass::Function, ty, false, constructor, Vec::new())
    }

    /// A function-scope `const`.
    pub fn local_const(
        &mut self,
        name: &str,
        ty: Handle<Type>,
        constructor: Handle<Expression>,
    ) -> Handle<Variable> {
        self.variable(name, StorageClass::None, ty, true, Some(constructor), Vec::new())
    }

    pub fn param(&mut self, name: &str, ty: Handle<Type>) -> Handle<Variable> {
        self.variable(name, StorageClass::None, ty, true, None, Vec::new())
    }

    /// A module-scope `var`, appended to the module's global variables.
    pub fn global_var(
        &mut self,
        name: &str,
        storage_class: StorageClass,
        ty: Handle<Type>,
        constructor: Option<Handle<Expression>>,
        decorations: Vec<VariableDecoration>,
    ) -> Handle<Variable> {
        let var = self.variable(name, storage_class, ty, false, constructor, decorations);
        self.add_global_variable(var);
        var
    }

    /// A module-scope `const`, appended to the module's global variables.
    pub fn global_const(
        &mut self,
        name: &str,
        ty: Handle<Type>,
        constructor: Handle<Expression>,
    ) -> Handle<Variable> {
        let var = self.variable(name, StorageClass::None, ty, true, Some(constructor), Vec::new());
        self.add_global_variable(var);
        var
    }

    // Functions and constructed types.

    /// Creates a function and appends it to the module.
    pub fn function(
        &mut self,
        name: &str,
        params: Vec<Handle<Variable>>,
        return_type: Handle<Type>,
        body: Vec<Handle<Statement>>,
        decorations: Vec<FunctionDecoration>,
    ) -> Handle<Function> {
        let symbol = self.sym(name);
        let body = self.block(body);
        let source = self.source.clone();
        let func = self.create_function(Function {
            symbol,
            params,
            return_type,
            body,
            decorations,
            source,
            sem: FunctionSemantics::default(),
        });
        self.add_function(func);
        func
    }

    /// Declares a struct type at module scope. Members are `(name, type, offset)`.
    pub fn structure(
        &mut self,
        name: &str,
        members: Vec<(&str, Handle<Type>, u32)>,
        is_block: bool,
    ) -> Handle<Type> {
        let name = self.sym(name);
        let members = members
            .into_iter()
            .map(|(member, ty, offset)| StructMember {
                name: self.sym(member),
                ty,
                offset,
            })
            .collect();
        let ty = self.types_mut().structure(StructType {
            name,
            members,
            is_block,
        });
        self.add_constructed_type(ty);
        ty
    }

    /// Declares a type alias at module scope.
    pub fn alias(&mut self, name: &str, subtype: Handle<Type>) -> Handle<Type> {
        let name = self.sym(name);
        let ty = self.types_mut().alias(name, subtype);
        self.add_constructed_type(ty);
        ty
    }
}
