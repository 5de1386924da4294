//! Deep cloning of AST nodes between programs.
//!
//! A [`CloneContext`] reads from a source [`Program`] and allocates into a
//! destination [`ProgramBuilder`]. Every node is cloned at most once per
//! context, so shared children stay shared in the destination. Semantic
//! fields (resolved types, function summaries) are never copied.
//!
//! Rewrite passes steer the clone by registering replacements and list
//! splices before cloning starts.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::arena::Handle;
use crate::expr::{Expression, ExpressionKind};
use crate::func::{Function, FunctionSemantics};
use crate::node::Node;
use crate::program::{Program, ProgramBuilder};
use crate::source::Source;
use crate::stmt::{CaseStatement, Statement, StatementKind};
use crate::symbol::Symbol;
use crate::types::{StructMember, StructType, TextureKind, Type};
use crate::variable::Variable;

/// Callback consulted for every source expression before it is cloned.
///
/// Returning `Some(dst)` uses `dst` (a destination handle) in place of the
/// clone; `None` clones the expression normally.
pub type ExpressionReplacer<'a> =
    Rc<dyn Fn(&mut CloneContext<'a>, Handle<Expression>) -> Option<Handle<Expression>> + 'a>;

pub struct CloneContext<'a> {
    /// The program being cloned from.
    pub src: &'a Program,
    /// The builder being cloned into.
    pub dst: &'a mut ProgramBuilder,

    symbols: HashMap<Symbol, Symbol>,
    types: HashMap<Handle<Type>, Handle<Type>>,
    expressions: HashMap<Handle<Expression>, Handle<Expression>>,
    statements: HashMap<Handle<Statement>, Handle<Statement>>,
    variables: HashMap<Handle<Variable>, Handle<Variable>>,
    functions: HashMap<Handle<Function>, Handle<Function>>,

    expression_replacer: Option<ExpressionReplacer<'a>>,
    insert_before: HashMap<Handle<Statement>, Vec<Handle<Statement>>>,
    insert_after: HashMap<Handle<Statement>, Vec<Handle<Statement>>>,
    removed: HashSet<Handle<Statement>>,
}

impl<'a> CloneContext<'a> {
    pub fn new(src: &'a Program, dst: &'a mut ProgramBuilder) -> Self {
        Self {
            src,
            dst,
            symbols: HashMap::new(),
            types: HashMap::new(),
            expressions: HashMap::new(),
            statements: HashMap::new(),
            variables: HashMap::new(),
            functions: HashMap::new(),
            expression_replacer: None,
            insert_before: HashMap::new(),
            insert_after: HashMap::new(),
            removed: HashSet::new(),
        }
    }

    // Override hooks.

    /// Uses the destination expression `with` wherever `what` would be cloned.
    pub fn replace_expression(&mut self, what: Handle<Expression>, with: Handle<Expression>) {
        self.expressions.insert(what, with);
    }

    /// Uses the destination statement `with` wherever `what` would be cloned.
    pub fn replace_statement(&mut self, what: Handle<Statement>, with: Handle<Statement>) {
        self.statements.insert(what, with);
    }

    pub fn replace_variable(&mut self, what: Handle<Variable>, with: Handle<Variable>) {
        self.variables.insert(what, with);
    }

    pub fn replace_function(&mut self, what: Handle<Function>, with: Handle<Function>) {
        self.functions.insert(what, with);
    }

    /// Installs a callback consulted for every expression that is not
    /// already cloned or explicitly replaced.
    pub fn replace_all_expressions<F>(&mut self, replacer: F)
    where
        F: Fn(&mut CloneContext<'a>, Handle<Expression>) -> Option<Handle<Expression>> + 'a,
    {
        self.expression_replacer = Some(Rc::new(replacer));
    }

    /// Inserts the destination statement `stmt` before `anchor` whenever the
    /// statement list holding `anchor` is cloned.
    pub fn insert_before(&mut self, anchor: Handle<Statement>, stmt: Handle<Statement>) {
        self.insert_before.entry(anchor).or_default().push(stmt);
    }

    /// Inserts the destination statement `stmt` after `anchor` whenever the
    /// statement list holding `anchor` is cloned.
    pub fn insert_after(&mut self, anchor: Handle<Statement>, stmt: Handle<Statement>) {
        self.insert_after.entry(anchor).or_default().push(stmt);
    }

    /// Drops `stmt` from any statement list it is cloned as part of.
    pub fn remove(&mut self, stmt: Handle<Statement>) {
        self.removed.insert(stmt);
    }

    // Cloning.

    pub fn clone_symbol(&mut self, symbol: Symbol) -> Symbol {
        if let Some(&s) = self.symbols.get(&symbol) {
            return s;
        }
        let src = self.src;
        let cloned = self.dst.symbols_mut().register(src.name_of(symbol));
        self.symbols.insert(symbol, cloned);
        cloned
    }

    pub fn clone_source(&self, source: &Source) -> Source {
        source.clone()
    }

    pub fn clone_type(&mut self, ty: Handle<Type>) -> Handle<Type> {
        if let Some(&t) = self.types.get(&ty) {
            return t;
        }
        let src = self.src;
        let cloned = match &src.types()[ty] {
            Type::Vector { size, elem } => Type::Vector {
                size: *size,
                elem: self.clone_type(*elem),
            },
            Type::Matrix {
                columns,
                rows,
                elem,
            } => Type::Matrix {
                columns: *columns,
                rows: *rows,
                elem: self.clone_type(*elem),
            },
            Type::Array { elem, size, stride } => Type::Array {
                elem: self.clone_type(*elem),
                size: *size,
                stride: *stride,
            },
            Type::Struct(s) => {
                let members = s
                    .members
                    .iter()
                    .map(|m| StructMember {
                        name: self.clone_symbol(m.name),
                        ty: self.clone_type(m.ty),
                        offset: m.offset,
                    })
                    .collect();
                Type::Struct(StructType {
                    name: self.clone_symbol(s.name),
                    members,
                    is_block: s.is_block,
                })
            }
            Type::Pointer {
                pointee,
                storage_class,
            } => Type::Pointer {
                pointee: self.clone_type(*pointee),
                storage_class: *storage_class,
            },
            Type::Alias { name, subtype } => Type::Alias {
                name: self.clone_symbol(*name),
                subtype: self.clone_type(*subtype),
            },
            Type::AccessControl { access, subtype } => Type::AccessControl {
                access: *access,
                subtype: self.clone_type(*subtype),
            },
            Type::Texture { dim, kind } => {
                let kind = match *kind {
                    TextureKind::Sampled(t) => TextureKind::Sampled(self.clone_type(t)),
                    TextureKind::Multisampled(t) => TextureKind::Multisampled(self.clone_type(t)),
                    other => other,
                };
                Type::Texture { dim: *dim, kind }
            }
            leaf => leaf.clone(),
        };
        let handle = self.dst.types_mut().get(cloned);
        self.types.insert(ty, handle);
        handle
    }

    pub fn clone_expression(&mut self, expr: Handle<Expression>) -> Handle<Expression> {
        if let Some(&e) = self.expressions.get(&expr) {
            return e;
        }
        if let Some(replacer) = self.expression_replacer.clone() {
            if let Some(replacement) = replacer(self, expr) {
                self.expressions.insert(expr, replacement);
                return replacement;
            }
        }
        let src = self.src;
        let src_expr = src.expr(expr);
        let kind = match &src_expr.kind {
            ExpressionKind::Identifier(symbol) => {
                ExpressionKind::Identifier(self.clone_symbol(*symbol))
            }
            ExpressionKind::ScalarConstructor(lit) => ExpressionKind::ScalarConstructor(*lit),
            ExpressionKind::TypeConstructor { ty, values } => ExpressionKind::TypeConstructor {
                ty: self.clone_type(*ty),
                values: self.clone_expressions(values),
            },
            ExpressionKind::Call { func, params } => ExpressionKind::Call {
                func: self.clone_expression(*func),
                params: self.clone_expressions(params),
            },
            ExpressionKind::MemberAccessor { structure, member } => ExpressionKind::MemberAccessor {
                structure: self.clone_expression(*structure),
                member: self.clone_symbol(*member),
            },
            ExpressionKind::ArrayAccessor { array, index } => ExpressionKind::ArrayAccessor {
                array: self.clone_expression(*array),
                index: self.clone_expression(*index),
            },
            ExpressionKind::Binary { op, lhs, rhs } => ExpressionKind::Binary {
                op: *op,
                lhs: self.clone_expression(*lhs),
                rhs: self.clone_expression(*rhs),
            },
            ExpressionKind::Unary { op, expr } => ExpressionKind::Unary {
                op: *op,
                expr: self.clone_expression(*expr),
            },
            ExpressionKind::Bitcast { ty, expr } => ExpressionKind::Bitcast {
                ty: self.clone_type(*ty),
                expr: self.clone_expression(*expr),
            },
        };
        let source = self.clone_source(&src_expr.source);
        let cloned = self.dst.create_expression(Expression::new(kind, source));
        self.expressions.insert(expr, cloned);
        cloned
    }

    pub fn clone_expressions(&mut self, exprs: &[Handle<Expression>]) -> Vec<Handle<Expression>> {
        exprs.iter().map(|&e| self.clone_expression(e)).collect()
    }

    /// Clones a statement list, applying registered insertions and removals.
    pub fn clone_statements(&mut self, stmts: &[Handle<Statement>]) -> Vec<Handle<Statement>> {
        let mut out = Vec::with_capacity(stmts.len());
        for &stmt in stmts {
            if let Some(before) = self.insert_before.get(&stmt) {
                out.extend(before.iter().copied());
            }
            if !self.removed.contains(&stmt) {
                out.push(self.clone_statement(stmt));
            }
            if let Some(after) = self.insert_after.get(&stmt) {
                out.extend(after.iter().copied());
            }
        }
        out
    }

    /// # Panics
    ///
    /// Panics if the statement is missing a required child (a case without
    /// a body).
    pub fn clone_statement(&mut self, stmt: Handle<Statement>) -> Handle<Statement> {
        if let Some(&s) = self.statements.get(&stmt) {
            return s;
        }
        let src = self.src;
        let src_stmt = src.stmt(stmt);
        let kind = match &src_stmt.kind {
            StatementKind::Block(list) => StatementKind::Block(self.clone_statements(list)),
            StatementKind::Assignment { lhs, rhs } => StatementKind::Assignment {
                lhs: self.clone_expression(*lhs),
                rhs: self.clone_expression(*rhs),
            },
            StatementKind::Break => StatementKind::Break,
            StatementKind::Continue => StatementKind::Continue,
            StatementKind::Discard => StatementKind::Discard,
            StatementKind::Fallthrough => StatementKind::Fallthrough,
            StatementKind::Return { value } => StatementKind::Return {
                value: value.map(|v| self.clone_expression(v)),
            },
            StatementKind::If {
                condition,
                body,
                else_statements,
            } => StatementKind::If {
                condition: self.clone_expression(*condition),
                body: self.clone_statement(*body),
                else_statements: self.clone_statements(else_statements),
            },
            StatementKind::Else { condition, body } => StatementKind::Else {
                condition: condition.map(|c| self.clone_expression(c)),
                body: self.clone_statement(*body),
            },
            StatementKind::Loop { body, continuing } => StatementKind::Loop {
                body: self.clone_statement(*body),
                continuing: continuing.map(|c| self.clone_statement(c)),
            },
            StatementKind::Switch { condition, cases } => StatementKind::Switch {
                condition: self.clone_expression(*condition),
                cases: self.clone_statements(cases),
            },
            StatementKind::Case(case) => {
                let Some(body) = case.body else {
                    panic!(
                        "cannot clone case statement at {}: missing body",
                        src_stmt.source
                    );
                };
                StatementKind::Case(CaseStatement {
                    selectors: case.selectors.clone(),
                    body: Some(self.clone_statement(body)),
                })
            }
            StatementKind::VariableDecl(var) => {
                StatementKind::VariableDecl(self.clone_variable(*var))
            }
            StatementKind::Call(expr) => StatementKind::Call(self.clone_expression(*expr)),
        };
        let source = self.clone_source(&src_stmt.source);
        let cloned = self.dst.create_statement(Statement::new(kind, source));
        self.statements.insert(stmt, cloned);
        cloned
    }

    pub fn clone_variable(&mut self, var: Handle<Variable>) -> Handle<Variable> {
        if let Some(&v) = self.variables.get(&var) {
            return v;
        }
        let src = self.src;
        let src_var = src.var(var);
        let cloned = Variable {
            symbol: self.clone_symbol(src_var.symbol),
            storage_class: src_var.storage_class,
            ty: self.clone_type(src_var.ty),
            is_const: src_var.is_const,
            constructor: src_var.constructor.map(|c| self.clone_expression(c)),
            decorations: src_var.decorations.clone(),
            source: self.clone_source(&src_var.source),
        };
        let handle = self.dst.create_variable(cloned);
        self.variables.insert(var, handle);
        handle
    }

    pub fn clone_function(&mut self, func: Handle<Function>) -> Handle<Function> {
        if let Some(&f) = self.functions.get(&func) {
            return f;
        }
        let src = self.src;
        let src_func = src.func(func);
        let cloned = Function {
            symbol: self.clone_symbol(src_func.symbol),
            params: src_func.params.iter().map(|&p| self.clone_variable(p)).collect(),
            return_type: self.clone_type(src_func.return_type),
            body: self.clone_statement(src_func.body),
            decorations: src_func.decorations.clone(),
            source: self.clone_source(&src_func.source),
            sem: FunctionSemantics::default(),
        };
        let handle = self.dst.create_function(cloned);
        self.functions.insert(func, handle);
        handle
    }

    pub fn clone_node(&mut self, node: Node) -> Node {
        match node {
            Node::Expression(h) => Node::Expression(self.clone_expression(h)),
            Node::Statement(h) => Node::Statement(self.clone_statement(h)),
            Node::Variable(h) => Node::Variable(self.clone_variable(h)),
            Node::Function(h) => Node::Function(self.clone_function(h)),
        }
    }

    /// Clones every module-scope declaration of `src`, appending them to the
    /// destination module in declaration order.
    pub fn clone_module(&mut self) {
        let src = self.src;
        for &ty in &src.module().constructed_types {
            let cloned = self.clone_type(ty);
            self.dst.add_constructed_type(cloned);
        }
        for &var in &src.module().global_variables {
            let cloned = self.clone_variable(var);
            self.dst.add_global_variable(cloned);
        }
        for &func in &src.module().functions {
            let cloned = self.clone_function(func);
            self.dst.add_function(cloned);
        }
    }
}

/// Clones all of `src` into a fresh builder.
pub fn clone_program(src: &Program) -> ProgramBuilder {
    let mut dst = ProgramBuilder::new();
    CloneContext::new(src, &mut dst).clone_module();
    dst
}
