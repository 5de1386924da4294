//! The resolver walk.
//!
//! Module-scope variables are resolved first, then function bodies in
//! declaration order. Each expression gets its `result_type`; each function
//! gets the module variables it touches directly and the functions it calls.
//! Once every body is done the call graph is checked for recursion and the
//! per-function summaries are propagated through it.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use tint_ir::{
    ArraySize, BinaryOp, Expression, ExpressionKind, Function, Handle, Literal, PipelineStage,
    Program, ProgramBuilder, Source, Statement, StatementKind, StorageClass, Symbol, Type,
    TypeManager, UnaryOp, Variable, VectorSize, format_type,
};

use crate::call_graph::{self, CallGraph};
use crate::error::ResolveError;
use crate::intrinsic::{Intrinsic, match_overload};
use crate::scope::ScopeStack;
use crate::validate;
use crate::ResolverOptions;

/// Constructs that give meaning to `break`, `continue` and `fallthrough`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Construct {
    Loop,
    Continuing,
    Case,
}

/// State for the function whose body is being resolved.
struct FunctionContext {
    return_type: Handle<Type>,
    stage: Option<PipelineStage>,
    module_variables: IndexSet<Handle<Variable>>,
    callees: IndexSet<Handle<Function>>,
}

/// Annotates a [`ProgramBuilder`] with types and function summaries.
pub struct Resolver<'b> {
    builder: &'b mut ProgramBuilder,
    options: ResolverOptions,
    scopes: ScopeStack<Handle<Variable>>,
    functions: HashMap<Symbol, Handle<Function>>,
    function: Option<FunctionContext>,
    constructs: Vec<Construct>,
    graph: CallGraph,
    errors: usize,
}

impl<'b> Resolver<'b> {
    pub fn new(builder: &'b mut ProgramBuilder, options: ResolverOptions) -> Self {
        Self {
            builder,
            options,
            scopes: ScopeStack::new(),
            functions: HashMap::new(),
            function: None,
            constructs: Vec::new(),
            graph: CallGraph::default(),
            errors: 0,
        }
    }

    /// Runs the resolver. Returns `true` if the builder carries no errors
    /// afterwards, counting those reported before resolution started.
    pub fn resolve(mut self) -> bool {
        self.builder.clear_semantic_info();
        let first_diagnostic = self.builder.diagnostics().len();
        let module = self.builder.module().clone();
        log::debug!(
            "resolving {} global variables and {} functions",
            module.global_variables.len(),
            module.functions.len()
        );

        self.graph = CallGraph::new(&module.functions);
        for &func in &module.functions {
            let (symbol, source) = {
                let f = self.builder.func(func);
                (f.symbol, f.source.clone())
            };
            if self.functions.insert(symbol, func).is_some() {
                self.error(ResolveError::Redeclared(self.name(symbol)), &source);
            }
        }

        for &var in &module.global_variables {
            self.resolve_global(var);
        }
        for &func in &module.functions {
            self.resolve_function(func);
        }

        let traversal = self.graph.traverse();
        for edge in &traversal.back_edges {
            let chain: Vec<String> = edge
                .path
                .iter()
                .chain(std::iter::once(&edge.callee))
                .map(|&f| format!("'{}'", self.name(self.builder.func(f).symbol)))
                .collect();
            let source = self.builder.func(edge.caller).source.clone();
            self.error(ResolveError::Recursion(chain.join(" -> ")), &source);
        }
        call_graph::propagate(self.builder, &self.graph, &traversal);

        let end = self.builder.diagnostics().len();
        self.builder.set_semantic_diagnostics(first_diagnostic..end);

        let ok = self.errors == 0 && !self.builder.diagnostics().contains_errors();
        log::debug!("resolver finished with {} error(s)", self.errors);
        self.builder.set_resolved(ok);
        ok
    }

    // Reporting helpers.

    fn error(&mut self, err: ResolveError, source: &Source) {
        self.errors += 1;
        self.builder.diagnostics_mut().add_error(err.to_string(), source.clone());
    }

    fn program(&self) -> &Program {
        &**self.builder
    }

    fn types(&mut self) -> &mut TypeManager {
        self.builder.types_mut()
    }

    fn name(&self, symbol: Symbol) -> String {
        self.program().name_of(symbol).to_string()
    }

    fn type_str(&self, ty: Handle<Type>) -> String {
        format_type(self.program(), ty)
    }

    fn is_invalid(&self, ty: Handle<Type>) -> bool {
        self.program().types().is_invalid(ty)
    }

    /// The value type of an expression: aliases, access control and one
    /// level of pointer stripped.
    fn value_type(&self, ty: Handle<Type>) -> Handle<Type> {
        self.program().types().unwrap_all(ty)
    }

    fn same_type(&self, a: Handle<Type>, b: Handle<Type>) -> bool {
        let types = self.program().types();
        types.unwrap_if_needed(a) == types.unwrap_if_needed(b)
    }

    fn is_declared(&self, symbol: Symbol) -> bool {
        self.scopes.get(symbol).is_some() || self.functions.contains_key(&symbol)
    }

    // Declarations.

    fn resolve_global(&mut self, handle: Handle<Variable>) {
        let var = self.program().var(handle).clone();
        let name = self.name(var.symbol);
        let source = var.source.clone();

        if self.is_declared(var.symbol) {
            self.error(ResolveError::Redeclared(name.clone()), &source);
        }
        if !var.is_const
            && matches!(var.storage_class, StorageClass::None | StorageClass::Function)
        {
            self.error(ResolveError::MissingStorageClass(name.clone()), &source);
        }
        for err in validate::global_decoration_errors(&var, &name) {
            self.error(err, &source);
        }
        if matches!(var.storage_class, StorageClass::Uniform | StorageClass::Storage)
            && !self.program().types().is_host_shareable(var.ty)
        {
            let err = ResolveError::NotHostShareable {
                name: name.clone(),
                storage_class: var.storage_class.to_string(),
                ty: self.type_str(var.ty),
            };
            self.error(err, &source);
        }
        self.check_variable_value(&var, &name);
        self.scopes.declare(var.symbol, handle);
    }

    fn resolve_local(&mut self, handle: Handle<Variable>) {
        let var = self.program().var(handle).clone();
        let name = self.name(var.symbol);
        let source = var.source.clone();

        if self.is_declared(var.symbol) {
            self.error(ResolveError::Redeclared(name.clone()), &source);
        }
        if !var.is_const && var.storage_class != StorageClass::Function {
            self.error(ResolveError::FunctionScopeStorageClass(name.clone()), &source);
        }
        for d in &var.decorations {
            let err = ResolveError::InvalidDecoration {
                decoration: d.to_string(),
                context: format!("function-scope variable '{name}'"),
            };
            self.error(err, &source);
        }
        self.check_variable_value(&var, &name);
        self.scopes.declare(var.symbol, handle);
    }

    /// Type and initializer checks shared by every kind of declaration.
    fn check_variable_value(&mut self, var: &Variable, name: &str) {
        let source = &var.source;
        if self.program().types().is_void(self.program().types().unwrap_if_needed(var.ty)) {
            self.error(ResolveError::VoidVariable(name.to_string()), source);
        }
        match var.constructor {
            Some(ctor) => {
                let found = self.resolve_expression(ctor);
                if !self.is_invalid(found) && !self.same_type(self.value_type(found), var.ty) {
                    let err = ResolveError::InitializerMismatch {
                        name: name.to_string(),
                        expected: self.type_str(var.ty),
                        found: self.type_str(self.value_type(found)),
                    };
                    self.error(err, source);
                }
            }
            None if var.is_const => {
                self.error(ResolveError::ConstWithoutInitializer(name.to_string()), source);
            }
            None => {}
        }
    }

    fn resolve_function(&mut self, handle: Handle<Function>) {
        let func = self.program().func(handle).clone();
        let name = self.name(func.symbol);
        let source = func.source.clone();
        log::debug!("resolving function '{name}'");

        for err in validate::function_decoration_errors(&func, &name) {
            self.error(err, &source);
        }
        let returns_void = {
            let types = self.program().types();
            types.is_void(types.unwrap_if_needed(func.return_type))
        };
        if func.is_entry_point() && !returns_void {
            self.error(ResolveError::EntryPointReturnType(name.clone()), &source);
        }

        self.function = Some(FunctionContext {
            return_type: func.return_type,
            stage: func.pipeline_stage(),
            module_variables: IndexSet::new(),
            callees: IndexSet::new(),
        });
        self.scopes.push();
        for &param in &func.params {
            let var = self.program().var(param).clone();
            let param_name = self.name(var.symbol);
            if self.is_declared(var.symbol) {
                self.error(ResolveError::Redeclared(param_name.clone()), &var.source);
            }
            if self.program().types().is_void(var.ty) {
                self.error(ResolveError::VoidVariable(param_name), &var.source);
            }
            self.scopes.declare(var.symbol, param);
        }
        self.resolve_block(func.body);
        self.scopes.pop();

        if !returns_void {
            let ends_with_return = func.last_statement(self.program()).is_some_and(|s| {
                matches!(self.program().stmt(s).kind, StatementKind::Return { .. })
            });
            if !ends_with_return {
                self.error(ResolveError::MissingReturn(name), &source);
            }
        }

        if let Some(ctx) = self.function.take() {
            for &callee in &ctx.callees {
                self.graph.add_call(handle, callee);
            }
            let sem = &mut self.builder.func_mut(handle).sem;
            sem.local_referenced_module_variables = ctx.module_variables;
            sem.callees = ctx.callees;
        }
    }

    // Statements.

    fn resolve_block(&mut self, block: Handle<Statement>) {
        self.scopes.push();
        self.resolve_block_contents(block);
        self.scopes.pop();
    }

    /// Resolves the statements of `block` in the current scope.
    fn resolve_block_contents(&mut self, block: Handle<Statement>) {
        let list = match &self.program().stmt(block).kind {
            StatementKind::Block(list) => list.clone(),
            _ => vec![block],
        };
        let mut terminated = false;
        for stmt in list {
            if terminated {
                self.unreachable(stmt);
                terminated = false;
            }
            self.resolve_statement(stmt);
            if self.program().stmt(stmt).is_terminator() {
                terminated = true;
            }
        }
    }

    fn unreachable(&mut self, stmt: Handle<Statement>) {
        let source = self.program().stmt(stmt).source.clone();
        let message = ResolveError::Unreachable.to_string();
        if self.options.unreachable_is_error {
            self.error(ResolveError::Unreachable, &source);
        } else {
            self.builder.diagnostics_mut().add_warning(message, source);
        }
    }

    fn resolve_statement(&mut self, handle: Handle<Statement>) {
        let stmt = self.program().stmt(handle).clone();
        let source = stmt.source;
        match stmt.kind {
            StatementKind::Block(_) => self.resolve_block(handle),
            StatementKind::Assignment { lhs, rhs } => self.resolve_assignment(lhs, rhs, &source),
            StatementKind::Break => {
                if !self
                    .constructs
                    .iter()
                    .any(|c| matches!(c, Construct::Loop | Construct::Case))
                {
                    self.error(ResolveError::BreakOutsideLoopOrSwitch, &source);
                }
            }
            StatementKind::Continue => {
                let innermost = self
                    .constructs
                    .iter()
                    .rev()
                    .find(|c| matches!(c, Construct::Loop | Construct::Continuing));
                match innermost {
                    Some(Construct::Loop) => {}
                    Some(_) => self.error(ResolveError::ContinueInContinuing, &source),
                    None => self.error(ResolveError::ContinueOutsideLoop, &source),
                }
            }
            StatementKind::Discard => {}
            StatementKind::Fallthrough => {
                if self.constructs.last() != Some(&Construct::Case) {
                    self.error(ResolveError::FallthroughOutsideCase, &source);
                }
            }
            StatementKind::Return { value } => self.resolve_return(value, &source),
            StatementKind::If {
                condition,
                body,
                else_statements,
            } => {
                self.check_condition(condition, "if statement");
                self.resolve_block(body);
                for else_stmt in else_statements {
                    self.resolve_statement(else_stmt);
                }
            }
            StatementKind::Else { condition, body } => {
                if let Some(condition) = condition {
                    self.check_condition(condition, "else if statement");
                }
                self.resolve_block(body);
            }
            StatementKind::Loop { body, continuing } => {
                self.constructs.push(Construct::Loop);
                self.scopes.push();
                self.resolve_block_contents(body);
                if let Some(continuing) = continuing {
                    self.constructs.push(Construct::Continuing);
                    self.resolve_block(continuing);
                    self.constructs.pop();
                }
                self.scopes.pop();
                self.constructs.pop();
            }
            StatementKind::Switch { condition, cases } => self.resolve_switch(condition, &cases),
            StatementKind::Case(case) => {
                self.constructs.push(Construct::Case);
                if let Some(body) = case.body {
                    self.resolve_block(body);
                }
                self.constructs.pop();
            }
            StatementKind::VariableDecl(var) => self.resolve_local(var),
            StatementKind::Call(expr) => {
                self.resolve_expression(expr);
            }
        }
    }

    fn check_condition(&mut self, condition: Handle<Expression>, construct: &'static str) {
        let ty = self.resolve_expression(condition);
        if self.is_invalid(ty) {
            return;
        }
        let value = self.value_type(ty);
        if self.program().types()[value] != Type::Bool {
            let source = self.program().expr(condition).source.clone();
            let err = ResolveError::ConditionNotBool {
                construct,
                found: self.type_str(value),
            };
            self.error(err, &source);
        }
    }

    fn resolve_assignment(
        &mut self,
        lhs: Handle<Expression>,
        rhs: Handle<Expression>,
        source: &Source,
    ) {
        let lhs_ty = self.resolve_expression(lhs);
        let rhs_ty = self.resolve_expression(rhs);
        if self.is_invalid(lhs_ty) || self.is_invalid(rhs_ty) {
            return;
        }
        let target = self.program().types().unwrap_if_needed(lhs_ty);
        match self.program().types()[target].clone() {
            Type::Pointer { pointee, .. } => {
                let value = self.value_type(rhs_ty);
                if !self.same_type(pointee, value) {
                    let err = ResolveError::AssignmentMismatch {
                        lhs: self.type_str(pointee),
                        rhs: self.type_str(value),
                    };
                    self.error(err, source);
                }
            }
            _ => {
                let err = match self.const_root(lhs) {
                    Some(name) => ResolveError::AssignToConst(name),
                    None => ResolveError::AssignToValue(self.type_str(lhs_ty)),
                };
                self.error(err, source);
            }
        }
    }

    /// Name of the `const` (or parameter) an l-value expression is rooted at.
    fn const_root(&self, mut expr: Handle<Expression>) -> Option<String> {
        loop {
            match self.program().expr(expr).kind {
                ExpressionKind::MemberAccessor { structure, .. } => expr = structure,
                ExpressionKind::ArrayAccessor { array, .. } => expr = array,
                ExpressionKind::Identifier(symbol) => {
                    let var = self.scopes.get(symbol)?;
                    return self.program().var(var).is_const.then(|| self.name(symbol));
                }
                _ => return None,
            }
        }
    }

    fn resolve_return(&mut self, value: Option<Handle<Expression>>, source: &Source) {
        let expected = match &self.function {
            Some(ctx) => ctx.return_type,
            None => self.types().void(),
        };
        let found = match value {
            Some(value) => {
                let ty = self.resolve_expression(value);
                if self.is_invalid(ty) {
                    return;
                }
                self.value_type(ty)
            }
            None => self.types().void(),
        };
        if !self.same_type(expected, found) {
            let err = ResolveError::ReturnTypeMismatch {
                expected: self.type_str(expected),
                found: self.type_str(found),
            };
            self.error(err, source);
        }
    }

    fn resolve_switch(&mut self, condition: Handle<Expression>, cases: &[Handle<Statement>]) {
        let cond_ty = self.resolve_expression(condition);
        let selector_ty = if self.is_invalid(cond_ty) {
            None
        } else {
            let value = self.value_type(cond_ty);
            if self.program().types().is_integer_scalar(value) {
                Some(value)
            } else {
                let source = self.program().expr(condition).source.clone();
                self.error(ResolveError::SwitchSelectorNotInteger, &source);
                None
            }
        };

        let mut seen = HashSet::new();
        let mut defaults = 0;
        for (i, &case_stmt) in cases.iter().enumerate() {
            let stmt = self.program().stmt(case_stmt).clone();
            let StatementKind::Case(case) = stmt.kind else {
                self.resolve_statement(case_stmt);
                continue;
            };
            let is_last = i + 1 == cases.len();
            if case.is_default() {
                defaults += 1;
                if defaults > 1 {
                    self.error(ResolveError::SwitchMultipleDefaults, &stmt.source);
                } else if !is_last {
                    self.error(ResolveError::SwitchDefaultNotLast, &stmt.source);
                }
            }
            for selector in &case.selectors {
                if let Some(ty) = selector_ty {
                    let matches = matches!(
                        (&self.program().types()[ty], selector),
                        (Type::I32, Literal::Sint(_)) | (Type::U32, Literal::Uint(_))
                    );
                    if !matches {
                        self.error(ResolveError::SwitchSelectorTypeMismatch, &stmt.source);
                    }
                }
                if let Some(value) = selector.as_i64() {
                    if !seen.insert(value) {
                        let err = ResolveError::SwitchDuplicateSelector(selector.to_string());
                        self.error(err, &stmt.source);
                    }
                }
            }

            self.constructs.push(Construct::Case);
            if let Some(body) = case.body {
                self.resolve_block(body);
            }
            self.constructs.pop();

            if is_last {
                let ends_in_fallthrough = case
                    .body
                    .and_then(|b| self.program().stmt(b).as_block()?.last().copied())
                    .is_some_and(|s| self.program().stmt(s).kind == StatementKind::Fallthrough);
                if ends_in_fallthrough {
                    self.error(ResolveError::SwitchFallthroughInLastCase, &stmt.source);
                }
            }
        }
    }

    // Expressions.

    /// Resolves `handle` and its children, returning its type. Expressions
    /// that cannot be typed get [`Type::Invalid`]; operations on an invalid
    /// operand are invalid without further diagnostics.
    pub(crate) fn resolve_expression(&mut self, handle: Handle<Expression>) -> Handle<Type> {
        if let Some(ty) = self.program().expr(handle).result_type {
            self.record_references(handle);
            return ty;
        }
        let expr = self.program().expr(handle).clone();
        let source = expr.source;
        let ty = match expr.kind {
            ExpressionKind::Identifier(symbol) => self.resolve_identifier(symbol, &source),
            ExpressionKind::ScalarConstructor(lit) => match lit {
                Literal::Bool(_) => self.types().bool(),
                Literal::Sint(_) => self.types().i32(),
                Literal::Uint(_) => self.types().u32(),
                Literal::Float(_) => self.types().f32(),
            },
            ExpressionKind::TypeConstructor { ty, values } => {
                let args = self.resolve_arguments(&values);
                if let Some(args) = args {
                    if !self.constructor_accepts(ty, &args) {
                        self.error(ResolveError::ConstructorArguments(self.type_str(ty)), &source);
                    }
                }
                ty
            }
            ExpressionKind::Call { func, params } => self.resolve_call(func, &params, &source),
            ExpressionKind::MemberAccessor { structure, member } => {
                self.resolve_member(structure, member, &source)
            }
            ExpressionKind::ArrayAccessor { array, index } => {
                self.resolve_index(array, index, &source)
            }
            ExpressionKind::Binary { op, lhs, rhs } => {
                let lhs_ty = self.resolve_expression(lhs);
                let rhs_ty = self.resolve_expression(rhs);
                if self.is_invalid(lhs_ty) || self.is_invalid(rhs_ty) {
                    self.types().invalid()
                } else {
                    let (l, r) = (self.value_type(lhs_ty), self.value_type(rhs_ty));
                    match binary_result(self.types(), op, l, r) {
                        Some(ty) => ty,
                        None => {
                            let err = ResolveError::BinaryOperands {
                                op: op.to_string(),
                                lhs: self.type_str(l),
                                rhs: self.type_str(r),
                            };
                            self.error(err, &source);
                            self.types().invalid()
                        }
                    }
                }
            }
            ExpressionKind::Unary { op, expr } => {
                let ty = self.resolve_expression(expr);
                if self.is_invalid(ty) {
                    ty
                } else {
                    let value = self.value_type(ty);
                    let types = self.program().types();
                    let ok = match op {
                        UnaryOp::Negation => {
                            types.is_float_scalar_or_vector(value)
                                || types.is_signed_scalar_or_vector(value)
                        }
                        UnaryOp::Not => types.is_bool_scalar_or_vector(value),
                    };
                    if ok {
                        value
                    } else {
                        let err = ResolveError::UnaryOperand {
                            op: op.to_string(),
                            ty: self.type_str(value),
                        };
                        self.error(err, &source);
                        self.types().invalid()
                    }
                }
            }
            ExpressionKind::Bitcast { ty, expr } => {
                let from = self.resolve_expression(expr);
                if !self.is_invalid(from) {
                    let from = self.value_type(from);
                    if !bitcast_allowed(self.program().types(), from, ty) {
                        let err = ResolveError::InvalidBitcast {
                            from: self.type_str(from),
                            to: self.type_str(ty),
                        };
                        self.error(err, &source);
                    }
                }
                ty
            }
        };
        self.builder.expr_mut(handle).result_type = Some(ty);
        ty
    }

    /// Records the module variables and user functions that an already typed
    /// subtree refers to, for a function reaching it through a shared node.
    fn record_references(&mut self, handle: Handle<Expression>) {
        if self.function.is_none() {
            return;
        }
        let mut pending = vec![handle];
        while let Some(handle) = pending.pop() {
            match self.program().expr(handle).kind.clone() {
                ExpressionKind::Identifier(symbol) => {
                    let global = self
                        .scopes
                        .get(symbol)
                        .filter(|_| self.scopes.is_module_scope(symbol));
                    if let (Some(var), Some(ctx)) = (global, &mut self.function) {
                        ctx.module_variables.insert(var);
                    }
                }
                ExpressionKind::ScalarConstructor(_) => {}
                ExpressionKind::TypeConstructor { values, .. } => pending.extend(values),
                ExpressionKind::Call { func, params } => {
                    pending.extend(params);
                    let callee = self
                        .program()
                        .expr(func)
                        .as_identifier()
                        .and_then(|symbol| self.functions.get(&symbol).copied())
                        .filter(|&f| !self.program().func(f).is_entry_point());
                    if let (Some(callee), Some(ctx)) = (callee, &mut self.function) {
                        ctx.callees.insert(callee);
                    }
                }
                ExpressionKind::MemberAccessor { structure, .. } => pending.push(structure),
                ExpressionKind::ArrayAccessor { array, index } => pending.extend([array, index]),
                ExpressionKind::Binary { lhs, rhs, .. } => pending.extend([lhs, rhs]),
                ExpressionKind::Unary { expr, .. } | ExpressionKind::Bitcast { expr, .. } => {
                    pending.push(expr);
                }
            }
        }
    }

    /// Resolves each argument; `None` if any of them is invalid.
    fn resolve_arguments(&mut self, args: &[Handle<Expression>]) -> Option<Vec<Handle<Type>>> {
        let tys: Vec<_> = args.iter().map(|&a| self.resolve_expression(a)).collect();
        if tys.iter().any(|&t| self.is_invalid(t)) {
            return None;
        }
        Some(tys)
    }

    fn resolve_identifier(&mut self, symbol: Symbol, source: &Source) -> Handle<Type> {
        let Some(handle) = self.scopes.get(symbol) else {
            let name = self.name(symbol);
            let is_callable =
                self.functions.contains_key(&symbol) || Intrinsic::from_name(&name).is_some();
            let err = if is_callable {
                ResolveError::FunctionUsedAsValue(name)
            } else {
                ResolveError::UndeclaredIdentifier(name)
            };
            self.error(err, source);
            return self.types().invalid();
        };
        if self.scopes.is_module_scope(symbol) {
            if let Some(ctx) = &mut self.function {
                ctx.module_variables.insert(handle);
            }
        }
        let var = self.program().var(handle);
        let (ty, storage_class, is_const) = (var.ty, var.storage_class, var.is_const);
        if is_const || storage_class == StorageClass::None {
            ty
        } else {
            self.types().pointer(ty, storage_class)
        }
    }

    fn resolve_call(
        &mut self,
        func: Handle<Expression>,
        params: &[Handle<Expression>],
        source: &Source,
    ) -> Handle<Type> {
        let Some(symbol) = self.program().expr(func).as_identifier() else {
            self.resolve_expression(func);
            self.error(ResolveError::UnknownFunction("<expression>".into()), source);
            return self.types().invalid();
        };
        let name = self.name(symbol);
        let args = self.resolve_arguments(params);

        if let Some(&callee) = self.functions.get(&symbol) {
            let f = self.program().func(callee);
            let (is_entry_point, return_type, formal) =
                (f.is_entry_point(), f.return_type, f.params.clone());
            if is_entry_point {
                self.error(ResolveError::CalledEntryPoint(name), source);
                return self.types().invalid();
            }
            if let Some(ctx) = &mut self.function {
                ctx.callees.insert(callee);
            }
            let Some(args) = args else {
                return return_type;
            };
            if args.len() != formal.len() {
                let err = ResolveError::ArgumentCount {
                    name,
                    expected: formal.len(),
                    found: args.len(),
                };
                self.error(err, source);
                return return_type;
            }
            for (index, (&arg, &param)) in args.iter().zip(&formal).enumerate() {
                let param_ty = self.program().var(param).ty;
                let expects_pointer = {
                    let types = self.program().types();
                    types.is_pointer(types.unwrap_if_needed(param_ty))
                };
                let arg = if expects_pointer { arg } else { self.value_type(arg) };
                if !self.same_type(arg, param_ty) {
                    let err = ResolveError::ArgumentType {
                        name: name.clone(),
                        index,
                        expected: self.type_str(param_ty),
                        found: self.type_str(arg),
                    };
                    self.error(err, source);
                }
            }
            return return_type;
        }

        let Some(intrinsic) = Intrinsic::from_name(&name) else {
            self.error(ResolveError::UnknownFunction(name), source);
            return self.types().invalid();
        };
        let Some(args) = args else {
            return self.types().invalid();
        };
        if intrinsic.is_derivative() {
            if let Some(stage) = self.function.as_ref().and_then(|ctx| ctx.stage) {
                if stage != PipelineStage::Fragment {
                    log::warn!("derivative '{name}' used outside a fragment shader");
                }
            }
        }
        let args: Vec<_> = args.iter().map(|&a| self.value_type(a)).collect();
        match match_overload(self.types(), intrinsic, &args) {
            Some(ty) => ty,
            None => {
                let list: Vec<String> = args.iter().map(|&a| self.type_str(a)).collect();
                let err = ResolveError::NoMatchingIntrinsic {
                    name,
                    args: list.join(", "),
                };
                self.error(err, source);
                self.types().invalid()
            }
        }
    }

    /// Splits a reference type into its storage class and referenced type.
    fn split_pointer(&self, ty: Handle<Type>) -> (Option<StorageClass>, Handle<Type>) {
        let types = self.program().types();
        let ty = types.unwrap_if_needed(ty);
        match types[ty] {
            Type::Pointer {
                pointee,
                storage_class,
            } => (Some(storage_class), types.unwrap_if_needed(pointee)),
            _ => (None, ty),
        }
    }

    fn wrap_pointer(
        &mut self,
        storage_class: Option<StorageClass>,
        ty: Handle<Type>,
    ) -> Handle<Type> {
        match storage_class {
            Some(storage_class) => self.types().pointer(ty, storage_class),
            None => ty,
        }
    }

    fn resolve_member(
        &mut self,
        structure: Handle<Expression>,
        member: Symbol,
        source: &Source,
    ) -> Handle<Type> {
        let parent = self.resolve_expression(structure);
        if self.is_invalid(parent) {
            return parent;
        }
        let (storage_class, base) = self.split_pointer(parent);
        let member_name = self.name(member);
        match self.program().types()[base].clone() {
            Type::Struct(s) => match s.member(member) {
                Some(m) => self.wrap_pointer(storage_class, m.ty),
                None => {
                    let err = ResolveError::UnknownMember {
                        member: member_name,
                        ty: self.type_str(base),
                    };
                    self.error(err, source);
                    self.types().invalid()
                }
            },
            Type::Vector { size, elem } => {
                let indices = swizzle_indices(&member_name)
                    .filter(|idx| idx.iter().all(|&i| i < size.as_u32()));
                match indices.as_deref() {
                    Some([_]) => self.wrap_pointer(storage_class, elem),
                    Some(idx) => match VectorSize::from_u32(idx.len() as u32) {
                        Some(n) => self.types().vec(n, elem),
                        None => {
                            self.error(ResolveError::InvalidSwizzle(member_name), source);
                            self.types().invalid()
                        }
                    },
                    None => {
                        self.error(ResolveError::InvalidSwizzle(member_name), source);
                        self.types().invalid()
                    }
                }
            }
            _ => {
                self.error(ResolveError::InvalidMemberAccess(self.type_str(parent)), source);
                self.types().invalid()
            }
        }
    }

    fn resolve_index(
        &mut self,
        array: Handle<Expression>,
        index: Handle<Expression>,
        source: &Source,
    ) -> Handle<Type> {
        let parent = self.resolve_expression(array);
        let index_ty = self.resolve_expression(index);
        if !self.is_invalid(index_ty) {
            let value = self.value_type(index_ty);
            if !self.program().types().is_integer_scalar(value) {
                self.error(ResolveError::IndexNotInteger(self.type_str(value)), source);
            }
        }
        if self.is_invalid(parent) {
            return parent;
        }
        let (storage_class, base) = self.split_pointer(parent);
        let elem = match self.program().types()[base].clone() {
            Type::Array { elem, .. } | Type::Vector { elem, .. } => elem,
            Type::Matrix { rows, elem, .. } => self.types().vec(rows, elem),
            _ => {
                self.error(ResolveError::InvalidArrayAccess(self.type_str(parent)), source);
                return self.types().invalid();
            }
        };
        self.wrap_pointer(storage_class, elem)
    }

    /// Checks constructor arguments (already value types) against `ty`.
    fn constructor_accepts(&mut self, ty: Handle<Type>, args: &[Handle<Type>]) -> bool {
        let args: Vec<_> = args.iter().map(|&a| self.value_type(a)).collect();
        if args.is_empty() {
            return true;
        }
        let target = self.program().types().unwrap_if_needed(ty);
        match self.program().types()[target].clone() {
            Type::Bool | Type::I32 | Type::U32 | Type::F32 => {
                args.len() == 1 && self.program().types().is_scalar(args[0])
            }
            Type::Vector { size, elem } => {
                let types = self.program().types();
                let elem = types.unwrap_if_needed(elem);
                if args.len() == 1 && args[0] == elem {
                    return true;
                }
                let mut components = 0;
                for &arg in &args {
                    match types[arg] {
                        _ if arg == elem => components += 1,
                        Type::Vector { size: n, elem: e } if types.unwrap_if_needed(e) == elem => {
                            components += n.as_u32()
                        }
                        _ => return false,
                    }
                }
                components == size.as_u32()
            }
            Type::Matrix {
                columns,
                rows,
                elem,
            } => {
                let column = self.types().vec(rows, elem);
                args.len() == columns.as_u32() as usize
                    && args.iter().all(|&a| self.same_type(a, column))
            }
            Type::Array {
                elem,
                size: ArraySize::Sized(n),
                ..
            } => args.len() == n as usize && args.iter().all(|&a| self.same_type(a, elem)),
            Type::Struct(s) => {
                args.len() == s.members.len()
                    && args
                        .iter()
                        .zip(&s.members)
                        .all(|(&a, m)| self.same_type(a, m.ty))
            }
            _ => false,
        }
    }
}

/// Component indices of a swizzle such as `xzy` or `rgba`.
fn swizzle_indices(name: &str) -> Option<Vec<u32>> {
    const XYZW: &str = "xyzw";
    const RGBA: &str = "rgba";
    if name.is_empty() || name.len() > 4 {
        return None;
    }
    let set = if name.chars().all(|c| XYZW.contains(c)) {
        XYZW
    } else if name.chars().all(|c| RGBA.contains(c)) {
        RGBA
    } else {
        return None;
    };
    Some(name.chars().filter_map(|c| set.find(c)).map(|i| i as u32).collect())
}

fn vector_size(types: &TypeManager, ty: Handle<Type>) -> Option<VectorSize> {
    match types[ty] {
        Type::Vector { size, .. } => Some(size),
        _ => None,
    }
}

fn is_numeric_scalar_or_vector(types: &TypeManager, ty: Handle<Type>) -> bool {
    types.is_float_scalar_or_vector(ty) || types.is_integer_scalar_or_vector(ty)
}

/// Result type of `l op r` for value operands, or `None` if not allowed.
fn binary_result(
    types: &mut TypeManager,
    op: BinaryOp,
    l: Handle<Type>,
    r: Handle<Type>,
) -> Option<Handle<Type>> {
    if op.is_logical() {
        return (l == r && types[l] == Type::Bool).then_some(l);
    }
    if op.is_bitwise() {
        let ok = l == r
            && (types.is_integer_scalar_or_vector(l) || types.is_bool_scalar_or_vector(l));
        return ok.then_some(l);
    }
    if op.is_shift() {
        let ok = types.is_integer_scalar_or_vector(l)
            && types.is_unsigned_scalar_or_vector(r)
            && vector_size(types, l) == vector_size(types, r);
        return ok.then_some(l);
    }
    if op.is_comparison() {
        if l != r {
            return None;
        }
        let ok = match op {
            BinaryOp::Equal | BinaryOp::NotEqual => {
                is_numeric_scalar_or_vector(types, l) || types.is_bool_scalar_or_vector(l)
            }
            _ => is_numeric_scalar_or_vector(types, l),
        };
        if !ok {
            return None;
        }
        let b = types.bool();
        return Some(match vector_size(types, l) {
            Some(size) => types.vec(size, b),
            None => b,
        });
    }

    // Arithmetic.
    if l == r && (is_numeric_scalar_or_vector(types, l)) {
        return Some(l);
    }
    if l == r && matches!(op, BinaryOp::Add | BinaryOp::Subtract) && types.is_float_matrix(l) {
        return Some(l);
    }
    let scaling = matches!(op, BinaryOp::Multiply | BinaryOp::Divide);
    match (types[l].clone(), types[r].clone()) {
        // vecN<T> * T, vecN<T> / T
        (Type::Vector { elem, .. }, _) if scaling && elem == r => Some(l),
        // T * vecN<T>
        (_, Type::Vector { elem, .. }) if op == BinaryOp::Multiply && elem == l => Some(r),
        // matCxR * f32, f32 * matCxR
        (Type::Matrix { elem, .. }, _) if op == BinaryOp::Multiply && elem == r => Some(l),
        (_, Type::Matrix { elem, .. }) if op == BinaryOp::Multiply && elem == l => Some(r),
        // matCxR * vecC -> vecR
        (
            Type::Matrix {
                columns,
                rows,
                elem,
            },
            Type::Vector { size, elem: ve },
        ) if op == BinaryOp::Multiply && size == columns && elem == ve => {
            Some(types.vec(rows, elem))
        }
        // vecR * matCxR -> vecC
        (
            Type::Vector { size, elem: ve },
            Type::Matrix {
                columns,
                rows,
                elem,
            },
        ) if op == BinaryOp::Multiply && size == rows && elem == ve => {
            Some(types.vec(columns, elem))
        }
        // matCxR * matKxC -> matKxR
        (
            Type::Matrix {
                columns: lc,
                rows: lr,
                elem,
            },
            Type::Matrix {
                columns: rc,
                rows: rr,
                elem: re,
            },
        ) if op == BinaryOp::Multiply && lc == rr && elem == re => Some(types.mat(rc, lr, elem)),
        _ => None,
    }
}

/// Bitcasts reinterpret 32-bit numeric scalars or same-sized vectors of them.
fn bitcast_allowed(types: &TypeManager, from: Handle<Type>, to: Handle<Type>) -> bool {
    let to = types.unwrap_if_needed(to);
    let numeric = |t: Handle<Type>| matches!(types[t], Type::I32 | Type::U32 | Type::F32);
    match (&types[from], &types[to]) {
        (Type::Vector { size: a, elem: ea }, Type::Vector { size: b, elem: eb }) => {
            a == b && numeric(*ea) && numeric(*eb)
        }
        _ => numeric(from) && numeric(to),
    }
}
