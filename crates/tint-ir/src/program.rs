//! Program containers.
//!
//! A [`ProgramBuilder`] owns every node, type and symbol of a shader while it
//! is being constructed or rewritten. [`ProgramBuilder::build`] seals it into
//! a read-only [`Program`]; [`Program::into_builder`] reopens it.

use std::ops::{Deref, Range};

use crate::arena::{Arena, Handle};
use crate::diagnostic::DiagnosticList;
use crate::expr::Expression;
use crate::func::{Function, PipelineStage};
use crate::source::Source;
use crate::stmt::Statement;
use crate::symbol::{Symbol, SymbolTable};
use crate::types::{Type, TypeManager};
use crate::variable::Variable;

/// Module-scope declarations in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Module {
    /// Structs and aliases declared at module scope.
    pub constructed_types: Vec<Handle<Type>>,
    pub global_variables: Vec<Handle<Variable>>,
    pub functions: Vec<Handle<Function>>,
}

/// A finalized, read-only shader program.
#[derive(Debug, Default)]
pub struct Program {
    symbols: SymbolTable,
    types: TypeManager,
    expressions: Arena<Expression>,
    statements: Arena<Statement>,
    variables: Arena<Variable>,
    functions: Arena<Function>,
    module: Module,
    diagnostics: DiagnosticList,
    /// Positions in `diagnostics` written by the last semantic pass.
    semantic_diagnostics: Range<usize>,
    resolved: bool,
}

impl Program {
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn types(&self) -> &TypeManager {
        &self.types
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn diagnostics(&self) -> &DiagnosticList {
        &self.diagnostics
    }

    pub fn expressions(&self) -> &Arena<Expression> {
        &self.expressions
    }

    pub fn statements(&self) -> &Arena<Statement> {
        &self.statements
    }

    pub fn variables(&self) -> &Arena<Variable> {
        &self.variables
    }

    pub fn functions(&self) -> &Arena<Function> {
        &self.functions
    }

    pub fn expr(&self, handle: Handle<Expression>) -> &Expression {
        &self.expressions[handle]
    }

    pub fn stmt(&self, handle: Handle<Statement>) -> &Statement {
        &self.statements[handle]
    }

    pub fn var(&self, handle: Handle<Variable>) -> &Variable {
        &self.variables[handle]
    }

    pub fn func(&self, handle: Handle<Function>) -> &Function {
        &self.functions[handle]
    }

    /// Name of `symbol` in this program's symbol table.
    pub fn name_of(&self, symbol: Symbol) -> &str {
        self.symbols.name_for(symbol)
    }

    /// `true` once the resolver has annotated this program.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// `true` when there are no error diagnostics and every module-scope
    /// node is structurally valid.
    pub fn is_valid(&self) -> bool {
        if self.diagnostics.contains_errors() {
            return false;
        }
        self.module
            .constructed_types
            .iter()
            .all(|&t| self.types.contains(t))
            && self
                .module
                .global_variables
                .iter()
                .all(|&v| self.is_valid_variable(v))
            && self.module.functions.iter().all(|&f| self.is_valid_function(f))
    }

    /// Finds a module-scope function by name.
    pub fn find_function(&self, symbol: Symbol) -> Option<Handle<Function>> {
        self.module
            .functions
            .iter()
            .copied()
            .find(|&f| self.functions[f].symbol == symbol)
    }

    /// Finds a module-scope function by name and pipeline stage.
    pub fn find_function_in_stage(
        &self,
        symbol: Symbol,
        stage: PipelineStage,
    ) -> Option<Handle<Function>> {
        self.module.functions.iter().copied().find(|&f| {
            let func = &self.functions[f];
            func.symbol == symbol && func.pipeline_stage() == Some(stage)
        })
    }

    /// `true` if any entry point runs in `stage`.
    pub fn has_stage(&self, stage: PipelineStage) -> bool {
        self.module
            .functions
            .iter()
            .any(|&f| self.functions[f].pipeline_stage() == Some(stage))
    }

    /// Entry point functions in declaration order.
    pub fn entry_points(&self) -> impl Iterator<Item = Handle<Function>> + '_ {
        self.module
            .functions
            .iter()
            .copied()
            .filter(|&f| self.functions[f].is_entry_point())
    }

    /// Reopens the program for modification.
    pub fn into_builder(self) -> ProgramBuilder {
        ProgramBuilder {
            program: self,
            source: Source::default(),
        }
    }
}

/// A mutable program under construction.
///
/// Dereferences to [`Program`] for read access.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
    /// Source assigned to nodes created by the convenience builders.
    pub(crate) source: Source,
}

impl Deref for ProgramBuilder {
    type Target = Program;

    fn deref(&self) -> &Program {
        &self.program
    }
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seals the builder into a read-only program.
    pub fn build(self) -> Program {
        self.program
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.program.symbols
    }

    pub fn types_mut(&mut self) -> &mut TypeManager {
        &mut self.program.types
    }

    pub fn module_mut(&mut self) -> &mut Module {
        &mut self.program.module
    }

    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticList {
        &mut self.program.diagnostics
    }

    pub fn expr_mut(&mut self, handle: Handle<Expression>) -> &mut Expression {
        &mut self.program.expressions[handle]
    }

    pub fn stmt_mut(&mut self, handle: Handle<Statement>) -> &mut Statement {
        &mut self.program.statements[handle]
    }

    pub fn var_mut(&mut self, handle: Handle<Variable>) -> &mut Variable {
        &mut self.program.variables[handle]
    }

    pub fn func_mut(&mut self, handle: Handle<Function>) -> &mut Function {
        &mut self.program.functions[handle]
    }

    pub fn set_resolved(&mut self, resolved: bool) {
        self.program.resolved = resolved;
    }

    pub fn create_expression(&mut self, expr: Expression) -> Handle<Expression> {
        self.program.expressions.append(expr)
    }

    pub fn create_statement(&mut self, stmt: Statement) -> Handle<Statement> {
        self.program.statements.append(stmt)
    }

    pub fn create_variable(&mut self, var: Variable) -> Handle<Variable> {
        self.program.variables.append(var)
    }

    pub fn create_function(&mut self, func: Function) -> Handle<Function> {
        self.program.functions.append(func)
    }

    pub fn add_constructed_type(&mut self, ty: Handle<Type>) {
        self.program.module.constructed_types.push(ty);
    }

    pub fn add_global_variable(&mut self, var: Handle<Variable>) {
        self.program.module.global_variables.push(var);
    }

    pub fn add_function(&mut self, func: Handle<Function>) {
        self.program.module.functions.push(func);
    }

    /// Marks `range` of the diagnostics as produced by semantic analysis, so
    /// the next [`clear_semantic_info`](Self::clear_semantic_info) drops them.
    pub fn set_semantic_diagnostics(&mut self, range: Range<usize>) {
        self.program.semantic_diagnostics = range;
    }

    /// Forgets every resolved type and function summary, along with the
    /// diagnostics the last semantic pass reported.
    pub fn clear_semantic_info(&mut self) {
        let range = std::mem::take(&mut self.program.semantic_diagnostics);
        self.program.diagnostics.remove_range(range);
        for (_, expr) in self.program.expressions.iter_mut() {
            expr.result_type = None;
        }
        for (_, func) in self.program.functions.iter_mut() {
            func.sem = Default::default();
        }
        self.program.resolved = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}

    #[test]
    fn programs_are_send() {
        assert_send::<Program>();
        assert_send::<ProgramBuilder>();
    }

    #[test]
    fn build_and_reopen() {
        let mut b = ProgramBuilder::new();
        let main = b.symbols_mut().register("main");
        let program = b.build();
        assert!(!program.is_resolved());
        assert!(program.is_valid());
        let b = program.into_builder();
        assert_eq!(b.symbols().get("main"), Some(main));
    }

    #[test]
    fn clearing_semantic_info_drops_marked_diagnostics() {
        let mut b = ProgramBuilder::new();
        b.diagnostics_mut().add_error("from the parser", Source::default());
        b.diagnostics_mut().add_warning("from the resolver", Source::default());
        b.set_semantic_diagnostics(1..2);
        b.set_resolved(true);
        b.clear_semantic_info();
        assert!(!b.is_resolved());
        assert_eq!(b.diagnostics().len(), 1);
        assert!(b.diagnostics().contains_message("from the parser"));

        b.clear_semantic_info();
        assert_eq!(b.diagnostics().len(), 1);
    }

    #[test]
    fn errors_make_program_invalid() {
        let mut b = ProgramBuilder::new();
        b.diagnostics_mut().add_error("oops", Source::default());
        assert!(!b.build().is_valid());
    }
}
