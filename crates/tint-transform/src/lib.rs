//! Program-to-program rewrites for the tint shader AST.
//!
//! A [`Transform`] reads a resolved [`Program`] and produces a new one,
//! usually by cloning it through a [`CloneContext`] with replacement hooks
//! installed. The [`Manager`] chains transforms and re-resolves between them.

mod bound_array_accessors;
mod emit_vertex_point_size;
mod manager;
mod single_entry_point;

pub use bound_array_accessors::BoundArrayAccessors;
pub use emit_vertex_point_size::EmitVertexPointSize;
pub use manager::Manager;
pub use single_entry_point::SingleEntryPoint;

use std::fmt::Debug;

use tint_ir::{
    CloneContext, DiagnosticList, Function, FunctionSemantics, Handle, Program, Source, Statement,
    StatementKind,
};

/// A rewrite of a whole program.
pub trait Transform: Debug {
    /// Human-readable name of the transform.
    fn name(&self) -> &str;

    /// Runs the transform. The input is expected to be resolved.
    fn run(&self, program: &Program) -> Output;
}

/// Result of running a [`Transform`].
#[derive(Debug, Default)]
pub struct Output {
    /// The transformed program. `None` only when the transform failed before
    /// producing anything.
    pub program: Option<Program>,
    pub diagnostics: DiagnosticList,
}

impl Output {
    pub fn new(program: Program) -> Self {
        Self {
            program: Some(program),
            diagnostics: DiagnosticList::new(),
        }
    }

    /// A failed run with a single error and no program.
    pub fn error(message: impl Into<String>, source: Source) -> Self {
        let mut diagnostics = DiagnosticList::new();
        diagnostics.add_error(message, source);
        Self {
            program: None,
            diagnostics,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.contains_errors()
            || self
                .program
                .as_ref()
                .is_some_and(|p| p.diagnostics().contains_errors())
    }
}

/// Clones `func` with `statements` (destination handles) placed before the
/// cloned body. Later clones of `func` through `ctx` yield the new function.
pub fn clone_with_statements_at_start<'a>(
    ctx: &mut CloneContext<'a>,
    func: Handle<Function>,
    statements: Vec<Handle<Statement>>,
) -> Handle<Function> {
    let src: &'a Program = ctx.src;
    let f = src.func(func);
    let symbol = ctx.clone_symbol(f.symbol);
    let params = f.params.iter().map(|&p| ctx.clone_variable(p)).collect();
    let return_type = ctx.clone_type(f.return_type);

    let mut body = statements;
    match src.stmt(f.body).as_block() {
        Some(list) => body.extend(ctx.clone_statements(list)),
        None => body.push(ctx.clone_statement(f.body)),
    }
    let body_source = ctx.clone_source(&src.stmt(f.body).source);
    let body = ctx
        .dst
        .create_statement(Statement::new(StatementKind::Block(body), body_source));

    let cloned = ctx.dst.create_function(Function {
        symbol,
        params,
        return_type,
        body,
        decorations: f.decorations.clone(),
        source: ctx.clone_source(&f.source),
        sem: FunctionSemantics::default(),
    });
    ctx.replace_function(func, cloned);
    cloned
}

/// Fails a transform that needs type information on an unresolved input.
fn require_resolved(name: &str, program: &Program) -> Option<Output> {
    (!program.is_resolved()).then(|| {
        Output::error(
            format!("{name} requires a resolved program"),
            Source::default(),
        )
    })
}
