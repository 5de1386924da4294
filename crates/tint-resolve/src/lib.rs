//! Type and semantic resolution for the tint shader AST.
//!
//! [`resolve`] annotates every expression of a [`ProgramBuilder`] with its
//! type and every function with the module variables it references, its
//! callees and the entry points that reach it. Problems are reported as
//! diagnostics on the builder.

mod call_graph;
mod error;
mod intrinsic;
mod resolver;
mod scope;
mod validate;

pub use error::ResolveError;
pub use intrinsic::{Intrinsic, match_overload};
pub use resolver::Resolver;

use tint_ir::{Program, ProgramBuilder};

/// Knobs for the resolver.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResolverOptions {
    /// Report unreachable statements as errors instead of warnings.
    pub unreachable_is_error: bool,
}

/// Resolves `builder` with default options. Returns `true` on success.
pub fn resolve(builder: &mut ProgramBuilder) -> bool {
    Resolver::new(builder, ResolverOptions::default()).resolve()
}

pub fn resolve_with_options(builder: &mut ProgramBuilder, options: ResolverOptions) -> bool {
    Resolver::new(builder, options).resolve()
}

/// Resolves a finished program. Diagnostics end up on the returned program;
/// check [`Program::is_valid`].
pub fn resolve_program(program: Program) -> Program {
    let mut builder = program.into_builder();
    resolve(&mut builder);
    builder.build()
}
