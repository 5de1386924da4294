//! tint intermediate representation.
//!
//! A typed shader AST stored in per-program arenas, together with the
//! symbol table, the canonicalizing type manager with buffer layout rules,
//! the [`Program`] / [`ProgramBuilder`] containers and the [`CloneContext`]
//! every rewrite pass is built on.

pub mod arena;
mod builder;
mod clone;
mod diagnostic;
mod display;
mod error;
mod expr;
mod func;
mod layout;
mod node;
mod program;
mod source;
mod stmt;
mod symbol;
mod types;
mod variable;

pub use arena::{Arena, ArenaId, Handle, UniqueArena};
pub use clone::{CloneContext, ExpressionReplacer, clone_program};
pub use diagnostic::{Diagnostic, DiagnosticList, Severity};
pub use display::format_type;
pub use error::IrError;
pub use expr::{BinaryOp, Expression, ExpressionKind, Literal, UnaryOp};
pub use func::{BindingInfo, Function, FunctionDecoration, FunctionSemantics, PipelineStage};
pub use layout::MemoryLayout;
pub use node::Node;
pub use program::{Module, Program, ProgramBuilder};
pub use source::Source;
pub use stmt::{CaseStatement, Statement, StatementKind};
pub use symbol::{Symbol, SymbolTable};
pub use types::{
    AccessControl, ArraySize, SamplerKind, StructMember, StructType, TexelFormat,
    TextureDimension, TextureKind, Type, TypeManager, VectorSize,
};
pub use variable::{Builtin, StorageClass, Variable, VariableDecoration};
