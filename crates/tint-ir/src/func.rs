//! Functions, pipeline stages and the per-function semantic summary.

use std::fmt;

use indexmap::IndexSet;

use crate::arena::Handle;
use crate::program::Program;
use crate::source::Source;
use crate::stmt::Statement;
use crate::symbol::Symbol;
use crate::types::{SamplerKind, TextureKind, Type};
use crate::variable::{Builtin, StorageClass, Variable};

/// The pipeline stage an entry point runs in.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum PipelineStage {
    Vertex,
    Fragment,
    Compute,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
            Self::Compute => f.write_str("compute"),
        }
    }
}

/// `[[...]]` decorations on a function.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum FunctionDecoration {
    Stage(PipelineStage),
    WorkgroupSize(u32, u32, u32),
}

impl fmt::Display for FunctionDecoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stage(stage) => write!(f, "StageDecoration{{{stage}}}"),
            Self::WorkgroupSize(x, y, z) => write!(f, "WorkgroupDecoration{{{x} {y} {z}}}"),
        }
    }
}

/// Group and binding numbers of a resource variable.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct BindingInfo {
    pub group: u32,
    pub binding: u32,
}

/// What the resolver learned about a function.
///
/// Never copied by the clone context; a cloned function starts empty and
/// is refilled when the clone is resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FunctionSemantics {
    /// Module-scope variables used directly or by any callee.
    pub referenced_module_variables: IndexSet<Handle<Variable>>,
    /// Module-scope variables used directly in this function's body.
    pub local_referenced_module_variables: IndexSet<Handle<Variable>>,
    /// Entry points from which this function is reachable, each listed once.
    pub ancestor_entry_points: IndexSet<Symbol>,
    /// Functions called directly from this function's body.
    pub callees: IndexSet<Handle<Function>>,
}

/// A function declaration.
#[derive(Clone, Debug)]
pub struct Function {
    pub symbol: Symbol,
    pub params: Vec<Handle<Variable>>,
    pub return_type: Handle<Type>,
    /// A [`StatementKind::Block`](crate::StatementKind::Block).
    pub body: Handle<Statement>,
    pub decorations: Vec<FunctionDecoration>,
    pub source: Source,
    pub sem: FunctionSemantics,
}

impl Function {
    /// The stage decoration, or `None` for ordinary functions.
    pub fn pipeline_stage(&self) -> Option<PipelineStage> {
        self.decorations.iter().find_map(|d| match d {
            FunctionDecoration::Stage(stage) => Some(*stage),
            _ => None,
        })
    }

    pub fn is_entry_point(&self) -> bool {
        self.pipeline_stage().is_some()
    }

    /// The declared workgroup size, `(1, 1, 1)` when none was given.
    pub fn workgroup_size(&self) -> (u32, u32, u32) {
        self.decorations
            .iter()
            .find_map(|d| match d {
                FunctionDecoration::WorkgroupSize(x, y, z) => Some((*x, *y, *z)),
                _ => None,
            })
            .unwrap_or((1, 1, 1))
    }

    pub fn has_ancestor_entry_point(&self, entry_point: Symbol) -> bool {
        self.sem.ancestor_entry_points.contains(&entry_point)
    }

    /// The last statement of the body, if the body is not empty.
    pub fn last_statement(&self, program: &Program) -> Option<Handle<Statement>> {
        program.stmt(self.body).as_block()?.last().copied()
    }

    /// Unique name built from the return and parameter types.
    pub fn type_name(&self, program: &Program) -> String {
        let types = program.types();
        let mut out = format!("__func{}", types.type_name(self.return_type));
        for &param in &self.params {
            out.push_str(&format!("__{}", types.type_name(program.var(param).ty)));
        }
        out
    }

    pub fn referenced_location_variables(&self, program: &Program) -> Vec<(Handle<Variable>, u32)> {
        self.sem
            .referenced_module_variables
            .iter()
            .filter_map(|&v| program.var(v).location().map(|loc| (v, loc)))
            .collect()
    }

    pub fn referenced_builtin_variables(
        &self,
        program: &Program,
    ) -> Vec<(Handle<Variable>, Builtin)> {
        builtins_of(program, &self.sem.referenced_module_variables)
    }

    /// Built-in variables used directly by this function (not by callees).
    pub fn local_referenced_builtin_variables(
        &self,
        program: &Program,
    ) -> Vec<(Handle<Variable>, Builtin)> {
        builtins_of(program, &self.sem.local_referenced_module_variables)
    }

    pub fn referenced_uniform_variables(
        &self,
        program: &Program,
    ) -> Vec<(Handle<Variable>, BindingInfo)> {
        self.bound_variables(program, |p, v| p.var(v).storage_class == StorageClass::Uniform)
    }

    pub fn referenced_storagebuffer_variables(
        &self,
        program: &Program,
    ) -> Vec<(Handle<Variable>, BindingInfo)> {
        self.bound_variables(program, |p, v| p.var(v).storage_class == StorageClass::Storage)
    }

    pub fn referenced_sampler_variables(
        &self,
        program: &Program,
    ) -> Vec<(Handle<Variable>, BindingInfo)> {
        self.sampler_variables(program, SamplerKind::Sampler)
    }

    pub fn referenced_comparison_sampler_variables(
        &self,
        program: &Program,
    ) -> Vec<(Handle<Variable>, BindingInfo)> {
        self.sampler_variables(program, SamplerKind::ComparisonSampler)
    }

    pub fn referenced_sampled_texture_variables(
        &self,
        program: &Program,
    ) -> Vec<(Handle<Variable>, BindingInfo)> {
        self.bound_variables(program, |p, v| {
            matches!(
                texture_kind(p, v),
                Some(TextureKind::Sampled(_))
            )
        })
    }

    pub fn referenced_multisampled_texture_variables(
        &self,
        program: &Program,
    ) -> Vec<(Handle<Variable>, BindingInfo)> {
        self.bound_variables(program, |p, v| {
            matches!(
                texture_kind(p, v),
                Some(TextureKind::Multisampled(_))
            )
        })
    }

    fn sampler_variables(
        &self,
        program: &Program,
        kind: SamplerKind,
    ) -> Vec<(Handle<Variable>, BindingInfo)> {
        self.bound_variables(program, |p, v| {
            let ty = p.types().unwrap_if_needed(p.var(v).ty);
            p.types()[ty] == Type::Sampler(kind)
        })
    }

    /// Referenced module variables matching `filter` that carry both a group
    /// and a binding decoration.
    fn bound_variables(
        &self,
        program: &Program,
        filter: impl Fn(&Program, Handle<Variable>) -> bool,
    ) -> Vec<(Handle<Variable>, BindingInfo)> {
        self.sem
            .referenced_module_variables
            .iter()
            .filter(|&&v| filter(program, v))
            .filter_map(|&v| {
                let var = program.var(v);
                Some((
                    v,
                    BindingInfo {
                        group: var.group()?,
                        binding: var.binding()?,
                    },
                ))
            })
            .collect()
    }
}

fn builtins_of(
    program: &Program,
    vars: &IndexSet<Handle<Variable>>,
) -> Vec<(Handle<Variable>, Builtin)> {
    vars.iter()
        .filter_map(|&v| program.var(v).builtin().map(|b| (v, b)))
        .collect()
}

fn texture_kind(program: &Program, var: Handle<Variable>) -> Option<TextureKind> {
    let ty = program.types().unwrap_if_needed(program.var(var).ty);
    match program.types()[ty] {
        Type::Texture { kind, .. } => Some(kind),
        _ => None,
    }
}
