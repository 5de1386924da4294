//! Variables, storage classes and variable decorations.

use std::fmt;

use crate::arena::Handle;
use crate::expr::Expression;
use crate::source::Source;
use crate::symbol::Symbol;
use crate::types::Type;

/// Where a variable lives.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum StorageClass {
    /// No storage class; used for `const` declarations and parameters.
    None,
    Input,
    Output,
    Uniform,
    Workgroup,
    /// Handle types (samplers and textures) at module scope.
    UniformConstant,
    Storage,
    Image,
    Private,
    Function,
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Input => "in",
            Self::Output => "out",
            Self::Uniform => "uniform",
            Self::Workgroup => "workgroup",
            Self::UniformConstant => "uniform_constant",
            Self::Storage => "storage",
            Self::Image => "image",
            Self::Private => "private",
            Self::Function => "function",
        };
        f.write_str(s)
    }
}

/// A pipeline built-in value.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Builtin {
    Position,
    VertexIndex,
    InstanceIndex,
    FrontFacing,
    FragCoord,
    FragDepth,
    LocalInvocationId,
    LocalInvocationIndex,
    GlobalInvocationId,
    SampleIndex,
    SampleMask,
    PointSize,
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Position => "position",
            Self::VertexIndex => "vertex_index",
            Self::InstanceIndex => "instance_index",
            Self::FrontFacing => "front_facing",
            Self::FragCoord => "frag_coord",
            Self::FragDepth => "frag_depth",
            Self::LocalInvocationId => "local_invocation_id",
            Self::LocalInvocationIndex => "local_invocation_index",
            Self::GlobalInvocationId => "global_invocation_id",
            Self::SampleIndex => "sample_index",
            Self::SampleMask => "sample_mask",
            Self::PointSize => "pointsize",
        };
        f.write_str(s)
    }
}

/// `[[...]]` decorations on a variable.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum VariableDecoration {
    Binding(u32),
    Group(u32),
    Location(u32),
    Builtin(Builtin),
    ConstantId(u32),
}

impl fmt::Display for VariableDecoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binding(v) => write!(f, "BindingDecoration{{{v}}}"),
            Self::Group(v) => write!(f, "GroupDecoration{{{v}}}"),
            Self::Location(v) => write!(f, "LocationDecoration{{{v}}}"),
            Self::Builtin(b) => write!(f, "BuiltinDecoration{{{b}}}"),
            Self::ConstantId(v) => write!(f, "ConstantIdDecoration{{{v}}}"),
        }
    }
}

/// A `var`, `const` or function parameter declaration.
#[derive(Clone, Debug)]
pub struct Variable {
    pub symbol: Symbol,
    pub storage_class: StorageClass,
    pub ty: Handle<Type>,
    pub is_const: bool,
    pub constructor: Option<Handle<Expression>>,
    pub decorations: Vec<VariableDecoration>,
    pub source: Source,
}

impl Variable {
    pub fn binding(&self) -> Option<u32> {
        self.decorations.iter().find_map(|d| match d {
            VariableDecoration::Binding(v) => Some(*v),
            _ => None,
        })
    }

    pub fn group(&self) -> Option<u32> {
        self.decorations.iter().find_map(|d| match d {
            VariableDecoration::Group(v) => Some(*v),
            _ => None,
        })
    }

    pub fn location(&self) -> Option<u32> {
        self.decorations.iter().find_map(|d| match d {
            VariableDecoration::Location(v) => Some(*v),
            _ => None,
        })
    }

    pub fn builtin(&self) -> Option<Builtin> {
        self.decorations.iter().find_map(|d| match d {
            VariableDecoration::Builtin(b) => Some(*b),
            _ => None,
        })
    }

    pub fn constant_id(&self) -> Option<u32> {
        self.decorations.iter().find_map(|d| match d {
            VariableDecoration::ConstantId(v) => Some(*v),
            _ => None,
        })
    }

    /// `true` when both `group` and `binding` are present.
    pub fn has_binding_point(&self) -> bool {
        self.binding().is_some() && self.group().is_some()
    }
}
