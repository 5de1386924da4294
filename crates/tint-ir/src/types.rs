//! Type system and the canonicalizing type manager.

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

use crate::arena::{Arena, Handle};
use crate::symbol::Symbol;
use crate::variable::StorageClass;

/// Number of components in a vector, or rows/columns of a matrix.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum VectorSize {
    /// 2 components.
    Bi = 2,
    /// 3 components.
    Tri = 3,
    /// 4 components.
    Quad = 4,
}

impl VectorSize {
    pub fn from_u32(n: u32) -> Option<Self> {
        match n {
            2 => Some(Self::Bi),
            3 => Some(Self::Tri),
            4 => Some(Self::Quad),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Size of an array.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ArraySize {
    /// Fixed-size array with this many elements.
    Sized(u32),
    /// Runtime-sized array (last member of a storage buffer block).
    Runtime,
}

/// Access qualifier of a storage resource.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum AccessControl {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl fmt::Display for AccessControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ReadOnly => "read_only",
            Self::WriteOnly => "write_only",
            Self::ReadWrite => "read_write",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum SamplerKind {
    Sampler,
    ComparisonSampler,
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum TextureDimension {
    D1,
    D2,
    D2Array,
    D3,
    Cube,
    CubeArray,
}

impl fmt::Display for TextureDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::D1 => "1d",
            Self::D2 => "2d",
            Self::D2Array => "2d_array",
            Self::D3 => "3d",
            Self::Cube => "cube",
            Self::CubeArray => "cube_array",
        };
        f.write_str(s)
    }
}

/// Texel formats accepted by storage textures.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum TexelFormat {
    R32Uint,
    R32Sint,
    R32Float,
    Rgba8Unorm,
    Rgba8Snorm,
    Rgba8Uint,
    Rgba8Sint,
    Rgba16Uint,
    Rgba16Sint,
    Rgba16Float,
    Rg32Uint,
    Rg32Sint,
    Rg32Float,
    Rgba32Uint,
    Rgba32Sint,
    Rgba32Float,
}

impl fmt::Display for TexelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::R32Uint => "r32uint",
            Self::R32Sint => "r32sint",
            Self::R32Float => "r32float",
            Self::Rgba8Unorm => "rgba8unorm",
            Self::Rgba8Snorm => "rgba8snorm",
            Self::Rgba8Uint => "rgba8uint",
            Self::Rgba8Sint => "rgba8sint",
            Self::Rgba16Uint => "rgba16uint",
            Self::Rgba16Sint => "rgba16sint",
            Self::Rgba16Float => "rgba16float",
            Self::Rg32Uint => "rg32uint",
            Self::Rg32Sint => "rg32sint",
            Self::Rg32Float => "rg32float",
            Self::Rgba32Uint => "rgba32uint",
            Self::Rgba32Sint => "rgba32sint",
            Self::Rgba32Float => "rgba32float",
        };
        f.write_str(s)
    }
}

/// What a texture holds.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum TextureKind {
    Sampled(Handle<Type>),
    Multisampled(Handle<Type>),
    Depth,
    Storage {
        format: TexelFormat,
        access: AccessControl,
    },
}

/// A member of a struct type.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct StructMember {
    pub name: Symbol,
    pub ty: Handle<Type>,
    /// Byte offset from the start of the struct.
    pub offset: u32,
}

/// A named struct type.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct StructType {
    pub name: Symbol,
    pub members: Vec<StructMember>,
    /// `[[block]]` decorated, i.e. usable as a buffer root.
    pub is_block: bool,
}

impl StructType {
    pub fn member(&self, name: Symbol) -> Option<&StructMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// A shader type. Composite types refer to their components by handle into
/// the owning [`TypeManager`].
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum Type {
    Void,
    Bool,
    I32,
    U32,
    F32,
    Vector {
        size: VectorSize,
        elem: Handle<Type>,
    },
    /// A matrix of `columns` column vectors with `rows` components each.
    Matrix {
        columns: VectorSize,
        rows: VectorSize,
        elem: Handle<Type>,
    },
    Array {
        elem: Handle<Type>,
        size: ArraySize,
        stride: Option<u32>,
    },
    Struct(StructType),
    Pointer {
        pointee: Handle<Type>,
        storage_class: StorageClass,
    },
    Alias {
        name: Symbol,
        subtype: Handle<Type>,
    },
    AccessControl {
        access: AccessControl,
        subtype: Handle<Type>,
    },
    Sampler(SamplerKind),
    Texture {
        dim: TextureDimension,
        kind: TextureKind,
    },
    /// Result type of expressions that failed to resolve.
    Invalid,
}

/// Owns every type of a program and hands out one handle per distinct type.
///
/// Types are canonicalized by their generated type name, so requesting a
/// structurally equal type twice yields the same handle.
#[derive(Debug, Default)]
pub struct TypeManager {
    types: Arena<Type>,
    by_name: HashMap<String, Handle<Type>>,
}

impl TypeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the canonical handle for `ty`, registering it if needed.
    pub fn get(&mut self, ty: Type) -> Handle<Type> {
        let name = self.name_of(&ty);
        if let Some(&handle) = self.by_name.get(&name) {
            return handle;
        }
        let handle = self.types.append(ty);
        self.by_name.insert(name, handle);
        handle
    }

    /// Looks up a registered type by its generated type name.
    pub fn find(&self, type_name: &str) -> Option<Handle<Type>> {
        self.by_name.get(type_name).copied()
    }

    /// Drops every registered type.
    ///
    /// Handles obtained before the reset are stale; using one to index the
    /// manager panics.
    pub fn reset(&mut self) {
        self.types.reset();
        self.by_name.clear();
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn contains(&self, handle: Handle<Type>) -> bool {
        self.types.contains(handle)
    }

    pub fn try_get(&self, handle: Handle<Type>) -> Option<&Type> {
        self.types.try_get(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<Type>, &Type)> {
        self.types.iter()
    }

    /// The unique generated name of a registered type, e.g. `__vec_3__f32`.
    pub fn type_name(&self, handle: Handle<Type>) -> String {
        self.name_of(&self.types[handle])
    }

    fn name_of(&self, ty: &Type) -> String {
        match ty {
            Type::Void => "__void".into(),
            Type::Bool => "__bool".into(),
            Type::I32 => "__i32".into(),
            Type::U32 => "__u32".into(),
            Type::F32 => "__f32".into(),
            Type::Vector { size, elem } => {
                format!("__vec_{}{}", size.as_u32(), self.type_name(*elem))
            }
            Type::Matrix {
                columns,
                rows,
                elem,
            } => format!(
                "__mat_{}_{}{}",
                rows.as_u32(),
                columns.as_u32(),
                self.type_name(*elem)
            ),
            Type::Array { elem, size, stride } => {
                let mut name = format!("__array{}", self.type_name(*elem));
                if let ArraySize::Sized(n) = size {
                    name.push_str(&format!("_{n}"));
                }
                if let Some(stride) = stride {
                    name.push_str(&format!("_stride_{stride}"));
                }
                name
            }
            Type::Struct(s) => format!("__struct_{}", s.name.to_str()),
            Type::Pointer {
                pointee,
                storage_class,
            } => format!("__ptr_{storage_class}{}", self.type_name(*pointee)),
            Type::Alias { name, subtype } => {
                format!("__alias_{}{}", name.to_str(), self.type_name(*subtype))
            }
            Type::AccessControl { access, subtype } => {
                format!("__access_control_{access}{}", self.type_name(*subtype))
            }
            Type::Sampler(SamplerKind::Sampler) => "__sampler_sampler".into(),
            Type::Sampler(SamplerKind::ComparisonSampler) => "__sampler_comparison".into(),
            Type::Texture { dim, kind } => match kind {
                TextureKind::Sampled(t) => {
                    format!("__sampled_texture_{dim}{}", self.type_name(*t))
                }
                TextureKind::Multisampled(t) => {
                    format!("__multisampled_texture_{dim}{}", self.type_name(*t))
                }
                TextureKind::Depth => format!("__depth_texture_{dim}"),
                TextureKind::Storage { format, access } => {
                    format!("__storage_texture_{access}_{dim}_{format}")
                }
            },
            Type::Invalid => "__invalid".into(),
        }
    }

    // Convenience constructors.

    pub fn void(&mut self) -> Handle<Type> {
        self.get(Type::Void)
    }

    pub fn bool(&mut self) -> Handle<Type> {
        self.get(Type::Bool)
    }

    pub fn i32(&mut self) -> Handle<Type> {
        self.get(Type::I32)
    }

    pub fn u32(&mut self) -> Handle<Type> {
        self.get(Type::U32)
    }

    pub fn f32(&mut self) -> Handle<Type> {
        self.get(Type::F32)
    }

    pub fn invalid(&mut self) -> Handle<Type> {
        self.get(Type::Invalid)
    }

    pub fn vec(&mut self, size: VectorSize, elem: Handle<Type>) -> Handle<Type> {
        self.get(Type::Vector { size, elem })
    }

    pub fn mat(
        &mut self,
        columns: VectorSize,
        rows: VectorSize,
        elem: Handle<Type>,
    ) -> Handle<Type> {
        self.get(Type::Matrix {
            columns,
            rows,
            elem,
        })
    }

    pub fn array(
        &mut self,
        elem: Handle<Type>,
        size: ArraySize,
        stride: Option<u32>,
    ) -> Handle<Type> {
        self.get(Type::Array { elem, size, stride })
    }

    pub fn pointer(&mut self, pointee: Handle<Type>, storage_class: StorageClass) -> Handle<Type> {
        self.get(Type::Pointer {
            pointee,
            storage_class,
        })
    }

    pub fn alias(&mut self, name: Symbol, subtype: Handle<Type>) -> Handle<Type> {
        self.get(Type::Alias { name, subtype })
    }

    pub fn access(&mut self, access: AccessControl, subtype: Handle<Type>) -> Handle<Type> {
        self.get(Type::AccessControl { access, subtype })
    }

    pub fn structure(&mut self, ty: StructType) -> Handle<Type> {
        self.get(Type::Struct(ty))
    }

    pub fn sampler(&mut self, kind: SamplerKind) -> Handle<Type> {
        self.get(Type::Sampler(kind))
    }

    pub fn texture(&mut self, dim: TextureDimension, kind: TextureKind) -> Handle<Type> {
        self.get(Type::Texture { dim, kind })
    }

    // Unwrapping.

    /// Returns the pointee if `handle` is a pointer, `handle` otherwise.
    pub fn unwrap_ptr_if_needed(&self, handle: Handle<Type>) -> Handle<Type> {
        match self.types[handle] {
            Type::Pointer { pointee, .. } => pointee,
            _ => handle,
        }
    }

    /// Strips every layer of aliasing and access control.
    pub fn unwrap_if_needed(&self, mut handle: Handle<Type>) -> Handle<Type> {
        loop {
            match self.types[handle] {
                Type::Alias { subtype, .. } | Type::AccessControl { subtype, .. } => {
                    handle = subtype
                }
                _ => return handle,
            }
        }
    }

    /// Strips aliases and access control, then one pointer, then aliases and
    /// access control again.
    pub fn unwrap_all(&self, handle: Handle<Type>) -> Handle<Type> {
        let inner = self.unwrap_ptr_if_needed(self.unwrap_if_needed(handle));
        self.unwrap_if_needed(inner)
    }

    /// Element type of a vector, or `handle` itself for anything else.
    pub fn element_or_self(&self, handle: Handle<Type>) -> Handle<Type> {
        match self.types[handle] {
            Type::Vector { elem, .. } => elem,
            _ => handle,
        }
    }

    pub fn as_struct(&self, handle: Handle<Type>) -> Option<&StructType> {
        match &self.types[handle] {
            Type::Struct(s) => Some(s),
            _ => None,
        }
    }

    // Predicates. These look at the type itself and do not unwrap.

    pub fn is_void(&self, handle: Handle<Type>) -> bool {
        matches!(self.types[handle], Type::Void)
    }

    pub fn is_invalid(&self, handle: Handle<Type>) -> bool {
        matches!(self.types[handle], Type::Invalid)
    }

    pub fn is_pointer(&self, handle: Handle<Type>) -> bool {
        matches!(self.types[handle], Type::Pointer { .. })
    }

    pub fn is_scalar(&self, handle: Handle<Type>) -> bool {
        self.is_float_scalar(handle)
            || self.is_integer_scalar(handle)
            || matches!(self.types[handle], Type::Bool)
    }

    pub fn is_float_scalar(&self, handle: Handle<Type>) -> bool {
        matches!(self.types[handle], Type::F32)
    }

    pub fn is_float_matrix(&self, handle: Handle<Type>) -> bool {
        matches!(self.types[handle], Type::Matrix { elem, .. } if self.is_float_scalar(elem))
    }

    pub fn is_float_vector(&self, handle: Handle<Type>) -> bool {
        matches!(self.types[handle], Type::Vector { elem, .. } if self.is_float_scalar(elem))
    }

    pub fn is_float_scalar_or_vector(&self, handle: Handle<Type>) -> bool {
        self.is_float_scalar(handle) || self.is_float_vector(handle)
    }

    pub fn is_integer_scalar(&self, handle: Handle<Type>) -> bool {
        matches!(self.types[handle], Type::I32 | Type::U32)
    }

    pub fn is_signed_integer_vector(&self, handle: Handle<Type>) -> bool {
        matches!(self.types[handle], Type::Vector { elem, .. } if self.types[elem] == Type::I32)
    }

    pub fn is_unsigned_integer_vector(&self, handle: Handle<Type>) -> bool {
        matches!(self.types[handle], Type::Vector { elem, .. } if self.types[elem] == Type::U32)
    }

    pub fn is_unsigned_scalar_or_vector(&self, handle: Handle<Type>) -> bool {
        matches!(self.types[handle], Type::U32) || self.is_unsigned_integer_vector(handle)
    }

    pub fn is_signed_scalar_or_vector(&self, handle: Handle<Type>) -> bool {
        matches!(self.types[handle], Type::I32) || self.is_signed_integer_vector(handle)
    }

    pub fn is_integer_scalar_or_vector(&self, handle: Handle<Type>) -> bool {
        self.is_unsigned_scalar_or_vector(handle) || self.is_signed_scalar_or_vector(handle)
    }

    pub fn is_bool_scalar_or_vector(&self, handle: Handle<Type>) -> bool {
        match self.types[handle] {
            Type::Bool => true,
            Type::Vector { elem, .. } => matches!(self.types[elem], Type::Bool),
            _ => false,
        }
    }

    /// Whether values of this type may live in a uniform or storage buffer.
    pub fn is_host_shareable(&self, handle: Handle<Type>) -> bool {
        match &self.types[handle] {
            Type::I32 | Type::U32 | Type::F32 => true,
            Type::Vector { elem, .. } | Type::Matrix { elem, .. } | Type::Array { elem, .. } => {
                self.is_host_shareable(*elem)
            }
            Type::Struct(s) => s.members.iter().all(|m| self.is_host_shareable(m.ty)),
            Type::Alias { subtype, .. } | Type::AccessControl { subtype, .. } => {
                self.is_host_shareable(*subtype)
            }
            _ => false,
        }
    }
}

impl Index<Handle<Type>> for TypeManager {
    type Output = Type;

    fn index(&self, handle: Handle<Type>) -> &Type {
        &self.types[handle]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolTable;

    #[test]
    fn canonicalizes_equal_requests() {
        let mut types = TypeManager::new();
        let f0 = types.f32();
        let f1 = types.get(Type::F32);
        assert_eq!(f0, f1);
        let v0 = types.vec(VectorSize::Tri, f0);
        let v1 = types.vec(VectorSize::Tri, f1);
        assert_eq!(v0, v1);
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn distinct_types_get_distinct_handles() {
        let mut types = TypeManager::new();
        let f = types.f32();
        let i = types.i32();
        let v3 = types.vec(VectorSize::Tri, f);
        let v4 = types.vec(VectorSize::Quad, f);
        assert_ne!(f, i);
        assert_ne!(v3, v4);
    }

    #[test]
    fn generated_type_names() {
        let mut symbols = SymbolTable::new();
        let mut types = TypeManager::new();
        let f = types.f32();
        let v3 = types.vec(VectorSize::Tri, f);
        let m = types.mat(VectorSize::Quad, VectorSize::Bi, f);
        let arr = types.array(f, ArraySize::Sized(4), Some(16));
        let rt = types.array(f, ArraySize::Runtime, None);
        let ptr = types.pointer(f, StorageClass::Function);
        let a = symbols.register("A");
        let s = symbols.register("S");
        let alias = types.alias(a, f);
        let st = types.structure(StructType {
            name: s,
            members: vec![],
            is_block: false,
        });
        let ro = types.access(AccessControl::ReadOnly, st);

        assert_eq!(types.type_name(f), "__f32");
        assert_eq!(types.type_name(v3), "__vec_3__f32");
        assert_eq!(types.type_name(m), "__mat_2_4__f32");
        assert_eq!(types.type_name(arr), "__array__f32_4_stride_16");
        assert_eq!(types.type_name(rt), "__array__f32");
        assert_eq!(types.type_name(ptr), "__ptr_function__f32");
        assert_eq!(types.type_name(alias), "__alias_$0__f32");
        assert_eq!(types.type_name(st), "__struct_$1");
        assert_eq!(types.type_name(ro), "__access_control_read_only__struct_$1");
        assert_eq!(types.find("__vec_3__f32"), Some(v3));
    }

    #[test]
    fn reset_yields_new_identity() {
        let mut types = TypeManager::new();
        let before = types.f32();
        types.reset();
        assert!(types.is_empty());
        assert_eq!(types.try_get(before), None);
        let after = types.f32();
        assert_ne!(before, after);
        assert_eq!(types[after], Type::F32);
    }

    #[test]
    fn unwrap_all_strips_alias_pointer_alias() {
        let mut symbols = SymbolTable::new();
        let mut types = TypeManager::new();
        let f = types.f32();
        let inner_alias = types.alias(symbols.register("Inner"), f);
        let ptr = types.pointer(inner_alias, StorageClass::Private);
        let outer = types.alias(symbols.register("Outer"), ptr);
        let access = types.access(AccessControl::ReadWrite, outer);

        assert_eq!(types.unwrap_if_needed(access), ptr);
        assert_eq!(types.unwrap_ptr_if_needed(ptr), inner_alias);
        assert_eq!(types.unwrap_all(access), f);
        assert_eq!(types.unwrap_ptr_if_needed(f), f);
    }

    #[test]
    fn predicates() {
        let mut types = TypeManager::new();
        let f = types.f32();
        let u = types.u32();
        let i = types.i32();
        let b = types.bool();
        let vf = types.vec(VectorSize::Bi, f);
        let vu = types.vec(VectorSize::Tri, u);
        let vi = types.vec(VectorSize::Quad, i);
        let vb = types.vec(VectorSize::Bi, b);
        let m = types.mat(VectorSize::Bi, VectorSize::Bi, f);

        assert!(types.is_scalar(b));
        assert!(types.is_float_scalar_or_vector(vf));
        assert!(types.is_float_matrix(m));
        assert!(!types.is_float_vector(m));
        assert!(types.is_integer_scalar(u));
        assert!(!types.is_integer_scalar(f));
        assert!(types.is_unsigned_scalar_or_vector(vu));
        assert!(types.is_signed_scalar_or_vector(vi));
        assert!(types.is_integer_scalar_or_vector(vi));
        assert!(!types.is_integer_scalar_or_vector(vf));
        assert!(types.is_bool_scalar_or_vector(vb));
        assert!(!types.is_host_shareable(vb));
        assert!(types.is_host_shareable(m));
    }
}
