//! Buffer memory layout rules.
//!
//! Sizes and alignments are in bytes. Types that cannot be placed in a
//! buffer (bool, pointers, samplers, textures, void) report 0 for both.

use crate::arena::Handle;
use crate::types::{ArraySize, Type, TypeManager, VectorSize};

/// Which buffer layout rules to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemoryLayout {
    UniformBuffer,
    StorageBuffer,
}

fn round_up(alignment: u64, value: u64) -> u64 {
    if alignment == 0 {
        return value;
    }
    value.div_ceil(alignment) * alignment
}

fn vector_size(size: VectorSize) -> u64 {
    u64::from(size.as_u32()) * 4
}

fn vector_alignment(size: VectorSize) -> u64 {
    match size {
        VectorSize::Bi => 8,
        VectorSize::Tri | VectorSize::Quad => 16,
    }
}

fn array_alignment(elem_alignment: u64, layout: MemoryLayout) -> u64 {
    match layout {
        MemoryLayout::UniformBuffer => round_up(16, elem_alignment),
        MemoryLayout::StorageBuffer => elem_alignment,
    }
}

impl TypeManager {
    /// Minimum number of bytes a buffer binding of this type must span.
    pub fn min_buffer_binding_size(&self, handle: Handle<Type>, layout: MemoryLayout) -> u64 {
        match &self[handle] {
            Type::I32 | Type::U32 | Type::F32 => 4,
            Type::Vector { size, .. } => vector_size(*size),
            Type::Matrix { columns, rows, .. } => {
                (u64::from(columns.as_u32()) - 1) * vector_alignment(*rows) + vector_size(*rows)
            }
            Type::Array { size, stride, .. } => match (stride, size) {
                (None, _) => 0,
                (Some(stride), ArraySize::Runtime) => u64::from(*stride),
                (Some(stride), ArraySize::Sized(n)) => u64::from(*n) * u64::from(*stride),
            },
            Type::Struct(s) => {
                let Some(last) = s.members.last() else {
                    return 0;
                };
                let size = u64::from(last.offset) + self.min_buffer_binding_size(last.ty, layout);
                match layout {
                    MemoryLayout::UniformBuffer => round_up(16, size),
                    MemoryLayout::StorageBuffer => size,
                }
            }
            Type::Alias { subtype, .. } | Type::AccessControl { subtype, .. } => {
                self.min_buffer_binding_size(*subtype, layout)
            }
            Type::Void
            | Type::Bool
            | Type::Pointer { .. }
            | Type::Sampler(_)
            | Type::Texture { .. }
            | Type::Invalid => 0,
        }
    }

    /// Required alignment of this type inside a buffer.
    pub fn base_alignment(&self, handle: Handle<Type>, layout: MemoryLayout) -> u64 {
        match &self[handle] {
            Type::I32 | Type::U32 | Type::F32 => 4,
            Type::Vector { size, .. } => vector_alignment(*size),
            // Same as array<vecR, C> with a stride of align(vecR).
            Type::Matrix { rows, .. } => array_alignment(vector_alignment(*rows), layout),
            Type::Array { elem, .. } => array_alignment(self.base_alignment(*elem, layout), layout),
            Type::Struct(s) => {
                let max = s
                    .members
                    .iter()
                    .map(|m| self.base_alignment(m.ty, layout))
                    .max()
                    .unwrap_or(0);
                match layout {
                    MemoryLayout::UniformBuffer => round_up(16, max),
                    MemoryLayout::StorageBuffer => max,
                }
            }
            Type::Alias { subtype, .. } | Type::AccessControl { subtype, .. } => {
                self.base_alignment(*subtype, layout)
            }
            Type::Void
            | Type::Bool
            | Type::Pointer { .. }
            | Type::Sampler(_)
            | Type::Texture { .. }
            | Type::Invalid => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolTable;
    use crate::types::{AccessControl, SamplerKind, StructMember, StructType};
    use crate::variable::StorageClass;

    use MemoryLayout::{StorageBuffer, UniformBuffer};

    #[test]
    fn scalars_and_vectors() {
        let mut types = TypeManager::new();
        let f = types.f32();
        let b = types.bool();
        assert_eq!(types.min_buffer_binding_size(f, UniformBuffer), 4);
        assert_eq!(types.base_alignment(f, StorageBuffer), 4);
        assert_eq!(types.min_buffer_binding_size(b, StorageBuffer), 0);
        assert_eq!(types.base_alignment(b, StorageBuffer), 0);

        let v2 = types.vec(VectorSize::Bi, f);
        let v3 = types.vec(VectorSize::Tri, f);
        let v4 = types.vec(VectorSize::Quad, f);
        assert_eq!(types.min_buffer_binding_size(v2, UniformBuffer), 8);
        assert_eq!(types.min_buffer_binding_size(v3, UniformBuffer), 12);
        assert_eq!(types.min_buffer_binding_size(v4, UniformBuffer), 16);
        assert_eq!(types.base_alignment(v2, UniformBuffer), 8);
        assert_eq!(types.base_alignment(v3, UniformBuffer), 16);
        assert_eq!(types.base_alignment(v4, UniformBuffer), 16);
    }

    #[test]
    fn matrices() {
        let mut types = TypeManager::new();
        let f = types.f32();
        let m4x4 = types.mat(VectorSize::Quad, VectorSize::Quad, f);
        let m3x2 = types.mat(VectorSize::Tri, VectorSize::Bi, f);
        let m2x3 = types.mat(VectorSize::Bi, VectorSize::Tri, f);
        assert_eq!(types.min_buffer_binding_size(m4x4, UniformBuffer), 64);
        assert_eq!(types.base_alignment(m4x4, UniformBuffer), 16);
        // mat3x2: 2 * 8 + 8
        assert_eq!(types.min_buffer_binding_size(m3x2, StorageBuffer), 24);
        assert_eq!(types.base_alignment(m3x2, StorageBuffer), 8);
        assert_eq!(types.base_alignment(m3x2, UniformBuffer), 16);
        // mat2x3: 1 * 16 + 12
        assert_eq!(types.min_buffer_binding_size(m2x3, StorageBuffer), 28);
    }

    #[test]
    fn arrays() {
        let mut types = TypeManager::new();
        let u = types.u32();
        let no_stride = types.array(u, ArraySize::Sized(4), None);
        let sized = types.array(u, ArraySize::Sized(4), Some(4));
        let runtime = types.array(u, ArraySize::Runtime, Some(4));
        assert_eq!(types.min_buffer_binding_size(no_stride, StorageBuffer), 0);
        assert_eq!(types.min_buffer_binding_size(sized, StorageBuffer), 16);
        assert_eq!(types.min_buffer_binding_size(runtime, StorageBuffer), 4);
        assert_eq!(types.base_alignment(sized, StorageBuffer), 4);
        assert_eq!(types.base_alignment(sized, UniformBuffer), 16);
    }

    #[test]
    fn structs() {
        let mut symbols = SymbolTable::new();
        let mut types = TypeManager::new();
        let u = types.u32();
        let v2 = types.vec(VectorSize::Bi, u);
        let s = types.structure(StructType {
            name: symbols.register("S"),
            members: vec![
                StructMember {
                    name: symbols.register("a"),
                    ty: u,
                    offset: 0,
                },
                StructMember {
                    name: symbols.register("b"),
                    ty: v2,
                    offset: 8,
                },
            ],
            is_block: true,
        });
        assert_eq!(types.min_buffer_binding_size(s, StorageBuffer), 16);
        assert_eq!(types.base_alignment(s, StorageBuffer), 8);
        assert_eq!(types.base_alignment(s, UniformBuffer), 16);

        let tail = types.structure(StructType {
            name: symbols.register("T"),
            members: vec![StructMember {
                name: symbols.register("x"),
                ty: u,
                offset: 4,
            }],
            is_block: false,
        });
        assert_eq!(types.min_buffer_binding_size(tail, StorageBuffer), 8);
        assert_eq!(types.min_buffer_binding_size(tail, UniformBuffer), 16);

        let empty = types.structure(StructType {
            name: symbols.register("E"),
            members: vec![],
            is_block: false,
        });
        assert_eq!(types.min_buffer_binding_size(empty, UniformBuffer), 0);
    }

    #[test]
    fn wrappers_forward_and_opaque_types_are_zero() {
        let mut symbols = SymbolTable::new();
        let mut types = TypeManager::new();
        let f = types.f32();
        let v3 = types.vec(VectorSize::Tri, f);
        let alias = types.alias(symbols.register("V"), v3);
        let ro = types.access(AccessControl::ReadOnly, alias);
        let ptr = types.pointer(f, StorageClass::Storage);
        let sampler = types.sampler(SamplerKind::Sampler);
        assert_eq!(types.min_buffer_binding_size(ro, StorageBuffer), 12);
        assert_eq!(types.base_alignment(ro, StorageBuffer), 16);
        assert_eq!(types.min_buffer_binding_size(ptr, StorageBuffer), 0);
        assert_eq!(types.base_alignment(sampler, UniformBuffer), 0);
    }
}
