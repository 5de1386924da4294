//! Built-in function table and overload matching.

use tint_ir::{Handle, TextureKind, Type, TypeManager, VectorSize};

/// A built-in function callable by name.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Intrinsic {
    Abs,
    Acos,
    All,
    Any,
    ArrayLength,
    Asin,
    Atan,
    Atan2,
    Ceil,
    Clamp,
    Cos,
    Cosh,
    CountOneBits,
    Cross,
    Determinant,
    Distance,
    Dot,
    Dpdx,
    DpdxCoarse,
    DpdxFine,
    Dpdy,
    DpdyCoarse,
    DpdyFine,
    Exp,
    Exp2,
    FaceForward,
    Floor,
    Fma,
    Fract,
    Fwidth,
    FwidthCoarse,
    FwidthFine,
    InverseSqrt,
    IsFinite,
    IsInf,
    IsNan,
    IsNormal,
    Length,
    Log,
    Log2,
    Max,
    Min,
    Mix,
    Normalize,
    Pow,
    Reflect,
    ReverseBits,
    Round,
    Select,
    Sign,
    Sin,
    Sinh,
    SmoothStep,
    Sqrt,
    Step,
    Tan,
    Tanh,
    TextureDimensions,
    TextureLoad,
    TextureSample,
    TextureSampleBias,
    TextureSampleCompare,
    TextureSampleLevel,
    Trunc,
}

const NAMES: &[(&str, Intrinsic)] = &[
    ("abs", Intrinsic::Abs),
    ("acos", Intrinsic::Acos),
    ("all", Intrinsic::All),
    ("any", Intrinsic::Any),
    ("arrayLength", Intrinsic::ArrayLength),
    ("asin", Intrinsic::Asin),
    ("atan", Intrinsic::Atan),
    ("atan2", Intrinsic::Atan2),
    ("ceil", Intrinsic::Ceil),
    ("clamp", Intrinsic::Clamp),
    ("cos", Intrinsic::Cos),
    ("cosh", Intrinsic::Cosh),
    ("countOneBits", Intrinsic::CountOneBits),
    ("cross", Intrinsic::Cross),
    ("determinant", Intrinsic::Determinant),
    ("distance", Intrinsic::Distance),
    ("dot", Intrinsic::Dot),
    ("dpdx", Intrinsic::Dpdx),
    ("dpdxCoarse", Intrinsic::DpdxCoarse),
    ("dpdxFine", Intrinsic::DpdxFine),
    ("dpdy", Intrinsic::Dpdy),
    ("dpdyCoarse", Intrinsic::DpdyCoarse),
    ("dpdyFine", Intrinsic::DpdyFine),
    ("exp", Intrinsic::Exp),
    ("exp2", Intrinsic::Exp2),
    ("faceForward", Intrinsic::FaceForward),
    ("floor", Intrinsic::Floor),
    ("fma", Intrinsic::Fma),
    ("fract", Intrinsic::Fract),
    ("fwidth", Intrinsic::Fwidth),
    ("fwidthCoarse", Intrinsic::FwidthCoarse),
    ("fwidthFine", Intrinsic::FwidthFine),
    ("inverseSqrt", Intrinsic::InverseSqrt),
    ("isFinite", Intrinsic::IsFinite),
    ("isInf", Intrinsic::IsInf),
    ("isNan", Intrinsic::IsNan),
    ("isNormal", Intrinsic::IsNormal),
    ("length", Intrinsic::Length),
    ("log", Intrinsic::Log),
    ("log2", Intrinsic::Log2),
    ("max", Intrinsic::Max),
    ("min", Intrinsic::Min),
    ("mix", Intrinsic::Mix),
    ("normalize", Intrinsic::Normalize),
    ("pow", Intrinsic::Pow),
    ("reflect", Intrinsic::Reflect),
    ("reverseBits", Intrinsic::ReverseBits),
    ("round", Intrinsic::Round),
    ("select", Intrinsic::Select),
    ("sign", Intrinsic::Sign),
    ("sin", Intrinsic::Sin),
    ("sinh", Intrinsic::Sinh),
    ("smoothStep", Intrinsic::SmoothStep),
    ("sqrt", Intrinsic::Sqrt),
    ("step", Intrinsic::Step),
    ("tan", Intrinsic::Tan),
    ("tanh", Intrinsic::Tanh),
    ("textureDimensions", Intrinsic::TextureDimensions),
    ("textureLoad", Intrinsic::TextureLoad),
    ("textureSample", Intrinsic::TextureSample),
    ("textureSampleBias", Intrinsic::TextureSampleBias),
    ("textureSampleCompare", Intrinsic::TextureSampleCompare),
    ("textureSampleLevel", Intrinsic::TextureSampleLevel),
    ("trunc", Intrinsic::Trunc),
];

impl Intrinsic {
    pub fn from_name(name: &str) -> Option<Self> {
        NAMES
            .binary_search_by(|(n, _)| n.cmp(&name))
            .ok()
            .map(|i| NAMES[i].1)
    }

    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(_, i)| *i == self)
            .map(|(n, _)| *n)
            .unwrap_or("<intrinsic>")
    }

    /// Derivative built-ins are only meaningful in fragment shaders.
    pub fn is_derivative(self) -> bool {
        matches!(
            self,
            Self::Dpdx
                | Self::DpdxCoarse
                | Self::DpdxFine
                | Self::Dpdy
                | Self::DpdyCoarse
                | Self::DpdyFine
                | Self::Fwidth
                | Self::FwidthCoarse
                | Self::FwidthFine
        )
    }
}

fn vector_size(types: &TypeManager, ty: Handle<Type>) -> Option<VectorSize> {
    match types[ty] {
        Type::Vector { size, .. } => Some(size),
        _ => None,
    }
}

/// Same shape (scalar or N-component vector) but with bool elements.
fn bool_like(types: &mut TypeManager, ty: Handle<Type>) -> Handle<Type> {
    let b = types.bool();
    match vector_size(types, ty) {
        Some(size) => types.vec(size, b),
        None => b,
    }
}

fn all_same(args: &[Handle<Type>]) -> bool {
    args.windows(2).all(|w| w[0] == w[1])
}

fn is_numeric_scalar_or_vector(types: &TypeManager, ty: Handle<Type>) -> bool {
    types.is_float_scalar_or_vector(ty) || types.is_integer_scalar_or_vector(ty)
}

/// Returns the result type of calling `intrinsic` with arguments of the
/// given (fully unwrapped) types, or `None` if no overload matches.
pub fn match_overload(
    types: &mut TypeManager,
    intrinsic: Intrinsic,
    args: &[Handle<Type>],
) -> Option<Handle<Type>> {
    use Intrinsic as I;
    match intrinsic {
        I::Acos
        | I::Asin
        | I::Atan
        | I::Ceil
        | I::Cos
        | I::Cosh
        | I::Dpdx
        | I::DpdxCoarse
        | I::DpdxFine
        | I::Dpdy
        | I::DpdyCoarse
        | I::DpdyFine
        | I::Exp
        | I::Exp2
        | I::Floor
        | I::Fract
        | I::Fwidth
        | I::FwidthCoarse
        | I::FwidthFine
        | I::InverseSqrt
        | I::Log
        | I::Log2
        | I::Round
        | I::Sign
        | I::Sin
        | I::Sinh
        | I::Sqrt
        | I::Tan
        | I::Tanh
        | I::Trunc => match args {
            [a] if types.is_float_scalar_or_vector(*a) => Some(*a),
            _ => None,
        },
        I::Abs => match args {
            [a] if is_numeric_scalar_or_vector(types, *a) => Some(*a),
            _ => None,
        },
        I::Atan2 | I::Pow | I::Step => match args {
            [a, b] if a == b && types.is_float_scalar_or_vector(*a) => Some(*a),
            _ => None,
        },
        I::Min | I::Max => match args {
            [a, b] if a == b && is_numeric_scalar_or_vector(types, *a) => Some(*a),
            _ => None,
        },
        I::Clamp => match args {
            [a, _, _] if all_same(args) && is_numeric_scalar_or_vector(types, *a) => Some(*a),
            _ => None,
        },
        I::Fma | I::Mix | I::SmoothStep => match args {
            [a, _, _] if all_same(args) && types.is_float_scalar_or_vector(*a) => Some(*a),
            _ => None,
        },
        I::Normalize => match args {
            [a] if types.is_float_vector(*a) => Some(*a),
            _ => None,
        },
        I::Reflect => match args {
            [a, b] if a == b && types.is_float_vector(*a) => Some(*a),
            _ => None,
        },
        I::FaceForward => match args {
            [a, _, _] if all_same(args) && types.is_float_vector(*a) => Some(*a),
            _ => None,
        },
        I::Length => match args {
            [a] if types.is_float_scalar_or_vector(*a) => Some(types.f32()),
            _ => None,
        },
        I::Distance => match args {
            [a, b] if a == b && types.is_float_scalar_or_vector(*a) => Some(types.f32()),
            _ => None,
        },
        I::Dot => match args {
            [a, b] if a == b && types.is_float_vector(*a) => Some(types.element_or_self(*a)),
            _ => None,
        },
        I::Cross => match args {
            [a, b] if a == b
                && types.is_float_vector(*a)
                && vector_size(types, *a) == Some(VectorSize::Tri) =>
            {
                Some(*a)
            }
            _ => None,
        },
        I::Determinant => match args {
            [m] => match types[*m] {
                Type::Matrix {
                    columns,
                    rows,
                    elem,
                } if columns == rows && types.is_float_scalar(elem) => Some(elem),
                _ => None,
            },
            _ => None,
        },
        I::All | I::Any => match args {
            [a] if types.is_bool_scalar_or_vector(*a) => Some(types.bool()),
            _ => None,
        },
        I::IsFinite | I::IsInf | I::IsNan | I::IsNormal => match args {
            [a] if types.is_float_scalar_or_vector(*a) => Some(bool_like(types, *a)),
            _ => None,
        },
        I::CountOneBits | I::ReverseBits => match args {
            [a] if types.is_integer_scalar_or_vector(*a) => Some(*a),
            _ => None,
        },
        I::Select => match args {
            [a, b, cond] if a == b && *cond == bool_like(types, *a) => Some(*a),
            _ => None,
        },
        I::ArrayLength => match args {
            [a] => match types[*a] {
                Type::Array {
                    size: tint_ir::ArraySize::Runtime,
                    ..
                } => Some(types.u32()),
                _ => None,
            },
            _ => None,
        },
        I::TextureDimensions => match args {
            [t, ..] => {
                let Type::Texture { dim, .. } = types[*t] else {
                    return None;
                };
                let i = types.i32();
                Some(match dim {
                    tint_ir::TextureDimension::D1 => i,
                    tint_ir::TextureDimension::D3 => types.vec(VectorSize::Tri, i),
                    _ => types.vec(VectorSize::Bi, i),
                })
            }
            _ => None,
        },
        I::TextureLoad => match args {
            [t, coords, ..] if types.is_integer_scalar_or_vector(*coords) => {
                texel_type(types, *t)
            }
            _ => None,
        },
        I::TextureSample | I::TextureSampleBias | I::TextureSampleLevel => match args {
            [t, s, coords, ..]
                if matches!(types[*s], Type::Sampler(tint_ir::SamplerKind::Sampler))
                    && types.is_float_scalar_or_vector(*coords) =>
            {
                texel_type(types, *t)
            }
            _ => None,
        },
        I::TextureSampleCompare => match args {
            [t, s, coords, depth_ref, ..]
                if matches!(
                    types[*t],
                    Type::Texture {
                        kind: TextureKind::Depth,
                        ..
                    }
                ) && matches!(
                    types[*s],
                    Type::Sampler(tint_ir::SamplerKind::ComparisonSampler)
                ) && types.is_float_scalar_or_vector(*coords)
                    && types.is_float_scalar(*depth_ref) =>
            {
                Some(types.f32())
            }
            _ => None,
        },
    }
}

/// What reading a texel of this texture yields.
fn texel_type(types: &mut TypeManager, texture: Handle<Type>) -> Option<Handle<Type>> {
    let Type::Texture { kind, .. } = types[texture] else {
        return None;
    };
    match kind {
        TextureKind::Sampled(t) | TextureKind::Multisampled(t) => {
            let elem = types.unwrap_if_needed(t);
            Some(types.vec(VectorSize::Quad, elem))
        }
        TextureKind::Depth => Some(types.f32()),
        TextureKind::Storage { format, .. } => {
            use tint_ir::TexelFormat as F;
            let elem = match format {
                F::R32Uint | F::Rgba8Uint | F::Rgba16Uint | F::Rg32Uint | F::Rgba32Uint => {
                    types.u32()
                }
                F::R32Sint | F::Rgba8Sint | F::Rgba16Sint | F::Rg32Sint | F::Rgba32Sint => {
                    types.i32()
                }
                _ => types.f32(),
            };
            Some(types.vec(VectorSize::Quad, elem))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_sorted_for_lookup() {
        assert!(NAMES.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(Intrinsic::from_name("dot"), Some(Intrinsic::Dot));
        assert_eq!(Intrinsic::from_name("smoothStep"), Some(Intrinsic::SmoothStep));
        assert_eq!(Intrinsic::from_name("printf"), None);
        assert_eq!(Intrinsic::CountOneBits.name(), "countOneBits");
    }

    #[test]
    fn dot_returns_element_type() {
        let mut types = TypeManager::new();
        let f = types.f32();
        let v3 = types.vec(VectorSize::Tri, f);
        assert_eq!(match_overload(&mut types, Intrinsic::Dot, &[v3, v3]), Some(f));
        assert_eq!(match_overload(&mut types, Intrinsic::Dot, &[v3, f]), None);
    }

    #[test]
    fn select_requires_matching_bool_shape() {
        let mut types = TypeManager::new();
        let f = types.f32();
        let b = types.bool();
        let v2 = types.vec(VectorSize::Bi, f);
        let bv2 = types.vec(VectorSize::Bi, b);
        assert_eq!(match_overload(&mut types, Intrinsic::Select, &[v2, v2, bv2]), Some(v2));
        assert_eq!(match_overload(&mut types, Intrinsic::Select, &[v2, v2, b]), None);
        assert_eq!(match_overload(&mut types, Intrinsic::Select, &[f, f, b]), Some(f));
    }

    #[test]
    fn clamp_accepts_integers() {
        let mut types = TypeManager::new();
        let u = types.u32();
        let f = types.f32();
        assert_eq!(match_overload(&mut types, Intrinsic::Clamp, &[u, u, u]), Some(u));
        assert_eq!(match_overload(&mut types, Intrinsic::Clamp, &[u, f, u]), None);
        assert_eq!(match_overload(&mut types, Intrinsic::Clamp, &[u, u]), None);
    }

    #[test]
    fn is_nan_keeps_shape() {
        let mut types = TypeManager::new();
        let f = types.f32();
        let v4 = types.vec(VectorSize::Quad, f);
        let result = match_overload(&mut types, Intrinsic::IsNan, &[v4]).unwrap();
        assert!(types.is_bool_scalar_or_vector(result));
        assert_eq!(types.type_name(result), "__vec_4__bool");
    }

    #[test]
    fn determinant_needs_square_matrix() {
        let mut types = TypeManager::new();
        let f = types.f32();
        let m3 = types.mat(VectorSize::Tri, VectorSize::Tri, f);
        let m23 = types.mat(VectorSize::Bi, VectorSize::Tri, f);
        assert_eq!(match_overload(&mut types, Intrinsic::Determinant, &[m3]), Some(f));
        assert_eq!(match_overload(&mut types, Intrinsic::Determinant, &[m23]), None);
    }

    #[test]
    fn texture_sample_returns_vec4() {
        let mut types = TypeManager::new();
        let f = types.f32();
        let v2 = types.vec(VectorSize::Bi, f);
        let tex = types.texture(tint_ir::TextureDimension::D2, TextureKind::Sampled(f));
        let s = types.sampler(tint_ir::SamplerKind::Sampler);
        let result = match_overload(&mut types, Intrinsic::TextureSample, &[tex, s, v2]).unwrap();
        assert_eq!(types.type_name(result), "__vec_4__f32");
    }
}
