//! Clamps array, vector and matrix indices into range.

use tint_ir::{
    ArraySize, CloneContext, Expression, ExpressionKind, Handle, Literal, Program, ProgramBuilder,
    Type,
};

use crate::{Output, Transform, require_resolved};

/// Rewrites every `a[i]` whose parent has a static size `N` so the index
/// stays within `0..N`. Literal indices are clamped in place; any other
/// index becomes `clamp(i, 0, N - 1)`. Runtime-sized arrays are untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundArrayAccessors;

impl Transform for BoundArrayAccessors {
    fn name(&self) -> &str {
        "BoundArrayAccessors"
    }

    fn run(&self, program: &Program) -> Output {
        if let Some(failed) = require_resolved(self.name(), program) {
            return failed;
        }
        let mut out = ProgramBuilder::new();
        let mut ctx = CloneContext::new(program, &mut out);
        ctx.replace_all_expressions(|ctx, expr| clamp_accessor(ctx, expr));
        ctx.clone_module();
        drop(ctx);
        Output::new(out.build())
    }
}

/// Number of elements addressable by indexing a value of type `ty`.
fn static_size(program: &Program, ty: Handle<Type>) -> Option<u32> {
    let types = program.types();
    match types[types.unwrap_all(ty)] {
        Type::Array {
            size: ArraySize::Sized(n),
            ..
        } => Some(n),
        Type::Vector { size, .. } => Some(size.as_u32()),
        Type::Matrix { columns, .. } => Some(columns.as_u32()),
        _ => None,
    }
}

fn clamp_accessor(
    ctx: &mut CloneContext<'_>,
    expr: Handle<Expression>,
) -> Option<Handle<Expression>> {
    let src = ctx.src;
    let ExpressionKind::ArrayAccessor { array, index } = src.expr(expr).kind else {
        return None;
    };
    let size = static_size(src, src.expr(array).result_type?)?;
    let limit = size.checked_sub(1)?;
    let signed_limit = i32::try_from(limit).unwrap_or(i32::MAX);

    let array = ctx.clone_expression(array);
    let source = ctx.clone_source(&src.expr(expr).source);
    ctx.dst.set_source(source);
    let index = match src.expr(index).as_literal() {
        Some(Literal::Sint(v)) => ctx.dst.lit_i32(v.clamp(0, signed_limit)),
        Some(Literal::Uint(v)) => ctx.dst.lit_u32(v.min(limit)),
        _ => {
            let unsigned = src.expr(index).result_type.is_some_and(|t| {
                let types = src.types();
                types[types.unwrap_all(t)] == Type::U32
            });
            let index = ctx.clone_expression(index);
            let (low, high) = if unsigned {
                (ctx.dst.lit_u32(0), ctx.dst.lit_u32(limit))
            } else {
                (ctx.dst.lit_i32(0), ctx.dst.lit_i32(signed_limit))
            };
            ctx.dst.call("clamp", vec![index, low, high])
        }
    };
    Some(ctx.dst.index_accessor(array, index))
}
