//! Emits a point size builtin output for vertex shaders.

use tint_ir::{
    Builtin, CloneContext, PipelineStage, Program, ProgramBuilder, StorageClass, VariableDecoration,
};

use crate::{Output, Transform, clone_with_statements_at_start};

const POINT_SIZE_VAR: &str = "tint_pointsize";

/// Adds `[[builtin(pointsize)]] var<out> tint_pointsize : f32` and sets it
/// to `1.0` at the start of every vertex entry point.
///
/// Programs without a vertex stage are cloned unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmitVertexPointSize;

impl Transform for EmitVertexPointSize {
    fn name(&self) -> &str {
        "EmitVertexPointSize"
    }

    fn run(&self, program: &Program) -> Output {
        let mut out = ProgramBuilder::new();
        let vertex_entry_points: Vec<_> = program
            .entry_points()
            .filter(|&f| program.func(f).pipeline_stage() == Some(PipelineStage::Vertex))
            .collect();

        if !vertex_entry_points.is_empty() {
            let f32_ty = out.types_mut().f32();
            out.global_var(
                POINT_SIZE_VAR,
                StorageClass::Output,
                f32_ty,
                None,
                vec![VariableDecoration::Builtin(Builtin::PointSize)],
            );
        }

        let mut ctx = CloneContext::new(program, &mut out);
        for ep in vertex_entry_points {
            ctx.dst.set_source(program.func(ep).source.clone());
            let lhs = ctx.dst.ident(POINT_SIZE_VAR);
            let rhs = ctx.dst.lit_f32(1.0);
            let init = ctx.dst.assign(lhs, rhs);
            clone_with_statements_at_start(&mut ctx, ep, vec![init]);
        }
        ctx.clone_module();
        drop(ctx);

        Output::new(out.build())
    }
}
