//! Decoration checks that only need the declaration itself.

use tint_ir::{
    Function, FunctionDecoration, PipelineStage, StorageClass, Variable, VariableDecoration,
};

use crate::error::ResolveError;

/// Decorations that are not allowed on the module-scope variable `var`.
pub(crate) fn global_decoration_errors(var: &Variable, name: &str) -> Vec<ResolveError> {
    var.decorations
        .iter()
        .filter(|d| !decoration_allowed(var, d))
        .map(|d| ResolveError::InvalidDecoration {
            decoration: d.to_string(),
            context: format!("module-scope variable '{name}' in {} storage", var.storage_class),
        })
        .collect()
}

fn decoration_allowed(var: &Variable, decoration: &VariableDecoration) -> bool {
    match decoration {
        VariableDecoration::Binding(_) | VariableDecoration::Group(_) => matches!(
            var.storage_class,
            StorageClass::Uniform | StorageClass::Storage | StorageClass::UniformConstant
        ),
        VariableDecoration::Location(_) | VariableDecoration::Builtin(_) => {
            matches!(var.storage_class, StorageClass::Input | StorageClass::Output)
        }
        VariableDecoration::ConstantId(_) => var.is_const,
    }
}

/// Stage and workgroup size rules for a function's decorations.
pub(crate) fn function_decoration_errors(func: &Function, name: &str) -> Vec<ResolveError> {
    let mut errors = Vec::new();
    let stages = func
        .decorations
        .iter()
        .filter(|d| matches!(d, FunctionDecoration::Stage(_)))
        .count();
    if stages > 1 {
        errors.push(ResolveError::MultipleStages(name.to_string()));
    }
    for decoration in &func.decorations {
        if let FunctionDecoration::WorkgroupSize(x, y, z) = *decoration {
            if func.pipeline_stage() != Some(PipelineStage::Compute) {
                errors.push(ResolveError::WorkgroupSizeNotCompute);
            }
            if x == 0 || y == 0 || z == 0 {
                errors.push(ResolveError::WorkgroupSizeZero);
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use tint_ir::{ProgramBuilder, StorageClass};

    #[test]
    fn binding_needs_a_resource_storage_class() {
        let mut b = ProgramBuilder::new();
        let f32 = b.types_mut().f32();
        let bad = b.variable(
            "v",
            StorageClass::Private,
            f32,
            false,
            None,
            vec![VariableDecoration::Binding(0)],
        );
        let errors = global_decoration_errors(b.var(bad), "v");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "decoration BindingDecoration{0} is not valid for module-scope variable 'v' in private storage"
        );

        let ok = b.variable(
            "pos",
            StorageClass::Input,
            f32,
            false,
            None,
            vec![VariableDecoration::Location(0)],
        );
        assert!(global_decoration_errors(b.var(ok), "pos").is_empty());
    }

    #[test]
    fn workgroup_size_only_on_compute() {
        let mut b = ProgramBuilder::new();
        let void = b.types_mut().void();
        let f = b.function(
            "main",
            vec![],
            void,
            vec![],
            vec![
                FunctionDecoration::Stage(PipelineStage::Vertex),
                FunctionDecoration::WorkgroupSize(0, 1, 1),
            ],
        );
        let errors = function_decoration_errors(b.func(f), "main");
        assert_eq!(
            errors,
            vec![ResolveError::WorkgroupSizeNotCompute, ResolveError::WorkgroupSizeZero]
        );
    }

    #[test]
    fn single_stage() {
        let mut b = ProgramBuilder::new();
        let void = b.types_mut().void();
        let f = b.function(
            "main",
            vec![],
            void,
            vec![],
            vec![
                FunctionDecoration::Stage(PipelineStage::Vertex),
                FunctionDecoration::Stage(PipelineStage::Fragment),
            ],
        );
        let errors = function_decoration_errors(b.func(f), "main");
        assert_eq!(errors, vec![ResolveError::MultipleStages("main".into())]);
    }
}
