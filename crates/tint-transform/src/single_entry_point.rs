//! Strips a program down to one entry point.

use tint_ir::{CloneContext, Program, ProgramBuilder, Source};

use crate::{Output, Transform, require_resolved};

/// Keeps the named entry point, the functions it reaches and the module
/// variables it references. Constructed types are kept as they are.
#[derive(Clone, Debug)]
pub struct SingleEntryPoint {
    pub entry_point: String,
}

impl SingleEntryPoint {
    pub fn new(entry_point: impl Into<String>) -> Self {
        Self {
            entry_point: entry_point.into(),
        }
    }
}

impl Transform for SingleEntryPoint {
    fn name(&self) -> &str {
        "SingleEntryPoint"
    }

    fn run(&self, program: &Program) -> Output {
        if let Some(failed) = require_resolved(self.name(), program) {
            return failed;
        }
        let entry_point = program
            .symbols()
            .get(&self.entry_point)
            .and_then(|s| program.find_function(s))
            .filter(|&f| program.func(f).is_entry_point());
        let Some(entry_point) = entry_point else {
            return Output::error(
                format!("entry point '{}' not found", self.entry_point),
                Source::default(),
            );
        };
        let ep = program.func(entry_point);
        log::debug!(
            "keeping entry point '{}' and {} module variable(s)",
            self.entry_point,
            ep.sem.referenced_module_variables.len()
        );

        let mut out = ProgramBuilder::new();
        let mut ctx = CloneContext::new(program, &mut out);
        for &ty in &program.module().constructed_types {
            let cloned = ctx.clone_type(ty);
            ctx.dst.add_constructed_type(cloned);
        }
        for &var in &program.module().global_variables {
            if ep.sem.referenced_module_variables.contains(&var) {
                let cloned = ctx.clone_variable(var);
                ctx.dst.add_global_variable(cloned);
            }
        }
        for &func in &program.module().functions {
            if func == entry_point || program.func(func).has_ancestor_entry_point(ep.symbol) {
                let cloned = ctx.clone_function(func);
                ctx.dst.add_function(cloned);
            }
        }
        drop(ctx);
        Output::new(out.build())
    }
}
