//! Sequential transform pipeline.

use tint_ir::{DiagnosticList, Program, Source, clone_program};

use crate::{Output, Transform};

/// Runs transforms in registration order, resolving the program before the
/// first one and after each of them.
///
/// The pipeline stops at the first error, whether reported by a transform
/// or by the resolver on its output. The failing program (if any) is
/// returned together with all diagnostics collected so far.
#[derive(Debug, Default)]
pub struct Manager {
    transforms: Vec<Box<dyn Transform>>,
}

impl Manager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, transform: Box<dyn Transform>) {
        self.transforms.push(transform);
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

/// Resolves `program` in place, recording its diagnostics. Returns the
/// program and whether resolution succeeded.
fn resolve_into(program: Program, diagnostics: &mut DiagnosticList) -> (Program, bool) {
    let mut builder = program.into_builder();
    let ok = tint_resolve::resolve(&mut builder);
    let program = builder.build();
    diagnostics.extend(program.diagnostics());
    (program, ok)
}

impl Transform for Manager {
    fn name(&self) -> &str {
        "Manager"
    }

    fn run(&self, program: &Program) -> Output {
        let mut diagnostics = DiagnosticList::new();
        if program.diagnostics().contains_errors() {
            diagnostics.extend(program.diagnostics());
            return Output {
                program: None,
                diagnostics,
            };
        }

        let mut current: Option<Program> = None;
        if !program.is_resolved() {
            log::debug!("resolving transform input");
            let (resolved, ok) = resolve_into(clone_program(program).build(), &mut diagnostics);
            if !ok {
                return Output {
                    program: Some(resolved),
                    diagnostics,
                };
            }
            current = Some(resolved);
        }

        for transform in &self.transforms {
            let input = current.as_ref().unwrap_or(program);
            log::debug!("running transform '{}'", transform.name());
            let output = transform.run(input);
            diagnostics.extend(&output.diagnostics);

            let Some(next) = output.program else {
                if !output.diagnostics.contains_errors() {
                    log::warn!("transform '{}' produced no program", transform.name());
                    diagnostics.add_error(
                        format!("transform '{}' produced no program", transform.name()),
                        Source::default(),
                    );
                }
                return Output {
                    program: None,
                    diagnostics,
                };
            };
            if output.diagnostics.contains_errors() {
                return Output {
                    program: Some(next),
                    diagnostics,
                };
            }

            let (resolved, ok) = resolve_into(next, &mut diagnostics);
            log::debug!("transform '{}' finished", transform.name());
            if !ok {
                return Output {
                    program: Some(resolved),
                    diagnostics,
                };
            }
            current = Some(resolved);
        }

        let program = match current {
            Some(program) => program,
            None => resolve_into(clone_program(program).build(), &mut diagnostics).0,
        };
        Output {
            program: Some(program),
            diagnostics,
        }
    }
}
