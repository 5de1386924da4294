//! Backend contract for tint.
//!
//! Code emitters implement [`Backend`] and are looked up by target name
//! through a [`BackendRegistry`]. Output identifiers are chosen by a
//! [`Namer`] so emitted code never clashes with target keywords.

pub mod keywords;
mod namer;

pub use namer::{Namer, NamerKind, ReservedWordNamer, UnsafeNamer};

use std::fmt::{self, Debug, Write as _};

use tint_ir::{DiagnosticList, Function, Handle, PipelineStage, Program, Variable};

/// Code emitter for one or more targets.
///
/// `compile` is only handed programs that passed [`check_program`], so
/// implementations may rely on semantic information being present.
pub trait Backend: Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Target names this emitter answers to in a [`BackendRegistry`].
    fn targets(&self) -> &[&str];

    fn compile(
        &self,
        program: &Program,
        opts: &BackendOptions,
    ) -> Result<BackendOutput, BackendError>;
}

/// Per-compile settings.
#[derive(Clone, Debug, Default)]
pub struct BackendOptions {
    /// Only emit this entry point. `None` emits all of them.
    pub entry_point: Option<String>,
    pub namer: NamerKind,
}

impl fmt::Display for BackendOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entry_point = self.entry_point.as_deref().unwrap_or("<all>");
        write!(f, "entry point {entry_point}, {:?} names", self.namer)
    }
}

/// Named text file produced by a backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub text: String,
}

impl OutputFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Files emitted by one compile, plus any warnings raised on the way.
#[derive(Clone, Debug, Default)]
pub struct BackendOutput {
    pub files: Vec<OutputFile>,
    pub diagnostics: DiagnosticList,
}

impl BackendOutput {
    /// Text of the file called `name`, if one was emitted.
    pub fn file(&self, name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|file| file.name == name)
            .map(|file| file.text.as_str())
    }
}

impl fmt::Display for BackendOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.files.iter().map(|file| file.name.as_str()).collect();
        write!(f, "[{}]", names.join(", "))?;
        if !self.diagnostics.is_empty() {
            write!(f, " with {} diagnostic(s)", self.diagnostics.len())?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("program has not been resolved")]
    Unresolved,
    #[error("program is invalid: {0} error(s)")]
    InvalidProgram(usize),
    #[error("entry point '{0}' not found")]
    EntryPointNotFound(String),
    #[error("{backend} cannot emit {what}")]
    Unsupported { backend: String, what: String },
    #[error(transparent)]
    Format(#[from] fmt::Error),
}

/// Refuses programs that are unresolved or carry errors.
pub fn check_program(program: &Program) -> Result<(), BackendError> {
    if program.diagnostics().contains_errors() {
        return Err(BackendError::InvalidProgram(program.diagnostics().error_count()));
    }
    if !program.is_resolved() {
        return Err(BackendError::Unresolved);
    }
    Ok(())
}

/// The entry points selected by `opts`, in module order.
pub fn selected_entry_points(
    program: &Program,
    opts: &BackendOptions,
) -> Result<Vec<Handle<Function>>, BackendError> {
    let all: Vec<_> = program.entry_points().collect();
    let Some(name) = &opts.entry_point else {
        return Ok(all);
    };
    let selected: Vec<_> = all
        .into_iter()
        .filter(|&f| program.name_of(program.func(f).symbol) == name)
        .collect();
    if selected.is_empty() {
        return Err(BackendError::EntryPointNotFound(name.clone()));
    }
    Ok(selected)
}

/// Backends keyed by target name. The first registered backend claiming a
/// target wins.
#[derive(Default)]
pub struct BackendRegistry {
    entries: Vec<Box<dyn Backend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every backend shipped with this crate.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(AstDumpBackend));
        registry
    }

    pub fn register(&mut self, backend: Box<dyn Backend>) {
        log::debug!("registering backend '{}' for {:?}", backend.name(), backend.targets());
        self.entries.push(backend);
    }

    pub fn find(&self, target: &str) -> Option<&dyn Backend> {
        let backend = self
            .entries
            .iter()
            .find(|backend| backend.targets().iter().any(|&t| t == target))?;
        Some(&**backend)
    }

    /// Every target name, in registration order.
    pub fn targets(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .flat_map(|backend| backend.targets().iter().copied())
    }
}

/// Built-in backend that dumps the AST as text, plus a summary of each
/// entry point and the resources it uses.
#[derive(Debug)]
pub struct AstDumpBackend;

impl Backend for AstDumpBackend {
    fn name(&self) -> &str {
        "AST Dump"
    }

    fn targets(&self) -> &[&str] {
        &["ast-dump", "ast"]
    }

    fn compile(
        &self,
        program: &Program,
        opts: &BackendOptions,
    ) -> Result<BackendOutput, BackendError> {
        check_program(program)?;
        let entry_points = selected_entry_points(program, opts)?;
        log::debug!("dumping {} entry point(s) with {}", entry_points.len(), opts);

        let mut namer = opts.namer.build(program.symbols());
        let mut summary = String::new();
        for ep in entry_points {
            write_entry_point(&mut summary, program, ep, namer.as_mut())?;
        }

        Ok(BackendOutput {
            files: vec![
                OutputFile::new("program.ast", program.to_str()),
                OutputFile::new("entry_points.txt", summary),
            ],
            diagnostics: DiagnosticList::new(),
        })
    }
}

fn write_entry_point(
    out: &mut String,
    program: &Program,
    ep: Handle<Function>,
    namer: &mut dyn Namer,
) -> fmt::Result {
    let func = program.func(ep);
    let Some(stage) = func.pipeline_stage() else {
        return Ok(());
    };
    write!(out, "{stage} {}", namer.name_for(func.symbol))?;
    if stage == PipelineStage::Compute {
        let (x, y, z) = func.workgroup_size();
        write!(out, " workgroup_size({x}, {y}, {z})")?;
    }
    writeln!(out)?;

    let mut var_name = |v: Handle<Variable>| namer.name_for(program.var(v).symbol);
    for (var, location) in func.referenced_location_variables(program) {
        writeln!(out, "  location({location}) {}", var_name(var))?;
    }
    for (var, builtin) in func.referenced_builtin_variables(program) {
        writeln!(out, "  builtin({builtin}) {}", var_name(var))?;
    }
    let bindings = [
        ("uniform", func.referenced_uniform_variables(program)),
        ("storage", func.referenced_storagebuffer_variables(program)),
        ("sampler", func.referenced_sampler_variables(program)),
        ("comparison_sampler", func.referenced_comparison_sampler_variables(program)),
        ("sampled_texture", func.referenced_sampled_texture_variables(program)),
        ("multisampled_texture", func.referenced_multisampled_texture_variables(program)),
    ];
    for (kind, vars) in bindings {
        for (var, binding) in vars {
            writeln!(
                out,
                "  {kind} {} group({}) binding({})",
                var_name(var),
                binding.group,
                binding.binding
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Fixed(&'static str);

    impl Backend for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn targets(&self) -> &[&str] {
            &["ast", "fixed"]
        }

        fn compile(&self, _: &Program, _: &BackendOptions) -> Result<BackendOutput, BackendError> {
            Ok(BackendOutput {
                files: vec![OutputFile::new("out.txt", self.0)],
                diagnostics: DiagnosticList::new(),
            })
        }
    }

    #[test]
    fn ast_dump_answers_to_both_target_names() {
        assert_eq!(AstDumpBackend.name(), "AST Dump");
        assert_eq!(AstDumpBackend.targets(), &["ast-dump", "ast"]);
    }

    #[test]
    fn unresolved_programs_are_refused() {
        let err = AstDumpBackend
            .compile(&Program::default(), &BackendOptions::default())
            .unwrap_err();
        assert!(matches!(err, BackendError::Unresolved));
    }

    #[test]
    fn first_registered_backend_claims_a_target() {
        let mut registry = BackendRegistry::with_builtins();
        registry.register(Box::new(Fixed("late")));
        assert_eq!(registry.find("ast").map(|b| b.name()), Some("AST Dump"));
        assert_eq!(registry.find("fixed").map(|b| b.name()), Some("late"));
        assert!(registry.find("hlsl").is_none());
        assert_eq!(
            registry.targets().collect::<Vec<_>>(),
            vec!["ast-dump", "ast", "ast", "fixed"]
        );
    }

    #[test]
    fn output_lookup_and_summary() {
        let output = Fixed("body")
            .compile(&Program::default(), &BackendOptions::default())
            .unwrap();
        assert_eq!(output.file("out.txt"), Some("body"));
        assert_eq!(output.file("missing.txt"), None);
        assert_eq!(output.to_string(), "[out.txt]");
    }

    #[test]
    fn options_summary() {
        let opts = BackendOptions {
            entry_point: Some("main".into()),
            namer: NamerKind::Hlsl,
        };
        assert_eq!(opts.to_string(), "entry point main, Hlsl names");
        assert_eq!(
            BackendOptions::default().to_string(),
            "entry point <all>, Unsafe names"
        );
    }
}
