//! The parse → compile → execute pipeline shared by the file runner and
//! the REPL (spec.md §6's three embedder entry points, wired together).

use axon_compile::CompileError;
use axon_par::FrontendError;
use axon_vm::{RuntimeError, VM};

use crate::error::{render_compile_error, render_pipeline_error, render_runtime_error};

pub enum PipelineError {
    Frontend(FrontendError),
    Compile(CompileError),
    Runtime(RuntimeError),
}

impl PipelineError {
    pub fn render(&self) -> String {
        match self {
            PipelineError::Frontend(e) => render_pipeline_error(e),
            PipelineError::Compile(e) => render_compile_error(e),
            PipelineError::Runtime(e) => render_runtime_error(e),
        }
    }
}

impl From<FrontendError> for PipelineError {
    fn from(e: FrontendError) -> Self {
        PipelineError::Frontend(e)
    }
}

impl From<CompileError> for PipelineError {
    fn from(e: CompileError) -> Self {
        PipelineError::Compile(e)
    }
}

impl From<RuntimeError> for PipelineError {
    fn from(e: RuntimeError) -> Self {
        PipelineError::Runtime(e)
    }
}

/// Parses, compiles, and runs one chunk of source against `vm`.
///
/// `vm`'s globals persist across calls, which is what lets the REPL
/// reuse a single `VM` across statements and the file runner use a
/// fresh one per file.
pub fn run_source(source: &str, vm: &mut VM) -> Result<(), PipelineError> {
    let program = axon_par::parse(source)?;
    let code = axon_compile::compile(&program)?;
    vm.push_frame(code);
    vm.run()?;
    Ok(())
}
