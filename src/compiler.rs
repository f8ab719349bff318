use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus};

use log::warn;
use thiserror::Error;

use crate::command;

pub const DEFAULT_COMPILER: &str = "glslc";

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("could not start {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("compiler exited with {status}:\n{diagnostics}")]
    Failed {
        status: ExitStatus,
        diagnostics: String,
    },
}

/// Turns one shader source file into a SPIR-V artifact at `output`.
pub trait ShaderCompiler {
    fn compile(&self, source: &Path, output: &Path) -> Result<(), CompileError>;
}

impl<T: ShaderCompiler + ?Sized> ShaderCompiler for &T {
    fn compile(&self, source: &Path, output: &Path) -> Result<(), CompileError> {
        (**self).compile(source, output)
    }
}

impl<T: ShaderCompiler + ?Sized> ShaderCompiler for Box<T> {
    fn compile(&self, source: &Path, output: &Path) -> Result<(), CompileError> {
        (**self).compile(source, output)
    }
}

/// Invokes a glslc-compatible command line compiler as
/// `<program> <source> -o <output>`.
#[derive(Clone, Debug)]
pub struct Glslc {
    program: OsString,
}

impl Default for Glslc {
    fn default() -> Self {
        Glslc::new(DEFAULT_COMPILER)
    }
}

impl Glslc {
    pub fn new(program: impl Into<OsString>) -> Self {
        Glslc {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }
}

impl ShaderCompiler for Glslc {
    fn compile(&self, source: &Path, output: &Path) -> Result<(), CompileError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(source).arg("-o").arg(output);

        let result = command::run(&mut cmd).map_err(|source| CompileError::Spawn {
            program: self.program.to_string_lossy().into_owned(),
            source,
        })?;

        let diagnostics = command::diagnostics(&result);
        if !result.status.success() {
            return Err(CompileError::Failed {
                status: result.status,
                diagnostics,
            });
        }

        // warnings still get printed on success
        if !diagnostics.is_empty() {
            warn!("{}: {}", source.display(), diagnostics);
        }
        Ok(())
    }
}
