pub mod batch;
mod command;
pub mod compiler;
pub mod config;
pub mod relocate;
pub mod shader;
pub mod spirv;

#[cfg(test)]
mod scratch;

use std::path::Path;

pub use batch::{BatchCompiler, BatchError, BatchReport};
pub use compiler::{CompileError, Glslc, ShaderCompiler};
pub use config::{Config, Relocation};
pub use relocate::{FileRelocator, MoveCommand, RelocateError, RenameRelocator};
pub use shader::{ShaderSource, ShaderStage};

/// Compiles every `.vert` and `.frag` file in `shader_dir` with `glslc` and
/// moves each `<stem>.<stage>.spv` next to its source.
pub fn compile_shaders(shader_dir: impl AsRef<Path>) -> Result<BatchReport, BatchError> {
    BatchCompiler::new(Glslc::default(), MoveCommand::default())
        .compile_shaders(shader_dir.as_ref())
}

/// Runs a batch with the compiler and relocation strategy `config` picks.
pub fn run(config: &Config) -> Result<BatchReport, BatchError> {
    let relocator: Box<dyn FileRelocator> = match config.relocation {
        Relocation::MoveCommand => Box::new(MoveCommand::default()),
        Relocation::Rename => Box::new(RenameRelocator),
    };

    BatchCompiler::new(Glslc::new(config.compiler.clone()), relocator)
        .with_work_dir(&config.work_dir)
        .with_verification(config.verify)
        .compile_shaders(&config.shader_dir)
}
