use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use crate::compiler::{CompileError, ShaderCompiler};
use crate::relocate::{FileRelocator, RelocateError};
use crate::shader::{ShaderSource, ShaderStage};
use crate::spirv::{self, SpirvError};

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("could not list shader directory {}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to compile {}", .source_file.display())]
    Compile {
        source_file: PathBuf,
        #[source]
        source: CompileError,
    },
    #[error("compiling {} did not produce {}", .source_file.display(), .artifact.display())]
    MissingArtifact {
        source_file: PathBuf,
        artifact: PathBuf,
    },
    #[error("could not read compiled artifact {}", .artifact.display())]
    ReadArtifact {
        artifact: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a valid SPIR-V module", .artifact.display())]
    InvalidArtifact {
        artifact: PathBuf,
        #[source]
        source: SpirvError,
    },
    #[error("could not move {} into {}", .artifact.display(), .dir.display())]
    Relocate {
        artifact: PathBuf,
        dir: PathBuf,
        #[source]
        source: RelocateError,
    },
    #[error("could not write progress output")]
    Progress(#[source] io::Error),
}

/// Artifacts written by one successful run, in the order they were produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    artifacts: Vec<PathBuf>,
}

impl BatchReport {
    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// Lists the vertex and then fragment shaders directly inside `shader_dir`,
/// each group in file name order. Subdirectories are not searched.
pub fn discover_shaders(shader_dir: &Path) -> Result<Vec<ShaderSource>, BatchError> {
    let read_dir_error = |source| BatchError::ReadDir {
        dir: shader_dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(shader_dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        if !entry.path().is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => warn!("Skipping non UTF-8 file name {:?}", name),
        }
    }
    names.sort();

    let mut shaders: Vec<_> = names
        .iter()
        .filter_map(|name| ShaderSource::classify(shader_dir, name))
        .collect();
    // stable, so name order survives within each stage
    shaders.sort_by_key(|shader| shader.stage());
    Ok(shaders)
}

pub struct BatchCompiler<C, R> {
    compiler: C,
    relocator: R,
    work_dir: PathBuf,
    verify: bool,
}

impl<C: ShaderCompiler, R: FileRelocator> BatchCompiler<C, R> {
    pub fn new(compiler: C, relocator: R) -> Self {
        BatchCompiler {
            compiler,
            relocator,
            work_dir: PathBuf::from("."),
            verify: true,
        }
    }

    /// Where the compiler writes each artifact before it is moved.
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Compiles every shader in `shader_dir`, printing progress to stdout.
    pub fn compile_shaders(&self, shader_dir: &Path) -> Result<BatchReport, BatchError> {
        let stdout = io::stdout();
        self.compile_shaders_with_progress(shader_dir, &mut stdout.lock())
    }

    /// Stops at the first failure. Artifacts finished before it are left in
    /// place.
    pub fn compile_shaders_with_progress(
        &self,
        shader_dir: &Path,
        progress: &mut impl Write,
    ) -> Result<BatchReport, BatchError> {
        let shaders = discover_shaders(shader_dir)?;
        info!(
            "Compiling {} shaders in {}",
            shaders.len(),
            shader_dir.display()
        );

        let mut report = BatchReport::default();
        for stage in ShaderStage::ALL {
            for shader in shaders.iter().filter(|s| s.stage() == stage) {
                writeln!(progress, "Compiling {}...", shader.file_name())
                    .map_err(BatchError::Progress)?;

                let artifact = self.compile_one(shader, shader_dir)?;

                writeln!(
                    progress,
                    "Compiled {} to {}",
                    shader.file_name(),
                    shader.artifact_name()
                )
                .map_err(BatchError::Progress)?;
                report.artifacts.push(artifact);
            }
        }

        info!("Compiled {} shaders", report.len());
        Ok(report)
    }

    fn compile_one(&self, shader: &ShaderSource, shader_dir: &Path) -> Result<PathBuf, BatchError> {
        let output = self.work_dir.join(shader.artifact_name());

        self.compiler
            .compile(shader.path(), &output)
            .map_err(|source| BatchError::Compile {
                source_file: shader.path().to_path_buf(),
                source,
            })?;

        if self.verify {
            self.verify_artifact(shader, &output)?;
        }

        self.relocator
            .relocate(&output, shader_dir)
            .map_err(|source| BatchError::Relocate {
                artifact: output.clone(),
                dir: shader_dir.to_path_buf(),
                source,
            })
    }

    fn verify_artifact(&self, shader: &ShaderSource, artifact: &Path) -> Result<(), BatchError> {
        let bytes = match fs::read(artifact) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BatchError::MissingArtifact {
                    source_file: shader.path().to_path_buf(),
                    artifact: artifact.to_path_buf(),
                })
            }
            Err(source) => {
                return Err(BatchError::ReadArtifact {
                    artifact: artifact.to_path_buf(),
                    source,
                })
            }
        };

        let header =
            spirv::parse_header(&bytes).map_err(|source| BatchError::InvalidArtifact {
                artifact: artifact.to_path_buf(),
                source,
            })?;
        debug!(
            "{}: SPIR-V {}.{}, generator {:#010x}, bound {}",
            artifact.display(),
            header.version_major,
            header.version_minor,
            header.generator,
            header.bound
        );
        Ok(())
    }
}
