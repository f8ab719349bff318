use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use log::debug;
use thiserror::Error;

use crate::command;

pub const DEFAULT_MOVE_COMMAND: &str = "mv";

#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("{0} has no file name")]
    NoFileName(PathBuf),
    #[error("could not start {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("move exited with {status}:\n{diagnostics}")]
    Failed {
        status: ExitStatus,
        diagnostics: String,
    },
    #[error("could not move file")]
    Io(#[from] std::io::Error),
}

/// Moves a finished artifact into the directory it belongs in.
pub trait FileRelocator {
    /// Returns the path the file ended up at, `target_dir/<file name>`.
    fn relocate(&self, file: &Path, target_dir: &Path) -> Result<PathBuf, RelocateError>;
}

impl<T: FileRelocator + ?Sized> FileRelocator for &T {
    fn relocate(&self, file: &Path, target_dir: &Path) -> Result<PathBuf, RelocateError> {
        (**self).relocate(file, target_dir)
    }
}

impl<T: FileRelocator + ?Sized> FileRelocator for Box<T> {
    fn relocate(&self, file: &Path, target_dir: &Path) -> Result<PathBuf, RelocateError> {
        (**self).relocate(file, target_dir)
    }
}

fn destination(file: &Path, target_dir: &Path) -> Result<PathBuf, RelocateError> {
    let name = file
        .file_name()
        .ok_or_else(|| RelocateError::NoFileName(file.to_path_buf()))?;
    Ok(target_dir.join(name))
}

/// Shells out to `<program> <file> <target_dir>`, `mv` by default.
#[derive(Clone, Debug)]
pub struct MoveCommand {
    program: OsString,
}

impl Default for MoveCommand {
    fn default() -> Self {
        MoveCommand::new(DEFAULT_MOVE_COMMAND)
    }
}

impl MoveCommand {
    pub fn new(program: impl Into<OsString>) -> Self {
        MoveCommand {
            program: program.into(),
        }
    }
}

impl FileRelocator for MoveCommand {
    fn relocate(&self, file: &Path, target_dir: &Path) -> Result<PathBuf, RelocateError> {
        let destination = destination(file, target_dir)?;

        let mut cmd = Command::new(&self.program);
        cmd.arg(file).arg(target_dir);
        let output = command::run(&mut cmd).map_err(|source| RelocateError::Spawn {
            program: self.program.to_string_lossy().into_owned(),
            source,
        })?;

        if !output.status.success() {
            return Err(RelocateError::Failed {
                status: output.status,
                diagnostics: command::diagnostics(&output),
            });
        }
        Ok(destination)
    }
}

/// Moves files without leaving the process.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenameRelocator;

impl FileRelocator for RenameRelocator {
    fn relocate(&self, file: &Path, target_dir: &Path) -> Result<PathBuf, RelocateError> {
        let destination = destination(file, target_dir)?;
        if !target_dir.is_dir() {
            return Err(RelocateError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a directory", target_dir.display()),
            )));
        }

        if fs::rename(file, &destination).is_err() {
            // rename can't cross filesystems
            debug!(
                "rename {} failed, copying to {}",
                file.display(),
                destination.display()
            );
            fs::copy(file, &destination)?;
            fs::remove_file(file)?;
        }
        Ok(destination)
    }
}
