use std::ffi::OsString;
use std::path::PathBuf;

use thiserror::Error;

use crate::compiler::DEFAULT_COMPILER;

pub const DEFAULT_SHADER_DIR: &str = "assets/shaders/";

pub const SHADER_DIR_VAR: &str = "SHADER_DIR";
pub const COMPILER_VAR: &str = "GLSLC";
pub const RELOCATE_VAR: &str = "SHADER_RELOCATE";
pub const WORK_DIR_VAR: &str = "SHADER_WORK_DIR";
pub const VERIFY_VAR: &str = "SHADER_VERIFY";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unexpected argument {0:?}, expected at most one shader directory")]
    UnexpectedArgument(OsString),
    #[error("unknown relocation mode {0:?}, expected \"mv\" or \"rename\"")]
    UnknownRelocation(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Relocation {
    /// Shell out to `mv`.
    #[default]
    MoveCommand,
    /// `std::fs::rename` in process.
    Rename,
}

impl Relocation {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "mv" => Ok(Relocation::MoveCommand),
            "rename" => Ok(Relocation::Rename),
            other => Err(ConfigError::UnknownRelocation(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub shader_dir: PathBuf,
    pub compiler: OsString,
    pub relocation: Relocation,
    pub work_dir: PathBuf,
    pub verify: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            shader_dir: PathBuf::from(DEFAULT_SHADER_DIR),
            compiler: OsString::from(DEFAULT_COMPILER),
            relocation: Relocation::default(),
            work_dir: PathBuf::from("."),
            verify: true,
        }
    }
}

impl Config {
    /// Reads the process arguments (without the program name) and environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::resolve(std::env::args_os().skip(1), |key| std::env::var_os(key))
    }

    /// A positional argument beats the environment, which beats the defaults.
    pub fn resolve<A, E>(args: A, env: E) -> Result<Self, ConfigError>
    where
        A: IntoIterator<Item = OsString>,
        E: Fn(&str) -> Option<OsString>,
    {
        let mut config = Config::default();
        let non_empty = |key: &str| env(key).filter(|value| !value.is_empty());

        if let Some(dir) = non_empty(SHADER_DIR_VAR) {
            config.shader_dir = dir.into();
        }
        if let Some(compiler) = non_empty(COMPILER_VAR) {
            config.compiler = compiler;
        }
        if let Some(mode) = non_empty(RELOCATE_VAR) {
            config.relocation = Relocation::parse(&mode.to_string_lossy())?;
        }
        if let Some(dir) = non_empty(WORK_DIR_VAR) {
            config.work_dir = dir.into();
        }
        if let Some(verify) = non_empty(VERIFY_VAR) {
            let verify = verify.to_string_lossy().to_lowercase();
            config.verify = !matches!(verify.as_str(), "0" | "false" | "off" | "no");
        }

        let mut args = args.into_iter();
        if let Some(dir) = args.next() {
            config.shader_dir = dir.into();
        }
        if let Some(extra) = args.next() {
            return Err(ConfigError::UnexpectedArgument(extra));
        }

        Ok(config)
    }
}
