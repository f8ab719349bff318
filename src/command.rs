use std::process::{Command, Output};

use log::debug;

/// Runs `cmd` to completion with stdout and stderr captured.
pub(crate) fn run(cmd: &mut Command) -> std::io::Result<Output> {
    debug!("running {:?}", cmd);
    cmd.output()
}

/// Text an external tool printed about its failure, preferring stderr.
pub(crate) fn diagnostics(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
