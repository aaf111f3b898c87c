// Command execution behind a trait so checks can be fed canned output in tests.

use crate::error::{PreflightError, Result};
use std::path::Path;
use std::process::Command;

/// Captured result of a finished command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs an external program to completion and captures its output.
///
/// An `Err` means the program could not be started at all; a program that ran
/// and exited non-zero is an `Ok` whose [`CommandOutput::success`] is false.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &Path, args: &[&str]) -> std::io::Result<CommandOutput>;
}

/// Runs commands on the host via `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[&str]) -> std::io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}

/// Run a command that must exit 0 and return its stdout.
pub fn run_checked(runner: &dyn CommandRunner, program: &Path, args: &[&str]) -> Result<String> {
    let output = run_captured(runner, program, args)?;
    if !output.success() {
        return Err(PreflightError::CommandFailed {
            program: program.to_path_buf(),
            exit_code: output.exit_code,
            stderr: output.stderr,
        });
    }
    Ok(output.stdout)
}

/// Run a command and hand back its output whatever the exit status.
pub fn run_captured(
    runner: &dyn CommandRunner,
    program: &Path,
    args: &[&str],
) -> Result<CommandOutput> {
    tracing::debug!(program = %program.display(), ?args, "running command");
    runner
        .run(program, args)
        .map_err(|source| PreflightError::Spawn {
            program: program.to_path_buf(),
            source,
        })
}
