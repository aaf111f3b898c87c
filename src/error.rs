// Execution errors: a check could not be carried out at all.
//
// A host that merely misses a requirement is not an error; that is reported
// through the check's message instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreflightError {
    /// The program could not be started (missing binary, permissions, ...).
    #[error("failed to run {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "{} exited with {}{}",
        .program.display(),
        exit_code_display(.exit_code),
        stderr_suffix(.stderr)
    )]
    CommandFailed {
        program: PathBuf,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stat {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to extract MemTotal from {}", .path.display())]
    MemTotalNotFound { path: PathBuf },

    /// Zero when the file held garbage, -1 for virtio NICs under virtualization.
    #[error("unable to determine NIC speed from {} (got {value})", .path.display())]
    BogusLinkSpeed { path: PathBuf, value: i64 },

    /// The blocking task running a check panicked or was cancelled.
    #[error("check task did not complete: {0}")]
    Task(String),
}

fn exit_code_display(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit status {}", c),
        None => "no exit status (terminated by signal)".into(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

pub type Result<T> = std::result::Result<T, PreflightError>;
