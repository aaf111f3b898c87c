// Virtualization detection via systemd-detect-virt.

use super::Check;
use crate::error::{PreflightError, Result};
use crate::exec::{CommandRunner, run_captured};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::instrument;

pub struct VirtCheck {
    runner: Arc<dyn CommandRunner>,
    detect_virt: PathBuf,
}

impl VirtCheck {
    pub fn new(runner: Arc<dyn CommandRunner>, detect_virt: PathBuf) -> Self {
        Self {
            runner,
            detect_virt,
        }
    }
}

impl Check for VirtCheck {
    fn name(&self) -> &'static str {
        "virt"
    }

    #[instrument(skip(self), fields(check = "virt"))]
    fn run(&self) -> Result<Option<String>> {
        let output = run_captured(self.runner.as_ref(), &self.detect_virt, &["--vm"])?;
        let virt = output.stdout.trim();

        if !output.success() {
            // systemd-detect-virt exits non-zero and prints "none" on bare metal.
            if virt == "none" {
                return Ok(None);
            }
            return Err(PreflightError::CommandFailed {
                program: self.detect_virt.clone(),
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }

        Ok(Some(format!(
            "System is virtualized ({}) which is not supported in production.",
            virt
        )))
    }
}
