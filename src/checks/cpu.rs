// Logical CPU count via nproc.

use super::{Check, PRODUCT};
use crate::config::Thresholds;
use crate::error::Result;
use crate::exec::{CommandRunner, run_checked};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::instrument;

pub struct CpuCheck {
    runner: Arc<dyn CommandRunner>,
    nproc: PathBuf,
    thresholds: Thresholds,
}

impl CpuCheck {
    pub fn new(runner: Arc<dyn CommandRunner>, nproc: PathBuf, thresholds: Thresholds) -> Self {
        Self {
            runner,
            nproc,
            thresholds,
        }
    }
}

impl Check for CpuCheck {
    fn name(&self) -> &'static str {
        "cpu"
    }

    #[instrument(skip(self), fields(check = "cpu"))]
    fn run(&self) -> Result<Option<String>> {
        let out = run_checked(self.runner.as_ref(), &self.nproc, &["--all"])?;
        // Garbage counts as zero cores, which fails the test tier below.
        let cores: u32 = out.trim().parse().unwrap_or(0);
        tracing::debug!(cores, "cpu cores detected");

        let t = &self.thresholds;
        if cores < t.min_cpu_test {
            return Ok(Some(format!(
                "Only {} CPU cores detected. {} requires at least {} cores for testing and {} for production use.",
                cores, PRODUCT, t.min_cpu_test, t.min_cpu_prod
            )));
        }
        if cores < t.min_cpu_prod {
            return Ok(Some(format!(
                "{} CPU cores detected. {} requires at least {} cores for production use.",
                cores, PRODUCT, t.min_cpu_prod
            )));
        }
        Ok(None)
    }
}
