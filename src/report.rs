// Running a flat list of checks and collecting their outcomes.

use crate::checks::Check;
use crate::error::{PreflightError, Result};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckStatus {
    Passed,
    /// The host misses the test or production requirement.
    Failed,
    /// The check could not be carried out.
    Errored,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub check: String,
    pub status: CheckStatus,
    /// Requirement explanation for `Failed`, error text for `Errored`, empty otherwise.
    pub message: String,
}

impl CheckReport {
    pub fn from_outcome(check: &str, outcome: Result<Option<String>>) -> Self {
        let (status, message) = match outcome {
            Ok(None) => (CheckStatus::Passed, String::new()),
            Ok(Some(msg)) => (CheckStatus::Failed, msg),
            Err(e) => (CheckStatus::Errored, e.to_string()),
        };
        Self {
            check: check.to_string(),
            status,
            message,
        }
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            CheckStatus::Passed => write!(f, "[PASS] {}", self.check),
            CheckStatus::Failed => write!(f, "[FAIL] {}: {}", self.check, self.message),
            CheckStatus::Errored => write!(f, "[ERROR] {}: {}", self.check, self.message),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl Summary {
    pub fn from_reports(reports: &[CheckReport]) -> Self {
        reports.iter().fold(Self::default(), |mut s, r| {
            match r.status {
                CheckStatus::Passed => s.passed += 1,
                CheckStatus::Failed => s.failed += 1,
                CheckStatus::Errored => s.errored += 1,
            }
            s
        })
    }

    pub fn is_ok(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

/// Run every check on the blocking pool at once; reports come back in input order.
pub async fn run_all(checks: Vec<Arc<dyn Check>>) -> Vec<CheckReport> {
    let handles: Vec<_> = checks
        .into_iter()
        .map(|check| {
            let name = check.name();
            (name, tokio::task::spawn_blocking(move || check.run()))
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for (name, handle) in handles {
        let outcome = handle
            .await
            .unwrap_or_else(|e| Err(PreflightError::Task(e.to_string())));
        let report = CheckReport::from_outcome(name, outcome);
        log_report(&report);
        reports.push(report);
    }
    reports
}

fn log_report(report: &CheckReport) {
    match report.status {
        CheckStatus::Passed => tracing::debug!(check = %report.check, "check passed"),
        CheckStatus::Failed => {
            tracing::warn!(check = %report.check, reason = %report.message, "check failed")
        }
        CheckStatus::Errored => {
            tracing::error!(check = %report.check, error = %report.message, "check could not run")
        }
    }
}
