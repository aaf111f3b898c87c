use anyhow::Result;
use preflight::config::{self, Thresholds};
use preflight::default_checks;
use preflight::exec::SystemRunner;
use preflight::host::HostInfo;
use preflight::report::{CheckReport, Summary, run_all};
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PreflightDocument<'a> {
    host: &'a HostInfo,
    thresholds: Thresholds,
    reports: &'a [CheckReport],
    summary: Summary,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // stdout carries the results, logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::PreflightConfig::from_env()?;
    let host = HostInfo::collect();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %host.host_name,
        os = %host.os_name,
        os_version = %host.os_version,
        kernel = %host.kernel_version,
        "running preflight checks"
    );

    let checks = default_checks(&config, Arc::new(SystemRunner));
    let reports = run_all(checks).await;
    let summary = Summary::from_reports(&reports);

    if config.json_output {
        let doc = PreflightDocument {
            host: &host,
            thresholds: config.thresholds,
            reports: &reports,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        for report in &reports {
            println!("{}", report);
        }
        println!(
            "{} passed, {} failed, {} errored",
            summary.passed, summary.failed, summary.errored
        );
    }

    Ok(if summary.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
