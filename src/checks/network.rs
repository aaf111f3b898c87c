// NIC link speed from /sys/class/net/<dev>/speed (Mbps).

use super::{Check, PRODUCT};
use crate::config::Thresholds;
use crate::error::{PreflightError, Result};
use std::path::PathBuf;
use tracing::instrument;

pub struct NetworkSpeedCheck {
    dev: String,
    speed_path: PathBuf,
    thresholds: Thresholds,
}

impl NetworkSpeedCheck {
    pub fn new(dev: String, speed_path: PathBuf, thresholds: Thresholds) -> Self {
        Self {
            dev,
            speed_path,
            thresholds,
        }
    }

    pub fn dev(&self) -> &str {
        &self.dev
    }
}

impl Check for NetworkSpeedCheck {
    fn name(&self) -> &'static str {
        "network-speed"
    }

    #[instrument(skip(self), fields(check = "network-speed", dev = %self.dev))]
    fn run(&self) -> Result<Option<String>> {
        let content =
            std::fs::read_to_string(&self.speed_path).map_err(|source| PreflightError::Read {
                path: self.speed_path.clone(),
                source,
            })?;
        let speed_mbps: i64 = content.trim().parse().unwrap_or(0);
        if speed_mbps < 1 {
            return Err(PreflightError::BogusLinkSpeed {
                path: self.speed_path.clone(),
                value: speed_mbps,
            });
        }

        // Fractional tiers exist (2.5GbE, 5GbE).
        let speed_gbps = speed_mbps as f64 / 1000.0;
        tracing::debug!(speed_mbps, speed_gbps, "link speed detected");

        let t = &self.thresholds;
        if speed_gbps < f64::from(t.min_network_gbps_test) {
            return Ok(Some(format!(
                "Link speed of {} is only {}Mbps. {} requires at least {}Gbps for testing and {}Gbps for production use.",
                self.dev, speed_mbps, PRODUCT, t.min_network_gbps_test, t.min_network_gbps_prod
            )));
        }
        if speed_gbps < f64::from(t.min_network_gbps_prod) {
            return Ok(Some(format!(
                "Link speed of {} is {}Gbps. {} requires at least {}Gbps for production use.",
                self.dev, speed_gbps, PRODUCT, t.min_network_gbps_prod
            )));
        }
        Ok(None)
    }
}
