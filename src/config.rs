// Thresholds and probe locations. Defaults match the documented hardware
// requirements; the environment can point probes elsewhere.

use serde::Serialize;
use std::path::PathBuf;

/// Placeholder substituted with the device name in [`ProbePaths::net_speed_template`].
pub const DEV_PLACEHOLDER: &str = "{dev}";

/// Minimum requirements for a test install and for production use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub min_cpu_test: u32,
    pub min_cpu_prod: u32,
    pub min_memory_gib_test: u32,
    pub min_memory_gib_prod: u32,
    pub min_network_gbps_test: u32,
    pub min_network_gbps_prod: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_cpu_test: 8,
            min_cpu_prod: 16,
            min_memory_gib_test: 32,
            min_memory_gib_prod: 64,
            min_network_gbps_test: 1,
            min_network_gbps_prod: 10,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> anyhow::Result<()> {
        let tiers = [
            ("cpu", self.min_cpu_test, self.min_cpu_prod),
            ("memory", self.min_memory_gib_test, self.min_memory_gib_prod),
            (
                "network",
                self.min_network_gbps_test,
                self.min_network_gbps_prod,
            ),
        ];
        for (resource, test, prod) in tiers {
            anyhow::ensure!(
                test > 0,
                "thresholds.{} test minimum must be > 0, got {}",
                resource,
                test
            );
            anyhow::ensure!(
                test <= prod,
                "thresholds.{} test minimum ({}) must not exceed production minimum ({})",
                resource,
                test,
                prod
            );
        }
        Ok(())
    }
}

/// Where each probe looks: external tools, pseudo-files and device nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbePaths {
    pub nproc: PathBuf,
    pub dmidecode: PathBuf,
    pub detect_virt: PathBuf,
    pub meminfo: PathBuf,
    pub dev_kvm: PathBuf,
    /// Per-device speed file, `{dev}` is replaced with the interface name.
    pub net_speed_template: String,
}

impl Default for ProbePaths {
    fn default() -> Self {
        Self {
            nproc: "/usr/bin/nproc".into(),
            dmidecode: "/usr/sbin/dmidecode".into(),
            detect_virt: "/usr/bin/systemd-detect-virt".into(),
            meminfo: "/proc/meminfo".into(),
            dev_kvm: "/dev/kvm".into(),
            net_speed_template: format!("/sys/class/net/{}/speed", DEV_PLACEHOLDER),
        }
    }
}

impl ProbePaths {
    pub fn net_speed_path(&self, dev: &str) -> PathBuf {
        self.net_speed_template.replace(DEV_PLACEHOLDER, dev).into()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreflightConfig {
    pub thresholds: Thresholds,
    pub paths: ProbePaths,
    /// Interfaces whose link speed is checked; none means no network checks.
    pub network_devices: Vec<String>,
    pub json_output: bool,
}

impl PreflightConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (e.g. a map in tests), then validate.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let paths = &mut config.paths;

        if let Some(v) = lookup("PREFLIGHT_NPROC") {
            paths.nproc = v.into();
        }
        if let Some(v) = lookup("PREFLIGHT_DMIDECODE") {
            paths.dmidecode = v.into();
        }
        if let Some(v) = lookup("PREFLIGHT_DETECT_VIRT") {
            paths.detect_virt = v.into();
        }
        if let Some(v) = lookup("PREFLIGHT_MEMINFO") {
            paths.meminfo = v.into();
        }
        if let Some(v) = lookup("PREFLIGHT_DEV_KVM") {
            paths.dev_kvm = v.into();
        }
        if let Some(v) = lookup("PREFLIGHT_NET_SPEED_PATH") {
            paths.net_speed_template = v;
        }
        if let Some(v) = lookup("PREFLIGHT_NET_DEVICES") {
            config.network_devices = v
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = lookup("PREFLIGHT_FORMAT") {
            config.json_output = match v.trim().to_ascii_lowercase().as_str() {
                "json" => true,
                "text" | "" => false,
                other => anyhow::bail!(
                    "PREFLIGHT_FORMAT must be \"json\" or \"text\", got {:?}",
                    other
                ),
            };
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.thresholds.validate()?;
        anyhow::ensure!(
            self.paths.net_speed_template.contains(DEV_PLACEHOLDER),
            "PREFLIGHT_NET_SPEED_PATH must contain {}, got {:?}",
            DEV_PLACEHOLDER,
            self.paths.net_speed_template
        );
        for dev in &self.network_devices {
            anyhow::ensure!(
                !dev.contains('/'),
                "PREFLIGHT_NET_DEVICES entries must be interface names, got {:?}",
                dev
            );
        }
        Ok(())
    }
}
