// Preflight checks: each one probes a single aspect of the host.

mod cpu;
mod kvm;
mod memory;
mod network;
mod virt;

pub use cpu::CpuCheck;
pub use kvm::KvmHostCheck;
pub use memory::{
    HUGE_MEMORY_KIB, MemoryCheck, range_size_to_kib, read_mem_total, sum_mapped_ranges,
};
pub use network::NetworkSpeedCheck;
pub use virt::VirtCheck;

use crate::config::PreflightConfig;
use crate::error::Result;
use crate::exec::CommandRunner;
use std::sync::Arc;

/// Product name used in requirement messages.
pub const PRODUCT: &str = "SaftOS";

/// A single preflight check.
///
/// `run` returns `Ok(None)` when the host passes, `Ok(Some(message))` when it
/// misses the test or production requirement (the message says which and
/// why), and `Err` when the check itself could not be carried out.
pub trait Check: Send + Sync {
    /// Short identifier used in reports and logs.
    fn name(&self) -> &'static str;

    fn run(&self) -> Result<Option<String>>;
}

/// The flat list of checks for this host: CPU, memory, virtualization, KVM,
/// then one link speed check per configured interface.
pub fn default_checks(
    config: &PreflightConfig,
    runner: Arc<dyn CommandRunner>,
) -> Vec<Arc<dyn Check>> {
    let t = config.thresholds;
    let paths = &config.paths;
    let mut checks: Vec<Arc<dyn Check>> = vec![
        Arc::new(CpuCheck::new(runner.clone(), paths.nproc.clone(), t)),
        Arc::new(MemoryCheck::new(
            runner.clone(),
            paths.dmidecode.clone(),
            paths.meminfo.clone(),
            t,
        )),
        Arc::new(VirtCheck::new(runner, paths.detect_virt.clone())),
        Arc::new(KvmHostCheck::new(paths.dev_kvm.clone())),
    ];
    for dev in &config.network_devices {
        checks.push(Arc::new(NetworkSpeedCheck::new(
            dev.clone(),
            paths.net_speed_path(dev),
            t,
        )));
    }
    checks
}
