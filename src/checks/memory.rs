// Installed RAM.
//
// `dmidecode -t 19` lists one "Memory Array Mapped Address" record per mapped
// range; summing their "Range Size" lines gives the installed total. When
// that yields nothing we fall back to MemTotal in /proc/meminfo, which is the
// usable total after firmware and kernel reservations and therefore always a
// little short of what is physically installed.

use super::{Check, PRODUCT};
use crate::config::Thresholds;
use crate::error::{PreflightError, Result};
use crate::exec::{CommandRunner, run_checked};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::instrument;

/// Total assumed once a mapped range is reported in TB or larger: 1 TiB in KiB.
pub const HUGE_MEMORY_KIB: u64 = 1 << 30;

/// MemTotal undercounts installed RAM by up to ~10% (a 32GiB host reports
/// about 31.1GiB), so thresholds are relaxed by this factor on the fallback.
const MEMINFO_WIGGLE_ROOM: f64 = 0.9;

const HUGE_UNITS: [&str; 4] = ["TB", "PB", "EB", "ZB"];

/// Convert a dmidecode range size to KiB. Unknown units count as zero.
pub fn range_size_to_kib(size: u64, unit: &str) -> u64 {
    match unit {
        "GB" => size << 20,
        "MB" => size << 10,
        "kB" => size,
        "bytes" => size >> 10,
        _ => 0,
    }
}

/// Sum every `Range Size: <n> <unit>` line of `dmidecode -t 19` output, in KiB.
///
/// A range in TB or larger clamps the total to [`HUGE_MEMORY_KIB`] and stops
/// the summation; such hosts pass every tier anyway.
pub fn sum_mapped_ranges(output: &str) -> u64 {
    let mut total_kib: u64 = 0;
    for line in output.lines() {
        let Some((size, unit)) = parse_range_size(line) else {
            continue;
        };
        if HUGE_UNITS.contains(&unit) {
            tracing::info!(
                "Found Memory Array Mapped Address with Range Size {} {}, assuming 1 TiB RAM for preflight check",
                size,
                unit
            );
            total_kib = HUGE_MEMORY_KIB;
            break;
        }
        total_kib = total_kib.saturating_add(range_size_to_kib(size, unit));
    }
    total_kib
}

fn parse_range_size(line: &str) -> Option<(u64, &str)> {
    let rest = line.trim().strip_prefix("Range Size:")?;
    let mut fields = rest.split_whitespace();
    let size = fields.next()?.parse().ok()?;
    let unit = fields.next()?;
    Some((size, unit))
}

/// Read the MemTotal value (kB) from a meminfo-style file.
pub fn read_mem_total(path: &Path) -> Result<u64> {
    let read_err = |source| PreflightError::Read {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(read_err)?);

    let mut total_kib = 0;
    for line in reader.lines() {
        let line = line.map_err(read_err)?;
        if let Some(kib) = line
            .strip_prefix("MemTotal:")
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|v| v.parse::<u64>().ok())
        {
            total_kib = kib;
            break;
        }
    }

    if total_kib == 0 {
        return Err(PreflightError::MemTotalNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(total_kib)
}

pub struct MemoryCheck {
    runner: Arc<dyn CommandRunner>,
    dmidecode: PathBuf,
    meminfo: PathBuf,
    thresholds: Thresholds,
}

impl MemoryCheck {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        dmidecode: PathBuf,
        meminfo: PathBuf,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            runner,
            dmidecode,
            meminfo,
            thresholds,
        }
    }

    /// Installed RAM in KiB and the factor to apply to the thresholds.
    fn total_kib(&self) -> Result<(u64, f64)> {
        // dmidecode being absent or refused is not fatal, the fallback covers it.
        let from_dmi = match run_checked(self.runner.as_ref(), &self.dmidecode, &["-t", "19"]) {
            Ok(out) => sum_mapped_ranges(&out),
            Err(e) => {
                tracing::debug!(error = %e, "dmidecode unavailable, using meminfo");
                0
            }
        };
        if from_dmi > 0 {
            return Ok((from_dmi, 1.0));
        }
        let from_meminfo = read_mem_total(&self.meminfo)?;
        Ok((from_meminfo, MEMINFO_WIGGLE_ROOM))
    }
}

impl Check for MemoryCheck {
    fn name(&self) -> &'static str {
        "memory"
    }

    #[instrument(skip(self), fields(check = "memory"))]
    fn run(&self) -> Result<Option<String>> {
        let (total_kib, wiggle_room) = self.total_kib()?;
        let total_mib = total_kib >> 10;
        let total_gib = total_kib >> 20;
        tracing::debug!(total_kib, wiggle_room, "memory detected");

        let reported = if total_gib < 1 {
            format!("{}MiB", total_mib)
        } else {
            format!("{}GiB", total_gib)
        };

        let t = &self.thresholds;
        let gib = total_gib as f64;
        if gib < f64::from(t.min_memory_gib_test) * wiggle_room {
            return Ok(Some(format!(
                "Only {} RAM detected. {} requires at least {}GiB for testing and {}GiB for production use.",
                reported, PRODUCT, t.min_memory_gib_test, t.min_memory_gib_prod
            )));
        }
        if gib < f64::from(t.min_memory_gib_prod) * wiggle_room {
            return Ok(Some(format!(
                "{} RAM detected. {} requires at least {}GiB for production use.",
                reported, PRODUCT, t.min_memory_gib_prod
            )));
        }
        Ok(None)
    }
}
