// Shared test helpers

#![allow(dead_code)]

use preflight::exec::{CommandOutput, CommandRunner};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Canned command output keyed by program path. Unknown programs fail to spawn.
#[derive(Default)]
pub struct FakeRunner {
    outputs: HashMap<PathBuf, CommandOutput>,
    calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, program: &str, stdout: &str, exit_code: i32) -> Self {
        self.outputs.insert(
            program.into(),
            CommandOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                exit_code: Some(exit_code),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &Path, args: &[&str]) -> std::io::Result<CommandOutput> {
        self.calls.lock().unwrap().push((
            program.to_path_buf(),
            args.iter().map(|a| a.to_string()).collect(),
        ));
        self.outputs.get(program).cloned().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such program")
        })
    }
}

/// Write `contents` to `name` inside `dir` and return the path.
pub fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

pub const NPROC: &str = "/usr/bin/nproc";
pub const DMIDECODE: &str = "/usr/sbin/dmidecode";
pub const DETECT_VIRT: &str = "/usr/bin/systemd-detect-virt";

pub const DMIDECODE_512G: &str = "\
# dmidecode 3.5
Getting SMBIOS data from sysfs.
SMBIOS 2.8 present.

Handle 0x0024, DMI type 19, 31 bytes
Memory Array Mapped Address
\tStarting Address: 0x00000000000
\tEnding Address: 0x0007FFFFFFF
\tRange Size: 2 GB
\tPhysical Array Handle: 0x000A
\tPartition Width: 1

Handle 0x0025, DMI type 19, 31 bytes
Memory Array Mapped Address
\tStarting Address: 0x0000000100000000k
\tEnding Address: 0x000000807FFFFFFFk
\tRange Size: 510 GB
\tPhysical Array Handle: 0x000B
\tPartition Width: 1
";

pub const MEMINFO_32G: &str = "\
MemTotal:       32856636 kB
MemFree:        30112480 kB
MemAvailable:   31406184 kB
Buffers:          120732 kB
";
