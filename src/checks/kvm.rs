// Hardware-assisted virtualization: the KVM device node must exist.

use super::{Check, PRODUCT};
use crate::error::{PreflightError, Result};
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::instrument;

pub struct KvmHostCheck {
    dev_kvm: PathBuf,
}

impl KvmHostCheck {
    pub fn new(dev_kvm: PathBuf) -> Self {
        Self { dev_kvm }
    }
}

impl Check for KvmHostCheck {
    fn name(&self) -> &'static str {
        "kvm"
    }

    #[instrument(skip(self), fields(check = "kvm"))]
    fn run(&self) -> Result<Option<String>> {
        match std::fs::metadata(&self.dev_kvm) {
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Some(format!(
                "{} requires hardware-assisted virtualization, but {} does not exist.",
                PRODUCT,
                self.dev_kvm.display()
            ))),
            Err(source) => Err(PreflightError::Stat {
                path: self.dev_kvm.clone(),
                source,
            }),
        }
    }
}
