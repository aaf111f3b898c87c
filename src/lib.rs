// Library for tests to access modules

pub mod checks;
pub mod config;
pub mod error;
pub mod exec;
pub mod host;
pub mod report;

pub use checks::{Check, default_checks};
pub use error::{PreflightError, Result};
