//! Shared library for the remote build helper.
//!
//! Everything the `rbh` binary does lives here: reading the local git
//! state, shipping changed files with rsync, keeping the remote checkout
//! honest, and kicking off the build script over ssh. The binary crate
//! only parses arguments, wires up logging, and renders reports.

pub mod changeset;
pub mod config;
pub mod error;
pub mod gitops;
pub mod pipeline;
pub mod preflight;
pub mod remote;
pub mod transfer;

pub use changeset::ChangeSet;
pub use config::{CliOverrides, FileConfig, RunOptions};
pub use error::{CommandFailed, ConfigError, HostNotConfigured};
pub use pipeline::RunReport;
pub use preflight::{CheckResult, PreflightReport, Severity};
