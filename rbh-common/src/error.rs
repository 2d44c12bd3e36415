//! Error types shared across RBH.
//!
//! The program has no recovery logic: the first failing external command
//! terminates the run, and the process must exit with that command's code.
//! [`CommandFailed`] carries the code through the `anyhow` chain so the
//! binary can recover it with `downcast_ref` and call `process::exit`.

use std::process::ExitStatus;

use thiserror::Error;

/// An external command exited unsuccessfully.
#[derive(Debug, Clone, Error)]
#[error("{program} exited with code {code}")]
pub struct CommandFailed {
    /// Program name as invoked (`git`, `rsync`, `ssh`).
    pub program: String,
    /// Exit code the process must mirror.
    pub code: i32,
}

impl CommandFailed {
    pub fn new(program: impl Into<String>, status: ExitStatus) -> Self {
        Self {
            program: program.into(),
            code: exit_code(status),
        }
    }
}

/// No build host was found in any configuration layer.
#[derive(Debug, Clone, Error)]
#[error("no build host configured; pass --host or set RBH_BUILD_HOST")]
pub struct HostNotConfigured;

/// Errors from loading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {path}")]
    NotFound { path: String },

    /// The config file could not be read.
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for the expected schema.
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Map an [`ExitStatus`] to the code the process should exit with.
///
/// A signal-terminated child has no exit code; following shell convention it
/// maps to `128 + signal` on Unix. Anything else unknowable maps to 1.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
