//! Environment verification for a build host (`--check`).
//!
//! Probes run over ssh with `BatchMode` so a broken key setup fails fast
//! instead of hanging on a password prompt. Probe output is captured; only
//! the pass/fail verdict matters here.

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::process::Command;
use tracing::debug;

use crate::config::RunOptions;
use crate::remote::quote;

/// Severity of a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// May cause trouble later (e.g. only with the build step).
    Warning,
    /// The sync-and-build flow cannot work.
    Error,
}

/// Outcome of a single check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub severity: Severity,
    pub message: String,
    pub remediation: Option<String>,
}

/// All checks for one host.
#[derive(Debug, Clone, Serialize)]
pub struct PreflightReport {
    pub host: String,
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    /// True when no `Error`-severity check failed.
    pub fn ok(&self) -> bool {
        self.checks
            .iter()
            .all(|c| c.passed || c.severity != Severity::Error)
    }
}

/// ssh argument vector for one non-interactive probe.
pub fn probe_args(host: &str, command: &str) -> Vec<String> {
    vec![
        "-o".to_string(),
        "BatchMode=yes".to_string(),
        "-o".to_string(),
        "ConnectTimeout=5".to_string(),
        host.to_string(),
        command.to_string(),
    ]
}

async fn probe(host: &str, command: &str) -> Result<bool> {
    debug!(host, command, "preflight probe");
    let output = Command::new("ssh")
        .args(probe_args(host, command))
        .output()
        .await
        .context("failed to run ssh")?;
    Ok(output.status.success())
}

fn check(name: &str, passed: bool, severity: Severity, fail_msg: &str, fix: &str) -> CheckResult {
    CheckResult {
        name: name.to_string(),
        passed,
        severity,
        message: if passed {
            "ok".to_string()
        } else {
            fail_msg.to_string()
        },
        remediation: (!passed).then(|| fix.to_string()),
    }
}

/// Run every check against the resolved options.
///
/// Local tool checks come first; remote checks are skipped when the
/// connectivity probe fails, since they could only repeat that failure.
pub async fn run_preflight(options: &RunOptions) -> Result<PreflightReport> {
    let mut checks = Vec::new();

    for tool in ["git", "rsync", "ssh"] {
        let found = which::which(tool).is_ok();
        checks.push(check(
            &format!("local {tool}"),
            found,
            Severity::Error,
            &format!("{tool} not found on PATH"),
            &format!("install {tool}"),
        ));
    }
    if checks.iter().any(|c| !c.passed) {
        return Ok(PreflightReport {
            host: options.host.clone(),
            checks,
        });
    }

    let connected = probe(&options.host, "echo ok").await?;
    checks.push(check(
        "ssh connectivity",
        connected,
        Severity::Error,
        "cannot connect (BatchMode)",
        &format!("verify ssh config and keys for {}", options.host),
    ));
    if !connected {
        return Ok(PreflightReport {
            host: options.host.clone(),
            checks,
        });
    }

    let remote_rsync = probe(&options.host, "which rsync").await?;
    checks.push(check(
        "remote rsync",
        remote_rsync,
        Severity::Error,
        "rsync not found on the build host",
        "install rsync on the build host",
    ));

    let work_tree = probe(
        &options.host,
        &format!(
            "cd {} && git rev-parse --is-inside-work-tree",
            options.remote_path
        ),
    )
    .await?;
    checks.push(check(
        "remote checkout",
        work_tree,
        Severity::Error,
        &format!("{} is not a git work tree", options.remote_path),
        &format!("clone the repository at {} on {}", options.remote_path, options.host),
    ));

    let script_ok = probe(
        &options.host,
        &format!(
            "cd {} && test -x {}",
            options.remote_path,
            quote(&options.build_script)
        ),
    )
    .await?;
    checks.push(check(
        "remote build script",
        script_ok,
        Severity::Warning,
        &format!("{} is missing or not executable", options.build_script),
        "not needed with --skip-build; otherwise create the build script",
    ));

    Ok(PreflightReport {
        host: options.host.clone(),
        checks,
    })
}
