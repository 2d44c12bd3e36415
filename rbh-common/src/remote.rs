//! Remote command composition and execution over ssh.
//!
//! Every remote step is one ssh invocation running a `cd <path> && ...`
//! chain. The remote path is embedded verbatim so a leading `~` expands in
//! the remote shell; individual arguments are POSIX-quoted.

use std::borrow::Cow;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::debug;

use crate::changeset::ChangeSet;
use crate::error::CommandFailed;

/// Quote one argument for the remote POSIX shell.
pub fn quote(arg: &str) -> String {
    shell_escape::unix::escape(Cow::Borrowed(arg)).into_owned()
}

/// The drift check: what does the remote working tree think changed?
pub fn drift_query_command(remote_path: &str) -> String {
    format!("cd {remote_path} && git diff --name-status")
}

/// One chained checkout per unexpected path.
pub fn revert_command(remote_path: &str, paths: &[String]) -> String {
    let mut command = format!("cd {remote_path}");
    for path in paths {
        command.push_str(" && git checkout -- ");
        command.push_str(&quote(path));
    }
    command
}

/// The build invocation: script, then build type, then forwarded arguments.
pub fn build_command(
    remote_path: &str,
    script: &str,
    build_type: &str,
    args: &[String],
) -> String {
    let mut command = format!("cd {remote_path} && {script} {}", quote(build_type));
    for arg in args {
        command.push(' ');
        command.push_str(&quote(arg));
    }
    command
}

/// Run a remote command with inherited stdio (build output streams live).
pub async fn run(host: &str, command: &str) -> Result<()> {
    debug!(host, command, "running remote command");
    let status = Command::new("ssh")
        .arg(host)
        .arg(command)
        .status()
        .await
        .context("failed to run ssh")?;
    if !status.success() {
        return Err(CommandFailed::new("ssh", status).into());
    }
    Ok(())
}

/// Run a remote command and capture stdout for parsing.
pub async fn query(host: &str, command: &str) -> Result<String> {
    debug!(host, command, "querying remote");
    let output = Command::new("ssh")
        .arg(host)
        .arg(command)
        .stderr(std::process::Stdio::inherit())
        .output()
        .await
        .context("failed to run ssh")?;
    if !output.status.success() {
        return Err(CommandFailed::new("ssh", output.status).into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Fetch the remote change report as a change set.
pub async fn remote_changes(host: &str, remote_path: &str) -> Result<ChangeSet> {
    let out = query(host, &drift_query_command(remote_path)).await?;
    Ok(ChangeSet::from_name_status(&out))
}
