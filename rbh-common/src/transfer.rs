//! rsync transfer of the changed-file set.
//!
//! `-avR` keeps the toplevel-relative structure on the remote side; the
//! invocation therefore runs with the repository toplevel as its working
//! directory. rsync's own progress output streams straight to the user.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::debug;

use crate::error::CommandFailed;

/// Argument vector for the sync invocation: `-avR` plus any configured
/// extras, the file list in parse order, and the `host:path` destination.
pub fn rsync_args(
    files: &[String],
    host: &str,
    remote_path: &str,
    extra: &[String],
) -> Vec<String> {
    let mut args = Vec::with_capacity(files.len() + extra.len() + 2);
    args.push("-avR".to_string());
    args.extend(extra.iter().cloned());
    args.extend(files.iter().cloned());
    args.push(format!("{host}:{remote_path}"));
    args
}

/// Run rsync with inherited stdio; a non-zero exit carries its code out.
pub async fn sync_files(toplevel: &Path, args: &[String]) -> Result<()> {
    debug!(?args, "running rsync");
    let status = Command::new("rsync")
        .args(args)
        .current_dir(toplevel)
        .status()
        .await
        .context("failed to run rsync")?;
    if !status.success() {
        return Err(CommandFailed::new("rsync", status).into());
    }
    Ok(())
}
