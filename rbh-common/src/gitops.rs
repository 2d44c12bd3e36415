//! Local git queries over the `git` CLI.
//!
//! Output is captured for parsing; stderr stays inherited so git's own
//! diagnostics reach the user when something is wrong with the checkout.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::debug;

use crate::changeset::ChangeSet;
use crate::error::CommandFailed;

async fn run_git_capture(dir: &Path, args: &[&str]) -> Result<String> {
    debug!(?args, dir = %dir.display(), "running git");
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stderr(Stdio::inherit())
        .output()
        .await
        .with_context(|| format!("failed to run git {}", args.join(" ")))?;
    if !output.status.success() {
        return Err(CommandFailed::new("git", output.status).into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Root of the work tree containing `start`.
///
/// Later steps run from here: name-status paths are toplevel-relative, so
/// the rsync file list is only correct with the toplevel as working
/// directory.
pub async fn repo_toplevel(start: &Path) -> Result<PathBuf> {
    let out = run_git_capture(start, &["rev-parse", "--show-toplevel"]).await?;
    Ok(PathBuf::from(out.trim()))
}

/// Merge-base commit of `branch` and `HEAD`, the diff baseline.
pub async fn merge_base(toplevel: &Path, branch: &str) -> Result<String> {
    let out = run_git_capture(toplevel, &["merge-base", branch, "HEAD"]).await?;
    Ok(out.trim().to_string())
}

/// Files changed since `commit`, working tree included.
pub async fn diff_name_status(toplevel: &Path, commit: &str) -> Result<ChangeSet> {
    let out = run_git_capture(toplevel, &["diff", commit, "--name-status"]).await?;
    Ok(ChangeSet::from_name_status(&out))
}
