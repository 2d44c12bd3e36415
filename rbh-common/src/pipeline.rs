//! The sequential sync-and-build flow.
//!
//! One invocation walks through merge-base, local diff, transfer, drift
//! revert, and the remote build, with each external command run to
//! completion before the next. Progress lines print before the
//! long-running steps so they frame the subprocess output the user is
//! about to see.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::config::RunOptions;
use crate::{gitops, remote, transfer};

/// Summary of one invocation.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub base_commit: String,
    pub changed_files: Vec<String>,
    /// False when the change set was empty or this was a dry run.
    pub synced: bool,
    /// Remote paths reverted by the drift check.
    pub reverted: Vec<String>,
    pub build_invoked: bool,
    pub dry_run: bool,
    pub sync_ms: u64,
    pub build_ms: u64,
}

fn say(options: &RunOptions, line: &str) {
    if !options.quiet {
        println!("{line}");
    }
}

/// Sync changed files to the build host, reconcile drift, run the build.
///
/// `toplevel` is the local work-tree root; the diff paths are relative to
/// it and the transfer runs from it. With `dry_run` the read-only local
/// git queries still run, but every rsync/ssh invocation is printed
/// instead of executed.
pub async fn run(options: &RunOptions, toplevel: &Path) -> Result<RunReport> {
    let base_commit = gitops::merge_base(toplevel, &options.branch).await?;
    say(options, &format!("Base commit: {base_commit}"));

    let changes = gitops::diff_name_status(toplevel, &base_commit).await?;
    say(options, &format!("Total files: {}", changes.len()));
    info!(files = changes.len(), base = %base_commit, "change set computed");

    let sync_start = Instant::now();
    let mut synced = false;
    if !changes.is_empty() {
        let args = transfer::rsync_args(
            changes.paths(),
            &options.host,
            &options.remote_path,
            &options.extra_rsync_args,
        );
        if options.dry_run {
            say(options, &format!("[dry-run] rsync {}", args.join(" ")));
        } else {
            transfer::sync_files(toplevel, &args).await?;
            synced = true;
        }
    }
    let sync_ms = sync_start.elapsed().as_millis() as u64;

    let mut reverted = Vec::new();
    if options.dry_run {
        say(
            options,
            &format!(
                "[dry-run] ssh {} {}",
                options.host,
                remote::drift_query_command(&options.remote_path)
            ),
        );
    } else {
        let remote_set = remote::remote_changes(&options.host, &options.remote_path).await?;
        let unexpected = changes.unexpected(&remote_set);
        if !unexpected.is_empty() {
            say(options, "Reverting:");
            for path in &unexpected {
                say(options, &format!("  {path}"));
            }
            info!(count = unexpected.len(), "reverting unexpected remote changes");
            remote::run(
                &options.host,
                &remote::revert_command(&options.remote_path, &unexpected),
            )
            .await?;
            reverted = unexpected;
        }
    }

    if options.skip_build {
        return Ok(RunReport {
            base_commit,
            changed_files: changes.paths().to_vec(),
            synced,
            reverted,
            build_invoked: false,
            dry_run: options.dry_run,
            sync_ms,
            build_ms: 0,
        });
    }

    let command = remote::build_command(
        &options.remote_path,
        &options.build_script,
        &options.build_type,
        &options.build_args,
    );
    let build_start = Instant::now();
    let build_invoked = if options.dry_run {
        say(
            options,
            &format!("[dry-run] ssh {} {}", options.host, command),
        );
        false
    } else {
        say(options, &format!("Remote command: {command}"));
        remote::run(&options.host, &command).await?;
        true
    };
    let build_ms = if build_invoked {
        build_start.elapsed().as_millis() as u64
    } else {
        0
    };

    Ok(RunReport {
        base_commit,
        changed_files: changes.paths().to_vec(),
        synced,
        reverted,
        build_invoked,
        dry_run: options.dry_run,
        sync_ms,
        build_ms,
    })
}
