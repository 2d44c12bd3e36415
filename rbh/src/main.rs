//! Remote Build Helper - command-line entry point.
//!
//! Parses arguments, resolves configuration, and drives the sync-and-build
//! flow. All of the real work lives in `rbh-common`; this crate only wires
//! up logging and renders reports.

#![forbid(unsafe_code)]

mod report;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use rbh_common::config::{self, CliOverrides, FileConfig, RunOptions};
use rbh_common::error::{CommandFailed, HostNotConfigured};
use rbh_common::{gitops, pipeline, preflight};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "rbh")]
#[command(
    author,
    version,
    about = "Sync local changes to a build host and run the build there"
)]
struct Cli {
    /// Build host (`user@host` or an ssh alias)
    #[arg(long, env = "RBH_BUILD_HOST")]
    host: Option<String>,

    /// Checkout path on the build host
    #[arg(long)]
    remote_path: Option<String>,

    /// Base branch for the merge-base diff
    #[arg(long)]
    branch: Option<String>,

    /// Build type passed to the build script as its first argument
    #[arg(long)]
    build_type: Option<String>,

    /// Build script run inside the remote checkout
    #[arg(long)]
    build_script: Option<String>,

    /// Sync and reconcile only; do not run the build
    #[arg(long)]
    skip_build: bool,

    /// Print every rsync/ssh command instead of executing it
    #[arg(long)]
    dry_run: bool,

    /// Check local tools and the build host, then exit
    #[arg(long, conflicts_with_all = ["skip_build", "dry_run"])]
    check: bool,

    /// Emit the final report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Path to the config file (default: platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Extra arguments forwarded to the build script
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "BUILD_ARGS")]
    args: Vec<String>,
}

fn init_logging(verbose: bool) {
    // RBH_LOG takes a full filter spec; --verbose only bumps the default.
    let filter = match std::env::var("RBH_LOG") {
        Ok(spec) => EnvFilter::new(spec),
        Err(_) => EnvFilter::new(if verbose { "debug" } else { "info" }),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            if let Some(failure) = err.downcast_ref::<CommandFailed>() {
                // Mirror the subprocess exit code.
                failure.code
            } else if err.downcast_ref::<HostNotConfigured>().is_some() {
                eprintln!("{err}");
                1
            } else {
                eprintln!("Error: {err:#}");
                1
            }
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<i32> {
    let file = FileConfig::load(cli.config.as_deref())?;

    let toplevel = gitops::repo_toplevel(Path::new(".")).await?;
    let project = config::project_id(&toplevel);

    let overrides = CliOverrides {
        host: cli.host,
        remote_path: cli.remote_path,
        branch: cli.branch,
        build_type: cli.build_type,
        build_script: cli.build_script,
        build_args: cli.args,
        skip_build: cli.skip_build,
        dry_run: cli.dry_run,
        quiet: cli.json,
    };
    let options = RunOptions::resolve(overrides, &file, &project)?;

    if cli.check {
        let report = preflight::run_preflight(&options).await?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            report::print_preflight(&report);
        }
        return Ok(if report.ok() { 0 } else { 1 });
    }

    let report = pipeline::run(&options, &toplevel).await?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report::print_run_summary(&report);
    }
    Ok(0)
}
