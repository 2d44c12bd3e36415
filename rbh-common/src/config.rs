//! Configuration for RBH.
//!
//! Options layer as CLI flag > environment > config file > built-in default.
//! The environment layer is folded in by clap (`RBH_BUILD_HOST` feeds
//! `--host`), so resolution here only merges CLI values, the TOML file, and
//! defaults into one [`RunOptions`] for the invocation.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, HostNotConfigured};

pub const DEFAULT_BRANCH: &str = "master";
pub const DEFAULT_BUILD_TYPE: &str = "debug";
pub const DEFAULT_BUILD_SCRIPT: &str = "./build.sh";

/// On-disk config file (`~/.config/rbh/config.toml` on Linux).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub sync: SyncSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSection {
    /// Remote build host (`user@host` or an ssh alias).
    pub host: Option<String>,
    /// Checkout path on the remote host.
    pub remote_path: Option<String>,
    /// Base branch for the merge-base diff.
    pub branch: Option<String>,
    /// Build type passed as the script's first argument.
    pub build_type: Option<String>,
    /// Build script invoked inside the remote path.
    pub script: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncSection {
    /// Extra flags appended to the rsync invocation (e.g. "-z").
    #[serde(default)]
    pub extra_rsync_args: Vec<String>,
}

impl FileConfig {
    /// Load the config file.
    ///
    /// An explicitly requested path must exist; the default location is
    /// optional and a missing file yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound {
                        path: p.display().to_string(),
                    });
                }
                p.to_path_buf()
            }
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };
        Self::load_from(&path)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Platform config file location (`<config-dir>/rbh/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "rbh").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Option values taken from the command line, `None` where the user said
/// nothing (clap has already applied `RBH_BUILD_HOST` to `host`).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub remote_path: Option<String>,
    pub branch: Option<String>,
    pub build_type: Option<String>,
    pub build_script: Option<String>,
    pub build_args: Vec<String>,
    pub skip_build: bool,
    pub dry_run: bool,
    pub quiet: bool,
}

/// Effective options for one invocation after layering.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub host: String,
    pub remote_path: String,
    pub branch: String,
    pub build_type: String,
    pub build_script: String,
    /// Arguments forwarded verbatim to the build script after the type.
    pub build_args: Vec<String>,
    pub extra_rsync_args: Vec<String>,
    pub skip_build: bool,
    pub dry_run: bool,
    /// Suppress progress lines (JSON output mode).
    pub quiet: bool,
}

impl RunOptions {
    /// Merge the layers into the effective options.
    ///
    /// `project_id` names the local checkout and seeds the default remote
    /// path. The host is the only option with no default; missing
    /// everywhere is an error.
    pub fn resolve(
        cli: CliOverrides,
        file: &FileConfig,
        project_id: &str,
    ) -> Result<Self, HostNotConfigured> {
        let host = cli
            .host
            .or_else(|| file.build.host.clone())
            .ok_or(HostNotConfigured)?;
        let remote_path = cli
            .remote_path
            .or_else(|| file.build.remote_path.clone())
            .unwrap_or_else(|| format!("~/code/{project_id}"));
        let branch = cli
            .branch
            .or_else(|| file.build.branch.clone())
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
        let build_type = cli
            .build_type
            .or_else(|| file.build.build_type.clone())
            .unwrap_or_else(|| DEFAULT_BUILD_TYPE.to_string());
        let build_script = cli
            .build_script
            .or_else(|| file.build.script.clone())
            .unwrap_or_else(|| DEFAULT_BUILD_SCRIPT.to_string());

        Ok(Self {
            host,
            remote_path,
            branch,
            build_type,
            build_script,
            build_args: cli.build_args,
            extra_rsync_args: file.sync.extra_rsync_args.clone(),
            skip_build: cli.skip_build,
            dry_run: cli.dry_run,
            quiet: cli.quiet,
        })
    }
}

/// Sanitized repository directory name for use in the default remote path.
///
/// Unsafe characters become `_`; leading dots and dashes are stripped so the
/// result never hides or reads as a flag. Falls back to `"project"`.
pub fn project_id(toplevel: &Path) -> String {
    let name = toplevel.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches(['.', '-']);
    if cleaned.is_empty() {
        "project".to_string()
    } else {
        cleaned.to_string()
    }
}
