use std::fs;
use std::path::Path;
#[cfg(unix)]
use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

/// A throwaway git checkout with one commit on `master`.
pub struct GitFixture {
    pub dir: TempDir,
}

impl GitFixture {
    pub fn new() -> Self {
        crate::test_log!("FIXTURE: creating git checkout");

        let dir = TempDir::new().expect("Failed to create temp dir");
        let fixture = Self { dir };
        fixture.git(&["init", "-q"]);
        // Pin the branch name regardless of the user's init.defaultBranch.
        fixture.git(&["symbolic-ref", "HEAD", "refs/heads/master"]);
        fixture.git(&["config", "user.email", "rbh-test@example.com"]);
        fixture.git(&["config", "user.name", "rbh test"]);
        fixture.git(&["config", "commit.gpgsign", "false"]);
        fixture.write("README.md", "fixture\n");
        fixture.write("src/lib.rs", "pub fn one() -> u32 { 1 }\n");
        fixture.commit_all("initial");
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, contents).expect("Failed to write fixture file");
    }

    /// Run git in the checkout, asserting success; returns trimmed stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn commit_all(&self, message: &str) {
        self.git(&["add", "."]);
        self.git(&["commit", "-q", "-m", message]);
    }
}

/// Fake `ssh` and `rsync` on a prepended `PATH` entry.
///
/// Each stub appends one `<tool> <args>` line to the file named by the
/// `STUB_LOG` environment variable and exits with a code taken from the
/// environment, so tests can assert invocation order and exit-code
/// mirroring without a network. The ssh stub answers the drift query
/// (matched on `git diff --name-status`) with `SSH_STUB_DIFF`.
#[cfg(unix)]
pub struct StubTools {
    pub dir: TempDir,
    pub log: PathBuf,
}

#[cfg(unix)]
impl StubTools {
    pub fn new() -> Self {
        use std::os::unix::fs::PermissionsExt;

        crate::test_log!("FIXTURE: creating ssh/rsync stubs");

        let dir = TempDir::new().expect("Failed to create temp dir");
        let log = dir.path().join("calls.log");

        let ssh = dir.path().join("ssh");
        fs::write(
            &ssh,
            concat!(
                "#!/bin/sh\n",
                "printf 'ssh %s\\n' \"$*\" >> \"$STUB_LOG\"\n",
                "case \"$*\" in\n",
                "  *\"git diff --name-status\"*)\n",
                "    printf '%s\\n' \"$SSH_STUB_DIFF\"\n",
                "    exit \"${SSH_STUB_DIFF_EXIT:-0}\"\n",
                "    ;;\n",
                "esac\n",
                "exit \"${SSH_STUB_EXIT:-0}\"\n",
            ),
        )
        .expect("Failed to write ssh stub");

        let rsync = dir.path().join("rsync");
        fs::write(
            &rsync,
            concat!(
                "#!/bin/sh\n",
                "printf 'rsync %s\\n' \"$*\" >> \"$STUB_LOG\"\n",
                "exit \"${RSYNC_STUB_EXIT:-0}\"\n",
            ),
        )
        .expect("Failed to write rsync stub");

        for bin in [&ssh, &rsync] {
            fs::set_permissions(bin, fs::Permissions::from_mode(0o755))
                .expect("Failed to chmod stub");
        }

        Self { dir, log }
    }

    /// `PATH` with the stub directory first.
    pub fn path_env(&self) -> String {
        let orig = std::env::var("PATH").unwrap_or_default();
        format!("{}:{orig}", self.dir.path().display())
    }

    /// Logged invocations, oldest first.
    pub fn calls(&self) -> Vec<String> {
        match fs::read_to_string(&self.log) {
            Ok(text) => text.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }
}
