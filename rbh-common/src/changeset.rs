//! Name-status parsing and change-set reconciliation.
//!
//! Both the local diff (`git diff <merge-base> --name-status`) and the
//! remote drift check (`git diff --name-status` in the remote checkout)
//! produce the same line-oriented format: a status letter, a tab, and the
//! file path. Renames and copies carry a similarity score on the status
//! (`R100`) and two path fields.

/// The set of file paths expected to differ from the base commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: Vec<String>,
}

impl ChangeSet {
    /// Parse a name-status report into a change set.
    pub fn from_name_status(output: &str) -> Self {
        Self {
            paths: parse_name_status(output),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Paths reported by the remote side that this set does not expect.
    ///
    /// These are the files the drift check reverts. Remote report order is
    /// preserved.
    pub fn unexpected(&self, remote: &ChangeSet) -> Vec<String> {
        remote
            .paths
            .iter()
            .filter(|p| !self.contains(p))
            .cloned()
            .collect()
    }
}

/// Extract retained file paths from name-status lines.
///
/// Deletions are excluded: a deleted file cannot be transferred, and it
/// never shows up as a remote modification to revert. Rename and copy lines
/// retain the destination path only. Retained paths are whitespace-trimmed.
pub fn parse_name_status(output: &str) -> Vec<String> {
    let mut paths = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((status, rest)) = line.split_once(|c: char| c.is_whitespace()) else {
            // A status letter with no path carries nothing to sync.
            continue;
        };
        if status.starts_with('D') {
            continue;
        }
        let path = if status.starts_with('R') || status.starts_with('C') {
            // "R100\told\tnew": the destination is the last tab field.
            rest.rsplit('\t').next().unwrap_or(rest)
        } else {
            rest
        };
        let path = path.trim();
        if !path.is_empty() {
            paths.push(path.to_string());
        }
    }
    paths
}
