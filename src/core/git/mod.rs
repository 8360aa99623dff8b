//! Commit hash and modified flag from the git working tree.

use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

/// Hash reported when git information is unavailable.
pub const UNKNOWN_HASH: &str = "unknown";

/// Revision state of a working tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitInfo {
    /// Commit hash of `HEAD`.
    pub hash: String,
    /// Whether `git status --porcelain` reported anything.
    pub modified: bool,
}

impl GitInfo {
    /// Placeholder used outside a repository.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            hash: UNKNOWN_HASH.to_string(),
            modified: false,
        }
    }

    /// Query git in `dir`.
    ///
    /// `hash_length` abbreviates the hash (`git rev-parse --short=N`); `None`
    /// keeps the full hash.
    pub fn probe(dir: &Path, hash_length: Option<usize>) -> Result<Self> {
        which::which("git").map_err(|e| Error::Git(format!("git not found: {e}")))?;

        let short = hash_length.map(|n| format!("--short={n}"));
        let mut args = vec!["rev-parse"];
        if let Some(short) = &short {
            args.push(short.as_str());
        }
        args.push("HEAD");

        let hash = run_git(dir, &args)?.trim().to_string();
        let modified = !run_git(dir, &["status", "--porcelain"])?.trim().is_empty();

        tracing::debug!(dir = %dir.display(), %hash, modified, "probed git");
        Ok(Self { hash, modified })
    }

    /// Like [`GitInfo::probe`], but falls back to [`GitInfo::unknown`] with a
    /// warning.
    #[must_use]
    pub fn probe_or_unknown(dir: &Path, hash_length: Option<usize>) -> Self {
        match Self::probe(dir, hash_length) {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "git unavailable, using unknown hash");
                Self::unknown()
            }
        }
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git").args(args).current_dir(dir).output()?;

    if !output.status.success() {
        return Err(Error::Git(format!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
