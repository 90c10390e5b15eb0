use log::{debug, trace};
use std::path::Path;
use std::process::Command as GitCommand;

use crate::config::Config;
use crate::error::{PrError, Result};
use crate::postprocess::bound_lines;

pub const NO_COMMITS: &str = "No commit messages available";
pub const NO_FILE_CHANGES: &str = "No file changes detected";
pub const NO_DIFF_STATS: &str = "No diff statistics available";
pub const NO_CODE_SAMPLE: &str = "No code changes available";

/// Bounded, human-readable view of what changed between two branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSummary {
    pub commit_messages: String,
    pub file_changes: String,
    pub diff_statistics: String,
    pub code_sample: String,
}

impl DiffSummary {
    /// Bound the raw git output and fill empty fields with fallback text.
    ///
    /// Fails only when there are neither commits nor changed files.
    pub fn from_raw(
        source: &str,
        target: &str,
        commits: &str,
        files: &str,
        stats: &str,
        code: &str,
        cfg: &Config,
    ) -> Result<Self> {
        if commits.trim().is_empty() && files.trim().is_empty() {
            return Err(PrError::NoChangesDetected {
                source_branch: source.to_string(),
                target_branch: target.to_string(),
            });
        }

        Ok(DiffSummary {
            commit_messages: or_fallback(commits.trim(), NO_COMMITS),
            file_changes: or_fallback(&bound_lines(files.trim(), cfg.max_file_lines), NO_FILE_CHANGES),
            diff_statistics: or_fallback(stats.trim(), NO_DIFF_STATS),
            code_sample: or_fallback(&bound_lines(code.trim(), cfg.max_code_lines), NO_CODE_SAMPLE),
        })
    }
}

fn or_fallback(text: &str, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text.to_string()
    }
}

/// Run a git command in `repo` and capture stdout as String.
pub fn git_output(repo: &Path, args: &[&str]) -> Result<String> {
    trace!("git -C {} {}", repo.display(), args.join(" "));
    let output = GitCommand::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .output()
        .map_err(|e| PrError::GitCommand {
            args: args.join(" "),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(PrError::GitCommand {
            args: args.join(" "),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Run a git command for its exit status only.
fn git_succeeds(repo: &Path, args: &[&str]) -> bool {
    git_output(repo, args).is_ok()
}

/// True when `repo` is inside a git work tree.
pub fn is_available(repo: &Path) -> bool {
    git_output(repo, &["rev-parse", "--is-inside-work-tree"])
        .map(|out| out.trim() == "true")
        .unwrap_or(false)
}

/// Get the current branch name; `None` on a detached HEAD.
pub fn current_branch(repo: &Path) -> Option<String> {
    let name = git_output(repo, &["rev-parse", "--abbrev-ref", "HEAD"]).ok()?;
    let name = name.trim();
    if name.is_empty() || name == "HEAD" {
        None
    } else {
        Some(name.to_string())
    }
}

/// First candidate that exists locally, then the first one on the remote.
pub fn default_target_branch(repo: &Path, cfg: &Config) -> Option<String> {
    let has_ref = |full: String| git_succeeds(repo, &["show-ref", "--verify", "--quiet", &full]);

    let local = cfg
        .target_candidates
        .iter()
        .find(|name| has_ref(format!("refs/heads/{name}")))
        .cloned();
    if local.is_some() {
        return local;
    }

    cfg.target_candidates
        .iter()
        .map(|name| format!("{}/{name}", cfg.remote))
        .find(|remote_name| has_ref(format!("refs/remotes/{remote_name}")))
}

/// Branch names reach git as positional arguments; one starting with `-`
/// would be read as an option.
pub fn check_branch_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.starts_with('-') {
        return Err(PrError::InvalidBranchName(name.to_string()));
    }
    Ok(())
}

pub fn branch_exists(repo: &Path, name: &str) -> bool {
    check_branch_name(name).is_ok()
        && git_succeeds(repo, &["rev-parse", "--verify", "--quiet", &format!("{name}^{{commit}}")])
}

fn merge_base(repo: &Path, source: &str, target: &str) -> Result<String> {
    git_output(repo, &["merge-base", target, source])
        .map(|out| out.trim().to_string())
        .ok()
        .filter(|sha| !sha.is_empty())
        .ok_or_else(|| PrError::NoMergeBase {
            source_branch: source.to_string(),
            target_branch: target.to_string(),
        })
}

/// Summarize `source` relative to its merge base with `target`.
pub fn summarize(repo: &Path, source: &str, target: &str, cfg: &Config) -> Result<DiffSummary> {
    check_branch_name(source)?;
    check_branch_name(target)?;

    let base = merge_base(repo, source, target)?;
    debug!("Merge base of {source} and {target}: {base}");

    let range = format!("{base}..{source}");
    let commits = git_output(
        repo,
        &["log", "--no-merges", "--pretty=format:- %s (%h)", &range, "--"],
    )?;
    let files = git_output(repo, &["diff", "--name-status", &base, source, "--"])?;
    let stats = git_output(repo, &["diff", "--stat", &base, source, "--"])?;
    let code = git_output(repo, &["diff", "--no-color", &base, source, "--"])?;

    DiffSummary::from_raw(source, target, &commits, &files, &stats, &code, cfg)
}
