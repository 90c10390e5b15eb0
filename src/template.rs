use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PrError, Result};

/// Upward hops allowed while looking for the repository root.
pub const MAX_ROOT_HOPS: usize = 10;

pub const MAX_TEMPLATE_CHARS: usize = 10_000;

/// Repository-relative places a PR template conventionally lives, in lookup order.
pub const TEMPLATE_CANDIDATES: &[&str] = &[
    ".github/pull_request_template.md",
    ".github/PULL_REQUEST_TEMPLATE.md",
    ".github/PULL_REQUEST_TEMPLATE/pull_request_template.md",
    "docs/pull_request_template.md",
    "pull_request_template.md",
];

const SECTION_KEYWORDS: &[&str] = &["summary", "overview", "changes"];

pub const DEFAULT_TEMPLATE: &str = r#"## Summary
[Brief description of what this PR does and why]

## Changes
- [Key change 1]
- [Key change 2]

## Testing
- [How the changes were tested]

## Notes
[Anything reviewers should know: risks, follow-ups, breaking changes]"#;

/// Where the template used for a run came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    ExplicitPath { path: PathBuf, content: String },
    InlineContent(String),
    DiscoveredFile { path: PathBuf, content: String },
    BuiltinDefault(&'static str),
}

impl TemplateSource {
    pub fn content(&self) -> &str {
        match self {
            TemplateSource::ExplicitPath { content, .. }
            | TemplateSource::DiscoveredFile { content, .. }
            | TemplateSource::InlineContent(content) => content.as_str(),
            TemplateSource::BuiltinDefault(content) => *content,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            TemplateSource::ExplicitPath { path, .. } => format!("file {}", path.display()),
            TemplateSource::InlineContent(_) => "inline content".to_string(),
            TemplateSource::DiscoveredFile { path, .. } => {
                format!("repository file {}", path.display())
            }
            TemplateSource::BuiltinDefault(_) => "built-in default".to_string(),
        }
    }
}

/// Outcome of [`validate`]. `valid` is true iff `issues` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateReport {
    pub valid: bool,
    pub issues: Vec<String>,
}

/// Walk up from `start` looking for a directory that contains `.git`.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    for _ in 0..MAX_ROOT_HOPS {
        if current.join(".git").exists() {
            return Some(current);
        }
        match current.parent() {
            Some(parent) if parent != current => current = parent.to_path_buf(),
            _ => return None,
        }
    }

    None
}

/// Pick the template for this run: explicit path, inline content, a file in the
/// repository, then the built-in default.
///
/// `cwd` is where root discovery starts and the fallback base for relative
/// explicit paths when no repository root is found.
pub fn resolve(explicit: Option<&Path>, inline: Option<&str>, cwd: &Path) -> Result<TemplateSource> {
    let root = find_repo_root(cwd);

    if let Some(path) = explicit {
        let base = root.as_deref().unwrap_or(cwd);
        let full = base.join(path);
        debug!("Loading template from {}", full.display());
        let content =
            fs::read_to_string(&full).map_err(|_| PrError::TemplateNotFound { path: full.clone() })?;
        return Ok(TemplateSource::ExplicitPath {
            path: full,
            content,
        });
    }

    if let Some(content) = inline {
        return Ok(TemplateSource::InlineContent(content.to_string()));
    }

    if let Some(root) = root {
        if let Some(found) = discover(&root) {
            return Ok(found);
        }
    }

    Ok(TemplateSource::BuiltinDefault(DEFAULT_TEMPLATE))
}

fn discover(root: &Path) -> Option<TemplateSource> {
    TEMPLATE_CANDIDATES.iter().find_map(|candidate| {
        let path = root.join(candidate);
        if !path.is_file() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(content) => Some(TemplateSource::DiscoveredFile { path, content }),
            Err(e) => {
                debug!("Skipping unreadable template {}: {e}", path.display());
                None
            }
        }
    })
}

/// Check a template for problems. All issues are reported, not just the first.
pub fn validate(template: &str) -> TemplateReport {
    let mut issues = Vec::new();

    if template.trim().is_empty() {
        issues.push("Template is empty".to_string());
    }

    if template.chars().count() > MAX_TEMPLATE_CHARS {
        issues.push(format!(
            "Template is too long (max {MAX_TEMPLATE_CHARS} characters)"
        ));
    }

    let lower = template.to_lowercase();
    if !SECTION_KEYWORDS.iter().any(|k| lower.contains(k)) {
        issues.push(
            "Template should include common sections like Summary, Overview, or Changes"
                .to_string(),
        );
    }

    TemplateReport {
        valid: issues.is_empty(),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo_with_template(rel: &str, content: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        dir
    }

    #[test]
    fn finds_root_from_nested_directory() {
        let dir = repo_with_template("README.md", "x");
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_repo_root(&nested).as_deref(), Some(dir.path()));
    }

    #[test]
    fn root_search_gives_up_after_hop_limit() {
        let dir = repo_with_template("README.md", "x");
        let mut deep = dir.path().to_path_buf();
        for i in 0..MAX_ROOT_HOPS {
            deep = deep.join(format!("d{i}"));
        }
        fs::create_dir_all(&deep).unwrap();

        assert_eq!(find_repo_root(&deep), None);
    }

    #[test]
    fn explicit_path_wins_over_discovered_template() {
        let dir = repo_with_template(".github/pull_request_template.md", "## Summary\nrepo");
        fs::write(dir.path().join("custom.md"), "## Overview\ncustom").unwrap();

        let src = resolve(Some(Path::new("custom.md")), None, dir.path()).unwrap();
        assert!(matches!(src, TemplateSource::ExplicitPath { .. }));
        assert_eq!(src.content(), "## Overview\ncustom");
    }

    #[test]
    fn explicit_path_is_relative_to_repo_root() {
        let dir = repo_with_template("templates/pr.md", "## Changes");
        let nested = dir.path().join("src");
        fs::create_dir_all(&nested).unwrap();

        let src = resolve(Some(Path::new("templates/pr.md")), None, &nested).unwrap();
        assert_eq!(src.content(), "## Changes");
    }

    #[test]
    fn explicit_path_without_repo_uses_cwd() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pr.md"), "## Summary").unwrap();

        let src = resolve(Some(Path::new("pr.md")), None, dir.path()).unwrap();
        assert_eq!(src.content(), "## Summary");
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = repo_with_template(".github/pull_request_template.md", "## Summary");

        let err = resolve(Some(Path::new("nope.md")), Some("## Summary"), dir.path()).unwrap_err();
        assert!(matches!(err, PrError::TemplateNotFound { .. }));
    }

    #[test]
    fn inline_content_is_returned_verbatim() {
        let dir = repo_with_template(".github/pull_request_template.md", "## Summary");

        let src = resolve(None, Some("  my template \n"), dir.path()).unwrap();
        assert_eq!(src, TemplateSource::InlineContent("  my template \n".into()));
    }

    #[test]
    fn discovery_follows_candidate_order() {
        let dir = repo_with_template("docs/pull_request_template.md", "docs version");
        fs::create_dir_all(dir.path().join(".github")).unwrap();
        fs::write(
            dir.path().join(".github").join("PULL_REQUEST_TEMPLATE.md"),
            "upper version",
        )
        .unwrap();

        let src = resolve(None, None, dir.path()).unwrap();
        assert!(matches!(src, TemplateSource::DiscoveredFile { .. }));
        assert_eq!(src.content(), "upper version");
    }

    #[test]
    fn falls_back_to_builtin_default() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let src = resolve(None, None, dir.path()).unwrap();
        assert_eq!(src, TemplateSource::BuiltinDefault(DEFAULT_TEMPLATE));
        assert!(src.content().contains("Summary"));
        assert!(validate(src.content()).valid);
    }

    #[test]
    fn empty_template_is_invalid() {
        let report = validate("");
        assert!(!report.valid);
        assert!(report.issues.contains(&"Template is empty".to_string()));
        // empty content also lacks every section keyword
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn overlong_template_is_reported() {
        let report = validate(&"x".repeat(MAX_TEMPLATE_CHARS + 1));
        assert!(!report.valid);
        assert!(report.issues.iter().any(|i| i.starts_with("Template is too long")));
    }

    #[test]
    fn template_with_summary_section_is_valid() {
        let report = validate("## Summary\nstuff");
        assert!(report.valid);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn keyword_check_is_case_insensitive() {
        assert!(validate("# CHANGES").valid);
        let report = validate("## Motivation\n## Testing");
        assert!(!report.valid);
        assert!(report.issues[0].starts_with("Template should include common sections"));
    }
}
