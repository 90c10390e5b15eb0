//! Error types for the prbot pipeline.
//!
//! Core modules return [`PrError`]; `main` wraps them in `anyhow` with the step
//! that failed.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrError {
    /// The working directory is not inside a git work tree.
    #[error("not inside a git repository")]
    NotARepository,

    /// A branch could not be found locally or on the remote.
    #[error("branch '{0}' does not exist")]
    BranchNotFound(String),

    /// A branch name git would parse as an option.
    #[error("invalid branch name '{0}'")]
    InvalidBranchName(String),

    /// Source or target branch could not be determined automatically.
    #[error("could not determine {0} branch; pass it explicitly")]
    BranchUndetermined(&'static str),

    #[error("no common ancestor between '{source_branch}' and '{target_branch}'")]
    NoMergeBase {
        source_branch: String,
        target_branch: String,
    },

    #[error("git {args} failed: {reason}")]
    GitCommand { args: String, reason: String },

    /// An explicitly requested template path is missing or unreadable.
    #[error("template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("timed out after {secs}s waiting for {url}")]
    BackendTimeout { url: String, secs: u64 },

    #[error("cannot reach generation backend at {url}: {reason}")]
    BackendUnreachable { url: String, reason: String },

    /// The backend answered, but not with something we could use.
    #[error("unexpected response from {url}: {reason}")]
    BackendResponse { url: String, reason: String },

    #[error("model '{model}' is not available (available: {})", format_available(available))]
    ModelUnavailable {
        model: String,
        available: Vec<String>,
    },

    #[error("the model returned an empty response")]
    EmptyGenerationResult,

    #[error("no changes detected between '{source_branch}' and '{target_branch}'")]
    NoChangesDetected {
        source_branch: String,
        target_branch: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PrError {
    /// True for every error that means the repository or its branches are unusable.
    pub fn is_repository_unavailable(&self) -> bool {
        matches!(
            self,
            PrError::NotARepository
                | PrError::BranchNotFound(_)
                | PrError::InvalidBranchName(_)
                | PrError::BranchUndetermined(_)
                | PrError::NoMergeBase { .. }
        )
    }

    /// True for both connection failures and timeouts.
    pub fn is_backend_unreachable(&self) -> bool {
        matches!(
            self,
            PrError::BackendTimeout { .. } | PrError::BackendUnreachable { .. }
        )
    }
}

fn format_available(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

pub type Result<T> = std::result::Result<T, PrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_kind_groups_branch_errors() {
        assert!(PrError::NotARepository.is_repository_unavailable());
        assert!(PrError::BranchNotFound("x".into()).is_repository_unavailable());
        assert!(PrError::BranchUndetermined("target").is_repository_unavailable());
        assert!(PrError::InvalidBranchName("-x".into()).is_repository_unavailable());
        assert!(!PrError::EmptyGenerationResult.is_repository_unavailable());
    }

    #[test]
    fn timeout_is_a_backend_failure_with_its_own_message() {
        let err = PrError::BackendTimeout {
            url: "http://localhost:11434/api/generate".into(),
            secs: 120,
        };
        assert!(err.is_backend_unreachable());
        assert!(err.to_string().contains("timed out after 120s"));
    }

    #[test]
    fn model_unavailable_lists_alternatives() {
        let err = PrError::ModelUnavailable {
            model: "llama3".into(),
            available: vec!["qwen3:8b".into(), "mistral:latest".into()],
        };
        assert_eq!(
            err.to_string(),
            "model 'llama3' is not available (available: qwen3:8b, mistral:latest)"
        );

        let none = PrError::ModelUnavailable {
            model: "llama3".into(),
            available: vec![],
        };
        assert!(none.to_string().ends_with("(available: none)"));
    }
}
