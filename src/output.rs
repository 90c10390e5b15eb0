use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::postprocess::extract_title_and_body;

pub const FILE_PREFIX: &str = "pr-description";

/// Machine-readable result. Field order is part of the output format.
#[derive(Debug, Serialize)]
pub struct PrJson<'a> {
    pub title: String,
    pub body: String,
    pub source_branch: &'a str,
    pub target_branch: &'a str,
}

pub fn to_json(description: &str, source_branch: &str, target_branch: &str) -> serde_json::Result<String> {
    let parts = extract_title_and_body(description);
    serde_json::to_string_pretty(&PrJson {
        title: parts.title,
        body: parts.body,
        source_branch,
        target_branch,
    })
}

/// `pr-description-2026-10-17T09-41-03.md` for the given instant.
pub fn default_file_name(now: DateTime<Utc>) -> String {
    format!("{FILE_PREFIX}-{}.md", now.format("%Y-%m-%dT%H-%M-%S"))
}

/// Write the description to `path`, or to a timestamped file in the working directory.
pub fn save(description: &str, path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(default_file_name(Utc::now())),
    };
    fs::write(&path, format!("{}\n", description.trim_end()))?;
    Ok(path)
}

pub fn display(description: &str, source_branch: &str, target_branch: &str) {
    println!();
    println!(
        "{}",
        format!("----- PR Description ({source_branch} -> {target_branch}) -----").bold()
    );
    println!("{description}");
    println!("{}", "------------------------------".bold());
}
