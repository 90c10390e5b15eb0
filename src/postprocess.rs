use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_TITLE: &str = "Auto-generated PR";
pub const DEFAULT_BODY: &str = "No description provided";

/// A `<think>...</think>` pair, matched lazily and across newlines.
static REASONING_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<think>(.*?)</think>").expect("invalid reasoning block regex")
});

static HEADING_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#+\s*").expect("invalid heading regex"));

static COMMIT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(feat|fix|docs|style|refactor|perf|test|build|ci|chore)(\([^)]*\))?!?:\s*")
        .expect("invalid commit prefix regex")
});

/// Title and body pulled out of a generated description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleAndBody {
    pub title: String,
    pub body: String,
}

/// Remove reasoning blocks from model output unless `preserve` is set.
///
/// Unclosed `<think>` markers have nothing to pair with and are left in place.
pub fn strip_reasoning(text: &str, preserve: bool) -> String {
    if preserve {
        return text.to_string();
    }
    REASONING_BLOCK.replace_all(text, "").trim().to_string()
}

pub fn has_reasoning(text: &str) -> bool {
    REASONING_BLOCK.is_match(text)
}

pub fn count_reasoning_blocks(text: &str) -> usize {
    REASONING_BLOCK.find_iter(text).count()
}

/// Inner text of every reasoning block, trimmed, in order of appearance.
pub fn extract_reasoning_contents(text: &str) -> Vec<String> {
    REASONING_BLOCK
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Split a description into a title (first non-blank line, with heading
/// markers and a conventional-commit tag removed) and the remaining body.
pub fn extract_title_and_body(text: &str) -> TitleAndBody {
    let lines: Vec<&str> = text.lines().collect();

    let Some(title_idx) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return TitleAndBody {
            title: DEFAULT_TITLE.to_string(),
            body: DEFAULT_BODY.to_string(),
        };
    };

    let title = clean_title(lines[title_idx]);

    let rest = &lines[title_idx + 1..];
    let body_start = rest
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(rest.len());
    let body = rest[body_start..].join("\n");

    TitleAndBody {
        title: if title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title
        },
        body: if body.trim().is_empty() {
            DEFAULT_BODY.to_string()
        } else {
            body
        },
    }
}

fn clean_title(line: &str) -> String {
    let line = line.trim();
    let line = HEADING_MARKERS.replace(line, "");
    COMMIT_PREFIX.replace(&line, "").trim().to_string()
}

/// Keep at most the first `max_lines` lines of `text`.
///
/// Splits on `\n` only, so line endings survive and a second pass is a no-op.
pub fn bound_lines(text: &str, max_lines: usize) -> String {
    text.split('\n').take(max_lines).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserve_returns_input_untouched() {
        let raw = "  <think>plan</think>\n# Title\n\nBody  ";
        assert_eq!(strip_reasoning(raw, true), raw);
    }

    #[test]
    fn strips_every_block_and_keeps_surrounding_spacing() {
        assert_eq!(
            strip_reasoning("A <think>x</think> B <think>y</think> C", false),
            "A  B  C"
        );
    }

    #[test]
    fn strips_multiline_blocks_case_insensitively() {
        let raw = "<THINK>\nfirst I will\nlook at the diff\n</Think>\n\n## Summary\nAdds login";
        assert_eq!(strip_reasoning(raw, false), "## Summary\nAdds login");
    }

    #[test]
    fn leaves_unclosed_marker_alone() {
        let raw = "<think>never closed\n## Summary";
        assert_eq!(strip_reasoning(raw, false), raw);
        assert!(!has_reasoning(raw));
        assert_eq!(count_reasoning_blocks(raw), 0);
    }

    #[test]
    fn non_greedy_match_keeps_text_between_blocks() {
        let raw = "<think>a</think>keep<think>b</think>";
        assert_eq!(strip_reasoning(raw, false), "keep");
    }

    #[test]
    fn counts_and_extracts_blocks() {
        let raw = "<think> one </think>text<think>\ntwo\n</think>more<think>three</think>";
        assert!(has_reasoning(raw));
        assert_eq!(count_reasoning_blocks(raw), 3);
        assert_eq!(
            extract_reasoning_contents(raw),
            vec!["one".to_string(), "two".to_string(), "three".to_string()]
        );
        assert!(extract_reasoning_contents("no blocks").is_empty());
    }

    #[test]
    fn title_from_heading() {
        let out = extract_title_and_body("# Fix bug\n\nDetails here.");
        assert_eq!(out.title, "Fix bug");
        assert_eq!(out.body, "Details here.");
    }

    #[test]
    fn title_drops_conventional_commit_prefix() {
        let out = extract_title_and_body("feat: Add login\nMore text");
        assert_eq!(out.title, "Add login");
        assert_eq!(out.body, "More text");

        let out = extract_title_and_body("## FIX(auth): Handle expired tokens");
        assert_eq!(out.title, "Handle expired tokens");
    }

    #[test]
    fn empty_input_gets_placeholders() {
        let out = extract_title_and_body("");
        assert_eq!(out.title, DEFAULT_TITLE);
        assert_eq!(out.body, DEFAULT_BODY);

        let out = extract_title_and_body("   \n\n\t\n");
        assert_eq!(out.title, DEFAULT_TITLE);
        assert_eq!(out.body, DEFAULT_BODY);
    }

    #[test]
    fn title_only_gets_body_placeholder() {
        let out = extract_title_and_body("\n\n### Refactor config loading\n\n   \n");
        assert_eq!(out.title, "Refactor config loading");
        assert_eq!(out.body, DEFAULT_BODY);
    }

    #[test]
    fn body_keeps_internal_blank_lines() {
        let out = extract_title_and_body("Title\n\n\n## Summary\nOne\n\n## Changes\n- two");
        assert_eq!(out.title, "Title");
        assert_eq!(out.body, "## Summary\nOne\n\n## Changes\n- two");
    }

    #[test]
    fn bound_lines_caps_and_is_idempotent() {
        let text = "a\nb\n\nc\nd\n";
        let once = bound_lines(text, 3);
        assert_eq!(once, "a\nb\n");
        assert_eq!(bound_lines(&once, 3), once);
        assert!(once.lines().count() <= 3);

        assert_eq!(bound_lines(text, 0), "");
        assert_eq!(bound_lines("short", 100), "short");
    }
}
