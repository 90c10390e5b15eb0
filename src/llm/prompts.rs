pub const PREAMBLE: &str = r#"You are an expert software engineer writing a GitHub Pull Request description.
Read the branch information, commits and diff below, work out the overall goal of the
change, and describe it for a reviewer. Focus on intent and user-visible behavior, not
line-by-line narration of the diff. Be specific; avoid phrases like 'misc changes'."#;

pub const TEMPLATE_HEADING: &str = "TEMPLATE STRUCTURE TO FOLLOW:";
pub const BRANCH_HEADING: &str = "BRANCH INFORMATION:";
pub const COMMITS_HEADING: &str = "COMMIT MESSAGES:";
pub const FILES_HEADING: &str = "FILE CHANGES SUMMARY:";
pub const STATS_HEADING: &str = "DIFF STATISTICS:";
pub const CODE_HEADING: &str = "CODE CHANGES SAMPLE:";
pub const CONTEXT_HEADING: &str = "ADDITIONAL CONTEXT:";
pub const INSTRUCTIONS_HEADING: &str = "INSTRUCTIONS:";

pub const INSTRUCTIONS: &str = r#"- Follow the template structure above exactly, keeping its section headings and order.
- Replace bracketed placeholder text such as [Brief description] with real content drawn from the changes.
- Keep the whole description under 1000 words.
- Do not leave placeholder markers like [...], TODO or TBD in the output.
- Start with a one-line title, then the filled-in template.
- Output only the pull request description, with no preamble or closing remarks."#;

pub const NO_EMOJI: &str = "- Do not use emojis anywhere in the description.";
