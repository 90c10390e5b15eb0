use crate::git::DiffSummary;
use crate::llm::prompts;

/// Knobs that change the composed prompt.
#[derive(Debug, Clone, Default)]
pub struct PromptOptions<'a> {
    pub suppress_emojis: bool,
    pub context: Option<&'a str>,
}

/// Build the single prompt sent to the model.
///
/// Every diff field is included, empty or not; section order is fixed.
pub fn compose(
    template: &str,
    diff: &DiffSummary,
    source_branch: &str,
    target_branch: &str,
    options: &PromptOptions<'_>,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(prompts::PREAMBLE);
    prompt.push_str("\n\n");

    push_section(&mut prompt, prompts::TEMPLATE_HEADING, template);
    push_section(
        &mut prompt,
        prompts::BRANCH_HEADING,
        &format!("Source branch: {source_branch}\nTarget branch: {target_branch}"),
    );
    push_section(&mut prompt, prompts::COMMITS_HEADING, &diff.commit_messages);
    push_section(&mut prompt, prompts::FILES_HEADING, &diff.file_changes);
    push_section(&mut prompt, prompts::STATS_HEADING, &diff.diff_statistics);
    push_section(
        &mut prompt,
        prompts::CODE_HEADING,
        &format!("```diff\n{}\n```", diff.code_sample),
    );

    if let Some(ctx) = options.context.filter(|c| !c.trim().is_empty()) {
        push_section(&mut prompt, prompts::CONTEXT_HEADING, ctx);
    }

    prompt.push_str(prompts::INSTRUCTIONS_HEADING);
    prompt.push('\n');
    prompt.push_str(prompts::INSTRUCTIONS);
    if options.suppress_emojis {
        prompt.push('\n');
        prompt.push_str(prompts::NO_EMOJI);
    }
    prompt.push('\n');

    prompt
}

fn push_section(prompt: &mut String, heading: &str, body: &str) {
    prompt.push_str(heading);
    prompt.push('\n');
    prompt.push_str(body);
    prompt.push_str("\n\n");
}
