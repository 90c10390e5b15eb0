use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "prbot",
    version,
    about = "LLM-assisted pull request description generator (Ollama)"
)]
#[command(group(
    ArgGroup::new("template_group")
        .args(["template", "template_content"])
        .multiple(false)
))]
#[command(group(
    ArgGroup::new("save_group")
        .args(["save", "output", "json"])
        .multiple(false)
))]
pub struct Cli {
    /// Branch with the changes; defaults to the current branch
    #[arg(long, short = 's')]
    pub source: Option<String>,

    /// Branch the PR merges into; defaults to main, master or develop
    #[arg(long, short = 't')]
    pub target: Option<String>,

    /// Template file, relative to the repository root
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Template text to use instead of a file
    #[arg(long)]
    pub template_content: Option<String>,

    /// Extra context for the model (ticket summary, motivation, ...)
    #[arg(long, short = 'c')]
    pub context: Option<String>,

    /// Ollama model name (e.g. llama3.1:8b)
    #[arg(long, short = 'm', env = "PRBOT_MODEL")]
    pub model: Option<String>,

    /// Ollama base URL
    #[arg(long, env = "OLLAMA_HOST")]
    pub ollama_url: Option<String>,

    /// Ask the model not to use emojis
    #[arg(long)]
    pub no_emoji: bool,

    /// Keep the model's <think> blocks in the output
    #[arg(long)]
    pub show_thinking: bool,

    /// Stream tokens to stderr while the model writes
    #[arg(long)]
    pub stream: bool,

    /// Print {title, body, source_branch, target_branch} as JSON
    #[arg(long)]
    pub json: bool,

    /// Save to a timestamped pr-description-*.md file
    #[arg(long)]
    pub save: bool,

    /// Save to this file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Don't ask whether to save the description
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// List the models the backend has and exit
    #[arg(long)]
    pub list_models: bool,

    /// Resolve and validate the template, then exit
    #[arg(long)]
    pub check_template: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
