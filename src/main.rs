mod cli_args;
mod config;
mod error;
mod git;
mod llm;
mod logging;
mod output;
mod postprocess;
mod setup;
mod template;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use crossterm::tty::IsTty;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, trace, warn};
use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crate::cli_args::Cli;
use crate::config::Config;
use crate::error::PrError;
use crate::llm::prompt_builder::{self, PromptOptions};
use crate::llm::{GenerationClient, GenerationResult};
use crate::template::TemplateSource;

/// Ask the user a question and return a trimmed input line.
fn prompt_input(prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    io::stderr().flush()?;

    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}

fn resolve_template(cli: &Cli) -> Result<TemplateSource> {
    let cwd = env::current_dir().context("failed to read current directory")?;
    let source = template::resolve(
        cli.template.as_deref(),
        cli.template_content.as_deref(),
        &cwd,
    )
    .context("failed to resolve PR template")?;
    info!("Using template from {}", source.describe());
    Ok(source)
}

/// `--check-template`: print the validation report; error when invalid.
fn run_check_template(cli: &Cli) -> Result<()> {
    let source = resolve_template(cli)?;
    let report = template::validate(source.content());

    println!("Template: {}", source.describe());
    if report.valid {
        println!("Template is valid.");
        return Ok(());
    }

    for issue in &report.issues {
        println!("  - {issue}");
    }
    bail!("template has {} issue(s)", report.issues.len())
}

fn run_list_models(client: &dyn GenerationClient) -> Result<()> {
    let names = client
        .list_models()
        .context("failed to list models from Ollama")?;
    for name in names {
        println!("{name}");
    }
    Ok(())
}

/// Work out (source, target), checking both exist and differ.
fn resolve_branches(cli: &Cli, cfg: &Config, repo: &Path) -> Result<(String, String)> {
    if !git::is_available(repo) {
        return Err(PrError::NotARepository.into());
    }

    let source = match &cli.source {
        Some(name) => name.clone(),
        None => git::current_branch(repo).ok_or(PrError::BranchUndetermined("source"))?,
    };
    let target = match &cli.target {
        Some(name) => name.clone(),
        None => git::default_target_branch(repo, cfg).ok_or(PrError::BranchUndetermined("target"))?,
    };

    for name in [&source, &target] {
        git::check_branch_name(name)?;
        if !git::branch_exists(repo, name) {
            return Err(PrError::BranchNotFound(name.clone()).into());
        }
    }
    if source == target {
        bail!("source and target are both '{source}'; nothing to compare");
    }

    Ok((source, target))
}

/// Generate with a spinner, unless tokens are already streaming to stderr.
fn generate(client: &dyn GenerationClient, prompt: &str, streaming: bool) -> Result<GenerationResult> {
    if streaming {
        return Ok(client.generate(prompt)?);
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({elapsed})") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Waiting for {}", client.model()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = client.generate(prompt);
    spinner.finish_and_clear();
    Ok(result?)
}

fn run_generate(cli: &Cli, cfg: &Config, client: &dyn GenerationClient) -> Result<()> {
    let repo = env::current_dir().context("failed to read current directory")?;
    let (source, target) = resolve_branches(cli, cfg, &repo).context("repository check failed")?;
    info!("Comparing {source} against {target}");

    let diff = git::summarize(&repo, &source, &target, cfg).context("failed to collect diff")?;

    let template = resolve_template(cli)?;
    let report = template::validate(template.content());
    for issue in &report.issues {
        warn!("Template: {issue}");
    }

    let options = PromptOptions {
        suppress_emojis: cli.no_emoji,
        context: cli.context.as_deref(),
    };
    let prompt = prompt_builder::compose(template.content(), &diff, &source, &target, &options);
    trace!("Prompt:\n{prompt}");

    llm::ensure_model(client).context("model check failed")?;
    let result = generate(client, &prompt, cfg.stream).context("generation failed")?;

    let reasoning = postprocess::extract_reasoning_contents(&result.text);
    if postprocess::has_reasoning(&result.text) {
        debug!(
            "Model produced {} reasoning block(s)",
            postprocess::count_reasoning_blocks(&result.text)
        );
        for (i, block) in reasoning.iter().enumerate() {
            trace!("Reasoning block {}:\n{block}", i + 1);
        }
    }
    let description = postprocess::strip_reasoning(&result.text, cli.show_thinking);
    if description.trim().is_empty() {
        return Err(PrError::EmptyGenerationResult.into());
    }

    if cli.json {
        println!("{}", output::to_json(&description, &source, &target)?);
        return Ok(());
    }

    output::display(&description, &source, &target);

    let save_to = if cli.save || cli.output.is_some() {
        Some(cli.output.clone())
    } else if !cli.yes && io::stdin().is_tty() {
        let ans = prompt_input("Save to file? [y/N]: ")?;
        ans.eq_ignore_ascii_case("y").then_some(None)
    } else {
        None
    };

    if let Some(path) = save_to {
        let written = output::save(&description, path.as_deref())
            .context("failed to save description")?;
        eprintln!("Saved to {}", written.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    if cli.check_template {
        return run_check_template(&cli);
    }

    let cfg = Config::from_sources(&cli);
    debug!("Resolved config: {cfg:?}");

    let client = setup::build_llm_client(&cfg).context("failed to set up Ollama client")?;

    if cli.list_models {
        return run_list_models(client.as_ref());
    }

    let result = run_generate(&cli, &cfg, client.as_ref());
    if let Some(err) = result.as_ref().err().and_then(|e| e.downcast_ref::<PrError>()) {
        if err.is_repository_unavailable() {
            eprintln!("{} run inside a git repository, or pass --source/--target", "hint:".yellow());
        } else if err.is_backend_unreachable() {
            eprintln!("{} is Ollama running at {}?", "hint:".yellow(), cfg.ollama_url);
        }
    }
    result
}
