use crate::cli_args::Cli;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Final resolved configuration for prbot.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Ollama model used for generation.
    pub model: String,
    /// Base URL of the Ollama server.
    pub ollama_url: String,
    /// How long to wait for a generation before giving up.
    pub generate_timeout: Duration,
    /// How long to wait for the model list.
    pub list_timeout: Duration,
    /// Default target branch names, checked locally then on `remote`.
    pub target_candidates: Vec<String>,
    pub remote: String,
    /// Cap on the file-change list sent to the model.
    pub max_file_lines: usize,
    /// Cap on the diff excerpt sent to the model.
    pub max_code_lines: usize,
    pub stream: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            model: "llama3.1:8b".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            generate_timeout: Duration::from_secs(120),
            list_timeout: Duration::from_secs(5),
            target_candidates: vec!["main".into(), "master".into(), "develop".into()],
            remote: "origin".to_string(),
            max_file_lines: 20,
            max_code_lines: 100,
            stream: false,
        }
    }
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags (`--model`, `--ollama-url`, `--stream`)
    ///   2. Env vars `PRBOT_MODEL`, `OLLAMA_HOST` (read by clap)
    ///   3. TOML `~/.config/prbot.toml`
    ///   4. Defaults
    pub fn from_sources(cli: &Cli) -> Self {
        let file_cfg = load_file_config().unwrap_or_default();
        Self::layered(cli, file_cfg)
    }

    fn layered(cli: &Cli, file_cfg: FileConfig) -> Self {
        let defaults = Config::default();

        Config {
            model: cli.model.clone().or(file_cfg.model).unwrap_or(defaults.model),
            ollama_url: cli
                .ollama_url
                .clone()
                .or(file_cfg.ollama_url)
                .map(|u| normalize_ollama_url(&u))
                .unwrap_or(defaults.ollama_url),
            generate_timeout: file_cfg
                .generate_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.generate_timeout),
            list_timeout: file_cfg
                .list_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.list_timeout),
            target_candidates: file_cfg
                .target_branches
                .filter(|b| !b.is_empty())
                .unwrap_or(defaults.target_candidates),
            remote: file_cfg.remote.unwrap_or(defaults.remote),
            max_file_lines: defaults.max_file_lines,
            max_code_lines: defaults.max_code_lines,
            stream: cli.stream || file_cfg.stream.unwrap_or(defaults.stream),
        }
    }
}

/// Port Ollama listens on when `OLLAMA_HOST` names only a host.
const OLLAMA_DEFAULT_PORT: u16 = 11434;

/// Accept the `OLLAMA_HOST` shapes Ollama itself does: `host`, `host:port`
/// or a full URL. Bare forms get `http://` and, without a port, the default one.
fn normalize_ollama_url(raw: &str) -> String {
    let url = raw.trim().trim_end_matches('/');
    if url.contains("://") {
        return url.to_string();
    }

    let authority = url.split('/').next().unwrap_or(url);
    if authority.contains(':') {
        format!("http://{url}")
    } else {
        let path = &url[authority.len()..];
        format!("http://{authority}:{OLLAMA_DEFAULT_PORT}{path}")
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    pub model: Option<String>,
    pub ollama_url: Option<String>,
    pub generate_timeout_secs: Option<u64>,
    pub list_timeout_secs: Option<u64>,
    pub target_branches: Option<Vec<String>>,
    pub remote: Option<String>,
    pub stream: Option<bool>,
}

/// Return `~/.config/prbot.toml`
fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("prbot.toml"))
}

fn load_file_config() -> Option<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        return None;
    }

    let data = fs::read_to_string(&path).ok()?;
    match toml::from_str::<FileConfig>(&data) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            log::debug!("Ignoring unparsable {}: {e}", path.display());
            None
        }
    }
}
