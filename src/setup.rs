use log::debug;

use crate::config::Config;
use crate::error::Result;
use crate::llm::GenerationClient;
use crate::llm::ollama::OllamaClient;

/// Build the generation client from the resolved config.
pub fn build_llm_client(cfg: &Config) -> Result<Box<dyn GenerationClient>> {
    debug!(
        "Using OllamaClient at {} with model {} (stream: {})",
        cfg.ollama_url, cfg.model, cfg.stream
    );

    let client = OllamaClient::new(
        cfg.ollama_url.clone(),
        cfg.model.clone(),
        cfg.generate_timeout,
        cfg.list_timeout,
        cfg.stream,
    )?;
    Ok(Box::new(client))
}
