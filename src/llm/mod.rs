pub mod ollama;
pub mod prompt_builder;
mod prompts;
mod stream;

use crate::error::{PrError, Result};

/// Raw text returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub text: String,
    pub done: bool,
}

/// Trait for talking to a text-generation backend.
pub trait GenerationClient: Send + Sync {
    /// Model the client generates with.
    fn model(&self) -> &str;

    /// Names of the models the backend can serve.
    fn list_models(&self) -> Result<Vec<String>>;

    /// Send one prompt and wait for the full answer.
    fn generate(&self, prompt: &str) -> Result<GenerationResult>;
}

/// Fail with `ModelUnavailable` unless the client's model is listed by the backend.
pub fn ensure_model(client: &dyn GenerationClient) -> Result<()> {
    let available = client.list_models()?;
    let wanted = client.model();

    if available.iter().any(|name| model_matches(name, wanted)) {
        return Ok(());
    }

    Err(PrError::ModelUnavailable {
        model: wanted.to_string(),
        available,
    })
}

/// Ollama lists untagged pulls as `name:latest`.
fn model_matches(available: &str, wanted: &str) -> bool {
    available == wanted || (!wanted.contains(':') && available == format!("{wanted}:latest"))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedModels {
        model: &'static str,
        names: Vec<&'static str>,
    }

    impl GenerationClient for FixedModels {
        fn model(&self) -> &str {
            self.model
        }

        fn list_models(&self) -> Result<Vec<String>> {
            Ok(self.names.iter().map(|s| s.to_string()).collect())
        }

        fn generate(&self, _prompt: &str) -> Result<GenerationResult> {
            Err(PrError::EmptyGenerationResult)
        }
    }

    #[test]
    fn untagged_name_matches_latest() {
        assert!(model_matches("mistral:latest", "mistral"));
        assert!(model_matches("qwen3:8b", "qwen3:8b"));
        assert!(!model_matches("qwen3:4b", "qwen3:8b"));
        assert!(!model_matches("qwen3:8b", "qwen3"));
    }

    #[test]
    fn missing_model_is_reported_with_alternatives() {
        let client = FixedModels {
            model: "llama3.1:8b",
            names: vec!["qwen3:8b"],
        };
        match ensure_model(&client) {
            Err(PrError::ModelUnavailable { model, available }) => {
                assert_eq!(model, "llama3.1:8b");
                assert_eq!(available, vec!["qwen3:8b".to_string()]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn listed_model_passes() {
        let client = FixedModels {
            model: "mistral",
            names: vec!["llama3.1:8b", "mistral:latest"],
        };
        assert!(ensure_model(&client).is_ok());
    }
}
