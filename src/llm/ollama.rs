use musli::json;
use musli::{Decode, Encode};
use reqwest::blocking::Client;
use std::io::{self, BufReader};
use std::time::Duration;

use crate::error::{PrError, Result};

use super::stream::{read_stream, StreamChunk};
use super::{GenerationClient, GenerationResult};

#[derive(Debug, Encode)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Decode)]
struct GenerateResponse {
    #[musli(default)]
    response: Option<String>,
    #[musli(default)]
    done: Option<bool>,
}

#[derive(Debug, Decode)]
struct TagsResponse {
    #[musli(default)]
    models: Option<Vec<TagModel>>,
}

#[derive(Debug, Decode)]
struct TagModel {
    name: String,
}

/// Synchronous Ollama client using /api/tags and /api/generate.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
    generate_timeout: Duration,
    list_timeout: Duration,
    stream: bool,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        generate_timeout: Duration,
        list_timeout: Duration,
        stream: bool,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder()
            .build()
            .map_err(|e| PrError::BackendUnreachable {
                url: base_url.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url,
            model: model.into(),
            generate_timeout,
            list_timeout,
            stream,
        })
    }

    fn send_error(url: &str, timeout: Duration, e: reqwest::Error) -> PrError {
        if e.is_timeout() {
            PrError::BackendTimeout {
                url: url.to_string(),
                secs: timeout.as_secs(),
            }
        } else {
            PrError::BackendUnreachable {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }

    /// Errors while reading a streamed body arrive as `io::Error`s wrapping the
    /// transport error, so the timeout has to be dug out of the chain.
    fn read_error(url: &str, timeout: Duration, e: io::Error) -> PrError {
        if io_timed_out(&e) {
            PrError::BackendTimeout {
                url: url.to_string(),
                secs: timeout.as_secs(),
            }
        } else {
            PrError::BackendUnreachable {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }

    fn response_error(url: &str, reason: impl ToString) -> PrError {
        PrError::BackendResponse {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl GenerationClient for OllamaClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);

        let resp = self
            .http
            .get(&url)
            .timeout(self.list_timeout)
            .send()
            .map_err(|e| Self::send_error(&url, self.list_timeout, e))?
            .error_for_status()
            .map_err(|e| Self::response_error(&url, e))?;

        let body = resp
            .text()
            .map_err(|e| Self::send_error(&url, self.list_timeout, e))?;
        log::trace!("Ollama tags response: {body}");

        parse_tags(&body).map_err(|reason| Self::response_error(&url, reason))
    }

    fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        let url = format!("{}/api/generate", self.base_url);

        let req_body = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: self.stream,
        };
        let body_str = json::to_string(&req_body)
            .map_err(|e| Self::response_error(&url, format!("failed to encode request: {e}")))?;

        log::trace!("Ollama request body: {body_str}");
        log::info!("Calling Ollama model {:?}", self.model);

        let resp = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .timeout(self.generate_timeout)
            .body(body_str)
            .send()
            .map_err(|e| Self::send_error(&url, self.generate_timeout, e))?
            .error_for_status()
            .map_err(|e| Self::response_error(&url, e))?;

        let result = if self.stream {
            read_stream(
                BufReader::new(resp),
                &mut io::stderr(),
                |line| parse_stream_line(line).map_err(|reason| Self::response_error(&url, reason)),
                |e| Self::read_error(&url, self.generate_timeout, e),
            )?
        } else {
            let resp_text = resp
                .text()
                .map_err(|e| Self::send_error(&url, self.generate_timeout, e))?;
            log::trace!("Ollama raw JSON response: {resp_text}");
            parse_generate(&resp_text).map_err(|reason| Self::response_error(&url, reason))?
        };

        if result.text.trim().is_empty() {
            return Err(PrError::EmptyGenerationResult);
        }
        if !result.done {
            log::warn!("Ollama did not mark the response as done; output may be incomplete");
        }

        Ok(result)
    }
}

fn io_timed_out(e: &io::Error) -> bool {
    if e.kind() == io::ErrorKind::TimedOut {
        return true;
    }

    let mut source = e
        .get_ref()
        .map(|inner| inner as &(dyn std::error::Error + 'static));
    while let Some(err) = source {
        if let Some(req) = err.downcast_ref::<reqwest::Error>() {
            if req.is_timeout() {
                return true;
            }
        }
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::TimedOut {
                return true;
            }
        }
        source = err.source();
    }

    false
}

fn parse_tags(body: &str) -> std::result::Result<Vec<String>, String> {
    let parsed: TagsResponse =
        json::from_str(body).map_err(|e| format!("failed to decode model list: {e}"))?;
    Ok(parsed
        .models
        .unwrap_or_default()
        .into_iter()
        .map(|m| m.name)
        .collect())
}

fn parse_generate(body: &str) -> std::result::Result<GenerationResult, String> {
    let parsed: GenerateResponse =
        json::from_str(body).map_err(|e| format!("failed to decode response: {e}"))?;
    Ok(GenerationResult {
        text: parsed.response.unwrap_or_default().trim().to_string(),
        done: parsed.done.unwrap_or(false),
    })
}

fn parse_stream_line(line: &str) -> std::result::Result<StreamChunk, String> {
    let parsed: GenerateResponse =
        json::from_str(line).map_err(|e| format!("failed to decode stream chunk: {e}"))?;

    Ok(StreamChunk {
        text: parsed.response.filter(|t| !t.is_empty()),
        done: parsed.done.unwrap_or(false),
    })
}
