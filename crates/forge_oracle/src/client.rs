//! Generative oracle client: chat, embeddings, and retry/backoff.
//!
//! Speaks a Claude-Messages-shaped wire protocol (the one real transport
//! this workspace has ever needed), but nothing above this module assumes a
//! specific vendor: callers only see `chat`/`embed`/`usage`.

use crate::error::{Error, Result};
use crate::message::{ChatSequence, Role};
use crate::usage::{Usage, UsageLedger};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const EMBEDDINGS_URL: &str = "https://api.anthropic.com/v1/embeddings";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;
const MAX_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_secs(5);
const EMBEDDING_DIMS: usize = 1536;

/// Configuration for the oracle client.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Chat model identifier.
    pub model: String,
    /// Embedding model identifier.
    pub embedding_model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// When set, every chat turn is appended to this file as a JSON line.
    pub log_path: Option<PathBuf>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "claude-sonnet-4-20250514".to_string(),
            embedding_model: "text-embedding-3-large".to_string(),
            timeout_seconds: 120,
            log_path: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<WireMessage>,
    system: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
    usage: UsageResponse,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock {
    Text { text: String },
}

#[derive(Debug, Deserialize)]
struct UsageResponse {
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    dimensions: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingEntry>,
    usage: EmbeddingUsage,
}

#[derive(Debug, Deserialize)]
struct EmbeddingEntry {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingUsage {
    total_tokens: u64,
}

/// A shared oracle client. Cheap to clone: the HTTP pool and usage ledger
/// are both reference-counted internally by `reqwest::Client`/`UsageLedger`.
#[derive(Clone)]
pub struct OracleClient {
    api_key: String,
    http: reqwest::Client,
    model: String,
    embedding_model: String,
    log_path: Option<PathBuf>,
    usage: UsageLedger,
}

impl OracleClient {
    /// Creates a new oracle client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty.
    pub fn new(config: OracleConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            api_key: config.api_key,
            http,
            model: config.model,
            embedding_model: config.embedding_model,
            log_path: config.log_path,
            usage: UsageLedger::new(),
        })
    }

    /// Current accumulated token usage.
    #[must_use]
    pub fn usage(&self) -> Usage {
        self.usage.snapshot()
    }

    /// Sends a chat sequence and returns the concatenated text of the
    /// response. Retries transport errors up to three times with a fixed
    /// backoff; parse and authentication errors are not retried.
    ///
    /// # Errors
    ///
    /// Returns an error if every attempt fails, or if the response cannot be
    /// parsed.
    pub async fn chat(&self, sequence: &ChatSequence) -> Result<String> {
        let mut last_err = None;
        for attempt in 1..=MAX_ATTEMPTS {
            match self.call_messages(sequence).await {
                Ok(text) => {
                    self.log_turn(sequence, &text);
                    return Ok(text);
                }
                Err(err @ Error::Network(_)) => {
                    warn!("chat attempt {attempt}/{MAX_ATTEMPTS} failed: {err}");
                    last_err = Some(err);
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(RETRY_BACKOFF).await;
                    }
                }
                Err(other) => return Err(other),
            }
        }
        Err(last_err.unwrap_or(Error::Api("exhausted retries".to_string())))
    }

    async fn call_messages(&self, sequence: &ChatSequence) -> Result<String> {
        let request = MessageRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: sequence
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: match m.role {
                        Role::System => "user",
                        Role::User => "user",
                        Role::Assistant => "assistant",
                    },
                    content: m.content.clone(),
                })
                .collect(),
            system: sequence.system.clone(),
        };

        debug!("sending chat request with {} messages", request.messages.len());
        let response = self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(Error::RateLimited {
                retry_after_seconds: retry_after,
            });
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Api("invalid API key".to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(format!("status {status}: {body}")));
        }

        let parsed: MessageResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("{e}")))?;

        self.usage
            .record_chat(parsed.usage.input_tokens, parsed.usage.output_tokens);
        info!(
            "chat turn used {} prompt / {} completion tokens",
            parsed.usage.input_tokens, parsed.usage.output_tokens
        );

        Ok(parsed
            .content
            .into_iter()
            .map(|block| match block {
                ContentBlock::Text { text } => text,
            })
            .collect::<Vec<_>>()
            .join(""))
    }

    /// Requests dense embeddings for the given texts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// parsed.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: texts,
            dimensions: EMBEDDING_DIMS,
        };
        let response = self
            .http
            .post(EMBEDDINGS_URL)
            .header("x-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(format!("status {status}: {body}")));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("{e}")))?;
        self.usage.record_embedding(parsed.usage.total_tokens);
        Ok(parsed.data.into_iter().map(|e| e.embedding).collect())
    }

    fn log_turn(&self, sequence: &ChatSequence, response: &str) {
        let Some(path) = &self.log_path else {
            return;
        };
        let usage = self.usage.snapshot();
        let record = serde_json::json!({
            "system": sequence.system,
            "messages": sequence.messages,
            "response": response,
            "usage": usage,
        });
        let Ok(mut file) = std::fs::OpenOptions::new().create(true).append(true).open(path) else {
            warn!("failed to open oracle chat log at {}", path.display());
            return;
        };
        let _ = writeln!(file, "{record}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_rejects_empty_api_key() {
        let config = OracleConfig::default();
        assert!(matches!(OracleClient::new(config), Err(Error::MissingApiKey)));
    }

    #[test]
    fn client_accepts_valid_config() {
        let config = OracleConfig {
            api_key: "test-key".to_string(),
            ..Default::default()
        };
        assert!(OracleClient::new(config).is_ok());
    }
}
