//! OpenAI Client — the single point of entry for all remote model calls.
//!
//! ARCHITECTURAL RULE: No other module may call the provider API directly.
//! The match engine sees only the `TextEmbedder` / `TextGenerator` traits,
//! so any provider offering embeddings and text completions is substitutable
//! (and tests stub the traits without touching the network).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("provider returned an empty response")]
    EmptyResponse,

    #[error("analysis timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// Produces a fixed-dimension embedding vector for a text.
/// Both texts of a comparison must go through the same implementation so the
/// vectors stay comparable.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, UpstreamError>;
}

/// Produces a text completion for a fully-rendered prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, UpstreamError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingObject>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingObject {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Thin OpenAI HTTP client. Constructed per analysis request with a freshly
/// resolved API key; the underlying `reqwest::Client` connection pool is
/// shared and long-lived. Each call is attempted exactly once — there is no
/// local retry, failures surface to the caller.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
    embedding_model: String,
    generation_model: String,
}

impl OpenAiClient {
    pub fn new(http: Client, api_key: String, config: &Config) -> Self {
        Self {
            http,
            api_key,
            base_url: config.openai_base_url.clone(),
            embedding_model: config.embedding_model.clone(),
            generation_model: config.generation_model.clone(),
        }
    }

    /// Reads the response body, mapping non-2xx statuses to `Api` errors with
    /// the provider's own message where one can be parsed out.
    async fn read_body(response: reqwest::Response) -> Result<String, UpstreamError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        let message = serde_json::from_str::<ProviderError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        Err(UpstreamError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl TextEmbedder for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, UpstreamError> {
        let url = format!("{}/embeddings", self.base_url);
        let request = EmbeddingsRequest {
            model: &self.embedding_model,
            input: text,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let parsed: EmbeddingsResponse = serde_json::from_str(&body)?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(UpstreamError::EmptyResponse)?;

        debug!("embedding received: model={}, dim={}", self.embedding_model, vector.len());
        Ok(vector)
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, UpstreamError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: &self.generation_model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(UpstreamError::EmptyResponse)?;

        debug!(
            "completion received: model={}, temperature={}, chars={}",
            self.generation_model,
            temperature,
            text.len()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embeddings_response_deserializes() {
        let json = r#"{"data": [{"embedding": [0.1, 0.2, 0.3]}]}"#;
        let parsed: EmbeddingsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data[0].embedding, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_chat_response_deserializes() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "Django, REST APIs"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content, "Django, REST APIs");
    }

    #[test]
    fn test_provider_error_message_extracted() {
        let json = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        let parsed: ProviderError = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.error.message, "Incorrect API key provided");
    }

    #[test]
    fn test_embeddings_request_serializes_model_and_input() {
        let request = EmbeddingsRequest {
            model: "text-embedding-3-small",
            input: "Python developer",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "text-embedding-3-small");
        assert_eq!(json["input"], "Python developer");
    }
}
