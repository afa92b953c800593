//! OpenAI-compatible embeddings client.
//!
//! Speaks the `/v1/embeddings` wire shape: `{model, input}` in,
//! `{data: [{embedding}]}` out. Retry/backoff is deliberately not
//! implemented here; the retriever contract treats each call as one
//! blocking network operation and callers wrap their own policy around it.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::EmbeddingClient;
use super::config::EmbeddingConfig;
use super::error::{EmbeddingError, EmbeddingResult};

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

/// Embedding client backed by an OpenAI-compatible HTTP endpoint.
pub struct OpenAiEmbeddingClient {
    http: HttpClient,
    endpoint: String,
    model: String,
    api_key: String,
}

impl std::fmt::Debug for OpenAiEmbeddingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbeddingClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiEmbeddingClient {
    /// Creates a client from `config`. Fails immediately when no API key
    /// is configured (configuration error, surfaced before any network use).
    pub fn new(config: EmbeddingConfig) -> EmbeddingResult<Self> {
        let api_key = config.api_key.ok_or(EmbeddingError::MissingApiKey)?;

        Ok(Self {
            http: HttpClient::new(),
            endpoint: config.endpoint,
            model: config.model,
            api_key,
        })
    }

    /// Returns the configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingClient for OpenAiEmbeddingClient {
    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!(
            count = texts.len(),
            model = %self.model,
            "requesting embeddings"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message: truncate(&message, 512),
            });
        }

        let parsed: EmbedResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s[..end].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_api_key() {
        let err = OpenAiEmbeddingClient::new(EmbeddingConfig::default()).unwrap_err();
        assert!(matches!(err, EmbeddingError::MissingApiKey));
    }

    #[test]
    fn test_new_with_api_key() {
        let client =
            OpenAiEmbeddingClient::new(EmbeddingConfig::with_api_key("sk-test")).unwrap();
        assert_eq!(client.model(), crate::constants::DEFAULT_EMBEDDING_MODEL);
    }

    #[test]
    fn test_request_serialization() {
        let texts = vec!["knee x-ray".to_string()];
        let req = EmbedRequest {
            model: "text-embedding-3-small",
            input: &texts,
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "text-embedding-3-small");
        assert_eq!(json["input"][0], "knee x-ray");
    }

    #[test]
    fn test_response_deserialization() {
        let body = r#"{"data":[{"embedding":[0.1,0.2]},{"embedding":[0.3,0.4]}],"model":"m","usage":{}}"#;
        let parsed: EmbedResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[1].embedding, vec![0.3, 0.4]);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let s = "aé".repeat(300);
        let out = truncate(&s, 512);
        assert!(out.len() <= 512);
    }
}
