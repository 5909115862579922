/// Embedding Client — HTTP backend for the relevance scorer.
///
/// Talks to any OpenAI-compatible `/embeddings` endpoint (OpenAI, a local
/// text-embeddings-inference server, vLLM, ...). One request per text and no
/// retries: a failure surfaces as `EmbeddingError::Unavailable` and the caller
/// answers 503.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::scoring::relevance::{Embedder, EmbeddingError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum EmbeddingClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("response contained no embedding")]
    EmptyData,
}

impl From<EmbeddingClientError> for EmbeddingError {
    fn from(e: EmbeddingClientError) -> Self {
        EmbeddingError::Unavailable(e.to_string())
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: usize,
}

impl HttpEmbedder {
    pub fn new(
        url: String,
        api_key: Option<String>,
        model: String,
        max_tokens: usize,
    ) -> Result<Self, EmbeddingClientError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            url,
            api_key,
            model,
            max_tokens,
        })
    }

    async fn request(&self, text: &str) -> Result<Vec<f32>, EmbeddingClientError> {
        let mut request = self.client.post(&self.url).json(&EmbeddingRequest {
            model: &self.model,
            input: text,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingClientError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let parsed: EmbeddingResponse = response.json().await?;
        let embedding = first_embedding(parsed)?;
        debug!(
            "Embedding call succeeded: model={}, dimensions={}",
            self.model,
            embedding.len()
        );
        Ok(embedding)
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.request(text).await?)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn max_input_tokens(&self) -> usize {
        self.max_tokens
    }
}

fn first_embedding(response: EmbeddingResponse) -> Result<Vec<f32>, EmbeddingClientError> {
    response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .filter(|e| !e.is_empty())
        .ok_or(EmbeddingClientError::EmptyData)
}

/// Pulls `error.message` out of an OpenAI-style error body, else the raw body.
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_embedding_from_openai_shape() {
        let body = r#"{"object":"list","data":[{"object":"embedding","index":0,"embedding":[0.1,-0.2,0.3]}],"model":"m"}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(body).unwrap();
        assert_eq!(first_embedding(parsed).unwrap(), vec![0.1, -0.2, 0.3]);
    }

    #[test]
    fn test_empty_data_is_an_error() {
        let parsed: EmbeddingResponse = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(matches!(
            first_embedding(parsed),
            Err(EmbeddingClientError::EmptyData)
        ));
    }

    #[test]
    fn test_api_error_message_extraction() {
        let body = r#"{"error":{"message":"model not found","type":"invalid_request_error"}}"#;
        assert_eq!(api_error_message(body.to_string()), "model not found");
        assert_eq!(api_error_message("Bad Gateway".to_string()), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_maps_to_unavailable() {
        let embedder = HttpEmbedder::new(
            "http://127.0.0.1:9/v1/embeddings".to_string(),
            None,
            "all-MiniLM-L6-v2".to_string(),
            256,
        )
        .unwrap();
        let err = embedder.embed("hello").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Unavailable(_)));
        assert_eq!(embedder.model_name(), "all-MiniLM-L6-v2");
        assert_eq!(embedder.max_input_tokens(), 256);
    }
}
