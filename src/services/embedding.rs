//! Embedding client for the Ollama embeddings endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::EmbeddingError;
use crate::models::{EmbeddingConfig, Vector};

/// Anything that turns one text into one vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vector, EmbeddingError>;
}

/// Request body for the /api/embeddings endpoint.
#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Response from the /api/embeddings endpoint.
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vector,
}

/// Response from the /api/version endpoint.
#[derive(Debug, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

/// Client for the Ollama embedding server.
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    client: Client,
    base_url: String,
    model: String,
}

impl EmbeddingClient {
    /// Create a new embedding client with the given configuration.
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Query the server version; doubles as a reachability check.
    pub async fn version(&self) -> Result<String, EmbeddingError> {
        let url = format!("{}/api/version", self.base_url);
        let response = self.client.get(&url).send().await.map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        let version: VersionResponse = response.json().await.map_err(map_body_error)?;
        Ok(version.version)
    }

    async fn request_embedding(&self, text: &str) -> Result<Vector, EmbeddingError> {
        let url = format!("{}/api/embeddings", self.base_url);
        let request = EmbedRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        let embed_response: EmbedResponse = response.json().await.map_err(map_body_error)?;

        Ok(embed_response.embedding)
    }

    /// Get the base URL of the embedding server.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vector, EmbeddingError> {
        self.request_embedding(text).await.inspect_err(|e| {
            tracing::error!(model = %self.model, error = %e, "error generating embedding");
        })
    }
}

fn map_send_error(e: reqwest::Error) -> EmbeddingError {
    if e.is_timeout() {
        EmbeddingError::Timeout
    } else {
        EmbeddingError::RequestFailed(e)
    }
}

/// Body reads can still time out or drop; only decode failures are bad responses.
fn map_body_error(e: reqwest::Error) -> EmbeddingError {
    if e.is_timeout() || e.is_request() {
        map_send_error(e)
    } else {
        EmbeddingError::InvalidResponse(e.to_string())
    }
}

async fn server_error(response: reqwest::Response) -> EmbeddingError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    EmbeddingError::ServerError { status, body }
}
