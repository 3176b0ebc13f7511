//! Paced, strictly sequential batch embedding.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::EmbeddingError;
use crate::models::{EmbeddingConfig, Vector};
use crate::services::Embedder;

/// Waits between chunks so the embedding server is not flooded.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// Pacer backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Embeds an ordered list of texts one request at a time, chunk by chunk.
///
/// The returned vectors line up positionally with the input texts. Any failed
/// request aborts the whole call and nothing computed so far is returned.
pub struct BatchEmbedder<E, P = TokioPacer> {
    embedder: E,
    pacer: P,
    batch_size: usize,
    delay: Duration,
}

impl<E: Embedder> BatchEmbedder<E> {
    pub fn new(embedder: E, config: &EmbeddingConfig) -> Self {
        Self::with_pacer(
            embedder,
            TokioPacer,
            config.batch_size,
            Duration::from_millis(config.batch_delay_ms),
        )
    }
}

impl<E: Embedder, P: Pacer> BatchEmbedder<E, P> {
    pub fn with_pacer(embedder: E, pacer: P, batch_size: usize, delay: Duration) -> Self {
        Self {
            embedder,
            pacer,
            batch_size: batch_size.max(1),
            delay,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub async fn embed_all(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingError> {
        self.embed_all_with_progress(texts, |_| {}).await
    }

    /// Like [`embed_all`](Self::embed_all), calling `on_embedded` with the
    /// running count after each successful request.
    pub async fn embed_all_with_progress<F>(
        &self,
        texts: &[String],
        mut on_embedded: F,
    ) -> Result<Vec<Vector>, EmbeddingError>
    where
        F: FnMut(usize) + Send,
    {
        let mut embeddings = Vec::with_capacity(texts.len());
        let total_chunks = texts.len().div_ceil(self.batch_size);

        for (index, chunk) in texts.chunks(self.batch_size).enumerate() {
            tracing::debug!(
                chunk = index + 1,
                of = total_chunks,
                size = chunk.len(),
                "embedding chunk"
            );

            for text in chunk {
                embeddings.push(self.embedder.embed(text).await?);
                on_embedded(embeddings.len());
            }

            self.pacer.pause(self.delay).await;
        }

        Ok(embeddings)
    }
}
