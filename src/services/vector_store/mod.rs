//! Vector store abstraction layer.
//!
//! The ingestion driver and the search service only talk to the
//! [`VectorStore`] trait; the Qdrant backend is the production implementation.

mod qdrant;

pub use qdrant::QdrantBackend;

use async_trait::async_trait;

use crate::error::VectorStoreError;
use crate::models::{IngestionPoint, SearchHit, Vector};

/// Collection information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionInfo {
    pub points_count: u64,
}

/// Vector store operations consumed by the ingestion pipeline.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Check if the vector store is reachable.
    async fn health_check(&self) -> Result<bool, VectorStoreError>;

    /// Get information about a collection.
    /// Returns None if the collection doesn't exist.
    async fn collection_info(&self, name: &str)
    -> Result<Option<CollectionInfo>, VectorStoreError>;

    /// Drop the collection if present and create it empty with cosine distance.
    ///
    /// A missing collection is the expected first-run case and is not an
    /// error. Any other delete failure is.
    async fn ensure_empty_collection(
        &self,
        name: &str,
        dimension: u64,
    ) -> Result<(), VectorStoreError>;

    /// Write all points to the collection in one request.
    async fn upsert(&self, name: &str, points: Vec<IngestionPoint>)
    -> Result<(), VectorStoreError>;

    /// Nearest points to `vector` in one collection, payload included.
    async fn search(
        &self,
        name: &str,
        vector: Vector,
        limit: u64,
    ) -> Result<Vec<SearchHit>, VectorStoreError>;
}
