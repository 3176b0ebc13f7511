//! Qdrant vector store backend implementation.

use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, ScoredPoint, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant, QdrantError};

use super::{CollectionInfo, VectorStore};
use crate::error::VectorStoreError;
use crate::models::{IngestionPoint, SearchHit, Vector, VectorStoreConfig};

/// Qdrant vector store backend.
pub struct QdrantBackend {
    client: Qdrant,
    url: String,
}

impl QdrantBackend {
    /// Create a new Qdrant backend from configuration.
    pub fn new(config: &VectorStoreConfig) -> Result<Self, VectorStoreError> {
        let client = Qdrant::from_url(&config.url)
            .api_key(config.api_key.clone())
            .build()
            .map_err(|e| VectorStoreError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn delete_if_present(&self, name: &str) -> Result<(), VectorStoreError> {
        let exists = self
            .client
            .collection_exists(name)
            .await
            .map_err(|e| VectorStoreError::Collection(e.to_string()))?;

        if !exists {
            tracing::debug!(collection = name, "collection absent, nothing to delete");
            return Ok(());
        }

        match self.client.delete_collection(name).await {
            Ok(_) => {
                tracing::info!(collection = name, "deleted existing collection");
                Ok(())
            }
            // Dropped concurrently between the existence check and the delete.
            Err(e) if is_not_found(&e) => Ok(()),
            Err(e) => Err(VectorStoreError::Delete(e.to_string())),
        }
    }
}

fn is_not_found(err: &QdrantError) -> bool {
    matches!(err, QdrantError::ResponseError { status } if status.code() == tonic::Code::NotFound)
}

fn to_point_struct(point: IngestionPoint) -> PointStruct {
    PointStruct::new(
        point.id.to_string(),
        point.vector,
        Payload::from(point.payload),
    )
}

fn to_search_hit(collection: &str, point: ScoredPoint) -> SearchHit {
    let id = match point.id.and_then(|id| id.point_id_options) {
        Some(PointIdOptions::Uuid(uuid)) => uuid,
        Some(PointIdOptions::Num(num)) => num.to_string(),
        None => String::new(),
    };

    SearchHit {
        collection: collection.to_string(),
        id,
        score: point.score,
        payload: point
            .payload
            .into_iter()
            .map(|(key, value)| (key, value.into_json()))
            .collect(),
    }
}

#[async_trait]
impl VectorStore for QdrantBackend {
    async fn health_check(&self) -> Result<bool, VectorStoreError> {
        self.client
            .health_check()
            .await
            .map(|_| true)
            .map_err(|e| VectorStoreError::Connection(e.to_string()))
    }

    async fn collection_info(
        &self,
        name: &str,
    ) -> Result<Option<CollectionInfo>, VectorStoreError> {
        match self.client.collection_info(name).await {
            Ok(info) => Ok(Some(CollectionInfo {
                points_count: info.result.map_or(0, |r| r.points_count.unwrap_or(0)),
            })),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(VectorStoreError::Collection(e.to_string())),
        }
    }

    async fn ensure_empty_collection(
        &self,
        name: &str,
        dimension: u64,
    ) -> Result<(), VectorStoreError> {
        self.delete_if_present(name).await?;

        let create_collection = CreateCollectionBuilder::new(name)
            .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine));

        self.client
            .create_collection(create_collection)
            .await
            .map_err(|e| VectorStoreError::Collection(e.to_string()))?;

        tracing::info!(collection = name, dimension, "created collection");
        Ok(())
    }

    async fn upsert(
        &self,
        name: &str,
        points: Vec<IngestionPoint>,
    ) -> Result<(), VectorStoreError> {
        if points.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = points.into_iter().map(to_point_struct).collect();
        let upsert = UpsertPointsBuilder::new(name, points).wait(true);

        self.client
            .upsert_points(upsert)
            .await
            .map_err(|e| VectorStoreError::Upsert(e.to_string()))?;

        Ok(())
    }

    async fn search(
        &self,
        name: &str,
        vector: Vector,
        limit: u64,
    ) -> Result<Vec<SearchHit>, VectorStoreError> {
        let request = SearchPointsBuilder::new(name, vector, limit).with_payload(true);

        let response = self
            .client
            .search_points(request)
            .await
            .map_err(|e| VectorStoreError::Search(e.to_string()))?;

        tracing::debug!(collection = name, hits = response.result.len(), "search complete");

        Ok(response
            .result
            .into_iter()
            .map(|point| to_search_hit(name, point))
            .collect())
    }
}
