//! Semantic search over the ingested collections.

use crate::error::SearchError;
use crate::models::SearchHit;
use crate::services::{Embedder, VectorStore};

/// Embed `query` once and search every collection with the same vector.
///
/// Hits from all collections are merged, ordered by descending score and cut
/// to `limit`.
pub async fn search_collections<E, S>(
    embedder: &E,
    store: &S,
    query: &str,
    collections: &[String],
    limit: u64,
) -> Result<Vec<SearchHit>, SearchError>
where
    E: Embedder + ?Sized,
    S: VectorStore + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Err(SearchError::InvalidQuery(
            "search query cannot be empty".to_string(),
        ));
    }
    if limit == 0 {
        return Err(SearchError::InvalidQuery(
            "limit must be at least 1".to_string(),
        ));
    }
    if collections.is_empty() {
        return Err(SearchError::InvalidQuery(
            "no collections to search".to_string(),
        ));
    }

    let vector = embedder.embed(query).await?;

    let mut hits = Vec::new();
    for collection in collections {
        let found = store.search(collection, vector.clone(), limit).await?;
        tracing::debug!(collection = %collection, hits = found.len(), "searched collection");
        hits.extend(found);
    }

    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EmbeddingError, VectorStoreError};
    use crate::models::{IngestionPoint, Vector};
    use crate::services::CollectionInfo;
    use crate::services::batch::tests::RecordingEmbedder;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Answers each collection with fixed scores and records every request.
    #[derive(Clone, Default)]
    struct ScoredStore {
        scores: HashMap<String, Vec<f32>>,
        requests: Arc<Mutex<Vec<(String, Vector, u64)>>>,
        fail: bool,
    }

    impl ScoredStore {
        fn with(scores: Vec<(&str, Vec<f32>)>) -> Self {
            Self {
                scores: scores
                    .into_iter()
                    .map(|(name, s)| (name.to_string(), s))
                    .collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl VectorStore for ScoredStore {
        async fn health_check(&self) -> Result<bool, VectorStoreError> {
            Ok(true)
        }

        async fn collection_info(
            &self,
            _name: &str,
        ) -> Result<Option<CollectionInfo>, VectorStoreError> {
            Ok(None)
        }

        async fn ensure_empty_collection(
            &self,
            _name: &str,
            _dimension: u64,
        ) -> Result<(), VectorStoreError> {
            Ok(())
        }

        async fn upsert(
            &self,
            _name: &str,
            _points: Vec<IngestionPoint>,
        ) -> Result<(), VectorStoreError> {
            Ok(())
        }

        async fn search(
            &self,
            name: &str,
            vector: Vector,
            limit: u64,
        ) -> Result<Vec<SearchHit>, VectorStoreError> {
            self.requests
                .lock()
                .unwrap()
                .push((name.to_string(), vector, limit));
            if self.fail {
                return Err(VectorStoreError::Search("collection not ready".to_string()));
            }

            let scores = self.scores.get(name).cloned().unwrap_or_default();
            Ok(scores
                .into_iter()
                .take(limit as usize)
                .enumerate()
                .map(|(i, score)| SearchHit {
                    collection: name.to_string(),
                    id: format!("{}-{}", name, i),
                    score,
                    payload: match json!({"rank": i}) {
                        serde_json::Value::Object(map) => map,
                        _ => unreachable!(),
                    },
                })
                .collect())
        }
    }

    fn collections(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_merges_collections_by_score() {
        let embedder = RecordingEmbedder::default();
        let store = ScoredStore::with(vec![
            ("contracts", vec![0.91, 0.40, 0.12]),
            ("tickets", vec![0.75, 0.66, 0.05]),
        ]);

        let hits = search_collections(
            &embedder,
            &store,
            "  refund for late delivery ",
            &collections(&["contracts", "tickets"]),
            3,
        )
        .await
        .unwrap();

        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["contracts-0", "tickets-0", "tickets-1"]);

        // One embedding of the trimmed query, reused for every collection.
        assert_eq!(
            *embedder.calls.lock().unwrap(),
            vec!["refund for late delivery".to_string()]
        );
        let requests = store.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].1, requests[1].1);
        assert!(requests.iter().all(|(_, _, limit)| *limit == 3));
    }

    #[tokio::test]
    async fn test_single_collection() {
        let embedder = RecordingEmbedder::default();
        let store = ScoredStore::with(vec![("tickets", vec![0.8, 0.3])]);

        let hits = search_collections(&embedder, &store, "login", &collections(&["tickets"]), 5)
            .await
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.collection == "tickets"));
        assert_eq!(hits[0].payload["rank"], json!(0));
    }

    #[tokio::test]
    async fn test_blank_query_rejected_before_embedding() {
        let embedder = RecordingEmbedder::default();
        let store = ScoredStore::default();

        let err = search_collections(&embedder, &store, "   ", &collections(&["tickets"]), 5)
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::InvalidQuery(_)));
        assert!(embedder.calls.lock().unwrap().is_empty());
        assert!(store.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_limit_rejected() {
        let embedder = RecordingEmbedder::default();
        let store = ScoredStore::default();

        let err = search_collections(&embedder, &store, "login", &collections(&["tickets"]), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let embedder = RecordingEmbedder {
            fail_on: Some(0),
            ..Default::default()
        };
        let store = ScoredStore::default();

        let err = search_collections(&embedder, &store, "login", &collections(&["tickets"]), 5)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SearchError::Embedding(EmbeddingError::ServerError { status: 500, .. })
        ));
        assert!(store.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let embedder = RecordingEmbedder::default();
        let store = ScoredStore {
            fail: true,
            ..Default::default()
        };

        let err = search_collections(
            &embedder,
            &store,
            "login",
            &collections(&["contracts", "tickets"]),
            5,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SearchError::VectorStore(VectorStoreError::Search(_))));
        assert_eq!(store.requests.lock().unwrap().len(), 1);
    }
}
