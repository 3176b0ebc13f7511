//! Ingestion driver: dataset file to populated collection.

use std::path::Path;
use std::time::Instant;

use crate::error::IngestError;
use crate::models::{
    Config, DatasetReport, DatasetSpec, IngestionPoint, Record, Vector, embeddable_texts,
};
use crate::services::{BatchEmbedder, Embedder, Pacer, TokioPacer, VectorStore, load_dataset};

/// Checkpoints emitted while a dataset is ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestEvent {
    CollectionReady { collection: String },
    RecordsLoaded { dataset: String, count: usize },
    Embedded { dataset: String, done: usize, total: usize },
    Uploaded { dataset: String, count: usize },
}

/// Runs the pipeline for each configured dataset, one after the other.
pub struct IngestionDriver<E, S, P = TokioPacer> {
    config: Config,
    embedder: BatchEmbedder<E, P>,
    store: S,
}

impl<E: Embedder, S: VectorStore> IngestionDriver<E, S> {
    pub fn new(config: Config, embedder: E, store: S) -> Self {
        let embedder = BatchEmbedder::new(embedder, &config.embedding);
        Self {
            config,
            embedder,
            store,
        }
    }
}

impl<E: Embedder, S: VectorStore, P: Pacer> IngestionDriver<E, S, P> {
    pub fn with_batch_embedder(config: Config, embedder: BatchEmbedder<E, P>, store: S) -> Self {
        Self {
            config,
            embedder,
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ingest every configured dataset in order. The first failure aborts the run.
    pub async fn run(
        &self,
        on_event: &mut (dyn FnMut(IngestEvent) + Send),
    ) -> Result<Vec<DatasetReport>, IngestError> {
        let mut reports = Vec::with_capacity(self.config.ingest.datasets.len());
        for dataset in &self.config.ingest.datasets {
            reports.push(self.ingest_dataset(dataset, on_event).await?);
        }
        Ok(reports)
    }

    /// Recreate the dataset's collection, embed its records and upload them.
    pub async fn ingest_dataset(
        &self,
        dataset: &DatasetSpec,
        on_event: &mut (dyn FnMut(IngestEvent) + Send),
    ) -> Result<DatasetReport, IngestError> {
        let start_time = Instant::now();
        let collection = dataset.collection();

        self.store
            .ensure_empty_collection(collection, self.config.vector_store.dimension)
            .await?;
        on_event(IngestEvent::CollectionReady {
            collection: collection.to_string(),
        });

        let path = self.config.ingest.data_dir.join(&dataset.file);
        let records = load_records(&path)?;
        on_event(IngestEvent::RecordsLoaded {
            dataset: dataset.name.clone(),
            count: records.len(),
        });

        let texts = embeddable_texts(&records, &dataset.text_fields)?;
        let total = texts.len();
        let vectors = self
            .embedder
            .embed_all_with_progress(&texts, |done| {
                on_event(IngestEvent::Embedded {
                    dataset: dataset.name.clone(),
                    done,
                    total,
                })
            })
            .await?;

        let points = build_points(vectors, records);
        let count = points.len();
        self.store.upsert(collection, points).await?;

        tracing::info!(dataset = %dataset.name, collection, points = count, "uploaded points");
        on_event(IngestEvent::Uploaded {
            dataset: dataset.name.clone(),
            count,
        });

        Ok(DatasetReport {
            dataset: dataset.name.clone(),
            collection: collection.to_string(),
            records: total,
            points_uploaded: count,
            duration_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}

fn load_records(path: &Path) -> Result<Vec<Record>, IngestError> {
    tracing::debug!(path = %path.display(), "loading dataset");
    Ok(load_dataset(path)?)
}

/// Pair vectors with records positionally, one fresh identifier per point.
pub fn build_points(vectors: Vec<Vector>, records: Vec<Record>) -> Vec<IngestionPoint> {
    vectors
        .into_iter()
        .zip(records)
        .map(|(vector, record)| IngestionPoint::new(vector, record))
        .collect()
}
