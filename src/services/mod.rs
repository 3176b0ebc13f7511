mod batch;
mod dataset;
mod embedding;
mod ingest;
mod search;
mod vector_store;

pub use batch::{BatchEmbedder, Pacer, TokioPacer};
pub use dataset::load_dataset;
pub use embedding::{Embedder, EmbeddingClient, VersionResponse};
pub use ingest::{IngestEvent, IngestionDriver, build_points};
pub use search::search_collections;
pub use vector_store::{CollectionInfo, QdrantBackend, VectorStore};
