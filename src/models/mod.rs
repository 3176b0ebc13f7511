mod config;
mod record;
mod report;

pub use config::{
    Config, DEFAULT_DATA_DIR, DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_MODEL,
    DEFAULT_OLLAMA_URL, DatasetSpec, ENV_DATA_DIR, ENV_OLLAMA_BASE_URL, ENV_OLLAMA_MODEL,
    ENV_QDRANT_API_KEY, ENV_QDRANT_URL, EmbeddingConfig, IngestConfig, VectorStoreConfig,
};
pub use record::{IngestionPoint, Record, Vector, embeddable_text, embeddable_texts};
pub use report::{CollectionStatus, DatasetReport, OutputFormat, SearchHit, SearchResults};
