use anyhow::{Context, Result};

use crate::cli::output::{StatusInfo, get_formatter};
use crate::models::{CollectionStatus, Config, OutputFormat};
use crate::services::{EmbeddingClient, QdrantBackend, VectorStore};

pub async fn handle_status(format: OutputFormat) -> Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    let formatter = get_formatter(format);

    let embedding_client = EmbeddingClient::new(&config.embedding)?;
    let embedding_version = match embedding_client.version().await {
        Ok(version) => Some(version),
        Err(e) => {
            tracing::debug!(error = %e, "embedding service unreachable");
            None
        }
    };

    let store = QdrantBackend::new(&config.vector_store)?;
    let vector_store_connected = store.health_check().await.unwrap_or(false);

    let mut collections = Vec::with_capacity(config.ingest.datasets.len());
    if vector_store_connected {
        for dataset in &config.ingest.datasets {
            let info = store.collection_info(dataset.collection()).await?;
            collections.push(CollectionStatus {
                name: dataset.collection().to_string(),
                exists: info.is_some(),
                points_count: info.map_or(0, |i| i.points_count),
            });
        }
    }

    let status = StatusInfo {
        embedding_url: embedding_client.base_url().to_string(),
        embedding_model: embedding_client.model().to_string(),
        embedding_version,
        vector_store_url: store.url().to_string(),
        vector_store_connected,
        collections,
    };

    print!("{}", formatter.format_status(&status));

    if status.embedding_version.is_none() {
        eprint!(
            "{}",
            formatter.format_message("Hint: Ollama not reachable. Start it with: ollama serve")
        );
    }
    if !vector_store_connected {
        eprint!(
            "{}",
            formatter.format_message(
                "Warning: Qdrant not reachable. Check QDRANT_URL and QDRANT_API_KEY."
            )
        );
    }

    Ok(())
}
