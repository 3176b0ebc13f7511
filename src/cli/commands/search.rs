//! Search command implementation.

use anyhow::{Context, Result};
use clap::Args;
use std::time::Instant;

use crate::cli::output::get_formatter;
use crate::models::{Config, OutputFormat, SearchResults};
use crate::services::{EmbeddingClient, QdrantBackend, search_collections};

pub const DEFAULT_SEARCH_LIMIT: u64 = 5;

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(required = true, help = "Search query text")]
    pub query: String,

    #[arg(
        long,
        short = 'c',
        help = "Only search this collection (contracts or tickets)"
    )]
    pub collection: Option<String>,

    #[arg(long, short = 'n', default_value_t = DEFAULT_SEARCH_LIMIT, help = "Maximum number of results to return")]
    pub limit: u64,

    #[arg(long, short = 'm', help = "Embedding model name")]
    pub model: Option<String>,
}

/// Collections to search: the named one, or every configured dataset.
fn target_collections(config: &mut Config, collection: Option<&str>) -> Result<Vec<String>> {
    if let Some(name) = collection {
        config.select_datasets(&[name.to_string()])?;
    }
    Ok(config
        .ingest
        .datasets
        .iter()
        .map(|d| d.collection().to_string())
        .collect())
}

pub async fn handle_search(args: SearchArgs, format: OutputFormat) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        anyhow::bail!("search query cannot be empty");
    }
    if args.limit == 0 {
        anyhow::bail!("limit must be at least 1");
    }

    let mut config = Config::from_env().context("invalid configuration")?;
    if let Some(ref model) = args.model {
        config.embedding.model = model.clone();
    }
    let collections = target_collections(&mut config, args.collection.as_deref())?;

    let formatter = get_formatter(format);
    let start_time = Instant::now();

    let embedding_client = EmbeddingClient::new(&config.embedding)?;
    let store = QdrantBackend::new(&config.vector_store)?;

    tracing::info!(
        model = %config.embedding.model,
        collections = ?collections,
        limit = args.limit,
        "searching"
    );

    let hits = search_collections(&embedding_client, &store, query, &collections, args.limit)
        .await
        .context("search failed")?;

    let results = SearchResults {
        query: query.to_string(),
        collections,
        hits,
        duration_ms: start_time.elapsed().as_millis() as u64,
    };

    print!("{}", formatter.format_search_results(&results));

    Ok(())
}
