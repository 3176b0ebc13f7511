//! Upsert command implementation.

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use crate::cli::output::{ValidationInfo, get_formatter};
use crate::models::{Config, OutputFormat, embeddable_texts};
use crate::services::{EmbeddingClient, IngestEvent, IngestionDriver, QdrantBackend, load_dataset};

/// Arguments for the upsert command.
#[derive(Debug, Default, Args)]
pub struct UpsertArgs {
    /// Directory holding the dataset files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Texts embedded per chunk before pausing
    #[arg(long, short = 'b')]
    pub batch_size: Option<usize>,

    /// Embedding model name
    #[arg(long, short = 'm')]
    pub model: Option<String>,

    /// Only ingest these datasets (repeatable)
    #[arg(long = "dataset", short = 'd')]
    pub datasets: Vec<String>,

    /// Load datasets and derive texts without touching any service
    #[arg(long)]
    pub validate_only: bool,
}

impl UpsertArgs {
    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(ref dir) = self.data_dir {
            config.ingest.data_dir = dir.clone();
        }
        if let Some(batch_size) = self.batch_size {
            config.embedding.batch_size = batch_size;
        }
        if let Some(ref model) = self.model {
            config.embedding.model = model.clone();
        }
        config.select_datasets(&self.datasets)?;
        config.validate()?;
        Ok(())
    }
}

/// Handle the upsert command.
pub async fn handle_upsert(args: UpsertArgs, format: OutputFormat) -> Result<()> {
    // Configuration is validated before any file or network access.
    let mut config = Config::from_env().context("invalid configuration")?;
    args.apply(&mut config)?;

    let formatter = get_formatter(format);

    if args.validate_only {
        let infos = validate_datasets(&config)?;
        print!("{}", formatter.format_validation(&infos));
        return Ok(());
    }

    tracing::info!(
        embedding_url = %config.embedding.url,
        model = %config.embedding.model,
        batch_size = config.embedding.batch_size,
        "starting ingestion"
    );

    let embedding_client = EmbeddingClient::new(&config.embedding)?;
    let store = QdrantBackend::new(&config.vector_store)?;
    let driver = IngestionDriver::new(config, embedding_client, store);

    let show_progress = format == OutputFormat::Text;
    let mut progress: Option<ProgressBar> = None;

    let reports = driver
        .run(&mut |event| match event {
            IngestEvent::CollectionReady { collection } => {
                print!("{}", formatter.format_collection_ready(&collection));
            }
            IngestEvent::RecordsLoaded { count, .. } => {
                if show_progress && count > 0 {
                    progress = Some(new_progress_bar(count));
                }
            }
            IngestEvent::Embedded { done, .. } => {
                if let Some(ref pb) = progress {
                    pb.set_position(done as u64);
                }
            }
            IngestEvent::Uploaded { dataset, count } => {
                if let Some(pb) = progress.take() {
                    pb.finish_and_clear();
                }
                print!("{}", formatter.format_uploaded(&dataset, count));
            }
        })
        .await
        .context("ingestion failed")?;

    print!("{}", formatter.format_summary(&reports));

    Ok(())
}

fn new_progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    pb
}

/// Load every selected dataset and derive its texts, without any network call.
fn validate_datasets(config: &Config) -> Result<Vec<ValidationInfo>> {
    config
        .ingest
        .datasets
        .iter()
        .map(|dataset| -> Result<ValidationInfo> {
            let path = config.ingest.data_dir.join(&dataset.file);
            let records = load_dataset(&path)?;
            embeddable_texts(&records, &dataset.text_fields)
                .with_context(|| format!("dataset '{}' is not embeddable", dataset.name))?;
            Ok(ValidationInfo {
                dataset: dataset.name.clone(),
                path: path.display().to_string(),
                records: records.len(),
            })
        })
        .collect()
}
