use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_EMBEDDING_MODEL: &str = "deepseek-coder:6.7b";
pub const DEFAULT_EMBEDDING_DIMENSION: u64 = 4096;
pub const DEFAULT_DATA_DIR: &str = "data";

pub const ENV_QDRANT_URL: &str = "QDRANT_URL";
pub const ENV_QDRANT_API_KEY: &str = "QDRANT_API_KEY";
pub const ENV_OLLAMA_BASE_URL: &str = "OLLAMA_BASE_URL";
pub const ENV_OLLAMA_MODEL: &str = "OLLAMA_MODEL";
pub const ENV_DATA_DIR: &str = "INGEST_DATA_DIR";

/// Connection settings and pipeline parameters for one run.
///
/// Built once from the environment and passed into the ingestion driver;
/// construction fails if a required variable is absent.
#[derive(Debug, Clone)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub vector_store: VectorStoreConfig,
    pub ingest: IngestConfig,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| ConfigError::MissingVar(key.to_string()));

        let vector_store = VectorStoreConfig {
            url: require(ENV_QDRANT_URL)?,
            api_key: require(ENV_QDRANT_API_KEY)?,
            dimension: DEFAULT_EMBEDDING_DIMENSION,
        };

        let embedding = EmbeddingConfig {
            url: get(ENV_OLLAMA_BASE_URL).unwrap_or_else(default_ollama_url),
            model: get(ENV_OLLAMA_MODEL).unwrap_or_else(default_model),
            ..EmbeddingConfig::default()
        };

        let ingest = IngestConfig {
            data_dir: get(ENV_DATA_DIR).map_or_else(default_data_dir, PathBuf::from),
            ..IngestConfig::default()
        };

        let config = Self {
            embedding,
            vector_store,
            ingest,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.embedding.model.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "embedding model must not be empty".to_string(),
            ));
        }
        if self.ingest.datasets.is_empty() {
            return Err(ConfigError::Invalid("no datasets selected".to_string()));
        }
        Ok(())
    }

    /// Restrict the run to the named datasets, in the order given.
    pub fn select_datasets(&mut self, names: &[String]) -> Result<(), ConfigError> {
        if names.is_empty() {
            return Ok(());
        }

        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let spec = self
                .ingest
                .datasets
                .iter()
                .find(|d| &d.name == name)
                .ok_or_else(|| ConfigError::Invalid(format!("unknown dataset: {}", name)))?;
            selected.push(spec.clone());
        }
        self.ingest.datasets = selected;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub url: String,

    pub model: String,

    pub timeout_secs: u64,

    pub batch_size: usize,

    pub batch_delay_ms: u64,
}

fn default_ollama_url() -> String {
    DEFAULT_OLLAMA_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_batch_size() -> usize {
    5
}

fn default_batch_delay_ms() -> u64 {
    500
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: default_ollama_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            batch_size: default_batch_size(),
            batch_delay_ms: default_batch_delay_ms(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VectorStoreConfig {
    pub url: String,

    pub api_key: String,

    pub dimension: u64,
}

/// Which dataset files to ingest and where they live.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub data_dir: PathBuf,

    pub datasets: Vec<DatasetSpec>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_datasets() -> Vec<DatasetSpec> {
    vec![
        DatasetSpec::new("contracts", "contracts.txt", ["summary", "terms"]),
        DatasetSpec::new("tickets", "tickets.txt", ["subject", "description"]),
    ]
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            datasets: default_datasets(),
        }
    }
}

/// One dataset: its collection name, file and the fields joined into the embedded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSpec {
    /// Dataset name, also used as the collection name.
    pub name: String,
    /// File name relative to the data directory.
    pub file: String,
    pub text_fields: [String; 2],
}

impl DatasetSpec {
    pub fn new(name: &str, file: &str, text_fields: [&str; 2]) -> Self {
        Self {
            name: name.to_string(),
            file: file.to_string(),
            text_fields: text_fields.map(str::to_string),
        }
    }

    pub fn collection(&self) -> &str {
        &self.name
    }
}
