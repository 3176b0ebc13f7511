//! Output format and run reports.

use serde::{Deserialize, Serialize};

use super::Record;

/// Output format for operator messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable checkpoints
    #[default]
    Text,
    /// Machine-parseable JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Outcome of ingesting one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetReport {
    pub dataset: String,
    pub collection: String,
    pub records: usize,
    pub points_uploaded: usize,
    pub duration_ms: u64,
}

/// Collection state reported by the status command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStatus {
    pub name: String,
    pub exists: bool,
    pub points_count: u64,
}

/// One scored point from a similarity search, with its stored record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub collection: String,
    pub id: String,
    pub score: f32,
    pub payload: Record,
}

/// Merged hits across the searched collections, best score first.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub collections: Vec<String>,
    pub hits: Vec<SearchHit>,
    pub duration_ms: u64,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
