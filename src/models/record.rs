//! Dataset records and the points derived from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::DatasetError;

/// A dataset record: a flat JSON object, stored verbatim as the point payload.
pub type Record = Map<String, Value>;

/// An embedding vector.
pub type Vector = Vec<f32>;

/// The unit written to the vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionPoint {
    pub id: Uuid,
    pub vector: Vector,
    pub payload: Record,
}

impl IngestionPoint {
    /// Create a point with a freshly generated random identifier.
    pub fn new(vector: Vector, payload: Record) -> Self {
        Self {
            id: Uuid::new_v4(),
            vector,
            payload,
        }
    }
}

/// Join two fields of a record with a single space.
///
/// String values are used as-is, other values use their JSON rendering.
pub fn embeddable_text(
    record: &Record,
    index: usize,
    fields: &[String; 2],
) -> Result<String, DatasetError> {
    let [first, second] = fields;
    Ok(format!(
        "{} {}",
        field_text(record, index, first)?,
        field_text(record, index, second)?
    ))
}

/// Derive one embeddable text per record, in record order.
pub fn embeddable_texts(
    records: &[Record],
    fields: &[String; 2],
) -> Result<Vec<String>, DatasetError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| embeddable_text(record, index, fields))
        .collect()
}

fn field_text(record: &Record, index: usize, field: &str) -> Result<String, DatasetError> {
    match record.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(DatasetError::MissingField {
            index,
            field: field.to_string(),
        }),
    }
}
