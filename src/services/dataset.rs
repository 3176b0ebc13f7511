//! Dataset file loading.

use serde_json::Value;
use std::path::Path;

use crate::error::DatasetError;
use crate::models::Record;

/// Read a file holding a JSON array of objects, preserving element order.
pub fn load_dataset(path: &Path) -> Result<Vec<Record>, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let Value::Array(items) = value else {
        return Err(DatasetError::NotAnArray {
            path: path.to_path_buf(),
        });
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(record) => Ok(record),
            _ => Err(DatasetError::NotAnArray {
                path: path.to_path_buf(),
            }),
        })
        .collect()
}
