//! JSON IO for topology catalogs and rendered Antimony models
//!
//! The catalog file records, for every topology, its index, label and active
//! extension indices, so a model selection run can be inspected or resumed
//! without re-enumerating.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::io::IoError;
use crate::model::combinations::TopologyCatalog;

/// Write a topology catalog as pretty-printed JSON
pub fn write_catalog<P: AsRef<Path>>(path: P, catalog: &TopologyCatalog) -> Result<(), IoError> {
    let json_data = match serde_json::to_string_pretty(catalog) {
        Ok(data) => data,
        Err(_) => return Err(IoError::SerializeError),
    };
    debug!(path = %path.as_ref().display(), entries = catalog.entries.len(), "writing topology catalog");
    match fs::write(path, json_data) {
        Ok(()) => Ok(()),
        Err(_) => Err(IoError::WriteError),
    }
}

/// Read a topology catalog written by [`write_catalog`]
pub fn read_catalog<P: AsRef<Path>>(path: P) -> Result<TopologyCatalog, IoError> {
    let json_data = match fs::read_to_string(path) {
        Ok(data) => data,
        _ => return Err(IoError::FileNotFound),
    };
    match serde_json::from_str(&json_data) {
        Ok(catalog) => Ok(catalog),
        Err(_) => Err(IoError::DeserializeError),
    }
}

/// Write a rendered Antimony model to disk
pub fn write_model<P: AsRef<Path>>(path: P, model_text: &str) -> Result<(), IoError> {
    debug!(path = %path.as_ref().display(), "writing rendered model");
    match fs::write(path, model_text) {
        Ok(()) => Ok(()),
        Err(_) => Err(IoError::WriteError),
    }
}
