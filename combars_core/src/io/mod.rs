//! Module for reading and writing topology catalogs and rendered models
pub mod json;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IoError {
    #[error("file not found or unreadable")]
    FileNotFound,
    #[error("catalog could not be deserialized")]
    DeserializeError,
    #[error("catalog could not be serialized")]
    SerializeError,
    #[error("file could not be written")]
    WriteError,
}
