//! Error types for rust-dbpack

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for schema model and metadata operations
pub type Result<T> = std::result::Result<T, DbPackError>;

/// Errors that can occur while compiling a schema description
#[derive(Error, Debug)]
pub enum DbPackError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Unsupported data type {data_type} for column {column}")]
    UnsupportedType { column: String, data_type: String },

    #[error("Dictionary state error: {message}")]
    State { message: String },

    #[error("Field '{field}' has no value for dictionary table {table}")]
    MissingField { table: String, field: String },

    #[error("Failed to read schema file: {path}")]
    SchemaFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse schema file: {path}")]
    SchemaFileParse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Invalid schema file {path}: {message}")]
    InvalidSchemaFile { path: PathBuf, message: String },

    #[error("Failed to write output to {path}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ZIP creation error: {message}")]
    Zip { message: String },
}

impl DbPackError {
    pub fn validation(message: impl Into<String>) -> Self {
        DbPackError::Validation {
            message: message.into(),
        }
    }

    pub fn state(message: impl Into<String>) -> Self {
        DbPackError::State {
            message: message.into(),
        }
    }
}

impl From<zip::result::ZipError> for DbPackError {
    fn from(err: zip::result::ZipError) -> Self {
        DbPackError::Zip {
            message: err.to_string(),
        }
    }
}
