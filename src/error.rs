use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum AneelError {
    #[error("invalid dataset id: {0}")]
    InvalidDatasetId(String),

    #[error("catalog request failed: {0}")]
    CatalogHttp(String),

    #[error("catalog returned status {status}: {message}")]
    CatalogStatus { status: u16, message: String },

    #[error("catalog does not know dataset: {0}")]
    DatasetUnknown(String),

    #[error("resource url has no usable filename: {0}")]
    InvalidResourceUrl(String),

    #[error("download failed: {0}")]
    FetchHttp(String),

    #[error("download returned status {status}: {message}")]
    FetchStatus { status: u16, message: String },

    #[error("failed to decode {path}: {message}")]
    Decode { path: String, message: String },

    #[error("dataset not cached: {0}")]
    DatasetNotFound(String),

    #[error("no loss dataset in cache")]
    LossDatasetNotFound,

    #[error("required column missing: {0}")]
    MissingColumn(String),

    #[error("column {column} is not numeric at row {row}")]
    ColumnNotNumeric { column: String, row: usize },

    #[error("page request failed: {0}")]
    PageHttp(String),

    #[error("page returned status {status}: {message}")]
    PageStatus { status: u16, message: String },

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("server error: {0}")]
    Server(String),
}
