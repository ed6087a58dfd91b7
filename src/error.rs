//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, codec, and config errors, and provides semantic variants
//! for argument validation, encoding and report failures.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode {path}: {detail}")]
    Encode { path: PathBuf, detail: String },

    #[error("Unsupported output format for {path} (expected .jpg, .jpeg or .png)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Size must be greater than 0, got: {width}x{height}")]
    ZeroSize { width: usize, height: usize },

    #[error("failed to write report {path}: {detail}")]
    Report { path: PathBuf, detail: String },

    #[error("External error: {0}")]
    External(String),
}

impl Error {
    pub fn external<E: std::fmt::Display>(e: E) -> Self {
        Error::External(e.to_string())
    }
}
