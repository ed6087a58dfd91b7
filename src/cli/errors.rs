use std::path::PathBuf;

use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid {arg} parameter: {value}. Must be a positive integer or WxH")]
    InvalidSize { arg: &'static str, value: String },

    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("Could not read image {path:?}")]
    Unreadable { path: PathBuf },

    #[error(transparent)]
    Enhance(#[from] xrenhance::Error),
}
