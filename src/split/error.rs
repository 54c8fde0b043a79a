//! Errors raised while splitting a file.

use std::path::PathBuf;

use thiserror::Error;

use crate::cli::ErrorKind;

/// Supported input extensions, lowercase with the leading dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".xlsx", ".xls", ".csv"];

/// Error type for the split command.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The argument combination is invalid.
    #[error("{0}")]
    InvalidInput(String),

    /// The input file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The input path exists but is not a regular file.
    #[error("Path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The input extension is not one of [`SUPPORTED_EXTENSIONS`].
    #[error(
        "Unsupported file format: {extension}. Supported formats: {}",
        SUPPORTED_EXTENSIONS.join(", ")
    )]
    UnsupportedFormat { extension: String },

    /// The input data could not be loaded or interpreted.
    #[error("{0}")]
    DataLoad(String),

    /// The sheet configuration is invalid or incomplete.
    #[error("{0}")]
    SheetConfig(String),

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SplitError {
    /// The failure category reported to the dispatcher.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) | Self::UnsupportedFormat { .. } | Self::NotAFile(_) => {
                ErrorKind::InvalidInput
            }
            Self::FileNotFound(_) => ErrorKind::NotFound,
            Self::DataLoad(_) | Self::Csv(_) => ErrorKind::DataLoad,
            Self::SheetConfig(_) => ErrorKind::SheetConfig,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}
