//! Handler outcomes.

use std::fmt;

/// Category of a handler failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Arguments resolved but their combination or content is invalid.
    InvalidInput,
    /// A referenced file or directory does not exist.
    NotFound,
    /// Input data could not be loaded or interpreted.
    DataLoad,
    /// The per-sheet configuration is malformed or inconsistent.
    SheetConfig,
    /// Reading or writing the filesystem failed.
    Io,
    /// The handler faulted unexpectedly.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidInput => write!(f, "InvalidInput"),
            ErrorKind::NotFound => write!(f, "NotFound"),
            ErrorKind::DataLoad => write!(f, "DataLoadError"),
            ErrorKind::SheetConfig => write!(f, "SheetConfigError"),
            ErrorKind::Io => write!(f, "IoError"),
            ErrorKind::Internal => write!(f, "InternalError"),
        }
    }
}

/// Result of running a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// The command completed; the message, if any, is shown to the user.
    Success { message: Option<String> },
    /// The command failed.
    Failure { kind: ErrorKind, message: String },
}

impl CommandResult {
    /// A successful result with nothing to report.
    pub fn success() -> Self {
        Self::Success { message: None }
    }

    /// A successful result with a message.
    pub fn success_with(message: impl Into<String>) -> Self {
        Self::Success {
            message: Some(message.into()),
        }
    }

    /// A failed result.
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    /// Whether this is a `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Process exit code for this result.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success { .. } => 0,
            Self::Failure { .. } => 1,
        }
    }
}
