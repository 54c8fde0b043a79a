//! Error types for Excelsior.
//!
//! This module defines [`ExcelsiorError`], the crate-level error type, plus
//! the two error families raised by the dispatch core:
//!
//! - [`RegistryError`] - startup misconfiguration and command lookup failures
//! - [`ArgumentError`] - user input errors found while resolving arguments
//!
//! # Error Handling Strategy
//!
//! - Registry errors are fatal at startup; a duplicate registration is never
//!   silently dropped
//! - Argument errors always become a user-facing message and exit code 2
//! - Handlers report their own failures through
//!   [`CommandResult::Failure`](crate::cli::CommandResult)
//! - Use `anyhow::Error` (via `ExcelsiorError::Other`) for unexpected errors

use thiserror::Error;

/// Errors raised while building or querying the command registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A command with this name was already registered.
    #[error("command '{name}' is already registered")]
    DuplicateCommand { name: String },

    /// No command with this name exists.
    #[error("unknown command '{name}'")]
    UnknownCommand {
        name: String,
        /// Registered names close to the requested one, nearest first.
        suggestions: Vec<String>,
    },

    /// The descriptor violates a structural rule (name format, flag clash).
    #[error("invalid command '{command}': {reason}")]
    InvalidDescriptor { command: String, reason: String },
}

/// Errors raised while resolving command-line tokens against a schema.
///
/// Each variant that originates from a concrete token carries the token's
/// zero-based position among the tokens following the command name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// The option name matches no flag or alias.
    #[error("unknown argument '{token}'")]
    UnknownArgument { token: String, position: usize },

    /// A CHOICE value is not one of the declared choices.
    #[error(
        "invalid value '{value}' for '--{flag}' (possible values: {})",
        .choices.join(", ")
    )]
    InvalidChoice {
        flag: String,
        value: String,
        choices: Vec<String>,
        position: usize,
    },

    /// A required flag has neither an input value nor a default.
    #[error("missing required argument '--{flag}'")]
    MissingArgument { flag: String },

    /// A token that is not an option and is not consumed as a value.
    #[error("unexpected argument '{token}'")]
    UnexpectedArgument { token: String, position: usize },

    /// An option that takes a value appeared last with nothing after it.
    #[error("argument '--{flag}' expects a value")]
    MissingValue { flag: String, position: usize },

    /// The value failed the syntactic check for its kind.
    #[error("invalid value '{value}' for '--{flag}': {reason}")]
    InvalidValue {
        flag: String,
        value: String,
        reason: String,
        position: usize,
    },
}

impl ArgumentError {
    /// Position of the offending token, if the error came from one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::UnknownArgument { position, .. }
            | Self::InvalidChoice { position, .. }
            | Self::UnexpectedArgument { position, .. }
            | Self::MissingValue { position, .. }
            | Self::InvalidValue { position, .. } => Some(*position),
            Self::MissingArgument { .. } => None,
        }
    }
}

/// Core error type for Excelsior operations.
#[derive(Debug, Error)]
pub enum ExcelsiorError {
    /// Command registry failure.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Argument resolution failure.
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Excelsior operations.
pub type Result<T> = std::result::Result<T, ExcelsiorError>;
