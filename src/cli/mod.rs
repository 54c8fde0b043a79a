//! Command registry and dispatch.
//!
//! # Architecture
//!
//! - [`args`] - Argument schema ([`ArgumentSpec`]) and resolved values ([`ParsedArgs`])
//! - [`commands`] - Built-in command descriptors and their handlers
//! - [`descriptor`] - Static command metadata and handler reference
//! - [`registry`] - Name-to-descriptor mapping built once at startup
//! - [`resolver`] - Token validation and coercion against a schema
//! - [`dispatcher`] - Entry point mapping argv to a handler and an exit code
//! - [`help`] - Usage and help rendering
//! - [`suggest`] - Nearest-name suggestions for unknown commands

pub mod args;
pub mod commands;
pub mod descriptor;
pub mod dispatcher;
pub mod help;
pub mod registry;
pub mod resolver;
pub mod result;
pub mod suggest;

pub use args::{ArgValue, ArgumentKind, ArgumentSpec, ParsedArgs};
pub use descriptor::{CommandDescriptor, Handler};
pub use dispatcher::{DispatchOutcome, Dispatcher, EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE};
pub use registry::CommandRegistry;
pub use resolver::{option_positions, resolve};
pub use result::{CommandResult, ErrorKind};
