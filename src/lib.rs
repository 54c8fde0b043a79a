//! Excelsior - spreadsheet utilities behind a single command-line entry point.
//!
//! Subcommands are described by static [`cli::CommandDescriptor`]s collected
//! in a [`cli::CommandRegistry`]. The [`cli::Dispatcher`] resolves the command
//! name and its arguments, runs the handler, and maps the outcome to an exit
//! code: 0 on success, 1 when a command fails, 2 for usage errors.
//!
//! # Modules
//!
//! - [`cli`] - Command registry, argument resolution, and dispatch
//! - [`config`] - Global options and environment settings
//! - [`error`] - Error types and result aliases
//! - [`split`] - Splitting CSV files by date period
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use excelsior::cli::{
//!     ArgumentSpec, CommandDescriptor, CommandRegistry, CommandResult, Dispatcher, ParsedArgs,
//! };
//! use excelsior::ui::MockUI;
//!
//! fn greet(args: &ParsedArgs) -> CommandResult {
//!     CommandResult::success_with(format!("hello {}", args.string("name").unwrap_or("world")))
//! }
//!
//! let mut registry = CommandRegistry::new();
//! registry
//!     .register(CommandDescriptor::new("greet", "Say hello", greet).arg(ArgumentSpec::string("name")))
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(registry);
//! let mut ui = MockUI::new();
//! let argv = vec!["greet".to_string(), "--name".to_string(), "ada".to_string()];
//! assert_eq!(dispatcher.run(&argv, &mut ui), 0);
//! assert!(ui.has_success("hello ada"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod split;
pub mod ui;

pub use error::{ExcelsiorError, Result};
