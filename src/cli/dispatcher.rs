//! Command dispatching.
//!
//! The [`Dispatcher`] is the top-level entry point: it picks the command
//! named by the first token, resolves the remaining tokens against that
//! command's schema, runs the handler, and maps the outcome to an exit code.
//!
//! ```text
//! START -> PARSING_COMMAND -> PARSING_ARGS -> EXECUTING -> SUCCESS | FAILURE
//!                          \-> COMMAND_NOT_FOUND
//! ```
//!
//! Every terminal state is a [`DispatchOutcome`] variant with a fixed exit
//! code. Nothing a handler does, including panicking, escapes `run`.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use super::descriptor::CommandDescriptor;
use super::help;
use super::registry::CommandRegistry;
use super::resolver::{option_positions, resolve};
use super::result::{CommandResult, ErrorKind};
use crate::error::{ArgumentError, RegistryError};
use crate::ui::UserInterface;

/// Exit code for success and requested help.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for a handler-reported failure.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for usage and argument errors.
pub const EXIT_USAGE: i32 = 2;

/// Terminal state of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No command was given; usage was printed.
    MissingCommand,
    /// Global or command help was printed, or the version.
    HelpShown,
    /// A leading option is not a known global option.
    UnknownOption { token: String },
    /// The first token names no registered command.
    CommandNotFound(RegistryError),
    /// The command exists but its arguments were rejected.
    ArgumentsRejected {
        command: String,
        error: ArgumentError,
    },
    /// The handler ran (or panicked) and produced this result.
    Executed {
        command: String,
        result: CommandResult,
    },
}

impl DispatchOutcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::HelpShown => EXIT_SUCCESS,
            Self::MissingCommand
            | Self::UnknownOption { .. }
            | Self::CommandNotFound(_)
            | Self::ArgumentsRejected { .. } => EXIT_USAGE,
            Self::Executed { result, .. } => result.exit_code(),
        }
    }
}

/// Routes argv to registered command handlers.
pub struct Dispatcher {
    registry: CommandRegistry,
}

impl Dispatcher {
    /// Create a dispatcher over a fully built registry.
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    /// The registry commands are dispatched from.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Dispatch `argv` (without the program name) and return the exit code.
    pub fn run(&self, argv: &[String], ui: &mut dyn UserInterface) -> i32 {
        let outcome = self.dispatch(argv, ui);
        tracing::debug!("Dispatch finished: {:?}", outcome);
        outcome.exit_code()
    }

    /// Dispatch `argv` and return the terminal state, reporting it on `ui`.
    pub fn dispatch(&self, argv: &[String], ui: &mut dyn UserInterface) -> DispatchOutcome {
        let Some((first, rest)) = argv.split_first() else {
            ui.show_text(&help::usage(&self.registry));
            return DispatchOutcome::MissingCommand;
        };

        match first.as_str() {
            "--help" | "-h" => {
                ui.show_text(&help::global_help(&self.registry));
                return DispatchOutcome::HelpShown;
            }
            "--version" | "-V" => {
                ui.show_text(&format!("{} {}", help::PROGRAM, env!("CARGO_PKG_VERSION")));
                return DispatchOutcome::HelpShown;
            }
            option if option.starts_with('-') => {
                ui.error(&format!("unexpected option '{}'", option));
                ui.hint(&format!("Run '{} --help' for usage.", help::PROGRAM));
                return DispatchOutcome::UnknownOption {
                    token: option.to_string(),
                };
            }
            _ => {}
        }

        let descriptor = match self.registry.lookup(first) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                report_unknown_command(&err, ui);
                return DispatchOutcome::CommandNotFound(err);
            }
        };

        let wants_help = option_positions(descriptor, rest)
            .into_iter()
            .any(|(_, token)| token == "--help" || token == "-h");
        if wants_help {
            ui.show_text(&help::command_help(descriptor));
            return DispatchOutcome::HelpShown;
        }

        let args = match resolve(descriptor, rest) {
            Ok(args) => args,
            Err(error) => {
                ui.error(&format!("{}: {}", descriptor.name(), error));
                ui.hint(&format!("Usage: {}", help::command_usage(descriptor)));
                return DispatchOutcome::ArgumentsRejected {
                    command: descriptor.name().to_string(),
                    error,
                };
            }
        };

        tracing::debug!("Executing '{}' with {:?}", descriptor.name(), args);
        let result = execute(descriptor, &args);
        match &result {
            CommandResult::Success { message: Some(message) } => ui.success(message),
            CommandResult::Success { message: None } => {}
            CommandResult::Failure { kind, message } => {
                ui.error(&format!("{}: {} ({})", descriptor.name(), message, kind));
            }
        }

        DispatchOutcome::Executed {
            command: descriptor.name().to_string(),
            result,
        }
    }
}

thread_local! {
    static IN_HANDLER: Cell<bool> = const { Cell::new(false) };
}

static PANIC_HOOK: Once = Once::new();

/// Wrap the process panic hook, once, so that panics raised inside a handler
/// on the current thread are not reported twice. Panics elsewhere still reach
/// the previous hook.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !IN_HANDLER.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// Clears the in-handler flag when dropped, including during unwinding.
struct HandlerScope;

impl HandlerScope {
    fn enter() -> Self {
        IN_HANDLER.with(|flag| flag.set(true));
        Self
    }
}

impl Drop for HandlerScope {
    fn drop(&mut self) {
        IN_HANDLER.with(|flag| flag.set(false));
    }
}

/// Run the handler, converting a panic into an `InternalError` failure.
fn execute(descriptor: &CommandDescriptor, args: &super::args::ParsedArgs) -> CommandResult {
    let handler = descriptor.handler();

    install_panic_hook();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let _scope = HandlerScope::enter();
        handler(args)
    }));

    outcome.unwrap_or_else(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        tracing::error!("Handler for '{}' panicked: {}", descriptor.name(), detail);
        CommandResult::failure(
            ErrorKind::Internal,
            format!("internal error while running '{}': {}", descriptor.name(), detail),
        )
    })
}

fn report_unknown_command(err: &RegistryError, ui: &mut dyn UserInterface) {
    let RegistryError::UnknownCommand { name, suggestions } = err else {
        ui.error(&err.to_string());
        return;
    };

    ui.error(&format!("unknown command '{}'", name));
    match suggestions.as_slice() {
        [] => {}
        [only] => ui.hint(&format!("Did you mean '{}'?", only)),
        many => ui.hint(&format!(
            "Did you mean one of: {}?",
            many.iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
    ui.hint(&format!(
        "Run '{} --help' to see available commands.",
        help::PROGRAM
    ));
}
