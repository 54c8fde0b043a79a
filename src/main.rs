//! Excelsior CLI entry point.

use std::process::ExitCode;

use anyhow::Context;
use excelsior::cli::{CommandRegistry, Dispatcher, EXIT_FAILURE, EXIT_USAGE};
use excelsior::config::{Settings, SettingsError};
use excelsior::ui::create_ui;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--verbose` / `--quiet` flags
/// 2. `EXCELSIOR_LOG` environment variable (if set)
/// 3. `RUST_LOG` environment variable (if set)
/// 4. Default is INFO
fn init_tracing(settings: &Settings) {
    let filter = match settings.log_directive() {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("excelsior=info")),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(settings.color)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn build_dispatcher() -> excelsior::Result<Dispatcher> {
    let registry = CommandRegistry::builtin()?;
    Ok(Dispatcher::new(registry))
}

/// Fold in logging switches given after a known command name.
fn command_settings(
    settings: Settings,
    dispatcher: Option<&Dispatcher>,
    rest: &[String],
) -> Result<Settings, SettingsError> {
    let Some((name, tokens)) = rest.split_first() else {
        return Ok(settings);
    };
    match dispatcher.and_then(|d| d.registry().lookup(name).ok()) {
        Some(descriptor) => settings.with_command_switches(descriptor, tokens),
        None => Ok(settings),
    }
}

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let dispatcher = build_dispatcher().context("failed to register built-in commands");

    let settings = Settings::from_args(&argv).and_then(|(settings, rest)| {
        command_settings(settings, dispatcher.as_ref().ok(), rest).map(|s| (s, rest))
    });
    let (settings, rest) = match settings {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(EXIT_USAGE as u8);
        }
    };
    let settings = settings.with_env();
    init_tracing(&settings);

    tracing::debug!("Excelsior starting with args: {:?}", argv);

    let mut ui = create_ui(settings.mode, settings.color);

    let dispatcher = match dispatcher {
        Ok(d) => d,
        Err(e) => {
            ui.error(&format!("Error: {:#}", e));
            return ExitCode::from(EXIT_FAILURE as u8);
        }
    };

    let code = dispatcher.run(rest, ui.as_mut());
    ExitCode::from(code as u8)
}
