//! Process settings.
//!
//! Global options are the leading tokens before the command name:
//!
//! - `-v`, `--verbose` - debug logging
//! - `-q`, `--quiet` - errors only
//! - `--no-color` - plain output
//!
//! The logging switches may also follow the command name, anywhere a
//! command option could stand.
//!
//! Environment:
//!
//! - `EXCELSIOR_LOG` - log filter directive, overrides `RUST_LOG`
//! - `NO_COLOR` - disables colors when set

use thiserror::Error;

use crate::cli::{option_positions, CommandDescriptor};
use crate::ui::OutputMode;

/// Environment variable holding a log filter directive.
pub const LOG_ENV: &str = "EXCELSIOR_LOG";

/// Errors in the global options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Cannot use --verbose and --quiet together")]
    VerboseAndQuiet,
}

/// Settings resolved from global options and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Output verbosity.
    pub mode: OutputMode,
    /// Whether colored output is allowed.
    pub color: bool,
    /// Explicit log filter from the environment, if any.
    pub log_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: OutputMode::Normal,
            color: true,
            log_filter: None,
        }
    }
}

impl Settings {
    /// Strip leading global options from `argv`.
    ///
    /// Returns the settings and the remaining tokens, starting at the command
    /// name. Environment variables are not consulted; see [`Settings::with_env`].
    pub fn from_args(argv: &[String]) -> Result<(Self, &[String]), SettingsError> {
        let mut settings = Self::default();
        let mut verbose = false;
        let mut quiet = false;
        let mut consumed = 0;

        for token in argv {
            match token.as_str() {
                "-v" | "--verbose" => verbose = true,
                "-q" | "--quiet" => quiet = true,
                "--no-color" => settings.color = false,
                _ => break,
            }
            consumed += 1;
        }

        settings.mode = mode_for(verbose, quiet)?;
        Ok((settings, &argv[consumed..]))
    }

    /// Apply logging switches given after the command name.
    ///
    /// `tokens` are the command's arguments. Only tokens in option position
    /// count, so a switch given as an option's value is left alone.
    pub fn with_command_switches(
        mut self,
        descriptor: &CommandDescriptor,
        tokens: &[String],
    ) -> Result<Self, SettingsError> {
        let mut verbose = self.mode == OutputMode::Verbose;
        let mut quiet = self.mode == OutputMode::Quiet;

        for (_, token) in option_positions(descriptor, tokens) {
            match token {
                "-v" | "--verbose" => verbose = true,
                "-q" | "--quiet" => quiet = true,
                _ => {}
            }
        }

        self.mode = mode_for(verbose, quiet)?;
        Ok(self)
    }

    /// Apply `NO_COLOR` and `EXCELSIOR_LOG` from the process environment.
    pub fn with_env(mut self) -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            self.color = false;
        }
        self.log_filter = std::env::var(LOG_ENV).ok().filter(|v| !v.trim().is_empty());
        self
    }

    /// The log filter directive to install.
    ///
    /// `--verbose` and `--quiet` win over the environment; otherwise
    /// `EXCELSIOR_LOG` is used, and `None` means fall back to `RUST_LOG`.
    pub fn log_directive(&self) -> Option<String> {
        match self.mode {
            OutputMode::Verbose | OutputMode::Quiet => Some(self.mode.log_directive().to_string()),
            OutputMode::Normal => self.log_filter.clone(),
        }
    }
}

fn mode_for(verbose: bool, quiet: bool) -> Result<OutputMode, SettingsError> {
    match (verbose, quiet) {
        (true, true) => Err(SettingsError::VerboseAndQuiet),
        (true, false) => Ok(OutputMode::Verbose),
        (false, true) => Ok(OutputMode::Quiet),
        (false, false) => Ok(OutputMode::Normal),
    }
}
