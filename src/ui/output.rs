//! Output verbosity mode.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show everything, including debug logging.
    Verbose,
    /// Show status and results.
    #[default]
    Normal,
    /// Show nothing except errors and requested help text.
    Quiet,
}

impl OutputMode {
    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Default log filter directive for this mode.
    pub fn log_directive(&self) -> &'static str {
        match self {
            Self::Verbose => "excelsior=debug",
            Self::Normal => "excelsior=info",
            Self::Quiet => "excelsior=error",
        }
    }
}
