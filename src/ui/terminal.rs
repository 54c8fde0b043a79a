//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{should_use_colors, ExcelsiorTheme, OutputMode, UserInterface};

/// Terminal UI implementation.
///
/// Help text and results go to stdout; errors and hints go to
/// stderr so they never mix with piped output.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: ExcelsiorTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode, color: bool) -> Self {
        let theme = if color && should_use_colors() {
            ExcelsiorTheme::new()
        } else {
            ExcelsiorTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn hint(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_hint(msg)).ok();
    }

    fn show_text(&mut self, text: &str) {
        writeln!(self.out, "{}", text).ok();
    }
}

/// Create the UI for this process.
pub fn create_ui(mode: OutputMode, color: bool) -> Box<dyn UserInterface> {
    if !color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    Box::new(TerminalUI::new(mode, color))
}
