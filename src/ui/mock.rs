//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all output
//! for later assertion.
//!
//! # Example
//!
//! ```
//! use excelsior::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.success("Wrote 2 files");
//! ui.error("File not found: a.csv");
//!
//! assert!(ui.has_success("2 files"));
//! assert!(ui.has_error("not found"));
//! ```

use super::{OutputMode, UserInterface};

/// Mock UI implementation for testing.
///
/// Records every call regardless of output mode so tests can assert on what
/// was requested.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    successes: Vec<String>,
    errors: Vec<String>,
    hints: Vec<String>,
    texts: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured hints.
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Get all captured help/usage text blocks.
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific hint was shown.
    pub fn has_hint(&self, msg: &str) -> bool {
        self.hints.iter().any(|m| m.contains(msg))
    }

    /// Check if a text block containing `text` was shown.
    pub fn has_text(&self, text: &str) -> bool {
        self.texts.iter().any(|t| t.contains(text))
    }

    /// Whether nothing at all was written.
    pub fn is_silent(&self) -> bool {
        self.successes.is_empty()
            && self.errors.is_empty()
            && self.hints.is_empty()
            && self.texts.is_empty()
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn hint(&mut self, msg: &str) {
        self.hints.push(msg.to_string());
    }

    fn show_text(&mut self, text: &str) {
        self.texts.push(text.to_string());
    }
}
