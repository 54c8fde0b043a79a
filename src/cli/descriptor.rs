//! Command descriptors.
//!
//! A [`CommandDescriptor`] is the static description of one subcommand: its
//! name, help text, argument schema, and the [`Handler`] that runs it.

use super::args::{ArgumentKind, ArgumentSpec, ParsedArgs};
use super::result::CommandResult;
use crate::error::RegistryError;

/// Function that performs a command's work.
pub type Handler = fn(&ParsedArgs) -> CommandResult;

/// Names of the logging switches every command accepts.
pub(crate) const LOGGING_SWITCHES: &[&str] = &["verbose", "v", "quiet", "q"];

/// Names reserved for the built-in help and logging switches.
pub(crate) const RESERVED_NAMES: &[&str] = &["help", "h", "verbose", "v", "quiet", "q"];

/// Static description of one subcommand.
#[derive(Clone)]
pub struct CommandDescriptor {
    name: String,
    summary: String,
    description: Option<String>,
    examples: Vec<String>,
    arguments: Vec<ArgumentSpec>,
    handler: Handler,
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

impl CommandDescriptor {
    /// Create a descriptor with no arguments.
    pub fn new(name: impl Into<String>, summary: impl Into<String>, handler: Handler) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
            description: None,
            examples: Vec::new(),
            arguments: Vec::new(),
            handler,
        }
    }

    /// Set the long description shown in command help.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Add a usage example shown in command help.
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    /// Append an argument to the schema.
    pub fn arg(mut self, spec: ArgumentSpec) -> Self {
        self.arguments.push(spec);
        self
    }

    /// The command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line summary.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Long description, if set.
    pub fn long_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Usage examples.
    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    /// Argument schema in declaration order.
    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    /// The handler function.
    pub fn handler(&self) -> Handler {
        self.handler
    }

    /// Find the spec whose flag or alias is `name`.
    pub fn find_argument(&self, name: &str) -> Option<&ArgumentSpec> {
        self.arguments.iter().find(|spec| spec.matches(name))
    }

    /// Check the structural rules every registered descriptor must satisfy.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidDescriptor {
            command: self.name.clone(),
            reason,
        };

        if self.name.is_empty() {
            return Err(invalid("name cannot be empty".to_string()));
        }
        if self.name.chars().any(char::is_whitespace) {
            return Err(invalid("name cannot contain whitespace".to_string()));
        }
        if self.name.chars().any(char::is_uppercase) {
            return Err(invalid("name must be lowercase".to_string()));
        }
        if self.name.starts_with('-') {
            return Err(invalid("name cannot start with '-'".to_string()));
        }

        let mut seen: Vec<&str> = Vec::new();
        for spec in &self.arguments {
            for name in spec.names() {
                if name.is_empty() || name.starts_with('-') || name.contains('=') {
                    return Err(invalid(format!(
                        "'{}' is not a valid flag or alias name",
                        name
                    )));
                }
                if RESERVED_NAMES.contains(&name) {
                    return Err(invalid(format!("'{}' is reserved", name)));
                }
                if seen.contains(&name) {
                    return Err(invalid(format!("'{}' is declared more than once", name)));
                }
                seen.push(name);
            }

            if spec.kind() == ArgumentKind::Choice {
                if spec.choices().is_empty() {
                    return Err(invalid(format!(
                        "'--{}' is a choice with no choices",
                        spec.flag_name()
                    )));
                }
                if let Some(default) = spec.get_default().and_then(|d| d.as_str()) {
                    if !spec.choices().iter().any(|c| c == default) {
                        return Err(invalid(format!(
                            "default '{}' for '--{}' is not one of its choices",
                            default,
                            spec.flag_name()
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
