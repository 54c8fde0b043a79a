//! Command registry.
//!
//! The [`CommandRegistry`] stores every available command and provides
//! methods for registering, looking up, and iterating over them. It is built
//! once at startup and handed to the [`Dispatcher`](super::Dispatcher) by
//! value; nothing registers commands after dispatch begins.

use std::collections::HashMap;

use super::descriptor::CommandDescriptor;
use super::suggest::suggest;
use crate::error::RegistryError;

/// Registry of all available commands.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all built-in commands.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for descriptor in super::commands::builtin_commands() {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Register a command.
    ///
    /// Fails if the name is taken (the existing command stays registered) or
    /// the descriptor is malformed.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistryError> {
        descriptor.validate()?;
        if self.index.contains_key(descriptor.name()) {
            return Err(RegistryError::DuplicateCommand {
                name: descriptor.name().to_string(),
            });
        }
        tracing::debug!("Registered command: {}", descriptor.name());
        self.index
            .insert(descriptor.name().to_string(), self.commands.len());
        self.commands.push(descriptor);
        Ok(())
    }

    /// Get a command by name.
    pub fn lookup(&self, name: &str) -> Result<&CommandDescriptor, RegistryError> {
        self.index
            .get(name)
            .map(|&i| &self.commands[i])
            .ok_or_else(|| RegistryError::UnknownCommand {
                name: name.to_string(),
                suggestions: suggest(name, self.names()),
            })
    }

    /// Iterate over all commands in registration order.
    pub fn list_all(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter()
    }

    /// Iterate over command names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(CommandDescriptor::name)
    }

    /// Get the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
