//! Built-in commands.
//!
//! Each command module exposes a `descriptor()` carrying its argument schema
//! and a `handle` function the dispatcher calls with resolved arguments.

pub mod split;

use super::descriptor::CommandDescriptor;

/// Descriptors for every built-in command, in help order.
pub fn builtin_commands() -> Vec<CommandDescriptor> {
    vec![split::descriptor()]
}
