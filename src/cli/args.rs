//! Argument schema and resolved values.
//!
//! An [`ArgumentSpec`] declares one option a command accepts. The resolver
//! turns raw tokens into [`ParsedArgs`], a map from canonical flag name to
//! [`ArgValue`].

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// How a raw token is coerced into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    /// Free-form text.
    String,
    /// A filesystem path, checked syntactically only.
    Path,
    /// A boolean switch that takes no separate value.
    Flag,
    /// One of a fixed set of strings, matched case-sensitively.
    Choice,
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentKind::String => write!(f, "string"),
            ArgumentKind::Path => write!(f, "path"),
            ArgumentKind::Flag => write!(f, "flag"),
            ArgumentKind::Choice => write!(f, "choice"),
        }
    }
}

/// A resolved argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    String(String),
    Path(PathBuf),
    Flag(bool),
    Choice(String),
}

impl ArgValue {
    /// Text form, for `String` and `Choice` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Choice(s) => Some(s),
            _ => None,
        }
    }

    /// Path form, for `Path` values.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Boolean form, for `Flag` values.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::Choice(s) => write!(f, "{}", s),
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Flag(b) => write!(f, "{}", b),
        }
    }
}

/// Declaration of one option accepted by a command.
///
/// Built with the kind-specific constructors and chained modifiers:
///
/// ```
/// use excelsior::cli::{ArgumentKind, ArgumentSpec};
///
/// let spec = ArgumentSpec::choice("format", ["csv", "xlsx", "json"])
///     .alias("F")
///     .default_value("csv")
///     .help("Output format");
///
/// assert_eq!(spec.kind(), ArgumentKind::Choice);
/// assert!(spec.matches("F"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    flag: String,
    aliases: Vec<String>,
    kind: ArgumentKind,
    required: bool,
    default: Option<ArgValue>,
    choices: Vec<String>,
    help: String,
    value_name: Option<String>,
}

impl ArgumentSpec {
    fn new(flag: impl Into<String>, kind: ArgumentKind) -> Self {
        Self {
            flag: flag.into(),
            aliases: Vec::new(),
            kind,
            required: false,
            default: None,
            choices: Vec::new(),
            help: String::new(),
            value_name: None,
        }
    }

    /// A free-form text option.
    pub fn string(flag: impl Into<String>) -> Self {
        Self::new(flag, ArgumentKind::String)
    }

    /// A path option.
    pub fn path(flag: impl Into<String>) -> Self {
        Self::new(flag, ArgumentKind::Path)
    }

    /// A boolean switch.
    pub fn flag(flag: impl Into<String>) -> Self {
        Self::new(flag, ArgumentKind::Flag)
    }

    /// An option restricted to `choices`.
    pub fn choice<I, S>(flag: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = Self::new(flag, ArgumentKind::Choice);
        spec.choices = choices.into_iter().map(Into::into).collect();
        spec
    }

    /// Add an alternative name, written without leading dashes.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Mark the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default, coerced according to the option's kind.
    ///
    /// Flags accept `"true"`; anything else is `false`.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        let raw = value.into();
        self.default = Some(match self.kind {
            ArgumentKind::String => ArgValue::String(raw),
            ArgumentKind::Path => ArgValue::Path(PathBuf::from(raw)),
            ArgumentKind::Flag => ArgValue::Flag(raw == "true"),
            ArgumentKind::Choice => ArgValue::Choice(raw),
        });
        self
    }

    /// Set the description shown in command help.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Set the placeholder shown in help (defaults to the upper-cased flag).
    pub fn value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = Some(name.into());
        self
    }

    /// Canonical flag name, without leading dashes.
    pub fn flag_name(&self) -> &str {
        &self.flag
    }

    /// Alternative names, without leading dashes.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The declared value kind.
    pub fn kind(&self) -> ArgumentKind {
        self.kind
    }

    /// Whether the option must resolve to a value.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The declared default, if any.
    pub fn get_default(&self) -> Option<&ArgValue> {
        self.default.as_ref()
    }

    /// Valid values for a CHOICE option, in declaration order.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Help text.
    pub fn help_text(&self) -> &str {
        &self.help
    }

    /// Placeholder for the value in help output.
    pub fn placeholder(&self) -> String {
        self.value_name
            .clone()
            .unwrap_or_else(|| self.flag.to_uppercase().replace('-', "_"))
    }

    /// Whether `name` is the flag or one of its aliases.
    pub fn matches(&self, name: &str) -> bool {
        self.flag == name || self.aliases.iter().any(|a| a == name)
    }

    /// The flag followed by all aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.flag.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Values resolved for one invocation, keyed by canonical flag name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    values: HashMap<String, ArgValue>,
}

impl ParsedArgs {
    /// Create an empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any earlier one.
    pub fn insert(&mut self, flag: impl Into<String>, value: ArgValue) {
        self.values.insert(flag.into(), value);
    }

    /// Get the raw value for a flag.
    pub fn get(&self, flag: &str) -> Option<&ArgValue> {
        self.values.get(flag)
    }

    /// Whether a value was resolved for `flag`.
    pub fn contains(&self, flag: &str) -> bool {
        self.values.contains_key(flag)
    }

    /// Text of a `String` or `Choice` value.
    pub fn string(&self, flag: &str) -> Option<&str> {
        self.get(flag).and_then(ArgValue::as_str)
    }

    /// A `Path` value.
    pub fn path(&self, flag: &str) -> Option<&Path> {
        self.get(flag).and_then(ArgValue::as_path)
    }

    /// A `Flag` value; absent switches read as `false`.
    pub fn flag(&self, flag: &str) -> bool {
        self.get(flag).and_then(ArgValue::as_bool).unwrap_or(false)
    }

    /// Number of resolved values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values were resolved.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
