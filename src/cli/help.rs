//! Usage and help text rendering.

use std::fmt::Write;

use super::args::{ArgValue, ArgumentKind, ArgumentSpec};
use super::descriptor::CommandDescriptor;
use super::registry::CommandRegistry;

/// Program name shown in usage lines.
pub const PROGRAM: &str = "excelsior";

const ABOUT: &str = "A CLI tool for Excel and CSV file operations";

/// Global options, as (names, description) rows.
const GLOBAL_OPTIONS: &[(&str, &str)] = &[
    ("-v, --verbose", "Enable detailed logging output"),
    ("-q, --quiet", "Suppress all but error messages"),
    ("    --no-color", "Disable colored output"),
    ("-h, --help", "Print help"),
    ("-V, --version", "Print version"),
];

/// The short usage block printed when no command is given.
pub fn usage(registry: &CommandRegistry) -> String {
    let mut out = String::new();
    writeln!(out, "Usage: {} [OPTIONS] <COMMAND> [ARGS]...", PROGRAM).ok();
    writeln!(out).ok();
    write_commands(&mut out, registry);
    writeln!(out).ok();
    write!(
        out,
        "Run '{} --help' for more information.",
        PROGRAM
    )
    .ok();
    out
}

/// Full help listing every registered command.
pub fn global_help(registry: &CommandRegistry) -> String {
    let mut out = String::new();
    writeln!(out, "{} - {}", PROGRAM, ABOUT).ok();
    writeln!(out).ok();
    writeln!(out, "Usage: {} [OPTIONS] <COMMAND> [ARGS]...", PROGRAM).ok();
    writeln!(out).ok();
    write_commands(&mut out, registry);
    writeln!(out).ok();
    writeln!(out, "Options:").ok();
    write_rows(
        &mut out,
        GLOBAL_OPTIONS
            .iter()
            .map(|(names, help)| (names.to_string(), help.to_string())),
    );
    writeln!(out).ok();
    write!(
        out,
        "Run '{} <command> --help' for more information on a command.",
        PROGRAM
    )
    .ok();
    out
}

/// Help for one command: usage line, description, arguments, examples.
pub fn command_help(descriptor: &CommandDescriptor) -> String {
    let mut out = String::new();
    writeln!(out, "{}", descriptor.summary()).ok();
    if let Some(description) = descriptor.long_description() {
        writeln!(out).ok();
        writeln!(out, "{}", description).ok();
    }
    writeln!(out).ok();
    writeln!(out, "Usage: {}", command_usage(descriptor)).ok();
    writeln!(out).ok();
    writeln!(out, "Options:").ok();

    let rows = descriptor
        .arguments()
        .iter()
        .map(|spec| (option_names(spec), option_help(spec)))
        .chain(
            GLOBAL_OPTIONS[..2]
                .iter()
                .chain(std::iter::once(&("-h, --help", "Print help")))
                .map(|(names, help)| (names.to_string(), help.to_string())),
        );
    write_rows(&mut out, rows);

    if !descriptor.examples().is_empty() {
        writeln!(out).ok();
        writeln!(out, "Examples:").ok();
        for example in descriptor.examples() {
            writeln!(out, "  {}", example).ok();
        }
    }
    out.trim_end().to_string()
}

/// One-line usage for a command, listing its required arguments.
pub fn command_usage(descriptor: &CommandDescriptor) -> String {
    let mut line = format!("{} {} [OPTIONS]", PROGRAM, descriptor.name());
    for spec in descriptor.arguments().iter().filter(|s| s.is_required()) {
        write!(line, " --{} <{}>", spec.flag_name(), spec.placeholder()).ok();
    }
    line
}

fn write_commands(out: &mut String, registry: &CommandRegistry) {
    writeln!(out, "Commands:").ok();
    if registry.is_empty() {
        writeln!(out, "  (none registered)").ok();
        return;
    }
    write_rows(
        out,
        registry
            .list_all()
            .map(|d| (d.name().to_string(), d.summary().to_string())),
    );
}

fn write_rows(out: &mut String, rows: impl Iterator<Item = (String, String)>) {
    let rows: Vec<_> = rows.collect();
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
    for (left, right) in rows {
        let line = format!("  {:width$}  {}", left, right, width = width);
        writeln!(out, "{}", line.trim_end()).ok();
    }
}

fn option_names(spec: &ArgumentSpec) -> String {
    let mut names: Vec<String> = spec.aliases().iter().map(|a| format!("-{}", a)).collect();
    names.push(format!("--{}", spec.flag_name()));
    let mut rendered = names.join(", ");
    if spec.kind() != ArgumentKind::Flag {
        write!(rendered, " <{}>", spec.placeholder()).ok();
    }
    rendered
}

fn option_help(spec: &ArgumentSpec) -> String {
    let mut help = spec.help_text().to_string();
    let mut notes = Vec::new();
    if spec.is_required() {
        notes.push("[required]".to_string());
    }
    match spec.get_default() {
        Some(ArgValue::Flag(false)) | None => {}
        Some(default) => notes.push(format!("[default: {}]", default)),
    }
    if spec.kind() == ArgumentKind::Choice {
        notes.push(format!("[possible values: {}]", spec.choices().join(", ")));
    }
    for note in notes {
        if !help.is_empty() {
            help.push(' ');
        }
        help.push_str(&note);
    }
    help
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CommandResult, ParsedArgs};

    fn noop(_args: &ParsedArgs) -> CommandResult {
        CommandResult::success()
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry
            .register(
                CommandDescriptor::new("convert", "Convert between formats", noop)
                    .description("Reads one file and writes it in another format.")
                    .arg(
                        ArgumentSpec::path("input")
                            .alias("i")
                            .required()
                            .value_name("PATH")
                            .help("Input file"),
                    )
                    .arg(
                        ArgumentSpec::choice("format", ["csv", "xlsx", "json"])
                            .default_value("csv")
                            .help("Output format"),
                    )
                    .arg(ArgumentSpec::flag("force").help("Overwrite output"))
                    .example("excelsior convert -i a.xlsx --format json"),
            )
            .unwrap();
        registry
            .register(CommandDescriptor::new("merge", "Merge files", noop))
            .unwrap();
        registry
    }

    #[test]
    fn global_help_lists_commands_in_order() {
        let help = global_help(&registry());
        let convert = help.find("convert").unwrap();
        let merge = help.find("merge").unwrap();
        assert!(convert < merge);
        assert!(help.contains("Convert between formats"));
        assert!(help.contains("--verbose"));
        assert!(help.contains("<command> --help"));
    }

    #[test]
    fn usage_is_short() {
        let text = usage(&registry());
        assert!(text.starts_with("Usage: excelsior"));
        assert!(text.contains("merge"));
        assert!(!text.contains("Options:"));
    }

    #[test]
    fn command_help_lists_arguments() {
        let registry = registry();
        let help = command_help(registry.lookup("convert").unwrap());
        assert!(help.contains("Reads one file"));
        assert!(help.contains("-i, --input <PATH>"));
        assert!(help.contains("Input file [required]"));
        assert!(help.contains("[default: csv]"));
        assert!(help.contains("[possible values: csv, xlsx, json]"));
        assert!(help.contains("--force  "));
        assert!(help.contains("Examples:"));
        assert!(help.contains("-v, --verbose"));
        assert!(help.contains("-q, --quiet"));
        assert!(help.contains("-h, --help"));
    }

    #[test]
    fn command_usage_shows_required() {
        let registry = registry();
        assert_eq!(
            command_usage(registry.lookup("convert").unwrap()),
            "excelsior convert [OPTIONS] --input <PATH>"
        );
    }

    #[test]
    fn empty_registry_is_noted() {
        assert!(usage(&CommandRegistry::new()).contains("(none registered)"));
    }
}
