//! Integration tests for the registry and dispatcher public API.

use excelsior::cli::{
    resolve, ArgValue, ArgumentSpec, CommandDescriptor, CommandRegistry, CommandResult,
    DispatchOutcome, Dispatcher, ErrorKind, ParsedArgs, EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE,
};
use excelsior::error::{ArgumentError, RegistryError};
use excelsior::ui::MockUI;

fn convert(args: &ParsedArgs) -> CommandResult {
    let input = args.path("input").map(|p| p.display().to_string());
    let format = args.string("format").unwrap_or("csv");
    match input {
        Some(input) => CommandResult::success_with(format!("converted {} to {}", input, format)),
        None => CommandResult::failure(ErrorKind::InvalidInput, "no input"),
    }
}

fn crash(_args: &ParsedArgs) -> CommandResult {
    let sheets: Vec<&str> = Vec::new();
    CommandResult::success_with(sheets[3])
}

fn convert_descriptor() -> CommandDescriptor {
    CommandDescriptor::new("convert", "Convert a spreadsheet to another format", convert)
        .arg(ArgumentSpec::path("input").alias("i").required())
        .arg(ArgumentSpec::path("output").alias("o").required())
        .arg(ArgumentSpec::choice("format", ["csv", "xlsx", "json"]).default_value("csv"))
        .arg(ArgumentSpec::flag("overwrite"))
}

fn dispatcher() -> Dispatcher {
    let mut registry = CommandRegistry::new();
    registry.register(convert_descriptor()).unwrap();
    registry
        .register(CommandDescriptor::new("crash", "Fails unexpectedly", crash))
        .unwrap();
    Dispatcher::new(registry)
}

fn argv(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[test]
fn lookup_returns_registered_descriptor() {
    let mut registry = CommandRegistry::new();
    registry.register(convert_descriptor()).unwrap();

    let found = registry.lookup("convert").unwrap();
    assert_eq!(found.name(), "convert");
    assert_eq!(found.summary(), "Convert a spreadsheet to another format");
    let flags: Vec<_> = found.arguments().iter().map(|a| a.flag_name()).collect();
    assert_eq!(flags, vec!["input", "output", "format", "overwrite"]);
}

#[test]
fn duplicate_registration_keeps_first() {
    let mut registry = CommandRegistry::new();
    registry.register(convert_descriptor()).unwrap();

    let err = registry
        .register(CommandDescriptor::new("convert", "Replacement", crash))
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateCommand { ref name } if name == "convert"));
    assert_eq!(
        registry.lookup("convert").unwrap().summary(),
        "Convert a spreadsheet to another format"
    );
}

#[test]
fn missing_required_argument_names_flag() {
    let err = resolve(&convert_descriptor(), &argv(&["--input", "a.xlsx"])).unwrap_err();
    assert_eq!(
        err,
        ArgumentError::MissingArgument {
            flag: "output".to_string()
        }
    );
}

#[test]
fn later_value_wins() {
    let args = resolve(
        &convert_descriptor(),
        &argv(&["-i", "a.xlsx", "-o", "b", "--format", "csv", "--format", "json"]),
    )
    .unwrap();
    assert_eq!(args.string("format"), Some("json"));
}

#[test]
fn inline_and_alias_forms_resolve_identically() {
    let descriptor = convert_descriptor();
    let long = resolve(&descriptor, &argv(&["--input", "a.xlsx", "--output", "b.csv"])).unwrap();
    let inline = resolve(&descriptor, &argv(&["--input=a.xlsx", "--output=b.csv"])).unwrap();
    let alias = resolve(&descriptor, &argv(&["-i", "a.xlsx", "-o", "b.csv"])).unwrap();

    for args in [&inline, &alias] {
        assert_eq!(args.path("input"), long.path("input"));
        assert_eq!(args.path("output"), long.path("output"));
        assert_eq!(args.get("format"), Some(&ArgValue::Choice("csv".to_string())));
        assert!(!args.flag("overwrite"));
    }
}

#[test]
fn no_arguments_prints_usage_only() {
    let mut ui = MockUI::new();
    let outcome = dispatcher().dispatch(&[], &mut ui);
    assert_eq!(outcome, DispatchOutcome::MissingCommand);
    assert_eq!(outcome.exit_code(), EXIT_USAGE);
    assert_eq!(ui.texts().len(), 1);
    assert!(ui.has_text("Usage:"));
    assert!(ui.errors().is_empty());
    assert!(ui.successes().is_empty());
}

#[test]
fn unknown_command_exits_with_usage_code() {
    let mut ui = MockUI::new();
    let code = dispatcher().run(&argv(&["frobnicate"]), &mut ui);
    assert_eq!(code, EXIT_USAGE);
    assert!(ui.has_error("unknown command 'frobnicate'"));
}

#[test]
fn invalid_choice_lists_choices() {
    let mut ui = MockUI::new();
    let outcome = dispatcher().dispatch(
        &argv(&[
            "convert",
            "--input",
            "a.xlsx",
            "--output",
            "b.csv",
            "--format",
            "invalidfmt",
        ]),
        &mut ui,
    );

    match &outcome {
        DispatchOutcome::ArgumentsRejected { command, error } => {
            assert_eq!(command, "convert");
            assert!(matches!(error, ArgumentError::InvalidChoice { .. }));
            assert_eq!(error.position(), Some(5));
        }
        other => panic!("expected ArgumentsRejected, got {:?}", other),
    }
    assert_eq!(outcome.exit_code(), EXIT_USAGE);
    assert!(ui.has_error("csv, xlsx, json"));
}

#[test]
fn panicking_handler_becomes_internal_error() {
    let mut ui = MockUI::new();
    let outcome = dispatcher().dispatch(&argv(&["crash"]), &mut ui);

    match &outcome {
        DispatchOutcome::Executed { command, result } => {
            assert_eq!(command, "crash");
            assert!(matches!(
                result,
                CommandResult::Failure {
                    kind: ErrorKind::Internal,
                    ..
                }
            ));
        }
        other => panic!("expected Executed, got {:?}", other),
    }
    assert_eq!(outcome.exit_code(), EXIT_FAILURE);
    assert!(ui.has_error("InternalError"));
}

#[test]
fn successful_command_reports_message() {
    let mut ui = MockUI::new();
    let code = dispatcher().run(
        &argv(&["convert", "-i", "a.xlsx", "-o", "b.json", "--format", "json"]),
        &mut ui,
    );
    assert_eq!(code, EXIT_SUCCESS);
    assert!(ui.has_success("converted a.xlsx to json"));
}

#[test]
fn command_help_exits_zero() {
    let mut ui = MockUI::new();
    let code = dispatcher().run(&argv(&["convert", "--help"]), &mut ui);
    assert_eq!(code, EXIT_SUCCESS);
    assert!(ui.has_text("--input <INPUT>"));
    assert!(ui.has_text("[possible values: csv, xlsx, json]"));
}
