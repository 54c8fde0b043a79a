//! Argument resolution.
//!
//! [`resolve`] validates the tokens that follow a command name against the
//! command's [`ArgumentSpec`]s and produces [`ParsedArgs`].
//!
//! Recognized token forms:
//!
//! - `--flag value` and `--flag=value`
//! - `-alias value` and `-alias=value`
//! - bare switches for FLAG arguments (`--force`, `-f`)
//!
//! A name after either prefix may be the canonical flag or any alias. When a
//! flag is given more than once the last occurrence wins.
//!
//! The logging switches (`-v`, `--verbose`, `-q`, `--quiet`) are accepted
//! anywhere in option position and skipped; the binary reads them through
//! [`option_positions`] before dispatch.

use std::path::PathBuf;

use super::args::{ArgValue, ArgumentKind, ArgumentSpec, ParsedArgs};
use super::descriptor::{CommandDescriptor, LOGGING_SWITCHES};
use crate::error::ArgumentError;

/// Resolve `tokens` against the schema of `descriptor`.
pub fn resolve(
    descriptor: &CommandDescriptor,
    tokens: &[String],
) -> Result<ParsedArgs, ArgumentError> {
    let mut parsed = ParsedArgs::new();
    let mut position = 0;

    while position < tokens.len() {
        let token = &tokens[position];
        let Some((name, inline)) = split_option(token) else {
            return Err(ArgumentError::UnexpectedArgument {
                token: token.clone(),
                position,
            });
        };

        if inline.is_none() && LOGGING_SWITCHES.contains(&name) {
            position += 1;
            continue;
        }

        let spec = descriptor
            .find_argument(name)
            .ok_or_else(|| ArgumentError::UnknownArgument {
                token: token.clone(),
                position,
            })?;

        let option_position = position;
        let raw = match (spec.kind(), inline) {
            (ArgumentKind::Flag, None) => None,
            (_, Some(value)) => Some(value.to_string()),
            (_, None) => {
                position += 1;
                match tokens.get(position) {
                    Some(value) => Some(value.clone()),
                    None => {
                        return Err(ArgumentError::MissingValue {
                            flag: spec.flag_name().to_string(),
                            position: option_position,
                        })
                    }
                }
            }
        };

        let value = coerce(spec, raw, position)?;
        if parsed.contains(spec.flag_name()) {
            tracing::debug!(
                "'--{}' given more than once; using the last value",
                spec.flag_name()
            );
        }
        parsed.insert(spec.flag_name(), value);
        position += 1;
    }

    for spec in descriptor.arguments() {
        if parsed.contains(spec.flag_name()) {
            continue;
        }
        if let Some(default) = spec.get_default() {
            parsed.insert(spec.flag_name(), default.clone());
        } else if spec.is_required() {
            return Err(ArgumentError::MissingArgument {
                flag: spec.flag_name().to_string(),
            });
        }
    }

    Ok(parsed)
}

/// Tokens that sit in option position, with their indexes.
///
/// A token following an option that takes a separate value is that option's
/// value and is left out, so `--date-column -h` names a column rather than
/// asking for help. Scanning stops at `--`.
pub fn option_positions<'a>(
    descriptor: &CommandDescriptor,
    tokens: &'a [String],
) -> Vec<(usize, &'a str)> {
    let mut found = Vec::new();
    let mut position = 0;

    while position < tokens.len() {
        let token = tokens[position].as_str();
        if token == "--" {
            break;
        }
        found.push((position, token));
        if let Some((name, None)) = split_option(token) {
            let takes_value = descriptor
                .find_argument(name)
                .is_some_and(|spec| spec.kind() != ArgumentKind::Flag);
            if takes_value {
                position += 1;
            }
        }
        position += 1;
    }

    found
}

/// Split an option token into its name and optional inline value.
///
/// Returns `None` for tokens that are not options (`value`, `-`, `--`).
fn split_option(token: &str) -> Option<(&str, Option<&str>)> {
    let body = token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))?;
    if body.is_empty() || body.starts_with('-') {
        return None;
    }
    match body.split_once('=') {
        Some((name, value)) if !name.is_empty() => Some((name, Some(value))),
        Some(_) => None,
        None => Some((body, None)),
    }
}

/// Coerce a raw value to the spec's kind. `position` locates the value.
fn coerce(
    spec: &ArgumentSpec,
    raw: Option<String>,
    position: usize,
) -> Result<ArgValue, ArgumentError> {
    let invalid = |value: &str, reason: &str| ArgumentError::InvalidValue {
        flag: spec.flag_name().to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
        position,
    };

    match spec.kind() {
        ArgumentKind::Flag => match raw.as_deref() {
            None => Ok(ArgValue::Flag(true)),
            Some("true" | "1" | "yes") => Ok(ArgValue::Flag(true)),
            Some("false" | "0" | "no") => Ok(ArgValue::Flag(false)),
            Some(other) => Err(invalid(other, "expected true or false")),
        },
        ArgumentKind::String => Ok(ArgValue::String(raw.unwrap_or_default())),
        ArgumentKind::Path => {
            let value = raw.unwrap_or_default();
            if value.is_empty() {
                return Err(invalid(&value, "path cannot be empty"));
            }
            if value.contains('\0') {
                return Err(invalid(&value, "path cannot contain NUL bytes"));
            }
            Ok(ArgValue::Path(PathBuf::from(value)))
        }
        ArgumentKind::Choice => {
            let value = raw.unwrap_or_default();
            if spec.choices().iter().any(|c| *c == value) {
                Ok(ArgValue::Choice(value))
            } else {
                Err(ArgumentError::InvalidChoice {
                    flag: spec.flag_name().to_string(),
                    value,
                    choices: spec.choices().to_vec(),
                    position,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CommandResult;
    use std::path::Path;

    fn noop(_args: &ParsedArgs) -> CommandResult {
        CommandResult::success()
    }

    fn convert() -> CommandDescriptor {
        CommandDescriptor::new("convert", "Convert a file", noop)
            .arg(ArgumentSpec::path("input").alias("i").required())
            .arg(ArgumentSpec::path("output").alias("o").required())
            .arg(ArgumentSpec::choice("format", ["csv", "xlsx", "json"]).default_value("csv"))
            .arg(ArgumentSpec::string("sheet"))
            .arg(ArgumentSpec::flag("force").alias("F"))
    }

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_space_separated_values() {
        let args = resolve(
            &convert(),
            &tokens(&["--input", "a.xlsx", "--output", "b.csv"]),
        )
        .unwrap();
        assert_eq!(args.path("input"), Some(Path::new("a.xlsx")));
        assert_eq!(args.path("output"), Some(Path::new("b.csv")));
    }

    #[test]
    fn logging_switches_are_skipped() {
        let args = resolve(
            &convert(),
            &tokens(&["-i", "a.xlsx", "--verbose", "-o", "b.csv", "-q"]),
        )
        .unwrap();
        assert_eq!(args.path("output"), Some(Path::new("b.csv")));
        assert!(!args.contains("verbose"));
    }

    #[test]
    fn logging_switch_can_be_a_value() {
        let args = resolve(&convert(), &tokens(&["-i", "a", "-o", "b", "--sheet", "-v"])).unwrap();
        assert_eq!(args.string("sheet"), Some("-v"));
    }

    #[test]
    fn option_positions_skip_values() {
        let raw = tokens(&["--sheet", "-h", "-F", "--output=-q", "-i", "x", "--verbose", "--", "-h"]);
        let found: Vec<&str> = option_positions(&convert(), &raw)
            .into_iter()
            .map(|(_, t)| t)
            .collect();
        assert_eq!(found, vec!["--sheet", "-F", "--output=-q", "-i", "--verbose"]);
    }

    #[test]
    fn resolves_inline_values_and_aliases() {
        let args = resolve(
            &convert(),
            &tokens(&["-i", "a.xlsx", "--output=b.csv", "-F", "--sheet=Q1=2024"]),
        )
        .unwrap();
        assert_eq!(args.path("input"), Some(Path::new("a.xlsx")));
        assert_eq!(args.path("output"), Some(Path::new("b.csv")));
        assert!(args.flag("force"));
        assert_eq!(args.string("sheet"), Some("Q1=2024"));
    }

    #[test]
    fn applies_defaults() {
        let args = resolve(&convert(), &tokens(&["-i", "a", "-o", "b"])).unwrap();
        assert_eq!(args.string("format"), Some("csv"));
        assert!(!args.flag("force"));
        assert!(!args.contains("sheet"));
    }

    #[test]
    fn last_occurrence_wins() {
        let args = resolve(
            &convert(),
            &tokens(&[
                "-i", "a", "-o", "b", "--format", "csv", "--format", "json",
            ]),
        )
        .unwrap();
        assert_eq!(args.string("format"), Some("json"));
    }

    #[test]
    fn missing_required_names_flag() {
        let err = resolve(&convert(), &tokens(&["--input", "a.xlsx"])).unwrap_err();
        assert_eq!(
            err,
            ArgumentError::MissingArgument {
                flag: "output".to_string()
            }
        );
    }

    #[test]
    fn invalid_choice_lists_options() {
        let err = resolve(
            &convert(),
            &tokens(&[
                "--input",
                "a.xlsx",
                "--output",
                "b.csv",
                "--format",
                "invalidfmt",
            ]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ArgumentError::InvalidChoice {
                flag: "format".to_string(),
                value: "invalidfmt".to_string(),
                choices: vec!["csv".to_string(), "xlsx".to_string(), "json".to_string()],
                position: 5,
            }
        );
        assert!(err.to_string().contains("csv, xlsx, json"));
    }

    #[test]
    fn choice_match_is_case_sensitive() {
        let err = resolve(
            &convert(),
            &tokens(&["-i", "a", "-o", "b", "--format", "CSV"]),
        )
        .unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidChoice { .. }));
    }

    #[test]
    fn unknown_argument_reports_position() {
        let err = resolve(&convert(), &tokens(&["-i", "a", "--bogus", "x"])).unwrap_err();
        assert_eq!(
            err,
            ArgumentError::UnknownArgument {
                token: "--bogus".to_string(),
                position: 2,
            }
        );
    }

    #[test]
    fn positional_is_unexpected() {
        let err = resolve(&convert(), &tokens(&["stray", "-i", "a"])).unwrap_err();
        assert_eq!(
            err,
            ArgumentError::UnexpectedArgument {
                token: "stray".to_string(),
                position: 0,
            }
        );
    }

    #[test]
    fn flag_does_not_consume_next_token() {
        let err = resolve(&convert(), &tokens(&["-F", "extra"])).unwrap_err();
        assert!(matches!(
            err,
            ArgumentError::UnexpectedArgument { position: 1, .. }
        ));
    }

    #[test]
    fn flag_accepts_explicit_boolean() {
        let args = resolve(
            &convert(),
            &tokens(&["-i", "a", "-o", "b", "--force=false"]),
        )
        .unwrap();
        assert!(!args.flag("force"));
        assert!(args.contains("force"));

        let err = resolve(&convert(), &tokens(&["--force=maybe"])).unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidValue { .. }));
    }

    #[test]
    fn trailing_option_without_value() {
        let err = resolve(&convert(), &tokens(&["-i", "a", "--output"])).unwrap_err();
        assert_eq!(
            err,
            ArgumentError::MissingValue {
                flag: "output".to_string(),
                position: 2,
            }
        );
    }

    #[test]
    fn empty_path_is_invalid() {
        let err = resolve(&convert(), &tokens(&["--input=", "-o", "b"])).unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidValue { position: 0, .. }));
    }

    #[test]
    fn path_existence_is_not_checked() {
        let args = resolve(
            &convert(),
            &tokens(&["-i", "/definitely/not/here.xlsx", "-o", "new.csv"]),
        )
        .unwrap();
        assert!(args.path("input").is_some());
    }

    #[test]
    fn value_may_start_with_dash() {
        let args = resolve(&convert(), &tokens(&["-i", "a", "-o", "b", "--sheet", "-1"])).unwrap();
        assert_eq!(args.string("sheet"), Some("-1"));
    }

    #[test]
    fn split_option_forms() {
        assert_eq!(split_option("--flag"), Some(("flag", None)));
        assert_eq!(split_option("-f"), Some(("f", None)));
        assert_eq!(split_option("--flag=v"), Some(("flag", Some("v"))));
        assert_eq!(split_option("--flag="), Some(("flag", Some(""))));
        assert_eq!(split_option("value"), None);
        assert_eq!(split_option("-"), None);
        assert_eq!(split_option("--"), None);
        assert_eq!(split_option("---x"), None);
        assert_eq!(split_option("--=v"), None);
    }
}
