//! Command-line argument parsing for the liftlog CLI.

use thiserror::Error;

use crate::models::{Category, ChartRange};

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Recent workouts, most used exercises and totals (default)
    Dashboard,
    /// Exercise catalog, optionally filtered, one page at a time
    Exercises { category: Category, page: usize },
    /// Workout history, one page at a time
    Workouts { page: usize },
    /// Progress chart for one exercise (first one when not given)
    Progress {
        exercise: Option<u64>,
        range: ChartRange,
    },
    /// Assistant conversation; optionally start over and/or ask something
    Chat { send: Option<String>, clear: bool },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgsError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
    #[error("{flag} needs a value")]
    MissingValue { flag: String },
    #[error("invalid value for {flag}: {message}")]
    InvalidValue { flag: String, message: String },
}

pub const USAGE: &str = "\
Usage: liftlog [COMMAND] [OPTIONS]

Commands:
  dashboard                         Recent workouts, most used exercises, totals (default)
  exercises [--category NAME] [--page N]
  workouts [--page N]
  progress [--exercise ID] [--range 1D|1W|1M|1Y]
  chat [--clear] [--send TEXT]

Options:
  -h, --help       Show this help
  -V, --version    Show version

Environment:
  LIFTLOG_API_URL, LIFTLOG_EMAIL, LIFTLOG_PASSWORD, LIFTLOG_LOG";

/// Parse command-line arguments (program name first).
///
/// ```
/// use liftlog::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["liftlog".to_string(), "workouts".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Workouts { page: 1 }));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut args = args.skip(1);

    let Some(first) = args.next() else {
        return Ok(CliCommand::Dashboard);
    };

    let mut command = match first.as_str() {
        "--version" | "-V" => return Ok(CliCommand::Version),
        "--help" | "-h" | "help" => return Ok(CliCommand::Help),
        "dashboard" => CliCommand::Dashboard,
        "exercises" => CliCommand::Exercises {
            category: Category::All,
            page: 1,
        },
        "workouts" => CliCommand::Workouts { page: 1 },
        "progress" => CliCommand::Progress {
            exercise: None,
            range: ChartRange::default(),
        },
        "chat" => CliCommand::Chat {
            send: None,
            clear: false,
        },
        other => return Err(ArgsError::UnknownCommand(other.to_string())),
    };

    while let Some(flag) = args.next() {
        if matches!(flag.as_str(), "--help" | "-h") {
            return Ok(CliCommand::Help);
        }
        if flag == "--clear" {
            match &mut command {
                CliCommand::Chat { clear, .. } => *clear = true,
                _ => return Err(ArgsError::UnexpectedArgument(flag)),
            }
            continue;
        }
        let value = match flag.as_str() {
            "--category" | "--page" | "--exercise" | "--range" | "--send" => {
                args.next().ok_or_else(|| ArgsError::MissingValue { flag: flag.clone() })?
            }
            _ => return Err(ArgsError::UnexpectedArgument(flag)),
        };

        match (&mut command, flag.as_str()) {
            (CliCommand::Exercises { category, .. }, "--category") => {
                *category = value.parse().map_err(|e: crate::error::ValidationError| {
                    invalid(&flag, e.to_string())
                })?;
            }
            (CliCommand::Exercises { page, .. }, "--page")
            | (CliCommand::Workouts { page }, "--page") => {
                *page = parse_page(&flag, &value)?;
            }
            (CliCommand::Progress { exercise, .. }, "--exercise") => {
                *exercise = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| invalid(&flag, format!("'{}' is not an id", value)))?,
                );
            }
            (CliCommand::Progress { range, .. }, "--range") => {
                *range = value.parse().map_err(|e: crate::error::ValidationError| {
                    invalid(&flag, e.to_string())
                })?;
            }
            (CliCommand::Chat { send, .. }, "--send") => {
                if value.trim().is_empty() {
                    return Err(invalid(&flag, "message is empty".to_string()));
                }
                *send = Some(value);
            }
            _ => return Err(ArgsError::UnexpectedArgument(flag)),
        }
    }

    Ok(command)
}

fn invalid(flag: &str, message: String) -> ArgsError {
    ArgsError::InvalidValue {
        flag: flag.to_string(),
        message,
    }
}

fn parse_page(flag: &str, value: &str) -> Result<usize, ArgsError> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid(flag, format!("'{}' is not a page number", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliCommand, ArgsError> {
        let mut all = vec!["liftlog".to_string()];
        all.extend(args.iter().map(|s| s.to_string()));
        parse_args(all.into_iter())
    }

    #[test]
    fn test_parse_no_args_is_dashboard() {
        assert_eq!(parse(&[]), Ok(CliCommand::Dashboard));
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), Ok(CliCommand::Version));
        assert_eq!(parse(&["-V"]), Ok(CliCommand::Version));
    }

    #[test]
    fn test_parse_exercises_options() {
        assert_eq!(
            parse(&["exercises", "--category", "legs", "--page", "2"]),
            Ok(CliCommand::Exercises {
                category: Category::Legs,
                page: 2
            })
        );
    }

    #[test]
    fn test_parse_progress_options() {
        assert_eq!(
            parse(&["progress", "--range", "1W", "--exercise", "7"]),
            Ok(CliCommand::Progress {
                exercise: Some(7),
                range: ChartRange::OneWeek
            })
        );
    }

    #[test]
    fn test_parse_chat_options() {
        assert_eq!(
            parse(&["chat"]),
            Ok(CliCommand::Chat {
                send: None,
                clear: false
            })
        );
        assert_eq!(
            parse(&["chat", "--clear", "--send", "Plan my week"]),
            Ok(CliCommand::Chat {
                send: Some("Plan my week".to_string()),
                clear: true
            })
        );
        assert!(matches!(
            parse(&["chat", "--send", " "]),
            Err(ArgsError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse(&["workouts", "--clear"]),
            Err(ArgsError::UnexpectedArgument(_))
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse(&["lift"]),
            Err(ArgsError::UnknownCommand("lift".to_string()))
        );
        assert!(matches!(
            parse(&["workouts", "--page", "0"]),
            Err(ArgsError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse(&["workouts", "--page"]),
            Err(ArgsError::MissingValue { .. })
        ));
        assert!(matches!(
            parse(&["workouts", "--category", "Legs"]),
            Err(ArgsError::UnexpectedArgument(_))
        ));
    }

    #[test]
    fn test_help_anywhere() {
        assert_eq!(parse(&["exercises", "-h"]), Ok(CliCommand::Help));
    }
}
