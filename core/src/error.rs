//! Error types for format construction, value coercion, parsing and
//! command resolution.

use thiserror::Error;

/// Structural errors raised while building argument formats and command trees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Argument name is empty or not of the form `[A-Za-z][A-Za-z0-9-]*`.
    #[error("invalid argument name: {0:?}")]
    InvalidArgumentName(String),

    /// Long option name is shorter than two characters or malformed.
    #[error("invalid long option name: {0:?}")]
    InvalidLongName(String),

    /// Short option name is not a single letter.
    #[error("invalid short option name: {0:?}")]
    InvalidShortName(String),

    /// Option alias is neither a valid long nor a valid short name.
    #[error("invalid option alias: {0:?}")]
    InvalidAlias(String),

    /// Command name or command alias is malformed.
    #[error("invalid command name: {0:?}")]
    InvalidCommandName(String),

    /// A description was given but is empty.
    #[error("description must not be empty")]
    EmptyDescription,

    /// A value placeholder name was given but is empty.
    #[error("value name must not be empty")]
    EmptyValueName,

    /// `prefer_short` was requested for an option without a short name.
    #[error("option --{0} prefers its short name but has none")]
    MissingShortName(String),

    /// Two arguments share a name.
    #[error("duplicate argument: {0}")]
    DuplicateArgument(String),

    /// An option name, short name or alias is already taken.
    #[error("duplicate option name: {0}")]
    DuplicateOption(String),

    /// An argument was added after a multi-valued argument.
    #[error("argument {0} cannot follow the multi-valued argument {1}")]
    ArgumentAfterMultiValued(String, String),

    /// A required argument was added after an optional one.
    #[error("required argument {0} cannot follow the optional argument {1}")]
    RequiredAfterOptional(String, String),

    /// Two sibling commands share a name, alias or option name.
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),

    /// A short name was configured on a command that is not an option-command.
    #[error("command {0} is not an option-command and cannot have a short name")]
    ShortNameOnNamedCommand(String),
}

/// A value that cannot be coerced to its declared type, or a default value
/// that contradicts the declaring argument or option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidValue {
    /// The value has no representation in the target type.
    #[error("The value \"{value}\" cannot be converted to {expected}.")]
    Conversion {
        value: String,
        expected: &'static str,
    },

    /// Required arguments never fall back to a default.
    #[error("The required argument \"{0}\" cannot have a default value.")]
    DefaultForRequired(String),

    /// Options that take no value cannot carry a default.
    #[error("The \"--{0}\" option does not accept a value and cannot have a default value.")]
    DefaultForNoValue(String),

    /// Multi-valued fields need a list as default.
    #[error("The default value of the multi-valued \"{0}\" must be a list.")]
    ScalarDefaultForMultiValued(String),
}

/// Failures while matching raw tokens against an argument format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Token names an option the format does not declare (token as written).
    #[error("The \"{0}\" option does not exist.")]
    NoSuchOption(String),

    /// A value-requiring option was given without a value (long name).
    #[error("The \"--{0}\" option requires a value.")]
    MissingOptionValue(String),

    /// A value was attached to an option that takes none (long name).
    #[error("The \"--{0}\" option does not accept a value.")]
    UnexpectedOptionValue(String),

    /// A positional token has no argument slot left.
    #[error("Too many arguments (unexpected: \"{0}\").")]
    TooManyArguments(String),

    /// Required arguments were not supplied.
    #[error("Not enough arguments (missing: \"{}\").", .0.join(", "))]
    NotEnoughArguments(Vec<String>),

    /// A token could not be coerced to the type of its field.
    #[error("Invalid value for \"{field}\": {source}")]
    InvalidValue {
        field: String,
        #[source]
        source: InvalidValue,
    },
}

/// Failures while selecting a command from raw tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The first positional token names no root command.
    #[error("The command \"{name}\" is not defined.{}", render_suggestions(.suggestions))]
    NameNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// No command name was passed and there is no default command.
    #[error("No command name was passed and no default command is configured.")]
    NoDefaultCommand,
}

fn render_suggestions(suggestions: &[String]) -> String {
    let heading = match suggestions.len() {
        0 => return String::new(),
        1 => "Did you mean this?",
        _ => "Did you mean one of these?",
    };
    let mut out = format!("\n\n{heading}");
    for suggestion in suggestions {
        out.push_str("\n    ");
        out.push_str(suggestion);
    }
    out
}

/// Umbrella error for the crate's public operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidFormat(#[from] FormatError),

    #[error(transparent)]
    InvalidValue(#[from] InvalidValue),

    #[error(transparent)]
    CannotParseArgs(#[from] ParseError),

    #[error(transparent)]
    CannotResolveCommand(#[from] ResolveError),

    /// Lookup of an argument the format does not declare.
    #[error("The argument \"{0}\" does not exist.")]
    NoSuchArgument(String),

    /// Lookup of an option the format does not declare.
    #[error("The option \"--{0}\" does not exist.")]
    NoSuchOption(String),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_not_found_lists_suggestions() {
        let err = ResolveError::NameNotFound {
            name: "packa".to_string(),
            suggestions: vec!["pack".to_string(), "package".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "The command \"packa\" is not defined.\n\n\
             Did you mean one of these?\n    pack\n    package"
        );
    }

    #[test]
    fn test_name_not_found_single_suggestion() {
        let err = ResolveError::NameNotFound {
            name: "serv".to_string(),
            suggestions: vec!["server".to_string()],
        };
        assert!(err.to_string().ends_with("Did you mean this?\n    server"));
    }

    #[test]
    fn test_name_not_found_without_suggestions() {
        let err = ResolveError::NameNotFound {
            name: "zzz".to_string(),
            suggestions: Vec::new(),
        };
        assert_eq!(err.to_string(), "The command \"zzz\" is not defined.");
    }

    #[test]
    fn test_not_enough_arguments_joins_names() {
        let err = ParseError::NotEnoughArguments(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "Not enough arguments (missing: \"a, b\").");
    }

    #[test]
    fn test_umbrella_is_transparent() {
        let err: Error = ParseError::NoSuchOption("--foo".to_string()).into();
        assert_eq!(err.to_string(), "The \"--foo\" option does not exist.");
    }
}
