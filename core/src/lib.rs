//! Argument parsing and command routing for command-line applications.
//!
//! This crate turns a raw command line into a resolved command with typed
//! argument and option values:
//!
//! - [`tokenize`] and [`RawArgs`] split a command line into tokens,
//!   honouring single and double quotes.
//! - [`ArgsFormat`] describes what a command accepts: command-name anchors,
//!   command options, positional [`ArgumentSpec`]s and [`OptionSpec`]s.
//! - [`parse_args`] matches tokens against a format and produces
//!   [`ParsedArgs`], optionally in lenient mode.
//! - [`ApplicationConfig`] builds an [`Application`], a tree of
//!   [`Command`]s whose formats inherit from their ancestors.
//! - [`Resolver`] picks the command a token sequence addresses, descending
//!   into option-commands and default sub-commands, and suggests similar
//!   names ([`similar_names`]) when a command is unknown.
//!
//! # Example
//!
//! ```
//! use cmdroute_core::*;
//!
//! let app = ApplicationConfig::new()
//!     .name("pkg")
//!     .option(OptionSpec::builder("verbose").short_name("v").build().unwrap())
//!     .command(
//!         CommandConfig::new("package")
//!             .alias("pack")
//!             .sub_command(
//!                 CommandConfig::new("add")
//!                     .argument(ArgumentSpec::required("name").unwrap())
//!                     .option(
//!                         OptionSpec::builder("retries")
//!                             .value(OptionValue::Required)
//!                             .value_type(ValueType::Integer)
//!                             .default_value(3)
//!                             .build()
//!                             .unwrap(),
//!                     ),
//!             )
//!             .sub_command(CommandConfig::option_command("list").short_name("l").mark_default()),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let raw = RawArgs::parse("pack add 'my package' --retries 5 -v");
//! let resolved = resolve(&raw, &app, false).unwrap();
//! assert_eq!(resolved.command().path(), ["package", "add"]);
//! assert_eq!(resolved.args().argument("name").unwrap(), &Value::from("my package"));
//! assert_eq!(resolved.args().option("retries").unwrap(), &Value::Int(5));
//! assert_eq!(resolved.args().option("verbose").unwrap(), &Value::Bool(true));
//!
//! let raw = RawArgs::parse("package");
//! assert_eq!(resolve(&raw, &app, false).unwrap().command().name(), "list");
//!
//! let raw = RawArgs::parse("pakage");
//! let err = resolve(&raw, &app, false).unwrap_err();
//! assert!(err.to_string().contains("Did you mean this?\n    package"));
//! ```

mod args;
mod command;
mod error;
mod format;
mod parser;
mod resolver;
mod suggest;
mod token;
mod value;

pub use args::ParsedArgs;
pub use command::{Application, ApplicationConfig, Command, CommandConfig, CommandKind};
pub use error::{Error, FormatError, InvalidValue, ParseError, ResolveError, Result};
pub use format::{
    ArgsFormat, ArgsFormatBuilder, ArgumentSpec, ArgumentSpecBuilder, CommandName, CommandOption,
    CommandOptionBuilder, DEFAULT_VALUE_NAME, OptionNames, OptionSpec, OptionSpecBuilder,
    OptionValue, PreferredName,
};
pub use parser::parse_args;
pub use resolver::{ResolvedCommand, Resolver, resolve};
pub use suggest::{NameGroup, similar_command_names, similar_names};
pub use token::{RawArgs, tokenize};
pub use value::{Value, ValueType, parse_boolean, parse_float, parse_integer, parse_string};
