//! Argument formats: the declared shape of a command's input.
//!
//! An [`ArgsFormat`] is a flat, immutable bundle of command-name anchors,
//! command options, positional arguments and options. Formats of nested
//! commands are composed with [`ArgsFormat::extend`], which copies the parent
//! format and validates every addition against the union.

mod argument;
mod command;
pub(crate) mod names;
mod option;

use std::collections::HashSet;

use tracing::debug;

pub use argument::{ArgumentSpec, ArgumentSpecBuilder};
pub use command::{CommandName, CommandOption, CommandOptionBuilder};
pub use names::{OptionNames, PreferredName};
pub use option::{DEFAULT_VALUE_NAME, OptionSpec, OptionSpecBuilder, OptionValue};

use crate::error::{FormatError, Result};

/// The declared anchors, arguments and options of one command.
///
/// # Examples
///
/// ```
/// use cmdroute_core::{ArgsFormat, ArgumentSpec, CommandName, OptionSpec, OptionValue};
///
/// let format = ArgsFormat::builder()
///     .add_command_name(CommandName::new("server", ["srv"]).unwrap())
///     .add_option(
///         OptionSpec::builder("port")
///             .short_name("p")
///             .value(OptionValue::Required)
///             .build()
///             .unwrap(),
///     )
///     .unwrap()
///     .add_argument(ArgumentSpec::required("host").unwrap())
///     .unwrap()
///     .build();
///
/// assert_eq!(format.command_names()[0].name(), "server");
/// assert!(format.option_by_short('p').is_some());
/// assert!(format.argument("host").unwrap().is_required());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgsFormat {
    command_names: Vec<CommandName>,
    command_options: Vec<CommandOption>,
    arguments: Vec<ArgumentSpec>,
    options: Vec<OptionSpec>,
}

impl ArgsFormat {
    /// Starts an empty format.
    pub fn builder() -> ArgsFormatBuilder {
        ArgsFormatBuilder::default()
    }

    /// Starts a builder that already contains everything in `base`.
    pub fn extend(base: &ArgsFormat) -> ArgsFormatBuilder {
        ArgsFormatBuilder {
            format: base.clone(),
        }
    }

    /// Command-name anchors, outermost first.
    pub fn command_names(&self) -> &[CommandName] {
        &self.command_names
    }

    /// Command options, inherited ones first.
    pub fn command_options(&self) -> &[CommandOption] {
        &self.command_options
    }

    /// Positional arguments in declaration order.
    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    /// Options in declaration order, inherited ones first.
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// The argument called `name`.
    pub fn argument(&self, name: &str) -> Option<&ArgumentSpec> {
        self.arguments.iter().find(|arg| arg.name() == name)
    }

    /// Looks up an option by long name or long alias (without dashes).
    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|opt| opt.names().matches_long(name))
    }

    /// The option with short name or short alias `short`.
    pub fn option_by_short(&self, short: char) -> Option<&OptionSpec> {
        self.options.iter().find(|opt| opt.names().matches_short(short))
    }

    /// The command option with long name or alias `name`.
    pub fn command_option(&self, name: &str) -> Option<&CommandOption> {
        self.command_options.iter().find(|opt| opt.names().matches_long(name))
    }

    /// The command option with short name or short alias `short`.
    pub fn command_option_by_short(&self, short: char) -> Option<&CommandOption> {
        self.command_options.iter().find(|opt| opt.names().matches_short(short))
    }

    /// Returns `true` if any positional argument is declared.
    pub fn has_arguments(&self) -> bool {
        !self.arguments.is_empty()
    }

    /// Returns `true` if any argument is required.
    pub fn has_required_argument(&self) -> bool {
        self.arguments.iter().any(ArgumentSpec::is_required)
    }

    /// Returns `true` if the last argument collects the remaining positionals.
    pub fn has_multi_valued_argument(&self) -> bool {
        self.arguments.iter().any(ArgumentSpec::is_multi_valued)
    }

    fn taken_option_spellings(&self) -> HashSet<String> {
        self.options
            .iter()
            .map(OptionSpec::names)
            .chain(self.command_options.iter().map(CommandOption::names))
            .flat_map(OptionNames::spellings)
            .collect()
    }
}

/// Accumulates a format, validating each addition eagerly.
#[derive(Debug, Clone, Default)]
pub struct ArgsFormatBuilder {
    format: ArgsFormat,
}

impl ArgsFormatBuilder {
    /// Appends a command-name anchor.
    pub fn add_command_name(mut self, name: CommandName) -> Self {
        self.format.command_names.push(name);
        self
    }

    /// Adds a command option.
    ///
    /// # Errors
    ///
    /// Fails when one of its names is already taken by another option or
    /// command option.
    pub fn add_command_option(mut self, option: CommandOption) -> Result<Self> {
        self.check_option_names(option.names())?;
        self.format.command_options.push(option);
        Ok(self)
    }

    /// Adds an option.
    ///
    /// # Errors
    ///
    /// Fails when one of its names is already taken.
    pub fn add_option(mut self, option: OptionSpec) -> Result<Self> {
        self.check_option_names(option.names())?;
        self.format.options.push(option);
        Ok(self)
    }

    /// Appends a positional argument.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate name, a required argument after an optional one,
    /// or any argument after a multi-valued one.
    pub fn add_argument(mut self, argument: ArgumentSpec) -> Result<Self> {
        if self.format.argument(argument.name()).is_some() {
            return Err(FormatError::DuplicateArgument(argument.name().to_string()).into());
        }
        if let Some(last) = self.format.arguments.last() {
            if last.is_multi_valued() {
                return Err(FormatError::ArgumentAfterMultiValued(
                    argument.name().to_string(),
                    last.name().to_string(),
                )
                .into());
            }
            if argument.is_required() && last.is_optional() {
                return Err(FormatError::RequiredAfterOptional(
                    argument.name().to_string(),
                    last.name().to_string(),
                )
                .into());
            }
        }
        self.format.arguments.push(argument);
        Ok(self)
    }

    /// Adds options in order, see [`ArgsFormatBuilder::add_option`].
    pub fn add_options<I: IntoIterator<Item = OptionSpec>>(self, options: I) -> Result<Self> {
        options.into_iter().try_fold(self, Self::add_option)
    }

    /// Appends arguments in order, see [`ArgsFormatBuilder::add_argument`].
    pub fn add_arguments<I: IntoIterator<Item = ArgumentSpec>>(self, arguments: I) -> Result<Self> {
        arguments.into_iter().try_fold(self, Self::add_argument)
    }

    /// Finishes the format; every rule was checked while adding.
    pub fn build(self) -> ArgsFormat {
        debug!(
            anchors = self.format.command_names.len(),
            command_options = self.format.command_options.len(),
            arguments = self.format.arguments.len(),
            options = self.format.options.len(),
            "Built args format"
        );
        self.format
    }

    fn check_option_names(&self, names: &OptionNames) -> std::result::Result<(), FormatError> {
        let taken = self.format.taken_option_spellings();
        let mut own = HashSet::new();
        for spelling in names.spellings() {
            if taken.contains(&spelling) || !own.insert(spelling.clone()) {
                return Err(FormatError::DuplicateOption(spelling));
            }
        }
        Ok(())
    }
}
