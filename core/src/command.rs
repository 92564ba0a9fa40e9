//! Command trees and the configuration that builds them.
//!
//! [`ApplicationConfig`] and [`CommandConfig`] are plain, infallible
//! builders. [`ApplicationConfig::build`] validates the whole tree and
//! flattens every command's [`ArgsFormat`] (global format, then each
//! ancestor, then the command itself), producing an immutable
//! [`Application`].

use std::collections::HashSet;

use tracing::debug;

use crate::args::ParsedArgs;
use crate::error::{FormatError, ParseError, Result};
use crate::format::{ArgsFormat, ArgumentSpec, CommandName, CommandOption, OptionSpec};
use crate::parser::parse_args;
use crate::token::RawArgs;

/// Whether a command is selected by a positional name or by an option token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Selected by its name or an alias, e.g. `package add`.
    Named,
    /// Selected by `--name`, `-n` or an alias, e.g. `package --delete`.
    Option,
}

/// Declarative settings for one command and its sub-commands.
#[derive(Debug, Clone)]
pub struct CommandConfig {
    name: String,
    kind: CommandKind,
    short_name: Option<String>,
    aliases: Vec<String>,
    description: Option<String>,
    default: bool,
    lenient: Option<bool>,
    handler: Option<String>,
    arguments: Vec<ArgumentSpec>,
    options: Vec<OptionSpec>,
    sub_commands: Vec<CommandConfig>,
}

impl CommandConfig {
    /// A command selected by name.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name.into(), CommandKind::Named)
    }

    /// A command selected by an option token such as `--delete`.
    pub fn option_command(long_name: impl Into<String>) -> Self {
        Self::with_kind(long_name.into(), CommandKind::Option)
    }

    fn with_kind(name: String, kind: CommandKind) -> Self {
        Self {
            name,
            kind,
            short_name: None,
            aliases: Vec::new(),
            description: None,
            default: false,
            lenient: None,
            handler: None,
            arguments: Vec::new(),
            options: Vec::new(),
            sub_commands: Vec::new(),
        }
    }

    /// Short name of an option-command.
    pub fn short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    /// Adds an alias; for option-commands a long alias or single letter.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Sets the help text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the command as a default of its parent.
    pub fn mark_default(mut self) -> Self {
        self.default = true;
        self
    }

    /// Overrides the lenient flag inherited from the parent.
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = Some(lenient);
        self
    }

    /// Opaque handler id passed through to the caller; inherited when unset.
    pub fn handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    /// Declares an argument of this command; inherited by its sub-commands.
    pub fn argument(mut self, argument: ArgumentSpec) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Declares an option of this command; inherited by its sub-commands.
    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Adds a named sub-command or option-command.
    pub fn sub_command(mut self, command: CommandConfig) -> Self {
        self.sub_commands.push(command);
        self
    }
}

/// Declarative settings for an application.
#[derive(Debug, Clone, Default)]
pub struct ApplicationConfig {
    name: Option<String>,
    lenient: bool,
    arguments: Vec<ArgumentSpec>,
    options: Vec<OptionSpec>,
    commands: Vec<CommandConfig>,
}

impl ApplicationConfig {
    /// An empty application.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Lenient parsing for every command that does not override it.
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// A global argument, inherited by every command.
    pub fn argument(mut self, argument: ArgumentSpec) -> Self {
        self.arguments.push(argument);
        self
    }

    /// A global option, inherited by every command.
    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Adds a root command.
    pub fn command(mut self, command: CommandConfig) -> Self {
        self.commands.push(command);
        self
    }

    /// Validates the configuration and builds the command tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdroute_core::{ApplicationConfig, CommandConfig, OptionSpec};
    ///
    /// let app = ApplicationConfig::new()
    ///     .name("app")
    ///     .option(OptionSpec::builder("verbose").short_name("v").build().unwrap())
    ///     .command(
    ///         CommandConfig::new("package")
    ///             .alias("pkg")
    ///             .sub_command(CommandConfig::new("add"))
    ///             .sub_command(CommandConfig::option_command("delete").short_name("d")),
    ///     )
    ///     .build()
    ///     .unwrap();
    ///
    /// let package = app.command("pkg").unwrap();
    /// assert_eq!(package.name(), "package");
    /// assert!(package.format().option("verbose").is_some());
    /// assert_eq!(package.sub_commands().len(), 2);
    /// ```
    pub fn build(self) -> Result<Application> {
        let format = ArgsFormat::builder()
            .add_options(self.options)?
            .add_arguments(self.arguments)?
            .build();
        let commands = build_children(self.commands, &format, self.lenient, None, &[])?;
        debug!(name = ?self.name, commands = commands.len(), "Built application");
        Ok(Application {
            name: self.name,
            format,
            commands,
        })
    }
}

fn build_children(
    configs: Vec<CommandConfig>,
    parent_format: &ArgsFormat,
    parent_lenient: bool,
    parent_handler: Option<&str>,
    parent_path: &[String],
) -> Result<Vec<Command>> {
    let mut taken = HashSet::new();
    let mut commands = Vec::with_capacity(configs.len());
    for config in configs {
        let command = build_command(
            config,
            parent_format,
            parent_lenient,
            parent_handler,
            parent_path,
        )?;
        for spelling in command.spellings() {
            if !taken.insert(spelling.clone()) {
                return Err(FormatError::DuplicateCommand(spelling).into());
            }
        }
        commands.push(command);
    }
    Ok(commands)
}

fn build_command(
    config: CommandConfig,
    parent_format: &ArgsFormat,
    parent_lenient: bool,
    parent_handler: Option<&str>,
    parent_path: &[String],
) -> Result<Command> {
    let mut builder = ArgsFormat::extend(parent_format);
    let option = match config.kind {
        CommandKind::Named => {
            if config.short_name.is_some() {
                return Err(FormatError::ShortNameOnNamedCommand(config.name).into());
            }
            builder =
                builder.add_command_name(CommandName::new(&config.name, config.aliases.clone())?);
            None
        }
        CommandKind::Option => {
            let mut option =
                CommandOption::builder(config.name.as_str()).aliases(config.aliases.clone());
            if let Some(short) = &config.short_name {
                option = option.short_name(short.as_str());
            }
            if let Some(description) = &config.description {
                option = option.description(description.as_str());
            }
            let option = option.build()?;
            builder = builder.add_command_option(option.clone())?;
            Some(option)
        }
    };
    let format = builder
        .add_options(config.options)?
        .add_arguments(config.arguments)?
        .build();

    let name = option
        .as_ref()
        .map_or_else(|| config.name.clone(), |option| option.long_name().to_string());
    let lenient = config.lenient.unwrap_or(parent_lenient);
    let handler = config.handler.or_else(|| parent_handler.map(str::to_string));
    let mut path = parent_path.to_vec();
    path.push(name.clone());

    let sub_commands = build_children(
        config.sub_commands,
        &format,
        lenient,
        handler.as_deref(),
        &path,
    )?;

    Ok(Command {
        name,
        aliases: config.aliases,
        option,
        description: config.description,
        default: config.default,
        lenient,
        handler,
        format,
        sub_commands,
        path,
    })
}

/// A node of the command tree with its flattened format.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    name: String,
    aliases: Vec<String>,
    option: Option<CommandOption>,
    description: Option<String>,
    default: bool,
    lenient: bool,
    handler: Option<String>,
    format: ArgsFormat,
    sub_commands: Vec<Command>,
    path: Vec<String>,
}

impl Command {
    /// Primary name; the long name for option-commands.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternative names, in declaration order.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Named command or option-command.
    pub fn kind(&self) -> CommandKind {
        if self.option.is_some() {
            CommandKind::Option
        } else {
            CommandKind::Named
        }
    }

    /// Returns `true` if an option token selects the command.
    pub fn is_option_command(&self) -> bool {
        self.option.is_some()
    }

    /// The selecting option of an option-command.
    pub fn command_option(&self) -> Option<&CommandOption> {
        self.option.as_ref()
    }

    /// Help text, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns `true` if the command is entered when its parent is given alone.
    pub fn is_default(&self) -> bool {
        self.default
    }

    /// Own or inherited lenient setting.
    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// Own or inherited handler id.
    pub fn handler(&self) -> Option<&str> {
        self.handler.as_deref()
    }

    /// The flattened format: global, then every ancestor, then this command.
    pub fn format(&self) -> &ArgsFormat {
        &self.format
    }

    /// Named sub-commands followed by option-commands.
    pub fn sub_commands(&self) -> &[Command] {
        &self.sub_commands
    }

    /// Names from the root down to this command.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Returns `true` for a named command whose name or alias is `token`.
    pub fn matches_name(&self, token: &str) -> bool {
        self.option.is_none()
            && (self.name == token || self.aliases.iter().any(|alias| alias == token))
    }

    /// Returns `true` for an option-command selected by `--long`.
    pub fn matches_long_option(&self, name: &str) -> bool {
        self.option
            .as_ref()
            .is_some_and(|option| option.names().matches_long(name))
    }

    /// Returns `true` for an option-command selected by `-s`.
    pub fn matches_short_option(&self, short: char) -> bool {
        self.option
            .as_ref()
            .is_some_and(|option| option.names().matches_short(short))
    }

    /// The named sub-command called `name` (or aliased so).
    pub fn sub_command(&self, name: &str) -> Option<&Command> {
        self.sub_commands.iter().find(|command| command.matches_name(name))
    }

    /// Sub-commands marked default, in declaration order.
    pub fn default_sub_commands(&self) -> impl Iterator<Item = &Command> {
        self.sub_commands.iter().filter(|command| command.default)
    }

    /// Parses `raw` against this command's format with its lenient setting.
    pub fn parse_args<'a>(
        &'a self,
        raw: &'a RawArgs,
    ) -> std::result::Result<ParsedArgs<'a>, ParseError> {
        parse_args(raw, &self.format, self.lenient)
    }

    /// Every spelling that selects this command among its siblings.
    fn spellings(&self) -> Vec<String> {
        match &self.option {
            Some(option) => option.names().spellings(),
            None => std::iter::once(&self.name)
                .chain(&self.aliases)
                .cloned()
                .collect(),
        }
    }
}

/// An immutable, validated command tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    name: Option<String>,
    format: ArgsFormat,
    commands: Vec<Command>,
}

impl Application {
    /// Application name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The global format every command extends.
    pub fn format(&self) -> &ArgsFormat {
        &self.format
    }

    /// Root commands in declaration order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The named root command called `name` (or aliased so).
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.matches_name(name))
    }

    /// Follows a path of names, e.g. `["package", "add"]`. Option-commands
    /// are found by their long name.
    pub fn find(&self, path: &[&str]) -> Option<&Command> {
        let (first, rest) = path.split_first()?;
        let find_in = |commands: &'_ [Command], name: &str| -> Option<usize> {
            commands
                .iter()
                .position(|command| command.matches_name(name) || command.matches_long_option(name))
        };
        let mut current = &self.commands[find_in(&self.commands, first)?];
        for name in rest {
            current = &current.sub_commands[find_in(&current.sub_commands, name)?];
        }
        Some(current)
    }

    /// Root commands marked default, in declaration order.
    pub fn default_commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(|command| command.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::format::OptionValue;

    fn app() -> Application {
        ApplicationConfig::new()
            .name("app")
            .option(OptionSpec::builder("option").short_name("o").build().unwrap())
            .argument(ArgumentSpec::optional("arg").unwrap())
            .command(
                CommandConfig::new("package")
                    .alias("package-alias")
                    .handler("package-handler")
                    .option(
                        OptionSpec::builder("force")
                            .value(OptionValue::Optional)
                            .build()
                            .unwrap(),
                    )
                    .sub_command(CommandConfig::new("add").alias("add-alias"))
                    .sub_command(
                        CommandConfig::option_command("delete")
                            .short_name("d")
                            .alias("delete-alias")
                            .handler("delete-handler")
                            .lenient(true),
                    ),
            )
            .command(CommandConfig::new("default").mark_default())
            .build()
            .unwrap()
    }

    #[test]
    fn test_formats_are_flattened() {
        let app = app();
        let add = app.find(&["package", "add"]).unwrap();
        let format = add.format();

        let anchors: Vec<&str> = format.command_names().iter().map(CommandName::name).collect();
        assert_eq!(anchors, ["package", "add"]);
        assert!(format.option("option").is_some());
        assert!(format.option("force").is_some());
        assert!(format.argument("arg").is_some());
        assert_eq!(add.path(), ["package", "add"]);
    }

    #[test]
    fn test_option_command_format() {
        let app = app();
        let delete = app.find(&["package", "delete"]).unwrap();
        assert!(delete.is_option_command());
        assert_eq!(delete.kind(), CommandKind::Option);
        assert!(delete.format().command_option("delete").is_some());
        assert!(delete.format().command_option_by_short('d').is_some());
        assert!(delete.matches_long_option("delete-alias"));
        assert!(delete.matches_short_option('d'));
        assert!(!delete.matches_name("delete"));
    }

    #[test]
    fn test_settings_are_inherited() {
        let app = app();
        let package = app.command("package").unwrap();
        let add = package.sub_command("add-alias").unwrap();
        let delete = app.find(&["package", "delete"]).unwrap();

        assert_eq!(add.handler(), Some("package-handler"));
        assert!(!add.is_lenient());
        assert_eq!(delete.handler(), Some("delete-handler"));
        assert!(delete.is_lenient());
    }

    #[test]
    fn test_lookup_and_defaults() {
        let app = app();
        assert_eq!(app.name(), Some("app"));
        assert_eq!(app.command("package-alias").unwrap().name(), "package");
        assert!(app.command("add").is_none());
        let defaults: Vec<&str> = app.default_commands().map(Command::name).collect();
        assert_eq!(defaults, ["default"]);
        assert!(app.find(&[]).is_none());
        assert!(app.find(&["package", "nope"]).is_none());
    }

    #[test]
    fn test_duplicate_sibling_commands() {
        let result = ApplicationConfig::new()
            .command(CommandConfig::new("pack").alias("p"))
            .command(CommandConfig::new("p"))
            .build();
        assert_eq!(
            result.map(|_| ()),
            Err(Error::InvalidFormat(FormatError::DuplicateCommand("p".to_string())))
        );
    }

    #[test]
    fn test_option_collision_with_parent_fails() {
        let result = ApplicationConfig::new()
            .option(OptionSpec::builder("delete").build().unwrap())
            .command(CommandConfig::option_command("delete"))
            .build();
        assert!(matches!(
            result,
            Err(Error::InvalidFormat(FormatError::DuplicateOption(_)))
        ));
    }

    #[test]
    fn test_short_name_on_named_command_fails() {
        let result = ApplicationConfig::new()
            .command(CommandConfig::new("package").short_name("p"))
            .build();
        assert!(matches!(
            result,
            Err(Error::InvalidFormat(FormatError::ShortNameOnNamedCommand(_)))
        ));
    }

    #[test]
    fn test_invalid_command_name_fails() {
        let result = ApplicationConfig::new().command(CommandConfig::new("bad_name")).build();
        assert!(matches!(
            result,
            Err(Error::InvalidFormat(FormatError::InvalidCommandName(_)))
        ));
    }

    #[test]
    fn test_command_parse_uses_lenient_setting() {
        let app = app();
        let delete = app.find(&["package", "delete"]).unwrap();
        let raw = RawArgs::parse("package --delete --unknown");
        assert!(delete.parse_args(&raw).is_ok());

        let package = app.command("package").unwrap();
        let raw = RawArgs::parse("package --unknown");
        assert!(package.parse_args(&raw).is_err());
    }
}
