//! Serde models for declarative application definitions.
//!
//! The models mirror the core builders one to one. Nothing is validated on
//! deserialization; [`ApplicationDefinition::build`] hands the settings to
//! [`ApplicationConfig`] which checks the whole tree.
//!
//! # Example YAML
//!
//! ```yaml
//! name: app
//! default_command: help
//! options:
//!   - { name: verbose, short: v }
//! commands:
//!   - name: package
//!     aliases: [pkg]
//!     commands:
//!       - { name: add, arguments: [{ name: name, required: true }] }
//!     option_commands:
//!       - { name: delete, short: d }
//!   - name: help
//! ```

use serde::{Deserialize, Serialize};

use cmdroute_core::{
    Application, ApplicationConfig, ArgumentSpec, CommandConfig, OptionSpec, OptionValue,
    PreferredName, Resolver, Value, ValueType,
};

use crate::error::Result;

/// Top-level definition of an application.
///
/// # Examples
///
/// ```
/// use cmdroute_config::ApplicationDefinition;
///
/// let definition = ApplicationDefinition::from_yaml_str(
///     "name: app\ndefault_command: help\ncommands:\n  - name: help\n",
/// )
/// .unwrap();
/// let app = definition.build().unwrap();
/// assert_eq!(app.commands()[0].name(), "help");
/// assert_eq!(definition.resolver().default_command(), Some("help"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationDefinition {
    /// Display name of the application.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Root command used when no command name is passed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_command: Option<String>,
    /// Lenient parsing for every command that does not override it.
    pub lenient: bool,
    /// Global options, inherited by every command.
    pub options: Vec<OptionDefinition>,
    /// Global arguments, inherited by every command.
    pub arguments: Vec<ArgumentDefinition>,
    /// Named root commands.
    pub commands: Vec<CommandDefinition>,
    /// Root option-commands such as `--version`.
    pub option_commands: Vec<CommandDefinition>,
}

impl ApplicationDefinition {
    /// Builds and validates the command tree.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDefinition`](crate::ConfigError::InvalidDefinition)
    /// when a name, option, argument or default value is invalid.
    pub fn build(&self) -> Result<Application> {
        let mut config = ApplicationConfig::new().lenient(self.lenient);
        if let Some(name) = &self.name {
            config = config.name(name.as_str());
        }
        for option in &self.options {
            config = config.option(option.to_spec()?);
        }
        for argument in &self.arguments {
            config = config.argument(argument.to_spec()?);
        }
        for command in &self.commands {
            config = config.command(command.to_config(false)?);
        }
        for command in &self.option_commands {
            config = config.command(command.to_config(true)?);
        }
        Ok(config.build()?)
    }

    /// A resolver falling back to [`default_command`](Self::default_command).
    pub fn resolver(&self) -> Resolver {
        match &self.default_command {
            Some(name) => Resolver::with_default_command(name.as_str()),
            None => Resolver::new(),
        }
    }
}

/// A named command or an option-command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandDefinition {
    pub name: String,
    /// Short name; only valid on option-commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Marks the command as a default of its parent.
    pub default: bool,
    /// Overrides the inherited lenient flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lenient: Option<bool>,
    /// Opaque handler id, inherited by sub-commands when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    pub arguments: Vec<ArgumentDefinition>,
    pub options: Vec<OptionDefinition>,
    /// Named sub-commands.
    pub commands: Vec<CommandDefinition>,
    /// Sub-commands selected by `--name` or `-s`.
    pub option_commands: Vec<CommandDefinition>,
}

impl CommandDefinition {
    fn to_config(&self, option_command: bool) -> Result<CommandConfig> {
        let mut config = if option_command {
            CommandConfig::option_command(self.name.as_str())
        } else {
            CommandConfig::new(self.name.as_str())
        };
        if let Some(short) = &self.short {
            config = config.short_name(short.as_str());
        }
        for alias in &self.aliases {
            config = config.alias(alias.as_str());
        }
        if let Some(description) = &self.description {
            config = config.description(description.as_str());
        }
        if self.default {
            config = config.mark_default();
        }
        if let Some(lenient) = self.lenient {
            config = config.lenient(lenient);
        }
        if let Some(handler) = &self.handler {
            config = config.handler(handler.as_str());
        }
        for option in &self.options {
            config = config.option(option.to_spec()?);
        }
        for argument in &self.arguments {
            config = config.argument(argument.to_spec()?);
        }
        for command in &self.commands {
            config = config.sub_command(command.to_config(false)?);
        }
        for command in &self.option_commands {
            config = config.sub_command(command.to_config(true)?);
        }
        Ok(config)
    }
}

/// A positional argument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArgumentDefinition {
    pub name: String,
    pub required: bool,
    #[serde(alias = "multi-valued")]
    pub multi_valued: bool,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ArgumentDefinition {
    /// Converts to a validated [`ArgumentSpec`].
    pub fn to_spec(&self) -> Result<ArgumentSpec> {
        let mut builder = ArgumentSpec::builder(self.name.as_str()).value_type(self.value_type);
        if self.required {
            builder = builder.required();
        }
        if self.multi_valued {
            builder = builder.multi_valued();
        }
        if self.nullable {
            builder = builder.nullable();
        }
        if let Some(default) = &self.default {
            builder = builder.default_value(default.clone());
        }
        if let Some(description) = &self.description {
            builder = builder.description(description.as_str());
        }
        Ok(builder.build()?)
    }
}

/// An option such as `--output=file` or `-v`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    pub aliases: Vec<String>,
    pub value: OptionValue,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_name: Option<String>,
    /// Which spelling help output should show.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefer: Option<PreferredName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OptionDefinition {
    /// Converts to a validated [`OptionSpec`].
    pub fn to_spec(&self) -> Result<OptionSpec> {
        let mut builder = OptionSpec::builder(self.name.as_str())
            .aliases(self.aliases.iter().map(String::as_str))
            .value(self.value)
            .value_type(self.value_type)
            .preferred(self.prefer);
        if let Some(short) = &self.short {
            builder = builder.short_name(short.as_str());
        }
        if self.nullable {
            builder = builder.nullable();
        }
        if let Some(default) = &self.default {
            builder = builder.default_value(default.clone());
        }
        if let Some(value_name) = &self.value_name {
            builder = builder.value_name(value_name.as_str());
        }
        if let Some(description) = &self.description {
            builder = builder.description(description.as_str());
        }
        Ok(builder.build()?)
    }
}
