//! Command anchors: the names and option spellings that select a command
//! and that the parser consumes without storing.

use std::fmt;

use crate::error::{FormatError, Result};
use crate::format::names::{OptionNames, PreferredName, validate_command_name};

/// A command name with aliases, matched against a positional token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandName {
    name: String,
    aliases: Vec<String>,
}

impl CommandName {
    /// A command name with its aliases.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidCommandName`](crate::FormatError) when a
    /// name is not a letter followed by letters, digits or dashes.
    pub fn new<I, S>(name: &str, aliases: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        validate_command_name(name)?;
        let aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();
        for alias in &aliases {
            validate_command_name(alias)?;
        }
        Ok(Self {
            name: name.to_string(),
            aliases,
        })
    }

    /// Primary name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternative names, in declaration order.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Returns `true` if `token` is the name or one of the aliases.
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|alias| alias == token)
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A value-less option whose presence selects a command, e.g. `--delete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOption {
    names: OptionNames,
    description: Option<String>,
}

impl CommandOption {
    /// Starts a command option selected by `--long_name`.
    pub fn builder(long_name: impl Into<String>) -> CommandOptionBuilder {
        CommandOptionBuilder {
            long_name: long_name.into(),
            ..CommandOptionBuilder::default()
        }
    }

    /// All spellings that select the command.
    pub fn names(&self) -> &OptionNames {
        &self.names
    }

    /// Long name without dashes.
    pub fn long_name(&self) -> &str {
        self.names.long_name()
    }

    /// Short name without the dash.
    pub fn short_name(&self) -> Option<char> {
        self.names.short_name()
    }

    /// The preferred spelling with its dashes, e.g. `-d`.
    pub fn preferred_name(&self) -> String {
        self.names.preferred_name()
    }

    /// Help text, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandOptionBuilder {
    long_name: String,
    short_name: Option<String>,
    aliases: Vec<String>,
    preferred: Option<PreferredName>,
    description: Option<String>,
}

impl CommandOptionBuilder {
    /// Single letter, with or without the leading `-`.
    pub fn short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    /// Adds a long alias, or a short one for a single letter.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds several aliases, see `alias`.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Prefers `--long` even when a short name exists.
    pub fn prefer_long(mut self) -> Self {
        self.preferred = Some(PreferredName::Long);
        self
    }

    /// Sets the help text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validates and normalises the names.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`](crate::FormatError) for malformed names.
    pub fn build(self) -> Result<CommandOption> {
        let names = OptionNames::new(
            &self.long_name,
            self.short_name.as_deref(),
            &self.aliases,
            self.preferred,
        )?;
        if self.description.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err(FormatError::EmptyDescription.into());
        }
        Ok(CommandOption {
            names,
            description: self.description,
        })
    }
}
