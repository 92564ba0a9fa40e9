//! Option declarations.

use serde::{Deserialize, Serialize};

use crate::error::{FormatError, InvalidValue, Result};
use crate::format::argument::coerce_default;
use crate::format::names::{OptionNames, PreferredName};
use crate::value::{Value, ValueType};

/// How many values an option takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionValue {
    /// A flag; present means `true`.
    #[default]
    None,
    /// `--opt` or `--opt=value`.
    Optional,
    /// `--opt value` or `--opt=value`; the value must be given.
    Required,
    /// Repeatable, each occurrence requires a value.
    #[serde(alias = "multi-valued")]
    Multi,
}

/// Placeholder shown for an option value when none is configured.
pub const DEFAULT_VALUE_NAME: &str = "...";

/// A declared option.
///
/// # Examples
///
/// ```
/// use cmdroute_core::{OptionSpec, OptionValue, Value};
///
/// let output = OptionSpec::builder("output")
///     .short_name("o")
///     .value(OptionValue::Required)
///     .value_name("file")
///     .build()
///     .unwrap();
/// assert_eq!(output.long_name(), "output");
/// assert_eq!(output.short_name(), Some('o'));
/// assert_eq!(output.preferred_name(), "-o");
/// assert!(output.is_value_required());
///
/// let verbose = OptionSpec::builder("--verbose").build().unwrap();
/// assert!(!verbose.accepts_value());
/// assert_eq!(verbose.default_value(), &Value::Bool(false));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    names: OptionNames,
    value: OptionValue,
    value_type: ValueType,
    nullable: bool,
    default: Value,
    value_name: String,
    description: Option<String>,
}

impl OptionSpec {
    /// Starts a flag (no value, string type) called `--long_name`.
    pub fn builder(long_name: impl Into<String>) -> OptionSpecBuilder {
        OptionSpecBuilder {
            long_name: long_name.into(),
            ..OptionSpecBuilder::default()
        }
    }

    /// All spellings of the option.
    pub fn names(&self) -> &OptionNames {
        &self.names
    }

    /// Long name without dashes; values are keyed by it.
    pub fn long_name(&self) -> &str {
        self.names.long_name()
    }

    /// Short name without the dash.
    pub fn short_name(&self) -> Option<char> {
        self.names.short_name()
    }

    /// The preferred spelling with its dashes, e.g. `-o`.
    pub fn preferred_name(&self) -> String {
        self.names.preferred_name()
    }

    /// Whether and how many values the option takes.
    pub fn value(&self) -> OptionValue {
        self.value
    }

    /// Returns `false` for flags.
    pub fn accepts_value(&self) -> bool {
        self.value != OptionValue::None
    }

    /// Returns `true` for required and multi-valued options.
    pub fn is_value_required(&self) -> bool {
        matches!(self.value, OptionValue::Required | OptionValue::Multi)
    }

    /// Returns `true` if the value may be left out.
    pub fn is_value_optional(&self) -> bool {
        self.value == OptionValue::Optional
    }

    /// Returns `true` if each occurrence adds a value to a list.
    pub fn is_multi_valued(&self) -> bool {
        self.value == OptionValue::Multi
    }

    /// Type the raw strings are coerced to.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns `true` if `"null"` coerces to [`Value::Null`].
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Value reported when the option is absent: `false` for flags, `[]` for
    /// multi-valued options without a default, otherwise the declared
    /// default or `null`.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Placeholder shown for the value, [`DEFAULT_VALUE_NAME`] unless set.
    pub fn value_name(&self) -> &str {
        &self.value_name
    }

    /// Help text, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Coerces one raw value to the declared type. Flags coerce as booleans.
    pub fn parse_value(&self, raw: impl Into<Value>) -> std::result::Result<Value, InvalidValue> {
        let raw = raw.into();
        match self.value {
            OptionValue::None => ValueType::Boolean.coerce(&raw, false),
            _ => self.value_type.coerce(&raw, self.nullable),
        }
    }
}

/// Collects the settings of an [`OptionSpec`] before validation.
#[derive(Debug, Clone, Default)]
pub struct OptionSpecBuilder {
    long_name: String,
    short_name: Option<String>,
    aliases: Vec<String>,
    value: OptionValue,
    value_type: ValueType,
    nullable: bool,
    default: Option<Value>,
    preferred: Option<PreferredName>,
    value_name: Option<String>,
    description: Option<String>,
}

impl OptionSpecBuilder {
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

    /// Sets whether and how many values the option takes.
    pub fn value(mut self, value: OptionValue) -> Self {
        self.value = value;
        self
    }

    /// Sets the type raw strings are coerced to.
    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Lets `"null"` coerce to [`Value::Null`].
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Value used when the option is absent or given without a value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Prefers `--long` even when a short name exists.
    pub fn prefer_long(mut self) -> Self {
        self.preferred = Some(PreferredName::Long);
        self
    }

    /// Requires a short name; checked on build.
    pub fn prefer_short(mut self) -> Self {
        self.preferred = Some(PreferredName::Short);
        self
    }

    /// Sets or clears the preference; `None` picks short when one exists.
    pub fn preferred(mut self, preferred: Option<PreferredName>) -> Self {
        self.preferred = preferred;
        self
    }

    /// Sets the value placeholder; must not be empty.
    pub fn value_name(mut self, value_name: impl Into<String>) -> Self {
        self.value_name = Some(value_name.into());
        self
    }

    /// Sets the help text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validates names, value settings and the default.
    ///
    /// # Errors
    ///
    /// Fails on malformed names, a misplaced preference or an empty value name
    /// ([`FormatError`](crate::FormatError)), and on a default given to a flag
    /// or not fitting the type ([`InvalidValue`](crate::InvalidValue)).
    pub fn build(self) -> Result<OptionSpec> {
        let names = OptionNames::new(
            &self.long_name,
            self.short_name.as_deref(),
            &self.aliases,
            self.preferred,
        )?;
        if self.description.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err(FormatError::EmptyDescription.into());
        }
        let value_name = match self.value_name {
            Some(name) if name.trim().is_empty() => return Err(FormatError::EmptyValueName.into()),
            Some(name) => name,
            None => DEFAULT_VALUE_NAME.to_string(),
        };

        let explicit_default = self.default.filter(|value| !value.is_null());
        let default = match self.value {
            OptionValue::None if explicit_default.is_some() => {
                return Err(InvalidValue::DefaultForNoValue(names.long_name().to_string()).into());
            }
            OptionValue::None => Value::Bool(false),
            value => coerce_default(
                names.long_name(),
                explicit_default,
                value == OptionValue::Multi,
                self.value_type,
                self.nullable,
            )?,
        };

        Ok(OptionSpec {
            names,
            value: self.value,
            value_type: self.value_type,
            nullable: self.nullable,
            default,
            value_name,
            description: self.description,
        })
    }
}
