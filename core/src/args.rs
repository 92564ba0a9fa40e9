//! The result of parsing raw tokens against a format.

use std::collections::BTreeMap;

use crate::error::{Error, InvalidValue, Result};
use crate::format::{ArgsFormat, OptionValue};
use crate::token::RawArgs;
use crate::value::Value;

/// Argument and option values parsed from one invocation.
///
/// Only explicitly given values are stored; declared defaults are filled in
/// on read. Command-name anchors and command options are consumed by the
/// parser and never appear among the options.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArgs<'a> {
    format: &'a ArgsFormat,
    raw: &'a RawArgs,
    arguments: BTreeMap<String, Value>,
    options: BTreeMap<String, Value>,
    command_options: Vec<String>,
}

impl<'a> ParsedArgs<'a> {
    /// An empty set of values for `format`.
    pub fn new(format: &'a ArgsFormat, raw: &'a RawArgs) -> Self {
        Self {
            format,
            raw,
            arguments: BTreeMap::new(),
            options: BTreeMap::new(),
            command_options: Vec::new(),
        }
    }

    /// The format the values were parsed against.
    pub fn format(&self) -> &'a ArgsFormat {
        self.format
    }

    /// The tokens the values were parsed from.
    pub fn raw_args(&self) -> &'a RawArgs {
        self.raw
    }

    /// Argument values by name. With `include_defaults`, every declared
    /// argument is present and unset ones carry their default.
    pub fn arguments(&self, include_defaults: bool) -> BTreeMap<String, Value> {
        if !include_defaults {
            return self.arguments.clone();
        }
        self.format
            .arguments()
            .iter()
            .map(|spec| {
                let value = self.arguments.get(spec.name()).unwrap_or(spec.default_value());
                (spec.name().to_string(), value.clone())
            })
            .collect()
    }

    /// Option values by long name, see [`ParsedArgs::arguments`].
    pub fn options(&self, include_defaults: bool) -> BTreeMap<String, Value> {
        if !include_defaults {
            return self.options.clone();
        }
        self.format
            .options()
            .iter()
            .map(|spec| {
                let value = self.options.get(spec.long_name()).unwrap_or(spec.default_value());
                (spec.long_name().to_string(), value.clone())
            })
            .collect()
    }

    /// The explicit value of `name`, or its default.
    pub fn argument(&self, name: &str) -> Result<&Value> {
        let spec = self
            .format
            .argument(name)
            .ok_or_else(|| Error::NoSuchArgument(name.to_string()))?;
        Ok(self.arguments.get(name).unwrap_or(spec.default_value()))
    }

    /// The explicit value of the option `name` (long name or alias), or its
    /// default.
    pub fn option(&self, name: &str) -> Result<&Value> {
        let spec = self
            .format
            .option(name)
            .ok_or_else(|| Error::NoSuchOption(name.to_string()))?;
        Ok(self.options.get(spec.long_name()).unwrap_or(spec.default_value()))
    }

    /// Returns `true` if the argument was given explicitly.
    pub fn is_argument_set(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    /// Returns `true` if the option (long name or alias) was given explicitly.
    pub fn is_option_set(&self, name: &str) -> bool {
        self.format
            .option(name)
            .is_some_and(|spec| self.options.contains_key(spec.long_name()))
    }

    /// Returns `true` if the format declares the argument.
    pub fn is_argument_defined(&self, name: &str) -> bool {
        self.format.argument(name).is_some()
    }

    /// Returns `true` if the format declares the option under this name or alias.
    pub fn is_option_defined(&self, name: &str) -> bool {
        self.format.option(name).is_some()
    }

    /// Sets an argument, coercing through its declared type.
    pub fn set_argument(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self> {
        let format = self.format;
        let spec = format
            .argument(name)
            .ok_or_else(|| Error::NoSuchArgument(name.to_string()))?;
        let value = coerce_field(value.into(), spec.is_multi_valued(), |raw| {
            spec.parse_value(raw)
        })?;
        self.arguments.insert(name.to_string(), value);
        Ok(self)
    }

    /// Sets an option, coercing through its declared type. Flags coerce as
    /// booleans.
    pub fn set_option(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self> {
        let format = self.format;
        let spec = format
            .option(name)
            .ok_or_else(|| Error::NoSuchOption(name.to_string()))?;
        let value = coerce_field(value.into(), spec.is_multi_valued(), |raw| {
            spec.parse_value(raw)
        })?;
        self.options.insert(spec.long_name().to_string(), value);
        Ok(self)
    }

    /// Long names of the command options consumed during parsing.
    pub fn selected_command_options(&self) -> &[String] {
        &self.command_options
    }

    /// Re-serialises the explicitly set values as tokens: command-name
    /// anchors, selected command options, options as `--name=value`, then
    /// `--` followed by the positional values. Flags set to `false` read the
    /// same as absent ones and are left out.
    pub fn to_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self
            .format
            .command_names()
            .iter()
            .map(|name| name.name().to_string())
            .collect();
        tokens.extend(self.command_options.iter().map(|name| format!("--{name}")));

        for spec in self.format.options() {
            let Some(value) = self.options.get(spec.long_name()) else {
                continue;
            };
            let long = spec.long_name();
            match (spec.value(), value) {
                (OptionValue::None, Value::Bool(true)) => tokens.push(format!("--{long}")),
                (OptionValue::None, _) => {}
                (OptionValue::Multi, Value::List(items)) => {
                    tokens.extend(items.iter().map(|item| format!("--{long}={item}")));
                }
                (OptionValue::Optional, value) if value == spec.default_value() => {
                    tokens.push(format!("--{long}"));
                }
                (_, value) => tokens.push(format!("--{long}={value}")),
            }
        }

        let positionals: Vec<String> = self
            .format
            .arguments()
            .iter()
            .filter_map(|spec| self.arguments.get(spec.name()))
            .flat_map(|value| match value {
                Value::List(items) => items.iter().map(Value::to_string).collect(),
                other => vec![other.to_string()],
            })
            .collect();
        if !positionals.is_empty() {
            tokens.push("--".to_string());
            tokens.extend(positionals);
        }
        tokens
    }

    pub(crate) fn insert_argument(&mut self, name: &str, value: Value) {
        self.arguments.insert(name.to_string(), value);
    }

    pub(crate) fn push_argument(&mut self, name: &str, value: Value) {
        push_value(&mut self.arguments, name, value);
    }

    pub(crate) fn insert_option(&mut self, long_name: &str, value: Value) {
        self.options.insert(long_name.to_string(), value);
    }

    pub(crate) fn push_option(&mut self, long_name: &str, value: Value) {
        push_value(&mut self.options, long_name, value);
    }

    pub(crate) fn select_command_option(&mut self, long_name: &str) {
        if !self.command_options.iter().any(|name| name == long_name) {
            self.command_options.push(long_name.to_string());
        }
    }
}

fn push_value(values: &mut BTreeMap<String, Value>, name: &str, value: Value) {
    let entry = values
        .entry(name.to_string())
        .or_insert_with(|| Value::List(Vec::new()));
    match entry {
        Value::List(items) => items.push(value),
        other => *other = Value::List(vec![std::mem::take(other), value]),
    }
}

fn coerce_field<F>(
    value: Value,
    multi_valued: bool,
    parse: F,
) -> std::result::Result<Value, InvalidValue>
where
    F: Fn(Value) -> std::result::Result<Value, InvalidValue>,
{
    match (value, multi_valued) {
        (Value::List(items), true) => items
            .into_iter()
            .map(parse)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::List),
        (scalar, true) => Ok(Value::List(vec![parse(scalar)?])),
        (value, false) => parse(value),
    }
}
