//! Positional argument declarations.

use crate::error::{FormatError, InvalidValue, Result};
use crate::format::names::validate_argument_name;
use crate::value::{Value, ValueType};

/// A declared positional argument.
///
/// Arguments are optional and single-valued unless stated otherwise. Build
/// them with [`ArgumentSpec::builder`]; every rule is checked by
/// [`ArgumentSpecBuilder::build`].
///
/// # Examples
///
/// ```
/// use cmdroute_core::{ArgumentSpec, Value, ValueType};
///
/// let port = ArgumentSpec::builder("port")
///     .value_type(ValueType::Integer)
///     .default_value(8080)
///     .build()
///     .unwrap();
/// assert!(port.is_optional());
/// assert_eq!(port.default_value(), &Value::Int(8080));
/// assert_eq!(port.parse_value("80"), Ok(Value::Int(80)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    name: String,
    required: bool,
    multi_valued: bool,
    value_type: ValueType,
    nullable: bool,
    default: Value,
    description: Option<String>,
}

impl ArgumentSpec {
    /// Starts an optional, single-valued string argument.
    pub fn builder(name: impl Into<String>) -> ArgumentSpecBuilder {
        ArgumentSpecBuilder {
            name: name.into(),
            ..ArgumentSpecBuilder::default()
        }
    }

    /// An optional single-valued string argument.
    pub fn optional(name: &str) -> Result<Self> {
        Self::builder(name).build()
    }

    /// A required single-valued string argument.
    pub fn required(name: &str) -> Result<Self> {
        Self::builder(name).required().build()
    }

    /// Primary name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if parsing fails when the argument is missing.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Inverse of [`ArgumentSpec::is_required`].
    pub fn is_optional(&self) -> bool {
        !self.required
    }

    /// Returns `true` if the argument collects all remaining positionals.
    pub fn is_multi_valued(&self) -> bool {
        self.multi_valued
    }

    /// Type the raw strings are coerced to.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns `true` if `"null"` coerces to [`Value::Null`].
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The declared default; `[]` for multi-valued arguments without one.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Help text, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Coerces one raw value to the declared type.
    pub fn parse_value(&self, raw: impl Into<Value>) -> std::result::Result<Value, InvalidValue> {
        self.value_type.coerce(&raw.into(), self.nullable)
    }
}

/// Collects the settings of an [`ArgumentSpec`] before validation.
#[derive(Debug, Clone, Default)]
pub struct ArgumentSpecBuilder {
    name: String,
    required: bool,
    multi_valued: bool,
    value_type: ValueType,
    nullable: bool,
    default: Option<Value>,
    description: Option<String>,
}

impl ArgumentSpecBuilder {
    /// Makes the argument mandatory.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Makes the argument optional (the default).
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Collects all remaining positionals into a list.
    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
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

    /// Value used when the argument is absent; checked against the type on build.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the help text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validates the name and the default.
    ///
    /// # Errors
    ///
    /// Fails on an invalid name or an empty description
    /// ([`FormatError`](crate::FormatError)), and on a default given to a
    /// required argument or not fitting the type
    /// ([`InvalidValue`](crate::InvalidValue)).
    pub fn build(self) -> Result<ArgumentSpec> {
        validate_argument_name(&self.name)?;
        if self.description.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err(FormatError::EmptyDescription.into());
        }

        let explicit_default = self.default.filter(|value| !value.is_null());
        if self.required && explicit_default.is_some() {
            return Err(InvalidValue::DefaultForRequired(self.name).into());
        }

        let default = coerce_default(
            &self.name,
            explicit_default,
            self.multi_valued,
            self.value_type,
            self.nullable,
        )?;

        Ok(ArgumentSpec {
            name: self.name,
            required: self.required,
            multi_valued: self.multi_valued,
            value_type: self.value_type,
            nullable: self.nullable,
            default,
            description: self.description,
        })
    }
}

/// Normalises a declared default: missing defaults become `null` (or `[]`
/// when multi-valued), present ones are coerced element-wise.
pub(crate) fn coerce_default(
    name: &str,
    default: Option<Value>,
    multi_valued: bool,
    value_type: ValueType,
    nullable: bool,
) -> std::result::Result<Value, InvalidValue> {
    match (default, multi_valued) {
        (None, false) => Ok(Value::Null),
        (None, true) => Ok(Value::List(Vec::new())),
        (Some(Value::List(items)), true) => items
            .iter()
            .map(|item| value_type.coerce(item, nullable))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::List),
        (Some(_), true) => Err(InvalidValue::ScalarDefaultForMultiValued(name.to_string())),
        (Some(value), false) => value_type.coerce(&value, nullable),
    }
}
