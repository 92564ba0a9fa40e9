//! Typed values and the coercion rules that turn raw tokens into them.
//!
//! Tokens arrive as strings, but arguments and options declare a
//! [`ValueType`] plus a nullability flag. Coercion is deliberately narrow:
//! only the spellings listed on each function are accepted, everything else
//! is an [`InvalidValue`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidValue;

/// Declared type of an argument or option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    String,
    #[serde(alias = "bool")]
    Boolean,
    #[serde(alias = "int")]
    Integer,
    Float,
}

impl ValueType {
    /// Coerces `value` to this type.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdroute_core::{Value, ValueType};
    ///
    /// assert_eq!(ValueType::Integer.coerce(&Value::from("1.23"), false), Ok(Value::Int(1)));
    /// assert_eq!(ValueType::Boolean.coerce(&Value::from("off"), false), Ok(Value::Bool(false)));
    /// assert_eq!(ValueType::String.coerce(&Value::from("null"), true), Ok(Value::Null));
    /// ```
    pub fn coerce(self, value: &Value, nullable: bool) -> Result<Value, InvalidValue> {
        match self {
            ValueType::String => parse_string(value, nullable),
            ValueType::Boolean => parse_boolean(value, nullable),
            ValueType::Integer => parse_integer(value, nullable),
            ValueType::Float => parse_float(value, nullable),
        }
    }

    fn article_name(self) -> &'static str {
        match self {
            ValueType::String => "a string",
            ValueType::Boolean => "a boolean",
            ValueType::Integer => "an integer",
            ValueType::Float => "a float",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
        };
        f.write_str(name)
    }
}

/// A parsed argument or option value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The string, if this is [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The items, if this is [`Value::List`].
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

fn conversion_error(value: &Value, target: ValueType) -> InvalidValue {
    let shown = match value {
        Value::List(_) => format!("[{value}]"),
        _ => value.to_string(),
    };
    InvalidValue::Conversion {
        value: shown,
        expected: target.article_name(),
    }
}

/// Converts to a string. Scalars are stringified; `null` (or the string
/// `"null"`) becomes [`Value::Null`] only when `nullable`.
pub fn parse_string(value: &Value, nullable: bool) -> Result<Value, InvalidValue> {
    match value {
        Value::Null if nullable => Ok(Value::Null),
        Value::String(s) if nullable && s == "null" => Ok(Value::Null),
        Value::List(_) => Err(conversion_error(value, ValueType::String)),
        other => Ok(Value::String(other.to_string())),
    }
}

/// Converts to a boolean.
///
/// Accepted: `""`, `false`, `0`, `no`, `off` and `true`, `1`, `yes`, `on`
/// (strings), booleans, and the integers 0 and 1.
pub fn parse_boolean(value: &Value, nullable: bool) -> Result<Value, InvalidValue> {
    match value {
        Value::Null if nullable => Ok(Value::Null),
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::Int(0) => Ok(Value::Bool(false)),
        Value::Int(1) => Ok(Value::Bool(true)),
        Value::String(s) => match s.as_str() {
            "null" if nullable => Ok(Value::Null),
            "" | "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
            "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
            _ => Err(conversion_error(value, ValueType::Boolean)),
        },
        _ => Err(conversion_error(value, ValueType::Boolean)),
    }
}

/// Converts to an integer. Numeric strings and floats are truncated,
/// booleans become 1 or 0.
pub fn parse_integer(value: &Value, nullable: bool) -> Result<Value, InvalidValue> {
    match value {
        Value::Null if nullable => Ok(Value::Null),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Float(x) if x.is_finite() => Ok(Value::Int(x.trunc() as i64)),
        Value::String(s) if nullable && s == "null" => Ok(Value::Null),
        Value::String(s) => match parse_numeric(s) {
            Some(Numeric::Int(i)) => Ok(Value::Int(i)),
            Some(Numeric::Float(x)) => Ok(Value::Int(x.trunc() as i64)),
            None => Err(conversion_error(value, ValueType::Integer)),
        },
        _ => Err(conversion_error(value, ValueType::Integer)),
    }
}

/// Converts to a float. Numeric strings and integers are widened, booleans
/// become 1.0 or 0.0.
pub fn parse_float(value: &Value, nullable: bool) -> Result<Value, InvalidValue> {
    match value {
        Value::Null if nullable => Ok(Value::Null),
        Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::Float(x) if x.is_finite() => Ok(Value::Float(*x)),
        Value::String(s) if nullable && s == "null" => Ok(Value::Null),
        Value::String(s) => match parse_numeric(s) {
            Some(Numeric::Int(i)) => Ok(Value::Float(i as f64)),
            Some(Numeric::Float(x)) => Ok(Value::Float(x)),
            None => Err(conversion_error(value, ValueType::Float)),
        },
        _ => Err(conversion_error(value, ValueType::Float)),
    }
}

enum Numeric {
    Int(i64),
    Float(f64),
}

/// Recognises decimal numbers: optional sign, digits with an optional
/// fraction, optional exponent. Surrounding whitespace is ignored.
fn parse_numeric(input: &str) -> Option<Numeric> {
    let text = input.trim();
    let bytes = text.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }
    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let mut digits = pos - int_start;
    let mut integral = true;

    if pos < bytes.len() && bytes[pos] == b'.' {
        integral = false;
        pos += 1;
        let frac_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        digits += pos - frac_start;
    }
    if digits == 0 {
        return None;
    }

    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        integral = false;
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let exp_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == exp_start {
            return None;
        }
    }
    if pos != bytes.len() {
        return None;
    }

    if integral {
        if let Ok(i) = text.parse::<i64>() {
            return Some(Numeric::Int(i));
        }
    }
    text.parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
        .map(Numeric::Float)
}
