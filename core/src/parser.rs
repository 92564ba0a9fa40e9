//! Format-driven parsing of raw tokens.
//!
//! The parser walks the tokens once:
//!
//! 1. Leading tokens are matched against the format's command-name anchors
//!    in order; an anchor that does not match is skipped.
//! 2. `--` ends option processing; every later token is positional.
//! 3. `--name[=value]` and `-x[value]` tokens are options (or command
//!    options, which are consumed but not stored).
//! 4. Everything else fills the declared arguments in order; a multi-valued
//!    argument absorbs the rest.
//!
//! In lenient mode the first error stops the walk and whatever was parsed
//! so far is returned; missing required arguments are not reported.

use tracing::debug;

use crate::args::ParsedArgs;
use crate::error::ParseError;
use crate::format::{ArgsFormat, OptionSpec};
use crate::token::RawArgs;
use crate::value::Value;

/// Parses `raw` against `format`.
///
/// # Examples
///
/// ```
/// use cmdroute_core::{
///     ArgsFormat, ArgumentSpec, CommandName, OptionSpec, OptionValue, RawArgs, Value, parse_args,
/// };
///
/// let format = ArgsFormat::builder()
///     .add_command_name(CommandName::new("server", Vec::<String>::new()).unwrap())
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
/// let raw = RawArgs::parse("server -p8080 localhost");
/// let args = parse_args(&raw, &format, false).unwrap();
/// assert_eq!(args.option("port").unwrap(), &Value::from("8080"));
/// assert_eq!(args.argument("host").unwrap(), &Value::from("localhost"));
///
/// let raw = RawArgs::parse("server");
/// assert!(parse_args(&raw, &format, false).is_err());
/// assert!(parse_args(&raw, &format, true).is_ok());
/// ```
pub fn parse_args<'a>(
    raw: &'a RawArgs,
    format: &'a ArgsFormat,
    lenient: bool,
) -> Result<ParsedArgs<'a>, ParseError> {
    ArgsParser::new(raw, format, lenient).parse()
}

struct ArgsParser<'a> {
    format: &'a ArgsFormat,
    tokens: &'a [String],
    pos: usize,
    next_argument: usize,
    lenient: bool,
    args: ParsedArgs<'a>,
}

impl<'a> ArgsParser<'a> {
    fn new(raw: &'a RawArgs, format: &'a ArgsFormat, lenient: bool) -> Self {
        Self {
            format,
            tokens: raw.tokens(),
            pos: 0,
            next_argument: 0,
            lenient,
            args: ParsedArgs::new(format, raw),
        }
    }

    fn parse(mut self) -> Result<ParsedArgs<'a>, ParseError> {
        self.consume_command_names();

        let tokens = self.tokens;
        let mut options_ended = false;
        while let Some(token) = tokens.get(self.pos) {
            self.pos += 1;
            let step = if options_ended {
                self.parse_positional(token)
            } else if token == "--" {
                options_ended = true;
                Ok(())
            } else if let Some(body) = token.strip_prefix("--") {
                self.parse_long_option(body)
            } else if token.len() > 1 && token.starts_with('-') {
                self.parse_short_options(&token[1..])
            } else {
                self.parse_positional(token)
            };

            if let Err(err) = step {
                if !self.lenient {
                    return Err(err);
                }
                debug!(token = %token, error = %err, "Lenient parse stopped");
                break;
            }
        }

        if !self.lenient {
            self.check_required_arguments()?;
        }
        Ok(self.args)
    }

    fn consume_command_names(&mut self) {
        for name in self.format.command_names() {
            if let Some(token) = self.tokens.get(self.pos) {
                if name.matches(token) {
                    self.pos += 1;
                }
            }
        }
    }

    fn parse_long_option(&mut self, body: &str) -> Result<(), ParseError> {
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        let format = self.format;
        if let Some(command_option) = format.command_option(name) {
            if inline.is_some() {
                return Err(ParseError::UnexpectedOptionValue(
                    command_option.long_name().to_string(),
                ));
            }
            self.args.select_command_option(command_option.long_name());
            return Ok(());
        }

        let option = format
            .option(name)
            .ok_or_else(|| ParseError::NoSuchOption(format!("--{name}")))?;
        self.apply_option(option, inline)
    }

    /// Handles `-x`, the packed form `-xVALUE` and clusters such as `-abc`.
    fn parse_short_options(&mut self, body: &str) -> Result<(), ParseError> {
        let format = self.format;
        for (index, short) in body.char_indices() {
            if let Some(command_option) = format.command_option_by_short(short) {
                self.args.select_command_option(command_option.long_name());
                continue;
            }

            let option = format
                .option_by_short(short)
                .ok_or_else(|| ParseError::NoSuchOption(format!("-{short}")))?;
            if option.accepts_value() {
                let rest = &body[index + short.len_utf8()..];
                let inline = (!rest.is_empty()).then_some(rest);
                return self.apply_option(option, inline);
            }
            self.apply_option(option, None)?;
        }
        Ok(())
    }

    fn apply_option(
        &mut self,
        option: &OptionSpec,
        inline: Option<&str>,
    ) -> Result<(), ParseError> {
        let long = option.long_name();
        if !option.accepts_value() {
            if inline.is_some() {
                return Err(ParseError::UnexpectedOptionValue(long.to_string()));
            }
            self.args.insert_option(long, Value::Bool(true));
            return Ok(());
        }

        let raw_value = match inline {
            Some(value) => Some(value.to_string()),
            None => self.take_value_token(),
        };
        let Some(raw_value) = raw_value else {
            if option.is_value_required() {
                return Err(ParseError::MissingOptionValue(long.to_string()));
            }
            self.args.insert_option(long, option.default_value().clone());
            return Ok(());
        };

        let value = option
            .parse_value(raw_value)
            .map_err(|source| ParseError::InvalidValue {
                field: format!("--{long}"),
                source,
            })?;
        if option.is_multi_valued() {
            self.args.push_option(long, value);
        } else {
            self.args.insert_option(long, value);
        }
        Ok(())
    }

    /// Takes the next token as an option value unless it looks like an
    /// option or the `--` separator.
    fn take_value_token(&mut self) -> Option<String> {
        let next = self.tokens.get(self.pos)?;
        if next.starts_with('-') && next.len() > 1 {
            return None;
        }
        self.pos += 1;
        Some(next.clone())
    }

    fn parse_positional(&mut self, token: &str) -> Result<(), ParseError> {
        let Some(spec) = self.format.arguments().get(self.next_argument) else {
            return Err(ParseError::TooManyArguments(token.to_string()));
        };
        let value = spec
            .parse_value(token)
            .map_err(|source| ParseError::InvalidValue {
                field: spec.name().to_string(),
                source,
            })?;
        if spec.is_multi_valued() {
            self.args.push_argument(spec.name(), value);
        } else {
            self.args.insert_argument(spec.name(), value);
            self.next_argument += 1;
        }
        Ok(())
    }

    fn check_required_arguments(&self) -> Result<(), ParseError> {
        let missing: Vec<String> = self
            .format
            .arguments()
            .iter()
            .filter(|spec| spec.is_required() && !self.args.is_argument_set(spec.name()))
            .map(|spec| spec.name().to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ParseError::NotEnoughArguments(missing))
        }
    }
}
