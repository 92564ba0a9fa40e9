//! Command resolution: choosing the command a token sequence addresses.
//!
//! Resolution looks at the tokens in three passes:
//!
//! 1. Leading positional tokens (up to the first token starting with `-`)
//!    are followed down the tree by name or alias. The first token must name
//!    a root command; later tokens stop the walk when they match nothing and
//!    become arguments.
//! 2. Option tokens up to `--` (`--long`, `-x`, or any character of a short
//!    cluster such as `-ox` before one that takes a value) select
//!    option-commands of the current command; unmatched options are skipped.
//! 3. Default sub-commands are entered while the current command has any.
//!    Passes 2 and 3 repeat from every newly entered command.
//!
//! The chosen command's format then parses the whole token sequence.

use std::collections::HashSet;

use tracing::debug;

use crate::args::ParsedArgs;
use crate::command::{Application, Command};
use crate::error::{ResolveError, Result};
use crate::format::{ArgsFormat, OptionSpec};
use crate::parser::parse_args;
use crate::suggest::similar_command_names;
use crate::token::RawArgs;

/// A command together with the arguments parsed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCommand<'a> {
    command: &'a Command,
    args: ParsedArgs<'a>,
}

impl<'a> ResolvedCommand<'a> {
    /// The chosen command.
    pub fn command(&self) -> &'a Command {
        self.command
    }

    /// Values parsed with the command's format.
    pub fn args(&self) -> &ParsedArgs<'a> {
        &self.args
    }

    /// Takes the parsed values.
    pub fn into_args(self) -> ParsedArgs<'a> {
        self.args
    }
}

/// Resolves raw tokens to a command of an [`Application`].
///
/// The resolver only holds the name of the root command used when no
/// command name is passed; commands marked default are used after it.
///
/// # Examples
///
/// ```
/// use cmdroute_core::{ApplicationConfig, ArgumentSpec, CommandConfig, RawArgs, Resolver, Value};
///
/// let app = ApplicationConfig::new()
///     .command(
///         CommandConfig::new("server")
///             .sub_command(
///                 CommandConfig::new("add").argument(ArgumentSpec::required("host").unwrap()),
///             )
///             .sub_command(CommandConfig::option_command("list").short_name("l").mark_default()),
///     )
///     .command(CommandConfig::new("help"))
///     .build()
///     .unwrap();
/// let resolver = Resolver::with_default_command("help");
///
/// let raw = RawArgs::parse("server add localhost");
/// let resolved = resolver.resolve(&raw, &app, false).unwrap();
/// assert_eq!(resolved.command().path(), ["server", "add"]);
/// assert_eq!(resolved.args().argument("host").unwrap(), &Value::from("localhost"));
///
/// let raw = RawArgs::parse("server");
/// assert_eq!(resolver.resolve(&raw, &app, false).unwrap().command().name(), "list");
///
/// let raw = RawArgs::parse("");
/// assert_eq!(resolver.resolve(&raw, &app, false).unwrap().command().name(), "help");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolver {
    default_command: Option<String>,
}

impl Resolver {
    /// A resolver that relies only on commands marked default.
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver that falls back to the root command `name`.
    pub fn with_default_command(name: impl Into<String>) -> Self {
        Self {
            default_command: Some(name.into()),
        }
    }

    /// Name of the fallback root command, if any.
    pub fn default_command(&self) -> Option<&str> {
        self.default_command.as_deref()
    }

    /// Resolves `raw` against `app` and parses the arguments of the chosen
    /// command.
    ///
    /// Parse errors of the chosen command are returned as
    /// [`Error::CannotParseArgs`](crate::Error::CannotParseArgs) unless
    /// `lenient` is set or the command parses leniently.
    pub fn resolve<'a>(
        &self,
        raw: &'a RawArgs,
        app: &'a Application,
        lenient: bool,
    ) -> Result<ResolvedCommand<'a>> {
        let tokens = raw.tokens();
        let names: Vec<&str> = tokens
            .iter()
            .map(String::as_str)
            .take_while(|token| !token.starts_with('-'))
            .collect();
        let mut options = OptionTokens::collect(&tokens[names.len()..]);

        let mut command = match walk_names(app.commands(), &names) {
            Some(command) => command,
            None => {
                if let Some(first) = names.first() {
                    let suggestions = similar_command_names(first, app.commands());
                    debug!(name = %first, ?suggestions, "Command name not found");
                    return Err(ResolveError::NameNotFound {
                        name: first.to_string(),
                        suggestions,
                    }
                    .into());
                }
                let selected = options
                    .select(app.commands(), app.format())
                    .or_else(|| choose_default(self.root_defaults(app), raw));
                selected.ok_or(ResolveError::NoDefaultCommand)?
            }
        };

        loop {
            if let Some(next) = options.select(command.sub_commands(), command.format()) {
                debug!(from = %command.name(), to = %next.name(), "Entered option-command");
                command = next;
            } else if let Some(next) =
                choose_default(command.default_sub_commands().collect(), raw)
            {
                debug!(from = %command.name(), to = %next.name(), "Entered default sub-command");
                command = next;
            } else {
                break;
            }
        }

        debug!(path = ?command.path(), "Resolved command");
        let args = parse_args(raw, command.format(), lenient || command.is_lenient())?;
        Ok(ResolvedCommand { command, args })
    }

    fn root_defaults<'a>(&self, app: &'a Application) -> Vec<&'a Command> {
        let named = self
            .default_command
            .as_deref()
            .and_then(|name| app.command(name));
        let mut defaults: Vec<&Command> = named.into_iter().collect();
        for command in app.default_commands() {
            if !defaults.iter().any(|known| std::ptr::eq(*known, command)) {
                defaults.push(command);
            }
        }
        defaults
    }
}

/// Resolves with a resolver that has no default-command name.
pub fn resolve<'a>(
    raw: &'a RawArgs,
    app: &'a Application,
    lenient: bool,
) -> Result<ResolvedCommand<'a>> {
    Resolver::new().resolve(raw, app, lenient)
}

fn walk_names<'a>(roots: &'a [Command], names: &[&str]) -> Option<&'a Command> {
    let mut level = roots;
    let mut current = None;
    for name in names {
        let Some(command) = level.iter().find(|command| command.matches_name(name)) else {
            break;
        };
        current = Some(command);
        level = command.sub_commands();
    }
    current
}

/// Among several defaults, the first one whose format accepts the tokens
/// wins; otherwise the first one.
fn choose_default<'a>(candidates: Vec<&'a Command>, raw: &RawArgs) -> Option<&'a Command> {
    if candidates.len() > 1 {
        for &candidate in &candidates {
            if parse_args(raw, candidate.format(), false).is_ok() {
                debug!(command = %candidate.name(), "Default command accepts the arguments");
                return Some(candidate);
            }
        }
        debug!(command = %candidates[0].name(), "No default command accepts the arguments");
    }
    candidates.into_iter().next()
}

enum OptionToken<'t> {
    Long(&'t str),
    /// The characters after `-`, a single short name or a cluster.
    Short(&'t str),
}

/// Option tokens that may select option-commands. Every long token and every
/// character of a short cluster is usable once.
struct OptionTokens<'t> {
    tokens: Vec<OptionToken<'t>>,
    used: HashSet<(usize, usize)>,
}

impl<'t> OptionTokens<'t> {
    fn collect(tokens: &'t [String]) -> Self {
        let tokens = tokens
            .iter()
            .take_while(|token| *token != "--")
            .filter_map(|token| {
                if let Some(long) = token.strip_prefix("--") {
                    return Some(OptionToken::Long(long));
                }
                token
                    .strip_prefix('-')
                    .filter(|cluster| !cluster.is_empty())
                    .map(OptionToken::Short)
            })
            .collect();
        Self {
            tokens,
            used: HashSet::new(),
        }
    }

    /// Picks the first unused option token naming one of `commands`.
    ///
    /// Clusters are read with `format`, the format in effect at this level:
    /// the first character that takes a value swallows the rest of the
    /// cluster.
    fn select<'a>(&mut self, commands: &'a [Command], format: &ArgsFormat) -> Option<&'a Command> {
        for (index, token) in self.tokens.iter().enumerate() {
            match *token {
                OptionToken::Long(name) => {
                    if self.used.contains(&(index, 0)) {
                        continue;
                    }
                    let selected = commands
                        .iter()
                        .find(|command| command.matches_long_option(name));
                    if selected.is_some() {
                        self.used.insert((index, 0));
                        return selected;
                    }
                }
                OptionToken::Short(cluster) => {
                    for (offset, short) in cluster.char_indices() {
                        if self.used.contains(&(index, offset)) {
                            continue;
                        }
                        let selected = commands
                            .iter()
                            .find(|command| command.matches_short_option(short));
                        if selected.is_some() {
                            self.used.insert((index, offset));
                            return selected;
                        }
                        if format
                            .option_by_short(short)
                            .is_some_and(OptionSpec::accepts_value)
                        {
                            break;
                        }
                    }
                }
            }
        }
        None
    }
}
