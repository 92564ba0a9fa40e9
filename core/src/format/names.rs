//! Name validation and the option naming block shared by options and
//! command options.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FormatError;

static ARGUMENT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").expect("static regex must compile"));
static LONG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]+$").expect("static regex must compile"));
static SHORT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]$").expect("static regex must compile"));

pub(crate) fn validate_argument_name(name: &str) -> Result<(), FormatError> {
    if ARGUMENT_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(FormatError::InvalidArgumentName(name.to_string()))
    }
}

pub(crate) fn validate_command_name(name: &str) -> Result<(), FormatError> {
    if ARGUMENT_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(FormatError::InvalidCommandName(name.to_string()))
    }
}

/// Strips one leading `--` and validates the rest as a long name.
pub(crate) fn normalize_long_name(name: &str) -> Result<String, FormatError> {
    let bare = name.strip_prefix("--").unwrap_or(name);
    if LONG_NAME_RE.is_match(bare) {
        Ok(bare.to_string())
    } else {
        Err(FormatError::InvalidLongName(name.to_string()))
    }
}

/// Strips one leading `-` and validates the rest as a single letter.
pub(crate) fn normalize_short_name(name: &str) -> Result<char, FormatError> {
    let bare = name.strip_prefix('-').unwrap_or(name);
    let mut chars = bare.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if SHORT_NAME_RE.is_match(bare) => Ok(c),
        _ => Err(FormatError::InvalidShortName(name.to_string())),
    }
}

enum Alias {
    Long(String),
    Short(char),
}

/// Aliases may carry any number of leading dashes; one remaining character
/// makes a short alias, more make a long one.
fn normalize_alias(alias: &str) -> Result<Alias, FormatError> {
    let bare = alias.trim_start_matches('-');
    let invalid = || FormatError::InvalidAlias(alias.to_string());
    match bare.chars().count() {
        0 => Err(invalid()),
        1 => normalize_short_name(bare).map(Alias::Short).map_err(|_| invalid()),
        _ => normalize_long_name(bare).map(Alias::Long).map_err(|_| invalid()),
    }
}

/// Which spelling of an option is shown first in help and re-serialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredName {
    Long,
    Short,
}

/// Long name, optional short name and aliases of an option or command option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionNames {
    long: String,
    short: Option<char>,
    long_aliases: Vec<String>,
    short_aliases: Vec<char>,
    preferred: PreferredName,
}

impl OptionNames {
    pub(crate) fn new(
        long: &str,
        short: Option<&str>,
        aliases: &[String],
        preferred: Option<PreferredName>,
    ) -> Result<Self, FormatError> {
        let long = normalize_long_name(long)?;
        let short = short.map(normalize_short_name).transpose()?;

        let mut long_aliases = Vec::new();
        let mut short_aliases = Vec::new();
        for alias in aliases {
            match normalize_alias(alias)? {
                Alias::Long(name) => long_aliases.push(name),
                Alias::Short(c) => short_aliases.push(c),
            }
        }

        let preferred = match (preferred, short) {
            (Some(PreferredName::Short), None) => return Err(FormatError::MissingShortName(long)),
            (Some(explicit), _) => explicit,
            (None, Some(_)) => PreferredName::Short,
            (None, None) => PreferredName::Long,
        };

        Ok(Self {
            long,
            short,
            long_aliases,
            short_aliases,
            preferred,
        })
    }

    /// Long name without dashes.
    pub fn long_name(&self) -> &str {
        &self.long
    }

    /// Short name without the dash.
    pub fn short_name(&self) -> Option<char> {
        self.short
    }

    /// Long aliases without dashes.
    pub fn long_aliases(&self) -> &[String] {
        &self.long_aliases
    }

    /// Short aliases without the dash.
    pub fn short_aliases(&self) -> &[char] {
        &self.short_aliases
    }

    /// Which spelling help output and error messages use.
    pub fn preferred(&self) -> PreferredName {
        self.preferred
    }

    /// The preferred spelling with its dashes, e.g. `-o` or `--option`.
    pub fn preferred_name(&self) -> String {
        match (self.preferred, self.short) {
            (PreferredName::Short, Some(c)) => format!("-{c}"),
            _ => format!("--{}", self.long),
        }
    }

    /// Matches a long name or long alias given without dashes.
    pub fn matches_long(&self, name: &str) -> bool {
        self.long == name || self.long_aliases.iter().any(|alias| alias == name)
    }

    /// Matches a short name or short alias.
    pub fn matches_short(&self, c: char) -> bool {
        self.short == Some(c) || self.short_aliases.contains(&c)
    }

    /// Every spelling with its dashes, in declaration order.
    pub fn spellings(&self) -> Vec<String> {
        let mut spellings = vec![format!("--{}", self.long)];
        spellings.extend(self.short.map(|c| format!("-{c}")));
        spellings.extend(self.long_aliases.iter().map(|alias| format!("--{alias}")));
        spellings.extend(self.short_aliases.iter().map(|c| format!("-{c}")));
        spellings
    }
}
