//! "Did you mean" suggestions for unknown command names.

use std::collections::HashSet;

use strsim::levenshtein;

use crate::command::Command;

/// A command's primary name and its aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameGroup<'a> {
    pub name: &'a str,
    pub aliases: &'a [String],
}

impl<'a> NameGroup<'a> {
    pub fn new(name: &'a str, aliases: &'a [String]) -> Self {
        Self { name, aliases }
    }
}

impl<'a> From<&'a Command> for NameGroup<'a> {
    fn from(command: &'a Command) -> Self {
        Self::new(command.name(), command.aliases())
    }
}

/// Ranks the names in `groups` by similarity to `input`.
///
/// Comparison is case-insensitive. A name qualifies when its edit distance
/// is at most a third of the input length, or when it contains the input.
/// Qualifying names are ordered by distance (primary names before aliases
/// on ties) and each group contributes at most one name. Groups sharing a
/// primary name count as one group.
///
/// # Examples
///
/// ```
/// use cmdroute_core::{NameGroup, similar_names};
///
/// let package_aliases = vec!["package-alias".to_string()];
/// let pack_aliases = vec!["pack-alias".to_string()];
/// let groups = [
///     NameGroup::new("package", &package_aliases),
///     NameGroup::new("pack", &pack_aliases),
/// ];
///
/// assert_eq!(similar_names("packa", groups), vec!["pack", "package"]);
/// assert_eq!(similar_names("package-ali", groups), vec!["package-alias"]);
/// ```
pub fn similar_names<'a, I>(input: &str, groups: I) -> Vec<String>
where
    I: IntoIterator<Item = NameGroup<'a>>,
{
    let groups: Vec<NameGroup<'a>> = groups.into_iter().collect();
    let input = input.to_lowercase();

    let mut candidates: Vec<(&str, &str)> = Vec::new();
    let mut seen = HashSet::new();
    let primaries = groups.iter().map(|group| (group.name, group.name));
    let aliases = groups
        .iter()
        .flat_map(|group| group.aliases.iter().map(move |alias| (alias.as_str(), group.name)));
    for (candidate, owner) in primaries.chain(aliases) {
        if seen.insert(candidate) {
            candidates.push((candidate, owner));
        }
    }

    let threshold = input.chars().count() as f64 / 3.0;
    let mut scored: Vec<(usize, &str, &str)> = candidates
        .into_iter()
        .filter_map(|(candidate, owner)| {
            let lowered = candidate.to_lowercase();
            let distance = levenshtein(&input, &lowered);
            let close = distance as f64 <= threshold;
            (close || lowered.contains(&input)).then_some((distance, candidate, owner))
        })
        .collect();
    scored.sort_by_key(|(distance, _, _)| *distance);

    let mut owners = HashSet::new();
    scored
        .into_iter()
        .filter(|(_, _, owner)| owners.insert(*owner))
        .map(|(_, candidate, _)| candidate.to_string())
        .collect()
}

/// Suggestions among the named commands in `commands`.
pub fn similar_command_names(input: &str, commands: &[Command]) -> Vec<String> {
    similar_names(
        input,
        commands
            .iter()
            .filter(|command| !command.is_option_command())
            .map(NameGroup::from),
    )
}
