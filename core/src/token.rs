//! Command-line tokenization and the raw token container.
//!
//! [`tokenize`] splits a single command line the way a shell user expects:
//! whitespace separates tokens, quoted runs keep their whitespace and are
//! glued to whatever touches them, and `\'` / `\"` produce literal quotes.
//! Tokenizing never fails; an unterminated quote runs to the end of input.

use std::fmt;
use std::mem;

/// Splits a command line into tokens.
///
/// Inside a quoted run the other quote character is literal, so `"it's"` and
/// `'say "hi'` work as written. It opens a nested region only when its
/// partner appears before the run ends; inside that region the outer quote
/// character is literal too, which keeps `'quoted "three 'times'"'` whole.
///
/// # Examples
///
/// ```
/// use cmdroute_core::tokenize;
///
/// assert_eq!(tokenize("  foo  bar  "), vec!["foo", "bar"]);
/// assert_eq!(tokenize("--name='foo bar'\"baz\""), vec!["--name=foo barbaz"]);
/// assert_eq!(tokenize(r#"\'escaped more\'"#), vec!["'escaped", "more'"]);
/// assert_eq!(tokenize(r#"commit -m "it's done""#), vec!["commit", "-m", "it's done"]);
/// assert!(tokenize("").is_empty());
/// ```
pub fn tokenize(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut nested: Option<char> = None;
    let mut pos = 0;

    while let Some(&c) = chars.get(pos) {
        pos += 1;
        if c == '\\' {
            if let Some(&escaped @ ('\'' | '"')) = chars.get(pos) {
                pos += 1;
                current.push(escaped);
                in_token = true;
                continue;
            }
        }

        match quote {
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(mem::take(&mut current));
                    in_token = false;
                }
            }
            None if is_quote(c) => {
                quote = Some(c);
                in_token = true;
            }
            None => {
                current.push(c);
                in_token = true;
            }
            Some(_) if nested == Some(c) => {
                nested = None;
                current.push(c);
            }
            Some(_) if nested.is_some() => current.push(c),
            Some(open) if c == open => quote = None,
            Some(open) if is_quote(c) => {
                if closes_before_run_end(&chars[pos..], c, open) {
                    nested = Some(c);
                }
                current.push(c);
            }
            Some(_) => current.push(c),
        }
    }

    if in_token {
        tokens.push(current);
    }
    tokens
}

/// Returns `true` if `inner` appears in `rest` before the quoted run opened
/// by `outer` ends. The run ends at an `outer` followed by whitespace or the
/// end of input.
fn closes_before_run_end(rest: &[char], inner: char, outer: char) -> bool {
    let mut pos = 0;
    while let Some(&c) = rest.get(pos) {
        pos += 1;
        if c == '\\' && rest.get(pos).copied().is_some_and(is_quote) {
            pos += 1;
            continue;
        }
        if c == inner {
            return true;
        }
        if c == outer && rest.get(pos).is_none_or(|next| next.is_whitespace()) {
            return false;
        }
    }
    false
}

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

/// The unprocessed token sequence of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArgs {
    script_name: Option<String>,
    tokens: Vec<String>,
}

impl RawArgs {
    /// Tokenizes a command line.
    pub fn parse(line: &str) -> Self {
        Self::from_tokens(tokenize(line))
    }

    /// Wraps already split tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script_name: None,
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds from process arguments; the first element is the script name.
    pub fn from_argv<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let script_name = argv.next();
        Self {
            script_name,
            tokens: argv.collect(),
        }
    }

    /// Program name, only set by [`RawArgs::from_argv`].
    pub fn script_name(&self) -> Option<&str> {
        self.script_name.as_deref()
    }

    /// The tokens, without the script name.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Returns `true` if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns `true` if some token equals `token` exactly.
    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// The first token, whatever its kind.
    pub fn first_argument(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Returns `true` if any of `names` appears as a token, either exactly or
    /// as `name=value`. With `only_params`, tokens after `--` are ignored.
    pub fn has_parameter_option(&self, names: &[&str], only_params: bool) -> bool {
        for token in self.scanned(only_params) {
            for name in names {
                let with_value = token
                    .strip_prefix(name)
                    .is_some_and(|rest| rest.starts_with('='));
                if token == *name || with_value {
                    return true;
                }
            }
        }
        false
    }

    /// Looks up the value given to one of `names`.
    ///
    /// Returns `None` when no name appears, `Some(None)` when a name appears
    /// without a value, and `Some(Some(value))` for `--name=value`,
    /// `--name value`, or the packed short form `-nVALUE`.
    pub fn parameter_option(&self, names: &[&str], only_params: bool) -> Option<Option<&str>> {
        let tokens: Vec<&str> = self.scanned(only_params).collect();
        for (index, token) in tokens.iter().enumerate() {
            for name in names {
                if token == name {
                    let next = tokens.get(index + 1).copied().filter(|next| *next != "--");
                    return Some(next);
                }
                let Some(rest) = token.strip_prefix(name) else {
                    continue;
                };
                if let Some(value) = rest.strip_prefix('=') {
                    return Some(Some(value));
                }
                let is_short = name.len() == 2 && name.starts_with('-') && !name.starts_with("--");
                if is_short && !rest.is_empty() {
                    return Some(Some(rest));
                }
            }
        }
        None
    }

    fn scanned(&self, only_params: bool) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .map(String::as_str)
            .take_while(move |token| !only_params || *token != "--")
    }
}

impl fmt::Display for RawArgs {
    /// Renders the tokens as a command line that tokenizes back to them.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, token) in self.tokens.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            if !token.is_empty() && !token.chars().any(|c| c.is_whitespace() || is_quote(c)) {
                f.write_str(token)?;
                continue;
            }
            // A backslash right before the closing quote would escape it.
            let quoted = token.trim_end_matches('\\');
            let trailing = &token[quoted.len()..];
            f.write_str("\"")?;
            for c in quoted.chars() {
                if is_quote(c) {
                    f.write_str("\\")?;
                }
                write!(f, "{c}")?;
            }
            f.write_str("\"")?;
            f.write_str(trailing)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tokens(input: &str, expected: &[&str]) {
        assert_eq!(tokenize(input), expected, "input: {input:?}");
    }

    #[test]
    fn test_whitespace_separation() {
        assert_tokens("", &[]);
        assert_tokens("foo", &["foo"]);
        assert_tokens("  foo  bar  ", &["foo", "bar"]);
        assert_tokens("-a -b", &["-a", "-b"]);
    }

    #[test]
    fn test_quoted_runs_are_glued() {
        assert_tokens("\"quoted\"", &["quoted"]);
        assert_tokens("'quoted'", &["quoted"]);
        assert_tokens("'a\rb\nc\td'", &["a\rb\nc\td"]);
        assert_tokens("'a'\r'b'\n'c'\t'd'", &["a", "b", "c", "d"]);
        assert_tokens("\"quoted 'twice'\"", &["quoted 'twice'"]);
        assert_tokens("'quoted \"twice\"'", &["quoted \"twice\""]);
        assert_tokens("-a", &["-a"]);
        assert_tokens("-azc", &["-azc"]);
        assert_tokens("-awithavalue", &["-awithavalue"]);
        assert_tokens("-a\"foo bar\"", &["-afoo bar"]);
        assert_tokens("-a\"foo bar\"\"foo bar\"", &["-afoo barfoo bar"]);
        assert_tokens("-a'foo bar'", &["-afoo bar"]);
        assert_tokens("-a'foo bar''foo bar'", &["-afoo barfoo bar"]);
        assert_tokens("-a'foo bar'\"foo bar\"", &["-afoo barfoo bar"]);
    }

    #[test]
    fn test_long_options_with_quoted_values() {
        assert_tokens("--long-option", &["--long-option"]);
        assert_tokens("--long-option=foo", &["--long-option=foo"]);
        assert_tokens("--long-option=\"foo bar\"", &["--long-option=foo bar"]);
        assert_tokens("--long-option=\"foo bar\"\"another\"", &["--long-option=foo baranother"]);
        assert_tokens("--long-option='foo bar'", &["--long-option=foo bar"]);
        assert_tokens("--long-option='foo bar''another'", &["--long-option=foo baranother"]);
        assert_tokens("--long-option='foo bar'\"another\"", &["--long-option=foo baranother"]);
        assert_tokens(
            "foo -a -ffoo --long bar",
            &["foo", "-a", "-ffoo", "--long", "bar"],
        );
    }

    #[test]
    fn test_nested_quotes_are_literal() {
        assert_tokens(
            "\"quoted 'three \\\"times\\\"'\"",
            &["quoted 'three \"times\"'"],
        );
        assert_tokens("'quoted \"three 'times'\"'", &["quoted \"three 'times'\""]);
    }

    #[test]
    fn test_other_quote_inside_run_is_literal() {
        assert_tokens("\"it's\"", &["it's"]);
        assert_tokens("'say \"hi' next", &["say \"hi", "next"]);
        assert_tokens(
            "commit -m \"it's done\" --amend",
            &["commit", "-m", "it's done", "--amend"],
        );
        assert_tokens("\"it's\" 'x' \"y\"", &["it's", "x", "y"]);
        assert_tokens("\"it's\"glued", &["it'sglued"]);
    }

    #[test]
    fn test_escaped_quotes_outside_runs() {
        assert_tokens("\\'escaped\\'", &["'escaped'"]);
        assert_tokens("\\\"escaped\\\"", &["\"escaped\""]);
        assert_tokens("\\'escaped more\\'", &["'escaped", "more'"]);
        assert_tokens("\\\"escaped more\\\"", &["\"escaped", "more\""]);
        assert_tokens("\\' \\\"", &["'", "\""]);
    }

    #[test]
    fn test_other_backslashes_are_kept() {
        assert_tokens(r"C:\temp\dir", &[r"C:\temp\dir"]);
    }

    #[test]
    fn test_empty_quoted_run_is_a_token() {
        assert_tokens("foo \"\" bar", &["foo", "", "bar"]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_tokens("foo 'bar baz", &["foo", "bar baz"]);
    }

    #[test]
    fn test_raw_args_from_argv() {
        let raw = RawArgs::from_argv(["console", "server", "add"]);
        assert_eq!(raw.script_name(), Some("console"));
        assert_eq!(raw.tokens(), ["server", "add"]);
        assert_eq!(raw.first_argument(), Some("server"));
    }

    #[test]
    fn test_has_parameter_option() {
        let raw = RawArgs::parse("-o --foo bar");
        assert!(raw.has_parameter_option(&["-o"], false));
        assert!(raw.has_parameter_option(&["--foo"], false));
        assert!(raw.has_parameter_option(&["-o", "--foo"], false));
        assert!(raw.has_parameter_option(&["--bar", "-o"], false));
        assert!(!raw.has_parameter_option(&["--bar", "--baz"], false));
        assert!(!raw.has_parameter_option(&["foo"], false));

        let raw = RawArgs::parse("--foo=bar");
        assert!(raw.has_parameter_option(&["--foo"], false));
        assert!(!raw.has_parameter_option(&["--fo"], false));

        let raw = RawArgs::parse("-o -- --foo");
        assert!(raw.has_parameter_option(&["--foo"], false));
        assert!(!raw.has_parameter_option(&["--foo"], true));
    }

    #[test]
    fn test_parameter_option() {
        let raw = RawArgs::parse("-f foo");
        assert_eq!(raw.parameter_option(&["-f"], false), Some(Some("foo")));

        let raw = RawArgs::parse("--foo=bar");
        assert_eq!(raw.parameter_option(&["--foo"], false), Some(Some("bar")));

        let raw = RawArgs::parse("--foo bar");
        assert_eq!(raw.parameter_option(&["--foo"], false), Some(Some("bar")));

        let raw = RawArgs::parse("-vvalue1");
        assert_eq!(raw.parameter_option(&["-v"], false), Some(Some("value1")));

        let raw = RawArgs::parse("--foo");
        assert_eq!(raw.parameter_option(&["--foo"], false), Some(None));

        let raw = RawArgs::parse("--foo -- bar");
        assert_eq!(raw.parameter_option(&["--foo"], false), Some(None));

        let raw = RawArgs::parse("-- --foo=bar");
        assert_eq!(raw.parameter_option(&["--foo"], true), None);
        assert_eq!(raw.parameter_option(&["--bar"], false), None);
    }

    #[test]
    fn test_display_tokenizes_back() {
        let raw = RawArgs::from_tokens([
            "server", "add", "foo bar", "it's", "", "a b\\", "c \\\\", "say \"hi",
        ]);
        let rendered = raw.to_string();
        assert_eq!(RawArgs::parse(&rendered), raw);
    }
}
