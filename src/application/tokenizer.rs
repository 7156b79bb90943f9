//! GNU-style argument tokenizer
//!
//! Splits an argument vector into:
//! - marked options (`-x`, `--name`, `--name=value`)
//! - unmarked tokens (positional input)
//! - literal tokens following a `--` separator, passed through verbatim
//!
//! See <https://www.gnu.org/software/libc/manual/html_node/Argument-Syntax.html>.

use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{instrument, trace};

use crate::application::{ApplicationError, ApplicationResult};

const SEPARATOR: &str = "--";

/// `-abc`: a single dash and two or more short names.
static BUNDLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-([a-z0-9]{2,})$").expect("bundle pattern"));

/// `-x` or `--name` without an attached value.
static JOINABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:-[a-z0-9]|--[a-z0-9]+(?:-[a-z0-9]+)*)$").expect("joinable pattern")
});

/// `-x`, `--name` or either with `=value`.
static MARKED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^--?([a-z][a-z0-9]*(?:-[a-z0-9]+)*)(?:=(.*))?$").expect("marked pattern")
});

/// Tokenizer output for one argument vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    program_name: String,
    /// Name to value; `None` when the option was given without `=`.
    marked: IndexMap<String, Option<String>>,
    unmarked: Vec<String>,
    literal: Vec<String>,
}

impl Tokens {
    /// Tokenize a full argument vector whose first element is the program path.
    pub fn from_argv<I, S>(argv: I) -> ApplicationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv
            .next()
            .filter(|p| !p.is_empty())
            .ok_or(ApplicationError::MissingProgramName)?;
        let program_name = Path::new(&program)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(program);
        Ok(Self::tokenize(program_name, argv.collect()))
    }

    /// Tokenize arguments with the program name already removed.
    #[instrument(level = "debug", skip(program_name))]
    pub fn tokenize(program_name: impl Into<String>, args: Vec<String>) -> Self {
        let (options, literal) = split_at_separator(args);
        let options = join_values(explode_bundles(options));

        let mut marked = IndexMap::new();
        let mut unmarked = Vec::new();
        for option in options {
            match MARKED.captures(&option) {
                Some(caps) => {
                    let name = caps[1].to_string();
                    let value = caps.get(2).map(|m| m.as_str().to_string());
                    trace!("marked: {} = {:?}", name, value);
                    marked.insert(name, value);
                }
                None => {
                    trace!("unmarked: {}", option);
                    unmarked.push(option);
                }
            }
        }

        Self {
            program_name: program_name.into(),
            marked,
            unmarked,
            literal,
        }
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    /// Marked options in first-seen order; the last occurrence of a name wins.
    pub fn marked(&self) -> &IndexMap<String, Option<String>> {
        &self.marked
    }

    /// Marked options with absent values read as the empty string.
    pub fn marked_values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.marked
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref().unwrap_or("")))
    }

    pub fn unmarked(&self) -> &[String] {
        &self.unmarked
    }

    pub fn literal(&self) -> &[String] {
        &self.literal
    }

    pub fn into_parts(self) -> (IndexMap<String, Option<String>>, Vec<String>, Vec<String>) {
        (self.marked, self.unmarked, self.literal)
    }
}

/// Split around the first `--`: options before it, literal tokens after it.
pub(crate) fn split_at_separator(mut args: Vec<String>) -> (Vec<String>, Vec<String>) {
    match args.iter().position(|a| a == SEPARATOR) {
        Some(idx) => {
            let literal = args.split_off(idx + 1);
            args.pop();
            (args, literal)
        }
        None => (args, Vec::new()),
    }
}

/// Split `-abc` into `-a -b -c`.
pub(crate) fn explode_bundles(args: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        match BUNDLE.captures(&arg) {
            Some(caps) => out.extend(caps[1].chars().map(|c| format!("-{}", c))),
            None => out.push(arg),
        }
    }
    out
}

/// Join `-x value` and `--name value` into `-x=value` and `--name=value`.
pub(crate) fn join_values(args: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    let mut iter = args.into_iter().peekable();
    while let Some(arg) = iter.next() {
        let joins = JOINABLE.is_match(&arg)
            && iter.peek().is_some_and(|next| !next.starts_with('-'));
        match iter.next_if(|_| joins) {
            Some(value) => out.push(format!("{}={}", arg, value)),
            None => out.push(arg),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn given_separator_when_splitting_then_only_first_one_counts() {
        let (before, after) = split_at_separator(strings(&["-a", "--", "x", "--", "-y"]));
        assert_eq!(before, strings(&["-a"]));
        assert_eq!(after, strings(&["x", "--", "-y"]));
    }

    #[test]
    fn given_bundle_with_value_when_tokenizing_then_value_goes_to_last_flag() {
        let joined = join_values(explode_bundles(strings(&["-abc", "val"])));
        assert_eq!(joined, strings(&["-a", "-b", "-c=val"]));
    }

    #[test]
    fn given_bundle_with_equals_when_exploding_then_left_alone() {
        assert_eq!(explode_bundles(strings(&["-ab=1"])), strings(&["-ab=1"]));
    }

    #[test]
    fn given_option_followed_by_option_when_joining_then_not_joined() {
        assert_eq!(
            join_values(strings(&["--verbose", "--quiet", "-x", "-"])),
            strings(&["--verbose", "--quiet", "-x", "-"])
        );
    }

    #[test]
    fn given_option_with_value_attached_when_joining_then_next_token_stays() {
        assert_eq!(
            join_values(strings(&["--foo=bar", "baz"])),
            strings(&["--foo=bar", "baz"])
        );
    }
}
