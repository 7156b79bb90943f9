//! Usage matcher
//!
//! Binds tokenized input against the declared usages. The first eligible usage
//! wins; problems are collected on the result instead of aborting.

use std::collections::VecDeque;

use indexmap::IndexMap;
use tracing::{debug, instrument, trace};

use super::cast::ValueCaster;
use super::registry::OptionRegistry;
use super::result::{ParseOutcome, ParseResult};
use super::tokenizer::Tokens;
use crate::domain::{OptionSpec, Usage, UsageError, Value};

/// Stateless matcher over one registry and its usages.
pub struct UsageMatcher<'a> {
    registry: &'a OptionRegistry,
    usages: &'a [Usage],
    caster: &'a ValueCaster,
}

impl<'a> UsageMatcher<'a> {
    pub fn new(registry: &'a OptionRegistry, usages: &'a [Usage], caster: &'a ValueCaster) -> Self {
        Self {
            registry,
            usages,
            caster,
        }
    }

    /// True when at least one usage names a command.
    pub fn has_commands(&self) -> bool {
        self.usages.iter().any(Usage::has_command)
    }

    #[instrument(level = "debug", skip(self, tokens), fields(program = tokens.program_name()))]
    pub fn match_tokens(&self, tokens: Tokens) -> ParseOutcome {
        let program_name = tokens.program_name().to_string();
        let (mut marked, unmarked, literal) = tokens.into_parts();

        if self.wants_help(&marked) {
            debug!("help requested");
            return ParseOutcome::Help { program_name };
        }

        let mut result = ParseResult::new(literal);
        let mut unmarked: VecDeque<String> = unmarked.into();

        let candidate = if self.has_commands() {
            match unmarked.pop_front() {
                Some(c) => Some(c),
                None => {
                    debug!("no command given");
                    result.push_error(UsageError::MissingCommand);
                    return ParseOutcome::Matched(result);
                }
            }
        } else {
            None
        };

        let Some(usage) = self.find_usage(candidate.as_deref()) else {
            debug!("no usage matches command {:?}", candidate);
            result.push_error(UsageError::NoMatchingUsage);
            return ParseOutcome::Matched(result);
        };

        if let Some(command) = usage.command() {
            debug!("matched command {}", command);
            result.set_command(command);
        }
        self.bind_terms(usage, &mut unmarked, &mut result);
        self.bind_flags(usage, &mut marked, &mut result);
        self.bind_params(usage, &mut marked, &mut result);

        for (name, value) in marked {
            result.push_error(UsageError::UnusedMarkedInput {
                name,
                value: value.unwrap_or_default(),
            });
        }

        debug!("matched with {} error(s)", result.errors().len());
        ParseOutcome::Matched(result)
    }

    fn wants_help(&self, marked: &IndexMap<String, Option<String>>) -> bool {
        self.registry
            .help_flag()
            .is_some_and(|help| marked.keys().any(|k| help.matches_name(k)))
    }

    /// First usage whose command equals the candidate; a command-less usage always fits.
    fn find_usage(&self, candidate: Option<&str>) -> Option<&'a Usage> {
        self.usages.iter().find(|usage| match usage.command() {
            None => true,
            Some(command) => candidate.is_some_and(|c| {
                self.spec(command).is_some_and(|spec| spec.matches_name(c))
            }),
        })
    }

    fn spec(&self, name: &str) -> Option<&'a OptionSpec> {
        self.registry.get(name).ok()
    }

    fn bind_terms(&self, usage: &Usage, unmarked: &mut VecDeque<String>, result: &mut ParseResult) {
        for term in usage.terms() {
            let Some(spec) = self.spec(term) else { continue };
            let Some(raw) = unmarked.pop_front() else {
                trace!("term {} missing", term);
                result.push_error(UsageError::MissingTerm(term.to_string()));
                continue;
            };
            match self.caster.cast_option(spec, &raw) {
                Ok(value) => {
                    trace!("term {} = {}", term, value);
                    result.bind(term, value);
                }
                Err(e) => result.push_error(UsageError::term_cast(term, &raw, e)),
            }
        }
        for extra in unmarked.drain(..) {
            result.push_error(UsageError::UnusedInput(extra));
        }
    }

    fn bind_flags(
        &self,
        usage: &Usage,
        marked: &mut IndexMap<String, Option<String>>,
        result: &mut ParseResult,
    ) {
        for flag in usage.flags() {
            let Some(spec) = self.spec(flag) else { continue };
            match take_marked(spec, marked) {
                Some(value) => {
                    trace!("flag {} set", flag);
                    if let Some(arg) = value.filter(|v| !v.is_empty()) {
                        result.push_error(UsageError::FlagWithArgument {
                            flag: flag.to_string(),
                            value: arg,
                        });
                    }
                    result.bind(flag, Value::Bool(true));
                }
                None => result.bind(flag, Value::Bool(false)),
            }
        }
    }

    fn bind_params(
        &self,
        usage: &Usage,
        marked: &mut IndexMap<String, Option<String>>,
        result: &mut ParseResult,
    ) {
        for param in usage.params() {
            let Some(spec) = self.spec(param) else { continue };
            match take_marked(spec, marked) {
                None => {}
                Some(None) => result.push_error(UsageError::MissingParamValue(param.to_string())),
                Some(Some(raw)) => match self.caster.cast_option(spec, &raw) {
                    Ok(value) => {
                        trace!("param {} = {}", param, value);
                        result.bind(param, value);
                    }
                    Err(e) => result.push_error(UsageError::param_cast(param, &raw, e)),
                },
            }
        }
    }
}

/// Remove the first marked entry answering to any of the option's aliases.
fn take_marked(
    spec: &OptionSpec,
    marked: &mut IndexMap<String, Option<String>>,
) -> Option<Option<String>> {
    let key = marked.keys().find(|k| spec.matches_name(k))?.clone();
    marked.shift_remove(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> OptionRegistry {
        let mut r = OptionRegistry::new();
        r.add_command(&["add", "a"], "Add").unwrap();
        r.add_term("username", "STRING", "Name", None).unwrap();
        r.add_flag(&["verbose", "v"], "Verbose").unwrap();
        r.add_param(&["password", "p"], "STRING", "Password", None).unwrap();
        r
    }

    fn tokens(args: &[&str]) -> Tokens {
        Tokens::tokenize("prog", args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn given_short_aliases_when_matching_then_bound_to_canonical_names() {
        let registry = registry();
        let usages = vec![registry
            .usage(&["add", "username", "verbose", "password"])
            .unwrap()];
        let caster = ValueCaster::default();
        let matcher = UsageMatcher::new(&registry, &usages, &caster);

        let result = matcher
            .match_tokens(tokens(&["a", "john", "-v", "-p", "secret"]))
            .into_result()
            .unwrap();

        assert!(result.is_ok(), "{:?}", result.errors());
        assert_eq!(result.command(), Some("add"));
        assert_eq!(result.get_str("username"), Some("john"));
        assert!(result.get_bool("verbose"));
        assert_eq!(result.get_str("password"), Some("secret"));
    }

    #[test]
    fn given_bare_param_when_matching_then_missing_value() {
        let registry = registry();
        let usages = vec![registry.usage(&["add", "username", "password"]).unwrap()];
        let caster = ValueCaster::default();
        let matcher = UsageMatcher::new(&registry, &usages, &caster);

        let result = matcher
            .match_tokens(tokens(&["add", "john", "--password"]))
            .into_result()
            .unwrap();

        assert_eq!(result.errors(), &[UsageError::MissingParamValue("password".into())]);
        assert_eq!(result.get("password"), None);
    }
}
