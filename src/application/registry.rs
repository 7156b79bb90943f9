//! Option registry
//!
//! Owns every declared command, term, flag and param. All of them share one
//! alias namespace: a name or alias may be registered only once.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::domain::{
    validate_alias, ArgType, DefinitionError, OptionKind, OptionSpec, Role, TypedSlot, Usage,
    Validator,
};

pub const HELP_FLAG: &str = "help";

/// Registry of declared options, in registration order.
#[derive(Debug, Clone)]
pub struct OptionRegistry {
    options: IndexMap<String, OptionSpec>,
    aliases: HashSet<String>,
}

impl Default for OptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionRegistry {
    /// Create a registry holding only the built-in `help|h` flag.
    pub fn new() -> Self {
        let help = OptionSpec {
            name: HELP_FLAG.to_string(),
            aliases: vec!["h".to_string()],
            description: "Display program help".to_string(),
            kind: OptionKind::Flag,
        };
        let mut registry = Self {
            options: IndexMap::new(),
            aliases: help.all_aliases().map(String::from).collect(),
        };
        registry.options.insert(HELP_FLAG.to_string(), help);
        registry
    }

    /// A command is a predefined command word.
    pub fn add_command(&mut self, aliases: &[&str], description: &str) -> Result<&OptionSpec, DefinitionError> {
        self.insert(aliases, description, OptionKind::Command)
    }

    /// A term is a positional argument.
    pub fn add_term(
        &mut self,
        name: &str,
        arg_type: &str,
        description: &str,
        validator: Option<Validator>,
    ) -> Result<&OptionSpec, DefinitionError> {
        let arg_type: ArgType = arg_type.parse()?;
        self.insert(&[name], description, OptionKind::Term(TypedSlot { arg_type, validator }))
    }

    /// A flag has no argument.
    pub fn add_flag(&mut self, aliases: &[&str], description: &str) -> Result<&OptionSpec, DefinitionError> {
        self.insert(aliases, description, OptionKind::Flag)
    }

    /// A param has a required argument.
    pub fn add_param(
        &mut self,
        aliases: &[&str],
        arg_type: &str,
        description: &str,
        validator: Option<Validator>,
    ) -> Result<&OptionSpec, DefinitionError> {
        let arg_type: ArgType = arg_type.parse()?;
        self.insert(aliases, description, OptionKind::Param(TypedSlot { arg_type, validator }))
    }

    /// Role of an option by canonical name.
    pub fn option_role(&self, name: &str) -> Result<Role, DefinitionError> {
        self.get(name).map(OptionSpec::role)
    }

    /// Option by canonical name.
    pub fn get(&self, name: &str) -> Result<&OptionSpec, DefinitionError> {
        self.options
            .get(name)
            .ok_or_else(|| DefinitionError::UnknownOption(name.to_string()))
    }

    /// Option by canonical name or alias.
    pub fn find(&self, alias: &str) -> Option<&OptionSpec> {
        self.options.values().find(|o| o.matches_name(alias))
    }

    /// Canonical names in registration order.
    pub fn all_names(&self) -> Vec<&str> {
        self.options.keys().map(String::as_str).collect()
    }

    /// Options of one role in registration order.
    pub fn options(&self, role: Role) -> impl Iterator<Item = &OptionSpec> {
        self.options.values().filter(move |o| o.role() == role)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.options(role).next().is_some()
    }

    pub fn help_flag(&self) -> Option<&OptionSpec> {
        self.options.get(HELP_FLAG)
    }

    /// Build a usage from canonical option names.
    pub fn usage(&self, names: &[&str]) -> Result<Usage, DefinitionError> {
        let mut usage = Usage::new();
        for name in names {
            usage.push(self.option_role(name)?, name)?;
        }
        Ok(usage)
    }

    /// Validate and commit one option. Nothing is stored unless every check passes.
    fn insert(
        &mut self,
        aliases: &[&str],
        description: &str,
        kind: OptionKind,
    ) -> Result<&OptionSpec, DefinitionError> {
        let mut seen = HashSet::new();
        for alias in aliases {
            validate_alias(alias)?;
            if self.aliases.contains(*alias) || !seen.insert(*alias) {
                return Err(DefinitionError::DuplicateAlias(alias.to_string()));
            }
        }

        let (name, others) = pick_name(aliases)?;
        debug!("register {} {} (aliases: {:?})", kind.role(), name, others);

        self.aliases.extend(aliases.iter().map(|a| a.to_string()));
        let spec = OptionSpec {
            name: name.clone(),
            aliases: others,
            description: description.to_string(),
            kind,
        };
        Ok(self.options.entry(name).or_insert(spec))
    }
}

/// The first alias longer than one character is the canonical name.
fn pick_name(aliases: &[&str]) -> Result<(String, Vec<String>), DefinitionError> {
    let idx = aliases
        .iter()
        .position(|a| a.chars().count() > 1)
        .ok_or_else(|| DefinitionError::MissingLongName(aliases.iter().map(|a| a.to_string()).collect()))?;
    let others = aliases
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != idx)
        .map(|(_, a)| a.to_string())
        .collect();
    Ok((aliases[idx].to_string(), others))
}
