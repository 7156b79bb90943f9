//! Program definition and parsing entry point

use std::sync::Arc;

use tracing::{debug, instrument};

use super::cast::ValueCaster;
use super::error::ApplicationResult;
use super::help::HelpPage;
use super::matcher::UsageMatcher;
use super::registry::{OptionRegistry, HELP_FLAG};
use super::result::ParseOutcome;
use super::tokenizer::Tokens;
use crate::config::Settings;
use crate::domain::{DefinitionError, Role, Usage, Validator};
use crate::infrastructure::FileSystem;

/// A command line grammar: options, usages and settings.
///
/// Options must be declared before the first usage. Parsing never mutates the
/// program, so one definition can parse any number of argument vectors.
#[derive(Debug)]
pub struct Program {
    name: String,
    description: String,
    registry: OptionRegistry,
    usages: Vec<Usage>,
    settings: Settings,
    caster: ValueCaster,
}

impl Program {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            registry: OptionRegistry::new(),
            usages: Vec::new(),
            settings: Settings::default(),
            caster: ValueCaster::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Check paths through a different filesystem.
    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.caster = ValueCaster::new(fs);
        self
    }

    /// Use a custom caster, e.g. one with a fixed clock.
    pub fn with_caster(mut self, caster: ValueCaster) -> Self {
        self.caster = caster;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    pub fn usages(&self) -> &[Usage] {
        &self.usages
    }

    pub fn add_command(&mut self, aliases: &[&str], description: &str) -> Result<&mut Self, DefinitionError> {
        self.ensure_no_usages(Role::Command)?;
        self.registry.add_command(aliases, description)?;
        Ok(self)
    }

    pub fn add_term(&mut self, name: &str, arg_type: &str, description: &str) -> Result<&mut Self, DefinitionError> {
        self.ensure_no_usages(Role::Term)?;
        self.registry.add_term(name, arg_type, description, None)?;
        Ok(self)
    }

    /// Term whose cast value must also pass `validator`.
    pub fn add_term_with(
        &mut self,
        name: &str,
        arg_type: &str,
        description: &str,
        validator: Validator,
    ) -> Result<&mut Self, DefinitionError> {
        self.ensure_no_usages(Role::Term)?;
        self.registry.add_term(name, arg_type, description, Some(validator))?;
        Ok(self)
    }

    pub fn add_flag(&mut self, aliases: &[&str], description: &str) -> Result<&mut Self, DefinitionError> {
        self.ensure_no_usages(Role::Flag)?;
        self.registry.add_flag(aliases, description)?;
        Ok(self)
    }

    pub fn add_param(
        &mut self,
        aliases: &[&str],
        arg_type: &str,
        description: &str,
    ) -> Result<&mut Self, DefinitionError> {
        self.ensure_no_usages(Role::Param)?;
        self.registry.add_param(aliases, arg_type, description, None)?;
        Ok(self)
    }

    /// Param whose cast value must also pass `validator`.
    pub fn add_param_with(
        &mut self,
        aliases: &[&str],
        arg_type: &str,
        description: &str,
        validator: Validator,
    ) -> Result<&mut Self, DefinitionError> {
        self.ensure_no_usages(Role::Param)?;
        self.registry.add_param(aliases, arg_type, description, Some(validator))?;
        Ok(self)
    }

    /// Declare an acceptable combination of options by canonical name.
    ///
    /// Either every usage has a command, or there is exactly one usage and it
    /// has none.
    pub fn add_usage(&mut self, names: &[&str]) -> Result<&mut Self, DefinitionError> {
        let usage = self.registry.usage(names)?;
        let mixes_commands = self
            .usages
            .first()
            .is_some_and(|first| !first.has_command() || !usage.has_command());
        if mixes_commands {
            return Err(DefinitionError::CommandUsageMismatch);
        }
        debug!("usage {:?}", names);
        self.usages.push(usage);
        Ok(self)
    }

    /// One usage holding every declared option except `help`.
    pub fn add_usage_all(&mut self) -> Result<&mut Self, DefinitionError> {
        let names: Vec<String> = self
            .registry
            .all_names()
            .into_iter()
            .filter(|n| *n != HELP_FLAG)
            .map(String::from)
            .collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        self.add_usage(&names)
    }

    /// Parse a full argument vector; the first element is the program path.
    #[instrument(level = "debug", skip(self, argv), fields(program = %self.name))]
    pub fn parse<I, S>(&self, argv: I) -> ApplicationResult<ParseOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens = Tokens::from_argv(argv)?;
        let matcher = UsageMatcher::new(&self.registry, &self.usages, &self.caster);
        Ok(matcher.match_tokens(tokens))
    }

    /// Parse the process arguments.
    pub fn parse_env(&self) -> ApplicationResult<ParseOutcome> {
        self.parse(std::env::args())
    }

    /// Help text as shown for `-h`.
    pub fn help_text(&self, program_name: &str) -> String {
        HelpPage {
            title: &self.name,
            description: &self.description,
            program_name,
            registry: &self.registry,
            usages: &self.usages,
            wrap_width: self.settings.wrap_width,
        }
        .render()
    }

    fn ensure_no_usages(&self, role: Role) -> Result<(), DefinitionError> {
        if self.usages.is_empty() {
            Ok(())
        } else {
            Err(DefinitionError::DefinitionAfterUsage(role))
        }
    }
}
