//! Usage: one acceptable invocation shape

use super::entities::Role;
use super::error::DefinitionError;

/// Option names partitioned by role, in declaration order.
///
/// A usage holds at most one command. It is built once while the grammar is
/// declared and never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    commands: Vec<String>,
    terms: Vec<String>,
    flags: Vec<String>,
    params: Vec<String>,
}

impl Usage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a name to its role bucket. Repeated names are recorded once.
    pub fn push(&mut self, role: Role, name: &str) -> Result<(), DefinitionError> {
        if role == Role::Command {
            if let Some(first) = self.commands.first() {
                if first != name {
                    return Err(DefinitionError::MultipleCommands {
                        first: first.clone(),
                        second: name.to_string(),
                    });
                }
            }
        }
        let bucket = self.bucket_mut(role);
        if !bucket.iter().any(|n| n == name) {
            bucket.push(name.to_string());
        }
        Ok(())
    }

    pub fn command(&self) -> Option<&str> {
        self.commands.first().map(String::as_str)
    }

    pub fn has_command(&self) -> bool {
        !self.commands.is_empty()
    }

    /// Names declared for a role, in declaration order.
    pub fn names(&self, role: Role) -> &[String] {
        match role {
            Role::Command => &self.commands,
            Role::Term => &self.terms,
            Role::Flag => &self.flags,
            Role::Param => &self.params,
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// All names in role order: commands, terms, flags, params.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &str)> {
        [Role::Command, Role::Term, Role::Flag, Role::Param]
            .into_iter()
            .flat_map(move |role| self.names(role).iter().map(move |n| (role, n.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    fn bucket_mut(&mut self, role: Role) -> &mut Vec<String> {
        match role {
            Role::Command => &mut self.commands,
            Role::Term => &mut self.terms,
            Role::Flag => &mut self.flags,
            Role::Param => &mut self.params,
        }
    }
}
