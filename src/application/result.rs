//! Parse outcome and matched values

use indexmap::IndexMap;
use itertools::Itertools;

use crate::domain::{UsageError, Value};

const REPORT_FOOTER: &str = "Program terminating. Run again with -h for help.";

/// What a parse produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// The help flag was present; nothing else was matched.
    Help { program_name: String },
    /// Values bound from the first eligible usage, with any problems found.
    Matched(ParseResult),
}

impl ParseOutcome {
    pub fn is_help(&self) -> bool {
        matches!(self, ParseOutcome::Help { .. })
    }

    pub fn into_result(self) -> Option<ParseResult> {
        match self {
            ParseOutcome::Matched(result) => Some(result),
            ParseOutcome::Help { .. } => None,
        }
    }
}

/// Values bound by a usage match plus the errors collected on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    command: Option<String>,
    values: IndexMap<String, Value>,
    leftover: Vec<String>,
    errors: Vec<UsageError>,
}

impl ParseResult {
    pub(crate) fn new(leftover: Vec<String>) -> Self {
        Self {
            leftover,
            ..Self::default()
        }
    }

    pub(crate) fn set_command(&mut self, name: &str) {
        self.command = Some(name.to_string());
        self.values.insert(name.to_string(), Value::Bool(true));
    }

    pub(crate) fn bind(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub(crate) fn push_error(&mut self, error: UsageError) {
        self.errors.push(error);
    }

    /// Canonical name of the matched command, if any.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Value bound to `name`. `dry_run` finds `dry-run`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .get(name)
            .or_else(|| self.values.get(&name.replace('_', "-")))
    }

    /// Flag or command state; unbound names read as `false`.
    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    /// All bound values in binding order.
    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    /// Literal tokens found after `--`.
    pub fn leftover(&self) -> &[String] {
        &self.leftover
    }

    pub fn errors(&self) -> &[UsageError] {
        &self.errors
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human readable report of every error, or `None` for a clean match.
    pub fn error_report(&self) -> Option<String> {
        if self.is_ok() {
            return None;
        }
        let heading = match &self.command {
            Some(c) => format!("Errors found in matching usage for command \"{}\":", c),
            None => "Errors found in matching usage:".to_string(),
        };
        let items = self.errors.iter().map(|e| format!("* {}", e)).join("\n");
        Some(format!("{}\n{}\n\n{}", heading, items, REPORT_FOOTER))
    }
}
