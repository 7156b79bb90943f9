//! Domain-level errors (no external dependencies)

use thiserror::Error;

use super::entities::{ArgType, Role};

/// Definition errors are raised while a grammar is being declared.
/// They are fatal to the program definition and surface immediately.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("duplicate alias: {0}")]
    DuplicateAlias(String),

    #[error("missing required long name among aliases: {}", .0.join(", "))]
    MissingLongName(Vec<String>),

    #[error("alias is not hyphenated lower case: {0}")]
    InvalidAliasFormat(String),

    #[error("unsupported argument type: {0}")]
    UnsupportedType(String),

    #[error("option not found: {0}")]
    UnknownOption(String),

    #[error("multiple commands defined in one usage: {first}, {second}")]
    MultipleCommands { first: String, second: String },

    #[error("must define exactly one command for each usage")]
    CommandUsageMismatch,

    #[error("cannot add {0}s after usages")]
    DefinitionAfterUsage(Role),
}

/// A value that could not be turned into its declared type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CastError {
    /// The raw text does not satisfy the basic type.
    #[error("not a valid {arg_type}: {reason}")]
    Invalid { arg_type: ArgType, reason: String },

    /// The caller-supplied validator refused the cast value.
    #[error("{0}")]
    Rejected(String),
}

impl CastError {
    pub(crate) fn invalid(arg_type: ArgType, reason: impl Into<String>) -> Self {
        Self::Invalid {
            arg_type,
            reason: reason.into(),
        }
    }
}

/// Problems found while matching input against the declared usages.
///
/// These never interrupt matching; they are collected on the parse result so
/// the user sees every problem with an invocation in one report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("Command name not provided")]
    MissingCommand,

    #[error("Missing term: \"{0}\"")]
    MissingTerm(String),

    #[error("Unable to match value of term \"{term}\": \"{value}\" ({reason})")]
    InvalidTermValue {
        term: String,
        value: String,
        reason: String,
    },

    #[error("Value of term \"{term}\" rejected: \"{value}\" ({reason})")]
    RejectedTermValue {
        term: String,
        value: String,
        reason: String,
    },

    #[error("Unused input: \"{0}\"")]
    UnusedInput(String),

    #[error("Argument passed to flag \"{flag}\": \"{value}\"")]
    FlagWithArgument { flag: String, value: String },

    #[error("No value passed to param \"{0}\"")]
    MissingParamValue(String),

    #[error("Unable to match value of param \"{param}\": \"{value}\" ({reason})")]
    InvalidParamValue {
        param: String,
        value: String,
        reason: String,
    },

    #[error("Value of param \"{param}\" rejected: \"{value}\" ({reason})")]
    RejectedParamValue {
        param: String,
        value: String,
        reason: String,
    },

    #[error("Unused input for \"{name}\": \"{value}\"")]
    UnusedMarkedInput { name: String, value: String },

    #[error("Matching usage not found")]
    NoMatchingUsage,
}

impl UsageError {
    /// Build the term error matching the kind of cast failure.
    pub fn term_cast(term: &str, value: &str, err: CastError) -> Self {
        match err {
            CastError::Invalid { reason, .. } => Self::InvalidTermValue {
                term: term.to_string(),
                value: value.to_string(),
                reason,
            },
            CastError::Rejected(reason) => Self::RejectedTermValue {
                term: term.to_string(),
                value: value.to_string(),
                reason,
            },
        }
    }

    /// Build the param error matching the kind of cast failure.
    pub fn param_cast(param: &str, value: &str, err: CastError) -> Self {
        match err {
            CastError::Invalid { reason, .. } => Self::InvalidParamValue {
                param: param.to_string(),
                value: value.to_string(),
                reason,
            },
            CastError::Rejected(reason) => Self::RejectedParamValue {
                param: param.to_string(),
                value: value.to_string(),
                reason,
            },
        }
    }
}
