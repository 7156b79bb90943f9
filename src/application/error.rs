//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DefinitionError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Definition(#[from] DefinitionError),

    #[error("no program name in argument vector")]
    MissingProgramName,

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
