//! Domain layer: option kinds, usages and errors
//!
//! This layer is independent of external concerns (no I/O, no argv, no config loading).

pub mod entities;
pub mod error;
pub mod usage;

pub use entities::*;
pub use error::{CastError, DefinitionError, UsageError};
pub use usage::Usage;
