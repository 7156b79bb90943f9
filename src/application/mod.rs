//! Application layer: tokenizing, registration, casting and matching
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod cast;
pub mod error;
pub mod help;
pub mod matcher;
pub mod program;
pub mod registry;
pub mod result;
pub mod temporal;
pub mod tokenizer;

pub use cast::ValueCaster;
pub use error::{ApplicationError, ApplicationResult};
pub use help::HelpPage;
pub use matcher::UsageMatcher;
pub use program::Program;
pub use registry::{OptionRegistry, HELP_FLAG};
pub use result::{ParseOutcome, ParseResult};
pub use tokenizer::Tokens;
