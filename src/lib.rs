//! optparser: declarative command line grammars
//!
//! A [`Program`] declares commands, terms (positional values), flags and typed
//! params, then one or more usages combining them. Parsing tokenizes the
//! argument vector GNU style, picks the first usage whose command matches and
//! binds typed values, collecting every problem on the [`ParseResult`].
//!
//! Layers:
//! - `domain`: option model, usages and error types
//! - `application`: tokenizer, registry, caster, matcher, help
//! - `infrastructure`: filesystem access for path-typed values
//! - `cli`: reporting policy and terminal output
//! - `config`: layered settings

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::{ParseOutcome, ParseResult, Program, ValueCaster};
pub use config::Settings;
pub use domain::{ArgType, CastError, DefinitionError, Role, UsageError, Validator, Value};
