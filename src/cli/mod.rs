//! CLI layer: turns parse outcomes into terminal output and exit codes

pub mod error;
pub mod output;

use tracing::debug;

pub use error::{CliError, CliResult};

use crate::application::{ParseOutcome, ParseResult, Program};

/// Parse `argv` and apply the reporting policy.
///
/// - Help: the help text is printed, `Ok(None)` is returned.
/// - Errors: `CliError::Usage` carries the report, unless the program runs in
///   debug mode, where the report is printed and the result returned anyway.
pub fn run<I, S>(program: &Program, argv: I) -> CliResult<Option<ParseResult>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let outcome = program.parse(argv)?;
    check_outcome(program, outcome)
}

pub fn check_outcome(program: &Program, outcome: ParseOutcome) -> CliResult<Option<ParseResult>> {
    match outcome {
        ParseOutcome::Help { program_name } => {
            output::help(&program.help_text(&program_name));
            Ok(None)
        }
        ParseOutcome::Matched(result) => match result.error_report() {
            None => Ok(Some(result)),
            Some(report) if program.settings().debug => {
                debug!("debug mode, returning result with {} error(s)", result.errors().len());
                output::report(&report);
                Ok(Some(result))
            }
            Some(report) => Err(CliError::Usage(report)),
        },
    }
}
