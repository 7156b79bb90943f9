use std::{env, process};

use optparser::cli::{self, output, CliError};
use optparser::domain::{DefinitionError, Validator, Value};
use optparser::{ParseResult, Program, Settings};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

const ROLES: &[&str] = &["admin", "editor", "viewer"];

fn main() {
    let settings = match Settings::load(None) {
        Ok(s) => s,
        Err(e) => exit_with(CliError::from(e)),
    };
    setup_logging(settings.verbosity);
    if !settings.color {
        colored::control::set_override(false);
    }

    let program = match build_program(settings) {
        Ok(p) => p,
        Err(e) => exit_with(CliError::from(e)),
    };

    match cli::run(&program, env::args()) {
        Ok(Some(result)) => show(&result),
        Ok(None) => process::exit(optparser::exitcode::OK),
        Err(e) => exit_with(e),
    }
}

/// Demo grammar: a small user manager.
fn build_program(settings: Settings) -> Result<Program, DefinitionError> {
    let mut program = Program::new(
        "User Manager",
        "Add, delete and list user accounts. Values are checked against their \
         declared types before the command runs; run with -h to see every usage.",
    )
    .with_settings(settings);

    program
        .add_command(&["add", "a"], "Add a new user")?
        .add_command(&["delete", "del", "d"], "Delete a user")?
        .add_command(&["list", "ls"], "List users")?
        .add_term("username", "STRING", "Username of the user")?
        .add_term("email", "EMAIL", "Email address of the user")?
        .add_flag(&["verbose", "v"], "Verbose output")?
        .add_flag(&["quiet", "q"], "Suppress output")?
        .add_param(&["password", "p"], "STRING", "Password for the user")?
        .add_param_with(
            &["role", "r"],
            "STRING",
            "Role of the user (admin, editor or viewer)",
            Validator::new(|value: Value| {
                if value.as_str().is_some_and(|r| ROLES.contains(&r)) {
                    Ok(value)
                } else {
                    Err(format!("role must be one of: {}", ROLES.join(", ")))
                }
            }),
        )?
        .add_param(&["output", "o"], "OUTFILE", "Write the user list to a file")?;

    program
        .add_usage(&["add", "username", "email", "password", "role", "verbose", "quiet"])?
        .add_usage(&["delete", "username", "verbose", "quiet"])?
        .add_usage(&["list", "output", "verbose", "quiet"])?;
    Ok(program)
}

fn show(result: &ParseResult) {
    if let Some(command) = result.command() {
        output::header(&format!("Command: {}", command));
    }
    for (name, value) in result.values() {
        output::action(name, value);
    }
    if !result.leftover().is_empty() {
        output::warning(&format!("ignoring {} literal argument(s)", result.leftover().len()));
        for token in result.leftover() {
            output::detail(token);
        }
    }
}

fn exit_with(e: CliError) -> ! {
    match &e {
        CliError::Usage(report) => output::report(report),
        other => output::error(other),
    }
    process::exit(e.exit_code());
}

fn setup_logging(verbosity: u8) {
    tracing::debug!("INIT: Attempting logger init from main.rs");

    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // Create a noisy module filter
    let noisy_modules = ["config"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::ENTER)
        .with_span_events(FmtSpan::CLOSE);

    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    tracing_subscriber::registry().with(filtered_layer).init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optparser::util::testing;

    #[test]
    fn given_demo_grammar_when_built_then_valid() {
        testing::init_test_setup();
        let program = build_program(testing::test_settings()).expect("valid grammar");
        assert_eq!(program.usages().len(), 3);
    }

    #[test]
    fn given_unknown_role_when_adding_then_rejected() {
        testing::init_test_setup();
        let program = build_program(testing::test_settings()).expect("valid grammar");

        let result = program
            .parse(["um", "add", "john", "john@example.com", "--role=root"])
            .expect("argv has a program name")
            .into_result()
            .expect("not help");

        assert_eq!(result.errors().len(), 1);
        assert!(result.error_messages()[0].contains("role must be one of"));
    }
}
