//! Shared test setup: logging and sample grammars

use std::sync::Once;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{Program, ValueCaster};
use crate::config::Settings;
use crate::domain::{DefinitionError, Validator, Value};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let noisy_modules = ["rstest"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::ENTER)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Clock used by date casting in tests: 2024-05-23 10:15:00.
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 23)
        .and_then(|d| d.and_hms_opt(10, 15, 0))
        .unwrap_or_default()
}

/// Settings that never exit and never colorize.
pub fn test_settings() -> Settings {
    Settings {
        debug: true,
        color: false,
        ..Settings::default()
    }
}

/// User manager grammar with `add`, `remove` and `list` usages.
pub fn user_program() -> Result<Program, DefinitionError> {
    let mut program = Program::new("User Manager", "Manage the users of a system.")
        .with_settings(test_settings())
        .with_caster(ValueCaster::default().with_now(fixed_now()));
    program
        .add_command(&["add", "a"], "Add a new user")?
        .add_command(&["remove", "rm"], "Remove a user")?
        .add_command(&["list", "ls"], "List users")?
        .add_term("username", "STRING", "Username of the user")?
        .add_flag(&["verbose", "v"], "Verbose output")?
        .add_param(&["password", "p"], "STRING", "Password for the user")?
        .add_param_with(
            &["role", "r"],
            "STRING",
            "Role of the user",
            Validator::new(|value: Value| {
                if matches!(value.as_str(), Some("admin" | "user")) {
                    Ok(value)
                } else {
                    Err("role must be admin or user".to_string())
                }
            }),
        )?;
    program
        .add_usage(&["add", "username", "verbose", "password", "role"])?
        .add_usage(&["remove", "username", "verbose"])?
        .add_usage(&["list", "verbose"])?;
    Ok(program)
}
