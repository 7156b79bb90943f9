//! Integration tests for casting raw values to declared types.

use std::fs;

use optparser::application::ValueCaster;
use optparser::domain::{ArgType, CastError, OptionKind, OptionSpec, TypedSlot, Validator, Value};
use optparser::util::testing::fixed_now;
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn caster() -> ValueCaster {
    ValueCaster::default().with_now(fixed_now())
}

fn cast_str(caster: &ValueCaster, arg_type: ArgType, raw: &str) -> String {
    caster
        .cast(arg_type, raw)
        .unwrap_or_else(|e| panic!("{} {:?}: {}", arg_type, raw, e))
        .to_string()
}

#[rstest]
#[case(ArgType::Uuid, "123e4567e89b12d3a456426614174000", "123e4567-e89b-12d3-a456-426614174000")]
#[case(ArgType::Uuid, "123E4567-E89B-12D3-A456-426614174000", "123e4567-e89b-12d3-a456-426614174000")]
#[case(ArgType::Interval, "2 days", "2 days")]
#[case(ArgType::Interval, "600 seconds", "10 minutes")]
#[case(ArgType::Interval, "1 hour and 90 minutes", "2 hours, 30 minutes")]
#[case(ArgType::Interval, "0 seconds", "0 seconds")]
#[case(ArgType::Interval, "2 weeks ago", "-14 days")]
#[case(ArgType::Fixed, "1,234.50", "1234.50")]
#[case(ArgType::Fixed, "-1_000", "-1000")]
#[case(ArgType::String, "  as is ", "  as is ")]
#[case(ArgType::Email, "John.Doe@Example.COM", "John.Doe@example.com")]
#[case(ArgType::Url, "https://example.com/path?q=1", "https://example.com/path?q=1")]
#[case(ArgType::Domain, "Sub.Example.COM.", "sub.example.com")]
#[case(ArgType::IpAddr, "192.168.1.10", "192.168.1.10")]
#[case(ArgType::IpAddr, "::1", "::1")]
#[case(ArgType::MacAddr, "00-1a-2b-3c-4d-5e", "00:1A:2B:3C:4D:5E")]
#[case(ArgType::MacAddr, "00:1A:2B:3C:4D:5E", "00:1A:2B:3C:4D:5E")]
#[case(ArgType::Date, "2024-02-29", "2024-02-29")]
#[case(ArgType::Date, "May 23rd, 2024", "2024-05-23")]
#[case(ArgType::Date, "23 May 2024", "2024-05-23")]
#[case(ArgType::Date, "tomorrow", "2024-05-24")]
#[case(ArgType::Date, "+1 week", "2024-05-30")]
#[case(ArgType::Datetime, "2024-05-23T15:30:00", "2024-05-23 15:30:00")]
#[case(ArgType::Datetime, "2024-05-23 15:30", "2024-05-23 15:30:00")]
#[case(ArgType::Datetime, "yesterday noon", "2024-05-22 12:00:00")]
#[case(ArgType::Time, "3:30 PM", "15:30:00")]
#[case(ArgType::Time, "noon", "12:00:00")]
#[case(ArgType::Time, "3pm", "15:00:00")]
#[case(ArgType::Time, "3 PM", "15:00:00")]
#[case(ArgType::Time, "12 am", "00:00:00")]
#[case(ArgType::Datetime, "tomorrow 3pm", "2024-05-24 15:00:00")]
#[case(ArgType::Datetime, "May 23, 2024 3 pm", "2024-05-23 15:00:00")]
#[case(ArgType::Date, "May 23, 2024 3 pm", "2024-05-23")]
#[case(ArgType::Time, "in 2 hours", "12:15:00")]
fn given_valid_input_when_cast_then_canonical_text(
    caster: ValueCaster,
    #[case] arg_type: ArgType,
    #[case] raw: &str,
    #[case] expected: &str,
) {
    assert_eq!(cast_str(&caster, arg_type, raw), expected);
}

#[rstest]
#[case(ArgType::Uuid, "123e4567e89b12d3a45642661417400")]
#[case(ArgType::Uuid, "g23e4567e89b12d3a456426614174000")]
#[case(ArgType::Interval, "invalid")]
#[case(ArgType::Interval, "3 parsecs")]
#[case(ArgType::Fixed, "12.3.4")]
#[case(ArgType::Fixed, "1,23")]
#[case(ArgType::Email, "no-at-sign")]
#[case(ArgType::Email, "user@localhost")]
#[case(ArgType::Email, "two..dots@example.com")]
#[case(ArgType::Url, "not a url")]
#[case(ArgType::Url, "mailto:someone@example.com")]
#[case(ArgType::Domain, "-bad.example.com")]
#[case(ArgType::Domain, "under_score.com")]
#[case(ArgType::IpAddr, "256.1.1.1")]
#[case(ArgType::MacAddr, "00:1A:2B:3C:4D")]
#[case(ArgType::MacAddr, "00:1A-2B:3C:4D:5E")]
#[case(ArgType::Date, "invalid-datetime")]
#[case(ArgType::Date, "2024-02-30")]
#[case(ArgType::Time, "25:00")]
#[case(ArgType::Bool, "maybe")]
#[case(ArgType::Int, "twelve")]
#[case(ArgType::Float, "1.2.3")]
#[case(ArgType::Float, "1e400")]
#[case(ArgType::Float, "-1e400")]
fn given_malformed_input_when_cast_then_invalid(
    caster: ValueCaster,
    #[case] arg_type: ArgType,
    #[case] raw: &str,
) {
    let err = caster.cast(arg_type, raw).unwrap_err();

    assert!(
        matches!(err, CastError::Invalid { arg_type: t, .. } if t == arg_type),
        "unexpected error: {:?}",
        err
    );
}

#[rstest]
#[case("Yes", true)]
#[case(" on ", true)]
#[case("1", true)]
#[case("off", false)]
#[case("", false)]
fn given_bool_lexicon_when_cast_then_bool(caster: ValueCaster, #[case] raw: &str, #[case] expected: bool) {
    assert_eq!(caster.cast(ArgType::Bool, raw), Ok(Value::Bool(expected)));
}

#[rstest]
fn given_numbers_when_cast_then_numeric_values(caster: ValueCaster) {
    assert_eq!(caster.cast(ArgType::Int, "0x1f"), Ok(Value::Int(31)));
    assert_eq!(caster.cast(ArgType::Int, "-42"), Ok(Value::Int(-42)));
    assert_eq!(caster.cast(ArgType::Float, "1.5e2"), Ok(Value::Float(150.0)));
    assert_eq!(caster.cast(ArgType::Float, "-1,000.25"), Ok(Value::Float(-1000.25)));
}

#[rstest]
#[case(ArgType::Uuid, "123E4567E89B12D3A456426614174000")]
#[case(ArgType::Date, "May 23, 2024")]
#[case(ArgType::Domain, "WWW.Example.org.")]
#[case(ArgType::Interval, "90 minutes")]
fn given_cast_output_when_cast_again_then_unchanged(
    caster: ValueCaster,
    #[case] arg_type: ArgType,
    #[case] raw: &str,
) {
    let once = cast_str(&caster, arg_type, raw);
    let twice = cast_str(&caster, arg_type, &once);

    assert_eq!(once, twice);
}

#[rstest]
fn given_random_uuid_when_cast_then_hyphenated_lowercase(caster: ValueCaster) {
    let id = uuid::Uuid::new_v4();
    let simple = id.simple().to_string().to_uppercase();

    assert_eq!(cast_str(&caster, ArgType::Uuid, &simple), id.hyphenated().to_string());
}

// ============================================================
// Path types
// ============================================================

#[rstest]
fn given_existing_dir_when_cast_then_canonical_path(caster: ValueCaster) {
    // Arrange
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("nested");
    fs::create_dir(&nested).unwrap();
    let raw = temp.path().join("nested/../nested");

    // Act
    let cast = cast_str(&caster, ArgType::Dir, raw.to_str().unwrap());

    // Assert
    let expected = fs::canonicalize(&nested).unwrap();
    assert_eq!(cast, expected.to_string_lossy());
}

#[rstest]
fn given_file_when_cast_as_dir_then_invalid(caster: ValueCaster) {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("plain.txt");
    fs::write(&file, "x").unwrap();

    let err = caster.cast(ArgType::Dir, file.to_str().unwrap()).unwrap_err();

    assert!(matches!(err, CastError::Invalid { arg_type: ArgType::Dir, .. }));
}

#[rstest]
fn given_existing_file_when_cast_as_infile_then_canonical_path(caster: ValueCaster) {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("input.txt");
    fs::write(&file, "data").unwrap();

    let cast = cast_str(&caster, ArgType::Infile, file.to_str().unwrap());

    assert_eq!(cast, fs::canonicalize(&file).unwrap().to_string_lossy());
}

#[rstest]
fn given_missing_file_when_cast_as_infile_then_invalid(caster: ValueCaster) {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.txt");

    let err = caster.cast(ArgType::Infile, missing.to_str().unwrap()).unwrap_err();

    assert!(matches!(err, CastError::Invalid { arg_type: ArgType::Infile, .. }));
}

#[rstest]
fn given_new_file_in_existing_dir_when_cast_as_outfile_then_parent_canonicalized(caster: ValueCaster) {
    // Arrange
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out.csv");

    // Act
    let cast = cast_str(&caster, ArgType::Outfile, target.to_str().unwrap());

    // Assert
    let expected = fs::canonicalize(temp.path()).unwrap().join("out.csv");
    assert_eq!(cast, expected.to_string_lossy());
    assert!(!target.exists(), "casting must not create the file");
}

#[rstest]
fn given_missing_parent_when_cast_as_outfile_then_invalid(caster: ValueCaster) {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("no/such/dir/out.csv");

    let err = caster.cast(ArgType::Outfile, target.to_str().unwrap()).unwrap_err();

    assert!(matches!(err, CastError::Invalid { arg_type: ArgType::Outfile, .. }));
}

// ============================================================
// Validators
// ============================================================

fn param(arg_type: ArgType, validator: Option<Validator>) -> OptionSpec {
    OptionSpec {
        name: "level".into(),
        aliases: vec![],
        description: String::new(),
        kind: OptionKind::Param(TypedSlot { arg_type, validator }),
    }
}

#[rstest]
fn given_validator_when_value_rejected_then_rejected_error(caster: ValueCaster) {
    let positive = Validator::new(|v: Value| match v.as_int() {
        Some(n) if n > 0 => Ok(Value::Int(n)),
        _ => Err("must be positive".to_string()),
    });
    let spec = param(ArgType::Int, Some(positive));

    assert_eq!(caster.cast_option(&spec, "5"), Ok(Value::Int(5)));
    assert_eq!(
        caster.cast_option(&spec, "-5"),
        Err(CastError::Rejected("must be positive".into()))
    );
}

#[rstest]
fn given_validator_when_basic_cast_fails_then_validator_not_run(caster: ValueCaster) {
    let never = Validator::new(|_| panic!("validator must not run"));
    let spec = param(ArgType::Int, Some(never));

    let err = caster.cast_option(&spec, "abc").unwrap_err();

    assert!(matches!(err, CastError::Invalid { .. }));
}

#[rstest]
fn given_validator_when_value_transformed_then_transformed_value_bound(caster: ValueCaster) {
    let upper = Validator::new(|v: Value| Ok(Value::Str(v.to_string().to_uppercase())));
    let spec = param(ArgType::String, Some(upper));

    assert_eq!(caster.cast_option(&spec, "admin"), Ok(Value::from("ADMIN")));
}
