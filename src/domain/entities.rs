//! Domain entities: option kinds, type tags and typed values

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::DefinitionError;

/// Lower case words separated by single hyphens, starting with a letter.
static ALIAS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("alias pattern"));

/// Check that an alias is hyphenated lower case.
pub fn validate_alias(alias: &str) -> Result<(), DefinitionError> {
    if ALIAS_PATTERN.is_match(alias) {
        Ok(())
    } else {
        Err(DefinitionError::InvalidAliasFormat(alias.to_string()))
    }
}

/// The role an option plays in a usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Command,
    Term,
    Flag,
    Param,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Command => "command",
            Role::Term => "term",
            Role::Flag => "flag",
            Role::Param => "param",
        };
        f.write_str(s)
    }
}

/// Closed set of value types a term or param can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
    Bool,
    Date,
    Datetime,
    Dir,
    Domain,
    Email,
    Fixed,
    Float,
    Infile,
    Interval,
    Int,
    IpAddr,
    MacAddr,
    Outfile,
    String,
    Time,
    Url,
    Uuid,
}

impl ArgType {
    pub const ALL: [ArgType; 18] = [
        ArgType::Bool,
        ArgType::Date,
        ArgType::Datetime,
        ArgType::Dir,
        ArgType::Domain,
        ArgType::Email,
        ArgType::Fixed,
        ArgType::Float,
        ArgType::Infile,
        ArgType::Interval,
        ArgType::Int,
        ArgType::IpAddr,
        ArgType::MacAddr,
        ArgType::Outfile,
        ArgType::String,
        ArgType::Time,
        ArgType::Url,
        ArgType::Uuid,
    ];

    /// The upper case tag used in declarations and help output.
    pub fn tag(&self) -> &'static str {
        match self {
            ArgType::Bool => "BOOL",
            ArgType::Date => "DATE",
            ArgType::Datetime => "DATETIME",
            ArgType::Dir => "DIR",
            ArgType::Domain => "DOMAIN",
            ArgType::Email => "EMAIL",
            ArgType::Fixed => "FIXED",
            ArgType::Float => "FLOAT",
            ArgType::Infile => "INFILE",
            ArgType::Interval => "INTERVAL",
            ArgType::Int => "INT",
            ArgType::IpAddr => "IP_ADDR",
            ArgType::MacAddr => "MAC_ADDR",
            ArgType::Outfile => "OUTFILE",
            ArgType::String => "STRING",
            ArgType::Time => "TIME",
            ArgType::Url => "URL",
            ArgType::Uuid => "UUID",
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ArgType {
    type Err = DefinitionError;

    /// Tags are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        ArgType::ALL
            .iter()
            .copied()
            .find(|t| t.tag() == upper)
            .ok_or_else(|| DefinitionError::UnsupportedType(s.to_string()))
    }
}

/// A typed value bound to an option name.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

type ValidatorFn = dyn Fn(Value) -> Result<Value, String> + Send + Sync;

/// Caller-supplied check applied after a successful basic cast.
///
/// It receives the cast value and returns it (possibly transformed) or a
/// rejection message.
#[derive(Clone)]
pub struct Validator(Arc<ValidatorFn>);

impl Validator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, value: Value) -> Result<Value, String> {
        (self.0)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// Type information carried by terms and params.
#[derive(Debug, Clone)]
pub struct TypedSlot {
    pub arg_type: ArgType,
    pub validator: Option<Validator>,
}

/// Kind-specific part of an option.
#[derive(Debug, Clone)]
pub enum OptionKind {
    Command,
    Term(TypedSlot),
    Flag,
    Param(TypedSlot),
}

impl OptionKind {
    pub fn role(&self) -> Role {
        match self {
            OptionKind::Command => Role::Command,
            OptionKind::Term(_) => Role::Term,
            OptionKind::Flag => Role::Flag,
            OptionKind::Param(_) => Role::Param,
        }
    }
}

/// A declared command, term, flag or param.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub kind: OptionKind,
}

impl OptionSpec {
    pub fn role(&self) -> Role {
        self.kind.role()
    }

    pub fn arg_type(&self) -> Option<ArgType> {
        self.slot().map(|s| s.arg_type)
    }

    pub fn validator(&self) -> Option<&Validator> {
        self.slot().and_then(|s| s.validator.as_ref())
    }

    fn slot(&self) -> Option<&TypedSlot> {
        match &self.kind {
            OptionKind::Term(slot) | OptionKind::Param(slot) => Some(slot),
            OptionKind::Command | OptionKind::Flag => None,
        }
    }

    /// True when `name` is the canonical name or one of the aliases.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    /// Name plus aliases, canonical name first.
    pub fn all_aliases(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Usage-line form of the option.
    pub fn write(&self) -> String {
        match &self.kind {
            OptionKind::Command => self.name.clone(),
            OptionKind::Term(slot) => format!("{}:{}", self.name, slot.arg_type),
            OptionKind::Flag => hyphenate(&self.name),
            OptionKind::Param(slot) => format!("{}={}", hyphenate(&self.name), slot.arg_type),
        }
    }
}

/// Prefix a name with one dash when it is a single character, two otherwise.
pub fn hyphenate(alias: &str) -> String {
    if alias.chars().count() == 1 {
        format!("-{}", alias)
    } else {
        format!("--{}", alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("string", ArgType::String)]
    #[case("STRING", ArgType::String)]
    #[case("ip_addr", ArgType::IpAddr)]
    #[case(" Uuid ", ArgType::Uuid)]
    fn given_type_tag_when_parsed_then_case_is_ignored(#[case] tag: &str, #[case] expected: ArgType) {
        assert_eq!(tag.parse::<ArgType>().unwrap(), expected);
    }

    #[test]
    fn given_unknown_tag_when_parsed_then_unsupported_type() {
        assert_eq!(
            "INVALID_TYPE".parse::<ArgType>(),
            Err(DefinitionError::UnsupportedType("INVALID_TYPE".into()))
        );
    }

    #[rstest]
    #[case("help", true)]
    #[case("dry-run", true)]
    #[case("v2", true)]
    #[case("bad_alias", false)]
    #[case("Upper", false)]
    #[case("-x", false)]
    #[case("trailing-", false)]
    #[case("9lives", false)]
    fn given_alias_when_validated_then_only_kebab_case_passes(#[case] alias: &str, #[case] ok: bool) {
        assert_eq!(validate_alias(alias).is_ok(), ok);
    }

    #[test]
    fn given_each_kind_when_written_then_usage_form_matches() {
        let slot = TypedSlot {
            arg_type: ArgType::String,
            validator: None,
        };
        let spec = |name: &str, kind| OptionSpec {
            name: name.into(),
            aliases: vec![],
            description: String::new(),
            kind,
        };
        assert_eq!(spec("add", OptionKind::Command).write(), "add");
        assert_eq!(spec("username", OptionKind::Term(slot.clone())).write(), "username:STRING");
        assert_eq!(spec("help", OptionKind::Flag).write(), "--help");
        assert_eq!(spec("password", OptionKind::Param(slot)).write(), "--password=STRING");
    }

    #[test]
    fn given_validator_when_applied_then_closure_runs() {
        let v = Validator::new(|value: Value| {
            if value.as_str() == Some("admin") {
                Ok(value)
            } else {
                Err("must be admin".into())
            }
        });
        assert_eq!(v.apply("admin".into()), Ok(Value::from("admin")));
        assert_eq!(v.apply("root".into()), Err("must be admin".to_string()));
    }
}
