//! Option value caster
//!
//! Maps a raw string plus a declared type to a typed [`Value`], then runs the
//! option's validator, if any. A failed basic cast and a validator rejection
//! are reported as different [`CastError`] kinds.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;
use url::Url;
use uuid::Uuid;

use super::temporal::{parse_datetime, parse_interval_seconds, render_interval};
use crate::domain::{ArgType, CastError, OptionSpec, Value};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

static FIXED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+([,_]\d{3})*(\.\d+)?$").expect("fixed pattern"));

static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$")
        .expect("float pattern")
});

static EMAIL_LOCAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*$")
        .expect("email local part pattern")
});

static HOST_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").expect("host label pattern")
});

static MAC_SEPARATED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9A-Fa-f]{2}([:-])[0-9A-Fa-f]{2}(?:[:-][0-9A-Fa-f]{2}){4}$").expect("mac pattern")
});

static MAC_DOTTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9A-Fa-f]{4}\.[0-9A-Fa-f]{4}\.[0-9A-Fa-f]{4}$").expect("dotted mac pattern")
});

const MAX_DOMAIN_LEN: usize = 253;
const MAX_EMAIL_LOCAL_LEN: usize = 64;

/// Casts raw strings into typed values.
#[derive(Clone)]
pub struct ValueCaster {
    fs: Arc<dyn FileSystem>,
    now: Option<NaiveDateTime>,
}

impl Default for ValueCaster {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl std::fmt::Debug for ValueCaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueCaster")
            .field("fs", &self.fs)
            .field("now", &self.now)
            .finish()
    }
}

impl ValueCaster {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs, now: None }
    }

    /// Resolve relative dates against a fixed instant instead of the local clock.
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    /// Cast for an option, applying its validator after the basic cast.
    ///
    /// Options without a type (commands, flags) cast to `true`.
    pub fn cast_option(&self, option: &OptionSpec, raw: &str) -> Result<Value, CastError> {
        let Some(arg_type) = option.arg_type() else {
            return Ok(Value::Bool(true));
        };
        let value = self.cast(arg_type, raw)?;
        match option.validator() {
            Some(validator) => validator.apply(value).map_err(CastError::Rejected),
            None => Ok(value),
        }
    }

    /// Basic cast of `raw` to `arg_type`.
    pub fn cast(&self, arg_type: ArgType, raw: &str) -> Result<Value, CastError> {
        trace!("cast {:?} as {}", raw, arg_type);
        match arg_type {
            ArgType::Bool => cast_bool(raw).map(Value::Bool),
            ArgType::Int => cast_int(raw).map(Value::Int),
            ArgType::Float => cast_float(raw).map(Value::Float),
            ArgType::Fixed => cast_fixed(raw).map(Value::Str),
            ArgType::String => Ok(Value::Str(raw.to_string())),
            ArgType::Email => cast_email(raw).map(Value::Str),
            ArgType::Url => cast_url(raw).map(Value::Str),
            ArgType::Domain => cast_domain(raw).map(Value::Str),
            ArgType::IpAddr => cast_ip(raw).map(Value::Str),
            ArgType::MacAddr => cast_mac(raw).map(Value::Str),
            ArgType::Date => self.cast_temporal(arg_type, raw, "%Y-%m-%d"),
            ArgType::Datetime => self.cast_temporal(arg_type, raw, "%Y-%m-%d %H:%M:%S"),
            ArgType::Time => self.cast_temporal(arg_type, raw, "%H:%M:%S"),
            ArgType::Interval => cast_interval(raw).map(Value::Str),
            ArgType::Uuid => cast_uuid(raw).map(Value::Str),
            ArgType::Dir => self.check_dir(raw).map(path_value),
            ArgType::Infile => self.check_input_file(raw).map(path_value),
            ArgType::Outfile => self.check_output_file(raw).map(path_value),
        }
    }

    fn cast_temporal(&self, arg_type: ArgType, raw: &str, format: &str) -> Result<Value, CastError> {
        let now = self.now.unwrap_or_else(|| Local::now().naive_local());
        parse_datetime(raw, now)
            .map(|dt| Value::Str(dt.format(format).to_string()))
            .ok_or_else(|| CastError::invalid(arg_type, "unrecognized date or time"))
    }

    /// Directory must exist and be readable.
    fn check_dir(&self, raw: &str) -> Result<PathBuf, CastError> {
        let path = Path::new(raw);
        if !self.fs.is_dir(path) {
            return Err(CastError::invalid(ArgType::Dir, "path is not a directory"));
        }
        if !self.fs.is_readable(path) {
            return Err(CastError::invalid(ArgType::Dir, "directory is not readable"));
        }
        self.fs
            .canonicalize(path)
            .map_err(|e| CastError::invalid(ArgType::Dir, e.to_string()))
    }

    /// Input file must exist and be readable.
    fn check_input_file(&self, raw: &str) -> Result<PathBuf, CastError> {
        let path = Path::new(raw);
        if !self.fs.exists(path) {
            return Err(CastError::invalid(ArgType::Infile, "file does not exist"));
        }
        if !self.fs.is_readable(path) {
            return Err(CastError::invalid(ArgType::Infile, "file is not readable"));
        }
        self.fs
            .canonicalize(path)
            .map_err(|e| CastError::invalid(ArgType::Infile, e.to_string()))
    }

    /// Parent directory of an output file must exist and be writable.
    fn check_output_file(&self, raw: &str) -> Result<PathBuf, CastError> {
        let path = Path::new(raw);
        let file_name = path
            .file_name()
            .ok_or_else(|| CastError::invalid(ArgType::Outfile, "path has no file name"))?;
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !self.fs.is_dir(parent) {
            return Err(CastError::invalid(ArgType::Outfile, "file directory does not exist"));
        }
        if !self.fs.is_writable_dir(parent) {
            return Err(CastError::invalid(ArgType::Outfile, "file directory is not writable"));
        }
        let parent = self
            .fs
            .canonicalize(parent)
            .map_err(|e| CastError::invalid(ArgType::Outfile, e.to_string()))?;
        Ok(parent.join(file_name))
    }
}

fn path_value(path: PathBuf) -> Value {
    Value::Str(path.to_string_lossy().into_owned())
}

fn cast_bool(raw: &str) -> Result<bool, CastError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(CastError::invalid(ArgType::Bool, "expected true/false, yes/no, on/off or 1/0")),
    }
}

/// Decimal, `0x` hexadecimal, or `0`/`0o` octal.
fn cast_int(raw: &str) -> Result<i64, CastError> {
    let invalid = || CastError::invalid(ArgType::Int, "not an integer");
    let s = raw.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(invalid());
    }

    let (radix, body) = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        (16, hex)
    } else if let Some(oct) = digits.strip_prefix("0o").or_else(|| digits.strip_prefix("0O")) {
        (8, oct)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };
    if body.is_empty() || body.starts_with(['+', '-']) {
        return Err(invalid());
    }

    // Parse with the sign attached so i64::MIN stays representable.
    let signed = if negative { format!("-{}", body) } else { body.to_string() };
    i64::from_str_radix(&signed, radix).map_err(|_| invalid())
}

/// Signed decimal or scientific notation, `,` thousands groups allowed.
fn cast_float(raw: &str) -> Result<f64, CastError> {
    let s = raw.trim();
    if !FLOAT.is_match(s) {
        return Err(CastError::invalid(ArgType::Float, "not a number"));
    }
    let value: f64 = s
        .replace(',', "")
        .parse()
        .map_err(|_| CastError::invalid(ArgType::Float, "not a number"))?;
    if !value.is_finite() {
        return Err(CastError::invalid(ArgType::Float, "number out of range"));
    }
    Ok(value)
}

/// Fixed-point text with `,`/`_` thousands separators stripped.
fn cast_fixed(raw: &str) -> Result<String, CastError> {
    if FIXED.is_match(raw) {
        Ok(raw.replace([',', '_'], ""))
    } else {
        Err(CastError::invalid(ArgType::Fixed, "not a fixed-point number"))
    }
}

fn cast_email(raw: &str) -> Result<String, CastError> {
    let invalid = |reason: &str| CastError::invalid(ArgType::Email, reason);
    let (local, domain) = raw.rsplit_once('@').ok_or_else(|| invalid("missing @"))?;
    if local.is_empty() || local.len() > MAX_EMAIL_LOCAL_LEN || !EMAIL_LOCAL.is_match(local) {
        return Err(invalid("malformed local part"));
    }
    let domain = normalize_hostname(domain).ok_or_else(|| invalid("malformed domain"))?;
    if !domain.contains('.') {
        return Err(invalid("domain has no dot"));
    }
    Ok(format!("{}@{}", local, domain))
}

fn cast_url(raw: &str) -> Result<String, CastError> {
    let url = Url::parse(raw.trim()).map_err(|e| CastError::invalid(ArgType::Url, e.to_string()))?;
    if !url.has_host() {
        return Err(CastError::invalid(ArgType::Url, "URL has no host"));
    }
    Ok(url.to_string())
}

fn cast_domain(raw: &str) -> Result<String, CastError> {
    normalize_hostname(raw).ok_or_else(|| CastError::invalid(ArgType::Domain, "malformed host name"))
}

/// Lower-cased host name without a trailing dot, if every label is valid.
fn normalize_hostname(raw: &str) -> Option<String> {
    let host = raw.strip_suffix('.').unwrap_or(raw);
    if host.is_empty() || host.len() > MAX_DOMAIN_LEN {
        return None;
    }
    if host.split('.').all(|label| HOST_LABEL.is_match(label)) {
        Some(host.to_ascii_lowercase())
    } else {
        None
    }
}

fn cast_ip(raw: &str) -> Result<String, CastError> {
    raw.parse::<IpAddr>()
        .map(|ip| ip.to_string())
        .map_err(|e| CastError::invalid(ArgType::IpAddr, e.to_string()))
}

/// Six hex pairs with one separator kind, or three dotted hex quads.
fn cast_mac(raw: &str) -> Result<String, CastError> {
    let invalid = || CastError::invalid(ArgType::MacAddr, "malformed MAC address");
    let hex: String = if let Some(caps) = MAC_SEPARATED.captures(raw) {
        let sep = caps.get(1).ok_or_else(invalid)?.as_str();
        let parts: Vec<&str> = raw.split(sep).collect();
        if parts.len() != 6 {
            return Err(invalid());
        }
        parts.concat()
    } else if MAC_DOTTED.is_match(raw) {
        raw.replace('.', "")
    } else {
        return Err(invalid());
    };
    let upper = hex.to_ascii_uppercase();
    Ok(upper
        .as_bytes()
        .chunks(2)
        .map(|pair| String::from_utf8_lossy(pair).into_owned())
        .join(":"))
}

fn cast_interval(raw: &str) -> Result<String, CastError> {
    parse_interval_seconds(raw)
        .map(render_interval)
        .ok_or_else(|| CastError::invalid(ArgType::Interval, "unrecognized interval"))
}

/// Hyphens are ignored on input and re-inserted at 8-4-4-4-12.
fn cast_uuid(raw: &str) -> Result<String, CastError> {
    let compact = raw.replace('-', "");
    if compact.len() != 32 {
        return Err(CastError::invalid(ArgType::Uuid, "UUID is not 32 hex digits"));
    }
    if !compact.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CastError::invalid(ArgType::Uuid, "UUID contains invalid characters"));
    }
    Uuid::try_parse(&compact)
        .map(|u| u.hyphenated().to_string())
        .map_err(|e| CastError::invalid(ArgType::Uuid, e.to_string()))
}
