//! Coercion of raw config strings into integers and booleans.
//!
//! Integers accept the usual literal prefixes (`0x` hex, leading-`0` octal)
//! and an optional single unit suffix: `k`, `m` or `g` (case-insensitive),
//! scaling by powers of 1024. Booleans accept `true`/`yes`/`on`,
//! `false`/`no`/`off`, or any integer (nonzero is true).

use thiserror::Error;

/// Tokens read as `true` (compared case-insensitively).
pub const TRUE_TOKENS: [&str; 3] = ["true", "yes", "on"];

/// Tokens read as `false` (compared case-insensitively).
pub const FALSE_TOKENS: [&str; 3] = ["false", "no", "off"];

const KIB: i64 = 1024;

/// Why a raw string could not be coerced.
///
/// Carries no variable name; [`ConfigStore`](crate::store::ConfigStore)
/// tags it with one when wrapping it in a [`ConfigError`](crate::ConfigError).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("'{0}' is not an integer")]
    InvalidLiteral(String),

    #[error("unknown unit suffix '{0}'")]
    Suffix(char),

    #[error("unexpected characters after unit suffix in '{0}'")]
    TrailingData(String),

    #[error("'{0}' overflows a 64-bit integer")]
    Overflow(String),

    #[error("{0} does not fit in a 32-bit integer")]
    OutOfRange(i64),
}

/// Parse a signed integer with an optional `k`/`m`/`g` unit suffix.
///
/// ```
/// use cfgstack::value::parse_integer;
///
/// assert_eq!(parse_integer("10k").unwrap(), 10 * 1024);
/// assert_eq!(parse_integer("0x10").unwrap(), 16);
/// assert!(parse_integer("5x").is_err());
/// ```
pub fn parse_integer(raw: &str) -> Result<i64, CoercionError> {
    let (num, rest) = parse_literal(raw)?;

    let mut chars = rest.chars();
    let scale = match chars.next() {
        None => return Ok(num),
        Some(c) => unit_scale(c).ok_or(CoercionError::Suffix(c))?,
    };
    if !chars.as_str().is_empty() {
        return Err(CoercionError::TrailingData(raw.to_string()));
    }

    num.checked_mul(scale)
        .ok_or_else(|| CoercionError::Overflow(raw.to_string()))
}

/// [`parse_integer`] narrowed to 32 bits.
pub fn parse_int(raw: &str) -> Result<i32, CoercionError> {
    let num = parse_integer(raw)?;
    i32::try_from(num).map_err(|_| CoercionError::OutOfRange(num))
}

/// Coerce a raw value to a boolean.
///
/// `None` is a key present without a value, which reads as `true`.
pub fn parse_bool(raw: Option<&str>) -> Result<bool, CoercionError> {
    let Some(raw) = raw else {
        return Ok(true);
    };

    if TRUE_TOKENS.iter().any(|t| raw.eq_ignore_ascii_case(t)) {
        return Ok(true);
    }
    if FALSE_TOKENS.iter().any(|t| raw.eq_ignore_ascii_case(t)) {
        return Ok(false);
    }

    parse_integer(raw).map(|n| n != 0)
}

/// Canonical string form written by `set_bool`.
pub fn format_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Canonical string form written by `set_long` and `set_int`.
pub fn format_integer(value: i64) -> String {
    value.to_string()
}

fn unit_scale(c: char) -> Option<i64> {
    match c.to_ascii_lowercase() {
        'k' => Some(KIB),
        'm' => Some(KIB * KIB),
        'g' => Some(KIB * KIB * KIB),
        _ => None,
    }
}

/// Split `raw` into its leading integer literal and whatever follows it.
fn parse_literal(raw: &str) -> Result<(i64, &str), CoercionError> {
    let s = raw.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (16, hex)
    } else if s.len() > 1 && s.starts_with('0') {
        (8, &s[1..])
    } else {
        (10, s)
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        // A lone leading zero followed by a non-octal character is just 0.
        if radix == 8 {
            return Ok((0, digits));
        }
        return Err(CoercionError::InvalidLiteral(raw.to_string()));
    }

    let magnitude = u64::from_str_radix(&digits[..end], radix)
        .map_err(|_| CoercionError::Overflow(raw.to_string()))?;
    let signed = if negative {
        -i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };
    let num = i64::try_from(signed).map_err(|_| CoercionError::Overflow(raw.to_string()))?;

    Ok((num, &digits[end..]))
}
