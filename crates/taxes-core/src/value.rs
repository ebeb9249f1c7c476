//! # Typed Values and Codecs
//!
//! [`Value`] is the runtime representation of everything stored in the
//! input and value stores. [`ValueKind`] is the declared type of a field;
//! it owns the canonical empty value, the type check applied to value
//! function results, and the string codec used for solutions.
//!
//! Money never passes through binary floats: both float and
//! fixed-place decimal kinds carry a [`rust_decimal::Decimal`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A typed value computed by a field or parsed from an input.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The empty sentinel. Never stored; canonicalized to the kind's
    /// empty value before a field result is committed.
    Empty,
    /// Free text, SSNs, and regex-constrained strings.
    Text(String),
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float and fixed-place decimal amounts.
    Number(Decimal),
    /// Enumeration key, or no value.
    Enum(Option<String>),
}

impl Value {
    /// Short name of the runtime type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Text(_) => "text",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Number(_) => "number",
            Self::Enum(_) => "enum",
        }
    }

    /// Numeric view; integers widen to decimals.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(d) => Some(*d),
            Self::Int(i) => Some(Decimal::from(*i)),
            _ => None,
        }
    }

    /// Integer view.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Boolean view.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text view.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Enumeration key view. `Some(None)` is "no enum value".
    pub fn as_enum(&self) -> Option<Option<&str>> {
        match self {
            Self::Enum(key) => Some(key.as_deref()),
            _ => None,
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Number(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Empty, Into::into)
    }
}

// ---------------------------------------------------------------------------
// ValueKind
// ---------------------------------------------------------------------------

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Free text.
    Text,
    /// A 9-digit social security number, stored without dashes.
    Ssn,
    /// Boolean; empty is `false`.
    Boolean,
    /// Integer; empty is `0`.
    Integer,
    /// Unrounded decimal; empty is `0`.
    Float,
    /// Decimal rounded half-to-even to the given number of places.
    Decimal(u32),
    /// Enumeration over fixed keys; empty is "no enum value".
    Enum(Arc<[String]>),
}

impl ValueKind {
    /// Enumeration over the given keys.
    pub fn enumeration<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(keys.into_iter().map(Into::into).collect())
    }

    /// The canonical empty value of this kind.
    pub fn empty(&self) -> Value {
        match self {
            Self::Text | Self::Ssn => Value::Text(String::new()),
            Self::Boolean => Value::Bool(false),
            Self::Integer => Value::Int(0),
            Self::Float => Value::Number(Decimal::ZERO),
            Self::Decimal(places) => Value::Number(fix_places(Decimal::ZERO, *places)),
            Self::Enum(_) => Value::Enum(None),
        }
    }

    /// Canonicalize a value function result: blank values become the
    /// kind's empty value, the runtime type is checked, and fixed-place
    /// decimals are rounded.
    ///
    /// Returns the offending value's type name on mismatch.
    pub fn canonicalize(&self, value: Value) -> Result<Value, String> {
        if value.is_blank() {
            return Ok(self.empty());
        }
        match (self, value) {
            (Self::Text | Self::Ssn, v @ Value::Text(_)) => Ok(v),
            (Self::Boolean, v @ Value::Bool(_)) => Ok(v),
            (Self::Integer, v @ Value::Int(_)) => Ok(v),
            (Self::Float, Value::Number(d)) => Ok(Value::Number(d)),
            (Self::Float, Value::Int(i)) => Ok(Value::Number(Decimal::from(i))),
            (Self::Decimal(places), Value::Number(d)) => Ok(Value::Number(fix_places(d, *places))),
            (Self::Decimal(places), Value::Int(i)) => {
                Ok(Value::Number(fix_places(Decimal::from(i), *places)))
            }
            (Self::Enum(_), Value::Enum(None)) => Ok(Value::Enum(None)),
            (Self::Enum(keys), Value::Enum(Some(key))) if keys.contains(&key) => {
                Ok(Value::Enum(Some(key)))
            }
            (Self::Enum(_), Value::Enum(Some(key))) => Err(format!("unknown enum key {key:?}")),
            (_, other) => Err(other.type_name().to_string()),
        }
    }

    /// Encode a value with this kind's string codec.
    pub fn encode(&self, value: &Value) -> String {
        match value {
            Value::Empty => String::new(),
            Value::Text(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Number(d) => match self {
                Self::Decimal(places) => fix_places(*d, *places).to_string(),
                _ => d.to_string(),
            },
            Value::Enum(key) => key.clone().unwrap_or_default(),
        }
    }

    /// Decode a string produced by [`ValueKind::encode`].
    pub fn decode(&self, raw: &str) -> Result<Value, String> {
        let raw = raw.trim();
        match self {
            Self::Text | Self::Ssn => Ok(Value::Text(raw.to_string())),
            Self::Boolean if raw.is_empty() => Ok(Value::Bool(false)),
            Self::Boolean => parse_bool(raw)
                .map(Value::Bool)
                .ok_or_else(|| "not a boolean".to_string()),
            Self::Integer if raw.is_empty() => Ok(Value::Int(0)),
            Self::Integer => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| e.to_string()),
            Self::Float | Self::Decimal(_) if raw.is_empty() => Ok(self.empty()),
            Self::Float => parse_decimal(raw).map(Value::Number),
            Self::Decimal(places) => parse_decimal(raw).map(|d| Value::Number(fix_places(d, *places))),
            Self::Enum(_) if raw.is_empty() => Ok(Value::Enum(None)),
            Self::Enum(keys) => {
                if keys.iter().any(|k| k == raw) {
                    Ok(Value::Enum(Some(raw.to_string())))
                } else {
                    Err(format!("expected one of {}", keys.join(", ")))
                }
            }
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Ssn => f.write_str("ssn"),
            Self::Boolean => f.write_str("boolean"),
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::Decimal(places) => write!(f, "decimal({places})"),
            Self::Enum(keys) => write!(f, "enum({})", keys.join("|")),
        }
    }
}

/// Round half-to-even to `places` and pin the scale so the value
/// always prints with exactly that many fractional digits.
pub fn fix_places(d: Decimal, places: u32) -> Decimal {
    let mut rounded = d.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(places);
    rounded
}

/// Parse a boolean: `true/yes/y/1` and `false/no/n/0`, case-insensitive.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Largest magnitude accepted for an amount input, in dollars.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Parse a plain base-10 decimal: an optional sign, ASCII digits and at most
/// one decimal point. Digit separators and exponents are rejected.
pub fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    let raw = raw.trim();
    let unsigned = raw.strip_prefix(&['-', '+'][..]).unwrap_or(raw);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let plain = whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit());
    if !plain || whole.len() + fraction.len() == 0 {
        return Err(format!("{raw:?} is not a plain decimal number"));
    }
    let magnitude = Decimal::from_str(unsigned).map_err(|e| e.to_string())?;
    Ok(if raw.starts_with('-') { -magnitude } else { magnitude })
}

/// Parse an amount: a plain decimal no larger than [`MAX_AMOUNT`] in
/// magnitude.
pub fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let amount = parse_decimal(raw)?;
    if amount.abs() > Decimal::from(MAX_AMOUNT) {
        return Err(format!("amount exceeds {MAX_AMOUNT} in magnitude"));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn decimal_rounds_half_to_even() {
        let kind = ValueKind::Decimal(2);
        assert_eq!(
            kind.canonicalize(Value::Number(dec("0.125"))).unwrap(),
            Value::Number(dec("0.12"))
        );
        assert_eq!(
            kind.canonicalize(Value::Number(dec("0.135"))).unwrap(),
            Value::Number(dec("0.14"))
        );
    }

    #[test]
    fn decimal_encodes_with_fixed_places() {
        let kind = ValueKind::Decimal(2);
        let v = kind.canonicalize(Value::Number(dec("2285.9"))).unwrap();
        assert_eq!(kind.encode(&v), "2285.90");
        assert_eq!(kind.encode(&kind.empty()), "0.00");
    }

    #[test]
    fn decimals_must_be_plain_digits() {
        assert_eq!(parse_decimal(" -12.50 ").unwrap(), dec("-12.5"));
        assert_eq!(parse_decimal("+7").unwrap(), dec("7"));
        assert_eq!(parse_decimal(".5").unwrap(), dec("0.5"));
        for raw in ["1_000", "1,000", "1e3", "1.2.3", "--1", "-", ".", "", "$5"] {
            assert!(parse_decimal(raw).is_err(), "{raw:?} accepted");
        }
        assert!(ValueKind::Decimal(2).decode("1_000.00").is_err());
    }

    #[test]
    fn amounts_are_bounded() {
        assert_eq!(parse_amount("1000000000000000").unwrap(), Decimal::from(MAX_AMOUNT));
        assert!(parse_amount("-1000000000000000.01").is_err());
        assert!(parse_amount("79228162514264337593543950335").is_err());
    }

    #[test]
    fn integers_widen_into_decimal_kinds() {
        assert_eq!(
            ValueKind::Decimal(0).canonicalize(Value::Int(7)).unwrap(),
            Value::Number(dec("7"))
        );
        assert_eq!(
            ValueKind::Float.canonicalize(Value::Int(7)).unwrap(),
            Value::Number(dec("7"))
        );
    }

    #[test]
    fn mismatched_types_are_rejected() {
        assert_eq!(
            ValueKind::Boolean.canonicalize(Value::Int(1)).unwrap_err(),
            "integer"
        );
        assert_eq!(
            ValueKind::Integer
                .canonicalize(Value::Text("12".into()))
                .unwrap_err(),
            "text"
        );
        let kind = ValueKind::enumeration(["single", "mfj"]);
        assert!(kind.canonicalize(Value::Enum(Some("hoh".into()))).is_err());
    }

    #[test]
    fn blank_values_become_the_kind_empty() {
        let kinds = [
            ValueKind::Text,
            ValueKind::Ssn,
            ValueKind::Boolean,
            ValueKind::Integer,
            ValueKind::Float,
            ValueKind::Decimal(2),
            ValueKind::enumeration(["a"]),
        ];
        for kind in kinds {
            for blank in [Value::Empty, Value::Text(String::new()), Value::Text("  ".into())] {
                assert_eq!(kind.canonicalize(blank).unwrap(), kind.empty(), "{kind}");
            }
        }
    }

    #[test]
    fn booleans_parse_case_insensitively() {
        for yes in ["true", "Yes", "Y", "1"] {
            assert_eq!(parse_bool(yes), Some(true));
        }
        for no in ["FALSE", "no", "n", "0"] {
            assert_eq!(parse_bool(no), Some(false));
        }
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn enum_decodes_only_declared_keys() {
        let kind = ValueKind::enumeration(["checking", "savings"]);
        assert_eq!(
            kind.decode("savings").unwrap(),
            Value::Enum(Some("savings".into()))
        );
        assert_eq!(kind.decode("").unwrap(), Value::Enum(None));
        assert!(kind.decode("brokerage").is_err());
    }
}
