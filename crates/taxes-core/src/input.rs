//! # Input Descriptors
//!
//! An [`InputSpec`] describes one atomic value the user supplies: its base
//! name, semantic type, and help text. Parsing is purely lexical; the
//! descriptor never looks at other inputs.
//!
//! | Kind | Accepts | Empty |
//! |------|---------|-------|
//! | text | anything (trimmed) | `""` |
//! | boolean | `true/yes/y/1`, `false/no/n/0` | invalid |
//! | integer | base-10 signed | `0` |
//! | float | base-10 decimal | `0` |
//! | enumeration | an exact declared key | only if allowed |
//! | pattern | full regex match | only if the pattern matches `""` |
//! | ssn | 9 digits once `-` is removed | invalid |

use std::fmt;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::TaxError;
use crate::names::validate_base_name;
use crate::value::{parse_amount, parse_bool, Value, ValueKind};

/// One labeled option of an enumeration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumOption {
    /// The key stored in the input file and in values.
    pub key: String,
    /// Human-readable label shown by prompters.
    pub label: String,
}

impl EnumOption {
    /// Build an option from key and label.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Semantic type of an input.
#[derive(Debug, Clone)]
pub enum InputKind {
    /// Free text.
    Text,
    /// Boolean.
    Boolean,
    /// Signed integer.
    Integer,
    /// Decimal amount.
    Float,
    /// Exact key of a labeled set.
    Enum {
        /// The declared options.
        options: Vec<EnumOption>,
        /// Whether an empty value ("no enum value") is accepted.
        allow_empty: bool,
    },
    /// Text that must fully match the compiled pattern.
    Pattern {
        /// The anchored pattern.
        regex: Regex,
        /// The pattern as declared, for help text.
        source: String,
    },
    /// Social security number.
    Ssn,
}

impl InputKind {
    /// The field kind values of this input have once parsed.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Self::Text | Self::Pattern { .. } => ValueKind::Text,
            Self::Boolean => ValueKind::Boolean,
            Self::Integer => ValueKind::Integer,
            Self::Float => ValueKind::Float,
            Self::Enum { options, .. } => {
                ValueKind::enumeration(options.iter().map(|o| o.key.clone()))
            }
            Self::Ssn => ValueKind::Ssn,
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Boolean => f.write_str("boolean"),
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::Enum { .. } => f.write_str("enumeration"),
            Self::Pattern { .. } => f.write_str("pattern"),
            Self::Ssn => f.write_str("ssn"),
        }
    }
}

/// Immutable descriptor of a user-supplied input.
#[derive(Debug, Clone)]
pub struct InputSpec {
    name: String,
    kind: InputKind,
    description: String,
}

impl InputSpec {
    fn build(name: &str, kind: InputKind, description: &str) -> Result<Self, TaxError> {
        validate_base_name(name)?;
        Ok(Self {
            name: name.to_string(),
            kind,
            description: description.to_string(),
        })
    }

    /// Free-text input.
    pub fn text(name: &str, description: &str) -> Result<Self, TaxError> {
        Self::build(name, InputKind::Text, description)
    }

    /// Boolean input.
    pub fn boolean(name: &str, description: &str) -> Result<Self, TaxError> {
        Self::build(name, InputKind::Boolean, description)
    }

    /// Integer input.
    pub fn integer(name: &str, description: &str) -> Result<Self, TaxError> {
        Self::build(name, InputKind::Integer, description)
    }

    /// Decimal amount input.
    pub fn float(name: &str, description: &str) -> Result<Self, TaxError> {
        Self::build(name, InputKind::Float, description)
    }

    /// Enumeration input over labeled options.
    pub fn enumeration(
        name: &str,
        description: &str,
        options: Vec<EnumOption>,
        allow_empty: bool,
    ) -> Result<Self, TaxError> {
        Self::build(
            name,
            InputKind::Enum {
                options,
                allow_empty,
            },
            description,
        )
    }

    /// Regex-constrained text input. The pattern must match the whole value.
    pub fn pattern(name: &str, description: &str, pattern: &str) -> Result<Self, TaxError> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| TaxError::InvalidName {
            name: name.to_string(),
            reason: format!("bad pattern: {e}"),
        })?;
        Self::build(
            name,
            InputKind::Pattern {
                regex,
                source: pattern.to_string(),
            },
            description,
        )
    }

    /// Social security number input.
    pub fn ssn(name: &str, description: &str) -> Result<Self, TaxError> {
        Self::build(name, InputKind::Ssn, description)
    }

    /// Base name, unique within the form.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semantic type.
    pub fn kind(&self) -> &InputKind {
        &self.kind
    }

    /// Human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parse a raw string into a typed value.
    ///
    /// The error string explains why the value was rejected; callers wrap
    /// it into [`TaxError::InvalidInput`] with the qualified name.
    pub fn parse(&self, raw: &str) -> Result<Value, String> {
        let trimmed = raw.trim();
        match &self.kind {
            InputKind::Text => Ok(Value::Text(trimmed.to_string())),
            InputKind::Boolean => parse_bool(trimmed)
                .map(Value::Bool)
                .ok_or_else(|| "expected yes or no".to_string()),
            InputKind::Integer if trimmed.is_empty() => Ok(Value::Int(0)),
            InputKind::Integer => trimmed
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| e.to_string()),
            InputKind::Float if trimmed.is_empty() => Ok(Value::Number(Decimal::ZERO)),
            InputKind::Float => parse_amount(trimmed).map(Value::Number),
            InputKind::Enum { allow_empty, .. } if trimmed.is_empty() => {
                if *allow_empty {
                    Ok(Value::Enum(None))
                } else {
                    Err("a value is required".to_string())
                }
            }
            InputKind::Enum { options, .. } => options
                .iter()
                .find(|o| o.key == trimmed)
                .map(|o| Value::Enum(Some(o.key.clone())))
                .ok_or_else(|| format!("expected one of {}", keys(options))),
            InputKind::Pattern { regex, source } => {
                if regex.is_match(trimmed) {
                    Ok(Value::Text(trimmed.to_string()))
                } else {
                    Err(format!("does not match {source}"))
                }
            }
            InputKind::Ssn => {
                let digits: String = trimmed.chars().filter(|c| *c != '-').collect();
                if digits.len() == 9 && digits.chars().all(|c| c.is_ascii_digit()) {
                    Ok(Value::Text(digits))
                } else {
                    Err("expected 9 digits".to_string())
                }
            }
        }
    }

    /// Whether `raw` parses.
    pub fn valid(&self, raw: &str) -> bool {
        self.parse(raw).is_ok()
    }

    /// Help text for prompters.
    pub fn help(&self) -> String {
        match &self.kind {
            InputKind::Enum { options, .. } => {
                let listing = options
                    .iter()
                    .map(|o| format!("  {}: {}", o.key, o.label))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("{}\n{listing}", self.description)
            }
            _ => self.description.clone(),
        }
    }

    /// A short hint of the accepted format.
    pub fn format_suggestion(&self) -> String {
        match &self.kind {
            InputKind::Text => "text".into(),
            InputKind::Boolean => "y/n".into(),
            InputKind::Integer => "whole number".into(),
            InputKind::Float => "amount, e.g. 1234.56".into(),
            InputKind::Enum {
                options,
                allow_empty,
            } => {
                let mut hint = keys(options);
                if *allow_empty {
                    hint.push_str(", or blank");
                }
                hint
            }
            InputKind::Pattern { source, .. } => format!("matching {source}"),
            InputKind::Ssn => "###-##-####".into(),
        }
    }
}

fn keys(options: &[EnumOption]) -> String {
    options
        .iter()
        .map(|o| o.key.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn boolean_rejects_unknown_words() {
        let spec = InputSpec::boolean("itemize", "Itemize deductions?").unwrap();
        assert_eq!(spec.parse("Yes").unwrap(), Value::Bool(true));
        assert_eq!(spec.parse(" n ").unwrap(), Value::Bool(false));
        assert!(!spec.valid("sometimes"));
        assert!(!spec.valid(""));
    }

    #[test]
    fn numbers_treat_empty_as_zero() {
        let int = InputSpec::integer("dependents", "Number of dependents").unwrap();
        assert_eq!(int.parse("").unwrap(), Value::Int(0));
        assert_eq!(int.parse("-3").unwrap(), Value::Int(-3));
        assert!(!int.valid("3.5"));

        let float = InputSpec::float("box_1", "Wages").unwrap();
        assert_eq!(float.parse("").unwrap(), Value::Number(Decimal::ZERO));
        assert_eq!(
            float.parse("16551.90").unwrap(),
            Value::Number(Decimal::from_str("16551.9").unwrap())
        );
        assert!(!float.valid("$100"));
        assert!(!float.valid("1_000"));
        assert!(!float.valid("79228162514264337593543950335"));
    }

    #[test]
    fn enumeration_requires_exact_keys() {
        let options = vec![
            EnumOption::new("checking", "Checking"),
            EnumOption::new("savings", "Savings"),
        ];
        let strict =
            InputSpec::enumeration("account_type", "Account type", options.clone(), false).unwrap();
        assert!(strict.valid("checking"));
        assert!(!strict.valid("Checking"));
        assert!(!strict.valid(""));

        let lax = InputSpec::enumeration("account_type", "Account type", options, true).unwrap();
        assert_eq!(lax.parse("").unwrap(), Value::Enum(None));
        assert_eq!(lax.format_suggestion(), "checking/savings, or blank");
    }

    #[test]
    fn pattern_must_match_fully() {
        let spec = InputSpec::pattern("routing_number", "Routing number", r"\d{9}").unwrap();
        assert!(spec.valid("011000015"));
        assert!(!spec.valid("0110000150"));
        assert!(!spec.valid("x011000015"));
    }

    #[test]
    fn ssn_ignores_dashes() {
        let spec = InputSpec::ssn("ssn", "Social security number").unwrap();
        assert_eq!(
            spec.parse("123-45-6789").unwrap(),
            Value::Text("123456789".into())
        );
        assert!(!spec.valid("123-45-678"));
        assert!(!spec.valid("12a-45-6789"));
    }

    #[test]
    fn base_names_cannot_contain_dots() {
        assert!(InputSpec::text("first.name", "First name").is_err());
    }

    #[test]
    fn help_lists_enum_labels() {
        let spec = InputSpec::enumeration(
            "filing_status",
            "Filing status",
            vec![EnumOption::new("single", "Single")],
            false,
        )
        .unwrap();
        assert_eq!(spec.help(), "Filing status\n  single: Single");
    }
}
