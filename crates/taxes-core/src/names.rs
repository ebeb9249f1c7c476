//! # Qualified Names and Name Ordering
//!
//! Every input and field is addressed by a dotted name
//! `<form-qualified-name>.<base name>`, where the form-qualified-name is
//! `<form>` or `<form>:<instance>`. Neither part contains a `.`, so the
//! first `.` always separates form from base.
//!
//! All iteration over names in the solver goes through [`compare_names`],
//! which orders line numbers the way they appear on paper forms:
//! `1040.1 < 1040.1a < 1040.8a8 < 1040.10`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaxError;

// ---------------------------------------------------------------------------
// FormName
// ---------------------------------------------------------------------------

/// A form-qualified-name: form name plus optional instance tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormName {
    name: String,
    instance: Option<String>,
}

impl FormName {
    /// Build a form name, validating both parts.
    pub fn new(name: &str, instance: Option<&str>) -> Result<Self, TaxError> {
        validate_part(name, "form name")?;
        if let Some(tag) = instance {
            validate_part(tag, "instance tag")?;
        }
        Ok(Self {
            name: name.to_string(),
            instance: instance.map(str::to_string),
        })
    }

    /// Parse `<name>` or `<name>:<instance>`.
    pub fn parse(s: &str) -> Result<Self, TaxError> {
        match s.split_once(':') {
            Some((name, instance)) => Self::new(name, Some(instance)),
            None => Self::new(s, None),
        }
    }

    /// The form name without the instance tag.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The instance tag, if any.
    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    /// Qualify a base name with this form: `<self>.<base>`.
    pub fn qualify(&self, base: &str) -> String {
        format!("{self}.{base}")
    }
}

impl fmt::Display for FormName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance {
            Some(tag) => write!(f, "{}:{}", self.name, tag),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for FormName {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn validate_part(part: &str, what: &str) -> Result<(), TaxError> {
    if part.is_empty() {
        return Err(TaxError::InvalidName {
            name: part.to_string(),
            reason: format!("{what} is empty"),
        });
    }
    if let Some(bad) = part.chars().find(|c| matches!(c, '.' | ':') || c.is_whitespace()) {
        return Err(TaxError::InvalidName {
            name: part.to_string(),
            reason: format!("{what} contains {bad:?}"),
        });
    }
    Ok(())
}

/// Validate a field or input base name.
pub fn validate_base_name(base: &str) -> Result<(), TaxError> {
    if base.is_empty() || base.contains('.') || base.chars().any(char::is_whitespace) {
        return Err(TaxError::InvalidName {
            name: base.to_string(),
            reason: "base names must be non-empty without '.' or whitespace".into(),
        });
    }
    Ok(())
}

/// Split a qualified name into `(form-qualified-name, base name)`.
///
/// Returns `None` for bare names.
pub fn split_qualified(name: &str) -> Option<(&str, &str)> {
    name.split_once('.')
}

/// Prefix `key` with `form` unless it is already qualified.
pub fn scoped(form: &str, key: &str) -> String {
    if key.contains('.') {
        key.to_string()
    } else {
        format!("{form}.{key}")
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum SubKey<'a> {
    Number(&'a str),
    Word(&'a str),
}

impl Ord for SubKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => compare_digits(a, b),
            (Self::Word(a), Self::Word(b)) => a.cmp(b),
            (Self::Number(_), Self::Word(_)) => Ordering::Less,
            (Self::Word(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for SubKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two digit runs as unbounded non-negative integers.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Split a name part into alternating alphabetic and numeric runs.
/// Anything else separates runs and is otherwise ignored.
fn sub_keys(part: &str) -> Vec<SubKey<'_>> {
    let mut keys = Vec::new();
    let mut current: Option<(usize, bool)> = None;
    for (i, c) in part.char_indices() {
        let class = classify(c);
        match current {
            Some((_, numeric)) if class == Some(numeric) => {}
            Some((start, numeric)) => {
                keys.push(run(&part[start..i], numeric));
                current = class.map(|n| (i, n));
            }
            None => current = class.map(|n| (i, n)),
        }
    }
    if let Some((start, numeric)) = current {
        keys.push(run(&part[start..], numeric));
    }
    keys
}

/// `Some(true)` for digits, `Some(false)` for letters, `None` for separators.
fn classify(c: char) -> Option<bool> {
    if c.is_ascii_digit() {
        Some(true)
    } else if c.is_alphabetic() {
        Some(false)
    } else {
        None
    }
}

fn run(text: &str, numeric: bool) -> SubKey<'_> {
    if numeric {
        SubKey::Number(text)
    } else {
        SubKey::Word(text)
    }
}

/// Total order over qualified (or bare) names.
///
/// The name is split into form part and local part at the first `.`;
/// each part is compared run by run, digits numerically, words
/// lexicographically, digits before words at the same position, and a
/// shorter run list before any extension of it. Names whose runs are all
/// equal (`a_b` and `a-b`, `01` and `1`) fall back to byte order, which
/// keeps the order total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let (a_form, a_local) = split_qualified(a).unwrap_or(("", a));
    let (b_form, b_local) = split_qualified(b).unwrap_or(("", b));
    sub_keys(a_form)
        .cmp(&sub_keys(b_form))
        .then_with(|| sub_keys(a_local).cmp(&sub_keys(b_local)))
        .then_with(|| a.cmp(b))
}

/// Sort names in place with [`compare_names`].
pub fn sort_names<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| compare_names(a.as_ref(), b.as_ref()));
}

/// A name that orders by [`compare_names`]; used as a map key wherever
/// iteration order must be reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameKey(pub String);

impl NameKey {
    /// Borrow the underlying name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for NameKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_names(&self.0, &other.0)
    }
}

impl PartialOrd for NameKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NameKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NameKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(input: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = input.iter().map(|s| s.to_string()).collect();
        sort_names(&mut names);
        names
    }

    #[test]
    fn line_numbers_sort_numerically() {
        let expected = ["1040.1", "1040.1a", "1040.8a8", "1040.10", "1040.829"];
        let mut shuffled = expected;
        shuffled.reverse();
        assert_eq!(sorted(&shuffled), expected);
    }

    #[test]
    fn form_part_sorts_before_local_part() {
        let expected = [
            "1040.first_name",
            "1040_s8812.1a",
            "1040_sa.10",
            "1040_sb.829",
            "8959.5b",
            "8995.5b",
            "w-2.box_1",
        ];
        let shuffled = [
            "w-2.box_1",
            "8995.5b",
            "1040_sa.10",
            "1040.first_name",
            "8959.5b",
            "1040_sb.829",
            "1040_s8812.1a",
        ];
        assert_eq!(sorted(&shuffled), expected);
    }

    #[test]
    fn worksheet_lines_sort_within_their_prefix() {
        let input = [
            "5_wkst_10", "5_wkst_1", "5_wkst_2", "5_wkst_9a", "5_wkst_90", "1", "1a", "1c", "2",
            "20",
        ];
        assert_eq!(
            sorted(&input),
            [
                "1", "1a", "1c", "2", "5_wkst_1", "5_wkst_2", "5_wkst_9a", "5_wkst_10",
                "5_wkst_90", "20"
            ]
        );
    }

    #[test]
    fn equal_runs_fall_back_to_bytes() {
        assert_eq!(compare_names("a-b", "a_b"), Ordering::Less);
        assert_eq!(compare_names("01", "1"), Ordering::Less);
        assert_eq!(compare_names("1", "1"), Ordering::Equal);
    }

    #[test]
    fn huge_numbers_do_not_overflow() {
        assert_eq!(
            compare_names("99999999999999999999999", "100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn form_name_parses_instances() {
        let plain = FormName::parse("1040").unwrap();
        assert_eq!(plain.name(), "1040");
        assert!(plain.instance().is_none());
        assert_eq!(plain.qualify("1a"), "1040.1a");

        let inst = FormName::parse("w-2:acme").unwrap();
        assert_eq!(inst.name(), "w-2");
        assert_eq!(inst.instance(), Some("acme"));
        assert_eq!(inst.to_string(), "w-2:acme");
    }

    #[test]
    fn form_name_rejects_dots_and_empty_parts() {
        assert!(FormName::parse("10.40").is_err());
        assert!(FormName::parse("w-2:").is_err());
        assert!(FormName::parse(":x").is_err());
        assert!(FormName::parse("w-2:a:b").is_err());
    }

    #[test]
    fn scoped_prefixes_bare_keys_only() {
        assert_eq!(scoped("w-2:acme", "box_1"), "w-2:acme.box_1");
        assert_eq!(scoped("1040", "1040_sb.4"), "1040_sb.4");
    }

    #[test]
    fn name_key_orders_btree_maps() {
        let mut map = std::collections::BTreeMap::new();
        for name in ["10", "2", "1a"] {
            map.insert(NameKey::from(name), ());
        }
        let keys: Vec<&str> = map.keys().map(NameKey::as_str).collect();
        assert_eq!(keys, ["1a", "2", "10"]);
    }
}
