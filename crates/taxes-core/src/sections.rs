//! # Sectioned Text Format
//!
//! The persisted input file and the solution share one plain-text layout:
//!
//! ```text
//! # comment
//! [1040]
//! filing_status = single
//!
//! [w-2:acme]
//! box_1 = 100000
//! ```
//!
//! Sections are form-qualified-names; keys are base names. Output is
//! written in name order so files diff cleanly between runs.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use crate::error::{TaxError, TaxResult};
use crate::names::NameKey;

/// An ordered `section -> key -> raw value` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionTable {
    sections: BTreeMap<NameKey, BTreeMap<NameKey, String>>,
}

impl SectionTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse sectioned text.
    pub fn parse(text: &str) -> TaxResult<Self> {
        let mut table = Self::new();
        let mut current: Option<NameKey> = None;
        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .map(str::trim)
                    .ok_or_else(|| section_error(line_no, "unterminated section header"))?;
                if name.is_empty() {
                    return Err(section_error(line_no, "empty section name"));
                }
                let key = NameKey::from(name);
                table.sections.entry(key.clone()).or_default();
                current = Some(key);
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| section_error(line_no, "expected `key = value`"))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(section_error(line_no, "empty key"));
            }
            let section = current
                .as_ref()
                .ok_or_else(|| section_error(line_no, "key outside of any section"))?;
            let entries = table.sections.entry(section.clone()).or_default();
            if entries
                .insert(NameKey::from(key), value.trim().to_string())
                .is_some()
            {
                return Err(section_error(
                    line_no,
                    &format!("duplicate key {key:?} in [{section}]"),
                ));
            }
        }
        Ok(table)
    }

    /// Read and parse a file.
    pub fn load(path: &Path) -> TaxResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Render as sectioned text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (i, (section, entries)) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "[{section}]");
            for (key, value) in entries {
                let _ = writeln!(out, "{key} = {value}");
            }
        }
        out
    }

    /// Write to a file.
    pub fn write(&self, path: &Path) -> TaxResult<()> {
        std::fs::write(path, self.to_text())?;
        Ok(())
    }

    /// Look up one raw value.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&NameKey::from(section))
            .and_then(|entries| entries.get(&NameKey::from(key)))
            .map(String::as_str)
    }

    /// Set one raw value, creating the section if needed.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(NameKey::from(section))
            .or_default()
            .insert(NameKey::from(key), value.to_string());
    }

    /// Iterate sections in name order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &BTreeMap<NameKey, String>)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True when the table has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn section_error(line: usize, message: &str) -> TaxError {
    TaxError::Section {
        line,
        message: message.to_string(),
    }
}
