//! # PDF Field Mappings
//!
//! A [`FormMapping`] lists, for one form, which PDF field receives which
//! solved field. Four descriptor shapes cover the AcroForm fields found on
//! IRS and state forms:
//!
//! | Descriptor | Solved field | Output |
//! |------------|--------------|--------|
//! | `Text` | any | the encoded value |
//! | `Button` | boolean | checked when true |
//! | `Choice` | enum | the export value mapped from the enum key |
//! | `OptionlessButton` | any | checked when the encoded value equals `value` |
//!
//! Radio groups without export values (filing status boxes, account type)
//! are expressed as one `OptionlessButton` per box.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use taxes_core::value::parse_bool;

use crate::error::FillError;

/// Resolved output for one PDF field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillValue {
    /// Text content.
    Text(String),
    /// Checkbox or radio state.
    Checked(bool),
}

/// Descriptor binding one PDF field to one field of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PdfField {
    /// Text box.
    Text {
        /// PDF field name.
        pdf: String,
        /// Field base name.
        field: String,
    },
    /// Checkbox driven by a boolean field.
    Button {
        /// PDF field name.
        pdf: String,
        /// Field base name.
        field: String,
    },
    /// Choice or radio group with export values.
    Choice {
        /// PDF field name.
        pdf: String,
        /// Field base name.
        field: String,
        /// Enum key to PDF export value.
        exports: BTreeMap<String, String>,
    },
    /// A single box of a radio group that has no export values.
    OptionlessButton {
        /// PDF field name.
        pdf: String,
        /// Field base name.
        field: String,
        /// Encoded value that checks this box.
        value: String,
    },
}

impl PdfField {
    /// Text box mapping.
    pub fn text(pdf: &str, field: &str) -> Self {
        Self::Text {
            pdf: pdf.into(),
            field: field.into(),
        }
    }

    /// Checkbox mapping.
    pub fn button(pdf: &str, field: &str) -> Self {
        Self::Button {
            pdf: pdf.into(),
            field: field.into(),
        }
    }

    /// Choice mapping from `(enum key, export value)` pairs.
    pub fn choice<'e>(pdf: &str, field: &str, exports: impl IntoIterator<Item = (&'e str, &'e str)>) -> Self {
        Self::Choice {
            pdf: pdf.into(),
            field: field.into(),
            exports: exports
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// One box of an export-less radio group.
    pub fn optionless(pdf: &str, field: &str, value: &str) -> Self {
        Self::OptionlessButton {
            pdf: pdf.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// PDF field name.
    pub fn pdf_name(&self) -> &str {
        match self {
            Self::Text { pdf, .. }
            | Self::Button { pdf, .. }
            | Self::Choice { pdf, .. }
            | Self::OptionlessButton { pdf, .. } => pdf,
        }
    }

    /// Base name of the solved field.
    pub fn field_name(&self) -> &str {
        match self {
            Self::Text { field, .. }
            | Self::Button { field, .. }
            | Self::Choice { field, .. }
            | Self::OptionlessButton { field, .. } => field,
        }
    }

    /// Resolve the encoded value of the mapped field. `form` is used for
    /// error reporting only.
    pub fn resolve(&self, form: &str, encoded: &str) -> Result<FillValue, FillError> {
        let reject = |reason: String| FillError::Resolve {
            form: form.to_string(),
            pdf: self.pdf_name().to_string(),
            field: self.field_name().to_string(),
            value: encoded.to_string(),
            reason,
        };
        match self {
            Self::Text { .. } => Ok(FillValue::Text(encoded.to_string())),
            Self::Button { .. } if encoded.trim().is_empty() => Ok(FillValue::Checked(false)),
            Self::Button { .. } => parse_bool(encoded)
                .map(FillValue::Checked)
                .ok_or_else(|| reject("not a boolean".into())),
            Self::Choice { .. } if encoded.is_empty() => Ok(FillValue::Text(String::new())),
            Self::Choice { exports, .. } => exports
                .get(encoded)
                .map(|export| FillValue::Text(export.clone()))
                .ok_or_else(|| reject("no export value for this key".into())),
            Self::OptionlessButton { value, .. } => Ok(FillValue::Checked(encoded == value)),
        }
    }
}

/// PDF mapping for one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormMapping {
    form: String,
    file: String,
    fields: Vec<PdfField>,
}

impl FormMapping {
    /// Mapping of `form` onto the PDF `file`.
    pub fn new(form: &str, file: &str) -> Self {
        Self {
            form: form.to_string(),
            file: file.to_string(),
            fields: Vec::new(),
        }
    }

    /// Add a descriptor.
    pub fn field(mut self, field: PdfField) -> Self {
        self.fields.push(field);
        self
    }

    /// Form name (no instance).
    pub fn form(&self) -> &str {
        &self.form
    }

    /// PDF file name.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Descriptors in declaration order.
    pub fn fields(&self) -> &[PdfField] {
        &self.fields
    }
}

/// All mappings available for one tax year.
#[derive(Debug, Clone, Default)]
pub struct MappingSet {
    forms: BTreeMap<String, FormMapping>,
}

impl MappingSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the mapping for its form.
    pub fn insert(&mut self, mapping: FormMapping) {
        self.forms.insert(mapping.form.clone(), mapping);
    }

    /// Mapping for a form name (no instance).
    pub fn get(&self, form: &str) -> Option<&FormMapping> {
        self.forms.get(form)
    }

    /// Number of mapped forms.
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    /// True when no form is mapped.
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}
