//! # Solution Table
//!
//! The product of a solve: for every form instance, the string encoding
//! of each field that was computed. Sections are form-qualified-names and
//! keys are field base names, both in name order. Fields that were not
//! computed are simply absent.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TaxError, TaxResult};
use crate::form::FormLibrary;
use crate::names::{split_qualified, NameKey};
use crate::sections::SectionTable;
use crate::store::ValueStore;

/// Per-form table of encoded field values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solution {
    forms: BTreeMap<NameKey, BTreeMap<NameKey, String>>,
}

impl Solution {
    /// An empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one encoded value under its qualified field name.
    pub fn insert(&mut self, qualified: &str, encoded: String) -> TaxResult<()> {
        let (form, base) = split_qualified(qualified).ok_or_else(|| TaxError::InvalidName {
            name: qualified.to_string(),
            reason: "field names in a solution must be qualified".into(),
        })?;
        self.forms
            .entry(NameKey::from(form))
            .or_default()
            .insert(NameKey::from(base), encoded);
        Ok(())
    }

    /// Make sure a form appears even if none of its fields were computed.
    pub fn touch_form(&mut self, form: &str) {
        self.forms.entry(NameKey::from(form)).or_default();
    }

    /// Encoded value of one field.
    pub fn get(&self, form: &str, field: &str) -> Option<&str> {
        self.forms
            .get(&NameKey::from(form))
            .and_then(|fields| fields.get(&NameKey::from(field)))
            .map(String::as_str)
    }

    /// Encoded value by qualified field name.
    pub fn get_qualified(&self, qualified: &str) -> Option<&str> {
        let (form, field) = split_qualified(qualified)?;
        self.get(form, field)
    }

    /// Iterate forms in name order.
    pub fn forms(&self) -> impl Iterator<Item = (&str, &BTreeMap<NameKey, String>)> {
        self.forms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of computed fields across all forms.
    pub fn field_count(&self) -> usize {
        self.forms.values().map(BTreeMap::len).sum()
    }

    /// Convert to the sectioned text model.
    pub fn to_table(&self) -> SectionTable {
        let mut table = SectionTable::new();
        for (form, fields) in &self.forms {
            for (field, value) in fields {
                table.set(form.as_str(), field.as_str(), value);
            }
        }
        table
    }

    /// Build from the sectioned text model.
    pub fn from_table(table: &SectionTable) -> Self {
        let mut solution = Self::new();
        for (form, fields) in table.sections() {
            let entry = solution.forms.entry(NameKey::from(form)).or_default();
            for (field, value) in fields {
                entry.insert(field.clone(), value.clone());
            }
        }
        solution
    }

    /// Render as sectioned text.
    pub fn to_text(&self) -> String {
        self.to_table().to_text()
    }

    /// Parse sectioned text.
    pub fn from_text(text: &str) -> TaxResult<Self> {
        SectionTable::parse(text).map(|t| Self::from_table(&t))
    }

    /// Load a solution file.
    pub fn load(path: &Path) -> TaxResult<Self> {
        SectionTable::load(path).map(|t| Self::from_table(&t))
    }

    /// Write a solution file.
    pub fn write(&self, path: &Path) -> TaxResult<()> {
        self.to_table().write(path)
    }
}

impl FormLibrary {
    /// Decode a solution back into typed values with each field's codec.
    pub fn decode_solution(&self, solution: &Solution) -> TaxResult<ValueStore> {
        let mut values = ValueStore::new();
        for (form, fields) in solution.forms() {
            for (field, raw) in fields {
                let qualified = format!("{form}.{field}");
                let spec = self
                    .field_spec(&qualified)
                    .ok_or_else(|| TaxError::UnknownField {
                        name: qualified.clone(),
                        referenced_by: "solution".into(),
                    })?;
                values.insert(&qualified, spec.from_string(&qualified, raw)?);
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSpec;
    use crate::form::{FormSpec, Instancing};
    use crate::value::{Value, ValueKind};

    fn sample() -> Solution {
        let mut s = Solution::new();
        s.insert("1040.10", "12360.63".into()).unwrap();
        s.insert("1040.9", "539.56".into()).unwrap();
        s.insert("w-2:acme.wages", "100000.00".into()).unwrap();
        s
    }

    #[test]
    fn text_round_trip_preserves_order() {
        let s = sample();
        let text = s.to_text();
        assert_eq!(
            text,
            "[1040]\n9 = 539.56\n10 = 12360.63\n\n[w-2:acme]\nwages = 100000.00\n"
        );
        assert_eq!(Solution::from_text(&text).unwrap(), s);
    }

    #[test]
    fn json_is_a_nested_object() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["1040"]["10"], "12360.63");
        assert_eq!(json["w-2:acme"]["wages"], "100000.00");
    }

    #[test]
    fn lookups_by_form_and_qualified_name() {
        let s = sample();
        assert_eq!(s.get("1040", "9"), Some("539.56"));
        assert_eq!(s.get_qualified("w-2:acme.wages"), Some("100000.00"));
        assert_eq!(s.get_qualified("w-2:acme.tips"), None);
        assert_eq!(s.field_count(), 3);
        assert!(Solution::new().insert("bare", String::new()).is_err());
    }

    #[test]
    fn decode_uses_field_codecs() {
        let mut lib = FormLibrary::new(2023);
        lib.register(
            FormSpec::builder("w-2", 2023)
                .instancing(Instancing::Free)
                .optional(
                    FieldSpec::new("wages", ValueKind::Decimal(2), |_, _| Ok(Value::Empty))
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
        .unwrap();

        let mut s = Solution::new();
        s.insert("w-2:acme.wages", "100000.00".into()).unwrap();
        let values = lib.decode_solution(&s).unwrap();
        assert_eq!(
            values.get("w-2:acme.wages").unwrap().as_decimal(),
            Some(rust_decimal::Decimal::new(100_000, 0))
        );

        s.insert("w-2:acme.tips", "1".into()).unwrap();
        assert!(matches!(
            lib.decode_solution(&s),
            Err(TaxError::UnknownField { .. })
        ));
    }
}
