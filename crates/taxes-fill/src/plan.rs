//! # Fill Plans
//!
//! [`plan`] walks a solution, keeps the forms whose `needs_filing`
//! predicate holds, resolves each mapped PDF field, and orders the result
//! the way a return is assembled: federal before state, then by attachment
//! sequence number, then by form-qualified-name.

use std::path::Path;

use serde::Serialize;
use taxes_core::{FormLibrary, FormName, Jurisdiction, NameKey, Solution, TaxError, ValueView};
use tracing::debug;

use crate::error::FillError;
use crate::mapping::{FillValue, MappingSet};

/// One resolved PDF field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilledField {
    /// PDF field name.
    pub pdf: String,
    /// Resolved output.
    pub value: FillValue,
}

/// One form to be filed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilledForm {
    /// Form-qualified-name.
    pub form: String,
    /// Form title.
    pub title: String,
    /// Filing jurisdiction.
    pub jurisdiction: String,
    /// Attachment sequence number.
    pub sequence: u32,
    /// PDF file name, when the form has a mapping.
    pub file: Option<String>,
    /// Resolved fields in mapping order. Fields missing from the solution
    /// are left out.
    pub fields: Vec<FilledField>,
}

/// Build the fill plan for a solution.
pub fn plan(
    library: &FormLibrary,
    mappings: &MappingSet,
    solution: &Solution,
) -> Result<Vec<FilledForm>, FillError> {
    let values = library.decode_solution(solution)?;
    let mut ordered: Vec<((Jurisdiction, u32, NameKey), FilledForm)> = Vec::new();

    for (qualified, encoded) in solution.forms() {
        let name = FormName::parse(qualified)?;
        let spec = library
            .get(name.name())
            .ok_or_else(|| TaxError::UnknownForm(name.name().to_string()))?;
        if !spec.needs_filing(&ValueView::new(qualified, &values)) {
            debug!(form = %qualified, "not required to file");
            continue;
        }

        let mapping = mappings.get(name.name());
        let mut fields = Vec::new();
        for descriptor in mapping.map(|m| m.fields()).unwrap_or_default() {
            let Some(raw) = encoded.get(&NameKey::from(descriptor.field_name())) else {
                continue;
            };
            fields.push(FilledField {
                pdf: descriptor.pdf_name().to_string(),
                value: descriptor.resolve(qualified, raw)?,
            });
        }

        let form = FilledForm {
            form: qualified.to_string(),
            title: spec.title().to_string(),
            jurisdiction: spec.jurisdiction().to_string(),
            sequence: spec.sequence(),
            file: mapping.map(|m| m.file().to_string()),
            fields,
        };
        let key = (
            spec.jurisdiction().clone(),
            spec.sequence(),
            NameKey::from(qualified),
        );
        ordered.push((key, form));
    }

    ordered.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(ordered.into_iter().map(|(_, form)| form).collect())
}

/// Write a fill plan as pretty-printed JSON.
pub fn write_plan(path: &Path, plan: &[FilledForm]) -> Result<(), FillError> {
    let json = serde_json::to_string_pretty(plan)?;
    std::fs::write(path, json + "\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{FormMapping, PdfField};
    use taxes_core::{FieldSpec, FormSpec, Instancing, Value, ValueKind};

    fn field(name: &str, kind: ValueKind) -> FieldSpec {
        FieldSpec::new(name, kind, |_, _| Ok(Value::Empty)).unwrap()
    }

    // A federal return, a schedule filed only when its total is positive,
    // a state return, and a statement that is never filed.
    fn library() -> FormLibrary {
        let mut lib = FormLibrary::new(2023);
        lib.register(
            FormSpec::builder("1040", 2023)
                .title("U.S. Individual Income Tax Return")
                .required(field("1a", ValueKind::Decimal(2)))
                .required(field("mfj", ValueKind::Boolean))
                .build()
                .unwrap(),
        )
        .unwrap();
        lib.register(
            FormSpec::builder("1040_sb", 2023)
                .sequence(8)
                .required(field("4", ValueKind::Decimal(2)))
                .needs_filing(|v| v.decimal("4").is_ok_and(|d| d.is_sign_positive() && !d.is_zero()))
                .build()
                .unwrap(),
        )
        .unwrap();
        lib.register(
            FormSpec::builder("540", 2023)
                .jurisdiction(Jurisdiction::State("CA".into()))
                .required(field("12", ValueKind::Decimal(2)))
                .build()
                .unwrap(),
        )
        .unwrap();
        lib.register(
            FormSpec::builder("w-2", 2023)
                .instancing(Instancing::Free)
                .sequence(0)
                .optional(field("wages", ValueKind::Decimal(2)))
                .needs_filing(|_| false)
                .build()
                .unwrap(),
        )
        .unwrap();
        lib
    }

    fn mappings() -> MappingSet {
        let mut set = MappingSet::new();
        set.insert(
            FormMapping::new("1040", "f1040.pdf")
                .field(PdfField::text("f1_32", "1a"))
                .field(PdfField::button("c1_2", "mfj"))
                .field(PdfField::text("f1_99", "37")),
        );
        set
    }

    fn solution(sb_total: &str) -> Solution {
        Solution::from_text(&format!(
            "[540]\n12 = 1.00\n\n[1040]\n1a = 100000.00\nmfj = true\n\n\
             [1040_sb]\n4 = {sb_total}\n\n[w-2:acme]\nwages = 100000.00\n"
        ))
        .unwrap()
    }

    #[test]
    fn orders_by_jurisdiction_then_sequence() {
        let plan = plan(&library(), &mappings(), &solution("1600.00")).unwrap();
        let forms: Vec<&str> = plan.iter().map(|f| f.form.as_str()).collect();
        assert_eq!(forms, ["1040", "1040_sb", "540"]);
        assert_eq!(plan[2].jurisdiction, "CA");
    }

    #[test]
    fn skips_forms_that_need_not_be_filed() {
        let plan = plan(&library(), &mappings(), &solution("0.00")).unwrap();
        assert!(plan.iter().all(|f| f.form != "1040_sb" && f.form != "w-2:acme"));
    }

    #[test]
    fn resolves_mapped_fields_and_skips_missing_ones() {
        let plan = plan(&library(), &mappings(), &solution("0.00")).unwrap();
        let main = &plan[0];
        assert_eq!(main.file.as_deref(), Some("f1040.pdf"));
        assert_eq!(
            main.fields,
            [
                FilledField {
                    pdf: "f1_32".into(),
                    value: FillValue::Text("100000.00".into())
                },
                FilledField {
                    pdf: "c1_2".into(),
                    value: FillValue::Checked(true)
                },
            ]
        );
        assert!(plan[1].fields.is_empty());
        assert_eq!(plan[1].file, None);
    }

    #[test]
    fn writes_json() {
        let plan = plan(&library(), &mappings(), &solution("0.00")).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        write_plan(&path, &plan).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json[0]["form"], "1040");
        assert_eq!(json[0]["fields"][1]["value"], true);
    }

    #[test]
    fn unknown_sections_are_errors() {
        let bad = Solution::from_text("[8888]\n1 = 2\n").unwrap();
        assert!(matches!(
            plan(&library(), &mappings(), &bad),
            Err(FillError::Core(TaxError::UnknownField { .. }))
        ));
    }
}
