//! PDF field mappings for the 2023 IRS fillable forms.
//!
//! Field names follow the AcroForm hierarchy of the published PDFs
//! (`topmostSubform[0].Page1[0].f1_04[0]`). Statements are never filed
//! and have no mapping.

use taxes_fill::{FormMapping, MappingSet, PdfField};

use super::{f1040, f8889, schedule1, schedule_b};
use crate::status::FilingStatus;

fn page(n: u8, field: &str) -> String {
    format!("topmostSubform[0].Page{n}[0].{field}[0]")
}

fn text(n: u8, pdf: &str, field: &str) -> PdfField {
    PdfField::text(&page(n, pdf), field)
}

fn f1040() -> FormMapping {
    let mut mapping = FormMapping::new(f1040::FORM, "f1040.pdf");
    for (i, status) in FilingStatus::ALL.iter().enumerate() {
        mapping = mapping.field(PdfField::optionless(
            &page(1, &format!("c1_{}", i + 1)),
            "filing_status",
            status.key(),
        ));
    }
    mapping
        .field(text(1, "f1_04", "first_name"))
        .field(text(1, "f1_05", "last_name"))
        .field(text(1, "f1_06", "ssn"))
        .field(text(1, "f1_07", "spouse_first_name"))
        .field(text(1, "f1_08", "spouse_last_name"))
        .field(text(1, "f1_09", "spouse_ssn"))
        .field(PdfField::button(&page(1, "c1_6"), "virtual_currency"))
        .field(text(1, "f1_28", "1a"))
        .field(text(1, "f1_36", "1z"))
        .field(text(1, "f1_37", "2a"))
        .field(text(1, "f1_38", "2b"))
        .field(text(1, "f1_49", "8"))
        .field(text(1, "f1_50", "9"))
        .field(text(1, "f1_51", "10"))
        .field(text(1, "f1_52", "11"))
        .field(text(1, "f1_53", "12"))
        .field(text(1, "f1_54", "13"))
        .field(text(1, "f1_55", "14"))
        .field(text(1, "f1_56", "15"))
        .field(text(2, "f2_02", "16"))
        .field(text(2, "f2_04", "18"))
        .field(text(2, "f2_05", "19"))
        .field(text(2, "f2_07", "21"))
        .field(text(2, "f2_08", "22"))
        .field(text(2, "f2_09", "23"))
        .field(text(2, "f2_10", "24"))
        .field(text(2, "f2_11", "25a"))
        .field(text(2, "f2_12", "25b"))
        .field(text(2, "f2_14", "25d"))
        .field(text(2, "f2_16", "27"))
        .field(text(2, "f2_21", "32"))
        .field(text(2, "f2_22", "33"))
        .field(text(2, "f2_23", "34"))
        .field(text(2, "f2_24", "35a"))
        .field(text(2, "f2_25", "35b"))
        .field(PdfField::optionless(&page(2, "c2_5"), "35c", "checking"))
        .field(PdfField::optionless(&page(2, "c2_6"), "35c", "savings"))
        .field(text(2, "f2_26", "35d"))
        .field(text(2, "f2_28", "37"))
        .field(text(2, "f2_29", "38"))
}

fn schedule1() -> FormMapping {
    FormMapping::new(schedule1::FORM, "f1040s1.pdf")
        .field(text(1, "f1_03", "1"))
        .field(text(1, "f1_09", "7"))
        .field(text(1, "f1_32", "8z"))
        .field(text(1, "f1_33", "9"))
        .field(text(1, "f1_34", "10"))
        .field(text(2, "f2_03", "13"))
        .field(text(2, "f2_08", "18"))
        .field(text(2, "f2_09", "19a"))
        .field(text(2, "f2_10", "19b"))
        .field(text(2, "f2_29", "24z"))
        .field(text(2, "f2_30", "25"))
        .field(text(2, "f2_31", "26"))
}

fn schedule_b() -> FormMapping {
    FormMapping::new(schedule_b::FORM, "f1040sb.pdf")
        .field(text(1, "f1_31", "2"))
        .field(text(1, "f1_32", "3"))
        .field(text(1, "f1_33", "4"))
        .field(PdfField::button(&page(1, "c1_1"), "7a"))
        .field(PdfField::button(&page(1, "c1_3"), "8"))
}

fn f8889() -> FormMapping {
    FormMapping::new(f8889::FORM, "f8889.pdf")
        .field(PdfField::choice(
            &page(1, "c1_1"),
            "1",
            [("self_only", "1"), ("family", "2")],
        ))
        .field(text(1, "f1_04", "2"))
        .field(text(1, "f1_05", "3"))
        .field(text(1, "f1_08", "6"))
        .field(text(1, "f1_09", "7"))
        .field(text(1, "f1_10", "8"))
        .field(text(1, "f1_11", "9"))
        .field(text(1, "f1_13", "11"))
        .field(text(1, "f1_14", "12"))
        .field(text(1, "f1_15", "13"))
        .field(text(1, "f1_16", "14a"))
}

/// Mappings for every filed 2023 form.
pub fn mappings() -> MappingSet {
    let mut set = MappingSet::new();
    set.insert(f1040());
    set.insert(schedule1());
    set.insert(schedule_b());
    set.insert(f8889());
    set
}
