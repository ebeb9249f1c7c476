//! # Fill plans for solved 2023 returns
//!
//! Solve, write the solution, read it back, and plan the PDF fill the way
//! `taxes solve --solution` followed by `taxes fill-pdfs` would.

mod common;

use taxes_core::Solution;
use taxes_fill::{plan, FillValue, FilledForm};

fn planned(forms: &[&str], text: &str) -> Vec<FilledForm> {
    let mut solver = common::solver(forms, text);
    solver.solve().unwrap();
    let solution = solver.solution().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("solution.ini");
    solution.write(&path).unwrap();
    let reloaded = Solution::load(&path).unwrap();

    let mappings = taxes_forms::mappings_for_year(2023).unwrap();
    plan(common::library(), &mappings, &reloaded).unwrap()
}

fn value<'p>(form: &'p FilledForm, pdf: &str) -> Option<&'p FillValue> {
    form.fields.iter().find(|f| f.pdf == pdf).map(|f| &f.value)
}

#[test]
fn simple_return_files_only_the_main_form() {
    let plan = planned(&["1040"], &common::scenario_a());
    let forms: Vec<&str> = plan.iter().map(|f| f.form.as_str()).collect();
    assert_eq!(forms, ["1040"]);

    let f1040 = &plan[0];
    assert_eq!(f1040.file.as_deref(), Some("f1040.pdf"));
    assert_eq!(f1040.jurisdiction, "federal");
    assert_eq!(
        value(f1040, "topmostSubform[0].Page1[0].c1_1[0]"),
        Some(&FillValue::Checked(true))
    );
    assert_eq!(
        value(f1040, "topmostSubform[0].Page1[0].c1_2[0]"),
        Some(&FillValue::Checked(false))
    );
    assert_eq!(
        value(f1040, "topmostSubform[0].Page2[0].f2_24[0]"),
        Some(&FillValue::Text("2285.90".into()))
    );
    assert_eq!(
        value(f1040, "topmostSubform[0].Page2[0].c2_5[0]"),
        Some(&FillValue::Checked(true))
    );
}

#[test]
fn schedules_follow_the_main_form_in_attachment_order() {
    let text = format!(
        "{}{}",
        common::scenario_a().replace("other_adjustments = 0", "other_adjustments = 250"),
        "
[1099-int:bank]
payer = First Bank
box_1 = 2000
box_2 = 0
box_3 = 0
box_4 = 0
box_8 = 0

[1040_sb]
foreign_account = no
foreign_trust = no
",
    );
    let plan = planned(&["1040"], &text);
    let forms: Vec<(&str, u32)> = plan.iter().map(|f| (f.form.as_str(), f.sequence)).collect();
    assert_eq!(forms, [("1040", 0), ("1040_s1", 1), ("1040_sb", 8)]);

    let schedule_b = &plan[2];
    assert_eq!(
        value(schedule_b, "topmostSubform[0].Page1[0].f1_33[0]"),
        Some(&FillValue::Text("2000.00".into()))
    );
    assert_eq!(
        value(schedule_b, "topmostSubform[0].Page1[0].c1_1[0]"),
        Some(&FillValue::Checked(false))
    );
}

#[test]
fn plan_serializes_to_json() {
    let plan = planned(&["1040"], &common::scenario_a());
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json[0]["form"], "1040");
    assert_eq!(json[0]["sequence"], 0);
    assert!(json[0]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f["value"] == true));
}
