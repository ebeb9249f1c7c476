//! # End-to-end 2023 returns
//!
//! Each test loads a complete (or deliberately incomplete) input file,
//! requests forms the way `taxes solve` does, and checks the literal
//! values on the solved return.

mod common;

use common::{solver, DEPOSIT, FILER, NO_ADJUSTMENTS, ONE_W2};
use taxes_core::{InputSpec, NameKey, Solution, Solver};

fn line<'s>(solution: &'s Solution, qualified: &str) -> &'s str {
    solution
        .get_qualified(qualified)
        .unwrap_or_else(|| panic!("{qualified} missing from the solution"))
}

// ---------------------------------------------------------------------------
// A. Single income, standard deduction
// ---------------------------------------------------------------------------

#[test]
fn single_filer_with_one_w2_gets_a_refund() {
    let mut solver = solver(&["1040"], &common::scenario_a());
    assert!(solver.solve().unwrap());
    assert!(solver.is_done());
    let solution = solver.solution().unwrap();

    for (field, expected) in [
        ("1040.1a", "100000.00"),
        ("1040.11", "100000.00"),
        ("1040.12", "13850.00"),
        ("1040.15", "86150.00"),
        ("1040.16", "14266.00"),
        ("1040.24", "14266.00"),
        ("1040.25d", "16551.90"),
        ("1040.33", "16551.90"),
        ("1040.34", "2285.90"),
        ("1040.35a", "2285.90"),
        ("1040.37", "0.00"),
        ("1040.38", "0.00"),
    ] {
        assert_eq!(line(&solution, field), expected, "{field}");
    }
    assert_eq!(line(&solution, "1040.35b"), "021000021");
    assert_eq!(line(&solution, "1040.filing_status"), "single");
    assert_eq!(line(&solution, "1040.spouse_ssn"), "");
}

#[test]
fn referenced_forms_are_instantiated_on_demand() {
    let mut solver = solver(&["1040"], &common::scenario_a());
    solver.solve().unwrap();
    let forms: Vec<&str> = solver.forms().map(|f| f.qualified_name()).collect();
    assert_eq!(forms, ["1040", "1040_s1", "w-2:acme"]);
}

// ---------------------------------------------------------------------------
// B. Schedule 1 aggregation with an HSA deduction
// ---------------------------------------------------------------------------

const SCHEDULE_1: &str = "
[1040_s1]
mortgage_interest_refund = 102.33
alimony_paid = 4983.20
alimony_pre_2019 = yes
alimony_recipient_ssn = 987-65-4321
other_adjustments = 123.45

[1099-g:ca]
payer = Franchise Tax Board
box_1 = 0
box_2 = 329.09

[1099-g:ny]
payer = NYS Department of Taxation
box_1 = 0
box_2 = 108.14

[1099-int:bank]
payer = First Bank
box_1 = 0
box_2 = 53.98
box_3 = 0
box_4 = 0
box_8 = 0

[8889:spouse]
coverage = family
age_55 = no
contributions = 7200
employer_contributions = 0
distributions = 0
";

#[test]
fn schedule_1_totals_income_and_adjustments() {
    let mut solver = solver(&["1040_s1"], SCHEDULE_1);
    assert!(solver.solve().unwrap());
    let solution = solver.solution().unwrap();

    assert_eq!(line(&solution, "1040_s1.1"), "437.23");
    assert_eq!(line(&solution, "1040_s1.8z"), "102.33");
    assert_eq!(line(&solution, "1040_s1.10"), "539.56");
    assert_eq!(line(&solution, "1040_s1.13"), "7200.00");
    assert_eq!(line(&solution, "1040_s1.18"), "53.98");
    assert_eq!(line(&solution, "1040_s1.19a"), "4983.20");
    assert_eq!(line(&solution, "1040_s1.19b"), "987654321");
    assert_eq!(line(&solution, "1040_s1.26"), "12360.63");
    assert_eq!(line(&solution, "8889:spouse.13"), "7200.00");
}

// ---------------------------------------------------------------------------
// C. Dependency discovery across forms
// ---------------------------------------------------------------------------

const INTEREST: &str = "
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
";

#[test]
fn interest_over_threshold_pulls_in_schedule_b() {
    let text = format!("{FILER}{DEPOSIT}{NO_ADJUSTMENTS}{ONE_W2}{INTEREST}");
    let mut solver = solver(&["1040"], &text);
    assert!(solver.solve().unwrap());

    assert!(solver.forms().any(|f| f.qualified_name() == "1040_sb"));
    let solution = solver.solution().unwrap();
    assert_eq!(line(&solution, "1040_sb.4"), "2000.00");
    assert_eq!(line(&solution, "1040.2b"), "2000.00");
    assert_eq!(line(&solution, "1040.9"), "102000.00");
}

#[test]
fn interest_under_threshold_leaves_schedule_b_out() {
    let small = INTEREST.replace("box_1 = 2000", "box_1 = 1500");
    let text = format!("{FILER}{DEPOSIT}{NO_ADJUSTMENTS}{ONE_W2}{small}");
    let mut solver = solver(&["1040"], &text);
    assert!(solver.solve().unwrap());
    assert!(!solver.forms().any(|f| f.qualified_name() == "1040_sb"));
    assert_eq!(line(&solver.solution().unwrap(), "1040.2b"), "1500.00");
}

// ---------------------------------------------------------------------------
// D. Unimplemented scenario
// ---------------------------------------------------------------------------

#[test]
fn unimplemented_scenario_does_not_poison_the_solve() {
    let text = common::scenario_a().replace("virtual_currency = no", "virtual_currency = yes");
    let mut solver = solver(&["1040"], &text);
    assert!(!solver.solve().unwrap());
    assert!(solver.is_done());
    assert_eq!(solver.unimplemented_fields(), ["1040.virtual_currency"]);

    let solution = solver.solution().unwrap();
    assert_eq!(solution.get("1040", "virtual_currency"), None);
    assert_eq!(line(&solution, "1040.16"), "14266.00");
    assert_eq!(line(&solution, "1040.35a"), "2285.90");
    assert!(solver.unmet_input_dependencies().is_empty());
}

#[test]
fn itemizing_and_dependents_are_reported_together() {
    let text = common::scenario_a()
        .replace("itemize = no", "itemize = yes")
        .replace("dependents = 0", "dependents = 2");
    let mut solver = solver(&["1040"], &text);
    assert!(!solver.solve().unwrap());
    let mut unimplemented = solver.unimplemented_fields().to_vec();
    unimplemented.sort();
    assert_eq!(unimplemented, ["1040.12", "1040.19"]);

    // Everything downstream of the deduction is missing, income is not.
    let solution = solver.solution().unwrap();
    assert_eq!(line(&solution, "1040.11"), "100000.00");
    assert_eq!(solution.get("1040", "15"), None);
    assert_eq!(solution.get("1040", "35a"), None);
}

// ---------------------------------------------------------------------------
// E. Refused input
// ---------------------------------------------------------------------------

#[test]
fn refused_input_yields_a_partial_solution() {
    let text = common::scenario_a().replace("routing_number = 021000021\n", "");
    let mut calls = 0;
    let mut solver = Solver::new(common::library(), common::inputs(&text)).with_prompter(
        |_: &str, _: &InputSpec, _: &[String]| {
            calls += 1;
            None
        },
    );
    solver.add_form("1040").unwrap();
    assert!(!solver.solve().unwrap());
    assert!(solver.refused_input());

    let unmet = solver.unmet_input_dependencies();
    assert_eq!(
        unmet.get(&NameKey::from("1040.routing_number")),
        Some(&vec!["1040.35b".to_string()])
    );
    assert_eq!(unmet.len(), 1);

    let solution = solver.solution().unwrap();
    assert_eq!(solution.get("1040", "35b"), None);
    assert_eq!(line(&solution, "1040.35c"), "checking");
    assert_eq!(line(&solution, "1040.35d"), "12345678");
    assert_eq!(line(&solution, "1040.37"), "0.00");
    drop(solver);
    assert_eq!(calls, 1);
}

#[test]
fn missing_input_without_a_prompter_is_reported() {
    let text = common::scenario_a().replace("account_number = 12345678\n", "");
    let mut solver = solver(&["1040"], &text);
    assert!(!solver.solve().unwrap());
    assert!(!solver.refused_input());
    let unmet = solver.unmet_input_dependencies();
    assert_eq!(
        unmet.get(&NameKey::from("1040.account_number")),
        Some(&vec!["1040.35d".to_string()])
    );
}

// ---------------------------------------------------------------------------
// F. Out-of-range amounts
// ---------------------------------------------------------------------------

fn two_w2s(box_1: &str) -> String {
    format!(
        "{FILER}{DEPOSIT}{NO_ADJUSTMENTS}
[w-2:first]
employer = Acme Corp
box_1 = {box_1}
box_2 = 0

[w-2:second]
employer = Widget Co
box_1 = {box_1}
box_2 = 0
"
    )
}

#[test]
fn oversized_wages_are_rejected_without_panicking() {
    let mut solver = solver(&["1040"], &two_w2s("79228162514264337593543950335"));
    let err = solver.solve().unwrap_err().to_string();
    assert!(err.contains("w-2:") && err.contains(".box_1"), "{err}");
}

#[test]
fn largest_accepted_wages_still_solve() {
    let mut solver = solver(&["1040"], &two_w2s("1000000000000000"));
    solver.solve().unwrap();
    assert!(solver.is_done());
    let solution = solver.solution().unwrap();
    assert_eq!(line(&solution, "1040.1a"), "2000000000000000.00");
    assert_eq!(line(&solution, "1040.15"), "1999999999986150.00");
}
