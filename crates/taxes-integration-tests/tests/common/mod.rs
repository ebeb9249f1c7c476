//! Input files and helpers shared by the integration tests.

#![allow(dead_code)]

use std::sync::OnceLock;

use taxes_core::{FormLibrary, InputStore, Solver};

/// The 2023 library, built once per test binary.
pub fn library() -> &'static FormLibrary {
    static LIBRARY: OnceLock<FormLibrary> = OnceLock::new();
    LIBRARY.get_or_init(|| taxes_forms::library_for_year(2023).unwrap())
}

/// Main-return inputs without direct deposit details.
pub const FILER: &str = "\
[1040]
first_name = Pat
last_name = Doe
ssn = 123-45-6789
filing_status = single
virtual_currency = no
itemize = no
dependents = 0
";

/// Direct deposit details for the main return.
pub const DEPOSIT: &str = "\
routing_number = 021000021
account_type = checking
account_number = 12345678
";

/// Schedule 1 inputs with nothing to report.
pub const NO_ADJUSTMENTS: &str = "
[1040_s1]
mortgage_interest_refund = 0
alimony_paid = 0
other_adjustments = 0
";

/// One wage statement: $100,000 wages, $16,551.90 withheld.
pub const ONE_W2: &str = "
[w-2:acme]
employer = Acme Corp
box_1 = 100000
box_2 = 16551.90
";

/// Single filer with one W-2 and a refund by direct deposit.
pub fn scenario_a() -> String {
    format!("{FILER}{DEPOSIT}{NO_ADJUSTMENTS}{ONE_W2}")
}

/// Parse an input file.
pub fn inputs(text: &str) -> InputStore {
    InputStore::from_text(text).unwrap()
}

/// Parse `text` and request `forms` on a fresh solver.
pub fn solver(forms: &[&str], text: &str) -> Solver<'static> {
    let inputs = InputStore::from_text(text).unwrap();
    let mut solver = Solver::new(library(), inputs);
    for form in forms {
        solver.add_form(form).unwrap();
    }
    solver
}
