//! # Form 1040, U.S. Individual Income Tax Return (2023)
//!
//! Wages come from the W-2 instances in the input file and interest from
//! the 1099-INT instances. Schedule 1 always supplies lines 8 and 10;
//! Schedule B is pulled in only when taxable interest exceeds $1,500.
//!
//! ## Not modelled
//!
//! The following raise `not_implemented` when the inputs reach them:
//! digital asset activity, itemized deductions, dependents, the earned
//! income credit, the additional Medicare tax, and the underpayment
//! penalty.

use rust_decimal::Decimal;
use taxes_core::{
    not_implemented, EnumOption, FieldSpec, FormSpec, InputSpec, TaxError, TaxResult, Value,
    ValueKind,
};

use super::common::{echo, money, non_negative, sum_instances, sum_of, total_of, YEAR};
use super::schedule_b;
use super::tax::{figure_tax, standard_deduction};
use crate::status::FilingStatus;

/// Form name.
pub const FORM: &str = "1040";

fn dollars(amount: i64) -> Decimal {
    Decimal::from(amount)
}

/// Wages above which the additional Medicare tax may apply.
fn medicare_threshold(status: FilingStatus) -> Decimal {
    dollars(match status {
        FilingStatus::MarriedFilingJointly => 250_000,
        FilingStatus::MarriedFilingSeparately => 125_000,
        _ => 200_000,
    })
}

/// Highest AGI that can still qualify for the earned income credit.
fn earned_income_limit(status: FilingStatus, dependents: i64) -> Decimal {
    let joint = status == FilingStatus::MarriedFilingJointly;
    dollars(match (dependents > 0, joint) {
        (false, false) => 17_640,
        (false, true) => 24_210,
        (true, false) => 56_838,
        (true, true) => 63_698,
    })
}

/// A text field that is only read when a spouse is on the return.
fn spouse_echo(name: &str, kind: ValueKind) -> TaxResult<FieldSpec> {
    let input = name.to_string();
    FieldSpec::new(name, kind, move |i, v| {
        if !FilingStatus::from_values(v)?.has_spouse() {
            return Ok(Value::Empty);
        }
        i.get(&input)
    })
}

/// A direct-deposit field, read only when there is a refund.
fn deposit(name: &str, kind: ValueKind, input: &'static str) -> TaxResult<FieldSpec> {
    FieldSpec::new(name, kind, move |i, v| {
        if v.decimal("35a")? <= Decimal::ZERO {
            return Ok(Value::Empty);
        }
        i.get(input)
    })
}

/// Build the form.
pub fn form() -> TaxResult<FormSpec> {
    FormSpec::builder(FORM, YEAR)
        .title("U.S. Individual Income Tax Return")
        .sequence(0)
        // Identity
        .input(InputSpec::text("first_name", "Your first name and middle initial")?)
        .input(InputSpec::text("last_name", "Your last name")?)
        .input(InputSpec::ssn("ssn", "Your social security number")?)
        .input(InputSpec::text(
            "spouse_first_name",
            "Spouse's first name and middle initial",
        )?)
        .input(InputSpec::text("spouse_last_name", "Spouse's last name")?)
        .input(InputSpec::ssn("spouse_ssn", "Spouse's social security number")?)
        .input(InputSpec::enumeration(
            "filing_status",
            "Filing status",
            FilingStatus::options(),
            false,
        )?)
        .input(InputSpec::boolean(
            "virtual_currency",
            "At any time during 2023, did you receive, sell, exchange, or \
             otherwise dispose of a digital asset?",
        )?)
        .input(InputSpec::boolean("itemize", "Do you itemize deductions?")?)
        .input(InputSpec::integer(
            "dependents",
            "Number of dependents you can claim",
        )?)
        .input(InputSpec::pattern(
            "routing_number",
            "Routing number for direct deposit of your refund",
            r"\d{9}",
        )?)
        .input(InputSpec::enumeration(
            "account_type",
            "Type of account for direct deposit",
            vec![
                EnumOption::new("checking", "Checking"),
                EnumOption::new("savings", "Savings"),
            ],
            false,
        )?)
        .input(InputSpec::pattern(
            "account_number",
            "Account number for direct deposit",
            r"[0-9A-Za-z-]{1,17}",
        )?)
        .required(echo("first_name", ValueKind::Text, "first_name")?)
        .required(echo("last_name", ValueKind::Text, "last_name")?)
        .required(echo("ssn", ValueKind::Ssn, "ssn")?)
        .required(echo(
            "filing_status",
            ValueKind::enumeration(FilingStatus::ALL.iter().map(|s| s.key())),
            "filing_status",
        )?)
        .required(spouse_echo("spouse_first_name", ValueKind::Text)?)
        .required(spouse_echo("spouse_last_name", ValueKind::Text)?)
        .required(spouse_echo("spouse_ssn", ValueKind::Ssn)?)
        .required(FieldSpec::new("virtual_currency", ValueKind::Boolean, |i, _| {
            if i.boolean("virtual_currency")? {
                return not_implemented("digital asset transactions");
            }
            Ok(false.into())
        })?)
        // Income
        .required(total_of("1a", "w-2", "wages")?)
        .required(sum_of("1z", &["1a"])?)
        .required(total_of("2a", "1099-int", "tax_exempt")?)
        .required(money("2b", |i, v| {
            let direct = sum_instances(i, v, "1099-int", "taxable")?;
            if direct > schedule_b::THRESHOLD {
                return Ok(v.get("1040_sb.4")?);
            }
            Ok(direct.into())
        })?)
        .required(money("8", |_, v| v.get("1040_s1.10"))?)
        .required(sum_of("9", &["1z", "2b", "8"])?)
        .required(money("10", |_, v| v.get("1040_s1.26"))?)
        .required(money("11", |_, v| {
            Ok((v.decimal("9")? - v.decimal("10")?).into())
        })?)
        // Deductions and tax
        .required(money("12", |i, v| {
            if i.boolean("itemize")? {
                return not_implemented("itemized deductions");
            }
            Ok(standard_deduction(FilingStatus::from_values(v)?).into())
        })?)
        .required(money("13", |_, _| Ok(Decimal::ZERO.into()))?)
        .required(sum_of("14", &["12", "13"])?)
        .required(money("15", |_, v| {
            Ok(non_negative(v.decimal("11")? - v.decimal("14")?).into())
        })?)
        .required(money("16", |_, v| {
            let status = FilingStatus::from_values(v)?;
            figure_tax(v.decimal("15")?, status)
                .map(Value::from)
                .ok_or_else(|| TaxError::Overflow("1040.16".to_string()).into())
        })?)
        .required(sum_of("18", &["16"])?)
        .required(money("19", |i, _| {
            if i.int("dependents")? > 0 {
                return not_implemented("child tax credit and credit for other dependents");
            }
            Ok(Decimal::ZERO.into())
        })?)
        .required(sum_of("21", &["19"])?)
        .required(money("22", |_, v| {
            Ok(non_negative(v.decimal("18")? - v.decimal("21")?).into())
        })?)
        .required(money("23", |_, v| {
            let status = FilingStatus::from_values(v)?;
            if v.decimal("1a")? > medicare_threshold(status) {
                return not_implemented("additional Medicare tax");
            }
            Ok(Decimal::ZERO.into())
        })?)
        .required(sum_of("24", &["22", "23"])?)
        // Payments
        .required(total_of("25a", "w-2", "withholding")?)
        .required(total_of("25b", "1099-int", "withholding")?)
        .required(sum_of("25d", &["25a", "25b"])?)
        .required(money("27", |i, v| {
            let status = FilingStatus::from_values(v)?;
            let agi = v.decimal("11")?;
            if status == FilingStatus::MarriedFilingSeparately || agi <= Decimal::ZERO {
                return Ok(Decimal::ZERO.into());
            }
            if agi < earned_income_limit(status, i.int("dependents")?) {
                return not_implemented("earned income credit");
            }
            Ok(Decimal::ZERO.into())
        })?)
        .required(sum_of("32", &["27"])?)
        .required(sum_of("33", &["25d", "32"])?)
        // Refund and amount owed
        .required(money("34", |_, v| {
            Ok(non_negative(v.decimal("33")? - v.decimal("24")?).into())
        })?)
        .required(sum_of("35a", &["34"])?)
        .required(deposit("35b", ValueKind::Text, "routing_number")?)
        .required(deposit(
            "35c",
            ValueKind::enumeration(["checking", "savings"]),
            "account_type",
        )?)
        .required(deposit("35d", ValueKind::Text, "account_number")?)
        .required(money("37", |_, v| {
            Ok(non_negative(v.decimal("24")? - v.decimal("33")?).into())
        })?)
        .required(money("38", |_, v| {
            if v.decimal("37")? > dollars(1_000) {
                return not_implemented("estimated tax penalty");
            }
            Ok(Decimal::ZERO.into())
        })?)
        .build()
}
