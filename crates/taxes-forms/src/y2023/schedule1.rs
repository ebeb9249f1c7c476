//! Schedule 1 (Form 1040), Additional Income and Adjustments to Income.
//!
//! Part I totals on line 10 and flows to 1040 line 8; Part II totals on
//! line 26 and flows to 1040 line 10.

use rust_decimal::Decimal;
use taxes_core::{FieldSpec, FormSpec, InputSpec, TaxResult, Value, ValueKind};

use super::common::{any_nonzero, echo_money, money, sum_of, total_of, YEAR};

/// Form name.
pub const FORM: &str = "1040_s1";

/// Build the form.
pub fn form() -> TaxResult<FormSpec> {
    FormSpec::builder(FORM, YEAR)
        .title("Additional Income and Adjustments to Income")
        .sequence(1)
        .input(InputSpec::float(
            "mortgage_interest_refund",
            "Refund of mortgage interest deducted in a prior year",
        )?)
        .input(InputSpec::float(
            "alimony_paid",
            "Alimony paid during the year",
        )?)
        .input(InputSpec::boolean(
            "alimony_pre_2019",
            "Was the divorce or separation agreement executed before 2019?",
        )?)
        .input(InputSpec::ssn(
            "alimony_recipient_ssn",
            "Social security number of the alimony recipient",
        )?)
        .input(InputSpec::float(
            "other_adjustments",
            "Other adjustments to income",
        )?)
        // Part I
        .required(total_of("1", "1099-g", "refund")?)
        .required(total_of("7", "1099-g", "unemployment")?)
        .required(echo_money("8z", "mortgage_interest_refund")?)
        .required(sum_of("9", &["8z"])?)
        .required(sum_of("10", &["1", "7", "9"])?)
        // Part II
        .required(total_of("13", "8889", "13")?)
        .required(total_of("18", "1099-int", "penalty")?)
        .required(money("19a", |i, _| {
            let paid = i.decimal("alimony_paid")?;
            if paid.is_zero() || !i.boolean("alimony_pre_2019")? {
                return Ok(Decimal::ZERO.into());
            }
            Ok(paid.into())
        })?)
        .required(FieldSpec::new("19b", ValueKind::Ssn, |i, v| {
            if v.decimal("19a")?.is_zero() {
                return Ok(Value::Empty);
            }
            i.get("alimony_recipient_ssn")
        })?)
        .required(echo_money("24z", "other_adjustments")?)
        .required(sum_of("25", &["24z"])?)
        .required(sum_of("26", &["13", "18", "19a", "25"])?)
        .needs_filing(|v| any_nonzero(v, &["10", "26"]))
        .build()
}
