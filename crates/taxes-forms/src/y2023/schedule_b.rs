//! Schedule B (Form 1040), Interest and Ordinary Dividends.
//!
//! Only Part I (interest) and the Part III foreign account questions are
//! modelled. The schedule is filed when taxable interest exceeds $1,500;
//! Form 1040 line 2b reads line 4 from here in that case.

use rust_decimal::Decimal;
use taxes_core::{not_implemented, FieldSpec, FormSpec, InputSpec, TaxResult, ValueKind};

use super::common::{money, sum_of, total_of, YEAR};

/// Form name.
pub const FORM: &str = "1040_sb";

/// Interest above which Schedule B must be filed.
pub const THRESHOLD: Decimal = Decimal::from_parts(1_500, 0, 0, false, 0);

/// Build the form.
pub fn form() -> TaxResult<FormSpec> {
    FormSpec::builder(FORM, YEAR)
        .title("Interest and Ordinary Dividends")
        .sequence(8)
        .input(InputSpec::boolean(
            "foreign_account",
            "At any time during 2023, did you have a financial interest in or \
             signature authority over a financial account located in a foreign country?",
        )?)
        .input(InputSpec::boolean(
            "foreign_trust",
            "During 2023, did you receive a distribution from, or were you the \
             grantor of, or transferor to, a foreign trust?",
        )?)
        .required(total_of("1", "1099-int", "taxable")?)
        .required(sum_of("2", &["1"])?)
        .required(money("3", |_, _| Ok(Decimal::ZERO.into()))?)
        .required(money("4", |_, v| {
            Ok((v.decimal("2")? - v.decimal("3")?).into())
        })?)
        .required(FieldSpec::new("7a", ValueKind::Boolean, |i, _| {
            if i.boolean("foreign_account")? {
                return not_implemented("foreign financial accounts");
            }
            Ok(false.into())
        })?)
        .required(FieldSpec::new("8", ValueKind::Boolean, |i, _| {
            if i.boolean("foreign_trust")? {
                return not_implemented("foreign trusts");
            }
            Ok(false.into())
        })?)
        .needs_filing(|v| v.decimal("4").is_ok_and(|d| d > THRESHOLD))
        .build()
}
