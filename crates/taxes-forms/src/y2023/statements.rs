//! Information statements the filer receives: W-2, 1099-INT and 1099-G.
//!
//! Statements are freely instanced (`w-2:acme`, `1099-int:bank`) and are
//! never filed. Their fields are optional echoes of the boxes, pulled in
//! only when the return reads them.

use rust_decimal::Decimal;
use taxes_core::{FormSpec, InputSpec, Instancing, TaxResult, ValueKind};

use super::common::{echo, echo_money, money, YEAR};

/// Form W-2, Wage and Tax Statement.
pub fn w2() -> TaxResult<FormSpec> {
    FormSpec::builder("w-2", YEAR)
        .title("Wage and Tax Statement")
        .instancing(Instancing::Free)
        .input(InputSpec::text("employer", "Employer name")?)
        .input(InputSpec::float("box_1", "Box 1: Wages, tips, other compensation")?)
        .input(InputSpec::float("box_2", "Box 2: Federal income tax withheld")?)
        .optional(echo("employer", ValueKind::Text, "employer")?)
        .optional(echo_money("wages", "box_1")?)
        .optional(echo_money("withholding", "box_2")?)
        .needs_filing(|_| false)
        .build()
}

/// Form 1099-INT, Interest Income.
pub fn f1099_int() -> TaxResult<FormSpec> {
    FormSpec::builder("1099-int", YEAR)
        .title("Interest Income")
        .instancing(Instancing::Free)
        .input(InputSpec::text("payer", "Payer name")?)
        .input(InputSpec::float("box_1", "Box 1: Interest income")?)
        .input(InputSpec::float("box_2", "Box 2: Early withdrawal penalty")?)
        .input(InputSpec::float(
            "box_3",
            "Box 3: Interest on U.S. Savings Bonds and Treasury obligations",
        )?)
        .input(InputSpec::float("box_4", "Box 4: Federal income tax withheld")?)
        .input(InputSpec::float("box_8", "Box 8: Tax-exempt interest")?)
        .optional(echo("payer", ValueKind::Text, "payer")?)
        .optional(echo_money("interest", "box_1")?)
        .optional(echo_money("penalty", "box_2")?)
        .optional(echo_money("treasury_interest", "box_3")?)
        .optional(echo_money("withholding", "box_4")?)
        .optional(echo_money("tax_exempt", "box_8")?)
        .optional(money("taxable", |_, v| {
            let total: Decimal = v.decimal("interest")? + v.decimal("treasury_interest")?;
            Ok(total.into())
        })?)
        .needs_filing(|_| false)
        .build()
}

/// Form 1099-G, Certain Government Payments.
pub fn f1099_g() -> TaxResult<FormSpec> {
    FormSpec::builder("1099-g", YEAR)
        .title("Certain Government Payments")
        .instancing(Instancing::Free)
        .input(InputSpec::text("payer", "Payer name")?)
        .input(InputSpec::float("box_1", "Box 1: Unemployment compensation")?)
        .input(InputSpec::float(
            "box_2",
            "Box 2: State or local income tax refunds, credits, or offsets",
        )?)
        .optional(echo("payer", ValueKind::Text, "payer")?)
        .optional(echo_money("unemployment", "box_1")?)
        .optional(echo_money("refund", "box_2")?)
        .needs_filing(|_| false)
        .build()
}
