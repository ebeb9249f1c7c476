//! Form 8889, Health Savings Accounts.
//!
//! One instance per covered person: `8889:taxpayer`, `8889:spouse`.
//! Part I computes the deduction on line 13; any distribution in Part II
//! is outside what this library handles.

use rust_decimal::Decimal;
use taxes_core::{
    not_implemented, EnumOption, FieldSpec, FormSpec, InputSpec, Instancing, TaxResult, Value,
    ValueKind,
};

use super::common::{echo_money, money, non_negative, sum_of, YEAR};

/// Form name.
pub const FORM: &str = "8889";

const SELF_ONLY_LIMIT: i64 = 3_850;
const FAMILY_LIMIT: i64 = 7_750;
const CATCH_UP: i64 = 1_000;

/// Build the form.
pub fn form() -> TaxResult<FormSpec> {
    FormSpec::builder(FORM, YEAR)
        .title("Health Savings Accounts (HSAs)")
        .sequence(52)
        .instancing(Instancing::Fixed(vec!["taxpayer".into(), "spouse".into()]))
        .input(InputSpec::enumeration(
            "coverage",
            "Coverage under a high-deductible health plan during 2023",
            vec![
                EnumOption::new("self_only", "Self-only"),
                EnumOption::new("family", "Family"),
            ],
            false,
        )?)
        .input(InputSpec::boolean(
            "age_55",
            "Were you 55 or older at the end of 2023?",
        )?)
        .input(InputSpec::float(
            "contributions",
            "HSA contributions you made for 2023, excluding employer contributions",
        )?)
        .input(InputSpec::float(
            "employer_contributions",
            "Employer contributions (W-2 box 12, code W)",
        )?)
        .input(InputSpec::float(
            "distributions",
            "Total HSA distributions received in 2023",
        )?)
        .optional(FieldSpec::new(
            "1",
            ValueKind::enumeration(["self_only", "family"]),
            |i, _| i.get("coverage"),
        )?)
        .optional(echo_money("2", "contributions")?)
        .optional(money("3", |_, v| {
            let limit = match v.enum_key("1")?.as_deref() {
                Some("family") => FAMILY_LIMIT,
                _ => SELF_ONLY_LIMIT,
            };
            Ok(Decimal::from(limit).into())
        })?)
        .optional(sum_of("6", &["3"])?)
        .optional(money("7", |i, _| {
            let extra = if i.boolean("age_55")? { CATCH_UP } else { 0 };
            Ok(Decimal::from(extra).into())
        })?)
        .optional(sum_of("8", &["6", "7"])?)
        .optional(echo_money("9", "employer_contributions")?)
        .optional(sum_of("11", &["9"])?)
        .optional(money("12", |_, v| {
            Ok(non_negative(v.decimal("8")? - v.decimal("11")?).into())
        })?)
        .required(money("13", |_, v| {
            Ok(v.decimal("2")?.min(v.decimal("12")?).into())
        })?)
        .required(money("14a", |i, _| {
            let distributions = i.decimal("distributions")?;
            if !distributions.is_zero() {
                return not_implemented("HSA distributions");
            }
            Ok(Value::from(Decimal::ZERO))
        })?)
        .build()
}
