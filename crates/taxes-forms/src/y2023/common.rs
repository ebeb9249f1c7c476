//! Building blocks shared by the 2023 form definitions.

use rust_decimal::Decimal;
use taxes_core::{Eval, FieldSpec, InputView, Signal, TaxError, TaxResult, Value, ValueKind, ValueView};

/// Tax year of every form in this module.
pub const YEAR: u16 = 2023;

/// A dollars-and-cents field.
pub fn money<F>(name: &str, compute: F) -> TaxResult<FieldSpec>
where
    F: Fn(&InputView<'_>, &ValueView<'_>) -> Eval<Value> + Send + Sync + 'static,
{
    FieldSpec::new(name, ValueKind::Decimal(2), compute)
}

/// A field that copies one input of the same form.
pub fn echo(name: &str, kind: ValueKind, input: &str) -> TaxResult<FieldSpec> {
    let input = input.to_string();
    FieldSpec::new(name, kind, move |i, _| i.get(&input))
}

/// A money field that copies one amount input of the same form.
pub fn echo_money(name: &str, input: &str) -> TaxResult<FieldSpec> {
    echo(name, ValueKind::Decimal(2), input)
}

/// Sum `field` over every instance of `form` present in the input file.
pub fn sum_instances(
    inputs: &InputView<'_>,
    values: &ValueView<'_>,
    form: &str,
    field: &str,
) -> Eval<Decimal> {
    let mut total = Decimal::ZERO;
    for tag in inputs.instances(form) {
        let amount = values.decimal(&format!("{form}:{tag}.{field}"))?;
        total = checked_add(total, amount, &format!("{form}.{field} total"))?;
    }
    Ok(total)
}

/// `a + b`, or a fatal [`TaxError::Overflow`] naming `what`.
pub fn checked_add(a: Decimal, b: Decimal, what: &str) -> Eval<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| Signal::from(TaxError::Overflow(what.to_string())))
}

/// A money field summing `field` across the instances of `form`.
pub fn total_of(name: &str, form: &'static str, field: &'static str) -> TaxResult<FieldSpec> {
    money(name, move |i, v| Ok(sum_instances(i, v, form, field)?.into()))
}

/// A money field summing other fields of the same form.
pub fn sum_of(name: &str, lines: &'static [&'static str]) -> TaxResult<FieldSpec> {
    let field = name.to_string();
    money(name, move |_, v| {
        let mut total = Decimal::ZERO;
        for line in lines {
            total = checked_add(total, v.decimal(line)?, &field)?;
        }
        Ok(total.into())
    })
}

/// Clamp negative amounts to zero.
pub fn non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}

/// Whether any of the named money fields of the form is non-zero.
pub fn any_nonzero(values: &ValueView<'_>, lines: &[&str]) -> bool {
    lines
        .iter()
        .any(|line| values.decimal(line).is_ok_and(|d| !d.is_zero()))
}
