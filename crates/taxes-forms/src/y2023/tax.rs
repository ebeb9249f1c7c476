//! # 2023 Tax Computation
//!
//! Below $100,000 of taxable income the tax comes from the Tax Table:
//! income is placed in its table row and the bracket rates are applied to
//! the row's midpoint, rounded to whole dollars. At or above $100,000 the
//! Tax Computation Worksheet applies the brackets to the exact amount.
//!
//! Table rows are $5 to $15 and $15 to $25, then $25 wide up to $3,000,
//! then $50 wide up to $100,000. Income under $5 owes nothing.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::status::FilingStatus;

/// Taxable income at which the Tax Table stops.
pub const TABLE_LIMIT: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// `(upper bound, rate in percent)`; the last bracket is unbounded.
type Brackets = [(u32, u32); 7];

const SINGLE: Brackets = [
    (11_000, 10),
    (44_725, 12),
    (95_375, 22),
    (182_100, 24),
    (231_250, 32),
    (578_125, 35),
    (u32::MAX, 37),
];

const JOINT: Brackets = [
    (22_000, 10),
    (89_450, 12),
    (190_750, 22),
    (364_200, 24),
    (462_500, 32),
    (693_750, 35),
    (u32::MAX, 37),
];

const SEPARATE: Brackets = [
    (11_000, 10),
    (44_725, 12),
    (95_375, 22),
    (182_100, 24),
    (231_250, 32),
    (346_875, 35),
    (u32::MAX, 37),
];

const HEAD_OF_HOUSEHOLD: Brackets = [
    (15_700, 10),
    (59_850, 12),
    (95_350, 22),
    (182_100, 24),
    (231_250, 32),
    (578_100, 35),
    (u32::MAX, 37),
];

fn brackets(status: FilingStatus) -> &'static Brackets {
    match status {
        FilingStatus::Single => &SINGLE,
        FilingStatus::MarriedFilingJointly | FilingStatus::QualifyingSurvivingSpouse => &JOINT,
        FilingStatus::MarriedFilingSeparately => &SEPARATE,
        FilingStatus::HeadOfHousehold => &HEAD_OF_HOUSEHOLD,
    }
}

/// Standard deduction for 2023, before age and blindness additions.
pub fn standard_deduction(status: FilingStatus) -> Decimal {
    Decimal::from(match status {
        FilingStatus::Single | FilingStatus::MarriedFilingSeparately => 13_850,
        FilingStatus::MarriedFilingJointly | FilingStatus::QualifyingSurvivingSpouse => 27_700,
        FilingStatus::HeadOfHousehold => 20_800,
    })
}

/// Apply the bracket rates to `income` exactly, or `None` when the
/// arithmetic leaves the decimal range.
pub fn bracket_tax(income: Decimal, status: FilingStatus) -> Option<Decimal> {
    let mut tax = Decimal::ZERO;
    let mut lower = Decimal::ZERO;
    for &(upper, percent) in brackets(status) {
        if income <= lower {
            break;
        }
        let upper = Decimal::from(upper);
        let slice = income.min(upper).checked_sub(lower)?;
        tax = tax.checked_add(slice.checked_mul(Decimal::new(i64::from(percent), 2))?)?;
        lower = upper;
    }
    Some(tax)
}

/// Midpoint of the Tax Table row containing `income`, or `None` below $5.
pub fn table_midpoint(income: Decimal) -> Option<Decimal> {
    let (start, width) = if income < Decimal::from(5) {
        return None;
    } else if income < Decimal::from(15) {
        (Decimal::from(5), Decimal::from(10))
    } else if income < Decimal::from(25) {
        (Decimal::from(15), Decimal::from(10))
    } else if income < Decimal::from(3_000) {
        let width = Decimal::from(25);
        (row_start(income - width, width) + width, width)
    } else {
        let width = Decimal::from(50);
        (row_start(income, width), width)
    };
    Some(start + width / Decimal::from(2))
}

fn row_start(income: Decimal, width: Decimal) -> Decimal {
    (income / width).floor() * width
}

/// Tax on `taxable_income` for 2023, or `None` on overflow.
pub fn figure_tax(taxable_income: Decimal, status: FilingStatus) -> Option<Decimal> {
    if taxable_income >= TABLE_LIMIT {
        return bracket_tax(taxable_income, status)
            .map(|tax| tax.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero));
    }
    match table_midpoint(taxable_income) {
        Some(mid) => bracket_tax(mid, status)
            .map(|tax| tax.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)),
        None => Some(Decimal::ZERO),
    }
}
