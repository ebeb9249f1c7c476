//! Filing status, as stored in the `1040.filing_status` enumeration input.

use std::fmt;
use std::str::FromStr;

use taxes_core::{EnumOption, Eval, TaxError, ValueView};

/// Filing status of an individual return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilingStatus {
    /// Single.
    Single,
    /// Married filing jointly.
    MarriedFilingJointly,
    /// Married filing separately.
    MarriedFilingSeparately,
    /// Head of household.
    HeadOfHousehold,
    /// Qualifying surviving spouse.
    QualifyingSurvivingSpouse,
}

impl FilingStatus {
    /// Every status, in the order the form lists them.
    pub const ALL: [Self; 5] = [
        Self::Single,
        Self::MarriedFilingJointly,
        Self::MarriedFilingSeparately,
        Self::HeadOfHousehold,
        Self::QualifyingSurvivingSpouse,
    ];

    /// Key stored in input files and solutions.
    pub fn key(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MarriedFilingJointly => "mfj",
            Self::MarriedFilingSeparately => "mfs",
            Self::HeadOfHousehold => "hoh",
            Self::QualifyingSurvivingSpouse => "qss",
        }
    }

    /// Label shown by prompters.
    pub fn label(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married filing jointly",
            Self::MarriedFilingSeparately => "Married filing separately",
            Self::HeadOfHousehold => "Head of household",
            Self::QualifyingSurvivingSpouse => "Qualifying surviving spouse",
        }
    }

    /// Options for the enumeration input.
    pub fn options() -> Vec<EnumOption> {
        Self::ALL
            .iter()
            .map(|s| EnumOption::new(s.key(), s.label()))
            .collect()
    }

    /// Whether a spouse appears on the return.
    pub fn has_spouse(self) -> bool {
        matches!(
            self,
            Self::MarriedFilingJointly | Self::MarriedFilingSeparately
        )
    }

    /// Read the status from the solved `1040.filing_status` field.
    pub fn from_values(values: &ValueView<'_>) -> Eval<Self> {
        let key = values.enum_key("1040.filing_status")?.unwrap_or_default();
        Ok(key.parse()?)
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FilingStatus {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.key() == s)
            .ok_or_else(|| TaxError::InvalidInput {
                name: "1040.filing_status".into(),
                raw: s.to_string(),
                reason: "unknown filing status".into(),
            })
    }
}
